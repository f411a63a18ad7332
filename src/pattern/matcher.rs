//! Layered rule evaluation: defaults, then user excludes, then re-includes.

use super::defaults::DEFAULT_RULES;
use super::rule::{IgnoreRule, Polarity};
use crate::domain::{ExcludeReason, IngestOptions};
use crate::error::{IngestError, PatternError, Result};

/// Ordered rules, partitioned into the built-in set and the user's set.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    defaults: &'static [IgnoreRule],
    user_excludes: Vec<IgnoreRule>,
    user_reincludes: Vec<IgnoreRule>,
}

impl IgnoreRuleSet {
    pub fn new(use_defaults: bool, user_patterns: &[String]) -> Result<Self, PatternError> {
        let mut user_excludes = Vec::new();
        let mut user_reincludes = Vec::new();
        for pattern in user_patterns {
            let rule = IgnoreRule::parse(pattern)?;
            match rule.polarity() {
                Polarity::Exclude => user_excludes.push(rule),
                Polarity::ReInclude => user_reincludes.push(rule),
            }
        }
        let defaults: &'static [IgnoreRule] =
            if use_defaults { DEFAULT_RULES.as_slice() } else { &[] };
        Ok(Self { defaults, user_excludes, user_reincludes })
    }

    /// First rule that excludes the path, after re-includes are applied.
    pub fn excluded_by(&self, relative_path: &str, is_dir: bool) -> Option<ExcludeReason> {
        let reason = self
            .defaults
            .iter()
            .find(|rule| rule.is_match(relative_path, is_dir))
            .map(|rule| ExcludeReason::DefaultIgnore(rule.as_str().to_string()))
            .or_else(|| {
                self.user_excludes
                    .iter()
                    .find(|rule| rule.is_match(relative_path, is_dir))
                    .map(|rule| ExcludeReason::UserIgnore(rule.as_str().to_string()))
            })?;

        if self.user_reincludes.iter().any(|rule| rule.is_match(relative_path, is_dir)) {
            return None;
        }
        Some(reason)
    }
}

/// Per-path predicate combining the ignore rules with the include whitelist.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: IgnoreRuleSet,
    includes: Vec<IgnoreRule>,
}

impl PatternMatcher {
    pub fn new(options: &IngestOptions) -> Result<Self> {
        let rules = IgnoreRuleSet::new(options.include_default_ignores, &options.exclude_patterns)
            .map_err(|source| IngestError::Pattern { list: "exclude", source })?;

        let includes = options
            .include_patterns
            .iter()
            .map(|pattern| {
                let rule = IgnoreRule::parse(pattern)?;
                if rule.polarity() == Polarity::ReInclude {
                    return Err(PatternError::NegatedInclude(pattern.clone()));
                }
                Ok(rule)
            })
            .collect::<Result<Vec<_>, PatternError>>()
            .map_err(|source| IngestError::Pattern { list: "include", source })?;

        Ok(Self { rules, includes })
    }

    /// `true` when the path survives every rule.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        self.decide(relative_path, is_dir).is_none()
    }

    /// Ignore-rule check alone, without the include whitelist.
    pub fn ignored(&self, relative_path: &str, is_dir: bool) -> Option<ExcludeReason> {
        self.rules.excluded_by(relative_path, is_dir)
    }

    /// Ignore-rule check for `relative_path` and every directory above it.
    /// Used for paths reached without walking through their parents.
    pub fn ignored_with_ancestors(
        &self,
        relative_path: &str,
        is_dir: bool,
    ) -> Option<ExcludeReason> {
        relative_path
            .match_indices('/')
            .find_map(|(idx, _)| self.ignored(&relative_path[..idx], true))
            .or_else(|| self.ignored(relative_path, is_dir))
    }

    /// `None` when the path is included, otherwise the reason it is not.
    ///
    /// Include patterns only filter files; directories stay traversable so
    /// matching files below them can be reached.
    pub fn decide(&self, relative_path: &str, is_dir: bool) -> Option<ExcludeReason> {
        if let Some(reason) = self.rules.excluded_by(relative_path, is_dir) {
            return Some(reason);
        }
        if is_dir || self.includes.is_empty() {
            return None;
        }
        if self.includes.iter().any(|rule| rule.covers(relative_path, false)) {
            None
        } else {
            Some(ExcludeReason::NotIncluded)
        }
    }
}
