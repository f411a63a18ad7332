//! A single compiled ignore/include rule.

use crate::error::PatternError;
use globset::{GlobBuilder, GlobMatcher};

/// How a pattern is compared against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Glob without `/`, compared against the base name at any depth.
    NameGlob,
    /// Glob containing `/`, compared against the whole root-relative path.
    PathGlob,
    /// No glob syntax and no `/`; a substring of the base name. Built-in
    /// literals match the whole base name instead.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Exclude,
    /// `!pattern`: brings back a path an earlier rule excluded.
    ReInclude,
}

#[derive(Debug, Clone)]
enum Compiled {
    Glob(GlobMatcher),
    Substring(String),
    ExactName(String),
}

/// A parsed pattern, compiled once and evaluated per path.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    raw: String,
    kind: PatternKind,
    polarity: Polarity,
    dir_only: bool,
    compiled: Compiled,
}

impl IgnoreRule {
    /// Parse one user pattern.
    ///
    /// A trailing `/` restricts the rule to directories and a leading `/`
    /// anchors it to the root. A leading `!` marks a re-include rule.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        Self::compile(raw, false)
    }

    /// Parse a built-in pattern. Literals must equal the base name, so
    /// `venv` leaves `.venv-tools` alone.
    pub fn parse_builtin(raw: &str) -> Result<Self, PatternError> {
        Self::compile(raw, true)
    }

    fn compile(raw: &str, exact_literals: bool) -> Result<Self, PatternError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        let (polarity, body) = match trimmed.strip_prefix('!') {
            Some(rest) => (Polarity::ReInclude, rest),
            None => (Polarity::Exclude, trimmed),
        };
        if body.is_empty() {
            return Err(PatternError::BareNegation(trimmed.to_string()));
        }

        let dir_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        let anchored = body.starts_with('/');
        let body = body.trim_start_matches('/');
        if body.is_empty() {
            return Err(PatternError::Empty);
        }

        let has_glob = body.contains(['*', '?', '[', '{']);
        let kind = if anchored || body.contains('/') {
            PatternKind::PathGlob
        } else if has_glob {
            PatternKind::NameGlob
        } else {
            PatternKind::Literal
        };

        let compiled = match kind {
            PatternKind::Literal if exact_literals => Compiled::ExactName(body.to_string()),
            PatternKind::Literal => Compiled::Substring(body.to_string()),
            PatternKind::NameGlob | PatternKind::PathGlob => {
                let glob = GlobBuilder::new(body)
                    .literal_separator(true)
                    .backslash_escape(true)
                    .build()
                    .map_err(|source| PatternError::InvalidGlob {
                        pattern: trimmed.to_string(),
                        source,
                    })?;
                Compiled::Glob(glob.compile_matcher())
            }
        };

        Ok(Self { raw: trimmed.to_string(), kind, polarity, dir_only, compiled })
    }

    /// The pattern as written, including any `!` prefix.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// Test a root-relative path (forward slashes, no leading `/`).
    pub fn is_match(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        match (&self.compiled, self.kind) {
            (Compiled::Substring(literal), _) => name.contains(literal.as_str()),
            (Compiled::ExactName(literal), _) => name == literal,
            (Compiled::Glob(glob), PatternKind::NameGlob) => glob.is_match(name),
            (Compiled::Glob(glob), _) => glob.is_match(relative_path),
        }
    }

    /// Like [`is_match`](Self::is_match), but also true when any ancestor
    /// directory of `relative_path` matches.
    pub fn covers(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.is_match(relative_path, is_dir) {
            return true;
        }
        relative_path
            .match_indices('/')
            .any(|(idx, _)| self.is_match(&relative_path[..idx], true))
    }
}
