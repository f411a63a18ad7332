//! Output rendering (tree, digest text, JSON report)

pub mod digest;
pub mod report;
pub mod tree;

pub use digest::{assemble, RunContext};
pub use report::{report_value, write_report, REPORT_SCHEMA_VERSION};
pub use tree::{render_tree, TREE_HEADER};
