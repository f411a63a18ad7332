//! repo-digest: turn a directory tree into a single LLM-friendly text digest.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
