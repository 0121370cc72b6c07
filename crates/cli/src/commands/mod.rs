//! `neo-nef` subcommands. Each returns the text to print on stdout.

pub mod compile;
pub mod inspect;
pub mod verify;

use anyhow::Context;
use neo_smart_contract::NefFile;
use std::path::Path;

pub type CommandResult = anyhow::Result<String>;

/// Reads and fully validates a NEF file.
pub(crate) fn read_nef(path: &Path) -> anyhow::Result<NefFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    NefFile::from_bytes(&bytes).with_context(|| format!("decoding {}", path.display()))
}
