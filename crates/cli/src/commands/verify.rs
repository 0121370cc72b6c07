//! `verify`: resolve every token against the declared native contracts.

use super::{read_nef, CommandResult};
use neo_smart_contract::{NativeRegistry, TokenResolver};
use neo_vm::CallFlags;
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub fn run(path: &Path, flags: CallFlags) -> CommandResult {
    let nef = read_nef(path)?;
    let resolver = TokenResolver::new(Arc::new(NativeRegistry::with_declared_natives()));

    let mut report = String::new();
    let mut faults = 0usize;
    for (index, result) in resolver.resolve_all(&nef, flags).into_iter().enumerate() {
        match result {
            Ok(binding) => {
                let _ = writeln!(
                    report,
                    "#{index:<3} ok     {} effective={}",
                    binding.token,
                    binding.effective_flags.describe()
                );
            }
            Err(err) => {
                faults += 1;
                let _ = writeln!(report, "#{index:<3} fault  [{}] {err}", err.kind());
            }
        }
    }

    info!(
        target: "neo::cli",
        tokens = nef.tokens.len(),
        faults,
        flags = %flags.describe(),
        "verified module"
    );
    if faults > 0 {
        anyhow::bail!(
            "{}\n{faults} of {} tokens failed to resolve",
            report.trim_end(),
            nef.tokens.len()
        );
    }
    let _ = write!(report, "{} tokens resolved", nef.tokens.len());
    Ok(report)
}
