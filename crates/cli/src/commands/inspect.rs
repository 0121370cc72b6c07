//! `inspect`: header, checksum and token table.

use super::{read_nef, CommandResult};
use neo_smart_contract::{NativeInterface, NefFile};
use std::fmt::Write;
use std::path::Path;

pub fn run(path: &Path, json: bool) -> CommandResult {
    let nef = read_nef(path)?;
    if json {
        return Ok(serde_json::to_string_pretty(&nef)?);
    }
    Ok(render(&nef))
}

pub(crate) fn render(nef: &NefFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "compiler: {}", nef.compiler);
    let _ = writeln!(
        out,
        "source:   {}",
        if nef.source.is_empty() { "-" } else { &nef.source }
    );
    let _ = writeln!(out, "script:   {} bytes", nef.script.len());
    let _ = writeln!(out, "checksum: 0x{:08x} (ok)", nef.checksum);
    let _ = writeln!(out, "tokens:   {}", nef.tokens.len());
    for (index, token) in nef.tokens.iter().enumerate() {
        let contract = NativeInterface::from_hash(&token.hash)
            .map(|iface| iface.name().to_string())
            .unwrap_or_else(|| token.hash.to_string());
        let _ = writeln!(
            out,
            "  #{index:<3} {contract}.{}/{} flags={} returns={}",
            token.method,
            token.parameters_count,
            token.call_flags.describe(),
            token.has_return_value
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_smart_contract::MethodToken;
    use neo_vm::CallFlags;

    #[test]
    fn test_render_names_native_contracts() {
        let token = MethodToken::new(
            NativeInterface::Policy.hash(),
            "getFeePerByte",
            0,
            true,
            CallFlags::READ_ONLY,
        )
        .unwrap();
        let nef = NefFile::new("test", "", vec![token], vec![0x40]).unwrap();
        let text = render(&nef);
        assert!(text.contains("source:   -"));
        assert!(text.contains("#0   PolicyContract.getFeePerByte/0 flags=ReadStates, AllowCall returns=true"));
    }
}
