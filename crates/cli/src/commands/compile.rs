//! `compile`: JSON IR to NEF.

use super::CommandResult;
use anyhow::Context;
use neo_compiler::{ast::ContractSource, Compiler, CompilerConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CompileOptions<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub compiler: Option<&'a str>,
    pub source: Option<&'a str>,
}

pub fn run(mut config: CompilerConfig, options: CompileOptions<'_>) -> CommandResult {
    if let Some(compiler) = options.compiler {
        config.compiler = compiler.to_string();
    }
    if let Some(source) = options.source {
        config.source = Some(source.to_string());
    }
    config.validate()?;

    let text = std::fs::read_to_string(options.input)
        .with_context(|| format!("reading {}", options.input.display()))?;
    let contract = ContractSource::from_json(&text)
        .with_context(|| format!("parsing {}", options.input.display()))?;

    let unit = Compiler::new(config)
        .compile(&contract)
        .with_context(|| format!("compiling contract '{}'", contract.name))?;
    let bytes = unit.to_bytes()?;

    let output = options
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(options.input));
    std::fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    info!(
        target: "neo::cli",
        output = %output.display(),
        size = bytes.len(),
        tokens = unit.nef.tokens.len(),
        "wrote module"
    );
    Ok(format!(
        "{}: {} bytes, {} methods, {} tokens, checksum 0x{:08x}",
        output.display(),
        bytes.len(),
        unit.methods.len(),
        unit.nef.tokens.len(),
        unit.nef.checksum
    ))
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("nef")
}
