//! Compiler end to end: IR in, NEF out, then executed through CALLT.

use std::sync::Arc;

use neo_compiler::ast::*;
use neo_compiler::{CompileError, Compiler, CompilerConfig};
use neo_core::UInt160;
use neo_smart_contract::{
    ApplicationEngine, CallContext, DeclaredContract, NativeInterface, NativeRegistry, NefFile,
};
use neo_vm::{CallFlags, StackItem, VMState};
use proptest::prelude::*;

type T = ContractParameterType;

/// Zero-argument natives that return a value, as (interface, method).
const GETTERS: &[(&str, &str)] = &[
    ("PolicyContract", "getFeePerByte"),
    ("PolicyContract", "getExecFeeFactor"),
    ("PolicyContract", "getStoragePrice"),
    ("GasToken", "totalSupply"),
    ("GasToken", "symbol"),
    ("NeoToken", "getCommittee"),
    ("NeoToken", "getGasPerBlock"),
    ("LedgerContract", "currentIndex"),
    ("OracleContract", "getPrice"),
];

fn calls_with_flags(count: usize) -> MethodDecl {
    let mut method = MethodDecl::new("main", T::Void);
    let mut added = 0;
    'outer: for bits in 0..=CallFlags::ALL.bits() {
        for (iface, name) in GETTERS {
            if added == count {
                break 'outer;
            }
            let flags = CallFlags::from_byte(bits).unwrap();
            method = method.call(Expr::native(iface, name, vec![]).with_flags(flags));
            added += 1;
        }
    }
    assert_eq!(added, count);
    method
}

// ============================================================================
// Token table
// ============================================================================

#[test]
fn test_table_at_capacity_compiles() {
    let source = ContractSource::new("Full").with_method(calls_with_flags(128));
    let unit = Compiler::default().compile(&source).unwrap();
    assert_eq!(unit.nef.tokens.len(), 128);
    assert_eq!(unit.call_sites.last().unwrap().token, 127);

    let decoded = NefFile::from_bytes(&unit.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, unit.nef);
}

#[test]
fn test_table_overflow_is_a_compile_error() {
    let source = ContractSource::new("Overflow").with_method(calls_with_flags(129));
    assert_eq!(
        Compiler::default().compile(&source).unwrap_err(),
        CompileError::TableOverflow { count: 129, max: 128 }
    );
}

#[test]
fn test_repeated_calls_do_not_grow_the_table() {
    let mut method = MethodDecl::new("main", T::Void);
    for _ in 0..500 {
        method = method.call(Expr::native("PolicyContract", "getFeePerByte", vec![]));
    }
    let unit = Compiler::default()
        .compile(&ContractSource::new("Loop").with_method(method))
        .unwrap();
    assert_eq!(unit.nef.tokens.len(), 1);
    assert_eq!(unit.call_sites.len(), 500);
    assert!(unit.call_sites.iter().all(|site| site.token == 0));
}

#[test]
fn test_json_ir_compiles() {
    let text = r#"{
        "name": "Json",
        "methods": [{
            "name": "split",
            "params": [{ "name": "text", "type": "String" }],
            "return_type": "Array",
            "body": [{ "return": { "call": {
                "target": { "native": { "interface": "StdLib", "method": "stringSplit" } },
                "args": [ { "arg": "text" }, { "str": "," } ]
            } } }]
        }]
    }"#;
    let source = ContractSource::from_json(text).unwrap();
    let unit = Compiler::default().compile(&source).unwrap();
    let token = &unit.nef.tokens[0];
    assert_eq!(token.hash, NativeInterface::StdLib.hash());
    assert_eq!(token.method, "stringSplit");
    assert_eq!(token.parameters_count, 2);
    assert_eq!(token.call_flags, CallFlags::READ_ONLY);
}

#[test]
fn test_config_file_sets_compiler_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devpack.toml");
    std::fs::write(&path, "compiler = \"acme-compiler 1.0\"\n").unwrap();

    let config = CompilerConfig::load(&path).unwrap();
    let source = ContractSource::new("Cfg").with_method(calls_with_flags(1));
    let unit = Compiler::new(config).compile(&source).unwrap();
    assert_eq!(unit.nef.compiler, "acme-compiler 1.0");
    assert!(unit.nef.verify_checksum());
}

// ============================================================================
// Execution
// ============================================================================

fn registry() -> NativeRegistry {
    let registry = NativeRegistry::with_declared_natives();
    registry.register(
        DeclaredContract::from_interface(NativeInterface::Policy)
            .with_constant("getFeePerByte", 0, StackItem::from(1000i64)),
    );
    registry.register(
        DeclaredContract::from_interface(NativeInterface::StdLib).with_handler(
            "itoa",
            1,
            |_, args| Ok(Some(StackItem::from_byte_string(args[0].as_int()?.to_string()))),
        ),
    );
    registry.register(
        DeclaredContract::from_interface(NativeInterface::Neo).with_handler(
            "balanceOf",
            1,
            |_, args| {
                let account = args[0].as_bytes()?;
                Ok(Some(StackItem::from(account[0] as i64)))
            },
        ),
    );
    registry
}

fn run(unit_nef: NefFile, offset: usize, args: Vec<StackItem>) -> neo_smart_contract::ExecutionOutcome {
    let mut engine = ApplicationEngine::new(
        Arc::new(unit_nef),
        Arc::new(registry()),
        CallContext::new(UInt160::ZERO, CallFlags::ALL),
    )
    .unwrap();
    engine.execute(offset, args)
}

#[test]
fn test_compiled_nested_calls_execute() {
    let source = ContractSource::new("Fees").with_method(
        MethodDecl::new("describe", T::String).returning(Expr::native(
            "StdLib",
            "itoa",
            vec![Expr::native("PolicyContract", "getFeePerByte", vec![])],
        )),
    );
    let unit = Compiler::default().compile(&source).unwrap();
    let outcome = run(unit.nef, 0, Vec::new());

    assert_eq!(outcome.state, VMState::HALT, "{:?}", outcome.error);
    assert_eq!(outcome.stack, vec![StackItem::from_byte_string("1000")]);
    assert_eq!(outcome.gas_consumed, ((1 << 15) + (1 << 12)) * 30);
    assert_eq!(outcome.calls.len(), 2);
}

#[test]
fn test_compiled_local_call_passes_arguments() {
    let source = ContractSource::new("Balances")
        .with_method(MethodDecl::new("unused", T::Void).call(Expr::native(
            "GasToken",
            "symbol",
            vec![],
        )))
        .with_method(
            MethodDecl::new("main", T::Integer)
                .with_param("account", T::Hash160)
                .returning(Expr::local("lookup", vec![Expr::arg("account")])),
        )
        .with_method(
            MethodDecl::new("lookup", T::Integer)
                .with_param("who", T::Hash160)
                .returning(Expr::native("NeoToken", "balanceOf", vec![Expr::arg("who")])),
        );
    let unit = Compiler::default().compile(&source).unwrap();
    let main = unit.method("main").unwrap().offset;

    let mut account = [0u8; 20];
    account[0] = 42;
    let outcome = run(unit.nef, main, vec![StackItem::from_byte_string(account.to_vec())]);

    assert_eq!(outcome.state, VMState::HALT, "{:?}", outcome.error);
    assert_eq!(outcome.stack, vec![StackItem::from(42i64)]);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_compilation_is_deterministic(picks in prop::collection::vec(0..GETTERS.len(), 1..40)) {
        let mut method = MethodDecl::new("main", T::Void);
        for &pick in &picks {
            let (iface, name) = GETTERS[pick];
            method = method.call(Expr::native(iface, name, vec![]));
        }
        let source = ContractSource::new("Prop").with_method(method);

        let first = Compiler::default().compile(&source).unwrap();
        let second = Compiler::default().compile(&source).unwrap();
        prop_assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());

        let mut distinct = picks.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(first.nef.tokens.len(), distinct.len());

        // Dense, first-seen order: the first call always gets index 0.
        prop_assert_eq!(first.call_sites[0].token, 0);
        let max = first.call_sites.iter().map(|s| s.token).max().unwrap();
        prop_assert_eq!(max as usize + 1, first.nef.tokens.len());
    }
}
