//! Compiler driver: IR in, NEF module out.

use std::collections::{HashMap, HashSet};

use neo_core::ContractParameterType as T;
use neo_smart_contract::{NefError, NefFile};
use serde::Serialize;
use tracing::{debug, info};

use crate::ast::{CallExpr, Callee, ContractSource, Expr, MethodDecl, Statement};
use crate::{
    CallSite, CallSiteRecognizer, CompileError, CompileResult, CompilerConfig, Emitter, ExprType,
    Recognition, TokenTableBuilder,
};

/// Entry point of a compiled method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub offset: usize,
    pub params: Vec<T>,
    pub return_type: T,
}

/// Everything one compilation produces.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub nef: NefFile,
    pub methods: Vec<MethodInfo>,
    pub call_sites: Vec<CallSite>,
}

impl CompilationUnit {
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn to_bytes(&self) -> CompileResult<Vec<u8>> {
        Ok(self.nef.to_bytes()?)
    }
}

/// Compiles [`ContractSource`] into a [`CompilationUnit`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
    recognizer: CallSiteRecognizer,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            recognizer: CallSiteRecognizer::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(&self, source: &ContractSource) -> CompileResult<CompilationUnit> {
        let mut seen = HashSet::new();
        for method in &source.methods {
            if !seen.insert(method.name.as_str()) {
                return Err(CompileError::DuplicateMethod(method.name.clone()));
            }
        }

        let mut table = TokenTableBuilder::new();
        let mut emitter = Emitter::new();
        let mut methods = Vec::with_capacity(source.methods.len());
        for method in &source.methods {
            let offset = emitter.offset();
            let scope = MethodScope {
                source,
                method,
                recognizer: &self.recognizer,
            };
            scope.compile(&mut emitter, &mut table)?;
            debug!(target: "neo::compiler", method = %method.name, offset, "compiled method");
            methods.push(MethodInfo {
                name: method.name.clone(),
                offset,
                params: method.param_types(),
                return_type: method.return_type,
            });
        }

        let entries: HashMap<&str, usize> =
            methods.iter().map(|m| (m.name.as_str(), m.offset)).collect();
        emitter.link_local_calls(|name| entries.get(name).copied())?;

        let (script, call_sites) = emitter.into_script();
        let source_url = source
            .source_url
            .as_deref()
            .or(self.config.source.as_deref())
            .unwrap_or_default();
        let nef = NefFile::new(&self.config.compiler, source_url, table.into_tokens(), script)
            .map_err(|err| match err {
                NefError::TooManyTokens { count, max } => CompileError::TableOverflow { count, max },
                other => CompileError::Module(other),
            })?;

        info!(
            target: "neo::compiler",
            contract = %source.name,
            methods = methods.len(),
            tokens = nef.tokens.len(),
            script = nef.script.len(),
            checksum = nef.checksum,
            "compiled contract"
        );
        Ok(CompilationUnit {
            nef,
            methods,
            call_sites,
        })
    }
}

struct MethodScope<'a> {
    source: &'a ContractSource,
    method: &'a MethodDecl,
    recognizer: &'a CallSiteRecognizer,
}

impl MethodScope<'_> {
    fn compile(&self, em: &mut Emitter, table: &mut TokenTableBuilder) -> CompileResult<()> {
        let params = u8::try_from(self.method.params.len()).map_err(|_| {
            CompileError::TooManyParameters {
                method: self.method.name.clone(),
                count: self.method.params.len(),
            }
        })?;
        em.emit_prologue(params);

        for statement in &self.method.body {
            self.statement(statement, em, table)?;
        }
        if !matches!(self.method.body.last(), Some(Statement::Return(_))) {
            if self.method.return_type != T::Void {
                return Err(self.return_mismatch("no return"));
            }
            em.emit_ret();
        }
        Ok(())
    }

    fn statement(
        &self,
        statement: &Statement,
        em: &mut Emitter,
        table: &mut TokenTableBuilder,
    ) -> CompileResult<()> {
        match statement {
            Statement::Expr(expr) => {
                if !self.expr(expr, em, table)?.is_void() {
                    em.emit_drop();
                }
            }
            Statement::Return(None) => {
                if self.method.return_type != T::Void {
                    return Err(self.return_mismatch("nothing"));
                }
                em.emit_ret();
            }
            Statement::Return(Some(expr)) => {
                let ty = self.type_of(expr)?;
                if ty.is_void() {
                    return Err(self.void_value(expr));
                }
                if self.method.return_type == T::Void || !ty.assignable_to(self.method.return_type) {
                    return Err(self.return_mismatch(&ty.to_string()));
                }
                self.expr(expr, em, table)?;
                em.emit_ret();
            }
        }
        Ok(())
    }

    /// Emits `expr`. A native call is interned once its arguments are emitted,
    /// so table order follows evaluation order.
    fn expr(&self, expr: &Expr, em: &mut Emitter, table: &mut TokenTableBuilder) -> CompileResult<ExprType> {
        match expr {
            Expr::Int(value) => em.emit_int(*value),
            Expr::Bool(value) => em.emit_bool(*value),
            Expr::Str(value) => em.emit_str(value),
            Expr::Bytes(value) => em.emit_bytes(value),
            Expr::Hash160(hash) => em.emit_hash(hash),
            Expr::Null => em.emit_null(),
            Expr::Arg(name) => {
                let index = self.arg_index(name)?;
                // At most 255 parameters, checked in the prologue.
                em.emit_load_arg(index as u8);
            }
            Expr::Call(call) => {
                let (recognition, ty) = self.recognize(call)?;
                match recognition {
                    Recognition::Native(candidate) => {
                        self.args(call, em, table)?;
                        let index = table.intern(candidate.to_token()?);
                        em.emit_native_call(index, candidate.arity())?;
                    }
                    Recognition::ContractHash(hash) => em.emit_hash(&hash),
                    Recognition::Local => {
                        self.args(call, em, table)?;
                        em.emit_local_call(&local_name(call), call.args.len());
                    }
                }
                return Ok(ty);
            }
        }
        self.type_of(expr)
    }

    fn args(&self, call: &CallExpr, em: &mut Emitter, table: &mut TokenTableBuilder) -> CompileResult<()> {
        for arg in &call.args {
            self.expr(arg, em, table)?;
        }
        Ok(())
    }

    fn type_of(&self, expr: &Expr) -> CompileResult<ExprType> {
        Ok(match expr {
            Expr::Int(_) => T::Integer.into(),
            Expr::Bool(_) => T::Boolean.into(),
            Expr::Str(_) => T::String.into(),
            Expr::Bytes(_) => T::ByteArray.into(),
            Expr::Hash160(_) => T::Hash160.into(),
            Expr::Null => ExprType::Null,
            Expr::Arg(name) => self.method.params[self.arg_index(name)?].ty.into(),
            Expr::Call(call) => self.recognize(call)?.1,
        })
    }

    /// Classifies `call` and returns its result type, without emitting anything.
    fn recognize(&self, call: &CallExpr) -> CompileResult<(Recognition, ExprType)> {
        let mut arg_types = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let ty = self.type_of(arg)?;
            if ty.is_void() {
                return Err(self.void_value(arg));
            }
            arg_types.push(ty);
        }

        let recognition = self.recognizer.recognize(call, &arg_types)?;
        let ty = match recognition {
            Recognition::Native(candidate) => candidate.signature.return_type.into(),
            Recognition::ContractHash(_) => T::Hash160.into(),
            Recognition::Local => {
                let name = local_name(call);
                let target = self
                    .source
                    .method(&name)
                    .ok_or_else(|| CompileError::UnknownMethod(name.clone()))?;
                check_local_signature(target, &arg_types)?;
                target.return_type.into()
            }
        };
        Ok((recognition, ty))
    }

    fn arg_index(&self, name: &str) -> CompileResult<usize> {
        self.method
            .param_index(name)
            .ok_or_else(|| CompileError::UnknownArgument {
                method: self.method.name.clone(),
                name: name.to_string(),
            })
    }

    fn return_mismatch(&self, found: &str) -> CompileError {
        CompileError::ReturnMismatch {
            method: self.method.name.clone(),
            expected: self.method.return_type,
            found: found.to_string(),
        }
    }

    fn void_value(&self, expr: &Expr) -> CompileError {
        let callee = match expr {
            Expr::Call(call) => call.target.to_string(),
            _ => String::from("expression"),
        };
        CompileError::VoidValue {
            method: self.method.name.clone(),
            callee,
        }
    }
}

fn local_name(call: &CallExpr) -> String {
    match &call.target {
        Callee::Local { method } => method.clone(),
        Callee::Native { interface, method } => format!("{interface}.{method}"),
    }
}

fn check_local_signature(target: &MethodDecl, arg_types: &[ExprType]) -> CompileResult<()> {
    if target.params.len() != arg_types.len() {
        return Err(CompileError::SignatureMismatch {
            target: target.name.clone(),
            detail: format!(
                "{} arguments given, declared arity {}",
                arg_types.len(),
                target.params.len()
            ),
        });
    }
    for (index, (actual, param)) in arg_types.iter().zip(&target.params).enumerate() {
        if !actual.assignable_to(param.ty) {
            return Err(CompileError::SignatureMismatch {
                target: target.name.clone(),
                detail: format!("argument {index} is {actual}, expected {}", param.ty),
            });
        }
    }
    Ok(())
}
