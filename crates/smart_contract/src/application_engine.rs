//! Runs a module in the VM and services its `CALLT` instructions.

use std::sync::Arc;

use neo_vm::{CallFlags, ExecutionEngine, InteropHost, StackItem, VMState, VmError, VmResult};
use tracing::{debug, trace, warn};

use crate::{
    CallContext, ContractError, ContractProvider, ContractResult, FaultKind,
    InvocationMarshaller, NefError, NefFile, ResolverOptions, TokenResolver,
};

/// Lifecycle of one `CALLT`.
///
/// `Pending -> Resolving -> {Resolved -> Invoking -> {Returned, Faulted}} | RejectedAtResolution`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    Pending,
    Resolving,
    Resolved,
    Invoking,
    Returned,
    Faulted,
    RejectedAtResolution,
}

impl CallState {
    pub fn name(self) -> &'static str {
        match self {
            CallState::Pending => "Pending",
            CallState::Resolving => "Resolving",
            CallState::Resolved => "Resolved",
            CallState::Invoking => "Invoking",
            CallState::Returned => "Returned",
            CallState::Faulted => "Faulted",
            CallState::RejectedAtResolution => "RejectedAtResolution",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CallState::Returned | CallState::Faulted | CallState::RejectedAtResolution
        )
    }

    /// Moves to `next`, refusing edges the lifecycle does not have.
    pub fn advance(self, next: CallState) -> ContractResult<CallState> {
        use CallState::*;
        let allowed = matches!(
            (self, next),
            (Pending, Resolving)
                | (Resolving, Resolved)
                | (Resolving, RejectedAtResolution)
                | (Resolved, Invoking)
                | (Invoking, Returned)
                | (Invoking, Faulted)
        );
        if !allowed {
            return Err(ContractError::IllegalTransition {
                from: self.name(),
                to: next.name(),
            });
        }
        Ok(next)
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to one `CALLT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub token: u16,
    pub state: CallState,
    pub fault: Option<FaultKind>,
}

/// Result of running a module entry point.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub state: VMState,
    pub stack: Vec<StackItem>,
    pub error: Option<ContractError>,
    pub gas_consumed: i64,
    pub calls: Vec<CallRecord>,
}

impl ExecutionOutcome {
    pub fn is_halt(&self) -> bool {
        self.state.is_halt()
    }

    pub fn fault_kind(&self) -> Option<FaultKind> {
        self.error.as_ref().map(ContractError::kind)
    }
}

/// Flags the executing context needs before any `CALLT` is considered.
const CALLT_REQUIRED: CallFlags = CallFlags::READ_STATES.union(CallFlags::ALLOW_CALL);

/// Host for one module execution.
///
/// Owns the call context; every `CALLT` goes through resolution and then the
/// marshaller, and leaves a [`CallRecord`].
pub struct ApplicationEngine {
    module: Arc<NefFile>,
    resolver: TokenResolver,
    marshaller: InvocationMarshaller,
    context: CallContext,
    calls: Vec<CallRecord>,
    last_error: Option<ContractError>,
}

impl ApplicationEngine {
    /// Loads `module`, refusing one whose checksum does not match.
    pub fn new(
        module: Arc<NefFile>,
        provider: Arc<dyn ContractProvider>,
        context: CallContext,
    ) -> ContractResult<Self> {
        Self::with_options(module, provider, context, ResolverOptions::default())
    }

    pub fn with_options(
        module: Arc<NefFile>,
        provider: Arc<dyn ContractProvider>,
        context: CallContext,
        options: ResolverOptions,
    ) -> ContractResult<Self> {
        let computed = module.compute_checksum();
        if computed != module.checksum {
            return Err(NefError::ChecksumMismatch {
                stored: module.checksum,
                computed,
            }
            .into());
        }
        Ok(Self {
            module,
            resolver: TokenResolver::with_options(provider, options),
            marshaller: InvocationMarshaller::new(),
            context,
            calls: Vec::new(),
            last_error: None,
        })
    }

    pub fn module(&self) -> &NefFile {
        &self.module
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Runs the script from `offset` with `args`, first argument ending on top.
    pub fn execute(&mut self, offset: usize, args: Vec<StackItem>) -> ExecutionOutcome {
        self.calls.clear();
        self.last_error = None;
        // Bindings never outlive the execution that resolved them.
        self.context.cache_mut().clear();

        let mut vm = ExecutionEngine::new();
        let loaded = vm
            .load_script_at(self.module.script.clone(), offset)
            .and_then(|()| args.into_iter().rev().try_for_each(|arg| vm.push(arg)));
        let state = match loaded {
            Ok(()) => vm.execute(self),
            Err(err) => {
                self.last_error = Some(ContractError::Vm(err));
                VMState::FAULT
            }
        };

        let error = if state.is_fault() {
            self.last_error
                .take()
                .or_else(|| vm.fault().cloned().map(ContractError::Vm))
        } else {
            None
        };
        if let Some(err) = &error {
            debug!(target: "neo::vm", kind = %err.kind(), error = %err, "execution faulted");
        }

        ExecutionOutcome {
            state,
            stack: vm.result_stack().items().to_vec(),
            error,
            gas_consumed: self.context.gas().consumed(),
            calls: self.calls.clone(),
        }
    }

    fn transition(&mut self, record: usize, next: CallState) -> ContractResult<()> {
        let entry = &mut self.calls[record];
        entry.state = entry.state.advance(next)?;
        trace!(target: "neo::vm", token = entry.token, state = %entry.state, "call state");
        Ok(())
    }

    fn service_callt(
        &mut self,
        engine: &mut ExecutionEngine,
        token: u16,
        record: usize,
    ) -> ContractResult<()> {
        self.transition(record, CallState::Resolving)?;
        let granted = self.context.granted();
        let resolved = if granted.contains(CALLT_REQUIRED) {
            self.resolver
                .resolve_in(&self.module, token, &mut self.context)
        } else {
            Err(ContractError::CallNotAllowed { granted })
        };
        let binding = match resolved {
            Ok(binding) => binding,
            Err(err) => {
                self.transition(record, CallState::RejectedAtResolution)?;
                return Err(err);
            }
        };

        self.transition(record, CallState::Resolved)?;
        self.transition(record, CallState::Invoking)?;
        match self.marshaller.invoke(engine, &binding, &mut self.context) {
            Ok(_) => self.transition(record, CallState::Returned),
            Err(err) => {
                self.transition(record, CallState::Faulted)?;
                Err(err)
            }
        }
    }
}

impl InteropHost for ApplicationEngine {
    fn on_callt(&mut self, engine: &mut ExecutionEngine, token: u16) -> VmResult<()> {
        let record = self.calls.len();
        self.calls.push(CallRecord {
            token,
            state: CallState::Pending,
            fault: None,
        });

        match self.service_callt(engine, token, record) {
            Ok(()) => Ok(()),
            Err(err) => {
                let kind = err.kind();
                self.calls[record].fault = Some(kind);
                warn!(target: "neo::vm", token, %kind, error = %err, "CALLT failed");
                let message = err.to_string();
                self.last_error = Some(err);
                Err(VmError::interop(message))
            }
        }
    }
}

impl std::fmt::Debug for ApplicationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationEngine")
            .field("tokens", &self.module.tokens.len())
            .field("context", &self.context)
            .field("calls", &self.calls.len())
            .finish()
    }
}
