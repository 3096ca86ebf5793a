//! Named-invocation routing with per-call spans and dispatch counters.

use crate::config::WorkflowConfig;
use crate::dispatch::{lookup, Command};
use crate::domain::{ErrorKind, RecordError, RecordResult, ValidationError};
use crate::ports::{LedgerAccessor, RecordWorkflowApi, Response};
use crate::service::RecordService;
use parking_lot::RwLock;
use std::time::Instant;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

/// Counters kept by the dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Invocations received, including unknown names.
    pub invocations: u64,
    /// Invocations that returned `Ok`.
    pub succeeded: u64,
    /// Invocations refused for a missing capability.
    pub denied: u64,
    /// All other failures.
    pub failed: u64,
    /// Running mean of handler time in microseconds.
    pub avg_duration_us: u64,
}

/// Routes named invocations to the record service.
///
/// Order per invocation: name lookup, arity, argument parsing, then the
/// service (capability, handler). The first two steps never touch the
/// ledger.
#[derive(Debug)]
pub struct Dispatcher {
    service: RecordService,
    stats: RwLock<DispatchStats>,
}

impl Dispatcher {
    /// Dispatcher over a service configured with `config`.
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            service: RecordService::new(config),
            stats: RwLock::new(DispatchStats::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> DispatchStats {
        self.stats.read().clone()
    }

    fn parse(function: &str, args: &[String]) -> RecordResult<Command> {
        let Some(spec) = lookup(function) else {
            return Err(RecordError::InvalidFunction(function.to_string()));
        };
        if args.len() != spec.arity {
            return Err(ValidationError::Arity {
                function: function.to_string(),
                expected: spec.arity,
                got: args.len(),
            }
            .into());
        }
        Ok((spec.parse)(function, args)?)
    }

    fn record(&self, result: &RecordResult<Response>, elapsed_us: u64) {
        let mut stats = self.stats.write();
        stats.invocations += 1;
        match result {
            Ok(_) => stats.succeeded += 1,
            Err(e) if e.kind() == ErrorKind::Permission => stats.denied += 1,
            Err(_) => stats.failed += 1,
        }
        let total = stats.invocations;
        stats.avg_duration_us = (stats.avg_duration_us * (total - 1) + elapsed_us) / total;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(WorkflowConfig::default())
    }
}

impl RecordWorkflowApi for Dispatcher {
    fn execute(&self, ledger: &dyn LedgerAccessor, command: Command) -> RecordResult<Response> {
        self.service.execute(ledger, command)
    }

    fn invoke(
        &self,
        ledger: &dyn LedgerAccessor,
        function: &str,
        args: &[String],
    ) -> RecordResult<Response> {
        let correlation_id = Uuid::new_v4();
        let span = info_span!(
            "invoke",
            function,
            correlation_id = %correlation_id,
            caller = %ledger.caller_identity(),
            org = %ledger.caller_org()
        );
        let _guard = span.enter();

        let start = Instant::now();
        let result = Self::parse(function, args).and_then(|command| self.execute(ledger, command));
        self.record(&result, start.elapsed().as_micros() as u64);

        match &result {
            Ok(response) => debug!(payload_len = response.payload.len(), "Invocation completed"),
            Err(e) => warn!(kind = %e.kind(), error = %e, "Invocation failed"),
        }
        result
    }
}
