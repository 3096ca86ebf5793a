//! Inbound port: the invocation API and its response type.

use crate::dispatch::Command;
use crate::domain::{RecordError, RecordKey, RecordResult};
use crate::ports::LedgerAccessor;
use serde::Serialize;

/// Successful invocation result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Opaque payload returned to the caller.
    pub payload: Vec<u8>,
}

impl Response {
    /// JSON-encode `value` as the payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> RecordResult<Self> {
        let payload =
            serde_json::to_vec(value).map_err(|e| RecordError::Serialization(e.to_string()))?;
        Ok(Self { payload })
    }

    /// The raw storage key as payload.
    pub fn key(key: &RecordKey) -> Self {
        Self {
            payload: key.as_str().as_bytes().to_vec(),
        }
    }
}

/// Invocation surface of the record workflow.
pub trait RecordWorkflowApi {
    /// Run an already parsed command.
    fn execute(&self, ledger: &dyn LedgerAccessor, command: Command) -> RecordResult<Response>;

    /// Look up `function`, check arity, parse `args` and run the command.
    fn invoke(
        &self,
        ledger: &dyn LedgerAccessor,
        function: &str,
        args: &[String],
    ) -> RecordResult<Response>;
}
