//! CC-Admin: run one record invocation against a JSON-file ledger.
//!
//! The caller identity and organization are taken from the command line, so
//! this tool is for local administration and testing, not for untrusted
//! callers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cc_records::{
    lookup, Dispatcher, FileLedger, OperationKind, RecordKey, RecordResult, RecordWorkflowApi,
    Response, WorkflowConfig,
};
use cc_telemetry::InvocationTimer;
use tracing::info;

/// One invocation request.
#[derive(Debug, Clone)]
pub struct AdminRequest {
    /// Caller identity.
    pub identity: String,
    /// Caller organization.
    pub org: String,
    /// Ledger file; created on the first successful write.
    pub ledger: PathBuf,
    /// Optional workflow config file. Falls back to `CC_*` variables.
    pub config: Option<PathBuf>,
    /// Function name.
    pub function: String,
    /// Positional arguments.
    pub args: Vec<String>,
}

/// Run `request`.
///
/// The outer `Result` covers setup and persistence of the ledger file; the
/// inner one is the outcome of the invocation itself. The ledger is written
/// back only after a successful create or validate.
pub fn run(request: &AdminRequest) -> Result<RecordResult<Response>> {
    let config = match &request.config {
        Some(path) => WorkflowConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WorkflowConfig::from_env().context("reading CC_* environment")?,
    };
    let ledger = FileLedger::open(&request.ledger)
        .with_context(|| format!("opening ledger {}", request.ledger.display()))?;
    let dispatcher = Dispatcher::new(config);

    let timer = InvocationTimer::start(request.function.as_str());
    let result = dispatcher.invoke(
        &ledger.stub(request.identity.as_str(), request.org.as_str()),
        &request.function,
        &request.args,
    );
    timer.finish(match &result {
        Ok(_) => "ok",
        Err(e) => e.kind().as_str(),
    });

    let wrote = lookup(&request.function).is_some_and(|spec| spec.operation.is_write());
    if result.is_ok() && wrote {
        ledger
            .flush()
            .with_context(|| format!("writing ledger {}", request.ledger.display()))?;
        info!(path = %request.ledger.display(), entries = ledger.len(), "Ledger saved");
    }
    Ok(result)
}

/// Terminal form of a successful response to `function`.
///
/// Creates return the raw storage key, which contains separator bytes; it is
/// shown in its `Display` form instead.
pub fn render(function: &str, response: &Response) -> String {
    let payload = String::from_utf8_lossy(&response.payload);
    match lookup(function).map(|spec| spec.operation) {
        Some(OperationKind::Create) => RecordKey::from_raw(payload).to_string(),
        _ => payload.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_records::{ErrorKind, StudentRecord};
    use tempfile::tempdir;

    fn request(ledger: &std::path::Path, identity: &str, org: &str, call: &[&str]) -> AdminRequest {
        AdminRequest {
            identity: identity.to_string(),
            org: org.to_string(),
            ledger: ledger.to_path_buf(),
            config: None,
            function: call[0].to_string(),
            args: call[1..].iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_state_survives_between_runs() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");

        run(&request(&ledger, "U1", "Org2MSP", &["addStudent", "MIT", "CS", "1", "Alice"]))
            .unwrap()
            .unwrap();
        run(&request(&ledger, "V", "Org1MSP", &["validateStudent", "MIT", "1", "Approved"]))
            .unwrap()
            .unwrap();
        let response = run(&request(&ledger, "U2", "Org2MSP", &["queryStudent", "MIT", "1"]))
            .unwrap()
            .unwrap();

        let record: StudentRecord = serde_json::from_slice(&response.payload).unwrap();
        assert_eq!(record.owner.as_str(), "U1");
    }

    #[test]
    fn test_render_create_key_without_separators() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");

        let call = ["addStudent", "MIT", "CS", "1", "Alice"];
        let response = run(&request(&ledger, "U1", "Org2MSP", &call)).unwrap().unwrap();
        let shown = render("addStudent", &response);
        assert_eq!(shown, "student/3:MIT/1:1");
        assert!(!shown.contains('\0'));
    }

    #[test]
    fn test_failed_invocation_does_not_create_file() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");

        let call = ["validateStudent", "MIT", "1", "Approved"];
        let err = run(&request(&ledger, "U1", "Org2MSP", &call)).unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
        assert!(!ledger.exists());
    }

    #[test]
    fn test_config_file() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        let config = dir.path().join("workflow.json");
        std::fs::write(&config, r#"{"validator_org":"RegistrarMSP"}"#).unwrap();

        run(&request(&ledger, "U1", "Org2MSP", &["addStudent", "MIT", "CS", "1", "Alice"]))
            .unwrap()
            .unwrap();
        let call = ["validateStudent", "MIT", "1", "Approved"];
        let mut validate = request(&ledger, "R", "RegistrarMSP", &call);
        validate.config = Some(config);
        assert!(run(&validate).unwrap().is_ok());
    }

    #[test]
    fn test_missing_config_file_is_setup_error() {
        let dir = tempdir().unwrap();
        let mut req = request(&dir.path().join("l.json"), "U1", "Org2MSP", &["queryPrize", "P"]);
        req.config = Some(dir.path().join("missing.json"));
        assert!(run(&req).is_err());
    }
}
