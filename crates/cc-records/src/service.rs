//! Record service: capability check followed by the lifecycle handler.

use crate::config::WorkflowConfig;
use crate::dispatch::Command;
use crate::domain::{
    GradeRecord, LedgerRecord, PrizeRecord, RecordKind, RecordResult, StudentRecord,
};
use crate::lifecycle::LifecycleManager;
use crate::ports::{LedgerAccessor, Response};
use crate::roles::RoleResolver;
use tracing::debug;

/// Executes parsed commands.
///
/// Every command passes through [`RoleResolver::resolve`] with the capability
/// returned by [`Command::required_capability`] before any handler runs, so
/// no handler checks permissions itself.
#[derive(Clone, Debug)]
pub struct RecordService {
    config: WorkflowConfig,
    roles: RoleResolver,
}

impl RecordService {
    /// Service applying `config`.
    pub fn new(config: WorkflowConfig) -> Self {
        let roles = RoleResolver::new(config.validator_org.clone());
        Self { config, roles }
    }

    /// Check the command's capability, then run it.
    pub fn execute(&self, ledger: &dyn LedgerAccessor, command: Command) -> RecordResult<Response> {
        let capability = command.required_capability();
        self.roles.resolve(&capability, ledger)?;
        debug!(function = command.name(), capability = %capability, "Capability granted");

        let manager = LifecycleManager::new(&self.config);
        let caller = ledger.caller_identity().clone();
        match command {
            Command::AddStudent(new) => {
                self.create(&manager, ledger, StudentRecord::pending(new, caller))
            }
            Command::AddGrade(new) => {
                self.create(&manager, ledger, GradeRecord::pending(new, caller))
            }
            Command::AddPrize(new) => {
                self.create(&manager, ledger, PrizeRecord::pending(new, caller))
            }
            Command::ValidateStudent(change) => Response::json(&manager.validate::<StudentRecord>(
                ledger,
                change.locator.key(),
                change.target,
            )?),
            Command::ValidateGrade(change) => Response::json(&manager.validate::<GradeRecord>(
                ledger,
                change.locator.key(),
                change.target,
            )?),
            Command::ValidatePrize(change) => Response::json(&manager.validate::<PrizeRecord>(
                ledger,
                change.locator.key(),
                change.target,
            )?),
            Command::QueryStudent(locator) => {
                Response::json(&manager.query::<StudentRecord>(ledger, locator.key())?)
            }
            Command::QueryGrade(locator) => {
                Response::json(&manager.query::<GradeRecord>(ledger, locator.key())?)
            }
            Command::QueryPrize(locator) => {
                Response::json(&manager.query::<PrizeRecord>(ledger, locator.key())?)
            }
            Command::ListPending(kind) => self.list_pending(&manager, ledger, kind),
        }
    }

    fn create<R: LedgerRecord>(
        &self,
        manager: &LifecycleManager<'_>,
        ledger: &dyn LedgerAccessor,
        record: R,
    ) -> RecordResult<Response> {
        let key = manager.create(ledger, record)?;
        Ok(Response::key(&key))
    }

    fn list_pending(
        &self,
        manager: &LifecycleManager<'_>,
        ledger: &dyn LedgerAccessor,
        kind: RecordKind,
    ) -> RecordResult<Response> {
        match kind {
            RecordKind::Student => Response::json(&manager.list_pending::<StudentRecord>(ledger)?),
            RecordKind::Grade => Response::json(&manager.list_pending::<GradeRecord>(ledger)?),
            RecordKind::Prize => Response::json(&manager.list_pending::<PrizeRecord>(ledger)?),
        }
    }
}

impl Default for RecordService {
    fn default() -> Self {
        Self::new(WorkflowConfig::default())
    }
}
