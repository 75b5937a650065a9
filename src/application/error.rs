use thiserror::Error;

use crate::domain::Amount;

/// Rejected ledger input. The only error the core ever reports; everything
/// else irregular (duplicate names, unknown ids) is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Payer is required")]
    EmptyPayer,

    #[error("Item is required")]
    EmptyItem,

    #[error("Invalid amount: {0} (must be a positive number)")]
    InvalidAmount(Amount),

    #[error("Expense must be shared among at least one participant")]
    NoSharers,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Participant {0} is referenced by existing expenses")]
    ParticipantInUse(String),
}
