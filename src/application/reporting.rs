use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BalanceSheet, Expense, Settlement};

/// Everything the summary view shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub participant_count: usize,
    pub expense_count: usize,
    pub total_spent: Amount,
    pub balances: BalanceSheet,
    pub settlements: Vec<Settlement>,
}

/// Full view of the trip, used by the JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripReport {
    pub version: String,
    pub expenses: Vec<Expense>,
    #[serde(flatten)]
    pub summary: Summary,
}
