use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, Participant};

/// Length of the id prefix shown in listings
pub const SHORT_ID_LEN: usize = 8;

pub type ExpenseId = Uuid;

/// Fields supplied when recording or editing an expense.
/// Validation happens in the ledger, which knows the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub payer: String,
    pub item: String,
    pub amount: Amount,
    pub shared_among: Vec<String>,
}

impl ExpenseInput {
    pub fn new(
        payer: impl Into<String>,
        item: impl Into<String>,
        amount: Amount,
        shared_among: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            payer: payer.into(),
            item: item.into(),
            amount,
            shared_among: shared_among.into_iter().map(Into::into).collect(),
        }
    }
}

/// A shared expense: one payer, split among one or more participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Monotonically increasing number, used as a short handle. Never reused.
    pub sequence: u64,
    pub payer: Participant,
    /// Free-form label, carries no meaning for the split
    pub item: String,
    /// Always positive and finite
    pub amount: Amount,
    /// Non-empty, without duplicates, in the order given. May omit the payer.
    pub shared_among: Vec<Participant>,
}

impl Expense {
    /// Create a new expense. Sequence number must be assigned by the ledger.
    pub fn new(
        payer: Participant,
        item: impl Into<String>,
        amount: Amount,
        shared_among: Vec<Participant>,
    ) -> Self {
        assert!(
            amount > 0.0 && amount.is_finite(),
            "Expense amount must be positive"
        );
        assert!(
            !shared_among.is_empty(),
            "Expense must be shared among at least one participant"
        );
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by the ledger
            payer,
            item: item.into(),
            amount,
            shared_among,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// True when a single participant bears the whole amount
    pub fn is_exclusive(&self) -> bool {
        self.shared_among.len() == 1
    }

    /// Equal portion owed by each sharer. No remainder redistribution.
    pub fn share_per_person(&self) -> Amount {
        self.amount / self.shared_among.len() as Amount
    }

    /// True if the participant paid for or shares in this expense
    pub fn involves(&self, name: &str) -> bool {
        self.payer == name || self.shared_among.iter().any(|p| p == name)
    }

    /// First characters of the id, enough to tell records apart on screen
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..SHORT_ID_LEN].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Participant> {
        list.iter().map(|n| Participant::from(*n)).collect()
    }

    #[test]
    fn test_create_expense() {
        let expense = Expense::new("A".into(), "lunch", 30.0, names(&["A", "B", "C"]))
            .with_sequence(4);

        assert_eq!(expense.sequence, 4);
        assert_eq!(expense.payer, "A");
        assert_eq!(expense.item, "lunch");
        assert!(!expense.is_exclusive());
        assert!((expense.share_per_person() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sharer_is_exclusive() {
        let expense = Expense::new("A".into(), "gift", 50.0, names(&["B"]));
        assert!(expense.is_exclusive());
    }

    #[test]
    fn test_involves_payer_and_sharers() {
        let expense = Expense::new("A".into(), "taxi", 12.0, names(&["B", "C"]));
        assert!(expense.involves("A"));
        assert!(expense.involves("C"));
        assert!(!expense.involves("D"));
    }

    #[test]
    fn test_short_id_is_prefix_of_id() {
        let expense = Expense::new("A".into(), "taxi", 12.0, names(&["A"]));
        assert_eq!(expense.short_id().len(), SHORT_ID_LEN);
        assert!(expense.id.simple().to_string().starts_with(&expense.short_id()));
    }

    #[test]
    #[should_panic(expected = "Expense amount must be positive")]
    fn test_expense_requires_positive_amount() {
        Expense::new("A".into(), "nothing", 0.0, names(&["A"]));
    }

    #[test]
    #[should_panic(expected = "Expense must be shared among at least one participant")]
    fn test_expense_requires_sharers() {
        Expense::new("A".into(), "nothing", 1.0, Vec::new());
    }
}
