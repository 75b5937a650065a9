use crate::domain::{
    Amount, BalanceSheet, Expense, ExpenseId, ExpenseInput, Participant, Settlement,
    compute_balances, compute_settlements,
};

use super::{Summary, ValidationError};

/// The trip ledger: participant roster plus expense list.
/// This is the primary interface for any client (shell, tests, exports).
///
/// Balances and settlements are derived on every call and never cached.
#[derive(Debug)]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    next_sequence: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            expenses: Vec::new(),
            next_sequence: 1,
        }
    }

    // ========================
    // Participant operations
    // ========================

    /// Add a participant. Blank and duplicate names are silently ignored.
    /// Returns true if the roster changed.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let Some(participant) = Participant::parse(name) else {
            tracing::debug!("ignoring blank participant name");
            return false;
        };

        if self.participants.contains(&participant) {
            tracing::debug!(name = %participant, "participant already present");
            return false;
        }

        tracing::debug!(name = %participant, "added participant");
        self.participants.push(participant);
        true
    }

    /// Remove a participant that no expense refers to.
    /// Unknown names are ignored. Returns true if the roster changed.
    pub fn remove_participant(&mut self, name: &str) -> Result<bool, ValidationError> {
        let name = name.trim();
        let Some(index) = self.participants.iter().position(|p| p == name) else {
            return Ok(false);
        };

        if self.expenses.iter().any(|e| e.involves(name)) {
            return Err(ValidationError::ParticipantInUse(name.to_string()));
        }

        self.participants.remove(index);
        tracing::debug!(name, "removed participant");
        Ok(true)
    }

    /// Participants in the order they were added.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense at the end of the list.
    pub fn add_expense(&mut self, input: ExpenseInput) -> Result<&Expense, ValidationError> {
        let (payer, item, amount, shared_among) = self.validate(input)?;

        let expense =
            Expense::new(payer, item, amount, shared_among).with_sequence(self.next_sequence);
        self.next_sequence += 1;

        tracing::debug!(
            id = %expense.id,
            payer = %expense.payer,
            amount = expense.amount,
            sharers = expense.shared_among.len(),
            "added expense"
        );

        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Replace an expense in place, keeping its id, sequence and position.
    /// Returns `Ok(None)` if no expense has this id.
    pub fn update_expense(
        &mut self,
        id: ExpenseId,
        input: ExpenseInput,
    ) -> Result<Option<&Expense>, ValidationError> {
        let (payer, item, amount, shared_among) = self.validate(input)?;

        let Some(index) = self.expenses.iter().position(|e| e.id == id) else {
            tracing::debug!(%id, "no expense to update");
            return Ok(None);
        };

        let existing = &mut self.expenses[index];
        existing.payer = payer;
        existing.item = item;
        existing.amount = amount;
        existing.shared_among = shared_among;

        tracing::debug!(%id, "updated expense");
        Ok(Some(&self.expenses[index]))
    }

    /// Remove an expense. Unknown ids are ignored.
    pub fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        let removed = self.expenses.remove(index);
        tracing::debug!(%id, item = %removed.item, "removed expense");
        Some(removed)
    }

    /// Expenses in the order they were recorded.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expense_by_sequence(&self, sequence: u64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.sequence == sequence)
    }

    /// Expenses whose id (hex, without dashes) starts with the prefix.
    pub fn expenses_with_id_prefix(&self, prefix: &str) -> Vec<&Expense> {
        let prefix = prefix.to_lowercase().replace('-', "");
        if prefix.is_empty() {
            return Vec::new();
        }
        self.expenses
            .iter()
            .filter(|e| e.id.simple().to_string().starts_with(&prefix))
            .collect()
    }

    pub fn total_spent(&self) -> Amount {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    // ========================
    // Derived views
    // ========================

    pub fn balances(&self) -> BalanceSheet {
        compute_balances(&self.participants, &self.expenses)
    }

    pub fn settlements(&self) -> Vec<Settlement> {
        compute_settlements(&self.balances())
    }

    pub fn summary(&self) -> Summary {
        let balances = self.balances();
        let settlements = compute_settlements(&balances);
        Summary {
            participant_count: self.participants.len(),
            expense_count: self.expenses.len(),
            total_spent: self.total_spent(),
            balances,
            settlements,
        }
    }

    fn validate(
        &self,
        input: ExpenseInput,
    ) -> Result<(Participant, String, Amount, Vec<Participant>), ValidationError> {
        let payer = Participant::parse(&input.payer).ok_or(ValidationError::EmptyPayer)?;

        let item = input.item.trim();
        if item.is_empty() {
            return Err(ValidationError::EmptyItem);
        }

        if !(input.amount.is_finite() && input.amount > 0.0) {
            return Err(ValidationError::InvalidAmount(input.amount));
        }

        let mut shared_among: Vec<Participant> = Vec::new();
        for name in &input.shared_among {
            if let Some(sharer) = Participant::parse(name) {
                if !shared_among.contains(&sharer) {
                    shared_among.push(sharer);
                }
            }
        }
        if shared_among.is_empty() {
            return Err(ValidationError::NoSharers);
        }

        for participant in std::iter::once(&payer).chain(shared_among.iter()) {
            if !self.has_participant(participant.as_str()) {
                return Err(ValidationError::UnknownParticipant(
                    participant.to_string(),
                ));
            }
        }

        Ok((payer, item.to_string(), input.amount, shared_among))
    }
}
