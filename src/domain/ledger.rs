use serde::{Deserialize, Serialize};

use super::{Amount, Expense, Participant};

/// Derived balance of a single participant. Never stored, always recomputed
/// from the expense list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Sum of amounts this participant paid
    pub paid: Amount,
    /// Equal-split portions of expenses shared by more than one person
    pub common_share: Amount,
    /// Full amounts of expenses shared by this participant alone
    pub exclusive_share: Amount,
    pub total_share: Amount,
    /// paid - total_share. Positive = is owed money, negative = owes money
    pub net_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant: Participant,
    #[serde(flatten)]
    pub balance: BalanceEntry,
}

/// Balances of every participant, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    entries: Vec<ParticipantBalance>,
}

impl BalanceSheet {
    pub fn get(&self, name: &str) -> Option<&BalanceEntry> {
        self.entries
            .iter()
            .find(|e| e.participant == name)
            .map(|e| &e.balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of net amounts. Zero (within float error) for any expense set.
    pub fn total_net(&self) -> Amount {
        self.entries.iter().map(|e| e.balance.net_amount).sum()
    }

    /// Sum of positive net amounts, i.e. what settlements must move
    pub fn total_owed(&self) -> Amount {
        self.entries
            .iter()
            .map(|e| e.balance.net_amount.max(0.0))
            .sum()
    }

    /// Largest absolute net amount, 0 for an empty or fully balanced sheet
    pub fn max_abs_net(&self) -> Amount {
        self.entries
            .iter()
            .map(|e| e.balance.net_amount.abs())
            .fold(0.0, Amount::max)
    }
}

/// Compute the balance of every participant from a list of expenses.
///
/// Participants without any activity still get an all-zero entry. Names in an
/// expense that are not on the roster are skipped.
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> BalanceSheet {
    let mut entries: Vec<ParticipantBalance> = participants
        .iter()
        .map(|p| ParticipantBalance {
            participant: p.clone(),
            balance: BalanceEntry::default(),
        })
        .collect();

    for expense in expenses {
        match position(&entries, &expense.payer) {
            Some(i) => entries[i].balance.paid += expense.amount,
            None => tracing::warn!(
                payer = %expense.payer,
                item = %expense.item,
                "payer is not a participant, ignoring payment"
            ),
        }

        let exclusive = expense.is_exclusive();
        let portion = if exclusive {
            expense.amount
        } else {
            expense.share_per_person()
        };

        for sharer in &expense.shared_among {
            let Some(i) = position(&entries, sharer) else {
                tracing::warn!(
                    sharer = %sharer,
                    item = %expense.item,
                    "sharer is not a participant, ignoring share"
                );
                continue;
            };
            let balance = &mut entries[i].balance;
            if exclusive {
                balance.exclusive_share += portion;
            } else {
                balance.common_share += portion;
            }
        }
    }

    for entry in &mut entries {
        let b = &mut entry.balance;
        b.total_share = b.common_share + b.exclusive_share;
        b.net_amount = b.paid - b.total_share;
    }

    BalanceSheet { entries }
}

fn position(entries: &[ParticipantBalance], name: &Participant) -> Option<usize> {
    entries.iter().position(|e| e.participant == *name)
}

/// Width of a participant's bar relative to the largest balance, in [0, 1].
/// Returns 0 when every balance is zero instead of dividing by zero.
pub fn bar_ratio(net_amount: Amount, max_abs_net: Amount) -> f64 {
    if max_abs_net <= 0.0 {
        return 0.0;
    }
    (net_amount.abs() / max_abs_net).min(1.0)
}
