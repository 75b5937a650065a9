use serde::{Deserialize, Serialize};

use super::{Amount, BalanceSheet, Participant, SETTLEMENT_EPSILON};

/// A proposed transfer from a net debtor to a net creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: Participant,
    pub to: Participant,
    /// Always at least `SETTLEMENT_EPSILON`
    pub amount: Amount,
}

struct Party<'a> {
    name: &'a Participant,
    remaining: Amount,
}

/// Greedy debt settlement.
///
/// Debtors and creditors are each sorted by amount, largest first, and the
/// largest debtor repeatedly pays the largest creditor as much as both allow.
/// The sort is stable, so equal amounts keep roster order and the plan is
/// deterministic.
///
/// This runs in O(n log n) and always clears every balance, but it is a
/// heuristic: it does not guarantee the fewest possible transfers, which
/// would require solving a subset-partition problem.
pub fn compute_settlements(balances: &BalanceSheet) -> Vec<Settlement> {
    let mut debtors: Vec<Party> = Vec::new();
    let mut creditors: Vec<Party> = Vec::new();

    for entry in balances.iter() {
        let net = entry.balance.net_amount;
        if net < 0.0 {
            debtors.push(Party {
                name: &entry.participant,
                remaining: net.abs(),
            });
        } else if net > 0.0 {
            creditors.push(Party {
                name: &entry.participant,
                remaining: net,
            });
        }
    }

    debtors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));

    let mut settlements = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];

        let transfer = debtor.remaining.min(creditor.remaining);
        if transfer >= SETTLEMENT_EPSILON {
            settlements.push(Settlement {
                from: debtor.name.clone(),
                to: creditor.name.clone(),
                amount: transfer,
            });
        }

        debtor.remaining -= transfer;
        creditor.remaining -= transfer;

        if debtor.remaining < SETTLEMENT_EPSILON {
            d += 1;
        }
        if creditor.remaining < SETTLEMENT_EPSILON {
            c += 1;
        }
    }

    tracing::debug!(count = settlements.len(), "computed settlement plan");
    settlements
}
