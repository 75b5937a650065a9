// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tripsplit::application::Ledger;
use tripsplit::cli::Shell;
use tripsplit::domain::{Amount, ExpenseId, ExpenseInput};

/// Ledger with the given participants already on the roster
pub fn ledger_with(names: &[&str]) -> Ledger {
    let mut ledger = Ledger::new();
    for name in names {
        ledger.add_participant(name);
    }
    ledger
}

/// Record an expense that is known to be valid and return its id
pub fn record(
    ledger: &mut Ledger,
    payer: &str,
    item: &str,
    amount: Amount,
    among: &[&str],
) -> ExpenseId {
    ledger
        .add_expense(ExpenseInput::new(payer, item, amount, among.iter().copied()))
        .unwrap()
        .id
}

pub fn assert_close(actual: Amount, expected: Amount) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Shell writing into memory, with "$" as currency to keep assertions short
pub fn test_shell() -> Shell<Vec<u8>> {
    Shell::new(Ledger::new(), "$", Vec::new())
}

/// Run each line and return everything printed
pub fn run_lines(shell: &mut Shell<Vec<u8>>, lines: &[&str]) -> String {
    for line in lines {
        shell
            .execute_line(line)
            .unwrap_or_else(|e| panic!("line '{line}' failed: {e:#}"));
    }
    output(shell)
}

pub fn output(shell: &Shell<Vec<u8>>) -> String {
    String::from_utf8(shell.output().clone()).unwrap()
}

/// Build a random but valid trip: `people` participants and `count` expenses.
/// The same seed always builds the same trip.
pub fn random_trip(seed: u64, people: usize, count: usize) -> Ledger {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..people).map(|i| format!("P{i}")).collect();
    let mut ledger = Ledger::new();
    for name in &names {
        ledger.add_participant(name);
    }

    for n in 0..count {
        let payer = &names[rng.random_range(0..people)];
        let amount = rng.random_range(1..=50_000u32) as Amount / 100.0;
        let mut among: Vec<&str> = names
            .iter()
            .filter(|_| rng.random_bool(0.5))
            .map(String::as_str)
            .collect();
        if among.is_empty() {
            among.push(&names[rng.random_range(0..people)]);
        }
        ledger
            .add_expense(ExpenseInput::new(payer.as_str(), format!("item {n}"), amount, among))
            .unwrap();
    }
    ledger
}
