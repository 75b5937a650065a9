use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use crate::application::Ledger;

mod shell;
mod tokenize;

pub use shell::{Flow, Shell, resolve_expense};
pub use tokenize::{TokenizeError, split_line};

/// Tripsplit - shared expense calculator
#[derive(Parser)]
#[command(name = "tripsplit")]
#[command(about = "Split shared trip expenses and work out who pays whom")]
#[command(version)]
pub struct Cli {
    /// Currency symbol used when printing amounts
    #[arg(short, long, default_value = "₹")]
    pub currency: String,

    /// Read commands from a file instead of the terminal
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let stdout = io::stdout();
        let mut shell = Shell::new(Ledger::new(), self.currency, stdout.lock());

        match self.script {
            Some(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                shell.run_script(BufReader::new(file))
            }
            None => shell.run_interactive(io::stdin().lock()),
        }
    }
}

/// One line typed into the shell.
#[derive(Parser)]
#[command(name = "tripsplit", no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand)]
pub enum ShellCommand {
    /// Participant management commands
    #[command(subcommand)]
    Person(PersonCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show what everyone paid, owes and is owed
    Balances,

    /// Show who should pay whom to settle up
    Settle,

    /// Show totals, balances and the settlement plan together
    Summary {
        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, balances, settlements, summary
        export_type: String,

        /// Output file (printed here if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format: csv, json (default: csv, json for summary)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add one or more participants
    Add {
        /// Participant names (duplicates are ignored)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List participants in the order they were added
    List,

    /// Remove a participant who is not part of any expense
    Remove {
        /// Participant name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// Who paid
        #[arg(short, long)]
        payer: String,

        /// What was paid for
        #[arg(short, long)]
        item: String,

        /// Amount paid (e.g., "30" or "12.50")
        #[arg(short, long, allow_negative_numbers = true)]
        amount: String,

        /// Comma-separated participants sharing the cost
        #[arg(long, value_delimiter = ',', required = true)]
        among: Vec<String>,
    },

    /// Change an expense; omitted fields keep their value
    Edit {
        /// Expense number (e.g., "3" or "#3") or id prefix
        id: String,

        #[arg(short, long)]
        payer: Option<String>,

        #[arg(short, long)]
        item: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<String>,

        #[arg(long, value_delimiter = ',')]
        among: Option<Vec<String>>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Remove {
        /// Expense number (e.g., "3" or "#3") or id prefix
        id: String,
    },

    /// List all expenses
    List,
}
