use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use clap::error::ErrorKind;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use uuid::Uuid;

use crate::application::Ledger;
use crate::domain::{
    Expense, ExpenseId, ExpenseInput, SHORT_ID_LEN, bar_ratio, format_money, parse_amount,
};
use crate::io::Exporter;

use super::{ExpenseCommands, PersonCommands, ShellCommand, ShellLine, split_line};

const BAR_WIDTH: usize = 20;

/// Whether the shell should keep reading lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end for a ledger. Everything it prints goes to `out`.
pub struct Shell<W: Write> {
    ledger: Ledger,
    currency: String,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(ledger: Ledger, currency: impl Into<String>, out: W) -> Self {
        Self {
            ledger,
            currency: currency.into(),
            out,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands until end of input or `quit`. Failed commands are
    /// reported and the shell keeps going.
    pub fn run_interactive<R: BufRead>(&mut self, input: R) -> Result<()> {
        writeln!(
            self.out,
            "tripsplit {} - type 'help' for commands",
            env!("CARGO_PKG_VERSION")
        )?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                break;
            };
            let line = line.context("Failed to read input")?;

            match self.execute_line(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::debug!(line = %line, "command failed");
                    writeln!(self.out, "error: {:#}", e)?;
                }
            }
        }
        Ok(())
    }

    /// Run commands from a script. Stops at the first failing line.
    pub fn run_script<R: BufRead>(&mut self, input: R) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            let flow = self
                .execute_line(&line)
                .with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and run a single line.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let args = split_line(line)?;
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match ShellLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                        | ErrorKind::DisplayVersion
                ) =>
            {
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                let message = e.render().to_string();
                bail!("{}", message.trim_start_matches("error: ").trim_end())
            }
        };

        self.execute(parsed.command)
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Person(cmd) => self.run_person_command(cmd)?,
            ShellCommand::Expense(cmd) => self.run_expense_command(cmd)?,
            ShellCommand::Balances => self.print_balances()?,
            ShellCommand::Settle => self.print_settlements()?,
            ShellCommand::Summary { format } => self.print_summary(&format)?,
            ShellCommand::Export {
                export_type,
                output,
                format,
            } => {
                self.run_export_command(&export_type, output.as_deref(), format.as_deref())?
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn run_person_command(&mut self, cmd: PersonCommands) -> Result<()> {
        match cmd {
            PersonCommands::Add { names } => {
                for name in names {
                    if self.ledger.add_participant(&name) {
                        writeln!(self.out, "Added participant: {}", name.trim())?;
                    } else {
                        tracing::debug!(name = %name, "participant not added");
                    }
                }
            }

            PersonCommands::List => {
                let participants = self.ledger.participants();
                if participants.is_empty() {
                    writeln!(self.out, "No participants yet.")?;
                } else {
                    for (i, participant) in participants.iter().enumerate() {
                        writeln!(self.out, "{:>3}. {}", i + 1, participant)?;
                    }
                }
            }

            PersonCommands::Remove { name } => {
                if self.ledger.remove_participant(&name)? {
                    writeln!(self.out, "Removed participant: {}", name.trim())?;
                } else {
                    writeln!(self.out, "No participant named '{}'.", name.trim())?;
                }
            }
        }
        Ok(())
    }

    fn run_expense_command(&mut self, cmd: ExpenseCommands) -> Result<()> {
        match cmd {
            ExpenseCommands::Add {
                payer,
                item,
                amount,
                among,
            } => {
                let amount = parse_amount(&amount)
                    .context("Invalid amount format. Use '50.00' or '50'")?;
                let expense = self
                    .ledger
                    .add_expense(ExpenseInput::new(payer, item, amount, among))?;
                let line = describe_expense(&self.currency, expense);
                writeln!(self.out, "Recorded expense: {}", line)?;
            }

            ExpenseCommands::Edit {
                id,
                payer,
                item,
                amount,
                among,
            } => {
                let expense_id = resolve_expense(&self.ledger, &id)?
                    .ok_or_else(|| anyhow!("No expense matches '{}'", id))?;
                let current = self
                    .ledger
                    .expense(expense_id)
                    .ok_or_else(|| anyhow!("No expense matches '{}'", id))?;

                let amount = match amount {
                    Some(a) => {
                        parse_amount(&a).context("Invalid amount format. Use '50.00' or '50'")?
                    }
                    None => current.amount,
                };
                let input = ExpenseInput {
                    payer: payer.unwrap_or_else(|| current.payer.to_string()),
                    item: item.unwrap_or_else(|| current.item.clone()),
                    amount,
                    shared_among: among.unwrap_or_else(|| {
                        current.shared_among.iter().map(|p| p.to_string()).collect()
                    }),
                };

                match self.ledger.update_expense(expense_id, input)? {
                    Some(expense) => {
                        let line = describe_expense(&self.currency, expense);
                        writeln!(self.out, "Updated expense: {}", line)?;
                    }
                    None => writeln!(self.out, "No expense matches '{}'.", id)?,
                }
            }

            ExpenseCommands::Remove { id } => {
                let removed = resolve_expense(&self.ledger, &id)?
                    .and_then(|expense_id| self.ledger.remove_expense(expense_id));
                match removed {
                    Some(expense) => {
                        let line = describe_expense(&self.currency, &expense);
                        writeln!(self.out, "Removed expense: {}", line)?;
                    }
                    None => writeln!(self.out, "No expense matches '{}'.", id)?,
                }
            }

            ExpenseCommands::List => self.print_expenses()?,
        }
        Ok(())
    }

    fn print_expenses(&mut self) -> Result<()> {
        let expenses = self.ledger.expenses();
        if expenses.is_empty() {
            writeln!(self.out, "No expenses recorded.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:<4} {:<8} {:<15} {:<20} {:>12}  SHARED AMONG",
            "#", "ID", "PAYER", "ITEM", "AMOUNT"
        )?;
        writeln!(self.out, "{}", "-".repeat(78))?;
        for expense in expenses {
            let shared: Vec<&str> = expense.shared_among.iter().map(|p| p.as_str()).collect();
            writeln!(
                self.out,
                "{:<4} {:<8} {:<15} {:<20} {:>12}  {}",
                expense.sequence,
                expense.short_id(),
                truncate(expense.payer.as_str(), 15),
                truncate(&expense.item, 20),
                format_money(&self.currency, expense.amount),
                shared.join(", ")
            )?;
        }
        writeln!(self.out, "{}", "-".repeat(78))?;
        writeln!(
            self.out,
            "{:<50} {:>12}",
            "TOTAL",
            format_money(&self.currency, self.ledger.total_spent())
        )?;
        Ok(())
    }

    fn print_balances(&mut self) -> Result<()> {
        let balances = self.ledger.balances();
        if balances.is_empty() {
            writeln!(self.out, "No participants yet.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:<15} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "NAME", "PAID", "COMMON", "EXCLUSIVE", "TOTAL SHARE", "NET"
        )?;
        writeln!(self.out, "{}", "-".repeat(80))?;
        for entry in balances.iter() {
            let b = &entry.balance;
            writeln!(
                self.out,
                "{:<15} {:>12} {:>12} {:>12} {:>12} {:>12}",
                truncate(entry.participant.as_str(), 15),
                format_money(&self.currency, b.paid),
                format_money(&self.currency, b.common_share),
                format_money(&self.currency, b.exclusive_share),
                format_money(&self.currency, b.total_share),
                format_money(&self.currency, b.net_amount),
            )?;
        }
        Ok(())
    }

    fn print_settlements(&mut self) -> Result<()> {
        let settlements = self.ledger.settlements();
        if settlements.is_empty() {
            writeln!(self.out, "All settled up, nobody owes anything.")?;
            return Ok(());
        }

        for settlement in &settlements {
            writeln!(
                self.out,
                "{} pays {} {}",
                settlement.from,
                settlement.to,
                format_money(&self.currency, settlement.amount)
            )?;
        }
        Ok(())
    }

    fn print_summary(&mut self, format: &str) -> Result<()> {
        let summary = self.ledger.summary();

        match format {
            "json" => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(&summary)?)?;
            }
            "table" => {
                writeln!(self.out, "Trip Summary")?;
                writeln!(
                    self.out,
                    "{} participants, {} expenses, {} spent",
                    summary.participant_count,
                    summary.expense_count,
                    format_money(&self.currency, summary.total_spent)
                )?;
                writeln!(self.out)?;

                let max = summary.balances.max_abs_net();
                for entry in summary.balances.iter() {
                    let net = entry.balance.net_amount;
                    let filled = (bar_ratio(net, max) * BAR_WIDTH as f64).round() as usize;
                    let mark = if net >= 0.0 { '+' } else { '-' };
                    writeln!(
                        self.out,
                        "{:<15} {:>12}  {}",
                        truncate(entry.participant.as_str(), 15),
                        format_money(&self.currency, net),
                        mark.to_string().repeat(filled)
                    )?;
                }

                writeln!(self.out)?;
                writeln!(self.out, "Settlements:")?;
                if summary.settlements.is_empty() {
                    writeln!(self.out, "  (none)")?;
                }
                for settlement in &summary.settlements {
                    writeln!(
                        self.out,
                        "  {} -> {}: {}",
                        settlement.from,
                        settlement.to,
                        format_money(&self.currency, settlement.amount)
                    )?;
                }
            }
            other => bail!("Unknown format '{}'. Use: table, json", other),
        }
        Ok(())
    }

    fn run_export_command(
        &mut self,
        export_type: &str,
        output: Option<&Path>,
        format: Option<&str>,
    ) -> Result<()> {
        let default_format = if export_type == "summary" { "json" } else { "csv" };
        let format = format.unwrap_or(default_format);

        match output {
            Some(path) => {
                let mut buffer = Vec::new();
                let count = export(&self.ledger, export_type, format, &mut buffer)?;
                fs::write(path, buffer)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                writeln!(
                    self.out,
                    "Exported {} {} to {}",
                    count,
                    export_type,
                    path.display()
                )?;
            }
            None => {
                export(&self.ledger, export_type, format, &mut self.out)?;
            }
        }
        Ok(())
    }
}

/// Write one export and return how many records it contained.
fn export<W: Write>(
    ledger: &Ledger,
    export_type: &str,
    format: &str,
    writer: W,
) -> Result<usize> {
    let exporter = Exporter::new(ledger);

    match (export_type, format) {
        ("expenses", "csv") => exporter.export_expenses_csv(writer),
        ("expenses", "json") => exporter.export_expenses_json(writer),
        ("balances", "csv") => exporter.export_balances_csv(writer),
        ("balances", "json") => exporter.export_balances_json(writer),
        ("settlements", "csv") => exporter.export_settlements_csv(writer),
        ("settlements", "json") => exporter.export_settlements_json(writer),
        ("summary", "json") => {
            let report = exporter.export_summary_json(writer)?;
            Ok(report.summary.expense_count)
        }
        ("expenses" | "balances" | "settlements", other) => {
            bail!("Unknown format '{}'. Use: csv, json", other)
        }
        ("summary", _) => bail!("Summary can only be exported as json"),
        (other, _) => bail!(
            "Unknown export type '{}'. Use: expenses, balances, settlements, summary",
            other
        ),
    }
}

/// Find the expense a user refers to.
///
/// Accepts a sequence number (`3` or `#3`), a full UUID, or an id prefix.
/// Bare digits as long as a listed short id are read as an id prefix, so an
/// all-digit id from `expense list` still finds its record.
/// Returns `Ok(None)` when nothing matches and an error when a prefix is
/// ambiguous.
pub fn resolve_expense(ledger: &Ledger, handle: &str) -> Result<Option<ExpenseId>> {
    let handle = handle.trim();

    let sequence = match handle.strip_prefix('#') {
        Some(number) => Some(
            number
                .parse::<u64>()
                .with_context(|| format!("Invalid expense number '{}'", handle))?,
        ),
        None if handle.len() < SHORT_ID_LEN => handle.parse::<u64>().ok(),
        None => None,
    };
    if let Some(sequence) = sequence {
        return Ok(ledger.expense_by_sequence(sequence).map(|e| e.id));
    }

    if let Ok(id) = Uuid::parse_str(handle) {
        return Ok(ledger.expense(id).map(|e| e.id));
    }

    let matches = ledger.expenses_with_id_prefix(handle);
    match matches.as_slice() {
        [] => Ok(None),
        [expense] => Ok(Some(expense.id)),
        _ => bail!(
            "Expense id '{}' is ambiguous ({} matches)",
            handle,
            matches.len()
        ),
    }
}

fn describe_expense(currency: &str, expense: &Expense) -> String {
    let shared: Vec<&str> = expense.shared_among.iter().map(|p| p.as_str()).collect();
    format!(
        "#{} {} paid {} for {} (shared among {})",
        expense.sequence,
        expense.payer,
        format_money(currency, expense.amount),
        expense.item,
        shared.join(", ")
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
