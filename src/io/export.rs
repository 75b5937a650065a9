use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::application::{Ledger, TripReport};
use crate::domain::format_amount;

/// Exporter for writing ledger data and derived reports to various formats.
/// Output is a report for people to read or post-process; it is never loaded
/// back.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export expenses to CSV format
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "sequence", "payer", "item", "amount", "shared_among"])?;

        let mut count = 0;
        for expense in self.ledger.expenses() {
            let shared_among: Vec<&str> =
                expense.shared_among.iter().map(|p| p.as_str()).collect();
            csv_writer.write_record([
                expense.id.to_string(),
                expense.sequence.to_string(),
                expense.payer.to_string(),
                expense.item.clone(),
                format_amount(expense.amount),
                shared_among.join(";"),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export balances to CSV format
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let balances = self.ledger.balances();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "participant",
            "paid",
            "common_share",
            "exclusive_share",
            "total_share",
            "net_amount",
        ])?;

        let mut count = 0;
        for entry in balances.iter() {
            let b = &entry.balance;
            csv_writer.write_record([
                entry.participant.to_string(),
                format_amount(b.paid),
                format_amount(b.common_share),
                format_amount(b.exclusive_share),
                format_amount(b.total_share),
                format_amount(b.net_amount),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the settlement plan to CSV format
    pub fn export_settlements_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let settlements = self.ledger.settlements();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["from", "to", "amount"])?;

        for settlement in &settlements {
            csv_writer.write_record([
                settlement.from.as_str(),
                settlement.to.as_str(),
                format_amount(settlement.amount).as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(settlements.len())
    }

    /// Export expenses as a JSON array
    pub fn export_expenses_json<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.ledger.expenses();
        write_json(writer, &expenses)?;
        Ok(expenses.len())
    }

    /// Export balances as a JSON array
    pub fn export_balances_json<W: Write>(&self, writer: W) -> Result<usize> {
        let balances = self.ledger.balances();
        write_json(writer, &balances)?;
        Ok(balances.len())
    }

    /// Export the settlement plan as a JSON array
    pub fn export_settlements_json<W: Write>(&self, writer: W) -> Result<usize> {
        let settlements = self.ledger.settlements();
        write_json(writer, &settlements)?;
        Ok(settlements.len())
    }

    /// Export expenses, balances and settlements as one JSON document
    pub fn export_summary_json<W: Write>(&self, writer: W) -> Result<TripReport> {
        let report = TripReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            expenses: self.ledger.expenses().to_vec(),
            summary: self.ledger.summary(),
        };

        write_json(writer, &report)?;
        Ok(report)
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
