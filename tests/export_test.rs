mod common;

use anyhow::Result;
use common::{ledger_with, record, run_lines, test_shell};
use tempfile::TempDir;
use tripsplit::application::Ledger;
use tripsplit::io::Exporter;

fn sample_ledger() -> Ledger {
    let mut ledger = ledger_with(&["A", "B", "C"]);
    record(&mut ledger, "A", "lunch, with dessert", 30.0, &["A", "B", "C"]);
    record(&mut ledger, "B", "gift", 50.0, &["C"]);
    ledger
}

fn to_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_export_expenses_csv() -> Result<()> {
    let ledger = sample_ledger();
    let mut buffer = Vec::new();

    let count = Exporter::new(&ledger).export_expenses_csv(&mut buffer)?;

    assert_eq!(count, 2);
    let csv = to_string(buffer);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,sequence,payer,item,amount,shared_among");
    assert!(lines[1].ends_with(",1,A,\"lunch, with dessert\",30.00,A;B;C"));
    assert!(lines[2].ends_with(",2,B,gift,50.00,C"));
    Ok(())
}

#[test]
fn test_export_balances_csv() -> Result<()> {
    let ledger = sample_ledger();
    let mut buffer = Vec::new();

    let count = Exporter::new(&ledger).export_balances_csv(&mut buffer)?;

    assert_eq!(count, 3);
    let csv = to_string(buffer);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "participant,paid,common_share,exclusive_share,total_share,net_amount"
    );
    assert_eq!(lines[1], "A,30.00,10.00,0.00,10.00,20.00");
    assert_eq!(lines[2], "B,50.00,10.00,0.00,10.00,40.00");
    assert_eq!(lines[3], "C,0.00,10.00,50.00,60.00,-60.00");
    Ok(())
}

#[test]
fn test_export_settlements_csv() -> Result<()> {
    let ledger = sample_ledger();
    let mut buffer = Vec::new();

    let count = Exporter::new(&ledger).export_settlements_csv(&mut buffer)?;

    assert_eq!(count, 2);
    assert_eq!(
        to_string(buffer),
        "from,to,amount\nC,B,40.00\nC,A,20.00\n"
    );
    Ok(())
}

#[test]
fn test_export_json_arrays() -> Result<()> {
    let ledger = sample_ledger();
    let exporter = Exporter::new(&ledger);

    let mut buffer = Vec::new();
    assert_eq!(exporter.export_balances_json(&mut buffer)?, 3);
    let balances: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(balances[2]["participant"], "C");
    assert_eq!(balances[2]["exclusive_share"], 50.0);

    let mut buffer = Vec::new();
    assert_eq!(exporter.export_settlements_json(&mut buffer)?, 2);
    let settlements: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(settlements[0]["from"], "C");
    assert_eq!(settlements[0]["to"], "B");

    let mut buffer = Vec::new();
    assert_eq!(exporter.export_expenses_json(&mut buffer)?, 2);
    let expenses: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(expenses[1]["shared_among"][0], "C");
    Ok(())
}

#[test]
fn test_export_summary_json() -> Result<()> {
    let ledger = sample_ledger();
    let mut buffer = Vec::new();

    let report = Exporter::new(&ledger).export_summary_json(&mut buffer)?;

    assert_eq!(report.summary.expense_count, 2);
    let json: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["participant_count"], 3);
    assert_eq!(json["total_spent"], 80.0);
    assert_eq!(json["expenses"].as_array().unwrap().len(), 2);
    assert_eq!(json["settlements"].as_array().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_shell_export_to_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settlements.csv");

    let export_line = format!("export settlements --output {}", path.display());

    let mut shell = test_shell();
    let out = run_lines(
        &mut shell,
        &[
            "person add A B",
            "expense add -p A -i fuel -a 60 --among A,B",
            export_line.as_str(),
        ],
    );

    assert!(out.contains("Exported 1 settlements to"));
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents, "from,to,amount\nB,A,30.00\n");
    Ok(())
}

#[test]
fn test_shell_export_to_output() {
    let mut shell = test_shell();
    let out = run_lines(
        &mut shell,
        &["person add A", "export balances --format json"],
    );
    let json: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(json[0]["participant"], "A");
}

#[test]
fn test_shell_export_rejects_unknown_type_and_format() {
    let mut shell = test_shell();
    assert!(shell.execute_line("export budgets").is_err());
    assert!(shell.execute_line("export expenses --format xml").is_err());
    assert!(shell.execute_line("export summary --format csv").is_err());
}
