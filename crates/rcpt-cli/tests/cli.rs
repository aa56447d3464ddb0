use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const RECEIPT_TEXT: &str = "  ***Corner Hardware!!!***\n\
    123 Main St\n\
    Date: March 3, 2026\n\
    Faucet              42.06\n\
    SALES TAX            2.94\n\
    TOTAL               45.00\n\
    VISA ****4821       45.00\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("demo/receipts")).unwrap();
        fs::create_dir_all(root.join("demo/ocr_cache")).unwrap();
        fs::create_dir_all(root.join("data")).unwrap();

        fs::write(root.join("demo/receipts/hardware.jpg"), b"not really a jpeg").unwrap();
        fs::write(root.join("demo/ocr_cache/hardware.txt"), RECEIPT_TEXT).unwrap();
        fs::write(
            root.join("data/properties.json"),
            r#"{"properties": [{"name": "Maple St Duplex"}, {"name": "Oak Ave"}]}"#,
        )
        .unwrap();
        fs::write(
            root.join("data/categories.json"),
            r#"{"categories": [
                {"name": "Repairs", "schedule_e_line": "Line 14"},
                {"name": "Supplies", "schedule_e_line": "Line 15"}
            ]}"#,
        )
        .unwrap();

        let config = json!({
            "paths": {
                "properties": root.join("data/properties.json"),
                "categories": root.join("data/categories.json"),
                "spreadsheet": root.join("data/exports/expenses.csv"),
                "receipt_images_dir": root.join("data/receipt_images"),
                "demo_receipts_dir": root.join("demo/receipts"),
                "demo_ocr_cache_dir": root.join("demo/ocr_cache"),
            },
            "ocr": { "engine": "demo-cache" }
        });
        fs::write(
            root.join("config.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();

        Self { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn rcpt(&self) -> Command {
        let mut cmd = Command::cargo_bin("rcpt").unwrap();
        cmd.arg("--config").arg(self.path("config.json"));
        cmd
    }

    fn table(&self) -> String {
        fs::read_to_string(self.path("data/exports/expenses.csv")).unwrap()
    }
}

fn archived_images(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

#[test]
fn test_extract_from_text_file_as_json() {
    let ws = Workspace::new();

    ws.rcpt()
        .arg("extract")
        .arg("--text")
        .arg(ws.path("demo/ocr_cache/hardware.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vendor\": \"Corner Hardware\""))
        .stdout(predicate::str::contains("\"date\": \"2026-03-03\""))
        .stdout(predicate::str::contains("\"payment_method\": \"Visa\""))
        .stdout(predicate::str::contains("v1-heuristic"));

    assert!(!ws.path("data/exports/expenses.csv").exists());
}

#[test]
fn test_extract_image_as_text() {
    let ws = Workspace::new();

    ws.rcpt()
        .args(["extract", "--format", "text"])
        .arg(ws.path("demo/receipts/hardware.jpg"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor:         Corner Hardware"))
        .stdout(predicate::str::contains("Total:          45.00"))
        .stdout(predicate::str::contains("Tax:            2.94"))
        .stdout(predicate::str::contains("OCR confidence: 99.0%"));
}

#[test]
fn test_extract_requires_a_source() {
    let ws = Workspace::new();
    ws.rcpt().arg("extract").assert().failure();
}

#[test]
fn test_process_yes_logs_row_and_archives_image() {
    let ws = Workspace::new();

    ws.rcpt()
        .args(["process", "--yes"])
        .arg(ws.path("demo/receipts/hardware.jpg"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Corner Hardware"));

    let table = ws.table();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Logged At,Receipt Date,Vendor,Total,Tax,Category,Schedule E Line,Property,\
         Payment Method,Notes,Image Path,OCR Confidence"
    );
    assert!(lines[1].contains(",2026-03-03,Corner Hardware,45.00,2.94,Repairs,Line 14,Maple St Duplex,Visa,,receipt_images/"));
    assert!(lines[1].ends_with(".jpg,0.9900"));

    let images = archived_images(&ws.path("data/receipt_images"));
    assert_eq!(images.len(), 1);
    assert!(ws.path("demo/receipts/hardware.jpg").exists());
}

#[test]
fn test_process_overrides() {
    let ws = Workspace::new();

    ws.rcpt()
        .args(["process", "--yes"])
        .arg(ws.path("demo/receipts/hardware.jpg"))
        .args(["--total", "50", "--tax", ""])
        .args(["--property", "Oak Ave", "--category", "Supplies"])
        .args(["--notes", "shelf brackets, qty 4"])
        .assert()
        .success();

    let table = ws.table();
    assert!(table.contains("Corner Hardware,50.00,,Supplies,Line 15,Oak Ave,Visa,\"shelf brackets, qty 4\""));
}

#[test]
fn test_process_twice_appends() {
    let ws = Workspace::new();

    for _ in 0..2 {
        ws.rcpt()
            .args(["process", "--yes"])
            .arg(ws.path("demo/receipts/hardware.jpg"))
            .assert()
            .success();
    }

    assert_eq!(ws.table().lines().count(), 3);
    assert_eq!(archived_images(&ws.path("data/receipt_images")).len(), 2);
}

#[test]
fn test_process_declined_writes_nothing() {
    let ws = Workspace::new();

    // Accept every prompt, then answer "n" at the confirmation.
    ws.rcpt()
        .arg("process")
        .arg(ws.path("demo/receipts/hardware.jpg"))
        .write_stdin("\n\n\n\n\n\n\n\n\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was written"));

    assert!(!ws.path("data/exports/expenses.csv").exists());
    assert!(archived_images(&ws.path("data/receipt_images")).is_empty());
}

#[test]
fn test_process_missing_image() {
    let ws = Workspace::new();

    ws.rcpt()
        .args(["process", "--yes"])
        .arg(ws.path("demo/receipts/missing.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_logs_every_match() {
    let ws = Workspace::new();
    fs::copy(
        ws.path("demo/receipts/hardware.jpg"),
        ws.path("demo/receipts/second.png"),
    )
    .unwrap();

    ws.rcpt()
        .arg("batch")
        .arg(format!("{}/*", ws.path("demo/receipts").display()))
        .args(["--property", "Oak Ave", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2 receipts"));

    let table = ws.table();
    assert_eq!(table.lines().count(), 3);
    // No cached text for the second image: the row is logged with empty fields.
    assert!(table.contains("Oak Ave"));
}

#[test]
fn test_store_init_and_show() {
    let ws = Workspace::new();

    ws.rcpt().args(["store", "init"]).assert().success();
    ws.rcpt()
        .args(["store", "show"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Logged At,Receipt Date,Vendor"))
        .stderr(predicate::str::contains("0 rows"));
}

#[test]
fn test_samples_lists_cached_text() {
    let ws = Workspace::new();

    ws.rcpt()
        .arg("samples")
        .assert()
        .success()
        .stdout(predicate::str::contains("hardware.jpg"))
        .stdout(predicate::str::contains("cached text"));
}

#[test]
fn test_config_get_and_set() {
    let ws = Workspace::new();

    ws.rcpt()
        .args(["config", "set", "store.min_table_bytes", "32"])
        .assert()
        .success();

    ws.rcpt()
        .args(["config", "get", "store.min_table_bytes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("32"));

    ws.rcpt()
        .args(["config", "get", "ocr.engine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-cache"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let mut cmd = Command::cargo_bin("rcpt").unwrap();
    cmd.args(["--config", "/nonexistent/rcpt.json", "samples"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
