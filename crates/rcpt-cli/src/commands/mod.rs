//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod process;
pub mod samples;
pub mod store;

use std::path::{Path, PathBuf};

use tracing::debug;

use rcpt_core::models::ReceiptConfig;
use rcpt_core::ocr::{engine_from_config, OcrEngine};
use rcpt_core::ParsedFields;

/// `<user config dir>/rcpt/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcpt")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit `--config` file must exist; a missing
/// default file means built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ReceiptConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(ReceiptConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ReceiptConfig::from_file(&path)?)
    } else {
        Ok(ReceiptConfig::default())
    }
}

/// Build the configured OCR engine once for the whole command.
pub fn build_engine(config: &ReceiptConfig) -> anyhow::Result<Box<dyn OcrEngine>> {
    engine_from_config(&config.ocr, &config.paths.demo_ocr_cache_dir)
        .map_err(|e| anyhow::anyhow!("Failed to set up OCR: {}", e))
}

/// Plain text rendering of candidate fields.
pub fn format_fields(fields: &ParsedFields) -> String {
    let amount = |value: Option<rust_decimal::Decimal>| {
        value.map(|v| format!("{:.2}", v)).unwrap_or_default()
    };

    let mut output = String::new();
    output.push_str(&format!("Vendor:         {}\n", fields.vendor));
    output.push_str(&format!("Date:           {}\n", fields.date));
    output.push_str(&format!("Total:          {}\n", amount(fields.total)));
    output.push_str(&format!("Tax:            {}\n", amount(fields.tax)));
    output.push_str(&format!("Payment method: {}\n", fields.payment_method));
    output
}
