//! Samples command - list bundled demo receipts.

use std::path::Path;

use console::style;

use rcpt_core::demo::list_samples;
use rcpt_core::CachedTextOcr;

use super::load_config;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let cache = CachedTextOcr::new(&config.paths.demo_ocr_cache_dir);
    let samples = list_samples(&config.paths.demo_receipts_dir, &cache)?;

    if samples.is_empty() {
        println!(
            "{} No sample receipts in {}",
            style("ℹ").blue(),
            config.paths.demo_receipts_dir.display()
        );
        return Ok(());
    }

    for sample in &samples {
        let marker = if sample.has_cached_text {
            style("cached text").green()
        } else {
            style("no cached text").yellow()
        };
        println!("{}  ({})", sample.path.display(), marker);
    }
    Ok(())
}
