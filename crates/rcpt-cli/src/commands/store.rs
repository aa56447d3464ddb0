//! Store command - create or print the expense table.

use std::io;
use std::path::Path;

use clap::{Args, Subcommand};
use console::style;

use rcpt_core::{ColumnContract, RecordStore};

use super::load_config;

/// Arguments for the store command.
#[derive(Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    command: StoreCommand,
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Create the table with its header row if it does not exist
    Init,

    /// Print the table as CSV
    Show,
}

pub fn run(args: StoreArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = RecordStore::new(&config.paths.spreadsheet, ColumnContract::receipts())
        .with_min_table_bytes(config.store.min_table_bytes);

    match args.command {
        StoreCommand::Init => {
            store.ensure()?;
            println!(
                "{} Table ready at {} (columns v{})",
                style("✓").green(),
                store.path().display(),
                store.contract().version()
            );
        }
        StoreCommand::Show => {
            let table = store.read()?;
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            writer.write_record(&table.header)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
            eprintln!("{} rows", table.len());
        }
    }
    Ok(())
}
