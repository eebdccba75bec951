use std::path::Path;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::Config;
use crate::dataset::Dataset;

mod command;
mod config;
mod controller;
mod csv_reader;
mod dataset;
mod explorer;
mod ngram;
mod stats;
mod transaction;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Transactions CSV file path
    transactions: Option<String>,

    /// Category reference CSV file path
    categories: Option<String>,

    /// TOML config file naming the source files
    #[clap(long, default_value = ".txnreview.toml")]
    config: String,
}

static COMMAND_HISTORY_FILE: &str = ".txnreview_history";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();
    let config = Config::load_from_file(&cli.config)?;

    let transactions_file = cli
        .transactions
        .or(config.transactions_file)
        .context("no transactions file given, pass a path or set transactions_file in config")?;
    let categories_file = cli
        .categories
        .or(config.categories_file)
        .context("no categories file given, pass a path or set categories_file in config")?;

    let dataset = Dataset::load(Path::new(&transactions_file), Path::new(&categories_file))
        .context("loading dataset failed")?;

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(COMMAND_HISTORY_FILE).is_err() {
        println!("No previous history.");
    }
    let mut statement_buffer: Vec<String> = vec![];
    loop {
        let readline = rl.readline("# ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                let is_last = line.ends_with(';');
                if !line.is_empty() {
                    statement_buffer.push(line.to_string());
                }
                if is_last {
                    let statement = statement_buffer.join("\n");
                    let statement = statement.trim_end_matches(';');
                    let _ = rl.add_history_entry(statement.trim());

                    if let Err(err) = controller::parse_and_run(&dataset, statement) {
                        println!("{}", err);
                    }

                    statement_buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history(COMMAND_HISTORY_FILE)?;

    Ok(())
}
