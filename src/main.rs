use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use logbook::cli::{
    handle_classify_command, handle_config_command, handle_init_command,
    handle_transfers_command, ClassifyArgs, TransfersArgs,
};
use logbook::config::{paths::DATA_DIR_ENV, LogbookPaths, Settings};

#[derive(Parser)]
#[command(
    name = "logbook",
    version,
    about = "Rule-based classification and transfer detection for financial operations",
    long_about = "criteria-logbook routes financial operations through a tree of \
                  user-defined criteria, summarises every category, and detects \
                  transfers between your own budgets."
)]
struct Cli {
    /// Directory holding config.json, rules.yaml and transfers.yaml
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify operations with a criterion tree
    Classify(ClassifyArgs),

    /// Detect transfers between budgets
    Transfers(TransfersArgs),

    /// Write settings and starter rule files
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LogbookPaths::with_base_dir(dir),
        None => LogbookPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    logbook::init_tracing(&settings.log_filter);

    match cli.command {
        Some(Commands::Classify(args)) => handle_classify_command(&paths, &settings, args)?,
        Some(Commands::Transfers(args)) => handle_transfers_command(&paths, &settings, args)?,
        Some(Commands::Init) => handle_init_command(&paths, &settings)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        None => {
            println!("criteria-logbook - rule-based classification of financial operations");
            println!();
            println!("Run 'logbook --help' for usage information.");
        }
    }

    Ok(())
}
