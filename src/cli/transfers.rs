//! CLI command for transfer detection

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{LogbookPaths, Settings};
use crate::error::LogbookResult;
use crate::models::Operation;
use crate::reports::TransferReport;
use crate::rules::TransferCriterionDefinition;
use crate::storage::{load_operations, write_json_atomic};
use crate::transfers::{TransferBuilder, TransferCriterion, TransferDetector, TransferScan};

/// Arguments of `logbook transfers`
#[derive(Args, Debug)]
pub struct TransfersArgs {
    /// JSON file holding an array of operations
    pub operations: PathBuf,

    /// Transfer criteria (YAML); defaults to transfers.yaml in the data
    /// directory, then to the built-in criteria
    #[arg(short, long)]
    pub criteria: Option<PathBuf>,

    /// Export the report as JSON instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolve the transfer criteria to use
pub fn load_transfer_criteria(
    paths: &LogbookPaths,
    explicit: Option<&Path>,
) -> LogbookResult<Vec<TransferCriterion>> {
    if let Some(path) = explicit {
        return TransferCriterionDefinition::load_all(path);
    }

    let configured = paths.transfers_file();
    if configured.exists() {
        return TransferCriterionDefinition::load_all(configured);
    }

    tracing::debug!("no transfer criteria configured, using built-in criteria");
    Ok(TransferCriterionDefinition::defaults()
        .iter()
        .map(TransferCriterionDefinition::build)
        .collect())
}

/// Run the transfer builder over operations in file order
pub fn scan_transfers(
    operations: Vec<Operation>,
    criteria: Vec<TransferCriterion>,
    settings: &Settings,
) -> TransferScan {
    let mut builder = TransferBuilder::with_tags(
        TransferDetector::new(criteria),
        settings.transfer_source_tag.clone(),
        settings.transfer_sink_tag.clone(),
    );
    builder.extend(operations);
    builder.finish()
}

/// Handle `logbook transfers`
pub fn handle_transfers_command(
    paths: &LogbookPaths,
    settings: &Settings,
    args: TransfersArgs,
) -> LogbookResult<()> {
    let criteria = load_transfer_criteria(paths, args.criteria.as_deref())?;
    let operations = load_operations(&args.operations)?;

    let scan = scan_transfers(operations, criteria, settings);
    let report = TransferReport::generate(&scan);

    if let Some(path) = args.output {
        write_json_atomic(&path, &report)?;
        println!("Transfer report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.date_format));
    }

    Ok(())
}
