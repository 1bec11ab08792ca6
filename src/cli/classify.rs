//! CLI command for classification

use chrono::{DateTime, Utc};
use clap::Args;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::transfers::{load_transfer_criteria, scan_transfers};
use super::{parse_bound, DayBound};
use crate::config::{LogbookPaths, Settings};
use crate::criteria::Criterion;
use crate::error::{LogbookError, LogbookResult};
use crate::logbook::CriteriaBasedLogbook;
use crate::models::{Currency, Operation, OperationId};
use crate::reports::ClassificationReport;
use crate::rules::CriterionDefinition;
use crate::storage::{load_operations, write_json_atomic};
use crate::transfers::TransferCriterion;

/// Arguments of `logbook classify`
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// JSON file holding an array of operations
    pub operations: PathBuf,

    /// Criterion tree (YAML); defaults to rules.yaml in the data directory,
    /// then to the built-in tree
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Only report operations at or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only report operations at or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub till: Option<String>,

    /// Currency to classify; operations in other currencies are skipped
    #[arg(long)]
    pub currency: Option<String>,

    /// Detect transfers first so their legs carry the transfer tags
    #[arg(long)]
    pub transfers: bool,

    /// Transfer criteria (YAML) used with --transfers
    #[arg(long, requires = "transfers")]
    pub criteria: Option<PathBuf>,

    /// Export the report as JSON instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolve the criterion tree to use
pub fn load_criterion(
    paths: &LogbookPaths,
    settings: &Settings,
    explicit: Option<&Path>,
) -> LogbookResult<Criterion> {
    let definition = match explicit {
        Some(path) => CriterionDefinition::load(path)?,
        None if paths.rules_file().exists() => CriterionDefinition::load(paths.rules_file())?,
        None => CriterionDefinition::default_tree(
            settings.transfer_source_tag.clone(),
            settings.transfer_sink_tag.clone(),
        ),
    };
    definition.build()
}

/// Handle `logbook classify`
pub fn handle_classify_command(
    paths: &LogbookPaths,
    settings: &Settings,
    args: ClassifyArgs,
) -> LogbookResult<()> {
    let currency = match &args.currency {
        Some(code) => Currency::new(code)?,
        None => settings.default_currency.clone(),
    };
    let range = parse_range(args.from.as_deref(), args.till.as_deref())?;
    let criterion = load_criterion(paths, settings, args.rules.as_deref())?;

    let mut operations = load_operations(&args.operations)?;
    if args.transfers {
        let criteria = load_transfer_criteria(paths, args.criteria.as_deref())?;
        operations = tagged_with_transfers(operations, criteria, settings);
    }

    let (operations, skipped): (Vec<Operation>, Vec<Operation>) = operations
        .into_iter()
        .partition(|op| op.amount.currency() == &currency);
    if !skipped.is_empty() {
        tracing::info!(skipped = skipped.len(), %currency, "operations in other currencies skipped");
    }

    let transfer_legs: HashSet<OperationId> = operations
        .iter()
        .filter(|op| {
            op.has_tag(&settings.transfer_source_tag) || op.has_tag(&settings.transfer_sink_tag)
        })
        .map(|op| op.id)
        .collect();

    let mut logbook = CriteriaBasedLogbook::new(criterion);
    let registration = logbook.register_all(operations.into_iter().map(Arc::new));

    if let Some((from, till)) = range {
        logbook = logbook.slice(from, till);
    }

    let report = ClassificationReport::generate(&logbook).with_rejections(&registration, &transfer_legs);

    if let Some(path) = args.output {
        write_json_atomic(&path, &report)?;
        println!("Classification report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.date_format));
        if !skipped.is_empty() {
            println!("Skipped {} operation(s) not in {}", skipped.len(), currency);
        }
    }

    Ok(())
}

fn parse_range(
    from: Option<&str>,
    till: Option<&str>,
) -> LogbookResult<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    if from.is_none() && till.is_none() {
        return Ok(None);
    }

    let from = match from {
        Some(value) => parse_bound(value, DayBound::Start)?,
        None => DateTime::<Utc>::MIN_UTC,
    };
    let till = match till {
        Some(value) => parse_bound(value, DayBound::End)?,
        None => DateTime::<Utc>::MAX_UTC,
    };

    if from > till {
        return Err(LogbookError::Validation(format!(
            "--from {} is after --till {}",
            from, till
        )));
    }
    Ok(Some((from, till)))
}

/// Run transfer detection and return every operation, legs tagged
fn tagged_with_transfers(
    operations: Vec<Operation>,
    criteria: Vec<TransferCriterion>,
    settings: &Settings,
) -> Vec<Operation> {
    let scan = scan_transfers(operations, criteria, settings);
    let mut all = scan.unmatched;
    for transfer in scan.transfers {
        let (source, sink) = transfer.into_legs();
        all.push(source);
        all.push(sink);
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleDefinition;
    use crate::storage::write_yaml_atomic;
    use tempfile::TempDir;

    #[test]
    fn test_parse_range() {
        assert!(parse_range(None, None).unwrap().is_none());

        let (from, till) = parse_range(Some("2024-01-01"), None).unwrap().unwrap();
        assert_eq!(till, DateTime::<Utc>::MAX_UTC);
        assert!(from < till);

        assert!(matches!(
            parse_range(Some("2024-02-01"), Some("2024-01-01")),
            Err(LogbookError::Validation(_))
        ));
    }

    #[test]
    fn test_load_criterion_prefers_rules_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path());
        let settings = Settings::default();

        let builtin = load_criterion(&paths, &settings, None).unwrap();
        assert_eq!(builtin.description(), "All");
        assert_eq!(builtin.subcriteria().len(), 2);

        let custom = CriterionDefinition {
            description: "Everything".into(),
            rule: RuleDefinition::Universal,
            subcriteria: Vec::new(),
        };
        write_yaml_atomic(paths.rules_file(), &custom).unwrap();
        let loaded = load_criterion(&paths, &settings, None).unwrap();
        assert_eq!(loaded.description(), "Everything");
    }
}
