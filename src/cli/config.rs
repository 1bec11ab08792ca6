//! CLI commands for configuration

use crate::config::{LogbookPaths, Settings};
use crate::error::LogbookResult;
use crate::rules::{CriterionDefinition, TransferCriterionDefinition};
use crate::storage::write_yaml_atomic;

/// Handle `logbook config`
pub fn handle_config_command(paths: &LogbookPaths, settings: &Settings) -> LogbookResult<()> {
    println!("criteria-logbook Configuration");
    println!("==============================");
    println!("Base directory:     {}", paths.base_dir().display());
    println!("Settings file:      {}", paths.settings_file().display());
    println!("Rules file:         {}", describe(paths.rules_file()));
    println!("Transfers file:     {}", describe(paths.transfers_file()));
    println!();
    println!("Settings:");
    println!("  Default currency:     {}", settings.default_currency);
    println!("  Transfer source tag:  {}", settings.transfer_source_tag);
    println!("  Transfer sink tag:    {}", settings.transfer_sink_tag);
    println!("  Log filter:           {}", settings.log_filter);
    println!("  Date format:          {}", settings.date_format);
    Ok(())
}

/// Handle `logbook init`
///
/// Writes the settings plus starter rule files. Existing rule files are
/// left alone.
pub fn handle_init_command(paths: &LogbookPaths, settings: &Settings) -> LogbookResult<()> {
    println!("Initializing criteria-logbook at: {}", paths.base_dir().display());
    settings.save(paths)?;

    if !paths.rules_file().exists() {
        let tree = CriterionDefinition::default_tree(
            settings.transfer_source_tag.clone(),
            settings.transfer_sink_tag.clone(),
        );
        write_yaml_atomic(paths.rules_file(), &tree)?;
        println!("Created {}", paths.rules_file().display());
    }

    if !paths.transfers_file().exists() {
        write_yaml_atomic(paths.transfers_file(), &TransferCriterionDefinition::defaults())?;
        println!("Created {}", paths.transfers_file().display());
    }

    println!("Initialization complete!");
    Ok(())
}

fn describe(path: std::path::PathBuf) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using built-in)", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::classify::load_criterion;
    use crate::cli::transfers::load_transfer_criteria;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path().join("logbook"));
        let settings = Settings::default();

        handle_init_command(&paths, &settings).unwrap();
        assert!(paths.is_initialized());
        assert!(paths.rules_file().exists());

        let criterion = load_criterion(&paths, &settings, None).unwrap();
        assert_eq!(criterion.description(), "All");
        assert_eq!(load_transfer_criteria(&paths, None).unwrap().len(), 2);

        // A second run keeps user edits
        std::fs::write(paths.rules_file(), "description: Mine\n").unwrap();
        handle_init_command(&paths, &settings).unwrap();
        assert_eq!(
            load_criterion(&paths, &settings, None).unwrap().description(),
            "Mine"
        );
    }
}
