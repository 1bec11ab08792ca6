//! File I/O utilities with atomic writes
//!
//! Operation files and reports are JSON, rule files are YAML. Writes go
//! through a temp file and a rename so a crash never leaves half a report.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{LogbookError, LogbookResult};

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> LogbookResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    read_json_required(path)
}

/// Read JSON from a file, returning an error if file doesn't exist
pub fn read_json_required<T, P>(path: P) -> LogbookResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = open(path)?;
    serde_json::from_reader(reader)
        .map_err(|e| LogbookError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read YAML from a file, returning an error if file doesn't exist
pub fn read_yaml_required<T, P>(path: P) -> LogbookResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut contents = String::new();
    open(path)?
        .read_to_string(&mut contents)
        .map_err(|e| LogbookError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    from_yaml_str(&contents)
        .map_err(|e| LogbookError::Yaml(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Parse YAML text
///
/// Enum values are written as single-key maps (`within_days: 1`) or, for
/// unit variants, plain strings (`same_magnitude`).
pub fn from_yaml_str<T: DeserializeOwned>(text: &str) -> Result<T, serde_yaml::Error> {
    serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(text))
}

/// Render YAML text in the same single-key map style [`from_yaml_str`] reads
pub fn to_yaml_string<T: Serialize>(data: &T) -> LogbookResult<String> {
    let mut buffer = Vec::new();
    let mut serializer = serde_yaml::Serializer::new(&mut buffer);
    serde_yaml::with::singleton_map_recursive::serialize(data, &mut serializer)?;
    String::from_utf8(buffer).map_err(|e| LogbookError::Yaml(e.to_string()))
}

fn open(path: &Path) -> LogbookResult<BufReader<File>> {
    if !path.exists() {
        return Err(LogbookError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| LogbookError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LogbookResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let contents = serde_json::to_vec_pretty(data)
        .map_err(|e| LogbookError::Json(format!("Failed to serialize data: {}", e)))?;
    write_atomic(path.as_ref(), &contents)
}

/// Write YAML to a file atomically (write to temp, then rename)
pub fn write_yaml_atomic<T, P>(path: P, data: &T) -> LogbookResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let contents = to_yaml_string(data)?;
    write_atomic(path.as_ref(), contents.as_bytes())
}

fn write_atomic(path: &Path, contents: &[u8]) -> LogbookResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LogbookError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target, so the rename stays on one filesystem
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| LogbookError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| LogbookError::Storage(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LogbookError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LogbookError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LogbookError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("report.json");
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("report.json.tmp").exists());
        let loaded: TestData = read_json_required(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_yaml_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.yaml");
        let data = TestData {
            name: "rules".to_string(),
            value: 7,
        };

        write_yaml_atomic(&path, &data).unwrap();
        assert!(!temp_dir.path().join("rules.yaml.tmp").exists());
        let loaded: TestData = read_yaml_required(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_nested_enums_use_map_style() {
        use crate::rules::{Condition, RuleDefinition};
        use rust_decimal::Decimal;

        let rule = RuleDefinition::Condition(Condition::AmountAbove(Decimal::ONE));
        let yaml = to_yaml_string(&rule).unwrap();
        assert!(yaml.contains("condition:"));
        assert!(!yaml.contains('!'));
        assert_eq!(from_yaml_str::<RuleDefinition>(&yaml).unwrap(), rule);
    }

    #[test]
    fn test_read_required_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.yaml");
        assert!(matches!(
            read_yaml_required::<TestData, _>(&missing),
            Err(LogbookError::Storage(_))
        ));

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "not json at all").unwrap();
        assert!(matches!(
            read_json_required::<TestData, _>(&broken),
            Err(LogbookError::Json(_))
        ));
    }

    #[test]
    fn test_read_operations_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("operations.json");
        fs::write(
            &path,
            r#"[
                {
                    "timestamp": "2024-03-01T09:30:00Z",
                    "amount": { "amount": "-12.50", "currency": "EUR" },
                    "description": "Bakery",
                    "budget_id": "0b5a7c1e-4f5e-4f7e-9a51-2f0d3c4b5a61",
                    "tags": ["food"]
                }
            ]"#,
        )
        .unwrap();

        let operations: Vec<Operation> = read_json_required(&path).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].description, "Bakery");
        assert!(operations[0].is_withdraw());
    }
}
