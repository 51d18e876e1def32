//! Load a game database record

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fs_launcher_core::{ConfigValues, Settings};
use serde_json::Value;

use crate::app::LauncherContext;

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Path to a JSON file holding one record object
    #[arg(value_name = "RECORD_FILE")]
    pub record_file: PathBuf,

    /// Game variant UUID
    #[arg(long, default_value = "")]
    pub uuid: String,

    /// Also write the resulting configuration to this path
    #[arg(long, value_name = "OUT_FILE")]
    pub save: Option<PathBuf>,
}

/// Execute the record command
pub fn execute(args: RecordArgs, context: &mut LauncherContext) -> Result<()> {
    let text = std::fs::read_to_string(&args.record_file)
        .with_context(|| format!("Failed to read record: {}", args.record_file.display()))?;
    let values = parse_record(&text)?;

    let report = context
        .store
        .load_values(&values, &args.uuid)
        .context("Failed to load record")?;
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    println!("Configuration: {}", context.settings.get("config_name"));
    println!("Checksum:      {}", context.store.checksum());
    if let Some(path) = &args.save {
        context
            .store
            .save_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

/// Flatten a JSON object into string values. Strings are taken as they are,
/// `null` becomes empty, and anything else is kept as JSON text.
pub fn parse_record(text: &str) -> Result<ConfigValues> {
    let value: Value = serde_json::from_str(text).context("Record is not valid JSON")?;
    let Value::Object(map) = value else {
        anyhow::bail!("Record must be a JSON object");
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_flattens_values() {
        let values = parse_record(
            r#"{"platform": "amiga", "players": 2, "notice": null,
                "file_list": [{"name": "a.adf", "sha1": "1"}]}"#,
        )
        .unwrap();
        assert_eq!(values["platform"], "amiga");
        assert_eq!(values["players"], "2");
        assert_eq!(values["notice"], "");
        assert_eq!(values["file_list"], r#"[{"name":"a.adf","sha1":"1"}]"#);
    }

    #[test]
    fn test_parse_record_rejects_non_object() {
        assert!(parse_record("[1, 2]").is_err());
        assert!(parse_record("{oops").is_err());
    }
}
