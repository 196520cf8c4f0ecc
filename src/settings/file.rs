//! Settings import/export.
//!
//! The exported document is the JSON settings schema, field order preserved,
//! so hosts can diff and hand-edit it.

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use super::types::CrateSettings;
use super::validation::validate;

/// Serialize settings as pretty-printed JSON with a trailing newline.
pub fn export_json(settings: &CrateSettings) -> Result<String> {
    let mut json = serde_json::to_string_pretty(settings)?;
    if !json.ends_with('\n') {
        json.push('\n');
    }
    Ok(json)
}

/// Parse and validate a settings document.
pub fn import_json(json: &str) -> Result<CrateSettings> {
    let settings: CrateSettings = serde_json::from_str(json)?;
    Ok(validate(settings)?)
}

/// Write settings to disk atomically.
///
/// Uses a temporary file in the same directory as `target_path`, then
/// renames it over the target, so an interrupted write never leaves a
/// partial document.
pub fn write_settings_file(settings: &CrateSettings, target_path: &Path) -> Result<()> {
    let json = export_json(settings)?;

    let parent = target_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Target path has no parent directory: {:?}", target_path))?;
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;
    temp.persist(target_path)?;

    info!(
        "Exported settings version {} to {:?}",
        settings.meta.version, target_path
    );
    Ok(())
}

/// Read and validate a settings document from disk.
pub fn read_settings_file(path: &Path) -> Result<CrateSettings> {
    let content = std::fs::read_to_string(path)?;
    import_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults::default_settings;
    use crate::settings::validation::ValidationError;
    use tempfile::TempDir;

    #[test]
    fn test_export_import_preserves_settings() {
        let settings = default_settings();
        let json = export_json(&settings).unwrap();
        assert!(json.ends_with('\n'));

        let imported = import_json(&json).unwrap();
        assert_eq!(imported, settings);
    }

    #[test]
    fn test_export_import_keeps_fine_thickness_keys() {
        let mut settings = default_settings();
        settings.pricing.unit_costs.foam_per_sheet.insert(0.1875, 9.5);

        let json = export_json(&settings).unwrap();
        assert!(json.contains("\"0.1875\""), "fine key lost in export:\n{}", json);

        let imported = import_json(&json).unwrap();
        assert_eq!(imported.pricing.unit_costs.foam_per_sheet.price_for(0.1875), Some(9.5));
        assert_eq!(imported, settings);
    }

    #[test]
    fn test_export_field_order_follows_schema() {
        let json = export_json(&default_settings()).unwrap();
        let meta = json.find("\"meta\"").unwrap();
        let materials = json.find("\"materials\"").unwrap();
        let adders = json.find("\"adders\"").unwrap();
        assert!(meta < materials && materials < adders);
    }

    #[test]
    fn test_import_rejects_invalid_settings() {
        let mut settings = default_settings();
        settings.protection_by_fragility.pop();
        let json = serde_json::to_string(&settings).unwrap();

        let err = import_json(&json).unwrap_err();
        let validation = err
            .downcast_ref::<ValidationError>()
            .expect("should surface the validation error");
        assert!(validation.fields().contains(&"protectionByFragility"));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(import_json("{ not json").is_err());
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports").join("settings.json");

        let settings = default_settings();
        write_settings_file(&settings, &path).unwrap();
        let loaded = read_settings_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
