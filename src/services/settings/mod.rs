//! Settings file and platform paths.
//!
//! Settings live in a TOML file under the platform config directory; the
//! database defaults to the platform data directory. A missing settings file
//! is not an error and yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::PlannerSettings;
use crate::services::context::ContextService;
use crate::services::database::Database;

const CONFIG_FILE_NAME: &str = "settings.toml";
const DATABASE_FILE_NAME: &str = "planner.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ChronosPlanner", "ChronosPlanner")
}

/// `<config dir>/settings.toml`, or `None` when the platform has no home directory
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// `<data dir>/planner.db`, falling back to the working directory
pub fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PlannerSettings> {
    if !path.exists() {
        log::info!("No settings file at {}, using defaults", path.display());
        return Ok(PlannerSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: PlannerSettings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;

    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings in {}: {}", path.display(), e))?;

    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Write settings to `path`, creating parent directories as needed
pub fn save_config(path: &Path, settings: &PlannerSettings) -> Result<()> {
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// The configured database path, or the platform default
pub fn resolve_database_path(settings: &PlannerSettings) -> PathBuf {
    settings
        .database_path
        .clone()
        .unwrap_or_else(default_database_path)
}

/// Open the database at `path`, apply the schema and seed default contexts.
pub fn initialize_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;

    let db = Database::new(path_str)?;
    db.initialize_schema()?;

    let seeded = ContextService::new(&db)
        .initialize_defaults()
        .context("Failed to seed default contexts")?;
    if seeded > 0 {
        log::info!("Seeded {} default context(s)", seeded);
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::ContextStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, PlannerSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = PlannerSettings::default();
        settings.timeline.hour_height = 80.0;
        settings.allow_past_times = true;
        settings.database_path = Some(dir.path().join("custom.db"));

        save_config(&path, &settings).unwrap();
        assert_eq!(load_config(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[timeline]\nsnap_interval_minutes = 5\n").unwrap();

        let settings = load_config(&path).unwrap();
        assert_eq!(settings.timeline.snap_interval_minutes, 5);
        assert_eq!(settings.timeline.hour_height, 60.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[timeline]\nhour_height = 0.0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("hour_height"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "timeline = [").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_resolve_database_path_prefers_setting() {
        let settings = PlannerSettings {
            database_path: Some(PathBuf::from("/tmp/elsewhere.db")),
            ..PlannerSettings::default()
        };
        assert_eq!(resolve_database_path(&settings), PathBuf::from("/tmp/elsewhere.db"));
        assert!(default_database_path().ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn test_initialize_database_seeds_contexts_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("planner.db");

        {
            let db = initialize_database(&path).unwrap();
            assert_eq!(ContextService::new(&db).list_ordered().unwrap().len(), 3);
        }

        let db = initialize_database(&path).unwrap();
        let names: Vec<String> = ContextStore::list_ordered(&ContextService::new(&db))
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Work", "Health", "Personal"]);
    }
}
