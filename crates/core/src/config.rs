use crate::classify::{ClassifyRules, NamingStyle};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub naming: NamingStyle,
    #[serde(default)]
    pub rules: ClassifyRules,
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub undo_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "kelly", "film-renamer")
        .context("OS標準設定ディレクトリを取得できませんでした")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        undo_path: config_dir.join("undo-last.json"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    load_config_from(&paths.config_path)
}

fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(config_path).with_context(|| {
        format!("設定ファイルを読めませんでした: {}", config_path.display())
    })?;

    let config = toml::from_str::<AppConfig>(&raw).context("設定ファイルのパースに失敗しました")?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    save_config_to(&paths.config_path, config)
}

fn save_config_to(config_path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(config_dir) = config_path.parent() {
        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "設定ディレクトリを作成できませんでした: {}",
                config_dir.display()
            )
        })?;
    }
    let body = toml::to_string_pretty(config).context("設定のシリアライズに失敗しました")?;
    fs::write(config_path, body).with_context(|| {
        format!(
            "設定ファイルを書き込めませんでした: {}",
            config_path.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config_from, save_config_to, AppConfig};
    use crate::classify::NamingStyle;
    use tempfile::tempdir;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let body = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&body).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: AppConfig = toml::from_str("naming = \"bare\"\n").expect("parse");
        assert_eq!(parsed.naming, NamingStyle::Bare);
        assert_eq!(parsed.rules, AppConfig::default().rules);
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = load_config_from(&temp.path().join("config.toml")).expect("load");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_writes_file_that_loads_back_identically() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.naming = NamingStyle::Bare;
        config.rules.photo_extensions = vec!["jpg".to_string()];

        save_config_to(&config_path, &config).expect("save");
        let loaded = load_config_from(&config_path).expect("load");
        assert_eq!(loaded, config);
    }
}
