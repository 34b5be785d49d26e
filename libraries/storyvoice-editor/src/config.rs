/// Editor configuration
use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyvoice_audio::effects::GraphSettings;

/// Environment variable prefix (`STORYVOICE_RENDER__MAX_DELAY_SECS`, ...)
pub const ENV_PREFIX: &str = "STORYVOICE";

/// Config file read by [`EditorConfig::load`] when present
pub const DEFAULT_CONFIG_FILE: &str = "storyvoice.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EditorConfig {
    #[serde(default = "default_render")]
    pub render: RenderSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_assets")]
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderSettings {
    /// Delay line capacity in seconds (live and offline)
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Initial master volume
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetSettings {
    /// Base for relative asset URLs
    #[serde(default)]
    pub base_url: Option<String>,

    /// File name of baked audio; `{page}` is the 1-based page number
    #[serde(default = "default_baked_file_template")]
    pub baked_file_template: String,
}

impl EditorConfig {
    /// Load from `storyvoice.toml` (if it exists) and the environment
    pub fn load() -> Result<Self> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        let file = path.exists().then_some(path.as_path());
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    /// Load from an explicit file and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EditorError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::load_with_prefix(Some(path), ENV_PREFIX)
    }

    pub(crate) fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = file {
            settings = settings.add_source(config::File::from(path));
        }

        // Override with environment variables; nested keys use `__`
        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.render.max_delay_secs.is_finite() || self.render.max_delay_secs <= 0.0 {
            return Err(EditorError::Config(format!(
                "render.max_delay_secs must be positive, got {}",
                self.render.max_delay_secs
            )));
        }

        if !self.playback.master_volume.is_finite() || self.playback.master_volume < 0.0 {
            return Err(EditorError::Config(format!(
                "playback.master_volume must not be negative, got {}",
                self.playback.master_volume
            )));
        }

        if self.assets.baked_file_template.trim().is_empty() {
            return Err(EditorError::Config(
                "assets.baked_file_template must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Graph construction settings
    pub fn graph_settings(&self) -> GraphSettings {
        GraphSettings {
            max_delay_secs: self.render.max_delay_secs,
        }
    }

    /// File name of the baked audio of a page (0-based index)
    pub fn baked_file_name(&self, page_index: usize) -> String {
        self.assets
            .baked_file_template
            .replace("{page}", &(page_index + 1).to_string())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            render: default_render(),
            playback: default_playback(),
            assets: default_assets(),
        }
    }
}

// Default values
fn default_render() -> RenderSettings {
    RenderSettings {
        max_delay_secs: default_max_delay_secs(),
    }
}

fn default_max_delay_secs() -> f32 {
    2.0
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        master_volume: default_master_volume(),
    }
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_assets() -> AssetSettings {
    AssetSettings {
        base_url: None,
        baked_file_template: default_baked_file_template(),
    }
}

fn default_baked_file_template() -> String {
    "page_{page}_filtered.wav".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.render.max_delay_secs, 2.0);
        assert_eq!(config.playback.master_volume, 1.0);
        assert_eq!(config.assets.base_url, None);
        assert_eq!(config.baked_file_name(0), "page_1_filtered.wav");
        assert!(config.validate().is_ok());
        assert_eq!(config.graph_settings(), GraphSettings::default());
    }

    #[test]
    fn empty_sources_give_defaults() {
        let config = EditorConfig::load_with_prefix(None, "SVTEST_EMPTY").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyvoice.toml");
        std::fs::write(
            &path,
            "[render]\nmax_delay_secs = 1.5\n\n[assets]\nbase_url = \"https://books.example.com/\"\n",
        )
        .unwrap();

        let config = EditorConfig::load_with_prefix(Some(&path), "SVTEST_FILE").unwrap();
        assert_eq!(config.render.max_delay_secs, 1.5);
        assert_eq!(config.playback.master_volume, 1.0);
        assert_eq!(config.assets.base_url.as_deref(), Some("https://books.example.com/"));
        assert_eq!(config.assets.baked_file_template, "page_{page}_filtered.wav");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyvoice.toml");
        std::fs::write(&path, "[playback]\nmaster_volume = 0.5\n").unwrap();

        std::env::set_var("SVTEST_ENV_PLAYBACK__MASTER_VOLUME", "0.25");
        let config = EditorConfig::load_with_prefix(Some(&path), "SVTEST_ENV");
        std::env::remove_var("SVTEST_ENV_PLAYBACK__MASTER_VOLUME");

        assert_eq!(config.unwrap().playback.master_volume, 0.25);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyvoice.toml");
        std::fs::write(&path, "[render]\nmax_delay_secs = 0.0\n").unwrap();

        assert!(matches!(
            EditorConfig::load_with_prefix(Some(&path), "SVTEST_INVALID"),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(matches!(
            EditorConfig::load_from(Path::new("/nonexistent/storyvoice.toml")),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn baked_file_template_substitutes_page_number() {
        let mut config = EditorConfig::default();
        config.assets.baked_file_template = "book/{page}/baked.wav".to_string();
        assert_eq!(config.baked_file_name(4), "book/5/baked.wav");
    }
}
