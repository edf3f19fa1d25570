use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube service endpoints and credentials
    pub youtube: YoutubeConfig,

    /// Transcript download settings
    pub transcript: TranscriptConfig,

    /// Search mode settings
    pub search: SearchConfig,

    /// Markdown export settings
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// YouTube Data API v3 key (overridden by `--api-key` / `YOUTUBE_API_KEY`)
    pub api_key: Option<String>,

    /// Base URL of the Data API
    pub api_base_url: String,

    /// oEmbed endpoint used for keyless title lookups
    pub oembed_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Path to the yt-dlp executable
    pub yt_dlp_path: String,

    /// Caption languages to request, in order of preference
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of videos returned by a search
    pub max_results: u32,

    /// Per-video lookups allowed in flight at once
    pub max_concurrent_lookups: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory export documents are written to
    pub dir: PathBuf,

    /// Write Markdown documents after each run
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YoutubeConfig {
                api_key: None,
                api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
                oembed_url: "https://www.youtube.com/oembed".to_string(),
            },
            transcript: TranscriptConfig {
                yt_dlp_path: "yt-dlp".to_string(),
                languages: vec!["en".to_string()],
            },
            search: SearchConfig {
                max_results: 5,
                max_concurrent_lookups: 3,
            },
            export: ExportConfig {
                dir: PathBuf::from("export"),
                enabled: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            Self::from_yaml(&content)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("tubedigest").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if !(1..=50).contains(&self.search.max_results) {
            anyhow::bail!("search.max_results must be between 1 and 50");
        }

        if self.search.max_concurrent_lookups == 0 {
            anyhow::bail!("search.max_concurrent_lookups must be at least 1");
        }

        if self.transcript.languages.is_empty() {
            anyhow::bail!("transcript.languages must list at least one language");
        }

        url::Url::parse(&self.youtube.api_base_url)
            .context("youtube.api_base_url is not a valid URL")?;

        Ok(())
    }

    /// Apply a credential supplied on the command line or through the environment
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.youtube.api_key = Some(key);
        }
        self
    }

    /// Whether search mode can run
    pub fn has_api_key(&self) -> bool {
        self.youtube
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  API Key: {}",
            if self.has_api_key() { "configured" } else { "not set" }
        );
        println!("  API Base URL: {}", self.youtube.api_base_url);
        println!("  yt-dlp: {}", self.transcript.yt_dlp_path);
        println!("  Caption Languages: {}", self.transcript.languages.join(", "));
        println!("  Search Results: {}", self.search.max_results);
        println!("  Export Directory: {}", self.export.dir.display());
        println!("  Export Enabled: {}", self.export.enabled);
    }

    /// Point the user at the configuration file
    pub fn print_location() -> Result<()> {
        println!("Edit the config file to change settings:");
        println!("  {}", Self::config_path()?.display());
        println!("The API key can also be supplied with --api-key or YOUTUBE_API_KEY.");
        Ok(())
    }
}
