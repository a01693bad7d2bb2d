use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub lyrics: Lyrics,
    pub playback: Playback,
    pub formats: Formats,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("config.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let mut cfg = Config::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading config file: {}", path.display()))?;
            cfg = Self::from_toml_str(&raw)
                .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        }

        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_line_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            debug_line_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lyrics {
    /// Added to every line after the file's own `[offset:]` is applied.
    pub extra_offset_ms: i64,
    pub normalize_whitespace: bool,
}

impl Default for Lyrics {
    fn default() -> Self {
        Self {
            extra_offset_ms: 0,
            normalize_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Playback {
    pub tick_ms: u64,
    /// Used when a song has no known duration.
    pub default_duration_sec: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            default_duration_sec: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub json: JsonCfg,
    pub tsv: TsvCfg,
    pub txt: TxtCfg,
    pub srt: SrtCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonCfg {
    pub time_units: String,
    pub wrapped: bool,
}

impl Default for JsonCfg {
    fn default() -> Self {
        Self {
            time_units: "ms".to_string(),
            wrapped: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TsvCfg {
    pub columns: Vec<String>,
}

impl Default for TsvCfg {
    fn default() -> Self {
        Self {
            columns: vec![
                "index".to_string(),
                "time_ms".to_string(),
                "elapsed".to_string(),
                "text".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TxtCfg {
    pub mode: String,
}

impl Default for TxtCfg {
    fn default() -> Self {
        Self {
            mode: "elapsed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrtCfg {
    pub wrap_width: usize,
    pub max_lines: usize,
    /// How long the last lyric line stays on screen.
    pub final_line_ms: u64,
}

impl Default for SrtCfg {
    fn default() -> Self {
        Self {
            wrap_width: 42,
            max_lines: 2,
            final_line_ms: 4_000,
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.to_lowercase() == "json";

    // Logs go to stderr so rendered lyrics on stdout stay clean.
    if is_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json())
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .init();
    }

    tracing::info!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}
