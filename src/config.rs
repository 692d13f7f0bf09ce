//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$EML2PDF_CONFIG` (environment variable)
//! 2. `~/.config/eml2pdf/config.toml` (Linux/macOS)
//!    `%APPDATA%\eml2pdf\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! `EML2PDF_FORCE_TEXT=1` forces the direct-layout renderer regardless of the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that forces text layout when set to `1`.
pub const FORCE_TEXT_ENV: &str = "EML2PDF_FORCE_TEXT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Conversion defaults.
    pub convert: ConvertConfig,
    /// Renderer selection.
    pub renderer: RendererConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Conversion defaults; command-line flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Directory (inside the output directory) that receives attachments.
    pub attachments_dir: String,
    /// Save attachments next to the PDFs.
    pub extract_attachments: bool,
    /// Recurse into subdirectories of the input directory.
    pub recursive: bool,
    /// Replace existing PDFs.
    pub overwrite: bool,
}

/// External HTML renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Skip the external renderer and lay out text directly.
    pub force_text: bool,
    /// Program name or path of the HTML-to-PDF converter.
    pub command: String,
    /// Arguments; `{input}` is the HTML file and `{output}` the PDF path.
    pub args: Vec<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            attachments_dir: "attachments".to_string(),
            extract_attachments: true,
            recursive: false,
            overwrite: false,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            force_text: false,
            command: "wkhtmltopdf".to_string(),
            args: ["--quiet", "--encoding", "utf-8", "{input}", "{output}"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations, then apply environment overrides.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    let mut config = read_config_file().unwrap_or_default();
    apply_env_overrides(&mut config, std::env::var(FORCE_TEXT_ENV).ok().as_deref());
    config
}

fn read_config_file() -> Option<Config> {
    let path = config_file_path()?;
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            None
        }
    }
}

/// `EML2PDF_FORCE_TEXT=1` turns on `renderer.force_text`.
fn apply_env_overrides(config: &mut Config, force_text: Option<&str>) {
    if force_text.map(str::trim) == Some("1") {
        config.renderer.force_text = true;
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("EML2PDF_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("eml2pdf").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eml2pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.convert.attachments_dir, "attachments");
        assert!(cfg.convert.extract_attachments);
        assert!(!cfg.convert.overwrite);
        assert!(!cfg.renderer.force_text);
        assert_eq!(cfg.renderer.command, "wkhtmltopdf");
        assert!(cfg.renderer.args.contains(&"{input}".to_string()));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[convert]
attachments_dir = "files"

[renderer]
force_text = true
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.convert.attachments_dir, "files");
        assert!(cfg.renderer.force_text);
        assert!(cfg.convert.extract_attachments);
        assert_eq!(cfg.renderer.command, "wkhtmltopdf");
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.renderer, cfg.renderer);
        assert_eq!(parsed.convert.attachments_dir, cfg.convert.attachments_dir);
    }

    #[test]
    fn test_force_text_env_override() {
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg, Some("0"));
        assert!(!cfg.renderer.force_text);
        apply_env_overrides(&mut cfg, None);
        assert!(!cfg.renderer.force_text);
        apply_env_overrides(&mut cfg, Some("1"));
        assert!(cfg.renderer.force_text);
    }
}
