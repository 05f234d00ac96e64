//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (a missing file means "all defaults"), then applies the `FOLIO_CHAT_*`
//! env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Backend configuration. Populated from `[backend]` in the TOML.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Which backend is active: `"http"` or `"offline"`.
    pub provider: String,
    /// Full URL of the chat endpoint.
    pub endpoint: String,
    /// Full URL of the health endpoint.
    pub health_url: String,
    /// Bound on a single remote attempt before falling back.
    pub timeout: Duration,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Label printed in front of assistant turns on the console.
    pub assistant_name: String,
    pub backend: BackendConfig,
    /// Operator knowledge file; `None` uses the compiled-in content.
    pub knowledge_path: Option<PathBuf>,
}

/// Env-var overrides, collected once so tests can pass them explicitly.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub log_level: Option<String>,
    pub timeout_ms: Option<String>,
    pub knowledge: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("FOLIO_CHAT_ENDPOINT").ok(),
            log_level: env::var("FOLIO_CHAT_LOG_LEVEL").ok(),
            timeout_ms: env::var("FOLIO_CHAT_TIMEOUT_MS").ok(),
            knowledge: env::var("FOLIO_CHAT_KNOWLEDGE").ok(),
        }
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    widget: RawWidget,
    #[serde(default)]
    backend: RawBackend,
    #[serde(default)]
    knowledge: RawKnowledge,
}

#[derive(Deserialize)]
struct RawWidget {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_assistant_name")]
    assistant_name: String,
}

impl Default for RawWidget {
    fn default() -> Self {
        Self { log_level: default_log_level(), assistant_name: default_assistant_name() }
    }
}

#[derive(Deserialize)]
struct RawBackend {
    #[serde(default = "default_provider")]
    provider: String,
    #[serde(default = "default_endpoint")]
    endpoint: String,
    /// Derived from `endpoint` when absent.
    #[serde(default)]
    health_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

impl Default for RawBackend {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            health_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawKnowledge {
    #[serde(default)]
    path: Option<String>,
}

fn default_log_level() -> String { "info".to_string() }
fn default_assistant_name() -> String { "Harsha".to_string() }
fn default_provider() -> String { "http".to_string() }
fn default_endpoint() -> String { "http://127.0.0.1:8000/chat".to_string() }
fn default_timeout_ms() -> u64 { 5_000 }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `path` (or `config/default.toml`), then apply env-var
/// overrides. An explicit path must exist; the default path may be absent.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();
    match path {
        Some(p) => load_from(Path::new(p), &overrides),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_from(default_path, &overrides)
            } else {
                resolve(RawConfig::default(), &overrides)
            }
        }
    }
}

/// Internal loader — accepts an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(raw: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let endpoint = overrides.endpoint.clone().unwrap_or(raw.backend.endpoint);
    let log_level = overrides.log_level.clone().unwrap_or(raw.widget.log_level);

    let timeout_ms = match overrides.timeout_ms.as_deref() {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("invalid FOLIO_CHAT_TIMEOUT_MS '{v}': {e}")))?,
        None => raw.backend.timeout_ms,
    };
    if timeout_ms == 0 {
        return Err(AppError::Config("backend timeout must be greater than zero".into()));
    }

    // An overridden endpoint moves the health probe with it.
    let health_url = match (&overrides.endpoint, raw.backend.health_url) {
        (None, Some(explicit)) => explicit,
        _ => health_url_for(&endpoint),
    };
    let knowledge_path = overrides
        .knowledge
        .clone()
        .or(raw.knowledge.path)
        .filter(|p| !p.trim().is_empty())
        .map(|p| expand_home(&p));

    Ok(Config {
        log_level,
        assistant_name: raw.widget.assistant_name,
        backend: BackendConfig {
            provider: raw.backend.provider,
            endpoint,
            health_url,
            timeout: Duration::from_millis(timeout_ms),
        },
        knowledge_path,
    })
}

/// `…/chat` → `…/health`; any other endpoint gets `/health` appended.
pub fn health_url_for(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    match trimmed.strip_suffix("/chat") {
        Some(base) => format!("{base}/health"),
        None => format!("{trimmed}/health"),
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — offline backend, short timeout.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            log_level: "info".into(),
            assistant_name: "test".into(),
            backend: BackendConfig {
                provider: "offline".into(),
                endpoint: "http://127.0.0.1:0/chat".into(),
                health_url: "http://127.0.0.1:0/health".into(),
                timeout: Duration::from_millis(100),
            },
            knowledge_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_TOML: &str = r#"
[widget]
log_level = "debug"
assistant_name = "G R Harsha"

[backend]
provider = "offline"
endpoint = "https://harsha.dev/api/chat"
timeout_ms = 2500

[knowledge]
path = "~/folio/knowledge.toml"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.assistant_name, "G R Harsha");
        assert_eq!(cfg.backend.provider, "offline");
        assert_eq!(cfg.backend.endpoint, "https://harsha.dev/api/chat");
        assert_eq!(cfg.backend.health_url, "https://harsha.dev/api/health");
        assert_eq!(cfg.backend.timeout, Duration::from_millis(2500));
        let kp = cfg.knowledge_path.unwrap();
        assert!(kp.ends_with("folio/knowledge.toml"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.backend.provider, "http");
        assert_eq!(cfg.backend.endpoint, "http://127.0.0.1:8000/chat");
        assert_eq!(cfg.backend.health_url, "http://127.0.0.1:8000/health");
        assert_eq!(cfg.backend.timeout, Duration::from_secs(5));
        assert!(cfg.knowledge_path.is_none());
    }

    #[test]
    fn explicit_health_url_wins() {
        let f = write_toml("[backend]\nhealth_url = \"http://h/status\"\n");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.backend.health_url, "http://h/status");
    }

    #[test]
    fn overrides_apply() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides {
            endpoint: Some("http://localhost:9000/chat".into()),
            log_level: Some("trace".into()),
            timeout_ms: Some("750".into()),
            knowledge: Some("/etc/folio/kb.toml".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.backend.endpoint, "http://localhost:9000/chat");
        assert_eq!(cfg.backend.health_url, "http://localhost:9000/health");
        assert_eq!(cfg.log_level, "trace");
        assert_eq!(cfg.backend.timeout, Duration::from_millis(750));
        assert_eq!(cfg.knowledge_path, Some(PathBuf::from("/etc/folio/kb.toml")));
    }

    #[test]
    fn endpoint_override_rederives_health_url() {
        let f = write_toml(
            "[backend]\nendpoint = \"http://old:8000/chat\"\nhealth_url = \"http://old:8000/status\"\n",
        );
        let overrides =
            Overrides { endpoint: Some("http://new:9000/chat".into()), ..Default::default() };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.backend.endpoint, "http://new:9000/chat");
        assert_eq!(cfg.backend.health_url, "http://new:9000/health");
    }

    #[test]
    fn bad_timeout_override_errors() {
        let f = write_toml("");
        let overrides = Overrides { timeout_ms: Some("soon".into()), ..Default::default() };
        let msg = load_from(f.path(), &overrides).unwrap_err().to_string();
        assert!(msg.contains("FOLIO_CHAT_TIMEOUT_MS"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let f = write_toml("[backend]\ntimeout_ms = 0\n");
        assert!(load_from(f.path(), &Overrides::default()).is_err());
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &Overrides::default());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn health_url_derivation() {
        assert_eq!(health_url_for("http://x:8000/chat"), "http://x:8000/health");
        assert_eq!(health_url_for("http://x:8000/chat/"), "http://x:8000/health");
        assert_eq!(health_url_for("http://x:8000/api"), "http://x:8000/api/health");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.folio");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".folio"));
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
