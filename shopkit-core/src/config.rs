use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a config file.
    Load(String),
    /// A file or env override could not be parsed into the typed config.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load typed configuration from YAML files and the environment.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` / `.env.{profile}` files (loaded into the process environment)
/// 4. `SHOPKIT_*` environment variables (e.g. `SHOPKIT_SERVER_PORT` overrides
///    `server.port`; leaf keys are single words so the mapping is unambiguous)
///
/// `.env` files never overwrite already-set environment variables. The
/// profile is `SHOPKIT_PROFILE` when set, the argument otherwise.
pub fn load<T: DeserializeOwned>(profile: &str) -> Result<T, ConfigError> {
    let profile = std::env::var("SHOPKIT_PROFILE").unwrap_or_else(|_| profile.to_string());

    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_filename(format!(".env.{profile}"));

    let mut root = Value::Mapping(Default::default());
    merge_file(&mut root, Path::new("application.yaml"))?;
    merge_file(&mut root, Path::new(&format!("application-{profile}.yaml")))?;
    apply_env_overrides(&mut root);

    serde_yaml::from_value(root).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Parse typed configuration from a YAML string (useful for testing).
pub fn load_from_str<T: DeserializeOwned>(yaml: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn merge_file(root: &mut Value, path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    let overlay: Value = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
    merge(root, overlay);
    Ok(())
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn apply_env_overrides(root: &mut Value) {
    for (key, raw) in std::env::vars() {
        let Some(rest) = key.strip_prefix("SHOPKIT_") else {
            continue;
        };
        if rest.eq_ignore_ascii_case("PROFILE") {
            continue;
        }
        let segments: Vec<String> = rest.split('_').map(|s| s.to_ascii_lowercase()).collect();
        // YAML scalar parsing keeps numeric overrides numeric.
        let parsed = serde_yaml::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        set_path(root, &segments, parsed);
    }
}

fn set_path(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let Value::Mapping(map) = node else {
        return;
    };
    let key = Value::String(head.clone());
    if rest.is_empty() {
        map.insert(key, value);
        return;
    }
    let child = map
        .entry(key)
        .or_insert_with(|| Value::Mapping(Default::default()));
    if !matches!(child, Value::Mapping(_)) {
        *child = Value::Mapping(Default::default());
    }
    set_path(child, rest, value);
}

// ── Typed sections ─────────────────────────────────────────────────────

/// Typed configuration for an entity-owning service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub registry: RegistrySettings,
    #[serde(default)]
    pub client: ClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    /// Base URL of the registry server.
    pub url: String,
    /// Address advertised to the registry. Defaults to the bound host/port.
    #[serde(default)]
    pub advertise: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    /// Outbound call timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

impl ClientSettings {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl ServiceConfig {
    /// Fallback configuration for running without config files.
    pub fn standalone(port: u16, registry_url: &str) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port,
            },
            registry: RegistrySettings {
                url: registry_url.to_string(),
                advertise: None,
            },
            client: ClientSettings::default(),
        }
    }

    /// `host:port` string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Address registered with the service registry.
    pub fn advertise_address(&self) -> String {
        self.registry
            .advertise
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_timeout() -> u64 {
    2000
}
