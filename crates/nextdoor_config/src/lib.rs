use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
pub mod models;
pub use models::*;

/// Default prefix for environment overrides, e.g. `NEXTDOOR__SERVER__PORT=8080`.
pub const DEFAULT_PREFIX: &str = "NEXTDOOR";

/// Marker value replaced by an environment variable after loading.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Where configuration is read from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub dir: PathBuf,
    pub run_env: String,
    pub prefix: String,
}

impl ConfigSources {
    /// Sources derived from `CONFIG_DIR`, `RUN_ENV` and `PREFIX`.
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string())),
            run_env: env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string()),
            prefix: env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
        }
    }
}

/// Loads the application configuration from `config/default.*`, `config/{RUN_ENV}.*`
/// and `NEXTDOOR__*` environment variables, in that order of precedence (lowest first).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    load_config_from(&ConfigSources::from_env())
}

/// Loads the configuration from explicit sources. Missing files are not an error.
pub fn load_config_from(sources: &ConfigSources) -> Result<AppConfig, ConfigError> {
    let default_path = sources.dir.join("default");
    let env_path = sources.dir.join(&sources.run_env);

    debug!(
        "Loading config: default={}, env={}, prefix={}",
        default_path.display(),
        env_path.display(),
        sources.prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(path_str(&default_path)?).required(false))
        .add_source(File::with_name(path_str(&env_path)?).required(false))
        .add_source(
            Environment::with_prefix(&sources.prefix)
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

fn path_str(path: &Path) -> Result<&str, ConfigError> {
    path.to_str()
        .ok_or_else(|| ConfigError::Message(format!("non UTF-8 config path: {}", path.display())))
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
/// The variable name is the upper-cased key path joined by `_`, e.g. `ADMIN_TOKEN`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => warn!("env var {} not found for {}", env_key, SECRET_MARKER),
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in the loaded config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config is not serializable: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config is not deserializable: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file once per process. `DOTENV_OVERRIDE` names an alternative file,
/// otherwise `.env` in the working directory is used. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
