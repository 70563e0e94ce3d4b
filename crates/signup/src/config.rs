use std::path::{Path, PathBuf};
use std::{env, fs};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::warn;

use crate::core::verifier::StubBehavior;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Behaviour of the stubbed verification capabilities.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerificationConfig {
    pub identifier: StubBehavior,
    pub code: StubBehavior,
    pub latency_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            identifier: StubBehavior::Accept,
            code: StubBehavior::Accept,
            latency_ms: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Also write a log file into the data dir.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub log: LogConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layering (last wins): defaults, `config.json5` / `config.toml` in the
    /// config dir, `extra` file if given, `SIGNUP_*` environment variables
    /// (`__` separates nesting, e.g. `SIGNUP_VERIFICATION__LATENCY_MS=200`).
    pub fn new(extra: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(&get_config_dir(), &get_data_dir(), extra, environment())
    }

    fn build(
        config_dir: &Path,
        data_dir: &Path,
        extra: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path).required(true));
            found_config = true;
        }
        if !found_config {
            warn!("No configuration file found, using defaults");
        }

        builder = builder.add_source(env);

        builder.build()?.try_deserialize()
    }
}

/// `SIGNUP_` prefix, `__` between nested keys.
fn environment() -> config::Environment {
    config::Environment::with_prefix(PROJECT_NAME.as_str())
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "classroom", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = env::temp_dir().join(format!("signup_config_test_{name}_{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn no_env() -> config::Environment {
        environment().source(Some(config::Map::new()))
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let dir = unique_dir("env");
        let vars: config::Map<String, String> = [
            ("SIGNUP_VERIFICATION__LATENCY_MS", "200"),
            ("SIGNUP_VERIFICATION__CODE", "reject"),
            ("SIGNUP_LOG__LEVEL", "trace"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let cfg = Config::build(&dir, &dir, None, environment().source(Some(vars)))
            .expect("config");
        assert_eq!(cfg.verification.latency_ms, 200);
        assert_eq!(cfg.verification.code, StubBehavior::Reject);
        assert_eq!(cfg.log.level, "trace");
    }

    #[test]
    fn process_environment_is_read() {
        let dir = unique_dir("process_env");
        env::set_var("SIGNUP_VERIFICATION__IDENTIFIER", "reject");
        let cfg = Config::build(&dir, &dir, None, environment());
        env::remove_var("SIGNUP_VERIFICATION__IDENTIFIER");
        assert_eq!(cfg.expect("config").verification.identifier, StubBehavior::Reject);
    }

    #[test]
    fn defaults_without_files() {
        let dir = unique_dir("defaults");
        let cfg = Config::build(&dir, &dir, None, no_env()).expect("config");
        assert_eq!(cfg.verification, VerificationConfig::default());
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.config.config_dir, dir);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = unique_dir("toml");
        fs::write(
            dir.join("config.toml"),
            "[verification]\nidentifier = \"reject\"\nlatency_ms = 150\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let cfg = Config::build(&dir, &dir, None, no_env()).expect("config");
        assert_eq!(cfg.verification.identifier, StubBehavior::Reject);
        assert_eq!(cfg.verification.code, StubBehavior::Accept);
        assert_eq!(cfg.verification.latency_ms, 150);
        assert_eq!(cfg.log.level, "debug");
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = unique_dir("missing");
        let missing = dir.join("nope.toml");
        assert!(Config::build(&dir, &dir, Some(&missing), no_env()).is_err());
    }
}
