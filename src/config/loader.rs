//! Configuration loading
//!
//! Layers, lowest priority first: built-in defaults, user config, project
//! config, environment. Command-line overrides go through
//! [`apply_overrides`], which validates the final result again.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StackkitError, StackkitResult};

use super::types::{Config, ConfigOverrides};

/// Project config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "stackkit.toml";

/// Reported as the source of values that came from command-line flags
const COMMAND_LINE: &str = "command-line flags";

/// Non-fatal configuration problem surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Key in a config file that no setting reads
    UnknownKey {
        key: String,
        file: PathBuf,
        line: Option<usize>,
        suggestion: Option<String>,
    },
    /// Environment value that could not be parsed; the lower layer is kept
    InvalidEnv {
        var: String,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnknownKey {
                key,
                file,
                line,
                suggestion,
            } => {
                write!(f, "unknown config key '{}' in {}", key, file.display())?;
                if let Some(line) = line {
                    write!(f, ":{}", line)?;
                }
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }
                Ok(())
            }
            ConfigWarning::InvalidEnv {
                var,
                value,
                expected,
            } => write!(
                f,
                "ignoring {}='{}': expected {}",
                var, value, expected
            ),
        }
    }
}

/// Default user config location: `$XDG_CONFIG_HOME/stackkit/config.toml`,
/// falling back to `~/.config/stackkit/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .map(|dir| dir.join("stackkit").join("config.toml"))
}

/// Load every layer for a run started in `project_dir`
pub fn load(project_dir: &Path) -> StackkitResult<(Config, Vec<ConfigWarning>)> {
    let mut files = Vec::new();
    if let Some(user) = user_config_path() {
        files.push(user);
    }
    files.push(project_dir.join(PROJECT_CONFIG_FILE));

    load_layers(&files, |key| std::env::var(key).ok())
}

/// Layer command-line `overrides` on top of a loaded config and validate
/// the result, so flags cannot bypass the checks files and env go through.
pub fn apply_overrides(config: Config, overrides: &ConfigOverrides) -> StackkitResult<Config> {
    let config = config.with_overrides(overrides);
    config
        .validate()
        .map_err(|message| StackkitError::InvalidConfig {
            file: PathBuf::from(COMMAND_LINE),
            message,
        })?;
    Ok(config)
}

/// Merge existing `files` in order, then apply environment overrides read
/// through `get_env`. Missing files are skipped.
pub fn load_layers(
    files: &[PathBuf],
    get_env: impl Fn(&str) -> Option<String>,
) -> StackkitResult<(Config, Vec<ConfigWarning>)> {
    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();

    for file in files.iter().filter(|f| f.is_file()) {
        let (table, file_warnings) = read_layer(file)?;
        merge_tables(&mut merged, table);
        warnings.extend(file_warnings);
    }

    let config: Config =
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| StackkitError::InvalidConfig {
                file: files.last().cloned().unwrap_or_default(),
                message: e.to_string(),
            })?;

    let (config, env_warnings) = with_env_overrides(config, get_env);
    warnings.extend(env_warnings);

    config
        .validate()
        .map_err(|message| StackkitError::InvalidConfig {
            file: files.last().cloned().unwrap_or_default(),
            message,
        })?;

    Ok((config, warnings))
}

/// Parse one config file, collecting unknown keys as warnings
fn read_layer(path: &Path) -> StackkitResult<(toml::Table, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    let invalid = |message: String| StackkitError::InvalidConfig {
        file: path.to_path_buf(),
        message,
    };

    // Type-check the layer on its own so errors name the right file
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let _: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| invalid(e.to_string()))?;

    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| invalid(e.to_string()))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning::UnknownKey {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((table, warnings))
}

/// Deep-merge `overlay` into `base`; nested tables merge, everything else
/// is replaced
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Apply `STACKKIT_*` variables (and the standard AWS region variables)
pub fn with_env_overrides(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<ConfigWarning>) {
    let mut warnings = Vec::new();
    let get = |var: &str| get_env(var).filter(|v| !v.trim().is_empty());

    if let Some(region) = get("STACKKIT_REGION")
        .or_else(|| get("AWS_REGION"))
        .or_else(|| get("AWS_DEFAULT_REGION"))
    {
        config.aws.region = region.trim().to_string();
    }
    if let Some(table) = get("STACKKIT_LOCK_TABLE") {
        config.aws.lock_table = table;
    }
    if let Some(table) = get("STACKKIT_STATE_TABLE") {
        config.aws.state_table = table;
    }
    if let Some(bucket) = get("STACKKIT_STATE_BUCKET") {
        config.aws.state_bucket = Some(bucket);
    }
    if let Some(bin) = get("STACKKIT_AWS_BIN") {
        config.aws.binary = PathBuf::from(bin);
    }
    if let Some(dir) = get("STACKKIT_WORKING_DIR") {
        config.terraform.working_dir = PathBuf::from(dir);
    }
    if let Some(bin) = get("STACKKIT_TERRAFORM_BIN") {
        config.terraform.binary = PathBuf::from(bin);
    }

    let positive = |var: &str, warnings: &mut Vec<ConfigWarning>| -> Option<u64> {
        let value = get(var)?;
        match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                warnings.push(ConfigWarning::InvalidEnv {
                    var: var.to_string(),
                    value,
                    expected: "a positive integer",
                });
                None
            }
        }
    };
    if let Some(n) = positive("STACKKIT_LOCK_TIMEOUT_MINUTES", &mut warnings) {
        config.deploy.lock_timeout_minutes = n.min(u32::MAX as u64) as u32;
    }
    if let Some(n) = positive("STACKKIT_BACKUP_RETENTION", &mut warnings) {
        config.deploy.backup_retention = n as usize;
    }
    if let Some(n) = positive("STACKKIT_EVENT_TTL_DAYS", &mut warnings) {
        config.deploy.event_ttl_days = n.min(u32::MAX as u64) as u32;
    }

    if let Some(value) = get("STACKKIT_AUTO_ROLLBACK") {
        match parse_bool(&value) {
            Some(flag) => config.deploy.auto_rollback = flag,
            None => warnings.push(ConfigWarning::InvalidEnv {
                var: "STACKKIT_AUTO_ROLLBACK".to_string(),
                value,
                expected: "true or false",
            }),
        }
    }

    (config, warnings)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "aws",
        "region",
        "lock_table",
        "state_table",
        "state_bucket",
        "binary",
        "deploy",
        "lock_timeout_minutes",
        "backup_retention",
        "event_ttl_days",
        "auto_rollback",
        "status_limit",
        "terraform",
        "working_dir",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, &ac) in a.iter().enumerate() {
        let mut curr = Vec::with_capacity(b.len() + 1);
        curr.push(i + 1);
        for (j, &bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr.push((prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost));
        }
        prev = curr;
    }

    prev[b.len()]
}
