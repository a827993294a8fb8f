// src/config/loader.rs
//! Layered configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, each existing file in
//! `config_paths` (TOML, or JSON when the extension says so), then
//! `PREPROCESS_*` environment variables. The merged result is validated
//! before it is handed out.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::constants::paths;
use crate::config::PreprocessingConfig;
use crate::error::PreprocessError;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("configuration parse error in {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("configuration serialization error: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Invalid(#[from] PreprocessError),
}

impl ConfigError {
    fn parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::Parse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(paths::JSON_EXTENSION) => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }
}

/// Loads [`PreprocessingConfig`] from defaults, files and the environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader over the default search path (`./preprocess.toml`)
    pub fn new() -> Self {
        Self {
            config_paths: vec![PathBuf::from(paths::LOCAL_CONFIG_FILE)],
        }
    }

    /// Loader over custom paths; later paths override earlier ones
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { config_paths: paths }
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Merge every layer, overriding from the process environment.
    ///
    /// Variables whose name or value is not valid Unicode are ignored.
    pub fn load(&self) -> Result<PreprocessingConfig, ConfigError> {
        self.load_with_overrides(unicode_env_vars())
    }

    /// Merge every layer, overriding from `vars` instead of the process environment
    pub fn load_with_overrides<I>(&self, vars: I) -> Result<PreprocessingConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = toml::Value::try_from(PreprocessingConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        for path in &self.config_paths {
            if !path.exists() {
                debug!(path = %path.display(), "skipping missing configuration file");
                continue;
            }
            let layer = read_value(path)?;
            merge_values(&mut merged, layer);
            info!(path = %path.display(), "merged configuration file");
        }

        apply_environment_overrides(&mut merged, vars);

        let config: PreprocessingConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::parse("merged configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<PreprocessingConfig, ConfigError> {
        let config: PreprocessingConfig =
            toml::from_str(content).map_err(|e| ConfigError::parse("<string>", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a single file, without environment overrides
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<PreprocessingConfig, ConfigError> {
        let path = path.as_ref();
        let config: PreprocessingConfig = read_value(path)?
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::parse(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(config: &PreprocessingConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write `config` to `path`, as JSON when the extension is `.json`
    pub fn save_file<P: AsRef<Path>>(config: &PreprocessingConfig, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match FileFormat::of(path) {
            FileFormat::Toml => Self::to_toml_string(config)?,
            FileFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, content).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to write configuration");
            ConfigError::Io(e)
        })?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn unicode_env_vars() -> impl Iterator<Item = (String, String)> {
    unicode_pairs(std::env::vars_os())
}

fn unicode_pairs<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

fn read_value(path: &Path) -> Result<toml::Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let source_name = path.display().to_string();
    match FileFormat::of(path) {
        FileFormat::Toml => toml::from_str(&content).map_err(|e| ConfigError::parse(source_name, e)),
        FileFormat::Json => {
            serde_json::from_str(&content).map_err(|e| ConfigError::parse(source_name, e))
        }
    }
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base_value, overlay_value) => *base_value = overlay_value,
    }
}

/// `PREPROCESS_N_WORKERS=8` overrides `n_workers`
fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let toml::Value::Table(table) = config else {
        return;
    };

    for (key, value) in vars {
        if let Some(field) = key.strip_prefix(paths::ENV_PREFIX) {
            let field = field.to_lowercase();
            debug!(field = %field, "applying environment override");
            table.insert(field, parse_env_value(&value));
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizationMethod;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults_when_no_files_exist() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/preprocess.toml")]);
        let config = loader.load_with_overrides(no_env()).unwrap();
        assert_eq!(config, PreprocessingConfig::default());
    }

    #[test]
    fn test_file_layers_override_in_order() {
        let mut first = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(first, "wavelet_name = \"sym4\"\nn_workers = 2").unwrap();
        let mut second = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(second, "n_workers = 6").unwrap();

        let loader = ConfigLoader::with_paths(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let config = loader.load_with_overrides(no_env()).unwrap();

        assert_eq!(config.wavelet_name, "sym4");
        assert_eq!(config.n_workers, 6);
        assert_eq!(config.decomposition_level, 4);
    }

    #[test]
    fn test_environment_override() {
        let loader = ConfigLoader::with_paths(Vec::new());
        let vars = vec![
            ("PREPROCESS_N_WORKERS".to_string(), "8".to_string()),
            ("PREPROCESS_SNR_THRESHOLD".to_string(), "15".to_string()),
            ("PREPROCESS_NORMALIZATION_METHOD".to_string(), "robust".to_string()),
            ("PREPROCESS_USE_PARALLEL".to_string(), "false".to_string()),
            ("UNRELATED_N_WORKERS".to_string(), "99".to_string()),
        ];

        let config = loader.load_with_overrides(vars).unwrap();
        assert_eq!(config.n_workers, 8);
        assert_eq!(config.snr_threshold, 15.0);
        assert_eq!(config.normalization_method, NormalizationMethod::Robust);
        assert!(!config.use_parallel);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_environment_entries_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let entries = vec![
            (OsString::from("PREPROCESS_N_WORKERS"), OsString::from("5")),
            (OsString::from_vec(vec![0x50, 0xff, 0xfe]), OsString::from("1")),
            (OsString::from("PREPROCESS_BATCH_SIZE"), OsString::from_vec(vec![0xc3, 0x28])),
        ];
        let vars: Vec<(String, String)> = unicode_pairs(entries).collect();
        assert_eq!(vars, vec![("PREPROCESS_N_WORKERS".to_string(), "5".to_string())]);

        let config = ConfigLoader::with_paths(Vec::new()).load_with_overrides(vars).unwrap();
        assert_eq!(config.n_workers, 5);
        assert_eq!(config.batch_size, PreprocessingConfig::default().batch_size);
    }

    #[test]
    fn test_merged_config_is_validated() {
        let loader = ConfigLoader::with_paths(Vec::new());
        let vars = vec![("PREPROCESS_DECOMPOSITION_LEVEL".to_string(), "0".to_string())];

        match loader.load_with_overrides(vars) {
            Err(ConfigError::Invalid(err)) => assert!(err.is_config()),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_toml_str() {
        let config = ConfigLoader::from_toml_str(
            r#"
snr_threshold = 6.5
wavelet_name = "haar"
normalization_method = "minmax"
"#,
        )
        .unwrap();
        assert_eq!(config.snr_threshold, 6.5);
        assert_eq!(config.wavelet_name, "haar");
        assert_eq!(config.normalization_method, NormalizationMethod::MinMax);

        assert!(matches!(
            ConfigLoader::from_toml_str("snr_threshold = -3.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ConfigLoader::from_toml_str("normalization_method = \"zscore\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_toml_file_round_trip() {
        let config = PreprocessingConfig {
            wavelet_name: "db2".to_string(),
            decomposition_level: 2,
            normalization_method: NormalizationMethod::Robust,
            ..Default::default()
        };
        let file = Builder::new().suffix(".toml").tempfile().unwrap();

        ConfigLoader::save_file(&config, file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("wavelet_name = \"db2\""));

        assert_eq!(ConfigLoader::load_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_json_file_round_trip() {
        let config = PreprocessingConfig {
            n_workers: 3,
            use_parallel: false,
            ..Default::default()
        };
        let file = Builder::new().suffix(".json").tempfile().unwrap();

        ConfigLoader::save_file(&config, file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("\"n_workers\": 3"));

        assert_eq!(ConfigLoader::load_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/preprocess.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "snr_threshold = = 3").unwrap();
        assert!(matches!(
            ConfigLoader::load_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_default_search_path() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.config_paths(), &[PathBuf::from(paths::LOCAL_CONFIG_FILE)]);
    }
}
