//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TlogConfig;
use std::path::Path;

/// Name of the configuration file looked up in the intermediate directory.
pub const CONFIG_FILE: &str = "tlog.toml";

/// Loads `<dir>/tlog.toml`, or the defaults when the file does not exist.
pub fn load_config(dir: &Path) -> Result<TlogConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        let config = TlogConfig::default();
        validate_config(&config)?;
        return Ok(config);
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
///
/// Unlike [`load_config`], a missing file is an error.
pub fn load_config_file(path: &Path) -> Result<TlogConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tlog.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TlogConfig, ConfigError> {
    let config: TlogConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that the log component can be used as a file stem.
fn validate_config(config: &TlogConfig) -> Result<(), ConfigError> {
    let component = &config.log.component;
    if component.trim().is_empty() {
        return Err(ConfigError::MissingField("log.component".to_string()));
    }
    if component.contains(['/', '\\']) || component == "." || component == ".." {
        return Err(ConfigError::ValidationError(format!(
            "log.component '{component}' must be a plain file name"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PathCase, TextEncoding, DEFAULT_COMPONENT};

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.log.component, DEFAULT_COMPONENT);
        assert_eq!(config.log.encoding, TextEncoding::Utf16Le);
        assert_eq!(config.log.path_case, PathCase::Preserve);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[log]
component = "CTC"
encoding = "utf-8"
path_case = "upper"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.log.component, "CTC");
        assert_eq!(config.log.encoding, TextEncoding::Utf8);
        assert_eq!(config.log.path_case, PathCase::Upper);
    }

    #[test]
    fn encoding_aliases() {
        let config = load_config_from_str("[log]\nencoding = \"utf-16\"\n").unwrap();
        assert_eq!(config.log.encoding, TextEncoding::Utf16Le);
        let config = load_config_from_str("[log]\nencoding = \"utf8\"\n").unwrap();
        assert_eq!(config.log.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn unknown_encoding_is_parse_error() {
        let err = load_config_from_str("[log]\nencoding = \"latin1\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_component_rejected() {
        let err = load_config_from_str("[log]\ncomponent = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn component_with_separator_rejected() {
        let err = load_config_from_str("[log]\ncomponent = \"a/b\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[log]\ncomponent = \"Menus\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.log.component, "Menus");
    }

    #[test]
    fn missing_file_in_directory_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.log.component, DEFAULT_COMPONENT);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
