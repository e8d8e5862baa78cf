use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// baremos: /srv/oposiciones/baremos.json
/// history: ~/notas/history.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the reference tables JSON (default: ~/.config/baremo/baremos.json)
    #[serde(default)]
    pub baremos: Option<PathBuf>,

    /// Path to the evaluation history (default: ~/.config/baremo/history.json)
    #[serde(default)]
    pub history: Option<PathBuf>,
}

impl Config {
    pub fn baremos_path(&self) -> PathBuf {
        self.baremos
            .as_deref()
            .map(super::expand_home)
            .unwrap_or_else(|| super::get_config_dir().join("baremos.json"))
    }

    pub fn history_path(&self) -> PathBuf {
        self.history
            .as_deref()
            .map(super::expand_home)
            .unwrap_or_else(|| super::get_config_dir().join("history.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.baremos_path().ends_with("baremo/baremos.json"));
        assert!(config.history_path().ends_with("baremo/history.json"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
baremos: /srv/baremos.json
history: /tmp/history.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.baremos_path(), PathBuf::from("/srv/baremos.json"));
        assert_eq!(config.history_path(), PathBuf::from("/tmp/history.json"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "queries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config {
            baremos: Some(PathBuf::from("/a/b.json")),
            history: None,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
