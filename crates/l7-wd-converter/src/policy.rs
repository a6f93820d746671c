use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterPolicy {
    /// When false every command is forwarded untouched, whatever the dialect.
    pub enabled: bool,
    /// Dialect assumed until the session negotiation reports the real one.
    pub dialect: Dialect,
}

impl Default for ConverterPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            dialect: Dialect::Unset,
        }
    }
}

impl ConverterPolicy {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let policy = ConverterPolicy::from_json_str("{}").unwrap();
        assert_eq!(policy, ConverterPolicy::default());
        assert!(policy.enabled);
    }

    #[test]
    fn reads_dialect_and_switch() {
        let policy =
            ConverterPolicy::from_json_str(r#"{"enabled": false, "dialect": "legacy"}"#).unwrap();
        assert!(!policy.enabled);
        assert_eq!(policy.dialect, Dialect::Legacy);
    }

    #[test]
    fn rejects_unknown_dialects() {
        assert!(ConverterPolicy::from_json_str(r#"{"dialect": "w4c"}"#).is_err());
    }
}
