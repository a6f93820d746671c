use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Wire dialect spoken by the downstream peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Single timeout kind per call, flat window/screenshot endpoints.
    Legacy,
    /// Multi-kind timeout bodies, nested window/screenshot endpoints.
    Consolidated,
    /// Not negotiated yet; every request is forwarded as-is.
    #[default]
    Unset,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Legacy => "legacy",
            Dialect::Consolidated => "consolidated",
            Dialect::Unset => "unset",
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Dialect::Unset)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dialect '{}'", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Dialect::Legacy),
            "consolidated" => Ok(Dialect::Consolidated),
            "unset" | "" => Ok(Dialect::Unset),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

/// Active downstream dialect for one converter instance.
///
/// Writes are unvalidated and readers always see the latest value; nothing is
/// derived from it or cached.
#[derive(Debug, Default)]
pub struct DialectState {
    current: RwLock<Dialect>,
}

impl DialectState {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            current: RwLock::new(dialect),
        }
    }

    pub fn get(&self) -> Dialect {
        *self.current.read()
    }

    pub fn set(&self, dialect: Dialect) {
        *self.current.write() = dialect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unset() {
        let state = DialectState::default();
        assert_eq!(state.get(), Dialect::Unset);
        assert!(!state.get().is_set());
    }

    #[test]
    fn set_accepts_any_value_including_repeats() {
        let state = DialectState::default();
        state.set(Dialect::Legacy);
        state.set(Dialect::Legacy);
        assert_eq!(state.get(), Dialect::Legacy);
        state.set(Dialect::Unset);
        assert_eq!(state.get(), Dialect::Unset);
    }

    #[test]
    fn parses_and_serializes_names() {
        assert_eq!("consolidated".parse::<Dialect>(), Ok(Dialect::Consolidated));
        assert!("w4c".parse::<Dialect>().is_err());
        assert_eq!(
            serde_json::to_string(&Dialect::Legacy).unwrap(),
            "\"legacy\""
        );
        assert_eq!(Dialect::Consolidated.to_string(), "consolidated");
    }
}
