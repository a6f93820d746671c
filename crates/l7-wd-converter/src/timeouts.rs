//! Splitting and merging of timeout bodies between the two dialects.
//!
//! The consolidated dialect carries several timeout kinds in one object
//! (`{"script": 1000, "pageLoad": 3000}`); the legacy dialect takes exactly one
//! kind per call (`{"type": "page load", "ms": 3000}`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::dialect::Dialect;

const LEGACY_PAGE_LOAD: &str = "page load";
const CONSOLIDATED_PAGE_LOAD: &str = "pageLoad";

const TYPE_KEY: &str = "type";
const MS_KEY: &str = "ms";

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d*)?$").expect("duration regex"));

pub fn to_consolidated_kind(kind: &str) -> &str {
    if kind == LEGACY_PAGE_LOAD {
        CONSOLIDATED_PAGE_LOAD
    } else {
        kind
    }
}

pub fn to_legacy_kind(kind: &str) -> &str {
    if kind == CONSOLIDATED_PAGE_LOAD {
        LEGACY_PAGE_LOAD
    } else {
        kind
    }
}

/// True for bodies of the form `{"type": .., "ms": ..}`.
pub fn is_single_shape(body: &Value) -> bool {
    body.as_object()
        .map(|map| map.contains_key(TYPE_KEY) && map.contains_key(MS_KEY))
        .unwrap_or(false)
}

/// Unsigned integer or decimal, `.` or `,` as separator.
pub fn is_duration(value: &Value) -> bool {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    DURATION_RE.is_match(&text)
}

/// How a timeout update reaches the downstream peer.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeoutPlan {
    /// The body already fits the target dialect; send it as received.
    Forward,
    /// Send these bodies one after another. May be empty when a legacy target
    /// receives a body without a single numeric entry.
    Sequence(Vec<Value>),
}

pub fn plan(body: &Value, dialect: Dialect) -> TimeoutPlan {
    match dialect {
        Dialect::Consolidated if is_single_shape(body) => {
            let kind = match &body[TYPE_KEY] {
                Value::String(kind) => kind.clone(),
                other => other.to_string(),
            };
            let mut merged = Map::new();
            merged.insert(
                to_consolidated_kind(&kind).to_string(),
                body[MS_KEY].clone(),
            );
            TimeoutPlan::Sequence(vec![Value::Object(merged)])
        }
        Dialect::Legacy if !is_single_shape(body) => {
            let requests: Vec<Value> = body
                .as_object()
                .map(|map| {
                    map.iter()
                        .filter(|(_, value)| is_duration(value))
                        .map(|(kind, value)| {
                            let mut single = Map::new();
                            single.insert(TYPE_KEY.into(), Value::from(to_legacy_kind(kind)));
                            single.insert(MS_KEY.into(), value.clone());
                            Value::Object(single)
                        })
                        .collect()
                })
                .unwrap_or_default();
            TimeoutPlan::Sequence(requests)
        }
        _ => TimeoutPlan::Forward,
    }
}
