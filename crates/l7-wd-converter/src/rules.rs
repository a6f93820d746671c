//! URL rewrite table for commands whose endpoint path differs between dialects.
//!
//! Every direction is a capturing match against the shape it rewrites from:
//! `None` means the URL is not in that shape and the rule does not apply.

use once_cell::sync::Lazy;
use regex::{escape, Regex};

use crate::dialect::Dialect;

const LEGACY_EXECUTE: &str = "/execute";
const LEGACY_EXECUTE_ASYNC: &str = "/execute_async";
const CONSOLIDATED_EXECUTE_SYNC: &str = "/execute/sync";
const CONSOLIDATED_EXECUTE_ASYNC: &str = "/execute/async";

const LEGACY_WINDOW_HANDLE: &str = "/window_handle";
const LEGACY_WINDOW_HANDLES: &str = "/window_handles";
const CONSOLIDATED_WINDOW: &str = "/window";
const CONSOLIDATED_WINDOW_HANDLES: &str = "/window/handles";

const ELEMENT: &str = "/element";
const SCREENSHOT: &str = "/screenshot";
const PROPERTY: &str = "/property";
const ATTRIBUTE: &str = "/attribute";

static LEGACY_EXECUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*)(?:{}|{})$",
        escape(LEGACY_EXECUTE_ASYNC),
        escape(LEGACY_EXECUTE)
    ))
    .expect("legacy execute regex")
});
static CONSOLIDATED_EXECUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*)(?:{}|{})$",
        escape(CONSOLIDATED_EXECUTE_SYNC),
        escape(CONSOLIDATED_EXECUTE_ASYNC)
    ))
    .expect("consolidated execute regex")
});
static LEGACY_SCREENSHOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*){}/(?P<id>[^/]+){}$",
        escape(ELEMENT),
        escape(SCREENSHOT)
    ))
    .expect("legacy screenshot regex")
});
static CONSOLIDATED_SCREENSHOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?P<base>.*){}/(?P<id>[^/]+)$", escape(SCREENSHOT)))
        .expect("consolidated screenshot regex")
});
static LEGACY_WINDOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*)(?:(?P<plural>{})|{})$",
        escape(LEGACY_WINDOW_HANDLES),
        escape(LEGACY_WINDOW_HANDLE)
    ))
    .expect("legacy window regex")
});
static CONSOLIDATED_WINDOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*)(?:(?P<plural>{})|{})$",
        escape(CONSOLIDATED_WINDOW_HANDLES),
        escape(CONSOLIDATED_WINDOW)
    ))
    .expect("consolidated window regex")
});
static PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?P<base>.*){}/(?P<id>[^/]+){}/(?P<name>[^/]+)$",
        escape(ELEMENT),
        escape(PROPERTY)
    ))
    .expect("property regex")
});

/// Commands whose downstream URL depends on the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteCommand {
    Execute,
    ExecuteAsync,
    GetElementScreenshot,
    GetWindowHandle,
    GetWindowHandles,
    GetProperty,
}

impl RewriteCommand {
    pub const ALL: [RewriteCommand; 6] = [
        RewriteCommand::Execute,
        RewriteCommand::ExecuteAsync,
        RewriteCommand::GetElementScreenshot,
        RewriteCommand::GetWindowHandle,
        RewriteCommand::GetWindowHandles,
        RewriteCommand::GetProperty,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RewriteCommand::Execute => "execute",
            RewriteCommand::ExecuteAsync => "executeAsync",
            RewriteCommand::GetElementScreenshot => "getElementScreenshot",
            RewriteCommand::GetWindowHandle => "getWindowHandle",
            RewriteCommand::GetWindowHandles => "getWindowHandles",
            RewriteCommand::GetProperty => "getProperty",
        }
    }
}

pub type UrlTransform = fn(&str) -> Option<String>;

pub struct RewriteRule {
    pub commands: &'static [RewriteCommand],
    pub to_legacy: UrlTransform,
    pub to_consolidated: UrlTransform,
}

impl RewriteRule {
    /// Rewrites `url` into the shape expected by `dialect`.
    ///
    /// Returns `None` when the dialect is unset, the URL is not in the opposite
    /// dialect's shape, or the rewrite would not change the text.
    pub fn rewrite(&self, url: &str, dialect: Dialect) -> Option<String> {
        let transform = match dialect {
            Dialect::Legacy => self.to_legacy,
            Dialect::Consolidated => self.to_consolidated,
            Dialect::Unset => return None,
        };
        transform(url).filter(|rewritten| rewritten != url)
    }
}

/// The table is partitioned: a command appears in at most one rule.
pub static REWRITE_RULES: [RewriteRule; 4] = [
    RewriteRule {
        commands: &[RewriteCommand::Execute, RewriteCommand::ExecuteAsync],
        to_legacy: execute_to_legacy,
        to_consolidated: execute_to_consolidated,
    },
    RewriteRule {
        commands: &[RewriteCommand::GetElementScreenshot],
        to_legacy: screenshot_to_legacy,
        to_consolidated: screenshot_to_consolidated,
    },
    RewriteRule {
        commands: &[
            RewriteCommand::GetWindowHandle,
            RewriteCommand::GetWindowHandles,
        ],
        to_legacy: window_to_legacy,
        to_consolidated: window_to_consolidated,
    },
    RewriteRule {
        commands: &[RewriteCommand::GetProperty],
        to_legacy: property_to_legacy,
        to_consolidated: never,
    },
];

pub fn lookup(command_name: &str) -> Option<&'static RewriteRule> {
    let command = RewriteCommand::from_name(command_name)?;
    REWRITE_RULES
        .iter()
        .find(|rule| rule.commands.contains(&command))
}

// The async flavour is picked from the whole URL text, not just the suffix.
fn is_async(url: &str) -> bool {
    url.contains("async")
}

fn execute_to_legacy(url: &str) -> Option<String> {
    let caps = CONSOLIDATED_EXECUTE_RE.captures(url)?;
    let suffix = if is_async(url) {
        LEGACY_EXECUTE_ASYNC
    } else {
        LEGACY_EXECUTE
    };
    Some(format!("{}{}", &caps["base"], suffix))
}

fn execute_to_consolidated(url: &str) -> Option<String> {
    let caps = LEGACY_EXECUTE_RE.captures(url)?;
    let suffix = if is_async(url) {
        CONSOLIDATED_EXECUTE_ASYNC
    } else {
        CONSOLIDATED_EXECUTE_SYNC
    };
    Some(format!("{}{}", &caps["base"], suffix))
}

fn screenshot_to_legacy(url: &str) -> Option<String> {
    let caps = CONSOLIDATED_SCREENSHOT_RE.captures(url)?;
    Some(format!(
        "{}{}/{}{}",
        &caps["base"], ELEMENT, &caps["id"], SCREENSHOT
    ))
}

fn screenshot_to_consolidated(url: &str) -> Option<String> {
    let caps = LEGACY_SCREENSHOT_RE.captures(url)?;
    Some(format!("{}{}/{}", &caps["base"], SCREENSHOT, &caps["id"]))
}

fn window_to_legacy(url: &str) -> Option<String> {
    let caps = CONSOLIDATED_WINDOW_RE.captures(url)?;
    let suffix = if caps.name("plural").is_some() {
        LEGACY_WINDOW_HANDLES
    } else {
        LEGACY_WINDOW_HANDLE
    };
    Some(format!("{}{}", &caps["base"], suffix))
}

fn window_to_consolidated(url: &str) -> Option<String> {
    let caps = LEGACY_WINDOW_RE.captures(url)?;
    let suffix = if caps.name("plural").is_some() {
        CONSOLIDATED_WINDOW_HANDLES
    } else {
        CONSOLIDATED_WINDOW
    };
    Some(format!("{}{}", &caps["base"], suffix))
}

fn property_to_legacy(url: &str) -> Option<String> {
    let caps = PROPERTY_RE.captures(url)?;
    Some(format!(
        "{}{}/{}{}/{}",
        &caps["base"], ELEMENT, &caps["id"], ATTRIBUTE, &caps["name"]
    ))
}

fn never(_url: &str) -> Option<String> {
    None
}
