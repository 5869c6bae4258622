//! Placeholder substitution supplied by the host.

use std::collections::HashMap;

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Passes made by [`resolve_all`] unless configured otherwise.
pub const DEFAULT_MAX_PASSES: usize = 10;

static PERCENT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([^%\s]+)%").expect("valid percent token pattern"));
static BRACE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}\s]+)\}").expect("valid brace token pattern"));
static SIMPLE_BRACE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_:\-]+)\}").expect("valid brace token pattern"));

/// One expansion pass over `%token%` and `{token}` placeholders.
///
/// Unknown tokens must be left untouched so the caller can detect a fixed
/// point.
pub trait Placeholders {
    fn resolve(&self, text: &str) -> String;
}

/// Host without a placeholder service; every pass is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlaceholders;

impl Placeholders for NoPlaceholders {
    fn resolve(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Fixed token table, used by the command-line front end and in tests.
#[derive(Debug, Clone, Default)]
pub struct MapPlaceholders {
    values: HashMap<String, String>,
}

impl MapPlaceholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(token, value);
        self
    }

    pub fn set(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    fn replace(&self, pattern: &Regex, text: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Placeholders for MapPlaceholders {
    fn resolve(&self, text: &str) -> String {
        let text = self.replace(&BRACE_TOKEN, text);
        self.replace(&PERCENT_TOKEN, &text)
    }
}

/// Applies `placeholders` until the text stops changing or `max_passes`
/// passes have run.
pub fn resolve_all<P: Placeholders + ?Sized>(
    placeholders: &P,
    text: &str,
    max_passes: usize,
) -> String {
    let mut current = text.to_string();
    for _ in 0..max_passes.max(1) {
        let next = placeholders.resolve(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    trace!("placeholder expansion still changing after {max_passes} passes: {current}");
    current
}

/// Rewrites `{name}` tokens as `%name%` so a percent-only expander sees them.
pub fn brace_tokens_to_percent(text: &str) -> String {
    SIMPLE_BRACE_TOKEN.replace_all(text, "%$1%").into_owned()
}
