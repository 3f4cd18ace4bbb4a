//! Keyword sets shared by the interpreter rules and the name extractor.
//!
//! Order inside each set matters: when a rule needs "the first keyword that
//! appears", it walks the set in the order written here.

pub(crate) const CREATE: &[&str] = &["set", "create", "make", "start", "begin", "add", "new", "timer"];
pub(crate) const PAUSE: &[&str] = &["pause", "hold", "wait", "suspend", "freeze", "stop"];
pub(crate) const RESUME: &[&str] = &["resume", "continue", "unpause", "restart", "unfreeze", "go"];
pub(crate) const STOP: &[&str] = &["stop", "end", "cancel", "kill", "terminate", "abort"];
pub(crate) const DELETE: &[&str] = &["delete", "remove", "clear", "destroy"];
pub(crate) const LIST: &[&str] = &["list", "show", "display", "view", "what", "status", "timers"];
pub(crate) const REGIMEN: &[&str] = &["regimen", "routine", "sequence", "workout", "program"];

pub(crate) const REGIMEN_RUN: &[&str] = &["run", "start", "execute", "begin"];
pub(crate) const REGIMEN_LIST: &[&str] = &["list", "show"];

pub(crate) const CLEAR_VERBS: &[&str] = &["clear", "delete", "remove"];
pub(crate) const CLEAR_SCOPE: &[&str] = &["all", "everything", "timers"];

pub(crate) const ARTICLES: &[&str] = &["the", "a", "an"];

/// Every spelling of a duration unit, with its length in seconds.
pub(crate) const UNITS: &[(&str, u64)] = &[
    ("second", 1),
    ("seconds", 1),
    ("sec", 1),
    ("secs", 1),
    ("s", 1),
    ("minute", 60),
    ("minutes", 60),
    ("min", 60),
    ("mins", 60),
    ("m", 60),
    ("hour", 3600),
    ("hours", 3600),
    ("hr", 3600),
    ("hrs", 3600),
    ("h", 3600),
];

/// First keyword of `set` that occurs anywhere in `text` (substring match).
pub(crate) fn first_present<'a>(text: &str, set: &[&'a str]) -> Option<&'a str> {
    set.iter().copied().find(|kw| text.contains(kw))
}

pub(crate) fn any_present(text: &str, set: &[&str]) -> bool {
    first_present(text, set).is_some()
}

pub(crate) fn unit_seconds(unit: &str) -> Option<u64> {
    UNITS
        .iter()
        .find(|(spelling, _)| *spelling == unit)
        .map(|(_, secs)| *secs)
}

/// Strip one leading article followed by whitespace.
pub(crate) fn strip_leading_article(text: &str) -> &str {
    for article in ARTICLES {
        if let Some(rest) = text.strip_prefix(article) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    text
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
