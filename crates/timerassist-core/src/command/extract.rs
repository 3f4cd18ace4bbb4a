//! Duration and timer-name extraction from free text.
//!
//! Duration parsing runs through four tiers and stops at the first tier that
//! produces at least one match:
//!
//! 1. `<digits><unit>` tokens ending on a word boundary, scanned globally.
//! 2. `<digits><unit>` per unit class, without the trailing boundary.
//! 3. Spelled-out numbers ("five", "twenty-one", "sixty") followed by a unit.
//! 4. The first bare integer, read as minutes.
//!
//! Matches inside the winning tier are summed ("1 hour and 30 minutes" is
//! 5400 seconds); tiers are never combined.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::keywords::{self, collapse_whitespace, strip_leading_article, unit_seconds};

static COMBINED_UNITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*([hms]|hours?|minutes?|seconds?|hrs?|mins?|secs?)\b").unwrap()
});

static UNIT_CLASSES: Lazy<Vec<(Regex, u64)>> = Lazy::new(|| {
    [
        (r"hours?", 3600),
        (r"hrs?", 3600),
        (r"h\b", 3600),
        (r"minutes?", 60),
        (r"mins?", 60),
        (r"m\b", 60),
        (r"seconds?", 1),
        (r"secs?", 1),
        (r"s\b", 1),
    ]
    .into_iter()
    .map(|(unit, secs)| (Regex::new(&format!(r"(\d+)\s*({unit})")).unwrap(), secs))
    .collect()
});

static WORD_UNITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z]+(?:-[a-z]+)?)\s*(hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)\b")
        .unwrap()
});

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").unwrap());

static WORD_NUMBERS: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    HashMap::from([
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("thirteen", 13),
        ("fourteen", 14),
        ("fifteen", 15),
        ("sixteen", 16),
        ("seventeen", 17),
        ("eighteen", 18),
        ("nineteen", 19),
        ("twenty", 20),
        ("twenty-one", 21),
        ("twenty-two", 22),
        ("twenty-three", 23),
        ("twenty-four", 24),
        ("twenty-five", 25),
        ("thirty", 30),
        ("forty", 40),
        ("fifty", 50),
        ("sixty", 60),
    ])
});

static NAMING_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["called", "named", "for", "label", "titled"]
        .into_iter()
        .map(|prefix| {
            Regex::new(&format!(
                r"(?i)\b{prefix}\s+(.+?)(?:\s+(?:timer|for|and|$)|$)"
            ))
            .unwrap()
        })
        .collect()
});

static LEADING_ARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(the|a|an)\s+").unwrap());
static FILLER_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(timer|for)\b").unwrap());

/// The outcome of duration parsing: total seconds plus the substrings of the
/// winning tier, in match order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMatch {
    pub seconds: u64,
    pub spans: Vec<String>,
}

impl DurationMatch {
    fn accumulate(&mut self, span: &str, secs: u64) {
        self.seconds = self.seconds.saturating_add(secs);
        self.spans.push(span.to_string());
    }

    fn found(&self) -> bool {
        !self.spans.is_empty()
    }
}

/// Parse a duration in seconds, or `None` when the text names no time.
pub fn extract_duration(text: &str) -> Option<u64> {
    extract_duration_match(text).map(|m| m.seconds)
}

/// Like [`extract_duration`] but also reports the matched substrings.
pub fn extract_duration_match(text: &str) -> Option<DurationMatch> {
    let text = text.trim().to_lowercase();
    let tiers: [fn(&str) -> DurationMatch; 4] =
        [combined_units, unit_classes, word_numbers, bare_number];

    tiers
        .into_iter()
        .map(|tier| tier(&text))
        .find(DurationMatch::found)
}

fn parse_count(digits: &str) -> u64 {
    // Absurdly long digit runs saturate instead of failing the whole parse.
    digits.parse().unwrap_or(u64::MAX)
}

fn combined_units(text: &str) -> DurationMatch {
    let mut found = DurationMatch { seconds: 0, spans: Vec::new() };
    for caps in COMBINED_UNITS.captures_iter(text) {
        let value = parse_count(&caps[1]);
        let unit = unit_seconds(&caps[2]).unwrap_or(0);
        found.accumulate(&caps[0], value.saturating_mul(unit));
    }
    found
}

fn unit_classes(text: &str) -> DurationMatch {
    let mut found = DurationMatch { seconds: 0, spans: Vec::new() };
    // `10min` satisfies both `minutes?` and `mins?`; count each number once.
    let mut counted = HashSet::new();
    for (re, unit) in UNIT_CLASSES.iter() {
        for caps in re.captures_iter(text) {
            let number = caps.get(1).map_or(0, |m| m.start());
            if !counted.insert(number) {
                continue;
            }
            let value = parse_count(&caps[1]);
            found.accumulate(&caps[0], value.saturating_mul(*unit));
        }
    }
    found
}

fn word_numbers(text: &str) -> DurationMatch {
    let mut found = DurationMatch { seconds: 0, spans: Vec::new() };
    for caps in WORD_UNITS.captures_iter(text) {
        let Some(value) = WORD_NUMBERS.get(&caps[1]) else {
            continue;
        };
        let unit = unit_seconds(&caps[2]).unwrap_or(0);
        found.accumulate(&caps[0], value * unit);
    }
    found
}

fn bare_number(text: &str) -> DurationMatch {
    let mut found = DurationMatch { seconds: 0, spans: Vec::new() };
    if let Some(caps) = BARE_NUMBER.captures(text) {
        found.accumulate(&caps[0], parse_count(&caps[1]).saturating_mul(60));
    }
    found
}

/// Derive a timer label from `text` once the duration substrings are removed.
///
/// Explicit naming phrases ("called", "named", "for", "label", "titled")
/// win; otherwise every word that is not a unit, a command keyword, an
/// article or filler is kept. Falls back to `"timer"`.
pub fn extract_timer_name(text: &str, duration_spans: &[String]) -> String {
    let mut remaining = text.to_string();
    for span in duration_spans {
        remaining = remaining.replacen(span.as_str(), " ", 1);
    }
    let remaining = remaining.trim();

    for phrase in NAMING_PHRASES.iter() {
        let Some(caps) = phrase.captures(remaining) else {
            continue;
        };
        let name = LEADING_ARTICLE.replace(caps[1].trim(), "");
        let name = FILLER_WORDS.replace_all(&name, "");
        let name = collapse_whitespace(&name);
        if !name.is_empty() {
            return name;
        }
    }

    let words: Vec<&str> = remaining
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .collect();
    if words.is_empty() {
        "timer".to_string()
    } else {
        words.join(" ")
    }
}

fn is_stop_word(word: &str) -> bool {
    let word = word.to_lowercase();
    let word = word.as_str();
    unit_seconds(word).is_some()
        || [
            keywords::CREATE,
            keywords::PAUSE,
            keywords::RESUME,
            keywords::STOP,
            keywords::LIST,
            &["a", "an", "the", "timer", "for", "called", "named", "set"][..],
        ]
        .iter()
        .any(|set| set.contains(&word))
}

/// Remove every `timer` substring, strip a leading article, tidy spacing.
pub(crate) fn clean_target_name(text: &str) -> String {
    let name = strip_leading_article(text.trim());
    collapse_whitespace(&name.replace("timer", ""))
}
