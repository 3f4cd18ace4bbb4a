//! Rule-based intent classification.
//!
//! Keyword sets overlap ("stop" is both a pause and a stop keyword, "timers"
//! is both a list keyword and a clear-all scope word), so the rules are an
//! explicit ordered table and the first rule that produces a command wins.
//! A rule whose predicate matches may still decline, in which case the next
//! rule is tried.
//!
//! ```text
//! list -> regimen -> clear_all -> delete -> pause -> resume -> stop -> create
//! ```

use super::extract::{clean_target_name, extract_duration_match, extract_timer_name};
use super::keywords::{
    self, any_present, collapse_whitespace, first_present, strip_leading_article, ARTICLES,
    REGIMEN, REGIMEN_RUN,
};
use super::Command;

/// One entry of the classification table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str) -> Option<Command>,
}

impl Rule {
    /// Run this rule alone against already-normalized text.
    pub fn apply(&self, text: &str) -> Option<Command> {
        if (self.matches)(text) {
            (self.build)(text)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

const RULES: &[Rule] = &[
    Rule {
        name: "list",
        matches: |text| any_present(text, keywords::LIST),
        build: |_| Some(Command::List),
    },
    Rule {
        name: "regimen",
        matches: |text| any_present(text, REGIMEN),
        build: build_regimen,
    },
    Rule {
        name: "clear_all",
        matches: |text| {
            any_present(text, keywords::CLEAR_VERBS) && any_present(text, keywords::CLEAR_SCOPE)
        },
        build: |_| Some(Command::ClearAll),
    },
    Rule {
        name: "delete",
        matches: |text| any_present(text, keywords::DELETE),
        build: |text| {
            Some(Command::Delete {
                name: target_name(text, keywords::DELETE),
            })
        },
    },
    Rule {
        name: "pause",
        matches: |text| any_present(text, keywords::PAUSE),
        build: |text| {
            Some(Command::Pause {
                name: target_name(text, keywords::PAUSE),
            })
        },
    },
    Rule {
        name: "resume",
        matches: |text| any_present(text, keywords::RESUME),
        build: |text| {
            Some(Command::Resume {
                name: target_name(text, keywords::RESUME),
            })
        },
    },
    Rule {
        name: "stop",
        matches: |text| any_present(text, keywords::STOP),
        build: |text| {
            Some(Command::Stop {
                name: target_name(text, keywords::STOP),
            })
        },
    },
    Rule {
        name: "create",
        matches: |_| true,
        build: build_create,
    },
];

/// Classifies free text into [`Command`]s.
#[derive(Debug, Clone, Copy)]
pub struct CommandInterpreter {
    rules: &'static [Rule],
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// The classification table, in precedence order.
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Classify `text`; `None` means the text was not understood.
    pub fn interpret(&self, text: &str) -> Option<Command> {
        self.explain(text).map(|(_, command)| command)
    }

    /// Classify `text` and report which rule produced the command.
    pub fn explain(&self, text: &str) -> Option<(&'static str, Command)> {
        let text = text.trim().to_lowercase();
        self.rules
            .iter()
            .find_map(|rule| rule.apply(&text).map(|command| (rule.name, command)))
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn build_regimen(text: &str) -> Option<Command> {
    if any_present(text, REGIMEN_RUN) {
        Some(Command::RunRegimen {
            name: regimen_name(text),
        })
    } else if any_present(text, keywords::REGIMEN_LIST) {
        Some(Command::ListRegimens)
    } else {
        None
    }
}

fn build_create(text: &str) -> Option<Command> {
    let found = extract_duration_match(text)?;
    if found.seconds == 0 {
        return None;
    }
    Some(Command::Create {
        name: extract_timer_name(text, &found.spans),
        duration_secs: found.seconds,
    })
}

/// Name following the first keyword of `set` present in `text`.
fn target_name(text: &str, set: &[&str]) -> String {
    let name = first_present(text, set)
        .and_then(|kw| text.split_once(kw))
        .map(|(_, after)| clean_target_name(after))
        .unwrap_or_default();
    if name.is_empty() {
        "timer".to_string()
    } else {
        name
    }
}

fn strip_all(text: &str, words: &[&str]) -> String {
    words
        .iter()
        .fold(text.trim().to_string(), |acc, word| acc.replace(word, "").trim().to_string())
}

fn regimen_name(text: &str) -> String {
    // Preferred: whatever follows the run verb, minus regimen keywords.
    for verb in REGIMEN_RUN {
        let Some((_, after)) = text.split_once(verb) else {
            continue;
        };
        let name = strip_all(strip_leading_article(after.trim()), REGIMEN);
        if !name.is_empty() {
            return collapse_whitespace(&name);
        }
    }

    // Fallback: the words around the regimen keyword itself.
    for keyword in REGIMEN {
        let Some((before, after)) = text.split_once(keyword) else {
            continue;
        };
        let name = strip_all(strip_leading_article(after.trim()), REGIMEN_RUN);
        if !name.is_empty() {
            return collapse_whitespace(&name);
        }
        if let Some(last) = before.split_whitespace().last() {
            if !REGIMEN_RUN.contains(&last) && !ARTICLES.contains(&last) {
                return last.to_string();
            }
        }
    }

    "workout".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(text: &str) -> Option<Command> {
        CommandInterpreter::new().interpret(text)
    }

    fn rule(name: &str) -> Rule {
        *RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = CommandInterpreter::new().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["list", "regimen", "clear_all", "delete", "pause", "resume", "stop", "create"]
        );
    }

    #[test]
    fn create_with_naming_phrase() {
        assert_eq!(
            interpret("Set a 5 minute timer for coffee break"),
            Some(Command::Create {
                name: "coffee break".into(),
                duration_secs: 300
            })
        );
    }

    #[test]
    fn create_with_leftover_words() {
        assert_eq!(
            interpret("start a 25 min pomodoro timer"),
            Some(Command::Create {
                name: "pomodoro".into(),
                duration_secs: 1500
            })
        );
    }

    #[test]
    fn list_keywords() {
        assert_eq!(interpret("show all timers"), Some(Command::List));
        assert_eq!(interpret("what's running?"), Some(Command::List));
        assert_eq!(interpret("status"), Some(Command::List));
    }

    #[test]
    fn list_shadows_regimen_listing() {
        assert_eq!(interpret("show regimens"), Some(Command::List));
        assert_eq!(rule("regimen").apply("list regimens"), Some(Command::ListRegimens));
    }

    #[test]
    fn regimen_runs() {
        assert_eq!(
            interpret("run workout regimen"),
            Some(Command::RunRegimen { name: "workout".into() })
        );
        assert_eq!(
            interpret("start pomodoro routine"),
            Some(Command::RunRegimen { name: "pomodoro".into() })
        );
        assert_eq!(
            interpret("start the morning stretch routine"),
            Some(Command::RunRegimen { name: "morning stretch".into() })
        );
        assert_eq!(
            interpret("begin regimen legs"),
            Some(Command::RunRegimen { name: "legs".into() })
        );
        assert_eq!(
            interpret("run a workout"),
            Some(Command::RunRegimen { name: "workout".into() })
        );
    }

    #[test]
    fn regimen_without_verb_falls_through() {
        assert_eq!(rule("regimen").apply("my routine"), None);
        assert_eq!(interpret("my routine"), None);
    }

    #[test]
    fn clear_all_needs_verb_and_scope() {
        assert_eq!(interpret("clear all"), Some(Command::ClearAll));
        assert_eq!(interpret("remove everything"), Some(Command::ClearAll));
        assert_eq!(
            interpret("delete the tea timer"),
            Some(Command::Delete { name: "tea".into() })
        );
    }

    #[test]
    fn delete_defaults_to_timer() {
        assert_eq!(interpret("destroy"), Some(Command::Delete { name: "timer".into() }));
    }

    #[test]
    fn pause_resume_stop() {
        assert_eq!(
            interpret("pause the coffee timer"),
            Some(Command::Pause { name: "coffee".into() })
        );
        assert_eq!(
            interpret("resume coffee"),
            Some(Command::Resume { name: "coffee".into() })
        );
        assert_eq!(interpret("cancel tea"), Some(Command::Stop { name: "tea".into() }));
        assert_eq!(interpret("go"), Some(Command::Resume { name: "timer".into() }));
    }

    #[test]
    fn stop_keyword_is_shadowed_by_pause() {
        let (rule, command) = CommandInterpreter::new().explain("stop meeting timer").unwrap();
        assert_eq!(rule, "pause");
        assert_eq!(command, Command::Pause { name: "meeting".into() });
    }

    #[test]
    fn unparseable_text() {
        assert_eq!(interpret("hello there"), None);
        assert_eq!(interpret(""), None);
    }

    #[test]
    fn zero_duration_is_not_a_create() {
        assert_eq!(interpret("set tea to 0 minutes"), None);
    }

    #[test]
    fn explain_names_the_rule() {
        let interpreter = CommandInterpreter::new();
        assert_eq!(interpreter.explain("clear everything").unwrap().0, "clear_all");
        assert_eq!(interpreter.explain("10 minutes eggs").unwrap().0, "create");
    }
}
