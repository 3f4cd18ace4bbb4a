//! Property tests for duration extraction and classification.

use proptest::prelude::*;
use timerassist_core::{extract_duration, format_time, Command, CommandInterpreter};

#[test]
fn test_documented_examples() {
    assert_eq!(extract_duration("1 hour and 30 minutes"), Some(5400));
    assert_eq!(extract_duration("90"), Some(5400));
    assert_eq!(extract_duration("five minutes"), Some(300));
    assert_eq!(extract_duration("no time here"), None);
    assert_eq!(format_time(125), "2m");
}

proptest! {
    #[test]
    fn bare_numbers_are_minutes(n in 1u64..10_000) {
        prop_assert_eq!(extract_duration(&n.to_string()), Some(n * 60));
    }

    #[test]
    fn explicit_minutes(n in 1u64..10_000) {
        prop_assert_eq!(extract_duration(&format!("{n} minutes")), Some(n * 60));
        prop_assert_eq!(extract_duration(&format!("{n}min")), Some(n * 60));
    }

    #[test]
    fn hours_and_minutes_add_up(h in 1u64..24, m in 1u64..60) {
        let text = format!("{h} hours and {m} minutes");
        prop_assert_eq!(extract_duration(&text), Some(h * 3600 + m * 60));
    }

    #[test]
    fn seconds(n in 1u64..3600) {
        prop_assert_eq!(extract_duration(&format!("{n} seconds")), Some(n));
    }

    #[test]
    fn create_commands_carry_the_duration(n in 1u64..500) {
        let command = CommandInterpreter::new().interpret(&format!("set a {n} minute timer for tea"));
        prop_assert_eq!(
            command,
            Some(Command::Create { name: "tea".into(), duration_secs: n * 60 })
        );
    }

    #[test]
    fn interpretation_never_panics(text in "\\PC{0,64}") {
        let _ = CommandInterpreter::new().interpret(&text);
    }
}
