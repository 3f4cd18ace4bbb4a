use std::io::Write;

use timerassist_core::{AlertSettings, Notifier};

/// Rings the terminal bell and prints notifications to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn beep(&mut self, _settings: &AlertSettings) {
        let mut err = std::io::stderr();
        // A missing terminal is not worth failing over.
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }

    fn notify(&mut self, title: &str, body: &str) {
        eprintln!("{title}: {body}");
    }
}
