//! Realtime loop for interactive use.
//!
//! Maps wall-clock time onto the session's virtual clock: once per second,
//! whenever the alert service has a beep due, and right before each input
//! line is handled, the session is advanced to the time elapsed since the
//! loop started.

use std::borrow::Cow;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, MissedTickBehavior};

use crate::session::{Control, Session};

const TICK: Duration = Duration::from_secs(1);

/// Feed `input` line by line into `session` until `exit` or end of input.
///
/// Lines that are not valid UTF-8 are decoded lossily and handled like any
/// other text.
///
/// # Errors
/// Returns an error if reading from `input` fails.
pub async fn drive<R>(session: &mut Session, mut input: R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let start = Instant::now();
    let mut ticker = tokio::time::interval_at(start + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Survives cancelled reads: a partial line stays here until the rest arrives.
    let mut buf = Vec::new();

    loop {
        let alert_due = session.next_alert_due().map(|due| start + due);
        tokio::select! {
            read = input.read_until(b'\n', &mut buf) => {
                if read? == 0 && buf.is_empty() {
                    tracing::debug!("input closed");
                    break;
                }
                let line = decode_line(&buf).into_owned();
                buf.clear();
                session.advance_to(start.elapsed());
                if session.handle_input(&line) == Control::Exit {
                    break;
                }
            }
            _ = ticker.tick() => {
                session.advance_to(start.elapsed());
            }
            _ = tokio::time::sleep_until(alert_due.unwrap_or(start)), if alert_due.is_some() => {
                session.advance_to(start.elapsed());
            }
        }
    }
    Ok(())
}

/// Strip the line ending and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertManager, AlertService, AlertSettings, Notifier, SilentNotifier};
    use crate::regimen::MemoryRegimenStore;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tokio::io::{AsyncWriteExt, BufReader};

    struct CountingNotifier(Rc<Cell<usize>>);

    impl Notifier for CountingNotifier {
        fn beep(&mut self, _settings: &AlertSettings) {
            self.0.set(self.0.get() + 1);
        }

        fn notify(&mut self, _title: &str, _body: &str) {}
    }

    fn session_with(alerts: Box<dyn AlertService>) -> (Session, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let lines = lines.clone();
            move |line: &str| lines.borrow_mut().push(line.to_string())
        };
        let session = Session::new(Box::new(MemoryRegimenStore::new()), alerts, Box::new(sink));
        (session, lines)
    }

    fn session() -> (Session, Rc<RefCell<Vec<String>>>) {
        session_with(Box::new(AlertManager::new(SilentNotifier, Default::default())))
    }

    #[tokio::test(start_paused = true)]
    async fn wall_clock_drives_countdown() {
        let (mut session, lines) = session();
        let (mut writer, reader) = tokio::io::duplex(256);

        let typist = async move {
            writer.write_all(b"3 second tea timer\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            writer.write_all(b"exit\n").await.unwrap();
        };
        let (result, ()) = tokio::join!(drive(&mut session, BufReader::new(reader)), typist);
        result.unwrap();

        let lines = lines.borrow();
        assert_eq!(lines[0], "Created timer 'tea' (3s)");
        assert!(lines.contains(&"[tea]: 1s".to_string()));
        assert!(lines.contains(&"[tea]: Complete!".to_string()));
        assert!(session.registry().get("tea").unwrap().is_alerting());
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_stops_the_loop() {
        let (mut session, lines) = session();
        let input: &[u8] = b"show timers\n";
        drive(&mut session, input).await.unwrap();
        assert_eq!(lines.borrow()[0], "No active timers");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let (mut session, lines) = session();
        let input: &[u8] = b"5 minute tea timer\ncaf\xe9 timer\r\nshow timers\n";
        drive(&mut session, input).await.unwrap();

        let lines = lines.borrow();
        assert!(lines.contains(&"Executed: 5 minute tea timer".to_string()));
        assert!(lines.contains(&"[tea]: 5m".to_string()));
        assert_eq!(lines.last().unwrap(), "Executed: show timers");
    }

    #[tokio::test(start_paused = true)]
    async fn unterminated_last_line_is_handled() {
        let (mut session, lines) = session();
        let input: &[u8] = b"show timers";
        drive(&mut session, input).await.unwrap();
        assert_eq!(lines.borrow()[0], "No active timers");
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_beep_interval_is_honoured() {
        let beeps = Rc::new(Cell::new(0));
        let settings = AlertSettings {
            interval: 0.25,
            ..AlertSettings::default()
        };
        let (mut session, _lines) = session_with(Box::new(AlertManager::new(
            CountingNotifier(beeps.clone()),
            settings,
        )));
        let (mut writer, reader) = tokio::io::duplex(256);

        // A 1s timer starts alerting at t=2; exit at t=6.
        let typist = async move {
            writer.write_all(b"1 second tea timer\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(6)).await;
            writer.write_all(b"exit\n").await.unwrap();
        };
        let (result, ()) = tokio::join!(drive(&mut session, BufReader::new(reader)), typist);
        result.unwrap();

        assert!(session.registry().get("tea").unwrap().is_alerting());
        assert!(beeps.get() >= 15, "only {} beeps in 4s", beeps.get());
    }

    #[test]
    fn decode_strips_line_endings() {
        assert_eq!(decode_line(b"tea\r\n"), "tea");
        assert_eq!(decode_line(b"tea\n"), "tea");
        assert_eq!(decode_line(b"caf\xe9"), "caf\u{fffd}");
    }
}
