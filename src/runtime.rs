use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// What a key press means to a typing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Input {
    Char(char),
    Backspace,
    Tab,
    /// Abandon the current snippet and fetch another.
    Skip,
    Quit,
}

impl Input {
    /// Translate a terminal key event, dropping anything that isn't typing.
    ///
    /// Chords with ctrl, alt or meta are never typed into the session: a
    /// ctrl+t meant for something else must not register as a 't'.
    pub fn from_key(key: KeyEvent) -> Option<Input> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let chorded = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::META);

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Input::Quit)
            }
            KeyCode::Esc => Some(Input::Quit),
            _ if chorded => None,
            KeyCode::Char('\r') | KeyCode::Enter => Some(Input::Char('\n')),
            KeyCode::Char(c) => Some(Input::Char(c)),
            KeyCode::Backspace => Some(Input::Backspace),
            KeyCode::Tab => Some(Input::Tab),
            KeyCode::Right => Some(Input::Skip),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for headless driving and tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(1));

        assert_matches!(runner.step(), AppEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(10));

        assert_matches!(runner.step(), AppEvent::Resize);
    }

    #[test]
    fn plain_characters_are_typed() {
        assert_eq!(
            Input::from_key(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Input::Char('a'))
        );
        assert_eq!(
            Input::from_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Input::Char('A'))
        );
    }

    #[test]
    fn enter_and_carriage_return_become_newline() {
        assert_eq!(
            Input::from_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Input::Char('\n'))
        );
        assert_eq!(
            Input::from_key(key(KeyCode::Char('\r'), KeyModifiers::NONE)),
            Some(Input::Char('\n'))
        );
    }

    #[test]
    fn chords_are_not_typed() {
        assert_eq!(
            Input::from_key(key(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(Input::from_key(key(KeyCode::Char('x'), KeyModifiers::ALT)), None);
        assert_eq!(Input::from_key(key(KeyCode::Tab, KeyModifiers::ALT)), None);
    }

    #[test]
    fn structural_keys() {
        assert_eq!(
            Input::from_key(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Input::Backspace)
        );
        assert_eq!(
            Input::from_key(key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Input::Tab)
        );
        assert_eq!(
            Input::from_key(key(KeyCode::Right, KeyModifiers::NONE)),
            Some(Input::Skip)
        );
        assert_eq!(Input::from_key(key(KeyCode::Up, KeyModifiers::NONE)), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            Input::from_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Input::Quit)
        );
        assert_eq!(
            Input::from_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
    }

    #[test]
    fn inputs_display_in_snake_case() {
        assert_eq!(Input::Backspace.to_string(), "backspace");
        assert_eq!(Input::Char('x').to_string(), "char");
    }
}
