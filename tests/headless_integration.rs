use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use tortoise::app::{App, Control};
use tortoise::library::SnippetLibrary;
use tortoise::runtime::{AppEvent, FixedTicker, Input, Runner, TestEventSource};
use tortoise::{Keystroke, Snippet, TypingSession};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn library() -> SnippetLibrary {
    let json = r#"
    {
        "categories": [{ "id": 1, "name": "Python" }],
        "snippets": [
            { "id": 1, "full_text": "if x:\n    y = 1\n", "category_id": 1 },
            { "id": 2, "full_text": "pass", "category_id": 1 }
        ]
    }
    "#;
    SnippetLibrary::from_json(json.as_bytes()).unwrap()
}

// Drives the app through the same Runner/TestEventSource pairing the binary
// uses with crossterm, without a TTY.
#[test]
fn headless_snippet_flow_records_score() {
    let mut app = App::with_rng(
        library(),
        Some(1),
        FixedTicker::from_millis(5),
        None,
        StdRng::seed_from_u64(3),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(5));

    // the body is one indentation unit deeper than the line above it
    for c in "if x:".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    for c in "y = 1".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Esc)).unwrap();

    let mut quit = false;
    for _ in 0..200u32 {
        match runner.step() {
            AppEvent::Tick => {
                app.refresh_wpm();
            }
            AppEvent::Resize => {}
            AppEvent::Key(k) => {
                if let Some(input) = Input::from_key(k) {
                    if app.handle(input).unwrap() == Control::Quit {
                        quit = true;
                        break;
                    }
                }
            }
        }
    }

    assert!(quit, "escape should end the loop");
    let score = app.board.last().expect("snippet 1 should have been scored");
    assert_eq!(score.snippet_id, 1);
    assert_eq!(score.accuracy, 100);
    assert_eq!(app.session.snippet().id, 2);
}

#[test]
fn headless_mistakes_must_be_backspaced() {
    let mut session = TypingSession::with_ticker(
        Snippet::new(1, 1, "ab"),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(5));
    for code in [
        KeyCode::Char('a'),
        KeyCode::Char('x'),
        KeyCode::Char('b'),
        KeyCode::Backspace,
        KeyCode::Backspace,
        KeyCode::Char('b'),
    ] {
        tx.send(key(code)).unwrap();
    }

    let mut outcomes = vec![];
    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Key(k) => match Input::from_key(k) {
                Some(Input::Char(c)) => outcomes.push(session.type_on(c)),
                Some(Input::Backspace) => session.backspace(),
                _ => {}
            },
            AppEvent::Tick | AppEvent::Resize => {}
        }
        if session.is_finished() {
            break;
        }
    }

    assert_eq!(
        outcomes,
        vec![
            Keystroke::Advanced,
            Keystroke::Mistake,
            Keystroke::Mistake,
            Keystroke::Finished
        ]
    );
    assert_eq!(session.total_mistakes(), 2);
    // two mistakes over two typed characters
    assert_eq!(session.accuracy(), 0);
    assert!(!session.timer_running());
}
