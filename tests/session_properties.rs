use std::time::Duration;

use proptest::prelude::*;

use tortoise::runtime::FixedTicker;
use tortoise::{Keystroke, Snippet, TypingSession};

#[derive(Clone, Debug)]
enum Op {
    Type(char),
    Backspace,
    Tab,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'b', ' ', '\n', '{', '}']).prop_map(Op::Type),
        2 => Just(Op::Backspace),
        1 => Just(Op::Tab),
    ]
}

fn snippet_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", " ", "\n", "{", "}", "  ", "\t"]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

/// Lines that never dedent, so auto-indent always lands on expected spaces.
fn nested_text() -> impl Strategy<Value = String> {
    prop::collection::vec((any::<bool>(), "[a-z{}();]{1,6}"), 1..8).prop_map(|lines| {
        let mut indent = 0;
        lines
            .into_iter()
            .map(|(deeper, code)| {
                if deeper {
                    indent += 2;
                }
                format!("{}{}", " ".repeat(indent), code)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn session(raw: &str) -> TypingSession {
    // long ticks keep the timer threads idle; stopping them is immediate
    TypingSession::with_ticker(
        Snippet::new(1, 1, raw),
        FixedTicker::new(Duration::from_secs(60)),
    )
}

proptest! {
    #[test]
    fn session_invariants_hold(raw in snippet_text(), ops in prop::collection::vec(op(), 0..80)) {
        let mut s = session(&raw);
        let len = s.snippet().len();
        let mut finished_reports = 0;
        let mut last_total = 0;

        for op in ops {
            let was_finished = s.is_finished();
            let outcome = match op {
                Op::Type(c) => Some(s.type_on(c)),
                Op::Tab => Some(s.tab_pressed()),
                Op::Backspace => {
                    s.backspace();
                    None
                }
            };

            if outcome == Some(Keystroke::Finished) {
                finished_reports += 1;
            }
            if was_finished {
                prop_assert!(s.is_finished());
                prop_assert!(outcome.is_none() || outcome == Some(Keystroke::Ignored));
            }

            prop_assert!(s.cursor_pos() <= len);
            prop_assert!(s.total_mistakes() >= last_total);
            prop_assert!(s.total_mistakes() >= s.mistakes().len());
            last_total = s.total_mistakes();

            if s.is_finished() {
                prop_assert_eq!(s.cursor_pos(), len);
                prop_assert!(s.mistakes().is_empty());
                prop_assert!(!s.timer_running());
            }
            prop_assert!(s.accuracy() <= 100);
        }

        prop_assert!(finished_reports <= 1);
    }

    #[test]
    fn typing_the_snippet_always_finishes(raw in nested_text()) {
        let mut s = session(&raw);
        let mut guard = 0;
        // auto-indent may fill in spaces, so always type what's expected
        while !s.is_finished() {
            let expected = s.snippet().chars()[s.cursor_pos()];
            prop_assert_ne!(s.type_on(expected), Keystroke::Mistake);
            guard += 1;
            prop_assert!(guard <= s.snippet().len());
        }
        prop_assert_eq!(s.accuracy(), 100);
        prop_assert!(s.mistakes().is_empty());
    }
}
