use crate::util::{leading_whitespace_count, trailing_whitespace_count};

/// Keystroke rule outcome for [`crate::session::TypingSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The keystroke matched and the cursor moves forward.
    Advance,
    /// The keystroke goes into the mistake buffer.
    Mistake,
}

/// Decide what a typed character does.
///
/// Mistakes are sticky: while any are pending every character is buffered,
/// even one that happens to match the target.
pub fn decide(expected: Option<char>, typed: char, mistakes_pending: bool) -> Decision {
    if !mistakes_pending && expected == Some(typed) {
        Decision::Advance
    } else {
        Decision::Mistake
    }
}

/// Spaces to insert after a newline: the indent of the line just completed.
///
/// `before_cursor` must end with the newline that was just typed.
pub fn auto_indent_width(before_cursor: &str) -> usize {
    let lines: Vec<&str> = before_cursor.split('\n').collect();
    if lines.len() < 2 {
        return 0;
    }
    leading_whitespace_count(lines[lines.len() - 2])
}

/// Primitive backspace steps for one backspace press.
///
/// `visual_text` is everything up to and including what is shown at the
/// cursor. A full indentation unit of trailing whitespace on its last line
/// is removed in one press.
pub fn backspace_steps(visual_text: &str, tab_size: Option<usize>) -> usize {
    let current_line = visual_text.rsplit('\n').next().unwrap_or("");
    match tab_size {
        Some(size) if size > 0 && trailing_whitespace_count(current_line) >= size => size,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_match_advances() {
        assert_eq!(decide(Some('a'), 'a', false), Decision::Advance);
    }

    #[test]
    fn test_decide_mismatch_is_mistake() {
        assert_eq!(decide(Some('a'), 'b', false), Decision::Mistake);
    }

    #[test]
    fn test_decide_is_sticky() {
        assert_eq!(decide(Some('a'), 'a', true), Decision::Mistake);
    }

    #[test]
    fn test_decide_past_end_is_mistake() {
        assert_eq!(decide(None, 'a', false), Decision::Mistake);
    }

    #[test]
    fn test_auto_indent_width_uses_previous_line() {
        assert_eq!(auto_indent_width("fn f() {\n    let x = 1;\n"), 4);
        assert_eq!(auto_indent_width("top\n"), 0);
    }

    #[test]
    fn test_auto_indent_width_without_newline() {
        assert_eq!(auto_indent_width("  abc"), 0);
    }

    #[test]
    fn test_backspace_steps_full_tab() {
        assert_eq!(backspace_steps("x\n    ", Some(2)), 2);
        assert_eq!(backspace_steps("x\n  ", Some(2)), 2);
    }

    #[test]
    fn test_backspace_steps_partial_tab() {
        assert_eq!(backspace_steps("x\n ", Some(2)), 1);
        assert_eq!(backspace_steps("x\n  y", Some(2)), 1);
    }

    #[test]
    fn test_backspace_steps_only_considers_current_line() {
        assert_eq!(backspace_steps("    \nab", Some(4)), 1);
    }

    #[test]
    fn test_backspace_steps_without_tab_size() {
        assert_eq!(backspace_steps("      ", None), 1);
        assert_eq!(backspace_steps("      ", Some(0)), 1);
    }
}
