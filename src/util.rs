/// Whitespace characters before the first non-whitespace one.
pub fn leading_whitespace_count(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Whitespace characters after the last non-whitespace one.
pub fn trailing_whitespace_count(line: &str) -> usize {
    line.chars().rev().take_while(|c| c.is_whitespace()).count()
}

/// Empty or whitespace only.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Strip carriage returns and any trailing blank lines from raw snippet text.
pub fn chomp(raw: &str) -> String {
    let text: String = raw.chars().filter(|&c| c != '\r').collect();
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
    lines.join("\n")
}
