//! Command events
//!
//! A `Command` is one line of the motion command stream broken into
//! letter/value words. Handlers may append text to its deferred response,
//! which the dispatcher sends after the acknowledgement.

/// A single letter/value word such as `T2` or `X10.5`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word {
    pub letter: char,
    pub value: f32,
}

/// A structured command event with a deferred response buffer
#[derive(Debug, Clone, Default)]
pub struct Command {
    line: String,
    words: Vec<Word>,
    response: String,
}

impl Command {
    /// Parse a command line into words.
    ///
    /// Comments (`;` to end of line, or text in parentheses) are dropped and
    /// letters are upper-cased. Words without a parsable number are skipped.
    pub fn parse(line: &str) -> Self {
        let mut words = Vec::new();
        let stripped = strip_comments(line);
        let mut chars = stripped.chars().peekable();

        while let Some(c) = chars.next() {
            if !c.is_ascii_alphabetic() {
                continue;
            }
            let mut number = String::new();
            while let Some(&n) = chars.peek() {
                if n.is_ascii_digit() || n == '.' || n == '-' || n == '+' || n == ' ' {
                    if n != ' ' {
                        number.push(n);
                    }
                    chars.next();
                } else {
                    break;
                }
            }
            match number.parse::<f32>() {
                Ok(value) => words.push(Word {
                    letter: c.to_ascii_uppercase(),
                    value,
                }),
                Err(_) => log::debug!("Skipping word '{}' without value in '{}'", c, line),
            }
        }

        Self {
            line: line.trim().to_string(),
            words,
            response: String::new(),
        }
    }

    /// The original line, trimmed
    pub fn line(&self) -> &str {
        &self.line
    }

    /// All parsed words in order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Check whether a letter appears in the command
    pub fn has_letter(&self, letter: char) -> bool {
        self.words.iter().any(|w| w.letter == letter)
    }

    /// Value of the first word with the given letter
    pub fn value(&self, letter: char) -> Option<f32> {
        self.words.iter().find(|w| w.letter == letter).map(|w| w.value)
    }

    /// Value of the first word with the given letter, truncated to an integer
    pub fn int_value(&self, letter: char) -> Option<i64> {
        self.value(letter).map(|v| v as i64)
    }

    /// Check whether any `G` word carries exactly this code
    pub fn has_g(&self, code: u32) -> bool {
        self.has_code('G', code)
    }

    /// Check whether any `M` word carries exactly this code
    pub fn has_m(&self, code: u32) -> bool {
        self.has_code('M', code)
    }

    fn has_code(&self, letter: char, code: u32) -> bool {
        self.words
            .iter()
            .any(|w| w.letter == letter && w.value.fract() == 0.0 && w.value as u32 == code)
    }

    /// Append diagnostic text to the deferred response
    pub fn append_response(&mut self, text: &str) {
        self.response.push_str(text);
    }

    /// Deferred response text accumulated by handlers
    pub fn response(&self) -> &str {
        &self.response
    }
}

fn strip_comments(line: &str) -> String {
    let line = line.split(';').next().unwrap_or_default();
    let mut out = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split a console line into its first word and the remainder.
pub fn shift_parameter(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_select() {
        let cmd = Command::parse("T2");
        assert!(cmd.has_letter('T'));
        assert_eq!(cmd.int_value('T'), Some(2));
        assert!(!cmd.has_m(6));
    }

    #[test]
    fn test_parse_select_and_change_on_one_line() {
        let cmd = Command::parse("T1 M6");
        assert_eq!(cmd.int_value('T'), Some(1));
        assert!(cmd.has_m(6));
    }

    #[test]
    fn test_parse_lowercase_and_packed() {
        let cmd = Command::parse("g53g0x0");
        assert!(cmd.has_g(53));
        assert!(cmd.has_g(0));
        assert_eq!(cmd.value('X'), Some(0.0));
    }

    #[test]
    fn test_parse_negative_and_fraction() {
        let cmd = Command::parse("G1 X-12.5 Y+3");
        assert_eq!(cmd.value('X'), Some(-12.5));
        assert_eq!(cmd.value('Y'), Some(3.0));
    }

    #[test]
    fn test_parse_strips_comments() {
        let cmd = Command::parse("G0 (move) X5 ; Y9");
        assert_eq!(cmd.value('X'), Some(5.0));
        assert!(!cmd.has_letter('Y'));
        assert!(!cmd.has_letter('M'));
    }

    #[test]
    fn test_fractional_code_does_not_match_integer() {
        let cmd = Command::parse("G59.1");
        assert!(!cmd.has_g(59));
    }

    #[test]
    fn test_int_value_truncates() {
        let cmd = Command::parse("T2.7");
        assert_eq!(cmd.int_value('T'), Some(2));
        let cmd = Command::parse("T-1");
        assert_eq!(cmd.int_value('T'), Some(-1));
    }

    #[test]
    fn test_word_without_value_is_skipped() {
        let cmd = Command::parse("T M6");
        assert!(!cmd.has_letter('T'));
        assert!(cmd.has_m(6));
    }

    #[test]
    fn test_response_accumulates() {
        let mut cmd = Command::parse("T9");
        assert!(cmd.response().is_empty());
        cmd.append_response("T9 invalid tool ");
        cmd.append_response("more");
        assert_eq!(cmd.response(), "T9 invalid tool more");
    }

    #[test]
    fn test_shift_parameter() {
        assert_eq!(shift_parameter("tools"), ("tools", ""));
        assert_eq!(shift_parameter("  tools  list all "), ("tools", "list all"));
        assert_eq!(shift_parameter(""), ("", ""));
    }
}
