//! Argument quoting for the Windows process loader and cmd.exe

use std::iter;

const CMD_ESCAPE: char = '^';
const CMD_METACHARACTERS: &str = "^!\"%&()<>|";

/// Quote one token for CreateProcessW's command-line grammar
///
/// The token is wrapped in double quotes. A run of N backslashes becomes 2N
/// backslashes when it reaches the end of the token (so the closing quote is
/// not escaped), 2N+1 when it ends at a literal quote (escaping the quote),
/// and is copied untouched otherwise.
pub(super) fn escape(arg: &str) -> String {
    let mut safe = String::with_capacity(arg.len() + 2);
    safe.push('"');

    let mut chars = arg.chars().peekable();
    loop {
        let mut backslashes = 0usize;
        while chars.peek() == Some(&'\\') {
            chars.next();
            backslashes += 1;
        }

        match chars.next() {
            None => {
                safe.extend(iter::repeat('\\').take(2 * backslashes));
                break;
            }
            Some('"') => {
                safe.extend(iter::repeat('\\').take(2 * backslashes + 1));
                safe.push('"');
            }
            Some(c) => {
                safe.extend(iter::repeat('\\').take(backslashes));
                safe.push(c);
            }
        }
    }

    safe.push('"');
    safe
}

/// Quote one token for interpolation into a cmd.exe command string
///
/// Applies [`escape`], then caret-prefixes every character the shell itself
/// interprets. The shell strips the carets before the process loader ever
/// sees the string, so the two layers compose.
pub(super) fn escape_cmd(arg: &str) -> String {
    let safe = escape(arg);

    let mut out = String::with_capacity(safe.len());
    for c in safe.chars() {
        if CMD_METACHARACTERS.contains(c) {
            out.push(CMD_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token_quoted() {
        assert_eq!(escape("test.exe"), r#""test.exe""#);
        assert_eq!(escape("arg1 arg2"), r#""arg1 arg2""#);
        assert_eq!(escape(""), r#""""#);
    }

    #[test]
    fn test_interior_backslashes_untouched() {
        assert_eq!(escape(r"path\to\file"), r#""path\to\file""#);
        assert_eq!(escape(r"weird\\argument"), r#""weird\\argument""#);
    }

    #[test]
    fn test_trailing_backslashes_doubled() {
        assert_eq!(escape(r"path\to\dir\"), r#""path\to\dir\\""#);
        assert_eq!(escape(r"a\\"), r#""a\\\\""#);
    }

    #[test]
    fn test_quote_escaped_with_odd_run() {
        assert_eq!(escape(r#"a"b"#), r#""a\"b""#);
        assert_eq!(escape(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(escape(r#"""#), r#""\"""#);
    }

    #[test]
    fn test_escape_cmd_prefixes_metacharacters() {
        assert_eq!(escape_cmd("100%"), r#"^"100^%^""#);
        assert_eq!(escape_cmd("a&b"), r#"^"a^&b^""#);
        assert_eq!(escape_cmd("plain"), r#"^"plain^""#);
    }

    #[test]
    fn test_escape_cmd_covers_every_metacharacter() {
        for danger in CMD_METACHARACTERS.chars() {
            let safe = escape_cmd(&danger.to_string());
            assert!(
                safe.contains(&format!("^{}", danger)),
                "{} not caret-escaped in {}",
                danger,
                safe
            );
        }
    }
}
