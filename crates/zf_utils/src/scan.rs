//! Zero-copy line and token scanning over `&str`.
//!
//! All helpers return subslices of the input; nothing is allocated.
//! Unlike [`str::split`], [`tokens`] follows column-file conventions:
//! a trailing separator does not produce a trailing empty token.

// -----------------------------------------------------------------------------
// Primitives

/// Returns the prefix of `s` up to (not including) `delimiter`,
/// or all of `s` when the delimiter is absent.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::get_until;
///
/// assert_eq!(get_until("a;b;c", ';'), "a");
/// assert_eq!(get_until("abc", ';'), "abc");
/// ```
pub fn get_until(s: &str, delimiter: char) -> &str {
    match s.find(delimiter) {
        Some(end) => &s[..end],
        None => s,
    }
}

/// Drops a single trailing carriage return, if present.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::strip_cr;
///
/// assert_eq!(strip_cr("line\r"), "line");
/// assert_eq!(strip_cr("line"), "line");
/// ```
pub fn strip_cr(s: &str) -> &str {
    s.strip_suffix('\r').unwrap_or(s)
}

/// Returns the first line of `s`, without the line terminator.
///
/// Handles both `\n` and `\r\n` endings.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::get_line;
///
/// assert_eq!(get_line("first\r\nsecond"), "first");
/// ```
pub fn get_line(s: &str) -> &str {
    strip_cr(get_until(s, '\n'))
}

// -----------------------------------------------------------------------------
// Tokens

/// Iterator over `separator`-delimited tokens, see [`tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
    separator: char,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let token = get_until(self.rest, self.separator);
        self.rest = &self.rest[token.len()..];
        if !self.rest.is_empty() {
            // skip separator
            self.rest = &self.rest[self.separator.len_utf8()..];
        }
        Some(token)
    }
}

/// Iterates the tokens of `s` separated by `separator`.
///
/// Empty tokens between consecutive separators are yielded; a trailing
/// separator is not followed by an empty token.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::tokens;
///
/// let fields: Vec<_> = tokens("7:45;;12:30;", ';').collect();
/// assert_eq!(fields, ["7:45", "", "12:30"]);
/// ```
pub fn tokens(s: &str, separator: char) -> Tokens<'_> {
    Tokens { rest: s, separator }
}

// -----------------------------------------------------------------------------
// Lines

/// Iterator over the lines of a string, see [`lines`].
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    tokens: Tokens<'a>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.tokens.next().map(strip_cr)
    }
}

/// Iterates the lines of `s`, stripping `\n` and `\r\n` terminators.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::lines;
///
/// let all: Vec<_> = lines("a\r\nb\nc").collect();
/// assert_eq!(all, ["a", "b", "c"]);
/// ```
pub fn lines(s: &str) -> Lines<'_> {
    Lines {
        tokens: tokens(s, '\n'),
    }
}

/// Drops leading lines of `s` while `skip` returns `true`.
///
/// Returns the remainder starting at the first kept line.
///
/// # Examples
///
/// ```
/// use zf_utils::scan::skip_lines;
///
/// let rest = skip_lines("# comment\n# comment\ndata", |l| l.starts_with('#'));
/// assert_eq!(rest, "data");
/// ```
pub fn skip_lines<P>(mut s: &str, mut skip: P) -> &str
where
    P: FnMut(&str) -> bool,
{
    while !s.is_empty() {
        let line = get_line(s);
        if !skip(line) {
            break;
        }
        s = &s[get_until(s, '\n').len()..];
        if !s.is_empty() {
            s = &s[1..];
        }
    }
    s
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{get_line, lines, skip_lines, tokens};

    #[test]
    fn tokens_keep_inner_empties() {
        assert!(tokens("a;;b", ';').eq(["a", "", "b"]));
    }

    #[test]
    fn tokens_ignore_trailing_separator() {
        assert!(tokens("a;b;", ';').eq(["a", "b"]));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(tokens("", ';').count(), 0);
        assert_eq!(lines("").count(), 0);
    }

    #[test]
    fn crlf_lines() {
        assert!(lines("x\r\ny\r\n").eq(["x", "y"]));
    }

    #[test]
    fn line_of_single_line_input() {
        assert_eq!(get_line("only"), "only");
    }

    #[test]
    fn skip_lines_stops_at_first_kept() {
        let rest = skip_lines("a\nb\nkeep\nb", |l| l != "keep");
        assert_eq!(rest, "keep\nb");
    }

    #[test]
    fn skip_lines_may_consume_all() {
        assert_eq!(skip_lines("a\nb", |_| true), "");
    }
}
