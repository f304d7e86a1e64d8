//! Resolution of escape sequences at token emission time.
//!
//! The scanner validates every escape sequence while scanning and only calls these functions
//! when it saw at least one, so both passes are infallible.

/// Resolves `ECHAR` (`\t \b \n \r \f \" \' \\`) and `UCHAR` (`\uXXXX`, `\UXXXXXXXX`) sequences.
///
/// ```
/// use rdfscan::unescape_numeric;
///
/// assert_eq!(unescape_numeric(r"a\tb\u0053\U00000053"), "a\tbSS");
/// ```
pub fn unescape_numeric(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = memchr::memchr(b'\\', rest.as_bytes()) {
        out.push_str(&rest[..i]);
        let escape = &rest[i + 1..];
        let mut chars = escape.chars();
        let consumed = match chars.next() {
            Some('t') => push(&mut out, '\t'),
            Some('b') => push(&mut out, '\u{08}'),
            Some('n') => push(&mut out, '\n'),
            Some('r') => push(&mut out, '\r'),
            Some('f') => push(&mut out, '\u{0C}'),
            Some(c @ ('"' | '\'' | '\\')) => push(&mut out, c),
            Some('u') => push_code_point(&mut out, escape, 4),
            Some('U') => push_code_point(&mut out, escape, 8),
            // not produced by the scanner, kept as is
            Some(c) => {
                out.push('\\');
                push(&mut out, c)
            }
            None => {
                out.push('\\');
                0
            }
        };
        rest = &escape[consumed..];
    }
    out.push_str(rest);
    out
}

/// Resolves `PN_LOCAL_ESC` sequences: a `\` followed by one of `_~.-!$&'()*+,;=/?#@%`.
///
/// ```
/// use rdfscan::unescape_reserved;
///
/// assert_eq!(unescape_reserved(r"a\~b\.c"), "a~b.c");
/// ```
pub fn unescape_reserved(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(c) if crate::chars::is_reserved_escapable(c) => out.push(c),
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[inline]
fn push(out: &mut String, c: char) -> usize {
    out.push(c);
    c.len_utf8()
}

fn push_code_point(out: &mut String, escape: &str, digits: usize) -> usize {
    // escape starts with the 'u' or 'U' marker
    let hex = escape.get(1..=digits).unwrap_or_default();
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) if hex.len() == digits => {
            out.push(c);
            digits + 1
        }
        _ => {
            out.push('\\');
            push(out, escape.chars().next().unwrap_or('u'))
        }
    }
}
