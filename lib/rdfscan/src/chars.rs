//! Character classes of the Turtle family grammars.
//!
//! Each class is a static table of sorted, non-overlapping inclusive ranges.

type RangeTable = &'static [(char, char)];

// [163s] PN_CHARS_BASE
static PN_CHARS_BASE: RangeTable = &[
    ('A', 'Z'),
    ('a', 'z'),
    ('\u{00C0}', '\u{00D6}'),
    ('\u{00D8}', '\u{00F6}'),
    ('\u{00F8}', '\u{02FF}'),
    ('\u{0370}', '\u{037D}'),
    ('\u{037F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
    ('\u{10000}', '\u{EFFFF}'),
];

// [166s] PN_CHARS minus PN_CHARS_U
static PN_CHARS_EXTRA: RangeTable = &[
    ('-', '-'),
    ('0', '9'),
    ('\u{00B7}', '\u{00B7}'),
    ('\u{0300}', '\u{036F}'),
    ('\u{203F}', '\u{2040}'),
];

// [18] IRIREF forbids #x00-#x20 <>"{}|^`\ unescaped
static IRI_DISALLOWED: RangeTable = &[
    ('\u{0000}', ' '),
    ('"', '"'),
    ('<', '<'),
    ('>', '>'),
    ('\\', '\\'),
    ('^', '^'),
    ('`', '`'),
    ('{', '}'),
];

// [173s] PN_LOCAL_ESC
static RESERVED_ESCAPABLE: RangeTable = &[
    ('!', '!'),
    ('#', '/'),
    (';', ';'),
    ('=', '='),
    ('?', '@'),
    ('_', '_'),
    ('~', '~'),
];

#[inline]
fn in_table(c: char, table: RangeTable) -> bool {
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                std::cmp::Ordering::Less
            } else if lo > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// `PN_CHARS_BASE`: letters and the identifier blocks the grammar reserves.
#[inline]
pub fn is_name_start(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic();
    }
    in_table(c, PN_CHARS_BASE)
}

/// `PN_CHARS_U`: [`is_name_start`] or `_`.
#[inline]
pub fn is_name_start_or_underscore(c: char) -> bool {
    c == '_' || is_name_start(c)
}

/// `PN_CHARS`: [`is_name_start_or_underscore`], digits, `-`, U+00B7 and the combining marks.
#[inline]
pub fn is_name_char(c: char) -> bool {
    is_name_start_or_underscore(c) || in_table(c, PN_CHARS_EXTRA)
}

/// First character of a local name (`PN_CHARS_U | ':' | [0-9] | PLX`).
///
/// `%` and `\` start a percent-encoded pair or a reserved character escape.
#[inline]
pub fn is_local_name_first(c: char) -> bool {
    matches!(c, ':' | '0'..='9' | '%' | '\\') || is_name_start_or_underscore(c)
}

/// Character in the middle of a local name (`PN_CHARS | '.' | ':' | PLX`).
#[inline]
pub fn is_local_name_mid(c: char) -> bool {
    matches!(c, '.' | ':' | '%' | '\\') || is_name_char(c)
}

#[inline]
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Whitespace separating tokens: space, tab, carriage return and line feed.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters that may not appear unescaped inside `<...>`.
#[inline]
pub fn is_disallowed_in_iri(c: char) -> bool {
    in_table(c, IRI_DISALLOWED)
}

/// Characters that may follow a `\` inside a local name.
#[inline]
pub fn is_reserved_escapable(c: char) -> bool {
    in_table(c, RESERVED_ESCAPABLE)
}

/// Scheme characters after the first one: `alpha | digit | '+' | '-' | '.'`.
#[inline]
pub(crate) fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(table: RangeTable) {
        for (lo, hi) in table {
            assert!(lo <= hi, "{lo:?} > {hi:?}");
        }
        for w in table.windows(2) {
            assert!(w[0].1 < w[1].0, "{:?} overlaps {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn tables_are_sorted() {
        assert_sorted(PN_CHARS_BASE);
        assert_sorted(PN_CHARS_EXTRA);
        assert_sorted(IRI_DISALLOWED);
        assert_sorted(RESERVED_ESCAPABLE);
    }

    #[test]
    fn name_start_boundaries() {
        assert!(is_name_start('a'));
        assert!(is_name_start('Z'));
        assert!(!is_name_start('_'));
        assert!(!is_name_start('0'));
        assert!(is_name_start('\u{00C0}'));
        assert!(!is_name_start('\u{00D7}'));
        assert!(is_name_start('\u{00D8}'));
        assert!(!is_name_start('\u{00F7}'));
        assert!(!is_name_start('\u{037E}'));
        assert!(!is_name_start('\u{2000}'));
        assert!(is_name_start('\u{200C}'));
        assert!(!is_name_start('\u{3000}'));
        assert!(is_name_start('\u{3001}'));
        assert!(!is_name_start('\u{FDD0}'));
        assert!(is_name_start('\u{FFFD}'));
        assert!(!is_name_start('\u{FFFE}'));
        assert!(is_name_start('\u{EFFFF}'));
        assert!(!is_name_start('\u{F0000}'));
    }

    #[test]
    fn name_chars() {
        assert!(is_name_start_or_underscore('_'));
        assert!(is_name_char('-'));
        assert!(is_name_char('7'));
        assert!(is_name_char('\u{00B7}'));
        assert!(is_name_char('\u{0301}'));
        assert!(is_name_char('\u{2040}'));
        assert!(!is_name_char('.'));
        assert!(!is_name_char(':'));
        assert!(!is_name_char('%'));
    }

    #[test]
    fn local_names() {
        assert!(is_local_name_first(':'));
        assert!(is_local_name_first('1'));
        assert!(is_local_name_first('%'));
        assert!(is_local_name_first('\\'));
        assert!(!is_local_name_first('-'));
        assert!(!is_local_name_first('.'));
        assert!(is_local_name_mid('.'));
        assert!(is_local_name_mid('-'));
    }

    #[test]
    fn iri_and_escapes() {
        for c in [' ', '\n', '<', '>', '"', '{', '}', '|', '^', '`', '\\'] {
            assert!(is_disallowed_in_iri(c), "{c:?}");
        }
        for c in ['a', '/', '#', ':', '%', '\u{00E9}'] {
            assert!(!is_disallowed_in_iri(c), "{c:?}");
        }
        for c in "_~.-!$&'()*+,;=/?#@%".chars() {
            assert!(is_reserved_escapable(c), "{c:?}");
        }
        for c in ['a', '0', ':', '"', '<', '\\', '^'] {
            assert!(!is_reserved_escapable(c), "{c:?}");
        }
    }
}
