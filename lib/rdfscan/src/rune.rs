//! UTF-8 decoding of a single code point.
//!
//! The scanner decodes its input itself instead of relying on [`str`]: the grammars allow
//! U+FFFD as ordinary data, so malformed byte sequences are reported with [`Rune::Invalid`]
//! rather than being replaced by it.

/// The result of decoding the start of a byte slice.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Rune {
    /// A well-formed code point.
    Char(char),
    /// A malformed byte sequence. The reported width is always 1.
    Invalid,
    /// The slice is empty. The reported width is always 0.
    End,
}

impl Rune {
    #[inline]
    pub fn char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Invalid | Self::End => None,
        }
    }

    #[inline]
    pub(crate) fn is(self, c: char) -> bool {
        self == Self::Char(c)
    }
}

/// Decodes the first code point of `data` and returns it with its encoded width in bytes.
///
/// Truncated sequences, overlong encodings, misplaced continuation bytes, surrogates and
/// values above U+10FFFF are all reported as `(Rune::Invalid, 1)` so that a caller can always advance.
///
/// ```
/// use rdfscan::{Rune, decode_rune};
///
/// assert_eq!(decode_rune(b"a"), (Rune::Char('a'), 1));
/// assert_eq!(decode_rune("\u{FFFD}".as_bytes()), (Rune::Char('\u{FFFD}'), 3));
/// assert_eq!(decode_rune(b"\xC0\x80"), (Rune::Invalid, 1));
/// assert_eq!(decode_rune(b""), (Rune::End, 0));
/// ```
pub fn decode_rune(data: &[u8]) -> (Rune, usize) {
    let Some(&byte) = data.first() else {
        return (Rune::End, 0);
    };
    let mut lower_boundary = 0x80;
    let mut upper_boundary = 0xBF;
    let (bytes_needed, mut code_point) = match byte {
        0x00..=0x7F => return (Rune::Char(char::from(byte)), 1),
        0xC2..=0xDF => (1, u32::from(byte) & 0x1F),
        0xE0..=0xEF => {
            if byte == 0xE0 {
                lower_boundary = 0xA0; // overlong
            }
            if byte == 0xED {
                upper_boundary = 0x9F; // surrogates
            }
            (2, u32::from(byte) & 0xF)
        }
        0xF0..=0xF4 => {
            if byte == 0xF0 {
                lower_boundary = 0x90; // overlong
            }
            if byte == 0xF4 {
                upper_boundary = 0x8F; // above U+10FFFF
            }
            (3, u32::from(byte) & 0x7)
        }
        _ => return (Rune::Invalid, 1),
    };
    for i in 1..=bytes_needed {
        let Some(&byte) = data.get(i) else {
            return (Rune::Invalid, 1);
        };
        if byte < lower_boundary || upper_boundary < byte {
            return (Rune::Invalid, 1);
        }
        lower_boundary = 0x80;
        upper_boundary = 0xBF;
        code_point = (code_point << 6) | (u32::from(byte) & 0x3F);
    }
    match char::from_u32(code_point) {
        Some(c) => (Rune::Char(c), bytes_needed + 1),
        None => (Rune::Invalid, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_widths() {
        assert_eq!(decode_rune(b"ab"), (Rune::Char('a'), 1));
        assert_eq!(decode_rune("\u{E9}".as_bytes()), (Rune::Char('\u{E9}'), 2));
        assert_eq!(decode_rune("\u{20AC}x".as_bytes()), (Rune::Char('\u{20AC}'), 3));
        assert_eq!(decode_rune("\u{1F600}".as_bytes()), (Rune::Char('\u{1F600}'), 4));
    }

    #[test]
    fn replacement_character_is_data() {
        assert_eq!(
            decode_rune(&[0xEF, 0xBF, 0xBD]),
            (Rune::Char(char::REPLACEMENT_CHARACTER), 3)
        );
    }

    #[test]
    fn rejects_malformed_sequences() {
        // misplaced continuation byte
        assert_eq!(decode_rune(&[0x80]), (Rune::Invalid, 1));
        // overlong encodings
        assert_eq!(decode_rune(&[0xC0, 0xAF]), (Rune::Invalid, 1));
        assert_eq!(decode_rune(&[0xE0, 0x80, 0xAF]), (Rune::Invalid, 1));
        assert_eq!(decode_rune(&[0xF0, 0x80, 0x80, 0xAF]), (Rune::Invalid, 1));
        // surrogate
        assert_eq!(decode_rune(&[0xED, 0xA0, 0x80]), (Rune::Invalid, 1));
        // above U+10FFFF
        assert_eq!(decode_rune(&[0xF4, 0x90, 0x80, 0x80]), (Rune::Invalid, 1));
        assert_eq!(decode_rune(&[0xF5, 0x80, 0x80, 0x80]), (Rune::Invalid, 1));
        // truncated
        assert_eq!(decode_rune(&[0xE2, 0x82]), (Rune::Invalid, 1));
        assert_eq!(decode_rune(&[0xE2, 0x82, b'a']), (Rune::Invalid, 1));
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_rune(&[]), (Rune::End, 0));
    }
}
