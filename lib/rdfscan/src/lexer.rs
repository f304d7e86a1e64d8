//! The Turtle family scanner.
//!
//! The scanner reads its byte source one physical line at a time. The current state is stored
//! explicitly as a [`State`] and each state is a method returning the next one.
//! Tokens are queued in a small buffer (a single step emits at most two tokens) and handed out
//! one by one by [`Lexer::next_token`].

use crate::chars::{
    is_alpha, is_digit, is_disallowed_in_iri, is_hex_digit, is_local_name_first,
    is_local_name_mid, is_name_char, is_name_start, is_name_start_or_underscore,
    is_reserved_escapable, is_scheme_char, is_whitespace,
};
use crate::error::TextPosition;
use crate::escape::{unescape_numeric, unescape_reserved};
use crate::rune::{Rune, decode_rune};
use crate::token::{Token, TokenKind};
use memchr::memchr;
use std::collections::VecDeque;
use std::io::{self, BufRead};

/// How line jumps are handled by the [`Lexer`].
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ScanMode {
    /// Line based grammars (N-Triples, N-Quads): every line end (`\n`, `\r\n` or a lone `\r`) is emitted as a [`TokenKind::EndOfLine`] token.
    Line,
    /// Block based grammars (Turtle): line jumps are whitespace.
    Block,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum State {
    Any,
    NextLine,
    LiteralSuffix,
    PrefixLabel,
    LocalName,
    Done,
}

/// A streaming scanner for N-Triples, N-Quads and Turtle.
///
/// It only keeps the physical line being scanned in memory, or the lines of the triple-quoted literal being scanned.
///
/// ```
/// use rdfscan::{Lexer, ScanMode, TokenKind};
///
/// let mut lexer = Lexer::new(b"<http://example.com/s> \"foo\"@en .".as_slice(), ScanMode::Block);
/// let kinds = lexer
///     .by_ref()
///     .map(|token| token.map(|token| token.kind))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::IriAbsolute,
///         TokenKind::Literal,
///         TokenKind::LangMarker,
///         TokenKind::LangTag,
///         TokenKind::Dot,
///         TokenKind::EndOfStream
///     ]
/// );
/// # Result::<_, std::io::Error>::Ok(())
/// ```
pub struct Lexer<R> {
    input: R,
    mode: ScanMode,
    state: State,
    buf: Vec<u8>,
    /// stream offset of `buf[0]`
    buf_offset: u64,
    pos: usize,
    start: usize,
    start_position: TextPosition,
    /// line number of the physical line beginning at `line_start`
    line: u64,
    line_start: usize,
    has_read_line: bool,
    unescape: bool,
    pending: VecDeque<Token>,
    is_iterator_done: bool,
}

impl<R: BufRead> Lexer<R> {
    /// Builds a scanner reading from `input`.
    ///
    /// Nothing is read before the first call to [`Lexer::next_token`].
    pub fn new(input: R, mode: ScanMode) -> Self {
        Self {
            input,
            mode,
            state: State::NextLine,
            buf: Vec::new(),
            buf_offset: 0,
            pos: 0,
            start: 0,
            start_position: TextPosition::default(),
            line: 0,
            line_start: 0,
            has_read_line: false,
            unescape: false,
            pending: VecDeque::with_capacity(2),
            is_iterator_done: false,
        }
    }

    #[inline]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scans and returns the next token.
    ///
    /// After a [`TokenKind::Error`] or a [`TokenKind::EndOfStream`] token, it only returns [`TokenKind::EndOfStream`] tokens.
    /// I/O errors of the byte source are returned as `Err` and also end the scan.
    pub fn next_token(&mut self) -> io::Result<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let next = match self.state {
                State::Any => self.lex_any(),
                State::NextLine => self.next_line(State::Any),
                State::LiteralSuffix => Ok(self.lex_literal_suffix()),
                State::PrefixLabel => self.lex_prefix_label(),
                State::LocalName => Ok(self.lex_local_name()),
                State::Done => {
                    return Ok(Token::new(
                        TokenKind::EndOfStream,
                        self.position_at(self.pos),
                        "",
                    ));
                }
            };
            match next {
                Ok(state) => self.state = state,
                Err(e) => {
                    self.state = State::Done;
                    return Err(e);
                }
            }
        }
    }

    fn lex_any(&mut self) -> io::Result<State> {
        self.skip_whitespace();
        self.begin();
        let c = match self.peek() {
            Rune::Char(c) => c,
            Rune::End => return Ok(self.end_of_line()),
            Rune::Invalid => return Ok(self.invalid_utf8()),
        };
        Ok(match c {
            '\n' => self.end_of_line(),
            '\r' => self.carriage_return(),
            '#' => self.skip_comment(),
            '@' => {
                self.advance(1);
                self.lex_directive()
            }
            '_' => {
                if self.byte_at(self.pos + 1) == Some(b':') {
                    self.advance(2);
                    self.lex_blank_node_label()
                } else {
                    self.error("expected ':' after '_' in blank node label")
                }
            }
            '<' => self.lex_iri(),
            '"' => return self.lex_literal(b'"'),
            '\'' => return self.lex_literal(b'\''),
            '0'..='9' | '+' | '-' => self.lex_number(),
            '.' => {
                if self.byte_at(self.pos + 1).is_some_and(|b| is_digit(char::from(b))) {
                    self.lex_number()
                } else {
                    self.punctuation(TokenKind::Dot)
                }
            }
            ';' => self.punctuation(TokenKind::Semicolon),
            ',' => self.punctuation(TokenKind::Comma),
            '(' => self.punctuation(TokenKind::CollectionStart),
            ')' => self.punctuation(TokenKind::CollectionEnd),
            ']' => self.punctuation(TokenKind::PropertyListEnd),
            '[' => return self.lex_bracket(),
            '^' => self.error("unexpected '^^' without a preceding literal"),
            c => self.lex_keyword_or_name(c),
        })
    }

    fn end_of_line(&mut self) -> State {
        if self.mode == ScanMode::Line {
            self.begin();
            self.emit_marker(TokenKind::EndOfLine);
        }
        State::NextLine
    }

    /// Only reached in line mode, on a `\r` that is not followed by `\n`.
    fn carriage_return(&mut self) -> State {
        self.advance(1);
        if self.pos >= self.buf.len() {
            return self.end_of_line();
        }
        self.emit_marker(TokenKind::EndOfLine);
        self.line += 1;
        self.line_start = self.pos;
        State::Any
    }

    /// A comment runs up to the next `\r` or `\n`.
    fn skip_comment(&mut self) -> State {
        match memchr(b'\r', &self.buf[self.pos..]) {
            Some(offset) => {
                self.advance(offset);
                State::Any
            }
            None => self.end_of_line(),
        }
    }

    /// Drops the scanned lines and reads the next one.
    fn next_line(&mut self, then: State) -> io::Result<State> {
        self.buf_offset += self.buf.len() as u64;
        self.buf.clear();
        self.pos = 0;
        self.start = 0;
        self.line_start = 0;
        if self.pull_line()? {
            Ok(then)
        } else {
            self.begin();
            self.emit_marker(TokenKind::EndOfStream);
            Ok(State::Done)
        }
    }

    /// Appends the next physical line to the buffer. Returns false at the end of the input.
    fn pull_line(&mut self) -> io::Result<bool> {
        let line_start = self.buf.len();
        if self.input.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        if self.has_read_line {
            self.line += 1;
        }
        self.has_read_line = true;
        self.line_start = line_start;
        Ok(true)
    }

    fn lex_directive(&mut self) -> State {
        if self.at_keyword("prefix") {
            self.advance(6);
            self.emit_marker(TokenKind::PrefixDirective);
            State::PrefixLabel
        } else if self.at_keyword("base") {
            self.advance(4);
            self.emit_marker(TokenKind::BaseDirective);
            State::Any
        } else {
            self.error("unrecognized directive: expected '@prefix' or '@base'")
        }
    }

    /// Checks if the input at the cursor is `keyword` not followed by a name character.
    fn at_keyword(&self, keyword: &str) -> bool {
        self.buf[self.pos..].starts_with(keyword.as_bytes())
            && !decode_rune(&self.buf[self.pos + keyword.len()..])
                .0
                .char()
                .is_some_and(|c| is_name_char(c) || c == ':')
    }

    /// Checks if the input at the cursor is `keyword` (in any case) followed by whitespace.
    fn at_sparql_keyword(&self, keyword: &str) -> bool {
        self.buf
            .get(self.pos..self.pos + keyword.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(keyword.as_bytes()))
            && self
                .byte_at(self.pos + keyword.len())
                .is_none_or(|b| is_whitespace(char::from(b)))
    }

    fn lex_keyword_or_name(&mut self, c: char) -> State {
        if c == 'a' && is_rdf_type_end(self.byte_at(self.pos + 1)) {
            self.advance(1);
            self.emit_marker(TokenKind::RdfType);
            return State::Any;
        }
        if self.at_sparql_keyword("PREFIX") {
            self.advance(6);
            self.emit_marker(TokenKind::SparqlPrefix);
            return State::PrefixLabel;
        }
        if self.at_sparql_keyword("BASE") {
            self.advance(4);
            self.emit_marker(TokenKind::SparqlBase);
            return State::Any;
        }
        for keyword in ["true", "false"] {
            if self.at_keyword(keyword) {
                self.advance(keyword.len());
                self.emit(TokenKind::Boolean);
                return State::Any;
            }
        }
        if c == ':' || is_name_start(c) {
            return self.lex_prefixed_name();
        }
        self.error(format!("unexpected character '{c}'"))
    }

    /// `PNAME_NS` in a prefix declaration, after `@prefix` or `PREFIX`.
    fn lex_prefix_label(&mut self) -> io::Result<State> {
        self.skip_whitespace();
        if matches!(self.peek(), Rune::End | Rune::Char('\n' | '\r' | '#')) {
            if self.mode == ScanMode::Block {
                return self.next_line(State::PrefixLabel);
            }
            self.begin();
            return Ok(self.error("expected a prefix label after the prefix directive"));
        }
        self.begin();
        let Some(label_end) = self.scan_prefix() else {
            return Ok(State::Done);
        };
        if !self.peek().is(':') {
            return Ok(self.error("illegal prefix label: expected ':' after the prefix name"));
        }
        self.pos = label_end;
        self.emit(TokenKind::PrefixLabel);
        self.advance(1);
        Ok(State::Any)
    }

    /// `PNAME_NS` or `PNAME_LN` outside of a prefix declaration.
    fn lex_prefixed_name(&mut self) -> State {
        let Some(label_end) = self.scan_prefix() else {
            return State::Done;
        };
        if !self.peek().is(':') {
            let name = String::from_utf8_lossy(&self.buf[self.start..label_end]).into_owned();
            return self.error(format!(
                "unexpected name '{name}': expected a keyword or a prefixed name"
            ));
        }
        self.emit(TokenKind::PrefixLabel);
        self.advance(1);
        match self.peek() {
            Rune::Char(c) if is_local_name_first(c) => State::LocalName,
            _ => State::Any,
        }
    }

    /// Scans `PN_PREFIX?` and returns the end offset of the label.
    ///
    /// Returns `None` after emitting an error.
    fn scan_prefix(&mut self) -> Option<usize> {
        // [167s] PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
        match self.peek() {
            Rune::Char(':') => return Some(self.pos),
            Rune::Char(c) if is_name_start(c) => self.advance(c.len_utf8()),
            Rune::Invalid => {
                self.invalid_utf8();
                return None;
            }
            Rune::Char(c) => {
                self.error(format!("illegal prefix label: unexpected character '{c}'"));
                return None;
            }
            Rune::End => {
                self.error("illegal prefix label: unexpected end of line");
                return None;
            }
        }
        loop {
            match self.peek() {
                Rune::Char(c) if is_name_char(c) || c == '.' => self.advance(c.len_utf8()),
                Rune::Invalid => {
                    self.invalid_utf8();
                    return None;
                }
                _ => break,
            }
        }
        if self.buf[self.start..self.pos].ends_with(b".") {
            if self.peek().is(':') {
                self.error("illegal prefix label: a prefix must not end with '.'");
                return None;
            }
            // the dots belong to the next token
            while self.buf[self.start..self.pos].ends_with(b".") {
                self.pos -= 1;
            }
        }
        Some(self.pos)
    }

    /// `PN_LOCAL` after a `PrefixLabel` token.
    fn lex_local_name(&mut self) -> State {
        // [168s] PN_LOCAL ::= (PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
        self.begin();
        let mut trailing_dots = None;
        loop {
            let is_first = self.pos == self.start;
            match self.peek() {
                Rune::Char('%') => {
                    let is_valid = self
                        .count_bytes_from(self.pos + 1, |b| is_hex_digit(char::from(b)))
                        >= 2;
                    if !is_valid {
                        return self.error_here(
                            "invalid percent-encoding in local name: '%' must be followed by two hexadecimal digits",
                        );
                    }
                    self.advance(3);
                    trailing_dots = None;
                }
                Rune::Char('\\') => match decode_rune(&self.buf[self.pos + 1..]).0 {
                    Rune::Char(c) if is_reserved_escapable(c) => {
                        self.unescape = true;
                        self.advance(1 + c.len_utf8());
                        trailing_dots = None;
                    }
                    _ => {
                        return self.error_here(
                            "illegal escape in local name: only _~.-!$&'()*+,;=/?#@% can be escaped",
                        );
                    }
                },
                Rune::Char('.') if !is_first => {
                    trailing_dots.get_or_insert(self.pos);
                    self.advance(1);
                }
                Rune::Char(c) if is_first && is_local_name_first(c) => self.advance(c.len_utf8()),
                Rune::Char(c) if !is_first && is_local_name_mid(c) => {
                    self.advance(c.len_utf8());
                    trailing_dots = None;
                }
                Rune::Invalid => return self.invalid_utf8(),
                _ => break,
            }
        }
        if let Some(dots_start) = trailing_dots {
            self.pos = dots_start;
        }
        self.emit(TokenKind::IriSuffix);
        State::Any
    }

    /// `BLANK_NODE_LABEL`, after `_:`.
    fn lex_blank_node_label(&mut self) -> State {
        // [141s] BLANK_NODE_LABEL ::= '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
        self.start = self.pos;
        match self.peek() {
            Rune::Char(c) if is_name_start_or_underscore(c) || is_digit(c) => {
                self.advance(c.len_utf8());
            }
            Rune::Invalid => return self.invalid_utf8(),
            _ => return self.error("illegal blank node label: expected a name character after '_:'"),
        }
        loop {
            match self.peek() {
                Rune::Char(c) if is_name_char(c) => self.advance(c.len_utf8()),
                Rune::Char('.') => {
                    // dots are only allowed if a name character follows them
                    let dots = self.buf[self.pos..]
                        .iter()
                        .take_while(|b| **b == b'.')
                        .count();
                    match decode_rune(&self.buf[self.pos + dots..]).0 {
                        Rune::Char(c) if is_name_char(c) => self.advance(dots),
                        _ => break,
                    }
                }
                Rune::Invalid => return self.invalid_utf8(),
                _ => break,
            }
        }
        self.emit(TokenKind::BlankNode);
        State::Any
    }

    /// `IRIREF`. The absolute or relative kind is decided on the first ':'.
    fn lex_iri(&mut self) -> State {
        // [18] IRIREF ::= '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
        self.advance(1);
        self.start = self.pos;
        let mut is_absolute = None;
        loop {
            match self.peek() {
                Rune::Char('>') => break,
                Rune::End | Rune::Char('\n') => {
                    return self.error("unterminated IRI: missing '>'");
                }
                Rune::Invalid => return self.invalid_utf8(),
                Rune::Char('\\') => match self.scan_escape(false) {
                    Ok(Some(c)) if is_disallowed_in_iri(c) => {
                        return self.error_here(format!(
                            "the escaped character {c:?} is not allowed in IRIs"
                        ));
                    }
                    Ok(_) => (),
                    Err(message) => return self.error_here(message),
                },
                Rune::Char(':') => {
                    if is_absolute.is_none() {
                        is_absolute = Some(self.is_valid_scheme());
                    }
                    self.advance(1);
                }
                Rune::Char(c) if is_disallowed_in_iri(c) => {
                    return self.error_here(format!("the character {c:?} is not allowed in IRIs"));
                }
                Rune::Char(c) => self.advance(c.len_utf8()),
            }
        }
        self.emit(if is_absolute == Some(true) {
            TokenKind::IriAbsolute
        } else {
            TokenKind::IriRelative
        });
        self.advance(1);
        State::Any
    }

    /// The cursor is on the first ':' of an IRI.
    fn is_valid_scheme(&self) -> bool {
        // scheme ::= ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        let scheme = &self.buf[self.start..self.pos];
        let Some((first, rest)) = scheme.split_first() else {
            return false;
        };
        is_alpha(char::from(*first))
            && rest.iter().all(|b| is_scheme_char(char::from(*b)))
            && !matches!(self.byte_at(self.pos + 1), Some(b'>') | None)
    }

    /// Validates the escape sequence at the cursor and moves after it.
    ///
    /// Returns the decoded character of `UCHAR` sequences.
    fn scan_escape(&mut self, with_echar: bool) -> Result<Option<char>, String> {
        // [26]   UCHAR ::= '\u' HEX HEX HEX HEX | '\U' HEX HEX HEX HEX HEX HEX HEX HEX
        // [159s] ECHAR ::= '\' [tbnrf"'\]
        let digits = match self.byte_at(self.pos + 1) {
            Some(b't' | b'b' | b'n' | b'r' | b'f' | b'"' | b'\'' | b'\\') if with_echar => {
                self.unescape = true;
                self.advance(2);
                return Ok(None);
            }
            Some(b'u') => 4,
            Some(b'U') => 8,
            Some(c) if c.is_ascii_graphic() => {
                return Err(format!(
                    "illegal escape sequence '\\{}'",
                    char::from(c)
                ));
            }
            _ => return Err("illegal escape sequence".into()),
        };
        let hex_start = self.pos + 2;
        let hex = self
            .buf
            .get(hex_start..hex_start + digits)
            .filter(|hex| hex.iter().all(|b| is_hex_digit(char::from(*b))))
            .ok_or_else(|| {
                format!("illegal escape sequence: expected {digits} hexadecimal digits")
            })?;
        let code_point = hex
            .iter()
            .fold(0, |acc, b| acc * 16 + char::from(*b).to_digit(16).unwrap_or_default());
        let c = char::from_u32(code_point).ok_or_else(|| {
            format!("the escape sequence encodes {code_point:X} that is not a valid unicode character")
        })?;
        self.unescape = true;
        self.advance(2 + digits);
        Ok(Some(c))
    }

    fn lex_literal(&mut self, delimiter: u8) -> io::Result<State> {
        // [22] STRING_LITERAL_QUOTE ::= '"' ([^#x22#x5C#xA#xD] | ECHAR | UCHAR)* '"'
        // [25] STRING_LITERAL_LONG_QUOTE ::= '"""' (('"' | '""')? ([^"\] | ECHAR | UCHAR))* '"""'
        let quotes = self.buf[self.pos..]
            .iter()
            .take(6)
            .take_while(|b| **b == delimiter)
            .count();
        match quotes {
            2 => {
                self.advance(2);
                self.emit_marker(TokenKind::Literal);
                Ok(State::LiteralSuffix)
            }
            6 => {
                self.advance(6);
                self.emit_marker(TokenKind::LongLiteral);
                Ok(State::LiteralSuffix)
            }
            1 => {
                self.advance(1);
                self.start = self.pos;
                Ok(self.scan_short_literal(delimiter))
            }
            _ => {
                self.advance(3);
                self.start = self.pos;
                self.scan_long_literal(delimiter)
            }
        }
    }

    fn scan_short_literal(&mut self, delimiter: u8) -> State {
        let quote = char::from(delimiter);
        loop {
            match self.peek() {
                Rune::End | Rune::Char('\n' | '\r') => {
                    return self.error("unterminated literal: missing closing quote");
                }
                Rune::Invalid => return self.invalid_utf8(),
                Rune::Char('\\') => {
                    if let Err(message) = self.scan_escape(true) {
                        return self.error_here(message);
                    }
                }
                Rune::Char(c) if c == quote => {
                    self.emit(TokenKind::Literal);
                    self.advance(1);
                    return State::LiteralSuffix;
                }
                Rune::Char(c) => self.advance(c.len_utf8()),
            }
        }
    }

    fn scan_long_literal(&mut self, delimiter: u8) -> io::Result<State> {
        let quote = char::from(delimiter);
        loop {
            match self.peek() {
                Rune::End => {
                    if !self.pull_line()? {
                        return Ok(self.error("unterminated literal: missing closing quotes"));
                    }
                }
                Rune::Invalid => return Ok(self.invalid_utf8()),
                Rune::Char('\\') => {
                    if let Err(message) = self.scan_escape(true) {
                        return Ok(self.error_here(message));
                    }
                }
                Rune::Char(c) if c == quote => {
                    if self.byte_at(self.pos + 1) == Some(delimiter)
                        && self.byte_at(self.pos + 2) == Some(delimiter)
                    {
                        self.emit(TokenKind::LongLiteral);
                        self.advance(3);
                        return Ok(State::LiteralSuffix);
                    }
                    self.advance(1);
                }
                Rune::Char(c) => self.advance(c.len_utf8()),
            }
        }
    }

    /// Language tag or datatype marker right after a literal.
    fn lex_literal_suffix(&mut self) -> State {
        match self.byte_at(self.pos) {
            Some(b'@') => {
                self.begin();
                self.advance(1);
                self.emit_marker(TokenKind::LangMarker);
                self.lex_lang_tag()
            }
            Some(b'^') => {
                self.begin();
                if self.byte_at(self.pos + 1) != Some(b'^') {
                    return self.error("expected '^^' before the literal datatype");
                }
                self.advance(2);
                self.emit_marker(TokenKind::DatatypeMarker);
                State::Any
            }
            _ => State::Any,
        }
    }

    fn lex_lang_tag(&mut self) -> State {
        // [144s] LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
        self.begin();
        let primary = self.count_bytes_from(self.pos, |b| is_alpha(char::from(b)));
        if primary == 0 {
            return self.error("illegal language tag: it must start with a letter");
        }
        self.advance(primary);
        while self.byte_at(self.pos) == Some(b'-') {
            let subtag = self.count_bytes_from(self.pos + 1, |b| {
                is_alpha(char::from(b)) || is_digit(char::from(b))
            });
            if subtag == 0 {
                return self.error_here("illegal language tag: empty subtag after '-'");
            }
            self.advance(1 + subtag);
        }
        self.emit(TokenKind::LangTag);
        State::Any
    }

    fn lex_number(&mut self) -> State {
        // [19] INTEGER ::= [+-]? [0-9]+
        // [20] DECIMAL ::= [+-]? [0-9]* '.' [0-9]+
        // [21] DOUBLE  ::= [+-]? ([0-9]+ '.' [0-9]* EXPONENT | '.' [0-9]+ EXPONENT | [0-9]+ EXPONENT)
        if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
            self.advance(1);
        }
        let mut seen_dot = false;
        let mut seen_exponent = false;
        let mut mantissa_digits = 0;
        loop {
            match self.byte_at(self.pos) {
                Some(b'0'..=b'9') => {
                    mantissa_digits += 1;
                    self.advance(1);
                }
                Some(b'.')
                    if !seen_dot
                        && matches!(
                            self.byte_at(self.pos + 1),
                            Some(b'0'..=b'9' | b'e' | b'E')
                        ) =>
                {
                    seen_dot = true;
                    self.advance(1);
                }
                Some(b'e' | b'E') => {
                    seen_exponent = true;
                    self.advance(1);
                    if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
                        self.advance(1);
                    }
                    let exponent_digits =
                        self.count_bytes_from(self.pos, |b| is_digit(char::from(b)));
                    if exponent_digits == 0 {
                        return self.error("illegal number: the exponent must have at least one digit");
                    }
                    self.advance(exponent_digits);
                    break;
                }
                _ => break,
            }
        }
        if mantissa_digits == 0 {
            return self.error("illegal number: expected at least one digit");
        }
        let is_number_end = self.byte_at(self.pos).is_none_or(|b| {
            is_whitespace(char::from(b))
                || matches!(
                    b,
                    b'#' | b'.' | b',' | b';' | b'(' | b')' | b'[' | b']' | b'<' | b'"' | b'\''
                )
        });
        if !is_number_end {
            return self.error("illegal number: unexpected character after the number");
        }
        self.emit(if seen_exponent {
            TokenKind::Double
        } else if seen_dot {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        });
        State::Any
    }

    /// `[` starts a property list unless only whitespace separates it from `]`.
    ///
    /// In block mode the lookahead reads the following lines while they are blank.
    fn lex_bracket(&mut self) -> io::Result<State> {
        // [162s] ANON ::= '[' WS* ']'
        let is_block = self.mode == ScanMode::Block;
        let mut end = self.pos + 1;
        let mut has_pulled_lines = false;
        loop {
            end += self.count_bytes_from(end, |b| {
                is_whitespace(char::from(b)) && (is_block || !matches!(b, b'\n' | b'\r'))
            });
            if end < self.buf.len() || !is_block || !self.pull_line()? {
                break;
            }
            has_pulled_lines = true;
        }
        if self.byte_at(end) == Some(b']') {
            self.pos = end + 1;
            self.emit_marker(TokenKind::AnonBlankNode);
        } else {
            // the skipped line jumps are whitespace in block mode
            self.pos = if has_pulled_lines { end } else { self.pos + 1 };
            self.emit_marker(TokenKind::PropertyListStart);
        }
        Ok(State::Any)
    }

    fn punctuation(&mut self, kind: TokenKind) -> State {
        self.advance(1);
        self.emit_marker(kind);
        State::Any
    }

    #[inline]
    fn peek(&self) -> Rune {
        decode_rune(self.buf.get(self.pos..).unwrap_or_default()).0
    }

    #[inline]
    fn byte_at(&self, i: usize) -> Option<u8> {
        self.buf.get(i).copied()
    }

    fn count_bytes_from(&self, from: usize, predicate: impl Fn(u8) -> bool) -> usize {
        self.buf
            .get(from..)
            .unwrap_or_default()
            .iter()
            .take_while(|b| predicate(**b))
            .count()
    }

    #[inline]
    fn advance(&mut self, width: usize) {
        self.pos += width;
    }

    /// Skips whitespace up to the next line end.
    fn skip_whitespace(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            let is_line_end = b == b'\n'
                || (b == b'\r'
                    && self.mode == ScanMode::Line
                    && self.byte_at(self.pos + 1) != Some(b'\n'));
            if is_line_end || !is_whitespace(char::from(b)) {
                break;
            }
            self.advance(1);
        }
    }

    fn position_at(&self, pos: usize) -> TextPosition {
        TextPosition {
            line: self.line,
            column: pos.saturating_sub(self.line_start) as u64,
            offset: self.buf_offset + pos as u64,
        }
    }

    /// Marks the cursor as the start of the next token.
    fn begin(&mut self) {
        self.start = self.pos;
        self.start_position = self.position_at(self.pos);
        self.unescape = false;
    }

    /// Emits the token spanning from `start` to the cursor.
    fn emit(&mut self, kind: TokenKind) {
        // the bytes were decoded rune by rune while scanning, so this never replaces anything
        let raw = String::from_utf8_lossy(&self.buf[self.start..self.pos]);
        let text = if self.unescape {
            if kind == TokenKind::IriSuffix {
                unescape_reserved(&raw)
            } else {
                unescape_numeric(&raw)
            }
        } else {
            raw.into_owned()
        };
        self.unescape = false;
        self.pending
            .push_back(Token::new(kind, self.start_position, text));
    }

    fn emit_marker(&mut self, kind: TokenKind) {
        self.pending
            .push_back(Token::new(kind, self.start_position, ""));
    }

    /// Emits an error located at the start of the current token and stops the scan.
    fn error(&mut self, message: impl Into<String>) -> State {
        self.fail(self.start_position, message.into())
    }

    /// Emits an error located at the cursor and stops the scan.
    fn error_here(&mut self, message: impl Into<String>) -> State {
        self.fail(self.position_at(self.pos), message.into())
    }

    fn invalid_utf8(&mut self) -> State {
        self.error_here("invalid UTF-8 encoding")
    }

    fn fail(&mut self, position: TextPosition, message: String) -> State {
        tracing::debug!(
            line = position.line + 1,
            column = position.column + 1,
            %message,
            "scan error"
        );
        self.pending
            .push_back(Token::new(TokenKind::Error, position, message));
        State::Done
    }
}

fn is_rdf_type_end(next: Option<u8>) -> bool {
    next.is_none_or(|b| {
        is_whitespace(char::from(b)) || matches!(b, b'#' | b'<' | b'"' | b'\'' | b'[' | b'(')
    })
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = io::Result<Token>;

    /// Returns tokens up to and including the first [`TokenKind::EndOfStream`] or [`TokenKind::Error`] one.
    fn next(&mut self) -> Option<io::Result<Token>> {
        if self.is_iterator_done {
            return None;
        }
        let result = self.next_token();
        self.is_iterator_done = match &result {
            Ok(token) => token.kind.is_terminal(),
            Err(_) => true,
        };
        Some(result)
    }
}
