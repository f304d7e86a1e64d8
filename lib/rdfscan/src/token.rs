use crate::error::TextPosition;
use std::fmt;

/// The kind of a [`Token`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    /// The byte source is exhausted.
    EndOfStream,
    /// End of a physical line. Only emitted in [`ScanMode::Line`](crate::ScanMode::Line).
    EndOfLine,
    /// A scan error. The token text is the error message.
    Error,
    /// `<scheme:...>`
    IriAbsolute,
    /// `<...>` without a valid scheme.
    IriRelative,
    /// `_:label`
    BlankNode,
    /// `"..."` or `'...'`
    Literal,
    /// `"""..."""` or `'''...'''`
    LongLiteral,
    Integer,
    Decimal,
    Double,
    /// `true` or `false`
    Boolean,
    /// The `@` following a literal.
    LangMarker,
    LangTag,
    /// The `^^` following a literal.
    DatatypeMarker,
    Dot,
    Semicolon,
    Comma,
    /// The `a` keyword.
    RdfType,
    /// `@prefix`
    PrefixDirective,
    /// The part of a prefixed name before `:`.
    PrefixLabel,
    /// The part of a prefixed name after `:`.
    IriSuffix,
    /// `@base`
    BaseDirective,
    /// `PREFIX`
    SparqlPrefix,
    /// `BASE`
    SparqlBase,
    /// `[]`
    AnonBlankNode,
    PropertyListStart,
    PropertyListEnd,
    CollectionStart,
    CollectionEnd,
}

impl TokenKind {
    /// Returns true for the kinds after which the lexer emits nothing but [`TokenKind::EndOfStream`].
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EndOfStream | Self::Error)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EndOfStream => "end of stream",
            Self::EndOfLine => "end of line",
            Self::Error => "error",
            Self::IriAbsolute => "IRI",
            Self::IriRelative => "relative IRI",
            Self::BlankNode => "blank node",
            Self::Literal | Self::LongLiteral => "literal",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::LangMarker => "'@'",
            Self::LangTag => "language tag",
            Self::DatatypeMarker => "'^^'",
            Self::Dot => "'.'",
            Self::Semicolon => "';'",
            Self::Comma => "','",
            Self::RdfType => "'a'",
            Self::PrefixDirective => "'@prefix'",
            Self::PrefixLabel => "prefix label",
            Self::IriSuffix => "local name",
            Self::BaseDirective => "'@base'",
            Self::SparqlPrefix => "'PREFIX'",
            Self::SparqlBase => "'BASE'",
            Self::AnonBlankNode => "'[]'",
            Self::PropertyListStart => "'['",
            Self::PropertyListEnd => "']'",
            Self::CollectionStart => "'('",
            Self::CollectionEnd => "')'",
        })
    }
}

/// A lexical unit emitted by the [`Lexer`](crate::Lexer).
///
/// `text` never contains the token delimiters and has its escape sequences already resolved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: TextPosition,
    pub text: String,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, position: TextPosition, text: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            text: text.into(),
        }
    }

    /// 0-based line of the first byte of the token.
    #[inline]
    pub fn line(&self) -> u64 {
        self.position.line
    }

    /// 0-based byte column of the first byte of the token.
    #[inline]
    pub fn column(&self) -> u64 {
        self.position.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            self.kind.fmt(f)
        } else {
            write!(f, "{} '{}'", self.kind, self.text)
        }
    }
}
