//! Token sources: the pull-based [`Lexer`] and the [`TokenStream`] fed by a background scanner.

use crate::error::TextPosition;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use std::io::{self, BufRead};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread;

/// Something handing out [`Token`]s in stream order.
///
/// After a terminal token ([`TokenKind::EndOfStream`] or [`TokenKind::Error`]) or an I/O error,
/// implementations must only return [`TokenKind::EndOfStream`] tokens.
pub trait TokenSource {
    fn next_token(&mut self) -> io::Result<Token>;
}

impl<R: BufRead> TokenSource for Lexer<R> {
    #[inline]
    fn next_token(&mut self) -> io::Result<Token> {
        Lexer::next_token(self)
    }
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    #[inline]
    fn next_token(&mut self) -> io::Result<Token> {
        (**self).next_token()
    }
}

impl<R: BufRead + Send + 'static> Lexer<R> {
    /// Moves the scanner to a background thread.
    ///
    /// The thread hands tokens over one at a time: it blocks after scanning a token until the
    /// returned [`TokenStream`] takes it, so at most one token is in flight.
    ///
    /// ```
    /// use rdfscan::{Lexer, ScanMode, TokenKind};
    ///
    /// let mut stream = Lexer::new(b"<http://example.com/s> .".as_slice(), ScanMode::Block).spawn()?;
    /// assert_eq!(stream.next_token()?.kind, TokenKind::IriAbsolute);
    /// assert_eq!(stream.next_token()?.kind, TokenKind::Dot);
    /// assert_eq!(stream.next_token()?.kind, TokenKind::EndOfStream);
    /// # Result::<_, std::io::Error>::Ok(())
    /// ```
    pub fn spawn(self) -> io::Result<TokenStream> {
        let (sender, receiver) = sync_channel(0);
        thread::Builder::new()
            .name("rdfscan-lexer".into())
            .spawn(move || produce(self, &sender))?;
        Ok(TokenStream {
            receiver: Some(receiver),
            last_position: TextPosition::default(),
        })
    }
}

fn produce<R: BufRead>(mut lexer: Lexer<R>, sender: &SyncSender<io::Result<Token>>) {
    tracing::debug!(mode = ?lexer.mode(), "background scanner started");
    loop {
        let result = lexer.next_token();
        let is_last = match &result {
            Ok(token) => {
                tracing::trace!(
                    kind = %token.kind,
                    line = token.position.line + 1,
                    "handing off token"
                );
                token.kind.is_terminal()
            }
            Err(_) => true,
        };
        if sender.send(result).is_err() {
            tracing::debug!("background scanner cancelled");
            return;
        }
        if is_last {
            break;
        }
    }
    tracing::debug!("background scanner stopped");
}

/// The consuming end of a background scanner started with [`Lexer::spawn`].
///
/// Dropping it (or calling [`TokenStream::cancel`]) stops the scanner at its next hand-off.
pub struct TokenStream {
    receiver: Option<Receiver<io::Result<Token>>>,
    last_position: TextPosition,
}

impl TokenStream {
    /// Waits for the next token.
    pub fn next_token(&mut self) -> io::Result<Token> {
        let Some(receiver) = &self.receiver else {
            return Ok(self.end_of_stream());
        };
        match receiver.recv() {
            Ok(Ok(token)) => {
                self.last_position = token.position;
                if token.kind.is_terminal() {
                    self.receiver = None;
                }
                Ok(token)
            }
            Ok(Err(e)) => {
                self.receiver = None;
                Err(e)
            }
            // the scanner thread is gone
            Err(_) => {
                self.receiver = None;
                Ok(self.end_of_stream())
            }
        }
    }

    /// Stops the background scanner. Later calls to [`TokenStream::next_token`] return [`TokenKind::EndOfStream`].
    pub fn cancel(&mut self) {
        if self.receiver.take().is_some() {
            tracing::debug!("cancelling background scanner");
        }
    }

    fn end_of_stream(&self) -> Token {
        Token::new(TokenKind::EndOfStream, self.last_position, "")
    }
}

impl TokenSource for TokenStream {
    #[inline]
    fn next_token(&mut self) -> io::Result<Token> {
        TokenStream::next_token(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::ScanMode;
    use std::io::{BufReader, Read};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    const DATA: &str = "<http://e/s> <http://e/p> \"o\"@en .\n_:b <http://e/p> 1.5 .\n";

    fn collect(source: &mut impl TokenSource) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = source.next_token().unwrap();
            let is_terminal = token.kind.is_terminal();
            tokens.push(token);
            if is_terminal {
                return tokens;
            }
        }
    }

    #[test]
    fn spawned_and_pulled_tokens_are_the_same() {
        let mut pulled = Lexer::new(DATA.as_bytes(), ScanMode::Line);
        let mut spawned = Lexer::new(DATA.as_bytes(), ScanMode::Line)
            .spawn()
            .unwrap();
        assert_eq!(collect(&mut pulled), collect(&mut spawned));
    }

    #[test]
    fn end_of_stream_is_repeated() {
        let mut stream = Lexer::new(b"<a>".as_slice(), ScanMode::Block)
            .spawn()
            .unwrap();
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::IriRelative);
        for _ in 0..3 {
            assert_eq!(stream.next_token().unwrap().kind, TokenKind::EndOfStream);
        }
    }

    #[test]
    fn error_is_terminal() {
        let mut stream = Lexer::new(b"<a> \"b".as_slice(), ScanMode::Block)
            .spawn()
            .unwrap();
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::IriRelative);
        let error = stream.next_token().unwrap();
        assert_eq!(error.kind, TokenKind::Error);
        assert_eq!(error.column(), 4);
        let end = stream.next_token().unwrap();
        assert_eq!(end.kind, TokenKind::EndOfStream);
        assert_eq!(end.position, error.position);
    }

    struct Endless {
        dropped: Arc<AtomicBool>,
    }

    impl Read for Endless {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let line = b"<a> <b> <c> .\n";
            let len = line.len().min(buf.len());
            buf[..len].copy_from_slice(&line[..len]);
            Ok(len)
        }
    }

    impl Drop for Endless {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn cancel_stops_the_scanner() {
        let dropped = Arc::new(AtomicBool::new(false));
        let input = BufReader::new(Endless {
            dropped: Arc::clone(&dropped),
        });
        let mut stream = Lexer::new(input, ScanMode::Line).spawn().unwrap();
        for _ in 0..10 {
            assert_ne!(stream.next_token().unwrap().kind, TokenKind::EndOfStream);
        }
        stream.cancel();
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::EndOfStream);
        let deadline = Instant::now() + Duration::from_secs(10);
        while !dropped.load(Ordering::SeqCst) {
            assert!(Instant::now() < deadline, "the scanner thread did not stop");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn io_errors_are_forwarded() {
        struct Failing;

        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut stream = Lexer::new(BufReader::new(Failing), ScanMode::Block)
            .spawn()
            .unwrap();
        assert_eq!(stream.next_token().unwrap_err().to_string(), "disk on fire");
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::EndOfStream);
    }
}
