//! Channel‑backed token stream.
//!
//! [`TokenStream::spawn`] runs a [`Scanner`] on its own producer thread and
//! hands tokens to the consumer through a bounded `sync_channel`:
//!
//! ```text
//!   producer thread                      consumer (parser)
//!   Scanner ──send──▶ [ capacity slots ] ──recv──▶ TokenStream::next
//! ```
//!
//! * `recv` blocks until a token arrives or the channel closes.
//! * `send` blocks while all slots are full, so the scanner never runs far
//!   ahead of the parser.
//! * The producer drops its sender right after the terminal `EOF` / `ERROR`
//!   token, which closes the stream.
//! * If the consumer is dropped first, the producer's next `send` fails and
//!   it stops scanning.
//!
//! The scanner itself is also an `Iterator<Item = Token>`, so the parser can
//! pull tokens directly without any thread at all. Both sources deliver the
//! same tokens in the same order.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::error::{CalcError, Result};
use crate::scanner::Scanner;
use crate::token::Token;

/// Slots in the token channel when the caller does not choose.
pub const DEFAULT_CAPACITY: usize = 2;

/// Receiving end of a tokenizer running on a producer thread.
pub struct TokenStream {
    rx: Option<Receiver<Token>>,
    producer: Option<JoinHandle<usize>>,
}

impl TokenStream {
    /// Start tokenizing `source` on a new thread, buffering at most
    /// `capacity` tokens ahead of the consumer.
    pub fn spawn<S: Into<String>>(source: S, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CalcError::Config(
                "token stream capacity must be at least 1".to_string(),
            ));
        }

        let source: String = source.into();
        let (tx, rx) = mpsc::sync_channel::<Token>(capacity);

        info!(
            "Spawning tokenizer thread: {} bytes, capacity {}",
            source.len(),
            capacity
        );

        let producer = thread::Builder::new()
            .name("tokenizer".to_string())
            .spawn(move || produce(&source, tx))?;

        Ok(Self {
            rx: Some(rx),
            producer: Some(producer),
        })
    }
}

/// Producer loop: scan `source` and push every token, stopping after the
/// terminal one or as soon as the consumer hangs up. Returns the number of
/// tokens delivered.
fn produce(source: &str, tx: SyncSender<Token>) -> usize {
    let mut sent: usize = 0;

    for token in Scanner::new(source) {
        let terminal = token.kind.is_terminal();

        if tx.send(token).is_err() {
            debug!("Token consumer hung up after {} tokens", sent);

            return sent;
        }

        sent += 1;

        if terminal {
            break;
        }
    }

    debug!("Tokenizer thread finished, {} tokens sent", sent);

    sent
    // `tx` dropped here → stream closed
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.as_ref()?.recv().ok()
    }
}

impl Drop for TokenStream {
    fn drop(&mut self) {
        // Close our end first so a producer blocked on `send` wakes up.
        self.rx.take();

        if let Some(handle) = self.producer.take() {
            match handle.join() {
                Ok(sent) => debug!("Joined tokenizer thread ({} tokens)", sent),
                Err(_) => warn!("Tokenizer thread panicked"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn channel_delivers_scanner_order() {
        let source = "(1 + 2.5) * -3";
        let pulled: Vec<Token> = Scanner::new(source).collect();
        let streamed: Vec<Token> = TokenStream::spawn(source, 1).unwrap().collect();

        assert_eq!(pulled, streamed);
    }

    #[test]
    fn stream_closes_after_error_token() {
        let tokens: Vec<Token> = TokenStream::spawn("1 $ 2", DEFAULT_CAPACITY)
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[1].kind, TokenKind::ERROR('$')));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            TokenStream::spawn("1", 0),
            Err(CalcError::Config(_))
        ));
    }

    #[test]
    fn dropping_early_releases_a_blocked_producer() {
        let long = "1 + ".repeat(1_000) + "1";
        let mut stream = TokenStream::spawn(long, 1).unwrap();

        assert_eq!(stream.next().map(|t| t.kind), Some(TokenKind::NUMBER));
        drop(stream); // must not hang
    }
}
