mod bufreader;
mod push;
mod slice;

pub use bufreader::BufReaderJsonFeeder;
pub use push::{PushError, PushJsonFeeder};
pub use slice::SliceJsonFeeder;

use thiserror::Error;

/// An error that can happen when refilling a feeder from an underlying
/// reader. Produced by [`BufReaderJsonFeeder::fill_buf()`] and its
/// asynchronous counterpart.
#[derive(Error, Debug)]
pub enum FillError {
    #[error("failed to refill the feeder: {0}")]
    Io(#[from] std::io::Error),
}

/// A feeder provides input data to the [`JsonParser`](crate::JsonParser),
/// one byte at a time. The parser owns its feeder and pulls from it whenever
/// it needs input; the caller refills the feeder between
/// [`next_event()`](crate::JsonParser::next_event()) calls.
///
/// Signalling the end of the input (through
/// [`PushJsonFeeder::done()`](PushJsonFeeder::done()) or the equivalent
/// mechanism of the concrete feeder) is what allows the parser to flush
/// pending state: a partial token at that point is an error instead of a
/// reason to wait for more bytes. A byte that has been handed out through
/// [`next_input()`](Self::next_input()) is gone from the feeder, so the
/// parser can account for every consumed byte exactly once even when a
/// multi-byte encoding sequence straddles two refills.
pub trait JsonFeeder {
    /// Determine if the feeder has input data that can be parsed
    fn has_input(&self) -> bool;

    /// Check if the end of the JSON text has been reached
    fn is_done(&self) -> bool;

    /// Return the next byte to be parsed
    fn next_input(&mut self) -> Option<u8>;

    /// Move up to `buf.len()` buffered bytes into `buf` without parsing
    /// them and return how many bytes were moved. After the parser stopped
    /// at the end of an embedded document, this hands the caller the part
    /// of the stream the parser never consumed.
    fn next_chunk(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.next_input() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}
