use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::feeder::{FillError, JsonFeeder};

/// A [`JsonFeeder`] that reads from an asynchronous source. The feeder owns
/// a [`BufReader`] around the source; the parser itself stays synchronous,
/// and only refilling the buffer through [`fill_buf()`](Self::fill_buf())
/// awaits the reader.
pub struct AsyncBufReaderJsonFeeder<T> {
    reader: BufReader<T>,
    filled: bool,
    pos: usize,
}

impl<T> AsyncBufReaderJsonFeeder<T>
where
    T: AsyncRead + Unpin,
{
    /// Create a new feeder that buffers the given source
    pub fn new(source: T) -> Self {
        AsyncBufReaderJsonFeeder {
            reader: BufReader::new(source),
            filled: false,
            pos: 0,
        }
    }

    /// Discard the consumed part of the buffer and read more bytes from the
    /// underlying source. An empty buffer afterwards means the end of the
    /// input has been reached.
    pub async fn fill_buf(&mut self) -> Result<(), FillError> {
        self.reader.consume(self.pos);
        self.pos = 0;
        self.reader.fill_buf().await?;
        self.filled = true;
        Ok(())
    }

    /// Consume the feeder and return the wrapped source
    pub fn into_inner(self) -> T {
        self.reader.into_inner()
    }
}

impl<T> JsonFeeder for AsyncBufReaderJsonFeeder<T>
where
    T: AsyncRead + Unpin,
{
    fn has_input(&self) -> bool {
        self.pos < self.reader.buffer().len()
    }

    fn is_done(&self) -> bool {
        self.filled && self.reader.buffer().is_empty()
    }

    fn next_input(&mut self) -> Option<u8> {
        let b = self.reader.buffer().get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }
}
