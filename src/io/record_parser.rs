//! Streaming record parser
//!
//! Turns a delimited byte stream into a lazy stream of candidate records.
//!
//! # Design
//!
//! The RecordParser uses:
//! - csv-async for incremental parsing as bytes arrive
//! - futures streams so the consumer decides when to pull the next row
//!
//! # Architecture
//!
//! ```text
//! Byte source → RecordParser → Stream<CandidateRecord>
//!                   ↓
//!            csv_format module
//!            (convert_string_record)
//! ```
//!
//! The stream ends exactly once, after the last line has been read. That end
//! is the signal the import coordinator waits for before touching storage.

use crate::io::csv_format::convert_string_record;
use crate::types::{CandidateRecord, RecordError};
use csv_async::{AsyncReaderBuilder, Trim};
use futures::io::AsyncRead;
use futures::stream::{Stream, StreamExt};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Asynchronous parser over an input file with one header line
pub struct RecordParser<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> RecordParser<R> {
    /// Create a new RecordParser from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing the delimited text
    /// * `delimiter` - Field delimiter byte
    pub fn new(reader: R, delimiter: u8) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .create_reader(reader);

        Self { csv_reader }
    }

    /// Consume the parser, yielding valid records in input order
    ///
    /// Rows missing a title, type or value are dropped silently. An `Err`
    /// item means the stream could not be read or a row could not be
    /// converted; the consumer should stop there.
    pub fn into_stream(self) -> impl Stream<Item = Result<CandidateRecord, RecordError>> + Send {
        self.csv_reader
            .into_records()
            .filter_map(|result| async move {
                match result {
                    Ok(record) => convert_string_record(&record).transpose(),
                    Err(e) => Some(Err(RecordError::from(e))),
                }
            })
    }
}
