//! I/O module
//!
//! Handles input parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `record_parser` - Streaming parser over the input with a stream interface

pub mod csv_format;
pub mod record_parser;

pub use csv_format::{convert_string_record, write_transactions_csv};
pub use record_parser::{RecordParser, DEFAULT_DELIMITER};
