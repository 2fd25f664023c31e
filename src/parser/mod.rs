//! Record parser seam: raw file bytes in, [`ParsedRecord`] out.

pub mod mime;

pub use mime::MailParser;

use crate::ParsedRecord;
use crate::error::ParseError;

/// Converts raw bytes into a structured record. Called from worker threads.
pub trait RecordParser: Send + Sync {
    fn parse(&self, raw: &[u8]) -> Result<ParsedRecord, ParseError>;
}
