//! Extra Scanner - the cursor the parser drives.
//!
//! There is no token stream: the parser asks the scanner what the next
//! characters are and advances it directly. The scanner provides
//! - position queries and character classification
//! - `expect_*`/`scan_if_*` matching with structured [`ParseError`]s
//! - whitespace and comment skipping, with comments buffered for attachment
//! - the [`ScanOptions`] stack for context-dependent grammar
//! - exact snapshot/restore for speculative lookahead

mod error;
mod options;
mod scanner;

pub use error::{ParseError, ParseResult};
pub use options::ScanOptions;
pub use scanner::{is_newline, is_space, is_word_char, is_word_start, Scanner, Snapshot};
