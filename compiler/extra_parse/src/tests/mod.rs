//! Parser tests.
//!
//! Tests are organized into modules by category:
//! - `comments`: every comment lands in exactly one slot of the tree
//! - `errors`: error codes and spans for malformed input
//! - `round_trip`: printed code parses back to the same tree, including
//!   property tests over generated operator chains
//!
//! Grammar-specific tests live next to each grammar module.

mod errors;
