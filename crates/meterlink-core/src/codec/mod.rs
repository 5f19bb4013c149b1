//! Payload codecs.
//!
//! Each payload layout follows a layered structure:
//! - `layout`: byte ranges and length gates (source of truth)
//! - `reader`: byte access and padding conventions
//! - `parser`: field-level decoding (no direct byte indexing)
//!
//! Shared numeric decoding lives in `float`. Codecs are pure and contain no
//! I/O; the `source` and `batch` layers handle input and aggregation.

pub mod float;
pub mod plain;
