//! PLAIN payload decoding.
//!
//! The meter gateway sends its readings on port 1 as consecutive
//! little-endian binary32 values: imported energy, exported energy and
//! total system power. Short payloads drop trailing fields instead of
//! failing, and unknown ports decode to nothing.
//!
//! The length gates for the second and third value open as soon as a
//! single byte of their window is present. Missing bytes of a window read
//! as zero. Ranges and gates are defined in `layout`, the padding rule in
//! `reader`.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::decode_plain;
