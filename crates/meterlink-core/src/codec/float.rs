//! binary32 reconstruction from four little-endian bytes.
//!
//! The value is rebuilt from the sign, exponent and fraction fields with
//! plain integer arithmetic. The mantissa is kept as an integer, so the
//! exponent offset is the binary32 bias plus the 23 fraction bits.
//!
//! Exponent 255 gets no special treatment: NaN and infinity encodings
//! come out as large finite numbers (`m * 2^105`). Callers depend on that,
//! so the result is an `f64` wide enough to hold them.

const SIGN_SHIFT: u32 = 31;
const EXPONENT_SHIFT: u32 = 23;
const EXPONENT_MASK: u32 = 0xff;
const FRACTION_MASK: u32 = 0x7f_ffff;
const IMPLICIT_BIT: u32 = 0x80_0000;
/// binary32 bias (127) plus the fraction width (23).
pub const EXPONENT_OFFSET: i32 = 150;

/// Decode four little-endian bytes into the number their binary32 bit
/// pattern describes.
///
/// # Examples
/// ```
/// use meterlink_core::bytes_to_float;
///
/// assert_eq!(bytes_to_float([0x00, 0x00, 0x80, 0x3f]), 1.0);
/// assert_eq!(bytes_to_float([0x00, 0x00, 0x00, 0xc0]), -2.0);
/// ```
pub fn bytes_to_float(bytes: [u8; 4]) -> f64 {
    let bits = u32::from_le_bytes(bytes);

    let sign = if bits >> SIGN_SHIFT == 0 { 1.0 } else { -1.0 };
    let exponent = (bits >> EXPONENT_SHIFT) & EXPONENT_MASK;
    let fraction = bits & FRACTION_MASK;
    let mantissa = if exponent == 0 {
        fraction << 1
    } else {
        fraction | IMPLICIT_BIT
    };

    // exponent <= 255, so the cast and subtraction cannot overflow.
    let scale = 2f64.powi(exponent as i32 - EXPONENT_OFFSET);
    sign * f64::from(mantissa) * scale
}
