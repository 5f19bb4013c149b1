use super::layout;
use super::reader::PlainReader;
use crate::decoded::{DecodedPayload, Field};

/// Decode a PLAIN uplink.
///
/// Ports other than [`layout::METER_PORT`] yield an empty result.
pub fn decode_plain(payload: &[u8], port: u32) -> DecodedPayload {
    let mut decoded = DecodedPayload::default();
    if port != layout::METER_PORT {
        return decoded;
    }

    let reader = PlainReader::new(payload);
    let len = reader.payload_len();

    if len >= layout::ENERGY_IN_MIN_LEN {
        let value = reader.read_f32_le_padded(layout::ENERGY_IN_RANGE);
        decoded.set(Field::EnergyIn, value);
    }
    if len > layout::ENERGY_OUT_AFTER {
        let value = reader.read_f32_le_padded(layout::ENERGY_OUT_RANGE);
        decoded.set(Field::EnergyOut, value);
    }
    if len > layout::POWER_AFTER {
        let value = reader.read_f32_le_padded(layout::POWER_RANGE);
        decoded.set(Field::Power, value);
    }

    decoded
}
