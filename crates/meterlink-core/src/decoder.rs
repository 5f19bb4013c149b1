use crate::codec::plain::decode_plain;
use crate::decoded::DecodedPayload;

/// Turns a raw uplink payload into named values.
///
/// Implementations are total: a payload they cannot make sense of decodes
/// to an empty result rather than an error.
pub trait PayloadDecoder: Send + Sync {
    fn decode(&self, payload: &[u8], port: u32) -> DecodedPayload;
}

/// Decoder for the meter gateway's PLAIN payload encoding.
///
/// # Examples
/// ```
/// use meterlink_core::{PayloadDecoder, PlainDecoder};
///
/// let decoded = PlainDecoder.decode(&[0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0x40], 1);
/// assert_eq!(decoded.energy_in, Some(1.0));
/// assert_eq!(decoded.energy_out, Some(2.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDecoder;

impl PayloadDecoder for PlainDecoder {
    fn decode(&self, payload: &[u8], port: u32) -> DecodedPayload {
        decode_plain(payload, port)
    }
}

/// Decode a PLAIN payload received on `port`.
///
/// # Examples
/// ```
/// use meterlink_core::decode;
///
/// assert!(decode(&[], 1).is_empty());
/// assert!(decode(&[0x00, 0x00, 0x80, 0x3f], 2).is_empty());
/// assert_eq!(decode(&[0x00, 0x00, 0x80, 0x3f], 1).energy_in, Some(1.0));
/// ```
pub fn decode(payload: &[u8], port: u32) -> DecodedPayload {
    PlainDecoder.decode(payload, port)
}

#[cfg(test)]
mod tests {
    use super::{PayloadDecoder, PlainDecoder, decode};

    #[test]
    fn trait_object_matches_free_function() {
        let decoder: &dyn PayloadDecoder = &PlainDecoder;
        let payload = [0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0x40, 0x00];
        assert_eq!(decoder.decode(&payload, 1), decode(&payload, 1));
    }

    #[test]
    fn decoder_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlainDecoder>();

        let payload = vec![0x00, 0x00, 0x80, 0x3f];
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let payload = payload.clone();
                std::thread::spawn(move || decode(&payload, 1))
            })
            .collect();
        for handle in handles {
            let decoded = handle.join().expect("decoder thread");
            assert_eq!(decoded.energy_in, Some(1.0));
        }
    }
}
