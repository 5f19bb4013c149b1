use std::ops::Range;

use super::layout;
use crate::codec::float::bytes_to_float;

pub struct PlainReader<'a> {
    payload: &'a [u8],
}

impl<'a> PlainReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Bytes of `range` past the end of the payload read as zero.
    pub fn read_word_padded(&self, range: Range<usize>) -> [u8; layout::WORD_LEN] {
        let mut word = [0u8; layout::WORD_LEN];
        for (slot, offset) in word.iter_mut().zip(range) {
            *slot = self.payload.get(offset).copied().unwrap_or(0);
        }
        word
    }

    pub fn read_f32_le_padded(&self, range: Range<usize>) -> f64 {
        bytes_to_float(self.read_word_padded(range))
    }
}
