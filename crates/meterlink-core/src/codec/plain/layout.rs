use std::ops::Range;

/// Port the gateway uses for PLAIN uplinks.
pub const METER_PORT: u32 = 1;

pub const WORD_LEN: usize = 4;

pub const ENERGY_IN_RANGE: Range<usize> = 0..4;
pub const ENERGY_OUT_RANGE: Range<usize> = 4..8;
pub const POWER_RANGE: Range<usize> = 8..12;

/// `energy_in` needs its whole window.
pub const ENERGY_IN_MIN_LEN: usize = ENERGY_IN_RANGE.end;
/// `energy_out` and `power` only need the payload to reach past these offsets.
pub const ENERGY_OUT_AFTER: usize = ENERGY_OUT_RANGE.start;
pub const POWER_AFTER: usize = POWER_RANGE.start;
