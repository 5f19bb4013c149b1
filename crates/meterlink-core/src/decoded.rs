use std::fmt;

use serde::{Deserialize, Serialize};

/// Named values carried by a meter payload, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    EnergyIn,
    EnergyOut,
    Power,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::EnergyIn, Field::EnergyOut, Field::Power];

    /// Key used in decoded output (e.g., `energy_in`).
    pub fn name(self) -> &'static str {
        match self {
            Field::EnergyIn => "energy_in",
            Field::EnergyOut => "energy_out",
            Field::Power => "power",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded payload: a field is present only when the payload carried it.
///
/// Serializes as an object holding just the present keys, so an
/// unrecognized port or an empty payload becomes `{}`.
///
/// # Examples
/// ```
/// use meterlink_core::{Field, decode};
///
/// let decoded = decode(&[0x00, 0x00, 0x80, 0x3f], 1);
/// assert_eq!(decoded.get(Field::EnergyIn), Some(1.0));
/// assert_eq!(decoded.get(Field::Power), None);
/// assert_eq!(serde_json::to_string(&decoded)?, r#"{"energy_in":1.0}"#);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedPayload {
    /// Imported active energy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_in: Option<f64>,
    /// Exported active energy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_out: Option<f64>,
    /// Total system power.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
}

impl DecodedPayload {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::EnergyIn => self.energy_in,
            Field::EnergyOut => self.energy_out,
            Field::Power => self.power,
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        Field::from_name(name).and_then(|field| self.get(field))
    }

    pub(crate) fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::EnergyIn => &mut self.energy_in,
            Field::EnergyOut => &mut self.energy_out,
            Field::Power => &mut self.power,
        };
        *slot = Some(value);
    }

    /// Present fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
