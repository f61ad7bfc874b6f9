#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize, strum::Display, strum::EnumString),
    strum(ascii_case_insensitive)
)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A single person's measurements, as entered in the form or read from one
/// row of an uploaded table. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    serde_with::skip_serializing_none,
    derive(Serialize, Deserialize)
)]
pub struct Measurement {
    pub name: Option<String>,
    pub age: u32,
    pub gender: Option<Gender>,
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "invalid measurement: height {height_cm} cm, weight {weight_kg} kg; \
     both must be positive, please re-enter"
)]
pub struct InvalidMeasurement {
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl Measurement {
    pub fn new(
        name: Option<String>,
        age: u32,
        gender: Option<Gender>,
        height_cm: f64,
        weight_kg: f64,
    ) -> Self {
        Self {
            name,
            age,
            gender,
            height_cm,
            weight_kg,
        }
    }

    /// Height and weight must both be strictly positive; NaN is rejected.
    pub fn validate(&self) -> Result<(), InvalidMeasurement> {
        if self.height_cm > 0.0 && self.weight_kg > 0.0 {
            Ok(())
        } else {
            Err(InvalidMeasurement {
                height_cm: self.height_cm,
                weight_kg: self.weight_kg,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_positive_measurements() {
        let measurement = Measurement::new(None, 25, None, 170.0, 70.0);
        assert!(measurement.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let test_data = [
            (0.0, 70.0),
            (170.0, 0.0),
            (-170.0, 70.0),
            (170.0, -70.0),
            (f64::NAN, 70.0),
            (170.0, f64::NAN),
        ];

        for (i, (height_cm, weight_kg)) in test_data.into_iter().enumerate() {
            let measurement = Measurement::new(None, 25, None, height_cm, weight_kg);
            assert!(measurement.validate().is_err(), "Test case #{}", i);
        }
    }
}
