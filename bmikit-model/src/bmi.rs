#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurement::{Gender, InvalidMeasurement, Measurement};

/// BMI bands in ascending order. Boundaries are half-open with an inclusive
/// lower bound: a value sitting exactly on a boundary belongs to the higher
/// band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize, strum::Display, strum::EnumString)
)]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Underweight,
        Category::Normal,
        Category::Overweight,
        Category::Obese,
    ];
}

const UNDERWEIGHT_LIMIT: f64 = 18.5;
const NORMAL_LIMIT: f64 = 25.0;
const OVERWEIGHT_LIMIT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    Youth,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeBracket {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=17 => AgeBracket::Youth,
            18..=39 => AgeBracket::Adult,
            40..=59 => AgeBracket::MiddleAged,
            _ => AgeBracket::Senior,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BmiResult {
    pub bmi: f64,
    pub category: Category,
    pub tips: Vec<String>,
}

pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Result<f64, InvalidMeasurement> {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return Err(InvalidMeasurement {
            height_cm,
            weight_kg,
        });
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Total over all reals; anything at or above the top boundary, NaN
/// included, lands in the highest band.
pub fn classify(bmi: f64) -> Category {
    if bmi < UNDERWEIGHT_LIMIT {
        Category::Underweight
    } else if bmi < NORMAL_LIMIT {
        Category::Normal
    } else if bmi < OVERWEIGHT_LIMIT {
        Category::Overweight
    } else {
        Category::Obese
    }
}

fn category_tip(category: Category) -> &'static str {
    match category {
        Category::Underweight => "Increase nutrient-rich food intake.",
        Category::Normal => "Maintain a balanced diet and regular exercise.",
        Category::Overweight => "Incorporate cardio and reduce processed foods.",
        Category::Obese => "Seek advice from a healthcare professional.",
    }
}

fn age_tip(bracket: AgeBracket) -> &'static str {
    match bracket {
        AgeBracket::Youth => "Focus on growth with a balanced, high-protein diet.",
        AgeBracket::Adult => "Maintain fitness with regular workouts and hydration.",
        AgeBracket::MiddleAged => "Monitor cardiovascular health and reduce salt/sugar.",
        AgeBracket::Senior => {
            "Emphasize joint health, calcium intake, and regular checkups."
        }
    }
}

fn gender_tip(gender: Gender, bracket: AgeBracket) -> Option<&'static str> {
    match (gender, bracket) {
        (Gender::Female, AgeBracket::MiddleAged | AgeBracket::Senior) => {
            Some("Consider a bone density check and adequate calcium and vitamin D.")
        }
        (Gender::Male, AgeBracket::MiddleAged | AgeBracket::Senior) => {
            Some("Keep up regular blood pressure and cholesterol checks.")
        }
        _ => None,
    }
}

/// Static lookup: a base tip for the band, an age-bracket tip, and for some
/// known-gender combinations an addendum. Unspecified gender gets the first
/// two only.
pub fn recommend(category: Category, age: u32, gender: Option<Gender>) -> Vec<String> {
    let bracket = AgeBracket::from_age(age);
    let mut tips = vec![
        category_tip(category).to_owned(),
        age_tip(bracket).to_owned(),
    ];
    if let Some(addendum) = gender.and_then(|gender| gender_tip(gender, bracket)) {
        tips.push(addendum.to_owned());
    }
    tips
}

pub fn evaluate(measurement: &Measurement) -> Result<BmiResult, InvalidMeasurement> {
    let bmi = compute_bmi(measurement.height_cm, measurement.weight_kg)?;
    let category = classify(bmi);
    let tips = recommend(category, measurement.age, measurement.gender);
    // Classification uses the unrounded value; the stored figure is the
    // 2-decimal display form.
    Ok(BmiResult {
        bmi: (bmi * 100.0).round() / 100.0,
        category,
        tips,
    })
}
