//! Threshold-based health recommendations.
//!
//! Each measurement is judged on its own ladder; the three results never
//! influence each other.

use serde::{Deserialize, Serialize};

pub const WEIGHT_HIGH: &str =
    "Consider consulting with a nutritionist to create a personalized weight management plan.";
pub const WEIGHT_LOW: &str =
    "Ensure you are meeting your daily caloric needs for healthy weight gain.";
pub const WEIGHT_NORMAL: &str =
    "Maintain a balanced diet and exercise regularly for overall well-being.";

pub const HEIGHT_LOW: &str = "Ensure you are getting proper nutrition to support healthy growth.";
pub const HEIGHT_NORMAL: &str =
    "Maintain a healthy lifestyle to support overall health and well-being.";

pub const BLOOD_PRESSURE_HIGH: &str =
    "Consider monitoring your blood pressure regularly and consult a healthcare professional.";
pub const BLOOD_PRESSURE_NORMAL: &str =
    "Maintain a low-sodium diet and engage in regular exercise to support healthy blood pressure.";

/// Weight above this (kg) gets the nutritionist recommendation
pub const WEIGHT_UPPER_LIMIT: f64 = 90.0;
/// Weight below this (kg) gets the caloric intake recommendation
pub const WEIGHT_LOWER_LIMIT: f64 = 50.0;
/// Height below this (cm) gets the growth recommendation
pub const HEIGHT_LOWER_LIMIT: f64 = 160.0;
/// Blood pressure above this gets the monitoring recommendation
pub const BLOOD_PRESSURE_UPPER_LIMIT: f64 = 130.0;

/// The three measurements a recommendation is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vitals {
    pub weight: f64,
    pub height: f64,
    pub blood_pressure: f64,
}

/// One advisory string per measurement. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub weight: String,
    pub height: String,
    pub blood_pressure: String,
}

impl RecommendationSet {
    /// Derive recommendations from a set of vitals.
    pub fn from_vitals(vitals: &Vitals) -> Self {
        Self {
            weight: weight_advice(vitals.weight).to_string(),
            height: height_advice(vitals.height).to_string(),
            blood_pressure: blood_pressure_advice(vitals.blood_pressure).to_string(),
        }
    }
}

pub fn weight_advice(weight: f64) -> &'static str {
    if weight > WEIGHT_UPPER_LIMIT {
        WEIGHT_HIGH
    } else if weight < WEIGHT_LOWER_LIMIT {
        WEIGHT_LOW
    } else {
        WEIGHT_NORMAL
    }
}

pub fn height_advice(height: f64) -> &'static str {
    if height < HEIGHT_LOWER_LIMIT {
        HEIGHT_LOW
    } else {
        HEIGHT_NORMAL
    }
}

pub fn blood_pressure_advice(blood_pressure: f64) -> &'static str {
    if blood_pressure > BLOOD_PRESSURE_UPPER_LIMIT {
        BLOOD_PRESSURE_HIGH
    } else {
        BLOOD_PRESSURE_NORMAL
    }
}
