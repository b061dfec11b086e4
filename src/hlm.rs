//! Heavy/Light/Medium (HLM) weekly schedule generators.
//!
//! Each lift is trained heavy, medium and light once a week. Medium and light
//! weights are derived from the heavy weight with the configured reductions and
//! rounded to the plate increment.

use serde::{Deserialize, Serialize};

use crate::domain::{Reductions, WeeklySchedule};
use crate::error::CalcError;
use crate::formulas::{ROUNDING_INCREMENT, format_decimal, round_to_increment};

pub const STANDARD_TEMPLATE_NAME: &str = "HLM Standard 5s";
pub const ALTERNATE_TEMPLATE_NAME: &str = "HLM 5s (Alternate Pressing)";

const DEFAULT_WEIGHT: f64 = 100.0;

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_squat_name() -> String {
    "Squat".to_string()
}

fn default_press_name() -> String {
    "OHP".to_string()
}

fn default_pull_name() -> String {
    "Deadlift".to_string()
}

/// Rounded working weight for every tier of every lift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculatedWeights {
    pub heavy_squat: f64,
    pub medium_squat: f64,
    pub light_squat: f64,
    pub heavy_pull: f64,
    pub medium_pull: f64,
    pub light_pull: f64,
    pub heavy_press: f64,
    pub medium_press: f64,
    pub light_press: f64,
}

impl CalculatedWeights {
    /// Derives all nine tiers from base weights, then rounds them.
    ///
    /// `overrides` replace the derived light press, medium pull and light pull tiers.
    /// Fails when any rounded tier overflows to infinity.
    fn derive(
        squat: f64,
        pull: f64,
        press: f64,
        reductions: &Reductions,
        overrides: TierOverrides,
    ) -> Result<Self, CalcError> {
        let round = |w: f64| round_to_increment(w, ROUNDING_INCREMENT);
        let medium_pull = overrides
            .medium_pull
            .unwrap_or_else(|| reductions.medium_of(pull));
        let light_pull = overrides
            .light_pull
            .unwrap_or_else(|| reductions.light_of(pull));
        let light_press = overrides
            .light_press
            .unwrap_or_else(|| reductions.light_of(press));

        let weights = Self {
            heavy_squat: round(squat),
            medium_squat: round(reductions.medium_of(squat)),
            light_squat: round(reductions.light_of(squat)),
            heavy_pull: round(pull),
            medium_pull: round(medium_pull),
            light_pull: round(light_pull),
            heavy_press: round(press),
            medium_press: round(reductions.medium_of(press)),
            light_press: round(light_press),
        };

        match weights.tiers().into_iter().find(|(_, w)| !w.is_finite()) {
            Some((tier, _)) => Err(CalcError::NonFinite(tier)),
            None => Ok(weights),
        }
    }

    fn tiers(&self) -> [(&'static str, f64); 9] {
        [
            ("heavy_squat", self.heavy_squat),
            ("medium_squat", self.medium_squat),
            ("light_squat", self.light_squat),
            ("heavy_pull", self.heavy_pull),
            ("medium_pull", self.medium_pull),
            ("light_pull", self.light_pull),
            ("heavy_press", self.heavy_press),
            ("medium_press", self.medium_press),
            ("light_press", self.light_press),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TierOverrides {
    light_press: Option<f64>,
    medium_pull: Option<f64>,
    light_pull: Option<f64>,
}

/// Formats a weight the way schedule lines display it.
fn kg(weight: f64) -> String {
    format!("{} kg", format_decimal(weight))
}

// === Standard ===

/// Request for the standard HLM template.
#[derive(Debug, Clone, Deserialize)]
pub struct HlmStandardRequest {
    #[serde(default = "default_weight")]
    pub squat: f64,
    #[serde(default = "default_weight")]
    pub pull: f64,
    #[serde(default = "default_weight")]
    pub press: f64,
    pub medium_reduction: f64,
    pub light_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardWeights {
    pub squat: f64,
    pub pull: f64,
    pub press: f64,
}

/// Generated standard HLM program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HlmStandardProgram {
    pub template_name: &'static str,
    pub weights: StandardWeights,
    pub calculated_weights: CalculatedWeights,
    pub reductions: Reductions,
    pub schedule: WeeklySchedule,
}

/// Generates the standard HLM week.
pub fn generate_standard(
    request: &HlmStandardRequest,
) -> Result<HlmStandardProgram, CalcError> {
    let reductions = Reductions::new(request.medium_reduction, request.light_reduction);
    let w = CalculatedWeights::derive(
        request.squat,
        request.pull,
        request.press,
        &reductions,
        TierOverrides::default(),
    )?;

    let schedule = WeeklySchedule {
        mon: vec![
            format!("Heavy Squat 1x1-5 - {}, 4x5 Backoff", kg(w.heavy_squat)),
            format!("Medium Press 4x5 - {}", kg(w.medium_press)),
            format!("Light Pull 3x3-5 - {}", kg(w.light_pull)),
        ],
        wed: vec![
            format!("Light Squat 3x5 - {}", kg(w.light_squat)),
            format!("Light Press 3x5 - {}", kg(w.light_press)),
            format!("Heavy Pull 2x1-5 - {}", kg(w.heavy_pull)),
        ],
        fri: vec![
            format!("Medium Squat 4x5 - {}", kg(w.medium_squat)),
            format!("Heavy Press 1x1-5 - {}, 4x5 Backoff", kg(w.heavy_press)),
            format!("Medium Pull 3x4-5 - {}", kg(w.medium_pull)),
        ],
    };

    Ok(HlmStandardProgram {
        template_name: STANDARD_TEMPLATE_NAME,
        weights: StandardWeights {
            squat: request.squat,
            pull: request.pull,
            press: request.press,
        },
        calculated_weights: w,
        reductions,
        schedule,
    })
}

// === Alternate Pressing ===

/// Request for the alternate-pressing HLM template.
#[derive(Debug, Clone, Deserialize)]
pub struct HlmAlternateRequest {
    #[serde(default = "default_squat_name")]
    pub heavy_squat_name: String,
    #[serde(default = "default_weight")]
    pub squat: f64,

    #[serde(default = "default_weight")]
    pub primary_press: f64,
    #[serde(default = "default_press_name")]
    pub primary_press_name: String,
    #[serde(default)]
    pub secondary_press: Option<f64>,
    #[serde(default)]
    pub secondary_press_name: Option<String>,

    #[serde(default = "default_weight")]
    pub pull: f64,
    #[serde(default = "default_pull_name")]
    pub heavy_pull_name: String,
    #[serde(default)]
    pub medium_pull: Option<f64>,
    #[serde(default)]
    pub medium_pull_name: Option<String>,
    #[serde(default)]
    pub light_pull: Option<f64>,
    #[serde(default)]
    pub light_pull_name: Option<String>,

    pub medium_reduction: f64,
    pub light_reduction: f64,

    #[serde(default)]
    pub header_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternateWeights {
    pub heavy_squat: f64,
    pub primary_press: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_press: Option<f64>,
    pub heavy_pull: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_pull: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_pull: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseNames {
    pub heavy_squat: String,
    pub primary_press: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_press: Option<String>,
    pub heavy_pull: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_pull: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_pull: Option<String>,
}

/// Generated alternate-pressing HLM program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HlmAlternateProgram {
    pub template_name: &'static str,
    pub weights: AlternateWeights,
    pub exercise_names: ExerciseNames,
    pub calculated_weights: CalculatedWeights,
    pub reductions: Reductions,
    pub header_text: Option<String>,
    pub schedule: WeeklySchedule,
}

/// An override weight only takes effect when it is present and non-zero.
fn supplied(weight: Option<f64>) -> Option<f64> {
    weight.filter(|w| *w != 0.0)
}

/// Generates the alternate-pressing HLM week.
///
/// The light press day becomes a heavy day for the secondary press when one is
/// given; medium and light pulls may use their own lifts and weights.
pub fn generate_alternate(
    request: &HlmAlternateRequest,
) -> Result<HlmAlternateProgram, CalcError> {
    let reductions = Reductions::new(request.medium_reduction, request.light_reduction);
    let overrides = TierOverrides {
        light_press: supplied(request.secondary_press),
        medium_pull: supplied(request.medium_pull),
        light_pull: supplied(request.light_pull),
    };
    let w = CalculatedWeights::derive(
        request.squat,
        request.pull,
        request.primary_press,
        &reductions,
        overrides,
    )?;

    let squat = request.heavy_squat_name.as_str();
    let press = request.primary_press_name.as_str();
    let pull = request.heavy_pull_name.as_str();
    // Override lifts fall back to their base lift's name
    let name_for = |weight: Option<f64>, name: &Option<String>, base: &str| -> String {
        match weight {
            Some(_) => name.as_deref().unwrap_or(base).to_string(),
            None => base.to_string(),
        }
    };
    let light_pull = name_for(overrides.light_pull, &request.light_pull_name, pull);
    let medium_pull = name_for(overrides.medium_pull, &request.medium_pull_name, pull);

    let wed_press = match overrides.light_press {
        Some(_) => {
            let secondary = name_for(
                overrides.light_press,
                &request.secondary_press_name,
                press,
            );
            format!(
                "Heavy {secondary} 1x5 - {}, 4x5 Backoff",
                kg(w.light_press)
            )
        }
        None => format!("Light {press} 3x5 - {}", kg(w.light_press)),
    };

    let schedule = WeeklySchedule {
        mon: vec![
            format!("Heavy {squat} 1x1-5 - {}, 4x5 Backoff", kg(w.heavy_squat)),
            format!("Medium {press} 4x5 - {}", kg(w.medium_press)),
            format!("Light {light_pull} 3x3-5 - {}", kg(w.light_pull)),
        ],
        wed: vec![
            format!("Light {squat} 3x5 - {}", kg(w.light_squat)),
            wed_press,
            format!("Heavy {pull} 2x1-5 - {}", kg(w.heavy_pull)),
        ],
        fri: vec![
            format!("Medium {squat} 4x5 - {}", kg(w.medium_squat)),
            format!("Heavy {press} 1x1-5 - {}, 4x5 Backoff", kg(w.heavy_press)),
            format!("Medium {medium_pull} 3x4-5 - {}", kg(w.medium_pull)),
        ],
    };

    Ok(HlmAlternateProgram {
        template_name: ALTERNATE_TEMPLATE_NAME,
        weights: AlternateWeights {
            heavy_squat: request.squat,
            primary_press: request.primary_press,
            secondary_press: request.secondary_press,
            heavy_pull: request.pull,
            medium_pull: request.medium_pull,
            light_pull: request.light_pull,
        },
        exercise_names: ExerciseNames {
            heavy_squat: request.heavy_squat_name.clone(),
            primary_press: request.primary_press_name.clone(),
            secondary_press: request.secondary_press_name.clone(),
            heavy_pull: request.heavy_pull_name.clone(),
            medium_pull: request.medium_pull_name.clone(),
            light_pull: request.light_pull_name.clone(),
        },
        calculated_weights: w,
        reductions,
        header_text: request.header_text.clone(),
        schedule,
    })
}
