//! Strength calculation formulas: e1RM estimation and load rounding.

use std::str::FromStr;

use crate::error::FormulaError;

/// Plate increment every programmed weight is rounded to (kg).
pub const ROUNDING_INCREMENT: f64 = 2.5;

/// Named 1RM estimation formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    Epley,
    Brzycki,
    Lombardi,
}

impl Formula {
    /// Returns all supported formulas.
    #[allow(dead_code)] // Used by tests
    pub fn all() -> &'static [Formula] {
        &[Formula::Epley, Formula::Brzycki, Formula::Lombardi]
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epley" => Ok(Formula::Epley),
            "brzycki" => Ok(Formula::Brzycki),
            "lombardi" => Ok(Formula::Lombardi),
            _ => Err(FormulaError::InvalidFormula(s.to_string())),
        }
    }
}

/// Estimates the 1RM from a set of `reps` at `weight`.
///
/// For reps == 1, returns the weight directly (actual 1RM).
/// Brzycki divides by `37 - reps` as-is: 37 reps yields an infinite estimate.
pub fn estimate_1rm(weight: f64, reps: i32, formula: Formula) -> f64 {
    if reps == 1 {
        return weight;
    }

    let r = f64::from(reps);
    match formula {
        // Epley: w × (1 + 0.033 × r)
        Formula::Epley => weight * (1.0 + 0.033 * r),
        // Brzycki: w × 36 / (37 - r)
        Formula::Brzycki => weight * (36.0 / (37.0 - r)),
        // Lombardi: w × r^0.1
        Formula::Lombardi => weight * r.powf(0.1),
    }
}

/// Inverse of [`estimate_1rm`]: the weight liftable for `reps` given a 1RM.
pub fn weight_at_reps(one_rm: f64, reps: i32, formula: Formula) -> f64 {
    if reps == 1 {
        return one_rm;
    }

    let r = f64::from(reps);
    match formula {
        Formula::Epley => one_rm / (1.0 + 0.033 * r),
        Formula::Brzycki => one_rm * (37.0 - r) / 36.0,
        Formula::Lombardi => one_rm / r.powf(0.1),
    }
}

/// Rounds `value` to the nearest multiple of `increment`, ties to even.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).round_ties_even() * increment
}

/// Rounds the exact binary value of `value` to `decimals` places, ties to even.
///
/// Goes through formatting so no intermediate product is rounded first. The
/// double nearest 29.925 lies just above it and must become `29.93`.
pub fn round_to_decimals(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Formats a number in shortest round-trip form, keeping one decimal on whole
/// numbers (`90.0`, `72.5`, `96.53`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
