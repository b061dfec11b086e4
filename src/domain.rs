//! Domain types shared by the program generators.

use serde::{Deserialize, Serialize};

/// Main lifts programmed by the 5/3/1 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
    Press,
}

impl Lift {
    /// Returns all lifts in programming order.
    pub fn all() -> &'static [Lift] {
        &[Lift::Squat, Lift::Bench, Lift::Deadlift, Lift::Press]
    }

    /// Returns the display name for the lift.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench",
            Lift::Deadlift => "Deadlift",
            Lift::Press => "Press",
        }
    }
}

impl std::fmt::Display for Lift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Supplemental templates layered on top of the 5/3/1 main work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Default,
    #[serde(alias = "first-set-last-set", alias = "first_set_last_set")]
    Fsl,
    Widowmaker,
    Pyramid,
}

impl Template {
    /// Identifier used in JSON and error messages.
    pub fn id(&self) -> &'static str {
        match self {
            Template::Default => "default",
            Template::Fsl => "fsl",
            Template::Widowmaker => "widowmaker",
            Template::Pyramid => "pyramid",
        }
    }

    /// Whether this template excludes the other exclusive templates.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, Template::Default)
    }

    /// Training max percentage used when the request leaves it unset.
    pub fn default_tm_percentage(&self) -> f64 {
        match self {
            Template::Default | Template::Fsl | Template::Widowmaker | Template::Pyramid => 90.0,
        }
    }
}

/// How the submitted lift maxes should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxType {
    /// Inputs are already training maxes.
    #[serde(alias = "training-max")]
    TrainingMax,
    /// Inputs are one-rep maxes; scale by the training max percentage.
    #[default]
    #[serde(rename = "onerm", alias = "one_rep_max", alias = "one-rep-max")]
    OneRepMax,
}

/// Medium and light reduction fractions for HLM programming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reductions {
    pub medium: f64,
    pub light: f64,
}

impl Reductions {
    pub fn new(medium: f64, light: f64) -> Self {
        Self { medium, light }
    }

    /// Weight for the medium day.
    pub fn medium_of(&self, weight: f64) -> f64 {
        weight * (1.0 - self.medium)
    }

    /// Weight for the light day.
    pub fn light_of(&self, weight: f64) -> f64 {
        weight * (1.0 - self.light)
    }
}

/// Three-day training week. Field order fixes the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySchedule {
    #[serde(rename = "Mon")]
    pub mon: Vec<String>,
    #[serde(rename = "Wed")]
    pub wed: Vec<String>,
    #[serde(rename = "Fri")]
    pub fri: Vec<String>,
}

impl WeeklySchedule {
    /// Returns the days with their labels, in training order.
    #[allow(dead_code)] // Used by tests
    pub fn days(&self) -> [(&'static str, &[String]); 3] {
        [
            ("Mon", self.mon.as_slice()),
            ("Wed", self.wed.as_slice()),
            ("Fri", self.fri.as_slice()),
        ]
    }
}
