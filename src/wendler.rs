//! Wendler 5/3/1 program generator.
//!
//! Builds a four-week cycle from training maxes: three progressively heavier
//! weeks followed by a deload. An optional supplemental template (First Set
//! Last Set, Widowmaker or Pyramid) adds work on top of the main sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Lift, MaxType, Template};
use crate::error::{CalcError, ProgramError};
use crate::formulas::{ROUNDING_INCREMENT, round_to_increment};

/// Training max percentage applied to one-rep maxes by default.
pub const DEFAULT_TM_PERCENTAGE: f64 = 90.0;

/// Allowed FSL back-off set counts.
const FSL_SETS: std::ops::RangeInclusive<i32> = 3..=8;

/// Allowed FSL back-off rep counts.
const FSL_REPS: std::ops::RangeInclusive<i32> = 3..=5;

/// Reps of the single Widowmaker set.
const WIDOWMAKER_REPS: i32 = 20;

/// Percentages and rep targets for one week of the cycle.
struct WeekScheme {
    week: u8,
    label: &'static str,
    percentages: [f64; 3],
    reps: [&'static str; 3],
    deload: bool,
}

const WEEKS: [WeekScheme; 4] = [
    WeekScheme {
        week: 1,
        label: "5s",
        percentages: [65.0, 75.0, 85.0],
        reps: ["5", "5", "5+"],
        deload: false,
    },
    WeekScheme {
        week: 2,
        label: "3s",
        percentages: [70.0, 80.0, 90.0],
        reps: ["3", "3", "3+"],
        deload: false,
    },
    WeekScheme {
        week: 3,
        label: "5/3/1",
        percentages: [75.0, 85.0, 95.0],
        reps: ["5", "3", "1+"],
        deload: false,
    },
    WeekScheme {
        week: 4,
        label: "Deload",
        percentages: [40.0, 50.0, 60.0],
        reps: ["5", "5", "5"],
        deload: true,
    },
];

/// Main lift / accessory pairing printed with every program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccessoryPairing {
    pub main: &'static str,
    pub accessory: &'static str,
}

pub const ACCESSORY_PAIRINGS: [AccessoryPairing; 3] = [
    AccessoryPairing {
        main: "Squat",
        accessory: "Chins",
    },
    AccessoryPairing {
        main: "OHP",
        accessory: "Dips",
    },
    AccessoryPairing {
        main: "Deadlift",
        accessory: "Rows",
    },
];

fn default_tm_percentage() -> Option<f64> {
    Some(DEFAULT_TM_PERCENTAGE)
}

/// Back-off volume for the FSL template.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FslParams {
    #[serde(default)]
    pub sets: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
}

/// Request for a 5/3/1 cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct WendlerRequest {
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub press: f64,
    /// Lifts to program; all four when absent.
    #[serde(default)]
    pub active_lifts: Option<Vec<Lift>>,
    #[serde(default)]
    pub max_type: MaxType,
    #[serde(default = "default_tm_percentage")]
    pub tm_percentage: Option<f64>,
    #[serde(default)]
    pub header_text: Option<String>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub fsl_params: Option<FslParams>,
}

impl WendlerRequest {
    fn raw_max(&self, lift: Lift) -> f64 {
        match lift {
            Lift::Squat => self.squat,
            Lift::Bench => self.bench,
            Lift::Deadlift => self.deadlift,
            Lift::Press => self.press,
        }
    }
}

/// One prescribed set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSet {
    pub reps: String,
    pub percentage: f64,
    pub weight: f64,
}

/// Supplemental work attached to a lift for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Overlay {
    Fsl {
        sets: i32,
        reps: i32,
        percentage: f64,
        weight: f64,
    },
    Widowmaker {
        sets: i32,
        reps: i32,
        percentage: f64,
        weight: f64,
    },
    Pyramid {
        sets: Vec<WorkSet>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftPlan {
    pub lift: Lift,
    pub training_max: f64,
    pub sets: Vec<WorkSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPlan {
    pub week: u8,
    pub label: &'static str,
    pub lifts: Vec<LiftPlan>,
}

/// Generated 5/3/1 cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WendlerProgram {
    pub header_text: Option<String>,
    pub training_maxes: BTreeMap<Lift, f64>,
    pub templates: Vec<Template>,
    pub accessory_pairings: &'static [AccessoryPairing],
    pub program: Vec<WeekPlan>,
}

/// Validated supplemental template.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Supplemental {
    Fsl { sets: i32, reps: i32 },
    Widowmaker,
    Pyramid,
}

/// Validated program settings, resolved once before any week is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    training_maxes: BTreeMap<Lift, f64>,
    templates: Vec<Template>,
    supplemental: Option<Supplemental>,
}

impl ProgramConfig {
    /// Resolves lifts, training maxes and templates from a request.
    pub fn from_request(request: &WendlerRequest) -> Result<Self, ProgramError> {
        let templates = resolve_templates(&request.templates);
        let supplemental = resolve_supplemental(&templates, request.fsl_params)?;

        let tm_percentage = request
            .tm_percentage
            .filter(|p| *p != 0.0)
            .unwrap_or_else(|| {
                request
                    .templates
                    .first()
                    .map_or(DEFAULT_TM_PERCENTAGE, Template::default_tm_percentage)
            });

        let training_maxes: BTreeMap<Lift, f64> = active_lifts(request.active_lifts.as_deref())
            .into_iter()
            .map(|lift| {
                let raw = request.raw_max(lift);
                let tm = match request.max_type {
                    MaxType::TrainingMax => raw,
                    MaxType::OneRepMax => raw * (tm_percentage / 100.0),
                };
                if !tm.is_finite() {
                    return Err(CalcError::NonFinite("training max"));
                }
                Ok((lift, tm))
            })
            .collect::<Result<_, CalcError>>()?;

        Ok(Self {
            training_maxes,
            templates,
            supplemental,
        })
    }

    /// Builds the four-week cycle.
    ///
    /// Fails if a working weight overflows, which only very large training maxes do.
    pub fn generate(&self) -> Result<Vec<WeekPlan>, CalcError> {
        WEEKS
            .iter()
            .map(|scheme| -> Result<WeekPlan, CalcError> {
                let lifts: Vec<LiftPlan> = self
                    .training_maxes
                    .iter()
                    .map(|(&lift, &tm)| self.plan_lift(scheme, lift, tm))
                    .collect::<Result<_, _>>()?;
                Ok(WeekPlan {
                    week: scheme.week,
                    label: scheme.label,
                    lifts,
                })
            })
            .collect()
    }

    fn plan_lift(
        &self,
        scheme: &WeekScheme,
        lift: Lift,
        training_max: f64,
    ) -> Result<LiftPlan, CalcError> {
        let sets: Vec<WorkSet> = scheme
            .percentages
            .iter()
            .zip(scheme.reps)
            .map(|(&percentage, reps)| -> Result<WorkSet, CalcError> {
                Ok(WorkSet {
                    reps: reps.to_string(),
                    percentage,
                    weight: working_weight(training_max, percentage)?,
                })
            })
            .collect::<Result<_, _>>()?;

        // Supplemental work runs at the first set's percentage
        let first_percentage = scheme.percentages[0];
        let first_weight = sets[0].weight;
        let overlay = match self.supplemental {
            Some(Supplemental::Fsl { sets, reps }) if !scheme.deload => Some(Overlay::Fsl {
                sets,
                reps,
                percentage: first_percentage,
                weight: first_weight,
            }),
            Some(Supplemental::Widowmaker) if !scheme.deload => Some(Overlay::Widowmaker {
                sets: 1,
                reps: WIDOWMAKER_REPS,
                percentage: first_percentage,
                weight: first_weight,
            }),
            Some(Supplemental::Pyramid) => Some(Overlay::Pyramid {
                sets: vec![
                    sets[1].clone(),
                    WorkSet {
                        reps: format!("{}+", scheme.reps[0]),
                        percentage: first_percentage,
                        weight: first_weight,
                    },
                ],
            }),
            _ => None,
        };

        Ok(LiftPlan {
            lift,
            training_max,
            sets,
            overlay,
        })
    }
}

/// Validates a request and generates the full program.
pub fn generate(request: &WendlerRequest) -> Result<WendlerProgram, ProgramError> {
    let config = ProgramConfig::from_request(request)?;
    let program = config.generate()?;

    Ok(WendlerProgram {
        header_text: request.header_text.clone(),
        training_maxes: config.training_maxes,
        templates: config.templates,
        accessory_pairings: &ACCESSORY_PAIRINGS,
        program,
    })
}

fn working_weight(training_max: f64, percentage: f64) -> Result<f64, CalcError> {
    let weight = round_to_increment(training_max * percentage / 100.0, ROUNDING_INCREMENT);
    if !weight.is_finite() {
        return Err(CalcError::NonFinite("working weight"));
    }
    Ok(weight)
}

/// Returns the requested lifts in programming order, without duplicates.
fn active_lifts(requested: Option<&[Lift]>) -> Vec<Lift> {
    match requested {
        None => Lift::all().to_vec(),
        Some(lifts) => Lift::all()
            .iter()
            .copied()
            .filter(|lift| lifts.contains(lift))
            .collect(),
    }
}

/// Sorts and de-duplicates templates; no selection means the default template.
fn resolve_templates(requested: &[Template]) -> Vec<Template> {
    let mut templates = requested.to_vec();
    templates.sort();
    templates.dedup();
    if templates.is_empty() {
        templates.push(Template::Default);
    }
    templates
}

fn resolve_supplemental(
    templates: &[Template],
    fsl_params: Option<FslParams>,
) -> Result<Option<Supplemental>, ProgramError> {
    let exclusive: Vec<Template> = templates
        .iter()
        .copied()
        .filter(Template::is_exclusive)
        .collect();

    match exclusive.as_slice() {
        [] => Ok(None),
        [Template::Fsl] => {
            let (sets, reps) = validate_fsl_params(fsl_params)?;
            Ok(Some(Supplemental::Fsl { sets, reps }))
        }
        [Template::Widowmaker] => Ok(Some(Supplemental::Widowmaker)),
        [Template::Pyramid] => Ok(Some(Supplemental::Pyramid)),
        _ => Err(ProgramError::TemplateConflict(exclusive)),
    }
}

fn validate_fsl_params(params: Option<FslParams>) -> Result<(i32, i32), ProgramError> {
    let params = params.ok_or_else(|| {
        ProgramError::InvalidFslParams(
            "fsl_params are required when the fsl template is selected".to_string(),
        )
    })?;

    let sets = params
        .sets
        .ok_or_else(|| ProgramError::InvalidFslParams("sets is required".to_string()))?;
    if !FSL_SETS.contains(&sets) {
        return Err(ProgramError::InvalidFslParams(format!(
            "sets must be between {} and {}, got {sets}",
            FSL_SETS.start(),
            FSL_SETS.end()
        )));
    }

    let reps = params
        .reps
        .ok_or_else(|| ProgramError::InvalidFslParams("reps is required".to_string()))?;
    if !FSL_REPS.contains(&reps) {
        return Err(ProgramError::InvalidFslParams(format!(
            "reps must be between {} and {}, got {reps}",
            FSL_REPS.start(),
            FSL_REPS.end()
        )));
    }

    Ok((sets, reps))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to check floating point equality with tolerance
    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn request(json: &str) -> WendlerRequest {
        serde_json::from_str(json).unwrap()
    }

    fn base() -> WendlerRequest {
        request(r#"{"squat": 200, "bench": 100, "deadlift": 250, "press": 60}"#)
    }

    fn plan(program: &WendlerProgram, week: usize, lift: Lift) -> &LiftPlan {
        program.program[week - 1]
            .lifts
            .iter()
            .find(|p| p.lift == lift)
            .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let r = base();
        assert_eq!(r.max_type, MaxType::OneRepMax);
        assert_eq!(r.tm_percentage, Some(90.0));
        assert!(r.templates.is_empty());
        assert!(r.active_lifts.is_none());
    }

    #[test]
    fn test_training_max_from_one_rep_max() {
        let program = generate(&base()).unwrap();
        assert!(approx_eq(program.training_maxes[&Lift::Squat], 180.0, 1e-9));
        assert!(approx_eq(program.training_maxes[&Lift::Press], 54.0, 1e-9));
        assert_eq!(program.training_maxes.len(), 4);
    }

    #[test]
    fn test_training_max_pass_through_ignores_percentage() {
        let mut r = base();
        r.max_type = MaxType::TrainingMax;
        r.tm_percentage = Some(50.0);

        let program = generate(&r).unwrap();
        assert_eq!(program.training_maxes[&Lift::Squat], 200.0);
        assert_eq!(program.training_maxes[&Lift::Bench], 100.0);
    }

    #[test]
    fn test_zero_tm_percentage_falls_back() {
        let mut r = base();
        r.tm_percentage = Some(0.0);
        r.templates = vec![Template::Pyramid];

        let program = generate(&r).unwrap();
        assert!(approx_eq(program.training_maxes[&Lift::Squat], 180.0, 1e-9));

        r.tm_percentage = None;
        let program = generate(&r).unwrap();
        assert!(approx_eq(program.training_maxes[&Lift::Squat], 180.0, 1e-9));
    }

    #[test]
    fn test_custom_tm_percentage() {
        let mut r = base();
        r.tm_percentage = Some(85.0);
        let program = generate(&r).unwrap();
        assert!(approx_eq(program.training_maxes[&Lift::Deadlift], 212.5, 1e-9));
    }

    #[test]
    fn test_active_lifts_subset_in_canonical_order() {
        let mut r = base();
        r.active_lifts = Some(vec![Lift::Press, Lift::Squat, Lift::Press]);

        let program = generate(&r).unwrap();
        let lifts: Vec<Lift> = program.training_maxes.keys().copied().collect();
        assert_eq!(lifts, vec![Lift::Squat, Lift::Press]);
        for week in &program.program {
            let week_lifts: Vec<Lift> = week.lifts.iter().map(|p| p.lift).collect();
            assert_eq!(week_lifts, vec![Lift::Squat, Lift::Press]);
        }
    }

    #[test]
    fn test_empty_active_lifts_programs_nothing() {
        let mut r = base();
        r.active_lifts = Some(Vec::new());

        let program = generate(&r).unwrap();
        assert!(program.training_maxes.is_empty());
        assert!(program.program.iter().all(|w| w.lifts.is_empty()));
        assert_eq!(program.accessory_pairings.len(), 3);
    }

    #[test]
    fn test_week_table() {
        let program = generate(&base()).unwrap();
        assert_eq!(program.program.len(), 4);

        // Squat TM 180
        let expected = [
            (["5", "5", "5+"], [117.5, 135.0, 152.5]),
            (["3", "3", "3+"], [125.0, 145.0, 162.5]),
            (["5", "3", "1+"], [135.0, 152.5, 170.0]),
            (["5", "5", "5"], [72.5, 90.0, 107.5]),
        ];
        for (i, (reps, weights)) in expected.iter().enumerate() {
            let squat = plan(&program, i + 1, Lift::Squat);
            let got_reps: Vec<&str> = squat.sets.iter().map(|s| s.reps.as_str()).collect();
            let got_weights: Vec<f64> = squat.sets.iter().map(|s| s.weight).collect();
            assert_eq!(got_reps, reps.to_vec(), "week {}", i + 1);
            assert_eq!(got_weights, weights.to_vec(), "week {}", i + 1);
        }
        assert_eq!(program.program[3].label, "Deload");
    }

    #[test]
    fn test_main_weights_are_increment_multiples() {
        let mut r = base();
        r.squat = 187.3;
        r.tm_percentage = Some(87.0);
        let program = generate(&r).unwrap();

        for week in &program.program {
            for lift in &week.lifts {
                for set in &lift.sets {
                    assert_eq!(set.weight % ROUNDING_INCREMENT, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_exclusive_templates_conflict() {
        let mut r = base();
        r.templates = vec![Template::Widowmaker, Template::Default, Template::Fsl];
        r.fsl_params = Some(FslParams {
            sets: Some(5),
            reps: Some(5),
        });

        assert_eq!(
            generate(&r),
            Err(ProgramError::TemplateConflict(vec![
                Template::Fsl,
                Template::Widowmaker
            ]))
        );
    }

    #[test]
    fn test_duplicate_template_is_not_a_conflict() {
        let mut r = base();
        r.templates = vec![Template::Pyramid, Template::Pyramid, Template::Default];

        let program = generate(&r).unwrap();
        assert_eq!(program.templates, vec![Template::Default, Template::Pyramid]);
    }

    #[test]
    fn test_no_templates_resolves_to_default() {
        let program = generate(&base()).unwrap();
        assert_eq!(program.templates, vec![Template::Default]);
        assert!(
            program
                .program
                .iter()
                .flat_map(|w| &w.lifts)
                .all(|l| l.overlay.is_none())
        );
    }

    #[test]
    fn test_fsl_requires_params() {
        let mut r = base();
        r.templates = vec![Template::Fsl];

        let err = generate(&r).unwrap_err();
        assert!(matches!(err, ProgramError::InvalidFslParams(_)));
        assert!(err.to_string().contains("fsl_params are required"));
    }

    #[test]
    fn test_fsl_params_ranges() {
        let cases = [
            (None, Some(5), "sets is required"),
            (Some(2), Some(5), "sets must be between 3 and 8, got 2"),
            (Some(9), Some(5), "sets must be between 3 and 8, got 9"),
            (Some(5), None, "reps is required"),
            (Some(5), Some(6), "reps must be between 3 and 5, got 6"),
        ];

        for (sets, reps, message) in cases {
            let mut r = base();
            r.templates = vec![Template::Fsl];
            r.fsl_params = Some(FslParams { sets, reps });

            assert_eq!(
                generate(&r),
                Err(ProgramError::InvalidFslParams(message.to_string()))
            );
        }
    }

    #[test]
    fn test_fsl_params_ignored_without_fsl() {
        let mut r = base();
        r.fsl_params = Some(FslParams {
            sets: Some(99),
            reps: None,
        });
        assert!(generate(&r).is_ok());
    }

    #[test]
    fn test_fsl_overlay() {
        let mut r = base();
        r.templates = vec![Template::Fsl];
        r.fsl_params = Some(FslParams {
            sets: Some(5),
            reps: Some(5),
        });

        let program = generate(&r).unwrap();
        assert_eq!(
            plan(&program, 2, Lift::Squat).overlay,
            Some(Overlay::Fsl {
                sets: 5,
                reps: 5,
                percentage: 70.0,
                weight: 125.0,
            })
        );
        assert!(plan(&program, 4, Lift::Squat).overlay.is_none());
    }

    #[test]
    fn test_widowmaker_overlay() {
        let mut r = base();
        r.templates = vec![Template::Widowmaker];

        let program = generate(&r).unwrap();
        assert_eq!(
            plan(&program, 3, Lift::Deadlift).overlay,
            // TM 225 × 75% = 168.75 → 170
            Some(Overlay::Widowmaker {
                sets: 1,
                reps: 20,
                percentage: 75.0,
                weight: 170.0,
            })
        );
        for lift in &program.program[3].lifts {
            assert!(lift.overlay.is_none());
        }
    }

    #[test]
    fn test_pyramid_overlay_applies_every_week() {
        let mut r = base();
        r.templates = vec![Template::Pyramid];

        let program = generate(&r).unwrap();
        for week in &program.program {
            for lift in &week.lifts {
                let Some(Overlay::Pyramid { sets }) = &lift.overlay else {
                    panic!("week {} {:?} has no pyramid", week.week, lift.lift);
                };
                assert_eq!(sets[0], lift.sets[1]);
                assert_eq!(sets[1].reps, format!("{}+", lift.sets[0].reps));
                assert_eq!(sets[1].weight, lift.sets[0].weight);
            }
        }

        let week3 = plan(&program, 3, Lift::Squat);
        let Some(Overlay::Pyramid { sets }) = &week3.overlay else {
            panic!("missing pyramid");
        };
        assert_eq!(sets[0].reps, "3");
        assert_eq!(sets[0].weight, 152.5);
        assert_eq!(sets[1].reps, "5+");
        assert_eq!(sets[1].weight, 135.0);
    }

    #[test]
    fn test_overlay_serializes_tagged() {
        let mut r = base();
        r.templates = vec![Template::Widowmaker];
        r.active_lifts = Some(vec![Lift::Bench]);

        let json = serde_json::to_value(generate(&r).unwrap()).unwrap();
        let overlay = &json["program"][0]["lifts"][0]["overlay"];
        assert_eq!(overlay["type"], "widowmaker");
        assert_eq!(overlay["reps"], 20);
        assert!(json["training_maxes"]["bench"].is_number());
        assert_eq!(json["accessory_pairings"][1]["main"], "OHP");
        assert_eq!(json["accessory_pairings"][1]["accessory"], "Dips");
    }

    #[test]
    fn test_overflowing_working_weight_fails() {
        let mut r = base();
        r.max_type = MaxType::TrainingMax;
        r.squat = 1.7e308;

        assert_eq!(
            generate(&r),
            Err(ProgramError::Calc(CalcError::NonFinite("working weight")))
        );
    }

    #[test]
    fn test_overflowing_training_max_fails() {
        let mut r = base();
        r.tm_percentage = Some(1e308);

        assert_eq!(
            generate(&r).unwrap_err().to_string(),
            "training max is not a finite number"
        );
    }
}
