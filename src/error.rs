//! Error types for the liftcalc application.

use thiserror::Error;

use crate::domain::Template;

/// Errors that can occur when resolving a 1RM formula.
#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("invalid formula '{0}'. Use 'epley', 'brzycki', or 'lombardi'")]
    InvalidFormula(String),
}

/// Errors raised by numeric computations that have no finite result.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
}

/// Errors that can occur while building a 5/3/1 program.
#[derive(Debug, Error, PartialEq)]
pub enum ProgramError {
    #[error("templates {} are mutually exclusive; select at most one", join_templates(.0))]
    TemplateConflict(Vec<Template>),

    #[error("invalid fsl_params: {0}")]
    InvalidFslParams(String),

    #[error(transparent)]
    Calc(#[from] CalcError),
}

fn join_templates(templates: &[Template]) -> String {
    templates
        .iter()
        .map(|t| t.id())
        .collect::<Vec<_>>()
        .join(", ")
}
