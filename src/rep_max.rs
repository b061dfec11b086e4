//! Rep-max tables derived from an estimated 1RM.

use serde::Serialize;

use crate::error::CalcError;
use crate::formulas::{Formula, format_decimal, round_to_decimals, weight_at_reps};

/// Rep counts listed in every table, in display order.
pub const REP_TARGETS: [i32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 13, 16, 20];

const TABLE_HEADER: &str = "Reps    Percent Weight\n";
const TABLE_SEPARATOR: &str = "------------------------\n";
const INPUT_MARKER: &str = " <--";

/// One row of a rep-max table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepMaxRow {
    pub reps: i32,
    /// Display label, e.g. `5RM`.
    pub label: String,
    /// Percentage of the 1RM, two decimals.
    pub percentage: f64,
    /// Estimated weight, two decimals.
    pub weight: f64,
    /// Whether this row matches the reps of the submitted set.
    pub is_input: bool,
}

/// Builds the rep-max table for `one_rm`, marking the row for `input_reps`.
///
/// Fails when a percentage cannot be computed (e.g. a zero 1RM).
pub fn build_table(
    one_rm: f64,
    input_reps: i32,
    formula: Formula,
) -> Result<Vec<RepMaxRow>, CalcError> {
    REP_TARGETS
        .iter()
        .map(|&reps| {
            let weight = round_to_decimals(weight_at_reps(one_rm, reps, formula), 2);
            let percentage = round_to_decimals(weight / one_rm * 100.0, 2);
            if !percentage.is_finite() {
                return Err(CalcError::NonFinite("percentage of one_rm"));
            }

            Ok(RepMaxRow {
                reps,
                label: format!("{reps}RM"),
                percentage,
                weight,
                is_input: reps == input_reps,
            })
        })
        .collect()
}

/// Renders the table as fixed-width text with the input row marked.
pub fn format_table(rows: &[RepMaxRow]) -> String {
    let mut output = String::from(TABLE_HEADER);
    output.push_str(TABLE_SEPARATOR);

    for row in rows {
        let percent = format!("{}%", format_decimal(row.percentage));
        let arrow = if row.is_input { INPUT_MARKER } else { "" };
        output.push_str(&format!(
            "{:<7} {:<7} {:.2}{}\n",
            row.label, percent, row.weight, arrow
        ));
    }

    output
}
