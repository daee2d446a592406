//! Code concern: arithmetic or equality on bit-named operands. Reported as a
//! likely misuse only; it never feeds category or safety classification.

use super::utils::is_boolean_named;
use super::{DetectedPattern, PatternType, RungView};
use crate::parser::is_tag_operand;

/// The first misuse on the rung: description and implicated tags.
pub fn find(view: &RungView<'_>) -> Option<(String, Vec<String>)> {
    for ins in &view.instructions {
        if ins.is_any(&["MUL", "DIV"]) {
            let bits: Vec<&str> = ins
                .operands
                .iter()
                .take(2)
                .map(|op| op.trim())
                .filter(|op| is_tag_operand(op) && is_boolean_named(op))
                .collect();
            if bits.len() >= 2 {
                return Some((
                    format!(
                        "{} applied to bit-named tags {} and {}; arithmetic on booleans is likely a mistake",
                        ins.opcode(),
                        bits[0],
                        bits[1]
                    ),
                    bits.iter().map(|t| t.to_string()).collect(),
                ));
            }
        } else if ins.is("EQU") {
            let bit = ins
                .operands
                .iter()
                .map(|op| op.trim())
                .find(|op| is_tag_operand(op) && is_boolean_named(op));
            if let Some(bit) = bit {
                return Some((
                    format!("EQU compares bit-named tag {bit}; XIC/XIO expresses a bit test directly"),
                    vec![bit.to_string()],
                ));
            }
        }
    }
    None
}

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let (description, tags) = find(view)?;
    Some(view.pattern(PatternType::CodeConcern, 0.8, tags, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn multiplying_bits() {
        let p = run(check, "MUL(Pump_Running,Valve_Open,Result)").unwrap();
        assert_eq!(p.tags, vec!["Pump_Running", "Valve_Open"]);
        assert!(p.description.starts_with("MUL applied"));
    }

    #[test]
    fn equ_on_bit() {
        let p = run(check, "EQU(Cycle_Done,1) OTE(Next)").unwrap();
        assert_eq!(p.tags, vec!["Cycle_Done"]);
    }

    #[test]
    fn numeric_arithmetic_is_fine() {
        assert!(run(check, "MUL(Raw_Level,100,Level_Pct)").is_none());
        assert!(run(check, "EQU(Recipe_No,3) OTE(Next)").is_none());
    }
}
