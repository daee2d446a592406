//! Data scaling: MUL/DIV on analog values or against full-scale constants.

use super::code_concern;
use super::utils::{is_scaling_constant, list, owned, tags_matching, ANALOG};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let scaling_block = view.has_opcode(&["SCP", "SCL"]);
    if !view.has_opcode(&["MUL", "DIV"]) && !scaling_block {
        return None;
    }
    if code_concern::find(view).is_some() {
        return None;
    }

    let tags = view.tags();
    let analog = tags_matching(&tags, &ANALOG);
    let constants = view
        .instructions_of(&["MUL", "DIV"])
        .flat_map(|i| i.operands.iter())
        .any(|op| is_scaling_constant(op));

    let confidence = match (scaling_block || !analog.is_empty(), constants) {
        (true, true) => 0.9,
        (true, false) => 0.8,
        (false, true) => 0.75,
        (false, false) => return None,
    };
    let description = if analog.is_empty() {
        "Scales a value by a full-scale constant".to_string()
    } else {
        format!("Scales analog value {}", list(&analog, 3))
    };
    Some(view.pattern(PatternType::DataScaling, confidence, owned(&analog), description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn analog_with_constant() {
        let p = run(check, "MUL(Tank_Level_Raw,100,Work) DIV(Work,32767,Tank_Level_Pct)").unwrap();
        assert_eq!(p.confidence, 0.9);
        assert!(p.tags.contains(&"Tank_Level_Raw".to_string()));
    }

    #[test]
    fn constant_only() {
        let p = run(check, "DIV(N7:0,4095,N7:1)").unwrap();
        assert_eq!(p.confidence, 0.75);
    }

    #[test]
    fn suppressed_by_code_concern() {
        assert!(run(check, "MUL(Pump_Running,Valve_Open,Speed_Raw)").is_none());
        assert!(run(check, "MUL(A,B,C)").is_none());
    }
}
