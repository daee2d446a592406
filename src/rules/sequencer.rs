//! Sequencer: a step/state/phase tag being compared or advanced.

use super::utils::{list, SEQUENCE};
use super::{DetectedPattern, PatternType, RungView};
use crate::graph::opcodes::COMPARISON_OPCODES;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let compared: Vec<&str> = view
        .read_by(COMPARISON_OPCODES)
        .into_iter()
        .filter(|t| SEQUENCE.is_match(t))
        .collect();
    let advanced: Vec<&str> = view
        .written_by(&["ADD", "SUB", "MOV", "COP"])
        .into_iter()
        .filter(|t| SEQUENCE.is_match(t))
        .collect();
    if compared.is_empty() && advanced.is_empty() {
        return None;
    }

    let description = match (compared.is_empty(), advanced.is_empty()) {
        (false, false) => format!("Sequence step check on {} advancing {}", list(&compared, 2), list(&advanced, 2)),
        (false, true) => format!("Acts in sequence step {}", list(&compared, 2)),
        _ => format!("Advances sequence {}", list(&advanced, 2)),
    };
    let mut tags: Vec<String> = compared.iter().map(|t| t.to_string()).collect();
    for t in advanced {
        if !tags.iter().any(|x| x == t) {
            tags.push(t.to_string());
        }
    }
    Some(view.pattern(PatternType::Sequencer, 0.85, tags, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn compare_and_advance() {
        let p = run(check, "EQU(Fill_Step,3) XIC(Tank_Full) MOV(4,Fill_Step)").unwrap();
        assert_eq!(p.tags, vec!["Fill_Step"]);
        assert!(p.description.starts_with("Sequence step check"));
        let p = run(check, "XIC(Next) ADD(Phase,1,Phase)").unwrap();
        assert!(p.description.starts_with("Advances sequence"));
        assert!(run(check, "EQU(Count,3) OTE(Out)").is_none());
    }
}
