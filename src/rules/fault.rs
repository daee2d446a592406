//! Fault detection: fault vocabulary among the rung's tags.

use super::utils::{list, owned, tags_matching, FAULT};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let tags = view.tags();
    let fault_tags = tags_matching(&tags, &FAULT);
    if fault_tags.is_empty() {
        return None;
    }
    let raised: Vec<&str> = fault_tags
        .iter()
        .copied()
        .filter(|t| view.output_tags.iter().any(|o| o == t))
        .collect();
    let description = if raised.is_empty() {
        format!("Reacts to fault condition {}", list(&fault_tags, 3))
    } else {
        format!("Raises fault {}", list(&raised, 3))
    };
    Some(view.pattern(PatternType::FaultDetection, 0.85, owned(&fault_tags), description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn raised_versus_consumed() {
        let p = run(check, "XIC(Overload_Trip) OTL(Motor_Fault)").unwrap();
        assert_eq!(p.description, "Raises fault Motor_Fault");
        assert_eq!(p.tags, vec!["Overload_Trip", "Motor_Fault"]);
        let p = run(check, "XIO(Drive_Fault) OTE(Drive_Enable)").unwrap();
        assert!(p.description.starts_with("Reacts to fault"));
        assert!(run(check, "XIC(A) OTE(B)").is_none());
    }

    #[test]
    fn override_and_strip_are_not_faults() {
        assert!(run(check, "XIC(Speed_Override) OTE(Line_Speed_Sel)").is_none());
        assert!(run(check, "XIC(Strip_Feeder_On) OTE(Feed)").is_none());
    }
}
