//! Latch/unlatch: any OTL or OTU on the rung.

use super::utils::{list, owned};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let latched = view.written_by(&["OTL"]);
    let unlatched = view.written_by(&["OTU"]);
    if latched.is_empty() && unlatched.is_empty() && !view.has_opcode(&["OTL", "OTU"]) {
        return None;
    }

    let description = match (latched.is_empty(), unlatched.is_empty()) {
        (false, false) => format!("Latches {} and unlatches {}", list(&latched, 3), list(&unlatched, 3)),
        (false, true) => format!("Latches {} (held until unlatched elsewhere)", list(&latched, 3)),
        (true, false) => format!("Unlatches {}", list(&unlatched, 3)),
        (true, true) => "Latch/unlatch instruction without a tag operand".to_string(),
    };
    let mut tags = owned(&latched);
    tags.extend(unlatched.iter().filter(|t| !latched.contains(t)).map(|t| t.to_string()));
    Some(view.pattern(PatternType::LatchUnlatch, 0.95, tags, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn latch_and_unlatch() {
        let p = run(check, "XIC(Fault) OTL(Alarm) XIC(Reset) OTU(Alarm) OTU(Horn)").unwrap();
        assert_eq!(p.tags, vec!["Alarm", "Horn"]);
        assert!(p.description.starts_with("Latches Alarm and unlatches Alarm, Horn"));
    }

    #[test]
    fn no_latch_no_pattern() {
        assert!(run(check, "XIC(A) OTE(B)").is_none());
    }
}
