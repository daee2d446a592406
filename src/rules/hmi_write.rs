//! HMI write: a value or bit written to an HMI-facing tag.

use super::utils::{list, HMI};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let moved: Vec<&str> = view
        .written_by(&["MOV", "COP"])
        .into_iter()
        .filter(|t| HMI.is_match(t))
        .collect();
    let coils: Vec<&str> = view
        .written_by(&["OTE", "OTL", "OTU"])
        .into_iter()
        .filter(|t| HMI.is_match(t) && !moved.contains(t))
        .collect();
    if moved.is_empty() && coils.is_empty() {
        return None;
    }
    let confidence = if moved.is_empty() { 0.8 } else { 0.85 };
    let mut tags = moved.clone();
    tags.extend(coils.iter());
    let description = format!("Writes HMI tag {}", list(&tags, 3));
    Some(view.pattern(
        PatternType::HmiWrite,
        confidence,
        tags.iter().map(|t| t.to_string()).collect(),
        description,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn move_to_hmi() {
        let p = run(check, "MOV(Tank_Level,HMI_Tank_Level)").unwrap();
        assert_eq!(p.confidence, 0.85);
        let p = run(check, "XIC(Running) OTE(Run_Pilot_Lamp)").unwrap();
        assert_eq!(p.confidence, 0.8);
        assert!(run(check, "XIC(HMI_Start) OTE(Run)").is_none());
    }
}
