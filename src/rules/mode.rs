//! Mode selection: auto/manual/maintenance mode tags being set.

use super::utils::{list, MODE};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let modes: Vec<&str> = view
        .written_by(&["OTE", "OTL", "OTU", "MOV"])
        .into_iter()
        .filter(|t| MODE.is_match(t))
        .collect();
    if modes.is_empty() {
        return None;
    }
    let has_conditions = !view.input_tags.is_empty();
    if !has_conditions && !view.has_opcode(&["MOV"]) {
        return None;
    }
    let confidence = if view.has_opcode(&["OTL"]) && view.has_opcode(&["OTU"]) { 0.85 } else { 0.8 };
    let description = format!("Selects operating mode {}", list(&modes, 3));
    Some(view.pattern(
        PatternType::ModeSelection,
        confidence,
        modes.iter().map(|t| t.to_string()).collect(),
        description,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn latching_modes() {
        let p = run(check, "XIC(Auto_PB) OTL(Auto_Mode) OTU(Manual_Mode)").unwrap();
        assert_eq!(p.confidence, 0.85);
        assert_eq!(p.tags.len(), 2);
        assert!(run(check, "XIC(Auto_Mode) OTE(Run)").is_none());
    }
}
