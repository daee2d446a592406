//! Jog control: a jog/inch output driven momentarily by a coil.

use super::utils::{list, JOG};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let jogs: Vec<&str> = view
        .written_by(&["OTE", "OTL"])
        .into_iter()
        .filter(|t| JOG.is_match(t))
        .collect();
    if jogs.is_empty() || view.input_tags.is_empty() {
        return None;
    }
    // Jog is momentary; a latched jog is unusual.
    let confidence = if view.has_opcode(&["OTL"]) { 0.8 } else { 0.9 };
    let description = format!("Jogs {} while the jog input is held", list(&jogs, 3));
    Some(view.pattern(
        PatternType::JogControl,
        confidence,
        jogs.iter().map(|t| t.to_string()).collect(),
        description,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn momentary_jog() {
        let p = run(check, "XIC(Jog_PB) XIO(Auto_Mode) OTE(Conveyor_Jog)").unwrap();
        assert_eq!(p.confidence, 0.9);
        assert!(run(check, "XIC(Jog_PB) OTE(Conveyor_Run)").is_none());
    }
}
