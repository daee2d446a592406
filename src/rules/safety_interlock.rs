//! Safety interlock: safety vocabulary (E-stop, gate, guard, interlock) on a
//! rung shaped as conditions gating an output.

use super::utils::{gates_output, list, owned, tags_matching, ESTOP, GATE, GUARD, SAFETY};
use super::{DetectedPattern, PatternType, RungView};
use crate::graph::opcodes::COIL_OPCODES;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let tags = view.tags();
    let safety_tags = tags_matching(&tags, &SAFETY);
    if safety_tags.is_empty() && !SAFETY.is_match(&view.text) {
        return None;
    }
    if !gates_output(view) {
        return None;
    }

    let (variant, confidence) = if ESTOP.is_match(&view.text) {
        ("Emergency stop", 0.95)
    } else if GATE.is_match(&view.text) {
        ("Gate", 0.95)
    } else if GUARD.is_match(&view.text) {
        ("Guard", 0.95)
    } else {
        ("Safety", 0.9)
    };

    let outputs = view.written_by(COIL_OPCODES);
    let description = format!(
        "{variant} interlock: {} must hold to drive {}",
        if safety_tags.is_empty() { "safety conditions".to_string() } else { list(&safety_tags, 4) },
        list(&outputs, 4)
    );
    Some(view.pattern(PatternType::SafetyInterlock, confidence, owned(&safety_tags), description))
}
