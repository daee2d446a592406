//! One-shot: ONS, OSR or OSF on the rung.

use super::utils::{list, owned};
use super::{DetectedPattern, PatternType, RungView};
use crate::graph::opcodes::ONE_SHOT_OPCODES;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    if !view.has_opcode(ONE_SHOT_OPCODES) {
        return None;
    }
    let tags = view.operands_of(ONE_SHOT_OPCODES);
    let edge = if view.has_opcode(&["OSF"]) { "falling" } else { "rising" };
    let description = if tags.is_empty() {
        format!("One-shot on the {edge} edge")
    } else {
        format!("One-shot on the {edge} edge using {}", list(&tags, 3))
    };
    Some(view.pattern(PatternType::OneShot, 0.95, owned(&tags), description))
}
