//! Permissive chain: four or more series XIC conditions gating one coil.

use super::utils::list;
use super::{DetectedPattern, PatternType, RungView};
use crate::parser::is_tag_operand;

pub const MIN_CONDITIONS: usize = 4;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let mut best: Option<(Vec<&str>, &str)> = None;

    for leg in view.legs() {
        let coils: Vec<&str> = leg
            .iter()
            .copied()
            .filter(|i| i.is_any(&["OTE", "OTL"]))
            .filter_map(|i| i.operands.first())
            .map(|op| op.trim())
            .collect();
        if coils.len() != 1 {
            continue;
        }
        let conditions: Vec<&str> = leg
            .iter()
            .copied()
            .filter(|i| i.is("XIC"))
            .filter_map(|i| i.operands.first())
            .map(|op| op.trim())
            .filter(|op| is_tag_operand(op))
            .collect();
        if conditions.len() >= MIN_CONDITIONS && best.as_ref().map_or(true, |(c, _)| conditions.len() > c.len()) {
            best = Some((conditions, coils[0]));
        }
    }

    let (conditions, coil) = best?;
    let confidence = if conditions.len() >= 6 { 0.9 } else { 0.8 };
    let description = format!(
        "{} permissives must all be true to energize {coil}: {}",
        conditions.len(),
        list(&conditions, 6)
    );
    let mut tags: Vec<String> = conditions.iter().map(|t| t.to_string()).collect();
    tags.push(coil.to_string());
    Some(view.pattern(PatternType::PermissiveChain, confidence, tags, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn four_series_contacts() {
        let p = run(check, "XIC(A) XIC(B) XIC(C) XIC(D) OTE(Permit)").unwrap();
        assert_eq!(p.confidence, 0.8);
        assert_eq!(p.tags.last().map(String::as_str), Some("Permit"));
    }

    #[test]
    fn long_chain_in_a_branch() {
        let p = run(check, "XIC(P) [XIC(A) XIC(B) XIC(C) XIC(D) XIC(E) OTE(Out),XIC(F) OTE(Other)]").unwrap();
        assert_eq!(p.confidence, 0.9);
    }

    #[test]
    fn too_few_or_several_coils() {
        assert!(run(check, "XIC(A) XIC(B) XIC(C) OTE(Permit)").is_none());
        assert!(run(check, "XIC(A) XIC(B) XIC(C) XIC(D) OTE(X) OTE(Y)").is_none());
    }
}
