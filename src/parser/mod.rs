//! Instruction-text parsing for rung `rawText`.
//!
//! The grammar is the neutral text form upstream exporters emit:
//! `NAME(op1,op2)` calls, juxtaposition for series logic and
//! `[leg1,leg2]` for parallel branches. Scanning is tolerant: unbalanced
//! delimiters end the scan at the end of the string instead of failing.

pub mod operand;
pub mod rung;

use std::borrow::Cow;

use crate::ast::{Instruction, Rung};

pub use operand::{is_numeric_literal, is_tag_operand};
pub use rung::{extract_instructions, parse_rung, split_operands, Branch, ParsedRung};

/// Instructions for a rung: the upstream list when present, otherwise the
/// calls extracted from `rawText`.
pub fn rung_instructions(rung: &Rung) -> Cow<'_, [Instruction]> {
    if rung.instructions.is_empty() {
        Cow::Owned(parse_rung(&rung.raw_text).all_instructions())
    } else {
        Cow::Borrowed(&rung.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_instructions_take_precedence() {
        let mut rung = Rung::new(0, "XIC(A) OTE(B)");
        rung.instructions = vec![Instruction::new("XIO", vec!["C".into()])];
        let ins = rung_instructions(&rung);
        assert_eq!(ins.len(), 1);
        assert!(ins[0].is("XIO"));
    }

    #[test]
    fn falls_back_to_raw_text() {
        let rung = Rung::new(0, "XIC(A) OTE(B)");
        let ins = rung_instructions(&rung);
        assert_eq!(ins.len(), 2);
        assert_eq!(ins[1].operands, vec!["B".to_string()]);
    }
}
