//! Comparison branch: two or more comparisons, or a limit test.

use super::utils::{list, owned};
use super::{DetectedPattern, PatternType, RungView};
use crate::graph::opcodes::COMPARISON_OPCODES;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let count = view.count_opcode(COMPARISON_OPCODES);
    let limit = view.has_opcode(&["LIM"]);
    if count < 2 && !limit {
        return None;
    }
    let tags = view.read_by(COMPARISON_OPCODES);
    let description = if limit {
        format!("Range check on {}", list(&tags, 3))
    } else {
        format!("{count} comparisons on {}", list(&tags, 3))
    };
    Some(view.pattern(PatternType::ComparisonBranch, 0.75, owned(&tags), description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn thresholds() {
        assert!(run(check, "GRT(Temp,100) OTE(Hot)").is_none());
        let p = run(check, "GRT(Temp,100) LES(Temp,200) OTE(Warm)").unwrap();
        assert_eq!(p.description, "2 comparisons on Temp");
        let p = run(check, "LIM(10,Level,90) OTE(Level_Ok)").unwrap();
        assert!(p.description.starts_with("Range check on Level"));
    }
}
