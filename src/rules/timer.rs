//! Timer delay and counter accumulator rules.

use super::utils::list;
use super::{DetectedPattern, PatternType, RungView};
use crate::ast::Instruction;
use crate::graph::opcodes::{COUNTER_OPCODES, TIMER_OPCODES};
use crate::parser::{is_numeric_literal, is_tag_operand};

pub fn check_timer(view: &RungView<'_>) -> Option<DetectedPattern> {
    check_accumulators(view, TIMER_OPCODES, PatternType::TimerDelay)
}

pub fn check_counter(view: &RungView<'_>) -> Option<DetectedPattern> {
    check_accumulators(view, COUNTER_OPCODES, PatternType::CounterAccumulator)
}

fn check_accumulators(view: &RungView<'_>, opcodes: &[&str], kind: PatternType) -> Option<DetectedPattern> {
    let found: Vec<&Instruction> = view.instructions_of(opcodes).collect();
    let first = found.first()?;

    let tags: Vec<String> = found
        .iter()
        .filter_map(|i| i.operands.first())
        .filter(|op| is_tag_operand(op))
        .map(|op| op.trim().to_string())
        .fold(Vec::new(), |mut acc, t| {
            if !acc.contains(&t) {
                acc.push(t);
            }
            acc
        });

    let names: Vec<&str> = tags.iter().map(String::as_str).collect();
    let preset = first.operands.get(1).filter(|p| is_numeric_literal(p));
    let mut description = format!("{} {}", describe(&first.opcode()), list(&names, 3));
    if let Some(preset) = preset {
        description.push_str(&format!(" (preset {})", preset.trim()));
    }
    Some(view.pattern(kind, 0.95, tags, description))
}

fn describe(opcode: &str) -> &'static str {
    match opcode {
        "TON" => "On-delay timer",
        "TOF" => "Off-delay timer",
        "RTO" => "Retentive timer",
        "CTU" => "Up counter",
        "CTD" => "Down counter",
        _ => "Accumulator",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn on_delay_with_preset() {
        let p = run(check_timer, "XIC(A) TON(T4:14,300,0)").unwrap();
        assert_eq!(p.pattern_type, PatternType::TimerDelay);
        assert_eq!(p.tags, vec!["T4:14"]);
        assert_eq!(p.description, "On-delay timer T4:14 (preset 300)");
    }

    #[test]
    fn logix_placeholders() {
        let p = run(check_timer, "XIC(A) TOF(Fan_Rundown,?,?)").unwrap();
        assert_eq!(p.description, "Off-delay timer Fan_Rundown");
    }

    #[test]
    fn counters() {
        let p = run(check_counter, "XIC(Part_Eye) CTU(C5:0,50,0)").unwrap();
        assert_eq!(p.pattern_type, PatternType::CounterAccumulator);
        assert!(p.description.starts_with("Up counter C5:0"));
        assert!(run(check_counter, "XIC(A) TON(T1,5,0)").is_none());
    }
}
