//! Start/stop circuit: motor tags together with start/stop naming or a latch.

use super::utils::{list, owned, tags_matching, MOTOR, START_STOP};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let tags = view.tags();
    let motor_tags = tags_matching(&tags, &MOTOR);
    if motor_tags.is_empty() {
        return None;
    }
    let command_tags = tags_matching(&tags, &START_STOP);
    let latched = view.has_opcode(&["OTL"]);
    if command_tags.is_empty() && !latched {
        return None;
    }

    // A coil that also appears as a contact is sealed in.
    let sealed = view.output_tags.iter().find(|o| view.input_tags.contains(*o));
    let holding = match (sealed, latched) {
        (Some(tag), _) => format!(" with seal-in on {tag}"),
        (None, true) => " held by a latch".to_string(),
        (None, false) => String::new(),
    };

    let mut implicated = motor_tags.clone();
    for t in command_tags {
        if !implicated.contains(&t) {
            implicated.push(t);
        }
    }
    let description = format!("Start/stop circuit for {}{holding}", list(&motor_tags, 3));
    Some(view.pattern(PatternType::StartStopCircuit, 0.85, owned(&implicated), description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn seal_in_circuit() {
        let p = run(check, "[XIC(Motor_Start_PB),XIC(Motor_Run)] XIO(Motor_Stop_PB) OTE(Motor_Run)").unwrap();
        assert_eq!(p.confidence, 0.85);
        assert!(p.description.contains("seal-in on Motor_Run"));
    }

    #[test]
    fn latched_motor_without_start_naming() {
        let p = run(check, "XIC(Button1) OTL(Pump_1)").unwrap();
        assert!(p.description.contains("latch"));
    }

    #[test]
    fn needs_motor_vocabulary() {
        assert!(run(check, "XIC(Start) OTE(Lamp)").is_none());
        assert!(run(check, "XIC(Permit) OTE(Fan_Enable)").is_none());
    }
}
