//! Alarm annunciation: an alarm/horn/beacon coil driven by conditions.

use super::utils::{gates_output, list, ALARM};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    if !gates_output(view) {
        return None;
    }
    let alarms: Vec<&str> = view
        .written_by(&["OTE", "OTL"])
        .into_iter()
        .filter(|t| ALARM.is_match(t))
        .collect();
    if alarms.is_empty() {
        return None;
    }
    let latched = view.written_by(&["OTL"]).iter().any(|t| alarms.contains(t));
    let (confidence, how) = if latched { (0.9, "Latches") } else { (0.85, "Annunciates") };
    let description = format!("{how} alarm {}", list(&alarms, 3));
    Some(view.pattern(
        PatternType::AlarmAnnunciation,
        confidence,
        alarms.iter().map(|t| t.to_string()).collect(),
        description,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn latched_alarm() {
        let p = run(check, "GRT(Temp,150) OTL(High_Temp_Alarm)").unwrap();
        assert_eq!(p.confidence, 0.9);
        let p = run(check, "XIC(Fault) OTE(Stack_Light_Red) OTE(Horn)").unwrap();
        assert_eq!(p.tags, vec!["Stack_Light_Red", "Horn"]);
        assert!(run(check, "XIC(Alarm_Active) OTE(Lamp)").is_none());
    }
}
