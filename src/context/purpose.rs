//! Purpose generation.
//!
//! [`build_purpose`] is the decision table: it picks a template and fills in
//! its arguments. [`render_purpose`] turns that structure into prose, so the
//! decision logic can be tested without comparing strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::categorize::RungCategory;
use crate::graph::opcodes::{COMPARISON_OPCODES, CONDITION_OPCODES};
use crate::rules::utils::{list, ESTOP, GATE, GUARD};
use crate::rules::{DetectedPattern, PatternType, RungView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurposeTemplate {
    SafetyInterlock,
    MotorControl,
    Sequence,
    StatusReport,
    ZoneControl,
    TimerDelay,
    Counter,
    Latch,
    Alarm,
    ModeSelection,
    Jog,
    HmiUpdate,
    Scaling,
    FaultResponse,
    Permissive,
    Handshake,
    OneShot,
    Comparison,
    Calculation,
    DataMove,
    ConditionalOutput,
    UnconditionalOutput,
    InputOnly,
    Empty,
}

/// What an output name says about the state it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputIntent {
    Stopped,
    Running,
    Ready,
    Fault,
    Ok,
    Enable,
    Complete,
    Active,
}

/// Suffix table; longer and more specific suffixes first.
const INTENT_SUFFIXES: &[(&str, OutputIntent)] = &[
    ("STOPPED", OutputIntent::Stopped),
    ("RUNNING", OutputIntent::Running),
    ("READY", OutputIntent::Ready),
    ("FAULT", OutputIntent::Fault),
    ("FLT", OutputIntent::Fault),
    ("ENABLED", OutputIntent::Enable),
    ("ENABLE", OutputIntent::Enable),
    ("COMPLETED", OutputIntent::Complete),
    ("COMPLETE", OutputIntent::Complete),
    ("ACTIVE", OutputIntent::Active),
    ("OK", OutputIntent::Ok),
];

impl OutputIntent {
    pub fn from_tag(name: &str) -> Option<OutputIntent> {
        let up = name.trim().to_ascii_uppercase();
        INTENT_SUFFIXES
            .iter()
            .find(|(suffix, _)| up.ends_with(suffix))
            .map(|(_, intent)| *intent)
    }
}

impl fmt::Display for OutputIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputIntent::Stopped => "stopped indication",
            OutputIntent::Running => "running indication",
            OutputIntent::Ready => "ready indication",
            OutputIntent::Fault => "fault indication",
            OutputIntent::Ok => "OK status",
            OutputIntent::Enable => "enable signal",
            OutputIntent::Complete => "completion flag",
            OutputIntent::Active => "active indication",
        };
        f.write_str(s)
    }
}

/// Structured purpose: a template id and its interpolation arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purpose {
    pub template: PurposeTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<OutputIntent>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub extra_outputs: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsystems: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_inputs: Vec<String>,
}

/// Template for the winning pattern, in precedence order. `code_concern`
/// never selects a template.
const PATTERN_TEMPLATES: &[(PatternType, PurposeTemplate)] = &[
    (PatternType::SafetyInterlock, PurposeTemplate::SafetyInterlock),
    (PatternType::Sequencer, PurposeTemplate::Sequence),
    (PatternType::StartStopCircuit, PurposeTemplate::MotorControl),
    (PatternType::StatusMonitoring, PurposeTemplate::StatusReport),
    (PatternType::ZoneControl, PurposeTemplate::ZoneControl),
    (PatternType::TimerDelay, PurposeTemplate::TimerDelay),
    (PatternType::CounterAccumulator, PurposeTemplate::Counter),
    (PatternType::AlarmAnnunciation, PurposeTemplate::Alarm),
    (PatternType::LatchUnlatch, PurposeTemplate::Latch),
    (PatternType::ModeSelection, PurposeTemplate::ModeSelection),
    (PatternType::JogControl, PurposeTemplate::Jog),
    (PatternType::HmiWrite, PurposeTemplate::HmiUpdate),
    (PatternType::DataScaling, PurposeTemplate::Scaling),
    (PatternType::FaultDetection, PurposeTemplate::FaultResponse),
    (PatternType::PermissiveChain, PurposeTemplate::Permissive),
    (PatternType::Handshake, PurposeTemplate::Handshake),
    (PatternType::OneShot, PurposeTemplate::OneShot),
    (PatternType::ComparisonBranch, PurposeTemplate::Comparison),
];

pub fn build_purpose(
    view: &RungView<'_>,
    patterns: &[DetectedPattern],
    category: RungCategory,
    subsystems: &[String],
) -> Purpose {
    let template = select_template(view, patterns, category);

    // Prefer an output whose name states its intent.
    let primary_output = view
        .output_tags
        .iter()
        .find(|t| OutputIntent::from_tag(t).is_some())
        .or_else(|| view.output_tags.first())
        .cloned();
    let intent = primary_output.as_deref().and_then(OutputIntent::from_tag);

    let conditions: Vec<String> = view
        .read_by(CONDITION_OPCODES)
        .into_iter()
        .chain(view.read_by(COMPARISON_OPCODES))
        .fold(Vec::new(), |mut acc: Vec<String>, t| {
            if !acc.iter().any(|a| a == t) {
                acc.push(t.to_string());
            }
            acc
        });

    let safety_inputs = view
        .input_tags
        .iter()
        .filter(|t| ESTOP.is_match(t) || GUARD.is_match(t) || GATE.is_match(t))
        .cloned()
        .collect();

    Purpose {
        template,
        primary_output,
        intent,
        conditions,
        extra_outputs: view.output_tags.len().saturating_sub(1),
        subsystems: subsystems.to_vec(),
        safety_inputs,
    }
}

fn select_template(view: &RungView<'_>, patterns: &[DetectedPattern], category: RungCategory) -> PurposeTemplate {
    if category == RungCategory::StatusMonitoring {
        return PurposeTemplate::StatusReport;
    }
    let fired = |kind: PatternType| patterns.iter().any(|p| p.pattern_type == kind);
    if let Some((_, template)) = PATTERN_TEMPLATES.iter().find(|(kind, _)| fired(*kind)) {
        return *template;
    }
    match category {
        RungCategory::Calculation => return PurposeTemplate::Calculation,
        RungCategory::DataMove => return PurposeTemplate::DataMove,
        RungCategory::FaultHandling => return PurposeTemplate::FaultResponse,
        _ => {}
    }
    match (view.input_tags.is_empty(), view.output_tags.is_empty()) {
        (false, false) => PurposeTemplate::ConditionalOutput,
        (true, false) => PurposeTemplate::UnconditionalOutput,
        (false, true) => PurposeTemplate::InputOnly,
        (true, true) => PurposeTemplate::Empty,
    }
}

pub fn render_purpose(purpose: &Purpose) -> String {
    let target = match (&purpose.primary_output, purpose.intent) {
        (Some(tag), Some(intent)) => format!("{tag} ({intent})"),
        (Some(tag), None) => tag.clone(),
        (None, _) => "its outputs".to_string(),
    };
    let target = if purpose.extra_outputs > 0 {
        format!("{target} and {} other output(s)", purpose.extra_outputs)
    } else {
        target
    };
    let names: Vec<&str> = purpose.conditions.iter().map(String::as_str).collect();
    let when = if names.is_empty() {
        String::new()
    } else {
        format!(" when {} {}", list(&names, 4), if names.len() == 1 { "is true" } else { "are true" })
    };

    let mut text = match purpose.template {
        PurposeTemplate::SafetyInterlock => format!("Safety interlock that drives {target} only{when}"),
        PurposeTemplate::MotorControl => format!("Starts and stops {target}{when}"),
        PurposeTemplate::Sequence => format!("Sequence step logic driving {target}"),
        PurposeTemplate::StatusReport => format!("Reports status through {target}"),
        PurposeTemplate::ZoneControl => format!("Coordinates zone control for {target}{when}"),
        PurposeTemplate::TimerDelay => format!("Times a delay for {target}{when}"),
        PurposeTemplate::Counter => format!("Counts events into {target}{when}"),
        PurposeTemplate::Latch => format!("Latches {target}{when}; it holds until unlatched"),
        PurposeTemplate::Alarm => format!("Annunciates alarm {target}{when}"),
        PurposeTemplate::ModeSelection => format!("Selects operating mode {target}{when}"),
        PurposeTemplate::Jog => format!("Jogs {target} while the jog input is held"),
        PurposeTemplate::HmiUpdate => format!("Updates HMI tag {target}"),
        PurposeTemplate::Scaling => format!("Scales analog data into {target}"),
        PurposeTemplate::FaultResponse => format!("Handles faults by driving {target}{when}"),
        PurposeTemplate::Permissive => {
            format!("Energizes {target} only when all {} permissives are true", purpose.conditions.len())
        }
        PurposeTemplate::Handshake => format!("Request/acknowledge handshake driving {target}"),
        PurposeTemplate::OneShot => format!("Pulses {target} for one scan{when}"),
        PurposeTemplate::Comparison => format!("Compares values to set {target}"),
        PurposeTemplate::Calculation => format!("Calculates {target}"),
        PurposeTemplate::DataMove => format!("Moves data into {target}"),
        PurposeTemplate::ConditionalOutput => format!("Sets {target}{when}"),
        PurposeTemplate::UnconditionalOutput => format!("Drives {target} unconditionally"),
        PurposeTemplate::InputOnly => {
            format!("Evaluates {} without driving an output", if names.is_empty() { "inputs".to_string() } else { list(&names, 4) })
        }
        PurposeTemplate::Empty => "No analyzable logic".to_string(),
    };

    if !purpose.subsystems.is_empty() {
        let subsystems: Vec<&str> = purpose.subsystems.iter().map(String::as_str).collect();
        text.push_str(&format!(" [{} subsystem]", list(&subsystems, 3)));
    }
    if !purpose.safety_inputs.is_empty() {
        let inputs: Vec<&str> = purpose.safety_inputs.iter().map(String::as_str).collect();
        text.push_str(&format!(". Safety inputs: {}", list(&inputs, 4)));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Rung;
    use crate::context::categorize::categorize;
    use crate::context::subsystems::detect_subsystems;
    use crate::graph::TagGraph;
    use crate::rules::detect_patterns;

    fn purpose(text: &str) -> Purpose {
        let rung = Rung::new(1, text);
        let view = RungView::new("Main", "R1", &rung);
        let patterns = detect_patterns(&view);
        let category = categorize(&view, &patterns, &TagGraph::default(), 5);
        let subsystems = detect_subsystems(&view.tags());
        build_purpose(&view, &patterns, category, &subsystems)
    }

    #[test]
    fn intent_from_suffix() {
        assert_eq!(OutputIntent::from_tag("Pump_Running"), Some(OutputIntent::Running));
        assert_eq!(OutputIntent::from_tag("GATESOK"), Some(OutputIntent::Ok));
        assert_eq!(OutputIntent::from_tag("Drive_Enabled"), Some(OutputIntent::Enable));
        assert_eq!(OutputIntent::from_tag("Conv_Stopped"), Some(OutputIntent::Stopped));
        assert_eq!(OutputIntent::from_tag("Valve_Open"), None);
    }

    #[test]
    fn safety_purpose_surfaces_intent_subsystem_and_inputs() {
        let p = purpose("XIC(GATE1OPEN) XIC(GATE2OPEN) OTE(GATESOK)");
        assert_eq!(p.template, PurposeTemplate::SafetyInterlock);
        assert_eq!(p.primary_output.as_deref(), Some("GATESOK"));
        assert_eq!(p.intent, Some(OutputIntent::Ok));
        assert_eq!(p.subsystems, vec!["Gate"]);
        assert_eq!(p.safety_inputs, vec!["GATE1OPEN", "GATE2OPEN"]);

        let text = render_purpose(&p);
        assert!(text.contains("GATESOK (OK status)"));
        assert!(text.contains("Gate subsystem"));
        assert!(text.contains("Safety inputs: GATE1OPEN, GATE2OPEN"));
    }

    #[test]
    fn prefers_output_with_intent() {
        let p = purpose("XIC(Start) OTE(Seal_Bit) OTE(Line_Ready)");
        assert_eq!(p.primary_output.as_deref(), Some("Line_Ready"));
        assert_eq!(p.extra_outputs, 1);
    }

    #[test]
    fn generic_fallbacks() {
        assert_eq!(purpose("XIC(A) XIO(B) OTE(C)").template, PurposeTemplate::ConditionalOutput);
        assert_eq!(render_purpose(&purpose("XIC(A) XIO(B) OTE(C)")), "Sets C when A, B are true");
        assert_eq!(purpose("OTE(C)").template, PurposeTemplate::UnconditionalOutput);
        assert_eq!(purpose("XIC(A)").template, PurposeTemplate::InputOnly);
        assert_eq!(purpose("").template, PurposeTemplate::Empty);
        assert_eq!(render_purpose(&purpose("")), "No analyzable logic");
        assert_eq!(purpose("MOV(N7:0,N7:5)").template, PurposeTemplate::DataMove);
    }

    #[test]
    fn status_category_forces_status_template() {
        let p = purpose(
            "XIC(Guard_Closed) OTE(M1_Running) OTE(M2_Running) OTE(Line_Ready) OTE(Filler_Ok) OTE(Cycle_Done)",
        );
        assert_eq!(p.template, PurposeTemplate::StatusReport);
    }
}
