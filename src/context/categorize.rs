//! Rung categorization: a first-match decision cascade over detected
//! patterns, tag semantics and the instruction mix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::opcodes::{ARITHMETIC_OPCODES, COPY_OPCODES};
use crate::graph::TagGraph;
use crate::rules::{DetectedPattern, PatternType, RungView};
use crate::semantic::SemanticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RungCategory {
    Safety,
    SequenceControl,
    MotorControl,
    ValveControl,
    HmiInterface,
    StatusMonitoring,
    ZoneControl,
    TimerLogic,
    CounterLogic,
    Calculation,
    DataMove,
    FaultHandling,
    GeneralLogic,
}

impl RungCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RungCategory::Safety => "safety",
            RungCategory::SequenceControl => "sequence_control",
            RungCategory::MotorControl => "motor_control",
            RungCategory::ValveControl => "valve_control",
            RungCategory::HmiInterface => "hmi_interface",
            RungCategory::StatusMonitoring => "status_monitoring",
            RungCategory::ZoneControl => "zone_control",
            RungCategory::TimerLogic => "timer_logic",
            RungCategory::CounterLogic => "counter_logic",
            RungCategory::Calculation => "calculation",
            RungCategory::DataMove => "data_move",
            RungCategory::FaultHandling => "fault_handling",
            RungCategory::GeneralLogic => "general_logic",
        }
    }
}

impl fmt::Display for RungCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern precedence for step 2 of the cascade.
const PATTERN_CATEGORIES: &[(PatternType, RungCategory)] = &[
    (PatternType::SafetyInterlock, RungCategory::Safety),
    (PatternType::Sequencer, RungCategory::SequenceControl),
    (PatternType::StartStopCircuit, RungCategory::MotorControl),
    (PatternType::StatusMonitoring, RungCategory::StatusMonitoring),
    (PatternType::ZoneControl, RungCategory::ZoneControl),
    (PatternType::TimerDelay, RungCategory::TimerLogic),
    (PatternType::CounterAccumulator, RungCategory::CounterLogic),
];

/// Calculation opcodes beyond the graph's arithmetic family.
const CALCULATION_OPCODES: &[&str] = &["CPT", "SQR", "NEG", "ABS", "MOD", "SCP", "SCL"];

/// Runs the cascade; the first step that decides wins.
///
/// The status override in step 1 outranks `safety_interlock` on wide
/// status rungs. That precedence is kept as-is.
pub fn categorize(
    view: &RungView<'_>,
    patterns: &[DetectedPattern],
    graph: &TagGraph,
    status_override_min_outputs: usize,
) -> RungCategory {
    let fired = |kind: PatternType| patterns.iter().any(|p| p.pattern_type == kind);

    // 1. Wide status rungs.
    if fired(PatternType::StatusMonitoring) && view.output_tags.len() >= status_override_min_outputs {
        return RungCategory::StatusMonitoring;
    }

    // 2. Pattern precedence.
    if let Some((_, category)) = PATTERN_CATEGORIES.iter().find(|(kind, _)| fired(*kind)) {
        return *category;
    }

    // 3. Tag semantics, two passes.
    let semantics: Vec<SemanticType> = view.tags().iter().map(|t| graph.semantic_of(t)).collect();
    let first_pass = semantics.iter().find_map(|s| match s {
        SemanticType::Safety => Some(RungCategory::Safety),
        SemanticType::Sequence => Some(RungCategory::SequenceControl),
        _ => None,
    });
    if let Some(category) = first_pass {
        return category;
    }
    let second_pass = semantics.iter().find_map(|s| match s {
        SemanticType::Motor => Some(RungCategory::MotorControl),
        SemanticType::Valve => Some(RungCategory::ValveControl),
        SemanticType::Hmi => Some(RungCategory::HmiInterface),
        _ => None,
    });
    if let Some(category) = second_pass {
        return category;
    }

    // 4. Instruction mix.
    if view.has_opcode(ARITHMETIC_OPCODES) || view.has_opcode(CALCULATION_OPCODES) {
        return RungCategory::Calculation;
    }
    if view.has_opcode(COPY_OPCODES) {
        return RungCategory::DataMove;
    }

    // 5. Faults.
    if fired(PatternType::FaultDetection) || semantics.contains(&SemanticType::Fault) {
        return RungCategory::FaultHandling;
    }

    RungCategory::GeneralLogic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Rung;
    use crate::rules::detect_patterns;

    fn category(text: &str) -> RungCategory {
        let rung = Rung::new(1, text);
        let view = RungView::new("Main", "R1", &rung);
        let patterns = detect_patterns(&view);
        categorize(&view, &patterns, &TagGraph::default(), 5)
    }

    #[test]
    fn pattern_precedence() {
        assert_eq!(category("XIC(ESTOP_OK) XIC(Start) OTE(Motor_Run)"), RungCategory::Safety);
        assert_eq!(category("EQU(Step,2) TON(T4:0,10,0)"), RungCategory::SequenceControl);
        assert_eq!(category("XIC(Start) XIO(Stop) OTE(Pump_Run)"), RungCategory::MotorControl);
        assert_eq!(category("XIC(Zone1_Clear) OTE(Zone2_Release)"), RungCategory::ZoneControl);
        assert_eq!(category("XIC(A) TON(T4:0,10,0)"), RungCategory::TimerLogic);
        assert_eq!(category("XIC(A) CTU(C5:0,10,0)"), RungCategory::CounterLogic);
    }

    #[test]
    fn status_override_beats_everything() {
        let text = "XIC(Pump_Fault) OTE(M1_Running) OTE(M2_Running) OTE(Line_Ready) \
                    OTE(Filler_Ok) OTE(Cycle_Done) OTE(Capper_Active)";
        assert_eq!(category(text), RungCategory::StatusMonitoring);
    }

    #[test]
    fn narrow_status_rung_does_not_override_safety() {
        let text = "XIC(Guard_Closed) OTE(A_Ready) OTE(B_Ready) OTE(C_Ready)";
        assert_eq!(category(text), RungCategory::Safety);
    }

    #[test]
    fn semantics_then_instruction_mix() {
        assert_eq!(category("XIC(Seq_Phase_Bit) OTE(Out)"), RungCategory::SequenceControl);
        assert_eq!(category("XIC(Permit) OTE(Valve_Open)"), RungCategory::ValveControl);
        assert_eq!(category("XIC(Permit) OTE(HMI_Indicator)"), RungCategory::HmiInterface);
        assert_eq!(category("ADD(N7:0,N7:1,N7:2)"), RungCategory::Calculation);
        assert_eq!(category("MOV(N7:0,N7:5)"), RungCategory::DataMove);
        assert_eq!(category("XIO(Drive_Fault) OTE(Ready_Light)"), RungCategory::FaultHandling);
        assert_eq!(category("XIC(A) OTE(B)"), RungCategory::GeneralLogic);
    }
}
