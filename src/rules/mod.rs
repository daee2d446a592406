//! Pattern-detection rule engine.
//!
//! Each rule lives in its own module and exposes a pure
//! `check(&RungView) -> Option<DetectedPattern>`. [`RULES`] lists them in a
//! fixed order and [`detect_patterns`] runs every rule against one rung; any
//! number of rules may fire on the same rung.

pub mod alarm;
pub mod code_concern;
pub mod comparison;
pub mod fault;
pub mod handshake;
pub mod hmi_write;
pub mod jog;
pub mod latch;
pub mod mode;
pub mod one_shot;
pub mod permissive;
pub mod safety_interlock;
pub mod scaling;
pub mod sequencer;
pub mod start_stop;
pub mod status;
pub mod timer;
pub mod utils;
pub mod zone;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ast::{Instruction, Rung};
use crate::graph::{classified_operands, Usage};
use crate::parser::{is_tag_operand, parse_rung, rung_instructions, ParsedRung};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    SafetyInterlock,
    StartStopCircuit,
    LatchUnlatch,
    TimerDelay,
    CounterAccumulator,
    OneShot,
    FaultDetection,
    Handshake,
    Sequencer,
    ComparisonBranch,
    StatusMonitoring,
    ZoneControl,
    CodeConcern,
    DataScaling,
    PermissiveChain,
    AlarmAnnunciation,
    ModeSelection,
    JogControl,
    HmiWrite,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::SafetyInterlock => "safety_interlock",
            PatternType::StartStopCircuit => "start_stop_circuit",
            PatternType::LatchUnlatch => "latch_unlatch",
            PatternType::TimerDelay => "timer_delay",
            PatternType::CounterAccumulator => "counter_accumulator",
            PatternType::OneShot => "one_shot",
            PatternType::FaultDetection => "fault_detection",
            PatternType::Handshake => "handshake",
            PatternType::Sequencer => "sequencer",
            PatternType::ComparisonBranch => "comparison_branch",
            PatternType::StatusMonitoring => "status_monitoring",
            PatternType::ZoneControl => "zone_control",
            PatternType::CodeConcern => "code_concern",
            PatternType::DataScaling => "data_scaling",
            PatternType::PermissiveChain => "permissive_chain",
            PatternType::AlarmAnnunciation => "alarm_annunciation",
            PatternType::ModeSelection => "mode_selection",
            PatternType::JogControl => "jog_control",
            PatternType::HmiWrite => "hmi_write",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one rung in the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RungLocation {
    pub program: String,
    pub routine: String,
    pub rung_number: u32,
}

impl RungLocation {
    /// `"<program>/<routine>:<rung>"`, the key downstream consumers index by.
    pub fn key(&self) -> String {
        format!("{}/{}:{}", self.program, self.routine, self.rung_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// 0.0 to 1.0.
    pub confidence: f64,
    pub rung_refs: Vec<RungLocation>,
    pub tags: Vec<String>,
    pub description: String,
}

/// Everything a rule may look at for one rung. Built once per rung; rules
/// never see other rungs or the tag graph.
#[derive(Debug, Clone)]
pub struct RungView<'a> {
    pub location: RungLocation,
    pub rung: &'a Rung,
    pub instructions: Vec<Instruction>,
    pub parsed: ParsedRung,
    /// Raw text, or the instructions rendered back to text when upstream
    /// supplied no raw text.
    pub text: String,
    pub input_tags: Vec<String>,
    pub output_tags: Vec<String>,
}

impl<'a> RungView<'a> {
    pub fn new(program: &str, routine: &str, rung: &'a Rung) -> Self {
        let instructions = rung_instructions(rung).into_owned();
        let text = if rung.raw_text.trim().is_empty() {
            instructions.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
        } else {
            rung.raw_text.clone()
        };

        let mut input_tags: Vec<String> = Vec::new();
        let mut output_tags: Vec<String> = Vec::new();
        for ins in &instructions {
            for (operand, usage) in classified_operands(ins) {
                let operand = operand.trim();
                if !is_tag_operand(operand) {
                    continue;
                }
                let list = match usage {
                    Usage::Read => &mut input_tags,
                    Usage::Write => &mut output_tags,
                };
                if !list.iter().any(|t| t == operand) {
                    list.push(operand.to_string());
                }
            }
        }

        RungView {
            location: RungLocation {
                program: program.to_string(),
                routine: routine.to_string(),
                rung_number: rung.number,
            },
            rung,
            parsed: parse_rung(&text),
            instructions,
            text,
            input_tags,
            output_tags,
        }
    }

    /// Inputs then outputs, each tag once.
    pub fn tags(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in self.input_tags.iter().chain(self.output_tags.iter()) {
            if !out.contains(&t.as_str()) {
                out.push(t);
            }
        }
        out
    }

    pub fn has_opcode(&self, opcodes: &[&str]) -> bool {
        self.instructions.iter().any(|i| i.is_any(opcodes))
    }

    pub fn count_opcode(&self, opcodes: &[&str]) -> usize {
        self.instructions.iter().filter(|i| i.is_any(opcodes)).count()
    }

    pub fn instructions_of<'s>(&'s self, opcodes: &'s [&'s str]) -> impl Iterator<Item = &'s Instruction> + 's {
        self.instructions.iter().filter(move |i| i.is_any(opcodes))
    }

    /// Tag operands of the given opcodes, each once, in order.
    pub fn operands_of(&self, opcodes: &[&str]) -> Vec<&str> {
        self.used_by(opcodes, None)
    }

    /// Tag operands the given opcodes write.
    pub fn written_by(&self, opcodes: &[&str]) -> Vec<&str> {
        self.used_by(opcodes, Some(Usage::Write))
    }

    /// Tag operands the given opcodes read.
    pub fn read_by(&self, opcodes: &[&str]) -> Vec<&str> {
        self.used_by(opcodes, Some(Usage::Read))
    }

    fn used_by(&self, opcodes: &[&str], usage: Option<Usage>) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for ins in self.instructions.iter().filter(|i| i.is_any(opcodes)) {
            for (operand, u) in classified_operands(ins) {
                let operand = operand.trim();
                if is_tag_operand(operand) && usage.map_or(true, |want| want == u) && !out.contains(&operand) {
                    out.push(operand);
                }
            }
        }
        out
    }

    /// Series paths through the rung. Falls back to the flat instruction
    /// list when the text yielded nothing.
    pub fn legs(&self) -> Vec<Vec<&Instruction>> {
        if self.parsed.all_instructions().is_empty() {
            return vec![self.instructions.iter().collect()];
        }
        self.parsed.legs()
    }

    pub fn pattern(
        &self,
        pattern_type: PatternType,
        confidence: f64,
        tags: Vec<String>,
        description: String,
    ) -> DetectedPattern {
        DetectedPattern {
            pattern_type,
            confidence,
            rung_refs: vec![self.location.clone()],
            tags,
            description,
        }
    }
}

pub type Rule = fn(&RungView<'_>) -> Option<DetectedPattern>;

/// Every rule, in reporting order.
pub const RULES: &[(PatternType, Rule)] = &[
    (PatternType::SafetyInterlock, safety_interlock::check),
    (PatternType::StartStopCircuit, start_stop::check),
    (PatternType::LatchUnlatch, latch::check),
    (PatternType::TimerDelay, timer::check_timer),
    (PatternType::CounterAccumulator, timer::check_counter),
    (PatternType::OneShot, one_shot::check),
    (PatternType::FaultDetection, fault::check),
    (PatternType::Handshake, handshake::check),
    (PatternType::Sequencer, sequencer::check),
    (PatternType::ComparisonBranch, comparison::check),
    (PatternType::StatusMonitoring, status::check),
    (PatternType::ZoneControl, zone::check),
    (PatternType::CodeConcern, code_concern::check),
    (PatternType::DataScaling, scaling::check),
    (PatternType::PermissiveChain, permissive::check),
    (PatternType::AlarmAnnunciation, alarm::check),
    (PatternType::ModeSelection, mode::check),
    (PatternType::JogControl, jog::check),
    (PatternType::HmiWrite, hmi_write::check),
];

pub fn detect_patterns(view: &RungView<'_>) -> Vec<DetectedPattern> {
    let found: Vec<DetectedPattern> = RULES.iter().filter_map(|(_, rule)| rule(view)).collect();
    if !found.is_empty() {
        trace!(
            rung = %view.location.key(),
            patterns = ?found.iter().map(|p| p.pattern_type.as_str()).collect::<Vec<_>>(),
            "patterns detected"
        );
    }
    found
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn rung(text: &str) -> Rung {
        Rung::new(1, text)
    }

    pub fn fired(text: &str) -> Vec<PatternType> {
        let rung = rung(text);
        let view = RungView::new("Main", "R1", &rung);
        detect_patterns(&view).into_iter().map(|p| p.pattern_type).collect()
    }

    pub fn run(rule: Rule, text: &str) -> Option<DetectedPattern> {
        let rung = rung(text);
        let view = RungView::new("Main", "R1", &rung);
        rule(&view)
    }
}
