//! Subsystem labels, option bits and branch grouping.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::graph::classified_operands;
use crate::graph::opcodes::{COUNTER_OPCODES, TIMER_OPCODES};
use crate::graph::TagGraph;
use crate::parser::is_tag_operand;
use crate::rules::utils::OPTION_BIT;
use crate::rules::RungView;
use crate::semantic::SemanticType;

const SUBSYSTEM_PATTERNS: &[(&str, &str)] = &[
    (r"(^|[^A-Z])E[_-]?STOP|(?-i:E_?Stop)|EMERG", "Emergency Stop"),
    (r"GATE|DOOR", "Gate"),
    (r"CONVEYOR|(^|[_.])CONV([_.0-9]|$)", "Conveyor"),
    (r"HYD", "Hydraulic"),
    (r"PNEU|AIR_|_AIR", "Pneumatic"),
    (r"LUBE|LUBR|OILER", "Lubrication"),
    (r"SPINDLE", "Spindle"),
    (r"COOLANT|COOL_", "Coolant"),
    (r"ROBOT|RBT", "Robot"),
    (r"VISION|CAMERA", "Vision"),
    (r"PUMP", "Pump"),
    (r"HEAT|OVEN|FURNACE", "Heating"),
    (r"CLAMP", "Clamp"),
    (r"VACUUM|VAC_", "Vacuum"),
    (r"TANK", "Tank"),
    (r"FEEDER|INFEED", "Feeder"),
    (r"POWER|PWR", "Power"),
];

static SUBSYSTEMS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SUBSYSTEM_PATTERNS
        .iter()
        .map(|(pattern, label)| {
            (Regex::new(&format!("(?i){pattern}")).expect("valid subsystem pattern"), *label)
        })
        .collect()
});

/// Subsystem labels in order of first appearance among `tags`.
pub fn detect_subsystems(tags: &[&str]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for tag in tags {
        for (re, label) in SUBSYSTEMS.iter() {
            if re.is_match(tag) && !found.iter().any(|f| f == label) {
                found.push(label.to_string());
            }
        }
    }
    found
}

pub fn has_option_bits(tags: &[&str]) -> bool {
    tags.iter().any(|t| OPTION_BIT.is_match(t))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchGroupName {
    Safety,
    Motion,
    Fault,
    Timing,
    Status,
    Options,
    Hmi,
    General,
}

impl fmt::Display for BranchGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BranchGroupName::Safety => "safety",
            BranchGroupName::Motion => "motion",
            BranchGroupName::Fault => "fault",
            BranchGroupName::Timing => "timing",
            BranchGroupName::Status => "status",
            BranchGroupName::Options => "options",
            BranchGroupName::Hmi => "hmi",
            BranchGroupName::General => "general",
        };
        f.write_str(s)
    }
}

/// Branch indices sharing a label, with the tags those branches touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchGroup {
    pub name: BranchGroupName,
    pub branches: Vec<usize>,
    pub tags: Vec<String>,
}

/// Groups the legs of the rung's branch group by label. Rungs with fewer
/// than two branches have no groups.
pub fn branch_groups(view: &RungView<'_>, graph: &TagGraph) -> Vec<BranchGroup> {
    if view.parsed.branch_count() < 2 {
        return Vec::new();
    }

    let mut groups: Vec<BranchGroup> = Vec::new();
    for branch in &view.parsed.branches {
        let mut tags: Vec<String> = Vec::new();
        for ins in &branch.instructions {
            for (operand, _) in classified_operands(ins) {
                let operand = operand.trim();
                if is_tag_operand(operand) && !tags.iter().any(|t| t == operand) {
                    tags.push(operand.to_string());
                }
            }
        }

        let semantics: Vec<SemanticType> = tags.iter().map(|t| graph.semantic_of(t)).collect();
        let has = |ty: SemanticType| semantics.contains(&ty);
        let timing = branch
            .instructions
            .iter()
            .any(|i| i.is_any(TIMER_OPCODES) || i.is_any(COUNTER_OPCODES));
        let name = if has(SemanticType::Safety) {
            BranchGroupName::Safety
        } else if has(SemanticType::Fault) {
            BranchGroupName::Fault
        } else if has(SemanticType::Motor) || has(SemanticType::Valve) {
            BranchGroupName::Motion
        } else if timing || has(SemanticType::Timer) || has(SemanticType::Counter) {
            BranchGroupName::Timing
        } else if tags.iter().any(|t| OPTION_BIT.is_match(t)) {
            BranchGroupName::Options
        } else if has(SemanticType::Status) {
            BranchGroupName::Status
        } else if has(SemanticType::Hmi) {
            BranchGroupName::Hmi
        } else {
            BranchGroupName::General
        };

        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => {
                group.branches.push(branch.index);
                for t in tags {
                    if !group.tags.contains(&t) {
                        group.tags.push(t);
                    }
                }
            }
            None => groups.push(BranchGroup {
                name,
                branches: vec![branch.index],
                tags,
            }),
        }
    }
    groups
}
