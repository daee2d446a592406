//! Input tree for ladder-logic projects.
//! Upstream project-file parsers produce this shape; the engine only reads it.
//! Field names follow the camelCase JSON those parsers emit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A whole controller project: its programs plus the controller-scoped tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub programs: Vec<Program>,
    /// Flat tag table. Program-local tags may also live on each [`Program`].
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub routines: Vec<Routine>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub name: String,
    /// Routine language, e.g. "Ladder".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub rungs: Vec<Rung>,
}

/// One row of ladder logic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rung {
    /// Unique within its routine by convention; not enforced.
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// A single instruction call such as `XIC(Start_PB)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Opcode as written; compare through [`Instruction::opcode`].
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub operands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_leg: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_start: Option<bool>,
}

/// A declared tag from the controller or a program tag table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    /// "controller" or the owning program's name.
    #[serde(default = "controller_scope")]
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn controller_scope() -> String {
    "controller".to_string()
}

impl Instruction {
    pub fn new(kind: impl Into<String>, operands: Vec<String>) -> Self {
        Instruction {
            kind: kind.into(),
            operands,
            ..Default::default()
        }
    }

    /// Upper-cased opcode; opcodes are case-insensitive.
    pub fn opcode(&self) -> String {
        self.kind.trim().to_ascii_uppercase()
    }

    pub fn is(&self, opcode: &str) -> bool {
        self.kind.trim().eq_ignore_ascii_case(opcode)
    }

    pub fn is_any(&self, opcodes: &[&str]) -> bool {
        opcodes.iter().any(|op| self.is(op))
    }
}

impl Rung {
    pub fn new(number: u32, raw_text: impl Into<String>) -> Self {
        Rung {
            number,
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.operands.join(","))
    }
}
