//! Read/write access table for ladder opcodes.

use crate::ast::Instruction;

/// How an opcode touches its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandAccess {
    /// Coils, latches, timers and counters own every operand.
    AllWrite,
    /// Contacts, one-shots and comparisons only read.
    AllRead,
    /// Operand 0 is read, operand 1 is written.
    Copy,
    /// Operands 0 and 1 are read, operand 2 is written.
    Arithmetic,
    /// Operands 0 and 1 (routine, parameter count) are skipped; the rest are read.
    SubroutineCall,
    /// Not in the table; contributes nothing to the graph.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Read,
    Write,
}

pub const WRITE_OPCODES: &[&str] = &["OTE", "OTL", "OTU", "RES", "TON", "TOF", "RTO", "CTU", "CTD"];
pub const COMPARISON_OPCODES: &[&str] = &["EQU", "NEQ", "LES", "LEQ", "GRT", "GEQ", "LIM", "MEQ", "CMP"];
pub const READ_OPCODES: &[&str] = &["XIC", "XIO", "ONS", "OSR", "OSF"];
pub const COPY_OPCODES: &[&str] = &["MOV", "COP", "FLL"];
pub const ARITHMETIC_OPCODES: &[&str] = &["ADD", "SUB", "MUL", "DIV", "AND", "OR", "XOR"];

pub const TIMER_OPCODES: &[&str] = &["TON", "TOF", "RTO"];
pub const COUNTER_OPCODES: &[&str] = &["CTU", "CTD"];
pub const ONE_SHOT_OPCODES: &[&str] = &["ONS", "OSR", "OSF"];
pub const COIL_OPCODES: &[&str] = &["OTE", "OTL", "OTU"];
pub const CONDITION_OPCODES: &[&str] = &["XIC", "XIO"];

pub fn access_for(opcode: &str) -> OperandAccess {
    let op = opcode.trim().to_ascii_uppercase();
    let op = op.as_str();
    if WRITE_OPCODES.contains(&op) {
        OperandAccess::AllWrite
    } else if READ_OPCODES.contains(&op) || COMPARISON_OPCODES.contains(&op) {
        OperandAccess::AllRead
    } else if COPY_OPCODES.contains(&op) {
        OperandAccess::Copy
    } else if ARITHMETIC_OPCODES.contains(&op) {
        OperandAccess::Arithmetic
    } else if op == "JSR" {
        OperandAccess::SubroutineCall
    } else {
        OperandAccess::Unknown
    }
}

/// Operand usage by position, or `None` when the operand is not tracked.
pub fn operand_usage(access: OperandAccess, index: usize) -> Option<Usage> {
    match (access, index) {
        (OperandAccess::AllWrite, _) => Some(Usage::Write),
        (OperandAccess::AllRead, _) => Some(Usage::Read),
        (OperandAccess::Copy, 0) => Some(Usage::Read),
        (OperandAccess::Copy, 1) => Some(Usage::Write),
        (OperandAccess::Arithmetic, 0 | 1) => Some(Usage::Read),
        (OperandAccess::Arithmetic, 2) => Some(Usage::Write),
        (OperandAccess::SubroutineCall, 0 | 1) => None,
        (OperandAccess::SubroutineCall, _) => Some(Usage::Read),
        _ => None,
    }
}

/// Operands of `ins` paired with their usage, skipping untracked positions.
/// Literal and placeholder operands are still included; callers filter them.
pub fn classified_operands(ins: &Instruction) -> impl Iterator<Item = (&str, Usage)> {
    let access = access_for(&ins.kind);
    ins.operands
        .iter()
        .enumerate()
        .filter_map(move |(i, op)| operand_usage(access, i).map(|u| (op.as_str(), u)))
}
