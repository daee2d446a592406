//! Recursive scanner for rung text.
//! Splits a rung into a shared prefix, the legs of its first top-level
//! branch group and a shared suffix, and extracts instruction calls.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::ast::Instruction;

/// `NAME(`: the start of an instruction call.
static CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*\(").expect("valid call regex"));

/// One leg of a parallel branch group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub index: usize,
    pub text: String,
    pub instructions: Vec<Instruction>,
}

/// Structured form of a rung. A rung without a qualifying branch group is
/// linear: everything lands in `shared_prefix`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRung {
    pub shared_prefix: Vec<Instruction>,
    pub branches: Vec<Branch>,
    pub shared_suffix: Vec<Instruction>,
}

impl ParsedRung {
    pub fn is_linear(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Every instruction in text order.
    pub fn all_instructions(&self) -> Vec<Instruction> {
        self.shared_prefix
            .iter()
            .chain(self.branches.iter().flat_map(|b| b.instructions.iter()))
            .chain(self.shared_suffix.iter())
            .cloned()
            .collect()
    }

    /// Series paths through the rung: prefix + leg + suffix for each branch,
    /// or the single main line of a linear rung.
    pub fn legs(&self) -> Vec<Vec<&Instruction>> {
        if self.branches.is_empty() {
            return vec![self.shared_prefix.iter().chain(self.shared_suffix.iter()).collect()];
        }
        self.branches
            .iter()
            .map(|b| {
                self.shared_prefix
                    .iter()
                    .chain(b.instructions.iter())
                    .chain(self.shared_suffix.iter())
                    .collect()
            })
            .collect()
    }
}

pub fn parse_rung(text: &str) -> ParsedRung {
    let Some((open, close)) = find_branch_group(text) else {
        return ParsedRung {
            shared_prefix: extract_instructions(text),
            ..Default::default()
        };
    };

    let inner = &text[open + 1..close.unwrap_or(text.len())];
    let suffix = close.map(|c| &text[c + 1..]).unwrap_or("");
    let branches = split_top_level(inner)
        .into_iter()
        .enumerate()
        .map(|(index, leg)| Branch {
            index,
            text: leg.trim().to_string(),
            instructions: extract_instructions(leg),
        })
        .collect();

    ParsedRung {
        shared_prefix: extract_instructions(&text[..open]),
        branches,
        shared_suffix: extract_instructions(suffix),
    }
}

/// Extracts `NAME(operands)` calls in order. Only parentheses count toward
/// nesting when looking for the closing `)`; an unterminated call takes the
/// rest of the segment as its operand list.
pub fn extract_instructions(segment: &str) -> Vec<Instruction> {
    let bytes = segment.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < segment.len() {
        let Some(m) = CALL.find_at(segment, pos) else {
            break;
        };
        let open = m.end() - 1;
        let name = &segment[m.start()..open];
        let close = matching(bytes, open, b'(', b')');
        let operands = split_operands(&segment[open + 1..close.unwrap_or(bytes.len())]);
        out.push(Instruction::new(name, operands));

        match close {
            Some(c) => pos = c + 1,
            None => break,
        }
    }
    out
}

/// Splits an operand list on top-level commas, ignoring commas nested in
/// `()` or `[]`. Segments are trimmed and empty ones dropped.
pub fn split_operands(s: &str) -> Vec<String> {
    split_top_level(s)
        .into_iter()
        .map(str::trim)
        .filter(|op| !op.is_empty())
        .map(String::from)
        .collect()
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Locates the first `[` outside any parentheses whose content is a branch
/// group rather than an array index. Returns the open index and, when the
/// group is terminated, the matching close index.
fn find_branch_group(text: &str) -> Option<(usize, Option<usize>)> {
    let bytes = text.as_bytes();
    let mut paren = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => paren += 1,
            b')' => paren = paren.saturating_sub(1),
            b'[' if paren == 0 => {
                let close = matching(bytes, i, b'[', b']');
                let inner = &text[i + 1..close.unwrap_or(bytes.len())];
                if is_branch_content(inner) {
                    return Some((i, close));
                }
                // Array index: skip past it.
                i = close?;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_branch_content(inner: &str) -> bool {
    if CALL.is_match(inner) {
        return true;
    }
    let mut paren = 0usize;
    for b in inner.bytes() {
        match b {
            b'(' => paren += 1,
            b')' => paren = paren.saturating_sub(1),
            b',' if paren == 0 => return true,
            _ => {}
        }
    }
    false
}

fn matching(bytes: &[u8], open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(ins: &[Instruction]) -> Vec<&str> {
        ins.iter().map(|i| i.kind.as_str()).collect()
    }

    #[test]
    fn linear_rung() {
        let parsed = parse_rung("XIC(Start) XIO(Stop) OTE(Motor)");
        assert!(parsed.is_linear());
        assert_eq!(kinds(&parsed.shared_prefix), vec!["XIC", "XIO", "OTE"]);
        assert!(parsed.shared_suffix.is_empty());
    }

    #[test]
    fn prefix_branches_suffix() {
        let parsed = parse_rung("XIC(A)[XIC(B) OTE(C),XIC(D) OTE(E)]");
        assert_eq!(kinds(&parsed.shared_prefix), vec!["XIC"]);
        assert_eq!(parsed.shared_prefix[0].operands, vec!["A".to_string()]);
        assert_eq!(parsed.branch_count(), 2);
        assert_eq!(kinds(&parsed.branches[0].instructions), vec!["XIC", "OTE"]);
        assert_eq!(parsed.branches[1].instructions[1].operands, vec!["E".to_string()]);
        assert!(parsed.shared_suffix.is_empty());
    }

    #[test]
    fn suffix_after_branch_group() {
        let parsed = parse_rung("[XIC(Start),XIC(Seal)] XIO(Stop) OTE(Run)");
        assert!(parsed.shared_prefix.is_empty());
        assert_eq!(parsed.branch_count(), 2);
        assert_eq!(kinds(&parsed.shared_suffix), vec!["XIO", "OTE"]);
        assert_eq!(parsed.legs().len(), 2);
        assert_eq!(parsed.legs()[1].len(), 3);
    }

    #[test]
    fn array_index_is_not_a_branch() {
        let parsed = parse_rung("MOV(Tag[1],Dest)");
        assert!(parsed.is_linear());
        assert_eq!(parsed.shared_prefix[0].operands, vec!["Tag[1]".to_string(), "Dest".to_string()]);

        let parsed = parse_rung("XIC(A) Data[3] OTE(B)");
        assert!(parsed.is_linear());
        assert_eq!(kinds(&parsed.shared_prefix), vec!["XIC", "OTE"]);
    }

    #[test]
    fn nested_branches_stay_inside_their_leg() {
        let parsed = parse_rung("[XIC(A) [XIC(B),XIC(C)] OTE(D),XIC(E)]");
        assert_eq!(parsed.branch_count(), 2);
        assert_eq!(kinds(&parsed.branches[0].instructions), vec!["XIC", "XIC", "XIC", "OTE"]);
    }

    #[test]
    fn operands_keep_nested_text() {
        let ops = split_operands(" Arr[i,j] , Fn(a,b), ,Last ");
        assert_eq!(ops, vec!["Arr[i,j]", "Fn(a,b)", "Last"]);

        let ins = extract_instructions("CPT(Dest,ABS(A-B)) OTE(X)");
        assert_eq!(kinds(&ins), vec!["CPT", "OTE"]);
        assert_eq!(ins[0].operands[1], "ABS(A-B)");
    }

    #[test]
    fn unterminated_input_returns_partial_results() {
        let ins = extract_instructions("XIC(A");
        assert_eq!(ins.len(), 1);
        assert_eq!(ins[0].operands, vec!["A".to_string()]);

        let parsed = parse_rung("XIC(A)[XIC(B),OTE(C");
        assert_eq!(parsed.branch_count(), 2);
        assert_eq!(parsed.branches[1].instructions[0].operands, vec!["C".to_string()]);

        let parsed = parse_rung(")]],[((");
        assert!(parsed.all_instructions().is_empty());
    }

    #[test]
    fn empty_text() {
        let parsed = parse_rung("");
        assert!(parsed.is_linear());
        assert!(parsed.all_instructions().is_empty());
    }
}
