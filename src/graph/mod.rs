//! Tag-usage graph: which rungs read and write each tag.
//!
//! Built in one pass over the whole project before any rung is analysed;
//! the rung pass only reads it.

pub mod opcodes;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::{Project, Tag};
use crate::parser::{is_tag_operand, rung_instructions};
use crate::semantic::{classify_tag, classify_with_description, SemanticType};

pub use opcodes::{access_for, classified_operands, OperandAccess, Usage};

/// One place a tag is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RungReference {
    pub program: String,
    pub routine: String,
    pub rung_number: u32,
    pub instruction_kind: String,
    pub usage: Usage,
}

/// Readers and writers of one tag. At most one reference per
/// `(program, routine, rung)` in each list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUsageInfo {
    pub name: String,
    pub readers: Vec<RungReference>,
    pub writers: Vec<RungReference>,
    pub semantic_type: SemanticType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TagUsageInfo {
    fn new(name: &str) -> Self {
        TagUsageInfo {
            name: name.to_string(),
            readers: Vec::new(),
            writers: Vec::new(),
            semantic_type: SemanticType::Unknown,
            data_type: None,
            description: None,
        }
    }

    pub fn reference_count(&self) -> usize {
        self.readers.len() + self.writers.len()
    }

    pub fn references(&self) -> impl Iterator<Item = &RungReference> {
        self.readers.iter().chain(self.writers.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagGraph {
    tags: BTreeMap<String, TagUsageInfo>,
    declared: BTreeMap<String, Tag>,
}

impl TagGraph {
    pub fn get(&self, name: &str) -> Option<&TagUsageInfo> {
        self.tags.get(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagUsageInfo> {
        self.tags.values()
    }

    pub fn tags(&self) -> &BTreeMap<String, TagUsageInfo> {
        &self.tags
    }

    pub fn semantic_type(&self, name: &str) -> Option<SemanticType> {
        self.tags.get(name).map(|t| t.semantic_type)
    }

    /// Semantic type from the graph, or classified on the spot for names the
    /// graph never saw.
    pub fn semantic_of(&self, name: &str) -> SemanticType {
        self.semantic_type(name).unwrap_or_else(|| classify_tag(name))
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    /// Declared tags that no instruction references.
    pub fn unreferenced_tags(&self) -> Vec<&str> {
        self.declared
            .keys()
            .filter(|name| !self.tags.contains_key(*name))
            .map(String::as_str)
            .collect()
    }

    /// Rung numbers in `program/routine` that reference `name` with `usage`.
    pub fn rungs_with(&self, name: &str, program: &str, routine: &str, usage: Usage) -> BTreeSet<u32> {
        let Some(info) = self.tags.get(name) else {
            return BTreeSet::new();
        };
        let refs = match usage {
            Usage::Read => &info.readers,
            Usage::Write => &info.writers,
        };
        refs.iter()
            .filter(|r| r.program == program && r.routine == routine)
            .map(|r| r.rung_number)
            .collect()
    }
}

struct GraphBuilder {
    tags: BTreeMap<String, TagUsageInfo>,
    seen: HashSet<(Usage, String, String, String, u32)>,
    references: usize,
}

impl GraphBuilder {
    fn record(&mut self, tag: &str, reference: RungReference) {
        let key = (
            reference.usage,
            tag.to_string(),
            reference.program.clone(),
            reference.routine.clone(),
            reference.rung_number,
        );
        if !self.seen.insert(key) {
            return;
        }
        let info = self.tags.entry(tag.to_string()).or_insert_with(|| TagUsageInfo::new(tag));
        match reference.usage {
            Usage::Read => info.readers.push(reference),
            Usage::Write => info.writers.push(reference),
        }
        self.references += 1;
    }
}

/// First pass: walks every instruction of every rung once.
pub fn build_tag_graph(project: &Project) -> TagGraph {
    let mut builder = GraphBuilder {
        tags: BTreeMap::new(),
        seen: HashSet::new(),
        references: 0,
    };

    for program in &project.programs {
        for routine in &program.routines {
            for rung in &routine.rungs {
                for ins in rung_instructions(rung).iter() {
                    if access_for(&ins.kind) == OperandAccess::Unknown {
                        trace!(opcode = %ins.kind, rung = rung.number, "opcode not tracked in tag graph");
                        continue;
                    }
                    for (operand, usage) in classified_operands(ins) {
                        if !is_tag_operand(operand) {
                            continue;
                        }
                        builder.record(
                            operand.trim(),
                            RungReference {
                                program: program.name.clone(),
                                routine: routine.name.clone(),
                                rung_number: rung.number,
                                instruction_kind: ins.opcode(),
                                usage,
                            },
                        );
                    }
                }
            }
        }
    }

    let declared = declared_tags(project);
    let mut tags = builder.tags;
    for info in tags.values_mut() {
        if let Some(tag) = declared.get(&info.name) {
            if !tag.data_type.is_empty() {
                info.data_type = Some(tag.data_type.clone());
            }
            info.description = tag.description.clone();
        }
        info.semantic_type = classify_with_description(&info.name, info.description.as_deref());
    }

    debug!(tags = tags.len(), references = builder.references, declared = declared.len(), "tag graph built");
    TagGraph { tags, declared }
}

/// Controller tags, then program tags; a program tag shadows a controller
/// tag of the same name.
fn declared_tags(project: &Project) -> BTreeMap<String, Tag> {
    let mut declared = BTreeMap::new();
    for tag in &project.tags {
        declared.insert(tag.name.clone(), tag.clone());
    }
    for program in &project.programs {
        for tag in &program.tags {
            declared.insert(tag.name.clone(), tag.clone());
        }
    }
    declared
}
