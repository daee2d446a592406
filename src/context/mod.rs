//! Rung categorizer and purpose generator.
//!
//! Turns the patterns a rung fired, the semantics of its tags and its
//! instruction mix into a fixed category, a purpose sentence and a handful
//! of key points.

pub mod categorize;
pub mod key_points;
pub mod purpose;
pub mod subsystems;

pub use categorize::{categorize, RungCategory};
pub use key_points::key_points;
pub use purpose::{build_purpose, render_purpose, OutputIntent, Purpose, PurposeTemplate};
pub use subsystems::{branch_groups, detect_subsystems, has_option_bits, BranchGroup, BranchGroupName};
