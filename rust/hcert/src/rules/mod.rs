// Licensed under the MIT License.

mod interval;
mod policy;
mod rule_set;

pub use interval::ValidityInterval;
pub use policy::{PolicyPredicate, RulePolicy};
pub use rule_set::{RuleSet, ValidityWindow};
