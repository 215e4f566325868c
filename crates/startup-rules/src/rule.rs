//! Rule Model and Evaluation

use serde::{Deserialize, Serialize};

/// How the launch count must relate to a rule's threshold for the rule to
/// fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// Fire while the count is still below the threshold
    LessThan,
    /// Fire while the count is at or below the threshold
    LessOrEqual,
    /// Fire when the count is exactly the threshold
    Equal,
    /// Fire once the count has reached the threshold
    MoreOrEqual,
    /// Fire once the count has exceeded the threshold
    MoreThan,
}

/// Primitive comparison tag stored on evaluation entries.
///
/// `LessOrEqual` and `MoreOrEqual` registrations decompose into two entries
/// with primitive tags, so a single pass over the entry list covers all five
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Primitive {
    LessThan,
    Equal,
    MoreThan,
}

impl Comparison {
    /// Primitive entries this comparison decomposes into.
    pub(crate) fn primitives(self) -> &'static [Primitive] {
        match self {
            Comparison::LessThan => &[Primitive::LessThan],
            Comparison::LessOrEqual => &[Primitive::LessThan, Primitive::Equal],
            Comparison::Equal => &[Primitive::Equal],
            Comparison::MoreOrEqual => &[Primitive::Equal, Primitive::MoreThan],
            Comparison::MoreThan => &[Primitive::MoreThan],
        }
    }
}

impl Primitive {
    /// Whether a rule with `threshold` matches at launch `count`.
    pub(crate) fn matches(self, threshold: i64, count: i64) -> bool {
        match self {
            Primitive::LessThan => count < threshold,
            Primitive::Equal => count == threshold,
            Primitive::MoreThan => count > threshold,
        }
    }
}

/// The side effect a rule invokes when it fires.
///
/// Errors are propagated unmodified out of the firing pass.
pub type Action = Box<dyn FnMut() -> anyhow::Result<()>>;

/// A registered startup rule.
pub(crate) struct StartupRule {
    pub(crate) id: String,
    /// One-shot rules flip this to false when they fire
    pub(crate) active: bool,
    pub(crate) persistent: bool,
    pub(crate) action: Action,
}

/// One primitive entry in the evaluation list.
///
/// Entries produced by decomposing a single registration share the same
/// rule index.
pub(crate) struct RuleEntry {
    pub(crate) primitive: Primitive,
    pub(crate) threshold: i64,
    pub(crate) rule: usize,
}

/// Pure evaluation pass: indices of rules whose entries match `count`.
///
/// No state is mutated here; consumption and callback invocation are the
/// caller's job. The three primitives are mutually exclusive for a fixed
/// (threshold, count) pair, so a decomposed rule appears at most once.
pub(crate) fn evaluate(count: i64, entries: &[RuleEntry]) -> Vec<usize> {
    entries
        .iter()
        .filter(|entry| entry.primitive.matches(entry.threshold, count))
        .map(|entry| entry.rule)
        .collect()
}
