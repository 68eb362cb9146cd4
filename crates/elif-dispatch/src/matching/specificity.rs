//! Specificity ranking of matching candidates
//!
//! When several templates match the same path the most specific one wins:
//! more literal characters first, then fewer capturing groups. Remaining
//! ties are broken by a per-candidate bias (sub-resource methods beat
//! locators) and finally by registration order.

use crate::template::Template;
use std::cmp::Ordering;

/// Specificity of a template, greater is more specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Specificity {
    pub literal_chars: usize,
    pub capturing_groups: usize,
}

impl Specificity {
    pub fn of(template: &Template) -> Self {
        Self {
            literal_chars: template.literal_chars(),
            capturing_groups: template.capturing_groups(),
        }
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.capturing_groups.cmp(&self.capturing_groups))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Something that can take part in specificity ranking
pub trait Ranked {
    fn specificity(&self) -> Specificity;

    /// Tie-break applied after specificity, greater wins
    fn bias(&self) -> u8 {
        0
    }
}

/// Pick the most specific candidate
///
/// Candidates are expected in registration order; on a complete tie the
/// earliest one wins.
pub fn most_specific<T, I>(candidates: I) -> Option<T>
where
    T: Ranked,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<(Specificity, u8, T)> = None;
    for candidate in candidates {
        let key = (candidate.specificity(), candidate.bias());
        let better = match &best {
            Some((specificity, bias, _)) => key > (*specificity, *bias),
            None => true,
        };
        if better {
            best = Some((key.0, key.1, candidate));
        }
    }
    best.map(|(_, _, candidate)| candidate)
}
