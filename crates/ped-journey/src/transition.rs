//! Transition rules: which stage an agent heads to after completing one.

use ped_core::StageId;

/// Rule selecting the next stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    /// Always the same stage.
    Fixed(StageId),
    /// Cycle through `(stage, weight)` candidates; each is chosen `weight`
    /// consecutive times before moving on.
    RoundRobin(Vec<(StageId, u32)>),
    /// The candidate with the fewest agents currently assigned to it.  Ties
    /// go to the lowest stage id.
    LeastCongested(Vec<StageId>),
}

impl Transition {
    pub fn fixed(target: StageId) -> Self {
        Transition::Fixed(target)
    }

    pub fn round_robin(candidates: impl IntoIterator<Item = (StageId, u32)>) -> Self {
        Transition::RoundRobin(candidates.into_iter().collect())
    }

    pub fn least_congested(candidates: impl IntoIterator<Item = StageId>) -> Self {
        Transition::LeastCongested(candidates.into_iter().collect())
    }

    /// Every stage this rule can select, in declaration order.
    pub fn targets(&self) -> Vec<StageId> {
        match self {
            Transition::Fixed(t) => vec![*t],
            Transition::RoundRobin(c) => c.iter().map(|(t, _)| *t).collect(),
            Transition::LeastCongested(c) => c.clone(),
        }
    }
}

/// A transition plus its round-robin cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    rule:    Transition,
    cursor:  usize,
    emitted: u32,
}

impl TransitionState {
    pub(crate) fn new(rule: Transition) -> Self {
        Self { rule, cursor: 0, emitted: 0 }
    }

    pub fn rule(&self) -> &Transition {
        &self.rule
    }

    /// Select the next stage.  `occupancy[s]` is the number of agents whose
    /// current stage is `s`.
    ///
    /// Candidate lists are non-empty and weights positive; journey
    /// validation guarantees both.
    pub(crate) fn next(&mut self, occupancy: &[usize]) -> StageId {
        match &self.rule {
            Transition::Fixed(t) => *t,
            Transition::RoundRobin(candidates) => {
                let (target, weight) = candidates[self.cursor];
                self.emitted += 1;
                if self.emitted >= weight {
                    self.emitted = 0;
                    self.cursor = (self.cursor + 1) % candidates.len();
                }
                target
            }
            Transition::LeastCongested(candidates) => *candidates
                .iter()
                .min_by_key(|s| (occupancy.get(s.index()).copied().unwrap_or(0), **s))
                .unwrap_or(&StageId::INVALID),
        }
    }
}
