//! Journeys: the stages an agent may visit and how it moves between them.
//!
//! A [`JourneyDescription`] is assembled by the host and validated into a
//! [`Journey`] when added to the [`StageGraph`](crate::StageGraph).  After
//! that it never changes shape; only round-robin cursors advance.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ped_core::StageId;

use crate::{JourneyError, JourneyResult, Stage, Transition, TransitionState};

/// Host-side journey definition.
///
/// # Example
///
/// ```
/// use ped_core::StageId;
/// use ped_journey::{JourneyDescription, Transition};
///
/// let (queue, exit) = (StageId(0), StageId(1));
/// let mut journey = JourneyDescription::new([queue, exit]);
/// journey.set_transition_for_stage(queue, Transition::fixed(exit));
/// assert_eq!(journey.stages(), &[queue, exit]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JourneyDescription {
    stages:      Vec<StageId>,
    transitions: BTreeMap<StageId, Transition>,
}

impl JourneyDescription {
    pub fn new(stages: impl IntoIterator<Item = StageId>) -> Self {
        Self { stages: stages.into_iter().collect(), transitions: BTreeMap::new() }
    }

    pub fn add_stage(&mut self, stage: StageId) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Set (or replace) the transition taken when `stage` is completed.
    pub fn set_transition_for_stage(&mut self, stage: StageId, transition: Transition) -> &mut Self {
        self.transitions.insert(stage, transition);
        self
    }

    /// Builder-style variant of
    /// [`set_transition_for_stage`](Self::set_transition_for_stage).
    pub fn with_transition(mut self, stage: StageId, transition: Transition) -> Self {
        self.set_transition_for_stage(stage, transition);
        self
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn transition_for(&self, stage: StageId) -> Option<&Transition> {
        self.transitions.get(&stage)
    }
}

/// A validated journey.
#[derive(Clone, Debug, PartialEq)]
pub struct Journey {
    stages:      Vec<StageId>,
    transitions: BTreeMap<StageId, TransitionState>,
}

impl Journey {
    /// Check `desc` against the stage table.
    ///
    /// Rejects empty journeys, unknown or repeated stages, transitions that
    /// leave the journey, degenerate candidate lists, and any stage from
    /// which no sink is reachable.  A sink is an exit or a stage without an
    /// outgoing transition.
    pub(crate) fn validate(desc: JourneyDescription, table: &[Stage]) -> JourneyResult<Self> {
        if desc.stages.is_empty() {
            return Err(JourneyError::EmptyJourney);
        }
        let mut members = BTreeSet::new();
        for &s in &desc.stages {
            if s.index() >= table.len() {
                return Err(JourneyError::UnknownStage(s));
            }
            if !members.insert(s) {
                return Err(JourneyError::DuplicateStage(s));
            }
        }

        for (&from, rule) in &desc.transitions {
            if !members.contains(&from) {
                return Err(JourneyError::TransitionSourceOutside(from));
            }
            let targets = rule.targets();
            if targets.is_empty() {
                return Err(JourneyError::EmptyCandidates(from));
            }
            let mut seen = BTreeSet::new();
            for &to in &targets {
                if !members.contains(&to) {
                    return Err(JourneyError::TransitionTargetOutside { from, to });
                }
                if !seen.insert(to) {
                    return Err(JourneyError::DuplicateCandidate { from, to });
                }
            }
            if let Transition::RoundRobin(candidates) = rule {
                if let Some((to, _)) = candidates.iter().find(|(_, w)| *w == 0) {
                    return Err(JourneyError::ZeroWeight { from, to: *to });
                }
            }
        }

        check_sinks_reachable(&desc, table)?;

        Ok(Self {
            stages:      desc.stages,
            transitions: desc
                .transitions
                .into_iter()
                .map(|(s, t)| (s, TransitionState::new(t)))
                .collect(),
        })
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn contains(&self, stage: StageId) -> bool {
        self.stages.contains(&stage)
    }

    pub fn transition_for(&self, stage: StageId) -> Option<&TransitionState> {
        self.transitions.get(&stage)
    }

    pub(crate) fn transition_mut(&mut self, stage: StageId) -> Option<&mut TransitionState> {
        self.transitions.get_mut(&stage)
    }
}

/// Reverse breadth-first search from the sinks; every stage must be hit.
fn check_sinks_reachable(desc: &JourneyDescription, table: &[Stage]) -> JourneyResult<()> {
    let mut incoming: BTreeMap<StageId, Vec<StageId>> = BTreeMap::new();
    for (&from, rule) in &desc.transitions {
        for to in rule.targets() {
            incoming.entry(to).or_default().push(from);
        }
    }

    let mut reached: BTreeSet<StageId> = desc
        .stages
        .iter()
        .copied()
        .filter(|s| table[s.index()].is_exit() || !desc.transitions.contains_key(s))
        .collect();
    let mut frontier: VecDeque<StageId> = reached.iter().copied().collect();

    while let Some(s) = frontier.pop_front() {
        for &pred in incoming.get(&s).map(Vec::as_slice).unwrap_or(&[]) {
            if reached.insert(pred) {
                frontier.push_back(pred);
            }
        }
    }

    match desc.stages.iter().find(|s| !reached.contains(s)) {
        Some(&stuck) => Err(JourneyError::NoExitReachable(stuck)),
        None => Ok(()),
    }
}
