//! Unit tests for ped-journey.

#[cfg(test)]
mod helpers {
    use ped_agent::{AgentStore, NewAgent};
    use ped_core::{AgentId, JourneyId, Point, StageId};
    use ped_spatial::Polygon;

    use crate::StageGraph;

    /// Exit strip along the right wall of a 10 × 10 room.
    pub fn right_strip() -> Polygon {
        Polygon::new([(9.0, 0.0), (10.0, 0.0), (10.0, 10.0), (9.0, 10.0)]).unwrap()
    }

    /// Three queue slots on the x axis, front at the origin.
    pub fn slots() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]
    }

    /// Insert an agent and register it with `stage`, the way the simulation
    /// does on `add_agent`.
    pub fn place(
        graph: &mut StageGraph,
        store: &mut AgentStore,
        journey: JourneyId,
        stage: StageId,
        pos: (f64, f64),
    ) -> AgentId {
        let destination = graph.join(store.next_id(), stage);
        store.insert(NewAgent::new(journey, stage, pos), destination)
    }
}

// ── Journey validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use ped_core::{Point, StageId};
    use super::helpers::right_strip;
    use crate::{JourneyDescription, JourneyError, StageGraph, Transition};

    fn graph() -> (StageGraph, StageId, StageId, StageId) {
        let mut g = StageGraph::new();
        let a = g.add_waypoint(Point::new(1.0, 1.0), 0.5).unwrap();
        let b = g.add_waypoint(Point::new(2.0, 2.0), 0.5).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        (g, a, b, exit)
    }

    #[test]
    fn valid_journey_gets_dense_ids() {
        let (mut g, a, b, exit) = graph();
        let j0 = g
            .add_journey(
                JourneyDescription::new([a, b, exit])
                    .with_transition(a, Transition::fixed(b))
                    .with_transition(b, Transition::fixed(exit)),
            )
            .unwrap();
        let j1 = g.add_journey(JourneyDescription::new([exit])).unwrap();
        assert_eq!((j0.0, j1.0), (0, 1));
        assert_eq!(g.journey_count(), 2);
        assert!(g.journey(j0).unwrap().contains(b));
    }

    #[test]
    fn empty_journey_rejected() {
        let (mut g, ..) = graph();
        assert_eq!(
            g.add_journey(JourneyDescription::new([])),
            Err(JourneyError::EmptyJourney)
        );
    }

    #[test]
    fn unknown_and_duplicate_stages_rejected() {
        let (mut g, a, _, exit) = graph();
        assert_eq!(
            g.add_journey(JourneyDescription::new([a, StageId(42)])),
            Err(JourneyError::UnknownStage(StageId(42)))
        );
        assert_eq!(
            g.add_journey(JourneyDescription::new([exit, a, exit])),
            Err(JourneyError::DuplicateStage(exit))
        );
    }

    #[test]
    fn transitions_must_stay_inside_the_journey() {
        let (mut g, a, b, exit) = graph();
        let outside_source =
            JourneyDescription::new([a, exit]).with_transition(b, Transition::fixed(exit));
        assert_eq!(g.add_journey(outside_source), Err(JourneyError::TransitionSourceOutside(b)));

        let outside_target =
            JourneyDescription::new([a, exit]).with_transition(a, Transition::fixed(b));
        assert_eq!(
            g.add_journey(outside_target),
            Err(JourneyError::TransitionTargetOutside { from: a, to: b })
        );
    }

    #[test]
    fn degenerate_candidates_rejected() {
        let (mut g, a, b, exit) = graph();
        let empty = JourneyDescription::new([a, exit])
            .with_transition(a, Transition::least_congested([]));
        assert_eq!(g.add_journey(empty), Err(JourneyError::EmptyCandidates(a)));

        let zero = JourneyDescription::new([a, b, exit])
            .with_transition(a, Transition::round_robin([(b, 1), (exit, 0)]));
        assert_eq!(g.add_journey(zero), Err(JourneyError::ZeroWeight { from: a, to: exit }));

        let twice = JourneyDescription::new([a, exit])
            .with_transition(a, Transition::least_congested([exit, exit]));
        assert_eq!(
            g.add_journey(twice),
            Err(JourneyError::DuplicateCandidate { from: a, to: exit })
        );
    }

    #[test]
    fn closed_cycle_has_no_exit() {
        let (mut g, a, b, _) = graph();
        let cycle = JourneyDescription::new([a, b])
            .with_transition(a, Transition::fixed(b))
            .with_transition(b, Transition::fixed(a));
        assert_eq!(g.add_journey(cycle), Err(JourneyError::NoExitReachable(a)));
    }

    #[test]
    fn cycle_with_an_escape_is_fine() {
        let (mut g, a, b, exit) = graph();
        let loop_then_exit = JourneyDescription::new([a, b, exit])
            .with_transition(a, Transition::fixed(b))
            .with_transition(b, Transition::round_robin([(a, 3), (exit, 1)]));
        assert!(g.add_journey(loop_then_exit).is_ok());
    }

    #[test]
    fn invalid_stages_rejected() {
        let mut g = StageGraph::new();
        assert!(matches!(
            g.add_waypoint(Point::new(0.0, 0.0), 0.0),
            Err(JourneyError::InvalidStage(_))
        ));
        assert!(matches!(g.add_queue(vec![]), Err(JourneyError::InvalidStage(_))));
        assert!(matches!(
            g.add_notifiable_queue(vec![Point::new(f64::NAN, 0.0)]),
            Err(JourneyError::InvalidStage(_))
        ));
        assert_eq!(g.stage_count(), 0);
    }

    #[test]
    fn membership() {
        let (mut g, a, b, exit) = graph();
        let j = g.add_journey(JourneyDescription::new([a, exit])).unwrap();
        assert!(g.check_membership(j, a).is_ok());
        assert_eq!(
            g.check_membership(j, b),
            Err(JourneyError::StageNotInJourney { journey: j, stage: b })
        );
        assert_eq!(
            g.check_membership(j, StageId(9)),
            Err(JourneyError::UnknownStage(StageId(9)))
        );
    }
}

// ── Transition rules ──────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use ped_core::StageId;
    use crate::{Transition, TransitionState};

    #[test]
    fn fixed_always_same() {
        let mut t = TransitionState::new(Transition::fixed(StageId(3)));
        for _ in 0..4 {
            assert_eq!(t.next(&[]), StageId(3));
        }
    }

    #[test]
    fn round_robin_honours_weights() {
        let mut t = TransitionState::new(Transition::round_robin([(StageId(1), 2), (StageId(2), 1)]));
        let picks: Vec<u32> = (0..7).map(|_| t.next(&[]).0).collect();
        assert_eq!(picks, [1, 1, 2, 1, 1, 2, 1]);
    }

    #[test]
    fn least_congested_picks_emptiest() {
        let mut t = TransitionState::new(Transition::least_congested([
            StageId(1),
            StageId(2),
            StageId(3),
        ]));
        assert_eq!(t.next(&[0, 4, 2, 5]), StageId(2));
    }

    #[test]
    fn least_congested_tie_goes_to_lowest_id() {
        let mut t = TransitionState::new(Transition::least_congested([StageId(3), StageId(2)]));
        assert_eq!(t.next(&[0, 0, 1, 1]), StageId(2));
    }

    #[test]
    fn targets_in_declaration_order() {
        let t = Transition::round_robin([(StageId(5), 1), (StageId(2), 4)]);
        assert_eq!(t.targets(), [StageId(5), StageId(2)]);
    }
}

// ── Queues ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queues {
    use std::sync::{Arc, Mutex};

    use ped_agent::AgentStore;
    use ped_core::{AgentId, LogLevel, Logger, Point, StageId};
    use super::helpers::{place, right_strip, slots};
    use crate::{JourneyDescription, JourneyError, StageGraph, Transition};

    /// Notifiable queue feeding an exit, with `n` agents queued far from
    /// the slots.
    fn notifiable(n: usize) -> (StageGraph, AgentStore, StageId, StageId) {
        let mut g = StageGraph::new();
        let q = g.add_notifiable_queue(slots()).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(JourneyDescription::new([q, exit]).with_transition(q, Transition::fixed(exit)))
            .unwrap();
        let mut store = AgentStore::new();
        for i in 0..n {
            place(&mut g, &mut store, j, q, (5.0, 1.0 + i as f64));
        }
        (g, store, q, exit)
    }

    #[test]
    fn members_get_slots_and_overflow_shares_the_last() {
        let (g, store, q, _) = notifiable(5);
        assert_eq!(g.queue_len(q).unwrap(), 5);
        let dest: Vec<Point> = store.destinations().to_vec();
        assert_eq!(dest[0], Point::new(0.0, 0.0));
        assert_eq!(dest[1], Point::new(1.0, 0.0));
        assert_eq!(dest[2], Point::new(2.0, 0.0));
        assert_eq!(dest[4], Point::new(2.0, 0.0));
        assert!(g.stage(q).unwrap().queue().unwrap().is_full());
    }

    #[test]
    fn notifiable_queue_waits_for_pop() {
        let (mut g, mut store, q, _) = notifiable(2);
        // Front agent standing right on the front slot.
        store.commit(&[
            ped_model::ModelUpdate {
                position:    Point::new(0.0, 0.0),
                orientation: Point::new(1.0, 0.0),
                velocity:    Point::ZERO,
            },
            ped_model::ModelUpdate {
                position:    Point::new(1.0, 0.0),
                orientation: Point::new(1.0, 0.0),
                velocity:    Point::ZERO,
            },
        ]);
        g.evaluate(&mut store, &Logger::new());
        assert_eq!(g.queue_len(q).unwrap(), 2);
    }

    #[test]
    fn pop_is_deferred_until_evaluate() {
        let (mut g, mut store, q, _) = notifiable(7);
        g.pop(q, 1).unwrap();
        assert_eq!(g.queue_len(q).unwrap(), 7);
        assert_eq!(g.stage(q).unwrap().queue().unwrap().pending_pops(), 1);

        g.evaluate(&mut store, &Logger::new());
        assert_eq!(g.queue_len(q).unwrap(), 6);
        assert_eq!(g.stage(q).unwrap().queue().unwrap().pending_pops(), 0);
    }

    #[test]
    fn pop_releases_front_first() {
        let (mut g, mut store, q, exit) = notifiable(5);
        g.pop(q, 1).unwrap();
        g.pop(q, 1).unwrap();
        g.evaluate(&mut store, &Logger::new());

        assert_eq!(g.queue_members(q).unwrap(), &[AgentId(2), AgentId(3), AgentId(4)]);
        assert_eq!(store.get(AgentId(0)).unwrap().stage(), exit);
        assert_eq!(store.get(AgentId(1)).unwrap().stage(), exit);
        assert_eq!(store.get(AgentId(2)).unwrap().stage(), q);

        // Survivors shuffle forward; released agents head for the exit.
        assert_eq!(store.get(AgentId(2)).unwrap().destination(), Point::new(0.0, 0.0));
        assert_eq!(store.get(AgentId(4)).unwrap().destination(), Point::new(2.0, 0.0));
        assert_eq!(store.get(AgentId(0)).unwrap().destination(), Point::new(9.5, 5.0));
        assert_eq!(g.occupancy(exit), 2);
        assert_eq!(g.occupancy(q), 3);
    }

    #[test]
    fn surplus_pops_are_discarded() {
        let (mut g, mut store, q, _) = notifiable(2);
        g.pop(q, 10).unwrap();
        g.evaluate(&mut store, &Logger::new());
        assert_eq!(g.queue_len(q).unwrap(), 0);

        let j = store.at(0).journey();
        place(&mut g, &mut store, j, q, (5.0, 9.0));
        g.evaluate(&mut store, &Logger::new());
        assert_eq!(g.queue_len(q).unwrap(), 1);
    }

    #[test]
    fn pop_on_other_stages_fails() {
        let (mut g, _, _, exit) = notifiable(0);
        assert_eq!(g.pop(exit, 1), Err(JourneyError::NotAQueue(exit)));
        assert_eq!(g.pop(StageId(7), 1), Err(JourneyError::UnknownStage(StageId(7))));
        assert_eq!(g.queue_len(exit), Err(JourneyError::NotAQueue(exit)));
    }

    #[test]
    fn leave_drops_a_member() {
        let (mut g, _, q, _) = notifiable(3);
        g.leave(AgentId(1), q);
        assert_eq!(g.queue_members(q).unwrap(), &[AgentId(0), AgentId(2)]);
    }

    #[test]
    fn popped_agent_without_transition_stays_and_warns() {
        let mut g = StageGraph::new();
        let q = g.add_notifiable_queue(slots()).unwrap();
        let j = g.add_journey(JourneyDescription::new([q])).unwrap();
        let mut store = AgentStore::new();
        place(&mut g, &mut store, j, q, (5.0, 5.0));

        let warnings = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&warnings);
        let logger = Logger::new()
            .with_callback(LogLevel::Warning, move |m| sink.lock().unwrap().push(m.to_string()));

        g.pop(q, 1).unwrap();
        g.evaluate(&mut store, &logger);
        assert_eq!(g.queue_len(q).unwrap(), 1);
        assert_eq!(warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn auto_queue_releases_front_on_arrival() {
        let mut g = StageGraph::new();
        let q = g.add_queue(slots()).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(JourneyDescription::new([q, exit]).with_transition(q, Transition::fixed(exit)))
            .unwrap();
        let mut store = AgentStore::new();
        let front = place(&mut g, &mut store, j, q, (0.05, 0.0));
        let second = place(&mut g, &mut store, j, q, (4.0, 4.0));

        g.evaluate(&mut store, &Logger::new());
        assert_eq!(store.get(front).unwrap().stage(), exit);
        assert_eq!(g.queue_members(q).unwrap(), &[second]);
        assert_eq!(store.get(second).unwrap().destination(), Point::new(0.0, 0.0));
    }

    #[test]
    fn auto_queue_ignores_non_front_members_on_slot_zero() {
        let mut g = StageGraph::new();
        let q = g.add_queue(slots()).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(JourneyDescription::new([q, exit]).with_transition(q, Transition::fixed(exit)))
            .unwrap();
        let mut store = AgentStore::new();
        place(&mut g, &mut store, j, q, (3.0, 3.0));
        place(&mut g, &mut store, j, q, (0.0, 0.0));

        g.evaluate(&mut store, &Logger::new());
        assert_eq!(g.queue_len(q).unwrap(), 2);
    }
}

// ── Waypoints and exits ───────────────────────────────────────────────────────

#[cfg(test)]
mod evaluation {
    use ped_agent::AgentStore;
    use ped_core::{AgentId, Logger, Point};
    use super::helpers::{place, right_strip};
    use crate::{JourneyDescription, StageGraph, Transition};

    #[test]
    fn waypoint_completes_within_radius() {
        let mut g = StageGraph::new();
        let wp = g.add_waypoint(Point::new(5.0, 5.0), 1.0).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(JourneyDescription::new([wp, exit]).with_transition(wp, Transition::fixed(exit)))
            .unwrap();
        let mut store = AgentStore::new();
        let near = place(&mut g, &mut store, j, wp, (5.5, 5.5));
        let far = place(&mut g, &mut store, j, wp, (1.0, 1.0));
        assert_eq!(store.get(far).unwrap().destination(), Point::new(5.0, 5.0));

        let exits = g.evaluate(&mut store, &Logger::new());
        assert!(exits.is_empty(), "transition and removal never happen in the same step");
        assert_eq!(store.get(near).unwrap().stage(), exit);
        assert_eq!(store.get(near).unwrap().destination(), Point::new(9.5, 5.0));
        assert_eq!(store.get(far).unwrap().stage(), wp);
    }

    #[test]
    fn one_transition_per_step() {
        // Standing on both waypoints at once still takes two steps.
        let mut g = StageGraph::new();
        let a = g.add_waypoint(Point::new(5.0, 5.0), 1.0).unwrap();
        let b = g.add_waypoint(Point::new(5.0, 5.0), 1.0).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(
                JourneyDescription::new([a, b, exit])
                    .with_transition(a, Transition::fixed(b))
                    .with_transition(b, Transition::fixed(exit)),
            )
            .unwrap();
        let mut store = AgentStore::new();
        let id = place(&mut g, &mut store, j, a, (5.0, 5.0));

        g.evaluate(&mut store, &Logger::new());
        assert_eq!(store.get(id).unwrap().stage(), b);
        g.evaluate(&mut store, &Logger::new());
        assert_eq!(store.get(id).unwrap().stage(), exit);
    }

    #[test]
    fn exit_reports_only_its_own_agents() {
        let mut g = StageGraph::new();
        let wp = g.add_waypoint(Point::new(1.0, 1.0), 0.5).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(JourneyDescription::new([wp, exit]).with_transition(wp, Transition::fixed(exit)))
            .unwrap();
        let mut store = AgentStore::new();
        // Inside the exit strip but still heading for the waypoint.
        place(&mut g, &mut store, j, wp, (9.5, 2.0));
        let leaving = place(&mut g, &mut store, j, exit, (9.5, 8.0));
        place(&mut g, &mut store, j, exit, (4.0, 8.0));

        let exits = g.evaluate(&mut store, &Logger::new());
        assert_eq!(exits, vec![leaving]);
        assert_eq!(leaving, AgentId(1));
    }

    #[test]
    fn round_robin_spreads_agents_across_waypoints() {
        let mut g = StageGraph::new();
        let start = g.add_waypoint(Point::new(1.0, 1.0), 2.0).unwrap();
        let left = g.add_waypoint(Point::new(5.0, 2.0), 0.5).unwrap();
        let right = g.add_waypoint(Point::new(5.0, 8.0), 0.5).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(
                JourneyDescription::new([start, left, right, exit])
                    .with_transition(start, Transition::round_robin([(left, 1), (right, 1)]))
                    .with_transition(left, Transition::fixed(exit))
                    .with_transition(right, Transition::fixed(exit)),
            )
            .unwrap();
        let mut store = AgentStore::new();
        for i in 0..4 {
            place(&mut g, &mut store, j, start, (1.0, 0.5 + 0.3 * i as f64));
        }
        g.evaluate(&mut store, &Logger::new());
        let stages: Vec<_> = store.stages().to_vec();
        assert_eq!(stages, vec![left, right, left, right]);
        assert_eq!(g.occupancy(left), 2);
        assert_eq!(g.occupancy(start), 0);
    }

    #[test]
    fn least_congested_sees_live_occupancy() {
        let mut g = StageGraph::new();
        let start = g.add_waypoint(Point::new(1.0, 1.0), 2.0).unwrap();
        let left = g.add_waypoint(Point::new(5.0, 2.0), 0.5).unwrap();
        let right = g.add_waypoint(Point::new(5.0, 8.0), 0.5).unwrap();
        let exit = g.add_exit(right_strip()).unwrap();
        let j = g
            .add_journey(
                JourneyDescription::new([start, left, right, exit])
                    .with_transition(start, Transition::least_congested([left, right]))
                    .with_transition(left, Transition::fixed(exit))
                    .with_transition(right, Transition::fixed(exit)),
            )
            .unwrap();
        let mut store = AgentStore::new();
        for i in 0..3 {
            place(&mut g, &mut store, j, start, (1.0, 0.5 + 0.3 * i as f64));
        }
        g.evaluate(&mut store, &Logger::new());
        // Tie → left, then right is emptier, then tie again → left.
        let stages: Vec<_> = store.stages().to_vec();
        assert_eq!(stages, vec![left, right, left]);
    }
}
