//! Unit tests for ped-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, JourneyId, StageId};

    #[test]
    fn index_roundtrip() {
        let id = StageId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(StageId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(JourneyId(100) > JourneyId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u64::MAX);
        assert_eq!(StageId::INVALID.0, u32::MAX);
        assert_eq!(JourneyId::default(), JourneyId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod point {
    use crate::{CoreError, Point};

    #[test]
    fn arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        assert_eq!(a + b, Point::new(4.0, 1.0));
        assert_eq!(a - b, Point::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert_eq!(-a, Point::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 1.0);
        assert_eq!(a.cross(b), -7.0);
    }

    #[test]
    fn distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn normalized_zero_is_nan() {
        let n = Point::ZERO.normalized();
        assert!(!n.is_finite());
        assert!(Point::ZERO.try_normalized(1e-9).is_none());
    }

    #[test]
    fn to_unit_rejects_zero_length() {
        let err = Point::ZERO.to_unit("orientation").unwrap_err();
        assert!(matches!(err, CoreError::DegenerateVector { what: "orientation", .. }));
        let nan = Point::new(f64::NAN, 1.0).to_unit("orientation");
        assert!(nan.is_err());
        let u = Point::new(0.0, 5.0).to_unit("orientation").unwrap();
        assert_eq!(u, Point::new(0.0, 1.0));
    }

    #[test]
    fn orthogonal_is_ccw() {
        let e = Point::new(1.0, 0.0);
        assert_eq!(e.orthogonal(), Point::new(0.0, 1.0));
        assert!(e.cross(e.orthogonal()) > 0.0);
    }

    #[test]
    fn clamp_norm() {
        let v = Point::new(3.0, 4.0).clamp_norm(1.0);
        assert!((v.norm() - 1.0).abs() < 1e-12);
        let short = Point::new(0.1, 0.0);
        assert_eq!(short.clamp_norm(1.0), short);
    }
}

#[cfg(test)]
mod time {
    use crate::{Iteration, SimClock, SimConfig};

    #[test]
    fn iteration_multiples() {
        assert!(Iteration(8).is_multiple_of(4));
        assert!(!Iteration(8).is_multiple_of(0));
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(0.01);
        assert_eq!(clock.elapsed_time(), 0.0);
        for _ in 0..100 {
            clock.advance();
        }
        assert_eq!(clock.iteration, Iteration(100));
        assert!((clock.elapsed_time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn iterations_for_secs_rounds_up() {
        let clock = SimClock::new(0.25);
        assert_eq!(clock.iterations_for_secs(1.0), 4);
        assert_eq!(clock.iterations_for_secs(1.1), 5);
    }

    #[test]
    fn config_validation() {
        assert!(SimConfig::default().validate().is_ok());
        let bad_dt = SimConfig { dt: 0.0, ..SimConfig::default() };
        assert!(bad_dt.validate().is_err());
        let nan_dt = SimConfig { dt: f64::NAN, ..SimConfig::default() };
        assert!(nan_dt.validate().is_err());
        let bad_interval = SimConfig { snapshot_interval: 0, ..SimConfig::default() };
        assert!(bad_interval.validate().is_err());
    }
}

#[cfg(test)]
mod log {
    use std::sync::{Arc, Mutex};

    use crate::{LogLevel, Logger};

    #[test]
    fn callbacks_receive_their_level_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let logger = Logger::new().with_callback(LogLevel::Warning, move |m| {
            sink.lock().unwrap().push(m.to_owned());
        });

        logger.debug("quiet");
        logger.warning(format_args!("agent {} is stuck", 3));
        logger.error("also quiet");

        assert_eq!(*seen.lock().unwrap(), vec!["agent 3 is stuck".to_owned()]);
    }

    #[test]
    fn clear_callback() {
        let mut logger = Logger::new();
        logger.set_callback(LogLevel::Info, |_| {});
        assert!(logger.has_callback(LogLevel::Info));
        logger.clear_callback(LogLevel::Info);
        assert!(!logger.has_callback(LogLevel::Info));
    }

    #[test]
    fn level_display() {
        assert_eq!(LogLevel::Warning.to_string(), "warning");
        assert!(LogLevel::Debug < LogLevel::Error);
    }
}
