//! Unit tests for ped-spatial.

#[cfg(test)]
mod helpers {
    use crate::{Geometry, GeometryBuilder};

    pub const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

    /// 10 × 10 room with a 2 × 2 pillar in the middle.
    pub fn room_with_pillar() -> Geometry {
        GeometryBuilder::new(SQUARE)
            .add_obstacle([(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)])
            .build()
            .unwrap()
    }
}

// ── Segments ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use ped_core::Point;
    use crate::LineSegment;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let s = LineSegment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert_eq!(s.closest_point(Point::new(1.0, 3.0)), Point::new(1.0, 0.0));
        assert_eq!(s.closest_point(Point::new(-5.0, 1.0)), Point::new(0.0, 0.0));
        assert_eq!(s.closest_point(Point::new(9.0, -1.0)), Point::new(2.0, 0.0));
        assert_eq!(s.distance_to(Point::new(1.0, 3.0)), 3.0);
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let p = Point::new(1.0, 1.0);
        let s = LineSegment::new(p, p);
        assert_eq!(s.length(), 0.0);
        assert_eq!(s.closest_point(Point::new(4.0, 5.0)), p);
        assert_eq!(s.distance_to(Point::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn crossing_and_touching_intersect() {
        let a = LineSegment::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let b = LineSegment::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        let c = LineSegment::new(Point::new(2.0, 2.0), Point::new(3.0, 0.0));
        assert!(a.intersects(&b));
        assert!(a.intersects(&c), "shared endpoint counts");
    }

    #[test]
    fn parallel_and_collinear_disjoint_do_not_intersect() {
        let a = LineSegment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let b = LineSegment::new(Point::new(0.0, 1.0), Point::new(1.0, 1.0));
        let c = LineSegment::new(Point::new(2.0, 0.0), Point::new(3.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn collinear_overlap_intersects() {
        let a = LineSegment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        let b = LineSegment::new(Point::new(1.0, 0.0), Point::new(3.0, 0.0));
        assert!(a.intersects(&b));
    }
}

// ── Polygons ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod polygon {
    use ped_core::Point;
    use super::helpers::SQUARE;
    use crate::{Polygon, SpatialError};

    #[test]
    fn square_measures() {
        let p = Polygon::new(SQUARE).unwrap();
        assert_eq!(p.vertex_count(), 4);
        assert_eq!(p.area(), 100.0);
        assert!(p.is_ccw());
        let c = p.centroid();
        assert!((c.x - 5.0).abs() < 1e-12 && (c.y - 5.0).abs() < 1e-12);
        assert_eq!(p.bounding_box(), (Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
    }

    #[test]
    fn closing_vertex_and_duplicates_are_dropped() {
        let p = Polygon::new([
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(p.vertex_count(), 3);
    }

    #[test]
    fn clockwise_ring_has_negative_signed_area() {
        let p = Polygon::new([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]).unwrap();
        assert!(!p.is_ccw());
        assert_eq!(p.signed_area(), -4.0);
        assert_eq!(p.area(), 4.0);
    }

    #[test]
    fn too_few_vertices() {
        let err = Polygon::new([(0.0, 0.0), (1.0, 0.0)]).unwrap_err();
        assert_eq!(err, SpatialError::TooFewVertices { got: 2 });
    }

    #[test]
    fn collinear_ring_has_zero_area() {
        let err = Polygon::new([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap_err();
        assert_eq!(err, SpatialError::ZeroArea);
    }

    #[test]
    fn non_finite_vertex_rejected() {
        let err = Polygon::new([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]).unwrap_err();
        assert_eq!(err, SpatialError::NonFiniteVertex { index: 1 });
    }

    #[test]
    fn self_intersecting_ring_rejected() {
        let err = Polygon::new([(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, SpatialError::SelfIntersecting { first: 0, second: 2 }));
    }

    #[test]
    fn containment_boundary_inclusive() {
        let p = Polygon::new(SQUARE).unwrap();
        assert!(p.contains(Point::new(5.0, 5.0)));
        assert!(p.contains(Point::new(0.0, 5.0)));
        assert!(p.contains(Point::new(10.0, 10.0)));
        assert!(!p.contains(Point::new(10.5, 5.0)));

        assert!(p.contains_interior(Point::new(5.0, 5.0)));
        assert!(!p.contains_interior(Point::new(0.0, 5.0)));
    }

    #[test]
    fn distance_to_boundary() {
        let p = Polygon::new(SQUARE).unwrap();
        assert_eq!(p.distance_to_boundary(Point::new(3.0, 5.0)), 3.0);
        assert_eq!(p.distance_to_boundary(Point::new(13.0, 5.0)), 3.0);
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use ped_core::Point;
    use rand::{Rng, SeedableRng, rngs::SmallRng};
    use super::helpers::{SQUARE, room_with_pillar};
    use crate::{GeometryBuilder, SpatialError};

    #[test]
    fn walls_cover_every_ring() {
        let geo = room_with_pillar();
        assert_eq!(geo.wall_count(), 8);
        assert_eq!(geo.obstacles().len(), 1);
        assert_eq!(geo.area(), 96.0);
    }

    #[test]
    fn rings_are_normalised_to_orientation() {
        let geo = GeometryBuilder::new([(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
            .add_obstacle([(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)])
            .build()
            .unwrap();
        assert!(geo.outer().is_ccw());
        assert!(!geo.obstacles()[0].is_ccw());
    }

    #[test]
    fn contains_excludes_obstacle_interior() {
        let geo = room_with_pillar();
        assert!(geo.contains(Point::new(1.0, 1.0)));
        assert!(!geo.contains(Point::new(5.0, 5.0)));
        assert!(geo.contains(Point::new(4.0, 5.0)), "obstacle edge is walkable");
        assert!(!geo.contains(Point::new(-1.0, 5.0)));
    }

    #[test]
    fn distance_to_boundary_sees_obstacles() {
        let geo = room_with_pillar();
        assert_eq!(geo.distance_to_boundary(Point::new(3.0, 5.0)), 1.0);
        assert_eq!(geo.distance_to_boundary(Point::new(0.5, 5.0)), 0.5);
    }

    #[test]
    fn walls_within_sorted_by_wall_number() {
        let geo = GeometryBuilder::new(SQUARE).build().unwrap();
        let near_corner = geo.walls_within(Point::new(0.5, 0.5), 1.0);
        assert_eq!(near_corner, vec![geo.walls()[0], geo.walls()[3]]);
        assert!(geo.walls_within(Point::new(5.0, 5.0), 1.0).is_empty());
        assert!(geo.walls_within(Point::new(5.0, 5.0), f64::NAN).is_empty());
    }

    #[test]
    fn walls_within_matches_linear_scan() {
        let geo = room_with_pillar();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = Point::new(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0));
            let r = rng.gen_range(0.0..4.0);
            let expected: Vec<_> = geo
                .walls()
                .iter()
                .copied()
                .filter(|w| w.distance_squared_to(p) <= r * r)
                .collect();
            assert_eq!(geo.walls_within(p, r), expected);
        }
    }

    #[test]
    fn obstacle_outside_boundary_rejected() {
        let err = GeometryBuilder::new(SQUARE)
            .add_obstacle([(12.0, 12.0), (14.0, 12.0), (14.0, 14.0)])
            .build()
            .err()
            .unwrap();
        assert_eq!(err, SpatialError::ObstacleOutsideBoundary { index: 0 });
    }

    #[test]
    fn obstacle_touching_boundary_rejected() {
        let err = GeometryBuilder::new(SQUARE)
            .add_obstacle([(0.0, 4.0), (2.0, 4.0), (2.0, 6.0)])
            .build()
            .err()
            .unwrap();
        assert_eq!(err, SpatialError::ObstacleOutsideBoundary { index: 0 });
    }

    #[test]
    fn overlapping_obstacles_rejected() {
        let err = GeometryBuilder::new(SQUARE)
            .add_obstacle([(2.0, 2.0), (5.0, 2.0), (5.0, 5.0), (2.0, 5.0)])
            .add_obstacle([(4.0, 4.0), (7.0, 4.0), (7.0, 7.0), (4.0, 7.0)])
            .build()
            .err()
            .unwrap();
        assert_eq!(err, SpatialError::ObstaclesOverlap { first: 0, second: 1 });
    }

    #[test]
    fn nested_obstacles_rejected() {
        let err = GeometryBuilder::new(SQUARE)
            .add_obstacle([(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)])
            .add_obstacle([(4.0, 4.0), (5.0, 4.0), (5.0, 5.0), (4.0, 5.0)])
            .build()
            .err()
            .unwrap();
        assert_eq!(err, SpatialError::ObstaclesOverlap { first: 0, second: 1 });
    }

    #[test]
    fn invalid_outer_propagates() {
        let err = GeometryBuilder::new([(0.0, 0.0), (1.0, 1.0)]).build().err().unwrap();
        assert_eq!(err, SpatialError::TooFewVertices { got: 2 });
    }
}

// ── Neighbour index ───────────────────────────────────────────────────────────

#[cfg(test)]
mod neighbors {
    use ped_core::Point;
    use rand::{Rng, SeedableRng, rngs::SmallRng};
    use crate::{NeighborIndex, brute_force_within};

    #[test]
    fn empty_index() {
        let idx = NeighborIndex::build(&[]);
        assert!(idx.is_empty());
        assert!(idx.within(Point::ZERO, 10.0).is_empty());
        assert_eq!(idx.nearest(Point::ZERO), None);
    }

    #[test]
    fn radius_is_inclusive() {
        let pts = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(6.0, 8.0)];
        let idx = NeighborIndex::build(&pts);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.within(Point::ZERO, 5.0), vec![0, 1]);
        assert_eq!(brute_force_within(&pts, Point::ZERO, 5.0), vec![0, 1]);
    }

    #[test]
    fn excluding_self() {
        let pts = [Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(9.0, 0.0)];
        let idx = NeighborIndex::build(&pts);
        assert_eq!(idx.within_excluding(pts[0], 1.0, 0), vec![1]);
    }

    #[test]
    fn invalid_radius_matches_nothing() {
        let pts = [Point::new(0.0, 0.0)];
        let idx = NeighborIndex::build(&pts);
        assert!(idx.within(Point::ZERO, -1.0).is_empty());
        assert!(idx.within(Point::ZERO, f64::NAN).is_empty());
        assert!(brute_force_within(&pts, Point::ZERO, f64::NAN).is_empty());
    }

    #[test]
    fn nearest_slot() {
        let pts = [Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(9.0, 9.0)];
        let idx = NeighborIndex::build(&pts);
        assert_eq!(idx.nearest(Point::new(6.0, 6.0)), Some(1));
    }

    #[test]
    fn coincident_positions_both_found() {
        let pts = [Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
        let idx = NeighborIndex::build(&pts);
        assert_eq!(idx.within(Point::new(1.0, 1.0), 0.0), vec![0, 1]);
    }

    #[test]
    fn matches_brute_force_on_random_crowd() {
        let mut rng = SmallRng::seed_from_u64(42);
        let pts: Vec<Point> = (0..500)
            .map(|_| Point::new(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0)))
            .collect();
        let idx = NeighborIndex::build(&pts);

        for _ in 0..200 {
            let c = Point::new(rng.gen_range(-5.0..55.0), rng.gen_range(-5.0..55.0));
            let r = rng.gen_range(0.0..8.0);
            assert_eq!(idx.within(c, r), brute_force_within(&pts, c, r));
        }
    }
}
