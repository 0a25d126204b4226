//! Patrol destination generation.

use crate::config::{PatrolArea, PatrolConfig};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Picks the next patrol destination.
///
/// Area patrols draw a uniformly random point of the rectangle at the center's height.
/// Waypoint patrols pick one waypoint uniformly, with replacement.
///
/// # Returns
///
/// `None` when there is nothing to pick from; the caller skips this tick.
pub fn next_patrol_destination<R>(patrol: &PatrolConfig, rng: &mut R) -> Option<cgmath::Vector3<f32>>
where
    R: Rng + ?Sized,
{
    match patrol {
        PatrolConfig::Area(area) => Some(point_in_area(area, rng)),
        PatrolConfig::Waypoints(points) => points.choose(rng).copied(),
    }
}

fn point_in_area<R>(area: &PatrolArea, rng: &mut R) -> cgmath::Vector3<f32>
where
    R: Rng + ?Sized,
{
    let half_width = area.width * 0.5;
    let half_depth = area.depth * 0.5;

    let dx = if half_width > 0.0 {
        rng.random_range(-half_width..=half_width)
    } else {
        0.0
    };
    let dz = if half_depth > 0.0 {
        rng.random_range(-half_depth..=half_depth)
    } else {
        0.0
    };

    cgmath::Vector3::new(area.center.x + dx, area.center.y, area.center.z + dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_area_samples_stay_in_bounds() {
        let center = Vector3::new(3.0, 1.5, -7.0);
        let patrol = PatrolConfig::Area(PatrolArea::new(center, 5.0, 5.0));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10_000 {
            let Some(point) = next_patrol_destination(&patrol, &mut rng) else {
                panic!("area patrol must always yield a destination");
            };
            assert!((point.x - center.x).abs() <= 2.5);
            assert!((point.z - center.z).abs() <= 2.5);
            assert_eq!(point.y, center.y);
        }
    }

    #[test]
    fn test_area_samples_cover_rectangle() {
        let patrol = PatrolConfig::Area(PatrolArea::new(Vector3::new(0.0, 0.0, 0.0), 10.0, 2.0));
        let mut rng = StdRng::seed_from_u64(11);

        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        for _ in 0..2_000 {
            if let Some(point) = next_patrol_destination(&patrol, &mut rng) {
                min_x = min_x.min(point.x);
                max_x = max_x.max(point.x);
            }
        }

        assert!(min_x < -4.0);
        assert!(max_x > 4.0);
    }

    #[test]
    fn test_degenerate_area_returns_center() {
        let center = Vector3::new(1.0, 2.0, 3.0);
        let patrol = PatrolConfig::Area(PatrolArea::new(center, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(next_patrol_destination(&patrol, &mut rng), Some(center));
    }

    #[test]
    fn test_waypoints_are_picked_from_list() {
        let waypoints = vec![
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(-4.0, 0.0, 2.0),
            Vector3::new(0.0, 0.0, 9.0),
        ];
        let patrol = PatrolConfig::Waypoints(waypoints.clone());
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = [false; 3];
        for _ in 0..300 {
            let point = next_patrol_destination(&patrol, &mut rng);
            let index = waypoints.iter().position(|w| Some(*w) == point);
            match index {
                Some(i) => seen[i] = true,
                None => panic!("destination {:?} is not a waypoint", point),
            }
        }

        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_empty_waypoints_yield_nothing() {
        let patrol = PatrolConfig::Waypoints(Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(next_patrol_destination(&patrol, &mut rng), None);
    }
}
