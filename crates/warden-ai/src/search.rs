//! Search point sampling around the last known target position.
//!
//! Candidates are drawn uniformly inside a sphere and then snapped onto the walkable surface by
//! the navigation collaborator. A candidate that cannot be snapped is simply dropped; the
//! controller tries again the next time the arrival check fires.

use crate::config::SearchConfig;
use cgmath::InnerSpace;
use rand::Rng;
use warden_core::collaborators::Navigator;

/// Outcome of one sampling round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchSample {
    /// A candidate landed on the walkable surface.
    Snapped {
        candidate: cgmath::Vector3<f32>,
        point: cgmath::Vector3<f32>,
    },
    /// Every attempt of the round was rejected; holds the last candidate tried.
    Rejected { candidate: cgmath::Vector3<f32> },
}

/// Uniform random point inside the unit sphere.
///
/// Rejection sampling from the enclosing cube; accepts about 52% of draws.
pub fn random_in_unit_sphere<R>(rng: &mut R) -> cgmath::Vector3<f32>
where
    R: Rng + ?Sized,
{
    loop {
        let v = cgmath::Vector3::new(
            rng.random_range(-1.0_f32..=1.0),
            rng.random_range(-1.0_f32..=1.0),
            rng.random_range(-1.0_f32..=1.0),
        );
        if v.magnitude2() <= 1.0 {
            return v;
        }
    }
}

/// Uniform random point inside the sphere of `radius` around `center`.
pub fn sample_candidate<R>(center: cgmath::Vector3<f32>, radius: f32, rng: &mut R) -> cgmath::Vector3<f32>
where
    R: Rng + ?Sized,
{
    center + random_in_unit_sphere(rng) * radius
}

/// Draws up to `config.attempts_per_tick` candidates around `center` and snaps the first one
/// the navigator accepts.
///
/// # Arguments
///
/// * `nav` - Navigation collaborator used for the snap query.
/// * `center` - Last known target position.
/// * `config` - Radius, snap distance and attempts per round.
/// * `rng` - Random source.
pub fn sample_search_point<N, R>(
    nav: &N,
    center: cgmath::Vector3<f32>,
    config: &SearchConfig,
    rng: &mut R,
) -> SearchSample
where
    N: Navigator + ?Sized,
    R: Rng + ?Sized,
{
    let mut candidate = center;

    for _ in 0..config.attempts_per_tick.max(1) {
        candidate = sample_candidate(center, config.radius, rng);
        if let Some(point) = nav.sample_position(candidate, config.snap_distance) {
            return SearchSample::Snapped { candidate, point };
        }
    }

    SearchSample::Rejected { candidate }
}
