//! Initial particle placement

use ember_core::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// How initial positions are spread over the field volume
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Independent uniform samples per axis in `[-bounds, bounds]`
    #[default]
    Uniform,
    /// Spherical shell with a dense core around the origin
    Clustered,
}

impl Distribution {
    /// Share of clustered particles placed across the full radius
    pub const SPREAD_SHARE: f32 = 0.8;
    /// Core radius relative to bounds
    pub const CORE_RADIUS: f32 = 0.3;

    /// Sample one position; every coordinate lies in `[-bounds, bounds]`
    pub fn sample(self, bounds: f32, rng: &mut impl Rng) -> Vec3 {
        match self {
            Distribution::Uniform => Vec3::new(
                (rng.gen::<f32>() - 0.5) * bounds * 2.0,
                (rng.gen::<f32>() - 0.5) * bounds * 2.0,
                (rng.gen::<f32>() - 0.5) * bounds * 2.0,
            ),
            Distribution::Clustered => {
                let max_radius = if rng.gen::<f32>() < Self::SPREAD_SHARE {
                    bounds
                } else {
                    bounds * Self::CORE_RADIUS
                };
                let theta = rng.gen::<f32>() * TAU;
                let phi = (1.0 - 2.0 * rng.gen::<f32>()).clamp(-1.0, 1.0).acos();
                let r = rng.gen::<f32>() * max_radius;
                Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.cos(),
                    r * phi.sin() * theta.sin(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for distribution in [Distribution::Uniform, Distribution::Clustered] {
            for _ in 0..2000 {
                let p = distribution.sample(25.0, &mut rng);
                assert!(p.max_abs() <= 25.0, "{distribution:?} {p:?}");
            }
        }
    }

    #[test]
    fn test_clustered_is_denser_near_origin() {
        let mut rng = StdRng::seed_from_u64(11);
        let near = |d: Distribution, rng: &mut StdRng| {
            (0..4000)
                .filter(|_| d.sample(100.0, rng).length() < 30.0)
                .count()
        };
        let uniform = near(Distribution::Uniform, &mut rng);
        let clustered = near(Distribution::Clustered, &mut rng);
        assert!(clustered > uniform * 2, "{clustered} vs {uniform}");
    }
}
