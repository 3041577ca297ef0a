//! Smooth 3D value noise for organic particle drift

use ember_core::Vec3;

/// Hash a lattice coordinate to `[-1, 1)`
fn hash(n: f32) -> f32 {
    let s = (n * 12.9898 + 78.233).sin() * 43758.5453;
    (s - s.floor()) * 2.0 - 1.0
}

fn lattice(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(
        hash(x * 127.1 + y * 311.7 + z * 74.7),
        hash(x * 269.5 + y * 183.3 + z * 246.1),
        hash(x * 113.5 + y * 271.9 + z * 124.6),
    )
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Continuous vector noise with every component in `[-1, 1]`
///
/// Lattice values are hashed at integer coordinates and blended with a
/// smoothstep, so nearby inputs give nearby outputs.
pub fn value_noise_3d(p: Vec3) -> Vec3 {
    let (x0, y0, z0) = (p.x.floor(), p.y.floor(), p.z.floor());
    let (tx, ty, tz) = (
        smoothstep(p.x - x0),
        smoothstep(p.y - y0),
        smoothstep(p.z - z0),
    );

    let corner = |dx: f32, dy: f32, dz: f32| lattice(x0 + dx, y0 + dy, z0 + dz);

    let x00 = mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), tx);
    let x10 = mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), tx);
    let x01 = mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), tx);
    let x11 = mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), tx);

    let y0 = mix(x00, x10, ty);
    let y1 = mix(x01, x11, ty);
    mix(y0, y1, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_bounded() {
        for i in 0..500 {
            let f = i as f32 * 0.37;
            let n = value_noise_3d(Vec3::new(f, -f * 1.3, f * 0.7 + 11.0));
            assert!(n.max_abs() <= 1.0, "{n:?}");
            assert!(n.is_finite());
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let p = Vec3::new(3.2, -7.9, 12.4);
        let a = value_noise_3d(p);
        let b = value_noise_3d(p + Vec3::new(0.001, 0.0, 0.0));
        assert!((a - b).max_abs() < 0.05);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let p = Vec3::new(1.5, 2.5, 3.5);
        assert_eq!(value_noise_3d(p), value_noise_3d(p));
    }
}
