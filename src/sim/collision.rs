//! Ground-plane collision response
//!
//! Particles with collision parameters bounce off a horizontal ground line
//! (screen-down Y, so falling means `vel.y > 0`). The reflect coefficient
//! can decay over the particle's life; once it reaches zero the particle
//! settles instead of bouncing at ever-smaller amplitudes.

use glam::Vec2;
use rand::Rng;

use super::particle::GroundBounce;

/// Outcome of a ground contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceOutcome {
    /// Velocity was reflected; a spin impulse may have been applied.
    Bounced,
    /// The reflect coefficient had decayed to zero or below: downward
    /// velocity was clamped out, nothing was reflected.
    Settled,
}

/// Resolve a ground contact in place. Call only when the particle has
/// crossed the ground line while moving downward; the caller clamps the
/// position to the line.
pub fn resolve_ground_contact<R: Rng>(
    bounce: &GroundBounce,
    vel: &mut Vec2,
    spin: &mut f32,
    age_ratio: f32,
    rng: &mut R,
) -> BounceOutcome {
    // A decay curve, when present, is the active coefficient for both axes;
    // the static X/Y pair covers curve-less configs.
    let (cx, cy) = match bounce
        .reflect_curve
        .as_ref()
        .and_then(|curve| curve.evaluate(age_ratio))
    {
        Some(c) => (c, c),
        None => (bounce.reflect_x, bounce.reflect_y),
    };

    if cy <= 0.0 {
        // Bounce energy is gone: suppress the reflection entirely so the
        // particle rests instead of oscillating at epsilon amplitudes.
        vel.y = vel.y.min(0.0);
        return BounceOutcome::Settled;
    }

    // Y is the surface normal and inverts; X is tangential and only damps.
    vel.y = -vel.y * cy;
    vel.x *= cx;

    if let Some(range) = bounce.spin_impulse {
        let decay = bounce
            .spin_curve
            .as_ref()
            .and_then(|curve| curve.evaluate(age_ratio))
            .unwrap_or(1.0);
        *spin += range.sample(rng) * decay;
    }

    BounceOutcome::Bounced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangeF32;
    use crate::sim::curve::Curve;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    fn decaying_bounce() -> GroundBounce {
        GroundBounce {
            ground_y: 390.0,
            reflect_curve: Some(Curve::from_pairs(&[(0.0, 0.3), (0.5, 0.0)])),
            ..Default::default()
        }
    }

    #[test]
    fn early_contact_bounces_with_curve_coefficient() {
        let bounce = decaying_bounce();
        let mut vel = Vec2::new(10.0, 165.0);
        let mut spin = 0.0;

        let outcome = resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.0, &mut rng());
        assert_eq!(outcome, BounceOutcome::Bounced);
        assert!((vel.y - (-165.0 * 0.3)).abs() < 0.01, "vel.y = {}", vel.y);
        assert!((vel.x - 10.0 * 0.3).abs() < 0.01);
    }

    #[test]
    fn late_contact_settles_without_sign_flip() {
        let bounce = decaying_bounce();
        let mut vel = Vec2::new(10.0, 165.0);
        let mut spin = 0.0;

        let outcome = resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.5, &mut rng());
        assert_eq!(outcome, BounceOutcome::Settled);
        assert_eq!(vel.y, 0.0);
        // Tangential velocity is untouched on a settle.
        assert_eq!(vel.x, 10.0);
    }

    #[test]
    fn midway_contact_uses_interpolated_coefficient() {
        let bounce = decaying_bounce();
        let mut vel = Vec2::new(0.0, 100.0);
        let mut spin = 0.0;

        // Halfway to the decay endpoint: 0.3 -> 0.0 at t = 0.25 is 0.15.
        resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.25, &mut rng());
        assert!((vel.y - (-15.0)).abs() < 0.01, "vel.y = {}", vel.y);
    }

    #[test]
    fn static_coefficients_without_curve() {
        let bounce = GroundBounce {
            ground_y: 390.0,
            reflect_x: 0.8,
            reflect_y: 0.5,
            ..Default::default()
        };
        let mut vel = Vec2::new(20.0, 100.0);
        let mut spin = 0.0;

        let outcome = resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.9, &mut rng());
        assert_eq!(outcome, BounceOutcome::Bounced);
        assert_eq!(vel.y, -50.0);
        assert_eq!(vel.x, 16.0);
    }

    #[test]
    fn zero_static_coefficient_settles() {
        let bounce = GroundBounce {
            ground_y: 390.0,
            reflect_x: 1.0,
            reflect_y: 0.0,
            ..Default::default()
        };
        let mut vel = Vec2::new(5.0, 60.0);
        let mut spin = 0.0;

        assert_eq!(
            resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.0, &mut rng()),
            BounceOutcome::Settled
        );
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn spin_impulse_lands_within_range() {
        let bounce = GroundBounce {
            ground_y: 390.0,
            reflect_y: 0.5,
            reflect_x: 1.0,
            spin_impulse: Some(RangeF32 { lo: 100.0, hi: 200.0 }),
            ..Default::default()
        };
        let mut vel = Vec2::new(0.0, 50.0);
        let mut spin = 0.0;

        resolve_ground_contact(&bounce, &mut vel, &mut spin, 0.0, &mut rng());
        assert!((100.0..=200.0).contains(&spin), "spin = {spin}");
    }

    #[test]
    fn spin_impulse_scaled_by_decay_curve() {
        let bounce = GroundBounce {
            ground_y: 390.0,
            reflect_y: 0.5,
            reflect_x: 1.0,
            spin_impulse: Some(RangeF32 { lo: 100.0, hi: 200.0 }),
            spin_curve: Some(Curve::from_pairs(&[(0.0, 1.0), (1.0, 0.0)])),
            ..Default::default()
        };
        let mut vel = Vec2::new(0.0, 50.0);
        let mut spin = 0.0;

        // Fully decayed: the bounce still happens, the impulse does not.
        resolve_ground_contact(&bounce, &mut vel, &mut spin, 1.0, &mut rng());
        assert_eq!(spin, 0.0);
        assert_eq!(vel.y, -25.0);
    }
}
