//! This module implements the few pieces of relativistic kinematics that the
//! event selection needs: kinetic energies and distances between points.

use crate::numeric::Float;
use nalgebra::Vector3;
use prefix_num_ops::real::*;

/// A point in the detector (cm)
pub type Position = Vector3<Float>;

/// Relativistic 3-momentum (same energy unit as the particle energy)
pub type Momentum = Vector3<Float>;

/// Kinetic energy of a particle from its total energy and momentum
///
/// This is `E - m` with the mass recovered from the mass shell relation. Units
/// are those of the inputs. Rounding may put a (nearly) massless particle
/// slightly off-shell, in which case the squared mass is clamped to zero
/// instead of producing a NaN.
///
pub fn kinetic_energy(energy: Float, momentum: &Momentum) -> Float {
    let mass_sqr = energy.powi(2) - momentum.norm_squared();
    energy - sqrt(mass_sqr.max(0.))
}

/// Euclidean distance between two points
pub fn displacement(a: &Position, b: &Position) -> Float {
    (a - b).norm()
}

/// Truth that two points are within `tolerance` of each other on every axis
pub fn within_box(a: &Position, b: &Position, tolerance: Float) -> bool {
    (a - b).iter().all(|&delta| abs(delta) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kinetic_energy_of_massive_particle() {
        // Proton with 80 MeV of kinetic energy
        let mass = 938.272;
        let ke = 80.;
        let e = mass + ke;
        let p = sqrt(e * e - mass * mass);
        let momentum = Momentum::new(0., p, 0.);
        assert_relative_eq!(kinetic_energy(e, &momentum), ke, epsilon = 1e-6);
    }

    #[test]
    fn kinetic_energy_of_photon_is_total_energy() {
        let momentum = Momentum::new(120., -160., 0.);
        assert_relative_eq!(kinetic_energy(200., &momentum), 200., epsilon = 1e-9);
    }

    #[test]
    fn kinetic_energy_clamps_off_shell_rounding() {
        // |p| slightly above E, as happens with single precision ntuples
        let momentum = Momentum::new(0., 0., 400.000_001);
        let ke = kinetic_energy(400., &momentum);
        assert!(!ke.is_nan());
        assert_eq!(ke, 400.);
    }

    #[test]
    fn kinetic_energy_is_non_negative_and_repeatable() {
        for &(e, p) in &[(1., 0.), (10., 9.99), (1e3, 5e2), (0.06, 0.)] {
            let momentum = Momentum::new(p, 0., 0.);
            let first = kinetic_energy(e, &momentum);
            assert!(first >= 0.);
            assert_eq!(first.to_bits(), kinetic_energy(e, &momentum).to_bits());
        }
    }

    #[test]
    fn displacement_is_euclidean() {
        let a = Position::new(1., 2., 3.);
        let b = Position::new(4., 6., 3.);
        assert_relative_eq!(displacement(&a, &b), 5.);
        assert_eq!(displacement(&a, &a), 0.);
    }

    #[test]
    fn box_proximity_is_per_axis() {
        let vertex = Position::new(128., 0., 518.);
        assert!(within_box(&Position::new(128.1, -0.1, 518.15), &vertex, 0.15));
        assert!(!within_box(&Position::new(128., 0., 518.2), &vertex, 0.15));
    }
}
