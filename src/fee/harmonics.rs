// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Evaluation of the spherical-wave expansion of an FEE dipole pattern.

use num_complex::Complex64 as c64;

use super::types::PolCoefficients;
use crate::{constants::J_POWER_TABLE, legendre::Legendre};

/// e^{i m φ} for every M between -n_max and n_max.
pub(super) struct AzimuthalPhases {
    n_max: i32,
    values: Vec<c64>,
}

impl AzimuthalPhases {
    pub(super) fn new(n_max: u8, phi: f64) -> AzimuthalPhases {
        let n_max = i32::from(n_max);
        AzimuthalPhases {
            n_max,
            values: (-n_max..=n_max)
                .map(|m| c64::cis(f64::from(m) * phi))
                .collect(),
        }
    }

    #[inline]
    fn get(&self, m: i8) -> c64 {
        self.values[(i32::from(m) + self.n_max) as usize]
    }
}

/// Calculate the Jones matrix components given a pointing and coefficients
/// associated with a single dipole polarisation. `theta` is the zenith angle
/// and the Legendre values must have been evaluated at it; `phases` must cover
/// the biggest N of `coeffs`.
pub(super) fn calc_sigmas(
    theta: f64,
    coeffs: &PolCoefficients,
    legendre: &Legendre,
    phases: &AzimuthalPhases,
) -> (c64, c64) {
    let u = theta.cos();
    let mut sigma_p = c64::default();
    let mut sigma_t = c64::default();
    coeffs
        .m
        .iter()
        .zip(coeffs.n.iter())
        .zip(coeffs.q1.iter())
        .zip(coeffs.q2.iter())
        .zip(coeffs.prefactor.iter())
        .for_each(|((((&m, &n), &q1), &q2), &prefactor)| {
            let mf = f64::from(m);
            let m_abs = usize::from(m.unsigned_abs());
            let n = usize::from(n.unsigned_abs());

            let p1sin = legendre.p_over_sin(n, m_abs);
            let p1 = legendre.p(n, m_abs + 1);
            let phi_comp = phases.get(m) * prefactor;
            let e_theta_mn =
                J_POWER_TABLE[n % 4] * (p1sin * (mf.abs() * q2 * u - mf * q1) + q2 * p1);
            let e_phi_mn =
                J_POWER_TABLE[(n + 1) % 4] * (p1sin * (mf * q2 - mf.abs() * q1 * u) - q1 * p1);
            sigma_p += phi_comp * e_phi_mn;
            sigma_t += phi_comp * e_theta_mn;
        });

    // FEKO phi runs the opposite way to the phi of the sky.
    (sigma_t, -sigma_p)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::*;

    use super::*;

    /// A single mode with the given coefficients.
    fn single_mode(m: i8, n: i8, q1: c64, q2: c64, prefactor: f64) -> PolCoefficients {
        PolCoefficients {
            q1: vec![q1],
            q2: vec![q2],
            m: vec![m],
            n: vec![n],
            prefactor: vec![prefactor],
            n_max: n.unsigned_abs(),
        }
    }

    #[test]
    fn phases_cover_all_m() {
        let phases = AzimuthalPhases::new(3, 0.4);
        for m in -3..=3_i8 {
            assert_abs_diff_eq!(
                phases.get(m),
                c64::cis(f64::from(m) * 0.4),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn dipole_term_at_zenith() {
        // For m = 1, n = 1 at the zenith, P/sin = -1, P_1^2 = 0 and u = 1:
        // e_theta = j (|m| q2 - m q1) (-1) and e_phi = -(m q2 - |m| q1) (-1).
        let q1 = c64::new(0.3, -0.1);
        let q2 = c64::new(-0.2, 0.5);
        let coeffs = single_mode(1, 1, q1, q2, 1.0);
        let legendre = Legendre::new(1, 0.0);
        let phases = AzimuthalPhases::new(1, 0.0);
        let (t, p) = calc_sigmas(0.0, &coeffs, &legendre, &phases);

        let j = c64::new(0.0, 1.0);
        assert_abs_diff_eq!(t, -j * (q2 - q1), epsilon = 1e-14);
        assert_abs_diff_eq!(p, -(q2 - q1), epsilon = 1e-14);
    }

    #[test]
    fn m_zero_modes_vanish_at_zenith() {
        // Only P_n^1 survives at theta = 0, and m = 0 modes use P/sin * m.
        let coeffs = single_mode(0, 3, c64::new(1.0, 0.0), c64::new(0.0, 1.0), 1.0);
        let legendre = Legendre::new(3, 0.0);
        let phases = AzimuthalPhases::new(3, 1.0);
        let (t, p) = calc_sigmas(0.0, &coeffs, &legendre, &phases);
        assert_abs_diff_eq!(t, c64::default(), epsilon = 1e-14);
        assert_abs_diff_eq!(p, c64::default(), epsilon = 1e-14);
    }

    #[test]
    fn several_modes_off_zenith() {
        // Values worked out by hand from the closed forms of P_2^m and P_3^m.
        let coeffs = PolCoefficients {
            q1: vec![
                c64::new(0.3, -0.2),
                c64::new(-0.5, 0.1),
                c64::new(0.7, 0.3),
                c64::new(0.1, 0.9),
                c64::new(-0.2, -0.8),
            ],
            q2: vec![
                c64::new(-0.1, 0.4),
                c64::new(0.2, 0.2),
                c64::new(-0.4, -0.6),
                c64::new(0.5, -0.3),
                c64::new(0.6, 0.1),
            ],
            m: vec![-2, 1, 0, 2, -3],
            n: vec![2, 2, 3, 3, 3],
            prefactor: vec![
                0.13176156917368248,
                -0.26352313834736496,
                0.5400617248673217,
                0.049300664859163464,
                0.020126912147485333,
            ],
            n_max: 3,
        };
        let theta = 0.7;
        let legendre = Legendre::new(3, theta);
        let phases = AzimuthalPhases::new(3, 0.4);
        let (t, p) = calc_sigmas(theta, &coeffs, &legendre, &phases);

        assert_abs_diff_eq!(
            t,
            c64::new(-0.0977215988831911, -1.2956409302774805),
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            p,
            c64::new(-1.334504813249996, 0.0624355314316736),
            epsilon = 1e-13
        );
    }

    #[test]
    fn response_is_linear_in_coefficients() {
        let theta = FRAC_PI_4;
        let legendre = Legendre::new(4, theta);
        let phases = AzimuthalPhases::new(4, FRAC_PI_2 - 0.3);
        let a = single_mode(-2, 4, c64::new(0.1, 0.2), c64::new(-0.3, 0.4), 0.7);
        let b = single_mode(-2, 4, c64::new(0.2, 0.4), c64::new(-0.6, 0.8), 0.7);
        let (ta, pa) = calc_sigmas(theta, &a, &legendre, &phases);
        let (tb, pb) = calc_sigmas(theta, &b, &legendre, &phases);
        assert_abs_diff_eq!(tb, 2.0 * ta, epsilon = 1e-14);
        assert_abs_diff_eq!(pb, 2.0 * pa, epsilon = 1e-14);
    }
}
