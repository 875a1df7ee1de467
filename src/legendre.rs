// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for associated Legendre functions.
//!
//! The FEE beam needs P_n^m(cos θ) and P_n^m(cos θ) / sin θ for every mode up
//! to some maximum degree. Both are generated column-by-column (fixed m) with
//! the three-term upward recurrence in degree,
//!
//! (n - m) P_n^m = (2n - 1) x P_{n-1}^m - (n + m - 1) P_{n-2}^m,
//!
//! which is stable for increasing n. The recurrence is linear, so it also
//! holds for P_n^m / sin θ; seeding that column with
//! P_m^m / sin θ = (-1)^m (2m - 1)!! sin^(m-1) θ means we never divide by
//! sin θ, and the limits at the poles come out exactly. The Condon-Shortley
//! phase is included.

/// Associated Legendre function values at one colatitude, for all
/// 0 <= m <= n <= n_max.
pub(crate) struct Legendre {
    n_max: usize,
    /// P_n^m(cos θ), row-major in n.
    p: Vec<f64>,
    /// P_n^m(cos θ) / sin θ, row-major in n. The m = 0 column is left as zero;
    /// every use of it is multiplied by m.
    p_over_sin: Vec<f64>,
}

impl Legendre {
    pub(crate) fn new(n_max: u8, theta: f64) -> Legendre {
        let n_max = usize::from(n_max);
        let stride = n_max + 1;
        let mut p = vec![0.0; stride * stride];
        let mut p_over_sin = vec![0.0; stride * stride];
        let (s_theta, x) = theta.sin_cos();

        // P_0^0 = 1.
        p[0] = 1.0;
        fill_column(&mut p, n_max, 0, x);

        // P_m^m / sin θ, updated as m increases.
        let mut seed = 1.0;
        for m in 1..=n_max {
            seed *= if m == 1 {
                -1.0
            } else {
                -((2 * m - 1) as f64) * s_theta
            };
            p_over_sin[m * stride + m] = seed;
            p[m * stride + m] = seed * s_theta;
            fill_column(&mut p, n_max, m, x);
            fill_column(&mut p_over_sin, n_max, m, x);
        }

        Legendre {
            n_max,
            p,
            p_over_sin,
        }
    }

    /// P_n^m(cos θ). Zero when m > n.
    #[inline]
    pub(crate) fn p(&self, n: usize, m: usize) -> f64 {
        if m > n || n > self.n_max {
            0.0
        } else {
            self.p[n * (self.n_max + 1) + m]
        }
    }

    /// P_n^m(cos θ) / sin θ. Zero when m > n or m = 0.
    #[inline]
    pub(crate) fn p_over_sin(&self, n: usize, m: usize) -> f64 {
        if m > n || n > self.n_max {
            0.0
        } else {
            self.p_over_sin[n * (self.n_max + 1) + m]
        }
    }
}

/// Given the diagonal element (n = m) of column `m`, fill in n = m + 1 ..=
/// n_max.
fn fill_column(values: &mut [f64], n_max: usize, m: usize, x: f64) {
    let stride = n_max + 1;
    let mut prev2 = 0.0;
    let mut prev = values[m * stride + m];
    for n in (m + 1)..=n_max {
        let this = ((2 * n - 1) as f64 * x * prev - (n + m - 1) as f64 * prev2) / (n - m) as f64;
        values[n * stride + m] = this;
        prev2 = prev;
        prev = this;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, PI};

    use approx::*;

    use super::*;

    #[test]
    fn low_degree_closed_forms() {
        for theta in [0.0, 0.3, FRAC_PI_4, 1.2, PI / 2.0, 2.5] {
            let l = Legendre::new(3, theta);
            let (s, x) = f64::sin_cos(theta);
            assert_abs_diff_eq!(l.p(0, 0), 1.0);
            assert_abs_diff_eq!(l.p(1, 0), x, epsilon = 1e-12);
            assert_abs_diff_eq!(l.p(1, 1), -s, epsilon = 1e-12);
            assert_abs_diff_eq!(l.p(2, 0), 0.5 * (3.0 * x * x - 1.0), epsilon = 1e-12);
            assert_abs_diff_eq!(l.p(2, 1), -3.0 * x * s, epsilon = 1e-12);
            assert_abs_diff_eq!(l.p(2, 2), 3.0 * s * s, epsilon = 1e-12);
            assert_abs_diff_eq!(
                l.p(3, 1),
                -1.5 * (5.0 * x * x - 1.0) * s,
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(l.p(3, 3), -15.0 * s * s * s, epsilon = 1e-12);
        }
    }

    #[test]
    fn p_over_sin_matches_division_away_from_poles() {
        let theta: f64 = 0.7;
        let s = theta.sin();
        let l = Legendre::new(12, theta);
        for n in 1..=12 {
            for m in 1..=n {
                assert_relative_eq!(
                    l.p_over_sin(n, m),
                    l.p(n, m) / s,
                    max_relative = 1e-10
                );
            }
        }
    }

    #[test]
    fn values_at_quarter_pi() {
        let l = Legendre::new(5, FRAC_PI_4);
        assert_abs_diff_eq!(l.p_over_sin(1, 1), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l.p(1, 1), -FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_abs_diff_eq!(l.p_over_sin(2, 1), -2.121320, epsilon = 1e-6);
        assert_abs_diff_eq!(l.p(2, 2), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(l.p_over_sin(3, 2), 7.5, epsilon = 1e-12);
        assert_abs_diff_eq!(l.p_over_sin(3, 3), -7.5, epsilon = 1e-12);
        assert_abs_diff_eq!(l.p(3, 2), 5.303301, epsilon = 1e-6);
    }

    #[test]
    fn pole_limits_are_exact() {
        // P_n^1(cos θ) / sin θ -> -n(n+1)/2 at the zenith.
        let l = Legendre::new(16, 0.0);
        for n in 1..=16 {
            let nf = n as f64;
            assert_abs_diff_eq!(l.p_over_sin(n, 1), -nf * (nf + 1.0) / 2.0, epsilon = 1e-9);
            // Higher orders vanish.
            for m in 2..=n {
                assert_abs_diff_eq!(l.p_over_sin(n, m), 0.0);
                assert_abs_diff_eq!(l.p(n, m), 0.0);
            }
            assert_abs_diff_eq!(l.p(n, 0), 1.0, epsilon = 1e-12);
        }

        // ... and to (-1)^n n(n+1)/2 at the nadir.
        let l = Legendre::new(16, PI);
        for n in 1..=16 {
            let nf = n as f64;
            let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
            assert_abs_diff_eq!(
                l.p_over_sin(n, 1),
                sign * nf * (nf + 1.0) / 2.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn high_degree_stays_bounded() {
        // |P_n(x)| <= 1 for all n; a naive evaluation would blow up long before
        // degree 150.
        for theta in [0.01, 0.5, 1.0, 1.5] {
            let l = Legendre::new(150, theta);
            for n in 0..=150 {
                let v = l.p(n, 0);
                assert!(v.is_finite());
                assert!(v.abs() <= 1.0 + 1e-10, "P_{n}({theta}) = {v}");
            }
        }
    }

    #[test]
    fn out_of_range_indices_are_zero() {
        let l = Legendre::new(4, 0.4);
        assert_abs_diff_eq!(l.p(2, 3), 0.0);
        assert_abs_diff_eq!(l.p(5, 0), 0.0);
        assert_abs_diff_eq!(l.p_over_sin(3, 4), 0.0);
        assert_abs_diff_eq!(l.p_over_sin(3, 0), 0.0);
    }
}
