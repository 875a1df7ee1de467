// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper types for the FEE beam.

use marlu::Jones;
use num_complex::Complex64 as c64;

use super::{
    jones::calc_zenith_norm_jones,
    table::{CoeffSet, PolTable},
    tile::TileConfig,
};

/// The coefficients of a single polarisation, summed over all dipoles with
/// their complex excitations applied.
pub(crate) struct PolCoefficients {
    pub(crate) q1: Vec<c64>,
    pub(crate) q2: Vec<c64>,
    pub(crate) m: Vec<i8>,
    pub(crate) n: Vec<i8>,
    /// The direction-independent part of each mode's contribution, including
    /// the sign of M.
    pub(crate) prefactor: Vec<f64>,
    /// The biggest N coefficient.
    pub(crate) n_max: u8,
}

impl PolCoefficients {
    /// Combine the coefficients of each dipole with its complex excitation.
    /// `weights` has an element for every dipole in the table.
    pub(crate) fn combine(table: &PolTable, weights: &[c64]) -> PolCoefficients {
        let num_modes = table.m.len();
        let mut q1 = vec![c64::default(); num_modes];
        let mut q2 = vec![c64::default(); num_modes];
        for (dipole, &w) in table.dipoles.iter().zip(weights) {
            // Dipoles with fewer modes than the longest just contribute
            // nothing to the extra modes.
            q1.iter_mut()
                .zip(dipole.q1.iter())
                .for_each(|(acc, &q)| *acc += w * q);
            q2.iter_mut()
                .zip(dipole.q2.iter())
                .for_each(|(acc, &q)| *acc += w * q);
        }

        let prefactor = table
            .m
            .iter()
            .zip(table.n.iter())
            .map(|(&m, &n)| mode_prefactor(m, n))
            .collect();
        let n_max = table.n.iter().copied().max().unwrap_or(0).unsigned_abs();

        PolCoefficients {
            q1,
            q2,
            m: table.m.clone(),
            n: table.n.clone(),
            prefactor,
            n_max,
        }
    }
}

/// sign(M) * sqrt((2N + 1) / 2 * (N - |M|)! / (N + |M|)!) / sqrt(N (N + 1)).
///
/// The factorial ratio is accumulated as a product of square roots so it
/// can't overflow for any N that fits in an i8.
fn mode_prefactor(m: i8, n: i8) -> f64 {
    let m_abs = u32::from(m.unsigned_abs());
    let n = u32::from(n.unsigned_abs());
    let sqrt_ratio = ((n - m_abs + 1)..=(n + m_abs)).fold(1.0, |acc, k| acc / f64::from(k).sqrt());
    let sign = if m > 0 && m % 2 != 0 { -1.0 } else { 1.0 };
    sign * (0.5 * f64::from(2 * n + 1)).sqrt() * sqrt_ratio / f64::from(n * (n + 1)).sqrt()
}

/// Coefficients for X and Y, ready to be evaluated in any direction.
pub(crate) struct BowtieCoefficients {
    pub(crate) x: PolCoefficients,
    pub(crate) y: PolCoefficients,
    /// The zenith response used for normalisation. `None` if it can't be
    /// normalised against.
    pub(crate) zenith_norm: Option<Jones<f64>>,
    /// The table frequency these coefficients belong to.
    pub(crate) freq_hz: u32,
}

impl BowtieCoefficients {
    pub(crate) fn new(set: &CoeffSet, tile: &TileConfig) -> BowtieCoefficients {
        let weights = tile.weights(set.freq_hz);
        let x = PolCoefficients::combine(&set.x, &weights[..16]);
        let y = PolCoefficients::combine(&set.y, &weights[16..]);
        let zenith_norm = calc_zenith_norm_jones(&x, &y);
        BowtieCoefficients {
            x,
            y,
            zenith_norm,
            freq_hz: set.freq_hz,
        }
    }

    /// The largest N over both polarisations.
    pub(crate) fn n_max(&self) -> u8 {
        self.x.n_max.max(self.y.n_max)
    }
}
