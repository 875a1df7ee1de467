// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small, made-up FEE model for tests. The coefficients follow no physics,
//! but they are deterministic and different for every dipole, polarisation
//! and frequency.

use ndarray::prelude::*;

use super::{FEEBeam, MemorySource};

pub(crate) const TEST_FREQS: [u32; 3] = [49920000, 51200000, 52480000];

pub(crate) const TEST_N_MAX: i8 = 4;

/// The modes table: all S=1 modes, then all S=2 modes, each running over
/// N = 1..=n_max and M = -N..=N.
pub(crate) fn synthetic_modes(n_max: i8) -> Array2<i8> {
    let mut columns = vec![];
    for s in [1, 2] {
        for n in 1..=n_max {
            for m in -n..=n {
                columns.push([s, m, n]);
            }
        }
    }
    Array2::from_shape_fn((3, columns.len()), |(r, c)| columns[c][r])
}

/// A (2, num_columns) dataset of amplitudes and phases (degrees).
pub(crate) fn synthetic_dataset(
    num_columns: usize,
    pol: usize,
    dipole: usize,
    freq_index: usize,
) -> Array2<f64> {
    Array2::from_shape_fn((2, num_columns), |(r, i)| match r {
        0 => 0.05 + 0.01 * ((i * 7 + dipole * 3 + pol * 5 + freq_index) % 11) as f64,
        _ => ((i * 37 + dipole * 11 + pol * 53 + freq_index * 13) % 360) as f64,
    })
}

pub(crate) fn synthetic_source(freqs: &[u32], n_max: i8) -> MemorySource {
    let modes = synthetic_modes(n_max);
    let num_columns = modes.ncols();
    let mut source = MemorySource::new();
    source.set_modes(modes);
    for (freq_index, freq) in freqs.iter().enumerate() {
        for (pol, pol_str) in ["X", "Y"].into_iter().enumerate() {
            for dipole in 1..=16 {
                source.insert(
                    format!("{pol_str}{dipole}_{freq}"),
                    synthetic_dataset(num_columns, pol, dipole, freq_index),
                );
            }
        }
    }
    source
}

pub(crate) fn test_beam() -> FEEBeam {
    FEEBeam::from_source(&synthetic_source(&TEST_FREQS, TEST_N_MAX))
        .expect("the synthetic model is valid")
}
