// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FEE coefficient table: every dataset of a model, parsed once into
//! complex coefficients and indexed by frequency.

use std::collections::HashSet;

use log::debug;
use ndarray::prelude::*;
use num_complex::Complex64 as c64;

use super::{CoeffSource, InitFEEBeamError};
use crate::{constants::NUM_DIPOLES, types::Pol};

/// The complex spherical-wave coefficients of a single dipole.
#[derive(Debug, Clone)]
pub struct DipoleCoeffs {
    /// Coefficients of the S=1 modes.
    pub(crate) q1: Vec<c64>,
    /// Coefficients of the S=2 modes.
    pub(crate) q2: Vec<c64>,
}

impl DipoleCoeffs {
    pub fn q1(&self) -> &[c64] {
        &self.q1
    }

    pub fn q2(&self) -> &[c64] {
        &self.q2
    }
}

/// The coefficients of all 16 dipoles of one polarisation.
#[derive(Debug, Clone)]
pub struct PolTable {
    pub(crate) dipoles: Vec<DipoleCoeffs>,
    /// M of each mode, from the dipole with the most modes.
    pub(crate) m: Vec<i8>,
    /// N of each mode, from the dipole with the most modes.
    pub(crate) n: Vec<i8>,
}

impl PolTable {
    pub fn num_dipoles(&self) -> usize {
        self.dipoles.len()
    }

    /// Get a dipole's coefficients. Dipoles are indexed from 0.
    pub fn dipole(&self, index: usize) -> Option<&DipoleCoeffs> {
        self.dipoles.get(index)
    }

    /// The number of (S=1, S=2) mode pairs.
    pub fn num_modes(&self) -> usize {
        self.m.len()
    }
}

/// Everything the model has at a single frequency.
#[derive(Debug, Clone)]
pub struct CoeffSet {
    pub(crate) freq_hz: u32,
    pub(crate) x: PolTable,
    pub(crate) y: PolTable,
}

impl CoeffSet {
    pub fn freq_hz(&self) -> u32 {
        self.freq_hz
    }

    pub fn pol(&self, pol: Pol) -> &PolTable {
        match pol {
            Pol::X => &self.x,
            Pol::Y => &self.y,
        }
    }
}

/// All coefficient sets of a model. Immutable once loaded.
pub(crate) struct CoeffTable {
    /// Ascendingly sorted. Never empty.
    freqs: Vec<u32>,
    /// One per frequency, in the same order.
    sets: Vec<CoeffSet>,
}

impl CoeffTable {
    pub(crate) fn load<S: CoeffSource + ?Sized>(source: &S) -> Result<CoeffTable, InitFEEBeamError> {
        let names = source.dataset_names()?;

        // We want all of the available frequencies and the biggest dipole
        // index.
        let mut freqs: Vec<u32> = vec![];
        let mut biggest_dip_index: Option<u8> = None;
        for name in &names {
            let Some(rest) = name.strip_prefix('X') else {
                continue;
            };
            // This is the part between 'X' and '_'.
            let (dip_str, freq_str) = rest.split_once('_').unwrap_or((rest, ""));
            let dipole_index: u8 = dip_str.parse().map_err(|_| InitFEEBeamError::Parse {
                token: dip_str.to_string(),
                key: name.clone(),
            })?;
            biggest_dip_index = biggest_dip_index.max(Some(dipole_index));

            if dipole_index == 1 {
                let freq: u32 = freq_str.parse().map_err(|_| InitFEEBeamError::Parse {
                    token: freq_str.to_string(),
                    key: name.clone(),
                })?;
                freqs.push(freq);
            }
        }

        match biggest_dip_index {
            None => return Err(InitFEEBeamError::NoDipoles),
            Some(NUM_DIPOLES) => (),
            Some(got) => {
                return Err(InitFEEBeamError::DipoleCountMismatch {
                    expected: NUM_DIPOLES,
                    got,
                })
            }
        }
        if freqs.is_empty() {
            return Err(InitFEEBeamError::NoFreqs);
        }
        freqs.sort_unstable();
        freqs.dedup();

        let modes = source.modes()?;
        if modes.nrows() != 3 {
            return Err(InitFEEBeamError::UnsupportedVersion(modes.nrows()));
        }

        let available: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
        let mut sets = Vec::with_capacity(freqs.len());
        for &freq_hz in &freqs {
            let x = load_pol(source, &available, modes.view(), Pol::X, freq_hz)?;
            let y = load_pol(source, &available, modes.view(), Pol::Y, freq_hz)?;
            sets.push(CoeffSet { freq_hz, x, y });
        }

        debug!(
            "Loaded FEE coefficients for {} frequencies ({} Hz to {} Hz), {} modes",
            freqs.len(),
            freqs[0],
            freqs[freqs.len() - 1],
            modes.ncols()
        );

        Ok(CoeffTable { freqs, sets })
    }

    pub(crate) fn freqs(&self) -> &[u32] {
        &self.freqs
    }

    /// The index of the table frequency closest to `freq_hz`. A frequency
    /// exactly between two table frequencies resolves to the lower one.
    pub(crate) fn closest_index(&self, freq_hz: u32) -> usize {
        match self.freqs.binary_search(&freq_hz) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) if i == self.freqs.len() => i - 1,
            Err(i) => {
                let below = freq_hz - self.freqs[i - 1];
                let above = self.freqs[i] - freq_hz;
                if below <= above {
                    i - 1
                } else {
                    i
                }
            }
        }
    }

    pub(crate) fn lookup(&self, freq_hz: u32) -> &CoeffSet {
        &self.sets[self.closest_index(freq_hz)]
    }
}

fn load_pol<S: CoeffSource + ?Sized>(
    source: &S,
    available: &HashSet<&str>,
    modes: ArrayView2<i8>,
    pol: Pol,
    freq_hz: u32,
) -> Result<PolTable, InitFEEBeamError> {
    let mut dipoles = Vec::with_capacity(NUM_DIPOLES.into());
    let mut m = vec![];
    let mut n = vec![];
    for dipole in 1..=NUM_DIPOLES {
        let key = format!("{pol}{dipole}_{freq_hz}");
        if !available.contains(key.as_str()) {
            return Err(InitFEEBeamError::MissingDataset(key));
        }
        let data = source.dataset(&key)?;
        let (coeffs, dip_m, dip_n) = parse_dipole(&key, data.view(), modes)?;
        if dip_m.len() > m.len() {
            m = dip_m;
            n = dip_n;
        }
        dipoles.push(coeffs);
    }

    Ok(PolTable { dipoles, m, n })
}

/// Split a dataset's columns into S=1 and S=2 modes, and convert each
/// (amplitude, phase) pair into a complex number. Also returns the M and N of
/// the S=1 modes.
fn parse_dipole(
    key: &str,
    data: ArrayView2<f64>,
    modes: ArrayView2<i8>,
) -> Result<(DipoleCoeffs, Vec<i8>, Vec<i8>), InitFEEBeamError> {
    let (rows, n_coeffs) = data.dim();
    if rows != 2 {
        return Err(InitFEEBeamError::DatasetShape {
            key: key.to_string(),
            exp: 2,
            got: rows,
        });
    }
    if n_coeffs > modes.ncols() {
        return Err(InitFEEBeamError::TooManyCoeffs {
            key: key.to_string(),
            got: n_coeffs,
            max: modes.ncols(),
        });
    }

    // Indices of S=1 and S=2 coefficients.
    let mut s1_list = vec![];
    let mut s2_list = vec![];
    let mut ms = vec![];
    let mut ns = vec![];
    for i in 0..n_coeffs {
        if modes[[0, i]] <= 1 {
            s1_list.push(i);
            ms.push(modes[[1, i]]);
            ns.push(modes[[2, i]]);
        } else {
            s2_list.push(i);
        }
    }
    if s1_list.len() != s2_list.len() || s2_list.len() != n_coeffs / 2 {
        return Err(InitFEEBeamError::S1S2CountMismatch {
            key: key.to_string(),
            expected: n_coeffs / 2,
            got_s1: s1_list.len(),
            got_s2: s2_list.len(),
        });
    }
    for ((&index, &m), &n) in s1_list.iter().zip(ms.iter()).zip(ns.iter()) {
        if n < 1 || m.unsigned_abs() > n.unsigned_abs() {
            return Err(InitFEEBeamError::BadMode { index, m, n });
        }
    }

    let to_complex = |&i: &usize| data[[0, i]] * c64::cis(data[[1, i]].to_radians());
    let coeffs = DipoleCoeffs {
        q1: s1_list.iter().map(to_complex).collect(),
        q2: s2_list.iter().map(to_complex).collect(),
    };
    Ok((coeffs, ms, ns))
}
