// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tile configurations (dipole delays and gains) and the complex excitations
//! they imply.

use std::f64::consts::TAU;

use num_complex::Complex64 as c64;

use super::FEEBeamError;
use crate::{
    constants::{DEAD_DIPOLE_DELAY, DELAY_STEP},
    types::CacheKey,
};

/// The delays and dipole gains of an MWA tile.
///
/// `delays` apply to each dipole in an MWA tile in the M&C order; see
/// <https://wiki.mwatelescope.org/pages/viewpage.action?pageId=48005139>.
/// Delays are in units of the beamformer delay step (435 ps); a delay of 32
/// marks a dead dipole. Amps are dipole gains (usually 1 or 0), not digital
/// gains. If 16 amps are given, then these map 1:1 with dipoles, otherwise the
/// first 16 are for X dipole elements, and the next 16 are for Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileConfig {
    delays: [u32; 16],
    /// Always 32; X then Y.
    amps: [f64; 32],
}

impl TileConfig {
    pub fn new(delays: &[u32], amps: &[f64]) -> Result<TileConfig, FEEBeamError> {
        let delays: &[u32; 16] = delays
            .try_into()
            .map_err(|_| FEEBeamError::IncorrectDelaysLength(delays.len()))?;
        if !(amps.len() == 16 || amps.len() == 32) {
            return Err(FEEBeamError::IncorrectAmpsLength(amps.len()));
        }
        if let Some((dipole, &delay)) = delays
            .iter()
            .enumerate()
            .find(|&(_, &d)| d > DEAD_DIPOLE_DELAY)
        {
            return Err(FEEBeamError::DelayOutOfRange { dipole, delay });
        }
        if let Some((index, &amp)) = amps.iter().enumerate().find(|&(_, a)| !a.is_finite()) {
            return Err(FEEBeamError::NonFiniteAmp { index, amp });
        }

        Ok(TileConfig {
            delays: *delays,
            amps: fix_amps(amps, delays),
        })
    }

    pub fn delays(&self) -> &[u32; 16] {
        &self.delays
    }

    /// The expanded dipole gains; X then Y. Dead dipoles have a gain of 0.
    pub fn amps(&self) -> &[f64; 32] {
        &self.amps
    }

    pub(crate) fn cache_key(&self, freq_hz: u32) -> CacheKey {
        CacheKey::new(freq_hz, &self.delays, &self.amps)
    }

    /// The complex excitation of each dipole element at the given frequency
    /// (X then Y).
    pub(crate) fn weights(&self, freq_hz: u32) -> [c64; 32] {
        let mut weights = [c64::default(); 32];
        weights
            .iter_mut()
            .zip(self.amps.iter())
            .zip(self.delays.iter().cycle())
            .for_each(|((w, &amp), &delay)| {
                let phase = TAU * freq_hz as f64 * (-(delay as f64)) * DELAY_STEP;
                *w = amp * c64::cis(phase);
            });
        weights
    }
}

/// Ensure that any delays of 32 have an amplitude (dipole gain) of 0. The
/// results are bad otherwise! Also ensure that we have 32 dipole gains (amps)
/// here.
fn fix_amps(amps: &[f64], delays: &[u32; 16]) -> [f64; 32] {
    let mut full_amps: [f64; 32] = [1.0; 32];
    full_amps
        .iter_mut()
        .zip(amps.iter().cycle())
        .zip(delays.iter().cycle())
        .for_each(|((out_amp, &in_amp), &delay)| {
            if delay == DEAD_DIPOLE_DELAY {
                *out_amp = 0.0;
            } else {
                *out_amp = in_amp;
            }
        });
    full_amps
}
