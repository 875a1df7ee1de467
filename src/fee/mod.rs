// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to implement the MWA Fully Embedded Element (FEE) beam, a.k.a. "the
//! 2016 beam".

mod cache;
mod error;
mod ffi;
mod harmonics;
mod jones;
mod source;
mod table;
#[cfg(test)]
pub(crate) mod test_model;
mod tile;
mod types;

pub use error::{ErrorKind, FEEBeamError, InitFEEBeamError};
pub use jones::{apply_parallactic_correction, rotate_by_parallactic_angle};
#[cfg(feature = "hdf5")]
pub use source::Hdf5Source;
pub use source::{CoeffSource, MemorySource};
pub use table::{CoeffSet, DipoleCoeffs, PolTable};
pub use tile::TileConfig;

use std::{path::Path, sync::Arc};

use marlu::Jones;
use rayon::prelude::*;

use crate::direction::Direction;
use cache::CoeffCache;
use jones::calc_jones_direct;
use table::CoeffTable;
use types::BowtieCoefficients;

/// The main struct to be used for calculating Jones matrices.
#[allow(clippy::upper_case_acronyms)]
pub struct FEEBeam {
    /// Every coefficient of the model, indexed by frequency. Read-only.
    table: CoeffTable,
    /// A cache of X and Y coefficients combined for a tile configuration.
    coeff_cache: CoeffCache,
}

impl FEEBeam {
    /// Given the path to an FEE beam file, create a new [`FEEBeam`] struct.
    /// Reading files needs the "hdf5" feature.
    pub fn new<T: AsRef<Path>>(file: T) -> Result<Self, InitFEEBeamError> {
        let file = file.as_ref();
        // Check this here; HDF5's own complaint is hard to read.
        if !file.exists() {
            return Err(InitFEEBeamError::BeamFileDoesntExist(
                file.display().to_string(),
            ));
        }

        cfg_if::cfg_if! {
            if #[cfg(feature = "hdf5")] {
                log::debug!("Reading FEE beam file {}", file.display());
                let source = Hdf5Source::open(file)?;
                Self::from_source(&source)
            } else {
                Err(InitFEEBeamError::NoFileReader(file.display().to_string()))
            }
        }
    }

    /// Create a new [`FEEBeam`] struct from the `MWA_BEAM_FILE` environment
    /// variable.
    pub fn new_from_env() -> Result<Self, InitFEEBeamError> {
        match std::env::var("MWA_BEAM_FILE") {
            Ok(f) => Self::new(f),
            Err(e) => Err(InitFEEBeamError::MwaBeamFileVarError(e)),
        }
    }

    /// Create a new [`FEEBeam`] struct from any source of FEE coefficients.
    /// Everything is read and checked here; nothing is read from `source`
    /// afterwards.
    pub fn from_source<S: CoeffSource + ?Sized>(source: &S) -> Result<Self, InitFEEBeamError> {
        Ok(Self {
            table: CoeffTable::load(source)?,
            coeff_cache: CoeffCache::default(),
        })
    }

    /// Get the frequencies defined in the model that was used to create this
    /// [`FEEBeam`]. They are ascendingly sorted.
    pub fn get_freqs(&self) -> &[u32] {
        self.table.freqs()
    }

    /// Given a frequency in Hz, find the closest frequency that is defined in
    /// the model. A frequency exactly between two model frequencies gives the
    /// lower one.
    pub fn find_closest_freq(&self, desired_freq_hz: u32) -> u32 {
        self.table.freqs()[self.table.closest_index(desired_freq_hz)]
    }

    /// Get all of the coefficients at the model frequency closest to
    /// `desired_freq_hz`.
    pub fn lookup(&self, desired_freq_hz: u32) -> &CoeffSet {
        self.table.lookup(desired_freq_hz)
    }

    /// Get [`BowtieCoefficients`] for the input parameters, building them if
    /// they aren't cached.
    ///
    /// Note that specified frequencies are "rounded" to frequencies that are
    /// defined in the model.
    fn get_coeffs(&self, desired_freq_hz: u32, tile: &TileConfig) -> Arc<BowtieCoefficients> {
        let set = self.table.lookup(desired_freq_hz);
        self.coeff_cache
            .get_or_compute(tile.cache_key(set.freq_hz), || {
                BowtieCoefficients::new(set, tile)
            })
    }

    /// Get the Jones matrix of `tile` in one direction. Without
    /// `latitude_rad`, rows are the X and Y dipoles and columns the θ̂ and φ̂
    /// sky components, as the model itself defines them.
    ///
    /// With `latitude_rad` (the telescope's latitude \[radians\]) the matrix is
    /// rotated by the parallactic angle of the direction, and `iau_order` puts
    /// the north-south dipole first. `iau_order` is ignored otherwise.
    ///
    /// If `norm_to_zenith` is true, every entry of the Jones matrix is divided
    /// by the magnitude of the same tile's response at zenith.
    pub fn calc_jones<D: Direction>(
        &self,
        direction: D,
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
    ) -> Result<Jones<f64>, FEEBeamError> {
        self.calc_jones_pair(
            direction.az(),
            direction.za(),
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
        )
    }

    /// The same as [`FEEBeam::calc_jones`], but with the azimuth and zenith
    /// angle given separately \[radians\].
    #[allow(clippy::too_many_arguments)]
    pub fn calc_jones_pair(
        &self,
        az_rad: f64,
        za_rad: f64,
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
    ) -> Result<Jones<f64>, FEEBeamError> {
        let mut result = [Jones::default()];
        self.fill_jones(
            rayon::iter::once((az_rad, za_rad)),
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
            &mut result,
        )?;
        Ok(result[0])
    }

    /// [`FEEBeam::calc_jones`] for many directions, spread over the rayon
    /// thread pool (`RAYON_NUM_THREADS` sets its size). Coefficients for
    /// `tile` are combined once and shared by every direction.
    ///
    /// The results are in the same order as `directions`. If any direction
    /// fails, no results are returned.
    pub fn calc_jones_array<D: Direction + Sync>(
        &self,
        directions: &[D],
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
    ) -> Result<Vec<Jones<f64>>, FEEBeamError> {
        let mut results = alloc_results(directions.len())?;
        self.calc_jones_array_inner(
            directions,
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
            &mut results,
        )?;
        Ok(results)
    }

    /// [`FEEBeam::calc_jones_array`], writing into `results` (which must be as
    /// long as `directions`). If an error is returned, the contents of
    /// `results` are unspecified.
    #[allow(clippy::too_many_arguments)]
    pub fn calc_jones_array_inner<D: Direction + Sync>(
        &self,
        directions: &[D],
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
        results: &mut [Jones<f64>],
    ) -> Result<(), FEEBeamError> {
        check_lengths(directions.len(), directions.len(), results.len())?;
        self.fill_jones(
            directions.par_iter().map(|d| (d.az(), d.za())),
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
            results,
        )
    }

    /// Calculate the Jones matrices for many directions given a pointing, with
    /// azimuths and zenith angles \[radians\] in separate slices.
    #[allow(clippy::too_many_arguments)]
    pub fn calc_jones_array_pair(
        &self,
        az_rad: &[f64],
        za_rad: &[f64],
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
    ) -> Result<Vec<Jones<f64>>, FEEBeamError> {
        check_lengths(az_rad.len(), za_rad.len(), az_rad.len())?;
        let mut results = alloc_results(az_rad.len())?;
        self.calc_jones_array_pair_inner(
            az_rad,
            za_rad,
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
            &mut results,
        )?;
        Ok(results)
    }

    /// [`FEEBeam::calc_jones_array_pair`], writing into `results`. If an error
    /// is returned, the contents of `results` are unspecified.
    #[allow(clippy::too_many_arguments)]
    pub fn calc_jones_array_pair_inner(
        &self,
        az_rad: &[f64],
        za_rad: &[f64],
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
        results: &mut [Jones<f64>],
    ) -> Result<(), FEEBeamError> {
        check_lengths(az_rad.len(), za_rad.len(), results.len())?;
        self.fill_jones(
            az_rad.par_iter().copied().zip(za_rad.par_iter().copied()),
            freq_hz,
            tile,
            norm_to_zenith,
            latitude_rad,
            iau_order,
            results,
        )
    }

    /// Everything that calculates Jones matrices ends up here. The coefficients
    /// are obtained (from the cache, if possible) on the calling thread before
    /// directions are fanned out.
    #[allow(clippy::too_many_arguments)]
    fn fill_jones<I>(
        &self,
        directions: I,
        freq_hz: u32,
        tile: &TileConfig,
        norm_to_zenith: bool,
        latitude_rad: Option<f64>,
        iau_order: bool,
        results: &mut [Jones<f64>],
    ) -> Result<(), FEEBeamError>
    where
        I: IndexedParallelIterator<Item = (f64, f64)>,
    {
        let coeffs = self.get_coeffs(freq_hz, tile);

        // If we're normalising the beam, get the normalisation Jones matrix here.
        let norm_jones = match norm_to_zenith {
            true => Some(coeffs.zenith_norm.ok_or(
                FEEBeamError::SingularZenithResponse {
                    freq_hz: coeffs.freq_hz,
                },
            )?),
            false => None,
        };

        directions
            .zip(results.par_iter_mut())
            .try_for_each(|((az, za), result)| {
                let mut jones = calc_jones_direct(az, za, &coeffs, norm_jones.as_ref());
                if let Some(latitude_rad) = latitude_rad {
                    apply_parallactic_correction(az, za, latitude_rad, iau_order, &mut jones);
                }
                if !jones.iter().all(|j| j.is_finite()) {
                    return Err(FEEBeamError::NonFiniteResponse { az, za });
                }
                *result = jones;
                Ok(())
            })
    }

    /// Empty the cached dipole coefficients (and their normalisation Jones
    /// matrices) to recover memory.
    pub fn empty_cache(&self) {
        self.coeff_cache.clear();
    }

    /// The number of distinct tile configurations (at a model frequency)
    /// currently cached.
    pub fn num_cached_coeffs(&self) -> usize {
        self.coeff_cache.len()
    }

    /// The number of times combined coefficients have been built over the life
    /// of this [`FEEBeam`].
    pub fn num_coeff_builds(&self) -> usize {
        self.coeff_cache.num_builds()
    }
}

fn check_lengths(num_az: usize, num_za: usize, num_results: usize) -> Result<(), FEEBeamError> {
    if num_az == 0 || num_za == 0 {
        return Err(FEEBeamError::EmptyInput);
    }
    if num_az != num_za {
        return Err(FEEBeamError::DirectionCountMismatch {
            az: num_az,
            za: num_za,
        });
    }
    if num_results != num_az {
        return Err(FEEBeamError::ResultsLengthMismatch {
            expected: num_az,
            got: num_results,
        });
    }
    Ok(())
}

fn alloc_results(num_directions: usize) -> Result<Vec<Jones<f64>>, FEEBeamError> {
    let mut results = Vec::new();
    results
        .try_reserve_exact(num_directions)
        .map_err(|_| FEEBeamError::Allocation(num_directions))?;
    results.resize(num_directions, Jones::default());
    Ok(results)
}
