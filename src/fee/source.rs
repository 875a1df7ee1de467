// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where FEE coefficients come from.
//!
//! An FEE model is a bag of named 2D datasets:
//!
//! * `modes`: 3 rows (mode type S, M, N) of `i8`, one column per spherical
//!   wave mode;
//! * `X{dipole}_{freq_hz}` and `Y{dipole}_{freq_hz}` for dipoles 1 to 16: 2
//!   rows (amplitude, phase in degrees) of `f64`, one column per mode.
//!
//! Anything that can hand these out can back an [`FEEBeam`](super::FEEBeam).

use std::collections::HashMap;

use ndarray::prelude::*;

use super::InitFEEBeamError;

/// A keyed lookup of FEE model datasets.
pub trait CoeffSource {
    /// The names of every dataset available (including `modes`).
    fn dataset_names(&self) -> Result<Vec<String>, InitFEEBeamError>;

    /// The `modes` table.
    fn modes(&self) -> Result<Array2<i8>, InitFEEBeamError>;

    /// A coefficient dataset, e.g. `X16_51200000`.
    fn dataset(&self, key: &str) -> Result<Array2<f64>, InitFEEBeamError>;
}

/// An FEE model held in memory. Mostly useful for testing and for models that
/// have been obtained from somewhere other than a file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    modes: Option<Array2<i8>>,
    datasets: HashMap<String, Array2<f64>>,
}

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    /// Set (or replace) the `modes` table.
    pub fn set_modes(&mut self, modes: Array2<i8>) {
        self.modes = Some(modes);
    }

    /// Add (or replace) a coefficient dataset.
    pub fn insert<S: Into<String>>(&mut self, key: S, data: Array2<f64>) {
        self.datasets.insert(key.into(), data);
    }

    /// Remove a coefficient dataset, returning it if it was there.
    pub fn remove(&mut self, key: &str) -> Option<Array2<f64>> {
        self.datasets.remove(key)
    }
}

impl CoeffSource for MemorySource {
    fn dataset_names(&self) -> Result<Vec<String>, InitFEEBeamError> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        if self.modes.is_some() {
            names.push("modes".to_string());
        }
        Ok(names)
    }

    fn modes(&self) -> Result<Array2<i8>, InitFEEBeamError> {
        self.modes.clone().ok_or(InitFEEBeamError::MissingModes)
    }

    fn dataset(&self, key: &str) -> Result<Array2<f64>, InitFEEBeamError> {
        self.datasets
            .get(key)
            .cloned()
            .ok_or_else(|| InitFEEBeamError::MissingDataset(key.to_string()))
    }
}

#[cfg(feature = "hdf5")]
pub use hdf5_source::Hdf5Source;

#[cfg(feature = "hdf5")]
mod hdf5_source {
    use std::path::Path;

    use ndarray::prelude::*;

    use super::CoeffSource;
    use crate::fee::InitFEEBeamError;

    /// An FEE model in an HDF5 file, e.g. `mwa_full_embedded_element_pattern.h5`.
    pub struct Hdf5Source {
        file: hdf5::File,
    }

    impl Hdf5Source {
        pub fn open<T: AsRef<Path>>(file: T) -> Result<Hdf5Source, InitFEEBeamError> {
            // so that libhdf5 doesn't print errors to stdout
            hdf5::silence_errors(true);

            let file = hdf5::File::open(file)?;
            Ok(Hdf5Source { file })
        }
    }

    impl CoeffSource for Hdf5Source {
        fn dataset_names(&self) -> Result<Vec<String>, InitFEEBeamError> {
            Ok(self.file.member_names()?)
        }

        fn modes(&self) -> Result<Array2<i8>, InitFEEBeamError> {
            if !self.file.link_exists("modes") {
                return Err(InitFEEBeamError::MissingModes);
            }
            Ok(self.file.dataset("modes")?.read_2d()?)
        }

        fn dataset(&self, key: &str) -> Result<Array2<f64>, InitFEEBeamError> {
            if !self.file.link_exists(key) {
                return Err(InitFEEBeamError::MissingDataset(key.to_string()));
            }
            Ok(self.file.dataset(key)?.read_2d()?)
        }
    }
}
