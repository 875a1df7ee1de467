// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the FEE beam.

use thiserror::Error;

/// Problems encountered while loading an FEE beam model.
#[derive(Error, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub enum InitFEEBeamError {
    #[error("Specified beam file '{0}' doesn't exist")]
    BeamFileDoesntExist(String),

    #[error("Can't read beam file '{0}'; mwa_fee_beam was compiled without the \"hdf5\" feature")]
    NoFileReader(String),

    #[error("No datasets started with a 'X'; is there any data in the model?")]
    NoDipoles,

    #[error("No frequency information was gathered from the datasets; is there any data in the model?")]
    NoFreqs,

    /// Incorrect number of dipoles in the model.
    #[error("Got information on {got} dipoles from the model, but expected {expected}")]
    DipoleCountMismatch { expected: u8, got: u8 },

    #[error("Dataset '{0}' is missing from the model")]
    MissingDataset(String),

    /// An error associated with parsing part of a dataset name into a number.
    #[error("Couldn't parse '{token}' (from dataset '{key}') to a number")]
    Parse { token: String, key: String },

    #[error("Unexpected shape of dataset '{key}': expected {exp} rows, got {got}")]
    DatasetShape { key: String, exp: usize, got: usize },

    #[error("Dataset '{key}' has {got} coefficients, but the 'modes' table only describes {max}")]
    TooManyCoeffs { key: String, got: usize, max: usize },

    #[error("Dataset '{key}': expected {expected} coefficients of each mode type, but got {got_s1} S=1 and {got_s2} S=2")]
    S1S2CountMismatch {
        key: String,
        expected: usize,
        got_s1: usize,
        got_s2: usize,
    },

    #[error("Mode {index} of the 'modes' table has M = {m}, N = {n}; need N >= 1 and |M| <= N")]
    BadMode { index: usize, m: i8, n: i8 },

    #[error("The model doesn't have a 'modes' table")]
    MissingModes,

    #[error("Unsupported model schema: the 'modes' table has {0} rows, but only the 3-row (type, M, N) layout is understood")]
    UnsupportedVersion(usize),

    /// An error associated with the MWA_BEAM_FILE environment variable.
    #[error("Problem with the MWA_BEAM_FILE variable: {0}")]
    MwaBeamFileVarError(#[from] std::env::VarError),

    /// An error associated with the hdf5 crate.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

/// Problems encountered while computing beam responses.
#[derive(Error, Debug, Clone, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum FEEBeamError {
    #[error("delay vector length must be 16, got {0}")]
    IncorrectDelaysLength(usize),

    #[error("amplitude vector length must be 16 or 32, got {0}")]
    IncorrectAmpsLength(usize),

    #[error("delay of dipole {dipole} must be between 0 and 32, got {delay}")]
    DelayOutOfRange { dipole: usize, delay: u32 },

    #[error("amplitude {index} must be finite, got {amp}")]
    NonFiniteAmp { index: usize, amp: f64 },

    #[error("no directions were supplied")]
    EmptyInput,

    #[error("got {az} azimuths but {za} zenith angles")]
    DirectionCountMismatch { az: usize, za: usize },

    #[error("results buffer has space for {got} Jones matrices, but {expected} directions were supplied")]
    ResultsLengthMismatch { expected: usize, got: usize },

    #[error("the zenith response at {freq_hz} Hz can't be normalised (zero or non-finite); are all amplitudes zero?")]
    SingularZenithResponse { freq_hz: u32 },

    #[error("beam response is not finite at az = {az} rad, za = {za} rad")]
    NonFiniteResponse { az: f64, za: f64 },

    #[error("couldn't allocate space for {0} Jones matrices")]
    Allocation(usize),
}

/// The broad category of an [`FEEBeamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied something invalid.
    Configuration,
    /// The beam maths produced something unusable.
    Computation,
    /// The system couldn't provide the requested resources.
    Resource,
}

impl FEEBeamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FEEBeamError::IncorrectDelaysLength(_)
            | FEEBeamError::IncorrectAmpsLength(_)
            | FEEBeamError::DelayOutOfRange { .. }
            | FEEBeamError::NonFiniteAmp { .. }
            | FEEBeamError::EmptyInput
            | FEEBeamError::DirectionCountMismatch { .. }
            | FEEBeamError::ResultsLengthMismatch { .. } => ErrorKind::Configuration,

            FEEBeamError::SingularZenithResponse { .. } | FEEBeamError::NonFiniteResponse { .. } => {
                ErrorKind::Computation
            }

            FEEBeamError::Allocation(_) => ErrorKind::Resource,
        }
    }
}
