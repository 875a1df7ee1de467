// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! This program loads each of the given FEE beam files and evaluates the
//! zenith-normalised response at zenith for every frequency in the file. Any
//! problem with the coefficients (bad modes, dipoles that can't be normalised,
//! non-finite results) is reported. The exit code is non-zero if any file
//! failed.

use log::{debug, info};

use mwa_fee_beam::{FEEBeam, FEEBeamError, InitFEEBeamError, TileConfig};

#[derive(Debug, thiserror::Error)]
enum VerifyError {
    #[error(transparent)]
    Init(#[from] InitFEEBeamError),

    #[error("freq {freq_hz} Hz: {err}")]
    Calc { freq_hz: u32, err: FEEBeamError },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut num_failed = 0;
    // Test each input file.
    for beam_file in std::env::args().skip(1) {
        if let Err(e) = test_file(&beam_file) {
            println!("File '{beam_file}' failed: {e}");
            num_failed += 1;
        }
    }
    if num_failed > 0 {
        std::process::exit(1);
    }
}

fn test_file(beam_file: &str) -> Result<(), VerifyError> {
    info!("Testing file '{beam_file}'");
    let beam = FEEBeam::new(beam_file)?;
    // Every dipole is used with unit gain; the zenith-normalised response at
    // zenith must then be finite.
    let tile = TileConfig::new(&[0; 16], &[1.0; 16]).map_err(|err| VerifyError::Calc {
        freq_hz: 0,
        err,
    })?;
    for &freq_hz in beam.get_freqs() {
        debug!("Testing freq {freq_hz}");
        let jones = beam
            .calc_jones_pair(0.0, 0.0, freq_hz, &tile, true, None, false)
            .map_err(|err| VerifyError::Calc { freq_hz, err })?;
        let magnitudes: Vec<f64> = jones.iter().map(|j| j.norm()).collect();
        debug!("{freq_hz} Hz: |J| = {magnitudes:?}");
    }
    // Nothing needs to be kept around between files.
    beam.empty_cache();

    println!(
        "File '{beam_file}' is all good! ({} frequencies)",
        beam.get_freqs().len()
    );
    Ok(())
}
