// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! C-compatible functions for the FEE beam.
//!
//! Functions that can fail return a status: 0 for success, 1 for an error, 2
//! for a path that isn't valid UTF-8 and -1 for a caught panic. A description
//! of the failure goes into `error_str`, which must be null or have room for
//! `ERROR_BUFFER_LEN` (200) bytes.


use std::{ffi::CStr, os::raw::c_char, slice};

use marlu::Jones;

use super::{FEEBeam, FEEBeamError, TileConfig};
use crate::{
    constants::MWA_LAT_RAD,
    ffi::{c_bool, ffi_error, guard, write_error},
};

/// Load an FEE beam model from the file at `hdf5_file` (a null-terminated
/// path). On success, `*fee_beam` points to a new beam that the caller owns and
/// must release with `free_fee_beam`; on failure it is left alone and a
/// message is written to `error_str` (null, or at least 200 bytes).
///
/// Returns 0 on success, 1 if the model couldn't be loaded, 2 if the path isn't
/// UTF-8 and -1 if something panicked.
#[no_mangle]
pub unsafe extern "C" fn new_fee_beam(
    hdf5_file: *const c_char,
    fee_beam: *mut *mut FEEBeam,
    error_str: *mut c_char,
) -> i32 {
    guard(error_str, || {
        if hdf5_file.is_null() || fee_beam.is_null() {
            write_error("new_fee_beam was given a null pointer", error_str);
            return 1;
        }
        let path = match CStr::from_ptr(hdf5_file).to_str() {
            Ok(p) => p,
            Err(e) => {
                write_error(&e.to_string(), error_str);
                return 2;
            }
        };
        let beam = ffi_error!(FEEBeam::new(path), error_str);
        *fee_beam = Box::into_raw(Box::new(beam));
        0
    })
}

/// The same as `new_fee_beam`, but the model path is taken from the
/// `MWA_BEAM_FILE` environment variable.
#[no_mangle]
pub unsafe extern "C" fn new_fee_beam_from_env(
    fee_beam: *mut *mut FEEBeam,
    error_str: *mut c_char,
) -> i32 {
    guard(error_str, || {
        if fee_beam.is_null() {
            write_error("new_fee_beam_from_env was given a null pointer", error_str);
            return 1;
        }
        let beam = ffi_error!(FEEBeam::new_from_env(), error_str);
        *fee_beam = Box::into_raw(Box::new(beam));
        0
    })
}

/// Evaluate the beam of one tile in one direction.
///
/// * `az_rad`, `za_rad`: the direction \[radians\]. Zenith angles beyond the
///   horizon are allowed.
/// * `freq_hz`: rounded to the nearest frequency in the model.
/// * `delays`: exactly 16 beamformer delays, in M&C dipole order (see
///   <https://wiki.mwatelescope.org/pages/viewpage.action?pageId=48005139>).
///   A delay of 32 switches a dipole off.
/// * `amps`, `num_amps`: 16 gains (shared by the X and Y element of each
///   dipole) or 32 gains (all X elements, then all Y elements).
/// * `norm_to_zenith`, `apply_parallactic`: 0 or 1. The parallactic-angle
///   correction uses the MWA's latitude and keeps the X dipole first.
/// * `jones`: room for 8 doubles. The complex entries j00, j01, j10 and j11
///   are written as (re, im) pairs, but only if the call succeeds.
/// * `error_str`: null, or at least 200 bytes for an error message.
///
/// Returns 0 on success, 1 on an error and -1 if something panicked.
#[no_mangle]
pub unsafe extern "C" fn calc_jones(
    fee_beam: *mut FEEBeam,
    az_rad: f64,
    za_rad: f64,
    freq_hz: u32,
    delays: *const u32,
    amps: *const f64,
    num_amps: u32,
    norm_to_zenith: u8,
    apply_parallactic: u8,
    jones: *mut f64,
    error_str: *mut c_char,
) -> i32 {
    guard(error_str, || {
        let beam = match fee_beam.as_ref() {
            Some(b) => b,
            None => {
                write_error("calc_jones was given a null beam pointer", error_str);
                return 1;
            }
        };
        if delays.is_null() || amps.is_null() || jones.is_null() {
            write_error("calc_jones was given a null pointer", error_str);
            return 1;
        }
        let norm_bool = ffi_error!(c_bool("norm_to_zenith", norm_to_zenith), error_str);
        let latitude_rad = ffi_error!(latitude(apply_parallactic), error_str);
        if num_amps != 16 && num_amps != 32 {
            write_error(
                &FEEBeamError::IncorrectAmpsLength(num_amps as usize).to_string(),
                error_str,
            );
            return 1;
        }
        let delays_s = slice::from_raw_parts(delays, 16);
        let amps_s = slice::from_raw_parts(amps, num_amps as usize);
        let tile = ffi_error!(TileConfig::new(delays_s, amps_s), error_str);

        let j = ffi_error!(
            beam.calc_jones_pair(az_rad, za_rad, freq_hz, &tile, norm_bool, latitude_rad, false),
            error_str
        );
        copy_jones(&[j], slice::from_raw_parts_mut(jones, 8));
        0
    })
}

/// Evaluate the beam of one tile in `num_azza` directions, in parallel
/// (`RAYON_NUM_THREADS` limits the thread count). The arguments are as for
/// `calc_jones`, except that `az_rad` and `za_rad` each hold `num_azza` values
/// and `jones` must have room for `8 * num_azza` doubles. Results are in the
/// same order as the directions.
///
/// Nothing is written to `jones` unless every direction succeeds. Asking for
/// zero directions is an error.
#[no_mangle]
pub unsafe extern "C" fn calc_jones_array(
    fee_beam: *mut FEEBeam,
    num_azza: u32,
    az_rad: *const f64,
    za_rad: *const f64,
    freq_hz: u32,
    delays: *const u32,
    amps: *const f64,
    num_amps: u32,
    norm_to_zenith: u8,
    apply_parallactic: u8,
    jones: *mut f64,
    error_str: *mut c_char,
) -> i32 {
    guard(error_str, || {
        let beam = match fee_beam.as_ref() {
            Some(b) => b,
            None => {
                write_error("calc_jones_array was given a null beam pointer", error_str);
                return 1;
            }
        };
        if num_azza == 0 {
            write_error(&FEEBeamError::EmptyInput.to_string(), error_str);
            return 1;
        }
        if az_rad.is_null() || za_rad.is_null() || delays.is_null() || amps.is_null() || jones.is_null()
        {
            write_error("calc_jones_array was given a null pointer", error_str);
            return 1;
        }
        let norm_bool = ffi_error!(c_bool("norm_to_zenith", norm_to_zenith), error_str);
        let latitude_rad = ffi_error!(latitude(apply_parallactic), error_str);
        if num_amps != 16 && num_amps != 32 {
            write_error(
                &FEEBeamError::IncorrectAmpsLength(num_amps as usize).to_string(),
                error_str,
            );
            return 1;
        }
        let delays_s = slice::from_raw_parts(delays, 16);
        let amps_s = slice::from_raw_parts(amps, num_amps as usize);
        let tile = ffi_error!(TileConfig::new(delays_s, amps_s), error_str);

        let num_azza = num_azza as usize;
        let az = slice::from_raw_parts(az_rad, num_azza);
        let za = slice::from_raw_parts(za_rad, num_azza);
        // Calculate everything before touching the caller's buffer.
        let results = ffi_error!(
            beam.calc_jones_array_pair(az, za, freq_hz, &tile, norm_bool, latitude_rad, false),
            error_str
        );
        copy_jones(&results, slice::from_raw_parts_mut(jones, 8 * num_azza));
        0
    })
}

/// Expose the (ascending) frequencies of the model: `*freqs_ptr` is set to
/// point at them and `*num_freqs` to their count. The frequencies belong to
/// the beam and are valid until `free_fee_beam` is called.
///
/// Returns 0 on success and 1 if any pointer is null.
#[no_mangle]
pub unsafe extern "C" fn get_fee_beam_freqs(
    fee_beam: *mut FEEBeam,
    freqs_ptr: *mut *const u32,
    num_freqs: *mut usize,
) -> i32 {
    let beam = match fee_beam.as_ref() {
        Some(b) => b,
        None => return 1,
    };
    if freqs_ptr.is_null() || num_freqs.is_null() {
        return 1;
    }
    let freqs = beam.get_freqs();
    *freqs_ptr = freqs.as_ptr();
    *num_freqs = freqs.len();
    0
}

/// The model frequency that `freq` \[Hz\] would be rounded to. 0 is returned
/// for a null beam.
#[no_mangle]
pub unsafe extern "C" fn closest_freq(fee_beam: *mut FEEBeam, freq: u32) -> u32 {
    match fee_beam.as_ref() {
        Some(beam) => beam.find_closest_freq(freq),
        None => 0,
    }
}

/// Release a beam made by `new_fee_beam` or `new_fee_beam_from_env`. Nothing
/// may be using it at the same time. A null pointer is ignored.
#[no_mangle]
pub unsafe extern "C" fn free_fee_beam(fee_beam: *mut FEEBeam) {
    if !fee_beam.is_null() {
        drop(Box::from_raw(fee_beam));
    }
}

fn latitude(apply_parallactic: u8) -> Result<Option<f64>, String> {
    Ok(c_bool("apply_parallactic", apply_parallactic)?.then_some(MWA_LAT_RAD))
}

/// Unpack Jones matrices into pairs of doubles.
fn copy_jones(jones: &[Jones<f64>], out: &mut [f64]) {
    out.chunks_exact_mut(8)
        .zip(jones.iter())
        .for_each(|(o, j)| {
            o.copy_from_slice(&[
                j[0].re, j[0].im, j[1].re, j[1].im, j[2].re, j[2].im, j[3].re, j[3].im,
            ])
        });
}
