// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning combined coefficients into Jones matrices, and what can be done to
//! those Jones matrices afterwards (zenith normalisation and parallactic-angle
//! correction).

use std::f64::consts::FRAC_PI_2;

use marlu::{AzEl, Jones};
use num_complex::Complex64 as c64;

use super::{
    harmonics::{calc_sigmas, AzimuthalPhases},
    types::{BowtieCoefficients, PolCoefficients},
};
use crate::legendre::Legendre;

/// Actually calculate a Jones matrix. All other "calc" functions use this
/// function.
///
/// Row 0 is the X (EW) dipole and row 1 the Y (NS) dipole; column 0 is the
/// theta-hat component and column 1 the phi-hat component.
pub(super) fn calc_jones_direct(
    az_rad: f64,
    za_rad: f64,
    coeffs: &BowtieCoefficients,
    norm_matrix: Option<&Jones<f64>>,
) -> Jones<f64> {
    // Convert azimuth to FEKO phi (East through North).
    let phi_rad = FRAC_PI_2 - az_rad;
    let n_max = coeffs.n_max();
    let legendre = Legendre::new(n_max, za_rad);
    let phases = AzimuthalPhases::new(n_max, phi_rad);

    let (j00, j01) = calc_sigmas(za_rad, &coeffs.x, &legendre, &phases);
    let (j10, j11) = calc_sigmas(za_rad, &coeffs.y, &legendre, &phases);
    let mut jones = [j00, j01, j10, j11];
    if let Some(norm) = norm_matrix {
        jones.iter_mut().zip(norm.iter()).for_each(|(j, n)| *j /= n);
    }
    Jones::from(jones)
}

/// The zenith response of the given coefficients, with each entry taken at
/// the azimuth where it peaks. Entries are magnitudes. `None` is returned if
/// any entry is zero or not finite, as nothing could be normalised with it.
pub(super) fn calc_zenith_norm_jones(
    x: &PolCoefficients,
    y: &PolCoefficients,
) -> Option<Jones<f64>> {
    // Azimuth angles at which Jones components are maximum.
    let max_phi = [0.0, -FRAC_PI_2, FRAC_PI_2, 0.0];
    let n_max = x.n_max.max(y.n_max);
    let legendre = Legendre::new(n_max, 0.0);

    let sigmas = |coeffs: &PolCoefficients, phi: f64| {
        calc_sigmas(0.0, coeffs, &legendre, &AzimuthalPhases::new(n_max, phi))
    };
    let (j00, _) = sigmas(x, max_phi[0]);
    let (_, j01) = sigmas(x, max_phi[1]);
    let (j10, _) = sigmas(y, max_phi[2]);
    let (_, j11) = sigmas(y, max_phi[3]);

    let mut norm = [c64::default(); 4];
    for (n, j) in norm.iter_mut().zip([j00, j01, j10, j11]) {
        let mag = j.norm();
        if !mag.is_finite() || mag == 0.0 {
            return None;
        }
        *n = c64::new(mag, 0.0);
    }
    Some(Jones::from(norm))
}

/// Rotate a beam-response Jones matrix by a parallactic angle \[radians\].
/// Also re-arrange the Jones matrix if we need to; when `iau_order` is `true`,
/// then the beam response is [NS-NS NS-EW EW-NS EW-EW]. Otherwise it is [EW-EW
/// EW-NS NS-EW NS-NS].
pub fn rotate_by_parallactic_angle(para_angle_rad: f64, iau_order: bool, jones: &mut Jones<f64>) {
    let (s_rot, c_rot) = para_angle_rad.sin_cos();
    *jones = if iau_order {
        Jones::from([
            jones[2] * -c_rot + jones[3] * s_rot,
            jones[2] * -s_rot + jones[3] * -c_rot,
            jones[0] * -c_rot + jones[1] * s_rot,
            jones[0] * -s_rot + jones[1] * -c_rot,
        ])
    } else {
        Jones::from([
            jones[0] * -s_rot + jones[1] * -c_rot,
            jones[0] * -c_rot + jones[1] * s_rot,
            jones[2] * -s_rot + jones[3] * -c_rot,
            jones[2] * -c_rot + jones[3] * s_rot,
        ])
    };
}

/// Apply the parallactic-angle correction to a beam-response Jones matrix
/// (when also given its corresponding direction and the latitude of the
/// array). See [`rotate_by_parallactic_angle`] for the ordering.
pub fn apply_parallactic_correction(
    az_rad: f64,
    za_rad: f64,
    latitude_rad: f64,
    iau_order: bool,
    jones: &mut Jones<f64>,
) {
    let para_angle = AzEl::from_radians(az_rad, FRAC_PI_2 - za_rad)
        .to_hadec(latitude_rad)
        .get_parallactic_angle(latitude_rad);
    rotate_by_parallactic_angle(para_angle, iau_order, jones);
}
