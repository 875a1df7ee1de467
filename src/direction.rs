// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::FRAC_PI_2;

use marlu::AzEl;

/// A sky direction in the local horizontal frame. MWA beam codes historically
/// take (azimuth, zenith angle) rather than (azimuth, elevation), so that's
/// what this trait hands out. Both are in radians.
pub trait Direction: Copy {
    /// Get the azimuth of this direction.
    fn az(&self) -> f64;

    /// Get the zenith angle of this direction.
    fn za(&self) -> f64;

    /// Get the elevation of this direction.
    fn el(&self) -> f64 {
        FRAC_PI_2 - self.za()
    }
}

impl<D: Direction> Direction for &D {
    fn az(&self) -> f64 {
        (*self).az()
    }

    fn za(&self) -> f64 {
        (*self).za()
    }
}

impl Direction for AzEl {
    fn az(&self) -> f64 {
        self.az
    }

    fn za(&self) -> f64 {
        FRAC_PI_2 - self.el
    }

    fn el(&self) -> f64 {
        self.el
    }
}

/// A tuple of floats is (azimuth, zenith angle).
impl Direction for (f64, f64) {
    fn az(&self) -> f64 {
        self.0
    }

    fn za(&self) -> f64 {
        self.1
    }
}
