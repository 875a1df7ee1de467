// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Fully Embedded Element (FEE) primary beam code for the Murchison Widefield
Array.

The entry point is [`FEEBeam`]; construct one from a beam file (or any
[`CoeffSource`]), describe a tile with a [`TileConfig`] and ask for Jones
matrices with [`FEEBeam::calc_jones_array`].
 */

mod constants;
mod direction;
pub mod fee;
mod ffi;
pub(crate) mod legendre;
mod types;

pub use constants::MWA_LAT_RAD;
pub use direction::Direction;
pub use fee::*;
pub use ffi::ERROR_BUFFER_LEN;
pub use types::Pol;

// Re-exports.
pub use marlu::{AzEl, Jones};
