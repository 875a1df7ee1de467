// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A cache of combined FEE coefficients.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use log::{debug, trace};
use parking_lot::Mutex;

use super::types::BowtieCoefficients;
use crate::types::CacheKey;

type Slot = Arc<OnceLock<Arc<BowtieCoefficients>>>;

/// `CoeffCache` maps a [`CacheKey`] to a slot that is filled at most once.
///
/// The map itself is only locked long enough to find or insert a slot. The
/// (expensive) building of coefficients happens on the slot, so different keys
/// can be built at the same time, while callers asking for a key that is
/// already being built wait for that build and then share its result.
#[derive(Default)]
pub(super) struct CoeffCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    /// The number of times coefficients have been built.
    builds: AtomicUsize,
}

impl CoeffCache {
    /// Get the coefficients for `key`, running `build` if nobody has before.
    ///
    /// `build` must not wait on this cache (or on anything that does), so it
    /// shouldn't use the rayon pool either.
    pub(super) fn get_or_compute<F>(&self, key: CacheKey, build: F) -> Arc<BowtieCoefficients>
    where
        F: FnOnce() -> BowtieCoefficients,
    {
        let slot: Slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key).or_default())
        };

        let mut built = false;
        let coeffs = slot.get_or_init(|| {
            built = true;
            Arc::new(build())
        });
        if built {
            let n = self.builds.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                "Built FEE coefficients for {} Hz ({n} builds so far)",
                coeffs.freq_hz
            );
        } else {
            trace!("FEE coefficient cache hit for {} Hz", coeffs.freq_hz);
        }
        Arc::clone(coeffs)
    }

    /// Drop every cached entry. Builds that are in progress finish, but their
    /// results aren't kept.
    pub(super) fn clear(&self) {
        self.slots.lock().clear();
    }

    pub(super) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub(super) fn num_builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::{test_model::test_beam, TileConfig};

    #[test]
    fn slots_are_filled_once() {
        let beam = test_beam();
        let set = beam.lookup(51200000);
        let tile = TileConfig::new(&[0; 16], &[1.0; 16]).unwrap();
        let cache = CoeffCache::default();

        let a = cache.get_or_compute(tile.cache_key(set.freq_hz()), || {
            BowtieCoefficients::new(set, &tile)
        });
        let b = cache.get_or_compute(tile.cache_key(set.freq_hz()), || {
            panic!("this key was already built")
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.num_builds(), 1);

        cache.clear();
        assert_eq!(cache.len(), 0);
        let c = cache.get_or_compute(tile.cache_key(set.freq_hz()), || {
            BowtieCoefficients::new(set, &tile)
        });
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.num_builds(), 2);
    }
}
