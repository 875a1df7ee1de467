// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

/// A dipole polarisation. X is the east-west dipole, Y north-south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pol {
    X,
    Y,
}

impl std::fmt::Display for Pol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Pol::X => "X",
                Pol::Y => "Y",
            }
        )
    }
}

/// The key of the combined-coefficients cache. Two keys are only equal when
/// the (already "rounded") frequency, every delay and every amplitude match
/// exactly; amplitudes are compared by their bits.
#[derive(Hash, Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct CacheKey {
    freq_hz: u32,
    delays: [u32; 16],
    amp_bits: [u64; 32],
}

impl CacheKey {
    pub(crate) fn new(freq_hz: u32, delays: &[u32; 16], amps: &[f64; 32]) -> Self {
        let mut amp_bits = [0; 32];
        amp_bits
            .iter_mut()
            .zip(amps.iter())
            .for_each(|(b, a)| *b = a.to_bits());
        Self {
            freq_hz,
            delays: *delays,
            amp_bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_1() -> (u32, [u32; 16], [f64; 32]) {
        (51200000, [0; 16], [1.0; 32])
    }

    fn settings_2() -> (u32, [u32; 16], [f64; 32]) {
        let mut delays = [0; 16];
        delays[0] = 1;
        (51200000, delays, [1.0; 32])
    }

    fn settings_3() -> (u32, [u32; 16], [f64; 32]) {
        let mut amps = [1.0; 32];
        amps[1] = 0.0;
        amps[17] = 0.0;
        (51200000, [0; 16], amps)
    }

    fn key((freq, delays, amps): (u32, [u32; 16], [f64; 32])) -> CacheKey {
        CacheKey::new(freq, &delays, &amps)
    }

    #[test]
    fn same_settings_same_key() {
        assert_eq!(key(settings_1()), key(settings_1()));
        assert_eq!(key(settings_3()), key(settings_3()));
    }

    #[test]
    fn delays_distinguish_keys() {
        assert_ne!(key(settings_1()), key(settings_2()));
    }

    #[test]
    fn amps_distinguish_keys() {
        assert_ne!(key(settings_1()), key(settings_3()));

        // Only the Y gain of the second dipole differs.
        let mut s4 = settings_3();
        s4.2[17] = 1.0;
        assert_ne!(key(settings_3()), key(s4));
    }

    #[test]
    fn freq_distinguishes_keys() {
        let mut s = settings_1();
        s.0 += 1;
        assert_ne!(key(settings_1()), key(s));
    }

    #[test]
    fn signed_zero_is_not_zero() {
        // Exact matching means -0.0 and 0.0 gains are different keys.
        let mut s = settings_3();
        s.2[1] = -0.0;
        assert_ne!(key(settings_3()), key(s));
    }

    #[test]
    fn pol_display() {
        assert_eq!(format!("{}{}_{}", Pol::X, 1, 51200000), "X1_51200000");
        assert_eq!(Pol::Y.to_string(), "Y");
    }
}
