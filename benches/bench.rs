// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Benchmarks. A synthetic model (with a realistic number of modes) is built in
memory, so no beam file is needed.
 */

use criterion::*;
use ndarray::prelude::*;

use mwa_fee_beam::*;

const FREQS: [u32; 2] = [51200000, 52480000];
const N_MAX: i8 = 16;

fn synthetic_beam() -> FEEBeam {
    let mut columns = vec![];
    for s in [1, 2] {
        for n in 1..=N_MAX {
            for m in -n..=n {
                columns.push([s, m, n]);
            }
        }
    }
    let num_columns = columns.len();

    let mut source = MemorySource::new();
    source.set_modes(Array2::from_shape_fn((3, num_columns), |(r, c)| {
        columns[c][r]
    }));
    for (i_freq, freq) in FREQS.into_iter().enumerate() {
        for (i_pol, pol) in ["X", "Y"].into_iter().enumerate() {
            for dipole in 1..=16 {
                let seed = i_freq + 3 * i_pol + 7 * dipole;
                source.insert(
                    format!("{pol}{dipole}_{freq}"),
                    Array2::from_shape_fn((2, num_columns), |(r, i)| match r {
                        0 => 0.01 + 0.001 * ((i + seed) % 17) as f64,
                        _ => ((i * 31 + seed * 13) % 360) as f64,
                    }),
                );
            }
        }
    }
    FEEBeam::from_source(&source).unwrap()
}

fn fee(c: &mut Criterion) {
    let freq = 51200000;
    let tile = TileConfig::new(&[0; 16], &[1.0; 16]).unwrap();

    c.bench_function("from_source", |b| {
        b.iter(|| {
            black_box(synthetic_beam());
        })
    });

    c.bench_function("calc_jones", |b| {
        let az = 45.0_f64.to_radians();
        let za = 80.0_f64.to_radians();
        let beam = synthetic_beam();
        // Prime the cache.
        beam.calc_jones_pair(az, za, freq, &tile, false, None, false)
            .unwrap();
        b.iter(|| {
            beam.calc_jones_pair(az, za, freq, &tile, false, None, false)
                .unwrap();
        })
    });

    c.bench_function("calc_jones_array", |b| {
        let mut az = vec![];
        let mut za = vec![];
        for d in 5..85 {
            let rad = (d as f64).to_radians();
            az.push(rad);
            za.push(rad);
        }
        let beam = synthetic_beam();
        b.iter(|| {
            beam.calc_jones_array_pair(&az, &za, freq, &tile, true, Some(MWA_LAT_RAD), true)
                .unwrap();
        })
    });

    c.bench_function("calc_jones_array_inner", |b| {
        let directions: Vec<AzEl> = (0..1000)
            .map(|i| AzEl::from_radians(0.006 * i as f64, 0.5 + 0.001 * i as f64))
            .collect();
        let mut results = vec![Jones::default(); directions.len()];
        let beam = synthetic_beam();
        b.iter(|| {
            beam.calc_jones_array_inner(&directions, freq, &tile, true, None, false, &mut results)
                .unwrap();
        })
    });

    // How long does it take to combine dipole coefficients for a new tile
    // configuration?
    c.bench_function("build_coeffs", |b| {
        let beam = synthetic_beam();
        b.iter(|| {
            beam.empty_cache();
            beam.calc_jones_pair(0.0, 0.0, freq, &tile, true, None, false)
                .unwrap();
        })
    });
}

criterion_group!(benches, fee);
criterion_main!(benches);
