//! Write a synthetic glycan fragment spectrum for trying out the analyser.
//!
//! Produces `sample_peaks.parquet` and `sample_peaks.csv` in the working
//! directory: a Y-ion ladder with isotope envelopes, one doubly charged
//! fragment and a scattering of noise peaks.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Spacing between isotope peaks of a singly charged ion (13C - 12C).
const ISOTOPE_SPACING: f64 = 1.003355;
const PROTON: f64 = 1.007276;

/// Residue masses of the units lost along the ladder, reducing end first.
const LADDER: [(&str, f64); 6] = [
    ("HexNAc", 203.0794),
    ("HexNAc", 203.0794),
    ("Hex", 162.0528),
    ("Hex", 162.0528),
    ("Hex", 162.0528),
    ("NeuAc", 291.0954),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Monoisotopic peak plus two isotopes at charge `z`.
fn envelope(neutral_mass: f64, z: u8, amplitude: f64, rng: &mut SimpleRng) -> Vec<(f64, f64)> {
    let z = f64::from(z);
    let mz = (neutral_mass + z * PROTON) / z;
    [1.0, 0.35, 0.08]
        .iter()
        .enumerate()
        .map(|(k, share)| {
            let jitter = rng.uniform(-0.0005, 0.0005);
            (
                mz + k as f64 * ISOTOPE_SPACING / z + jitter,
                amplitude * share * rng.uniform(0.9, 1.1),
            )
        })
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut peaks: Vec<(f64, f64)> = Vec::new();

    // Y-ion ladder: each step adds one residue; water stays on the reducing end.
    let mut neutral = 18.010565;
    for (step, (unit, mass)) in LADDER.iter().enumerate() {
        neutral += mass;
        let amplitude = 1000.0 * (1.0 - step as f64 * 0.12);
        peaks.extend(envelope(neutral, 1, amplitude, &mut rng));
        println!("Y{} (+{unit}): {:.4}", step + 1, neutral + PROTON);
    }

    // Doubly charged precursor of the full ladder.
    peaks.extend(envelope(neutral, 2, 400.0, &mut rng));

    // Chemical noise.
    for _ in 0..40 {
        peaks.push((rng.uniform(150.0, 1600.0), rng.uniform(5.0, 80.0)));
    }

    peaks.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (mz, intensity): (Vec<f64>, Vec<f64>) = peaks.iter().copied().unzip();

    let schema = Arc::new(Schema::new(vec![
        Field::new("mz", DataType::Float64, false),
        Field::new("intensity", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(mz.clone())),
            Arc::new(Float64Array::from(intensity.clone())),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_peaks.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    let csv_path = "sample_peaks.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    csv_writer.write_record(["m/z", "Intensity"])?;
    for (mz, intensity) in mz.iter().zip(&intensity) {
        csv_writer.write_record([format!("{mz:.5}"), format!("{intensity:.2}")])?;
    }
    csv_writer.flush()?;

    println!("Wrote {} peaks to {parquet_path} and {csv_path}", mz.len());
    Ok(())
}
