use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One synthetic block group, column-compatible with the 1990 census extract.
#[derive(Debug, Serialize)]
struct Row {
    longitude: f64,
    latitude: f64,
    housing_median_age: i64,
    total_rooms: i64,
    population: i64,
    households: i64,
    median_income: f64,
    median_house_value: i64,
    ocean_proximity: &'static str,
}

/// Rough population centres: (name, lon, lat, spread, region, value premium).
const CENTRES: [(&str, f64, f64, f64, &str, f64); 6] = [
    ("San Francisco", -122.42, 37.77, 0.25, "NEAR BAY", 1.6),
    ("Los Angeles", -118.24, 34.05, 0.45, "<1H OCEAN", 1.3),
    ("San Diego", -117.16, 32.72, 0.25, "NEAR OCEAN", 1.4),
    ("Sacramento", -121.49, 38.58, 0.35, "INLAND", 0.8),
    ("Fresno", -119.79, 36.74, 0.40, "INLAND", 0.6),
    ("Catalina", -118.33, 33.39, 0.03, "ISLAND", 2.0),
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    (0..n)
        .map(|_| {
            // Islands are rare, as in the census data.
            let mut centre = CENTRES[rng.below(CENTRES.len())];
            if centre.4 == "ISLAND" && rng.next_f64() > 0.05 {
                centre = CENTRES[rng.below(CENTRES.len() - 1)];
            }
            let (_, lon, lat, spread, region, premium) = centre;

            let median_income = rng.gauss(3.9, 1.9).clamp(0.4999, 15.0001);
            let value = (median_income * 42_000.0 * premium + rng.gauss(0.0, 30_000.0))
                .clamp(14_999.0, 500_001.0);
            let households = rng.gauss(500.0, 300.0).max(2.0) as i64;

            Row {
                longitude: ((lon + rng.gauss(0.0, spread)) * 100.0).round() / 100.0,
                latitude: ((lat + rng.gauss(0.0, spread)) * 100.0).round() / 100.0,
                housing_median_age: 1 + rng.below(52) as i64,
                total_rooms: households * (3 + rng.below(5) as i64),
                population: households * (2 + rng.below(3) as i64),
                households,
                median_income: (median_income * 10_000.0).round() / 10_000.0,
                median_house_value: value.round() as i64,
                ocean_proximity: region,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("longitude", DataType::Float64, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("housing_median_age", DataType::Int64, false),
        Field::new("median_income", DataType::Float64, false),
        Field::new("median_house_value", DataType::Int64, false),
        Field::new("ocean_proximity", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Int64Array::from_iter_values(
                rows.iter().map(|r| r.housing_median_age),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.median_income))),
            Arc::new(Int64Array::from_iter_values(
                rows.iter().map(|r| r.median_house_value),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.ocean_proximity),
            )),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "housing.csv".to_string());
    let n: usize = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid row count '{s}'"))?,
        None => 2_000,
    };

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(n, &mut rng);

    let path = Path::new(&output);
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&rows, path)?;
    } else {
        write_csv(&rows, path)?;
    }

    println!("Wrote {} housing records to {output}", rows.len());
    Ok(())
}
