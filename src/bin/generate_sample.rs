use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i64 = 2010;
const LAST_YEAR: i64 = 2022;

/// (code, label, starting kbit/s per capita, mean yearly growth in percent)
const COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("USA", "United States", 120.0, 18.0),
    ("CAN", "Canada", 110.0, 16.0),
    ("MEX", "Mexico", 12.0, 22.0),
    ("BRA", "Brazil", 15.0, 25.0),
    ("GBR", "United Kingdom", 240.0, 14.0),
    ("FRA", "France", 160.0, 15.0),
    ("DEU", "Germany", 150.0, 17.0),
    ("ITA", "Italy", 70.0, 12.0),
    ("CHN", "China", 3.0, 30.0),
    ("JPN", "Japan", 60.0, 12.0),
    ("IND", "India", 1.5, 35.0),
    ("KOR", "Korea, Rep.", 45.0, 10.0),
    ("AUS", "Australia", 55.0, 20.0),
    ("NZL", "New Zealand", 40.0, 14.0),
    ("ZAF", "South Africa", 8.0, 28.0),
    ("EGY", "Egypt", 4.0, 20.0),
    ("NGA", "Nigeria", 0.8, 26.0),
    ("KEN", "Kenya", 2.0, 30.0),
    // Stagnating towards the end of the period.
    ("TCD", "Chad", 0.3, 2.0),
    ("BOL", "Bolivia", 5.0, 3.0),
    ("LUX", "Luxembourg", 900.0, 4.0),
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
}

struct Row {
    code: &'static str,
    label: &'static str,
    year: i64,
    value: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(code, label, start, growth) in COUNTRIES {
        let mut value = start;
        for year in FIRST_YEAR..=LAST_YEAR {
            // Roughly one observation in twenty is missing from the source.
            if year > FIRST_YEAR && rng.next_f64() < 0.05 {
                value *= 1.0 + growth / 100.0;
                continue;
            }
            rows.push(Row {
                code,
                label,
                year,
                value: (value * 100.0).round() / 100.0,
            });
            let yearly = rng.gauss(growth, growth * 0.3).max(-10.0);
            value *= 1.0 + yearly / 100.0;
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["REF_AREA", "REF_AREA_LABEL", "TIME_PERIOD", "OBS_VALUE"])?;
    for row in rows {
        writer.write_record([row.code, row.label, row.year.to_string().as_str(), row.value.to_string().as_str()])?;
    }
    // Rows the loader is expected to drop.
    writer.write_record(["WLD", "World", "2020", ".."])?;
    writer.write_record(["WLD", "World", "n/a", "1.0"])?;
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("REF_AREA", DataType::Utf8, false),
        Field::new("REF_AREA_LABEL", DataType::Utf8, false),
        Field::new("TIME_PERIOD", DataType::Int64, false),
        Field::new("OBS_VALUE", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.code).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.label).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.value).collect::<Vec<_>>())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv("sample_bandwidth.csv", &rows).expect("Failed to write CSV");
    write_parquet("sample_bandwidth.parquet", &rows);

    println!(
        "Wrote {} observations for {} countries ({FIRST_YEAR}-{LAST_YEAR}) to sample_bandwidth.csv and sample_bandwidth.parquet",
        rows.len(),
        COUNTRIES.len()
    );
}
