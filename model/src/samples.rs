use anyhow::{Context, Result};
use geom::LonLat;
use serde::{Deserialize, Serialize};

/// One recorded observation of the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    pub speed: f64,
}

impl Sample {
    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

// Positional; the header names in the file are ignored
const COLUMNS: [&str; 4] = ["timestamp", "latitude", "longitude", "speed"];

// Inclusive bounds per column. Timestamps stay under ~300 years of seconds and speeds under
// 1000 km/h, so spans and distances can't overflow downstream.
const RANGES: [(f64, f64); 4] = [(0.0, 1e10), (-90.0, 90.0), (-180.0, 180.0), (0.0, 1000.0)];

/// Reads `timestamp,latitude,longitude,speed` rows, skipping the header line. Any field that isn't a
/// finite number in its column's range fails the whole load, naming the line.
pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for rec in reader.records() {
        let rec = rec?;
        let line = rec.position().map(|pos| pos.line()).unwrap_or(0);

        let mut values = [0.0; 4];
        for (idx, name) in COLUMNS.iter().enumerate() {
            let raw = match rec.get(idx) {
                Some(raw) => raw,
                None => bail!("line {line}: missing {name}"),
            };
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("line {line}: {name} {raw:?} isn't a number"))?;
            if !value.is_finite() {
                bail!("line {line}: {name} {raw:?} isn't a finite number");
            }
            let (min, max) = RANGES[idx];
            if value < min || value > max {
                bail!("line {line}: {name} {raw:?} is outside [{min}, {max}]");
            }
            values[idx] = value;
        }

        samples.push(Sample {
            timestamp: values[0],
            latitude: values[1],
            longitude: values[2],
            speed: values[3],
        });
    }
    Ok(samples)
}
