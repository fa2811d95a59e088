#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod playback;
mod samples;
pub mod stats;

use anyhow::{Context, Result};
use geom::{Bounds, GPSBounds, LonLat, Pt2D};

pub use self::playback::{Action, Playback, SpeedSetting};
pub use self::samples::Sample;
pub use self::stats::{SpeedBand, TripStats};

// Keep the route away from the edges of the map
const PADDING_DEGREES: f64 = 0.001;

/// One recorded trip, loaded once.
pub struct Trip {
    pub bounds: Bounds,
    pub gps_bounds: GPSBounds,
    pub samples: Vec<Sample>,
    /// The position of every sample, in map-space
    pub route: Vec<Pt2D>,
}

impl Trip {
    pub fn new(samples: Vec<Sample>) -> Self {
        if samples.is_empty() {
            return Self::empty();
        }

        let mut gps_bounds = GPSBounds::new();
        for sample in &samples {
            gps_bounds.update(sample.lon_lat());
        }
        // A trip that never moves would otherwise have zero-sized bounds
        let (min_lon, min_lat) = (gps_bounds.min_lon, gps_bounds.min_lat);
        let (max_lon, max_lat) = (gps_bounds.max_lon, gps_bounds.max_lat);
        gps_bounds.update(LonLat::new(
            min_lon - PADDING_DEGREES,
            min_lat - PADDING_DEGREES,
        ));
        gps_bounds.update(LonLat::new(
            max_lon + PADDING_DEGREES,
            max_lat + PADDING_DEGREES,
        ));

        let route = samples
            .iter()
            .map(|s| s.lon_lat().to_pt(&gps_bounds))
            .collect();
        Self {
            bounds: gps_bounds.to_bounds(),
            gps_bounds,
            samples,
            route,
        }
    }

    pub fn empty() -> Self {
        Self {
            // Avoid crashing the UI with empty bounds
            bounds: Bounds::from(&[Pt2D::zero(), Pt2D::new(1.0, 1.0)]),
            gps_bounds: GPSBounds::new(),
            samples: Vec::new(),
            route: Vec::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let samples = samples::load(bytes)?;
        let trip = Self::new(samples);
        trip.log_summary();
        Ok(trip)
    }

    pub fn load_path(path: &str) -> Result<Self> {
        let file = fs_err::File::open(path)?;
        let samples = samples::load(std::io::BufReader::new(file))
            .with_context(|| format!("parsing {path}"))?;
        let trip = Self::new(samples);
        trip.log_summary();
        Ok(trip)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// The first and last timestamp, in seconds
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.timestamp, last.timestamp))
    }

    fn log_summary(&self) {
        match self.time_span() {
            Some((start, end)) => info!(
                "Loaded trip with {} samples, from {start}s to {end}s",
                self.samples.len()
            ),
            None => warn!("Loaded a trip with no samples"),
        }
    }
}
