use geom::{Distance, Duration};

use crate::Sample;

// Degrees to kilometers at the equator. Not geodesically correct, but the numbers the dashboard has
// always shown depend on it.
const KM_PER_DEGREE: f64 = 111.0;
// Samples are assumed to be recorded at a fixed cadence; timestamps are ignored.
const SECONDS_PER_SAMPLE: f64 = 5.0;

/// Summary of the trip so far, up to and including one sample.
#[derive(Clone, Debug, PartialEq)]
pub struct TripStats {
    pub distance: Distance,
    /// km/h
    pub avg_speed: f64,
    /// km/h
    pub max_speed: f64,
    pub duration: Duration,
}

impl TripStats {
    /// An index past the end is treated as the last sample. No samples means everything is zero.
    pub fn at(samples: &[Sample], index: usize) -> Self {
        if samples.is_empty() {
            return Self {
                distance: Distance::ZERO,
                avg_speed: 0.0,
                max_speed: 0.0,
                duration: Duration::ZERO,
            };
        }
        let index = index.min(samples.len() - 1);
        Self {
            distance: distance(samples, index),
            avg_speed: avg_speed(samples, index),
            max_speed: max_speed(samples, index),
            duration: duration(index),
        }
    }
}

/// Straight-line distance between consecutive samples, treating degrees as a flat plane.
pub fn distance(samples: &[Sample], index: usize) -> Distance {
    let mut km = 0.0;
    for pair in samples[..=index].windows(2) {
        let dlat = pair[1].latitude - pair[0].latitude;
        let dlon = pair[1].longitude - pair[0].longitude;
        km += (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE;
    }
    Distance::meters(km * 1000.0)
}

pub fn avg_speed(samples: &[Sample], index: usize) -> f64 {
    let sum: f64 = samples[..=index].iter().map(|s| s.speed).sum();
    sum / (index + 1) as f64
}

pub fn max_speed(samples: &[Sample], index: usize) -> f64 {
    samples[..=index]
        .iter()
        .map(|s| s.speed)
        .fold(f64::NEG_INFINITY, f64::max)
}

pub fn duration(index: usize) -> Duration {
    Duration::seconds(index as f64 * SECONDS_PER_SAMPLE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedBand {
    /// Under 30 km/h
    Low,
    /// Under 60 km/h
    Medium,
    High,
}

impl SpeedBand {
    pub fn of(kmh: f64) -> Self {
        if kmh < 30.0 {
            SpeedBand::Low
        } else if kmh < 60.0 {
            SpeedBand::Medium
        } else {
            SpeedBand::High
        }
    }
}

pub fn fmt_distance(distance: Distance) -> String {
    format!("{:.1} km", distance.inner_meters() / 1000.0)
}

pub fn fmt_duration(duration: Duration) -> String {
    let secs = duration.inner_seconds().max(0.0) as usize;
    format!("{}m {}s", secs / 60, secs % 60)
}

pub fn fmt_speed(kmh: f64) -> String {
    format!("{:.0} km/h", kmh)
}
