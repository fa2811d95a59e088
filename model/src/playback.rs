use geom::{Duration, LonLat};
use serde::{Deserialize, Serialize};

use crate::Sample;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpeedSetting {
    /// One sample every 2 real seconds
    Half,
    /// One sample per real second
    Normal,
    Double,
    Quadruple,
}

impl SpeedSetting {
    pub const ALL: [SpeedSetting; 4] = [
        SpeedSetting::Half,
        SpeedSetting::Normal,
        SpeedSetting::Double,
        SpeedSetting::Quadruple,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            SpeedSetting::Half => 0.5,
            SpeedSetting::Normal => 1.0,
            SpeedSetting::Double => 2.0,
            SpeedSetting::Quadruple => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedSetting::Half => "0.5x",
            SpeedSetting::Normal => "1x",
            SpeedSetting::Double => "2x",
            SpeedSetting::Quadruple => "4x",
        }
    }

    pub fn tick_period(self) -> Duration {
        Duration::seconds(1.0 / self.multiplier())
    }

    pub fn slower(self) -> Option<SpeedSetting> {
        match self {
            SpeedSetting::Half => None,
            SpeedSetting::Normal => Some(SpeedSetting::Half),
            SpeedSetting::Double => Some(SpeedSetting::Normal),
            SpeedSetting::Quadruple => Some(SpeedSetting::Double),
        }
    }

    pub fn faster(self) -> Option<SpeedSetting> {
        match self {
            SpeedSetting::Half => Some(SpeedSetting::Normal),
            SpeedSetting::Normal => Some(SpeedSetting::Double),
            SpeedSetting::Double => Some(SpeedSetting::Quadruple),
            SpeedSetting::Quadruple => None,
        }
    }
}

/// Everything the user or the clock can do to playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Play,
    Pause,
    TogglePlay,
    Reset,
    /// Jump to a position in the trip, from 0 to 100
    Scrub(f64),
    SetSpeed(SpeedSetting),
    /// Advance one sample. Only the schedule should produce these.
    Tick,
}

/// A pending recurring tick.
#[derive(Clone)]
struct TickSchedule {
    period: Duration,
    // Real time accumulated towards the next tick
    elapsed: Duration,
}

impl TickSchedule {
    fn new(speed: SpeedSetting) -> Self {
        Self {
            period: speed.tick_period(),
            elapsed: Duration::ZERO,
        }
    }
}

/// Playback over a fixed sequence of samples. The caller owns the samples and passes the same
/// slice to every call.
///
/// A schedule exists exactly while playing, so there's never a stray timer to cancel. The trail is
/// either empty (nothing traveled since a reset) or exactly the positions of samples
/// `0..=current_index`.
#[derive(Clone)]
pub struct Playback {
    current_index: usize,
    speed: SpeedSetting,
    trail: Vec<LonLat>,
    schedule: Option<TickSchedule>,
}

impl Playback {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            speed: SpeedSetting::Normal,
            trail: Vec::new(),
            schedule: None,
        }
    }

    /// Starts paused at some earlier position. An index past the end of the samples is ignored.
    pub fn restore(samples: &[Sample], index: usize, speed: SpeedSetting) -> Self {
        let mut playback = Self::new();
        playback.speed = speed;
        if index > 0 && index < samples.len() {
            playback.current_index = index;
            playback.trail = trail_prefix(samples, index);
        }
        playback
    }

    pub fn apply(&mut self, samples: &[Sample], action: Action) {
        match action {
            Action::Play => {
                if self.schedule.is_none() && !samples.is_empty() {
                    self.schedule = Some(TickSchedule::new(self.speed));
                }
            }
            Action::Pause => {
                self.schedule = None;
            }
            Action::TogglePlay => {
                let next = if self.is_playing() {
                    Action::Pause
                } else {
                    Action::Play
                };
                self.apply(samples, next);
            }
            Action::Reset => {
                self.current_index = 0;
                self.trail.clear();
                self.schedule = None;
            }
            Action::Scrub(percent) => {
                if samples.is_empty() {
                    return;
                }
                let last = samples.len() - 1;
                let percent = percent.clamp(0.0, 100.0);
                // NaN becomes 0 here
                let index = (percent / 100.0 * last as f64).floor() as usize;
                self.current_index = index.min(last);
                self.trail = trail_prefix(samples, self.current_index);
            }
            Action::SetSpeed(speed) => {
                if speed == self.speed {
                    return;
                }
                self.speed = speed;
                // Whatever was pending was scheduled at the old period
                if self.schedule.is_some() {
                    self.schedule = Some(TickSchedule::new(speed));
                }
            }
            Action::Tick => {
                if self.schedule.is_none() {
                    return;
                }
                let next = self.current_index + 1;
                if next >= samples.len() {
                    self.schedule = None;
                    self.current_index = samples.len().saturating_sub(1);
                    return;
                }
                self.current_index = next;
                self.trail = trail_prefix(samples, next);
            }
        }
    }

    /// Feeds real elapsed time to the schedule, applying one tick per elapsed period. Returns the
    /// number of ticks.
    pub fn advance(&mut self, samples: &[Sample], real_dt: Duration) -> usize {
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.elapsed = schedule.elapsed + real_dt;
        }

        let mut ticks = 0;
        while self.take_due_tick() {
            self.apply(samples, Action::Tick);
            ticks += 1;
        }
        ticks
    }

    fn take_due_tick(&mut self) -> bool {
        match self.schedule.as_mut() {
            Some(schedule) if schedule.elapsed >= schedule.period => {
                schedule.elapsed = schedule.elapsed - schedule.period;
                true
            }
            _ => false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn speed(&self) -> SpeedSetting {
        self.speed
    }

    pub fn trail(&self) -> &[LonLat] {
        &self.trail
    }

    /// None while paused
    pub fn tick_period(&self) -> Option<Duration> {
        self.schedule.as_ref().map(|schedule| schedule.period)
    }

    /// From 0 to 100
    pub fn progress_percent(&self, num_samples: usize) -> f64 {
        if num_samples <= 1 {
            return 0.0;
        }
        self.current_index as f64 / (num_samples - 1) as f64 * 100.0
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

fn trail_prefix(samples: &[Sample], index: usize) -> Vec<LonLat> {
    samples[..=index].iter().map(|s| s.lon_lat()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                timestamp: 5.0 * i as f64,
                latitude: -33.0 + 0.001 * i as f64,
                longitude: 151.0 + 0.002 * i as f64,
                speed: 10.0 * i as f64,
            })
            .collect()
    }

    fn coords(trail: &[LonLat]) -> Vec<(f64, f64)> {
        trail.iter().map(|ll| (ll.x(), ll.y())).collect()
    }

    fn assert_trail_is_prefix(playback: &Playback, samples: &[Sample]) {
        let idx = playback.current_index();
        assert_eq!(playback.trail().len(), idx + 1);
        let expected: Vec<LonLat> = samples[..=idx].iter().map(|s| s.lon_lat()).collect();
        assert_eq!(coords(playback.trail()), coords(&expected));
    }

    #[test]
    fn test_initial_state() {
        let playback = Playback::new();
        assert_eq!(playback.current_index(), 0);
        assert!(!playback.is_playing());
        assert_eq!(playback.speed(), SpeedSetting::Normal);
        assert!(playback.trail().is_empty());
        assert_eq!(playback.tick_period(), None);
    }

    #[test]
    fn test_trail_matches_prefix_after_every_scrub() {
        let samples = samples(11);
        let mut playback = Playback::new();
        for pct in [0.0, 10.0, 35.0, 50.0, 99.9, 100.0, 20.0] {
            playback.apply(&samples, Action::Scrub(pct));
            assert_trail_is_prefix(&playback, &samples);
        }
    }

    #[test]
    fn test_trail_matches_prefix_while_ticking() {
        let samples = samples(6);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Play);
        for expected in 1..6 {
            playback.apply(&samples, Action::Tick);
            assert_eq!(playback.current_index(), expected);
            assert_trail_is_prefix(&playback, &samples);
        }
    }

    #[test]
    fn test_scrub_endpoints() {
        let samples = samples(7);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Scrub(100.0));
        assert_eq!(playback.current_index(), 6);
        playback.apply(&samples, Action::Scrub(0.0));
        assert_eq!(playback.current_index(), 0);

        // Out of range input is clamped
        playback.apply(&samples, Action::Scrub(250.0));
        assert_eq!(playback.current_index(), 6);
        playback.apply(&samples, Action::Scrub(-3.0));
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn test_scrub_floors() {
        let samples = samples(11);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Scrub(59.0));
        assert_eq!(playback.current_index(), 5);
    }

    #[test]
    fn test_scrub_keeps_play_state() {
        let samples = samples(11);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Scrub(50.0));
        assert!(!playback.is_playing());

        playback.apply(&samples, Action::Play);
        playback.apply(&samples, Action::Scrub(20.0));
        assert!(playback.is_playing());
        assert_eq!(playback.current_index(), 2);
    }

    #[test]
    fn test_reset_from_anywhere() {
        let samples = samples(5);
        let mut setups: Vec<Playback> = Vec::new();

        setups.push(Playback::new());
        let mut p = Playback::new();
        p.apply(&samples, Action::Scrub(75.0));
        setups.push(p);
        let mut p = Playback::new();
        p.apply(&samples, Action::Play);
        p.apply(&samples, Action::Tick);
        p.apply(&samples, Action::SetSpeed(SpeedSetting::Quadruple));
        setups.push(p);

        for mut playback in setups {
            playback.apply(&samples, Action::Reset);
            assert_eq!(playback.current_index(), 0);
            assert!(!playback.is_playing());
            assert!(playback.trail().is_empty());
            assert_eq!(playback.tick_period(), None);
        }
    }

    #[test]
    fn test_auto_stop_at_last_sample() {
        let samples = samples(3);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Play);
        for _ in 0..10 {
            playback.apply(&samples, Action::Tick);
            assert!(playback.current_index() < samples.len());
        }
        assert_eq!(playback.current_index(), 2);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_tick_while_paused_does_nothing() {
        let samples = samples(3);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Tick);
        assert_eq!(playback.current_index(), 0);
        assert!(playback.trail().is_empty());
    }

    #[test]
    fn test_play_needs_samples() {
        let mut playback = Playback::new();
        playback.apply(&[], Action::Play);
        assert!(!playback.is_playing());
        playback.apply(&[], Action::Scrub(50.0));
        assert_eq!(playback.current_index(), 0);
        assert_eq!(playback.advance(&[], Duration::seconds(10.0)), 0);
    }

    #[test]
    fn test_toggle() {
        let samples = samples(3);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::TogglePlay);
        assert!(playback.is_playing());
        playback.apply(&samples, Action::TogglePlay);
        assert!(!playback.is_playing());
        // Pausing twice is harmless
        playback.apply(&samples, Action::Pause);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_advance_follows_period() {
        let samples = samples(20);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Play);

        assert_eq!(playback.advance(&samples, Duration::seconds(0.6)), 0);
        assert_eq!(playback.advance(&samples, Duration::seconds(0.6)), 1);
        assert_eq!(playback.current_index(), 1);

        // A long frame fires several ticks at once
        assert_eq!(playback.advance(&samples, Duration::seconds(3.0)), 3);
        assert_eq!(playback.current_index(), 4);
    }

    #[test]
    fn test_advance_while_paused() {
        let samples = samples(5);
        let mut playback = Playback::new();
        assert_eq!(playback.advance(&samples, Duration::seconds(30.0)), 0);
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let samples = samples(4);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Play);
        // 3 moves, then the 4th tick stops playback
        assert_eq!(playback.advance(&samples, Duration::seconds(100.0)), 4);
        assert_eq!(playback.current_index(), 3);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_speed_change_while_playing() {
        let samples = samples(20);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::Play);
        playback.advance(&samples, Duration::seconds(2.5));
        assert_eq!(playback.current_index(), 2);

        playback.apply(&samples, Action::SetSpeed(SpeedSetting::Quadruple));
        assert_eq!(playback.current_index(), 2);
        assert!(playback.is_playing());
        assert_eq!(playback.tick_period(), Some(Duration::seconds(0.25)));

        // The half second left over from the old schedule was dropped
        assert_eq!(playback.advance(&samples, Duration::seconds(0.2)), 0);
        assert_eq!(playback.advance(&samples, Duration::seconds(0.05)), 1);
        assert_eq!(playback.current_index(), 3);
    }

    #[test]
    fn test_speed_change_while_paused() {
        let samples = samples(5);
        let mut playback = Playback::new();
        playback.apply(&samples, Action::SetSpeed(SpeedSetting::Half));
        assert_eq!(playback.speed(), SpeedSetting::Half);
        assert!(!playback.is_playing());

        playback.apply(&samples, Action::Play);
        assert_eq!(playback.tick_period(), Some(Duration::seconds(2.0)));
    }

    #[test]
    fn test_speed_steps() {
        assert_eq!(SpeedSetting::Half.slower(), None);
        assert_eq!(SpeedSetting::Quadruple.faster(), None);
        let mut speed = SpeedSetting::Half;
        let mut seen = vec![speed];
        while let Some(next) = speed.faster() {
            seen.push(next);
            speed = next;
        }
        assert_eq!(seen, SpeedSetting::ALL.to_vec());
        assert_eq!(
            SpeedSetting::ALL.map(|s| s.label()),
            ["0.5x", "1x", "2x", "4x"]
        );
    }

    #[test]
    fn test_progress_percent() {
        let samples = samples(5);
        let mut playback = Playback::new();
        assert_eq!(playback.progress_percent(samples.len()), 0.0);
        playback.apply(&samples, Action::Scrub(100.0));
        assert_eq!(playback.progress_percent(samples.len()), 100.0);
        playback.apply(&samples, Action::Scrub(50.0));
        assert_eq!(playback.progress_percent(samples.len()), 50.0);
        assert_eq!(playback.progress_percent(1), 0.0);
    }

    #[test]
    fn test_restore() {
        let samples = samples(5);
        let playback = Playback::restore(&samples, 3, SpeedSetting::Double);
        assert_eq!(playback.current_index(), 3);
        assert_eq!(playback.speed(), SpeedSetting::Double);
        assert!(!playback.is_playing());
        assert_trail_is_prefix(&playback, &samples);

        let playback = Playback::restore(&samples, 5, SpeedSetting::Double);
        assert_eq!(playback.current_index(), 0);
        assert!(playback.trail().is_empty());
    }
}
