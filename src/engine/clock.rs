// Transport clock - Drift-free tick timestamps under linear tempo ramps
// Tick times are solved in closed form from the tempo curve, never accumulated

use super::trait_def::RepeatHandle;
use crate::sequencer::timeline::{NoteValue, TickTime};
use std::collections::HashMap;

/// Tempo as a function of time: linear ramp from `from_bpm` to `to_bpm`
/// over `ramp` seconds starting at `anchor_time`, constant afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoCurve {
    anchor_time: f64,
    anchor_beat: f64,
    from_bpm: f64,
    to_bpm: f64,
    ramp: f64,
}

impl TempoCurve {
    pub fn constant(bpm: f64) -> Self {
        Self {
            anchor_time: 0.0,
            anchor_beat: 0.0,
            from_bpm: bpm,
            to_bpm: bpm,
            ramp: 0.0,
        }
    }

    /// Tempo in effect at time `t`
    pub fn bpm_at(&self, t: f64) -> f64 {
        let elapsed = (t - self.anchor_time).max(0.0);
        if self.ramp > 0.0 && elapsed < self.ramp {
            self.from_bpm + (self.to_bpm - self.from_bpm) * elapsed / self.ramp
        } else {
            self.to_bpm
        }
    }

    /// Beats (quarter notes) elapsed since engine time 0 at time `t`
    pub fn beats_at(&self, t: f64) -> f64 {
        let elapsed = (t - self.anchor_time).max(0.0);
        let slope = self.slope();

        let bpm_seconds = if self.ramp > 0.0 && elapsed < self.ramp {
            self.from_bpm * elapsed + slope * elapsed * elapsed / 2.0
        } else {
            self.ramp_area() + self.to_bpm * (elapsed - self.ramp)
        };

        self.anchor_beat + bpm_seconds / 60.0
    }

    /// Engine time at which `beat` is reached
    pub fn time_at_beat(&self, beat: f64) -> f64 {
        let target = ((beat - self.anchor_beat) * 60.0).max(0.0);
        let ramp_area = self.ramp_area();

        let elapsed = if self.ramp > 0.0 && target < ramp_area {
            let slope = self.slope();
            if slope.abs() < f64::EPSILON {
                target / self.from_bpm
            } else {
                // slope/2 * e^2 + from * e - target = 0, positive root
                let discriminant = self.from_bpm * self.from_bpm + 2.0 * slope * target;
                (-self.from_bpm + discriminant.max(0.0).sqrt()) / slope
            }
        } else {
            self.ramp + (target - ramp_area) / self.to_bpm
        };

        self.anchor_time + elapsed
    }

    /// Re-anchor at `now`, ramping from the current tempo to `bpm`
    pub fn retarget(&mut self, now: f64, bpm: f64, ramp_seconds: f64) {
        let beat = self.beats_at(now);
        let current = self.bpm_at(now);
        *self = Self {
            anchor_time: now,
            anchor_beat: beat,
            from_bpm: current,
            to_bpm: bpm,
            ramp: ramp_seconds.max(0.0),
        };
    }

    pub fn target_bpm(&self) -> f64 {
        self.to_bpm
    }

    fn slope(&self) -> f64 {
        if self.ramp > 0.0 {
            (self.to_bpm - self.from_bpm) / self.ramp
        } else {
            0.0
        }
    }

    /// Integral of bpm over the ramp window (bpm * seconds)
    fn ramp_area(&self) -> f64 {
        (self.from_bpm + self.to_bpm) / 2.0 * self.ramp
    }
}

#[derive(Debug, Clone)]
struct Repeat {
    start_beat: f64,
    step_beats: f64,
    next_index: u64,
    last_emitted: f64,
}

/// Shared tempo curve plus any number of repeating tick streams
#[derive(Debug, Clone)]
pub struct TransportClock {
    curve: TempoCurve,
    repeats: HashMap<RepeatHandle, Repeat>,
    next_handle: u64,
}

impl TransportClock {
    pub fn new(bpm: f64) -> Self {
        Self {
            curve: TempoCurve::constant(bpm),
            repeats: HashMap::new(),
            next_handle: 1,
        }
    }

    pub fn curve(&self) -> &TempoCurve {
        &self.curve
    }

    pub fn set_tempo(&mut self, now: f64, bpm: f64, ramp_seconds: f64) {
        self.curve.retarget(now, bpm, ramp_seconds);
    }

    /// Start a repeat whose first tick lands at `now`, or one subdivision
    /// after `after` when that is later
    pub fn schedule_repeat(
        &mut self,
        now: f64,
        subdivision: NoteValue,
        after: Option<TickTime>,
    ) -> RepeatHandle {
        let handle = RepeatHandle(self.next_handle);
        self.next_handle += 1;
        let step_beats = subdivision.beats();
        let mut start_beat = self.curve.beats_at(now);
        if let Some(after) = after {
            start_beat = start_beat.max(self.curve.beats_at(after.seconds()) + step_beats);
        }
        self.repeats.insert(
            handle,
            Repeat {
                start_beat,
                step_beats,
                next_index: 0,
                last_emitted: now,
            },
        );
        handle
    }

    pub fn cancel(&mut self, handle: RepeatHandle) -> bool {
        self.repeats.remove(&handle).is_some()
    }

    pub fn is_scheduled(&self, handle: RepeatHandle) -> bool {
        self.repeats.contains_key(&handle)
    }

    /// Drain the ticks of `handle` with nominal time <= `until`
    pub fn due_ticks(&mut self, handle: RepeatHandle, until: f64) -> Option<Vec<TickTime>> {
        let curve = self.curve;
        let repeat = self.repeats.get_mut(&handle)?;
        let mut ticks = Vec::new();

        loop {
            let beat = repeat.start_beat + repeat.next_index as f64 * repeat.step_beats;
            // A tempo jump can pull the solved time behind a tick already handed out
            let time = curve.time_at_beat(beat).max(repeat.last_emitted);
            if time > until {
                break;
            }
            ticks.push(TickTime::from_seconds(time));
            repeat.last_emitted = time;
            repeat.next_index += 1;
        }

        Some(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds(ticks: &[TickTime]) -> Vec<f64> {
        ticks.iter().map(TickTime::seconds).collect()
    }

    #[test]
    fn test_constant_tempo_ticks() {
        let mut clock = TransportClock::new(120.0);
        let handle = clock.schedule_repeat(0.0, NoteValue::Quarter, None);

        let ticks = clock.due_ticks(handle, 1.6).unwrap();
        assert_eq!(seconds(&ticks), vec![0.0, 0.5, 1.0, 1.5]);

        // Already-returned ticks are not repeated
        let ticks = clock.due_ticks(handle, 2.0).unwrap();
        assert_eq!(seconds(&ticks), vec![2.0]);
    }

    #[test]
    fn test_no_drift_over_many_ticks() {
        let mut clock = TransportClock::new(180.0);
        let handle = clock.schedule_repeat(0.0, NoteValue::Quarter, None);

        let mut all = Vec::new();
        let mut until = 0.0;
        while all.len() < 10_000 {
            until += 0.0137;
            all.extend(clock.due_ticks(handle, until).unwrap());
        }

        let period = 60.0 / 180.0;
        let expected = 9_999.0 * period;
        assert!((all[9_999].seconds() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_starts_at_schedule_time() {
        let mut clock = TransportClock::new(60.0);
        let handle = clock.schedule_repeat(2.25, NoteValue::Quarter, None);
        let ticks = clock.due_ticks(handle, 4.3).unwrap();
        assert_eq!(seconds(&ticks), vec![2.25, 3.25, 4.25]);
    }

    #[test]
    fn test_ramp_is_continuous() {
        let mut curve = TempoCurve::constant(120.0);
        curve.retarget(1.0, 240.0, 0.1);

        assert_eq!(curve.bpm_at(1.0), 120.0);
        assert!((curve.bpm_at(1.05) - 180.0).abs() < 1e-9);
        assert_eq!(curve.bpm_at(2.0), 240.0);

        // beats_at and time_at_beat are inverses across and after the ramp
        for t in [1.0, 1.02, 1.05, 1.099, 1.1, 1.5, 3.0] {
            let beat = curve.beats_at(t);
            assert!((curve.time_at_beat(beat) - t).abs() < 1e-9, "t = {}", t);
        }
    }

    #[test]
    fn test_tempo_change_reanchors() {
        let mut clock = TransportClock::new(120.0);
        let handle = clock.schedule_repeat(0.0, NoteValue::Quarter, None);
        assert_eq!(clock.due_ticks(handle, 1.0).unwrap().len(), 3);

        // Immediate change to 60 BPM at t = 1.0: next tick one second later
        clock.set_tempo(1.0, 60.0, 0.0);
        let ticks = clock.due_ticks(handle, 3.0).unwrap();
        assert_eq!(seconds(&ticks), vec![2.0, 3.0]);
    }

    #[test]
    fn test_ramped_ticks_fall_between_tempos() {
        let mut clock = TransportClock::new(60.0);
        let handle = clock.schedule_repeat(0.0, NoteValue::Quarter, None);
        assert_eq!(clock.due_ticks(handle, 0.0).unwrap().len(), 1);

        clock.set_tempo(0.0, 120.0, 1.0);
        let ticks = clock.due_ticks(handle, 1.0).unwrap();
        assert_eq!(ticks.len(), 1);
        // Faster than 60 BPM, slower than 120 BPM
        assert!(ticks[0].seconds() > 0.5 && ticks[0].seconds() < 1.0);
    }

    #[test]
    fn test_repeat_resumes_after_previous_tick() {
        let mut clock = TransportClock::new(120.0);
        let first = clock.schedule_repeat(0.0, NoteValue::Quarter, None);
        // Lookahead already handed out the tick at 0.5
        assert_eq!(seconds(&clock.due_ticks(first, 0.52).unwrap()), vec![0.0, 0.5]);
        clock.cancel(first);

        let resumed = clock.schedule_repeat(0.43, NoteValue::Quarter, Some(TickTime::from_seconds(0.5)));
        assert!(clock.due_ticks(resumed, 0.99).unwrap().is_empty());
        assert_eq!(seconds(&clock.due_ticks(resumed, 1.6).unwrap()), vec![1.0, 1.5]);

        // A previous tick long past does not delay the new repeat
        let late = clock.schedule_repeat(3.0, NoteValue::Quarter, Some(TickTime::from_seconds(1.5)));
        assert_eq!(seconds(&clock.due_ticks(late, 3.0).unwrap()), vec![3.0]);
    }

    #[test]
    fn test_cancel() {
        let mut clock = TransportClock::new(120.0);
        let handle = clock.schedule_repeat(0.0, NoteValue::Quarter, None);
        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        assert!(clock.due_ticks(handle, 10.0).is_none());
    }
}
