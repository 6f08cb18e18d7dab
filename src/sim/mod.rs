//! Fixed-interval simulation clock. Each tick advances every train with
//! the speed computed on the previous tick, rederives occupancy and
//! block codes, then lets the governor set each train's speed for the
//! next tick.

use crate::input::scenario::{check_control, ConfigError, Scenario};
use crate::output::history::{Snapshot, BlockStatus, SimLogEvent, TrainStatus};
use crate::railway::{governor, occupancy, signalling, track};
use crate::railway::signalling::SignalCode;
use crate::railway::track::BLOCK_COUNT;
use crate::railway::train::Train;
use log::debug;
use smallvec::SmallVec;

/// Wall-clock period between ticks at control 0, milliseconds.
pub const BASE_INTERVAL_MS: u64 = 100;
/// Simulated seconds advanced per tick at control 0.
pub const BASE_TICK_SECONDS: f64 = 0.1;

/// Speed multiplier derived from the throttle control value.
pub fn throttle(control: i32) -> f64 {
    if control > 0 {
        (control + 1) as f64
    } else if control < 0 {
        1.0 / control.abs() as f64
    } else {
        1.0
    }
}

/// Wall-clock period between ticks. Only the callback frequency scales
/// with the throttle; the simulated step per tick is `tick_seconds`.
pub fn adjusted_interval_ms(control: i32) -> u64 {
    let interval = (BASE_INTERVAL_MS as f64 / throttle(control)) as u64;
    interval.max(1)
}

/// Simulated seconds advanced by one tick.
pub fn tick_seconds(control: i32) -> f64 {
    BASE_TICK_SECONDS * throttle(control)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    Paused,
}

pub type SimLogger = Box<dyn Fn(SimLogEvent)>;

pub struct Simulation {
    trains: SmallVec<[Train; 2]>,
    occupancy: [bool; BLOCK_COUNT],
    codes: [SignalCode; BLOCK_COUNT],
    state: RunState,
    control: i32,
    time: f64,
    logger: SimLogger,
}

impl Simulation {
    pub fn new(logger: SimLogger) -> Simulation {
        Simulation {
            trains: SmallVec::new(),
            occupancy: [false; BLOCK_COUNT],
            codes: [SignalCode::L; BLOCK_COUNT],
            state: RunState::Stopped,
            control: 0,
            time: 0.0,
            logger: logger,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn control(&self) -> i32 {
        self.control
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Throttle changes are consumed continuously: the new value takes
    /// effect from the next tick.
    pub fn set_control(&mut self, value: i32) -> Result<(), ConfigError> {
        check_control(value)?;
        self.control = value;
        Ok(())
    }

    /// Validate the scenario and (re)build all train state from it.
    /// On error nothing is mutated and the state stays `Stopped`.
    pub fn start(&mut self, scenario: &Scenario) -> Result<(), ConfigError> {
        scenario.validate()?;

        self.control = scenario.control;
        self.time = 0.0;
        self.trains = scenario.trains
            .iter()
            .map(|spec| {
                Train::place(spec.name.clone(),
                             spec.start_block - 1,
                             spec.start_offset,
                             spec.speed_kmh / 3.6,
                             spec.length)
            })
            .collect();

        self.occupancy = occupancy::recompute(&self.trains);
        self.codes = signalling::propagate(&self.occupancy);
        self.state = RunState::Running;

        (self.logger)(SimLogEvent::Start);
        for b in 0..BLOCK_COUNT {
            if self.codes[b] != SignalCode::L {
                (self.logger)(SimLogEvent::Code(b, self.codes[b]));
            }
        }
        debug!("started with {} trains at control {}", self.trains.len(), self.control);
        Ok(())
    }

    /// Suppresses further ticks; train state is kept.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
        }
    }

    /// One simulation step. Does nothing unless running.
    pub fn tick(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        let dt = tick_seconds(self.control);

        // Kinematics first, with last tick's speeds.
        for (id, train) in self.trains.iter_mut().enumerate() {
            if let Some(block) = train.advance(dt) {
                (self.logger)(SimLogEvent::EnterBlock(id, block));
            }
        }

        self.occupancy = occupancy::recompute(&self.trains);
        let codes = signalling::propagate(&self.occupancy);
        for b in 0..BLOCK_COUNT {
            if codes[b] != self.codes[b] {
                (self.logger)(SimLogEvent::Code(b, codes[b]));
            }
        }
        self.codes = codes;

        // Governor last: the speeds set here move the trains next tick.
        for (id, train) in self.trains.iter_mut().enumerate() {
            let code = self.codes[train.head_block];
            if let Some(to) = governor::adjust_speed(train, code, dt) {
                (self.logger)(SimLogEvent::SpeedSnap(id, to));
            }
        }

        self.time += dt;
        (self.logger)(SimLogEvent::Tick(dt));
    }

    pub fn snapshot(&self) -> Snapshot {
        let trains = self.trains
            .iter()
            .map(|t| {
                let code = self.codes[t.head_block];
                TrainStatus {
                    name: t.name.clone(),
                    head_block: t.head_block,
                    tail_block: t.tail_block,
                    remaining_distance: t.head_remaining,
                    remaining_time: t.time_to_next,
                    speed_kmh: t.speed * 3.6,
                    limit_kmh: governor::target_speed(code, t.configured_speed) * 3.6,
                }
            })
            .collect();

        let mut blocks = [BlockStatus {
            occupied: false,
            code: SignalCode::L,
            low_frequency: SignalCode::L.low_frequency(),
            carrier_frequency: 0.0,
        }; BLOCK_COUNT];
        for b in 0..BLOCK_COUNT {
            blocks[b] = BlockStatus {
                occupied: self.occupancy[b],
                code: self.codes[b],
                low_frequency: self.codes[b].low_frequency(),
                carrier_frequency: track::carrier_frequency(b),
            };
        }

        Snapshot {
            time: self.time,
            trains: trains,
            blocks: blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::scenario::TrainSpec;
    use crate::railway::signalling::SignalCode::*;

    fn spec(name: &str, block: usize, speed_kmh: f64) -> TrainSpec {
        // 300 m into the block, so the 209 m tail stays in the same
        // block and occupancy is exactly the set of starting blocks.
        TrainSpec {
            name: name.to_string(),
            start_block: block,
            start_offset: 300.0,
            speed_kmh: speed_kmh,
            length: 209.0,
        }
    }

    fn two_train_scenario() -> Scenario {
        Scenario {
            trains: vec![spec("t0", 1, 300.0), spec("t1", 5, 300.0)],
            control: 0,
        }
    }

    fn sim() -> Simulation {
        Simulation::new(Box::new(|_| {}))
    }

    #[test]
    fn throttle_mapping() {
        assert_eq!(throttle(0), 1.0);
        assert_eq!(throttle(5), 6.0);
        assert_eq!(throttle(-4), 0.25);
        assert_eq!(throttle(10), 11.0);
        assert_eq!(throttle(-10), 0.1);
    }

    #[test]
    fn interval_is_floored() {
        assert_eq!(adjusted_interval_ms(0), 100);
        assert_eq!(adjusted_interval_ms(5), 16);
        assert_eq!(adjusted_interval_ms(-4), 400);
        // 100 / 11 truncates to 9, still above the floor; the floor
        // matters only for sub-millisecond results.
        assert_eq!(adjusted_interval_ms(10), 9);
        assert!(adjusted_interval_ms(10) >= 1);
    }

    #[test]
    fn startup_codes_match_panel_scenario() {
        // Trains in blocks 1 and 5: the loop shows, 1-based,
        // 1=L 2=LU 3=U 4=H 5=L 6=LU 7=U 8=H.
        let mut s = sim();
        s.start(&two_train_scenario()).unwrap();
        let snap = s.snapshot();
        let codes: Vec<_> = snap.blocks.iter().map(|b| b.code).collect();
        assert_eq!(codes, vec![L, LU, U, H, L, LU, U, H]);
        for b in 0..BLOCK_COUNT {
            assert_eq!(snap.blocks[b].occupied, b == 0 || b == 4);
        }
    }

    #[test]
    fn start_rejects_shared_block_without_mutation() {
        let mut s = sim();
        let bad = Scenario { trains: vec![spec("t0", 2, 300.0), spec("t1", 2, 300.0)], control: 0 };
        assert!(s.start(&bad).is_err());
        assert_eq!(s.state(), RunState::Stopped);
        assert!(s.trains().is_empty());
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut s = sim();
        s.tick();
        assert_eq!(s.time(), 0.0);
        s.start(&two_train_scenario()).unwrap();
        s.pause();
        let head = s.trains()[0].head_remaining;
        s.tick();
        assert_eq!(s.trains()[0].head_remaining, head);
        s.resume();
        s.tick();
        assert!(s.trains()[0].head_remaining < head);
    }

    #[test]
    fn pause_keeps_train_state() {
        let mut s = sim();
        s.start(&two_train_scenario()).unwrap();
        for _ in 0..10 {
            s.tick();
        }
        let before: Vec<_> = s.trains().iter().map(|t| (t.head_block, t.head_remaining)).collect();
        s.pause();
        s.resume();
        let after: Vec<_> = s.trains().iter().map(|t| (t.head_block, t.head_remaining)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn movement_uses_previous_tick_speed() {
        // The governor runs after kinematics within a tick, so the
        // first tick must move t0 at the speed it started with.
        let mut s = sim();
        s.start(&two_train_scenario()).unwrap();
        let v0 = s.trains()[0].speed;
        let before = s.trains()[0].head_remaining;
        s.tick();
        let moved = before - s.trains()[0].head_remaining;
        assert!((moved - v0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn restart_resets_state() {
        let mut s = sim();
        s.start(&two_train_scenario()).unwrap();
        for _ in 0..50 {
            s.tick();
        }
        assert!(s.time() > 0.0);
        s.start(&two_train_scenario()).unwrap();
        assert_eq!(s.time(), 0.0);
        assert_eq!(s.trains()[0].head_block, 0);
        assert_eq!(s.trains()[0].head_remaining, track::BLOCK_LENGTH - 300.0);
    }

    #[test]
    fn control_change_scales_next_tick() {
        let mut s = sim();
        s.start(&Scenario { trains: vec![spec("t0", 1, 72.0)], control: 0 }).unwrap();
        s.tick();
        let before = s.trains()[0].head_remaining;
        let v = s.trains()[0].speed;
        s.set_control(5).unwrap();
        s.tick();
        let moved = before - s.trains()[0].head_remaining;
        assert!((moved - v * 0.6).abs() < 1e-9);
        assert!(s.set_control(11).is_err());
    }

    #[test]
    fn occupancy_totality_over_a_long_run() {
        let mut s = sim();
        s.start(&two_train_scenario()).unwrap();
        for _ in 0..5000 {
            s.tick();
            let snap = s.snapshot();
            for b in 0..BLOCK_COUNT {
                let expected = s.trains().iter().any(|t| t.head_block == b || t.tail_block == b);
                assert_eq!(snap.blocks[b].occupied, expected);
            }
        }
    }

    #[test]
    fn entry_snap_is_logged() {
        use crate::output::history::SimLogEvent;
        use std::cell::RefCell;
        use std::rc::Rc;

        // A train entering under a U code at 300 km/h snaps to 80 km/h
        // on the first tick.
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = {
            let events = events.clone();
            Box::new(move |e| events.borrow_mut().push(e))
        };
        let mut s = Simulation::new(log);
        // Block 3 occupied by t1 puts U into block 1 (1-based).
        let scenario = Scenario {
            trains: vec![spec("t0", 1, 300.0), spec("t1", 3, 300.0)],
            control: 0,
        };
        s.start(&scenario).unwrap();
        s.tick();
        let snapped = events.borrow().iter().any(|e| match e {
            SimLogEvent::SpeedSnap(0, v) => (*v - 80.0 / 3.6).abs() < 1e-9,
            _ => false,
        });
        assert!(snapped);
        assert!((s.trains()[0].speed - 80.0 / 3.6).abs() < 1e-9);
    }
}
