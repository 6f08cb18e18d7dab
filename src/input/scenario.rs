use crate::railway::track::{BLOCK_COUNT, BLOCK_LENGTH};
use crate::railway::train::TRAIN_LENGTHS;

pub const CONTROL_MIN: i32 = -10;
pub const CONTROL_MAX: i32 = 10;

/// One train as declared in a scenario file. Block numbers are the
/// 1-based track numbers used on the panel.
#[derive(Debug, Clone)]
pub struct TrainSpec {
    pub name: String,
    pub start_block: usize,
    /// Meters already travelled into the starting block.
    pub start_offset: f64,
    /// Configured ceiling, km/h.
    pub speed_kmh: f64,
    /// Consist length, meters.
    pub length: f64,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub trains: Vec<TrainSpec>,
    /// Initial throttle control value.
    pub control: i32,
}

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "train {}: starting track {} is not in 1..8", _0, _1)]
    InvalidBlock(String, usize),
    #[fail(display = "train {}: starting offset {} m is outside the block", _0, _1)]
    InvalidOffset(String, f64),
    #[fail(display = "train {}: configured speed {} km/h must be positive", _0, _1)]
    InvalidSpeed(String, f64),
    #[fail(display = "train {}: {} m is not a known consist length", _0, _1)]
    InvalidLength(String, f64),
    #[fail(display = "trains {} and {} cannot start on the same track", _0, _1)]
    SameStartBlock(String, String),
    #[fail(display = "control value {} is not in -10..10", _0)]
    InvalidControl(i32),
    #[fail(display = "scenario declares no trains")]
    NoTrains,
}

pub fn check_control(value: i32) -> Result<(), ConfigError> {
    if value < CONTROL_MIN || value > CONTROL_MAX {
        return Err(ConfigError::InvalidControl(value));
    }
    Ok(())
}

impl TrainSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_block < 1 || self.start_block > BLOCK_COUNT {
            return Err(ConfigError::InvalidBlock(self.name.clone(), self.start_block));
        }
        if !self.start_offset.is_finite() || self.start_offset < 0.0
            || self.start_offset > BLOCK_LENGTH {
            return Err(ConfigError::InvalidOffset(self.name.clone(), self.start_offset));
        }
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.name.clone(), self.speed_kmh));
        }
        if !TRAIN_LENGTHS.iter().any(|&l| l == self.length) {
            return Err(ConfigError::InvalidLength(self.name.clone(), self.length));
        }
        Ok(())
    }
}

impl Scenario {
    /// Checked before `start()` touches any simulation state, so a
    /// rejected scenario leaves the simulation exactly as it was.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trains.is_empty() {
            return Err(ConfigError::NoTrains);
        }
        check_control(self.control)?;
        for spec in &self.trains {
            spec.validate()?;
        }
        for (i, a) in self.trains.iter().enumerate() {
            for b in self.trains.iter().skip(i + 1) {
                if a.start_block == b.start_block {
                    return Err(ConfigError::SameStartBlock(a.name.clone(), b.name.clone()));
                }
            }
        }
        Ok(())
    }
}
