use crate::railway::signalling::SignalCode;
use crate::railway::train::{Phase, Train};

/// Service acceleration, m/s^2. The same rate applies under every code.
pub const ACCELERATION: f64 = 1.28;

/// Braking rate commanded under each code, m/s^2.
pub fn deceleration(code: SignalCode) -> f64 {
    match code {
        SignalCode::L => 0.5,
        SignalCode::LU => 0.8,
        SignalCode::U => 1.2,
        SignalCode::H => 2.5,
    }
}

/// Ceiling imposed by a code, m/s. L imposes none.
pub fn speed_limit(code: SignalCode) -> Option<f64> {
    match code {
        SignalCode::L => None,
        SignalCode::LU => Some(160.0 / 3.6),
        SignalCode::U => Some(80.0 / 3.6),
        SignalCode::H => Some(0.0),
    }
}

/// The speed the train should settle at under `code`, never above the
/// configured ceiling.
pub fn target_speed(code: SignalCode, configured_speed: f64) -> f64 {
    match speed_limit(code) {
        Some(limit) => limit.min(configured_speed),
        None => configured_speed,
    }
}

/// One regulation step against the code in the train's head block.
/// Returns the snapped-to speed if the one-time entry snap fired.
///
/// On the first tick after start the train is assumed to already comply
/// with the code at its entry block, so an excess is removed at once
/// rather than braked away. Every later tick approaches the target at
/// the code's braking rate or the service acceleration, saturating at
/// the target.
pub fn adjust_speed(train: &mut Train, code: SignalCode, dt: f64) -> Option<f64> {
    let target = target_speed(code, train.configured_speed);
    match train.phase {
        Phase::JustStarted => {
            train.phase = Phase::Running;
            if train.speed > target {
                train.speed = target;
                return Some(target);
            }
        }
        Phase::Running => {
            if train.speed > target {
                train.speed = (train.speed - deceleration(code) * dt).max(target);
            } else if train.speed < target {
                train.speed = (train.speed + ACCELERATION * dt).min(target);
            }
        }
    }
    None
}
