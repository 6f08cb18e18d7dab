//! Railway model: the fixed block loop, per-train kinematics, track
//! circuit occupancy, cab signal codes and speed regulation.

pub mod governor;
pub mod occupancy;
pub mod signalling;
pub mod track;
pub mod train;
