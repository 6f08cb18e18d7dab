use crate::railway::signalling::SignalCode;
use crate::railway::track::BlockId;

pub type TrainId = usize;

/// Discrete simulation events, reported through the logger injected
/// into the simulation and collected into a `History`.
#[derive(Debug)]
pub enum SimLogEvent {
    Start,
    /// One tick of `dt` simulated seconds completed.
    Tick(f64),
    /// A train's head entered a block.
    EnterBlock(TrainId, BlockId),
    /// A block's code changed to this value.
    Code(BlockId, SignalCode),
    /// The one-time entry snap reduced a train's speed to this value.
    SpeedSnap(TrainId, f64),
}

#[derive(Debug, Default)]
pub struct History {
    pub events: Vec<SimLogEvent>,
}

/// Per-train state published for rendering after each tick.
#[derive(Debug, Clone)]
pub struct TrainStatus {
    pub name: String,
    pub head_block: BlockId,
    pub tail_block: BlockId,
    /// Meters from the head to the next block.
    pub remaining_distance: f64,
    /// Seconds until the head reaches the next block.
    pub remaining_time: f64,
    /// Current speed, km/h.
    pub speed_kmh: f64,
    /// Speed the governor is steering towards, km/h.
    pub limit_kmh: f64,
}

/// Per-block state published for rendering after each tick.
#[derive(Debug, Copy, Clone)]
pub struct BlockStatus {
    pub occupied: bool,
    pub code: SignalCode,
    pub low_frequency: f64,
    pub carrier_frequency: f64,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Simulated seconds since start.
    pub time: f64,
    pub trains: Vec<TrainStatus>,
    pub blocks: [BlockStatus; crate::railway::track::BLOCK_COUNT],
}
