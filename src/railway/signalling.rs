use crate::railway::track::{BlockId, BLOCK_COUNT};

/// Cab signal code carried by a block's track circuit, ordered by
/// severity: L (clear) < LU < U < H (stop).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalCode {
    L,
    LU,
    U,
    H,
}

impl SignalCode {
    /// The low-frequency modulation standing in for this code, Hz.
    pub fn low_frequency(self) -> f64 {
        match self {
            SignalCode::L => 11.4,
            SignalCode::LU => 13.6,
            SignalCode::U => 16.9,
            SignalCode::H => 29.0,
        }
    }
}

/// Code received by the k-th block behind an occupied one (k = 1..4):
/// H immediately behind, then U, LU, L with growing distance.
const LOOKAHEAD: [SignalCode; 4] = [SignalCode::H, SignalCode::U, SignalCode::LU, SignalCode::L];

/// Recompute every block's code from the occupancy snapshot. Blocks
/// outside any look-ahead window stay at L. A block inside two windows
/// keeps the more severe code.
///
/// With 8 blocks and a 4-block look-ahead the window can wrap far
/// enough that an occupied block receives a code from a train behind
/// it. That matches the fielded behavior of this small loop and is
/// deliberately not corrected here.
pub fn propagate(occupancy: &[bool; BLOCK_COUNT]) -> [SignalCode; BLOCK_COUNT] {
    let mut codes = [SignalCode::L; BLOCK_COUNT];
    for b in 0..BLOCK_COUNT {
        if !occupancy[b] {
            continue;
        }
        for (k, &code) in LOOKAHEAD.iter().enumerate() {
            let target: BlockId = (b + BLOCK_COUNT - (k + 1)) % BLOCK_COUNT;
            codes[target] = codes[target].max(code);
        }
    }
    codes
}
