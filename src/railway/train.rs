use crate::railway::track::{self, BlockId, BLOCK_LENGTH};

/// Consist lengths selectable in configuration, in meters
/// (8, 12, 16 and 17 car formations).
pub const TRAIN_LENGTHS: [f64; 4] = [209.0, 302.0, 414.0, 440.0];

/// A train that has just been placed by `start()` is allowed to snap
/// down to the code in its entry block once, before normal rate-limited
/// regulation takes over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    JustStarted,
    Running,
}

#[derive(Debug, Clone)]
pub struct Train {
    pub name: String,
    pub length: f64,
    /// User-configured ceiling, m/s.
    pub configured_speed: f64,
    /// Current speed, m/s. Written by the governor, read by `advance`
    /// on the following tick.
    pub speed: f64,
    pub head_block: BlockId,
    /// Distance from the head to the end of `head_block`, meters.
    pub head_remaining: f64,
    pub tail_block: BlockId,
    pub tail_remaining: f64,
    /// Time until the head reaches the next block at the current speed,
    /// seconds. Zero when standing still.
    pub time_to_next: f64,
    pub phase: Phase,
}

impl Train {
    pub fn place(name: String,
                 head_block: BlockId,
                 offset: f64,
                 speed: f64,
                 length: f64)
                 -> Train {
        let head_remaining = BLOCK_LENGTH - offset;
        let (tail_block, tail_remaining) = tail_position(head_block, head_remaining, length);
        Train {
            name: name,
            length: length,
            configured_speed: speed,
            speed: speed,
            head_block: head_block,
            head_remaining: head_remaining,
            tail_block: tail_block,
            tail_remaining: tail_remaining,
            time_to_next: if speed > 0.0 { head_remaining / speed } else { 0.0 },
            phase: Phase::JustStarted,
        }
    }

    /// Integrate the head position over `dt` seconds of simulated time
    /// and rederive the tail. Returns the block entered, if any.
    ///
    /// The caller keeps `dt` well below the block traversal time, so at
    /// most one block boundary is crossed per call.
    pub fn advance(&mut self, dt: f64) -> Option<BlockId> {
        let mut entered = None;
        if self.speed > 0.0 {
            self.head_remaining -= self.speed * dt;
            if self.head_remaining <= 0.0 {
                // The overshoot past the boundary carries over into the
                // next block rather than being clamped away.
                self.head_block = track::successor(self.head_block);
                self.head_remaining += BLOCK_LENGTH;
                entered = Some(self.head_block);
            }
            self.time_to_next = (self.head_remaining / self.speed).max(0.0);
        } else {
            self.time_to_next = 0.0;
        }

        let (tail_block, tail_remaining) =
            tail_position(self.head_block, self.head_remaining, self.length);
        self.tail_block = tail_block;
        self.tail_remaining = tail_remaining;

        entered
    }
}

/// Where the rear of the train is, given the head. Trains are shorter
/// than a block, so the tail is in the head's block or one behind it.
pub fn tail_position(head_block: BlockId, head_remaining: f64, length: f64) -> (BlockId, f64) {
    let tail_distance = head_remaining + length;
    if tail_distance <= BLOCK_LENGTH {
        (head_block, tail_distance)
    } else {
        (track::predecessor(head_block), tail_distance - BLOCK_LENGTH)
    }
}
