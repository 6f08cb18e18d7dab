pub type BlockId = usize;

pub const BLOCK_COUNT: usize = 8;
pub const BLOCK_LENGTH: f64 = 1500.0;

/// Carrier frequencies cycled across the loop. Display only, the
/// signalling logic never reads these.
pub const CARRIER_FREQUENCIES: [f64; 4] = [2301.4, 1698.2, 2298.7, 1701.4];

pub fn successor(b: BlockId) -> BlockId {
    (b + 1) % BLOCK_COUNT
}

pub fn predecessor(b: BlockId) -> BlockId {
    (b + BLOCK_COUNT - 1) % BLOCK_COUNT
}

pub fn carrier_frequency(b: BlockId) -> f64 {
    CARRIER_FREQUENCIES[b % CARRIER_FREQUENCIES.len()]
}

/// Presentation name of a block, matching the interlocking convention
/// used on the panel ("01G".."08G").
pub fn block_name(b: BlockId) -> String {
    format!("{:02}G", b + 1)
}
