use crate::railway::track::BLOCK_COUNT;
use crate::railway::train::Train;

/// Track-circuit occupancy, rebuilt from scratch every tick: a block is
/// occupied iff some train's head or tail is in it.
pub fn recompute(trains: &[Train]) -> [bool; BLOCK_COUNT] {
    let mut occupied = [false; BLOCK_COUNT];
    for train in trains {
        occupied[train.head_block] = true;
        occupied[train.tail_block] = true;
    }
    occupied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_and_tails_only() {
        // 300 m into the block keeps each 209 m tail in the same block.
        let trains = [Train::place("t0".to_string(), 0, 300.0, 80.0, 209.0),
                      Train::place("t1".to_string(), 4, 300.0, 80.0, 209.0)];
        let occ = recompute(&trains);
        for b in 0..BLOCK_COUNT {
            assert_eq!(occ[b], b == 0 || b == 4);
        }
    }

    #[test]
    fn tail_in_previous_block_counts() {
        // Head 50 m into block 3: the tail reaches back into block 2.
        let trains = [Train::place("t0".to_string(), 2, 50.0, 80.0, 209.0)];
        let occ = recompute(&trains);
        assert!(occ[2]);
        assert!(occ[1]);
        assert_eq!(occ.iter().filter(|&&o| o).count(), 2);
    }

    #[test]
    fn no_trains_no_occupancy() {
        let occ = recompute(&[]);
        assert!(occ.iter().all(|&o| !o));
    }
}
