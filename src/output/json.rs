use failure::Error;
use super::history::{History, SimLogEvent, Snapshot};
use crate::railway::track::block_name;

use std::io;

/// Writes the rendering snapshot as a single JSON object.
pub fn json_snapshot<W: io::Write>(snapshot: &Snapshot, f: &mut W) -> Result<(), Error> {
    write!(f, "{{ \"time\": {}, ", snapshot.time)?;

    write!(f, "\"trains\": [")?;
    let mut first = true;
    for t in &snapshot.trains {
        if first { first = false; } else { write!(f, ", ")?; }
        write!(f,
               "{{ \"name\": \"{}\", \"head\": \"{}\", \"tail\": \"{}\", \
                \"remaining_m\": {:.1}, \"remaining_s\": {:.1}, \
                \"speed_kmh\": {:.1}, \"limit_kmh\": {:.1} }}",
               t.name,
               block_name(t.head_block),
               block_name(t.tail_block),
               t.remaining_distance,
               t.remaining_time,
               t.speed_kmh,
               t.limit_kmh)?;
    }
    write!(f, "], ")?;

    write!(f, "\"blocks\": [")?;
    let mut first = true;
    for (b, status) in snapshot.blocks.iter().enumerate() {
        if first { first = false; } else { write!(f, ", ")?; }
        write!(f,
               "{{ \"block\": \"{}\", \"occupied\": {}, \"code\": \"{:?}\", \
                \"low_freq\": {}, \"carrier_freq\": {} }}",
               block_name(b),
               status.occupied,
               status.code,
               status.low_frequency,
               status.carrier_frequency)?;
    }
    write!(f, "] }}")?;
    Ok(())
}

/// Writes the event history as a JSON array of timestamped events.
pub fn json_history<W: io::Write>(history: &History, f: &mut W) -> Result<(), Error> {
    let w = |f: &mut W, t: f64, e: &str, r: String, v: String| {
        write!(f,
               "{{ \"time\": {:.1}, \"event\": \"{}\", \"ref\": \"{}\", \"value\": \"{}\" }}",
               t, e, r, v)
    };

    write!(f, "[")?;
    let mut t = 0.0;
    let mut first = true;
    for ev in &history.events {
        match *ev {
            SimLogEvent::Tick(dt) => {
                t += dt;
                continue;
            }
            SimLogEvent::Start => {
                if first { first = false; } else { write!(f, ", ")?; }
                w(f, t, "start", String::new(), String::new())?;
            }
            SimLogEvent::EnterBlock(train, block) => {
                if first { first = false; } else { write!(f, ", ")?; }
                w(f, t, "enter", format!("train{}", train), block_name(block))?;
            }
            SimLogEvent::Code(block, code) => {
                if first { first = false; } else { write!(f, ", ")?; }
                w(f, t, "code", block_name(block), format!("{:?}", code))?;
            }
            SimLogEvent::SpeedSnap(train, to) => {
                if first { first = false; } else { write!(f, ", ")?; }
                w(f, t, "snap", format!("train{}", train), format!("{:.1}", to * 3.6))?;
            }
        }
    }
    write!(f, "]")?;
    Ok(())
}
