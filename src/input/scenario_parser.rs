use crate::input::scenario::{Scenario, TrainSpec};
use regex::Regex;

#[derive(Debug, Fail)]
pub enum ParseError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "error converting number")]
    NumberError,
    #[fail(display = "control given more than once")]
    DuplicateControl,
    #[fail(display = "unrecognized scenario line: {}", _0)]
    Unrecognized(String),
}

/// Parses the scenario format, one statement per line:
///
/// * train t0 track=1 offset=0.0 v=300 l=209
/// * control 5
///
/// Blank lines and `#` comments are skipped.
pub fn parse_scenario(input: &str) -> Result<Scenario, ParseError> {
    let train_re = Regex::new(r"(?x) ^ \s* train \s+ (?P<name>\w+) \s+
            track \s* = \s* (?P<track>\d+) \s+
            offset \s* = \s* (?P<offset>[\d\.]+) \s+
            v \s* = \s* (?P<vel>[\d\.]+) \s+
            l \s* = \s* (?P<len>[\d\.]+) \s*
            $").map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;
    let control_re = Regex::new(r"^\s*control\s+(-?\d+)\s*$")
        .map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;

    let mut trains = Vec::new();
    let mut control = None;
    for line in input.lines() {
        let line = line.split('#').next().unwrap_or("");
        if line.trim().is_empty() {
            continue;
        }
        if let Some(groups) = train_re.captures(line) {
            trains.push(TrainSpec {
                name: groups["name"].to_string(),
                start_block: groups["track"].parse::<usize>()
                    .map_err(|_e| ParseError::NumberError)?,
                start_offset: groups["offset"].parse::<f64>()
                    .map_err(|_e| ParseError::NumberError)?,
                speed_kmh: groups["vel"].parse::<f64>()
                    .map_err(|_e| ParseError::NumberError)?,
                length: groups["len"].parse::<f64>()
                    .map_err(|_e| ParseError::NumberError)?,
            });
            continue;
        }
        if let Some(groups) = control_re.captures(line) {
            if control.is_some() {
                return Err(ParseError::DuplicateControl);
            }
            control = Some(groups[1].parse::<i32>().map_err(|_e| ParseError::NumberError)?);
            continue;
        }
        return Err(ParseError::Unrecognized(line.to_string()));
    }

    Ok(Scenario {
        trains: trains,
        control: control.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trains_and_control() {
        let s = parse_scenario("\
            # startup scenario\n\
            train t0 track=1 offset=0.0 v=300 l=209\n\
            train t1 track=5 offset=0.0 v=300 l=209\n\
            \n\
            control 5\n").unwrap();
        assert_eq!(s.trains.len(), 2);
        assert_eq!(s.trains[0].name, "t0");
        assert_eq!(s.trains[0].start_block, 1);
        assert_eq!(s.trains[1].start_block, 5);
        assert_eq!(s.trains[1].speed_kmh, 300.0);
        assert_eq!(s.trains[1].length, 209.0);
        assert_eq!(s.control, 5);
    }

    #[test]
    fn control_defaults_to_zero() {
        let s = parse_scenario("train t0 track=2 offset=100.0 v=80 l=302\n").unwrap();
        assert_eq!(s.control, 0);
        assert_eq!(s.trains[0].start_offset, 100.0);
    }

    #[test]
    fn negative_control_parses() {
        let s = parse_scenario("train t0 track=1 offset=0 v=80 l=209\ncontrol -4\n").unwrap();
        assert_eq!(s.control, -4);
    }

    #[test]
    fn rejects_unknown_lines() {
        match parse_scenario("trian t0 track=1 offset=0 v=80 l=209\n") {
            Err(ParseError::Unrecognized(_)) => {}
            other => panic!("expected Unrecognized, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_control() {
        let r = parse_scenario("control 1\ncontrol 2\n");
        match r {
            Err(ParseError::DuplicateControl) => {}
            other => panic!("expected DuplicateControl, got {:?}", other),
        }
    }
}
