#[macro_use]
extern crate failure_derive;

pub mod input;
pub mod output;
pub mod railway;
pub mod sim;

use crate::input::scenario::Scenario;
use crate::output::history::{History, Snapshot};
use crate::sim::Simulation;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub type AppResult<T> = Result<T, failure::Error>;

pub fn read_file(f: &Path) -> AppResult<String> {
    use std::fs::File;
    use std::io::prelude::*;
    use std::io::BufReader;

    let file = File::open(f)?;
    let mut file = BufReader::new(&file);
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn get_scenario(f: &Path) -> AppResult<Scenario> {
    let contents = read_file(f)?;
    get_scenario_string(&contents)
}

pub fn get_scenario_string(s: &str) -> AppResult<Scenario> {
    let scenario = input::scenario_parser::parse_scenario(s)?;
    Ok(scenario)
}

/// Starts a simulation from the scenario, runs it for `ticks` ticks and
/// returns the collected event history together with the final
/// snapshot.
pub fn run_scenario(scenario: &Scenario, ticks: u64) -> AppResult<(History, Snapshot)> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let logger = {
        let events = events.clone();
        Box::new(move |ev| events.borrow_mut().push(ev))
    };

    let mut simulation = Simulation::new(logger);
    simulation.start(scenario)?;
    for _ in 0..ticks {
        simulation.tick();
    }
    let snapshot = simulation.snapshot();

    Ok((History { events: events.replace(Vec::new()) }, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::history::SimLogEvent;

    const TWO_TRAINS: &str = "\
        train t0 track=1 offset=300.0 v=300 l=209\n\
        train t1 track=5 offset=300.0 v=300 l=209\n";

    #[test]
    fn scenario_runs_end_to_end() {
        let scenario = get_scenario_string(TWO_TRAINS).unwrap();
        let (history, snapshot) = run_scenario(&scenario, 600).unwrap();
        assert!((snapshot.time - 60.0).abs() < 1e-6);
        assert!(history.events.iter().any(|e| match e {
            SimLogEvent::EnterBlock(..) => true,
            _ => false,
        }));
        for t in &snapshot.trains {
            assert!(t.speed_kmh >= 0.0 && t.speed_kmh <= 300.0 + 1e-9);
        }
    }

    #[test]
    fn invalid_scenario_is_rejected() {
        let scenario = get_scenario_string("\
            train t0 track=2 offset=0 v=300 l=209\n\
            train t1 track=2 offset=0 v=300 l=209\n").unwrap();
        assert!(run_scenario(&scenario, 1).is_err());
    }
}
