use cabsim::*;
use cabsim::output::history::History;
use cabsim::railway::track::block_name;
use cabsim::sim::{self, Simulation};
use log::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use structopt::StructOpt;

/// Cabsim -- cab signalling simulation on a closed 8-block loop
#[derive(StructOpt, Debug)]
#[structopt(name = "cabsim")]
struct Opt {
    /// Verbose mode (-v, -vv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Scenario file declaring the trains and the throttle control
    #[structopt(parse(from_os_str))]
    scenario: PathBuf,

    /// Number of ticks to simulate
    #[structopt(short = "t", long = "ticks", default_value = "600")]
    ticks: u64,

    /// Override the scenario's throttle control value (-10..10)
    #[structopt(short = "c", long = "control")]
    control: Option<i32>,

    /// Sleep the throttle-adjusted interval between ticks
    #[structopt(short = "r", long = "realtime")]
    realtime: bool,

    /// Write the final snapshot as JSON
    #[structopt(short = "j", long = "json", parse(from_os_str))]
    json: Option<PathBuf>,
}

fn run(opt: &Opt) -> AppResult<()> {
    let mut scenario = get_scenario(&opt.scenario)?;
    if let Some(v) = opt.control {
        scenario.control = v;
    }
    info!("scenario: {:?}", scenario);

    let (history, snapshot) = if opt.realtime {
        run_realtime(&scenario, opt.ticks)?
    } else {
        run_scenario(&scenario, opt.ticks)?
    };

    if opt.verbose >= 1 {
        println!("# History:");
        for ev in &history.events {
            println!("> {:?}", ev);
        }
    }

    println!("# Final state at t = {:.1} s:", snapshot.time);
    for t in &snapshot.trains {
        println!("## Train {}: head {} tail {} next block in {:.0} m / {:.1} s, \
                  {:.0} km/h (limit {:.0} km/h)",
                 t.name,
                 block_name(t.head_block),
                 block_name(t.tail_block),
                 t.remaining_distance,
                 t.remaining_time,
                 t.speed_kmh,
                 t.limit_kmh);
    }
    for (b, status) in snapshot.blocks.iter().enumerate() {
        println!("> {} {} code {:?} low {:.1} Hz carrier {:.1} Hz",
                 block_name(b),
                 if status.occupied { "occupied" } else { "free" },
                 status.code,
                 status.low_frequency,
                 status.carrier_frequency);
    }

    if let Some(ref json) = opt.json {
        use std::fs::File;
        use std::io::BufWriter;
        let file = File::create(json)?;
        let mut writer = BufWriter::new(&file);
        cabsim::output::json::json_snapshot(&snapshot, &mut writer)?;
    }

    Ok(())
}

/// Like `run_scenario`, but paced by the wall clock: each tick is
/// followed by the throttle-adjusted interval, mimicking the periodic
/// timer of an interactive frontend.
fn run_realtime(scenario: &cabsim::input::scenario::Scenario,
                ticks: u64)
                -> AppResult<(History, cabsim::output::history::Snapshot)> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let logger = {
        let events = events.clone();
        Box::new(move |ev| events.borrow_mut().push(ev))
    };

    let mut simulation = Simulation::new(logger);
    simulation.start(scenario)?;
    for _ in 0..ticks {
        simulation.tick();
        let interval = sim::adjusted_interval_ms(simulation.control());
        std::thread::sleep(std::time::Duration::from_millis(interval));
    }
    let snapshot = simulation.snapshot();

    Ok((History { events: events.replace(Vec::new()) }, snapshot))
}

pub fn main() {
    let opt = Opt::from_args();
    let level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("logger: {}", e);
    }

    match run(&opt) {
        Ok(()) => {}
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        }
    }
}
