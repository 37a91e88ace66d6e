//! Slingshot Sim entry point
//!
//! Line-oriented console front end: reads commands from stdin, drives a
//! `Runner` and prints state changes.

use std::io::{self, BufRead, Write};
use std::path::Path;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use slingshot_sim::sim::{
    self, EngineEvent, EngineState, FlightPhase, LevelSpec, LevelStatus, SubmitOutcome, Verdict,
};
use slingshot_sim::{ConfigError, RenderSink, Runner, Settings};

/// Longest a single command may run the simulation
const SETTLE_MAX_TICKS: u32 = 100_000;
const AUTO_AIM_ATTEMPTS: usize = 5_000;

const HELP: &str = "\
commands:
  angle <deg>        set launch angle (0-90)
  speed <v>          set launch speed
  launch             fire and run the flight
  reset              reload the current level
  analysis           toggle analysis mode (after a flight)
  probe <x> <y>      inspect the recorded path near a point
  answer <a> [b]     answer the level challenge
  auto               search for a shot that clears the level
  status             show the current state
  quit";

/// Prints a line whenever something a player would notice changes
#[derive(Default)]
struct ConsoleSink {
    last: Option<(FlightPhase, LevelStatus, String, usize)>,
}

impl RenderSink for ConsoleSink {
    fn render(&mut self, state: &EngineState) {
        let hits = state.targets.iter().filter(|t| t.hit).count();
        let key = (state.phase, state.status(), state.message.clone(), hits);
        if self.last.as_ref() == Some(&key) {
            return;
        }
        if state.phase == FlightPhase::Idle {
            println!("{}", state.message);
        } else {
            let p = state.projectile.pos;
            println!(
                "  flying ({:.1}, {:.1}), targets {}/{}",
                p.x,
                p.y,
                hits,
                state.targets.len()
            );
        }
        self.last = Some(key);
    }

    fn on_events(&mut self, events: &[EngineEvent]) {
        for event in events {
            match event {
                EngineEvent::TargetHit { index } => println!("  target {} hit!", index + 1),
                EngineEvent::ChallengeGraded(Verdict::Incorrect) => {
                    println!("  challenge missed; reset to try the level again")
                }
                _ => log::debug!("{event:?}"),
            }
        }
    }
}

fn print_status(state: &EngineState) {
    match state.status() {
        LevelStatus::Completed => {
            println!("{}", state.message);
            return;
        }
        LevelStatus::Active(i) => {
            println!("Level {}/{}: {}", i + 1, state.level_count(), state.message)
        }
    }
    println!(
        "  angle {:.1}°, speed {:.1}, gravity {}",
        state.params.angle_degrees, state.params.speed, state.config.gravity
    );
    let readouts = state.readouts();
    let label = if state.last_stats.is_some() {
        "actual"
    } else if state.forecast.estimated {
        "predicted (estimate)"
    } else {
        "predicted"
    };
    println!(
        "  {label}: max height {}, range {}, time of flight {}",
        readouts.max_height, readouts.range, readouts.time_of_flight
    );
    for (i, t) in state.targets.iter().enumerate() {
        println!(
            "  target {}: ({}, {}) {}x{} {}",
            i + 1,
            t.x,
            t.y,
            t.width,
            t.height,
            if t.hit { "HIT" } else { "" }
        );
    }
    if let Some(challenge) = &state.challenge {
        println!("  challenge: {}", challenge.spec.question());
        if let Some(feedback) = &challenge.feedback {
            println!("  feedback: {feedback}");
        }
    }
}

/// Level set from a JSON file, or the built-in campaign if it can't be used
fn load_levels(path: &Path) -> Vec<LevelSpec> {
    match std::fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|json| sim::levels_from_json(&json))
    {
        Ok(levels) => {
            log::info!("Loaded {} levels from {}", levels.len(), path.display());
            levels
        }
        Err(e) => {
            log::warn!("Using built-in campaign ({}: {e})", path.display());
            sim::campaign()
        }
    }
}

fn parse_args() -> (Settings, Vec<LevelSpec>, u64) {
    let mut settings = Settings::default();
    let mut levels = None;
    let mut seed = 1;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().and_then(|s| s.parse().ok()) {
                Some(s) => seed = s,
                None => log::warn!("--seed needs a number"),
            },
            "--levels" => match args.next() {
                Some(path) => levels = Some(load_levels(Path::new(&path))),
                None => log::warn!("--levels needs a path"),
            },
            _ => settings = Settings::load(Path::new(&arg)),
        }
    }
    (settings, levels.unwrap_or_else(sim::campaign), seed)
}

fn launch_and_settle(runner: &mut Runner<ConsoleSink>) {
    if !runner.launch() {
        println!("(can't launch right now)");
        return;
    }
    runner.settle(SETTLE_MAX_TICKS);
}

fn main() {
    env_logger::init();
    log::info!("Slingshot Sim starting...");

    let (settings, levels, seed) = parse_args();
    let mut rng = Pcg32::seed_from_u64(seed);
    let state = EngineState::new(settings, levels);
    let mut runner = Runner::new(state, ConsoleSink::default());
    print_status(runner.state());
    println!("{HELP}");

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            continue;
        };

        match command {
            "angle" | "speed" => {
                let Some(value) = rest.first().and_then(|v| v.parse::<f32>().ok()) else {
                    println!("usage: {command} <number>");
                    continue;
                };
                let p = runner.state().params;
                let (angle, speed) = if command == "angle" {
                    (value, p.speed)
                } else {
                    (p.angle_degrees, value)
                };
                match runner.set_launch_parameters(angle, speed) {
                    Ok(p) => {
                        let f = runner.state().forecast;
                        println!(
                            "angle {:.1}°, speed {:.1} -> max height {}, range {}, time {}{}",
                            p.angle_degrees,
                            p.speed,
                            sim::display_value(f.max_height),
                            sim::display_value(f.range),
                            sim::display_value(f.time_of_flight),
                            if f.estimated { " (estimate)" } else { "" }
                        );
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "launch" => launch_and_settle(&mut runner),
            "reset" => runner.reset(),
            "analysis" => {
                if runner.toggle_analysis() {
                    let mode = if runner.state().analysis_mode { "on" } else { "off" };
                    println!("analysis mode {mode}");
                } else {
                    println!("(analysis needs a finished flight)");
                }
            }
            "probe" => {
                let coords: Vec<f32> = rest.iter().filter_map(|v| v.parse().ok()).collect();
                let &[x, y] = coords.as_slice() else {
                    println!("usage: probe <x> <y>");
                    continue;
                };
                match runner.probe(Vec2::new(x, y)) {
                    Some(r) => println!(
                        "t={:.2}s pos=({:.1}, {:.1}) v=({:.2}, {:.2}) |v|={:.2} g=({:.2}, {:.2})",
                        r.sample.t,
                        r.sample.pos.x,
                        r.sample.pos.y,
                        r.sample.physics_vel.x,
                        r.sample.physics_vel.y,
                        r.speed,
                        r.gravity.x,
                        r.gravity.y
                    ),
                    None if runner.state().analysis_mode => println!("(no recorded point nearby)"),
                    None => println!("(analysis mode is off)"),
                }
            }
            "answer" => {
                let Some(first) = rest.first() else {
                    println!("usage: answer <a> [b]");
                    continue;
                };
                match runner.submit_challenge(first, rest.get(1).copied()) {
                    Ok(Some(SubmitOutcome::Graded(Verdict::Correct))) => println!("Correct!"),
                    Ok(Some(SubmitOutcome::Graded(Verdict::Incorrect))) => println!("Incorrect."),
                    Ok(Some(SubmitOutcome::Graded(Verdict::Guidance(text)))) => println!("{text}"),
                    Ok(Some(SubmitOutcome::AlreadyAnswered)) => println!("(already answered)"),
                    Ok(None) => println!("(no challenge on this level)"),
                    Err(e) => println!("{e}"),
                }
                runner.settle(SETTLE_MAX_TICKS);
            }
            "auto" => match sim::aim::search(runner.state(), &mut rng, AUTO_AIM_ATTEMPTS) {
                Some(trial) => {
                    let p = trial.params;
                    println!(
                        "auto-aim: angle {:.1}°, speed {:.1} ({} target(s))",
                        p.angle_degrees, p.speed, trial.hits
                    );
                    if runner.set_launch_parameters(p.angle_degrees, p.speed).is_ok() {
                        launch_and_settle(&mut runner);
                    }
                }
                None => println!("(nothing to aim at)"),
            },
            "status" => print_status(runner.state()),
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}' (try 'help')"),
        }
    }

    log::info!("Slingshot Sim exiting");
}
