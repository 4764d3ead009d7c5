//! Self-play runner: two controllers, one match, JSON frames on stdout.
//!
//! Usage: `strikebot [seed] [ticks]`.

use std::env;
use std::process::ExitCode;

use strikebot_app::{Match, SelfPlayConfig};

fn main() -> ExitCode {
    env_logger::init();

    let mut config = SelfPlayConfig::default();
    let mut args = env::args().skip(1);
    if let Some(seed) = args.next() {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => {
                eprintln!("invalid seed: {seed}");
                return ExitCode::FAILURE;
            }
        }
    }
    if let Some(ticks) = args.next() {
        match ticks.parse() {
            Ok(ticks) => config.ticks = ticks,
            Err(_) => {
                eprintln!("invalid tick count: {ticks}");
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!(
        "self-play: seed {}, {} ticks, emitting every {}",
        config.seed,
        config.ticks,
        config.emit_every
    );

    let mut game = Match::new(&config);
    for _ in 0..config.ticks {
        let frame = game.tick();
        if frame.tick % config.emit_every == 0 {
            match serde_json::to_string(&frame) {
                Ok(line) => println!("{line}"),
                Err(err) => {
                    eprintln!("snapshot serialization failed: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    let score = game.score();
    log::info!("final score {}:{}", score.blue, score.orange);
    ExitCode::SUCCESS
}
