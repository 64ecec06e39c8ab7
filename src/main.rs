//! Gold Catch entry point
//!
//! The web build is driven from JS through `gold_catch::web`. Natively this
//! plays one headless demo round with the autopilot and prints the result.
//!
//! Usage: `gold-catch [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gold Catch (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => gold_catch::RoundConfig::load(),
    };

    if let Err(e) = run_demo(config) {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is gold_catch::web::wasm_start
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> Result<gold_catch::RoundConfig, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(gold_catch::RoundConfig::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo(config: gold_catch::RoundConfig) -> Result<(), gold_catch::ConfigError> {
    use gold_catch::consts::FRAME_DT;
    use gold_catch::sim::{ItemKind, ItemOutcome, RoundController, RoundEvent, RoundPhase, autopilot};

    let mut round = RoundController::new(config)?;
    round.begin();

    // Generous frame cap: countdown + round + slack
    let max_frames = u32::from(round.config().countdown_secs)
        .saturating_add(round.config().round_length_secs)
        .saturating_add(5)
        .saturating_mul(60);
    for _ in 0..max_frames {
        if let Some(x) = autopilot::target_x(&round) {
            round.catcher_mut().center_on_x(x);
        }
        round.advance(FRAME_DT);

        for event in round.drain_events() {
            match event {
                RoundEvent::CountdownTick { remaining } => println!("{}...", remaining),
                RoundEvent::RoundStarted { round_length_secs } => {
                    println!("Go! {}s on the clock", round_length_secs)
                }
                RoundEvent::ItemResolved {
                    item,
                    outcome: ItemOutcome::Caught,
                } => println!("  caught {:?}", item.kind),
                RoundEvent::ScoreChanged { score } => println!("  score {}", score),
                RoundEvent::RoundEnded { reason, score } => {
                    println!("Round over: {:?}, final score {}", reason, score)
                }
                _ => {}
            }
        }

        if matches!(round.phase(), RoundPhase::Ended(_)) {
            break;
        }
    }

    let stats = round.stats();
    println!("Spawned {}, expired {}", stats.spawned, stats.expired);
    for kind in ItemKind::ALL {
        println!("  {:?}: {}", kind, stats.caught_of(kind));
    }
    Ok(())
}
