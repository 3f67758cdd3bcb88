//! Crystal Labyrinth Demo
//!
//! Runs a scripted hot-seat match with a simple greedy bot on every
//! seat, logs the events as they happen, then replays the identical
//! script to verify the simulation is deterministic.

use anyhow::{anyhow, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crystal_labyrinth::core::hash::StateHash;
use crystal_labyrinth::core::rng::DeterministicRng;
use crystal_labyrinth::{
    GameConfig, GameEngine, GameEvent, Point, TurnPhase, ViewConfig, VERSION,
};

/// Frame delta fed to the animation pump, in milliseconds.
const FRAME_MS: u32 = 16;
/// Bot gives up after this many turns.
const MAX_TURNS: u32 = 200;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Crystal Labyrinth v{}", VERSION);

    let config = GameConfig::new(vec!["Aster".into(), "Briar".into()], 2, 0xC0FFEE);

    info!("=== First Run ===");
    let hash1 = run_match(config.clone())?;

    info!("=== Replay Run ===");
    let hash2 = run_match(config)?;

    info!("first run hash:  {}", hex::encode(hash1));
    info!("replay run hash: {}", hex::encode(hash2));

    if hash1 == hash2 {
        info!("DETERMINISM VERIFIED: hashes match!");
    } else {
        info!("DETERMINISM FAILURE: hashes differ!");
    }

    Ok(())
}

/// Play one bot match to completion (or the turn cap) and return the
/// final board hash.
fn run_match(config: GameConfig) -> Result<StateHash> {
    let mut engine = GameEngine::new(ViewConfig::default());
    engine.start(config)?;

    let seed = engine
        .grid()
        .map(|g| g.seed())
        .ok_or_else(|| anyhow!("no board after start"))?;
    // Separate stream so bot choices never disturb board randomness.
    let mut bot = DeterministicRng::new(seed ^ 0x0B07);

    while engine.turn() < MAX_TURNS && !engine.is_game_complete() {
        let before = engine.turn();
        play_turn(&mut engine, &mut bot);
        for event in engine.take_events() {
            log_event(&event);
        }
        if engine.turn() == before {
            break;
        }
    }

    let summary = serde_json::json!({
        "turns": engine.turn(),
        "complete": engine.is_game_complete(),
        "winner": engine.winner().map(|seat| seat.0),
        "players": engine.grid().map(|g| {
            g.players()
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "collected": p.collected_count(),
                        "remaining": p.remaining_count(),
                    })
                })
                .collect::<Vec<_>>()
        }),
    });
    info!("match summary: {}", serde_json::to_string_pretty(&summary)?);

    engine
        .compute_hash()
        .ok_or_else(|| anyhow!("no board after match"))
}

/// One full bot turn: insert the spare somewhere legal, then walk
/// toward the target crystal when it is reachable.
fn play_turn(engine: &mut GameEngine, bot: &mut DeterministicRng) {
    // Shift through a random open slot.
    let slots: Vec<Point> = match engine.grid() {
        Some(grid) => grid
            .tiles()
            .filter(|t| t.is_insertion_point())
            .map(|t| t.position)
            .collect(),
        None => return,
    };
    let Some(&slot) = bot.choose(&slots) else { return };
    let click = engine.grid_to_screen(slot);
    engine.on_click(click);
    settle(engine);

    if engine.phase() != TurnPhase::Moving {
        return;
    }

    // Prefer the target crystal's tile; otherwise wander somewhere
    // connected.
    let target = engine
        .current_player()
        .and_then(|p| p.target_collectible())
        .and_then(|id| engine.grid().and_then(|g| g.collectible(id)))
        .map(|c| c.position);
    let connected: Vec<Point> = match engine.grid() {
        Some(grid) => grid
            .tiles()
            .filter(|t| t.connected && t.player.is_none())
            .map(|t| t.position)
            .collect(),
        None => return,
    };

    let destination = match target {
        Some(t) if connected.contains(&t) => Some(t),
        _ => bot.choose(&connected).copied(),
    };
    let destination = match destination {
        Some(d) => d,
        // Sealed in completely: pass by walking in place.
        None => match engine.current_player() {
            Some(p) => p.position,
            None => return,
        },
    };

    let click = engine.grid_to_screen(destination);
    engine.on_click(click);
    settle(engine);
}

/// Pump the animation until it settles.
fn settle(engine: &mut GameEngine) {
    while engine.is_animating() {
        engine.tick(FRAME_MS);
    }
}

/// Log the interesting events the way a session layer would.
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameStarted {
            num_players,
            total_collectibles,
            seed,
        } => {
            info!("game started: {num_players} players, {total_collectibles} crystals, seed {seed}");
        }
        GameEvent::LaneShifted {
            insert_slot,
            direction,
            ..
        } => {
            info!("lane shifted through {insert_slot:?} pushing {direction:?}");
        }
        GameEvent::PlayerMoved { seat, to, hops, .. } => {
            info!("seat {} walked {hops} tiles to {to:?}", seat.0);
        }
        GameEvent::CollectibleGathered { seat, remaining, .. } => {
            info!("seat {} gathered a crystal ({remaining} to go)", seat.0);
        }
        GameEvent::GameCompleted { winner, turn } => {
            info!("seat {} completed their list on turn {turn}!", winner.0);
        }
        GameEvent::SpareRotated { .. } | GameEvent::TurnAdvanced { .. } => {}
    }
}
