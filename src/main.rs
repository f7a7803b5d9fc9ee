/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use config::GameConfig;
use domain::entity::{FrameInput, Intent};
use sim::event::GameEvent;
use sim::level::resolve_level;
use sim::step;
use sim::world::Session;
use ui::gamepad::GamepadState;
use ui::input::{intent_from, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

/// Ticks the loop may fall behind before it stops catching up.
const MAX_TICK_LAG: u32 = 4;

fn main() -> Result<()> {
    let config = GameConfig::load();
    init_logging(&config.log_file)?;
    for warning in &config.warnings {
        log::warn!("{warning}");
    }
    match &config.source {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config.toml found, using defaults"),
    }

    let (origin, level) = resolve_level(&config).context("could not load level")?;
    log::info!(
        "level {origin}: {} platforms, {} spiders, {} coins",
        level.platforms.len(), level.spiders.len(), level.coins.len(),
    );
    let mut session = Session::new(level, config.physics.clone());

    let mut renderer = Renderer::new(config.show_walls);
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e).context("terminal init failed");
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        log::error!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    log::info!("quit after {} attempts, {} coins", session.attempt + 1, session.score.count());
    println!("Coins collected: {}", session.score.count());
    Ok(())
}

/// The terminal is in raw mode while playing, so logs go to a file.
/// Filter with RUST_LOG (default `info`).
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    kb.enable_release_events(&mut io::stdout()).context("keyboard setup failed")?;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if !gp.connected {
        log::info!("no gamepad detected, keyboard only");
    }

    let tick_rate = config.tick_interval();
    let mut last_tick = Instant::now();
    let mut pending_jump = false;

    let result = loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            log::info!("quit requested");
            break Ok(());
        }

        // Latch between ticks so a tap shorter than a tick still jumps.
        if kb.jump_pressed() || gp.jump_pressed() {
            pending_jump = true;
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick += tick_rate;
            if last_tick.elapsed() > tick_rate * MAX_TICK_LAG {
                last_tick = Instant::now();
            }

            let input = FrameInput {
                intent: detect_intent(&kb, &gp),
                jump: std::mem::take(&mut pending_jump),
            };
            let events = step::step(session, input);
            process_events(sound, &events);

            if let Err(e) = renderer.render(session).context("render failed") {
                break Err(e);
            }
        }

        std::thread::sleep(FRAME_SLEEP);
    };

    kb.disable_release_events(&mut io::stdout())?;
    result
}

fn detect_intent(kb: &InputState, gp: &GamepadState) -> Intent {
    intent_from(kb.left_held() || gp.left_held(), kb.right_held() || gp.right_held())
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for &event in events {
        log::trace!("{event:?}");
        if let (Some(engine), Some(cue)) = (sound, event.sfx()) {
            engine.play(cue);
        }
    }
}
