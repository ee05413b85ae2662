/// Entry point and game loop.

mod ui;

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use ladders::config::GameConfig;
use ladders::logging;
use ladders::sim::event::SimEvent;
use ladders::sim::level;
use ladders::sim::step;
use ladders::sim::world::World;
use ui::gamepad::{self, GamepadState};
use ui::input::{InputState, KEYS_QUIT, KEYS_RESTART};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() {
    let config = GameConfig::load();

    if let Err(e) = logging::init(&config.log.filter, &config.log.file) {
        eprintln!("Warning: could not open log file {}: {e}", config.log.file.display());
    }
    info!(
        tick_rate_ms = config.sim.tick_rate_ms,
        mask_timing = ?config.sim.mask_timing,
        level = ?config.level,
        "starting"
    );

    let def = level::load_or_embedded(config.level.as_deref());
    let mut world = World::from_level(&def, config.sim.options());

    let mut renderer = Renderer::new();
    let enhanced_keys = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let result = game_loop(&mut world, &mut renderer, enhanced_keys, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    info!(ticks = world.tick, "exiting");
}

fn game_loop(
    world: &mut World,
    renderer: &mut Renderer,
    enhanced_keys: bool,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced_keys;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let tick_rate = Duration::from_millis(config.sim.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            break;
        }
        if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
            log_events(&step::restart(world));
            last_tick = Instant::now();
        }

        if last_tick.elapsed() >= tick_rate {
            let input = gamepad::merge(kb.snapshot(), gp.snapshot());
            let events = step::step(world, input);
            log_events(&events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(events: &[SimEvent]) {
    for event in events {
        match event {
            SimEvent::StateChanged { from, to, animation, .. } => {
                debug!(from = from.name(), to = to.name(), animation, "state event");
            }
            SimEvent::LadderCapsToggled { changed, solid } => {
                debug!(changed, solid, "ladder caps");
            }
            SimEvent::Restarted => info!("restart requested"),
        }
    }
}
