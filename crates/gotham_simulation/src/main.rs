//! Headless симуляция Gotham
//!
//! Запускает Bevy App без рендера: скриптованный ввод из seed → controller → presentation.
//!
//! Usage: gotham_simulation [config.toml] [seed]
//! Уровень логов: GOTHAM_LOG=debug|info|warning|error

use bevy::prelude::*;
use gotham_simulation::{
    create_headless_app, log_error, log_info, set_log_level, BatmanController, ControllerConfig,
    EventJournal, LogLevel, Player, PresentationBus, PresentationReactor, Recorded,
    ScriptedInputPlugin, SimulationPlugin,
};

const TICKS: usize = 1000;
const DEFAULT_SEED: u64 = 42;

fn main() {
    if let Some(level) = std::env::var("GOTHAM_LOG").ok().as_deref().and_then(LogLevel::parse) {
        set_log_level(level);
    }

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next());
    let seed = args
        .next()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut app = create_headless_app(seed);
    log_info(&format!("Starting Gotham headless simulation (seed: {})", seed));

    app.insert_resource(config)
        .add_plugins((SimulationPlugin, ScriptedInputPlugin));

    let journal = {
        let mut bus = app.world_mut().resource_mut::<PresentationBus>();
        EventJournal::attach(&mut bus.0)
    };

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let mut query = world.query_filtered::<&BatmanController, With<Player>>();
            for controller in query.iter(world) {
                log_info(&format!(
                    "Tick {}: mode {} at ({:.2}, {:.2}), speed {:.2}, vehicle {}",
                    tick,
                    controller.mode().as_str(),
                    controller.position.x,
                    controller.position.y,
                    controller.current_speed(),
                    controller.is_vehicle_engaged()
                ));
            }
        }
    }

    let presentation = app.world().resource::<PresentationReactor>().snapshot();
    log_info(&format!(
        "Simulation complete! mode entries: {}, alerts: {}, signal toggles: {}, vehicle toggles: {}",
        journal.count(|entry| matches!(entry, Recorded::Entered(_))),
        journal.count(|entry| *entry == Recorded::AlertStarted),
        journal.count(|entry| *entry == Recorded::SignalToggled),
        journal.count(|entry| matches!(entry, Recorded::Vehicle(_))),
    ));
    log_info(&format!("Presentation: {:?}", presentation));
}

/// Невалидный конфиг не фатален: логируем и работаем на defaults
fn load_config(path: Option<String>) -> ControllerConfig {
    let Some(path) = path else {
        return ControllerConfig::default();
    };

    match ControllerConfig::load(&path) {
        Ok(config) => {
            log_info(&format!("Loaded controller config from {}", path));
            config
        }
        Err(err) => {
            log_error(&format!("{}; falling back to defaults", err));
            ControllerConfig::default()
        }
    }
}
