//! Gotham Simulation Core
//!
//! Headless ECS-симуляция player entity на Bevy 0.16:
//! - controller: конечный автомат режимов (Normal / Stealth / Alert), скорость, транспорт
//! - bus: typed синхронная publish/subscribe шина (controller → presentation)
//! - presentation: headless модель UI/effects слоя (свет, звук, прозрачность, сигнал)
//!
//! Поток данных однонаправленный: input → controller → bus → presentation.
//! Рендер, физика, ассеты и аудио микширование — вне симуляции.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod bus;
pub mod controller;
pub mod events;
pub mod input;
pub mod journal;
pub mod logger;
pub mod player;
pub mod presentation;

// Re-export для удобства
pub use bus::{BusEvent, EventBus, PresentationBus, SubscriptionHandle};
pub use controller::{
    AlertSpeedPolicy, BatmanController, BatmanMode, BatmanPlugin, BatmanSystems, ConfigError,
    ControllerConfig,
};
pub use events::{
    AlertStarted, AlertStopped, Cue, ModeEntered, ModeExited, OpacityChanged, SignalToggled,
    VehicleToggled,
};
pub use input::{InputAction, PlayerInput, ScriptedInputPlugin};
pub use journal::{EventJournal, Recorded};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use player::Player;
pub use presentation::{PresentationPlugin, PresentationReactor, PresentationState};

/// Частота simulation tick (Hz)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (controller + presentation)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Presentation первым: подписка на шину до спавна player entity
            .add_plugins((PresentationPlugin, BatmanPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается ровно на один fixed шаг за `app.update()`
/// (первый update — Startup, delta = 0), поэтому прогоны воспроизводимы.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сериализуются через Debug, отсортированные по Entity index.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
