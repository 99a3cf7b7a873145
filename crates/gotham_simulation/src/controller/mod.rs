//! Entity controller — конечный автомат режимов (Normal / Stealth / Alert)
//!
//! - mode: режимы + чистая transition функция `(mode, target) → план эффектов`
//! - batman: `BatmanController` component, применяет планы, движение, транспорт
//! - config: `ControllerConfig` (TOML) + `ConfigError`
//! - systems: ECS обвязка над PlayerInput
//!
//! Controller ничего не знает о presentation: всё наружу — через `PresentationBus`.

use bevy::prelude::*;

pub mod batman;
pub mod config;
pub mod mode;
pub mod systems;


pub use batman::BatmanController;
pub use config::{AlertSpeedPolicy, ConfigError, ControllerConfig};
pub use mode::{plan_transition, BatmanMode, Phase, PhaseStep, SideEffect, TransitionPlan};
pub use systems::{missing_presentation_listeners, spawn_batman};

use crate::bus::PresentationBus;
use crate::input::PlayerInput;

/// Системы controller'а (presentation выполняется после них)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatmanSystems;

/// Batman Plugin
///
/// Ресурсы: `PresentationBus`, `PlayerInput`, `ControllerConfig` (если не вставлены раньше).
/// Startup: спавн player entity. PostStartup: проверка подключения presentation.
pub struct BatmanPlugin;

impl Plugin for BatmanPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PresentationBus>()
            .init_resource::<PlayerInput>()
            .init_resource::<ControllerConfig>()
            .add_systems(Startup, systems::spawn_player_batman)
            .add_systems(PostStartup, systems::report_missing_presentation)
            .add_systems(
                FixedUpdate,
                (
                    systems::move_batman,
                    systems::handle_global_input,
                    systems::handle_mode_input,
                    systems::clear_input_edges,
                )
                    .chain()
                    .in_set(BatmanSystems),
            );
    }
}
