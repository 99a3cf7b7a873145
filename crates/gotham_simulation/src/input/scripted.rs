//! Скриптованный ввод из DeterministicRng (headless прогоны, тесты детерминизма)

use bevy::prelude::*;
use rand::Rng;

use super::{InputAction, PlayerInput};
use crate::controller::BatmanSystems;
use crate::DeterministicRng;

/// Вероятности для генератора ввода (на один fixed тик)
#[derive(Resource, Debug, Clone)]
pub struct ScriptedInputConfig {
    /// Шанс держать модификатор бега
    pub modifier_chance: f64,
    /// Шанс нажатия каждого дискретного action
    pub press_chance: f64,
    /// Шанс сменить направление движения
    pub steer_chance: f64,
}

impl Default for ScriptedInputConfig {
    fn default() -> Self {
        Self {
            modifier_chance: 0.3,
            press_chance: 0.02, // ~1 нажатие в секунду на все action'ы при 60Hz
            steer_chance: 0.05,
        }
    }
}

/// Система: заполняет PlayerInput перед controller системами
///
/// Направление держится несколько тиков (как у живого игрока), а не меняется каждый тик.
pub fn scripted_input(
    mut rng: ResMut<DeterministicRng>,
    config: Res<ScriptedInputConfig>,
    mut input: ResMut<PlayerInput>,
) {
    let rng = &mut rng.rng;

    if rng.gen_bool(config.steer_chance) {
        // Оси движка: -1, 0 или 1 по каждой
        input.move_axis = Vec2::new(rng.gen_range(-1..=1) as f32, rng.gen_range(-1..=1) as f32);
    }
    input.modifier_held = rng.gen_bool(config.modifier_chance);

    for action in InputAction::ALL {
        if rng.gen_bool(config.press_chance) {
            input.press(action);
        }
    }
}

pub struct ScriptedInputPlugin;

impl Plugin for ScriptedInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScriptedInputConfig>()
            .init_resource::<PlayerInput>()
            .add_systems(FixedUpdate, scripted_input.before(BatmanSystems));
    }
}
