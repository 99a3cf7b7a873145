//! Controller systems (FixedUpdate, порядок как в кадре оригинальной сцены)
//!
//! 1. move_batman — движение по осям
//! 2. handle_global_input — транспорт, сигнал
//! 3. handle_mode_input — запросы смены режима
//! 4. clear_input_edges — edges кадра обработаны

use bevy::prelude::*;

use super::{BatmanController, BatmanMode, ConfigError, ControllerConfig};
use crate::bus::{BusEvent, EventBus, PresentationBus};
use crate::events::{AlertStarted, AlertStopped, OpacityChanged, SignalToggled, VehicleToggled};
use crate::input::{InputAction, PlayerInput};
use crate::player::Player;

/// Система: движение player entity
///
/// Delta = фиксированный шаг (FixedUpdate), не wall-clock.
pub fn move_batman(
    input: Res<PlayerInput>,
    time: Res<Time<Fixed>>,
    mut query: Query<&mut BatmanController, With<Player>>,
) {
    let delta = time.timestep().as_secs_f32();

    for mut controller in query.iter_mut() {
        controller.tick(input.move_axis, input.modifier_held, delta);
    }
}

/// Система: вкл/выкл транспорт и сигнал
pub fn handle_global_input(
    input: Res<PlayerInput>,
    mut bus: ResMut<PresentationBus>,
    mut query: Query<&mut BatmanController, With<Player>>,
) {
    let toggle_vehicle = input.just_pressed(InputAction::ToggleVehicle);
    let toggle_signal = input.just_pressed(InputAction::ToggleSignal);
    if !toggle_vehicle && !toggle_signal {
        return;
    }

    for mut controller in query.iter_mut() {
        if toggle_vehicle {
            controller.toggle_vehicle(&mut bus.0);
        }
        if toggle_signal {
            controller.toggle_signal(&mut bus.0);
        }
    }
}

/// Система: смена режима по edges
///
/// Клавиши проверяет режим, активный на начало кадра (`BatmanMode::update_requests`),
/// в своём порядке. Порядок нажатия не важен.
pub fn handle_mode_input(
    input: Res<PlayerInput>,
    mut bus: ResMut<PresentationBus>,
    mut query: Query<&mut BatmanController, With<Player>>,
) {
    if input.pressed.is_empty() {
        return;
    }

    for mut controller in query.iter_mut() {
        let requests: Vec<BatmanMode> = controller.mode().update_requests(&input).collect();
        for target in requests {
            controller.request_transition(target, &mut bus.0);
        }
    }
}

pub fn clear_input_edges(mut input: ResMut<PlayerInput>) {
    input.clear_edges();
}

/// Система (Startup): спавн player entity, если его ещё нет
pub fn spawn_player_batman(
    mut commands: Commands,
    config: Res<ControllerConfig>,
    mut bus: ResMut<PresentationBus>,
    existing: Query<(), With<Player>>,
) {
    if !existing.is_empty() {
        return;
    }

    let controller = match BatmanController::new(ControllerConfig::clone(&config), &mut bus.0) {
        Ok(controller) => controller,
        Err(err) => {
            crate::log_error(&format!("Batman not spawned: {}", err));
            return;
        }
    };
    let entity = commands.spawn((controller, Player)).id();
    crate::log_info(&format!("Batman spawned: {:?} (base speed {:.2})", entity, config.base_speed));
}

/// Какие presentation cues никто не слушает
pub fn missing_presentation_listeners(bus: &EventBus) -> Vec<&'static str> {
    fn check<E: BusEvent>(bus: &EventBus, missing: &mut Vec<&'static str>) {
        if bus.listener_count::<E>() == 0 {
            missing.push(E::NAME);
        }
    }

    let mut missing = Vec::new();
    check::<AlertStarted>(bus, &mut missing);
    check::<AlertStopped>(bus, &mut missing);
    check::<OpacityChanged>(bus, &mut missing);
    check::<SignalToggled>(bus, &mut missing);
    check::<VehicleToggled>(bus, &mut missing);
    missing
}

/// Система (PostStartup): presentation collaborator не подключён
///
/// Не фатально: события просто уйдут в пустоту. Сообщаем один раз.
pub fn report_missing_presentation(bus: Res<PresentationBus>) {
    let missing = missing_presentation_listeners(&bus.0);
    if !missing.is_empty() {
        crate::log_warning(&format!(
            "Presentation is not wired: no listeners for {}",
            missing.join(", ")
        ));
    }
}

/// Спавн controller'а вне Startup (тесты, дополнительные сущности)
pub fn spawn_batman(
    world: &mut World,
    config: ControllerConfig,
    position: Vec2,
    player: bool,
) -> Result<Entity, ConfigError> {
    world.init_resource::<PresentationBus>();
    let controller = world.resource_scope(|_, mut bus: Mut<PresentationBus>| {
        BatmanController::with_position(config, position, &mut bus.0)
    })?;

    let mut entity = world.spawn(controller);
    if player {
        entity.insert(Player);
    }
    Ok(entity.id())
}
