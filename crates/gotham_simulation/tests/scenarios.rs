//! Scenario tests: PlayerInput → controller systems → PresentationBus → presentation
//!
//! Каждый `step` — один FixedUpdate тик (запускаем schedule напрямую, без wall-clock).

use bevy::prelude::*;
use gotham_simulation::controller::{missing_presentation_listeners, spawn_batman};
use gotham_simulation::*;

/// Helper: App с controller + presentation, player entity заспавнен, journal подключен
fn create_scene_app() -> (App, EventJournal) {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);

    let journal = {
        let mut bus = app.world_mut().resource_mut::<PresentationBus>();
        EventJournal::attach(&mut bus.0)
    };

    // Первый update: Startup (спавн) + PostStartup, fixed тиков нет
    app.update();
    (app, journal)
}

fn step(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn press(app: &mut App, action: InputAction) {
    app.world_mut().resource_mut::<PlayerInput>().press(action);
}

fn player(app: &mut App) -> BatmanController {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&BatmanController, With<Player>>();
    query.iter(world).next().cloned().expect("player batman spawned")
}

fn presentation(app: &App) -> PresentationState {
    app.world().resource::<PresentationReactor>().snapshot()
}

#[test]
fn test_player_spawned_in_normal() {
    let (mut app, journal) = create_scene_app();

    let batman = player(&mut app);
    assert_eq!(batman.mode(), BatmanMode::Normal);
    assert_eq!(batman.current_speed(), 5.0);

    assert_eq!(
        journal.entries(),
        vec![
            Recorded::Entered(BatmanMode::Normal),
            Recorded::AlertStopped,
            Recorded::Opacity(1.0),
        ]
    );

    let state = presentation(&app);
    assert_eq!(state.opacity, 1.0);
    assert!(!state.alarm_active);
}

#[test]
fn test_stealth_then_alert_through_input() {
    let (mut app, journal) = create_scene_app();
    journal.take();

    press(&mut app, InputAction::EnterStealth);
    step(&mut app);

    assert_eq!(player(&mut app).current_speed(), 2.5);
    assert_eq!(journal.cues(), vec![Recorded::AlertStopped, Recorded::Opacity(0.7)]);
    assert_eq!(presentation(&app).opacity, 0.7);
    journal.take();

    press(&mut app, InputAction::EnterAlert);
    step(&mut app);

    let batman = player(&mut app);
    assert_eq!(batman.mode(), BatmanMode::Alert);
    assert_eq!(journal.cues(), vec![Recorded::AlertStarted, Recorded::Opacity(1.0)]);

    let state = presentation(&app);
    assert!(state.alarm_active);
    assert!(state.audio_playing);
    assert_eq!(state.opacity, 1.0);

    // Alert → Normal: Alert.Exit гасит тревогу
    press(&mut app, InputAction::EnterNormal);
    step(&mut app);

    let state = presentation(&app);
    assert!(!state.alarm_active);
    assert!(!state.audio_playing);
    assert_eq!(player(&mut app).current_speed(), 5.0);
}

#[test]
fn test_edges_consumed_once() {
    let (mut app, _journal) = create_scene_app();

    press(&mut app, InputAction::EnterStealth);
    step(&mut app);
    assert!(app.world().resource::<PlayerInput>().pressed.is_empty());

    // Следующий тик без нажатий — переходов нет
    step(&mut app);
    assert_eq!(player(&mut app).transitions(), 1);
}

#[test]
fn test_frame_start_mode_checks_all_its_keys() {
    let (mut app, journal) = create_scene_app();
    journal.take();

    press(&mut app, InputAction::EnterStealth);
    press(&mut app, InputAction::EnterAlert);
    step(&mut app);

    let batman = player(&mut app);
    assert_eq!(batman.mode(), BatmanMode::Alert);
    assert_eq!(batman.transitions(), 2);

    let lifecycle: Vec<Recorded> = journal
        .entries()
        .into_iter()
        .filter(Recorded::is_lifecycle)
        .collect();
    assert_eq!(
        lifecycle,
        vec![
            Recorded::Exited(BatmanMode::Normal),
            Recorded::Entered(BatmanMode::Stealth),
            Recorded::Exited(BatmanMode::Stealth),
            Recorded::Entered(BatmanMode::Alert),
        ]
    );
}

#[test]
fn test_key_outside_frame_start_mode_is_ignored() {
    let (mut app, journal) = create_scene_app();
    journal.take();

    // Normal проверяет только C и Space: N в этом кадре игнорируется
    press(&mut app, InputAction::EnterStealth);
    press(&mut app, InputAction::EnterNormal);
    step(&mut app);

    let batman = player(&mut app);
    assert_eq!(batman.mode(), BatmanMode::Stealth);
    assert_eq!(batman.transitions(), 1);
    assert_eq!(journal.cues(), vec![Recorded::AlertStopped, Recorded::Opacity(0.7)]);
}

#[test]
fn test_alert_checks_normal_before_stealth() {
    let (mut app, journal) = create_scene_app();
    press(&mut app, InputAction::EnterAlert);
    step(&mut app);
    journal.take();

    // Нажато C, потом N — но Alert проверяет N первым
    press(&mut app, InputAction::EnterStealth);
    press(&mut app, InputAction::EnterNormal);
    step(&mut app);

    let batman = player(&mut app);
    assert_eq!(batman.mode(), BatmanMode::Stealth);
    assert_eq!(batman.transitions(), 3);

    let lifecycle: Vec<Recorded> = journal
        .entries()
        .into_iter()
        .filter(Recorded::is_lifecycle)
        .collect();
    assert_eq!(
        lifecycle,
        vec![
            Recorded::Exited(BatmanMode::Alert),
            Recorded::Entered(BatmanMode::Normal),
            Recorded::Exited(BatmanMode::Normal),
            Recorded::Entered(BatmanMode::Stealth),
        ]
    );
}

#[test]
fn test_invalid_config_skips_player_spawn() {
    let mut app = create_headless_app(3);
    app.insert_resource(ControllerConfig {
        base_speed: -1.0,
        ..Default::default()
    });
    app.add_plugins(SimulationPlugin);
    app.update();

    let world = app.world_mut();
    let mut query = world.query_filtered::<&BatmanController, With<Player>>();
    assert_eq!(query.iter(world).count(), 0);

    assert!(spawn_batman(
        app.world_mut(),
        ControllerConfig {
            stealth_alpha: 2.0,
            ..Default::default()
        },
        Vec2::ZERO,
        true,
    )
    .is_err());
}

#[test]
fn test_movement_over_one_second() {
    let (mut app, _journal) = create_scene_app();
    app.world_mut().resource_mut::<PlayerInput>().move_axis = Vec2::new(1.0, 0.0);

    for _ in 0..60 {
        step(&mut app);
    }

    let position = player(&mut app).position;
    assert!((position.x - 5.0).abs() < 1e-3, "x = {}", position.x);
    assert_eq!(position.y, 0.0);

    // С модификатором: ещё секунда × 1.5
    app.world_mut().resource_mut::<PlayerInput>().modifier_held = true;
    for _ in 0..60 {
        step(&mut app);
    }
    let position = player(&mut app).position;
    assert!((position.x - 12.5).abs() < 1e-3, "x = {}", position.x);
}

#[test]
fn test_vehicle_toggle_through_input() {
    let (mut app, _journal) = create_scene_app();

    press(&mut app, InputAction::ToggleVehicle);
    step(&mut app);
    assert_eq!(player(&mut app).current_speed(), 10.0);
    assert!(presentation(&app).vehicle_visible);

    press(&mut app, InputAction::ToggleVehicle);
    step(&mut app);
    assert_eq!(player(&mut app).current_speed(), 5.0);
    assert!(!presentation(&app).vehicle_visible);
}

#[test]
fn test_signal_toggle_swings_signal() {
    let (mut app, journal) = create_scene_app();
    journal.take();

    press(&mut app, InputAction::ToggleSignal);
    for _ in 0..30 {
        step(&mut app);
    }

    assert_eq!(journal.cues(), vec![Recorded::SignalToggled]);
    let state = presentation(&app);
    assert!(state.signal_visible);
    assert!(state.signal_angle > 0.0);
    // Сигнал не влияет на режим
    assert_eq!(player(&mut app).mode(), BatmanMode::Normal);
}

#[test]
fn test_alarm_blinks_while_alert() {
    let (mut app, _journal) = create_scene_app();

    press(&mut app, InputAction::EnterAlert);
    step(&mut app);
    assert!(presentation(&app).alarm_light_visible);

    // Полсекунды мигания (с запасом на округление шага)
    for _ in 0..31 {
        step(&mut app);
    }
    assert!(!presentation(&app).alarm_light_visible);
}

#[test]
fn test_non_player_batman_ignores_input() {
    let (mut app, _journal) = create_scene_app();
    let bystander = spawn_batman(
        app.world_mut(),
        ControllerConfig::default(),
        Vec2::new(3.0, 3.0),
        false,
    )
    .expect("default config is valid");

    press(&mut app, InputAction::EnterStealth);
    app.world_mut().resource_mut::<PlayerInput>().move_axis = Vec2::new(0.0, 1.0);
    step(&mut app);

    let other = app
        .world()
        .get::<BatmanController>(bystander)
        .expect("bystander exists");
    assert_eq!(other.mode(), BatmanMode::Normal);
    assert_eq!(other.position, Vec2::new(3.0, 3.0));
    assert_eq!(player(&mut app).mode(), BatmanMode::Stealth);
}

#[test]
fn test_presentation_wiring_check() {
    let (app, _journal) = create_scene_app();
    let bus = &app.world().resource::<PresentationBus>().0;
    assert!(missing_presentation_listeners(bus).is_empty());

    // Без PresentationPlugin шина пустая — не фатально, controller работает
    let mut bare = create_headless_app(7);
    bare.add_plugins(BatmanPlugin);
    bare.update();

    let missing = missing_presentation_listeners(&bare.world().resource::<PresentationBus>().0);
    assert_eq!(
        missing,
        vec!["AlertStarted", "AlertStopped", "OpacityChanged", "SignalToggled", "VehicleToggled"]
    );

    bare.world_mut().resource_mut::<PlayerInput>().press(InputAction::EnterAlert);
    step(&mut bare);
    let world = bare.world_mut();
    let mut query = world.query_filtered::<&BatmanController, With<Player>>();
    assert_eq!(query.iter(world).next().map(|b| b.mode()), Some(BatmanMode::Alert));
}
