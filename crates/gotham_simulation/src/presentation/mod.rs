//! Presentation reactor (headless)
//!
//! Модель UI/effects слоя: тревожный свет, звук тревоги, прозрачность спрайтов,
//! сигнал в небе, визуал транспорта. Только потребляет события шины,
//! обратно в controller ничего не отправляет.
//!
//! Таймеры (мигание, качание сигнала) — чисто presentation, в контракт controller'а не входят.

use bevy::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::bus::{EventBus, PresentationBus, SubscriptionHandle};
use crate::controller::BatmanSystems;
use crate::events::{AlertStarted, AlertStopped, OpacityChanged, SignalToggled, VehicleToggled};

/// Период мигания тревожного света (секунды)
pub const ALARM_BLINK_INTERVAL: f32 = 0.5;
/// Амплитуда качания сигнала (градусы)
pub const SIGNAL_SWING_DEGREES: f32 = 5.0;
/// Скорость качания сигнала (рад/сек аргумента синуса)
pub const SIGNAL_SWING_SPEED: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub alarm_active: bool,
    pub alarm_light_visible: bool,
    pub audio_playing: bool,
    /// Сколько раз звук тревоги запускался (повторный старт не перезапускает)
    pub audio_starts: u32,
    /// Alpha всех tinted спрайтов (герой, город, сигнал)
    pub opacity: f32,
    pub signal_visible: bool,
    /// Текущий угол сигнала (градусы, вокруг Z)
    pub signal_angle: f32,
    pub vehicle_visible: bool,
    blink_timer: f32,
    swing_timer: f32,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            alarm_active: false,
            alarm_light_visible: false,
            audio_playing: false,
            audio_starts: 0,
            opacity: 1.0,
            signal_visible: false,
            signal_angle: 0.0,
            vehicle_visible: false,
            blink_timer: 0.0,
            swing_timer: 0.0,
        }
    }
}

impl PresentationState {
    pub fn on_alert_started(&mut self) {
        self.alarm_active = true;
        self.alarm_light_visible = true;
        self.opacity = 1.0;

        if !self.audio_playing {
            self.audio_playing = true;
            self.audio_starts += 1;
        }
    }

    pub fn on_alert_stopped(&mut self) {
        self.alarm_active = false;
        self.alarm_light_visible = false;
        self.audio_playing = false;
    }

    pub fn on_opacity_changed(&mut self, alpha: f32) {
        self.opacity = alpha;
    }

    pub fn on_signal_toggled(&mut self) {
        self.signal_visible = !self.signal_visible;
    }

    pub fn on_vehicle_toggled(&mut self, engaged: bool) {
        self.vehicle_visible = engaged;
    }

    /// Тик presentation таймеров
    pub fn advance(&mut self, delta: f32) {
        if self.alarm_active {
            self.blink_timer += delta;
            if self.blink_timer >= ALARM_BLINK_INTERVAL {
                self.alarm_light_visible = !self.alarm_light_visible;
                self.blink_timer = 0.0;
            }
        }

        if self.signal_visible {
            self.swing_timer += delta * SIGNAL_SWING_SPEED;
            self.signal_angle = self.swing_timer.sin() * SIGNAL_SWING_DEGREES;
        }
    }
}

/// Resource: presentation слой, подписанный на шину
#[derive(Resource, Debug, Default)]
pub struct PresentationReactor {
    state: Arc<Mutex<PresentationState>>,
    handles: Vec<SubscriptionHandle>,
}

impl PresentationReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Подписка на все presentation cues. Повторный attach — no-op.
    pub fn attach(&mut self, bus: &mut EventBus) {
        if self.is_attached() {
            return;
        }

        let state = self.state.clone();
        self.handles
            .push(bus.subscribe(move |_: &AlertStarted| state.lock().on_alert_started()));

        let state = self.state.clone();
        self.handles
            .push(bus.subscribe(move |_: &AlertStopped| state.lock().on_alert_stopped()));

        let state = self.state.clone();
        self.handles.push(
            bus.subscribe(move |event: &OpacityChanged| state.lock().on_opacity_changed(event.alpha)),
        );

        let state = self.state.clone();
        self.handles
            .push(bus.subscribe(move |_: &SignalToggled| state.lock().on_signal_toggled()));

        let state = self.state.clone();
        self.handles.push(
            bus.subscribe(move |event: &VehicleToggled| state.lock().on_vehicle_toggled(event.engaged)),
        );
    }

    /// Снимает подписки; возвращает сколько реально было снято
    pub fn detach(&mut self, bus: &mut EventBus) -> usize {
        self.handles
            .drain(..)
            .filter(|handle| bus.unsubscribe(*handle))
            .count()
    }

    pub fn advance(&self, delta: f32) {
        self.state.lock().advance(delta);
    }

    /// Копия текущего состояния
    pub fn snapshot(&self) -> PresentationState {
        self.state.lock().clone()
    }
}

/// Система: presentation таймеры (после controller систем)
pub fn advance_presentation(reactor: Res<PresentationReactor>, time: Res<Time<Fixed>>) {
    reactor.advance(time.timestep().as_secs_f32());
}

/// Presentation Plugin
///
/// Подписывает reactor на `PresentationBus` сразу при build,
/// чтобы первый Enter(Normal) player entity уже был услышан.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PresentationBus>();

        let mut reactor = PresentationReactor::new();
        {
            let mut bus = app.world_mut().resource_mut::<PresentationBus>();
            reactor.attach(&mut bus.0);
        }

        app.insert_resource(reactor)
            .add_systems(FixedUpdate, advance_presentation.after(BatmanSystems));
    }
}
