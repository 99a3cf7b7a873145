//! Presentation cues — события от controller'а к presentation слою
//!
//! Все payload'ы immutable и живут только на время `publish`.
//! Presentation никогда не отправляет события обратно в controller.

use crate::bus::BusEvent;
use crate::controller::BatmanMode;

/// Тревога включена (вход в Alert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertStarted;

/// Тревога выключена (выход из Alert, вход в Normal/Stealth)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertStopped;

/// Прозрачность спрайтов, alpha ∈ [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityChanged {
    pub alpha: f32,
}

impl OpacityChanged {
    /// Alpha вне [0, 1] — ошибка вызывающего (конфиг проверяется при создании controller'а)
    pub fn new(alpha: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&alpha), "alpha {} outside [0, 1]", alpha);
        Self { alpha }
    }
}

/// Переключить сигнал в небе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalToggled;

/// Транспорт включён/выключен (показать/спрятать его визуал)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleToggled {
    pub engaged: bool,
}

/// Lifecycle: выход из режима (публикуется перед Exit эффектами)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeExited {
    pub mode: BatmanMode,
}

/// Lifecycle: вход в режим (публикуется перед Enter эффектами)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeEntered {
    pub mode: BatmanMode,
}

impl BusEvent for AlertStarted {
    const NAME: &'static str = "AlertStarted";
}

impl BusEvent for AlertStopped {
    const NAME: &'static str = "AlertStopped";
}

impl BusEvent for OpacityChanged {
    const NAME: &'static str = "OpacityChanged";
}

impl BusEvent for SignalToggled {
    const NAME: &'static str = "SignalToggled";
}

impl BusEvent for VehicleToggled {
    const NAME: &'static str = "VehicleToggled";
}

impl BusEvent for ModeExited {
    const NAME: &'static str = "ModeExited";
}

impl BusEvent for ModeEntered {
    const NAME: &'static str = "ModeEntered";
}

/// Cue без привязки к конкретному типу (результат чистой transition функции)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    AlertStarted,
    AlertStopped,
    Opacity(f32),
}

impl Cue {
    /// Публикует cue как конкретное типизированное событие
    pub fn publish(self, bus: &mut crate::bus::EventBus) -> usize {
        match self {
            Cue::AlertStarted => bus.publish(AlertStarted),
            Cue::AlertStopped => bus.publish(AlertStopped),
            Cue::Opacity(alpha) => bus.publish(OpacityChanged::new(alpha)),
        }
    }
}
