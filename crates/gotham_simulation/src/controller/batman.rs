//! BatmanController — состояние сущности и применение transition планов

use bevy::prelude::*;

use super::config::{ConfigError, ControllerConfig};
use super::mode::{plan_transition, BatmanMode, Phase, PhaseStep, SideEffect};
use crate::bus::EventBus;
use crate::events::{ModeEntered, ModeExited, SignalToggled, VehicleToggled};

/// Player-управляемая сущность: позиция, скорость, режим, транспорт
///
/// Мутируется раз в тик системами `BatmanPlugin`.
/// Все presentation эффекты уходят через `EventBus`, прямых ссылок на presentation нет.
#[derive(Component, Debug, Clone)]
pub struct BatmanController {
    pub position: Vec2,
    mode: BatmanMode,
    current_speed: f32,
    vehicle_engaged: bool,
    config: ControllerConfig,
    transitions: u64,
}

impl BatmanController {
    /// Создаёт controller и выполняет первый Enter(Normal) — без Exit
    ///
    /// Невалидный конфиг отклоняется до первого Enter: в шину ничего не публикуется.
    pub fn new(config: ControllerConfig, bus: &mut EventBus) -> Result<Self, ConfigError> {
        Self::with_position(config, Vec2::ZERO, bus)
    }

    pub fn with_position(
        config: ControllerConfig,
        position: Vec2,
        bus: &mut EventBus,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut controller = Self {
            position,
            mode: BatmanMode::Normal,
            current_speed: config.base_speed,
            vehicle_engaged: false,
            config,
            transitions: 0,
        };

        if let Some(plan) = plan_transition(None, BatmanMode::Normal, &controller.config) {
            controller.apply_step(&plan.enter, bus);
        }
        Ok(controller)
    }

    pub fn mode(&self) -> BatmanMode {
        self.mode
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn base_speed(&self) -> f32 {
        self.config.base_speed
    }

    pub fn is_vehicle_engaged(&self) -> bool {
        self.vehicle_engaged
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Количество выполненных переходов (первый Enter не считается)
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Переход в режим `target`. `false` если уже в нём (no-op, ничего не публикуется).
    pub fn request_transition(&mut self, target: BatmanMode, bus: &mut EventBus) -> bool {
        let from = self.mode;
        let Some(plan) = plan_transition(Some(from), target, &self.config) else {
            return false;
        };

        for step in plan.steps() {
            self.apply_step(step, bus);
        }
        self.transitions += 1;

        crate::log_info(&format!(
            "Batman: {} → {} (speed {:.2})",
            from.as_str(),
            plan.to.as_str(),
            self.current_speed
        ));
        true
    }

    fn apply_step(&mut self, step: &PhaseStep, bus: &mut EventBus) {
        match step.phase {
            Phase::Exit(mode) => {
                bus.publish(ModeExited { mode });
            }
            Phase::Enter(mode) => {
                self.mode = mode;
                bus.publish(ModeEntered { mode });
            }
        }

        for effect in &step.effects {
            match *effect {
                SideEffect::SetSpeed(speed) => self.current_speed = speed,
                SideEffect::Emit(cue) => {
                    cue.publish(bus);
                }
            }
        }
    }

    /// Скорость этого тика с учётом модификатора бега
    pub fn effective_speed(&self, modifier_held: bool) -> f32 {
        if modifier_held && self.mode.allows_run(&self.config) {
            self.current_speed * self.config.run_multiplier
        } else {
            self.current_speed
        }
    }

    /// Один шаг движения: position += speed × delta × input
    ///
    /// Input не нормализуется (диагональ быстрее, как у осевого ввода движка).
    pub fn tick(&mut self, input: Vec2, modifier_held: bool, delta: f32) {
        let speed = self.effective_speed(modifier_held);
        self.position += speed * delta * input;
    }

    /// Вкл/выкл транспорт.
    ///
    /// Вкл: speed × vehicle_multiplier. Выкл: speed = base, независимо от режима.
    pub fn toggle_vehicle(&mut self, bus: &mut EventBus) {
        self.vehicle_engaged = !self.vehicle_engaged;
        self.current_speed = if self.vehicle_engaged {
            self.current_speed * self.config.vehicle_multiplier
        } else {
            self.config.base_speed
        };

        crate::log(&format!(
            "Batman: vehicle {} (speed {:.2})",
            if self.vehicle_engaged { "engaged" } else { "released" },
            self.current_speed
        ));
        bus.publish(VehicleToggled {
            engaged: self.vehicle_engaged,
        });
    }

    pub fn toggle_signal(&self, bus: &mut EventBus) {
        crate::log("Batman: signal toggled");
        bus.publish(SignalToggled);
    }
}
