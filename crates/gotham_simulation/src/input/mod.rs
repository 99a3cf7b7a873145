//! Input boundary — снимок ввода за кадр
//!
//! Внешний driver (движок, тест, скрипт) каждый кадр пишет `PlayerInput`:
//! - `move_axis` / `modifier_held` — непрерывный ввод
//! - `pressed` — edges "нажато в этом кадре", очищаются после обработки

use bevy::prelude::*;

pub mod scripted;

pub use scripted::{ScriptedInputConfig, ScriptedInputPlugin};

/// Дискретное действие игрока (key edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    EnterStealth,
    EnterNormal,
    EnterAlert,
    ToggleVehicle,
    ToggleSignal,
}

impl InputAction {
    pub const ALL: [InputAction; 5] = [
        InputAction::EnterStealth,
        InputAction::EnterNormal,
        InputAction::EnterAlert,
        InputAction::ToggleVehicle,
        InputAction::ToggleSignal,
    ];

    /// Раскладка по умолчанию: C / N / Space / E / B
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "c" => Some(InputAction::EnterStealth),
            "n" => Some(InputAction::EnterNormal),
            "space" | " " => Some(InputAction::EnterAlert),
            "e" => Some(InputAction::ToggleVehicle),
            "b" => Some(InputAction::ToggleSignal),
            _ => None,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Оси движения (x — горизонталь, y — вертикаль), не нормализованы
    pub move_axis: Vec2,
    /// Зажат модификатор бега (Shift)
    pub modifier_held: bool,
    /// Edges этого кадра в порядке нажатия
    pub pressed: Vec<InputAction>,
}

impl PlayerInput {
    pub fn press(&mut self, action: InputAction) {
        self.pressed.push(action);
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    pub fn clear_edges(&mut self) {
        self.pressed.clear();
    }
}
