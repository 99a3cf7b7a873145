//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через `PlayerInput`.

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Controller systems используют `With<Player>` filter:
/// `BatmanController` без маркера стоит на месте и не реагирует на ввод
/// (например, второй экземпляр на сцене для сравнения).
///
/// # Single-player
/// Обычно только один entity имеет этот компонент; если их несколько,
/// все получают один и тот же `PlayerInput`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
