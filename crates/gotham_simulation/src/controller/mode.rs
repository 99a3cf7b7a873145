//! Режимы и чистая transition функция
//!
//! `plan_transition(current, target, config)` ничего не мутирует:
//! возвращает список фаз (Exit → Enter) с их side effects.
//! Применяет план `BatmanController::request_transition`.

use super::config::{AlertSpeedPolicy, ControllerConfig};
use crate::events::Cue;
use crate::input::{InputAction, PlayerInput};

/// Поведенческий режим (ровно один активен)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BatmanMode {
    /// Начальный режим: базовая скорость, полная непрозрачность
    #[default]
    Normal,
    /// Медленнее, полупрозрачный
    Stealth,
    /// Тревога (свет, звук)
    Alert,
}

impl BatmanMode {
    pub const ALL: [BatmanMode; 3] = [BatmanMode::Normal, BatmanMode::Stealth, BatmanMode::Alert];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatmanMode::Normal => "Normal",
            BatmanMode::Stealth => "Stealth",
            BatmanMode::Alert => "Alert",
        }
    }

    /// Проверки перехода в Update этого режима: (клавиша, целевой режим), в порядке проверки
    pub fn transition_keys(self) -> [(InputAction, BatmanMode); 2] {
        match self {
            BatmanMode::Normal => [
                (InputAction::EnterStealth, BatmanMode::Stealth),
                (InputAction::EnterAlert, BatmanMode::Alert),
            ],
            BatmanMode::Stealth => [
                (InputAction::EnterNormal, BatmanMode::Normal),
                (InputAction::EnterAlert, BatmanMode::Alert),
            ],
            BatmanMode::Alert => [
                (InputAction::EnterNormal, BatmanMode::Normal),
                (InputAction::EnterStealth, BatmanMode::Stealth),
            ],
        }
    }

    /// Запросы смены режима за кадр
    ///
    /// `self` — режим на начало кадра: все проверки идут по нему,
    /// даже если первый запрос уже сменил режим.
    pub fn update_requests(self, input: &PlayerInput) -> impl Iterator<Item = BatmanMode> + '_ {
        self.transition_keys()
            .into_iter()
            .filter(move |(action, _)| input.just_pressed(*action))
            .map(|(_, target)| target)
    }

    /// Действует ли модификатор бега в этом режиме
    pub fn allows_run(&self, config: &ControllerConfig) -> bool {
        match self {
            BatmanMode::Stealth => config.stealth_allows_run,
            BatmanMode::Normal | BatmanMode::Alert => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideEffect {
    SetSpeed(f32),
    Emit(Cue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Exit(BatmanMode),
    Enter(BatmanMode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseStep {
    pub phase: Phase,
    pub effects: Vec<SideEffect>,
}

/// План перехода: опциональный Exit, затем ровно один Enter
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: Option<BatmanMode>,
    pub to: BatmanMode,
    pub exit: Option<PhaseStep>,
    pub enter: PhaseStep,
}

impl TransitionPlan {
    /// Фазы в порядке исполнения
    pub fn steps(&self) -> impl Iterator<Item = &PhaseStep> {
        self.exit.iter().chain(std::iter::once(&self.enter))
    }
}

/// `None` если target == current (no-op).
/// `current == None` — самый первый вход, Exit отсутствует.
pub fn plan_transition(
    current: Option<BatmanMode>,
    target: BatmanMode,
    config: &ControllerConfig,
) -> Option<TransitionPlan> {
    if current == Some(target) {
        return None;
    }

    let exit = current.map(|mode| PhaseStep {
        phase: Phase::Exit(mode),
        effects: exit_effects(mode),
    });

    Some(TransitionPlan {
        from: current,
        to: target,
        exit,
        enter: PhaseStep {
            phase: Phase::Enter(target),
            effects: enter_effects(target, config),
        },
    })
}

pub fn enter_effects(mode: BatmanMode, config: &ControllerConfig) -> Vec<SideEffect> {
    match mode {
        BatmanMode::Normal => vec![
            SideEffect::SetSpeed(config.base_speed),
            SideEffect::Emit(Cue::AlertStopped),
            SideEffect::Emit(Cue::Opacity(1.0)),
        ],
        BatmanMode::Stealth => vec![
            SideEffect::SetSpeed(config.stealth_speed()),
            SideEffect::Emit(Cue::AlertStopped),
            SideEffect::Emit(Cue::Opacity(config.stealth_alpha)),
        ],
        BatmanMode::Alert => {
            let mut effects = Vec::with_capacity(3);
            if config.alert_speed == AlertSpeedPolicy::Run {
                effects.push(SideEffect::SetSpeed(config.run_speed()));
            }
            effects.push(SideEffect::Emit(Cue::AlertStarted));
            effects.push(SideEffect::Emit(Cue::Opacity(1.0)));
            effects
        }
    }
}

pub fn exit_effects(mode: BatmanMode) -> Vec<SideEffect> {
    match mode {
        BatmanMode::Alert => vec![SideEffect::Emit(Cue::AlertStopped)],
        BatmanMode::Normal | BatmanMode::Stealth => Vec::new(),
    }
}
