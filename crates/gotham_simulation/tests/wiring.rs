//! Presentation wiring diagnostic
//!
//! Отдельный test binary: logger глобальный, здесь его подменяет capturing printer.

use bevy::prelude::*;
use gotham_simulation::logger::{set_logger, LogPrinter};
use gotham_simulation::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<(LogLevel, String)>>>);

impl CapturedLog {
    fn at(&self, level: LogLevel) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl LogPrinter for CapturedLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.0.lock().push((level, message.to_string()));
    }
}

#[test]
fn test_missing_presentation_warned_once() {
    let captured = CapturedLog::default();
    set_logger(Box::new(captured.clone()));
    set_log_level(LogLevel::Debug);

    // Только controller, presentation не подключён
    let mut app = create_headless_app(11);
    app.add_plugins(BatmanPlugin);
    for _ in 0..10 {
        app.update();
    }

    let warnings = captured.at(LogLevel::Warning);
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    for name in ["AlertStarted", "AlertStopped", "OpacityChanged", "SignalToggled", "VehicleToggled"] {
        assert!(warnings[0].contains(name), "{} missing in {:?}", name, warnings[0]);
    }

    // С presentation предупреждений нет
    let mut wired = create_headless_app(12);
    wired.add_plugins(SimulationPlugin);
    for _ in 0..10 {
        wired.update();
    }
    assert_eq!(captured.at(LogLevel::Warning).len(), 1);
}
