//! EventJournal — подписчик, который записывает всё, что прошло через шину
//!
//! Используется сценарными тестами и headless прогоном (итоговая статистика).

use parking_lot::Mutex;
use std::sync::Arc;

use crate::bus::{BusEvent, EventBus, SubscriptionHandle};
use crate::controller::BatmanMode;
use crate::events::{
    AlertStarted, AlertStopped, ModeEntered, ModeExited, OpacityChanged, SignalToggled, VehicleToggled,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recorded {
    AlertStarted,
    AlertStopped,
    Opacity(f32),
    SignalToggled,
    Vehicle(bool),
    Exited(BatmanMode),
    Entered(BatmanMode),
}

impl Recorded {
    /// Lifecycle запись (Exit/Enter), а не presentation cue
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Recorded::Exited(_) | Recorded::Entered(_))
    }
}

#[derive(Debug, Default)]
pub struct EventJournal {
    entries: Arc<Mutex<Vec<Recorded>>>,
    handles: Vec<SubscriptionHandle>,
}

impl EventJournal {
    pub fn attach(bus: &mut EventBus) -> Self {
        let mut journal = Self::default();
        journal.record::<AlertStarted>(bus, |_| Recorded::AlertStarted);
        journal.record::<AlertStopped>(bus, |_| Recorded::AlertStopped);
        journal.record::<OpacityChanged>(bus, |e| Recorded::Opacity(e.alpha));
        journal.record::<SignalToggled>(bus, |_| Recorded::SignalToggled);
        journal.record::<VehicleToggled>(bus, |e| Recorded::Vehicle(e.engaged));
        journal.record::<ModeExited>(bus, |e| Recorded::Exited(e.mode));
        journal.record::<ModeEntered>(bus, |e| Recorded::Entered(e.mode));
        journal
    }

    fn record<E: BusEvent>(&mut self, bus: &mut EventBus, convert: fn(&E) -> Recorded) {
        let entries = self.entries.clone();
        let handle = bus.subscribe(move |event: &E| entries.lock().push(convert(event)));
        self.handles.push(handle);
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.entries.lock().clone()
    }

    /// Забирает записи (журнал очищается)
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Только presentation cues, без lifecycle записей
    pub fn cues(&self) -> Vec<Recorded> {
        self.entries
            .lock()
            .iter()
            .copied()
            .filter(|entry| !entry.is_lifecycle())
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Recorded) -> bool) -> usize {
        self.entries.lock().iter().filter(|entry| predicate(entry)).count()
    }

    pub fn detach(&mut self, bus: &mut EventBus) {
        for handle in self.handles.drain(..) {
            bus.unsubscribe(handle);
        }
    }
}
