//! Typed publish/subscribe шина (синхронная доставка)
//!
//! Архитектура:
//! - Шина — обычное значение, которым владеет тот, кто собирает controller + presentation
//!   (в ECS — ресурс `PresentationBus`), никаких глобальных singleton'ов
//! - Ключ реестра — `TypeId` события, значение — упорядоченный список listener'ов
//! - `subscribe` возвращает `SubscriptionHandle`, отписка только по нему
//!
//! Доставка:
//! - `publish` вызывает listener'ов прямо в call stack publisher'а, в порядке регистрации
//! - Нет очереди, нет retry, нет отложенной доставки между тиками
//! - Listener получает только `&E`, доступа к шине у него нет (re-entrancy невозможна)

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;


/// Всё, что можно опубликовать в шину
pub trait BusEvent: Any + fmt::Debug {
    /// Имя для диагностики (логи, warning'и о пропущенных подписчиках)
    const NAME: &'static str;
}

/// Opaque handle подписки
///
/// Id уникален в пределах шины и никогда не переиспользуется,
/// поэтому повторная отписка тем же handle — безопасный no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    event_type: TypeId,
    id: u64,
}

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Подписан ли handle на события типа `E`
    pub fn is_for<E: BusEvent>(&self) -> bool {
        self.event_type == TypeId::of::<E>()
    }
}

type ErasedListener = Box<dyn FnMut(&dyn Any) + Send + Sync>;

struct Subscriber {
    id: u64,
    callback: ErasedListener,
}

#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<TypeId, Vec<Subscriber>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует listener для событий типа `E` (в конец списка)
    pub fn subscribe<E, F>(&mut self, mut listener: F) -> SubscriptionHandle
    where
        E: BusEvent,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let callback: ErasedListener = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                listener(event);
            }
        });

        let event_type = TypeId::of::<E>();
        self.listeners
            .entry(event_type)
            .or_default()
            .push(Subscriber { id, callback });

        SubscriptionHandle { event_type, id }
    }

    /// Удаляет подписку. `false` если handle уже отписан или тип никогда не подписывался.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(subscribers) = self.listeners.get_mut(&handle.event_type) else {
            return false;
        };

        let Some(index) = subscribers.iter().position(|s| s.id == handle.id) else {
            return false;
        };

        // remove (не swap_remove): остальные сохраняют порядок регистрации
        subscribers.remove(index);
        if subscribers.is_empty() {
            self.listeners.remove(&handle.event_type);
        }
        true
    }

    /// Синхронно доставляет событие всем listener'ам типа `E`.
    ///
    /// Возвращает количество вызванных listener'ов (0 — не ошибка).
    ///
    /// Panic внутри listener'а не перехватывается и уходит в publisher;
    /// listener'ы после упавшего в этом publish не вызываются.
    pub fn publish<E: BusEvent>(&mut self, event: E) -> usize {
        let Some(subscribers) = self.listeners.get_mut(&TypeId::of::<E>()) else {
            return 0;
        };

        for subscriber in subscribers.iter_mut() {
            (subscriber.callback)(&event);
        }
        subscribers.len()
    }

    pub fn listener_count<E: BusEvent>(&self) -> usize {
        self.listeners
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Снимает все подписки (handles становятся недействительными)
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("event_types", &self.listeners.len())
            .field("listeners", &total)
            .finish()
    }
}

/// ECS ресурс: шина между controller'ом и presentation слоем
///
/// Владелец — `App`; controller и presentation получают её явно через `ResMut`.
#[derive(bevy::prelude::Resource, Debug, Default)]
pub struct PresentationBus(pub EventBus);
