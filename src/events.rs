//! Deferred, typed publish/subscribe.
//!
//! Systems [`emit`](EventBus::emit) during a step; nothing is delivered until
//! [`flush`](EventBus::flush), which drains the queue FIFO until it is empty.
//! Listeners get the shared context `C` and the bus itself, so they can emit
//! follow-up events (delivered later in the same flush) or (un)subscribe.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::ecs::components::PropCategory;
use crate::ecs::Entity;
use crate::sim::RunSummary;

/// "I touched X." Also emitted with id `land` when a body touches down.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    pub actor: Entity,
    pub target: Entity,
    pub id: String,
    pub category: PropCategory,
}

/// Mechanical and scoring consequence of knocking a prop over.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakEvent {
    pub actor: Entity,
    pub target: Entity,
    pub category: PropCategory,
    pub score: u32,
    pub heat: f32,
    pub chain_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillEvent {
    pub source: Entity,
    pub category: PropCategory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatChangedEvent {
    pub entity: Entity,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboTickEvent {
    pub entity: Entity,
    pub combo: u32,
    pub multiplier: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainProgressEvent {
    pub key: String,
    pub stage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HideEvent {
    pub entity: Entity,
    pub entering: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Interaction(InteractionEvent),
    Break(BreakEvent),
    Spill(SpillEvent),
    HeatChanged(HeatChangedEvent),
    ComboTick(ComboTickEvent),
    ChainProgress(ChainProgressEvent),
    Hide(HideEvent),
    RunEnded(RunSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    Interaction = 0,
    Break = 1,
    Spill = 2,
    HeatChanged = 3,
    ComboTick = 4,
    ChainProgress = 5,
    Hide = 6,
    RunEnded = 7,
}

impl EventKind {
    pub const COUNT: usize = 8;
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Interaction(_) => EventKind::Interaction,
            GameEvent::Break(_) => EventKind::Break,
            GameEvent::Spill(_) => EventKind::Spill,
            GameEvent::HeatChanged(_) => EventKind::HeatChanged,
            GameEvent::ComboTick(_) => EventKind::ComboTick,
            GameEvent::ChainProgress(_) => EventKind::ChainProgress,
            GameEvent::Hide(_) => EventKind::Hide,
            GameEvent::RunEnded(_) => EventKind::RunEnded,
        }
    }
}

type Listener<C> = Rc<RefCell<dyn FnMut(&GameEvent, &mut C, &mut EventBus<C>)>>;

/// Handle returned by [`EventBus::on`]; pass to [`EventBus::off`] to remove
/// exactly that listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

pub struct EventBus<C> {
    queue: VecDeque<GameEvent>,
    listeners: [Vec<(u64, Listener<C>)>; EventKind::COUNT],
    next_id: u64,
    flushing: bool,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            listeners: std::array::from_fn(|_| Vec::new()),
            next_id: 0,
            flushing: false,
        }
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Never dispatches synchronously.
    pub fn emit(&mut self, event: GameEvent) {
        self.queue.push_back(event);
    }

    /// Register a listener for one event kind.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&GameEvent, &mut C, &mut EventBus<C>) + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        let listener: Listener<C> = Rc::new(RefCell::new(listener));
        self.listeners[kind as usize].push((id, listener));
        Subscription { kind, id }
    }

    /// Remove one listener. Returns false if it was already gone.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        let list = &mut self.listeners[subscription.kind as usize];
        match list.iter().position(|(id, _)| *id == subscription.id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drain the queue in FIFO order until it is empty.
    ///
    /// Each event goes to a snapshot of its kind's listeners taken when the
    /// event is dispatched. Events with no listeners are dropped. A nested
    /// `flush` from inside a listener returns immediately; the outer drain
    /// delivers whatever it queued.
    pub fn flush(&mut self, ctx: &mut C) {
        if self.flushing {
            return;
        }
        self.flushing = true;
        while let Some(event) = self.queue.pop_front() {
            let snapshot: Vec<Listener<C>> = self.listeners[event.kind() as usize]
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            for listener in snapshot {
                let mut callback = listener.borrow_mut();
                (*callback)(&event, ctx, self);
            }
        }
        self.flushing = false;
    }

    /// Drop queued events and all listeners (session teardown).
    pub fn clear(&mut self) {
        self.queue.clear();
        for list in &mut self.listeners {
            list.clear();
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners[kind as usize].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spill() -> GameEvent {
        GameEvent::Spill(SpillEvent {
            source: crate::ecs::World::new().create_entity(),
            category: PropCategory::Food,
        })
    }

    fn chain(stage: u32) -> GameEvent {
        GameEvent::ChainProgress(ChainProgressEvent {
            key: "alleyCascade".into(),
            stage,
        })
    }

    fn stage_of(event: &GameEvent) -> u32 {
        match event {
            GameEvent::ChainProgress(e) => e.stage,
            _ => 0,
        }
    }

    #[test]
    fn emit_is_deferred_until_flush() {
        let mut bus: EventBus<Vec<u32>> = EventBus::new();
        bus.on(EventKind::ChainProgress, |event, log, _| log.push(stage_of(event)));
        let mut log = Vec::new();

        bus.emit(chain(1));
        assert!(log.is_empty());
        assert_eq!(bus.pending(), 1);

        bus.flush(&mut log);
        assert_eq!(log, vec![1]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn flush_is_fifo() {
        let mut bus: EventBus<Vec<u32>> = EventBus::new();
        bus.on(EventKind::ChainProgress, |event, log, _| log.push(stage_of(event)));
        let mut log = Vec::new();
        for stage in 1..=4 {
            bus.emit(chain(stage));
        }
        bus.flush(&mut log);
        assert_eq!(log, vec![1, 2, 3, 4]);
    }

    #[test]
    fn dispatch_is_by_kind() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        bus.on(EventKind::Spill, |_, log, _| log.push("spill"));
        bus.on(EventKind::ChainProgress, |_, log, _| log.push("chain"));
        let mut log = Vec::new();

        bus.emit(spill());
        bus.emit(GameEvent::Hide(HideEvent {
            entity: crate::ecs::World::new().create_entity(),
            entering: true,
        }));
        bus.flush(&mut log);
        assert_eq!(log, vec!["spill"]);
    }

    #[test]
    fn events_emitted_during_flush_are_delivered_in_same_flush() {
        let mut bus: EventBus<Vec<u32>> = EventBus::new();
        bus.on(EventKind::ChainProgress, |event, log, bus| {
            let stage = stage_of(event);
            log.push(stage);
            if stage < 5 {
                bus.emit(chain(stage + 1));
            }
        });
        let mut log = Vec::new();
        bus.emit(chain(1));
        bus.emit(chain(10));
        bus.flush(&mut log);

        // 10 was queued before the re-emitted 2, so it arrives first.
        assert_eq!(log, vec![1, 10, 2, 3, 4, 5]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn off_removes_exact_listener() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        let first = bus.on(EventKind::Spill, |_, log, _| log.push("first"));
        bus.on(EventKind::Spill, |_, log, _| log.push("second"));
        assert!(bus.off(first));
        assert!(!bus.off(first));

        let mut log = Vec::new();
        bus.emit(spill());
        bus.flush(&mut log);
        assert_eq!(log, vec!["second"]);
    }

    #[test]
    fn listener_added_mid_dispatch_misses_current_event() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        let mut added = false;
        bus.on(EventKind::Spill, move |_, log, bus| {
            log.push("outer");
            if !added {
                added = true;
                bus.on(EventKind::Spill, |_, log, _| log.push("late"));
            }
        });
        let mut log = Vec::new();
        bus.emit(spill());
        bus.emit(spill());
        bus.flush(&mut log);

        assert_eq!(log, vec!["outer", "outer", "late"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_still_gets_current_event() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        let victim = Rc::new(RefCell::new(None::<Subscription>));
        let handle = Rc::clone(&victim);
        bus.on(EventKind::Spill, move |_, log, bus| {
            log.push("remover");
            if let Some(sub) = handle.borrow_mut().take() {
                bus.off(sub);
            }
        });
        let sub = bus.on(EventKind::Spill, |_, log, _| log.push("victim"));
        *victim.borrow_mut() = Some(sub);

        let mut log = Vec::new();
        bus.emit(spill());
        bus.emit(spill());
        bus.flush(&mut log);

        assert_eq!(log, vec!["remover", "victim", "remover"]);
        assert_eq!(bus.listener_count(EventKind::Spill), 1);
    }

    #[test]
    fn nested_flush_is_a_no_op() {
        let mut bus: EventBus<Vec<u32>> = EventBus::new();
        bus.on(EventKind::ChainProgress, |event, log, bus| {
            log.push(stage_of(event));
            if stage_of(event) == 1 {
                bus.emit(chain(2));
                bus.flush(log);
                log.push(99);
            }
        });
        let mut log = Vec::new();
        bus.emit(chain(1));
        bus.flush(&mut log);
        assert_eq!(log, vec![1, 99, 2]);
    }

    #[test]
    fn unheard_events_are_dropped() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.emit(spill());
        bus.flush(&mut ());
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn clear_drops_queue_and_listeners() {
        let mut bus: EventBus<Vec<u32>> = EventBus::new();
        bus.on(EventKind::ChainProgress, |event, log, _| log.push(stage_of(event)));
        bus.emit(chain(1));
        bus.clear();

        let mut log = Vec::new();
        bus.emit(chain(2));
        bus.flush(&mut log);
        assert!(log.is_empty());
        assert_eq!(bus.listener_count(EventKind::ChainProgress), 0);
    }
}
