//! Spring system
//!
//! Owns every live spring and steps the active ones each frame.
//! Springs stay in the pool until they are explicitly destroyed, so callers
//! must destroy each spring once it is no longer needed or the pool keeps
//! stepping and storing it.
//!
//! The system is single-threaded: state lives behind `Rc<RefCell<_>>` and
//! handles hold a `Weak` reference, so they never keep the pool alive.

use crate::listener::SpringListener;
use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Instant;

// ============================================================================
// Per-thread Spring System
// ============================================================================

thread_local! {
    static SPRING_SYSTEM: OnceCell<SpringSystem> = const { OnceCell::new() };
}

/// Get the spring system for the current thread, creating it on first use
///
/// Every caller on the same thread shares one simulation clock and pool.
pub fn spring_system() -> SpringSystem {
    SPRING_SYSTEM.with(|cell| {
        cell.get_or_init(|| {
            tracing::debug!("creating thread spring system");
            SpringSystem::new()
        })
        .clone()
    })
}

/// Get the spring system for the current thread if it has been created
pub fn try_spring_system() -> Option<SpringSystem> {
    SPRING_SYSTEM.with(|cell| cell.get().cloned())
}

/// Check if the spring system for the current thread has been created
pub fn is_spring_system_initialized() -> bool {
    SPRING_SYSTEM.with(|cell| cell.get().is_some())
}

new_key_type! {
    /// Handle to a spring registered in a [`SpringSystem`]
    pub struct SpringId;
}

/// Lifecycle state of a pooled spring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringState {
    /// Created, never given an end value
    Idle,
    /// Moving toward its end value; stepped every frame
    Active,
    /// Resting at its end value
    AtRest,
    /// Removed from the pool
    Destroyed,
}

struct SpringEntry {
    spring: Spring,
    state: SpringState,
    listeners: SmallVec<[Box<dyn SpringListener>; 1]>,
}

struct SystemInner {
    springs: SlotMap<SpringId, SpringEntry>,
    last_frame: Instant,
}

/// The spring system that steps all active springs
///
/// Cloning shares the same pool.
#[derive(Clone)]
pub struct SpringSystem {
    inner: Rc<RefCell<SystemInner>>,
}

impl SpringSystem {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SystemInner {
                springs: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a weak handle to this system for passing to components
    pub fn handle(&self) -> SystemHandle {
        SystemHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Create an idle spring from origami-scale stiffness and damping
    pub fn create_spring(&self, stiffness: f32, damping: f32) -> SpringHandle {
        self.create_spring_with_config(SpringConfig::from_origami(stiffness, damping))
    }

    /// Create an idle spring resting at 0
    pub fn create_spring_with_config(&self, config: SpringConfig) -> SpringHandle {
        let id = insert_spring(&self.inner, config);
        SpringHandle {
            system: self.handle(),
            id,
        }
    }

    /// Advance every active spring by `dt` seconds and notify listeners
    ///
    /// Springs activated by a listener during this call are first stepped on
    /// the next call. Returns true if any spring is still active.
    pub fn advance(&self, dt: f32) -> bool {
        let active: Vec<SpringId> = self
            .inner
            .borrow()
            .springs
            .iter()
            .filter(|(_, entry)| entry.state == SpringState::Active)
            .map(|(id, _)| id)
            .collect();

        for id in active {
            step_and_notify(&self.inner, id, dt);
        }

        self.has_active_springs()
    }

    /// Advance by the wall-clock time since the previous tick
    pub fn tick(&self) -> bool {
        let dt = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32();
            inner.last_frame = now;
            dt
        };
        self.advance(dt)
    }

    /// Check if any spring is still moving
    pub fn has_active_springs(&self) -> bool {
        self.active_spring_count() > 0
    }

    /// Get the number of springs in the pool, resting or not
    pub fn spring_count(&self) -> usize {
        self.inner.borrow().springs.len()
    }

    /// Get the number of springs that will be stepped on the next advance
    pub fn active_spring_count(&self) -> usize {
        self.inner
            .borrow()
            .springs
            .values()
            .filter(|entry| entry.state == SpringState::Active)
            .count()
    }
}

impl Default for SpringSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpringSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringSystem")
            .field("springs", &self.spring_count())
            .field("active", &self.active_spring_count())
            .finish()
    }
}

fn insert_spring(inner: &Rc<RefCell<SystemInner>>, config: SpringConfig) -> SpringId {
    let mut guard = inner.borrow_mut();
    // Keep the first tick after a quiet period from integrating a huge dt
    if guard.springs.values().all(|entry| entry.state != SpringState::Active) {
        guard.last_frame = Instant::now();
    }
    let id = guard.springs.insert(SpringEntry {
        spring: Spring::new(config, 0.0),
        state: SpringState::Idle,
        listeners: SmallVec::new(),
    });
    tracing::trace!(?id, "spring created");
    id
}

fn is_live(inner: &Rc<RefCell<SystemInner>>, id: SpringId) -> bool {
    inner.borrow().springs.contains_key(id)
}

fn step_and_notify(inner: &Rc<RefCell<SystemInner>>, id: SpringId, dt: f32) {
    let (outcome, snapshot, mut listeners) = {
        let mut guard = inner.borrow_mut();
        let Some(entry) = guard.springs.get_mut(id) else {
            return;
        };
        let Some(outcome) = entry.spring.advance(dt) else {
            entry.state = SpringState::AtRest;
            return;
        };
        if outcome.at_rest {
            entry.state = SpringState::AtRest;
        }
        (outcome, entry.spring, std::mem::take(&mut entry.listeners))
    };

    // Listeners run unborrowed; stop as soon as the spring is destroyed
    for listener in listeners.iter_mut() {
        if outcome.activated {
            listener.on_spring_activate(&snapshot);
            if !is_live(inner, id) {
                return;
            }
        }
        listener.on_spring_update(&snapshot);
        if !is_live(inner, id) {
            return;
        }
        if outcome.at_rest {
            listener.on_spring_at_rest(&snapshot);
            if !is_live(inner, id) {
                return;
            }
        }
    }

    let mut guard = inner.borrow_mut();
    if let Some(entry) = guard.springs.get_mut(id) {
        let added = std::mem::replace(&mut entry.listeners, listeners);
        entry.listeners.extend(added);
    }
}

/// A weak handle to a spring system
///
/// Operations on a dropped system are silent no-ops.
#[derive(Clone)]
pub struct SystemHandle {
    inner: Weak<RefCell<SystemInner>>,
}

impl SystemHandle {
    /// Create an idle spring from origami-scale stiffness and damping
    pub fn create_spring(&self, stiffness: f32, damping: f32) -> Option<SpringHandle> {
        self.create_spring_with_config(SpringConfig::from_origami(stiffness, damping))
    }

    /// Create an idle spring resting at 0
    pub fn create_spring_with_config(&self, config: SpringConfig) -> Option<SpringHandle> {
        self.inner.upgrade().map(|inner| SpringHandle {
            system: self.clone(),
            id: insert_spring(&inner, config),
        })
    }

    /// Check if the system is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn with_entry<F, R>(&self, id: SpringId, f: F) -> Option<R>
    where
        F: FnOnce(&mut SpringEntry) -> R,
    {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.borrow_mut();
        guard.springs.get_mut(id).map(f)
    }
}

impl std::fmt::Debug for SystemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A reference to one pooled spring
///
/// Cloning does not duplicate the spring. Once the spring is destroyed every
/// read returns `None` and every write is ignored.
#[derive(Clone, Debug)]
pub struct SpringHandle {
    system: SystemHandle,
    id: SpringId,
}

impl SpringHandle {
    pub fn id(&self) -> SpringId {
        self.id
    }

    /// Copy of the spring's current simulation state
    pub fn snapshot(&self) -> Option<Spring> {
        self.system.with_entry(self.id, |entry| entry.spring)
    }

    pub fn current_value(&self) -> Option<f32> {
        self.snapshot().map(|spring| spring.value())
    }

    pub fn end_value(&self) -> Option<f32> {
        self.snapshot().map(|spring| spring.target())
    }

    pub fn velocity(&self) -> Option<f32> {
        self.snapshot().map(|spring| spring.velocity())
    }

    pub fn state(&self) -> SpringState {
        self.system
            .with_entry(self.id, |entry| entry.state)
            .unwrap_or(SpringState::Destroyed)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state() == SpringState::Destroyed
    }

    /// Set the value the spring moves toward and activate it
    ///
    /// Ignored when the spring is already resting at `end_value`.
    pub fn set_end_value(&self, end_value: f32) {
        self.system.with_entry(self.id, |entry| {
            if entry.spring.set_target(end_value) {
                entry.state = SpringState::Active;
            }
        });
    }

    /// Jump to `value` without animating
    pub fn set_current_value(&self, value: f32) {
        self.system.with_entry(self.id, |entry| {
            entry.spring.set_value(value);
        });
    }

    pub fn set_velocity(&self, velocity: f32) {
        self.system.with_entry(self.id, |entry| {
            if entry.spring.set_velocity(velocity) {
                entry.state = SpringState::Active;
            }
        });
    }

    pub fn set_overshoot_clamping(&self, enabled: bool) {
        self.system.with_entry(self.id, |entry| {
            entry.spring.set_overshoot_clamping(enabled);
        });
    }

    pub fn add_listener<L>(&self, listener: L)
    where
        L: SpringListener + 'static,
    {
        self.system.with_entry(self.id, |entry| {
            entry.listeners.push(Box::new(listener));
        });
    }

    /// Remove the spring from its pool
    ///
    /// Returns true only for the call that actually removed it.
    pub fn destroy(&self) -> bool {
        let Some(inner) = self.system.inner.upgrade() else {
            return false;
        };
        // Bind first so listeners drop after the borrow ends
        let removed = inner.borrow_mut().springs.remove(self.id);
        let destroyed = removed.is_some();
        drop(removed);
        if destroyed {
            tracing::trace!(id = ?self.id, "spring destroyed");
        }
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::SpringCallbacks;
    use std::cell::Cell;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_until_idle(system: &SpringSystem) {
        for _ in 0..600 {
            if !system.advance(FRAME) {
                return;
            }
        }
        panic!("springs never came to rest");
    }

    #[test]
    fn test_system_advance() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);
        assert_eq!(spring.state(), SpringState::Idle);
        assert!(!system.advance(FRAME));

        spring.set_end_value(1.0);
        assert_eq!(spring.state(), SpringState::Active);
        assert!(system.advance(FRAME));
        assert!(spring.current_value().unwrap() > 0.0);

        run_until_idle(&system);
        assert_eq!(spring.state(), SpringState::AtRest);
        assert_eq!(spring.current_value(), Some(1.0));
    }

    #[test]
    fn test_listener_order() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let (a, u, r) = (log.clone(), log.clone(), log.clone());
        spring.add_listener(
            SpringCallbacks::new()
                .on_activate(move |_| a.borrow_mut().push("activate"))
                .on_update(move |_| u.borrow_mut().push("update"))
                .on_at_rest(move |_| r.borrow_mut().push("rest")),
        );

        spring.set_end_value(1.0);
        run_until_idle(&system);

        let log = log.borrow();
        assert_eq!(log.first(), Some(&"activate"));
        assert_eq!(log.get(1), Some(&"update"));
        assert_eq!(log.last(), Some(&"rest"));
        assert_eq!(log.iter().filter(|e| **e == "activate").count(), 1);
        assert_eq!(log.iter().filter(|e| **e == "rest").count(), 1);
    }

    #[test]
    fn test_destroy_from_own_listener() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);
        let rests = Rc::new(Cell::new(0));

        let own = spring.clone();
        let counter = rests.clone();
        spring.add_listener(SpringCallbacks::new().on_at_rest(move |_| {
            counter.set(counter.get() + 1);
            assert!(own.destroy());
        }));

        spring.set_end_value(1.0);
        run_until_idle(&system);

        assert_eq!(rests.get(), 1);
        assert!(spring.is_destroyed());
        assert_eq!(system.spring_count(), 0);
        assert!(!spring.destroy());
    }

    #[test]
    fn test_no_callbacks_after_stop() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);
        let updates = Rc::new(Cell::new(0));

        let own = spring.clone();
        let counter = updates.clone();
        spring.add_listener(SpringCallbacks::new().on_update(move |_| {
            counter.set(counter.get() + 1);
            own.destroy();
        }));
        let rested = Rc::new(Cell::new(false));
        let flag = rested.clone();
        spring.add_listener(SpringCallbacks::new().on_at_rest(move |_| flag.set(true)));

        spring.set_end_value(1.0);
        system.advance(FRAME);
        system.advance(FRAME);

        assert_eq!(updates.get(), 1);
        assert!(!rested.get());
        assert_eq!(spring.current_value(), None);
        spring.set_end_value(0.0);
        assert_eq!(system.spring_count(), 0);
    }

    #[test]
    fn test_listener_can_retarget_sibling() {
        let system = SpringSystem::new();
        let leader = system.create_spring(200.0, 26.0);
        let follower = system.create_spring(200.0, 26.0);

        let target = follower.clone();
        leader.add_listener(SpringCallbacks::new().on_update(move |spring| {
            target.set_end_value(spring.value());
        }));

        leader.set_end_value(1.0);
        system.advance(FRAME);
        assert_eq!(follower.state(), SpringState::Active);
        assert_eq!(follower.end_value(), leader.current_value());

        run_until_idle(&system);
        assert_eq!(follower.current_value(), Some(1.0));
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let system = SpringSystem::new();
            system.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle.create_spring(200.0, 26.0).is_none());
    }

    #[test]
    fn test_thread_system_created_once() {
        let first = spring_system();
        assert!(is_spring_system_initialized());
        let spring = first.create_spring(200.0, 26.0);
        let second = try_spring_system().unwrap();
        assert_eq!(second.spring_count(), first.spring_count());
        assert!(spring.destroy());
    }

    #[test]
    fn test_set_current_value_jumps_and_rests() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);

        spring.set_end_value(1.0);
        system.advance(FRAME);
        assert!(spring.velocity().unwrap() > 0.0);

        spring.set_current_value(0.25);
        assert_eq!(spring.current_value(), Some(0.25));
        assert_eq!(spring.end_value(), Some(0.25));
        assert_eq!(spring.velocity(), Some(0.0));

        system.advance(FRAME);
        assert_eq!(spring.state(), SpringState::AtRest);
        assert_eq!(spring.current_value(), Some(0.25));
    }

    #[test]
    fn test_tick_uses_wall_clock() {
        let system = SpringSystem::new();
        let spring = system.create_spring(200.0, 26.0);
        spring.set_end_value(1.0);

        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(system.tick());
        assert!(spring.current_value().unwrap() > 0.0);
    }

    #[test]
    fn test_first_spring_after_idle_resets_frame_clock() {
        let system = SpringSystem::new();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let before = Instant::now();
        let spring = system.create_spring(200.0, 26.0);
        assert!(system.inner.borrow().last_frame >= before);

        // A second spring while one is active keeps the running clock
        spring.set_end_value(1.0);
        let running = system.inner.borrow().last_frame;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let other = system.create_spring(200.0, 26.0);
        assert_eq!(system.inner.borrow().last_frame, running);

        assert!(spring.destroy());
        assert!(other.destroy());
    }
}
