//! Session scope for a health data store.
//!
//! A [`HealthSession`] owns one [`HealthDataStore`] and the ticker task that
//! regenerates its reading. Consumers get a cloneable [`HealthDataHandle`];
//! handles never keep the store alive, so using one after the session is
//! stopped or dropped is a programming error and panics. The `try_*`
//! accessors report [`CoreError::SessionEnded`] instead.
//!
//! Two feeds observe a session. [`HealthSession::subscribe`] is a `watch`
//! receiver holding the latest snapshot; it coalesces bursts, so a slow
//! reader sees fewer updates than were committed. [`HealthSession::events`]
//! is a `broadcast` receiver that gets every committed event in order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::device::{Device, NewDevice};
use super::random::{source_for, SimulationSeed};
use super::reading::HealthReading;
use super::store::{HealthDataStore, StoreSnapshot};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::storage::SimulationConfig;

/// Default regeneration period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Events buffered per `events()` receiver before it starts lagging.
pub const EVENT_CAPACITY: usize = 256;

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

const SESSION_ENDED: &str =
    "health data accessed outside an active HealthSession; keep the session alive while handles are in use";

struct Shared {
    store: Mutex<HealthDataStore>,
    updates: watch::Sender<StoreSnapshot>,
    events: broadcast::Sender<Event>,
    ticks: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HealthDataStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the store and publish the resulting snapshot and
    /// event if it produced one.
    fn commit<F>(&self, f: F) -> Option<Event>
    where
        F: FnOnce(&mut HealthDataStore) -> Option<Event>,
    {
        let (event, snapshot) = {
            let mut store = self.lock();
            let event = f(&mut *store)?;
            (event, store.snapshot())
        };
        self.updates.send_replace(snapshot);
        // No receivers is fine.
        let _ = self.events.send(event.clone());
        Some(event)
    }

    fn tick(&self) {
        // Count under the store lock so `ticks` never runs ahead of the
        // events already sent.
        self.commit(|store| {
            let event = store.tick();
            let n = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::trace!(tick = n, "health reading regenerated");
            Some(event)
        });
    }
}

/// Owns a store and its regeneration timer for the lifetime of a session.
///
/// Must be started inside a tokio runtime. The ticker is cancelled by
/// [`stop`](Self::stop) or, failing that, when the session is dropped.
pub struct HealthSession {
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl HealthSession {
    /// Take ownership of `store` and start regenerating its reading every
    /// `interval`. The first regeneration happens one full interval after
    /// start.
    pub fn start(store: HealthDataStore, interval: Duration) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        let (updates, _) = watch::channel(store.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            store: Mutex::new(store),
            updates,
            events,
            ticks: AtomicU64::new(0),
        });
        let ticker = tokio::spawn(run_ticker(Arc::downgrade(&shared), interval));
        tracing::info!(interval_ms = interval.as_millis() as u64, "health session started");
        Self {
            shared,
            ticker: Some(ticker),
            interval,
        }
    }

    /// Start a session using the simulation section of the configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let rng = source_for(config.seed.map(SimulationSeed));
        Self::start(HealthDataStore::new(rng), config.tick_interval())
    }

    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            interval_ms: self.interval.as_millis() as u64,
            at: Utc::now(),
        }
    }

    /// Full state as of now, for consumers that join mid-session.
    pub fn snapshot_event(&self) -> Event {
        self.shared.lock().snapshot_event()
    }

    pub fn handle(&self) -> HealthDataHandle {
        HealthDataHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Receiver holding the latest committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Receiver for every event committed after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of timer-driven regenerations so far.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    /// Cancel the ticker and end the session.
    pub async fn stop(mut self) -> Event {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            // Cancellation is the expected outcome.
            let _ = ticker.await;
        }
        let ticks = self.ticks();
        tracing::info!(ticks, "health session stopped");
        Event::SessionStopped {
            ticks,
            at: Utc::now(),
        }
    }
}

impl Drop for HealthSession {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            tracing::debug!("health session dropped; ticker aborted");
        }
    }
}

async fn run_ticker(shared: Weak<Shared>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(state) = shared.upgrade() else {
            break;
        };
        state.tick();
    }
}

/// Consumer access to a session's store.
#[derive(Clone)]
pub struct HealthDataHandle {
    shared: Weak<Shared>,
}

impl std::fmt::Debug for HealthDataHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthDataHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

impl HealthDataHandle {
    fn try_shared(&self) -> Result<Arc<Shared>> {
        self.shared.upgrade().ok_or(CoreError::SessionEnded)
    }

    fn shared(&self) -> Arc<Shared> {
        match self.shared.upgrade() {
            Some(shared) => shared,
            None => panic!("{SESSION_ENDED}"),
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.strong_count() > 0
    }

    // Reads

    /// Latest committed reading.
    ///
    /// # Panics
    /// Panics if the owning session has ended.
    pub fn reading(&self) -> HealthReading {
        let shared = self.shared();
        let store = shared.lock();
        store.reading().clone()
    }

    /// Current device registry.
    ///
    /// # Panics
    /// Panics if the owning session has ended.
    pub fn devices(&self) -> Vec<Device> {
        let shared = self.shared();
        let store = shared.lock();
        store.devices().to_vec()
    }

    /// # Panics
    /// Panics if the owning session has ended.
    pub fn snapshot(&self) -> StoreSnapshot {
        let shared = self.shared();
        let store = shared.lock();
        store.snapshot()
    }

    pub fn try_snapshot(&self) -> Result<StoreSnapshot> {
        let shared = self.try_shared()?;
        let store = shared.lock();
        Ok(store.snapshot())
    }

    // Mutations

    /// # Panics
    /// Panics if the owning session has ended.
    pub fn toggle_device_connection(&self, id: &str) -> Option<Event> {
        let event = self
            .shared()
            .commit(|store| store.toggle_device_connection(id));
        match &event {
            Some(_) => tracing::debug!(device_id = id, "device connection toggled"),
            None => tracing::debug!(device_id = id, "toggle ignored: unknown device"),
        }
        event
    }

    /// # Panics
    /// Panics if the owning session has ended.
    pub fn add_device(&self, device: NewDevice) -> Option<Event> {
        let id = device.id.clone();
        let event = self.shared().commit(|store| store.add_device(device));
        match &event {
            Some(_) => tracing::debug!(device_id = %id, "device added"),
            None => tracing::debug!(device_id = %id, "add ignored: device already registered"),
        }
        event
    }

    /// Simulate discovery: wait `delay`, then register the device.
    ///
    /// Returns [`CoreError::SessionEnded`] if the session ended while
    /// searching.
    pub async fn discover_device(&self, device: NewDevice, delay: Duration) -> Result<Option<Event>> {
        tracing::debug!(device_id = %device.id, delay_ms = delay.as_millis() as u64, "searching for device");
        tokio::time::sleep(delay).await;
        let shared = self.try_shared()?;
        Ok(shared.commit(|store| store.add_device(device)))
    }
}
