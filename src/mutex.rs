use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Table of bus locks, one per physical bus number.
///
/// Several MCP23017 can sit on the same bus at different addresses.  Their register transactions
/// must not interleave, so every session opened on a bus shares the same [`BusLock`].  Keep one
/// `BusLocks` for everything that talks to the same set of buses and pass it to
/// [`Mcp23017::open`][crate::Mcp23017::open]:
///
/// ```
/// let locks = mcp23017::BusLocks::new();
/// let a = locks.acquire(1);
/// let b = locks.acquire(1);
/// assert!(a.same_bus(&b));
/// ```
///
/// The table only holds weak references.  Once the last session on a bus is gone its lock is
/// dropped, and the next open creates a fresh one.
#[derive(Debug, Default)]
pub struct BusLocks {
    buses: Mutex<HashMap<u8, Weak<Mutex<()>>>>,
}

impl BusLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for `bus`, creating it if no live session uses that bus.
    pub fn acquire(&self, bus: u8) -> BusLock {
        let mut buses = self.buses.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(mutex) = buses.get(&bus).and_then(Weak::upgrade) {
            return BusLock { bus, mutex };
        }

        buses.retain(|_, lock| lock.strong_count() > 0);
        let mutex = Arc::new(Mutex::new(()));
        buses.insert(bus, Arc::downgrade(&mutex));
        log::debug!("Created lock for bus {bus}");
        BusLock { bus, mutex }
    }

    /// Number of buses with at least one live lock holder.
    pub fn active_buses(&self) -> usize {
        let buses = self.buses.lock().unwrap_or_else(PoisonError::into_inner);
        buses.values().filter(|lock| lock.strong_count() > 0).count()
    }
}

/// Shared handle to the lock of one bus.
#[derive(Debug, Clone)]
pub struct BusLock {
    bus: u8,
    mutex: Arc<Mutex<()>>,
}

impl BusLock {
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Whether both handles guard the same bus.
    pub fn same_bus(&self, other: &BusLock) -> bool {
        Arc::ptr_eq(&self.mutex, &other.mutex)
    }

    /// Hold the bus for the duration of `f`.
    ///
    /// The lock only guards access to the wire, so a lock poisoned by a panicking holder is
    /// taken over instead of failing.
    pub fn lock<R, F: FnOnce() -> R>(&self, f: F) -> R {
        let _guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
