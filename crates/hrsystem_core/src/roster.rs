//! Roster cache: the in-memory, replace-only view of a record store table.
//!
//! # Responsibility
//! - Hold the latest full read of a table as an immutable snapshot.
//! - Publish new snapshots to subscribers after they become visible.
//!
//! # Invariants
//! - A snapshot is swapped in whole; readers see either the old or the new
//!   item set, never a mix.
//! - A failed load leaves the previous snapshot visible.
//! - Refreshes of one cache are serialized; `generation` increases by one per
//!   published snapshot.
//! - Listeners run while the refresh is still serialized, so they must not
//!   call `refresh`, `subscribe` or `unsubscribe` on the same cache.

use arc_swap::ArcSwap;
use log::{info, warn};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Handle returned by [`RosterCache::subscribe`].
pub type ListenerId = u64;

type Listener<T> = Box<dyn Fn(&Arc<RosterSnapshot<T>>) + Send + Sync>;

/// One complete, ordered read of the record store.
#[derive(Debug)]
pub struct RosterSnapshot<T> {
    generation: u64,
    items: Vec<T>,
}

impl<T> RosterSnapshot<T> {
    /// `0` for the empty snapshot a cache starts with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Items in store order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Replace-only cache of one entity table.
pub struct RosterCache<T> {
    label: &'static str,
    current: ArcSwap<RosterSnapshot<T>>,
    refresh_gate: Mutex<()>,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    next_listener_id: AtomicU64,
}

impl<T> RosterCache<T> {
    /// Creates an empty cache. `label` only appears in log events.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            current: ArcSwap::from_pointee(RosterSnapshot {
                generation: 0,
                items: Vec::new(),
            }),
            refresh_gate: Mutex::new(()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Returns the currently visible snapshot.
    pub fn snapshot(&self) -> Arc<RosterSnapshot<T>> {
        self.current.load_full()
    }

    /// Replaces the cache contents with the result of `load`.
    ///
    /// # Errors
    /// Returns the loader's error unchanged; the old snapshot stays visible.
    pub fn refresh<E: Display>(
        &self,
        load: impl FnOnce() -> Result<Vec<T>, E>,
    ) -> Result<Arc<RosterSnapshot<T>>, E> {
        let _gate = lock(&self.refresh_gate);
        let started_at = Instant::now();

        let items = match load() {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    "event=roster_refresh module=roster status=error roster={} duration_ms={} error={}",
                    self.label,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        let snapshot = Arc::new(RosterSnapshot {
            generation: self.current.load().generation + 1,
            items,
        });
        self.current.store(Arc::clone(&snapshot));
        info!(
            "event=roster_refresh module=roster status=ok roster={} generation={} items={} duration_ms={}",
            self.label,
            snapshot.generation,
            snapshot.items.len(),
            started_at.elapsed().as_millis()
        );

        for (_, listener) in lock(&self.listeners).iter() {
            listener(&snapshot);
        }
        Ok(snapshot)
    }

    /// Registers `listener` for every snapshot published after this call.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Arc<RosterSnapshot<T>>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::RosterCache;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn new_cache_starts_empty_at_generation_zero() {
        let cache: RosterCache<u32> = RosterCache::new("test");
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn refresh_replaces_contents_instead_of_appending() {
        let cache = RosterCache::new("test");
        cache.refresh(|| Ok::<_, String>(vec![1, 2, 3])).unwrap();
        let second = cache.refresh(|| Ok::<_, String>(vec![4])).unwrap();

        assert_eq!(second.items(), &[4]);
        assert_eq!(second.generation(), 2);
        assert_eq!(cache.snapshot().items(), &[4]);
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let cache = RosterCache::new("test");
        cache.refresh(|| Ok::<_, String>(vec![7, 8])).unwrap();

        let err = cache
            .refresh(|| Err::<Vec<i32>, _>("store down".to_string()))
            .unwrap_err();
        assert_eq!(err, "store down");

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.items(), &[7, 8]);
        assert_eq!(snapshot.generation(), 1);
    }

    #[test]
    fn held_snapshot_is_unaffected_by_later_refresh() {
        let cache = RosterCache::new("test");
        cache.refresh(|| Ok::<_, String>(vec!["a", "b"])).unwrap();
        let held = cache.snapshot();

        cache.refresh(|| Ok::<_, String>(vec!["c"])).unwrap();
        assert_eq!(held.items(), &["a", "b"]);
        assert_eq!(cache.snapshot().items(), &["c"]);
    }

    #[test]
    fn listeners_see_each_published_snapshot_until_unsubscribed() {
        let cache = RosterCache::new("test");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = cache.subscribe(move |snapshot| {
            sink.lock().unwrap().push(snapshot.generation());
        });

        cache.refresh(|| Ok::<_, String>(vec![1])).unwrap();
        let _ = cache.refresh(|| Err::<Vec<i32>, _>("boom".to_string()));
        cache.refresh(|| Ok::<_, String>(vec![2])).unwrap();
        assert!(cache.unsubscribe(id));
        assert!(!cache.unsubscribe(id));
        cache.refresh(|| Ok::<_, String>(vec![3])).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn concurrent_refreshes_never_expose_torn_snapshots() {
        let cache = Arc::new(RosterCache::new("test"));
        let counter = Arc::new(AtomicU64::new(0));
        let mut workers = Vec::new();

        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let counter = Arc::clone(&counter);
            workers.push(thread::spawn(move || {
                for _ in 0..50 {
                    let read = counter.fetch_add(1, Ordering::SeqCst);
                    cache
                        .refresh(|| Ok::<_, String>(vec![read; 16]))
                        .unwrap();
                    let snapshot = cache.snapshot();
                    let first = snapshot.items()[0];
                    assert!(snapshot.items().iter().all(|item| *item == first));
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.snapshot().generation(), 200);
    }
}
