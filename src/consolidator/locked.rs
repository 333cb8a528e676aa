use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locked holds a value behind a mutex and only exposes whole-value reads and writes. There is no
/// read-modify-write: callers that need a consistent view across several reads take one `get()` and
/// work off that copy.
///
/// Intended for cheap-to-clone values (e.g. `Arc<_>`), so the lock is held for a pointer copy.
/// A panic can't leave a whole-value write half done, so a poisoned lock is recovered rather than
/// propagated.
pub(crate) struct Locked<T> {
    value: Mutex<T>,
}

impl<T: Clone> Locked<T> {
    pub(crate) fn new(value: T) -> Self {
        Locked {
            value: Mutex::new(value),
        }
    }

    pub(crate) fn get(&self) -> T {
        self.lock().clone()
    }

    pub(crate) fn set(&self, new_value: T) {
        // Drop the old value after releasing the lock; it may be the last reference to a large model.
        let _old_value = {
            let mut guard = self.lock();
            std::mem::replace(&mut *guard, new_value)
        };
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Poisons the mutex by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.value.lock();
            panic!("poisoning Locked for test");
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn get_returns_last_set() {
        let locked = Locked::new(Arc::new(1));
        assert_eq!(*locked.get(), 1);

        locked.set(Arc::new(2));
        assert_eq!(*locked.get(), 2);
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let locked = Locked::new(Arc::new(vec![1, 2, 3]));
        let snapshot = locked.get();

        locked.set(Arc::new(vec![4]));

        assert_eq!(*snapshot, vec![1, 2, 3]);
        assert_eq!(*locked.get(), vec![4]);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let locked = Locked::new(Arc::new(1));
        locked.poison();

        assert_eq!(*locked.get(), 1);
        locked.set(Arc::new(2));
        assert_eq!(*locked.get(), 2);
    }

    #[test]
    fn concurrent_readers_see_whole_values() {
        let locked = Arc::new(Locked::new(Arc::new((0u64, 0u64))));

        let writer = {
            let locked = locked.clone();
            thread::spawn(move || {
                for i in 1..=10_000u64 {
                    locked.set(Arc::new((i, i * 2)));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let locked = locked.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        let value = locked.get();
                        assert_eq!(value.1, value.0 * 2);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(*locked.get(), (10_000, 20_000));
    }
}
