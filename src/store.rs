//! Per-thread table storage
//!
//! Each store owns one table per accessing thread. A thread's table is created
//! on its first access and is never visible to any other thread, so slot reads
//! and writes need no synchronization. Dropping the store frees the tables of
//! every thread at once.

use std::cell::RefCell;

use thread_local::ThreadLocal;
use tracing::trace;

use crate::config::SizeExponent;
use crate::table::{Layout, Table};

/// Handle to one table per accessing thread.
///
/// The closure passed to `with_table` runs while the thread's table is
/// borrowed, so it must not sample back through the same cache. Callers look
/// up, release, call the inner sampler, then store.
pub struct TableStore {
    tables: ThreadLocal<RefCell<Table>>,
    layout: Layout,
    exponent: SizeExponent,
}

impl TableStore {
    pub fn new(layout: Layout, exponent: SizeExponent) -> Self {
        Self {
            tables: ThreadLocal::new(),
            layout,
            exponent,
        }
    }

    pub fn exponent(&self) -> SizeExponent {
        self.exponent
    }

    /// Run `f` against this thread's table, allocating it on first use
    #[inline]
    pub fn with_table<R>(&self, f: impl FnOnce(&mut Table) -> R) -> R {
        let cell = self.tables.get_or(|| {
            trace!(
                layout = ?self.layout,
                slots = self.exponent.slots(),
                "allocating thread-local cache table"
            );
            RefCell::new(Table::new(self.layout, self.exponent))
        });
        f(&mut cell.borrow_mut())
    }

    /// Whether the current thread has allocated a table for this store
    pub fn has_table(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Tables allocated so far, across all threads
    pub fn table_count(&mut self) -> usize {
        self.tables.iter_mut().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::table::{Int2DKey, SlotKey};

    fn exp(e: i32) -> SizeExponent {
        SizeExponent::new(e).unwrap()
    }

    #[test]
    fn test_lazy_allocation() {
        let store = TableStore::new(Layout::Int2D, exp(4));
        assert!(!store.has_table());

        let len = store.with_table(|t| t.len());
        assert_eq!(len, 16);
        assert!(store.has_table());
    }

    #[test]
    fn test_table_persists_across_calls() {
        let store = TableStore::new(Layout::Int2D, exp(8));
        let key = Int2DKey { seed: 3, x: 1, z: 2 };
        let idx = key.slot(store.exponent().mask());

        store.with_table(|t| {
            if let Some(t) = Int2DKey::table(t) {
                t.put(idx, key, 9.5);
            }
        });
        let got = store.with_table(|t| Int2DKey::table(t).and_then(|t| t.get(idx, &key)));
        assert_eq!(got, Some(9.5));
    }

    #[test]
    fn test_tables_per_thread() {
        let mut store = TableStore::new(Layout::Int2D, exp(8));
        let key = Int2DKey { seed: 1, x: 5, z: 5 };
        let idx = key.slot(store.exponent().mask());

        store.with_table(|t| {
            if let Some(t) = Int2DKey::table(t) {
                t.put(idx, key, 1.0);
            }
        });

        std::thread::scope(|s| {
            s.spawn(|| {
                assert!(!store.has_table());
                let got = store.with_table(|t| Int2DKey::table(t).and_then(|t| t.get(idx, &key)));
                assert_eq!(got, None);
            });
        });

        assert_eq!(store.table_count(), 2);
    }

    #[test]
    fn test_drop_on_other_thread_frees_worker_table() {
        let (tx_ready, rx_ready) = std::sync::mpsc::channel::<()>();
        let (tx_go, rx_go) = std::sync::mpsc::channel::<()>();

        let dropped = Arc::new(TableStore::new(Layout::Int2D, exp(8)));
        let shared = Arc::clone(&dropped);
        let worker = std::thread::spawn(move || {
            let mut kept = TableStore::new(Layout::Int2D, exp(8));
            kept.with_table(|_| ());
            shared.with_table(|_| ());
            drop(shared);
            tx_ready.send(()).unwrap();
            rx_go.recv().unwrap();

            // Keep sampling through the surviving store without allocating anew
            for i in 0..999 {
                let key = Int2DKey { seed: 1, x: i, z: -i };
                kept.with_table(|t| {
                    if let Some(t) = Int2DKey::table(t) {
                        t.put(key.slot(0xFF), key, i as f64);
                    }
                });
            }
            kept.table_count()
        });

        rx_ready.recv().unwrap();
        let mut dropped = Arc::try_unwrap(dropped).ok().unwrap();
        // The worker's table belongs to the store, not to the worker thread
        assert_eq!(dropped.table_count(), 1);
        drop(dropped);
        tx_go.send(()).unwrap();

        assert_eq!(worker.join().unwrap(), 1);
    }
}
