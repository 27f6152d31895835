//! Task registry for middleware background work.
//!
//! Tracks the continuations middleware spawns around bridge calls and the
//! forwarding tasks attached to bridge event streams. Stream tasks live in
//! named groups so a new call can replace the previous call's subscriptions.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TaskRegistry {
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    groups: Mutex<HashMap<&'static str, Vec<JoinHandle<()>>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
            groups: Mutex::new(HashMap::new()),
        }
    }

    /// Spawn a one-shot continuation (a bridge call and its follow-up dispatch).
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(self.until_shutdown(fut));
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Spawn a long-running task in `group`, cancelled by [`cancel_group`]
    /// or registry shutdown.
    ///
    /// [`cancel_group`]: TaskRegistry::cancel_group
    pub fn spawn_in_group<F>(&self, group: &'static str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(self.until_shutdown(fut));
        let mut groups = self.groups.lock();
        let entry = groups.entry(group).or_default();
        entry.retain(|h| !h.is_finished());
        entry.push(handle);
    }

    /// Abort every task in `group`. Returns how many were still running.
    pub fn cancel_group(&self, group: &'static str) -> usize {
        let Some(handles) = self.groups.lock().remove(group) else {
            return 0;
        };
        let mut running = 0;
        for handle in handles {
            if !handle.is_finished() {
                handle.abort();
                running += 1;
            }
        }
        running
    }

    /// Number of unfinished tasks in `group`
    pub fn group_len(&self, group: &'static str) -> usize {
        self.groups
            .lock()
            .get(group)
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
        for (_, handles) in self.groups.lock().drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }

    fn until_shutdown<F>(&self, fut: F) -> impl Future<Output = ()> + Send + 'static
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        async move {
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                _ = fut => {}
            }
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
