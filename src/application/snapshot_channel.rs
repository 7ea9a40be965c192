// Single-writer snapshot cell shared between a poller and its readers
use std::sync::Arc;
use tokio::sync::watch;

/// Owned by exactly one service; deliberately not `Clone`.
pub struct SnapshotWriter<T> {
    tx: watch::Sender<Arc<T>>,
}

pub struct SnapshotReader<T> {
    rx: watch::Receiver<Arc<T>>,
}

impl<T> Clone for SnapshotReader<T> {
    fn clone(&self) -> Self {
        Self { rx: self.rx.clone() }
    }
}

pub fn snapshot_channel<T>(initial: T) -> (SnapshotWriter<T>, SnapshotReader<T>) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (SnapshotWriter { tx }, SnapshotReader { rx })
}

impl<T> SnapshotWriter<T> {
    /// Replace the whole snapshot; readers see either the old or the new value, never a mix.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    pub fn current(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }
}

impl<T> SnapshotReader<T> {
    pub fn current(&self) -> Arc<T> {
        self.rx.borrow().clone()
    }

    /// Receiver that wakes on every publish, for streaming consumers.
    pub fn watch(&self) -> watch::Receiver<Arc<T>> {
        self.rx.clone()
    }
}
