use tokio::sync::mpsc;

/// One structural change somewhere in the observed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added: usize,
    pub removed: usize,
}

impl MutationRecord {
    pub fn inserted(count: usize) -> Self {
        Self {
            added: count,
            removed: 0,
        }
    }

    pub fn replaced(removed: usize, added: usize) -> Self {
        Self { added, removed }
    }
}

/// Every record queued at the moment the watcher woke up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub records: usize,
    pub added: usize,
    pub removed: usize,
}

impl MutationBatch {
    fn push(&mut self, record: MutationRecord) {
        self.records += 1;
        self.added += record.added;
        self.removed += record.removed;
    }
}

/// Write side handed to whatever owns the document.
#[derive(Debug, Clone)]
pub struct MutationSink {
    sender: mpsc::UnboundedSender<MutationRecord>,
}

impl MutationSink {
    pub fn record(&self, record: MutationRecord) {
        if self.sender.send(record).is_err() {
            tracing::debug!(target: "watcher", "change watcher gone; mutation dropped");
        }
    }
}

/// Read side: yields one batch per wake-up, never filtering which changes
/// matter.
#[derive(Debug)]
pub struct ChangeWatcher {
    receiver: mpsc::UnboundedReceiver<MutationRecord>,
}

pub fn observe() -> (MutationSink, ChangeWatcher) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (MutationSink { sender }, ChangeWatcher { receiver })
}

impl ChangeWatcher {
    /// Waits for the next mutation and folds in everything already queued
    /// behind it. Returns `None` once every sink is dropped.
    ///
    /// Cancel safe: the only await point is the first receive.
    pub async fn next_batch(&mut self) -> Option<MutationBatch> {
        let first = self.receiver.recv().await?;
        let mut batch = MutationBatch::default();
        batch.push(first);
        while let Ok(record) = self.receiver.try_recv() {
            batch.push(record);
        }
        tracing::trace!(
            target: "watcher",
            records = batch.records,
            added = batch.added,
            removed = batch.removed,
            "mutation batch"
        );
        Some(batch)
    }

    /// Drains whatever is queued without waiting.
    #[cfg(test)]
    pub fn try_batch(&mut self) -> Option<MutationBatch> {
        let mut batch = MutationBatch::default();
        while let Ok(record) = self.receiver.try_recv() {
            batch.push(record);
        }
        (batch.records > 0).then_some(batch)
    }
}
