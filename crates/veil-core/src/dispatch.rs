//! Stand-in for the host engine's event loop.
//!
//! Replies must deliver their notifications on the host's event turn, never
//! from inside the constructor. The queue models that turn explicitly: work
//! is posted as boxed closures and runs only when the host drains the queue.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

type Task = Box<dyn FnOnce() + Send>;

/// FIFO queue of deferred work. Clones share the same queue.
#[derive(Clone, Default)]
pub struct EventQueue {
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task. Never runs it inline.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.lock().push_back(Box::new(task));
    }

    /// Run everything queued at the moment of the call, in post order, and
    /// return how many tasks ran. Tasks posted while draining wait for the
    /// next turn.
    pub fn process_pending(&self) -> usize {
        let batch: Vec<Task> = self.tasks.lock().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}
