//! Fabricated fetch responses.
//!
//! A reply is built only after its body has been fully resolved, yet the
//! consumer expects network-style delivery: nothing is observable inside the
//! constructor's stack frame. The two lifecycle notifications are therefore
//! posted onto the host event queue and surface once the host drains it,
//! `DataReady` first (skipped for empty bodies), then `Finished`, each
//! exactly once.

use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::debug;

use crate::dispatch::EventQueue;

pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyEvent {
    /// Body bytes can be read. Sent once, only for non-empty bodies.
    DataReady,
    /// The reply is complete. Always sent, always last.
    Finished,
}

/// One-shot read-only byte stream over a resolved body.
pub struct SyntheticReply {
    path: String,
    body: Vec<u8>,
    cursor: usize,
    content_type: &'static str,
    events: Receiver<ReplyEvent>,
}

impl SyntheticReply {
    /// Wrap an already-resolved body for `path`. The notifications are
    /// queued here but delivered strictly after this constructor returns,
    /// on the host's next event turn.
    pub fn new(path: &str, body: Vec<u8>, queue: &EventQueue) -> Self {
        let (tx, rx) = mpsc::channel();
        let has_data = !body.is_empty();
        queue.post(move || {
            if has_data {
                // The receiver may already be gone; stale notifications
                // are harmless.
                let _ = tx.send(ReplyEvent::DataReady);
            }
            let _ = tx.send(ReplyEvent::Finished);
        });
        debug!(path, len = body.len(), "synthetic reply created");
        Self {
            content_type: content_type_for(path),
            path: path.to_string(),
            body,
            cursor: 0,
            events: rx,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Total body size, independent of how much has been read.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn status(&self) -> u16 {
        STATUS_OK
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Remaining unread bytes.
    pub fn bytes_available(&self) -> usize {
        self.body.len() - self.cursor
    }

    /// The cursor only moves forward; there is no seeking.
    pub fn is_sequential(&self) -> bool {
        true
    }

    /// Copy up to `buf.len()` bytes into `buf` and advance the cursor.
    /// Returns the number copied; 0 means end of stream, never an error.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.bytes_available());
        buf[..n].copy_from_slice(&self.body[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }

    /// Nothing to cancel: the body is already in memory and the deferred
    /// notifications run harmlessly even after interest is lost.
    pub fn abort(&mut self) {}

    /// Next lifecycle event, if the host queue has been drained far enough
    /// to deliver one.
    pub fn try_next_event(&self) -> Option<ReplyEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl io::Read for SyntheticReply {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(SyntheticReply::read(self, buf))
    }
}

/// Content type by filename extension, case-insensitive. Unknown extensions
/// are served as generic binary data.
pub fn content_type_for(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".qml") {
        "text/plain"
    } else if lower.ends_with(".js") {
        "application/javascript"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read as _;

    #[test]
    fn reads_are_sequential_and_end_with_zero() {
        let queue = EventQueue::new();
        let mut reply = SyntheticReply::new("main.qml", b"0123456789".to_vec(), &queue);
        assert_eq!(reply.len(), 10);
        assert_eq!(reply.bytes_available(), 10);
        assert!(reply.is_sequential());

        let mut buf = [0u8; 4];
        assert_eq!(reply.read(&mut buf), 4);
        assert_eq!(&buf, b"0123");
        assert_eq!(reply.bytes_available(), 6);

        let mut rest = [0u8; 16];
        assert_eq!(reply.read(&mut rest), 6);
        assert_eq!(&rest[..6], b"456789");
        assert_eq!(reply.read(&mut rest), 0);
        assert_eq!(reply.read(&mut rest), 0);
        assert_eq!(reply.len(), 10);
    }

    #[test]
    fn notifications_arrive_only_after_the_queue_turn() {
        let queue = EventQueue::new();
        let reply = SyntheticReply::new("a.qml", b"body".to_vec(), &queue);
        assert_eq!(reply.try_next_event(), None);

        assert_eq!(queue.process_pending(), 1);
        assert_eq!(reply.try_next_event(), Some(ReplyEvent::DataReady));
        assert_eq!(reply.try_next_event(), Some(ReplyEvent::Finished));
        assert_eq!(reply.try_next_event(), None);

        // A second turn delivers nothing more.
        assert_eq!(queue.process_pending(), 0);
        assert_eq!(reply.try_next_event(), None);
    }

    #[test]
    fn empty_body_skips_data_ready() {
        let queue = EventQueue::new();
        let reply = SyntheticReply::new("sub/qmldir", Vec::new(), &queue);
        assert_eq!(reply.status(), STATUS_OK);
        assert_eq!(reply.len(), 0);
        assert!(reply.is_empty());

        queue.process_pending();
        assert_eq!(reply.try_next_event(), Some(ReplyEvent::Finished));
        assert_eq!(reply.try_next_event(), None);
    }

    #[test]
    fn abort_changes_nothing() {
        let queue = EventQueue::new();
        let mut reply = SyntheticReply::new("a.png", vec![1, 2, 3], &queue);
        reply.abort();
        let mut buf = [0u8; 8];
        assert_eq!(reply.read(&mut buf), 3);
        assert_eq!(reply.status(), STATUS_OK);
    }

    #[test]
    fn queue_survives_a_dropped_reply() {
        let queue = EventQueue::new();
        let reply = SyntheticReply::new("gone.qml", b"x".to_vec(), &queue);
        drop(reply);
        assert_eq!(queue.process_pending(), 1);
    }

    #[test]
    fn content_types_follow_the_extension_table() {
        assert_eq!(content_type_for("main.qml"), "text/plain");
        assert_eq!(content_type_for("app.js"), "application/javascript");
        assert_eq!(content_type_for("logo.png"), "image/png");
        assert_eq!(content_type_for("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for("photo.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("font.ttf"), "application/octet-stream");
        assert_eq!(content_type_for("qmldir"), "application/octet-stream");
    }

    #[test]
    fn std_io_read_drains_the_stream() {
        let queue = EventQueue::new();
        let mut reply = SyntheticReply::new("blob.bin", vec![9u8; 300], &queue);
        let mut out = Vec::new();
        reply.read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 300);
        assert_eq!(reply.bytes_available(), 0);
    }
}
