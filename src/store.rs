//! MessageStore: the single current message, shared between the update
//! handlers and the render thread.
//!
//! The slot holds an `Arc<str>`, so a snapshot is one reference-count bump
//! under the lock. No rendering or I/O ever happens while the lock is held.

use crate::actor::MessageChanged;
use crate::error::MessageError;
use crossbeam_channel::{Sender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// An immutable message value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The text to scroll.
    pub text: Arc<str>,
    /// Number of accepted replacements before this one (0 = default).
    pub revision: u64,
}

impl Message {
    fn new(text: &str, revision: u64) -> Self {
        Self {
            text: Arc::from(text),
            revision,
        }
    }
}

/// Whether `text` contains at least one character that lights a pixel.
pub fn is_displayable(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace() && !c.is_control())
}

/// Thread-safe holder of the current message.
#[derive(Debug)]
pub struct MessageStore {
    current: Mutex<Message>,
    notifier: Option<Sender<MessageChanged>>,
}

impl MessageStore {
    /// Create a store holding `default` as revision 0.
    pub fn new(default: &str) -> Result<Self, MessageError> {
        if !is_displayable(default) {
            return Err(MessageError::Empty);
        }
        Ok(Self {
            current: Mutex::new(Message::new(default, 0)),
            notifier: None,
        })
    }

    /// Send a [`MessageChanged`] on `sender` for every accepted replace.
    #[must_use]
    pub fn with_notifier(mut self, sender: Sender<MessageChanged>) -> Self {
        self.notifier = Some(sender);
        self
    }

    /// Install `text` as the current message.
    ///
    /// Text that is empty or has no displayable characters is rejected and
    /// the previous message stays in place. Concurrent calls are serialized
    /// by the lock: the last one to acquire it wins.
    pub fn replace(&self, text: &str) -> Result<Message, MessageError> {
        if !is_displayable(text) {
            debug!("rejected empty message");
            return Err(MessageError::Empty);
        }

        // Allocate outside the lock.
        let text: Arc<str> = Arc::from(text);
        let installed = {
            let mut current = self.lock();
            *current = Message {
                text,
                revision: current.revision + 1,
            };
            current.clone()
        };

        info!(revision = installed.revision, text = %installed.text, "message replaced");
        self.notify(&installed);
        Ok(installed)
    }

    /// Copy of the current message.
    pub fn snapshot(&self) -> Message {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Message> {
        // The slot is only ever assigned whole values, so a panic elsewhere
        // cannot leave it half-written.
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn notify(&self, message: &Message) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let event = MessageChanged {
            revision: message.revision,
            chars: message.text.chars().count(),
        };
        match notifier.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(revision = message.revision, "feedback queue full, skipping beep");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("feedback actor is gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::thread;

    #[test]
    fn test_default_is_revision_zero() {
        let store = MessageStore::new("Welcome").unwrap();
        let message = store.snapshot();
        assert_eq!(&*message.text, "Welcome");
        assert_eq!(message.revision, 0);
    }

    #[test]
    fn test_default_must_be_displayable() {
        assert_eq!(MessageStore::new("").unwrap_err(), MessageError::Empty);
        assert_eq!(MessageStore::new(" \t\n").unwrap_err(), MessageError::Empty);
    }

    #[test]
    fn test_replace_then_snapshot() {
        let store = MessageStore::new("Welcome").unwrap();
        let installed = store.replace("Bye").unwrap();
        assert_eq!(installed.revision, 1);
        assert_eq!(store.snapshot(), installed);
    }

    #[test]
    fn test_empty_replace_rejected() {
        let store = MessageStore::new("Welcome").unwrap();
        for text in ["", "   ", "\t\r\n", "\u{7}\u{1b}"] {
            assert_eq!(store.replace(text), Err(MessageError::Empty));
        }
        let message = store.snapshot();
        assert_eq!(&*message.text, "Welcome");
        assert_eq!(message.revision, 0);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_replace() {
        let store = MessageStore::new("Welcome").unwrap();
        let before = store.snapshot();
        store.replace("Bye").unwrap();
        assert_eq!(&*before.text, "Welcome");
    }

    #[test]
    fn test_notifier_receives_accepted_only() {
        let (tx, rx) = bounded(4);
        let store = MessageStore::new("Welcome").unwrap().with_notifier(tx);

        store.replace("").unwrap_err();
        store.replace("Hi").unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.revision, 1);
        assert_eq!(event.chars, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_notifier_does_not_block() {
        let (tx, _rx) = bounded(1);
        let store = MessageStore::new("Welcome").unwrap().with_notifier(tx);
        for i in 0..10 {
            store.replace(&format!("msg {i}")).unwrap();
        }
        assert_eq!(&*store.snapshot().text, "msg 9");
    }

    #[test]
    fn test_concurrent_replace_last_writer_wins() {
        let store = Arc::new(MessageStore::new("Welcome").unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut last = None;
                    for i in 0..200 {
                        last = Some(store.replace(&format!("writer {t} message {i}")).unwrap());
                    }
                    last.unwrap()
                })
            })
            .collect();

        let finals: Vec<Message> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = store.snapshot();

        // Every accepted replace got its own revision.
        assert_eq!(stored.revision, 8 * 200);
        // The stored value is the one installed with the highest revision.
        let winner = finals.iter().max_by_key(|m| m.revision).unwrap();
        assert_eq!(&stored, winner);
    }

    #[test]
    fn test_two_writers_never_mix() {
        for _ in 0..50 {
            let store = Arc::new(MessageStore::new("Welcome").unwrap());
            let a = {
                let store = Arc::clone(&store);
                thread::spawn(move || store.replace("A").unwrap())
            };
            let b = {
                let store = Arc::clone(&store);
                thread::spawn(move || store.replace("B").unwrap())
            };
            a.join().unwrap();
            b.join().unwrap();

            let text = store.snapshot().text;
            assert!(&*text == "A" || &*text == "B", "got {text:?}");
        }
    }
}
