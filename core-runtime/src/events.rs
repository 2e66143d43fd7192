//! # Event Bus System
//!
//! Provides an event-driven architecture for the library update core using
//! `tokio::sync::broadcast`. The update walk announces database changes here
//! so query front-ends and persistence can react without polling.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     emit      ┌───────────┐     subscribe    ┌────────────┐
//! │ Update Walk ├──────────────>│ EventBus  ├─────────────────>│ Subscriber │
//! └─────────────┘               │ (broadcast│                  └────────────┘
//! ┌─────────────┐     emit      │  channel) │     subscribe    ┌────────────┐
//! │ DB Editor   ├──────────────>│           ├─────────────────>│ Subscriber │
//! └─────────────┘               └───────────┘                  └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus.emit(CoreEvent::Library(LibraryEvent::DatabaseModified)).ok();
//!
//! assert_eq!(
//!     subscriber.try_recv().unwrap(),
//!     CoreEvent::Library(LibraryEvent::DatabaseModified)
//! );
//! ```
//!
//! ## Event Types
//!
//! ### Library Events
//! - `SongAdded`: New song added to the database
//! - `SongRemoved`: Song removed together with its directory
//! - `DirectoryRemoved`: Directory subtree deleted
//! - `DatabaseModified`: An update walk changed the database
//!
//! ### Update Events
//! - `ArchiveFailed`: An archive could not be opened
//! - `Completed`: An update walk finished
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Sending never blocks, so the synchronous update walker can emit from any
//! thread without a runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Database content events
    Library(LibraryEvent),
    /// Update walk events
    Update(UpdateEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Library(e) => e.description(),
            CoreEvent::Update(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Update(UpdateEvent::ArchiveFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Update(UpdateEvent::Completed { .. }) => EventSeverity::Info,
            CoreEvent::Library(LibraryEvent::DatabaseModified) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Library Events
// ============================================================================

/// Events related to database content changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    /// New song added to the database.
    SongAdded {
        /// Song URI relative to the music directory.
        uri: String,
    },
    /// Song removed from the database.
    SongRemoved {
        /// Song URI relative to the music directory.
        uri: String,
    },
    /// Directory removed together with all its descendants.
    DirectoryRemoved {
        /// Directory path relative to the music directory.
        path: String,
    },
    /// The database changed and should be saved and announced.
    DatabaseModified,
}

impl LibraryEvent {
    fn description(&self) -> &str {
        match self {
            LibraryEvent::SongAdded { .. } => "Song added to database",
            LibraryEvent::SongRemoved { .. } => "Song removed from database",
            LibraryEvent::DirectoryRemoved { .. } => "Directory removed from database",
            LibraryEvent::DatabaseModified => "Database modified",
        }
    }
}

// ============================================================================
// Update Events
// ============================================================================

/// Events related to database update walks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum UpdateEvent {
    /// An archive could not be opened; its stale database entries were pruned.
    ArchiveFailed {
        /// Archive path relative to the music directory.
        path: String,
        /// Human-readable error message.
        message: String,
    },
    /// Update walk finished.
    Completed {
        /// Whether the database changed.
        modified: bool,
        /// Number of songs added.
        songs_added: u64,
        /// Number of directory subtrees removed.
        directories_removed: u64,
    },
}

impl UpdateEvent {
    fn description(&self) -> &str {
        match self {
            UpdateEvent::ArchiveFailed { .. } => "Archive could not be opened",
            UpdateEvent::Completed { .. } => "Database update completed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future events.
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let library_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Library(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn song_added(uri: &str) -> CoreEvent {
        CoreEvent::Library(LibraryEvent::SongAdded {
            uri: uri.to_string(),
        })
    }

    #[test]
    fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);

        // Should error when no subscribers
        assert!(bus
            .emit(CoreEvent::Library(LibraryEvent::DatabaseModified))
            .is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = song_added("pack.zip/dir1/song.mod");
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Update(_)));

        bus.emit(song_added("a.mod")).ok();
        let completed = CoreEvent::Update(UpdateEvent::Completed {
            modified: true,
            songs_added: 1,
            directories_removed: 0,
        });
        bus.emit(completed.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), completed);
    }

    #[test]
    fn test_try_recv_empty_and_filtered() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Library(LibraryEvent::DatabaseModified)));

        assert!(stream.try_recv().is_none());

        bus.emit(song_added("a.mod")).ok();
        assert!(stream.try_recv().is_none());

        bus.emit(CoreEvent::Library(LibraryEvent::DatabaseModified))
            .ok();
        assert_eq!(
            stream.try_recv().unwrap().unwrap(),
            CoreEvent::Library(LibraryEvent::DatabaseModified)
        );
    }

    #[test]
    fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut stream = EventStream::new(bus.subscribe());

        for i in 0..5 {
            bus.emit(song_added(&format!("song{}.mod", i))).ok();
        }

        assert!(matches!(
            stream.try_recv(),
            Some(Err(RecvError::Lagged(_)))
        ));
    }

    #[test]
    fn test_event_severity() {
        let failed = CoreEvent::Update(UpdateEvent::ArchiveFailed {
            path: "pack.zip".to_string(),
            message: "corrupt".to_string(),
        });

        assert_eq!(failed.severity(), EventSeverity::Warning);
        assert_eq!(song_added("a.mod").severity(), EventSeverity::Debug);
        assert_eq!(
            CoreEvent::Library(LibraryEvent::DatabaseModified).severity(),
            EventSeverity::Info
        );
        assert_eq!(failed.description(), "Archive could not be opened");
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Library(LibraryEvent::SongRemoved {
            uri: "pack.zip/dir1/song.mod".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Library\""));
        assert!(json.contains("\"event\":\"SongRemoved\""));

        let decoded: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
