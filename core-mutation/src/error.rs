use thiserror::Error;

/// Longest feedback message accepted, in characters.
pub const MAX_FEEDBACK_LENGTH: usize = 2000;

/// A client-side precondition failed; nothing was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Poll {poll_id} was already voted on")]
    AlreadyVoted { poll_id: String },

    #[error("Poll {poll_id} is closed")]
    PollClosed { poll_id: String },

    #[error("Poll {poll_id} has no option {option_id}")]
    UnknownOption { poll_id: String, option_id: String },

    #[error("Poll {0} is not loaded")]
    UnknownPoll(String),

    #[error("Already registered for event {event_id}")]
    AlreadyRegistered { event_id: String },

    #[error("Not registered for event {event_id}")]
    NotRegistered { event_id: String },

    #[error("Event {event_id} is full")]
    EventFull { event_id: String },

    #[error("Event {0} is not loaded")]
    UnknownEvent(String),

    #[error("No event is open")]
    NoEventLoaded,

    #[error("No profile is loaded")]
    NoProfile,

    #[error("Feedback message is empty")]
    EmptyMessage,

    #[error("Feedback message is {length} characters, limit is {limit}")]
    MessageTooLong { length: usize, limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The same entity already has a mutation in flight.
    #[error("Mutation already in flight for {key}")]
    InFlight { key: String },
}

pub type Result<T> = std::result::Result<T, MutationError>;
