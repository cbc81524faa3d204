//! Domain events published to the event sink.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A new account was created.
    UserRegistered {
        user_id: Uuid,
        name: String,
        email: String,
        confirmed: bool,
    },
}
