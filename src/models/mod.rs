pub mod alert;
pub mod event;
pub mod push;

pub use alert::{Alert, Condition};
pub use event::AlertEvent;
pub use push::{PushPayload, PushSubscription};
