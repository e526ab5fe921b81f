//! `csadmin-notifications` — success and error messages shown to the user.
//!
//! Not permission gated. Entries only exist or are removed; timing of
//! automatic dismissal belongs to the view layer.

pub mod queue;

pub use queue::{Notification, NotificationKind, NotificationQueue, RelatedError};
