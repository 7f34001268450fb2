//! The persisted notification log, its views and toasts.

pub mod formatter;
pub mod outcome;
pub mod store;
pub mod toast;
pub mod view;

pub use formatter::{FormattedNotification, NotificationFormatter};
pub use outcome::{Durability, StoreOutcome};
pub use store::NotificationStore;
pub use toast::{ToastId, ToastScheduler, ToastView};
pub use view::{BadgeView, NotificationItemView, NotificationListView};
