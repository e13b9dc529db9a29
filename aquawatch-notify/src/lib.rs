//! # AquaWatch Notify — Risk-level transition notifications
//!
//! A hysteresis trigger over risk-level transitions ([`trigger`]), a bounded
//! in-process store ([`store`]) and a background monitor loop ([`monitor`])
//! that polls the engine and raises notifications on qualifying transitions.

pub mod error;
pub mod monitor;
pub mod store;
pub mod trigger;

pub use error::{NotifyError, NotifyResult};
pub use monitor::{MonitorHandle, NotificationMonitor};
pub use store::{Notification, NotificationStore};
pub use trigger::{compose, should_notify, NotificationDraft, RiskTransitionTrigger};
