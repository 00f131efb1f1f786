//! # Feature: Reminders
//!
//! Composes renewal reminders for expiring licenses and delivers them over
//! OpenPhone SMS and plain-text email drafts, on demand or on a schedule.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true (scheduler via `ENABLE_SCHEDULER`)
//!
//! ## Changelog
//! - 1.0.0: Composer, OpenPhone and email draft channels, dispatch, scheduler

pub mod channels;
pub mod composer;
pub mod scheduler;
pub mod selection;
pub mod service;

pub use channels::{DeliveryError, DeliveryResult};
pub use composer::{compose, ReminderPayload};
pub use scheduler::{ReminderScheduler, SchedulerHandle};
pub use selection::{ChannelSelection, EmailSelection, OpenPhoneOverride};
pub use service::{DispatchOutcome, ReminderService, ReminderSettings};
