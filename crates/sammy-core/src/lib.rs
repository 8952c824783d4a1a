//! Core domain models and logic for sammy
//!
//! This crate contains:
//! - Activity feed models (ActivityEvent, EventPayload)
//! - Event renderer (raw activity -> prose sentence + sensitive tokens)
//! - Time windows and masking policy
//! - The error type shared by every sammy crate

pub mod activity;
pub mod error;
pub mod event;
pub mod policy;
pub mod render;

pub use activity::{ActivityEvent, EventPayload};
pub use error::{Error, Result, Service};
pub use event::{Event, Placement, TimeWindow};
pub use policy::DuplicatePolicy;
