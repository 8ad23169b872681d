//! Automated timesheet entry against an SAP NetWeaver Portal.
//!
//! The portal renders its timesheet asynchronously, so the whole crate is
//! organized around one concern: driving a strict linear sequence of UI
//! interactions where every step may have to suspend until the remote page
//! catches up. [`wait::WaitConfig`] is the single polling primitive, and
//! [`session::PortalSession`] is the explicit handle every stage receives
//! instead of ambient browser state.
//!
//! The flow itself lives in [`pipeline`]: launch, authenticate, wait for the
//! timesheet, fill five weekdays with a fixed hour value, submit, confirm,
//! log off, tear down. The first failure aborts the remaining stages; the
//! browser process is released on every path.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod selectors;
pub mod session;
pub mod wait;

pub use config::Credentials;
pub use error::{HoursError, Result};
pub use pipeline::{RunOptions, Stage};
pub use session::PortalSession;
pub use wait::WaitConfig;
