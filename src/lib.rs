//! Service status dashboard
//!
//! Fetches a JSON document describing monitored services and renders one
//! HTML card per service into a container element of a page.

pub mod card;
pub mod config;
pub mod errors;
pub mod mount;
pub mod renderer;
pub mod source;
pub mod status;

pub use card::{Card, DisplayZone};
pub use config::Config;
pub use errors::{DashboardError, Result};
pub use mount::{Document, HtmlDocument, MemoryDocument, MountPoint};
pub use renderer::{RenderReport, Renderer};
pub use source::{FileSource, HttpSource, StatusSource};
pub use status::{PingAttempt, StatusCollection, StatusRecord, Timestamp};
