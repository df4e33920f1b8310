pub mod areas;
pub mod clock;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod search;
pub mod service;
pub mod temporal;
mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::Directory;
pub use error::{DirectoryError, EntityKind, Result};
pub use service::DirectoryService;
