pub mod config;
pub mod logging;

pub mod cache_clear;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod persist;
pub mod refresh;
pub mod session;
pub mod validate;

pub use error::{RefreshError, RejectReason};
pub use refresh::{RefreshOutcome, WsdlRefresher, WsdlUpdate};
pub use session::{Session, SessionProvider};
