//! Prospector session - durable cookie state for the scraping client.
//!
//! Holds the cookie jar shared by every outbound request and persists it as
//! JSON across process restarts. Mutation is serialized behind a write lock
//! because concurrent in-flight responses may absorb `Set-Cookie` headers
//! at the same time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cookie;
pub mod error;
pub mod store;

pub use cookie::Cookie;
pub use error::{Result, SessionError};
pub use store::SessionStore;
