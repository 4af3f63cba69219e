//! Booth-side runtime: the session event loop and its HTTP collaborators.
//!
//! - [`session`]: owns the [`Booth`](snapbooth_core::booth::Booth), card
//!   views, and persistence; applies asynchronous results by id.
//! - [`gallery`]: talks to `/api/gallery`.
//! - [`caption`]: a caption provider backed by `/api/generate`.

pub mod caption;
pub mod config;
pub mod error;
pub mod gallery;
pub mod session;
