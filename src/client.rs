//! Client entry point.
//!
//! [`Client`] is cheap to clone and shares one HTTP connection pool; services borrow
//! it through the accessors in [`core`], chat sessions are opened from it with
//! [`Client::connect`] or [`Client::with_session`].

pub mod builder;
pub mod core;

pub use builder::ClientBuilder;
pub use core::Client;
