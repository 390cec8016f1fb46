//! HTTP Handlers

mod admin;
mod comment;
mod ping;
mod poll;
mod vote;

pub use admin::*;
pub use comment::*;
pub use ping::*;
pub use poll::*;
pub use vote::*;
