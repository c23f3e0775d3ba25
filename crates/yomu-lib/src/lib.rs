#[macro_use]
extern crate log;

pub mod comment;
pub mod error;
pub mod history;
pub mod models;
pub mod notification;
pub mod prelude;
pub mod search;
pub mod stomp;
pub mod upload;

pub use error::{Error, Result};

/// Version of the shared models, sent by clients as `X-Yomu-Client`
pub static LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
