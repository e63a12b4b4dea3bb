pub mod account;
pub mod actions;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod membership;
pub mod panels;
pub mod persistence;
pub mod progress;
pub mod reducer;
pub mod router;
pub mod state;
pub mod suggestions;
pub mod workflow;

pub use actions::*;
pub use reducer::*;
pub use state::*;

pub use config::Config;
pub use error::PortalError;
pub use persistence::*;
