//! Administration client for a URL shortener.
//!
//! Short links are created, replaced and deleted through the link service at
//! `<origin>/s`; this crate validates them, derives their gate and trust
//! states, and keeps the listing in sync with what the service acknowledged.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod structs;
pub mod utils;
pub mod views;

pub use error::{PresenterError, ValidationError};
pub use handlers::link_handlers::{FormState, Presenter, Submission};
pub use models::link::{GateState, ShortLinkRecord, TrustState};
pub use models::listing::{LinkRow, Listing};
pub use services::link_service::{Credentials, HttpLinkService, LinkService};
