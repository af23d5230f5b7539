// impact-api: Async Rust client for the Impact Index backend API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod profile;
mod ranking;
mod search;
mod sites;

pub use client::ImpactClient;
pub use error::Error;
pub use models::{
    ApiEntity, ApiHistogramBucket, ApiPagination, ApiProfile, ApiProfileStats, ApiSite,
    ApiSiteStats, ApiSuggestion, ApiTopResponse, SearchPayload,
};
pub use transport::{TlsMode, TransportConfig};
