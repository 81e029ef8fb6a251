//! SerpApi-backed ad source: search plans, the HTTP client and the
//! per-platform normalizers that turn listings into [`adlens_core::RawAd`].

pub mod client;
pub mod error;
pub mod normalize;
pub mod plan;
pub(crate) mod retry;
pub mod types;

pub use client::{FetchFailure, FetchOutcome, SerpApiClient};
pub use error::SourceError;
pub use normalize::normalize;
pub use plan::{PlatformSearch, SearchKind, SearchPlan};
pub use types::SearchResponse;
