//! Feed ingestion

pub mod fetcher;
pub mod normalize;

pub use fetcher::FeedFetcher;
pub use normalize::{NO_TITLE, parse_feed};
