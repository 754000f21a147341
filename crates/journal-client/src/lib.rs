//! # journal-client
//!
//! Client-side state for the trading journal: filter state with a debounced,
//! self-retrying chart feed, multi-image upload accumulation and reordering,
//! the chart form, and a typed HTTP client for the API.

pub mod carousel;
pub mod date_presets;
pub mod feed;
pub mod filter_state;
pub mod form;
pub mod http;
pub mod media;
pub mod upload;

pub use carousel::Carousel;
pub use feed::{ChartSource, FeedController, FeedState};
pub use filter_state::FilterState;
pub use form::{generate_chart_id, parse_tags, ChartApi, ChartForm};
pub use http::JournalClient;
pub use media::validate_image;
pub use upload::{UploadSession, UploadTicket};
