#![forbid(unsafe_code)]

//! Discovers the short-form uploads a channel published since a cutoff date.
//!
//! The entry point is [`discovery::CatalogClient`], which resolves a channel
//! reference, pages through the catalog and keeps the videos that classify
//! as shorts. [`youtube::YouTubeDataApi`] is the production catalog.

pub mod candidate;
pub mod catalog;
pub mod channel_ref;
pub mod config;
pub mod discovery;
pub mod duration;
pub mod error;
pub mod logging;
pub mod youtube;

pub use candidate::{DownloadJob, VideoCandidate};
pub use catalog::CatalogService;
pub use channel_ref::ChannelId;
pub use discovery::{CatalogClient, UNKNOWN_CHANNEL};
pub use error::{CatalogError, DiscoveryInterrupted};
