#![forbid(unsafe_code)]

//! The seam between discovery logic and whatever serves channel and video
//! metadata. `YouTubeDataApi` is the production implementation; tests script
//! their own.

use chrono::{DateTime, Utc};

use crate::channel_ref::ChannelId;
use crate::error::CatalogError;

/// Public profile of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProfile {
    pub id: ChannelId,
    pub title: String,
}

/// Parameters of one page of the channel upload search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSearch<'a> {
    pub channel_id: &'a ChannelId,
    /// Inclusive lower bound, enforced by the service.
    pub published_after: DateTime<Utc>,
    pub page_size: u32,
    pub page_token: Option<&'a str>,
}

/// Video ids of one search page plus the cursor for the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSearchPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Snippet, statistics and content details of a single video.
///
/// Counts the service omits are stored as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetailRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO 8601 duration exactly as received, e.g. `PT1M30S`.
    pub duration: String,
}

/// Read-only queries the discovery logic needs from a video catalog.
///
/// Every call blocks until the service answers. Implementations report any
/// rejected or failed request as [`CatalogError::Upstream`] and never retry.
pub trait CatalogService {
    /// Profile for a known id, `None` when the service has no such channel.
    fn channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelProfile>, CatalogError>;

    /// Legacy username lookup.
    fn channel_for_username(&self, username: &str) -> Result<Option<ChannelId>, CatalogError>;

    /// Best-effort name search returning the first matching channel.
    fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, CatalogError>;

    /// One page of a channel's uploads, newest first.
    fn search_videos(&self, search: &VideoSearch<'_>) -> Result<VideoSearchPage, CatalogError>;

    /// Details for a batch of ids in a single request.
    fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetailRecord>, CatalogError>;
}
