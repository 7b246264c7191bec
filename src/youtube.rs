#![forbid(unsafe_code)]

//! Blocking YouTube Data API v3 client backing [`CatalogService`].
//!
//! Only the four list endpoints discovery needs are wrapped: `channels`,
//! `search` (channels and videos) and `videos`. The API key rides along as the
//! `key` query parameter and is never logged.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::catalog::{
    CatalogService, ChannelProfile, VideoDetailRecord, VideoSearch, VideoSearchPage,
};
use crate::channel_ref::ChannelId;
use crate::config::CuratorSettings;
use crate::error::CatalogError;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const VIDEO_DETAIL_PARTS: &str = "snippet,statistics,contentDetails";

pub struct YouTubeDataApi {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl YouTubeDataApi {
    pub fn from_settings(settings: &CuratorSettings) -> Self {
        Self::with_options(
            settings.api_key.clone(),
            &settings.api_base_url,
            settings.request_timeout,
        )
    }

    pub fn with_options(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("shorts-curator/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        debug!("GET {endpoint} {params:?}");
        let mut request = self
            .agent
            .get(&format!("{}/{endpoint}", self.base_url))
            .query("key", &self.api_key);
        for (name, value) in params {
            request = request.query(name, value);
        }

        match request.call() {
            Ok(response) => response.into_json::<T>().map_err(|err| {
                CatalogError::upstream(endpoint, None, format!("undecodable response: {err}"))
            }),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(CatalogError::upstream(
                    endpoint,
                    Some(code),
                    api_error_message(&body),
                ))
            }
            Err(ureq::Error::Transport(transport)) => Err(CatalogError::upstream(
                endpoint,
                None,
                transport.to_string(),
            )),
        }
    }
}

impl CatalogService for YouTubeDataApi {
    fn channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelProfile>, CatalogError> {
        let response: ListResponse<ChannelItem> = self.get_json(
            "channels",
            &[("part", "snippet"), ("id", channel_id.as_str())],
        )?;
        Ok(response.items.into_iter().next().and_then(|item| {
            item.snippet.map(|snippet| ChannelProfile {
                id: ChannelId::new(item.id),
                title: snippet.title,
            })
        }))
    }

    fn channel_for_username(&self, username: &str) -> Result<Option<ChannelId>, CatalogError> {
        let response: ListResponse<ChannelItem> =
            self.get_json("channels", &[("part", "id"), ("forUsername", username)])?;
        Ok(response
            .items
            .into_iter()
            .next()
            .map(|item| ChannelId::new(item.id)))
    }

    fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, CatalogError> {
        let response: ListResponse<SearchItem> = self.get_json(
            "search",
            &[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "1"),
                ("q", query),
            ],
        )?;
        Ok(response
            .items
            .into_iter()
            .find_map(SearchItem::into_channel_id)
            .map(ChannelId::new))
    }

    fn search_videos(&self, search: &VideoSearch<'_>) -> Result<VideoSearchPage, CatalogError> {
        let published_after = search
            .published_after
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let page_size = search.page_size.to_string();
        let mut params = vec![
            ("part", "id"),
            ("channelId", search.channel_id.as_str()),
            ("type", "video"),
            ("order", "date"),
            ("publishedAfter", published_after.as_str()),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = search.page_token {
            params.push(("pageToken", token));
        }

        let response: ListResponse<SearchItem> = self.get_json("search", &params)?;
        Ok(VideoSearchPage {
            video_ids: response
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect(),
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetailRecord>, CatalogError> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = video_ids.join(",");
        let response: ListResponse<VideoItem> = self.get_json(
            "videos",
            &[("part", VIDEO_DETAIL_PARTS), ("id", ids.as_str())],
        )?;
        Ok(response.items.into_iter().map(VideoItem::into_record).collect())
    }
}

/// Pulls `error.message` out of a Data API error body, falling back to the raw
/// text.
fn api_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

impl SearchItem {
    fn into_channel_id(self) -> Option<String> {
        self.snippet
            .and_then(|snippet| snippet.channel_id)
            .or(self.id.channel_id)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
    #[serde(default)]
    content_details: ContentDetails,
}

impl VideoItem {
    fn into_record(self) -> VideoDetailRecord {
        VideoDetailRecord {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            published_at: self.snippet.published_at,
            view_count: self.statistics.view_count,
            like_count: self.statistics.like_count,
            comment_count: self.statistics.comment_count,
            duration: self.content_details.duration,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
}

/// The API sends counts as decimal strings and drops them when hidden.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde(default, deserialize_with = "lenient_count")]
    view_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    like_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    comment_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
        Other(Value),
    }

    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Number(value)) => value,
        Some(RawCount::Text(text)) => text.trim().parse().unwrap_or(0),
        Some(RawCount::Other(_)) | None => 0,
    })
}
