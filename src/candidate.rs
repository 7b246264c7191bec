#![forbid(unsafe_code)]

//! Videos that passed classification, in the shape later pipeline stages
//! consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::VideoDetailRecord;
use crate::duration::parse_duration;

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// A discovered short. Built once from catalog metadata and passed on by
/// value; downstream stages wrap it instead of mutating it.
///
/// `title` is raw catalog text and may hold characters that are not valid in
/// file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String,
    pub duration_seconds: u64,
}

impl VideoCandidate {
    pub fn from_record(record: VideoDetailRecord) -> Self {
        let duration_seconds = parse_duration(&record.duration);
        Self {
            url: watch_url(&record.id),
            video_id: record.id,
            title: record.title,
            published_at: record.published_at,
            view_count: record.view_count,
            like_count: record.like_count,
            comment_count: record.comment_count,
            duration: record.duration,
            duration_seconds,
        }
    }

    /// The `{url, title}` pair a download stage works from.
    pub fn download_job(&self) -> DownloadJob<'_> {
        DownloadJob {
            url: &self.url,
            title: &self.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadJob<'a> {
    pub url: &'a str,
    pub title: &'a str,
}
