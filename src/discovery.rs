#![forbid(unsafe_code)]

//! Channel resolution and paginated shorts discovery.
//!
//! [`CatalogClient`] is built once per run around a [`CatalogService`] and
//! holds no state between calls: every `fetch_shorts_since` re-queries from
//! the first page, and nothing is cached.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::{debug, info, warn};

use crate::candidate::VideoCandidate;
use crate::catalog::{CatalogService, VideoSearch};
use crate::channel_ref::{ChannelId, ChannelLocator};
use crate::config::{CuratorSettings, DEFAULT_REQUEST_DELAY, MAX_PAGE_SIZE};
use crate::duration::is_short_form;
use crate::error::{CatalogError, DiscoveryInterrupted};

/// Display name used when a channel title cannot be looked up.
pub const UNKNOWN_CHANNEL: &str = "UnknownChannel";

/// Blocks between result pages. Swapped out in tests to observe the pacing.
pub trait Pacer {
    fn pause(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Parses a `YYYY-MM-DD` cutoff.
pub fn parse_cutoff(text: &str) -> Result<NaiveDate, CatalogError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| CatalogError::InvalidCutoff(text.to_string()))
}

/// Inclusive lower bound for a cutoff date: midnight UTC.
pub fn cutoff_instant(cutoff: NaiveDate) -> DateTime<Utc> {
    cutoff.and_time(NaiveTime::MIN).and_utc()
}

pub struct CatalogClient<S, P = ThreadSleep> {
    service: S,
    pacer: P,
    request_delay: Duration,
    page_size: u32,
}

impl<S: CatalogService> CatalogClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            pacer: ThreadSleep,
            request_delay: DEFAULT_REQUEST_DELAY,
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn from_settings(service: S, settings: &CuratorSettings) -> Self {
        Self::new(service)
            .with_request_delay(settings.request_delay)
            .with_page_size(settings.page_size)
    }
}

impl<S: CatalogService, P: Pacer> CatalogClient<S, P> {
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Clamped to what the service accepts per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> CatalogClient<S, Q> {
        CatalogClient {
            service: self.service,
            pacer,
            request_delay: self.request_delay,
            page_size: self.page_size,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Resolves a channel URL or handle to its identifier.
    ///
    /// A literal `/channel/<id>` segment is returned without any request.
    /// Every other shape goes through the service; name-search takes the first
    /// hit, so common names can resolve to the wrong channel.
    pub fn resolve_channel(&self, reference: &str) -> Result<ChannelId, CatalogError> {
        let locator =
            ChannelLocator::parse(reference).ok_or_else(|| CatalogError::not_found(reference))?;
        debug!("Resolving {reference:?} as {locator:?}");

        let resolved = match &locator {
            ChannelLocator::Id(id) => return Ok(id.clone()),
            ChannelLocator::Username(username) => {
                match self.service.channel_for_username(username)? {
                    Some(id) => Some(id),
                    None => self.service.search_channel(username)?,
                }
            }
            ChannelLocator::Handle(name)
            | ChannelLocator::CustomName(name)
            | ChannelLocator::Name(name) => self.service.search_channel(name)?,
        };

        match resolved {
            Some(id) => {
                info!("Resolved {reference:?} to channel {id}");
                Ok(id)
            }
            None => Err(CatalogError::not_found(reference)),
        }
    }

    /// Collects every short the channel published on or after `cutoff`, in
    /// the order the catalog returns them (newest first).
    ///
    /// Pages are requested sequentially with one batched detail lookup each,
    /// pausing for the configured delay between pages. A failing request ends
    /// the run; the candidates gathered before it travel inside the error.
    pub fn fetch_shorts_since(
        &self,
        channel_id: &ChannelId,
        cutoff: NaiveDate,
    ) -> Result<Vec<VideoCandidate>, DiscoveryInterrupted> {
        let published_after = cutoff_instant(cutoff);
        info!("Searching channel {channel_id} for shorts published since {cutoff}");

        let mut shorts = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            if page_number > 0 {
                self.pacer.pause(self.request_delay);
            }
            page_number += 1;

            let search = VideoSearch {
                channel_id,
                published_after,
                page_size: self.page_size,
                page_token: page_token.as_deref(),
            };
            let page = match self.service.search_videos(&search) {
                Ok(page) => page,
                Err(source) => return Err(interrupted(shorts, source)),
            };
            if page.video_ids.is_empty() {
                debug!("Page {page_number} is empty, stopping");
                break;
            }
            debug!(
                "Page {page_number}: {} video id(s), next token {:?}",
                page.video_ids.len(),
                page.next_page_token
            );

            let details = match self.service.video_details(&page.video_ids) {
                Ok(details) => details,
                Err(source) => return Err(interrupted(shorts, source)),
            };
            for record in details {
                if !is_short_form(&record) {
                    continue;
                }
                let candidate = VideoCandidate::from_record(record);
                info!(
                    "Found short: {} ({}s)",
                    candidate.title, candidate.duration_seconds
                );
                shorts.push(candidate);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Found {} short(s) across {page_number} page(s)", shorts.len());
        Ok(shorts)
    }

    /// Channel title for folder names and console output.
    ///
    /// Never fails: any resolution or lookup problem is logged and the
    /// [`UNKNOWN_CHANNEL`] sentinel is returned instead.
    pub fn resolve_channel_display_name(&self, reference: &str) -> String {
        self.display_name(reference, self.resolve_channel(reference))
    }

    /// Display name for a reference discovery already ran against. The
    /// reference is resolved again; when it now lands on a channel other than
    /// `discovered` a warning is logged and the new channel's title is used.
    pub fn resolve_channel_display_name_for(
        &self,
        reference: &str,
        discovered: &ChannelId,
    ) -> String {
        let resolved = self.resolve_channel(reference);
        if let Ok(id) = &resolved
            && id != discovered
        {
            warn!("{reference:?} now resolves to channel {id} instead of {discovered}");
        }
        self.display_name(reference, resolved)
    }

    fn display_name(&self, reference: &str, resolved: Result<ChannelId, CatalogError>) -> String {
        let profile = resolved.and_then(|id| self.service.channel_profile(&id));
        match profile {
            Ok(Some(profile)) if !profile.title.trim().is_empty() => profile.title,
            Ok(_) => {
                warn!("Channel {reference:?} has no profile title, using {UNKNOWN_CHANNEL}");
                UNKNOWN_CHANNEL.to_string()
            }
            Err(err) => {
                warn!("Could not look up channel name for {reference:?}: {err}");
                UNKNOWN_CHANNEL.to_string()
            }
        }
    }
}

fn interrupted(collected: Vec<VideoCandidate>, source: CatalogError) -> DiscoveryInterrupted {
    warn!(
        "Discovery stopped after {} short(s): {source}",
        collected.len()
    );
    DiscoveryInterrupted { collected, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ChannelProfile, VideoDetailRecord, VideoSearchPage};
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Profile(String),
        Username(String),
        SearchChannel(String),
        SearchVideos {
            published_after: DateTime<Utc>,
            page_size: u32,
            page_token: Option<String>,
        },
        Details(Vec<String>),
    }

    /// One scripted search page: ids, durations for the detail lookup, and the
    /// continuation token to hand back.
    struct ScriptedPage {
        videos: Vec<(&'static str, &'static str)>,
        next_page_token: Option<&'static str>,
    }

    #[derive(Default)]
    struct FakeCatalog {
        calls: RefCell<Vec<Call>>,
        usernames: HashMap<String, String>,
        channel_names: HashMap<String, String>,
        profiles: HashMap<String, String>,
        pages: Vec<ScriptedPage>,
        fail_search_on_page: Option<usize>,
        fail_details_on_page: Option<usize>,
        fail_profiles: bool,
        fail_channel_lookups: bool,
    }

    impl FakeCatalog {
        fn with_pages(pages: Vec<ScriptedPage>) -> Self {
            Self {
                pages,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| predicate(*call))
                .count()
        }

        fn quota_error(endpoint: &str) -> CatalogError {
            CatalogError::upstream(endpoint, Some(403), "quotaExceeded")
        }

        /// The scripted page a continuation token points at. Tokens are
        /// stable, so the same token always yields the same page.
        fn page_for_token(&self, token: Option<&str>) -> Option<usize> {
            match token {
                None => Some(0),
                Some(token) => self
                    .pages
                    .iter()
                    .position(|page| page.next_page_token == Some(token))
                    .map(|index| index + 1),
            }
        }

        fn page_holding(&self, video_id: &str) -> Option<usize> {
            self.pages
                .iter()
                .position(|page| page.videos.iter().any(|(id, _)| *id == video_id))
        }
    }

    fn record(id: &str, duration: &str) -> VideoDetailRecord {
        VideoDetailRecord {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: String::new(),
            published_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            view_count: 10,
            like_count: 2,
            comment_count: 1,
            duration: duration.to_string(),
        }
    }

    impl CatalogService for FakeCatalog {
        fn channel_profile(
            &self,
            channel_id: &ChannelId,
        ) -> Result<Option<ChannelProfile>, CatalogError> {
            self.calls
                .borrow_mut()
                .push(Call::Profile(channel_id.to_string()));
            if self.fail_profiles {
                return Err(Self::quota_error("channels"));
            }
            Ok(self
                .profiles
                .get(channel_id.as_str())
                .map(|title| ChannelProfile {
                    id: channel_id.clone(),
                    title: title.clone(),
                }))
        }

        fn channel_for_username(
            &self,
            username: &str,
        ) -> Result<Option<ChannelId>, CatalogError> {
            self.calls
                .borrow_mut()
                .push(Call::Username(username.to_string()));
            if self.fail_channel_lookups {
                return Err(Self::quota_error("channels"));
            }
            Ok(self.usernames.get(username).map(ChannelId::new))
        }

        fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, CatalogError> {
            self.calls
                .borrow_mut()
                .push(Call::SearchChannel(query.to_string()));
            if self.fail_channel_lookups {
                return Err(Self::quota_error("search"));
            }
            Ok(self.channel_names.get(query).map(ChannelId::new))
        }

        fn search_videos(
            &self,
            search: &VideoSearch<'_>,
        ) -> Result<VideoSearchPage, CatalogError> {
            self.calls.borrow_mut().push(Call::SearchVideos {
                published_after: search.published_after,
                page_size: search.page_size,
                page_token: search.page_token.map(str::to_string),
            });
            let index = self.page_for_token(search.page_token);
            if index.is_some() && self.fail_search_on_page == index {
                return Err(Self::quota_error("search"));
            }
            Ok(index
                .and_then(|index| self.pages.get(index))
                .map(|page| VideoSearchPage {
                    video_ids: page.videos.iter().map(|(id, _)| id.to_string()).collect(),
                    next_page_token: page.next_page_token.map(str::to_string),
                })
                .unwrap_or_default())
        }

        fn video_details(
            &self,
            video_ids: &[String],
        ) -> Result<Vec<VideoDetailRecord>, CatalogError> {
            self.calls
                .borrow_mut()
                .push(Call::Details(video_ids.to_vec()));
            let page_index = video_ids.first().and_then(|id| self.page_holding(id));
            if page_index.is_some() && self.fail_details_on_page == page_index {
                return Err(Self::quota_error("videos"));
            }
            let durations: HashMap<&str, &str> = self
                .pages
                .iter()
                .flat_map(|page| page.videos.iter().copied())
                .collect();
            Ok(video_ids
                .iter()
                .filter_map(|id| durations.get(id.as_str()).map(|duration| record(id, duration)))
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingPacer {
        pauses: RefCell<Vec<Duration>>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, delay: Duration) {
            self.pauses.borrow_mut().push(delay);
        }
    }

    fn client(catalog: FakeCatalog) -> CatalogClient<FakeCatalog, RecordingPacer> {
        CatalogClient::new(catalog)
            .with_request_delay(Duration::from_millis(1500))
            .with_pacer(RecordingPacer::default())
    }

    fn date(text: &str) -> NaiveDate {
        parse_cutoff(text).unwrap()
    }

    fn three_pages() -> Vec<ScriptedPage> {
        vec![
            ScriptedPage {
                videos: vec![("a", "PT30S"), ("b", "PT10M"), ("c", "PT1M")],
                next_page_token: Some("t1"),
            },
            ScriptedPage {
                videos: vec![("d", "PT1M1S"), ("e", "garbage")],
                next_page_token: Some("t2"),
            },
            ScriptedPage {
                videos: vec![("f", "PT59S")],
                next_page_token: None,
            },
        ]
    }

    fn ids(candidates: &[VideoCandidate]) -> Vec<&str> {
        candidates
            .iter()
            .map(|candidate| candidate.video_id.as_str())
            .collect()
    }

    #[test]
    fn channel_id_urls_resolve_without_requests() {
        let client = client(FakeCatalog::default());
        let id = client
            .resolve_channel("https://www.youtube.com/channel/ABC123")
            .unwrap();
        assert_eq!(id.as_str(), "ABC123");
        assert!(client.service().calls().is_empty());
    }

    #[test]
    fn handles_resolve_through_name_search() {
        let mut catalog = FakeCatalog::default();
        catalog
            .channel_names
            .insert("creator".into(), "UCcreator".into());
        let client = client(catalog);

        let id = client
            .resolve_channel("https://www.youtube.com/@creator")
            .unwrap();
        assert_eq!(id.as_str(), "UCcreator");
        assert_eq!(
            client.service().calls(),
            vec![Call::SearchChannel("creator".into())]
        );
    }

    #[test]
    fn legacy_usernames_try_username_lookup_first() {
        let mut catalog = FakeCatalog::default();
        catalog.usernames.insert("oldname".into(), "UCold".into());
        let client = client(catalog);

        let id = client
            .resolve_channel("https://www.youtube.com/user/oldname")
            .unwrap();
        assert_eq!(id.as_str(), "UCold");
        assert_eq!(
            client.service().calls(),
            vec![Call::Username("oldname".into())]
        );
    }

    #[test]
    fn legacy_usernames_fall_back_to_search() {
        let mut catalog = FakeCatalog::default();
        catalog
            .channel_names
            .insert("oldname".into(), "UCsearched".into());
        let client = client(catalog);

        let id = client
            .resolve_channel("https://www.youtube.com/user/oldname")
            .unwrap();
        assert_eq!(id.as_str(), "UCsearched");
        assert_eq!(
            client.service().calls(),
            vec![
                Call::Username("oldname".into()),
                Call::SearchChannel("oldname".into())
            ]
        );
    }

    #[test]
    fn unmatched_names_are_not_found() {
        let client = client(FakeCatalog::default());
        let err = client
            .resolve_channel("https://example.com/nobody")
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            client.service().calls(),
            vec![Call::SearchChannel("nobody".into())]
        );
    }

    #[test]
    fn channel_lookup_failures_propagate_as_upstream() {
        let mut catalog = FakeCatalog::default();
        catalog
            .channel_names
            .insert("someone".into(), "UCsomeone".into());
        catalog.fail_channel_lookups = true;
        let client = client(catalog);

        let err = client.resolve_channel("@someone").unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(
            err,
            CatalogError::Upstream { status: Some(403), .. }
        ));
        assert_eq!(
            client.service().calls(),
            vec![Call::SearchChannel("someone".into())]
        );
        assert_eq!(
            client.resolve_channel_display_name("@someone"),
            UNKNOWN_CHANNEL
        );
    }

    #[test]
    fn username_lookup_failure_skips_name_search() {
        let mut catalog = FakeCatalog::default();
        catalog.usernames.insert("oldname".into(), "UCold".into());
        catalog
            .channel_names
            .insert("oldname".into(), "UCsearched".into());
        catalog.fail_channel_lookups = true;
        let client = client(catalog);

        let err = client
            .resolve_channel("https://www.youtube.com/user/oldname")
            .unwrap_err();
        assert!(matches!(err, CatalogError::Upstream { .. }));
        assert_eq!(
            client.service().calls(),
            vec![Call::Username("oldname".into())]
        );
    }

    #[test]
    fn blank_references_are_not_found_without_requests() {
        let client = client(FakeCatalog::default());
        assert!(client.resolve_channel("   ").unwrap_err().is_not_found());
        assert!(client.service().calls().is_empty());
    }

    #[test]
    fn fetch_paginates_until_token_runs_out() {
        let client = client(FakeCatalog::with_pages(three_pages()));
        let shorts = client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap();

        assert_eq!(ids(&shorts), vec!["a", "c", "e", "f"]);
        let catalog = client.service();
        assert_eq!(
            catalog.count(|call| matches!(call, Call::SearchVideos { .. })),
            3
        );
        assert_eq!(catalog.count(|call| matches!(call, Call::Details(_))), 3);
        assert_eq!(
            *client.pacer().pauses.borrow(),
            vec![Duration::from_millis(1500); 2]
        );
    }

    #[test]
    fn fetch_interleaves_search_and_detail_calls() {
        let client = client(FakeCatalog::with_pages(three_pages()));
        client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap();

        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let search = |token: Option<&str>| Call::SearchVideos {
            published_after: instant,
            page_size: MAX_PAGE_SIZE,
            page_token: token.map(str::to_string),
        };
        fn details(ids: &[&str]) -> Call {
            Call::Details(ids.iter().map(|id| id.to_string()).collect())
        }
        assert_eq!(
            client.service().calls(),
            vec![
                search(None),
                details(&["a", "b", "c"]),
                search(Some("t1")),
                details(&["d", "e"]),
                search(Some("t2")),
                details(&["f"]),
            ]
        );
    }

    #[test]
    fn empty_first_page_returns_empty_result() {
        let client = client(FakeCatalog::default());
        let shorts = client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap();

        assert!(shorts.is_empty());
        assert_eq!(client.service().calls().len(), 1);
        assert!(client.pacer().pauses.borrow().is_empty());
    }

    #[test]
    fn empty_page_stops_even_with_token() {
        let client = client(FakeCatalog::with_pages(vec![
            ScriptedPage {
                videos: vec![("a", "PT20S")],
                next_page_token: Some("t1"),
            },
            ScriptedPage {
                videos: vec![],
                next_page_token: Some("t2"),
            },
        ]));
        let shorts = client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap();

        assert_eq!(ids(&shorts), vec!["a"]);
        assert_eq!(
            client
                .service()
                .count(|call| matches!(call, Call::SearchVideos { .. })),
            2
        );
        assert_eq!(
            client.service().count(|call| matches!(call, Call::Details(_))),
            1
        );
    }

    #[test]
    fn search_failure_keeps_earlier_pages() {
        let mut catalog = FakeCatalog::with_pages(three_pages());
        catalog.fail_search_on_page = Some(1);
        let client = client(catalog);

        let err = client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap_err();
        assert_eq!(ids(&err.collected), vec!["a", "c"]);
        assert!(matches!(
            err.source,
            CatalogError::Upstream { status: Some(403), .. }
        ));
        assert_eq!(
            client
                .service()
                .count(|call| matches!(call, Call::SearchVideos { .. })),
            2
        );
    }

    #[test]
    fn detail_failure_aborts_immediately() {
        let mut catalog = FakeCatalog::with_pages(three_pages());
        catalog.fail_details_on_page = Some(0);
        let client = client(catalog);

        let err = client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2024-01-01"))
            .unwrap_err();
        assert!(err.collected.is_empty());
        assert_eq!(client.service().calls().len(), 2);
    }

    #[test]
    fn repeated_fetches_return_identical_results() {
        let client = client(FakeCatalog::with_pages(three_pages()));
        let channel = ChannelId::new("UC1");

        let first = client
            .fetch_shorts_since(&channel, date("2024-01-01"))
            .unwrap();
        let second = client
            .fetch_shorts_since(&channel, date("2024-01-01"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(ids(&second), vec!["a", "c", "e", "f"]);

        let calls = client.service().calls();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[..6], calls[6..]);
        assert_eq!(client.pacer().pauses.borrow().len(), 4);
    }

    #[test]
    fn retry_after_failure_starts_from_first_page() {
        let mut catalog = FakeCatalog::with_pages(three_pages());
        catalog.fail_search_on_page = Some(2);
        let client = client(catalog);
        let channel = ChannelId::new("UC1");

        let first = client
            .fetch_shorts_since(&channel, date("2024-01-01"))
            .unwrap_err();
        let second = client
            .fetch_shorts_since(&channel, date("2024-01-01"))
            .unwrap_err();
        assert_eq!(ids(&first.collected), vec!["a", "c", "e"]);
        assert_eq!(first.collected, second.collected);
    }

    #[test]
    fn every_request_uses_midnight_utc_of_cutoff() {
        let client = client(FakeCatalog::with_pages(three_pages())).with_page_size(500);
        client
            .fetch_shorts_since(&ChannelId::new("UC1"), date("2023-12-31"))
            .unwrap();

        let expected = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        for call in client.service().calls() {
            if let Call::SearchVideos {
                published_after,
                page_size,
                ..
            } = call
            {
                assert_eq!(published_after, expected);
                assert_eq!(page_size, MAX_PAGE_SIZE);
            }
        }
    }

    #[test]
    fn display_name_comes_from_profile() {
        let mut catalog = FakeCatalog::default();
        catalog.profiles.insert("ABC".into(), "Creator Studio".into());
        let client = client(catalog);
        assert_eq!(
            client.resolve_channel_display_name("https://www.youtube.com/channel/ABC"),
            "Creator Studio"
        );
    }

    #[test]
    fn display_name_falls_back_on_any_failure() {
        let empty = client(FakeCatalog::default());
        assert_eq!(
            empty.resolve_channel_display_name("https://www.youtube.com/@missing"),
            UNKNOWN_CHANNEL
        );
        assert_eq!(
            empty.resolve_channel_display_name("https://www.youtube.com/channel/NOPROFILE"),
            UNKNOWN_CHANNEL
        );

        let mut catalog = FakeCatalog::default();
        catalog.profiles.insert("ABC".into(), "Creator Studio".into());
        catalog.fail_profiles = true;
        let failing = client(catalog);
        assert_eq!(
            failing.resolve_channel_display_name("https://www.youtube.com/channel/ABC"),
            UNKNOWN_CHANNEL
        );
    }

    #[test]
    fn display_name_for_discovered_channel_uses_fresh_resolution() {
        let mut catalog = FakeCatalog::default();
        catalog
            .channel_names
            .insert("creator".into(), "UCother".into());
        catalog.profiles.insert("UCother".into(), "Other Creator".into());
        catalog.profiles.insert("UC1".into(), "Creator".into());
        let client = client(catalog);

        assert_eq!(
            client.resolve_channel_display_name_for("@creator", &ChannelId::new("UC1")),
            "Other Creator"
        );
        assert_eq!(
            client.service().calls(),
            vec![
                Call::SearchChannel("creator".into()),
                Call::Profile("UCother".into())
            ]
        );
        assert_eq!(
            client.resolve_channel_display_name_for(
                "https://www.youtube.com/channel/UC1",
                &ChannelId::new("UC1")
            ),
            "Creator"
        );
    }

    #[test]
    fn cutoff_helpers_parse_and_anchor_dates() {
        assert_eq!(
            cutoff_instant(date("2024-02-29")),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_cutoff("2024-13-01"),
            Err(CatalogError::InvalidCutoff(_))
        ));
        assert_eq!(parse_cutoff(" 2024-01-05 ").unwrap(), date("2024-01-05"));
    }

    #[test]
    fn thread_sleep_skips_zero_delay() {
        let started = std::time::Instant::now();
        ThreadSleep.pause(Duration::ZERO);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
