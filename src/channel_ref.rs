#![forbid(unsafe_code)]

//! Classifies the channel references users paste on the command line.
//!
//! Accepted shapes: `/channel/<id>` URLs, legacy `/user/<name>` URLs,
//! `/c/<name>` custom URLs, `@handle` URLs or bare handles, and anything
//! else whose last path segment can be searched as a name.

use std::fmt;

/// Stable channel identifier assigned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a reference points at, ordered from most to least specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLocator {
    /// Literal identifier, usable without a lookup.
    Id(ChannelId),
    /// Legacy `/user/<name>` segment.
    Username(String),
    /// `@handle`, with the `@` already stripped.
    Handle(String),
    /// `/c/<name>` custom URL segment.
    CustomName(String),
    /// Trailing path segment treated as free text.
    Name(String),
}

impl ChannelLocator {
    /// Returns `None` when the reference holds nothing searchable.
    pub fn parse(reference: &str) -> Option<Self> {
        let path = strip_scheme_and_host(strip_query_and_fragment(reference.trim()));
        let segments: Vec<&str> = path
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        if let Some(id) = segment_after(&segments, "channel") {
            return Some(ChannelLocator::Id(ChannelId::new(id)));
        }
        if let Some(name) = segment_after(&segments, "user") {
            return Some(ChannelLocator::Username(name.to_string()));
        }
        if let Some(handle) = segments
            .iter()
            .filter_map(|segment| segment.strip_prefix('@'))
            .find(|handle| !handle.is_empty())
        {
            return Some(ChannelLocator::Handle(handle.to_string()));
        }
        if let Some(name) = segment_after(&segments, "c") {
            return Some(ChannelLocator::CustomName(name.to_string()));
        }

        segments
            .last()
            .map(|segment| ChannelLocator::Name(segment.to_string()))
    }

    /// Text to send to the channel name-search, if this locator needs one.
    pub fn search_term(&self) -> Option<&str> {
        match self {
            ChannelLocator::Id(_) => None,
            ChannelLocator::Username(value)
            | ChannelLocator::Handle(value)
            | ChannelLocator::CustomName(value)
            | ChannelLocator::Name(value) => Some(value),
        }
    }
}

fn strip_query_and_fragment(reference: &str) -> &str {
    let without_fragment = reference
        .split_once('#')
        .map_or(reference, |(base, _)| base);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(base, _)| base)
}

fn strip_scheme_and_host(reference: &str) -> &str {
    match reference.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => reference,
    }
}

fn segment_after<'a>(segments: &[&'a str], marker: &str) -> Option<&'a str> {
    segments
        .windows(2)
        .find(|pair| pair[0].eq_ignore_ascii_case(marker))
        .map(|pair| pair[1])
}
