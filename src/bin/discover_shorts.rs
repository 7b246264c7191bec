#![forbid(unsafe_code)]

//! Command-line front end for shorts discovery.
//!
//! Resolves a channel, lists every short it published since the cutoff date
//! and optionally writes the list as a JSON manifest the download stage can
//! pick up. Missing arguments are asked for interactively.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use serde::Serialize;
use shorts_curator::VideoCandidate;
use shorts_curator::config::{CuratorSettings, SettingsOverrides, resolve_settings};
use shorts_curator::discovery::{CatalogClient, parse_cutoff};
use shorts_curator::duration::format_duration;
use shorts_curator::logging::init_logger;
use shorts_curator::youtube::YouTubeDataApi;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "discover_shorts",
    version,
    about = "List the shorts a channel published since a date"
)]
struct DiscoverArgs {
    /// Channel URL, @handle, or name. Prompted for when omitted.
    channel_url: Option<String>,
    /// Oldest publish date to include, as YYYY-MM-DD. Prompted for when omitted.
    cutoff_date: Option<String>,
    /// Settings file read after the process environment.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,
    /// Pause between result pages.
    #[arg(long, value_name = "SECONDS")]
    delay_secs: Option<f64>,
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=50))]
    page_size: Option<u32>,
    /// Write the discovered shorts to this JSON file.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(long)]
    debug: bool,
    /// Append log records to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl DiscoverArgs {
    fn overrides(&self) -> Result<SettingsOverrides> {
        let request_delay = match self.delay_secs {
            Some(secs) => Some(
                Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid --delay-secs value {secs}"))?,
            ),
            None => None,
        };
        Ok(SettingsOverrides {
            api_key: self.api_key.clone(),
            api_base_url: self.api_base_url.clone(),
            request_delay,
            page_size: self.page_size,
            debug: self.debug,
            log_file: self.log_file.clone(),
            env_path: self.env_file.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    channel_url: &'a str,
    channel_id: &'a str,
    channel_name: &'a str,
    cutoff_date: NaiveDate,
    /// False when discovery stopped on a failed page.
    complete: bool,
    videos: &'a [VideoCandidate],
}

fn main() -> Result<()> {
    let args = DiscoverArgs::parse();
    let settings = resolve_settings(args.overrides()?)?;
    init_logger(&settings)?;

    let (channel_url, cutoff) = {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        print_header(&mut stdout, &settings)?;
        resolve_target(
            &mut stdin.lock(),
            &mut stdout,
            args.channel_url.clone(),
            args.cutoff_date.clone(),
        )?
    };

    println!("Channel: {channel_url}");
    println!("Since: {cutoff}");
    println!();

    let client = CatalogClient::from_settings(YouTubeDataApi::from_settings(&settings), &settings);
    let channel_id = client
        .resolve_channel(&channel_url)
        .with_context(|| format!("resolving channel {channel_url}"))?;

    println!("Searching for shorts...");
    let (shorts, failure) = match client.fetch_shorts_since(&channel_id, cutoff) {
        Ok(shorts) => (shorts, None),
        Err(interrupted) => {
            let (collected, source) = interrupted.into_parts();
            (collected, Some(source))
        }
    };

    let channel_name = client.resolve_channel_display_name_for(&channel_url, &channel_id);
    info!("Channel name: {channel_name}");

    println!();
    if shorts.is_empty() {
        println!("No shorts found for {channel_name} since {cutoff}");
    } else {
        println!("Found {} short(s) from {channel_name}:", shorts.len());
        println!();
        print_shorts(&shorts);
    }

    if let Some(path) = &args.output {
        let manifest = Manifest {
            channel_url: &channel_url,
            channel_id: channel_id.as_str(),
            channel_name: &channel_name,
            cutoff_date: cutoff,
            complete: failure.is_none(),
            videos: &shorts,
        };
        write_manifest(path, &manifest)?;
        println!("Manifest: {}", path.display());
    }

    if let Some(source) = failure {
        return Err(anyhow::Error::new(source)
            .context("discovery stopped early; the list above is incomplete"));
    }

    Ok(())
}

fn print_header(output: &mut impl Write, settings: &CuratorSettings) -> io::Result<()> {
    writeln!(output, "===================================")?;
    writeln!(output, "YouTube Shorts Discovery")?;
    writeln!(output, "===================================")?;
    writeln!(output, "{}", settings.summary())?;
    writeln!(output)
}

/// Fills in whatever the command line left out by asking on `output` and
/// reading answers from `input`. A cutoff given as an argument must already be
/// valid; prompted values are asked for again until they are.
fn resolve_target(
    input: &mut impl BufRead,
    output: &mut impl Write,
    channel_url: Option<String>,
    cutoff_date: Option<String>,
) -> Result<(String, NaiveDate)> {
    let channel_url = match channel_url.filter(|value| !value.trim().is_empty()) {
        Some(value) => value.trim().to_string(),
        None => loop {
            let answer = prompt(input, output, "YouTube channel URL: ")?;
            if !answer.is_empty() {
                break answer;
            }
            writeln!(output, "Please enter a channel URL.")?;
        },
    };

    let cutoff = match cutoff_date {
        Some(value) => parse_cutoff(&value)?,
        None => loop {
            let answer = prompt(input, output, "Cutoff date (YYYY-MM-DD): ")?;
            match parse_cutoff(&answer) {
                Ok(date) => break date,
                Err(_) => writeln!(output, "Please use the YYYY-MM-DD format, e.g. 2024-01-01.")?,
            }
        },
    };

    Ok((channel_url, cutoff))
}

fn prompt(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before all arguments were provided");
    }
    Ok(line.trim().to_string())
}

fn print_shorts(shorts: &[VideoCandidate]) {
    let total = shorts.len();
    for (index, short) in shorts.iter().enumerate() {
        println!(
            "  [{}/{}] {} ({})",
            index + 1,
            total,
            short.title,
            format_duration(short.duration_seconds)
        );
        println!(
            "        {} views | {} likes | {} comments | {}",
            short.view_count,
            short.like_count,
            short.comment_count,
            short.published_at.format("%Y-%m-%d %H:%M UTC")
        );
        println!("        {}", short.url);
    }
}

/// Writes through a temporary sibling and renames it into place so readers
/// never see a half-written manifest.
fn write_manifest(path: &Path, manifest: &Manifest<'_>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let payload = serde_json::to_vec_pretty(manifest).context("serializing manifest")?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, payload).with_context(|| format!("writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}
