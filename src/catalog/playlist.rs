//! Playlist loading
//!
//! Accepts M3U/M3U8 playlists and JSON channel arrays and normalizes both
//! into `Channel`s: stable ids, ordinal numbers, trimmed categories and the
//! adult flag.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Channel;

/// Category used when the playlist doesn't name one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Markers that flag a channel as adult content
const ADULT_MARKERS: &[&str] = &["ADULTOS", "ADULTO", "XXX", "[HOT]", "[Adulto]"];

/// Playlist loading errors
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Failed to read playlist: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid playlist JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Playlist contains no channels")]
    Empty,
}

/// Channel entry as written in a JSON playlist
#[derive(Debug, Deserialize)]
struct RawChannel {
    id: Option<String>,
    name: String,
    number: Option<u32>,
    category: Option<String>,
    logo: Option<String>,
    url: String,
    adult: Option<bool>,
}

/// Load a playlist file, picking the format from its content
pub fn load(path: &Path) -> Result<Vec<Channel>, PlaylistError> {
    let content = std::fs::read_to_string(path)?;
    let channels = parse(&content)?;
    tracing::info!("loaded {} channels from {}", channels.len(), path.display());
    Ok(channels)
}

/// Parse playlist text (JSON array or M3U)
pub fn parse(content: &str) -> Result<Vec<Channel>, PlaylistError> {
    let channels = if content.trim_start().starts_with('[') {
        parse_json(content)?
    } else {
        parse_m3u(content)
    };
    if channels.is_empty() {
        return Err(PlaylistError::Empty);
    }
    Ok(channels)
}

/// Parse a JSON array of channels
pub fn parse_json(content: &str) -> Result<Vec<Channel>, PlaylistError> {
    let raw: Vec<RawChannel> = serde_json::from_str(content)?;
    Ok(normalize(raw))
}

/// Parse M3U content (`#EXTINF` + URL line pairs)
pub fn parse_m3u(content: &str) -> Vec<Channel> {
    let mut raw = Vec::new();
    let mut pending: Option<RawChannel> = None;

    for line in content.lines() {
        let line = line.trim();

        if let Some(info) = line.strip_prefix("#EXTINF:") {
            let attr = |name: &str| extract_attr(info, name);
            let name = info
                .rfind(',')
                .map(|pos| info[pos + 1..].trim().to_string())
                .unwrap_or_default();
            pending = Some(RawChannel {
                id: attr("tvg-id"),
                name,
                number: attr("tvg-chno").and_then(|n| n.parse().ok()),
                category: attr("group-title"),
                logo: attr("tvg-logo"),
                url: String::new(),
                adult: None,
            });
        } else if !line.is_empty() && !line.starts_with('#') {
            if let Some(mut entry) = pending.take() {
                entry.url = line.to_string();
                if entry.name.is_empty() {
                    entry.name = entry.url.clone();
                }
                raw.push(entry);
            }
        }
    }

    normalize(raw)
}

fn attr_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).ok())
        .as_ref()
}

/// Value of `name="..."` in an EXTINF line, if non-empty
fn extract_attr(info: &str, name: &str) -> Option<String> {
    attr_regex()?
        .captures_iter(info)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .map(|c| c[2].trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True when the name or category carries an adult marker
pub fn is_adult(name: &str, category: &str) -> bool {
    let combined = format!("{} {}", name, category);
    ADULT_MARKERS.iter().any(|m| combined.contains(m))
}

/// Stable id for channels without one
pub fn derive_id(name: &str, url: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{}|{}", name, url).as_bytes()).to_string()
}

/// Lowest unused number from `from` upwards, wrapping to 1 past `u32::MAX`
fn free_number(from: u32, used: &HashSet<u32>) -> u32 {
    (from..=u32::MAX)
        .chain(1..from)
        .find(|n| !used.contains(n))
        .unwrap_or(from)
}

fn normalize(raw: Vec<RawChannel>) -> Vec<Channel> {
    let mut next_number = raw
        .iter()
        .filter_map(|r| r.number)
        .max()
        .map_or(1, |n| n.saturating_add(1));
    let mut used_numbers: HashSet<u32> = HashSet::new();
    let mut used_ids: HashSet<String> = HashSet::new();

    raw.into_iter()
        .map(|r| {
            let category = r
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());

            let mut id = r
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| derive_id(&r.name, &r.url));
            if !used_ids.insert(id.clone()) {
                // Same tvg-id on several feeds
                id = derive_id(&r.name, &r.url);
                used_ids.insert(id.clone());
            }

            let number = match r.number {
                Some(n) if used_numbers.insert(n) => n,
                _ => {
                    next_number = free_number(next_number, &used_numbers);
                    used_numbers.insert(next_number);
                    next_number
                }
            };

            let adult = r.adult.unwrap_or_else(|| is_adult(&r.name, &category));

            Channel {
                id,
                name: r.name,
                number,
                category,
                logo: r.logo.filter(|l| !l.is_empty()),
                url: r.url,
                adult,
            }
        })
        .collect()
}
