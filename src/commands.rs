//! CLI Command Handlers
//!
//! Each handler takes its parsed args, the merged config and the Output,
//! and returns an ExitCode. Loading helpers shared with the interactive
//! front-end live here too.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::api::{ResolveError, StreamResolver};
use crate::app::Services;
use crate::catalog::{playlist, ChannelCatalog, EpgProvider, MemoryCatalog, MemoryEpg, MemoryFavorites};
use crate::cli::{ChannelsCmd, ExitCode, GuideCmd, Output, ResolveCmd, ResolveResponse};
use crate::config::Config;
use crate::models::ChannelFilter;
use crate::stream::{LoggingBoost, PlayerType, ProcessPipelineFactory};

// =============================================================================
// Loading
// =============================================================================

/// Load the configured playlist into a catalog
pub fn load_catalog(config: &Config) -> Result<MemoryCatalog> {
    let path = config
        .playlist
        .as_ref()
        .ok_or_else(|| anyhow!("No playlist configured. Pass --playlist or set `playlist` in the config file."))?;
    let channels = playlist::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(MemoryCatalog::new(channels, config.show_adult))
}

/// Load the configured EPG file, or an empty guide when none is set
pub fn load_epg(config: &Config) -> Result<MemoryEpg> {
    match &config.epg {
        Some(path) => MemoryEpg::load_file(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(MemoryEpg::default()),
    }
}

/// Player named in the config, mpv when unset or unknown
pub fn player_type(config: &Config) -> PlayerType {
    match config.player.as_deref() {
        None => PlayerType::default(),
        Some(name) => PlayerType::from_name(name).unwrap_or_else(|| {
            warn!("unknown player '{}', using {}", name, PlayerType::default());
            PlayerType::default()
        }),
    }
}

/// Wire up the collaborators for the interactive front-end
pub fn build_services(config: &Config) -> Result<Services> {
    Ok(Services {
        catalog: Box::new(load_catalog(config)?),
        favorites: Box::new(MemoryFavorites::with_ids(config.favorites.iter().cloned())),
        epg: Box::new(load_epg(config)?),
        pipelines: Rc::new(ProcessPipelineFactory::new(player_type(config))),
        boost: Rc::new(LoggingBoost::new()),
    })
}

// =============================================================================
// Channels Command
// =============================================================================

pub fn channels_cmd(cmd: ChannelsCmd, config: &Config, output: &Output) -> ExitCode {
    let catalog = match load_catalog(config) {
        Ok(catalog) => catalog,
        Err(e) if config.playlist.is_none() => return output.error(e.to_string(), ExitCode::InvalidArgs),
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
    };
    let favorites = MemoryFavorites::with_ids(config.favorites.iter().cloned());

    let filter = if cmd.favorites {
        ChannelFilter::Favorites
    } else if let Some(category) = cmd.category {
        match catalog
            .categories()
            .into_iter()
            .find(|c| c.eq_ignore_ascii_case(&category))
        {
            Some(name) => ChannelFilter::Category(name),
            None => return output.error(format!("No category named '{}'", category), ExitCode::NotFound),
        }
    } else {
        ChannelFilter::All
    };

    output.info(format!("Channels: {}", filter));
    let mut channels = catalog.list_by_filter(&filter, &favorites);
    if let Some(limit) = cmd.limit {
        channels.truncate(limit);
    }

    if let Err(e) = output.print_list(&channels) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Resolve Command
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, config: &Config, output: &Output) -> ExitCode {
    let resolver = match StreamResolver::with_timeout(config.user_agent(), Duration::from_secs(cmd.timeout)) {
        Ok(resolver) => resolver,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    let passthrough = StreamResolver::is_passthrough(&cmd.url);

    output.info(format!("Resolving: {}", cmd.url));
    match resolver.resolve(&cmd.url).await {
        Ok(resolved) => {
            let response = ResolveResponse {
                url: cmd.url,
                resolved,
                passthrough,
            };
            if let Err(e) = output.print(response) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e @ ResolveError::InvalidUrl(_)) => output.error(e.to_string(), ExitCode::InvalidArgs),
        Err(e) => output.error(format!("Resolve failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Guide Command
// =============================================================================

pub fn guide_cmd(cmd: GuideCmd, config: &Config, output: &Output) -> ExitCode {
    let catalog = match load_catalog(config) {
        Ok(catalog) => catalog,
        Err(e) if config.playlist.is_none() => return output.error(e.to_string(), ExitCode::InvalidArgs),
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
    };
    let mut epg = match load_epg(config) {
        Ok(epg) => epg,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
    };

    // Accept a channel id or a channel number
    let favorites = MemoryFavorites::new();
    let channel = catalog
        .list_by_filter(&ChannelFilter::All, &favorites)
        .into_iter()
        .find(|c| c.id == cmd.channel)
        .or_else(|| cmd.channel.parse().ok().and_then(|n| catalog.by_number(n)));
    let Some(channel) = channel else {
        return output.error(format!("No channel '{}'", cmd.channel), ExitCode::NotFound);
    };

    epg.load_channel_epg(&channel.id);
    let programs = epg.upcoming_programs(&channel.id, Utc::now(), cmd.limit);
    output.info(format!("{} ({} programs)", channel.name, programs.len()));

    if let Err(e) = output.print_list(&programs) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_from_config() {
        let mut config = Config::default();
        assert_eq!(player_type(&config), PlayerType::Mpv);
        config.player = Some("VLC".into());
        assert_eq!(player_type(&config), PlayerType::Vlc);
        config.player = Some("winamp".into());
        assert_eq!(player_type(&config), PlayerType::Mpv);
    }

    #[test]
    fn test_missing_playlist_is_error() {
        let err = load_catalog(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No playlist configured"));
    }

    #[test]
    fn test_no_epg_is_empty_guide() {
        let epg = load_epg(&Config::default()).unwrap();
        assert!(!epg.is_loaded("anything"));
    }
}
