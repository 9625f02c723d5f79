//! CLI - Command Line Interface for zaptv
//!
//! Every subcommand works against the same playlist / EPG / config as the
//! interactive front-end. Output is JSON when asked for or when stdout is not
//! a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Launch the remote-control front-end
//! zaptv --playlist ~/tv/channels.m3u
//!
//! # Scripting
//! zaptv channels --category Sports --json
//! zaptv resolve http://provider.example/live/user/pass/101
//! zaptv guide news-1 --limit 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;
use crate::stream::PlayerType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit status of a subcommand, stable for shell scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Error,
    InvalidArgs,
    NetworkError,
    /// No such channel, category or program
    NotFound,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Error => 1,
            ExitCode::InvalidArgs => 2,
            ExitCode::NetworkError => 3,
            ExitCode::NotFound => 4,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.code()
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// zaptv - remote-control IPTV front-end
///
/// Run without a subcommand to launch the interactive front-end.
#[derive(Parser, Debug)]
#[command(
    name = "zaptv",
    version,
    author = "Gorka & Hermes",
    about = "Remote-control navigation and live-channel switching for IPTV",
    long_about = "Browse an IPTV playlist with a D-pad, zap between live channels \
                  and peek at the program guide without leaving the stream.\n\n\
                  Run without arguments to launch the interactive front-end.\n\
                  Use subcommands for scripting.",
    after_help = "EXAMPLES:\n\
                  zaptv                                  Launch interactive front-end\n\
                  zaptv channels --favorites             List favorite channels\n\
                  zaptv resolve <url>                    Follow stream redirects\n\
                  zaptv guide news-1 --json              Program guide for a channel"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Playlist file (M3U or JSON), overrides config
    #[arg(long, short = 'p', global = true)]
    pub playlist: Option<PathBuf>,

    /// EPG schedule file (JSON), overrides config
    #[arg(long, short = 'e', global = true)]
    pub epg: Option<PathBuf>,

    /// Video player, overrides config
    #[arg(long, global = true, value_enum)]
    pub player: Option<PlayerChoice>,

    /// Subcommand to run (omit for interactive mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Load the config file and apply command-line overrides
    pub fn load_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        if let Some(playlist) = &self.playlist {
            config.playlist = Some(playlist.clone());
        }
        if let Some(epg) = &self.epg {
            config.epg = Some(epg.clone());
        }
        if let Some(player) = self.player {
            config.player = Some(player.player_type().display_name().to_string());
        }
        config
    }
}

/// Video player selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// VLC media player
    Vlc,
}

impl PlayerChoice {
    pub fn player_type(&self) -> PlayerType {
        match self {
            PlayerChoice::Mpv => PlayerType::Mpv,
            PlayerChoice::Vlc => PlayerType::Vlc,
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List channels from the playlist
    #[command(visible_alias = "ls")]
    Channels(ChannelsCmd),

    /// Follow redirects for a stream URL
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Show current and upcoming programs for a channel
    #[command(visible_alias = "g")]
    Guide(GuideCmd),
}

/// List the channels of one filter
#[derive(Args, Debug)]
pub struct ChannelsCmd {
    /// Only channels in this category
    #[arg(long, short = 'C', conflicts_with = "favorites")]
    pub category: Option<String>,

    /// Only favorite channels
    #[arg(long, short = 'f')]
    pub favorites: bool,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Resolve a stream URL the way the player does before tuning
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Stream URL
    #[arg(required = true)]
    pub url: String,

    /// Request timeout in seconds
    #[arg(long, short = 't', default_value = "10")]
    pub timeout: u64,
}

/// Program guide for one channel
#[derive(Args, Debug)]
pub struct GuideCmd {
    /// Channel id (or channel number)
    #[arg(required = true)]
    pub channel: String,

    /// Maximum number of programs
    #[arg(long, short = 'l', default_value = "8")]
    pub limit: usize,
}

// =============================================================================
// Output
// =============================================================================

/// Envelope every JSON response is wrapped in
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub code: i32,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            code: ExitCode::Success.code(),
        }
    }
}

impl Envelope<()> {
    pub fn failed(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
            code: code.code(),
        }
    }
}

/// Result of `zaptv resolve`
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub url: String,
    pub resolved: String,
    /// Segmented / transport-stream URL handed over untouched
    pub passthrough: bool,
}

impl Display for ResolveResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.resolved)
    }
}

/// Where subcommand results and diagnostics go: stdout for data,
/// stderr for everything else
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// One value: JSON envelope or its `Display` form
    pub fn print<T: Serialize + Display>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&Envelope::ok(data))?);
        } else {
            println!("{data}");
        }
        Ok(())
    }

    /// A list: one JSON array, or a line per item
    pub fn print_list<T: Serialize + Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&Envelope::ok(items))?);
        } else {
            items.iter().for_each(|item| println!("{item}"));
        }
        Ok(())
    }

    /// Report a failure on stderr and hand back its exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let envelope = Envelope::failed(msg, code);
        if self.json {
            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => eprintln!("{json}"),
                Err(e) => tracing::warn!("could not encode error: {}", e),
            }
        } else if !self.quiet {
            eprintln!("Error: {}", envelope.error.unwrap_or_default());
        }
        code
    }

    /// Progress chatter for humans; silent for --quiet and JSON
    pub fn info(&self, msg: impl Display) {
        if self.quiet || self.json {
            return;
        }
        eprintln!("{msg}");
    }
}

// =============================================================================
// Tests
// =============================================================================
