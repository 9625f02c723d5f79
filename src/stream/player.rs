//! Process-backed video pipeline
//!
//! Hands the stream to mpv or VLC running as a child process. The process
//! is launched on the first `play()`, so it starts with the volume set
//! beforehand. Pause and resume are delivered as SIGSTOP / SIGCONT on unix;
//! the process exit status is what `status()` reports.
//!
//! Volume changes reach a running mpv through its JSON IPC socket. VLC has
//! no equivalent at launch time, so it is relaunched with the new gain.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::{FormatHint, PipelineError, PipelineFactory, PipelineStatus, VideoPipeline};

/// External player binaries zaptv can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerType {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// VLC media player
    Vlc,
}

impl PlayerType {
    /// Executable to spawn
    pub fn command(&self) -> &'static str {
        const VLC_BUNDLE: &str = "/Applications/VLC.app/Contents/MacOS/VLC";
        match self {
            PlayerType::Mpv => "mpv",
            PlayerType::Vlc if cfg!(target_os = "macos") && std::path::Path::new(VLC_BUNDLE).exists() => {
                VLC_BUNDLE
            }
            PlayerType::Vlc => "vlc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
        }
    }

    /// Parse a config / CLI player name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mpv" => Some(PlayerType::Mpv),
            "vlc" => Some(PlayerType::Vlc),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One player process playing one stream
pub struct ProcessPipeline {
    player_type: PlayerType,
    url: String,
    headers: Vec<(String, String)>,
    volume: f32,
    /// mpv control socket
    ipc_path: Option<PathBuf>,
    child: Option<Child>,
    paused: bool,
    disposed: bool,
}

static NEXT_SOCKET: AtomicU64 = AtomicU64::new(0);

fn ipc_socket_path() -> PathBuf {
    let n = NEXT_SOCKET.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("zaptv-mpv-{}-{}.sock", std::process::id(), n))
}

impl ProcessPipeline {
    /// Prepare a pipeline without launching it
    pub fn new(player_type: PlayerType, url: &str, headers: &[(String, String)]) -> Self {
        let ipc_path = match player_type {
            PlayerType::Mpv => Some(ipc_socket_path()),
            PlayerType::Vlc => None,
        };
        Self {
            player_type,
            url: url.to_string(),
            headers: headers.to_vec(),
            volume: 1.0,
            ipc_path,
            child: None,
            paused: false,
            disposed: false,
        }
    }

    /// Volume the next launch (or the running mpv) uses
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Command-line arguments for the current settings
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![self.url.clone()];
        let user_agent = self
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("user-agent"))
            .map(|(_, v)| v.as_str());
        let volume = (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32;

        match self.player_type {
            PlayerType::Mpv => {
                args.push("--force-window=immediate".into());
                args.push(format!("--volume={}", volume));
                if let Some(path) = &self.ipc_path {
                    args.push(format!("--input-ipc-server={}", path.display()));
                }
                if let Some(ua) = user_agent {
                    args.push(format!("--user-agent={}", ua));
                }
                let extra: Vec<String> = self
                    .headers
                    .iter()
                    .filter(|(k, _)| !k.eq_ignore_ascii_case("user-agent"))
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                if !extra.is_empty() {
                    args.push(format!("--http-header-fields={}", extra.join(",")));
                }
            }
            PlayerType::Vlc => {
                args.push("--no-video-title-show".into());
                args.push(format!("--gain={:.2}", self.volume.clamp(0.0, 1.0)));
                if let Some(ua) = user_agent {
                    args.push(format!("--http-user-agent={}", ua));
                }
            }
        }
        args
    }

    /// Launch the player process
    pub fn spawn(&mut self) -> Result<(), PipelineError> {
        if self.disposed {
            return Err(PipelineError::Disposed);
        }
        let mut cmd = Command::new(self.player_type.command());
        cmd.args(self.build_args());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::NotFound(self.player_type.command().to_string())
            } else {
                PipelineError::StartFailed(e)
            }
        })?;
        debug!("{} started (pid {}) for {}", self.player_type, child.id(), self.url);
        self.child = Some(child);
        self.paused = false;
        Ok(())
    }

    fn has_exited(&mut self) -> bool {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => false,
            _ => true,
        }
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!("failed to stop {}: {}", self.player_type, e);
            }
            let _ = child.wait();
        }
    }

    /// Push the current volume into the running process
    fn apply_volume(&mut self) -> Result<(), PipelineError> {
        match self.player_type {
            PlayerType::Mpv => {
                let Some(path) = &self.ipc_path else {
                    return Ok(());
                };
                let command = serde_json::json!({
                    "command": ["set_property", "volume", (self.volume * 100.0).round()]
                });
                send_ipc(path, &format!("{}\n", command)).map_err(PipelineError::Control)
            }
            PlayerType::Vlc => {
                debug!("relaunching VLC at gain {:.2}", self.volume);
                self.kill_child();
                self.spawn()
            }
        }
    }
}

#[cfg(unix)]
fn send_ipc(path: &std::path::Path, line: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    let mut stream = UnixStream::connect(path)?;
    stream.set_write_timeout(Some(Duration::from_millis(200)))?;
    stream.write_all(line.as_bytes())
}

#[cfg(not(unix))]
fn send_ipc(_path: &std::path::Path, _line: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "player IPC needs unix sockets",
    ))
}

#[cfg(unix)]
fn send_signal(child: &Child, signal: libc::c_int) -> Result<(), PipelineError> {
    let pid = child.id() as libc::pid_t;
    // SAFETY: the pid belongs to a child we spawned and have not reaped yet.
    let rc = unsafe { libc::kill(pid, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(PipelineError::Control(std::io::Error::last_os_error()))
    }
}

#[cfg(unix)]
fn suspend(child: &Child) -> Result<(), PipelineError> {
    send_signal(child, libc::SIGSTOP)
}

#[cfg(unix)]
fn resume(child: &Child) -> Result<(), PipelineError> {
    send_signal(child, libc::SIGCONT)
}

#[cfg(not(unix))]
fn suspend(_child: &Child) -> Result<(), PipelineError> {
    Err(PipelineError::Unsupported("pause"))
}

#[cfg(not(unix))]
fn resume(_child: &Child) -> Result<(), PipelineError> {
    Err(PipelineError::Unsupported("resume"))
}

impl VideoPipeline for ProcessPipeline {
    fn play(&mut self) -> Result<(), PipelineError> {
        if self.disposed {
            return Err(PipelineError::Disposed);
        }
        if self.has_exited() {
            // Nothing left to resume, relaunch
            return self.spawn();
        }
        if self.paused {
            if let Some(child) = self.child.as_ref() {
                resume(child)?;
            }
            self.paused = false;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PipelineError> {
        if self.disposed {
            return Err(PipelineError::Disposed);
        }
        if let Some(child) = self.child.as_ref() {
            suspend(child)?;
            self.paused = true;
        }
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> Result<(), PipelineError> {
        Err(PipelineError::Unsupported("seek"))
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if volume == self.volume {
            return;
        }
        self.volume = volume;
        if self.disposed || self.has_exited() {
            // Picked up by the next launch
            return;
        }
        if let Err(e) = self.apply_volume() {
            warn!("{} volume change to {:.2} failed: {}", self.player_type, volume, e);
        }
    }

    fn status(&mut self) -> PipelineStatus {
        if self.disposed {
            return PipelineStatus::Idle;
        }
        let paused = self.paused;
        let Some(child) = self.child.as_mut() else {
            return PipelineStatus::Idle;
        };
        match child.try_wait() {
            Ok(None) if paused => PipelineStatus::Paused,
            Ok(None) => PipelineStatus::Playing,
            Ok(Some(status)) if status.success() => PipelineStatus::Stopped,
            Ok(Some(status)) => PipelineStatus::Error(format!("player exited with {}", status)),
            Err(e) => PipelineStatus::Error(e.to_string()),
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.kill_child();
        if let Some(path) = &self.ipc_path {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Drop for ProcessPipeline {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// A fresh player process per pipeline, launched by its first `play()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPipelineFactory {
    player_type: PlayerType,
}

impl ProcessPipelineFactory {
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }
}

impl PipelineFactory for ProcessPipelineFactory {
    fn create(
        &self,
        url: &str,
        headers: &[(String, String)],
        hint: FormatHint,
    ) -> Result<Box<dyn VideoPipeline>, PipelineError> {
        debug!("creating {} pipeline ({:?})", self.player_type, hint);
        Ok(Box::new(ProcessPipeline::new(self.player_type, url, headers)))
    }
}
