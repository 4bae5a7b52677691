use clap::{Args, Parser, Subcommand, ValueEnum};

use kodi_stats_server::config::Config;
use kodi_stats_server::services::kodi::LibraryAction;

/// Kodi library statistics
///
/// Collects movie, TV and music counts from a Kodi instance and renders them
/// as a status page, a console report or JSON.
#[derive(Parser, Debug)]
#[command(name = "kodi-stats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kodi library statistics collector and status page server", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub kodi: KodiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Kodi connection overrides, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct KodiArgs {
    /// Kodi host, bare (`192.168.1.10`) or as a URL (`http://192.168.1.10:8080`)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Kodi web server port, for bare hosts
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Kodi web server username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Kodi web server password
    #[arg(long, global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the status page over HTTP
    Serve(ServeArgs),

    /// Collect statistics once and print a report
    Probe(ProbeArgs),

    /// Start a library scan
    Scan {
        #[arg(value_enum)]
        library: Library,
    },

    /// Start a library clean
    Clean {
        #[arg(value_enum)]
        library: Library,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port of the status page server
    #[arg(long)]
    pub web_port: Option<u16>,

    /// Host name shown in the startup log
    #[arg(long)]
    pub container_host: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ProbeArgs {
    /// Also write the status page to a file
    #[arg(long)]
    pub save_html: bool,

    /// HTML output path
    #[arg(long, requires = "save_html")]
    pub html_file: Option<String>,

    /// Also write the statistics summary as JSON
    #[arg(long)]
    pub save_json: bool,

    /// JSON output path
    #[arg(long, requires = "save_json")]
    pub json_file: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    Video,
    Audio,
}

impl Library {
    pub fn scan(self) -> LibraryAction {
        match self {
            Library::Video => LibraryAction::ScanVideo,
            Library::Audio => LibraryAction::ScanAudio,
        }
    }

    pub fn clean(self) -> LibraryAction {
        match self {
            Library::Video => LibraryAction::CleanVideo,
            Library::Audio => LibraryAction::CleanAudio,
        }
    }
}

impl KodiArgs {
    /// Apply command-line overrides on top of the environment config
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.kodi_host = host.clone();
        }
        if let Some(port) = self.port {
            config.kodi_port = Some(port);
        }
        if let Some(username) = &self.username {
            config.kodi_username = username.clone();
        }
        if let Some(password) = &self.password {
            config.kodi_password = password.clone();
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.web_port {
            config.port = port;
        }
        if let Some(host) = &self.container_host {
            config.container_host = host.clone();
        }
    }
}

impl ProbeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.html_file {
            config.html_file = path.clone();
        }
        if let Some(path) = &self.json_file {
            config.json_file = path.clone();
        }
    }
}
