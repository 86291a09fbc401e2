use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::services::link_service::Credentials;

/// Manage the short links of a link service from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "shortcut-admin", version, about)]
pub struct Config {
    /// Origin of the link service; links are managed at `<origin>/s`
    #[arg(long, env = "SHORTCUT_ORIGIN", default_value = "http://localhost:8080")]
    pub origin: Url,

    /// User for HTTP Basic authorization
    #[arg(long, env = "SHORTCUT_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "SHORTCUT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seed file loaded into the listing at startup
    #[arg(long, env = "SHORTCUT_SEED")]
    pub seed: Option<PathBuf>,

    /// Print the listing without colors
    #[arg(long)]
    pub no_color: bool,
}

impl Config {
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}
