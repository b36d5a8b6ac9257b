use std::{
    env, fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Typed configuration for the relay.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub group_id: ChatId,

    // Web
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
}

impl Config {
    /// Load from the process environment, after merging an optional `.env`.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;

        let group_id = match lookup("GROUP_ID").and_then(non_empty) {
            Some(raw) => raw.trim().parse::<i64>().map(ChatId).map_err(|_| {
                Error::Config(format!("GROUP_ID must be an integer chat id, got {raw:?}"))
            })?,
            None => {
                return Err(Error::Config(
                    "GROUP_ID environment variable is required".to_string(),
                ))
            }
        };

        let port = match lookup("PORT").and_then(non_empty) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a valid port, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let host = match lookup("HOST").and_then(non_empty) {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| {
                Error::Config(format!("HOST must be an IP address, got {raw:?}"))
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let public_dir = lookup("PUBLIC_DIR")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            bot_token,
            group_id,
            host,
            port,
            public_dir,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
