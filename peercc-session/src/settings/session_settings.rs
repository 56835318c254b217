use crate::media::MediaConfig;
use crate::settings::SettingsStore;
use peercc_core::{IceServerConfig, default_ice_servers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Keys under which settings are persisted.
pub mod keys {
    pub const SERVER_ADDRESS: &str = "PeerCCServerIp";
    pub const SERVER_PORT: &str = "PeerCCServerPort";
    pub const ICE_SERVERS: &str = "IceServerList";
    pub const AUDIO_CODEC: &str = "SelectedAudioCodecId";
    pub const VIDEO_CODEC: &str = "SelectedVideoCodecId";
    pub const NTP_SERVER: &str = "NTPServer";
    pub const TRACE_SERVER_ADDRESS: &str = "TraceServerIp";
    pub const TRACE_SERVER_PORT: &str = "TraceServerPort";
}

pub const DEFAULT_SERVER_ADDRESS: &str = "192.168.11.132";
pub const DEFAULT_SERVER_PORT: u16 = 8888;
pub const DEFAULT_NTP_SERVER: &str = "time.windows.com";
pub const DEFAULT_TRACE_SERVER_PORT: u16 = 55000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub address: String,
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Everything the session reads from persisted settings at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSettings {
    pub server: ServerEndpoint,
    pub ice_servers: Vec<IceServerConfig>,
    pub audio_codec: Option<u8>,
    pub video_codec: Option<i32>,
    pub ntp_server: String,
    pub trace_server: ServerEndpoint,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            server: ServerEndpoint::new(DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT),
            ice_servers: default_ice_servers(),
            audio_codec: None,
            video_codec: None,
            ntp_server: DEFAULT_NTP_SERVER.to_owned(),
            trace_server: ServerEndpoint::new(DEFAULT_SERVER_ADDRESS, DEFAULT_TRACE_SERVER_PORT),
        }
    }
}

impl SessionSettings {
    /// Read settings from `store`. Never fails: every missing or malformed
    /// value is logged and replaced by its default.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();

        let settings = Self {
            server: ServerEndpoint {
                address: non_empty(store, keys::SERVER_ADDRESS)
                    .unwrap_or(defaults.server.address),
                port: parsed(store, keys::SERVER_PORT).unwrap_or(defaults.server.port),
            },
            ice_servers: ice_servers(store).unwrap_or(defaults.ice_servers),
            audio_codec: parsed(store, keys::AUDIO_CODEC),
            video_codec: parsed(store, keys::VIDEO_CODEC),
            ntp_server: non_empty(store, keys::NTP_SERVER).unwrap_or(defaults.ntp_server),
            trace_server: ServerEndpoint {
                address: non_empty(store, keys::TRACE_SERVER_ADDRESS)
                    .unwrap_or(defaults.trace_server.address),
                port: parsed(store, keys::TRACE_SERVER_PORT)
                    .unwrap_or(defaults.trace_server.port),
            },
        };

        debug!("Server = {}", settings.server);
        debug!("TraceServer = {}", settings.trace_server);
        debug!("NtpServer = {}", settings.ntp_server);
        debug!("IceServers = {}", settings.ice_servers.len());
        settings
    }

    pub fn media_config(&self) -> MediaConfig {
        MediaConfig {
            ice_servers: self.ice_servers.clone(),
            audio_codec: self.audio_codec,
            video_codec: self.video_codec,
        }
    }
}

fn non_empty(store: &dyn SettingsStore, key: &str) -> Option<String> {
    let value = store.get(key)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        warn!("Setting {} is empty, using default", key);
        return None;
    }
    Some(trimmed.to_owned())
}

fn parsed<T>(store: &dyn SettingsStore, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = store.get(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Setting {} = {:?} is invalid ({}), using default", key, value, e);
            None
        }
    }
}

fn ice_servers(store: &dyn SettingsStore) -> Option<Vec<IceServerConfig>> {
    let value = store.get(keys::ICE_SERVERS)?;
    match serde_json::from_str::<Vec<IceServerConfig>>(&value) {
        Ok(servers) if !servers.is_empty() => Some(servers),
        Ok(_) => {
            warn!("Persisted ICE server list is empty, using defaults");
            None
        }
        Err(e) => {
            warn!("Failed to load ICE servers from settings, using defaults ({})", e);
            None
        }
    }
}
