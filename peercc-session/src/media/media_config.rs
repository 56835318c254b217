use peercc_core::IceServerConfig;
use serde::Serialize;

/// Startup configuration handed to the media layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaConfig {
    pub ice_servers: Vec<IceServerConfig>,
    /// Preferred RTP payload type for audio, if the user picked one.
    pub audio_codec: Option<u8>,
    /// Preferred RTP payload type for video, if the user picked one.
    pub video_codec: Option<i32>,
}
