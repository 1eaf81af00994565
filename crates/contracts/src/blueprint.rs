//! PublisherBlueprint - Config Loader output
//!
//! Describes a complete publication run: where entities come from, how the
//! join runs, which message family is published, at what cadence, and
//! through which codec.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{MessageFamily, MsgCount};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Entity source settings
    pub source: SourceConfig,

    /// Join engine settings
    #[serde(default)]
    pub join: JoinConfig,

    /// Publication settings
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Wire codec settings
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Where the entity JSON files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding `dataset.json`, `ego_pose.json`, ...
    pub data_dir: PathBuf,
}

/// Join engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Resolve FrameData entries on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> bool {
    true
}

/// Publication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Message family to publish
    #[serde(default)]
    pub family: MessageFamily,

    /// Tick period in milliseconds, must be > 0
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// UTM zone of the recorded translations (1..=60)
    #[serde(default = "default_utm_zone")]
    pub utm_zone: u8,

    /// First msgCnt value of the run
    #[serde(default)]
    pub initial_msg_count: MsgCount,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            family: MessageFamily::default(),
            interval_ms: default_interval_ms(),
            utm_zone: default_utm_zone(),
            initial_msg_count: MsgCount::ZERO,
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

/// Zone of the reference recordings
pub const DEFAULT_UTM_ZONE: u8 = 52;

fn default_utm_zone() -> u8 {
    DEFAULT_UTM_ZONE
}

/// Codec configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub kind: CodecKind,
}

/// Available wire codecs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// bincode envelope rendered as hex text
    #[default]
    Bincode,
    /// Compact JSON text
    Json,
}
