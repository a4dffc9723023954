//! Device collaborator interfaces
//!
//! The action engine never talks to the network itself. Everything it needs
//! from a speaker goes through the [`Device`] trait, and speakers named on the
//! command line are looked up through a [`SpeakerResolver`]. Both are
//! implemented by the device-control layer that owns discovery and transport.
//!
//! Speaker properties are small operand enums ([`Switch`], [`Command`],
//! [`Tone`]) so every registry entry carries a typed accessor.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised by the device-control layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The speaker could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The speaker answered with a UPnP fault
    #[error("UPnP error {code}: {message}")]
    Fault { code: u16, message: String },

    /// The speaker rejected a value (for example an unseekable position)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The speaker or the current source does not support the operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result alias for device calls
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

// ============================================================================
// Operand types
// ============================================================================

/// Boolean speaker properties with on/off semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    Mute,
    CrossFade,
    Loudness,
    StatusLight,
    NightMode,
    DialogMode,
}

impl Switch {
    /// Property name as exposed by the device layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Switch::Mute => "mute",
            Switch::CrossFade => "cross_fade",
            Switch::Loudness => "loudness",
            Switch::StatusLight => "status_light",
            Switch::NightMode => "night_mode",
            Switch::DialogMode => "dialog_mode",
        }
    }
}

/// Zero-argument device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Play,
    Stop,
    Pause,
    Next,
    Previous,
    Unjoin,
    PartyMode,
    ClearQueue,
    SeparateStereoPair,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Stop => "stop",
            Command::Pause => "pause",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Unjoin => "unjoin",
            Command::PartyMode => "partymode",
            Command::ClearQueue => "clear_queue",
            Command::SeparateStereoPair => "separate_stereo_pair",
        }
    }
}

/// Equaliser settings in the range -10 to +10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Bass,
    Treble,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Bass => "bass",
            Tone::Treble => "treble",
        }
    }
}

/// Whether an operation addresses the speaker itself or its whole group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Speaker,
    Group,
}

/// Playback events a caller can block on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    /// Playback has started
    Started,
    /// Playback has stopped or paused
    Stopped,
    /// The current track has ended or changed
    TrackEnded,
}

/// Queue play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayMode {
    Normal,
    RepeatAll,
    RepeatOne,
    Shuffle,
    ShuffleNoRepeat,
}

impl PlayMode {
    /// All accepted argument spellings, in display order
    pub const NAMES: [&'static str; 5] = [
        "normal",
        "repeat_all",
        "repeat_one",
        "shuffle",
        "shuffle_norepeat",
    ];
}

impl FromStr for PlayMode {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(PlayMode::Normal),
            "repeat_all" => Ok(PlayMode::RepeatAll),
            "repeat_one" => Ok(PlayMode::RepeatOne),
            "shuffle" => Ok(PlayMode::Shuffle),
            "shuffle_norepeat" => Ok(PlayMode::ShuffleNoRepeat),
            other => Err(DeviceError::InvalidValue(format!("unknown play mode '{other}'"))),
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayMode::Normal => "NORMAL",
            PlayMode::RepeatAll => "REPEAT_ALL",
            PlayMode::RepeatOne => "REPEAT_ONE",
            PlayMode::Shuffle => "SHUFFLE",
            PlayMode::ShuffleNoRepeat => "SHUFFLE_NOREPEAT",
        };
        f.write_str(name)
    }
}

/// Snapshot of the AVTransport state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportInfo {
    /// "PLAYING", "PAUSED_PLAYBACK", "STOPPED" or "TRANSITIONING"
    pub current_transport_state: String,
    pub current_transport_status: String,
    pub current_speed: String,
}

/// A favourite, playlist or other browsable library item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MusicItem {
    pub title: String,
    pub item_id: String,
    /// Playable resource, when the item exposes one
    pub uri: Option<String>,
    /// DIDL-Lite metadata for the resource
    pub metadata: Option<String>,
}

impl MusicItem {
    pub fn new(title: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            item_id: item_id.into(),
            uri: None,
            metadata: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// One entry of the play queue; any field may be absent on the device side
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueItem {
    pub creator: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

/// Parameters for `play_uri`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayUri {
    pub uri: String,
    pub metadata: Option<String>,
    pub title: Option<String>,
    /// Treat the URI as an internet radio stream
    pub force_radio: bool,
}

/// A coordinator-led zone group
pub struct ZoneGroup {
    /// Short human readable label, e.g. "Kitchen + 1"
    pub label: String,
    pub coordinator: Box<dyn Device>,
    /// All members including the coordinator
    pub members: Vec<Box<dyn Device>>,
}

impl fmt::Debug for ZoneGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneGroup")
            .field("label", &self.label)
            .field("members", &self.members.len())
            .finish()
    }
}

/// Version of the installed device-control layer
///
/// Compared component-wise, so `0.9 < 0.20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerVersion {
    pub major: u32,
    pub minor: u32,
}

impl LayerVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for LayerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LayerVersion {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeviceError::InvalidValue(format!("invalid version '{s}'"));
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };
        Ok(Self::new(major, minor))
    }
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// One addressable player, or the group proxy returned by [`Device::group`]
///
/// Every call may block on a network round trip. Implementations decide on
/// their own timeouts and retries.
pub trait Device: Send + Sync {
    // Identity ---------------------------------------------------------------
    fn player_name(&self) -> DeviceResult<String>;
    fn ip_address(&self) -> String;
    fn household_id(&self) -> DeviceResult<String>;
    fn is_visible(&self) -> DeviceResult<bool>;
    fn is_coordinator(&self) -> DeviceResult<bool>;
    fn is_soundbar(&self) -> DeviceResult<bool>;
    /// Static device description; contains at least `model_name`
    fn speaker_info(&self) -> DeviceResult<BTreeMap<String, String>>;

    // Rendering --------------------------------------------------------------
    fn switch(&self, switch: Switch) -> DeviceResult<bool>;
    fn set_switch(&self, switch: Switch, on: bool) -> DeviceResult<()>;
    fn volume(&self) -> DeviceResult<u8>;
    /// Values above 100 are clamped by the device
    fn set_volume(&self, volume: u8) -> DeviceResult<()>;
    /// Returns the ramp duration in seconds
    fn ramp_to_volume(&self, volume: u8) -> DeviceResult<u32>;
    fn tone(&self, tone: Tone) -> DeviceResult<i8>;
    fn set_tone(&self, tone: Tone, level: i8) -> DeviceResult<()>;
    /// `(left, right)`, each in 0..=100
    fn balance(&self) -> DeviceResult<(u8, u8)>;
    fn set_balance(&self, balance: (u8, u8)) -> DeviceResult<()>;

    // Transport --------------------------------------------------------------
    fn invoke(&self, command: Command) -> DeviceResult<()>;
    fn play_mode(&self) -> DeviceResult<PlayMode>;
    fn set_play_mode(&self, mode: PlayMode) -> DeviceResult<()>;
    fn transport_info(&self) -> DeviceResult<TransportInfo>;
    fn current_track_info(&self) -> DeviceResult<BTreeMap<String, String>>;
    fn seek(&self, position: &str) -> DeviceResult<()>;
    fn play_uri(&self, request: &PlayUri) -> DeviceResult<()>;
    /// Remaining seconds, or `None` when no timer is set
    fn sleep_timer(&self) -> DeviceResult<Option<u32>>;
    fn set_sleep_timer(&self, seconds: u32) -> DeviceResult<()>;
    /// Blocks until the device reports `event`
    fn wait_for(&self, event: PlaybackEvent) -> DeviceResult<()>;

    // Queue ------------------------------------------------------------------
    fn queue(&self, max_items: usize) -> DeviceResult<Vec<QueueItem>>;
    fn queue_size(&self) -> DeviceResult<usize>;
    /// `index` is 0-based
    fn play_from_queue(&self, index: usize, start: bool) -> DeviceResult<()>;
    /// `index` is 0-based
    fn remove_from_queue(&self, index: usize) -> DeviceResult<()>;
    /// Returns the 0-based queue index of the inserted item
    fn add_to_queue(&self, item: &MusicItem, as_next: bool) -> DeviceResult<usize>;
    fn create_playlist_from_queue(&self, title: &str) -> DeviceResult<()>;

    // Library ----------------------------------------------------------------
    fn favourites(&self) -> DeviceResult<Vec<MusicItem>>;
    fn playlists(&self) -> DeviceResult<Vec<MusicItem>>;
    fn create_playlist(&self, title: &str) -> DeviceResult<()>;
    fn remove_playlist(&self, playlist: &MusicItem) -> DeviceResult<()>;
    fn clear_playlist(&self, playlist: &MusicItem) -> DeviceResult<()>;
    fn start_library_update(&self) -> DeviceResult<()>;

    // Topology ---------------------------------------------------------------
    /// Proxy for the group this speaker belongs to
    fn group(&self) -> DeviceResult<Box<dyn Device>>;
    fn group_member_count(&self) -> DeviceResult<usize>;
    fn join(&self, master: &dyn Device) -> DeviceResult<()>;
    fn create_stereo_pair(&self, right: &dyn Device) -> DeviceResult<()>;
    fn is_playing_line_in(&self) -> DeviceResult<bool>;
    /// Plays the line-in of `source`, or of this speaker when `None`
    fn switch_to_line_in(&self, source: Option<&dyn Device>) -> DeviceResult<()>;
    fn all_zones(&self) -> DeviceResult<Vec<Box<dyn Device>>>;
    fn visible_zones(&self) -> DeviceResult<Vec<Box<dyn Device>>>;
    fn all_groups(&self) -> DeviceResult<Vec<ZoneGroup>>;
}

/// Looks up speakers by name or IP address
pub trait SpeakerResolver: Send + Sync {
    /// `use_local_cache` selects the saved speaker list over live discovery
    fn resolve(&self, name: &str, use_local_cache: bool) -> Option<Box<dyn Device>>;

    /// Version of the device-control layer, used to gate newer operations
    fn layer_version(&self) -> LayerVersion;
}
