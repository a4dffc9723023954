//! In-memory fakes for the device layer
//!
//! [`FakeSpeaker`] keeps its state behind a shared lock so a test can hold
//! one handle while the engine drives a clone of it. Mutating calls are
//! recorded as short strings (`set_volume(40)`, `invoke(pause)`) in the order
//! they arrive; reads are not recorded.
//!
//! [`FakeNetwork`] plays the resolver, and [`ScriptedExecutor`] replays canned
//! command results for poller tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};

use crate::api::{CommandExecutor, CommandResult};
use crate::device::{
    Command, Device, DeviceError, DeviceResult, LayerVersion, MusicItem, PlayMode, PlayUri,
    PlaybackEvent, QueueItem, SpeakerResolver, Switch, Tone, TransportInfo, ZoneGroup,
};

// ============================================================================
// FakeSpeaker
// ============================================================================

/// Mutable state behind a [`FakeSpeaker`]
pub struct SpeakerState {
    pub name: String,
    pub ip: String,
    pub household_id: String,
    pub visible: bool,
    pub coordinator: bool,
    pub soundbar: bool,
    pub info: BTreeMap<String, String>,
    pub switches: HashMap<Switch, bool>,
    pub volume: u8,
    pub bass: i8,
    pub treble: i8,
    pub balance: (u8, u8),
    pub play_mode: PlayMode,
    pub transport: TransportInfo,
    pub track: BTreeMap<String, String>,
    /// Tracks that become current, in order, each time a track ends
    pub pending_tracks: VecDeque<BTreeMap<String, String>>,
    pub sleep_timer: Option<u32>,
    pub queue: Vec<QueueItem>,
    pub favourites: Vec<MusicItem>,
    pub playlists: Vec<MusicItem>,
    pub line_in: bool,
    pub group_members: usize,
    pub last_play_uri: Option<PlayUri>,
    /// Operations that fail with the given error, keyed by method name
    pub failures: HashMap<&'static str, DeviceError>,
    pub calls: Vec<String>,
    group: Option<FakeSpeaker>,
    network: Weak<Mutex<NetworkState>>,
}

impl SpeakerState {
    fn new(name: &str, ip: &str) -> Self {
        let info = BTreeMap::from([
            ("model_name".to_string(), "Sonos One".to_string()),
            ("software_version".to_string(), "15.9".to_string()),
            ("zone_name".to_string(), name.to_string()),
        ]);
        Self {
            name: name.to_string(),
            ip: ip.to_string(),
            household_id: "Sonos_HH1".to_string(),
            visible: true,
            coordinator: true,
            soundbar: false,
            info,
            switches: HashMap::new(),
            volume: 10,
            bass: 0,
            treble: 0,
            balance: (100, 100),
            play_mode: PlayMode::Normal,
            transport: TransportInfo {
                current_transport_state: "STOPPED".to_string(),
                current_transport_status: "OK".to_string(),
                current_speed: "1".to_string(),
            },
            track: BTreeMap::new(),
            pending_tracks: VecDeque::new(),
            sleep_timer: None,
            queue: Vec::new(),
            favourites: Vec::new(),
            playlists: Vec::new(),
            line_in: false,
            group_members: 1,
            last_play_uri: None,
            failures: HashMap::new(),
            calls: Vec::new(),
            group: None,
            network: Weak::new(),
        }
    }

    /// Current value of a switch; unset switches read as off
    pub fn switch(&self, switch: Switch) -> bool {
        self.switches.get(&switch).copied().unwrap_or(false)
    }

    fn set_transport_state(&mut self, state: &str) {
        self.transport.current_transport_state = state.to_string();
    }
}

/// A speaker whose state lives in memory
#[derive(Clone)]
pub struct FakeSpeaker {
    state: Arc<Mutex<SpeakerState>>,
}

impl fmt::Debug for FakeSpeaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FakeSpeaker")
            .field("name", &state.name)
            .field("ip", &state.ip)
            .finish()
    }
}

impl FakeSpeaker {
    pub fn new(name: &str, ip: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(SpeakerState::new(name, ip))),
        }
    }

    /// Locks and returns the speaker state
    pub fn state(&self) -> MutexGuard<'_, SpeakerState> {
        self.state.lock()
    }

    /// Mutating calls received so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// The proxy returned by [`Device::group`], created on first use
    pub fn group_proxy(&self) -> FakeSpeaker {
        let mut state = self.state.lock();
        let (name, ip) = (state.name.clone(), state.ip.clone());
        state
            .group
            .get_or_insert_with(|| FakeSpeaker::new(&format!("{name} group"), &ip))
            .clone()
    }

    pub fn with_transport_state(self, transport_state: &str) -> Self {
        self.state.lock().set_transport_state(transport_state);
        self
    }

    pub fn with_model(self, model_name: &str) -> Self {
        self.state
            .lock()
            .info
            .insert("model_name".to_string(), model_name.to_string());
        self
    }

    /// Fills the queue with items carrying only a title
    pub fn with_queue(self, titles: &[&str]) -> Self {
        self.state.lock().queue = titles
            .iter()
            .map(|title| QueueItem {
                title: Some(title.to_string()),
                ..QueueItem::default()
            })
            .collect();
        self
    }

    /// Favourites without a URI, in the given fetch order
    pub fn with_favourites(self, titles: &[&str]) -> Self {
        self.state.lock().favourites = library_items(titles, "FV:2");
        self
    }

    pub fn with_playlists(self, titles: &[&str]) -> Self {
        self.state.lock().playlists = library_items(titles, "SQ");
        self
    }

    pub fn with_track(self, fields: &[(&str, &str)]) -> Self {
        self.state.lock().track = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Makes every call to `operation` fail with `error`
    pub fn failing(self, operation: &'static str, error: DeviceError) -> Self {
        self.state.lock().failures.insert(operation, error);
        self
    }

    fn check(&self, operation: &'static str) -> DeviceResult<MutexGuard<'_, SpeakerState>> {
        let state = self.state.lock();
        match state.failures.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }

    fn network(&self) -> Option<Arc<Mutex<NetworkState>>> {
        self.state.lock().network.upgrade()
    }
}

fn library_items(titles: &[&str], prefix: &str) -> Vec<MusicItem> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| MusicItem::new(*title, format!("{prefix}:{i}")))
        .collect()
}

impl Device for FakeSpeaker {
    fn player_name(&self) -> DeviceResult<String> {
        Ok(self.check("player_name")?.name.clone())
    }

    fn ip_address(&self) -> String {
        self.state.lock().ip.clone()
    }

    fn household_id(&self) -> DeviceResult<String> {
        Ok(self.check("household_id")?.household_id.clone())
    }

    fn is_visible(&self) -> DeviceResult<bool> {
        Ok(self.check("is_visible")?.visible)
    }

    fn is_coordinator(&self) -> DeviceResult<bool> {
        Ok(self.check("is_coordinator")?.coordinator)
    }

    fn is_soundbar(&self) -> DeviceResult<bool> {
        Ok(self.check("is_soundbar")?.soundbar)
    }

    fn speaker_info(&self) -> DeviceResult<BTreeMap<String, String>> {
        Ok(self.check("speaker_info")?.info.clone())
    }

    fn switch(&self, switch: Switch) -> DeviceResult<bool> {
        Ok(self.check("switch")?.switch(switch))
    }

    fn set_switch(&self, switch: Switch, on: bool) -> DeviceResult<()> {
        let mut state = self.check("set_switch")?;
        state.switches.insert(switch, on);
        state
            .calls
            .push(format!("set_switch({}, {})", switch.as_str(), on));
        Ok(())
    }

    fn volume(&self) -> DeviceResult<u8> {
        Ok(self.check("volume")?.volume)
    }

    fn set_volume(&self, volume: u8) -> DeviceResult<()> {
        let mut state = self.check("set_volume")?;
        state.volume = volume.min(100);
        state.calls.push(format!("set_volume({volume})"));
        Ok(())
    }

    fn ramp_to_volume(&self, volume: u8) -> DeviceResult<u32> {
        let mut state = self.check("ramp_to_volume")?;
        let seconds = u32::from(state.volume.abs_diff(volume));
        state.volume = volume.min(100);
        state.calls.push(format!("ramp_to_volume({volume})"));
        Ok(seconds)
    }

    fn tone(&self, tone: Tone) -> DeviceResult<i8> {
        let state = self.check("tone")?;
        Ok(match tone {
            Tone::Bass => state.bass,
            Tone::Treble => state.treble,
        })
    }

    fn set_tone(&self, tone: Tone, level: i8) -> DeviceResult<()> {
        let mut state = self.check("set_tone")?;
        match tone {
            Tone::Bass => state.bass = level,
            Tone::Treble => state.treble = level,
        }
        state.calls.push(format!("set_tone({}, {level})", tone.as_str()));
        Ok(())
    }

    fn balance(&self) -> DeviceResult<(u8, u8)> {
        Ok(self.check("balance")?.balance)
    }

    fn set_balance(&self, balance: (u8, u8)) -> DeviceResult<()> {
        let mut state = self.check("set_balance")?;
        state.balance = balance;
        state
            .calls
            .push(format!("set_balance({}, {})", balance.0, balance.1));
        Ok(())
    }

    fn invoke(&self, command: Command) -> DeviceResult<()> {
        let mut state = self.check("invoke")?;
        match command {
            Command::Play => state.set_transport_state("PLAYING"),
            Command::Stop => state.set_transport_state("STOPPED"),
            Command::Pause => state.set_transport_state("PAUSED_PLAYBACK"),
            Command::ClearQueue => state.queue.clear(),
            _ => {}
        }
        state.calls.push(format!("invoke({})", command.as_str()));
        Ok(())
    }

    fn play_mode(&self) -> DeviceResult<PlayMode> {
        Ok(self.check("play_mode")?.play_mode)
    }

    fn set_play_mode(&self, mode: PlayMode) -> DeviceResult<()> {
        let mut state = self.check("set_play_mode")?;
        state.play_mode = mode;
        state.calls.push(format!("set_play_mode({mode})"));
        Ok(())
    }

    fn transport_info(&self) -> DeviceResult<TransportInfo> {
        Ok(self.check("transport_info")?.transport.clone())
    }

    fn current_track_info(&self) -> DeviceResult<BTreeMap<String, String>> {
        Ok(self.check("current_track_info")?.track.clone())
    }

    fn seek(&self, position: &str) -> DeviceResult<()> {
        let mut state = self.check("seek")?;
        state.calls.push(format!("seek({position})"));
        Ok(())
    }

    fn play_uri(&self, request: &PlayUri) -> DeviceResult<()> {
        let mut state = self.check("play_uri")?;
        state.set_transport_state("PLAYING");
        state.last_play_uri = Some(request.clone());
        state.calls.push(format!("play_uri({})", request.uri));
        Ok(())
    }

    fn sleep_timer(&self) -> DeviceResult<Option<u32>> {
        Ok(self.check("sleep_timer")?.sleep_timer)
    }

    fn set_sleep_timer(&self, seconds: u32) -> DeviceResult<()> {
        let mut state = self.check("set_sleep_timer")?;
        state.sleep_timer = (seconds > 0).then_some(seconds);
        state.calls.push(format!("set_sleep_timer({seconds})"));
        Ok(())
    }

    fn wait_for(&self, event: PlaybackEvent) -> DeviceResult<()> {
        let mut state = self.check("wait_for")?;
        match event {
            PlaybackEvent::Started => state.set_transport_state("PLAYING"),
            PlaybackEvent::Stopped => state.set_transport_state("STOPPED"),
            PlaybackEvent::TrackEnded => {
                if let Some(next) = state.pending_tracks.pop_front() {
                    state.track = next;
                }
            }
        }
        state.calls.push(format!("wait_for({event:?})"));
        Ok(())
    }

    fn queue(&self, max_items: usize) -> DeviceResult<Vec<QueueItem>> {
        let state = self.check("queue")?;
        Ok(state.queue.iter().take(max_items).cloned().collect())
    }

    fn queue_size(&self) -> DeviceResult<usize> {
        Ok(self.check("queue_size")?.queue.len())
    }

    fn play_from_queue(&self, index: usize, start: bool) -> DeviceResult<()> {
        let mut state = self.check("play_from_queue")?;
        if start {
            state.set_transport_state("PLAYING");
        }
        state.calls.push(format!("play_from_queue({index})"));
        Ok(())
    }

    fn remove_from_queue(&self, index: usize) -> DeviceResult<()> {
        let mut state = self.check("remove_from_queue")?;
        if index >= state.queue.len() {
            return Err(DeviceError::InvalidValue(format!("no queue item at {index}")));
        }
        state.queue.remove(index);
        state.calls.push(format!("remove_from_queue({index})"));
        Ok(())
    }

    fn add_to_queue(&self, item: &MusicItem, as_next: bool) -> DeviceResult<usize> {
        let mut state = self.check("add_to_queue")?;
        let entry = QueueItem {
            title: Some(item.title.clone()),
            ..QueueItem::default()
        };
        let index = if as_next {
            state.queue.insert(0, entry);
            0
        } else {
            state.queue.push(entry);
            state.queue.len() - 1
        };
        let position = if as_next { "next" } else { "end" };
        state
            .calls
            .push(format!("add_to_queue({}, {position})", item.title));
        Ok(index)
    }

    fn create_playlist_from_queue(&self, title: &str) -> DeviceResult<()> {
        let mut state = self.check("create_playlist_from_queue")?;
        let id = format!("SQ:{}", state.playlists.len());
        state.playlists.push(MusicItem::new(title, id));
        state
            .calls
            .push(format!("create_playlist_from_queue({title})"));
        Ok(())
    }

    fn favourites(&self) -> DeviceResult<Vec<MusicItem>> {
        Ok(self.check("favourites")?.favourites.clone())
    }

    fn playlists(&self) -> DeviceResult<Vec<MusicItem>> {
        Ok(self.check("playlists")?.playlists.clone())
    }

    fn create_playlist(&self, title: &str) -> DeviceResult<()> {
        let mut state = self.check("create_playlist")?;
        let id = format!("SQ:{}", state.playlists.len());
        state.playlists.push(MusicItem::new(title, id));
        state.calls.push(format!("create_playlist({title})"));
        Ok(())
    }

    fn remove_playlist(&self, playlist: &MusicItem) -> DeviceResult<()> {
        let mut state = self.check("remove_playlist")?;
        state.playlists.retain(|p| p.item_id != playlist.item_id);
        state
            .calls
            .push(format!("remove_playlist({})", playlist.title));
        Ok(())
    }

    fn clear_playlist(&self, playlist: &MusicItem) -> DeviceResult<()> {
        let mut state = self.check("clear_playlist")?;
        state.calls.push(format!("clear_playlist({})", playlist.title));
        Ok(())
    }

    fn start_library_update(&self) -> DeviceResult<()> {
        let mut state = self.check("start_library_update")?;
        state.calls.push("start_library_update".to_string());
        Ok(())
    }

    fn group(&self) -> DeviceResult<Box<dyn Device>> {
        drop(self.check("group")?);
        Ok(Box::new(self.group_proxy()))
    }

    fn group_member_count(&self) -> DeviceResult<usize> {
        Ok(self.check("group_member_count")?.group_members)
    }

    fn join(&self, master: &dyn Device) -> DeviceResult<()> {
        let master_name = master.player_name()?;
        let mut state = self.check("join")?;
        state.calls.push(format!("join({master_name})"));
        Ok(())
    }

    fn create_stereo_pair(&self, right: &dyn Device) -> DeviceResult<()> {
        let right_name = right.player_name()?;
        let mut state = self.check("create_stereo_pair")?;
        state.calls.push(format!("create_stereo_pair({right_name})"));
        Ok(())
    }

    fn is_playing_line_in(&self) -> DeviceResult<bool> {
        Ok(self.check("is_playing_line_in")?.line_in)
    }

    fn switch_to_line_in(&self, source: Option<&dyn Device>) -> DeviceResult<()> {
        let source_name = match source {
            Some(device) => Some(device.player_name()?),
            None => None,
        };
        let mut state = self.check("switch_to_line_in")?;
        let source_name = source_name.unwrap_or_else(|| state.name.clone());
        state.line_in = true;
        state.set_transport_state("PLAYING");
        state.calls.push(format!("switch_to_line_in({source_name})"));
        Ok(())
    }

    fn all_zones(&self) -> DeviceResult<Vec<Box<dyn Device>>> {
        drop(self.check("all_zones")?);
        let speakers = match self.network() {
            Some(network) => network.lock().speakers.clone(),
            None => vec![self.clone()],
        };
        Ok(speakers
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Device>)
            .collect())
    }

    fn visible_zones(&self) -> DeviceResult<Vec<Box<dyn Device>>> {
        let mut visible = Vec::new();
        for zone in self.all_zones()? {
            if zone.is_visible()? {
                visible.push(zone);
            }
        }
        Ok(visible)
    }

    fn all_groups(&self) -> DeviceResult<Vec<ZoneGroup>> {
        drop(self.check("all_groups")?);
        let groups = match self.network() {
            Some(network) => network.lock().groups.clone(),
            None => Vec::new(),
        };
        Ok(groups
            .into_iter()
            .map(|group| ZoneGroup {
                label: group.label,
                coordinator: Box::new(group.coordinator),
                members: group
                    .members
                    .into_iter()
                    .map(|m| Box::new(m) as Box<dyn Device>)
                    .collect(),
            })
            .collect())
    }
}

// ============================================================================
// FakeNetwork
// ============================================================================

#[derive(Clone)]
struct FakeGroup {
    label: String,
    coordinator: FakeSpeaker,
    members: Vec<FakeSpeaker>,
}

#[derive(Default)]
struct NetworkState {
    speakers: Vec<FakeSpeaker>,
    groups: Vec<FakeGroup>,
}

/// A household of fake speakers that also acts as the resolver
///
/// Clones share the same speakers; the reported layer version belongs to
/// each handle.
#[derive(Clone)]
pub struct FakeNetwork {
    state: Arc<Mutex<NetworkState>>,
    version: LayerVersion,
}

impl Default for FakeNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState::default())),
            version: LayerVersion::new(0, 20),
        }
    }

    pub fn with_layer_version(mut self, version: LayerVersion) -> Self {
        self.version = version;
        self
    }

    /// Adds a speaker; it will see the rest of the network through its zone
    /// and group accessors
    pub fn add(&self, speaker: &FakeSpeaker) {
        speaker.state().network = Arc::downgrade(&self.state);
        self.state.lock().speakers.push(speaker.clone());
    }

    pub fn add_group(&self, label: &str, coordinator: &FakeSpeaker, members: &[&FakeSpeaker]) {
        let group = FakeGroup {
            label: label.to_string(),
            coordinator: coordinator.clone(),
            members: members.iter().map(|m| (*m).clone()).collect(),
        };
        self.state.lock().groups.push(group);
    }

    /// Looks up a speaker by name (ignoring case) or IP address
    pub fn speaker(&self, name: &str) -> Option<FakeSpeaker> {
        self.state
            .lock()
            .speakers
            .iter()
            .find(|s| {
                let state = s.state();
                state.name.eq_ignore_ascii_case(name) || state.ip == name
            })
            .cloned()
    }

    /// Names of all speakers in insertion order
    pub fn names(&self) -> Vec<String> {
        self.state
            .lock()
            .speakers
            .iter()
            .map(|s| s.state().name.clone())
            .collect()
    }
}

impl SpeakerResolver for FakeNetwork {
    fn resolve(&self, name: &str, _use_local_cache: bool) -> Option<Box<dyn Device>> {
        self.speaker(name).map(|s| Box::new(s) as Box<dyn Device>)
    }

    fn layer_version(&self) -> LayerVersion {
        self.version
    }
}

// ============================================================================
// ScriptedExecutor
// ============================================================================

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<CommandResult>>,
    calls: Vec<String>,
}

/// Replays canned results per action
///
/// Responses for an action are returned in order; the last one repeats once
/// the rest are used up. Actions with no script fail as unknown.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<Script>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, action: &str, result: CommandResult) -> Self {
        self.script
            .lock()
            .responses
            .entry(action.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Shorthand for a successful response with `output`
    pub fn ok(self, action: &str, output: &str) -> Self {
        self.respond(action, CommandResult::success(output))
    }

    /// Actions executed so far, with their arguments
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().calls.clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(
        &self,
        _device: &dyn Device,
        action: &str,
        args: &[String],
        _use_local_cache: bool,
    ) -> CommandResult {
        let mut script = self.script.lock();
        let call = std::iter::once(action.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        script.calls.push(call);
        match script.responses.get_mut(action) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => CommandResult::failure(format!("Error: Action '{action}' not found")),
        }
    }
}
