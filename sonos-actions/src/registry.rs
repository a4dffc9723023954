//! Action registry
//!
//! Maps every action name, synonyms included, to the strategy that handles it
//! and the device operation it drives. Synonyms are separate keys sharing an
//! identical entry. The table is static; the lookup index is built once on
//! first use.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::device::{Command, PlaybackEvent, Scope, Switch, Tone};
use crate::strategy::{Collection, Grouping, PlaylistOp, Reading, Strategy};

/// What a registered action does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEntry {
    pub strategy: Strategy,
    /// Name of the device capability the action drives; empty when the
    /// action picks it at runtime
    pub operation: &'static str,
}

const fn entry(strategy: Strategy, operation: &'static str) -> ActionEntry {
    ActionEntry {
        strategy,
        operation,
    }
}

// Shared entries, one per distinct behaviour
const MUTE: ActionEntry = entry(Strategy::Toggle(Switch::Mute, Scope::Speaker), "mute");
const GROUP_MUTE: ActionEntry = entry(Strategy::Toggle(Switch::Mute, Scope::Group), "group_mute");
const CROSS_FADE: ActionEntry =
    entry(Strategy::Toggle(Switch::CrossFade, Scope::Speaker), "cross_fade");
const LOUDNESS: ActionEntry = entry(Strategy::Toggle(Switch::Loudness, Scope::Speaker), "loudness");
const STATUS_LIGHT: ActionEntry =
    entry(Strategy::Toggle(Switch::StatusLight, Scope::Speaker), "status_light");
const NIGHT_MODE: ActionEntry =
    entry(Strategy::Toggle(Switch::NightMode, Scope::Speaker), "night_mode");
const DIALOG_MODE: ActionEntry =
    entry(Strategy::Toggle(Switch::DialogMode, Scope::Speaker), "dialog_mode");

const PLAY: ActionEntry = entry(Strategy::NoArgs(Command::Play), "play");
const STOP: ActionEntry = entry(Strategy::NoArgs(Command::Stop), "stop");
const PAUSE: ActionEntry = entry(Strategy::NoArgs(Command::Pause), "pause");
const NEXT: ActionEntry = entry(Strategy::NoArgs(Command::Next), "next");
const PREVIOUS: ActionEntry = entry(Strategy::NoArgs(Command::Previous), "previous");
const UNJOIN: ActionEntry = entry(Strategy::NoArgs(Command::Unjoin), "unjoin");
const PARTY_MODE: ActionEntry = entry(Strategy::NoArgs(Command::PartyMode), "partymode");
const CLEAR_QUEUE: ActionEntry = entry(Strategy::NoArgs(Command::ClearQueue), "clear_queue");
const UNPAIR: ActionEntry =
    entry(Strategy::NoArgs(Command::SeparateStereoPair), "separate_stereo_pair");

const LIST_QUEUE: ActionEntry = entry(Strategy::ListQueue, "get_queue");
const LIST_PLAYLISTS: ActionEntry =
    entry(Strategy::ListTitles(Collection::Playlists), "get_sonos_playlists");
const LIST_FAVOURITES: ActionEntry =
    entry(Strategy::ListTitles(Collection::Favourites), "get_sonos_favorites");
const QUEUE_LENGTH: ActionEntry = entry(Strategy::SingleValue(Reading::QueueSize), "queue_size");

const VOLUME: ActionEntry = entry(Strategy::Volume(Scope::Speaker), "volume");
const GROUP_VOLUME: ActionEntry = entry(Strategy::Volume(Scope::Group), "group_volume");
const RAMP: ActionEntry = entry(Strategy::RampVolume, "ramp_to_volume");
const RELATIVE_VOLUME: ActionEntry =
    entry(Strategy::RelativeVolume(Scope::Speaker), "relative_volume");
const GROUP_RELATIVE_VOLUME: ActionEntry =
    entry(Strategy::RelativeVolume(Scope::Group), "group_relative_volume");

const TRACK: ActionEntry = entry(Strategy::TrackInfo, "get_current_track_info");
const PLAY_MODE: ActionEntry = entry(Strategy::PlayMode, "play_mode");
const STATE: ActionEntry = entry(Strategy::TransportState, "get_current_transport_info");
const PLAY_FAVOURITE: ActionEntry = entry(Strategy::PlayFavourite, "play_favorite");
const PLAY_URI: ActionEntry = entry(Strategy::PlayUri, "play_uri");
const SLEEP_TIMER: ActionEntry = entry(Strategy::SleepTimer, "sleep_timer");

const GROUP: ActionEntry = entry(Strategy::Grouping(Grouping::Join), "join");
const PAIR: ActionEntry = entry(Strategy::Grouping(Grouping::StereoPair), "create_stereo_pair");
const UNGROUP_ALL: ActionEntry = entry(Strategy::AllZones(Command::Unjoin), "unjoin");
const PAUSE_ALL: ActionEntry = entry(Strategy::AllZones(Command::Pause), "pause");
const ZONES: ActionEntry = entry(Strategy::Zones, "zones");

const PLAY_FROM_QUEUE: ActionEntry = entry(Strategy::PlayFromQueue, "play_from_queue");
const REMOVE_FROM_QUEUE: ActionEntry = entry(Strategy::RemoveFromQueue, "remove_from_queue");
const SAVE_QUEUE: ActionEntry = entry(Strategy::SaveQueue, "create_sonos_playlist_from_queue");
const SEEK: ActionEntry = entry(Strategy::Seek, "seek");

const ADD_PLAYLIST: ActionEntry = entry(Strategy::Playlist(PlaylistOp::AddToQueue), "add_to_queue");
const DELETE_PLAYLIST: ActionEntry =
    entry(Strategy::Playlist(PlaylistOp::Delete), "remove_sonos_playlist");
const CLEAR_PLAYLIST: ActionEntry =
    entry(Strategy::Playlist(PlaylistOp::Clear), "clear_sonos_playlist");
const CREATE_PLAYLIST: ActionEntry =
    entry(Strategy::Playlist(PlaylistOp::Create), "create_sonos_playlist");

const LINE_IN: ActionEntry = entry(Strategy::LineIn, "");
const BASS: ActionEntry = entry(Strategy::Tone(Tone::Bass), "bass");
const TREBLE: ActionEntry = entry(Strategy::Tone(Tone::Treble), "treble");
const BALANCE: ActionEntry = entry(Strategy::Balance, "balance");
const REINDEX: ActionEntry = entry(Strategy::Reindex, "start_library_update");
const INFO: ActionEntry = entry(Strategy::Info, "get_info");
const GROUPS: ActionEntry = entry(Strategy::Groups, "groups");

const WAIT_START: ActionEntry = entry(Strategy::Wait(PlaybackEvent::Started), "wait_start");
const WAIT_STOP: ActionEntry = entry(Strategy::Wait(PlaybackEvent::Stopped), "wait_stop");
const WAIT_END_TRACK: ActionEntry =
    entry(Strategy::Wait(PlaybackEvent::TrackEnded), "wait_end_track");

/// Every action name with its entry
static ACTIONS: &[(&str, ActionEntry)] = &[
    ("mute", MUTE),
    ("group_mute", GROUP_MUTE),
    ("cross_fade", CROSS_FADE),
    ("loudness", LOUDNESS),
    ("status_light", STATUS_LIGHT),
    ("light", STATUS_LIGHT),
    ("night_mode", NIGHT_MODE),
    ("night", NIGHT_MODE),
    ("dialog_mode", DIALOG_MODE),
    ("dialog", DIALOG_MODE),
    ("dialogue_mode", DIALOG_MODE),
    ("dialogue", DIALOG_MODE),
    ("play", PLAY),
    ("stop", STOP),
    ("pause", PAUSE),
    ("next", NEXT),
    ("previous", PREVIOUS),
    ("prev", PREVIOUS),
    ("ungroup", UNJOIN),
    ("u", UNJOIN),
    ("party_mode", PARTY_MODE),
    ("party", PARTY_MODE),
    ("clear_queue", CLEAR_QUEUE),
    ("cq", CLEAR_QUEUE),
    ("unpair", UNPAIR),
    ("list_queue", LIST_QUEUE),
    ("lq", LIST_QUEUE),
    ("queue", LIST_QUEUE),
    ("q", LIST_QUEUE),
    ("list_playlists", LIST_PLAYLISTS),
    ("playlists", LIST_PLAYLISTS),
    ("lp", LIST_PLAYLISTS),
    ("list_favourites", LIST_FAVOURITES),
    ("list_favorites", LIST_FAVOURITES),
    ("list_favs", LIST_FAVOURITES),
    ("lf", LIST_FAVOURITES),
    ("queue_length", QUEUE_LENGTH),
    ("volume", VOLUME),
    ("vol", VOLUME),
    ("v", VOLUME),
    ("group_volume", GROUP_VOLUME),
    ("group_vol", GROUP_VOLUME),
    ("gv", GROUP_VOLUME),
    ("ramp_to_volume", RAMP),
    ("ramp", RAMP),
    ("relative_volume", RELATIVE_VOLUME),
    ("rel_vol", RELATIVE_VOLUME),
    ("rv", RELATIVE_VOLUME),
    ("group_relative_volume", GROUP_RELATIVE_VOLUME),
    ("group_rel_vol", GROUP_RELATIVE_VOLUME),
    ("grv", GROUP_RELATIVE_VOLUME),
    ("track", TRACK),
    ("play_mode", PLAY_MODE),
    ("mode", PLAY_MODE),
    ("playback_state", STATE),
    ("playback", STATE),
    ("state", STATE),
    ("play_favourite", PLAY_FAVOURITE),
    ("play_favorite", PLAY_FAVOURITE),
    ("favourite", PLAY_FAVOURITE),
    ("favorite", PLAY_FAVOURITE),
    ("play_fav", PLAY_FAVOURITE),
    ("fav", PLAY_FAVOURITE),
    ("pf", PLAY_FAVOURITE),
    ("play_uri", PLAY_URI),
    ("uri", PLAY_URI),
    ("pu", PLAY_URI),
    ("sleep_timer", SLEEP_TIMER),
    ("sleep", SLEEP_TIMER),
    ("group", GROUP),
    ("g", GROUP),
    ("pair", PAIR),
    ("ungroup_all", UNGROUP_ALL),
    ("pause_all", PAUSE_ALL),
    ("zones", ZONES),
    ("all_zones", ZONES),
    ("rooms", ZONES),
    ("all_rooms", ZONES),
    ("visible_zones", ZONES),
    ("visible_rooms", ZONES),
    ("play_from_queue", PLAY_FROM_QUEUE),
    ("play_queue", PLAY_FROM_QUEUE),
    ("pfq", PLAY_FROM_QUEUE),
    ("pq", PLAY_FROM_QUEUE),
    ("remove_from_queue", REMOVE_FROM_QUEUE),
    ("rq", REMOVE_FROM_QUEUE),
    ("save_queue", SAVE_QUEUE),
    ("sq", SAVE_QUEUE),
    ("seek", SEEK),
    ("add_playlist_to_queue", ADD_PLAYLIST),
    ("add_pl_to_queue", ADD_PLAYLIST),
    ("apq", ADD_PLAYLIST),
    ("delete_playlist", DELETE_PLAYLIST),
    ("clear_playlist", CLEAR_PLAYLIST),
    ("create_playlist", CREATE_PLAYLIST),
    ("line_in", LINE_IN),
    ("bass", BASS),
    ("treble", TREBLE),
    ("balance", BALANCE),
    ("reindex", REINDEX),
    ("info", INFO),
    ("groups", GROUPS),
    ("wait_start", WAIT_START),
    ("wait_stop", WAIT_STOP),
    ("wait_end_track", WAIT_END_TRACK),
];

fn index() -> &'static HashMap<&'static str, ActionEntry> {
    static INDEX: OnceLock<HashMap<&'static str, ActionEntry>> = OnceLock::new();
    INDEX.get_or_init(|| ACTIONS.iter().copied().collect())
}

/// Looks up an action by its exact name
pub fn lookup(action: &str) -> Option<&'static ActionEntry> {
    index().get(action)
}

/// All registered action names, sorted
pub fn action_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = ACTIONS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}
