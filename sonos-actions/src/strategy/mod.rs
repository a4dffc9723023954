//! Processing strategies
//!
//! A strategy implements one family of actions: it checks the argument count,
//! validates each argument, and only then calls the device and writes the
//! result to the context's output. Registry entries bind an action name to a
//! [`Strategy`] variant, and the variant carries the typed operand such as
//! the switch to flip or the scope to act on.

use std::fmt::Display;
use std::io::Write;

use crate::device::{
    Command, Device, LayerVersion, PlaybackEvent, Scope, SpeakerResolver, Switch, Tone,
};
use crate::error::{ActionError, Result};

mod library;
mod listing;
mod queue;
mod toggle;
mod topology;
mod transport;
mod volume;

pub use volume::{balance_from_setting, balance_setting};

/// Oldest device layer that supports stereo pairing
pub const PAIRING_MIN_VERSION: LayerVersion = LayerVersion::new(0, 20);

/// Everything a strategy needs for one invocation
///
/// The device reference is borrowed for the duration of the call only.
pub struct ActionContext<'a> {
    pub device: &'a dyn Device,
    pub action: &'a str,
    pub args: &'a [String],
    pub resolver: &'a dyn SpeakerResolver,
    pub use_local_cache: bool,
    pub out: &'a mut dyn Write,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        device: &'a dyn Device,
        action: &'a str,
        args: &'a [String],
        resolver: &'a dyn SpeakerResolver,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            device,
            action,
            args,
            resolver,
            use_local_cache: false,
            out,
        }
    }

    pub fn with_local_cache(mut self, use_local_cache: bool) -> Self {
        self.use_local_cache = use_local_cache;
        self
    }

    /// Checks the argument count against the allowed set
    pub(crate) fn arity(&self, allowed: &[usize], expected: &'static str) -> Result<()> {
        crate::args::expect_arity(self.action, self.args, allowed, expected)
    }

    /// The single argument; callers check arity first
    pub(crate) fn arg(&self, index: usize) -> &'a str {
        self.args[index].as_str()
    }

    pub(crate) fn println(&mut self, value: impl Display) -> Result<()> {
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    /// Fails unless the device layer is at least `PAIRING_MIN_VERSION`
    pub(crate) fn require_pairing_support(&self) -> Result<()> {
        if self.resolver.layer_version() < PAIRING_MIN_VERSION {
            return Err(ActionError::fail(format!(
                "Pairing operations require device layer v{PAIRING_MIN_VERSION} or greater"
            )));
        }
        Ok(())
    }

    /// Resolves another speaker through the resolver
    pub(crate) fn resolve_speaker(&self, name: &str) -> Option<Box<dyn Device>> {
        self.resolver.resolve(name, self.use_local_cache)
    }
}

/// Library collections listed alphabetically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Playlists,
    Favourites,
}

/// Single values read without arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    QueueSize,
}

/// Operations that take a named playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistOp {
    AddToQueue,
    Delete,
    Clear,
    Create,
}

/// Operations that take a second speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Join,
    StereoPair,
}

/// One processing strategy together with its typed operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Toggle(Switch, Scope),
    NoArgs(Command),
    SingleValue(Reading),
    ListQueue,
    ListTitles(Collection),
    Volume(Scope),
    RampVolume,
    RelativeVolume(Scope),
    TrackInfo,
    PlayMode,
    TransportState,
    PlayFavourite,
    PlayUri,
    SleepTimer,
    Grouping(Grouping),
    AllZones(Command),
    Zones,
    PlayFromQueue,
    RemoveFromQueue,
    SaveQueue,
    Seek,
    Playlist(PlaylistOp),
    LineIn,
    Tone(Tone),
    Balance,
    Reindex,
    Info,
    Groups,
    Wait(PlaybackEvent),
}

impl Strategy {
    /// Validates the context's arguments and performs the action
    pub fn run(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        match *self {
            Strategy::Toggle(switch, scope) => toggle::on_off(ctx, switch, scope),
            Strategy::NoArgs(command) => transport::no_args(ctx, command),
            Strategy::SingleValue(reading) => listing::single_value(ctx, reading),
            Strategy::ListQueue => listing::list_queue(ctx),
            Strategy::ListTitles(collection) => listing::list_titles(ctx, collection),
            Strategy::Volume(scope) => volume::volume(ctx, scope),
            Strategy::RampVolume => volume::ramp(ctx),
            Strategy::RelativeVolume(scope) => volume::relative(ctx, scope),
            Strategy::TrackInfo => listing::track_info(ctx),
            Strategy::PlayMode => transport::play_mode(ctx),
            Strategy::TransportState => transport::transport_state(ctx),
            Strategy::PlayFavourite => library::play_favourite(ctx),
            Strategy::PlayUri => transport::play_uri(ctx),
            Strategy::SleepTimer => transport::sleep_timer(ctx),
            Strategy::Grouping(kind) => topology::group_or_pair(ctx, kind),
            Strategy::AllZones(command) => topology::operate_on_all(ctx, command),
            Strategy::Zones => listing::zones(ctx),
            Strategy::PlayFromQueue => queue::play_from_queue(ctx),
            Strategy::RemoveFromQueue => queue::remove_from_queue(ctx),
            Strategy::SaveQueue => queue::save_queue(ctx),
            Strategy::Seek => transport::seek(ctx),
            Strategy::Playlist(op) => library::playlist(ctx, op),
            Strategy::LineIn => topology::line_in(ctx),
            Strategy::Tone(tone) => volume::tone(ctx, tone),
            Strategy::Balance => volume::balance(ctx),
            Strategy::Reindex => library::reindex(ctx),
            Strategy::Info => listing::info(ctx),
            Strategy::Groups => listing::groups(ctx),
            Strategy::Wait(event) => transport::wait(ctx, event),
        }
    }
}
