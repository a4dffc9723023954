//! Sonos Actions
//!
//! The action engine behind a Sonos command-line tool: short action names
//! such as `volume`, `pf` or `lq` are looked up in a registry, their
//! arguments are checked, and only then is the speaker called.
//!
//! # Architecture
//!
//! ```text
//! run_command ─► dispatch ─► registry ─► Strategy::run ─► Device
//!      ▲                                                    │
//!      └──────────── track_follow (state / track / wait) ◄──┘
//! ```
//!
//! Discovery and the network protocol are not part of this crate. The caller
//! supplies a [`Device`] for the speaker being controlled and a
//! [`SpeakerResolver`] for actions that name a second speaker.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sonos_actions::{run_named_command, CommandResult};
//!
//! let result = run_named_command(&resolver, "Kitchen", "volume", &["25".into()], false);
//! if result.is_success() {
//!     println!("{}", result.output);
//! } else {
//!     eprintln!("{}", result.error);
//! }
//! ```
//!
//! # Following Tracks
//!
//! ```rust,ignore
//! use sonos_actions::{track_follow, ActionRunner, FollowOptions};
//!
//! let runner = ActionRunner::new(&resolver);
//! track_follow(speaker.as_ref(), &runner, &FollowOptions::default(), &mut std::io::stdout())?;
//! ```

pub mod api;
pub mod args;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod follow;
pub mod logging;
pub mod registry;
pub mod strategy;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use api::{get_speaker, run_command, run_named_command, ActionRunner, CommandExecutor, CommandResult};
pub use config::{Config, ConfigError, FollowConfig, RestConfig};
pub use device::{
    Command, Device, DeviceError, DeviceResult, LayerVersion, MusicItem, PlayMode, PlayUri,
    PlaybackEvent, QueueItem, Scope, SpeakerResolver, Switch, Tone, TransportInfo, ZoneGroup,
};
pub use dispatch::dispatch;
pub use error::{ActionError, Result};
pub use follow::{format_track, track_follow, FollowExit, FollowOptions};
pub use logging::{init_logging, set_log_level, LoggingError, LoggingMode};
pub use registry::{action_names, lookup, ActionEntry};
pub use strategy::{ActionContext, Strategy};
