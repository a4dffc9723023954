//! Track follower
//!
//! Prints the current track each time it changes. The loop talks to the
//! speaker only through a [`CommandExecutor`], using the `state`, `track`,
//! `wait_start` and `wait_end_track` actions, so it behaves exactly like a
//! user typing those commands.

use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use crate::api::{CommandExecutor, CommandResult};
use crate::config::FollowConfig;
use crate::device::Device;
use crate::error::{ActionError, Result};

/// Track fields that change while playing or carry no meaning for a reader
const DROPPED_FIELDS: [&str; 4] = ["position", "album_art", "metadata", "uri"];

/// Field renames applied to the printed track
const RELABELLED_FIELDS: [(&str, &str); 2] = [
    ("playlist_position", "queue_position"),
    ("duration", "track_length"),
];

/// Transport states treated as "not playing"
const HALTED_STATES: [&str; 2] = ["STOPPED", "PAUSED_PLAYBACK"];

/// Options for [`track_follow`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowOptions {
    /// Return as soon as playback is stopped or paused
    pub break_on_pause: bool,
    /// Pause after each track change so the speaker state can settle
    pub cooldown: Duration,
    pub use_local_cache: bool,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self {
            break_on_pause: true,
            cooldown: Duration::from_secs(3),
            use_local_cache: false,
        }
    }
}

impl From<&FollowConfig> for FollowOptions {
    fn from(config: &FollowConfig) -> Self {
        Self {
            break_on_pause: config.break_on_pause,
            cooldown: Duration::from_secs(config.cooldown_secs),
            use_local_cache: false,
        }
    }
}

impl FollowOptions {
    pub fn with_local_cache(mut self, use_local_cache: bool) -> Self {
        self.use_local_cache = use_local_cache;
        self
    }
}

/// Why [`track_follow`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowExit {
    /// Playback stopped or paused while `break_on_pause` was set
    PlaybackHalted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowState {
    Idle,
    WaitingForStart,
    PrintingAndWaitingForTrackEnd,
}

/// Follows `device`, printing each new track to `out`
///
/// Runs until playback halts with `break_on_pause` set, or until the
/// transport state can no longer be read. Other failures are printed or
/// logged and the loop carries on.
pub fn track_follow(
    device: &dyn Device,
    executor: &dyn CommandExecutor,
    options: &FollowOptions,
    out: &mut dyn Write,
) -> Result<FollowExit> {
    let run = |action: &str| executor.execute(device, action, &[], options.use_local_cache);
    let mut state = FollowState::Idle;

    loop {
        state = match state {
            FollowState::Idle => {
                let transport = run("state");
                if !transport.is_success() {
                    return Err(ActionError::Command(transport.error));
                }
                if HALTED_STATES.contains(&transport.output.trim()) {
                    writeln!(out, "[{}] Playback is stopped or paused", timestamp())?;
                    if options.break_on_pause {
                        info!("playback is stopped or paused, returning");
                        return Ok(FollowExit::PlaybackHalted);
                    }
                    FollowState::WaitingForStart
                } else {
                    FollowState::PrintingAndWaitingForTrackEnd
                }
            }
            FollowState::WaitingForStart => {
                info!("waiting for playback to start");
                log_failure("wait_start", &run("wait_start"));
                info!("playback started");
                FollowState::PrintingAndWaitingForTrackEnd
            }
            FollowState::PrintingAndWaitingForTrackEnd => {
                let track = run("track");
                if track.is_success() {
                    writeln!(out, "{}", format_track(&track.output, &timestamp()))?;
                } else {
                    writeln!(out, "{}", track.error)?;
                }
                out.flush()?;

                info!("waiting for end of track");
                log_failure("wait_end_track", &run("wait_end_track"));
                if !options.cooldown.is_zero() {
                    info!(cooldown = ?options.cooldown, "waiting for playback to settle");
                    thread::sleep(options.cooldown);
                }
                FollowState::Idle
            }
        };
    }
}

fn log_failure(action: &str, result: &CommandResult) {
    if !result.is_success() {
        warn!(action, error = %result.error, "wait primitive failed");
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Reformats `track` output for the follower
///
/// Drops volatile fields, applies the field renames, and puts a `time` line
/// first.
pub fn format_track(track: &str, time: &str) -> String {
    let mut lines = vec![format!("  time: {time}")];
    for line in track.lines() {
        let Some((key, value)) = line.trim_start().split_once(": ").or_else(|| {
            line.trim_start()
                .strip_suffix(':')
                .map(|key| (key, ""))
        }) else {
            lines.push(line.to_string());
            continue;
        };
        if DROPPED_FIELDS.contains(&key) {
            continue;
        }
        let key = RELABELLED_FIELDS
            .iter()
            .find(|(from, _)| *from == key)
            .map_or(key, |&(_, to)| to);
        lines.push(format!("  {key}: {value}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSpeaker, ScriptedExecutor};

    const TRACK: &str = "  album: Kind of Blue\n  album_art: http://192.168.1.10:1400/art.jpg\n  artist: Miles Davis\n  duration: 0:09:22\n  playlist_position: 2\n  position: 0:01:12\n  title: So What";

    fn options(break_on_pause: bool) -> FollowOptions {
        FollowOptions {
            break_on_pause,
            cooldown: Duration::ZERO,
            use_local_cache: false,
        }
    }

    fn is_notice(line: &str) -> bool {
        line.len() == "[00:00:00] Playback is stopped or paused".len()
            && line.starts_with('[')
            && line.ends_with("] Playback is stopped or paused")
    }

    #[test]
    fn test_format_track() {
        let formatted = format_track(TRACK, "12:34:56");
        assert_eq!(
            formatted,
            "  time: 12:34:56\n  album: Kind of Blue\n  artist: Miles Davis\n  track_length: 0:09:22\n  queue_position: 2\n  title: So What"
        );
    }

    #[test]
    fn test_format_track_keeps_empty_values() {
        let formatted = format_track("  album: \n  title: Radio", "00:00:01");
        assert_eq!(formatted, "  time: 00:00:01\n  album: \n  title: Radio");
    }

    #[test]
    fn test_paused_with_break_prints_one_notice() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let executor = ScriptedExecutor::new().ok("state", "PAUSED_PLAYBACK");
        let mut out = Vec::new();

        let exit = track_follow(&speaker, &executor, &options(true), &mut out).unwrap();

        assert_eq!(exit, FollowExit::PlaybackHalted);
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(is_notice(lines[0]), "unexpected notice {:?}", lines[0]);
        assert_eq!(executor.calls(), vec!["state"]);
    }

    #[test]
    fn test_prints_track_then_stops_on_pause() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let executor = ScriptedExecutor::new()
            .ok("state", "PLAYING")
            .ok("state", "STOPPED")
            .ok("track", TRACK)
            .ok("wait_end_track", "");
        let mut out = Vec::new();

        track_follow(&speaker, &executor, &options(true), &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("  time: "));
        assert!(output.contains("  track_length: 0:09:22\n"));
        assert!(!output.contains("position: 0:01:12"));
        assert!(is_notice(output.lines().last().unwrap()));
        assert_eq!(
            executor.calls(),
            vec!["state", "track", "wait_end_track", "state"]
        );
    }

    #[test]
    fn test_waits_for_start_without_break() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let executor = ScriptedExecutor::new()
            .ok("state", "STOPPED")
            .respond("state", CommandResult::failure("Error: Network error: timed out"))
            .ok("wait_start", "")
            .respond("track", CommandResult::failure("Error: no track"))
            .ok("wait_end_track", "");
        let mut out = Vec::new();

        let err = track_follow(&speaker, &executor, &options(false), &mut out).unwrap_err();

        assert!(matches!(err, ActionError::Command(ref msg) if msg == "Error: Network error: timed out"));
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(is_notice(lines[0]));
        assert_eq!(lines[1], "Error: no track");
        assert_eq!(
            executor.calls(),
            vec!["state", "wait_start", "track", "wait_end_track", "state"]
        );
    }

    #[test]
    fn test_options_from_config() {
        let config = FollowConfig {
            break_on_pause: false,
            cooldown_secs: 1,
        };
        let options = FollowOptions::from(&config);
        assert!(!options.break_on_pause);
        assert_eq!(options.cooldown, Duration::from_secs(1));
        assert_eq!(FollowOptions::default().cooldown, Duration::from_secs(3));
    }
}
