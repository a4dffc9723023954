use tracing::debug;

use crate::args::parse_in_range;
use crate::device::{Command, PlayMode, PlayUri, PlaybackEvent};
use crate::error::{ActionError, Result};

use super::ActionContext;

/// Longest sleep timer the device accepts, in seconds
pub(super) const MAX_SLEEP_SECONDS: i64 = 86_399;

pub(super) fn no_args(ctx: &mut ActionContext<'_>, command: Command) -> Result<()> {
    ctx.arity(&[0], "no")?;
    if command == Command::SeparateStereoPair {
        ctx.require_pairing_support()?;
    }
    debug!(action = ctx.action, command = command.as_str(), "invoking command");
    ctx.device.invoke(command)?;
    Ok(())
}

pub(super) fn play_mode(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    match ctx.args.first() {
        Some(arg) => {
            let mode: PlayMode = arg
                .parse()
                .map_err(|_| ActionError::wrong_type(ctx.action, PlayMode::NAMES.join(", ")))?;
            ctx.device.set_play_mode(mode)?;
        }
        None => {
            let mode = ctx.device.play_mode()?;
            ctx.println(mode)?;
        }
    }
    Ok(())
}

pub(super) fn transport_state(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let info = ctx.device.transport_info()?;
    ctx.println(info.current_transport_state)
}

pub(super) fn play_uri(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1, 2], "1 or 2")?;
    let uri = ctx.arg(0);
    let force_radio = uri
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"));
    let request = PlayUri {
        uri: uri.to_string(),
        metadata: None,
        title: ctx.args.get(1).cloned(),
        force_radio,
    };
    ctx.device.play_uri(&request)?;
    Ok(())
}

pub(super) fn seek(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1], "1")?;
    ctx.device
        .seek(ctx.arg(0))
        .map_err(|_| ActionError::wrong_type(ctx.action, "HH:MM:SS on a seekable source"))
}

pub(super) fn sleep_timer(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    match ctx.args.first() {
        Some(arg) => {
            let expected = "integer > 0";
            let seconds =
                parse_in_range(ctx.action, arg, 0..=MAX_SLEEP_SECONDS, expected, expected)?;
            ctx.device.set_sleep_timer(seconds as u32)?;
        }
        None => {
            let remaining = ctx.device.sleep_timer()?.unwrap_or(0);
            ctx.println(remaining)?;
        }
    }
    Ok(())
}

/// Blocks until the device reports `event`
pub(super) fn wait(ctx: &mut ActionContext<'_>, event: PlaybackEvent) -> Result<()> {
    ctx.arity(&[0], "no")?;
    debug!(action = ctx.action, ?event, "waiting for playback event");
    ctx.device.wait_for(event)?;
    Ok(())
}
