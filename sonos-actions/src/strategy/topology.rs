use tracing::{debug, warn};

use crate::args::on_off;
use crate::device::{Command, Device};
use crate::error::{ActionError, Result};

use super::{ActionContext, Grouping};

fn resolve_peer(ctx: &ActionContext<'_>, name: &str) -> Result<Box<dyn Device>> {
    ctx.resolve_speaker(name)
        .ok_or_else(|| ActionError::fail(format!("Speaker {name} not found")))
}

/// Joins the speaker to another speaker's group, or pairs the two
pub(super) fn group_or_pair(ctx: &mut ActionContext<'_>, kind: Grouping) -> Result<()> {
    ctx.arity(&[1], "1")?;
    if kind == Grouping::StereoPair {
        ctx.require_pairing_support()?;
    }
    let peer = resolve_peer(ctx, ctx.arg(0))?;
    match kind {
        Grouping::Join => ctx.device.join(peer.as_ref())?,
        Grouping::StereoPair => ctx.device.create_stereo_pair(peer.as_ref())?,
    }
    Ok(())
}

/// Runs `command` on every visible zone
///
/// A zone that fails is logged and skipped; the remaining zones are still
/// processed.
pub(super) fn operate_on_all(ctx: &mut ActionContext<'_>, command: Command) -> Result<()> {
    ctx.arity(&[0], "no")?;
    for zone in ctx.device.all_zones()? {
        let ip = zone.ip_address();
        match zone.is_visible() {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(zone = %ip, error = %e, "skipping zone with unknown visibility");
                continue;
            }
        }
        match zone.invoke(command) {
            Ok(()) => debug!(zone = %ip, command = command.as_str(), "zone command sent"),
            Err(e) => warn!(zone = %ip, command = command.as_str(), error = %e, "zone command failed"),
        }
    }
    Ok(())
}

pub(super) fn line_in(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    let Some(arg) = ctx.args.first() else {
        let playing = ctx.device.is_playing_line_in()?;
        return ctx.println(on_off(playing));
    };
    if arg.eq_ignore_ascii_case("on") {
        ctx.device.switch_to_line_in(None)?;
    } else {
        let source = resolve_peer(ctx, arg)?;
        ctx.device.switch_to_line_in(Some(source.as_ref()))?;
    }
    Ok(())
}
