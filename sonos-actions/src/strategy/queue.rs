use crate::args::parse_int;
use crate::error::{ActionError, Result};

use super::ActionContext;

/// Plays the 1-based queue position, or the head of the queue with no argument
pub(super) fn play_from_queue(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    let index = match ctx.args.first() {
        None => 0,
        Some(arg) => {
            let position = parse_int(ctx.action, arg, "integer")?;
            let size = ctx.device.queue_size()?;
            if !(1..=size as i64).contains(&position) {
                return Err(ActionError::index_out_of_range(
                    position,
                    size,
                    format!("Queue index '{arg}' is out of range"),
                ));
            }
            (position - 1) as usize
        }
    };
    ctx.device.play_from_queue(index, true)?;
    Ok(())
}

pub(super) fn remove_from_queue(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1], "1")?;
    let position = parse_int(ctx.action, ctx.arg(0), "integer")?;
    let size = ctx.device.queue_size()?;
    if !(1..=size as i64).contains(&position) {
        return Err(ActionError::index_out_of_range(
            position,
            size,
            format!("Queue index should be between 1 and {size}"),
        ));
    }
    ctx.device.remove_from_queue((position - 1) as usize)?;
    Ok(())
}

pub(super) fn save_queue(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1], "1")?;
    ctx.device.create_playlist_from_queue(ctx.arg(0))?;
    Ok(())
}
