use tracing::debug;

use crate::args::find_by_title;
use crate::device::{DeviceError, DeviceResult, MusicItem, PlayUri};
use crate::error::{ActionError, Result};

use super::{ActionContext, PlaylistOp};

/// Plays a favourite by title
///
/// Some favourites play directly from their URI; the rest are queued as the
/// next item and played from there.
pub(super) fn play_favourite(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1], "1")?;
    let name = ctx.arg(0);
    let favourites = ctx.device.favourites()?;
    let favourite = find_by_title(&favourites, name)
        .ok_or_else(|| ActionError::fail(format!("Favourite '{name}' not found")))?;

    let first = match play_direct(ctx, favourite) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    debug!(title = %favourite.title, error = %first, "direct play failed, queueing favourite");

    let queued = ctx
        .device
        .add_to_queue(favourite, true)
        .and_then(|index| ctx.device.play_from_queue(index, true));
    match queued {
        Ok(()) => Ok(()),
        Err(second) => Err(ActionError::FavouriteUnplayable { first, second }),
    }
}

fn play_direct(ctx: &ActionContext<'_>, favourite: &MusicItem) -> DeviceResult<()> {
    let uri = favourite.uri.as_ref().ok_or_else(|| {
        DeviceError::Unsupported(format!("'{}' has no playable URI", favourite.title))
    })?;
    ctx.device.play_uri(&PlayUri {
        uri: uri.clone(),
        metadata: favourite.metadata.clone(),
        title: None,
        force_radio: false,
    })
}

pub(super) fn playlist(ctx: &mut ActionContext<'_>, op: PlaylistOp) -> Result<()> {
    ctx.arity(&[1], "1")?;
    let name = ctx.arg(0);
    match op {
        PlaylistOp::Create => ctx.device.create_playlist(name)?,
        PlaylistOp::AddToQueue => {
            let playlist = find_playlist(ctx, name)?;
            ctx.device.add_to_queue(&playlist, false)?;
        }
        PlaylistOp::Delete => ctx.device.remove_playlist(&find_playlist(ctx, name)?)?,
        PlaylistOp::Clear => ctx.device.clear_playlist(&find_playlist(ctx, name)?)?,
    }
    Ok(())
}

fn find_playlist(ctx: &ActionContext<'_>, name: &str) -> Result<MusicItem> {
    let playlists = ctx.device.playlists()?;
    find_by_title(&playlists, name)
        .cloned()
        .ok_or_else(|| ActionError::fail(format!("Playlist {name} not found")))
}

pub(super) fn reindex(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    ctx.device.start_library_update()?;
    Ok(())
}
