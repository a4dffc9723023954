//! HTTP routes
//!
//! | Path | Response |
//! |---|---|
//! | `GET /` | `{"info": ...}` |
//! | `GET /rediscover` | `{"Speakers discovered": [...]}` |
//! | `GET /<speaker>/<action>[/<arg>...]` | [`CommandResponse`] |
//!
//! Anything else gets a JSON `{"error": ...}` body with a matching status.

use std::convert::Infallible;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::json;
use sonos_actions::{get_speaker, run_command, CommandResult, SpeakerResolver};
use tracing::{debug, info, warn};
use warp::http::StatusCode;
use warp::path::Tail;
use warp::{Filter, Rejection, Reply};

use crate::directory::SpeakerDirectory;
use crate::error::RestError;

/// Most arguments a command path may carry after the action
pub const MAX_ARGS: usize = 3;

/// A command parsed from a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub speaker: String,
    pub action: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    /// Parses `speaker/action[/arg...]`, percent-decoding every segment
    ///
    /// One trailing slash is ignored. Empty segments between slashes are
    /// empty arguments. Returns `Ok(None)` when the path has too few or too
    /// many segments, or an empty speaker or action.
    pub fn from_path(path: &str) -> Result<Option<Self>, RestError> {
        let path = path.strip_suffix('/').unwrap_or(path);
        let segments = path
            .split('/')
            .map(decode_segment)
            .collect::<Result<Vec<_>, _>>()?;

        match segments.as_slice() {
            [speaker, action, args @ ..]
                if !speaker.is_empty() && !action.is_empty() && args.len() <= MAX_ARGS =>
            {
                Ok(Some(Self {
                    speaker: speaker.clone(),
                    action: action.clone(),
                    args: args.to_vec(),
                }))
            }
            _ => Ok(None),
        }
    }
}

fn decode_segment(segment: &str) -> Result<String, RestError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RestError::InvalidSegment(segment.to_string()))
}

/// JSON body returned for every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    /// The speaker's own name when it resolved, else the name requested
    pub speaker: String,
    pub action: String,
    pub args: Vec<String>,
    pub exit_code: i32,
    pub result: String,
    pub error_msg: String,
}

/// Runs `request` against the speaker it names
///
/// Blocks on device calls; the server runs it on the blocking pool.
pub fn execute(
    resolver: &dyn SpeakerResolver,
    request: CommandRequest,
    use_local_cache: bool,
) -> CommandResponse {
    let (speaker, result) = match get_speaker(resolver, &request.speaker, use_local_cache) {
        Ok(device) => {
            let name = device
                .player_name()
                .unwrap_or_else(|_| request.speaker.clone());
            let result = run_command(
                device.as_ref(),
                &request.action,
                &request.args,
                resolver,
                use_local_cache,
            );
            (name, result)
        }
        Err(e) => (request.speaker.clone(), CommandResult::failure(e.to_string())),
    };

    CommandResponse {
        speaker,
        action: request.action,
        args: request.args,
        exit_code: result.exit_code,
        result: result.output,
        error_msg: result.error,
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Builds the full route tree, with rejections turned into JSON replies
pub fn routes<D>(
    directory: Arc<D>,
    use_local_cache: bool,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone
where
    D: SpeakerDirectory + 'static,
{
    let info_route = warp::get().and(warp::path::end()).map(|| {
        warp::reply::json(&json!({
            "info": format!("Sonos Actions HTTP REST API Server v{}", crate::VERSION)
        }))
    });

    let rediscover_route = warp::get()
        .and(warp::path!("rediscover"))
        .and(with_directory(directory.clone()))
        .and_then(handle_rediscover::<D>);

    let command_route = warp::get()
        .and(warp::path::tail())
        .and(with_directory(directory))
        .and(warp::any().map(move || use_local_cache))
        .and_then(handle_command::<D>);

    info_route
        .or(rediscover_route)
        .or(command_route)
        .recover(handle_rejection)
}

fn with_directory<D>(directory: Arc<D>) -> impl Filter<Extract = (Arc<D>,), Error = Infallible> + Clone
where
    D: SpeakerDirectory + 'static,
{
    warp::any().map(move || directory.clone())
}

async fn handle_rediscover<D>(directory: Arc<D>) -> Result<impl Reply, Rejection>
where
    D: SpeakerDirectory + 'static,
{
    info!("rediscovering speakers");
    let names = tokio::task::spawn_blocking(move || {
        directory.rediscover();
        directory.speaker_names()
    })
    .await
    .map_err(|e| warp::reject::custom(ServerFailure(RestError::from(e).to_string())))?;

    debug!(count = names.len(), "speakers discovered");
    Ok(warp::reply::json(&json!({ "Speakers discovered": names })))
}

async fn handle_command<D>(
    tail: Tail,
    directory: Arc<D>,
    use_local_cache: bool,
) -> Result<impl Reply, Rejection>
where
    D: SpeakerDirectory + 'static,
{
    let request = CommandRequest::from_path(tail.as_str())
        .map_err(|e| warp::reject::custom(BadSegment(e.to_string())))?
        .ok_or_else(warp::reject::not_found)?;

    info!(speaker = %request.speaker, action = %request.action, args = ?request.args, "command request");
    let response =
        tokio::task::spawn_blocking(move || execute(directory.as_ref(), request, use_local_cache))
            .await
            .map_err(|e| warp::reject::custom(ServerFailure(RestError::from(e).to_string())))?;

    if response.exit_code != 0 {
        debug!(error = %response.error_msg, "command failed");
    }
    Ok(warp::reply::json(&response))
}

// ============================================================================
// Rejections
// ============================================================================

/// A path segment that could not be decoded
#[derive(Debug)]
struct BadSegment(String);

impl warp::reject::Reject for BadSegment {}

/// The command task died before replying
#[derive(Debug)]
struct ServerFailure(String);

impl warp::reject::Reject for ServerFailure {}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if let Some(BadSegment(message)) = err.find::<BadSegment>() {
        (StatusCode::BAD_REQUEST, message.clone())
    } else if let Some(ServerFailure(message)) = err.find::<ServerFailure>() {
        warn!(error = %message, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            "Not found: use /<speaker>/<action>[/<arg>...]".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        code,
    ))
}
