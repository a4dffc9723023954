//! Re-entrant command interface
//!
//! Runs one action and hands back its exit status with the captured output
//! and error text, instead of writing to the process streams. This is the
//! entry point for programs embedding the engine, for the poller, and for the
//! REST server.

use tracing::{debug, info};

use crate::device::{Device, SpeakerResolver};
use crate::dispatch::dispatch;
use crate::error::{ActionError, Result};
use crate::strategy::ActionContext;

/// Outcome of one action
///
/// `exit_code` is 0 on success and 1 otherwise. Both text fields have
/// trailing whitespace removed; `error` carries the `Error: ` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output: String,
    pub error: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            output: output.into(),
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            output: String::new(),
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Something that can run an action against a device
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        device: &dyn Device,
        action: &str,
        args: &[String],
        use_local_cache: bool,
    ) -> CommandResult;
}

/// [`CommandExecutor`] backed by the dispatcher
pub struct ActionRunner<'a> {
    resolver: &'a dyn SpeakerResolver,
}

impl<'a> ActionRunner<'a> {
    pub fn new(resolver: &'a dyn SpeakerResolver) -> Self {
        Self { resolver }
    }
}

impl CommandExecutor for ActionRunner<'_> {
    fn execute(
        &self,
        device: &dyn Device,
        action: &str,
        args: &[String],
        use_local_cache: bool,
    ) -> CommandResult {
        run_command(device, action, args, self.resolver, use_local_cache)
    }
}

/// Runs `action` against `device`, capturing everything it prints
pub fn run_command(
    device: &dyn Device,
    action: &str,
    args: &[String],
    resolver: &dyn SpeakerResolver,
    use_local_cache: bool,
) -> CommandResult {
    let mut out = Vec::new();
    let outcome = {
        let mut ctx =
            ActionContext::new(device, action, args, resolver, &mut out).with_local_cache(use_local_cache);
        dispatch(&mut ctx)
    };
    let output = String::from_utf8_lossy(&out).trim_end().to_string();

    let result = match outcome {
        Ok(true) => CommandResult::success(output),
        Ok(false) => CommandResult {
            exit_code: 1,
            output,
            error: format!("Error: Action '{action}' not found"),
        },
        Err(e) => CommandResult {
            exit_code: e.exit_code(),
            output,
            error: format!("Error: {}", e.to_string().trim_end()),
        },
    };
    debug!(
        action,
        exit_code = result.exit_code,
        error = %result.error,
        "command finished"
    );
    result
}

/// Resolves `speaker_name` and runs `action` against it
pub fn run_named_command(
    resolver: &dyn SpeakerResolver,
    speaker_name: &str,
    action: &str,
    args: &[String],
    use_local_cache: bool,
) -> CommandResult {
    match get_speaker(resolver, speaker_name, use_local_cache) {
        Ok(device) => run_command(device.as_ref(), action, args, resolver, use_local_cache),
        Err(e) => {
            info!(speaker = speaker_name, "speaker not found");
            CommandResult::failure(e.to_string())
        }
    }
}

/// Looks up a speaker by name or IP address
pub fn get_speaker(
    resolver: &dyn SpeakerResolver,
    name: &str,
    use_local_cache: bool,
) -> Result<Box<dyn Device>> {
    resolver
        .resolve(name, use_local_cache)
        .ok_or_else(|| ActionError::fail(format!("Speaker '{name}' not found")))
}
