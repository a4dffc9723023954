use tracing::debug;

use crate::error::Result;
use crate::registry;
use crate::strategy::ActionContext;

/// Runs the action named in `ctx`
///
/// Returns `Ok(false)` without touching the device when the name is not
/// registered; reporting that is up to the caller. All validation happens in
/// the bound strategy.
pub fn dispatch(ctx: &mut ActionContext<'_>) -> Result<bool> {
    let Some(entry) = registry::lookup(ctx.action) else {
        debug!(action = ctx.action, "unrecognised action");
        return Ok(false);
    };
    debug!(
        action = ctx.action,
        operation = entry.operation,
        args = ?ctx.args,
        "dispatching action"
    );
    entry.strategy.run(ctx)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNetwork, FakeSpeaker};

    fn dispatch_with(speaker: &FakeSpeaker, action: &str, args: &[&str]) -> (Result<bool>, String) {
        let network = FakeNetwork::new();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut out = Vec::new();
        let result = {
            let mut ctx = ActionContext::new(speaker, action, &args, &network, &mut out);
            dispatch(&mut ctx)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_unknown_action_is_not_recognised() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let (result, output) = dispatch_with(&speaker, "fly", &["high"]);
        assert!(!result.unwrap());
        assert!(output.is_empty());
        assert!(speaker.calls().is_empty());
    }

    #[test]
    fn test_volume_read() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        speaker.state().volume = 37;
        let (result, output) = dispatch_with(&speaker, "volume", &[]);
        assert!(result.unwrap());
        assert_eq!(output, "37\n");
        assert!(speaker.calls().is_empty());
    }

    #[test]
    fn test_volume_out_of_range_leaves_device() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        speaker.state().volume = 37;
        let (result, _) = dispatch_with(&speaker, "vol", &["150"]);
        assert!(result.unwrap_err().is_usage());
        assert_eq!(speaker.state().volume, 37);
    }

    #[test]
    fn test_synonym_uses_same_strategy() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let (result, _) = dispatch_with(&speaker, "v", &["12"]);
        assert!(result.unwrap());
        assert_eq!(speaker.calls(), vec!["set_volume(12)"]);
    }

    #[test]
    fn test_balance_scenario() {
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        dispatch_with(&speaker, "balance", &["-100"]).0.unwrap();
        assert_eq!(speaker.state().balance, (100, 0));
        let (_, output) = dispatch_with(&speaker, "balance", &[]);
        assert_eq!(output, "-100\n");
    }
}
