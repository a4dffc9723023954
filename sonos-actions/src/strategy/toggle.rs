use crate::args::{self, parse_on_off};
use crate::device::{Scope, Switch};
use crate::error::Result;

use super::ActionContext;

/// Reads or writes a boolean switch on the speaker or its group
pub(super) fn on_off(ctx: &mut ActionContext<'_>, switch: Switch, scope: Scope) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    let desired = match ctx.args.first() {
        Some(arg) => Some(parse_on_off(ctx.action, arg)?),
        None => None,
    };

    let group;
    let target = match scope {
        Scope::Speaker => ctx.device,
        Scope::Group => {
            group = ctx.device.group()?;
            group.as_ref()
        }
    };

    match desired {
        Some(on) => target.set_switch(switch, on)?,
        None => {
            let state = target.switch(switch)?;
            ctx.println(args::on_off(state))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::device::{Scope, Switch};
    use crate::error::ActionError;
    use crate::strategy::test_support::run;
    use crate::strategy::Strategy;
    use crate::testing::{FakeNetwork, FakeSpeaker};

    #[rstest]
    #[case(Switch::Mute)]
    #[case(Switch::CrossFade)]
    #[case(Switch::Loudness)]
    #[case(Switch::StatusLight)]
    #[case(Switch::NightMode)]
    #[case(Switch::DialogMode)]
    fn test_write_then_read_round_trips(#[case] switch: Switch) {
        let network = FakeNetwork::new();
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let strategy = Strategy::Toggle(switch, Scope::Speaker);

        run(strategy, &speaker, &network, "toggle", &["on"]).unwrap();
        assert_eq!(run(strategy, &speaker, &network, "toggle", &[]).unwrap(), "on\n");

        run(strategy, &speaker, &network, "toggle", &["OFF"]).unwrap();
        assert_eq!(run(strategy, &speaker, &network, "toggle", &[]).unwrap(), "off\n");
    }

    #[test]
    fn test_write_produces_no_output() {
        let network = FakeNetwork::new();
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let output = run(
            Strategy::Toggle(Switch::Mute, Scope::Speaker),
            &speaker,
            &network,
            "mute",
            &["on"],
        )
        .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_other_literal_is_a_type_error_and_leaves_state() {
        let network = FakeNetwork::new();
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let err = run(
            Strategy::Toggle(Switch::Mute, Scope::Speaker),
            &speaker,
            &network,
            "mute",
            &["maybe"],
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::WrongType { .. }));
        assert!(speaker.calls().is_empty());
    }

    #[test]
    fn test_two_arguments_is_an_arity_error() {
        let network = FakeNetwork::new();
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        let err = run(
            Strategy::Toggle(Switch::Mute, Scope::Speaker),
            &speaker,
            &network,
            "mute",
            &["on", "off"],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Action 'mute' takes 0 or 1 parameter(s)");
    }

    #[test]
    fn test_group_mute_targets_group() {
        let network = FakeNetwork::new();
        let speaker = FakeSpeaker::new("Kitchen", "192.168.1.10");
        run(
            Strategy::Toggle(Switch::Mute, Scope::Group),
            &speaker,
            &network,
            "group_mute",
            &["on"],
        )
        .unwrap();

        assert!(!speaker.state().switch(Switch::Mute));
        assert!(speaker.group_proxy().state().switch(Switch::Mute));
    }
}
