use crate::args::parse_in_range;
use crate::device::{Device, Scope, Tone};
use crate::error::Result;

use super::ActionContext;

/// External balance setting for a `(left, right)` pair
///
/// -100 is full left, 100 full right, 0 centred.
pub fn balance_setting((left, right): (u8, u8)) -> i64 {
    i64::from(right) - i64::from(left)
}

/// Inverse of [`balance_setting`] for settings in -100..=100
pub fn balance_from_setting(setting: i64) -> (u8, u8) {
    let left = (-setting).clamp(0, 100) as u8;
    let right = setting.clamp(0, 100) as u8;
    (left, right)
}

/// Runs `f` against the speaker or its group proxy
fn with_target<T>(
    ctx: &ActionContext<'_>,
    scope: Scope,
    f: impl FnOnce(&dyn Device) -> Result<T>,
) -> Result<T> {
    match scope {
        Scope::Speaker => f(ctx.device),
        Scope::Group => {
            let group = ctx.device.group()?;
            f(group.as_ref())
        }
    }
}

pub(super) fn volume(ctx: &mut ActionContext<'_>, scope: Scope) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    match ctx.args.first() {
        Some(arg) => {
            let level = parse_in_range(ctx.action, arg, 0..=100, "integer from 0 to 100", "0 to 100")?;
            with_target(ctx, scope, |target| Ok(target.set_volume(level as u8)?))
        }
        None => {
            let level = with_target(ctx, scope, |target| Ok(target.volume()?))?;
            ctx.println(level)
        }
    }
}

pub(super) fn ramp(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[1], "1")?;
    let level = parse_in_range(ctx.action, ctx.arg(0), 0..=100, "integer from 0 to 100", "0 to 100")?;
    let seconds = ctx.device.ramp_to_volume(level as u8)?;
    ctx.println(seconds)
}

pub(super) fn relative(ctx: &mut ActionContext<'_>, scope: Scope) -> Result<()> {
    ctx.arity(&[1], "1")?;
    let expected = "integer from -100 to 100";
    let delta = parse_in_range(ctx.action, ctx.arg(0), -100..=100, expected, expected)?;
    with_target(ctx, scope, |target| {
        let current = i64::from(target.volume()?);
        let level = (current + delta).clamp(0, 100);
        target.set_volume(level as u8)?;
        Ok(())
    })
}

pub(super) fn tone(ctx: &mut ActionContext<'_>, tone: Tone) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    match ctx.args.first() {
        Some(arg) => {
            let expected = "integer from -10 to 10";
            let level = parse_in_range(ctx.action, arg, -10..=10, expected, expected)?;
            ctx.device.set_tone(tone, level as i8)?;
            Ok(())
        }
        None => {
            let level = ctx.device.tone(tone)?;
            ctx.println(level)
        }
    }
}

pub(super) fn balance(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0, 1], "0 or 1")?;
    match ctx.args.first() {
        Some(arg) => {
            let expected = "integer from -100 to 100";
            let setting = parse_in_range(ctx.action, arg, -100..=100, expected, expected)?;
            ctx.device.set_balance(balance_from_setting(setting))?;
            Ok(())
        }
        None => {
            let setting = balance_setting(ctx.device.balance()?);
            ctx.println(setting)
        }
    }
}
