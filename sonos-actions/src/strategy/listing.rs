use std::collections::BTreeMap;

use crate::device::{Switch, Tone};
use crate::error::Result;

use super::volume::balance_setting;
use super::{ActionContext, Collection, Reading};

/// Largest queue page fetched for listing
pub(super) const MAX_QUEUE_ITEMS: usize = 1000;

/// Track info keys that are never printed
const HIDDEN_TRACK_KEYS: [&str; 2] = ["metadata", "uri"];

pub(super) fn single_value(ctx: &mut ActionContext<'_>, reading: Reading) -> Result<()> {
    ctx.arity(&[0], "no")?;
    match reading {
        Reading::QueueSize => {
            let size = ctx.device.queue_size()?;
            ctx.println(size)
        }
    }
}

pub(super) fn list_queue(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let queue = ctx.device.queue(MAX_QUEUE_ITEMS)?;
    for (i, item) in queue.iter().enumerate() {
        ctx.println(format_args!(
            "{:3}: Artist: {} | Album: {} | Title: {}",
            i + 1,
            item.creator.as_deref().unwrap_or_default(),
            item.album.as_deref().unwrap_or_default(),
            item.title.as_deref().unwrap_or_default(),
        ))?;
    }
    Ok(())
}

pub(super) fn list_titles(ctx: &mut ActionContext<'_>, collection: Collection) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let items = match collection {
        Collection::Playlists => ctx.device.playlists()?,
        Collection::Favourites => ctx.device.favourites()?,
    };
    let mut titles: Vec<String> = items.into_iter().map(|item| item.title).collect();
    titles.sort();
    for (i, title) in titles.iter().enumerate() {
        ctx.println(format_args!("{:3}: {}", i + 1, title))?;
    }
    Ok(())
}

pub(super) fn track_info(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let track = ctx.device.current_track_info()?;
    for (key, value) in track
        .iter()
        .filter(|(key, _)| !HIDDEN_TRACK_KEYS.contains(&key.as_str()))
    {
        ctx.println(format_args!("  {key}: {value}"))?;
    }
    Ok(())
}

/// Prints `name (ip)` for visible zones, or all zones when the action name
/// mentions "all"
pub(super) fn zones(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let zones = if ctx.action.contains("all") {
        ctx.device.all_zones()?
    } else {
        ctx.device.visible_zones()?
    };
    for zone in zones {
        let name = zone.player_name()?;
        ctx.println(format_args!("{} ({})", name, zone.ip_address()))?;
    }
    Ok(())
}

/// Models that only bridge the network and have no rendering state
fn is_network_only(model_name: &str) -> bool {
    let model = model_name.to_lowercase();
    model.contains("boost") || model.contains("bridge")
}

/// Collects the extended info dump for the context's speaker
fn collect_info(ctx: &ActionContext<'_>) -> Result<BTreeMap<String, String>> {
    let device = ctx.device;
    let mut info = device.speaker_info()?;
    let model = info.get("model_name").cloned().unwrap_or_default();
    if is_network_only(&model) {
        return Ok(info);
    }

    let mut put = |key: &str, value: String| {
        info.insert(key.to_string(), value);
    };
    let coordinator = device.is_coordinator()?;
    let title = device
        .current_track_info()?
        .get("title")
        .cloned()
        .unwrap_or_default();

    put("volume", device.volume()?.to_string());
    put("mute", device.switch(Switch::Mute)?.to_string());
    put("state", device.transport_info()?.current_transport_state);
    put("title", title);
    put("player_name", device.player_name()?);
    put("ip_address", device.ip_address());
    put("household_id", device.household_id()?);
    put("status_light", device.switch(Switch::StatusLight)?.to_string());
    put("is_coordinator", coordinator.to_string());
    put(
        "grouped_or_paired",
        (device.group_member_count()? != 1).to_string(),
    );
    put("loudness", device.switch(Switch::Loudness)?.to_string());
    put("treble", device.tone(Tone::Treble)?.to_string());
    put("bass", device.tone(Tone::Bass)?.to_string());
    if coordinator {
        put("cross_fade", device.switch(Switch::CrossFade)?.to_string());
    }
    put("balance", balance_setting(device.balance()?).to_string());
    put("night_mode", device.switch(Switch::NightMode)?.to_string());
    put("is_soundbar", device.is_soundbar()?.to_string());
    put("is_playing_line_in", device.is_playing_line_in()?.to_string());
    put("is_visible", device.is_visible()?.to_string());
    Ok(info)
}

pub(super) fn info(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    let info = collect_info(ctx)?;
    for (key, value) in &info {
        ctx.println(format_args!("  {key} = {value}"))?;
    }
    Ok(())
}

pub(super) fn groups(ctx: &mut ActionContext<'_>) -> Result<()> {
    ctx.arity(&[0], "no")?;
    for group in ctx.device.all_groups()? {
        if !group.coordinator.is_visible()? {
            continue;
        }
        let mut line = format!("[{}] : ", group.label);
        for member in &group.members {
            line.push_str(&format!("{} ({}) ", member.player_name()?, member.ip_address()));
        }
        ctx.println(line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::device::{DeviceError, QueueItem, Switch};
    use crate::strategy::test_support::run;
    use crate::strategy::{Collection, Reading, Strategy};
    use crate::testing::{FakeNetwork, FakeSpeaker};

    fn kitchen() -> FakeSpeaker {
        FakeSpeaker::new("Kitchen", "192.168.1.10")
    }

    #[test]
    fn test_queue_size() {
        let network = FakeNetwork::new();
        let speaker = kitchen().with_queue(&["One", "Two", "Three"]);
        let output = run(
            Strategy::SingleValue(Reading::QueueSize),
            &speaker,
            &network,
            "queue_length",
            &[],
        );
        assert_eq!(output.unwrap(), "3\n");
    }

    #[test]
    fn test_list_queue_formats_missing_fields_as_empty() {
        let network = FakeNetwork::new();
        let speaker = kitchen();
        speaker.state().queue = vec![
            QueueItem {
                creator: Some("Miles Davis".to_string()),
                album: Some("Kind of Blue".to_string()),
                title: Some("So What".to_string()),
            },
            QueueItem {
                creator: None,
                album: None,
                title: Some("Untitled".to_string()),
            },
        ];
        let output = run(Strategy::ListQueue, &speaker, &network, "lq", &[]).unwrap();
        assert_eq!(
            output,
            "  1: Artist: Miles Davis | Album: Kind of Blue | Title: So What\n  2: Artist:  | Album:  | Title: Untitled\n"
        );
    }

    #[test]
    fn test_list_titles_sorted_and_numbered() {
        let network = FakeNetwork::new();
        let speaker = kitchen().with_favourites(&["Radio 3", "Jazz FM", "BBC 6 Music"]);
        let output = run(
            Strategy::ListTitles(Collection::Favourites),
            &speaker,
            &network,
            "lf",
            &[],
        )
        .unwrap();
        assert_eq!(output, "  1: BBC 6 Music\n  2: Jazz FM\n  3: Radio 3\n");
    }

    #[test]
    fn test_list_titles_playlists() {
        let network = FakeNetwork::new();
        let speaker = kitchen().with_playlists(&["Workout", "Dinner"]);
        let output = run(
            Strategy::ListTitles(Collection::Playlists),
            &speaker,
            &network,
            "lp",
            &[],
        )
        .unwrap();
        assert_eq!(output, "  1: Dinner\n  2: Workout\n");
    }

    #[test]
    fn test_track_info_hides_metadata_and_uri() {
        let network = FakeNetwork::new();
        let speaker = kitchen().with_track(&[
            ("title", "So What"),
            ("artist", "Miles Davis"),
            ("uri", "x-file://so-what.flac"),
            ("metadata", "<DIDL-Lite/>"),
        ]);
        let output = run(Strategy::TrackInfo, &speaker, &network, "track", &[]).unwrap();
        assert_eq!(output, "  artist: Miles Davis\n  title: So What\n");
    }

    #[test]
    fn test_listing_rejects_arguments() {
        let network = FakeNetwork::new();
        let speaker = kitchen();
        let err = run(Strategy::TrackInfo, &speaker, &network, "track", &["x"]).unwrap_err();
        assert_eq!(err.to_string(), "Action 'track' takes no parameter(s)");
    }

    #[test]
    fn test_zones_visible_and_all() {
        let network = FakeNetwork::new();
        let kitchen = kitchen();
        let hidden = FakeSpeaker::new("Sub", "192.168.1.12");
        hidden.state().visible = false;
        network.add(&kitchen);
        network.add(&FakeSpeaker::new("Lounge", "192.168.1.11"));
        network.add(&hidden);

        let visible = run(Strategy::Zones, &kitchen, &network, "zones", &[]).unwrap();
        assert_eq!(visible, "Kitchen (192.168.1.10)\nLounge (192.168.1.11)\n");

        let all = run(Strategy::Zones, &kitchen, &network, "all_zones", &[]).unwrap();
        assert!(all.contains("Sub (192.168.1.12)"));
        assert_eq!(all.lines().count(), 3);
    }

    #[test]
    fn test_info_for_player_includes_rendering_state() {
        let network = FakeNetwork::new();
        let speaker = kitchen();
        {
            let mut state = speaker.state();
            state.volume = 25;
            state.balance = (100, 0);
            state.coordinator = false;
            state.switches.insert(Switch::Mute, true);
        }
        let output = run(Strategy::Info, &speaker, &network, "info", &[]).unwrap();
        assert!(output.contains("  volume = 25\n"));
        assert!(output.contains("  mute = true\n"));
        assert!(output.contains("  balance = -100\n"));
        assert!(output.contains("  player_name = Kitchen\n"));
        assert!(output.contains("  model_name = Sonos One\n"));
        assert!(!output.contains("cross_fade"));

        let keys: Vec<&str> = output
            .lines()
            .map(|line| line.trim_start().split(" = ").next().unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_info_for_bridge_is_static_only() {
        let network = FakeNetwork::new();
        let speaker = kitchen()
            .with_model("Sonos BOOST")
            .failing("volume", DeviceError::Unsupported("volume".to_string()));
        let output = run(Strategy::Info, &speaker, &network, "info", &[]).unwrap();
        assert!(output.contains("  model_name = Sonos BOOST\n"));
        assert!(!output.contains("volume"));
    }

    #[test]
    fn test_groups_skip_invisible_coordinators() {
        let network = FakeNetwork::new();
        let kitchen = kitchen();
        let lounge = FakeSpeaker::new("Lounge", "192.168.1.11");
        let sub = FakeSpeaker::new("Sub", "192.168.1.12");
        sub.state().visible = false;
        network.add(&kitchen);
        network.add(&lounge);
        network.add(&sub);
        network.add_group("Kitchen + 1", &kitchen, &[&kitchen, &lounge]);
        network.add_group("Sub", &sub, &[&sub]);

        let output = run(Strategy::Groups, &kitchen, &network, "groups", &[]).unwrap();
        assert_eq!(
            output,
            "[Kitchen + 1] : Kitchen (192.168.1.10) Lounge (192.168.1.11) \n"
        );
    }
}
