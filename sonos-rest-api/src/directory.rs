//! Speaker directory used by the REST server

use sonos_actions::SpeakerResolver;

/// A [`SpeakerResolver`] that can also list and refresh its speakers
///
/// The directory is shared by every request, so implementations guard their
/// speaker list themselves.
pub trait SpeakerDirectory: SpeakerResolver {
    /// Names of the speakers currently known
    fn speaker_names(&self) -> Vec<String>;

    /// Runs discovery again, replacing the known speakers
    fn rediscover(&self);
}
