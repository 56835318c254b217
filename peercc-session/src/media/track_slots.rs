use crate::media::MediaTrack;
use peercc_core::{TrackKind, TrackOrigin};
use std::sync::Arc;

type Slot = Option<Arc<dyn MediaTrack>>;

/// The four track handles of a call: own video/audio and peer video/audio.
#[derive(Debug, Default)]
pub struct TrackSlots {
    self_video: Slot,
    self_audio: Slot,
    peer_video: Slot,
    peer_audio: Slot,
}

impl TrackSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, origin: TrackOrigin, kind: TrackKind) -> &Slot {
        match (origin, kind) {
            (TrackOrigin::Local, TrackKind::Video) => &self.self_video,
            (TrackOrigin::Local, TrackKind::Audio) => &self.self_audio,
            (TrackOrigin::Remote, TrackKind::Video) => &self.peer_video,
            (TrackOrigin::Remote, TrackKind::Audio) => &self.peer_audio,
        }
    }

    fn slot_mut(&mut self, origin: TrackOrigin, kind: TrackKind) -> &mut Slot {
        match (origin, kind) {
            (TrackOrigin::Local, TrackKind::Video) => &mut self.self_video,
            (TrackOrigin::Local, TrackKind::Audio) => &mut self.self_audio,
            (TrackOrigin::Remote, TrackKind::Video) => &mut self.peer_video,
            (TrackOrigin::Remote, TrackKind::Audio) => &mut self.peer_audio,
        }
    }

    pub fn get(&self, origin: TrackOrigin, kind: TrackKind) -> Option<&Arc<dyn MediaTrack>> {
        self.slot(origin, kind).as_ref()
    }

    /// Store a track in the slot matching its kind. A different track
    /// already in that slot is unbound and dropped.
    pub fn attach(&mut self, origin: TrackOrigin, track: Arc<dyn MediaTrack>) {
        let slot = self.slot_mut(origin, track.kind());
        if let Some(previous) = slot.replace(track) {
            let current = slot.as_ref().map(|t| t.id());
            if current != Some(previous.id()) {
                previous.unbind();
            }
        }
    }

    /// Unbind and clear the slot holding `track`. Returns `false` when the
    /// slot holds some other track (or nothing), which is left untouched.
    pub fn detach(&mut self, origin: TrackOrigin, track: &dyn MediaTrack) -> bool {
        let slot = self.slot_mut(origin, track.kind());
        let holds_track = slot.as_ref().is_some_and(|held| held.id() == track.id());
        if !holds_track {
            return false;
        }

        if let Some(held) = slot.take() {
            held.unbind();
        }
        true
    }

    /// Unbind and clear every slot.
    pub fn release_all(&mut self) {
        for slot in [
            &mut self.peer_video,
            &mut self.self_video,
            &mut self.peer_audio,
            &mut self.self_audio,
        ] {
            if let Some(track) = slot.take() {
                track.unbind();
            }
        }
    }

    /// Origins and kinds of the slots currently holding a track.
    pub fn occupied(&self) -> Vec<(TrackOrigin, TrackKind)> {
        [
            (TrackOrigin::Local, TrackKind::Video),
            (TrackOrigin::Local, TrackKind::Audio),
            (TrackOrigin::Remote, TrackKind::Video),
            (TrackOrigin::Remote, TrackKind::Audio),
        ]
        .into_iter()
        .filter(|(origin, kind)| self.get(*origin, *kind).is_some())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied().is_empty()
    }
}
