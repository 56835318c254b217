use crate::error::RosterError;
use peercc_core::{Peer, PeerId};

/// Peers currently signed in to the rendezvous server, in arrival order,
/// plus the one the user would call.
///
/// Selection is held by id, never by reference into the list. While the
/// roster is non-empty exactly one peer is selected.
#[derive(Debug, Clone, Default)]
pub struct PeerRoster {
    peers: Vec<Peer>,
    selected: Option<PeerId>,
}

impl PeerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a peer. The first peer added to an unselected roster becomes
    /// the selection.
    pub fn add(&mut self, peer: Peer) -> Result<(), RosterError> {
        if self.position(peer.id).is_some() {
            return Err(RosterError::DuplicatePeer(peer.id));
        }

        if self.selected.is_none() {
            self.selected = Some(peer.id);
        }
        self.peers.push(peer);
        Ok(())
    }

    /// Remove a peer by id. Removing an unknown id does nothing.
    ///
    /// If the removed peer was selected, the selection moves to the first
    /// remaining peer.
    pub fn remove(&mut self, id: PeerId) -> Option<Peer> {
        let index = self.position(id)?;
        let removed = self.peers.remove(index);

        if self.selected == Some(id) {
            self.selected = self.peers.first().map(|peer| peer.id);
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.peers.clear();
        self.selected = None;
    }

    pub fn select(&mut self, index: usize) -> Result<&Peer, RosterError> {
        let len = self.peers.len();
        let peer = self
            .peers
            .get(index)
            .ok_or(RosterError::IndexOutOfRange { index, len })?;
        self.selected = Some(peer.id);
        Ok(peer)
    }

    pub fn get(&self, index: usize) -> Option<&Peer> {
        self.peers.get(index)
    }

    pub fn get_by_id(&self, id: PeerId) -> Option<&Peer> {
        self.peers.iter().find(|peer| peer.id == id)
    }

    pub fn position(&self, id: PeerId) -> Option<usize> {
        self.peers.iter().position(|peer| peer.id == id)
    }

    pub fn selected(&self) -> Option<&Peer> {
        self.selected.and_then(|id| self.get_by_id(id))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.position(id))
    }

    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
