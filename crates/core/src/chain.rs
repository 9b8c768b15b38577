//! Per-floor bookkeeping for the growth walk.
//!
//! Every carved cell gets a [`Link`] in an arena. Links are grouped into
//! chains (one per entrance or staircase seed) and looked up by position when
//! checking whether a freshly carved cell touches another chain.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::types::{Direction, Pos};

new_key_type! {
    pub struct LinkId;
    pub struct ChainId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub pos: Pos,
    pub chain: ChainId,
    /// Direction the walk was moving when this cell was carved.
    pub direction: Direction,
}

#[derive(Clone, Debug, Default)]
pub struct ChainRegistry {
    links: SlotMap<LinkId, Link>,
    chains: SlotMap<ChainId, Vec<LinkId>>,
    by_pos: HashMap<Pos, LinkId>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new single-link chain at `pos`.
    pub fn seed_chain(&mut self, pos: Pos, direction: Direction) -> ChainId {
        let chain = self.chains.insert(Vec::new());
        self.extend(chain, pos, direction);
        chain
    }

    /// Appends a link to `chain` and registers its position.
    pub fn extend(&mut self, chain: ChainId, pos: Pos, direction: Direction) -> LinkId {
        debug_assert!(!self.by_pos.contains_key(&pos), "cell linked twice: {pos:?}");
        let link = self.links.insert(Link { pos, chain, direction });
        if let Some(sequence) = self.chains.get_mut(chain) {
            sequence.push(link);
        }
        self.by_pos.insert(pos, link);
        link
    }

    /// Moves every link of `absorbed` to the end of `into`. Returns whether a merge happened.
    pub fn absorb(&mut self, into: ChainId, absorbed: ChainId) -> bool {
        if into == absorbed || !self.chains.contains_key(into) {
            return false;
        }
        let Some(moved) = self.chains.remove(absorbed) else {
            return false;
        };
        for &link in &moved {
            self.links[link].chain = into;
        }
        self.chains[into].extend(moved);
        true
    }

    pub fn link_at(&self, pos: Pos) -> Option<&Link> {
        self.by_pos.get(&pos).and_then(|&id| self.links.get(id))
    }

    pub fn chain_at(&self, pos: Pos) -> Option<ChainId> {
        self.link_at(pos).map(|link| link.chain)
    }

    pub fn last_link(&self, chain: ChainId) -> Option<&Link> {
        self.chains.get(chain)?.last().and_then(|&id| self.links.get(id))
    }

    /// Most recent link of `chain` satisfying `predicate`.
    pub fn latest_link_where(
        &self,
        chain: ChainId,
        mut predicate: impl FnMut(&Link) -> bool,
    ) -> Option<&Link> {
        self.chains
            .get(chain)?
            .iter()
            .rev()
            .filter_map(|&id| self.links.get(id))
            .find(|link| predicate(link))
    }

    pub fn chain_links(&self, chain: ChainId) -> impl Iterator<Item = &Link> + '_ {
        self.chains
            .get(chain)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.links.get(id))
    }

    pub fn contains_chain(&self, chain: ChainId) -> bool {
        self.chains.contains_key(chain)
    }

    /// Active chain ids in creation order.
    pub fn active_chains(&self) -> Vec<ChainId> {
        self.chains.keys().collect()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn chain_len(&self, chain: ChainId) -> usize {
        self.chains.get(chain).map_or(0, Vec::len)
    }

    /// Number of linked (carved) cells on this floor.
    pub fn carved_count(&self) -> usize {
        self.links.len()
    }
}
