//! Bookkeeping for every graphics resource the scene owns.
//!
//! The web renderer holds the actual `wgpu` objects; the ledger records which
//! logical resources are alive so rebuilds and teardown can be checked for
//! leaks and double frees without a GPU.

use crate::error::ResourceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl ResourceId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
    PostPass,
}

#[derive(Clone, Debug)]
struct Entry {
    kind: ResourceKind,
    label: &'static str,
    live: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceLedger {
    entries: Vec<Entry>,
    released: usize,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: ResourceKind, label: &'static str) -> ResourceId {
        let id = ResourceId(self.entries.len() as u32);
        self.entries.push(Entry {
            kind,
            label,
            live: true,
        });
        id
    }

    pub fn release(&mut self, id: ResourceId) -> Result<(), ResourceError> {
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or(ResourceError::Unknown(id))?;
        if !entry.live {
            return Err(ResourceError::AlreadyReleased(id, entry.label));
        }
        entry.live = false;
        self.released += 1;
        Ok(())
    }

    #[inline]
    pub fn is_live(&self, id: ResourceId) -> bool {
        self.entries.get(id.0 as usize).is_some_and(|e| e.live)
    }

    pub fn kind(&self, id: ResourceId) -> Option<ResourceKind> {
        self.entries.get(id.0 as usize).map(|e| e.kind)
    }

    /// Total allocations over the ledger's lifetime.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn released(&self) -> usize {
        self.released
    }

    #[inline]
    pub fn live(&self) -> usize {
        self.entries.len() - self.released
    }

    pub fn live_ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.live)
            .map(|(i, _)| ResourceId(i as u32))
    }
}
