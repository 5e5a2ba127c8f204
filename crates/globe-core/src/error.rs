use thiserror::Error;

use crate::resources::ResourceId;
use crate::texture::MapSource;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not decode {source_kind:?} base map: {reason}")]
    Decode { source_kind: MapSource, reason: String },

    /// Decoders and half-broken loaders sometimes hand back a 1x1 or empty image.
    #[error("{source_kind:?} base map is implausibly small ({width}x{height})")]
    Implausible {
        source_kind: MapSource,
        width: u32,
        height: u32,
    },

    #[error("could not fetch {source_kind:?} base map: {reason}")]
    Fetch { source_kind: MapSource, reason: String },

    #[error("no base map source left to try")]
    Exhausted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource {0:?} was never allocated by this ledger")]
    Unknown(ResourceId),

    #[error("resource {0:?} ({1}) was already released")]
    AlreadyReleased(ResourceId, &'static str),
}
