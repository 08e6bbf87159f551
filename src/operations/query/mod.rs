mod manifold;
mod volume;

pub use manifold::{EdgeManifold, EdgeReport};
pub use volume::MeshVolume;
