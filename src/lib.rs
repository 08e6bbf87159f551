pub mod contour;
pub mod convert;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;

pub use contour::PlanarContours;
pub use convert::{ContourToSurface, ConversionParams, ConversionStats};
pub use error::{Result, StratumError};
pub use mesh::SurfaceMesh;
pub use operations::seal::CapPlacement;
