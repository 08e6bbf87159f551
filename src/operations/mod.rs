pub mod branch;
pub mod group;
pub mod normalize;
pub mod overlap;
pub mod query;
pub mod seal;
pub mod stitch;
