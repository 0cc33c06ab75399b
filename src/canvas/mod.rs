pub mod geometry;
pub mod transform;
