//! Terrain grid support

pub mod terrain;

pub use terrain::{BarrierFlags, GridTerrain, TerrainField, TerrainSample};
