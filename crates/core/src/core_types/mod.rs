//! Core types and utilities

pub mod fuel;
pub mod units;
pub mod vec2;
pub mod weather;

pub use fuel::{FuelType, Ignitability};
pub use units::*;
pub use vec2::{
    bearing_between, bearing_unit, distance_to_polygon, distance_to_segment, polygon_contains,
    polygon_distance, Vec2,
};
pub use weather::{DangerIndex, WeatherSample};
