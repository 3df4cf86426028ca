//! Tile world generation library
//!
//! Procedural terrain on a 2D grid: a simplex height field classified into
//! block types, shaded by elevation, and presented through PNG/ASCII exports
//! or an interactive scrollable viewer.

pub mod ascii;
pub mod config;
pub mod export;
pub mod palette;
pub mod terrain;
pub mod tilemap;
pub mod viewer;
pub mod viewport;
pub mod world;
