pub mod flood;
pub mod rasterize;
pub mod river_level;
