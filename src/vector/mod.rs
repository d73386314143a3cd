//! Vector geometry loading. Coordinates are kept in the source reference system.

pub mod layer;
pub mod shp;
