pub mod blend;
pub mod compositor;
pub mod live;
pub mod raster;
