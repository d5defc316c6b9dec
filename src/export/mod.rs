pub(crate) mod pipeline;
pub(crate) mod print;
pub(crate) mod raster;
pub(crate) mod sink;
