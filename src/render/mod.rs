pub(crate) mod clip;
pub(crate) mod compound;
pub(crate) mod mask;
pub(crate) mod opts;
pub(crate) mod path_adapter;
pub(crate) mod pixel_format;
pub(crate) mod raster;
pub(crate) mod renderer;
pub(crate) mod stroke;
pub(crate) mod styles;
pub(crate) mod target;
pub(crate) mod video;
