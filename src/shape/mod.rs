pub(crate) mod bitmap;
pub(crate) mod model;
pub(crate) mod style;
