pub(crate) mod cxform;
pub(crate) mod matrix;
pub(crate) mod range;
