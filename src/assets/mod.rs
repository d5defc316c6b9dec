pub(crate) mod color;
pub(crate) mod image_data;
