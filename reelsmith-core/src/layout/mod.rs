pub(crate) mod emoji;
pub(crate) mod wrap;
