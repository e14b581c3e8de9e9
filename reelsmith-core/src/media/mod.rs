pub(crate) mod compositor;
pub(crate) mod concat;
pub(crate) mod engine;
