pub(crate) mod animation;
pub(crate) mod background;
pub(crate) mod composite;
pub(crate) mod frame;
pub(crate) mod pipeline;
pub(crate) mod style;
