pub(crate) mod fonts;
pub(crate) mod music;
pub(crate) mod text;
