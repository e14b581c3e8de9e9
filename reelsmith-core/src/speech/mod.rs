pub(crate) mod openai;
pub(crate) mod synth;
pub(crate) mod voices;
