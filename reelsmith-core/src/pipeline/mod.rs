pub(crate) mod orchestrator;
pub(crate) mod scratch;
