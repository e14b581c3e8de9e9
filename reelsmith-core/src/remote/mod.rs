//! Helpers for remote text-to-video providers whose results feed the compositor.

pub(crate) mod jobs;
pub(crate) mod result_url;
