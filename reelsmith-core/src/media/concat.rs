use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::ReelResult;
use crate::media::engine::{MediaEngine, MediaInput, MediaJob};

/// Concatenation job: `first` then `second`, decoded to PCM WAV so no codec padding
/// sneaks in between the clips.
pub fn plan_concat(first: &Path, second: &Path, output: &Path) -> MediaJob {
    MediaJob {
        label: "concat_voice",
        inputs: vec![MediaInput::file(first), MediaInput::file(second)],
        filter_complex: Some("[0:a][1:a]concat=n=2:v=0:a=1[voice]".to_string()),
        maps: vec!["[voice]".to_string()],
        output_args: ["-c:a", "pcm_s16le"].map(String::from).to_vec(),
        output: output.to_path_buf(),
    }
}

/// Join narrator and optional character clips into one voice track.
///
/// The narrator always comes first. With no character clip the narrator clip is the
/// voice track and no engine call is made.
pub async fn assemble_voice_track(
    engine: &dyn MediaEngine,
    narrator: &Path,
    character: Option<&Path>,
    output: &Path,
    timeout: Duration,
) -> ReelResult<PathBuf> {
    let Some(character) = character else {
        return Ok(narrator.to_path_buf());
    };
    engine
        .run(&plan_concat(narrator, character, output), timeout)
        .await?;
    Ok(output.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/media/concat.rs"]
mod tests;
