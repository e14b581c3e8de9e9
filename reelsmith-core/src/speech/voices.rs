//! Voice pairing and the character's reply line.

use crate::composition::model::{Language, VoiceGender};
use crate::layout::emoji::matching_categories;
use crate::speech::synth::SpeechRole;

/// Provider voice id for `role`, given language and gender preference.
///
/// Narrator and character never share a voice within a gender bucket.
pub fn voice_for(language: Language, gender: VoiceGender, role: SpeechRole) -> &'static str {
    match (gender, role, language) {
        (VoiceGender::Female, SpeechRole::Narrator, _) => "nova",
        (VoiceGender::Female, SpeechRole::Character, Language::En) => "coral",
        (VoiceGender::Female, SpeechRole::Character, Language::Es) => "shimmer",
        (VoiceGender::Male, SpeechRole::Narrator, _) => "onyx",
        (VoiceGender::Male, SpeechRole::Character, Language::En) => "ash",
        (VoiceGender::Male, SpeechRole::Character, Language::Es) => "echo",
    }
}

/// Short reply spoken by the character after the narrator reads `caption`.
///
/// Chosen by the first emoji category the caption matches.
pub fn character_line(language: Language, caption: &str) -> &'static str {
    let category = matching_categories(caption).first().map(|c| c.name);
    match (language, category) {
        (Language::Es, Some("faith")) => "¡Amén! Gracias, Señor.",
        (Language::Es, Some("love")) => "La familia lo es todo.",
        (Language::Es, Some("resolve")) => "¡Tú puedes con todo!",
        (Language::Es, _) => "Qué gran verdad.",
        (Language::En, Some("faith")) => "Amen! Thank you, Lord.",
        (Language::En, Some("love")) => "Family is everything.",
        (Language::En, Some("resolve")) => "You can do this!",
        (Language::En, _) => "So true.",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/speech/voices.rs"]
mod tests;
