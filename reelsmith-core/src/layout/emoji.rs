/// Most emoji appended to a caption.
pub const MAX_APPENDED_EMOJI: usize = 2;

/// One keyword category and the emoji it contributes.
#[derive(Clone, Copy, Debug)]
pub struct EmojiCategory {
    /// Category name, used in logs and for picking the character reply.
    pub name: &'static str,
    /// Emoji appended when the category matches.
    pub emoji: &'static str,
    /// Lowercase substrings that trigger the category.
    pub keywords: &'static [&'static str],
}

/// Keyword table, in priority order.
pub const EMOJI_CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "faith",
        emoji: "🙏",
        keywords: &[
            "dios", "god", "señor", "lord", "gracias", "thank", "bendic", "bless", "faith",
            "amén", "amen",
        ],
    },
    EmojiCategory {
        name: "love",
        emoji: "❤️",
        keywords: &[
            "familia", "family", "amor", "love", "hijo", "mamá", "madre", "mother", "padre",
        ],
    },
    EmojiCategory {
        name: "resolve",
        emoji: "💪",
        keywords: &[
            "fuerza", "strong", "nunca", "never", "puedes", "sueño", "dream", "lucha", "fight",
        ],
    },
];

/// Categories whose keywords occur in `text` (case-insensitive), in table order.
pub fn matching_categories(text: &str) -> Vec<&'static EmojiCategory> {
    let lower = text.to_lowercase();
    EMOJI_CATEGORIES
        .iter()
        .filter(|c| c.keywords.iter().any(|k| lower.contains(k)))
        .collect()
}

/// Append up to [`MAX_APPENDED_EMOJI`] keyword emoji to the end of `text`.
///
/// Categories whose emoji is already in the text are skipped without using up the limit,
/// so a category is never represented twice.
pub fn augment_with_emoji(text: &str) -> String {
    let picked: Vec<&str> = matching_categories(text)
        .into_iter()
        .filter(|c| !text.contains(c.emoji))
        .map(|c| c.emoji)
        .take(MAX_APPENDED_EMOJI)
        .collect();

    if picked.is_empty() {
        return text.to_string();
    }
    format!("{} {}", text.trim_end(), picked.join(" "))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/emoji.rs"]
mod tests;
