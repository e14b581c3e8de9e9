use serde_json::Value;

/// One place a provider may put the result URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultUrlStrategy {
    /// `{"video": {"url": ..}}`
    VideoUrl,
    /// `{"videos": [{"url": ..}, ..]}`
    VideosFirstUrl,
    /// `{"output": {"url": ..}}`
    OutputUrl,
    /// `{"url": ..}`
    TopLevelUrl,
    /// `{"output": [".."]}`
    OutputFirstString,
}

impl ResultUrlStrategy {
    /// Strategies in the order they are tried.
    pub const ORDERED: [ResultUrlStrategy; 5] = [
        Self::VideoUrl,
        Self::VideosFirstUrl,
        Self::OutputUrl,
        Self::TopLevelUrl,
        Self::OutputFirstString,
    ];

    /// Apply this strategy to `body`.
    pub fn extract<'a>(&self, body: &'a Value) -> Option<&'a str> {
        let found = match self {
            Self::VideoUrl => body.pointer("/video/url"),
            Self::VideosFirstUrl => body.pointer("/videos/0/url"),
            Self::OutputUrl => body.pointer("/output/url"),
            Self::TopLevelUrl => body.get("url"),
            Self::OutputFirstString => body.pointer("/output/0"),
        };
        found
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// First URL found by [`ResultUrlStrategy::ORDERED`], with the strategy that matched.
pub fn extract_result_url(body: &Value) -> Option<(ResultUrlStrategy, &str)> {
    ResultUrlStrategy::ORDERED
        .iter()
        .find_map(|s| s.extract(body).map(|url| (*s, url)))
}

#[cfg(test)]
#[path = "../../tests/unit/remote/result_url.rs"]
mod tests;
