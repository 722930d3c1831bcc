use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct ReviewContent(String);

impl ReviewContent {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        let grapheme_count = trimmed.graphemes(true).count();

        if grapheme_count < 200 {
            return Err("Invalid content: write at least 200 characters.".to_string());
        }

        if grapheme_count > 20_000 {
            return Err("Invalid content: cannot exceed 20000 characters.".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Collapsed single-line preview for listing cards.
    pub fn excerpt_of(content: &str) -> String {
        const EXCERPT_LENGTH: usize = 220;

        let normalized = content.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.graphemes(true).count() <= EXCERPT_LENGTH {
            return normalized;
        }

        let cut: String = normalized.graphemes(true).take(EXCERPT_LENGTH).collect();
        format!("{}...", cut.trim_end())
    }
}

impl AsRef<str> for ReviewContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
