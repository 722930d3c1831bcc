use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct ReviewTitle(String);

impl ReviewTitle {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        let grapheme_count = trimmed.graphemes(true).count();

        if grapheme_count < 5 {
            return Err("Invalid title: must be at least 5 characters.".to_string());
        }

        if grapheme_count > 200 {
            return Err("Invalid title: cannot exceed 200 characters.".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for ReviewTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
