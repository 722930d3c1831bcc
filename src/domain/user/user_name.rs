use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct UserName(String);

impl UserName {
    /// Returns an instance of `UserName` if all conditions are met.
    ///
    /// Usernames are lowercase handles: letters, digits and underscores,
    /// 3 to 30 characters. Uppercase input is folded rather than rejected.
    /// The restricted alphabet also keeps usernames safe inside search
    /// cursors, which use `::` as their field delimiter.
    pub fn parse(s: String) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err("Invalid username: cannot be empty or whitespace.".to_string());
        }

        if normalized.len() < 3 {
            return Err("Invalid username: must be at least 3 characters.".to_string());
        }

        if normalized.len() > 30 {
            return Err("Invalid username: cannot be longer than 30 characters.".to_string());
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(
                "Invalid username: only letters, digits and underscores are allowed.".to_string(),
            );
        }

        Ok(Self(normalized))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
