use std::fmt::{self, Display, Formatter};

use validator::ValidateEmail;

#[derive(Debug)]
pub struct UserEmail(String);

impl UserEmail {
    /// Returns an instance of `UserEmail` if all conditions are met.
    /// The address is lowercased so uniqueness checks are case-insensitive.
    pub fn parse(s: String) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err("Invalid email: email cannot be empty.".to_string());
        }

        // RFC 5321: 64 local + 1 @ + 255 domain = 320 characters
        if normalized.len() > 320 {
            return Err("Invalid email: cannot be longer than 320 characters.".to_string());
        }

        if !normalized.contains('@') {
            return Err("Invalid email: missing '@' character.".to_string());
        }

        if !normalized.validate_email() {
            return Err(format!(
                "Invalid email: '{normalized}' does not match the required format."
            ));
        }

        Ok(UserEmail(normalized))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
