use crate::domain::{UserEmail, UserName, UserPassword};

pub struct NewUser {
    pub email: UserEmail,
    pub username: UserName,
    pub password: UserPassword,
    pub display_name: Option<String>,
}

impl NewUser {
    pub fn new(
        email: String,
        username: String,
        password: String,
        display_name: Option<String>,
    ) -> Result<Self, String> {
        let display_name = match display_name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    None
                } else if trimmed.len() > 100 {
                    return Err(
                        "Invalid display name: cannot be longer than 100 characters.".to_string()
                    );
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        Ok(Self {
            email: UserEmail::parse(email)?,
            username: UserName::parse(username)?,
            password: UserPassword::parse(password)?,
            display_name,
        })
    }
}
