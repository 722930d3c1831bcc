use crate::domain::CommentText;

#[derive(Debug)]
pub struct NewComment {
    pub review_id: i64,
    pub parent_id: Option<i64>,
    pub text: CommentText,
}

impl NewComment {
    pub fn new(review_id: i64, parent_id: Option<i64>, content: String) -> Result<Self, String> {
        if review_id <= 0 {
            return Err("Invalid review_id: must be a positive id".to_string());
        }

        if let Some(parent_id) = parent_id {
            if parent_id <= 0 {
                return Err("Invalid parent_id: must be a positive id".to_string());
            }
        }

        Ok(Self {
            review_id,
            parent_id,
            text: CommentText::parse(content)?,
        })
    }
}
