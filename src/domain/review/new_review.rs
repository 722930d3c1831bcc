use crate::domain::{MediaType, Rating, ReviewContent, ReviewTitle};

#[derive(Debug)]
pub struct NewReviewMedia {
    pub url: String,
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub position: i32,
}

impl NewReviewMedia {
    pub fn new(
        url: String,
        media_type: MediaType,
        alt_text: Option<String>,
        position: i32,
    ) -> Result<Self, String> {
        let url = url.trim().to_string();
        if url.is_empty() || url.len() > 2048 {
            return Err("Invalid media URL.".to_string());
        }

        let alt_text = alt_text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        if alt_text.as_ref().is_some_and(|text| text.len() > 200) {
            return Err("Invalid media alt text: cannot exceed 200 characters.".to_string());
        }

        if position < 0 {
            return Err("Invalid media position: cannot be negative.".to_string());
        }

        Ok(Self {
            url,
            media_type,
            alt_text,
            position,
        })
    }
}

#[derive(Debug)]
pub struct NewReview {
    pub car_id: i64,
    pub title: ReviewTitle,
    pub content: ReviewContent,
    pub rating: Rating,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub media: Vec<NewReviewMedia>,
}

impl NewReview {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        car_id: i64,
        title: String,
        content: String,
        rating: i32,
        pros: Option<String>,
        cons: Option<String>,
        media: Vec<(String, MediaType, Option<String>, i32)>,
    ) -> Result<Self, String> {
        if car_id <= 0 {
            return Err("Invalid car_id: must be a positive id".to_string());
        }

        if media.len() > 10 {
            return Err("Invalid media: up to 10 items supported.".to_string());
        }

        let media = media
            .into_iter()
            .map(|(url, media_type, alt_text, position)| {
                NewReviewMedia::new(url, media_type, alt_text, position)
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self {
            car_id,
            title: ReviewTitle::parse(title)?,
            content: ReviewContent::parse(content)?,
            rating: Rating::parse(rating)?,
            pros: normalize_optional(pros),
            cons: normalize_optional(cons),
            media,
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
