use chrono::{DateTime, Utc};

/// Owner-editable fields of a garage entry, validated once and shared by
/// the add and update paths.
#[derive(Debug)]
pub struct GarageCarDetails {
    pub nickname: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub mileage: Option<i32>,
    pub modifications: Option<String>,
    pub image_url: Option<String>,
}

impl GarageCarDetails {
    pub fn new(
        nickname: Option<String>,
        purchase_date: Option<DateTime<Utc>>,
        mileage: Option<i32>,
        modifications: Option<String>,
        image_url: Option<String>,
    ) -> Result<Self, String> {
        let nickname = normalize_optional(nickname);
        if nickname.as_ref().is_some_and(|n| n.len() > 100) {
            return Err("Invalid nickname: cannot exceed 100 characters.".to_string());
        }

        if mileage.is_some_and(|m| m < 0) {
            return Err("Invalid mileage: cannot be negative.".to_string());
        }

        let image_url = normalize_optional(image_url);
        if image_url.as_ref().is_some_and(|url| url.len() > 2048) {
            return Err("Invalid image URL.".to_string());
        }

        Ok(Self {
            nickname,
            purchase_date,
            mileage,
            modifications: normalize_optional(modifications),
            image_url,
        })
    }
}

#[derive(Debug)]
pub struct NewGarageCar {
    pub car_id: i64,
    pub details: GarageCarDetails,
}

impl NewGarageCar {
    pub fn new(car_id: i64, details: GarageCarDetails) -> Result<Self, String> {
        if car_id <= 0 {
            return Err("Invalid car_id: must be a positive id".to_string());
        }

        Ok(Self { car_id, details })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
