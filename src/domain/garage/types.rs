use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CarSummary, GarageCarDetails, NewGarageCar};

#[derive(Deserialize, Debug)]
pub struct AddGarageCarPayload {
    pub car_id: i64,
    pub nickname: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub mileage: Option<i32>,
    pub modifications: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<AddGarageCarPayload> for NewGarageCar {
    type Error = String;

    fn try_from(value: AddGarageCarPayload) -> Result<Self, Self::Error> {
        let details = GarageCarDetails::new(
            value.nickname,
            value.purchase_date,
            value.mileage,
            value.modifications,
            value.image_url,
        )?;
        NewGarageCar::new(value.car_id, details)
    }
}

/// Update replaces the whole editable field set; omitted fields clear.
#[derive(Deserialize, Debug)]
pub struct UpdateGarageCarPayload {
    pub nickname: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub mileage: Option<i32>,
    pub modifications: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<UpdateGarageCarPayload> for GarageCarDetails {
    type Error = String;

    fn try_from(value: UpdateGarageCarPayload) -> Result<Self, Self::Error> {
        GarageCarDetails::new(
            value.nickname,
            value.purchase_date,
            value.mileage,
            value.modifications,
            value.image_url,
        )
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct GarageCarRecord {
    pub id: i64,
    pub nickname: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub mileage: Option<i32>,
    pub modifications: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub car_id: i64,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
    pub car_generation: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GarageCarResponseBody {
    pub id: i64,
    pub nickname: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub mileage: Option<i32>,
    pub modifications: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub car: CarSummary,
}

impl From<GarageCarRecord> for GarageCarResponseBody {
    fn from(record: GarageCarRecord) -> Self {
        Self {
            id: record.id,
            nickname: record.nickname,
            purchase_date: record.purchase_date,
            mileage: record.mileage,
            modifications: record.modifications,
            image_url: record.image_url,
            is_active: record.is_active,
            created_at: record.created_at,
            car: CarSummary {
                id: record.car_id,
                make: record.car_make,
                model: record.car_model,
                year: record.car_year,
                generation: record.car_generation,
            },
        }
    }
}
