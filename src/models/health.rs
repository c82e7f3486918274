use serde::Serialize;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub today: NaiveDate,
    pub time: NaiveDateTime,
}
