// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Pending,
    Active,
    Rejected,
}

// ---
// Opening hours
// ---
// Stored as a single tagged JSONB value. Either a structured per-weekday
// schedule (a missing day means closed) or a free-text line kept verbatim.
// The shape is decided and validated at the write boundary, never inferred
// when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OpeningHours {
    Structured(WeekSchedule),
    FreeText { text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub monday: Option<DayHours>,
    pub tuesday: Option<DayHours>,
    pub wednesday: Option<DayHours>,
    pub thursday: Option<DayHours>,
    pub friday: Option<DayHours>,
    pub saturday: Option<DayHours>,
    pub sunday: Option<DayHours>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

impl OpeningHours {
    /// Boundary validation: structured hours must be `HH:MM`, free text
    /// must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            OpeningHours::FreeText { text } => {
                if text.trim().is_empty() {
                    return Err(ValidationError::new("opening_hours_empty"));
                }
                Ok(())
            }
            OpeningHours::Structured(week) => {
                let days = [
                    &week.monday,
                    &week.tuesday,
                    &week.wednesday,
                    &week.thursday,
                    &week.friday,
                    &week.saturday,
                    &week.sunday,
                ];
                for day in days.into_iter().flatten() {
                    if !is_hh_mm(&day.open) || !is_hh_mm(&day.close) {
                        return Err(ValidationError::new("opening_hours_format"));
                    }
                }
                Ok(())
            }
        }
    }
}

fn is_hh_mm(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    if h.len() != 2 || m.len() != 2 {
        return false;
    }
    match (h.parse::<u8>(), m.parse::<u8>()) {
        (Ok(h), Ok(m)) => h < 24 && m < 60,
        _ => false,
    }
}

// ---
// Tenant (one pharmacy, the unit of data isolation)
// ---
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub email: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub license_number: String,
    pub license_url: Option<String>,
    pub status: TenantStatus,
    pub opening_hours: Option<Json<OpeningHours>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[validate(length(min = 2, message = "Pharmacy name is required"))]
    pub name: String,

    #[validate(length(min = 5, message = "Address is required"))]
    pub address: String,

    pub opening_hours: Option<OpeningHours>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_hours_round_trip_keeps_the_tag() {
        let hours = OpeningHours::Structured(WeekSchedule {
            monday: Some(DayHours {
                open: "08:00".into(),
                close: "18:00".into(),
            }),
            ..Default::default()
        });

        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["kind"], "structured");
        assert!(json["monday"].is_object());

        let back: OpeningHours = serde_json::from_value(json).unwrap();
        assert_eq!(back, hours);
    }

    #[test]
    fn free_text_round_trip() {
        let hours = OpeningHours::FreeText {
            text: "Mon-Fri 9am-6pm".into(),
        };
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["kind"], "freeText");

        let back: OpeningHours = serde_json::from_value(json).unwrap();
        assert_eq!(back, hours);
    }

    #[test]
    fn rejects_malformed_times() {
        let hours = OpeningHours::Structured(WeekSchedule {
            friday: Some(DayHours {
                open: "8am".into(),
                close: "18:00".into(),
            }),
            ..Default::default()
        });
        assert!(hours.validate().is_err());

        let hours = OpeningHours::Structured(WeekSchedule {
            friday: Some(DayHours {
                open: "08:00".into(),
                close: "25:00".into(),
            }),
            ..Default::default()
        });
        assert!(hours.validate().is_err());
    }

    #[test]
    fn accepts_valid_schedule_and_rejects_blank_free_text() {
        let hours = OpeningHours::Structured(WeekSchedule {
            monday: Some(DayHours {
                open: "08:30".into(),
                close: "17:00".into(),
            }),
            sunday: None,
            ..Default::default()
        });
        assert!(hours.validate().is_ok());

        let blank = OpeningHours::FreeText { text: "   ".into() };
        assert!(blank.validate().is_err());
    }
}
