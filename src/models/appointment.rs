use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::{Location, Note, NoteInput, UserSummary};
use crate::store::Document;
use crate::types::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentMode {
    #[serde(rename = "In-Person")]
    InPerson,
    Virtual,
}

impl Default for AppointmentMode {
    fn default() -> Self {
        AppointmentMode::InPerson
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

/// Booked interval within a day, stored as a structured start/end pair.
///
/// Older clients send the interval as a single display string like
/// `"10:00 AM - 11:00 AM"`; both that form and `{"start", "end"}` objects
/// deserialize. Overlap between slots is detectable but not rejected —
/// double bookings are left to staff coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn parse_time(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%I:%M %p"))
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok()
    }

    /// Parse the legacy `"10:00 AM - 11:00 AM"` display form.
    pub fn parse_display(s: &str) -> Option<TimeSlot> {
        let (start, end) = s.split_once('-')?;
        Some(TimeSlot {
            start: Self::parse_time(start)?,
            end: Self::parse_time(end)?,
        })
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%-I:%M %p"),
            self.end.format("%-I:%M %p")
        )
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimeSlot", 2)?;
        state.serialize_field("start", &self.start.format("%H:%M").to_string())?;
        state.serialize_field("end", &self.end.format("%H:%M").to_string())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeSlotVisitor;

        impl<'de> Visitor<'de> for TimeSlotVisitor {
            type Value = TimeSlot;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a time slot object {start, end} or a \"10:00 AM - 11:00 AM\" string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TimeSlot, E> {
                TimeSlot::parse_display(v)
                    .ok_or_else(|| E::custom(format!("invalid time slot: {}", v)))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TimeSlot, A::Error> {
                let mut start: Option<String> = None;
                let mut end: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "start" => start = Some(map.next_value()?),
                        "end" => end = Some(map.next_value()?),
                        _ => {
                            let _ = map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let start = start.ok_or_else(|| de::Error::missing_field("start"))?;
                let end = end.ok_or_else(|| de::Error::missing_field("end"))?;
                Ok(TimeSlot {
                    start: TimeSlot::parse_time(&start)
                        .ok_or_else(|| de::Error::custom(format!("invalid time: {}", start)))?,
                    end: TimeSlot::parse_time(&end)
                        .ok_or_else(|| de::Error::custom(format!("invalid time: {}", end)))?,
                })
            }
        }

        deserializer.deserialize_any(TimeSlotVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    /// The account the booking belongs to, taken from the acting identity.
    pub user: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub mode: AppointmentMode,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub assigned_staff: Vec<Uuid>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Appointment {
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub mode: Option<AppointmentMode>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub assigned_staff: Option<Vec<Uuid>>,
    #[serde(default)]
    pub notes: Option<Vec<NoteInput>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub mode: Option<AppointmentMode>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub status: Option<AppointmentStatus>,
    pub location: Option<Location>,
    pub assigned_staff: Option<Vec<Uuid>>,
    pub notes: Option<Vec<NoteInput>>,
}

/// Appointment with the booking user resolved to a display stub.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: Uuid,
    pub user: Option<UserSummary>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub mode: AppointmentMode,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub location: Option<Location>,
    pub assigned_staff: Vec<Uuid>,
    pub notes: Vec<Note>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
