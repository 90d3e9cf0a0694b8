use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity & Roles ---

/// Role
///
/// The RBAC field. Everything the portal shows or hides — pages, menu
/// entries, API endpoints — keys off this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Patient,
    Doctor,
    Manager,
    Admin,
}

impl Role {
    /// Every defined role, in declaration order. Used by the navigation
    /// totality check at startup.
    pub const ALL: &'static [Role] = &[Role::Patient, Role::Doctor, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Parses the role name stored in the `role` table. Unknown names are
    /// rejected rather than defaulted — a session must never resolve to a
    /// guessed role.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Identity
///
/// The authenticated user as the routing layer and handlers see it.
/// Exists only while a session is live; absent means anonymous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Identity {
    pub id: i64,
    pub login: String,
    pub role: Role,
}

/// UserRecord
///
/// Raw credential row from the `user` table joined with `role`. Internal to
/// the repository and the login handler; the password hash never leaves
/// this struct.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub role: String,
}

// --- Auth Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

/// Wrapper matching the original API's `{ user: {...} }` login response.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub user: Identity,
}

// --- Schedule Schemas ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Doctor reference for selection dropdowns (booking, report filters).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct DoctorRef {
    pub id: i64,
    pub full_name: String,
}

/// One working window in a doctor's weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct ScheduleWindow {
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day_of_week: i16,
    #[ts(type = "string")]
    pub start_time: NaiveTime,
    #[ts(type = "string")]
    pub end_time: NaiveTime,
    pub cabinet: String,
}

/// A doctor together with the weekly schedule shown on the schedule page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DoctorSchedule {
    pub id: i64,
    pub full_name: String,
    pub specialization: String,
    pub schedule: Vec<ScheduleWindow>,
}

// --- Appointment Schemas ---

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct SlotQuery {
    pub doctor_id: i64,
    #[ts(type = "string")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AvailableSlots {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub doctor_id: i64,
    /// Free 30-minute starts, "HH:MM", ascending.
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    #[ts(type = "string")]
    pub date: NaiveDate,
    /// "HH:MM".
    pub time: String,
}

/// One row of a patient's appointment history, enriched with the doctor,
/// cabinet and any recorded visit outcome.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct AppointmentRecord {
    pub id: i64,
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub time: NaiveTime,
    pub doctor_name: String,
    pub cabinet: String,
    pub diagnosis: Option<String>,
    pub complaints: Option<String>,
}

// --- Profile Schemas ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct PatientProfile {
    pub id: i64,
    pub login: String,
    pub passport_data: Option<String>,
    pub address: Option<String>,
    #[ts(type = "string")]
    pub birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdatePatientProfileRequest {
    pub passport_data: String,
    pub address: String,
    #[ts(type = "string")]
    pub birth: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DoctorProfile {
    pub id: i64,
    pub login: String,
    pub full_name: String,
    pub specialization: String,
    pub department: String,
    pub schedule: Vec<ScheduleWindow>,
}

// --- Doctor Worklist Schemas ---

/// An appointment as seen by the doctor: who is coming and whether a visit
/// outcome has been recorded yet.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct DoctorAppointment {
    pub id: i64,
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub time: NaiveTime,
    pub patient_id: i64,
    pub cabinet: String,
    pub diagnosis: Option<String>,
    pub complaints: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RecordVisitRequest {
    pub appointment_id: i64,
    pub diagnosis: String,
    pub complaints: String,
}

// --- Report Schemas ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ReportType {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Parameters accepted by `POST /api/reports/generate`. Which fields are
/// required depends on the report type; the handler validates per type.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct GenerateReportRequest {
    pub report_type_id: i64,
    pub doctor_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub diagnosis: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReportResult {
    pub report_type: String,
    #[ts(type = "any")]
    pub summary: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ReportHistoryItem {
    pub id: i64,
    pub report_type_name: String,
    #[ts(type = "string")]
    pub created_at: chrono::NaiveDateTime,
    #[ts(type = "any")]
    pub result: serde_json::Value,
}

// --- Admin Schemas ---

/// Raw dump of one whitelisted database table for the admin panel viewer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TableDump {
    pub table: String,
    pub columns: Vec<String>,
    #[ts(type = "any[]")]
    pub rows: Vec<serde_json::Value>,
}

// --- Generic Envelopes ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
