use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use clinic_portal::{
    AppState,
    config::AppConfig,
    models::{
        AppointmentRecord, Department, DoctorAppointment, DoctorProfile, DoctorRef,
        DoctorSchedule, Identity, PatientProfile, ReportHistoryItem, ReportType, Role,
        ScheduleWindow, UpdatePatientProfileRequest, UserRecord,
    },
    repository::{Repository, RepositoryState},
    session::{InMemorySessionStore, SessionState},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// MockRepo
///
/// In-memory stand-in for the Postgres repository. Seeded with one user
/// per role (password "test" for all of them), one doctor with a weekday
/// 09:00-12:00 window, and a booking list the appointment methods mutate.
pub struct MockRepo {
    pub users: Vec<UserRecord>,
    /// user_id -> patient_id
    pub patient_ids: HashMap<i64, i64>,
    pub window: ScheduleWindow,
    pub booked: Mutex<Vec<(i64, NaiveDate, NaiveTime)>>,
    pub visits: Mutex<Vec<i64>>,
}

pub const PATIENT_ID: i64 = 1;
pub const DOCTOR_ID: i64 = 2;
pub const MANAGER_ID: i64 = 3;
pub const ADMIN_ID: i64 = 4;

fn user(id: i64, login: &str, role: &str, hash: &str) -> UserRecord {
    UserRecord {
        id,
        login: login.to_string(),
        password_hash: hash.to_string(),
        role: role.to_string(),
    }
}

impl MockRepo {
    pub fn seeded() -> Self {
        // Minimum cost keeps the hashing out of the test runtime budget.
        let hash = bcrypt::hash("test", 4).unwrap();
        MockRepo {
            users: vec![
                user(PATIENT_ID, "patient", "patient", &hash),
                user(DOCTOR_ID, "doctor", "doctor", &hash),
                user(MANAGER_ID, "manager", "manager", &hash),
                user(ADMIN_ID, "admin", "admin", &hash),
            ],
            patient_ids: HashMap::from([(PATIENT_ID, 100)]),
            window: ScheduleWindow {
                day_of_week: 0, // matched for any weekday by get_schedule_window
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                cabinet: "101".to_string(),
            },
            booked: Mutex::new(Vec::new()),
            visits: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_user_by_login(&self, login: &str) -> Option<UserRecord> {
        self.users.iter().find(|u| u.login == login).cloned()
    }

    async fn get_identity(&self, user_id: i64) -> Option<Identity> {
        let record = self.users.iter().find(|u| u.id == user_id)?;
        Some(Identity {
            id: record.id,
            login: record.login.clone(),
            role: Role::parse(&record.role)?,
        })
    }

    async fn create_patient(&self, login: &str, _password_hash: &str) -> Option<i64> {
        if self.users.iter().any(|u| u.login == login) {
            None
        } else {
            Some(99)
        }
    }

    async fn get_departments(&self) -> Vec<Department> {
        vec![Department {
            id: 1,
            name: "Therapy".to_string(),
        }]
    }

    async fn get_doctor_schedules(&self, _department_id: Option<i64>) -> Vec<DoctorSchedule> {
        vec![DoctorSchedule {
            id: 10,
            full_name: "Test Doctor".to_string(),
            specialization: "Therapist".to_string(),
            schedule: vec![self.window.clone()],
        }]
    }

    async fn get_schedule_window(
        &self,
        _doctor_id: i64,
        _day_of_week: i16,
    ) -> Option<ScheduleWindow> {
        Some(self.window.clone())
    }

    async fn get_booked_times(&self, doctor_id: i64, date: NaiveDate) -> Vec<NaiveTime> {
        self.booked
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, day, _)| *d == doctor_id && *day == date)
            .map(|(_, _, time)| *time)
            .collect()
    }

    async fn slot_taken(&self, doctor_id: i64, date: NaiveDate, time: NaiveTime) -> bool {
        self.booked
            .lock()
            .unwrap()
            .contains(&(doctor_id, date, time))
    }

    async fn patient_id_for_user(&self, user_id: i64) -> Option<i64> {
        self.patient_ids.get(&user_id).copied()
    }

    async fn create_appointment(
        &self,
        doctor_id: i64,
        _patient_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        _cabinet: &str,
    ) -> bool {
        let mut booked = self.booked.lock().unwrap();
        if booked.contains(&(doctor_id, date, time)) {
            false
        } else {
            booked.push((doctor_id, date, time));
            true
        }
    }

    async fn get_patient_profile(&self, user_id: i64) -> Option<PatientProfile> {
        if user_id == PATIENT_ID {
            Some(PatientProfile {
                id: 100,
                login: "patient".to_string(),
                passport_data: None,
                address: None,
                birth: None,
            })
        } else {
            None
        }
    }

    async fn update_patient_profile(
        &self,
        user_id: i64,
        _req: UpdatePatientProfileRequest,
    ) -> bool {
        user_id == PATIENT_ID
    }

    async fn get_patient_appointments(&self, _user_id: i64) -> Vec<AppointmentRecord> {
        vec![]
    }

    async fn cancel_appointment(&self, appointment_id: i64, user_id: i64) -> bool {
        appointment_id == 500 && user_id == PATIENT_ID
    }

    async fn get_doctor_profile(&self, user_id: i64) -> Option<DoctorProfile> {
        if user_id == DOCTOR_ID {
            Some(DoctorProfile {
                id: 10,
                login: "doctor".to_string(),
                full_name: "Test Doctor".to_string(),
                specialization: "Therapist".to_string(),
                department: "Therapy".to_string(),
                schedule: vec![self.window.clone()],
            })
        } else {
            None
        }
    }

    async fn get_doctor_appointments(&self, _user_id: i64) -> Vec<DoctorAppointment> {
        vec![]
    }

    async fn appointment_owned_by_doctor(&self, appointment_id: i64, user_id: i64) -> bool {
        appointment_id == 600 && user_id == DOCTOR_ID
    }

    async fn visit_recorded(&self, appointment_id: i64) -> bool {
        self.visits.lock().unwrap().contains(&appointment_id)
    }

    async fn record_visit(&self, appointment_id: i64, _diagnosis: &str, _complaints: &str) -> bool {
        let mut visits = self.visits.lock().unwrap();
        if visits.contains(&appointment_id) {
            false
        } else {
            visits.push(appointment_id);
            true
        }
    }

    async fn get_report_types(&self) -> Vec<ReportType> {
        vec![ReportType {
            id: 1,
            name: "Patients per doctor per month".to_string(),
            description: "Distinct patients one doctor saw in a month".to_string(),
        }]
    }

    async fn get_report_doctors(&self) -> Vec<DoctorRef> {
        vec![DoctorRef {
            id: 10,
            full_name: "Test Doctor".to_string(),
        }]
    }

    async fn doctor_name(&self, doctor_id: i64) -> Option<String> {
        (doctor_id == 10).then(|| "Test Doctor".to_string())
    }

    async fn count_doctor_visits(&self, _doctor_id: i64, _year: i32, _month: u32) -> i64 {
        7
    }

    async fn count_visits(&self, _year: i32, _month: u32) -> i64 {
        21
    }

    async fn count_patients_by_diagnosis(&self, _diagnosis: &str) -> i64 {
        3
    }

    async fn save_report(
        &self,
        _report_type_id: i64,
        _created_by: i64,
        _result: serde_json::Value,
    ) -> Option<i64> {
        Some(1)
    }

    async fn report_history(&self, _user_id: i64) -> Vec<ReportHistoryItem> {
        vec![]
    }

    async fn delete_report(&self, report_id: i64, user_id: i64) -> bool {
        report_id == 1 && user_id == MANAGER_ID
    }

    async fn list_tables(&self) -> Vec<String> {
        vec!["users".to_string(), "sqlx_migrations".to_string()]
    }

    async fn dump_table_rows(&self, _table: &str) -> Vec<serde_json::Value> {
        vec![serde_json::json!({"id": 1, "login": "patient"})]
    }

    async fn table_columns(&self, _table: &str) -> Vec<String> {
        vec!["id".to_string(), "login".to_string()]
    }
}

pub fn test_state() -> AppState {
    AppState {
        repo: Arc::new(MockRepo::seeded()) as RepositoryState,
        sessions: Arc::new(InMemorySessionStore::new()) as SessionState,
        config: AppConfig::default(),
    }
}

pub struct TestApp {
    pub address: String,
    pub state: AppState,
}

/// Binds the full router on an ephemeral port, backed by the mock
/// repository and an in-memory session store.
pub async fn spawn_app() -> TestApp {
    let state = test_state();
    let router = clinic_portal::create_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, state }
}
