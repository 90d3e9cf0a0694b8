use crate::models::{
    AppointmentRecord, Department, DoctorAppointment, DoctorProfile, DoctorRef, DoctorSchedule,
    Identity, PatientProfile, ReportHistoryItem, ReportType, Role, ScheduleWindow,
    UpdatePatientProfileRequest, UserRecord,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

/// Repository Trait
///
/// Abstract contract for all persistence operations, so handlers never see
/// the concrete backend. `Arc<dyn Repository>` is shared through the app
/// state; tests substitute mock implementations.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Identity ---
    async fn get_user_by_login(&self, login: &str) -> Option<UserRecord>;
    async fn get_identity(&self, user_id: i64) -> Option<Identity>;
    /// Creates a patient account. Returns the new user id, or `None` when
    /// the login is already taken or the insert fails.
    async fn create_patient(&self, login: &str, password_hash: &str) -> Option<i64>;

    // --- Schedule ---
    async fn get_departments(&self) -> Vec<Department>;
    async fn get_doctor_schedules(&self, department_id: Option<i64>) -> Vec<DoctorSchedule>;

    // --- Appointments ---
    async fn get_schedule_window(&self, doctor_id: i64, day_of_week: i16)
    -> Option<ScheduleWindow>;
    async fn get_booked_times(&self, doctor_id: i64, date: NaiveDate) -> Vec<NaiveTime>;
    async fn slot_taken(&self, doctor_id: i64, date: NaiveDate, time: NaiveTime) -> bool;
    async fn patient_id_for_user(&self, user_id: i64) -> Option<i64>;
    async fn create_appointment(
        &self,
        doctor_id: i64,
        patient_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        cabinet: &str,
    ) -> bool;

    // --- Profile ---
    async fn get_patient_profile(&self, user_id: i64) -> Option<PatientProfile>;
    async fn update_patient_profile(&self, user_id: i64, req: UpdatePatientProfileRequest)
    -> bool;
    async fn get_patient_appointments(&self, user_id: i64) -> Vec<AppointmentRecord>;
    /// Owner-only: cancels only when the appointment belongs to the
    /// requesting user's patient record.
    async fn cancel_appointment(&self, appointment_id: i64, user_id: i64) -> bool;
    async fn get_doctor_profile(&self, user_id: i64) -> Option<DoctorProfile>;

    // --- Doctor Worklist ---
    async fn get_doctor_appointments(&self, user_id: i64) -> Vec<DoctorAppointment>;
    async fn appointment_owned_by_doctor(&self, appointment_id: i64, user_id: i64) -> bool;
    async fn visit_recorded(&self, appointment_id: i64) -> bool;
    async fn record_visit(&self, appointment_id: i64, diagnosis: &str, complaints: &str) -> bool;

    // --- Reports ---
    async fn get_report_types(&self) -> Vec<ReportType>;
    async fn get_report_doctors(&self) -> Vec<DoctorRef>;
    async fn doctor_name(&self, doctor_id: i64) -> Option<String>;
    async fn count_doctor_visits(&self, doctor_id: i64, year: i32, month: u32) -> i64;
    async fn count_visits(&self, year: i32, month: u32) -> i64;
    async fn count_patients_by_diagnosis(&self, diagnosis: &str) -> i64;
    async fn save_report(
        &self,
        report_type_id: i64,
        created_by: i64,
        result: serde_json::Value,
    ) -> Option<i64>;
    async fn report_history(&self, user_id: i64) -> Vec<ReportHistoryItem>;
    async fn delete_report(&self, report_id: i64, user_id: i64) -> bool;

    // --- Admin ---
    async fn list_tables(&self) -> Vec<String>;
    /// Raw rows of one table as JSON objects. Callers are responsible for
    /// whitelisting the table name before it reaches this method.
    async fn dump_table_rows(&self, table: &str) -> Vec<serde_json::Value>;
    async fn table_columns(&self, table: &str) -> Vec<String>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Concrete `Repository` backed by PostgreSQL. Queries are runtime-checked
/// (`query_as`/`query_scalar` with binds) so the crate builds without a
/// live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flattened doctor+window row used to assemble `DoctorSchedule` values.
#[derive(FromRow)]
struct DoctorScheduleRow {
    id: i64,
    full_name: String,
    specialization: String,
    day_of_week: Option<i16>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    cabinet: Option<String>,
}

/// Groups LEFT JOIN rows into one entry per doctor, preserving the query's
/// doctor ordering and each doctor's weekday ordering.
fn group_schedules(rows: Vec<DoctorScheduleRow>) -> Vec<DoctorSchedule> {
    let mut doctors: Vec<DoctorSchedule> = Vec::new();
    for row in rows {
        if doctors.last().map(|d| d.id) != Some(row.id) {
            doctors.push(DoctorSchedule {
                id: row.id,
                full_name: row.full_name,
                specialization: row.specialization,
                schedule: Vec::new(),
            });
        }
        if let (Some(day_of_week), Some(start_time), Some(end_time)) =
            (row.day_of_week, row.start_time, row.end_time)
        {
            if let Some(doctor) = doctors.last_mut() {
                doctor.schedule.push(ScheduleWindow {
                    day_of_week,
                    start_time,
                    end_time,
                    cabinet: row.cabinet.unwrap_or_default(),
                });
            }
        }
    }
    doctors
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user_by_login(&self, login: &str) -> Option<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.login, u.password_hash, r.name AS role
            FROM users u
            JOIN roles r ON u.role_id = r.id
            WHERE u.login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_login error: {:?}", e);
            None
        })
    }

    async fn get_identity(&self, user_id: i64) -> Option<Identity> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.login, u.password_hash, r.name AS role
            FROM users u
            JOIN roles r ON u.role_id = r.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_identity error: {:?}", e);
            None
        })?;

        // A row whose role name is not a known role cannot authenticate.
        let role = Role::parse(&record.role)?;
        Some(Identity {
            id: record.id,
            login: record.login,
            role,
        })
    }

    /// create_patient
    ///
    /// Inserts the user row and its patient record in one transaction, the
    /// same shape the original registration endpoint used. A unique-login
    /// conflict rolls the whole thing back and yields `None`.
    async fn create_patient(&self, login: &str, password_hash: &str) -> Option<i64> {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("create_patient begin error: {:?}", e);
                return None;
            }
        };

        let user_id: i64 = match sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (login, password_hash, role_id)
            VALUES ($1, $2, (SELECT id FROM roles WHERE name = 'patient'))
            ON CONFLICT (login) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await
        {
            Ok(Some(id)) => id,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("create_patient insert error: {:?}", e);
                return None;
            }
        };

        if let Err(e) = sqlx::query("INSERT INTO patients (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&mut *tx)
            .await
        {
            tracing::error!("create_patient patient row error: {:?}", e);
            return None;
        }

        match tx.commit().await {
            Ok(()) => Some(user_id),
            Err(e) => {
                tracing::error!("create_patient commit error: {:?}", e);
                None
            }
        }
    }

    async fn get_departments(&self) -> Vec<Department> {
        sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_departments error: {:?}", e);
                vec![]
            })
    }

    async fn get_doctor_schedules(&self, department_id: Option<i64>) -> Vec<DoctorSchedule> {
        let rows = match department_id {
            Some(dep) => {
                sqlx::query_as::<_, DoctorScheduleRow>(
                    r#"
                    SELECT d.id, d.full_name, d.specialization,
                           s.day_of_week, s.start_time, s.end_time, s.cabinet
                    FROM doctors d
                    LEFT JOIN doctor_schedule s ON s.doctor_id = d.id
                    WHERE d.department_id = $1
                    ORDER BY d.full_name, d.id, s.day_of_week
                    "#,
                )
                .bind(dep)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DoctorScheduleRow>(
                    r#"
                    SELECT d.id, d.full_name, d.specialization,
                           s.day_of_week, s.start_time, s.end_time, s.cabinet
                    FROM doctors d
                    LEFT JOIN doctor_schedule s ON s.doctor_id = d.id
                    ORDER BY d.full_name, d.id, s.day_of_week
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        };

        match rows {
            Ok(rows) => group_schedules(rows),
            Err(e) => {
                tracing::error!("get_doctor_schedules error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_schedule_window(
        &self,
        doctor_id: i64,
        day_of_week: i16,
    ) -> Option<ScheduleWindow> {
        sqlx::query_as::<_, ScheduleWindow>(
            r#"
            SELECT day_of_week, start_time, end_time, cabinet
            FROM doctor_schedule
            WHERE doctor_id = $1 AND day_of_week = $2
            "#,
        )
        .bind(doctor_id)
        .bind(day_of_week)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_schedule_window error: {:?}", e);
            None
        })
    }

    async fn get_booked_times(&self, doctor_id: i64, date: NaiveDate) -> Vec<NaiveTime> {
        sqlx::query_scalar::<_, NaiveTime>(
            "SELECT time FROM appointments WHERE doctor_id = $1 AND date = $2",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_booked_times error: {:?}", e);
            vec![]
        })
    }

    async fn slot_taken(&self, doctor_id: i64, date: NaiveDate, time: NaiveTime) -> bool {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments WHERE doctor_id = $1 AND date = $2 AND time = $3",
        )
        .bind(doctor_id)
        .bind(date)
        .bind(time)
        .fetch_one(&self.pool)
        .await
        .map(|count| count > 0)
        .unwrap_or_else(|e| {
            // Failing open here would double-book; treat errors as taken.
            tracing::error!("slot_taken error: {:?}", e);
            true
        })
    }

    async fn patient_id_for_user(&self, user_id: i64) -> Option<i64> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM patients WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("patient_id_for_user error: {:?}", e);
                None
            })
    }

    async fn create_appointment(
        &self,
        doctor_id: i64,
        patient_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        cabinet: &str,
    ) -> bool {
        // The unique (doctor_id, date, time) index is the last line of
        // defense against a race between the slot check and the insert.
        let result = sqlx::query(
            r#"
            INSERT INTO appointments (doctor_id, patient_id, date, time, cabinet)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (doctor_id, date, time) DO NOTHING
            "#,
        )
        .bind(doctor_id)
        .bind(patient_id)
        .bind(date)
        .bind(time)
        .bind(cabinet)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("create_appointment error: {:?}", e);
                false
            }
        }
    }

    async fn get_patient_profile(&self, user_id: i64) -> Option<PatientProfile> {
        sqlx::query_as::<_, PatientProfile>(
            r#"
            SELECT p.id, u.login, p.passport_data, p.address, p.birth
            FROM patients p
            JOIN users u ON p.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_patient_profile error: {:?}", e);
            None
        })
    }

    async fn update_patient_profile(
        &self,
        user_id: i64,
        req: UpdatePatientProfileRequest,
    ) -> bool {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET passport_data = $2, address = $3, birth = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(req.passport_data)
        .bind(req.address)
        .bind(req.birth)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("update_patient_profile error: {:?}", e);
                false
            }
        }
    }

    async fn get_patient_appointments(&self, user_id: i64) -> Vec<AppointmentRecord> {
        sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT a.id, a.date, a.time, d.full_name AS doctor_name, a.cabinet,
                   v.diagnosis, v.complaints
            FROM appointments a
            JOIN doctors d ON a.doctor_id = d.id
            JOIN patients p ON a.patient_id = p.id
            LEFT JOIN visits v ON v.appointment_id = a.id
            WHERE p.user_id = $1
            ORDER BY a.date DESC, a.time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_patient_appointments error: {:?}", e);
            vec![]
        })
    }

    async fn cancel_appointment(&self, appointment_id: i64, user_id: i64) -> bool {
        let result = sqlx::query(
            r#"
            DELETE FROM appointments a
            USING patients p
            WHERE a.id = $1 AND a.patient_id = p.id AND p.user_id = $2
            "#,
        )
        .bind(appointment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("cancel_appointment error: {:?}", e);
                false
            }
        }
    }

    async fn get_doctor_profile(&self, user_id: i64) -> Option<DoctorProfile> {
        #[derive(FromRow)]
        struct DoctorProfileRow {
            id: i64,
            login: String,
            full_name: String,
            specialization: String,
            department: String,
        }

        let row = sqlx::query_as::<_, DoctorProfileRow>(
            r#"
            SELECT d.id, u.login, d.full_name, d.specialization, dep.name AS department
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            JOIN departments dep ON d.department_id = dep.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_doctor_profile error: {:?}", e);
            None
        })?;

        let schedule = sqlx::query_as::<_, ScheduleWindow>(
            r#"
            SELECT day_of_week, start_time, end_time, cabinet
            FROM doctor_schedule
            WHERE doctor_id = $1
            ORDER BY day_of_week
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_doctor_profile schedule error: {:?}", e);
            vec![]
        });

        Some(DoctorProfile {
            id: row.id,
            login: row.login,
            full_name: row.full_name,
            specialization: row.specialization,
            department: row.department,
            schedule,
        })
    }

    async fn get_doctor_appointments(&self, user_id: i64) -> Vec<DoctorAppointment> {
        sqlx::query_as::<_, DoctorAppointment>(
            r#"
            SELECT a.id, a.date, a.time, a.patient_id, a.cabinet,
                   v.diagnosis, v.complaints
            FROM appointments a
            JOIN doctors d ON a.doctor_id = d.id
            LEFT JOIN visits v ON v.appointment_id = a.id
            WHERE d.user_id = $1
            ORDER BY a.date DESC, a.time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_doctor_appointments error: {:?}", e);
            vec![]
        })
    }

    async fn appointment_owned_by_doctor(&self, appointment_id: i64, user_id: i64) -> bool {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM appointments a
            JOIN doctors d ON a.doctor_id = d.id
            WHERE a.id = $1 AND d.user_id = $2
            "#,
        )
        .bind(appointment_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map(|count| count > 0)
        .unwrap_or_else(|e| {
            tracing::error!("appointment_owned_by_doctor error: {:?}", e);
            false
        })
    }

    async fn visit_recorded(&self, appointment_id: i64) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_one(&self.pool)
            .await
            .map(|count| count > 0)
            .unwrap_or_else(|e| {
                tracing::error!("visit_recorded error: {:?}", e);
                false
            })
    }

    async fn record_visit(&self, appointment_id: i64, diagnosis: &str, complaints: &str) -> bool {
        let result = sqlx::query(
            r#"
            INSERT INTO visits (appointment_id, diagnosis, complaints, visit_date)
            SELECT a.id, $2, $3, a.date
            FROM appointments a
            WHERE a.id = $1
            ON CONFLICT (appointment_id) DO NOTHING
            "#,
        )
        .bind(appointment_id)
        .bind(diagnosis)
        .bind(complaints)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("record_visit error: {:?}", e);
                false
            }
        }
    }

    async fn get_report_types(&self) -> Vec<ReportType> {
        sqlx::query_as::<_, ReportType>(
            "SELECT id, name, description FROM report_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_report_types error: {:?}", e);
            vec![]
        })
    }

    async fn get_report_doctors(&self) -> Vec<DoctorRef> {
        sqlx::query_as::<_, DoctorRef>(
            r#"
            SELECT DISTINCT d.id, d.full_name
            FROM doctors d
            JOIN appointments a ON a.doctor_id = d.id
            JOIN visits v ON v.appointment_id = a.id
            ORDER BY d.full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_report_doctors error: {:?}", e);
            vec![]
        })
    }

    async fn doctor_name(&self, doctor_id: i64) -> Option<String> {
        sqlx::query_scalar::<_, String>("SELECT full_name FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("doctor_name error: {:?}", e);
                None
            })
    }

    async fn count_doctor_visits(&self, doctor_id: i64, year: i32, month: u32) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT a.patient_id)
            FROM visits v
            JOIN appointments a ON v.appointment_id = a.id
            WHERE a.doctor_id = $1
              AND EXTRACT(YEAR FROM v.visit_date) = $2
              AND EXTRACT(MONTH FROM v.visit_date) = $3
            "#,
        )
        .bind(doctor_id)
        .bind(year)
        .bind(month as i32)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("count_doctor_visits error: {:?}", e);
            0
        })
    }

    async fn count_visits(&self, year: i32, month: u32) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT a.patient_id)
            FROM visits v
            JOIN appointments a ON v.appointment_id = a.id
            WHERE EXTRACT(YEAR FROM v.visit_date) = $1
              AND EXTRACT(MONTH FROM v.visit_date) = $2
            "#,
        )
        .bind(year)
        .bind(month as i32)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("count_visits error: {:?}", e);
            0
        })
    }

    async fn count_patients_by_diagnosis(&self, diagnosis: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT a.patient_id)
            FROM visits v
            JOIN appointments a ON v.appointment_id = a.id
            WHERE v.diagnosis ILIKE '%' || $1 || '%'
            "#,
        )
        .bind(diagnosis)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("count_patients_by_diagnosis error: {:?}", e);
            0
        })
    }

    async fn save_report(
        &self,
        report_type_id: i64,
        created_by: i64,
        result: serde_json::Value,
    ) -> Option<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (report_type_id, created_by, result, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id
            "#,
        )
        .bind(report_type_id)
        .bind(created_by)
        .bind(result)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("save_report error: {:?}", e);
            None
        })
    }

    async fn report_history(&self, user_id: i64) -> Vec<ReportHistoryItem> {
        sqlx::query_as::<_, ReportHistoryItem>(
            r#"
            SELECT r.id, rt.name AS report_type_name, r.created_at, r.result
            FROM reports r
            JOIN report_types rt ON r.report_type_id = rt.id
            WHERE r.created_by = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("report_history error: {:?}", e);
            vec![]
        })
    }

    async fn delete_report(&self, report_id: i64, user_id: i64) -> bool {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND created_by = $2")
            .bind(report_id)
            .bind(user_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_report error: {:?}", e);
                false
            }
        }
    }

    async fn list_tables(&self) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = 'public'
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_tables error: {:?}", e);
            vec![]
        })
    }

    async fn dump_table_rows(&self, table: &str) -> Vec<serde_json::Value> {
        // Identifier interpolation: the handler has already checked the
        // name against the fixed whitelist, so this cannot carry user SQL.
        let sql = format!("SELECT row_to_json(t) FROM {table} t");
        sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("dump_table_rows error: {:?}", e);
                vec![]
            })
    }

    async fn table_columns(&self, table: &str) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT column_name
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("table_columns error: {:?}", e);
            vec![]
        })
    }
}
