use crate::{
    AppState,
    auth::{AuthUser, MaybeAuthUser, SESSION_COOKIE, session_cookie},
    models::{
        AppointmentRecord, AuthResponse, AvailableSlots, CreateAppointmentRequest, Department,
        DoctorAppointment, DoctorProfile, DoctorRef, DoctorSchedule, ErrorResponse,
        GenerateReportRequest, LoginRequest, MessageResponse, PatientProfile, RecordVisitRequest,
        RegisterRequest, ReportHistoryItem, ReportResult, ReportType, Role, ScheduleWindow,
        SlotQuery, TableDump, UpdatePatientProfileRequest,
    },
    nav::{self, NavItem},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use chrono::{Datelike, Duration, NaiveTime};

// --- Helpers ---

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Session cookie attributes mirror the original portal: HttpOnly,
/// SameSite=Strict, scoped to the whole site.
fn set_session_cookie(session_id: uuid::Uuid, max_age_secs: i64) -> String {
    format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}"
    )
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
}

/// compute_slots
///
/// Free 30-minute starts within a working window, minus booked times.
/// Pure; the booking handlers feed it repository data.
pub fn compute_slots(window: &ScheduleWindow, busy: &[NaiveTime]) -> Vec<String> {
    // Iterate by offset instead of advancing a NaiveTime: time-of-day
    // addition wraps at midnight, which would never reach end_time for a
    // late-evening window. An inverted window yields no slots.
    let minutes = window
        .end_time
        .signed_duration_since(window.start_time)
        .num_minutes();

    let mut slots = Vec::new();
    for offset in (0..minutes).step_by(30) {
        let slot = window.start_time + Duration::minutes(offset);
        if !busy.contains(&slot) {
            slots.push(slot.format("%H:%M").to_string());
        }
    }
    slots
}

/// ISO weekday (1 = Monday .. 7 = Sunday) as stored in `doctor_schedule`.
fn iso_weekday(date: chrono::NaiveDate) -> i16 {
    date.weekday().number_from_monday() as i16
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] Verifies credentials and opens a server-side session,
/// handing the opaque id back as an HttpOnly cookie. Login and password
/// failures are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let user = state
        .repo
        .get_user_by_login(&payload.login)
        .await
        .ok_or_else(|| error_body(StatusCode::UNAUTHORIZED, "Invalid login or password"))?;

    let password_ok = bcrypt::verify(&payload.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return Err(error_body(
            StatusCode::UNAUTHORIZED,
            "Invalid login or password",
        ));
    }

    let role = Role::parse(&user.role)
        .ok_or_else(|| error_body(StatusCode::UNAUTHORIZED, "Invalid login or password"))?;

    let ttl = Duration::hours(state.config.session_ttl_hours);
    let session_id = state.sessions.create(user.id, role, ttl).await;

    tracing::info!(user_id = user.id, role = role.as_str(), "login");

    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            set_session_cookie(session_id, ttl.num_seconds()),
        )]),
        Json(AuthResponse {
            user: crate::models::Identity {
                id: user.id,
                login: user.login,
                role,
            },
        }),
    ))
}

/// register
///
/// [Public Route] Creates a patient account. The duplicate-login check is
/// delegated to the repository transaction; a conflict answers 409.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = MessageResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 409, description = "Login taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    if payload.login.trim().is_empty() || payload.password.is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Login and password are required",
        ));
    }

    let hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|_| error_body(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed"))?;

    match state.repo.create_patient(payload.login.trim(), &hash).await {
        Some(user_id) => {
            tracing::info!(user_id, "patient registered");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "Registration successful".to_string(),
                }),
            ))
        }
        None => Err(error_body(
            StatusCode::CONFLICT,
            "A user with this login already exists",
        )),
    }
}

/// logout
///
/// [Public Route] Destroys the server-side session named by the cookie and
/// expires the cookie. Always succeeds, even without a session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = session_cookie(&headers) {
        state.sessions.destroy(session_id).await;
    }
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// me
///
/// [Authenticated Route] Identity restore used at client startup: resolves
/// the session cookie back into the user. A 401 here is what turns the
/// client's session snapshot anonymous-but-initialized.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity", body = AuthResponse),
        (status = 401, description = "No live session")
    )
)]
pub async fn me(user: AuthUser) -> Json<AuthResponse> {
    Json(AuthResponse {
        user: user.identity(),
    })
}

/// navigation
///
/// [Public Route] Menu links for the current identity, derived by the
/// navigation composer. Anonymous callers get the anonymous menu.
#[utoipa::path(
    get,
    path = "/api/nav",
    responses((status = 200, description = "Visible menu", body = [NavItem]))
)]
pub async fn navigation(MaybeAuthUser(user): MaybeAuthUser) -> Json<Vec<NavItem>> {
    Json(nav::compose(user.map(|u| u.role)))
}

// --- Schedule Handlers ---

/// get_departments
///
/// [Public Route] Clinic departments for the booking flow's first step.
#[utoipa::path(
    get,
    path = "/api/schedule/departments",
    responses((status = 200, description = "Departments", body = [Department]))
)]
pub async fn get_departments(State(state): State<AppState>) -> Json<Vec<Department>> {
    Json(state.repo.get_departments().await)
}

/// get_doctors_schedule
///
/// [Public Route] Every doctor with their weekly working windows.
#[utoipa::path(
    get,
    path = "/api/schedule/doctors",
    responses((status = 200, description = "Doctors with schedules", body = [DoctorSchedule]))
)]
pub async fn get_doctors_schedule(State(state): State<AppState>) -> Json<Vec<DoctorSchedule>> {
    Json(state.repo.get_doctor_schedules(None).await)
}

/// get_doctors_by_department
///
/// [Public Route] Doctors of one department with their weekly schedules.
#[utoipa::path(
    get,
    path = "/api/schedule/doctors/{department_id}",
    params(("department_id" = i64, Path, description = "Department ID")),
    responses((status = 200, description = "Doctors with schedules", body = [DoctorSchedule]))
)]
pub async fn get_doctors_by_department(
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
) -> Json<Vec<DoctorSchedule>> {
    Json(state.repo.get_doctor_schedules(Some(department_id)).await)
}

// --- Appointment Handlers ---

/// get_available_slots
///
/// [Authenticated Route] Free 30-minute slots for a doctor on a date:
/// the working window for that weekday minus already-booked times.
#[utoipa::path(
    get,
    path = "/api/appointment/available-slots",
    responses(
        (status = 200, description = "Free slots", body = AvailableSlots),
        (status = 404, description = "Doctor does not practice that day", body = ErrorResponse)
    )
)]
pub async fn get_available_slots(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<AvailableSlots>, (StatusCode, Json<ErrorResponse>)> {
    let window = state
        .repo
        .get_schedule_window(query.doctor_id, iso_weekday(query.date))
        .await
        .ok_or_else(|| {
            error_body(
                StatusCode::NOT_FOUND,
                "The doctor does not practice on this day",
            )
        })?;

    let busy = state
        .repo
        .get_booked_times(query.doctor_id, query.date)
        .await;

    Ok(Json(AvailableSlots {
        date: query.date,
        doctor_id: query.doctor_id,
        available_slots: compute_slots(&window, &busy),
    }))
}

/// create_appointment
///
/// [Patient Route] Books a slot. The slot check plus the unique index in
/// the repository make double-booking answer 409 instead of silently
/// overwriting.
#[utoipa::path(
    post,
    path = "/api/appointment/create",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Booked", body = MessageResponse),
        (status = 403, description = "Not a patient"),
        (status = 409, description = "Slot already taken", body = ErrorResponse)
    )
)]
pub async fn create_appointment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    user.require(&[Role::Patient])
        .map_err(|status| error_body(status, "Only patients can book appointments"))?;

    let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, "Time must be HH:MM"))?;

    let window = state
        .repo
        .get_schedule_window(payload.doctor_id, iso_weekday(payload.date))
        .await
        .ok_or_else(|| {
            error_body(
                StatusCode::NOT_FOUND,
                "The doctor does not practice on this day",
            )
        })?;

    if time < window.start_time || time >= window.end_time {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Time is outside the doctor's working hours",
        ));
    }

    if state
        .repo
        .slot_taken(payload.doctor_id, payload.date, time)
        .await
    {
        return Err(error_body(StatusCode::CONFLICT, "This slot is taken"));
    }

    let patient_id = state
        .repo
        .patient_id_for_user(user.id)
        .await
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "Patient record not found"))?;

    let booked = state
        .repo
        .create_appointment(payload.doctor_id, patient_id, payload.date, time, &window.cabinet)
        .await;

    if booked {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Appointment created".to_string(),
            }),
        ))
    } else {
        // Lost the race to another booking after the slot check.
        Err(error_body(StatusCode::CONFLICT, "This slot is taken"))
    }
}

// --- Profile Handlers ---

/// get_patient_profile
///
/// [Authenticated Route] Profile card for the requesting patient.
#[utoipa::path(
    get,
    path = "/api/profile/patient",
    responses(
        (status = 200, description = "Patient profile", body = PatientProfile),
        (status = 404, description = "No patient record", body = ErrorResponse)
    )
)]
pub async fn get_patient_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PatientProfile>, (StatusCode, Json<ErrorResponse>)> {
    state
        .repo
        .get_patient_profile(user.id)
        .await
        .map(Json)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "Patient not found"))
}

/// update_patient_profile
///
/// [Authenticated Route] Updates the requesting patient's personal data.
#[utoipa::path(
    put,
    path = "/api/profile/patient",
    request_body = UpdatePatientProfileRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "No patient record", body = ErrorResponse)
    )
)]
pub async fn update_patient_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePatientProfileRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    if state.repo.update_patient_profile(user.id, payload).await {
        Ok(Json(MessageResponse {
            message: "Profile updated".to_string(),
        }))
    } else {
        Err(error_body(StatusCode::NOT_FOUND, "Patient not found"))
    }
}

/// get_my_appointments
///
/// [Authenticated Route] The requesting patient's appointment history,
/// newest first, with any recorded visit outcome attached.
#[utoipa::path(
    get,
    path = "/api/profile/appointments",
    responses((status = 200, description = "Appointment history", body = [AppointmentRecord]))
)]
pub async fn get_my_appointments(
    user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<AppointmentRecord>> {
    Json(state.repo.get_patient_appointments(user.id).await)
}

/// cancel_appointment
///
/// [Authenticated Route] Owner-only cancellation; the repository matches
/// the appointment against the caller's patient record, so a miss is
/// indistinguishable from a foreign appointment.
#[utoipa::path(
    delete,
    path = "/api/profile/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Cancelled", body = MessageResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse)
    )
)]
pub async fn cancel_appointment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    if state.repo.cancel_appointment(id, user.id).await {
        Ok(Json(MessageResponse {
            message: "Appointment cancelled".to_string(),
        }))
    } else {
        Err(error_body(
            StatusCode::NOT_FOUND,
            "Appointment not found or not yours to cancel",
        ))
    }
}

/// get_doctor_profile
///
/// [Authenticated Route] Profile card for the requesting doctor, schedule
/// included.
#[utoipa::path(
    get,
    path = "/api/profile/doctor",
    responses(
        (status = 200, description = "Doctor profile", body = DoctorProfile),
        (status = 404, description = "No doctor record", body = ErrorResponse)
    )
)]
pub async fn get_doctor_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DoctorProfile>, (StatusCode, Json<ErrorResponse>)> {
    state
        .repo
        .get_doctor_profile(user.id)
        .await
        .map(Json)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "Doctor not found"))
}

// --- Doctor Worklist Handlers ---

/// get_doctor_worklist
///
/// [Doctor Route] Every appointment booked with the requesting doctor.
#[utoipa::path(
    get,
    path = "/api/doctor/appointments",
    responses(
        (status = 200, description = "Doctor's appointments", body = [DoctorAppointment]),
        (status = 403, description = "Not a doctor")
    )
)]
pub async fn get_doctor_worklist(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorAppointment>>, StatusCode> {
    user.require(&[Role::Doctor])?;
    Ok(Json(state.repo.get_doctor_appointments(user.id).await))
}

/// record_visit
///
/// [Doctor Route] Records the diagnosis and complaints for one of the
/// doctor's own appointments. One visit record per appointment.
#[utoipa::path(
    post,
    path = "/api/doctor/visits",
    request_body = RecordVisitRequest,
    responses(
        (status = 201, description = "Recorded", body = MessageResponse),
        (status = 403, description = "Not a doctor"),
        (status = 404, description = "Not this doctor's appointment", body = ErrorResponse),
        (status = 409, description = "Already recorded", body = ErrorResponse)
    )
)]
pub async fn record_visit(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RecordVisitRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    user.require(&[Role::Doctor])
        .map_err(|status| error_body(status, "Only doctors can record visits"))?;

    if !state
        .repo
        .appointment_owned_by_doctor(payload.appointment_id, user.id)
        .await
    {
        return Err(error_body(
            StatusCode::NOT_FOUND,
            "Appointment not found or not yours",
        ));
    }

    if state.repo.visit_recorded(payload.appointment_id).await {
        return Err(error_body(
            StatusCode::CONFLICT,
            "A diagnosis was already recorded for this appointment",
        ));
    }

    if state
        .repo
        .record_visit(payload.appointment_id, &payload.diagnosis, &payload.complaints)
        .await
    {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Visit recorded".to_string(),
            }),
        ))
    } else {
        Err(error_body(
            StatusCode::CONFLICT,
            "A diagnosis was already recorded for this appointment",
        ))
    }
}

// --- Report Handlers (Manager/Admin) ---

const REPORT_ROLES: &[Role] = &[Role::Manager, Role::Admin];

/// get_report_types
///
/// [Manager Route] The canned report catalogue.
#[utoipa::path(
    get,
    path = "/api/reports/types",
    responses(
        (status = 200, description = "Report types", body = [ReportType]),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn get_report_types(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportType>>, StatusCode> {
    user.require(REPORT_ROLES)?;
    Ok(Json(state.repo.get_report_types().await))
}

/// get_report_doctors
///
/// [Manager Route] Doctors with at least one recorded visit, for the
/// per-doctor report filter.
#[utoipa::path(
    get,
    path = "/api/reports/available-doctors",
    responses(
        (status = 200, description = "Doctors", body = [DoctorRef]),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn get_report_doctors(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorRef>>, StatusCode> {
    user.require(REPORT_ROLES)?;
    Ok(Json(state.repo.get_report_doctors().await))
}

/// generate_report
///
/// [Manager Route] Runs one of the three canned reports, persists the
/// summary for the history view, and returns it.
///
/// Types: 1 = patients per doctor per month, 2 = total patients per month,
/// 3 = patients by diagnosis.
#[utoipa::path(
    post,
    path = "/api/reports/generate",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report", body = ReportResult),
        (status = 400, description = "Bad parameters", body = ErrorResponse),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn generate_report(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<GenerateReportRequest>,
) -> Result<Json<ReportResult>, (StatusCode, Json<ErrorResponse>)> {
    user.require(REPORT_ROLES)
        .map_err(|status| error_body(status, "Reports are for managers"))?;

    let missing =
        |what: &str| error_body(StatusCode::BAD_REQUEST, &format!("Missing parameter: {what}"));
    let checked_month = |month: u32| {
        if (1..=12).contains(&month) {
            Ok(month)
        } else {
            Err(error_body(
                StatusCode::BAD_REQUEST,
                "Month must be between 1 and 12",
            ))
        }
    };

    let (report_type, summary) = match payload.report_type_id {
        1 => {
            let doctor_id = payload.doctor_id.ok_or_else(|| missing("doctor_id"))?;
            let year = payload.year.ok_or_else(|| missing("year"))?;
            let month = checked_month(payload.month.ok_or_else(|| missing("month"))?)?;
            let doctor_name = state
                .repo
                .doctor_name(doctor_id)
                .await
                .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "Doctor not found"))?;
            let patients = state.repo.count_doctor_visits(doctor_id, year, month).await;
            (
                "Patients per doctor per month",
                serde_json::json!({
                    "doctor_name": doctor_name,
                    "total_patients": patients,
                    "period": format!("{year}-{month:02}"),
                }),
            )
        }
        2 => {
            let year = payload.year.ok_or_else(|| missing("year"))?;
            let month = checked_month(payload.month.ok_or_else(|| missing("month"))?)?;
            let patients = state.repo.count_visits(year, month).await;
            (
                "Total patients per month",
                serde_json::json!({
                    "total_patients": patients,
                    "period": format!("{year}-{month:02}"),
                }),
            )
        }
        3 => {
            let diagnosis = payload.diagnosis.ok_or_else(|| missing("diagnosis"))?;
            let patients = state.repo.count_patients_by_diagnosis(&diagnosis).await;
            (
                "Patients by diagnosis",
                serde_json::json!({
                    "diagnosis": diagnosis,
                    "total_patients": patients,
                }),
            )
        }
        _ => {
            return Err(error_body(
                StatusCode::BAD_REQUEST,
                "Unsupported report type",
            ));
        }
    };

    state
        .repo
        .save_report(payload.report_type_id, user.id, summary.clone())
        .await;

    Ok(Json(ReportResult {
        report_type: report_type.to_string(),
        summary,
    }))
}

/// get_report_history
///
/// [Manager Route] Reports previously generated by the requesting user.
#[utoipa::path(
    get,
    path = "/api/reports/history",
    responses(
        (status = 200, description = "Report history", body = [ReportHistoryItem]),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn get_report_history(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportHistoryItem>>, StatusCode> {
    user.require(REPORT_ROLES)?;
    Ok(Json(state.repo.report_history(user.id).await))
}

/// delete_report
///
/// [Manager Route] Deletes one of the requester's own reports.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Wrong role"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_report(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    user.require(REPORT_ROLES)
        .map_err(|status| error_body(status, "Reports are for managers"))?;

    if state.repo.delete_report(id, user.id).await {
        Ok(Json(MessageResponse {
            message: "Report deleted".to_string(),
        }))
    } else {
        Err(error_body(StatusCode::NOT_FOUND, "Report not found"))
    }
}

// --- Admin Handlers ---

/// Tables the admin panel viewer may dump. A fixed whitelist instead of
/// the original's pass-through of arbitrary names (and its raw SQL
/// endpoint, which is deliberately not carried over).
pub const ADMIN_TABLES: &[&str] = &[
    "users",
    "roles",
    "patients",
    "doctors",
    "departments",
    "doctor_schedule",
    "appointments",
    "visits",
    "report_types",
    "reports",
];

/// get_admin_tables
///
/// [Admin Route] Table names visible in the raw-table viewer.
#[utoipa::path(
    get,
    path = "/api/admin/tables",
    responses(
        (status = 200, description = "Table names", body = [String]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_admin_tables(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, StatusCode> {
    user.require(&[Role::Admin])?;
    let tables = state
        .repo
        .list_tables()
        .await
        .into_iter()
        .filter(|t| ADMIN_TABLES.contains(&t.as_str()))
        .collect();
    Ok(Json(tables))
}

/// get_admin_table
///
/// [Admin Route] Raw dump of one whitelisted table.
#[utoipa::path(
    get,
    path = "/api/admin/table/{name}",
    params(("name" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Table dump", body = TableDump),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Unknown table", body = ErrorResponse)
    )
)]
pub async fn get_admin_table(
    user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TableDump>, (StatusCode, Json<ErrorResponse>)> {
    user.require(&[Role::Admin])
        .map_err(|status| error_body(status, "Admin only"))?;

    if !ADMIN_TABLES.contains(&name.as_str()) {
        return Err(error_body(StatusCode::NOT_FOUND, "Unknown table"));
    }

    let columns = state.repo.table_columns(&name).await;
    let rows = state.repo.dump_table_rows(&name).await;

    Ok(Json(TableDump {
        table: name,
        columns,
        rows,
    }))
}
