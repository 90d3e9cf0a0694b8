mod common;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, NaiveTime};
use clinic_portal::{
    auth::{AuthUser, MaybeAuthUser},
    handlers,
    models::{
        CreateAppointmentRequest, GenerateReportRequest, LoginRequest, RecordVisitRequest,
        RegisterRequest, Role, ScheduleWindow, SlotQuery,
    },
};
use common::{ADMIN_ID, DOCTOR_ID, MANAGER_ID, PATIENT_ID, test_state};

fn auth(id: i64, login: &str, role: Role) -> AuthUser {
    AuthUser {
        id,
        login: login.to_string(),
        role,
    }
}

fn patient() -> AuthUser {
    auth(PATIENT_ID, "patient", Role::Patient)
}

fn doctor() -> AuthUser {
    auth(DOCTOR_ID, "doctor", Role::Doctor)
}

fn manager() -> AuthUser {
    auth(MANAGER_ID, "manager", Role::Manager)
}

fn admin() -> AuthUser {
    auth(ADMIN_ID, "admin", Role::Admin)
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Slot Computation ---

fn window(start: (u32, u32), end: (u32, u32)) -> ScheduleWindow {
    ScheduleWindow {
        day_of_week: 1,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        cabinet: "101".to_string(),
    }
}

#[test]
fn slots_cover_the_window_in_half_hours() {
    let slots = handlers::compute_slots(&window((9, 0), (12, 0)), &[]);
    assert_eq!(
        slots,
        vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
    );
}

#[test]
fn booked_times_are_excluded() {
    let busy = vec![
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
    ];
    let slots = handlers::compute_slots(&window((9, 0), (12, 0)), &busy);
    assert_eq!(slots, vec!["09:00", "10:00", "10:30", "11:30"]);
}

#[test]
fn empty_window_yields_no_slots() {
    assert!(handlers::compute_slots(&window((9, 0), (9, 0)), &[]).is_empty());
}

#[test]
fn window_end_is_exclusive() {
    let slots = handlers::compute_slots(&window((9, 0), (9, 30)), &[]);
    assert_eq!(slots, vec!["09:00"]);
}

// A window ending just before midnight must not send the slot walk
// around the clock.
#[test]
fn late_evening_window_terminates() {
    let slots = handlers::compute_slots(&window((23, 0), (23, 45)), &[]);
    assert_eq!(slots, vec!["23:00", "23:30"]);
}

#[test]
fn inverted_window_yields_no_slots() {
    assert!(handlers::compute_slots(&window((12, 0), (9, 0)), &[]).is_empty());
}

// --- Auth Handlers ---

#[tokio::test]
async fn login_with_valid_credentials_sets_the_session_cookie() {
    let state = test_state();
    let response = handlers::login(
        State(state),
        Json(LoginRequest {
            login: "patient".to_string(),
            password: "test".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_id="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["login"], "patient");
    assert_eq!(body["user"]["role"], "patient");
}

#[tokio::test]
async fn login_with_a_wrong_password_is_rejected() {
    let state = test_state();
    let response = handlers::login(
        State(state),
        Json(LoginRequest {
            login: "patient".to_string(),
            password: "not-the-password".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_an_unknown_user_is_indistinguishable_from_a_wrong_password() {
    let state = test_state();
    let response = handlers::login(
        State(state),
        Json(LoginRequest {
            login: "nobody".to_string(),
            password: "test".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid login or password");
}

#[tokio::test]
async fn registration_rejects_empty_credentials() {
    let state = test_state();
    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            login: "   ".to_string(),
            password: "pw".to_string(),
        }),
    )
    .await;

    assert_eq!(result.err().map(|(s, _)| s), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn registration_conflicts_on_a_taken_login() {
    let state = test_state();
    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            login: "patient".to_string(),
            password: "pw".to_string(),
        }),
    )
    .await;

    assert_eq!(result.err().map(|(s, _)| s), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn registration_creates_a_fresh_patient() {
    let state = test_state();
    let (status, _) = handlers::register(
        State(state),
        Json(RegisterRequest {
            login: "newcomer".to_string(),
            password: "pw".to_string(),
        }),
    )
    .await
    .expect("fresh login must register");

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn me_echoes_the_authenticated_identity() {
    let response = handlers::me(patient()).await;
    assert_eq!(response.0.user.id, PATIENT_ID);
    assert_eq!(response.0.user.role, Role::Patient);
}

// --- Navigation ---

#[tokio::test]
async fn navigation_serves_the_anonymous_menu_without_a_session() {
    let menu = handlers::navigation(MaybeAuthUser(None)).await.0;
    assert_eq!(menu.first().map(|i| i.path.as_str()), Some("/"));
    assert!(menu.iter().any(|i| i.path == "/login"));
}

#[tokio::test]
async fn navigation_follows_the_session_role() {
    let menu = handlers::navigation(MaybeAuthUser(Some(patient()))).await.0;
    assert!(menu.iter().any(|i| i.path == "/appointment"));
    assert!(!menu.iter().any(|i| i.path == "/admin"));
}

// --- Appointments ---

#[tokio::test]
async fn available_slots_cover_the_working_window() {
    let state = test_state();
    let response = handlers::get_available_slots(
        patient(),
        State(state),
        Query(SlotQuery {
            doctor_id: 10,
            date: monday(),
        }),
    )
    .await
    .expect("window is defined for every weekday in the mock");

    assert_eq!(response.0.available_slots.len(), 6);
    assert_eq!(response.0.available_slots[0], "09:00");
}

#[tokio::test]
async fn booking_a_slot_then_rebooking_it_conflicts() {
    let state = test_state();
    let payload = CreateAppointmentRequest {
        doctor_id: 10,
        date: monday(),
        time: "09:30".to_string(),
    };

    let (status, _) =
        handlers::create_appointment(patient(), State(state.clone()), Json(payload.clone()))
            .await
            .expect("first booking succeeds");
    assert_eq!(status, StatusCode::CREATED);

    let second = handlers::create_appointment(patient(), State(state.clone()), Json(payload)).await;
    assert_eq!(second.err().map(|(s, _)| s), Some(StatusCode::CONFLICT));

    // The booked slot disappears from the availability list.
    let slots = handlers::get_available_slots(
        patient(),
        State(state),
        Query(SlotQuery {
            doctor_id: 10,
            date: monday(),
        }),
    )
    .await
    .unwrap();
    assert!(!slots.0.available_slots.contains(&"09:30".to_string()));
}

#[tokio::test]
async fn only_patients_may_book() {
    let state = test_state();
    let result = handlers::create_appointment(
        doctor(),
        State(state),
        Json(CreateAppointmentRequest {
            doctor_id: 10,
            date: monday(),
            time: "09:00".to_string(),
        }),
    )
    .await;

    assert_eq!(result.err().map(|(s, _)| s), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn booking_validates_the_time_format_and_window() {
    let state = test_state();

    let malformed = handlers::create_appointment(
        patient(),
        State(state.clone()),
        Json(CreateAppointmentRequest {
            doctor_id: 10,
            date: monday(),
            time: "quarter past nine".to_string(),
        }),
    )
    .await;
    assert_eq!(
        malformed.err().map(|(s, _)| s),
        Some(StatusCode::BAD_REQUEST)
    );

    let outside = handlers::create_appointment(
        patient(),
        State(state),
        Json(CreateAppointmentRequest {
            doctor_id: 10,
            date: monday(),
            time: "13:00".to_string(),
        }),
    )
    .await;
    assert_eq!(outside.err().map(|(s, _)| s), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn cancellation_is_owner_only() {
    let state = test_state();

    let owned = handlers::cancel_appointment(patient(), State(state.clone()), Path(500)).await;
    assert!(owned.is_ok());

    let foreign = handlers::cancel_appointment(patient(), State(state), Path(501)).await;
    assert_eq!(foreign.err().map(|(s, _)| s), Some(StatusCode::NOT_FOUND));
}

// --- Doctor Worklist ---

#[tokio::test]
async fn recording_a_visit_twice_conflicts() {
    let state = test_state();
    let payload = RecordVisitRequest {
        appointment_id: 600,
        diagnosis: "ARVI".to_string(),
        complaints: "Fever".to_string(),
    };

    let (status, _) = handlers::record_visit(doctor(), State(state.clone()), Json(payload.clone()))
        .await
        .expect("first record succeeds");
    assert_eq!(status, StatusCode::CREATED);

    let second = handlers::record_visit(doctor(), State(state), Json(payload)).await;
    assert_eq!(second.err().map(|(s, _)| s), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn visits_can_only_be_recorded_on_own_appointments() {
    let state = test_state();
    let result = handlers::record_visit(
        doctor(),
        State(state),
        Json(RecordVisitRequest {
            appointment_id: 999,
            diagnosis: "ARVI".to_string(),
            complaints: "Fever".to_string(),
        }),
    )
    .await;

    assert_eq!(result.err().map(|(s, _)| s), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn worklist_is_doctors_only() {
    let state = test_state();
    assert_eq!(
        handlers::get_doctor_worklist(patient(), State(state))
            .await
            .err(),
        Some(StatusCode::FORBIDDEN)
    );
}

// --- Reports ---

#[tokio::test]
async fn per_doctor_report_carries_the_doctor_and_period() {
    let state = test_state();
    let response = handlers::generate_report(
        manager(),
        State(state),
        Json(GenerateReportRequest {
            report_type_id: 1,
            doctor_id: Some(10),
            year: Some(2026),
            month: Some(8),
            diagnosis: None,
        }),
    )
    .await
    .expect("report must generate");

    assert_eq!(response.0.report_type, "Patients per doctor per month");
    assert_eq!(response.0.summary["doctor_name"], "Test Doctor");
    assert_eq!(response.0.summary["total_patients"], 7);
    assert_eq!(response.0.summary["period"], "2026-08");
}

#[tokio::test]
async fn report_parameters_are_validated_per_type() {
    let state = test_state();

    let missing = handlers::generate_report(
        manager(),
        State(state.clone()),
        Json(GenerateReportRequest {
            report_type_id: 1,
            doctor_id: None,
            year: Some(2026),
            month: Some(8),
            diagnosis: None,
        }),
    )
    .await;
    assert_eq!(missing.err().map(|(s, _)| s), Some(StatusCode::BAD_REQUEST));

    let bad_month = handlers::generate_report(
        manager(),
        State(state.clone()),
        Json(GenerateReportRequest {
            report_type_id: 2,
            year: Some(2026),
            month: Some(13),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(
        bad_month.err().map(|(s, _)| s),
        Some(StatusCode::BAD_REQUEST)
    );

    let unknown_type = handlers::generate_report(
        manager(),
        State(state),
        Json(GenerateReportRequest {
            report_type_id: 42,
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(
        unknown_type.err().map(|(s, _)| s),
        Some(StatusCode::BAD_REQUEST)
    );
}

#[tokio::test]
async fn diagnosis_report_needs_no_period() {
    let state = test_state();
    let response = handlers::generate_report(
        admin(),
        State(state),
        Json(GenerateReportRequest {
            report_type_id: 3,
            diagnosis: Some("ARVI".to_string()),
            ..Default::default()
        }),
    )
    .await
    .expect("admin may run reports too");

    assert_eq!(response.0.summary["diagnosis"], "ARVI");
    assert_eq!(response.0.summary["total_patients"], 3);
}

#[tokio::test]
async fn reports_are_closed_to_patients_and_doctors() {
    let state = test_state();
    assert_eq!(
        handlers::get_report_types(patient(), State(state.clone()))
            .await
            .err(),
        Some(StatusCode::FORBIDDEN)
    );
    assert_eq!(
        handlers::get_report_types(doctor(), State(state))
            .await
            .err(),
        Some(StatusCode::FORBIDDEN)
    );
}

// --- Admin Panel ---

#[tokio::test]
async fn admin_table_list_is_filtered_by_the_whitelist() {
    let state = test_state();
    let tables = handlers::get_admin_tables(admin(), State(state))
        .await
        .expect("admin may list tables")
        .0;

    // The mock reports sqlx_migrations too; the whitelist drops it.
    assert_eq!(tables, vec!["users".to_string()]);
}

#[tokio::test]
async fn unknown_tables_cannot_be_dumped() {
    let state = test_state();
    let result =
        handlers::get_admin_table(admin(), State(state), Path("pg_shadow".to_string())).await;
    assert_eq!(result.err().map(|(s, _)| s), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn whitelisted_table_dump_carries_columns_and_rows() {
    let state = test_state();
    let dump = handlers::get_admin_table(admin(), State(state), Path("users".to_string()))
        .await
        .expect("whitelisted table must dump")
        .0;

    assert_eq!(dump.table, "users");
    assert_eq!(dump.columns, vec!["id", "login"]);
    assert_eq!(dump.rows.len(), 1);
}

#[tokio::test]
async fn admin_panel_is_closed_to_managers() {
    let state = test_state();
    assert_eq!(
        handlers::get_admin_tables(manager(), State(state))
            .await
            .err(),
        Some(StatusCode::FORBIDDEN)
    );
}
