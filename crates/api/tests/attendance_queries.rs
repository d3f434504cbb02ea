//! Integration tests for the read paths: enrichment, filtered lists,
//! date ranges and statistics.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;

use asistencia_core::status::AttendanceStatus;

use common::{
    body_json, get, sample_classroom, sample_institution, sample_record, sample_student,
    FakeAttendanceStore, FakeInstitutionDirectory, FakeStudentDirectory,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn populated_registries() -> (Arc<FakeStudentDirectory>, Arc<FakeInstitutionDirectory>) {
    let students = Arc::new(FakeStudentDirectory::with_students(vec![sample_student(
        "s-1",
        "María Quispe",
        "inst-1",
    )]));
    let institutions = Arc::new(FakeInstitutionDirectory::with_data(
        vec![sample_institution("inst-1", "I.E. Valle Grande")],
        vec![sample_classroom("classroom-1", "Tercero A", "inst-1")],
    ));
    (students, institutions)
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_resolves_display_names() {
    let store = Arc::new(FakeAttendanceStore::new());
    let record = sample_record("s-1", day(2025, 3, 10), AttendanceStatus::Presente);
    let id = record.id;
    store.seed(record);

    let (students, institutions) = populated_registries();
    let app = common::build_test_app(store, students, institutions);

    let response = get(app, &format!("/api/attendance/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["studentName"], "María Quispe");
    assert_eq!(json["classroomName"], "Tercero A");
    assert_eq!(json["institutionName"], "I.E. Valle Grande");
}

#[tokio::test]
async fn failed_student_lookup_degrades_to_sentinel() {
    let store = Arc::new(FakeAttendanceStore::new());
    let record = sample_record("s-1", day(2025, 3, 10), AttendanceStatus::Presente);
    let id = record.id;
    store.seed(record);

    // Student registry down; institution registry healthy.
    let (_, institutions) = populated_registries();
    let app = common::build_test_app(store, Arc::new(FakeStudentDirectory::failing()), institutions);

    let response = get(app, &format!("/api/attendance/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["studentName"], "Nombre no disponible");
    assert_eq!(json["classroomName"], "Tercero A");
    assert_eq!(json["institutionName"], "I.E. Valle Grande");
}

#[tokio::test]
async fn unknown_entities_degrade_to_sentinels() {
    let store = Arc::new(FakeAttendanceStore::new());
    let record = sample_record("s-unknown", day(2025, 3, 10), AttendanceStatus::Presente);
    let id = record.id;
    store.seed(record);

    // Registries are up but know nothing.
    let app = common::build_test_app(
        store,
        Arc::new(FakeStudentDirectory::default()),
        Arc::new(FakeInstitutionDirectory::default()),
    );

    let response = get(app, &format!("/api/attendance/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["studentName"], "Nombre no disponible");
    assert_eq!(json["classroomName"], "Aula no disponible");
    assert_eq!(json["institutionName"], "Institución no disponible");
}

#[tokio::test]
async fn get_by_id_unknown_is_404() {
    let app = common::build_default_app();
    let response = get(app, "/api/attendance/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Filtered lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_endpoints_filter_by_dimension() {
    let store = Arc::new(FakeAttendanceStore::new());
    store.seed(sample_record("s-1", day(2025, 3, 10), AttendanceStatus::Presente));
    store.seed(sample_record("s-2", day(2025, 3, 10), AttendanceStatus::Ausente));
    store.seed(sample_record("s-1", day(2025, 3, 11), AttendanceStatus::Tardanza));

    let (students, institutions) = populated_registries();
    let app = common::build_test_app(store, students, institutions);

    let all = body_json(get(app.clone(), "/api/attendance").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let by_student = body_json(get(app.clone(), "/api/attendance/student/s-1").await).await;
    assert_eq!(by_student.as_array().unwrap().len(), 2);

    let by_date = body_json(get(app.clone(), "/api/attendance/date/2025-03-10").await).await;
    assert_eq!(by_date.as_array().unwrap().len(), 2);

    let by_classroom_date = body_json(
        get(
            app.clone(),
            "/api/attendance/classroom/classroom-1/date/2025-03-11",
        )
        .await,
    )
    .await;
    assert_eq!(by_classroom_date.as_array().unwrap().len(), 1);

    let by_institution = body_json(get(app, "/api/attendance/institution/inst-1").await).await;
    assert_eq!(by_institution.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_results_are_enriched() {
    let store = Arc::new(FakeAttendanceStore::new());
    store.seed(sample_record("s-1", day(2025, 3, 10), AttendanceStatus::Presente));

    let (students, institutions) = populated_registries();
    let app = common::build_test_app(store, students, institutions);

    let json = body_json(get(app, "/api/attendance/student/s-1").await).await;
    assert_eq!(json[0]["studentName"], "María Quispe");
}

#[tokio::test]
async fn empty_filters_answer_empty_arrays() {
    let app = common::build_default_app();

    let json = body_json(get(app, "/api/attendance/classroom/nowhere").await).await;
    assert_eq!(json, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Date ranges and statistics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn range_is_inclusive_of_both_bounds() {
    let store = Arc::new(FakeAttendanceStore::new());
    store.seed(sample_record("s-1", day(2025, 3, 1), AttendanceStatus::Presente));
    store.seed(sample_record("s-1", day(2025, 3, 15), AttendanceStatus::Presente));
    store.seed(sample_record("s-1", day(2025, 3, 31), AttendanceStatus::Presente));
    store.seed(sample_record("s-1", day(2025, 4, 1), AttendanceStatus::Presente));

    let (students, institutions) = populated_registries();
    let app = common::build_test_app(store, students, institutions);

    let json = body_json(
        get(
            app,
            "/api/attendance/student/s-1/range?startDate=2025-03-01&endDate=2025-03-31",
        )
        .await,
    )
    .await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn stats_aggregate_per_status_with_rate() {
    let store = Arc::new(FakeAttendanceStore::new());
    store.seed(sample_record("s-1", day(2025, 3, 1), AttendanceStatus::Presente));
    store.seed(sample_record("s-1", day(2025, 3, 2), AttendanceStatus::Presente));
    store.seed(sample_record("s-1", day(2025, 3, 3), AttendanceStatus::Tardanza));
    store.seed(sample_record("s-1", day(2025, 3, 4), AttendanceStatus::Ausente));
    // Other students never leak into the aggregation.
    store.seed(sample_record("s-2", day(2025, 3, 1), AttendanceStatus::Ausente));

    let (students, institutions) = populated_registries();
    let app = common::build_test_app(store, students, institutions);

    let json = body_json(
        get(
            app,
            "/api/attendance/student/s-1/stats?startDate=2025-03-01&endDate=2025-03-31",
        )
        .await,
    )
    .await;

    assert_eq!(json["totalRecords"], 4);
    assert_eq!(json["presentCount"], 2);
    assert_eq!(json["lateCount"], 1);
    assert_eq!(json["absentCount"], 1);
    assert_eq!(json["justifiedCount"], 0);
    assert_eq!(json["permissionCount"], 0);
    // (2 present + 1 late) out of 4.
    assert_eq!(json["attendanceRate"], 75.0);
}

#[tokio::test]
async fn stats_over_empty_range_are_all_zero() {
    let app = common::build_default_app();

    let json = body_json(
        get(
            app,
            "/api/attendance/student/s-1/stats?startDate=2025-03-01&endDate=2025-03-31",
        )
        .await,
    )
    .await;

    assert_eq!(json["totalRecords"], 0);
    assert_eq!(json["attendanceRate"], 0.0);
}

#[tokio::test]
async fn range_requires_both_query_parameters() {
    let app = common::build_default_app();

    let response = get(app, "/api/attendance/student/s-1/range?startDate=2025-03-01").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
