use serde_json::json;

use crate::domain::{Enrollment, EnrollmentSummary, ResourceId};
use crate::http::client::ApiClient;
use crate::http::request::ApiRequest;
use crate::session::Session;
use crate::testing::check::{CheckFailure, CheckResult, Passed, decode, expect_rejection, expect_status};
use crate::testing::{Category, Ledger};

const GROUP: &str = "All Enrollment Tests";

pub async fn run(client: &ApiClient, ledger: &mut Ledger, mut session: Session) -> Session {
    ledger.begin_group(Category::Enrollments);

    if session.token().is_none() {
        ledger.skip_group(Category::Enrollments, GROUP, "No auth token available");
        return session;
    }
    let Some(course_id) = session.course_id().cloned() else {
        ledger.skip_group(Category::Enrollments, GROUP, "No course ID available");
        return session;
    };

    let result = enroll(client, &mut session, &course_id).await;
    ledger.record(Category::Enrollments, "Course Enrollment", result);

    let result = list_enrollments(client, &session).await;
    ledger.record(Category::Enrollments, "Get User Enrollments", result);

    let result = duplicate_enrollment(client, &session, &course_id).await;
    ledger.record(Category::Enrollments, "Duplicate Enrollment Prevention", result);

    let result = anonymous_listing(client, &session).await;
    ledger.record(Category::Enrollments, "Unauthorized Access Prevention", result);

    session
}

fn enroll_request(session: &Session, course_id: &ResourceId) -> ApiRequest {
    session.post("/enrollments", json!({ "courseId": course_id.to_json() }))
}

async fn enroll(client: &ApiClient, session: &mut Session, course_id: &ResourceId) -> CheckResult {
    let request = enroll_request(session, course_id);
    let response = expect_status(client.send(&request).await, 200)?;
    let enrollment: Enrollment = decode(&response)?;

    session.capture_enrollment(enrollment.id);
    Ok(Passed::new(format!("Enrolled in course: {}", enrollment.course_id)))
}

async fn list_enrollments(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.get("/enrollments");
    let response = expect_status(client.send(&request).await, 200)?;
    let enrollments: Vec<EnrollmentSummary> = decode(&response)?;

    if enrollments.is_empty() {
        return Err(CheckFailure::MissingData("No enrollments returned".into()));
    }
    if enrollments
        .iter()
        .any(|entry| entry.course.is_null() || entry.progress.is_null())
    {
        return Err(CheckFailure::MissingData("Missing course or progress data".into()));
    }
    Ok(Passed::new(format!("Retrieved {} enrollments", enrollments.len())))
}

async fn duplicate_enrollment(
    client: &ApiClient,
    session: &Session,
    course_id: &ResourceId,
) -> CheckResult {
    let request = enroll_request(session, course_id);
    expect_rejection(
        client.send(&request).await,
        400,
        "Correctly prevented duplicate enrollment",
    )
}

async fn anonymous_listing(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.get("/enrollments").anonymous();
    expect_rejection(
        client.send(&request).await,
        401,
        "Correctly rejected unauthorized access",
    )
}
