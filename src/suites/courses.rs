use serde_json::Value;

use crate::domain::{Course, ResourceId};
use crate::http::client::ApiClient;
use crate::session::Session;
use crate::testing::check::{CheckFailure, CheckResult, Passed, decode, expect_rejection, expect_status};
use crate::testing::{Category, Ledger};

const MISSING_COURSE_ID: &str = "nonexistent-id";

/// The catalog is public; this group has no precondition.
pub async fn run(client: &ApiClient, ledger: &mut Ledger, mut session: Session) -> Session {
    ledger.begin_group(Category::Courses);

    let result = list_courses(client, &mut session).await;
    ledger.record(Category::Courses, "Get All Courses", result);

    if let Some(course_id) = session.course_id() {
        let result = course_by_id(client, &session, course_id).await;
        ledger.record(Category::Courses, "Get Course by ID", result);
    }

    let result = missing_course(client, &session).await;
    ledger.record(Category::Courses, "Non-existent Course Handling", result);

    session
}

async fn list_courses(client: &ApiClient, session: &mut Session) -> CheckResult {
    let request = session.get("/courses");
    let response = expect_status(client.send(&request).await, 200)?;
    // Only the first entry is read; later ones may have any shape.
    let courses: Vec<Value> = decode(&response)?;

    let first = courses
        .first()
        .ok_or_else(|| CheckFailure::MissingData("No courses returned".into()))?;
    let first: Course = serde_json::from_value(first.clone())
        .map_err(|err| CheckFailure::MalformedBody(err.to_string()))?;
    session.capture_course(first.id);
    Ok(Passed::new(format!("Retrieved {} courses", courses.len())))
}

async fn course_by_id(client: &ApiClient, session: &Session, course_id: &ResourceId) -> CheckResult {
    let request = session.get(format!("/courses/{course_id}"));
    let response = expect_status(client.send(&request).await, 200)?;
    let course: Course = decode(&response)?;

    if &course.id != course_id {
        return Err(CheckFailure::Mismatch(format!(
            "Course ID mismatch: expected {course_id}, got {}",
            course.id
        )));
    }
    Ok(Passed::new(format!("Retrieved course: {}", course.title)))
}

async fn missing_course(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.get(format!("/courses/{MISSING_COURSE_ID}"));
    expect_rejection(
        client.send(&request).await,
        404,
        "Correctly returned 404 for invalid course ID",
    )
}
