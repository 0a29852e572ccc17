use serde_json::{Value, json};

use crate::domain::{ProgressUpdate, ResourceId, XpTotal};
use crate::http::client::ApiClient;
use crate::http::request::ApiRequest;
use crate::session::Session;
use crate::testing::check::{CheckFailure, CheckResult, Passed, decode, expect_rejection, expect_status};
use crate::testing::{Category, Ledger};

const INVALID_ENROLLMENT_ID: &str = "invalid-enrollment-id";
/// XP the two mission submissions add up to when the API accumulates.
const CUMULATIVE_XP: f64 = 250.0;

pub async fn run(client: &ApiClient, ledger: &mut Ledger, session: Session) -> Session {
    ledger.begin_group(Category::Progress);

    let Some(enrollment_id) = session.enrollment_id().cloned().filter(|_| session.token().is_some())
    else {
        ledger.skip_group(
            Category::Progress,
            "All Progress Tests",
            "Missing auth token or enrollment ID",
        );
        return session;
    };

    let result = first_mission(client, &session, &enrollment_id).await;
    ledger.record(Category::Progress, "Progress Update & XP Award", result);

    let result = second_mission(client, &session, &enrollment_id).await;
    ledger.record(Category::Progress, "Multiple Mission Completion", result);

    let result = unknown_enrollment(client, &session).await;
    ledger.record(Category::Progress, "Invalid Enrollment Handling", result);

    session
}

fn progress_request(session: &Session, enrollment_id: Value, mission_id: u32, xp_earned: u32) -> ApiRequest {
    session.put(
        "/progress",
        json!({
            "enrollmentId": enrollment_id,
            "missionId": mission_id,
            "xpEarned": xp_earned,
        }),
    )
}

async fn first_mission(client: &ApiClient, session: &Session, enrollment_id: &ResourceId) -> CheckResult {
    let request = progress_request(session, enrollment_id.to_json(), 1, 100);
    let response = expect_status(client.send(&request).await, 200)?;
    let update: ProgressUpdate = decode(&response)?;

    if !update.success {
        return Err(CheckFailure::Mismatch(
            "Progress update was not acknowledged".into(),
        ));
    }
    let progress = update
        .progress
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string());
    Ok(Passed::new(format!(
        "XP: {}, Level: {}, Progress: {}%",
        update.new_xp, update.new_level, progress
    )))
}

async fn second_mission(client: &ApiClient, session: &Session, enrollment_id: &ResourceId) -> CheckResult {
    let request = progress_request(session, enrollment_id.to_json(), 2, 150);
    let response = expect_status(client.send(&request).await, 200)?;
    let total: XpTotal = decode(&response)?;

    if total.new_xp < CUMULATIVE_XP {
        return Err(CheckFailure::Mismatch(format!(
            "XP not accumulating correctly: {}",
            total.new_xp
        )));
    }
    Ok(Passed::new(format!("Cumulative XP: {}", total.new_xp)))
}

async fn unknown_enrollment(client: &ApiClient, session: &Session) -> CheckResult {
    let request = progress_request(session, json!(INVALID_ENROLLMENT_ID), 1, 100);
    expect_rejection(
        client.send(&request).await,
        404,
        "Correctly rejected invalid enrollment ID",
    )
}
