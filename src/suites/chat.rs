use serde_json::json;

use crate::domain::{ChatReply, ChatSession, ResourceId};
use crate::http::client::ApiClient;
use crate::session::Session;
use crate::testing::check::{
    CheckFailure, CheckResult, Passed, decode, expect_rejection, expect_status,
};
use crate::testing::{Category, Ledger};

const MISSING_SESSION_ID: &str = "invalid-session-id";
const MENTOR_PROMPT: &str = "Hello! Can you help me understand the basics of web development?";
/// Error text the platform returns while its AI mentor backend is offline.
const MENTOR_UNAVAILABLE: &str = "AI mentor unavailable";

pub async fn run(client: &ApiClient, ledger: &mut Ledger, mut session: Session) -> Session {
    ledger.begin_group(Category::Chat);

    let Some(course_id) = session.course_id().cloned().filter(|_| session.token().is_some()) else {
        ledger.skip_group(Category::Chat, "All Chat Tests", "Missing auth token or course ID");
        return session;
    };

    let result = create_session(client, &mut session, &course_id).await;
    ledger.record(Category::Chat, "Create Chat Session", result);

    if let Some(chat_id) = session.chat_session_id() {
        let result = fetch_session(client, &session, chat_id).await;
        ledger.record(Category::Chat, "Get Chat Session", result);

        let result = send_message(client, &session, chat_id).await;
        ledger.record(Category::Chat, "Send Message to AI", result);
    }

    let result = missing_session(client, &session).await;
    ledger.record(Category::Chat, "Invalid Session Handling", result);

    session
}

async fn create_session(client: &ApiClient, session: &mut Session, course_id: &ResourceId) -> CheckResult {
    let request = session.post("/chat/session", json!({ "courseId": course_id.to_json() }));
    let response = expect_status(client.send(&request).await, 200)?;
    let chat: ChatSession = decode(&response)?;
    let messages = chat
        .messages
        .ok_or_else(|| CheckFailure::MissingData("Missing session ID or messages".into()))?;

    session.capture_chat_session(chat.id);
    Ok(Passed::new(format!(
        "Session created with {} initial messages",
        messages.len()
    )))
}

async fn fetch_session(client: &ApiClient, session: &Session, chat_id: &ResourceId) -> CheckResult {
    let request = session.get(format!("/chat/{chat_id}"));
    let response = expect_status(client.send(&request).await, 200)?;
    let chat: ChatSession = decode(&response)?;

    if &chat.id != chat_id {
        return Err(CheckFailure::Mismatch(format!(
            "Session ID mismatch: expected {chat_id}, got {}",
            chat.id
        )));
    }
    Ok(Passed::new(format!(
        "Retrieved session with {} messages",
        chat.messages.map_or(0, |m| m.len())
    )))
}

/// A 500 naming the unavailable mentor is tolerated as a degraded pass.
async fn send_message(client: &ApiClient, session: &Session, chat_id: &ResourceId) -> CheckResult {
    let request = session.post(format!("/chat/{chat_id}"), json!({ "message": MENTOR_PROMPT }));
    let response = match expect_status(client.send(&request).await, 200) {
        Ok(response) => response,
        Err(CheckFailure::UnexpectedStatus {
            actual: 500,
            message,
            ..
        }) if message.contains(MENTOR_UNAVAILABLE) => {
            return Ok(Passed::degraded(
                "AI mentor service unavailable (expected in test environment)",
                format!("AI mentor service unavailable (Error: {message})"),
            ));
        }
        Err(failure) => return Err(failure),
    };

    let reply: ChatReply = decode(&response)?;
    if reply.message.is_empty() {
        return Err(CheckFailure::MissingData("Empty AI response".into()));
    }
    Ok(Passed::new(format!(
        "AI responded with {} characters",
        reply.message.chars().count()
    )))
}

async fn missing_session(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.get(format!("/chat/{MISSING_SESSION_ID}"));
    expect_rejection(
        client.send(&request).await,
        404,
        "Correctly rejected invalid session ID",
    )
}
