use serde_json::json;

use crate::domain::{AuthResponse, UserProfile};
use crate::http::client::ApiClient;
use crate::session::Session;
use crate::testing::check::{CheckFailure, CheckResult, Passed, decode, expect_rejection, expect_status};
use crate::testing::{Category, Ledger};

const INVALID_EMAIL: &str = "invalid@test.com";
const INVALID_PASSWORD: &str = "wrongpassword";

pub async fn run(client: &ApiClient, ledger: &mut Ledger, mut session: Session) -> Session {
    ledger.begin_group(Category::Auth);

    let result = signup(client, &mut session).await;
    ledger.record(Category::Auth, "User Signup", result);

    let result = login(client, &mut session).await;
    ledger.record(Category::Auth, "User Login", result);

    let result = current_user(client, &session).await;
    ledger.record(Category::Auth, "Get Current User", result);

    let result = invalid_login(client, &session).await;
    ledger.record(Category::Auth, "Invalid Login Rejection", result);

    session
}

async fn signup(client: &ApiClient, session: &mut Session) -> CheckResult {
    let request = session.post("/auth/signup", session.user().signup_body());
    let response = expect_status(client.send(&request).await, 200)?;
    let body: AuthResponse = decode(&response)?;

    session.set_token(body.token);
    Ok(Passed::new(format!("User created: {}", body.user.name)))
}

async fn login(client: &ApiClient, session: &mut Session) -> CheckResult {
    let request = session.post("/auth/login", session.user().login_body());
    let response = expect_status(client.send(&request).await, 200)?;
    let body: AuthResponse = decode(&response)?;

    session.set_token(body.token);
    Ok(Passed::new(format!("Login successful for: {}", body.user.email)))
}

async fn current_user(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.get("/auth/me");
    let response = expect_status(client.send(&request).await, 200)?;
    let profile: UserProfile = decode(&response)?;

    if profile.email != session.user().email {
        return Err(CheckFailure::Mismatch(format!(
            "User data mismatch: expected {}, got {}",
            session.user().email,
            profile.email
        )));
    }
    Ok(Passed::new(format!("User data retrieved: {}", profile.name)))
}

async fn invalid_login(client: &ApiClient, session: &Session) -> CheckResult {
    let request = session.post(
        "/auth/login",
        json!({ "email": INVALID_EMAIL, "password": INVALID_PASSWORD }),
    );
    expect_rejection(
        client.send(&request).await,
        401,
        "Correctly rejected invalid credentials",
    )
}
