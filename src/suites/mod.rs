//! # Test Groups
//!
//! The five groups run strictly in order. Each takes the session produced by
//! the one before it and hands back the session it leaves behind; a group
//! whose inputs are missing records one failure and returns unchanged.

mod auth;
mod chat;
mod courses;
mod enrollments;
mod progress;

#[cfg(test)]
pub(crate) mod fake_platform;

use crate::http::client::ApiClient;
use crate::session::Session;
use crate::testing::Ledger;

pub async fn run_all(client: &ApiClient, ledger: &mut Ledger, session: Session) -> Session {
    let session = auth::run(client, ledger, session).await;
    let session = courses::run(client, ledger, session).await;
    let session = enrollments::run(client, ledger, session).await;
    let session = progress::run(client, ledger, session).await;
    chat::run(client, ledger, session).await
}
