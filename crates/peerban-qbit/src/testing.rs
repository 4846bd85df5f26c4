//! Shared helpers for tests that talk to a mocked control API.

use std::time::Duration;

use httpmock::prelude::*;

use crate::retry::RetryPolicy;
use crate::session::{Authenticator, ClientOptions, Credentials, Session};

pub(crate) fn authenticator(server: &MockServer) -> anyhow::Result<Authenticator> {
    Ok(Authenticator::new(
        server.base_url().parse()?,
        Credentials {
            username: "admin".to_string(),
            password: "adminadmin".to_string(),
        },
        ClientOptions {
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::new(2, Duration::from_millis(10)),
        },
    )?)
}

/// Mock a successful login and return the resulting session.
pub(crate) async fn session(server: &MockServer) -> anyhow::Result<Session> {
    server.mock(|when, then| {
        when.method(POST).path("/api/v2/auth/login");
        then.status(200).body("Ok.");
    });
    Ok(authenticator(server)?.authenticate().await?)
}
