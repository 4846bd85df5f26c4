//! Login and the cookie-backed session handle shared by every component.
//!
//! # Design
//! - One `reqwest::Client` with a cookie store holds the session cookie. The
//!   `Authenticator` owns it; `Session` is a cheap clone injected everywhere.
//! - Re-authenticating refreshes the cookie in the shared jar, so handles
//!   already given out keep working.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{AuthError, QbitError};
use crate::retry::RetryPolicy;

/// Body the login endpoint returns on success.
pub const LOGIN_SUCCESS_MARKER: &str = "Ok.";

const LOGIN_PATH: &str = "api/v2/auth/login";
const VERSION_PATH: &str = "api/v2/app/version";

/// Login credentials.
#[derive(Clone)]
pub struct Credentials {
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport settings for the shared client.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Upper bound on a single request.
    pub timeout: Duration,
    /// Retry budget for idempotent requests.
    pub retry: RetryPolicy,
}

/// Establishes and renews the authenticated session.
pub struct Authenticator {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    retry: RetryPolicy,
}

impl Authenticator {
    /// Build the shared cookie-aware client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Result<Self, QbitError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(options.timeout)
            .user_agent(concat!("peerban/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| QbitError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url,
            credentials,
            retry: options.retry,
        })
    }

    /// Submit the credentials and return a session handle.
    ///
    /// Only a 200 whose body is exactly [`LOGIN_SUCCESS_MARKER`] counts as
    /// success; anything else is terminal since retrying cannot fix bad
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the control API stays unreachable for the whole
    /// retry budget or refuses the login.
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        let url = endpoint(&self.base_url, LOGIN_PATH)
            .map_err(|source| AuthError::Request { source })?;
        let form = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];

        let response = self
            .retry
            .execute("auth.login", || self.client.post(url.clone()).form(&form))
            .await
            .map_err(|source| AuthError::Request { source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AuthError::Request {
                source: QbitError::ReadBody {
                    operation: "auth.login",
                    source,
                },
            })?;

        if status != StatusCode::OK {
            return Err(AuthError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        if body != LOGIN_SUCCESS_MARKER {
            return Err(AuthError::Rejected { body });
        }

        debug!(username = %self.credentials.username, "authenticated to control api");
        Ok(self.session())
    }

    fn session(&self) -> Session {
        Session {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            retry: self.retry,
        }
    }
}

/// Thread-safe handle on the authenticated client.
#[derive(Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Control API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the client version, used for diagnostics only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or does not answer 200.
    pub async fn app_version(&self) -> Result<String, QbitError> {
        const OPERATION: &str = "app.version";
        let url = endpoint(&self.base_url, VERSION_PATH)?;
        let response = self
            .retry
            .execute(OPERATION, || self.client.get(url.clone()))
            .await?;
        let body = success_body(OPERATION, response).await?;
        Ok(body.trim().to_string())
    }

    /// GET a JSON document through the retry executor.
    pub(crate) async fn get_json<T>(
        &self,
        operation: &'static str,
        path: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, QbitError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint(&self.base_url, path)?;
        let response = self
            .retry
            .execute(operation, || self.client.get(url.clone()).query(query))
            .await?;
        let body = success_body(operation, response).await?;
        serde_json::from_str(&body).map_err(|source| QbitError::Decode { operation, source })
    }

    /// POST a form whose success is signalled by an empty body.
    ///
    /// `Delivery::Once` bypasses the retry executor for submissions that must
    /// not be replayed.
    pub(crate) async fn submit_form(
        &self,
        operation: &'static str,
        path: &'static str,
        form: &[(&str, &str)],
        delivery: Delivery,
    ) -> Result<(), QbitError> {
        let url = endpoint(&self.base_url, path)?;
        let response = match delivery {
            Delivery::Once => self
                .client
                .post(url)
                .form(form)
                .send()
                .await
                .map_err(|source| QbitError::Transport { operation, source })?,
            Delivery::Retried => {
                self.retry
                    .execute(operation, || self.client.post(url.clone()).form(form))
                    .await?
            }
        };

        let body = success_body(operation, response).await?;
        if body.is_empty() {
            Ok(())
        } else {
            Err(QbitError::Rejected { operation, body })
        }
    }
}

/// Whether a submission may go through the retry executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Once,
    Retried,
}

fn endpoint(base_url: &Url, path: &'static str) -> Result<Url, QbitError> {
    base_url
        .join(path)
        .map_err(|source| QbitError::Endpoint { path, source })
}

/// Read the body of a 200 response, mapping other statuses to errors.
async fn success_body(operation: &'static str, response: Response) -> Result<String, QbitError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| QbitError::ReadBody { operation, source })?;

    match status {
        StatusCode::OK => Ok(body),
        StatusCode::FORBIDDEN => Err(QbitError::Forbidden { operation }),
        other => Err(QbitError::UnexpectedStatus {
            operation,
            status: other.as_u16(),
            body: body.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticator;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn login_succeeds_only_on_exact_marker() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v2/auth/login")
                .body("username=admin&password=adminadmin");
            then.status(200).body("Ok.");
        });

        let session = authenticator(&server)?.authenticate().await?;
        assert_eq!(session.base_url().as_str(), format!("{}/", server.base_url()));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn near_miss_markers_are_rejected_without_retry() -> anyhow::Result<()> {
        for body in ["ok", "Ok", "Fails.", ""] {
            let server = MockServer::start_async().await;
            let mock = server.mock(|when, then| {
                when.method(POST).path("/api/v2/auth/login");
                then.status(200).body(body);
            });

            let err = authenticator(&server)?
                .authenticate()
                .await
                .expect_err("near-miss marker must be rejected");
            assert!(matches!(err, AuthError::Rejected { body: ref returned } if returned == body));
            mock.assert_calls(1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn non_200_login_is_terminal() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v2/auth/login");
            then.status(403).body("Your IP address has been banned");
        });

        let err = authenticator(&server)?
            .authenticate()
            .await
            .expect_err("403 must be rejected");
        assert!(matches!(err, AuthError::UnexpectedStatus { status: 403 }));
        mock.assert_calls(1);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_login_exhausts_retries() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v2/auth/login");
            then.status(502);
        });

        let err = authenticator(&server)?
            .authenticate()
            .await
            .expect_err("502 must exhaust retries");
        assert!(matches!(
            err,
            AuthError::Request {
                source: QbitError::ExhaustedRetries { attempts: 2, .. }
            }
        ));
        mock.assert_calls(2);
        Ok(())
    }

    #[tokio::test]
    async fn session_cookie_is_replayed_on_later_calls() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/v2/auth/login");
            then.status(200)
                .header("set-cookie", "SID=abc123; HttpOnly; path=/")
                .body("Ok.");
        });
        let version = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/app/version")
                .header("cookie", "SID=abc123");
            then.status(200).body("v5.0.2\n");
        });

        let session = authenticator(&server)?.authenticate().await?;
        assert_eq!(session.app_version().await?, "v5.0.2");
        version.assert();
        Ok(())
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret"));
    }
}
