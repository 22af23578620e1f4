//! `reqwest` implementation of the activity service
//!
//! Routes:
//! - `GET    /activities`
//! - `GET    /activities/filter?category=C`
//! - `GET    /activities/categories`
//! - `POST   /activities/{name}/signup?email=E`
//! - `DELETE /activities/{name}/unregister?email=E`
//! - `POST   /activities/{name}/record-attendance?email=E&date=D`
//! - `GET    /activities/{name}/attendance[?email=E]`
//! - `GET    /students/{email}/activity-report`

use crate::error::ClientBuildError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use roster_core::{
    ActionReply, ActivityMap, AttendanceLookup, Category, ClientConfig, RosterService,
    ServiceError, StudentActivityReport,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Activity service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpRosterService {
    client: Client,
    base: Url,
}

impl HttpRosterService {
    /// Build a client for `config.base_url`
    ///
    /// # Errors
    /// `ClientBuildError::BaseUrl` when the base URL does not parse, is not
    /// http(s), or cannot carry path segments; `ClientBuildError::Client`
    /// when the TLS backend fails to initialize.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientBuildError> {
        let invalid = |reason: String| ClientBuildError::BaseUrl {
            url: config.base_url.clone(),
            reason,
        };
        let base = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", base.scheme())));
        }
        if base.cannot_be_a_base() {
            return Err(invalid("cannot carry path segments".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        tracing::debug!(%base, "http roster service ready");
        Ok(Self { client, base })
    }

    /// Base URL every route is resolved against
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL extended by escaped `segments` plus escaped `query` pairs
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "roster request");
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = request.send().await.map_err(|error| {
            tracing::error!(%error, "request failed without a response");
            ServiceError::transport(error.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ServiceError::transport(error.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|error| {
                tracing::error!(%status, %error, "unparsable success body");
                ServiceError::transport(format!("unparsable response: {error}"))
            });
        }

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Err(ServiceError::rejected(status.as_u16(), detail_of(&value))),
            Err(error) => {
                tracing::error!(%status, %error, "unparsable error body");
                Err(ServiceError::transport(format!(
                    "status {status} with unparsable body"
                )))
            }
        }
    }
}

/// Server reason of an error body; non-string details are rendered as JSON
fn detail_of(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl RosterService for HttpRosterService {
    async fn list_activities(&self) -> Result<ActivityMap, ServiceError> {
        let url = self.endpoint(&["activities"], &[]);
        self.send(self.request(Method::GET, url)).await
    }

    async fn filter_activities(&self, category: &Category) -> Result<ActivityMap, ServiceError> {
        let url = self.endpoint(&["activities", "filter"], &[("category", category.as_str())]);
        self.send(self.request(Method::GET, url)).await
    }

    async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        let url = self.endpoint(&["activities", "categories"], &[]);
        self.send(self.request(Method::GET, url)).await
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError> {
        let url = self.endpoint(&["activities", activity, "signup"], &[("email", email)]);
        self.send(self.request(Method::POST, url)).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError> {
        let url = self.endpoint(&["activities", activity, "unregister"], &[("email", email)]);
        self.send(self.request(Method::DELETE, url)).await
    }

    async fn record_attendance(
        &self,
        activity: &str,
        email: &str,
        date: &str,
    ) -> Result<ActionReply, ServiceError> {
        let url = self.endpoint(
            &["activities", activity, "record-attendance"],
            &[("email", email), ("date", date)],
        );
        self.send(self.request(Method::POST, url)).await
    }

    async fn activity_report(&self, email: &str) -> Result<StudentActivityReport, ServiceError> {
        let url = self.endpoint(&["students", email, "activity-report"], &[]);
        self.send(self.request(Method::GET, url)).await
    }

    async fn activity_attendance(
        &self,
        activity: &str,
        email: Option<&str>,
    ) -> Result<AttendanceLookup, ServiceError> {
        let query: Vec<(&str, &str)> = email.map(|e| ("email", e)).into_iter().collect();
        let url = self.endpoint(&["activities", activity, "attendance"], &query);
        self.send(self.request(Method::GET, url)).await
    }
}
