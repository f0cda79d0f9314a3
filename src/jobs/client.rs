//! Authenticated job-board client
//!
//! Calls the recommend listing and greeting endpoints with the cookies
//! and `zp_token` header obtained from a completed login. Both calls
//! fail with a login error when the shared state is not logged in yet.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::jobs::filters::{experience_code, job_type_code, salary_code};
use crate::types::jobs::{GreetingReceipt, JobFilters, JobListPage};
use crate::types::state::LoginState;
use crate::types::wire::{GreetingData, JobListData, ZpEnvelope};

const JOB_LIST_PATH: &str = "/wapi/zpgeek/pc/recommend/job/list.json";
const GREET_PATH: &str = "/wapi/zpgeek/friend/add.json";

pub struct JobsClient {
    http: Client,
    state: Arc<RwLock<LoginState>>,
}

impl JobsClient {
    pub fn new(http: Client, state: Arc<RwLock<LoginState>>) -> Self {
        Self { http, state }
    }

    /// Cookie and session token of the current login, or a login error.
    async fn credentials(&self) -> Result<(String, Option<String>)> {
        let state = self.state.read().await;
        if !state.is_logged_in {
            return Err(Error::login("not logged in; complete the QR login first"));
        }
        let cookie = state
            .cookie
            .clone()
            .ok_or_else(|| Error::login("logged in but no cookie recorded"))?;
        Ok((cookie, state.session_token.clone()))
    }

    fn timestamp_ms() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    /// Fetch a page of recommended jobs.
    ///
    /// Filter labels that don't map to a known upstream code are dropped
    /// from the query rather than rejected.
    pub async fn list_jobs(&self, base_url: &str, filters: &JobFilters) -> Result<JobListPage> {
        let (cookie, token) = self.credentials().await?;

        let mut query: Vec<(String, String)> = vec![
            ("page".into(), filters.page.to_string()),
            ("pageSize".into(), filters.page_size.to_string()),
            // Cache buster, same shape the web client sends.
            ("_".into(), Self::timestamp_ms().to_string()),
        ];
        if let Some(code) = filters.experience.as_deref().and_then(experience_code) {
            query.push(("experience".into(), code.to_string()));
        }
        if let Some(code) = filters.job_type.as_deref().and_then(job_type_code) {
            query.push(("jobType".into(), code.to_string()));
        }
        if let Some(code) = filters.salary.as_deref().and_then(salary_code) {
            query.push(("salary".into(), code.to_string()));
        }
        if let Some(expect_id) = &filters.encrypt_expect_id {
            query.push(("encryptExpectId".into(), expect_id.clone()));
        }

        let mut request = self
            .http
            .get(format!("{base_url}{JOB_LIST_PATH}"))
            .header("Cookie", &cookie)
            .query(&query);
        if let Some(token) = &token {
            request = request.header("zp_token", token);
        }

        let envelope: ZpEnvelope<JobListData> = request.send().await?.json().await?;
        let data = envelope.into_data()?;
        let total = data.job_list.len();
        debug!(total, has_more = data.has_more, "fetched job listings");
        Ok(JobListPage {
            has_more: data.has_more,
            job_list: data.job_list.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Send a greeting to the poster of a job.
    pub async fn send_greeting(
        &self,
        base_url: &str,
        security_id: &str,
        job_id: &str,
    ) -> Result<GreetingReceipt> {
        let (cookie, token) = self.credentials().await?;

        let mut request = self
            .http
            .get(format!("{base_url}{GREET_PATH}"))
            .header("Cookie", &cookie)
            .query(&[("securityId", security_id), ("jobId", job_id)]);
        if let Some(token) = &token {
            request = request.header("zp_token", token);
        }

        let envelope: ZpEnvelope<GreetingData> = request.send().await?.json().await?;
        let receipt: GreetingReceipt = envelope.into_data()?.into();
        info!(job_id = %job_id, "greeting sent");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> JobsClient {
        JobsClient::new(Client::new(), Arc::new(RwLock::new(LoginState::default())))
    }

    fn logged_in_client() -> JobsClient {
        let mut state = LoginState::default();
        state.mark_logged_in("wt2=abc; bst=xyz", Some("xyz".to_string()));
        JobsClient::new(Client::new(), Arc::new(RwLock::new(state)))
    }

    #[tokio::test]
    async fn test_list_jobs_requires_login() {
        let err = client()
            .list_jobs("http://unused.invalid", &JobFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Login(_)));
    }

    #[tokio::test]
    async fn test_greeting_requires_login() {
        let err = client()
            .send_greeting("http://unused.invalid", "sec", "job")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Login(_)));
    }

    #[tokio::test]
    async fn test_list_jobs_maps_filters_and_sends_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JOB_LIST_PATH))
            .and(query_param("experience", "101"))
            .and(query_param("jobType", "1901"))
            .and(query_param("page", "2"))
            .and(header("Cookie", "wt2=abc; bst=xyz"))
            .and(header("zp_token", "xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "zpData": {
                    "hasMore": true,
                    "jobList": [
                        { "securityId": "sec-1", "jobName": "Rust 工程师" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let filters = JobFilters::new()
            .with_page(2)
            .with_experience("不限")
            .with_job_type("全职")
            // Unknown label: silently dropped from the query.
            .with_salary("一个亿");
        let page = logged_in_client().list_jobs(&server.uri(), &filters).await.unwrap();

        assert!(page.has_more);
        assert_eq!(page.total, 1);
        assert_eq!(page.job_list[0].job_name.as_deref(), Some("Rust 工程师"));
    }

    #[tokio::test]
    async fn test_list_jobs_surfaces_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JOB_LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 37,
                "message": "请先登录"
            })))
            .mount(&server)
            .await;

        let err = logged_in_client()
            .list_jobs(&server.uri(), &JobFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { code: 37, .. }));
    }

    #[tokio::test]
    async fn test_send_greeting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GREET_PATH))
            .and(query_param("securityId", "sec-1"))
            .and(query_param("jobId", "job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "zpData": {
                    "showGreeting": true,
                    "securityId": "sec-1",
                    "encBossId": "boss-1"
                }
            })))
            .mount(&server)
            .await;

        let receipt = logged_in_client()
            .send_greeting(&server.uri(), "sec-1", "job-1")
            .await
            .unwrap();
        assert!(receipt.show_greeting);
        assert_eq!(receipt.enc_boss_id.as_deref(), Some("boss-1"));
    }
}
