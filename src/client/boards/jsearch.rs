//! JSearch board adapter (RapidAPI).
//!
//! JSearch aggregates postings from Google for Jobs, which includes
//! LinkedIn, Indeed, Glassdoor, ZipRecruiter, and others.

use super::traits::{AdapterError, BoardAdapter, SearchCriteria};
use crate::client::rate_limiter::RateLimiter;
use crate::client::{JobPosting, RemoteType};
use crate::config::BoardConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const API_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
const DEFAULT_API_HOST: &str = "jsearch.p.rapidapi.com";
const LOCATION_UNSPECIFIED: &str = "Location not specified";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter-specific settings carried opaquely in the board configuration.
#[derive(Debug, Deserialize)]
struct JSearchSettings {
    api_key: Option<String>,
    api_host: Option<String>,
    /// Base URL override, for tests and proxies
    endpoint: Option<String>,
    #[serde(default)]
    rate_limit: RateLimitSettings,
    #[serde(default)]
    search_params: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RateLimitSettings {
    #[serde(default = "default_requests_per_second")]
    requests_per_second: f64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
        }
    }
}

const fn default_requests_per_second() -> f64 {
    1.0
}

/// One job record as JSearch returns it. Typed fields fail per record on
/// type mismatches; list-or-absent fields stay as raw values and are read
/// leniently.
#[derive(Debug, Deserialize)]
struct RawJob {
    job_title: Option<String>,
    employer_name: Option<String>,
    job_city: Option<String>,
    job_state: Option<String>,
    job_country: Option<String>,
    job_is_remote: Option<bool>,
    job_description: Option<String>,
    job_min_salary: Option<f64>,
    job_max_salary: Option<f64>,
    job_required_skills: Option<Value>,
    job_highlights: Option<Value>,
    job_posted_at_timestamp: Option<Value>,
    job_posted_at_datetime_utc: Option<String>,
    job_apply_link: Option<String>,
    job_id: Option<String>,
}

/// Response envelope shared by the /search and /job-details endpoints
#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
}

impl SearchResponse {
    fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}

/// Adapter for the JSearch API via RapidAPI
pub struct JSearchAdapter {
    board_name: String,
    client: Client,
    api_key: String,
    api_host: String,
    endpoint: String,
    rate_limiter: RateLimiter,
    search_params: serde_json::Map<String, Value>,
}

impl JSearchAdapter {
    /// Build the adapter from its board configuration.
    ///
    /// Fails immediately when the RapidAPI key is missing, so
    /// misconfiguration surfaces at startup rather than mid-run.
    pub fn from_config(config: &BoardConfig) -> Result<Self, AdapterError> {
        let settings: JSearchSettings = serde_json::from_value(config.settings_value())
            .map_err(|e| {
                AdapterError::InvalidConfig(format!(
                    "board '{}' has invalid jsearch settings: {e}",
                    config.name
                ))
            })?;

        let api_key = settings
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AdapterError::MissingCredential(
                    "JSearch adapter requires 'api_key' in configuration".to_string(),
                )
            })?;

        let requests_per_second = settings.rate_limit.requests_per_second;
        if requests_per_second > 5.0 {
            warn!(
                "JSearch rate limit set to {requests_per_second} req/sec. This is only safe for \
                 RapidAPI Pro tier or higher. Free tier: 50 req/7 days. Basic: 10K req/month. \
                 Pro: 50K req/month. Verify your subscription before running."
            );
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("job-search-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdapterError::Network(format!("Failed to create HTTP client: {e}")))?;

        info!("Initialized JSearch adapter for board '{}'", config.name);

        Ok(Self {
            board_name: config.name.clone(),
            client,
            api_key,
            api_host: settings
                .api_host
                .unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            endpoint: settings
                .endpoint
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            rate_limiter: RateLimiter::new(requests_per_second),
            search_params: settings.search_params,
        })
    }

    /// JSearch uses a single query parameter combining keywords and
    /// location, e.g. "DevOps Engineer in Austin, TX".
    fn build_query_string(&self, criteria: &SearchCriteria) -> String {
        let keywords = criteria.keywords.join(" ");
        if criteria.location.is_empty() {
            keywords
        } else {
            format!("{keywords} in {}", criteria.location)
        }
    }

    /// Assemble query parameters: configured defaults first, then the
    /// criteria-derived parameters on top.
    fn build_search_params(&self, criteria: &SearchCriteria) -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = self
            .search_params
            .iter()
            .map(|(key, value)| (key.clone(), param_value(value)))
            .collect();

        params.insert("query".to_string(), self.build_query_string(criteria));

        if let Some(remote) = criteria.remote {
            params.insert("remote_jobs_only".to_string(), remote.to_string());
        }
        if let Some(employment_type) = &criteria.employment_type {
            params.insert("employment_types".to_string(), employment_type.clone());
        }

        debug!("Built search params: {params:?}");
        params
    }

    async fn get_envelope(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<SearchResponse, AdapterError> {
        let url = format!("{}{path}", self.endpoint);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("JSearch API request failed: {e}");
                AdapterError::Network(format!("Request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("JSearch API request failed: HTTP {status}");
            return Err(AdapterError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(format!("Failed to decode JSearch response: {e}")))
    }

    /// Convert one JSearch record into a normalized posting.
    fn convert_record(&self, record: &Value) -> Result<JobPosting, AdapterError> {
        let raw_data = record
            .as_object()
            .cloned()
            .ok_or_else(|| AdapterError::Parse("job record is not a JSON object".to_string()))?;

        let raw: RawJob = serde_json::from_value(record.clone()).map_err(|e| {
            AdapterError::Parse(format!("job record does not match the JSearch schema: {e}"))
        })?;

        Ok(JobPosting {
            title: raw.job_title.clone().unwrap_or_default(),
            company: raw.employer_name.clone().unwrap_or_default(),
            location: parse_location(&raw),
            remote_type: parse_remote_type(&raw),
            salary_min: raw.job_min_salary.map(|v| v as i64),
            salary_max: raw.job_max_salary.map(|v| v as i64),
            description: raw.job_description.clone().unwrap_or_default(),
            requirements: parse_requirements(&raw),
            posted_date: parse_posted_date(
                raw.job_posted_at_timestamp.as_ref(),
                raw.job_posted_at_datetime_utc.as_deref(),
            ),
            job_url: raw.job_apply_link.unwrap_or_default(),
            board_name: self.board_name.clone(),
            board_job_id: raw.job_id.unwrap_or_default(),
            raw_data,
        })
    }
}

#[async_trait]
impl BoardAdapter for JSearchAdapter {
    fn board_name(&self) -> &str {
        &self.board_name
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<JobPosting>, AdapterError> {
        self.rate_limiter.acquire().await;

        let params = self.build_search_params(criteria);
        info!(
            "Searching JSearch with query: '{}'",
            params.get("query").map(String::as_str).unwrap_or("")
        );

        let borrowed: Vec<(&str, &str)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let envelope = self.get_envelope("/search", &borrowed).await?;

        if !envelope.is_ok() {
            error!(
                "JSearch API returned non-OK status: {}",
                envelope.status.as_deref().unwrap_or("<missing>")
            );
            return Ok(Vec::new());
        }

        info!("JSearch returned {} jobs", envelope.data.len());

        // One malformed record must not abort the batch
        let mut postings = Vec::with_capacity(envelope.data.len());
        for record in &envelope.data {
            match self.convert_record(record) {
                Ok(posting) => postings.push(posting),
                Err(e) => {
                    error!("Failed to convert job record: {e}");
                    debug!("Problematic job record: {record}");
                }
            }
        }

        info!("Converted {} jobs to normalized postings", postings.len());
        Ok(postings)
    }

    async fn get_job_details(&self, job_id: &str) -> Result<JobPosting, AdapterError> {
        self.rate_limiter.acquire().await;

        info!("Fetching JSearch job details for job_id: {job_id}");
        let envelope = self
            .get_envelope("/job-details", &[("job_id", job_id)])
            .await?;

        if !envelope.is_ok() {
            error!(
                "JSearch API returned non-OK status: {}",
                envelope.status.as_deref().unwrap_or("<missing>")
            );
            return Err(AdapterError::NotFound(job_id.to_string()));
        }

        let record = envelope
            .data
            .first()
            .ok_or_else(|| AdapterError::NotFound(job_id.to_string()))?;

        let posting = self.convert_record(record)?;
        info!("Fetched job details for {job_id}");
        Ok(posting)
    }
}

/// Render a configured default parameter as a query-string value.
fn param_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Explicit remote flag wins; otherwise a "hybrid" mention in the
/// description; otherwise onsite.
fn parse_remote_type(raw: &RawJob) -> RemoteType {
    if raw.job_is_remote.unwrap_or(false) {
        return RemoteType::Remote;
    }

    let description = raw.job_description.as_deref().unwrap_or("");
    if description.to_lowercase().contains("hybrid") {
        return RemoteType::Hybrid;
    }

    RemoteType::Onsite
}

fn parse_location(raw: &RawJob) -> String {
    let parts: Vec<&str> = [
        raw.job_city.as_deref(),
        raw.job_state.as_deref(),
        raw.job_country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        LOCATION_UNSPECIFIED.to_string()
    } else {
        parts.join(", ")
    }
}

/// Required skills first, then the Qualifications highlight list; source
/// order, no deduplication.
fn parse_requirements(raw: &RawJob) -> Vec<String> {
    let mut requirements = Vec::new();

    if let Some(skills) = raw.job_required_skills.as_ref().and_then(Value::as_array) {
        requirements.extend(skills.iter().filter_map(Value::as_str).map(String::from));
    }

    if let Some(highlights) = raw.job_highlights.as_ref().and_then(Value::as_object) {
        if let Some(qualifications) = highlights.get("Qualifications").and_then(Value::as_array) {
            requirements.extend(
                qualifications
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from),
            );
        }
    }

    requirements
}

/// Numeric timestamp preferred; ISO-8601 string as fallback (a literal `Z`
/// suffix reads as UTC). Unparseable dates log and yield None, never an
/// error.
fn parse_posted_date(
    timestamp: Option<&Value>,
    datetime_utc: Option<&str>,
) -> Option<DateTime<Utc>> {
    if let Some(value) = timestamp {
        if !value.is_null() {
            let seconds = value
                .as_i64()
                .or_else(|| value.as_f64().map(|secs| secs as i64));
            match seconds.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
                Some(date) => return Some(date),
                None => warn!("Failed to parse posted-at timestamp {value}"),
            }
        }
    }

    if let Some(text) = datetime_utc {
        match DateTime::parse_from_rfc3339(&text.replace('Z', "+00:00")) {
            Ok(date) => return Some(date.with_timezone(&Utc)),
            Err(e) => warn!("Failed to parse posted-at datetime '{text}': {e}"),
        }
    }

    None
}
