use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use prep_core::model::{Category, CollectionName, Difficulty, Question, QuestionId, QuestionInput};

use crate::error::SourceError;
use crate::question_source::{QuestionQuery, QuestionSource};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for QuestionApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl QuestionApiConfig {
    /// Read `PREP_API_URL` and `PREP_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("PREP_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout = env::var("PREP_API_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.trim().parse().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { base_url, timeout }
    }
}

/// A collection with at least one question, as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionSummary {
    pub name: CollectionName,
    pub key: String,
    pub count: u64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<CollectionSummary>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub has_more: bool,
}

/// One page of raw question records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionPage {
    pub questions: Vec<Value>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Search request across collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Empty means every known collection.
    pub collections: Vec<CollectionName>,
    pub difficulty: Option<Difficulty>,
    pub limit: Option<u32>,
}

/// Fields to overwrite on an existing question; unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest<'a> {
    collection: &'a CollectionName,
    questions: &'a [QuestionInput],
    created_by: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    inserted_count: usize,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the question API.
#[derive(Clone, Debug)]
pub struct QuestionApi {
    client: Client,
    base_url: Url,
}

impl QuestionApi {
    /// Build a client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the base URL is invalid or the client cannot be built.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::new(&QuestionApiConfig::from_env())
    }

    /// # Errors
    ///
    /// Returns `SourceError` if the base URL is invalid or the client cannot be built.
    pub fn new(config: &QuestionApiConfig) -> Result<Self, SourceError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Collections that currently hold questions.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on transport failure or a non-success response.
    pub async fn list_collections(&self) -> Result<CollectionList, SourceError> {
        let response = self
            .client
            .get(self.endpoint("api/questions/collections")?)
            .send()
            .await?;
        Ok(success(response).await?.json().await?)
    }

    /// One page of a collection.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on transport failure or a non-success response.
    pub async fn fetch_page(
        &self,
        collection: &CollectionName,
        query: &QuestionQuery,
    ) -> Result<QuestionPage, SourceError> {
        let response = self
            .client
            .get(self.endpoint("api/questions")?)
            .query(&[("collection", collection.as_str())])
            .query(&query.to_params())
            .send()
            .await?;
        let page: QuestionPage = success(response).await?.json().await?;
        tracing::debug!(
            %collection,
            returned = page.questions.len(),
            total = page.pagination.total,
            "question page fetched"
        );
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns `SourceError::NotFound` when the id is unknown in `collection`.
    pub async fn get_question(
        &self,
        collection: &CollectionName,
        id: &QuestionId,
    ) -> Result<Question, SourceError> {
        let response = self
            .client
            .get(self.question_url(id)?)
            .query(&[("collection", collection.as_str())])
            .send()
            .await?;
        let value: Value = success(response).await?.json().await?;
        Question::from_value(value).map_err(|err| SourceError::Malformed(err.to_string()))
    }

    /// Free-text search; records come back undecoded.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on transport failure or a non-success response
    /// (the API rejects queries shorter than two characters).
    pub async fn search(&self, search: &SearchQuery) -> Result<QuestionPage, SourceError> {
        let mut params = vec![("q", search.text.clone())];
        if !search.collections.is_empty() {
            let names: Vec<&str> = search.collections.iter().map(CollectionName::as_str).collect();
            params.push(("collections", names.join(",")));
        }
        if let Some(difficulty) = search.difficulty {
            params.push(("difficulty", difficulty.as_str().to_string()));
        }
        if let Some(limit) = search.limit {
            params.push(("limit", limit.to_string()));
        }
        let response = self
            .client
            .get(self.endpoint("api/questions/search")?)
            .query(&params)
            .send()
            .await?;
        Ok(success(response).await?.json().await?)
    }

    /// Insert validated questions; the server sets ids and tags.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Rejected` with the server's messages when the
    /// batch is refused.
    pub async fn insert_batch(
        &self,
        collection: &CollectionName,
        questions: &[QuestionInput],
        created_by: &str,
    ) -> Result<usize, SourceError> {
        let response = self
            .client
            .post(self.endpoint("api/questions/batch")?)
            .json(&BatchRequest {
                collection,
                questions,
                created_by,
            })
            .send()
            .await?;
        let status = response.status();
        let body: BatchResponse = response
            .json()
            .await
            .map_err(|_| SourceError::HttpStatus(status))?;
        let inserted = batch_result(body)?;
        tracing::info!(%collection, inserted, created_by, "question batch inserted");
        Ok(inserted)
    }

    /// # Errors
    ///
    /// Returns `SourceError::NotFound` when the id is unknown in `collection`.
    pub async fn update_question(
        &self,
        collection: &CollectionName,
        id: &QuestionId,
        update: &QuestionUpdate,
    ) -> Result<Question, SourceError> {
        let response = self
            .client
            .put(self.question_url(id)?)
            .query(&[("collection", collection.as_str())])
            .json(update)
            .send()
            .await?;
        let value: Value = success(response).await?.json().await?;
        Question::from_value(value).map_err(|err| SourceError::Malformed(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `SourceError::NotFound` when the id is unknown in `collection`.
    pub async fn delete_question(
        &self,
        collection: &CollectionName,
        id: &QuestionId,
    ) -> Result<(), SourceError> {
        let response = self
            .client
            .delete(self.question_url(id)?)
            .query(&[("collection", collection.as_str())])
            .send()
            .await?;
        success(response).await?;
        Ok(())
    }

    /// Check credentials against the login endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Rejected` with the server's message for bad
    /// credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SourceError> {
        let response = self
            .client
            .post(self.endpoint("api/auth/login")?)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let status = response.status();
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|_| SourceError::HttpStatus(status))?;
        if body.success {
            Ok(())
        } else {
            Err(SourceError::Rejected(
                body.error.unwrap_or_else(|| "Login failed".into()),
            ))
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        Ok(self.base_url.join(path)?)
    }

    fn question_url(&self, id: &QuestionId) -> Result<Url, SourceError> {
        let mut url = self.endpoint("api/questions")?;
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl(self.base_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl QuestionSource for QuestionApi {
    async fn fetch_collection(
        &self,
        collection: &CollectionName,
        query: &QuestionQuery,
    ) -> Result<Vec<Value>, SourceError> {
        Ok(self.fetch_page(collection, query).await?.questions)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, SourceError> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn success(response: Response) -> Result<Response, SourceError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(SourceError::NotFound),
        status => {
            tracing::warn!(%status, url = %response.url(), "question api request failed");
            Err(SourceError::HttpStatus(status))
        }
    }
}

fn batch_result(body: BatchResponse) -> Result<usize, SourceError> {
    if body.success {
        return Ok(body.inserted_count);
    }
    let mut messages = Vec::new();
    messages.extend(body.error);
    messages.extend(body.errors);
    if messages.is_empty() {
        messages.push("Failed to insert questions".into());
    }
    Err(SourceError::Rejected(messages.join("\n")))
}
