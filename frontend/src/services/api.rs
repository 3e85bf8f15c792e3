use std::rc::Rc;

use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::analytics::{
    CategoryAnalysisResponse, MonthlyComparisonResponse, OverviewResponse, TrendsResponse,
};
use shared::config::ClientConfig;
use shared::i18n::Language;
use shared::{
    ApiError, AuthResponse, CategoriesResponse, Category, CreateTransactionRequest,
    CreateTransactionResponse, CurrentUserResponse, ErrorResponse, LoginRequest, MessageResponse,
    RegisterRequest, TransactionListResponse, TransactionQuery, User,
};
use web_sys::RequestCredentials;

type QueryPairs = [(&'static str, String)];

/// API client for the income tracker backend.
///
/// Every request carries the session cookie and the current UI language so
/// server-side messages come back already translated.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    config: Rc<ClientConfig>,
    language: Language,
}

impl ApiClient {
    /// Client for the configured API base; an empty base means same origin
    pub fn new(config: Rc<ClientConfig>, language: Language) -> Self {
        Self { config, language }
    }

    /// Same backend, different `Accept-Language`
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            config: Rc::clone(&self.config),
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .credentials(RequestCredentials::Include)
            .header("Accept-Language", self.language.code())
    }

    fn get(&self, path: &str, query: &QueryPairs) -> RequestBuilder {
        let builder = self.prepare(Request::get(&self.url(path)));
        if query.is_empty() {
            builder
        } else {
            builder.query(query.iter().map(|(key, value)| (*key, value.as_str())))
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.prepare(Request::post(&self.url(path)))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn fetch_json<B, T>(&self, builder: RequestBuilder, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let request = builder
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.ok() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.error);
        tracing::warn!(status, url = %response.url(), ?message, "request failed");
        Err(ApiError::Http { status, message })
    }

    /// The user behind the session cookie
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response: CurrentUserResponse = self.fetch(self.get("/api/auth/me", &[])).await?;
        Ok(response.user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.fetch_json(self.post("/api/auth/login"), request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.fetch_json(self.post("/api/auth/register"), request).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.fetch(self.post("/api/auth/logout")).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: CategoriesResponse = self.fetch(self.get("/api/categories", &[])).await?;
        Ok(response.categories)
    }

    pub async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionListResponse, ApiError> {
        self.fetch(self.get("/api/transactions", &query.to_query_pairs())).await
    }

    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, ApiError> {
        self.fetch_json(self.post("/api/transactions"), request).await
    }

    pub async fn analytics_overview(&self, query: &QueryPairs) -> Result<OverviewResponse, ApiError> {
        self.fetch(self.get("/api/analytics/overview", query)).await
    }

    pub async fn analytics_trends(&self, query: &QueryPairs) -> Result<TrendsResponse, ApiError> {
        self.fetch(self.get("/api/analytics/trends", query)).await
    }

    pub async fn analytics_categories(
        &self,
        query: &QueryPairs,
    ) -> Result<CategoryAnalysisResponse, ApiError> {
        self.fetch(self.get("/api/analytics/categories", query)).await
    }

    pub async fn monthly_comparison(
        &self,
        query: &QueryPairs,
    ) -> Result<MonthlyComparisonResponse, ApiError> {
        self.fetch(self.get("/api/analytics/monthly-comparison", query)).await
    }

    /// Raw export body; its shape depends on the requested format
    pub async fn export(&self, query: &QueryPairs) -> Result<serde_json::Value, ApiError> {
        self.fetch(self.get("/api/analytics/export", query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: Option<&str>) -> Rc<ClientConfig> {
        Rc::new(ClientConfig::default().with_api_base_override(base))
    }

    #[test]
    fn test_url_follows_configured_base() {
        let client = ApiClient::new(config(Some("http://localhost:5000/")), Language::En);
        assert_eq!(client.url("/api/categories"), "http://localhost:5000/api/categories");
        assert_eq!(client.url("/api/categories"), client.config.api_url("/api/categories"));

        let same_origin = ApiClient::new(config(None), Language::En);
        assert_eq!(same_origin.url("/api/auth/me"), "/api/auth/me");
    }

    #[test]
    fn test_with_language_keeps_base() {
        let client = ApiClient::new(config(Some("http://api")), Language::En).with_language(Language::Zh);
        assert_eq!(client.language(), Language::Zh);
        assert_eq!(client.url("/api/auth/me"), "http://api/api/auth/me");
        assert_ne!(client, ApiClient::new(config(Some("http://api")), Language::En));
    }
}
