// File: ./src/client/core.rs
// HTTP client for the dining backend. Read endpoints work anonymously;
// every plan mutation requires a configured token and fails fast with
// AuthRequired before touching the network when none is present.
use crate::config::Config;
use crate::error::ApiError;
use crate::model::menu::{AvailablePeriods, DayMenu};
use crate::model::plan::{AddMealItem, DailyPlan, GoalsUpdate, MealItem, WeekPlan};
use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            config.auth_token.clone(),
            config.request_timeout_secs,
        )
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is configured. Read endpoints still
    /// send it so the server can personalize if it wants to.
    fn maybe_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Mutations are rejected locally without a token; the server would only
    /// answer 401 anyway.
    fn require_token(&self) -> Result<(), ApiError> {
        if self.token.is_none() {
            return Err(ApiError::AuthRequired);
        }
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.as_u16() == 401 {
            return Err(ApiError::AuthRequired);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        Self::check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET /menu_info/ for one hall and period. The period key is the hall's
    /// free-text label, passed through verbatim.
    pub async fn menu_info(&self, hall: &str, period: &str) -> Result<DayMenu, ApiError> {
        debug!("fetching menu for {hall}/{period}");
        let response = self
            .maybe_auth(self.http.get(self.url("/menu_info/")))
            .query(&[("period", period), ("hall", hall)])
            .send()
            .await?;
        Self::handle(response).await
    }

    /// GET /available_periods/ for one hall. An empty list means the hall is
    /// closed today.
    pub async fn available_periods(&self, hall: &str) -> Result<AvailablePeriods, ApiError> {
        debug!("fetching available periods for {hall}");
        let response = self
            .maybe_auth(self.http.get(self.url("/available_periods/")))
            .query(&[("hall", hall)])
            .send()
            .await?;
        Self::handle(response).await
    }

    /// GET /plan/week/ for the week containing the given date.
    pub async fn week_plan(&self, date: NaiveDate) -> Result<WeekPlan, ApiError> {
        let response = self
            .maybe_auth(self.http.get(self.url("/plan/week/")))
            .query(&[("date", date.to_string())])
            .send()
            .await?;
        Self::handle(response).await
    }

    /// GET /plan/daily/ for one date.
    pub async fn daily_plan(&self, date: NaiveDate) -> Result<DailyPlan, ApiError> {
        let response = self
            .maybe_auth(self.http.get(self.url("/plan/daily/")))
            .query(&[("date", date.to_string())])
            .send()
            .await?;
        Self::handle(response).await
    }

    /// POST /plan/add-item/. Returns the created line item with its
    /// server-assigned id and computed totals.
    pub async fn add_meal_item(&self, body: &AddMealItem) -> Result<MealItem, ApiError> {
        self.require_token()?;
        debug!(
            "adding menu item {} to {} on {}",
            body.menu_item_id, body.meal_type, body.date
        );
        let response = self
            .maybe_auth(self.http.post(self.url("/plan/add-item/")))
            .json(body)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// PATCH /plan/item/{id}/ with a new serving quantity. Returns the item
    /// as the server now sees it.
    pub async fn update_servings(&self, id: i64, servings: f64) -> Result<MealItem, ApiError> {
        self.require_token()?;
        debug!("updating item {id} to {servings} servings");
        let response = self
            .maybe_auth(self.http.patch(self.url(&format!("/plan/item/{id}/"))))
            .json(&json!({ "servings": servings }))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// DELETE /plan/item/{id}/delete/.
    pub async fn delete_meal_item(&self, id: i64) -> Result<(), ApiError> {
        self.require_token()?;
        debug!("deleting item {id}");
        let response = self
            .maybe_auth(
                self.http
                    .delete(self.url(&format!("/plan/item/{id}/delete/"))),
            )
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// PATCH /plan/goals/ for the week containing the given date.
    pub async fn update_goals(
        &self,
        date: NaiveDate,
        body: &GoalsUpdate,
    ) -> Result<WeekPlan, ApiError> {
        self.require_token()?;
        let response = self
            .maybe_auth(self.http.patch(self.url("/plan/goals/")))
            .query(&[("date", date.to_string())])
            .json(body)
            .send()
            .await?;
        Self::handle(response).await
    }
}
