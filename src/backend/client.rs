use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
  header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
  Client, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::Transport;
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session::SessionStore;

use super::api_types::{
  error_message, ApiCompany, ApiCompanyUpdate, ApiLoginRequest, ApiLoginResponse,
  ApiRegisterRequest, ApiReservationRequest, ApiResponse, ApiStudent, ApiStudentUpdate,
  ApiTimeSlot,
};
use super::types::{
  Company, CompanyProfileUpdate, EntityId, Registration, ReservationRequest, Session, Student,
  StudentProfileUpdate, TimeSlot,
};

/// CareerLaunch REST API client.
///
/// Attaches the bearer token when one is known. A 401 from any endpoint
/// forgets the token and clears the persisted session.
pub struct CareerLaunchClient {
  http: Client,
  base_url: Url,
  token: RwLock<Option<String>>,
  session: Option<SessionStore>,
}

impl CareerLaunchClient {
  pub fn new(
    config: &ApiConfig,
    token: Option<String>,
    session: Option<SessionStore>,
  ) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
      USER_AGENT,
      HeaderValue::from_static(concat!("careerlaunch/", env!("CARGO_PKG_VERSION"))),
    );

    let http = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;

    let mut base_url = Url::parse(&config.url)?;
    // A path prefix such as /careerlaunch only survives `join` with a trailing slash
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    Ok(Self {
      http,
      base_url,
      token: RwLock::new(token),
      session,
    })
  }

  pub fn token(&self) -> Option<String> {
    self
      .token
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn is_authenticated(&self) -> bool {
    self.token().is_some()
  }

  fn set_token(&self, token: Option<String>) {
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
  }

  /// Forget the token and remove the persisted session.
  pub fn logout(&self) -> Result<()> {
    self.set_token(None);
    if let Some(store) = &self.session {
      store.clear()?;
    }
    Ok(())
  }

  fn url(&self, endpoint: &str) -> Result<Url> {
    Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
  }

  // ==========================================================================
  // Raw requests
  // ==========================================================================

  pub async fn get_value(&self, endpoint: &str) -> Result<Value> {
    let request = self.http.get(self.url(endpoint)?);
    self.send(request, true).await
  }

  pub async fn post_value<B>(&self, endpoint: &str, body: &B) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    let request = self.http.post(self.url(endpoint)?).json(body);
    self.send(request, true).await
  }

  pub async fn put_value<B>(&self, endpoint: &str, body: &B) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    let request = self.http.put(self.url(endpoint)?).json(body);
    self.send(request, true).await
  }

  /// POST without the bearer token, for login and registration.
  async fn post_anonymous<B>(&self, endpoint: &str, body: &B) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    let request = self.http.post(self.url(endpoint)?).json(body);
    self.send(request, false).await
  }

  async fn send(&self, request: RequestBuilder, with_token: bool) -> Result<Value> {
    let token = if with_token { self.token() } else { None };
    let authenticated = token.is_some();
    let request = match token {
      Some(token) => request.bearer_auth(token),
      None => request,
    };

    let response = request.send().await?;
    debug!(url = %response.url(), status = %response.status(), "api response");

    let response = self.check_response(response, authenticated).await?;
    let text = response.text().await?;
    if text.trim().is_empty() {
      return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
  }

  /// Check response status and convert errors.
  ///
  /// A 401 only ends the session when the request carried the token.
  async fn check_response(&self, response: Response, authenticated: bool) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
      if authenticated {
        warn!("request unauthorized, clearing session");
        if let Err(e) = self.logout() {
          warn!(error = %e, "failed to clear session");
        }
      }
      return Err(ApiError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
      status
        .canonical_reason()
        .unwrap_or("Unexpected response")
        .to_string()
    });
    Err(ApiError::Status {
      status: status.as_u16(),
      message,
    })
  }

  async fn get_decoded<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
    let body = self.get_value(endpoint).await?;
    ApiResponse::decode(body)?.into_result()
  }

  // ==========================================================================
  // Auth
  // ==========================================================================

  /// Log in, remember the token and persist the session.
  pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
      return Err(ApiError::Validation(
        "Email and password are required".to_string(),
      ));
    }

    let body = ApiLoginRequest { email, password };
    let value = match self.post_anonymous("/api/auth/login", &body).await {
      Err(ApiError::Unauthorized) => {
        return Err(ApiError::Rejected {
          message: "Invalid email or password".to_string(),
        })
      }
      other => other?,
    };

    let login: ApiLoginResponse = ApiResponse::decode(value)?.into_result()?;
    let session = login.into_session(email);

    self.set_token(Some(session.token.clone()));
    if let Some(store) = &self.session {
      store.save(&session)?;
    }
    info!(email, "logged in");

    Ok(session)
  }

  /// Validate and submit a registration. Returns the server's message, if any.
  pub async fn register(&self, registration: &Registration) -> Result<Option<String>> {
    registration.validate()?;

    let endpoint = format!("/api/auth/register/{}", registration.kind().as_str());
    let body = ApiRegisterRequest::from(registration);
    let value = self.post_anonymous(&endpoint, &body).await?;

    let response: ApiResponse<Value> = ApiResponse::decode(value)?;
    let message = response.message().map(String::from);
    response.into_result()?;
    Ok(message)
  }

  // ==========================================================================
  // Listings and details
  // ==========================================================================

  pub async fn company(&self, id: &EntityId) -> Result<Company> {
    let company: ApiCompany = self.get_decoded(&format!("/api/bedrijven/{}", id)).await?;
    Ok(company.into())
  }

  pub async fn student(&self, id: &EntityId) -> Result<Student> {
    let student: ApiStudent = self.get_decoded(&format!("/api/studenten/{}", id)).await?;
    Ok(student.into())
  }

  pub async fn update_student(&self, id: &EntityId, update: &StudentProfileUpdate) -> Result<()> {
    let body = ApiStudentUpdate::from(update);
    let value = self.put_value(&format!("/api/studenten/{}", id), &body).await?;
    ApiResponse::<Value>::decode(value)?.into_result()?;
    Ok(())
  }

  pub async fn update_company(&self, id: &EntityId, update: &CompanyProfileUpdate) -> Result<()> {
    let body = ApiCompanyUpdate::from(update);
    let value = self.put_value(&format!("/api/bedrijven/{}", id), &body).await?;
    ApiResponse::<Value>::decode(value)?.into_result()?;
    Ok(())
  }

  // ==========================================================================
  // Scheduling
  // ==========================================================================

  /// Time slots of a company on one day. Availability is decided by the server.
  pub async fn planning(&self, company_id: &EntityId, date: NaiveDate) -> Result<Vec<TimeSlot>> {
    let endpoint = format!(
      "/api/bedrijven/{}/planning/{}",
      company_id,
      date.format("%Y-%m-%d")
    );
    let slots: Vec<ApiTimeSlot> = self.get_decoded(&endpoint).await?;
    Ok(slots.into_iter().map(TimeSlot::from).collect())
  }

  /// Submit a reservation request. Returns the server's message, if any.
  pub async fn request_reservation(&self, request: &ReservationRequest) -> Result<Option<String>> {
    if !self.is_authenticated() {
      return Err(ApiError::Unauthorized);
    }

    let body = ApiReservationRequest::from(request);
    let value = self.post_value("/api/reservaties/request", &body).await?;

    let response: ApiResponse<Value> = ApiResponse::decode(value)?;
    let message = response.message().map(String::from);
    response.into_result()?;
    Ok(message)
  }
}

#[async_trait]
impl Transport for CareerLaunchClient {
  async fn get_json(&self, endpoint: &str) -> Result<Value> {
    self.get_value(endpoint).await
  }
}
