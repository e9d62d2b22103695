//! Serde types matching CareerLaunch API payloads.
//!
//! These types are separate from domain types so the Dutch wire field names
//! stay at the boundary, and the response envelope is decoded exactly once.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

use super::types::{
  Company, CompanyProfileUpdate, EntityId, Project, Registration, RegistrationDetails,
  ReservationRequest, Session, Student, StudentProfileUpdate, TimeSlot, UserKind,
};

// ============================================================================
// Response envelope
// ============================================================================

/// A decoded `{ success, data, message }` response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
  Success { data: T, message: Option<String> },
  Failure { message: String },
}

impl<T: DeserializeOwned> ApiResponse<T> {
  /// Decode a response body.
  ///
  /// An object with a boolean `success` field is an envelope. When a successful
  /// envelope has no `data` field the remaining object is the payload (login
  /// responses carry the token at the top level). Any other body is a bare payload.
  pub fn decode(body: Value) -> serde_json::Result<Self> {
    match body {
      Value::Object(mut map) if map.get("success").is_some_and(Value::is_boolean) => {
        let success = map.remove("success").and_then(|v| v.as_bool()).unwrap_or(false);
        let message = map
          .get("message")
          .and_then(Value::as_str)
          .map(String::from);

        if !success {
          return Ok(ApiResponse::Failure {
            message: message.unwrap_or_else(|| "Request failed".to_string()),
          });
        }

        let payload = match map.remove("data") {
          Some(data) => data,
          None => Value::Object(map),
        };
        Ok(ApiResponse::Success {
          data: serde_json::from_value(payload)?,
          message,
        })
      }
      other => Ok(ApiResponse::Success {
        data: serde_json::from_value(other)?,
        message: None,
      }),
    }
  }
}

impl<T> ApiResponse<T> {
  pub fn into_result(self) -> Result<T> {
    match self {
      ApiResponse::Success { data, .. } => Ok(data),
      ApiResponse::Failure { message } => Err(ApiError::Rejected { message }),
    }
  }

  pub fn message(&self) -> Option<&str> {
    match self {
      ApiResponse::Success { message, .. } => message.as_deref(),
      ApiResponse::Failure { message } => Some(message),
    }
  }
}

/// Pull a human readable message out of an error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
  let value: Value = serde_json::from_str(body).ok()?;
  ["message", "error"]
    .iter()
    .find_map(|k| value.get(*k).and_then(Value::as_str))
    .map(String::from)
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCompany {
  #[serde(alias = "id", default)]
  pub bedrijf_id: EntityId,
  #[serde(default)]
  pub naam: String,
  #[serde(default)]
  pub sector: String,
  #[serde(default)]
  pub gemeente: String,
  pub beschrijving: Option<String>,
  pub website: Option<String>,
  pub email: Option<String>,
  pub adres: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStudent {
  #[serde(alias = "id", default)]
  pub student_id: EntityId,
  #[serde(default)]
  pub voornaam: String,
  #[serde(default)]
  pub achternaam: String,
  #[serde(default)]
  pub opleiding: String,
  #[serde(default)]
  pub gemeente: String,
  pub email: Option<String>,
  pub studiejaar: Option<u32>,
  pub beschrijving: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProject {
  #[serde(alias = "id", default)]
  pub project_id: EntityId,
  #[serde(alias = "naam", default)]
  pub titel: String,
  #[serde(default)]
  pub beschrijving: String,
  #[serde(alias = "studentVoornaam", default)]
  pub voornaam: String,
  #[serde(alias = "studentAchternaam", default)]
  pub achternaam: String,
  pub technologieen: Option<String>,
}

// ============================================================================
// Planning and reservations
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTimeSlot {
  #[serde(alias = "start")]
  pub start_tijd: String,
  #[serde(alias = "eind", alias = "einde")]
  pub eind_tijd: String,
  #[serde(default = "default_available")]
  pub beschikbaar: bool,
}

fn default_available() -> bool {
  true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReservationRequest<'a> {
  pub bedrijf_id: &'a EntityId,
  pub datum: String,
  pub start_tijd: &'a str,
  pub eind_tijd: &'a str,
}

impl<'a> From<&'a ReservationRequest> for ApiReservationRequest<'a> {
  fn from(req: &'a ReservationRequest) -> Self {
    ApiReservationRequest {
      bedrijf_id: &req.company_id,
      datum: req.date.format("%Y-%m-%d").to_string(),
      start_tijd: &req.start,
      eind_tijd: &req.end,
    }
  }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApiLoginRequest<'a> {
  pub email: &'a str,
  pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoginResponse {
  pub token: String,
  #[serde(alias = "userType", alias = "type")]
  pub gebruiker_type: Option<UserKind>,
}

impl ApiLoginResponse {
  pub fn into_session(self, email: &str) -> Session {
    Session {
      token: self.token,
      user_kind: self.gebruiker_type,
      email: Some(email.to_string()),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegisterRequest<'a> {
  pub email: &'a str,
  pub password: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gemeente: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub voornaam: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub achternaam: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub opleiding: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub naam: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sector: Option<&'a str>,
}

impl<'a> From<&'a Registration> for ApiRegisterRequest<'a> {
  fn from(reg: &'a Registration) -> Self {
    let mut req = ApiRegisterRequest {
      email: reg.email.trim(),
      password: &reg.password,
      gemeente: reg.municipality.as_deref(),
      voornaam: None,
      achternaam: None,
      opleiding: None,
      naam: None,
      sector: None,
    };
    match &reg.details {
      RegistrationDetails::Student {
        first_name,
        last_name,
        programme,
      } => {
        req.voornaam = Some(first_name);
        req.achternaam = Some(last_name);
        req.opleiding = Some(programme);
      }
      RegistrationDetails::Company { name, sector } => {
        req.naam = Some(name);
        req.sector = Some(sector);
      }
    }
    req
  }
}

// ============================================================================
// Profile updates
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStudentUpdate<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub opleiding: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gemeente: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub beschrijving: Option<&'a str>,
}

impl<'a> From<&'a StudentProfileUpdate> for ApiStudentUpdate<'a> {
  fn from(u: &'a StudentProfileUpdate) -> Self {
    ApiStudentUpdate {
      email: u.email.as_deref(),
      opleiding: u.programme.as_deref(),
      gemeente: u.municipality.as_deref(),
      beschrijving: u.description.as_deref(),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCompanyUpdate<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sector: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gemeente: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub beschrijving: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub website: Option<&'a str>,
}

impl<'a> From<&'a CompanyProfileUpdate> for ApiCompanyUpdate<'a> {
  fn from(u: &'a CompanyProfileUpdate) -> Self {
    ApiCompanyUpdate {
      sector: u.sector.as_deref(),
      gemeente: u.municipality.as_deref(),
      beschrijving: u.description.as_deref(),
      website: u.website.as_deref(),
    }
  }
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiCompany> for Company {
  fn from(c: ApiCompany) -> Self {
    Company {
      id: c.bedrijf_id,
      name: c.naam,
      sector: c.sector,
      municipality: c.gemeente,
      description: c.beschrijving,
      website: c.website,
      email: c.email,
      address: c.adres,
    }
  }
}

impl From<ApiStudent> for Student {
  fn from(s: ApiStudent) -> Self {
    Student {
      id: s.student_id,
      first_name: s.voornaam,
      last_name: s.achternaam,
      programme: s.opleiding,
      municipality: s.gemeente,
      email: s.email,
      study_year: s.studiejaar,
      description: s.beschrijving,
    }
  }
}

impl From<ApiProject> for Project {
  fn from(p: ApiProject) -> Self {
    Project {
      id: p.project_id,
      title: p.titel,
      description: p.beschrijving,
      author_first_name: p.voornaam,
      author_last_name: p.achternaam,
      technologies: p.technologieen,
    }
  }
}

impl From<ApiTimeSlot> for TimeSlot {
  fn from(s: ApiTimeSlot) -> Self {
    TimeSlot {
      start: s.start_tijd,
      end: s.eind_tijd,
      available: s.beschikbaar,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use serde_json::json;

  #[test]
  fn test_decode_envelope_success() {
    let body = json!({ "success": true, "data": [{ "voornaam": "Jan", "achternaam": "Jansen", "opleiding": "IT" }] });
    let students: Vec<ApiStudent> = ApiResponse::decode(body).unwrap().into_result().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].voornaam, "Jan");
    assert_eq!(students[0].student_id, EntityId::default());
  }

  #[test]
  fn test_decode_bare_array() {
    let body = json!([{ "bedrijfId": 4, "naam": "BrusselsTech", "gemeente": "Brussel" }]);
    let companies: Vec<ApiCompany> = ApiResponse::decode(body).unwrap().into_result().unwrap();
    assert_eq!(companies[0].bedrijf_id, EntityId::Number(4));
  }

  #[test]
  fn test_decode_failure_keeps_message() {
    let body = json!({ "success": false, "message": "Geen toegang" });
    let response: ApiResponse<Vec<ApiCompany>> = ApiResponse::decode(body).unwrap();
    assert_eq!(response.message(), Some("Geen toegang"));
    assert!(matches!(
      response.into_result(),
      Err(ApiError::Rejected { ref message }) if message == "Geen toegang"
    ));
  }

  #[test]
  fn test_decode_failure_without_message() {
    let response: ApiResponse<Value> = ApiResponse::decode(json!({ "success": false })).unwrap();
    assert_eq!(response.message(), Some("Request failed"));
  }

  #[test]
  fn test_decode_success_without_data_uses_object() {
    let body = json!({ "success": true, "token": "abc", "userType": "bedrijf" });
    let login: ApiLoginResponse = ApiResponse::decode(body).unwrap().into_result().unwrap();
    let session = login.into_session("hr@bedrijf.be");
    assert_eq!(session.token, "abc");
    assert_eq!(session.user_kind, Some(UserKind::Bedrijf));
  }

  #[test]
  fn test_decode_wrong_shape_is_json_error() {
    let body = json!({ "success": true, "data": "not a list" });
    let result: serde_json::Result<ApiResponse<Vec<ApiCompany>>> = ApiResponse::decode(body);
    assert!(result.is_err());
  }

  #[test]
  fn test_error_message() {
    assert_eq!(
      error_message(r#"{"success":false,"message":"Ongeldige datum"}"#),
      Some("Ongeldige datum".to_string())
    );
    assert_eq!(error_message("<html>"), None);
  }

  #[test]
  fn test_time_slot_aliases() {
    let slot: ApiTimeSlot =
      serde_json::from_value(json!({ "start": "10:00", "einde": "10:15" })).unwrap();
    let slot = TimeSlot::from(slot);
    assert!(slot.available);
    assert_eq!(slot.end, "10:15");
  }

  #[test]
  fn test_reservation_body() {
    let req = ReservationRequest {
      company_id: EntityId::Number(9),
      date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
      start: "10:15".to_string(),
      end: "10:30".to_string(),
    };
    let body = serde_json::to_value(ApiReservationRequest::from(&req)).unwrap();
    assert_eq!(
      body,
      json!({ "bedrijfId": 9, "datum": "2025-03-14", "startTijd": "10:15", "eindTijd": "10:30" })
    );
  }

  #[test]
  fn test_register_body_company() {
    let reg = Registration {
      email: " hr@acme.be ".to_string(),
      password: "geheim123".to_string(),
      password_confirm: "geheim123".to_string(),
      municipality: None,
      details: RegistrationDetails::Company {
        name: "Acme".to_string(),
        sector: "Bouw".to_string(),
      },
    };
    let body = serde_json::to_value(ApiRegisterRequest::from(&reg)).unwrap();
    assert_eq!(
      body,
      json!({ "email": "hr@acme.be", "password": "geheim123", "naam": "Acme", "sector": "Bouw" })
    );
  }
}
