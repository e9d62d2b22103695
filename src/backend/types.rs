use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Identifier as returned by the API: numeric database ids or string ids for static records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
  Number(i64),
  Text(String),
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EntityId::Number(n) => write!(f, "{}", n),
      EntityId::Text(s) => f.write_str(s),
    }
  }
}

impl FromStr for EntityId {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    Ok(match s.trim().parse::<i64>() {
      Ok(n) => EntityId::Number(n),
      Err(_) => EntityId::Text(s.trim().to_string()),
    })
  }
}

impl Default for EntityId {
  fn default() -> Self {
    EntityId::Text(String::new())
  }
}

/// Company listing entry
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
  pub id: EntityId,
  pub name: String,
  pub sector: String,
  pub municipality: String,
  pub description: Option<String>,
  pub website: Option<String>,
  pub email: Option<String>,
  pub address: Option<String>,
}

/// Student listing entry
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
  pub id: EntityId,
  pub first_name: String,
  pub last_name: String,
  pub programme: String,
  pub municipality: String,
  pub email: Option<String>,
  pub study_year: Option<u32>,
  pub description: Option<String>,
}

impl Student {
  pub fn full_name(&self) -> String {
    join_name(&self.first_name, &self.last_name)
  }
}

/// Student project
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
  pub id: EntityId,
  pub title: String,
  pub description: String,
  pub author_first_name: String,
  pub author_last_name: String,
  pub technologies: Option<String>,
}

impl Project {
  pub fn author(&self) -> String {
    join_name(&self.author_first_name, &self.author_last_name)
  }
}

fn join_name(first: &str, last: &str) -> String {
  format!("{} {}", first, last).trim().to_string()
}

/// Bookable slot in a company's planning for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
  pub start: String,
  pub end: String,
  pub available: bool,
}

/// Account type, also the path segment of the register endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
  Student,
  Bedrijf,
}

impl UserKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      UserKind::Student => "student",
      UserKind::Bedrijf => "bedrijf",
    }
  }
}

/// Authenticated session returned by login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub token: String,
  #[serde(default)]
  pub user_kind: Option<UserKind>,
  #[serde(default)]
  pub email: Option<String>,
}

pub const MIN_PASSWORD_LEN: usize = 8;

/// Kind-specific part of a registration form
#[derive(Debug, Clone)]
pub enum RegistrationDetails {
  Student {
    first_name: String,
    last_name: String,
    programme: String,
  },
  Company {
    name: String,
    sector: String,
  },
}

/// Registration form as entered by the user, before it is sent
#[derive(Debug, Clone)]
pub struct Registration {
  pub email: String,
  pub password: String,
  pub password_confirm: String,
  pub municipality: Option<String>,
  pub details: RegistrationDetails,
}

impl Registration {
  pub fn kind(&self) -> UserKind {
    match self.details {
      RegistrationDetails::Student { .. } => UserKind::Student,
      RegistrationDetails::Company { .. } => UserKind::Bedrijf,
    }
  }

  /// Client-side checks; nothing is sent when these fail.
  pub fn validate(&self) -> Result<()> {
    let email = self.email.trim();
    if email.is_empty() || !email.contains('@') {
      return Err(ApiError::Validation(
        "Please enter a valid email address".to_string(),
      ));
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(ApiError::Validation(format!(
        "Password must be at least {} characters",
        MIN_PASSWORD_LEN
      )));
    }
    if self.password != self.password_confirm {
      return Err(ApiError::Validation("Passwords do not match".to_string()));
    }

    let missing = match &self.details {
      RegistrationDetails::Student {
        first_name,
        last_name,
        ..
      } => first_name.trim().is_empty() || last_name.trim().is_empty(),
      RegistrationDetails::Company { name, .. } => name.trim().is_empty(),
    };
    if missing {
      return Err(ApiError::Validation("Name is required".to_string()));
    }

    Ok(())
  }
}

/// Request for an appointment with a company
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRequest {
  pub company_id: EntityId,
  pub date: NaiveDate,
  pub start: String,
  pub end: String,
}

impl ReservationRequest {
  /// Build a request for the slot starting at `start`, checked against a fetched planning.
  pub fn for_slot(
    company_id: EntityId,
    date: NaiveDate,
    planning: &[TimeSlot],
    start: &str,
  ) -> Result<Self> {
    let slot = planning
      .iter()
      .find(|s| s.start == start)
      .ok_or_else(|| ApiError::Validation(format!("No time slot starting at {}", start)))?;

    if !slot.available {
      return Err(ApiError::Validation(format!(
        "Time slot {} - {} is already taken",
        slot.start, slot.end
      )));
    }

    Ok(Self {
      company_id,
      date,
      start: slot.start.clone(),
      end: slot.end.clone(),
    })
  }
}

/// Partial profile update for a student; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentProfileUpdate {
  pub email: Option<String>,
  pub programme: Option<String>,
  pub municipality: Option<String>,
  pub description: Option<String>,
}

/// Partial profile update for a company; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfileUpdate {
  pub sector: Option<String>,
  pub municipality: Option<String>,
  pub description: Option<String>,
  pub website: Option<String>,
}
