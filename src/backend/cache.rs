//! Caching and search implementations for CareerLaunch types.

use std::borrow::Cow;
use std::fmt;

use crate::cache::Listing;
use crate::search::{SearchHit, Searchable};

use super::api_types::{ApiCompany, ApiProject, ApiStudent};
use super::types::{Company, EntityId, Project, Student};

// ============================================================================
// Cache keys
// ============================================================================

/// The cached listing slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
  Bedrijven,
  Studenten,
  Projecten,
}

impl CacheKey {
  pub const ALL: [CacheKey; 3] = [CacheKey::Bedrijven, CacheKey::Studenten, CacheKey::Projecten];

  pub fn endpoint(&self) -> &'static str {
    match self {
      CacheKey::Bedrijven => "/api/bedrijven",
      CacheKey::Studenten => "/api/studenten",
      CacheKey::Projecten => "/api/projecten",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      CacheKey::Bedrijven => "bedrijven",
      CacheKey::Studenten => "studenten",
      CacheKey::Projecten => "projecten",
    }
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// Listing implementations
// ============================================================================

impl Listing for Company {
  type Wire = ApiCompany;

  fn endpoint() -> &'static str {
    CacheKey::Bedrijven.endpoint()
  }

  fn entity_type() -> &'static str {
    "company"
  }
}

impl Listing for Student {
  type Wire = ApiStudent;

  fn endpoint() -> &'static str {
    CacheKey::Studenten.endpoint()
  }

  fn entity_type() -> &'static str {
    "student"
  }
}

impl Listing for Project {
  type Wire = ApiProject;

  fn endpoint() -> &'static str {
    CacheKey::Projecten.endpoint()
  }

  fn entity_type() -> &'static str {
    "project"
  }

  /// Projects page never renders empty: show a placeholder when the API is down.
  fn fallback() -> Vec<Self> {
    vec![Project {
      id: EntityId::Text("static-1".to_string()),
      title: "Projecten worden geladen".to_string(),
      description: "De projectenlijst is tijdelijk niet beschikbaar. Probeer het later opnieuw."
        .to_string(),
      author_first_name: "CareerLaunch".to_string(),
      author_last_name: String::new(),
      technologies: None,
    }]
  }
}

// ============================================================================
// Searchable implementations
// ============================================================================

impl Searchable for Company {
  fn display_name(&self) -> Cow<'_, str> {
    Cow::Borrowed(&self.name)
  }

  fn search_fields(&self) -> Vec<Cow<'_, str>> {
    vec![
      Cow::Borrowed(&self.name),
      Cow::Borrowed(&self.sector),
      Cow::Borrowed(&self.municipality),
    ]
  }

  fn hit(&self) -> SearchHit<'_> {
    SearchHit::Company(self)
  }
}

impl Searchable for Student {
  fn display_name(&self) -> Cow<'_, str> {
    Cow::Owned(self.full_name())
  }

  fn search_fields(&self) -> Vec<Cow<'_, str>> {
    vec![
      Cow::Owned(self.full_name()),
      Cow::Borrowed(&self.programme),
      Cow::Borrowed(&self.municipality),
    ]
  }

  fn hit(&self) -> SearchHit<'_> {
    SearchHit::Student(self)
  }
}

impl Searchable for Project {
  fn display_name(&self) -> Cow<'_, str> {
    Cow::Borrowed(&self.title)
  }

  fn search_fields(&self) -> Vec<Cow<'_, str>> {
    vec![Cow::Borrowed(&self.title), Cow::Owned(self.author())]
  }

  fn hit(&self) -> SearchHit<'_> {
    SearchHit::Project(self)
  }
}
