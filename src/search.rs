//! Live search over cached listings.
//!
//! Every keystroke filters the in-memory lists; no request is made.
//! Suggestions are prefix matches on display names, results are substring
//! matches on each entity's searchable fields.

use std::borrow::Cow;

use crate::backend::types::{Company, Project, Student};

/// Maximum number of suggestions shown in the dropdown
pub const MAX_SUGGESTIONS: usize = 10;

/// Maximum number of result cards
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Company,
  Student,
  Project,
}

impl EntityKind {
  pub fn label(&self) -> &'static str {
    match self {
      EntityKind::Company => "company",
      EntityKind::Student => "student",
      EntityKind::Project => "project",
    }
  }
}

/// Something the search box can find.
pub trait Searchable {
  /// Name shown in suggestions
  fn display_name(&self) -> Cow<'_, str>;

  /// Fields matched by substring
  fn search_fields(&self) -> Vec<Cow<'_, str>>;

  fn hit(&self) -> SearchHit<'_>;

  fn matches(&self, term: &str) -> bool {
    self
      .search_fields()
      .iter()
      .any(|field| field.to_lowercase().contains(term))
  }
}

/// A search result tagged with its entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchHit<'a> {
  Company(&'a Company),
  Student(&'a Student),
  Project(&'a Project),
}

impl SearchHit<'_> {
  pub fn kind(&self) -> EntityKind {
    match self {
      SearchHit::Company(_) => EntityKind::Company,
      SearchHit::Student(_) => EntityKind::Student,
      SearchHit::Project(_) => EntityKind::Project,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome<'a> {
  pub suggestions: Vec<String>,
  pub results: Vec<SearchHit<'a>>,
}

/// Lowercase and trim raw input.
pub fn normalize(term: &str) -> String {
  term.trim().to_lowercase()
}

/// Suggestions and results for raw input. Empty input yields nothing.
pub fn search<'a>(
  term: &str,
  companies: &'a [Company],
  students: &'a [Student],
  projects: &'a [Project],
) -> SearchOutcome<'a> {
  let term = normalize(term);
  if term.is_empty() {
    return SearchOutcome::default();
  }

  SearchOutcome {
    suggestions: suggestions(&term, companies, students, projects),
    results: results(&term, companies, students, projects),
  }
}

/// Distinct display names starting with `term`, first seen first.
pub fn suggestions(
  term: &str,
  companies: &[Company],
  students: &[Student],
  projects: &[Project],
) -> Vec<String> {
  if term.is_empty() {
    return Vec::new();
  }

  let names = companies
    .iter()
    .map(Searchable::display_name)
    .chain(students.iter().map(Searchable::display_name))
    .chain(projects.iter().map(Searchable::display_name));

  let mut out: Vec<String> = Vec::new();
  for name in names {
    if out.len() >= MAX_SUGGESTIONS {
      break;
    }
    if name.to_lowercase().starts_with(term) && !out.iter().any(|n| n.as_str() == name) {
      out.push(name.into_owned());
    }
  }
  out
}

/// Entities with a field containing `term`: companies, then students, then projects.
pub fn results<'a>(
  term: &str,
  companies: &'a [Company],
  students: &'a [Student],
  projects: &'a [Project],
) -> Vec<SearchHit<'a>> {
  if term.is_empty() {
    return Vec::new();
  }

  let companies = companies.iter().filter(|c| c.matches(term)).map(|c| c.hit());
  let students = students.iter().filter(|s| s.matches(term)).map(|s| s.hit());
  let projects = projects.iter().filter(|p| p.matches(term)).map(|p| p.hit());

  companies
    .chain(students)
    .chain(projects)
    .take(MAX_RESULTS)
    .collect()
}
