//! Plain-text rendering of listings, search output and notices.

use crate::backend::types::{Company, Project, Student, TimeSlot};
use crate::error::ApiError;
use crate::search::{SearchHit, SearchOutcome};

/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

pub fn company_line(c: &Company) -> String {
  format!(
    "{:>6}  {:<30}  {:<20}  {}",
    c.id.to_string(),
    truncate(&c.name, 30),
    truncate(&c.sector, 20),
    c.municipality
  )
}

pub fn student_line(s: &Student) -> String {
  format!(
    "{:>6}  {:<30}  {:<20}  {}",
    s.id.to_string(),
    truncate(&s.full_name(), 30),
    truncate(&s.programme, 20),
    s.municipality
  )
}

pub fn project_line(p: &Project) -> String {
  format!(
    "{:>8}  {:<40}  {}",
    p.id.to_string(),
    truncate(&p.title, 40),
    p.author()
  )
}

fn push_field(out: &mut String, label: &str, value: &str) {
  out.push_str(&format!("\n  {:<11}{}", format!("{}:", label), value));
}

pub fn company_detail(c: &Company) -> String {
  let mut out = c.name.clone();
  push_field(&mut out, "Sector", &c.sector);
  push_field(&mut out, "Gemeente", &c.municipality);
  for (label, value) in [
    ("Adres", &c.address),
    ("Website", &c.website),
    ("Email", &c.email),
  ] {
    if let Some(v) = value {
      push_field(&mut out, label, v);
    }
  }
  if let Some(d) = &c.description {
    out.push_str(&format!("\n\n{}", d));
  }
  out
}

pub fn student_detail(s: &Student) -> String {
  let mut out = s.full_name();
  push_field(&mut out, "Opleiding", &s.programme);
  if let Some(year) = s.study_year {
    push_field(&mut out, "Jaar", &year.to_string());
  }
  push_field(&mut out, "Gemeente", &s.municipality);
  if let Some(email) = &s.email {
    push_field(&mut out, "Email", email);
  }
  if let Some(d) = &s.description {
    out.push_str(&format!("\n\n{}", d));
  }
  out
}

pub fn slot_line(slot: &TimeSlot) -> String {
  let state = if slot.available { "free" } else { "taken" };
  format!("{} - {}  {}", slot.start, slot.end, state)
}

pub fn hit_line(hit: &SearchHit<'_>) -> String {
  let label = hit.kind().label();
  match hit {
    SearchHit::Company(c) => format!("[{}] {} ({}, {})", label, c.name, c.sector, c.municipality),
    SearchHit::Student(s) => format!("[{}] {} ({})", label, s.full_name(), s.programme),
    SearchHit::Project(p) => format!("[{}] {} by {}", label, p.title, p.author()),
  }
}

pub fn search_output(outcome: &SearchOutcome<'_>) -> String {
  if outcome.results.is_empty() && outcome.suggestions.is_empty() {
    return "No matches".to_string();
  }

  let mut lines = Vec::new();
  if !outcome.suggestions.is_empty() {
    lines.push(format!("Suggestions: {}", outcome.suggestions.join(", ")));
  }
  lines.extend(outcome.results.iter().map(hit_line));
  lines.join("\n")
}

/// One-line notice for a failed action.
pub fn notice(error: &ApiError) -> String {
  match error {
    ApiError::Unauthorized => {
      "Your session has expired. Log in again with `careerlaunch login`.".to_string()
    }
    ApiError::Validation(msg) => format!("Check your input: {}", msg),
    e if e.is_network() => "Could not reach the CareerLaunch server.".to_string(),
    other => format!("Error: {}", other),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::EntityId;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Ontwikkelingssamenwerking één", 10), "Ontwikk...");
  }

  #[test]
  fn test_slot_line() {
    let slot = TimeSlot {
      start: "10:00".to_string(),
      end: "10:15".to_string(),
      available: false,
    };
    assert_eq!(slot_line(&slot), "10:00 - 10:15  taken");
  }

  #[test]
  fn test_search_output_empty() {
    assert_eq!(search_output(&SearchOutcome::default()), "No matches");
  }

  #[test]
  fn test_search_output_lists_hits() {
    let company = Company {
      id: EntityId::Number(1),
      name: "BrusselsTech".to_string(),
      sector: "IT".to_string(),
      municipality: "Brussel".to_string(),
      description: None,
      website: None,
      email: None,
      address: None,
    };
    let outcome = SearchOutcome {
      suggestions: vec!["BrusselsTech".to_string()],
      results: vec![SearchHit::Company(&company)],
    };
    assert_eq!(
      search_output(&outcome),
      "Suggestions: BrusselsTech\n[company] BrusselsTech (IT, Brussel)"
    );
  }

  #[test]
  fn test_company_detail_single_gap() {
    let company = Company {
      id: EntityId::Number(5),
      name: "Acme".to_string(),
      sector: "Bouw".to_string(),
      municipality: "Gent".to_string(),
      description: None,
      website: Some("https://acme.be".to_string()),
      email: None,
      address: None,
    };
    assert_eq!(
      company_detail(&company),
      "Acme\n  Sector:    Bouw\n  Gemeente:  Gent\n  Website:   https://acme.be"
    );
  }

  #[test]
  fn test_student_detail() {
    let student = Student {
      id: EntityId::Number(3),
      first_name: "Jan".to_string(),
      last_name: "Jansen".to_string(),
      programme: "IT".to_string(),
      municipality: "Leuven".to_string(),
      email: Some("jan@student.be".to_string()),
      study_year: Some(2),
      description: Some("Zoekt een stage.".to_string()),
    };
    assert_eq!(
      student_detail(&student),
      "Jan Jansen\n  Opleiding: IT\n  Jaar:      2\n  Gemeente:  Leuven\n  Email:     jan@student.be\n\nZoekt een stage."
    );
  }

  #[test]
  fn test_notice_messages() {
    assert!(notice(&ApiError::Unauthorized).contains("careerlaunch login"));
    assert_eq!(
      notice(&ApiError::Rejected {
        message: "Tijdslot bezet".to_string()
      }),
      "Error: Tijdslot bezet"
    );
  }
}
