use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use careerlaunch::backend::types::{
  CompanyProfileUpdate, EntityId, Registration, RegistrationDetails, ReservationRequest,
  StudentProfileUpdate,
};
use careerlaunch::backend::{CacheKey, CareerLaunchClient, ListingCaches};
use careerlaunch::cache::SystemClock;
use careerlaunch::config::Config;
use careerlaunch::session::SessionStore;
use careerlaunch::{logging, render, ApiError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "careerlaunch")]
#[command(about = "Command-line client for the CareerLaunch career fair")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/careerlaunch/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Log in and store the session token
  Login {
    email: String,
    /// Password (default: $CAREERLAUNCH_PASSWORD)
    #[arg(long)]
    password: Option<String>,
  },
  /// Forget the stored session
  Logout,
  /// Create a student or company account
  Register {
    #[command(subcommand)]
    kind: RegisterKind,
  },
  /// List companies
  Companies,
  /// List students
  Students,
  /// List projects
  Projects,
  /// Search companies, students and projects
  Search { term: String },
  /// Interactive search session; listings stay cached between queries
  Browse,
  /// Show one company
  Company { id: EntityId },
  /// Show one student
  Student { id: EntityId },
  /// Show a company's time slots for a day (YYYY-MM-DD)
  Planning { id: EntityId, date: NaiveDate },
  /// Request an appointment in a free time slot
  Reserve {
    id: EntityId,
    date: NaiveDate,
    /// Slot start time as listed by `planning`, e.g. 10:15
    start: String,
  },
  /// Update profile fields
  Profile {
    #[command(subcommand)]
    kind: ProfileKind,
  },
}

#[derive(Subcommand, Debug)]
enum RegisterKind {
  Student {
    email: String,
    first_name: String,
    last_name: String,
    programme: String,
    #[command(flatten)]
    common: RegisterArgs,
  },
  Bedrijf {
    email: String,
    name: String,
    sector: String,
    #[command(flatten)]
    common: RegisterArgs,
  },
}

#[derive(clap::Args, Debug)]
struct RegisterArgs {
  #[arg(long)]
  municipality: Option<String>,
  /// Password (default: $CAREERLAUNCH_PASSWORD)
  #[arg(long)]
  password: Option<String>,
  /// Password confirmation (default: same as password)
  #[arg(long)]
  confirm: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ProfileKind {
  Student {
    id: EntityId,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    programme: Option<String>,
    #[arg(long)]
    municipality: Option<String>,
    #[arg(long)]
    description: Option<String>,
  },
  Bedrijf {
    id: EntityId,
    #[arg(long)]
    sector: Option<String>,
    #[arg(long)]
    municipality: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    website: Option<String>,
  },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = logging::init(&config.log)?;

  let session = SessionStore::open_default();
  let token = match Config::get_token() {
    Some(token) => Some(token),
    None => match &session {
      Some(store) => store
        .load()
        .unwrap_or_else(|e| {
          warn!(error = %e, "ignoring unreadable session file");
          None
        })
        .map(|s| s.token),
      None => None,
    },
  };
  debug!(authenticated = token.is_some(), url = %config.api.url, "starting");

  let client = Arc::new(CareerLaunchClient::new(&config.api, token, session)?);

  let outcome = run(args.command, client, &config).await;

  match outcome {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(e) => {
      eprintln!("{}", render::notice(&e));
      Ok(ExitCode::FAILURE)
    }
  }
}

/// Password from the flag or the environment; missing is an input error.
fn password(flag: Option<String>) -> std::result::Result<String, ApiError> {
  match flag {
    Some(p) => Ok(p),
    None => Config::get_password().map_err(|e| ApiError::Validation(e.to_string())),
  }
}

fn registration(kind: RegisterKind) -> std::result::Result<Registration, ApiError> {
  let (email, details, common) = match kind {
    RegisterKind::Student {
      email,
      first_name,
      last_name,
      programme,
      common,
    } => (
      email,
      RegistrationDetails::Student {
        first_name,
        last_name,
        programme,
      },
      common,
    ),
    RegisterKind::Bedrijf {
      email,
      name,
      sector,
      common,
    } => (email, RegistrationDetails::Company { name, sector }, common),
  };

  let password = password(common.password)?;
  let password_confirm = common.confirm.unwrap_or_else(|| password.clone());

  Ok(Registration {
    email,
    password,
    password_confirm,
    municipality: common.municipality,
    details,
  })
}

async fn run(
  command: Command,
  client: Arc<CareerLaunchClient>,
  config: &Config,
) -> std::result::Result<(), ApiError> {
  let mut caches = ListingCaches::new(
    client.clone(),
    Arc::new(SystemClock),
    config.cache.max_age(),
  );

  match command {
    Command::Login { email, password: flag } => {
      let session = client.login(&email, &password(flag)?).await?;
      println!("Logged in as {}", session.email.unwrap_or(email));
    }
    Command::Register { kind } => {
      let message = client.register(&registration(kind)?).await?;
      println!("{}", message.unwrap_or_else(|| "Account created".to_string()));
    }
    Command::Logout => {
      client.logout()?;
      println!("Logged out");
    }
    Command::Companies => {
      for c in caches.companies.load().await {
        println!("{}", render::company_line(c));
      }
    }
    Command::Students => {
      for s in caches.students.load().await {
        println!("{}", render::student_line(s));
      }
    }
    Command::Projects => {
      for p in caches.projects.load().await {
        println!("{}", render::project_line(p));
      }
    }
    Command::Search { term } => {
      caches.load_all().await;
      println!("{}", render::search_output(&caches.search(&term)));
    }
    Command::Browse => browse(&mut caches).await?,
    Command::Company { id } => {
      let company = client.company(&id).await?;
      println!("{}", render::company_detail(&company));
    }
    Command::Student { id } => {
      let student = client.student(&id).await?;
      println!("{}", render::student_detail(&student));
    }
    Command::Planning { id, date } => {
      let slots = client.planning(&id, date).await?;
      if slots.is_empty() {
        println!("No time slots on {}", date);
      }
      for slot in &slots {
        println!("{}", render::slot_line(slot));
      }
    }
    Command::Reserve { id, date, start } => {
      let planning = client.planning(&id, date).await?;
      let request = ReservationRequest::for_slot(id, date, &planning, &start)?;
      let message = client.request_reservation(&request).await?;
      println!(
        "{}",
        message.unwrap_or_else(|| format!(
          "Requested {} - {} on {}",
          request.start, request.end, request.date
        ))
      );
    }
    Command::Profile { kind } => match kind {
      ProfileKind::Student {
        id,
        email,
        programme,
        municipality,
        description,
      } => {
        let update = StudentProfileUpdate {
          email,
          programme,
          municipality,
          description,
        };
        client.update_student(&id, &update).await?;
        println!("Profile updated");
      }
      ProfileKind::Bedrijf {
        id,
        sector,
        municipality,
        description,
        website,
      } => {
        let update = CompanyProfileUpdate {
          sector,
          municipality,
          description,
          website,
        };
        client.update_company(&id, &update).await?;
        println!("Profile updated");
      }
    },
  }

  Ok(())
}

/// Read queries from stdin, one per line, and search the cached listings.
///
/// `:refresh` drops all cached listings, `:quit` ends the session.
async fn browse(caches: &mut ListingCaches) -> std::result::Result<(), ApiError> {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  println!("Type to search, :refresh to reload listings, :quit to exit");

  while let Some(line) = lines.next_line().await? {
    match line.trim() {
      ":quit" | ":q" => break,
      ":refresh" => {
        caches.invalidate_all();
        info!("listings invalidated");
        println!("Listings will be reloaded on the next search");
      }
      ":companies" => print_key(caches, CacheKey::Bedrijven).await,
      ":students" => print_key(caches, CacheKey::Studenten).await,
      ":projects" => print_key(caches, CacheKey::Projecten).await,
      term => {
        caches.load_all().await;
        println!("{}", render::search_output(&caches.search(term)));
      }
    }
  }

  Ok(())
}

async fn print_key(caches: &mut ListingCaches, key: CacheKey) {
  caches.load(key).await;
  let lines: Vec<String> = match key {
    CacheKey::Bedrijven => caches.companies.data().iter().map(render::company_line).collect(),
    CacheKey::Studenten => caches.students.data().iter().map(render::student_line).collect(),
    CacheKey::Projecten => caches.projects.data().iter().map(render::project_line).collect(),
  };
  for line in lines {
    println!("{}", line);
  }
}
