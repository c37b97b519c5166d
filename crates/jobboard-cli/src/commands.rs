//! Command parsing and execution for the `jobboard` binary.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use futures::future::join_all;
use tracing::{info, warn};

use jobboard_core::{
    ApiClient, ApiError, ChallengeTopic, Config, ErrorKind, GenerateChallenges, Job, JobFilter,
    NewApplication, Registration,
};

use crate::utils::{format_date, format_optional, truncate_string};

pub const USAGE: &str = "\
Usage: jobboard <command> [args]

Commands:
  login [email]                          Log in and store the token
  register <email> [company name]        Create a jobseeker (or company) account
  logout                                 Log out and forget the token
  whoami                                 Show the current account
  jobs [search terms]                    List job postings
  job <id>...                            Show one or more postings
  apply <job-id> [cover letter]          Apply to a posting
  applications                           List your applications
  challenges <job-id>                    List challenges for a posting
  generate <job-id> <topic> <difficulty> [count]
                                         Generate template challenges
                                         (topics: fraud_detection, financial_investigation,
                                          litigation_support)
  stats                                  Admin dashboard numbers
  subscription                           Show subscription status
  help                                   Show this message";

/// Maximum width of the title column in job listings.
const TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: Option<String> },
    Register { email: String, company: Option<String> },
    Logout,
    WhoAmI,
    Jobs { search: Option<String> },
    Job { ids: Vec<String> },
    Apply { job_id: String, cover_letter: Option<String> },
    Applications,
    Challenges { job_id: String },
    Generate { job_id: String, topic: ChallengeTopic, difficulty: String, count: u32 },
    Stats,
    Subscription,
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        let joined = |words: &[String]| (!words.is_empty()).then(|| words.join(" "));

        let command = match name.as_str() {
            "login" => Command::Login { email: rest.first().cloned() },
            "register" => Command::Register {
                email: required(rest, 0, "email")?,
                company: joined(rest.get(1..).unwrap_or_default()),
            },
            "logout" => Command::Logout,
            "whoami" | "me" => Command::WhoAmI,
            "jobs" => Command::Jobs { search: joined(rest) },
            "job" => {
                if rest.is_empty() {
                    bail!("missing argument: id");
                }
                Command::Job { ids: rest.to_vec() }
            }
            "apply" => Command::Apply {
                job_id: required(rest, 0, "job-id")?,
                cover_letter: joined(rest.get(1..).unwrap_or_default()),
            },
            "applications" => Command::Applications,
            "challenges" => Command::Challenges { job_id: required(rest, 0, "job-id")? },
            "generate" => {
                let topic = required(rest, 1, "topic")?;
                let count = match rest.get(3) {
                    Some(raw) => raw
                        .parse()
                        .ok()
                        .filter(|n: &u32| *n > 0)
                        .ok_or_else(|| anyhow!("count must be a positive number, got {}", raw))?,
                    None => 1,
                };
                Command::Generate {
                    job_id: required(rest, 0, "job-id")?,
                    topic: ChallengeTopic::parse(&topic)
                        .ok_or_else(|| anyhow!("unknown topic: {}", topic))?,
                    difficulty: required(rest, 2, "difficulty")?,
                    count,
                }
            }
            "stats" => Command::Stats,
            "subscription" => Command::Subscription,
            "help" | "--help" | "-h" => Command::Help,
            other => bail!("unknown command: {}", other),
        };
        Ok(command)
    }
}

fn required(args: &[String], index: usize, name: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| anyhow!("missing argument: {}", name))
}

/// Text shown to the user for a failed call.
pub fn user_message(err: &ApiError) -> String {
    match err.kind() {
        ErrorKind::Authentication => format!("{} - please run `jobboard login`", err),
        ErrorKind::Transport => {
            format!("Unable to reach the job board server ({})", err)
        }
        _ => err.to_string(),
    }
}

pub struct Context {
    pub client: ApiClient,
    pub config: Config,
}

pub async fn run(ctx: &mut Context, command: Command) -> Result<()> {
    match command {
        Command::Help => println!("{}", USAGE),
        Command::Login { email } => login(ctx, email).await?,
        Command::Register { email, company } => register(ctx, email, company).await?,
        Command::Logout => {
            ctx.client.logout().await.map_err(api_err)?;
            println!("Logged out.");
        }
        Command::WhoAmI => {
            let user = ctx.client.current_user().await.map_err(api_err)?;
            println!("{} <{}>", user.display_name(), user.email);
            println!("Role: {}", user.role.as_str());
            if let Some(ref company) = user.company_name {
                println!("Company: {}", company);
            }
        }
        Command::Jobs { search } => {
            let filter = JobFilter {
                search,
                ..JobFilter::default()
            };
            let jobs = ctx.client.jobs(&filter).await.map_err(api_err)?;
            if jobs.is_empty() {
                println!("No jobs found.");
            }
            for job in &jobs {
                print_job_row(job);
            }
        }
        Command::Job { ids } => {
            let results = join_all(ids.iter().map(|id| ctx.client.job(id))).await;
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(job) => print_job_detail(&job),
                    Err(e) => eprintln!("{}: {}", id, user_message(&e)),
                }
            }
        }
        Command::Apply { job_id, cover_letter } => {
            let application = NewApplication {
                cover_letter,
                ..NewApplication::default()
            };
            let app = ctx
                .client
                .apply_to_job(&job_id, &application)
                .await
                .map_err(api_err)?;
            println!(
                "Applied to {} (application {}, status {})",
                job_id,
                app.id,
                format_optional(app.status.as_deref(), "pending")
            );
        }
        Command::Applications => {
            let apps = ctx.client.my_applications().await.map_err(api_err)?;
            if apps.is_empty() {
                println!("No applications yet.");
            }
            for app in apps {
                let title = app
                    .job_post
                    .as_ref()
                    .map(|j| j.title.clone())
                    .unwrap_or_else(|| app.job_post_id.clone());
                println!(
                    "{:<12} {:<width$} {:<10} {}",
                    app.id,
                    truncate_string(&title, TITLE_WIDTH),
                    format_optional(app.status.as_deref(), "-"),
                    format_date(app.created_at.as_ref()),
                    width = TITLE_WIDTH
                );
            }
        }
        Command::Challenges { job_id } => {
            let challenges = ctx.client.challenges_for_job(&job_id).await.map_err(api_err)?;
            for challenge in challenges {
                println!(
                    "{} [{} / {}] {}",
                    format_optional(challenge.id.as_deref(), "-"),
                    format_optional(challenge.topic.as_deref(), "-"),
                    format_optional(challenge.difficulty.as_deref(), "-"),
                    truncate_string(challenge.prompt.as_deref().unwrap_or_default(), 80)
                );
            }
        }
        Command::Generate { job_id, topic, difficulty, count } => {
            let params = GenerateChallenges {
                count,
                ..GenerateChallenges::new(job_id, topic, difficulty)
            };
            let challenges = ctx.client.generate_ai_challenges(&params).await.map_err(api_err)?;
            println!("{}", serde_json::to_string_pretty(&challenges)?);
        }
        Command::Stats => {
            let stats = ctx.client.admin_stats().await.map_err(api_err)?;
            println!("Users:        {} ({} jobseekers, {} companies)", stats.total_users, stats.jobseekers, stats.companies);
            println!("Jobs:         {} ({} active)", stats.total_jobs, stats.active_jobs);
            println!("Applications: {} ({} pending)", stats.total_applications, stats.pending_applications);
        }
        Command::Subscription => {
            let status = ctx.client.subscription_status().await.map_err(api_err)?;
            println!(
                "Subscription: {} (tier {})",
                format_optional(status.status.as_deref(), "none"),
                format_optional(status.tier.as_deref(), "-")
            );
        }
    }
    Ok(())
}

async fn login(ctx: &mut Context, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email(ctx.config.last_email.as_deref())?,
    };
    if email.is_empty() {
        bail!("Email is required");
    }
    let password = rpassword::prompt_password("Password: ")?;

    let resp = ctx.client.login(&email, &password).await.map_err(api_err)?;
    remember_email(ctx, email);

    println!("Logged in as {}", resp.user.display_name());
    Ok(())
}

async fn register(ctx: &mut Context, email: String, company: Option<String>) -> Result<()> {
    let password = rpassword::prompt_password("Choose a password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }

    let registration = match company {
        Some(company) => Registration::company(email.clone(), password, company),
        None => Registration::jobseeker(email.clone(), password),
    };
    let resp = ctx.client.register(&registration).await.map_err(api_err)?;
    remember_email(ctx, email);

    println!("Account created for {}", resp.user.display_name());
    Ok(())
}

fn remember_email(ctx: &mut Context, email: String) {
    ctx.config.last_email = Some(email);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    } else {
        info!("Config saved");
    }
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

fn print_job_row(job: &Job) {
    println!(
        "{:<12} {:<width$} {:<20} {}",
        job.id,
        truncate_string(&job.title, TITLE_WIDTH),
        truncate_string(&format_optional(job.location.as_deref(), "-"), 20),
        job.salary_display().unwrap_or_default(),
        width = TITLE_WIDTH
    );
}

fn print_job_detail(job: &Job) {
    println!("{} ({})", job.title, job.id);
    println!("  Location:   {}", format_optional(job.location.as_deref(), "-"));
    println!("  Type:       {}", format_optional(job.employment_type.as_deref(), "-"));
    println!("  Experience: {}", format_optional(job.experience_level.as_deref(), "-"));
    if let Some(salary) = job.salary_display() {
        println!("  Salary:     {}", salary);
    }
    println!("  Posted:     {}", format_date(job.created_at.as_ref()));
    if let Some(ref description) = job.description {
        println!();
        println!("{}", description);
    }
    println!();
}

fn api_err(err: ApiError) -> anyhow::Error {
    anyhow!(user_message(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_core::api::TransportError;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_parse_empty_is_help() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_jobs_joins_search_terms() {
        assert_eq!(
            Command::parse(&args(&["jobs", "fraud", "examiner"])).unwrap(),
            Command::Jobs { search: Some("fraud examiner".into()) }
        );
        assert_eq!(
            Command::parse(&args(&["jobs"])).unwrap(),
            Command::Jobs { search: None }
        );
    }

    #[test]
    fn test_parse_register_company() {
        assert_eq!(
            Command::parse(&args(&["register", "hr@ledger.example", "Ledger", "&", "Co"])).unwrap(),
            Command::Register {
                email: "hr@ledger.example".into(),
                company: Some("Ledger & Co".into()),
            }
        );
        assert!(Command::parse(&args(&["register"])).is_err());
    }

    #[test]
    fn test_parse_job_ids() {
        assert_eq!(
            Command::parse(&args(&["job", "a", "b"])).unwrap(),
            Command::Job { ids: vec!["a".into(), "b".into()] }
        );
    }

    #[test]
    fn test_parse_generate() {
        assert_eq!(
            Command::parse(&args(&["generate", "j1", "litigation_support", "advanced", "2"])).unwrap(),
            Command::Generate {
                job_id: "j1".into(),
                topic: ChallengeTopic::LitigationSupport,
                difficulty: "advanced".into(),
                count: 2,
            }
        );
        assert!(Command::parse(&args(&["generate", "j1", "tax", "easy"])).is_err());
        assert!(Command::parse(&args(&["generate", "j1", "fraud_detection"])).is_err());
        assert!(Command::parse(&args(&["generate", "j1", "fraud_detection", "easy", "x"])).is_err());
        assert!(Command::parse(&args(&["generate", "j1", "fraud_detection", "easy", "0"])).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse(&args(&["apply"])).is_err());
        assert!(Command::parse(&args(&["job"])).is_err());
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
    }

    #[test]
    fn test_user_message_by_kind() {
        let err = ApiError::from(TransportError::Connect("refused".into()));
        assert_eq!(
            user_message(&err),
            "Unable to reach the job board server (Connection failed: refused)"
        );

        let err = ApiError::InvalidResponse("bad".into());
        assert_eq!(user_message(&err), "Invalid response: bad");
    }
}
