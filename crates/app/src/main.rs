use std::fmt;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use academy_core::ledger::AttemptOutcome;
use academy_core::model::{AVATARS, SUBJECTS, SignupDraft, SubjectId, UserProfile};
use academy_core::stats::SubjectMapEntry;
use services::{
    AccountError, AppServices, AppServicesError, Clock, CommitReport, DashboardView, ErrorKind,
    LessonError, LessonView, ProgressViewError, UserSummary,
};

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
    InvalidAnswer { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAnswer { raw } => {
                write!(f, "invalid answer {raw:?}; use option numbers or _ to skip")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// A failure ready to print, with its taxonomy kind when a service raised it.
#[derive(Debug)]
struct Failure {
    kind: Option<ErrorKind>,
    message: String,
}

impl Failure {
    fn plain(err: impl fmt::Display) -> Self {
        Self {
            kind: None,
            message: err.to_string(),
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self.kind? {
            ErrorKind::Authentication => {
                Some("sign in with `academy login <email>` or create an account with `academy signup`")
            }
            ErrorKind::Conflict => Some("progress moved on; open the lesson again and retake the quiz"),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Storage => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(hint) = self.hint() {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

impl From<AccountError> for Failure {
    fn from(err: AccountError) -> Self {
        Self {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<LessonError> for Failure {
    fn from(err: LessonError) -> Self {
        Self {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<ProgressViewError> for Failure {
    fn from(err: ProgressViewError) -> Self {
        Self {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<AppServicesError> for Failure {
    fn from(err: AppServicesError) -> Self {
        Self::plain(err)
    }
}

impl From<ArgsError> for Failure {
    fn from(err: ArgsError) -> Self {
        Self::plain(err)
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Self::plain(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Self::plain(err)
    }
}

/// Terminal front end for the coding academy.
#[derive(Debug, Parser)]
#[command(name = "academy", version)]
struct Cli {
    /// SQLite database URL or path.
    #[arg(long = "db", env = "ACADEMY_DB_URL", default_value = "sqlite://academy.sqlite3")]
    db_url: String,

    /// How long a quiz result stays on screen before it is saved.
    #[arg(long, env = "ACADEMY_REVEAL_MS", default_value_t = 2000)]
    reveal_ms: u64,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        nickname: Option<String>,
        /// Avatar glyph; see `academy avatars`.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List the avatar glyphs offered at signup.
    Avatars,
    /// Sign in with the email used at signup (case-sensitive).
    Login { email: String },
    /// Sign out.
    Logout,
    /// Show the signed-in learner, if any.
    Whoami,
    /// Dashboard: level, XP, and overall progress.
    Profile,
    /// The learning path with lock state per subject.
    Map,
    /// List every subject in the catalog.
    Subjects,
    /// Show the current lesson of a subject.
    Lesson { subject: SubjectId },
    /// Answer the current lesson's quiz, e.g. `--answers 1,2,_,3,1`.
    Quiz {
        subject: SubjectId,
        #[arg(long, default_value = "")]
        answers: String,
    },
    /// Find other learners by name or nickname.
    Search { term: String },
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Failure> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Parse `1,2,_,3` into positional answers. `_` or an empty slot skips a question.
fn parse_answers(raw: &str) -> Result<Vec<Option<usize>>, ArgsError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(str::trim)
        .map(|slot| match slot {
            "" | "_" => Ok(None),
            n => n.parse().map(Some).map_err(|_| ArgsError::InvalidAnswer {
                raw: n.to_string(),
            }),
        })
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ACADEMY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Failure> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//
// ─── TEXT RENDERING ────────────────────────────────────────────────────────────
//

fn print_user(user: &UserProfile) {
    println!(
        "{} {} ({}) <{}>",
        user.avatar(),
        user.name(),
        user.nickname(),
        user.email()
    );
    println!("  level {} · {} XP", user.level(), user.total_xp());
}

fn print_dashboard(view: &DashboardView) {
    print_user(&view.user);
    let s = &view.stats;
    println!(
        "  {}/{} XP toward level {}",
        s.band_xp, s.band_size, s.next_level
    );
    println!(
        "  {}/{} subjects completed ({}%), overall progress {}%",
        s.completed_subjects, s.total_subjects, s.completion_rate, s.overall_progress
    );
    println!();
    print_map(&view.subjects);
}

fn print_map(entries: &[SubjectMapEntry]) {
    for entry in entries {
        let lock = if entry.unlocked { " " } else { "🔒" };
        println!(
            "{lock} {:<24} {:<12} {}/{} lessons ({}%)",
            entry.name,
            entry.status.as_str(),
            entry.lessons_done,
            entry.total_lessons,
            entry.percent
        );
    }
}

fn print_lesson(view: &LessonView) {
    let lesson = view.lesson;
    println!(
        "{} · lesson {} of {}: {}",
        view.at.subject.subject().name,
        view.at.number,
        view.total_lessons,
        lesson.title
    );
    println!();
    println!("{}", lesson.concept);
    println!();
    println!("{}", lesson.explanation);
    println!();
    println!("{}", lesson.code_example);
    println!();
    for point in lesson.key_points {
        println!("  • {point}");
    }
    println!();
    println!("{}", lesson.motivation);
    println!();
    for (i, q) in lesson.quiz.iter().enumerate() {
        println!("Q{}. {}", i + 1, q.question);
        for (n, option) in q.options.iter().enumerate() {
            println!("    {n}) {option}");
        }
    }
}

fn lesson_json(view: &LessonView) -> serde_json::Value {
    let lesson = view.lesson;
    json!({
        "subject": view.at.subject,
        "lessonNumber": view.at.number,
        "totalLessons": view.total_lessons,
        "progress": view.progress,
        "title": lesson.title,
        "concept": lesson.concept,
        "explanation": lesson.explanation,
        "motivation": lesson.motivation,
        "codeExample": lesson.code_example,
        "keyPoints": lesson.key_points,
        "quiz": lesson.quiz.iter().map(|q| json!({
            "question": q.question,
            "options": q.options,
        })).collect::<Vec<_>>(),
    })
}

fn commit_json(report: &CommitReport) -> serde_json::Value {
    match &report.outcome {
        AttemptOutcome::Passed(pass) => json!({
            "passed": true,
            "lesson": pass.lesson.to_string(),
            "xpGained": pass.xp_gained,
            "leveledUp": pass.leveled_up,
            "subjectCompleted": pass.subject_completed,
            "unlocked": pass.unlocked,
            "collectionUpdated": report.collection_updated,
            "user": pass.profile,
        }),
        AttemptOutcome::Failed { grade } => json!({
            "passed": false,
            "grade": grade,
        }),
    }
}

fn print_commit(report: &CommitReport) {
    match &report.outcome {
        AttemptOutcome::Passed(pass) => {
            println!("+{} XP. {} complete.", pass.xp_gained, pass.lesson);
            if pass.leveled_up {
                println!("Level up! You are now level {}.", pass.profile.level());
            }
            if pass.subject_completed {
                println!("Subject finished: {}.", pass.lesson.subject.subject().name);
            }
            if let Some(next) = pass.unlocked {
                println!("Unlocked: {}.", next.subject().name);
            }
        }
        AttemptOutcome::Failed { .. } => {
            println!("Not quite. Review the lesson and try again.");
        }
    }
}

fn print_search(hits: &[UserSummary]) {
    if hits.is_empty() {
        println!("No learners found.");
    }
    for hit in hits {
        println!(
            "{} {} ({}) · level {} · {} XP · {}%",
            hit.avatar, hit.name, hit.nickname, hit.level, hit.total_xp, hit.overall_progress
        );
    }
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

async fn run(cli: Cli) -> Result<(), Failure> {
    if cli.db_url.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: cli.db_url }.into());
    }
    let db_url = normalize_sqlite_url(cli.db_url);

    // Open + migrate SQLite here so core and services stay free of I/O setup.
    prepare_sqlite_file(&db_url)?;
    tracing::debug!(db = %db_url, "opening database");
    let app = AppServices::new_sqlite(&db_url, Clock::system()).await?;
    let json = cli.json;

    match cli.command {
        Command::Signup {
            name,
            email,
            nickname,
            avatar,
        } => {
            let user = app
                .accounts()
                .sign_up(SignupDraft {
                    name,
                    email,
                    nickname,
                    avatar,
                })
                .await?;
            if json {
                print_json(&user)?;
            } else {
                println!("Welcome aboard!");
                print_user(&user);
            }
        }
        Command::Login { email } => {
            let user = app.accounts().log_in(&email).await?;
            if json {
                print_json(&user)?;
            } else {
                println!("Welcome back!");
                print_user(&user);
            }
        }
        Command::Avatars => {
            if json {
                print_json(&AVATARS)?;
            } else {
                println!("{}", AVATARS.join("  "));
            }
        }
        Command::Logout => {
            app.accounts().log_out().await?;
            if !json {
                println!("Signed out.");
            }
        }
        Command::Whoami => {
            let user = app.accounts().current_user().await?;
            match (json, user) {
                (true, user) => print_json(&user)?,
                (false, Some(user)) => print_user(&user),
                (false, None) => println!("Not signed in."),
            }
        }
        Command::Profile => {
            let view = app.progress().dashboard().await?;
            if json {
                print_json(&view)?;
            } else {
                print_dashboard(&view);
            }
        }
        Command::Map => {
            let entries = app.progress().subject_map().await?;
            if json {
                print_json(&entries)?;
            } else {
                print_map(&entries);
            }
        }
        Command::Subjects => {
            if json {
                let list: Vec<_> = SUBJECTS
                    .iter()
                    .map(|s| {
                        json!({
                            "id": s.id,
                            "name": s.name,
                            "code": s.code,
                            "description": s.description,
                            "totalLessons": s.total_lessons,
                        })
                    })
                    .collect();
                print_json(&list)?;
            } else {
                for s in &SUBJECTS {
                    println!(
                        "{:<4} {:<10} {:<24} {}",
                        s.code,
                        s.id.as_str(),
                        s.name,
                        s.description
                    );
                }
            }
        }
        Command::Lesson { subject } => {
            let view = app.lessons().open_lesson(subject).await?;
            if json {
                print_json(&lesson_json(&view))?;
            } else {
                print_lesson(&view);
            }
        }
        Command::Quiz { subject, answers } => {
            let answers = parse_answers(&answers)?;
            take_quiz(&app, subject, &answers, Duration::from_millis(cli.reveal_ms), json)
                .await?;
        }
        Command::Search { term } => {
            let hits = app.accounts().search(&term).await?;
            if json {
                print_json(&hits)?;
            } else {
                print_search(&hits);
            }
        }
    }

    Ok(())
}

/// Grade now, show the result, and commit once the reveal delay elapses.
/// Ctrl-C during the delay discards the attempt.
async fn take_quiz(
    app: &AppServices,
    subject: SubjectId,
    answers: &[Option<usize>],
    reveal: Duration,
    json: bool,
) -> Result<(), Failure> {
    let lessons = app.lessons();
    let attempt = lessons.grade_attempt(subject, answers).await?;
    let grade = attempt.grade;
    if !json {
        println!(
            "Score: {}% ({}/{} correct) · {}",
            grade.score,
            grade.correct,
            grade.total,
            if grade.passed { "passed" } else { "not passed" }
        );
    }

    tokio::select! {
        () = tokio::time::sleep(reveal) => {
            let report = lessons.commit(&attempt).await?;
            if json {
                print_json(&commit_json(&report))?;
            } else {
                print_commit(&report);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            drop(attempt);
            if json {
                print_json(&json!({ "discarded": true, "grade": grade }))?;
            } else {
                println!("Discarded; progress unchanged.");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();
    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
