use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use conduct_board::auth::AuthError;
use conduct_board::catalog::Catalog;
use conduct_board::config::{self, Config};
use conduct_board::notify;
use conduct_board::output;
use conduct_board::records::{
    self, dashboard_counts, import_file, resolve_student, search_students, ImportError,
    LookupError, PositiveDraft, RecordError, Student, ViolationEntry,
};
use conduct_board::session::{Ledger, Session, SessionError};
use conduct_board::store::{JsonFileStore, RecordStore, StoreError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a config file
    Init {
        /// Write defaults without prompting
        #[arg(long)]
        defaults: bool,
    },
    /// List students with their scores (default if no subcommand)
    Students {
        /// Only students whose name or phone contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one student's score and full record history
    Show {
        /// Student id, name, or a unique part of the name or phone
        student: String,
    },
    /// List violation and commendation rules
    Catalog,
    /// Record a violation and apply the next disciplinary procedure
    Violation {
        student: String,
        /// Catalog id of the violation
        violation_id: String,
        /// Who observed it (defaults to the configured observer)
        #[arg(long)]
        observer: Option<String>,
        /// Show the procedure that would apply without recording anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Record a commendation, from a catalog rule or free text
    Commend {
        student: String,
        /// Catalog id of the positive rule
        #[arg(long)]
        rule: Option<String>,
        /// Description; replaces the rule's description and makes the entry custom
        #[arg(long)]
        details: Option<String>,
        #[arg(long)]
        points: Option<u32>,
        #[arg(long)]
        observer: String,
    },
    /// Register a single student
    AddStudent { name: String, phone: String },
    /// Bulk-register students from a CSV file
    Import { file: PathBuf },
    /// Delete students and all of their records
    Delete {
        #[arg(required = true)]
        students: Vec<String>,
    },
    /// Compose a parent notification for a record or a summary report
    Notify {
        student: String,
        /// Record id (or its first characters); summary report when omitted
        #[arg(long)]
        record: Option<String>,
    },
    /// Parent view: sign in with the last four phone digits
    Parent {
        student: String,
        #[arg(long)]
        code: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "conduct-board")]
#[command(about = "Student behavior scores and progressive discipline", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/conduct-board/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Admin passcode (otherwise CONDUCT_BOARD_ADMIN_CODE, then a prompt)
    #[arg(long, global = true)]
    admin_code: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Map a failure to its exit code by the typed error underneath it.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<SessionError>() || cause.is::<AuthError>() {
            return EXIT_AUTH;
        }
        if cause.is::<StoreError>() {
            return EXIT_STORE;
        }
        if cause.is::<RecordError>() || cause.is::<LookupError>() || cause.is::<ImportError>() {
            return EXIT_INPUT;
        }
    }
    EXIT_INPUT
}

struct App {
    config: Config,
    catalog: Catalog,
    store: JsonFileStore,
    admin_code: Option<String>,
    use_colors: bool,
}

impl App {
    fn admin_session(&self) -> Result<Session> {
        let code = conduct_board::auth::resolve_admin_code(self.admin_code.clone())?;
        Ok(Session::anonymous().login_admin(&code, &self.config.admin_passcode)?)
    }

    fn find_student(&self, query: &str) -> Result<Student> {
        let students = self.store.list_students()?;
        Ok(lookup_student(&students, query)?.clone())
    }

    fn list_students(&self, search: Option<String>) -> Result<()> {
        self.admin_session()?;
        let students = self.store.list_students()?;
        let records = self.store.all_records()?;

        println!("{}", output::format_dashboard(&dashboard_counts(&students, &records)));
        println!();

        let matches = match search.as_deref() {
            Some(term) => search_students(&students, term),
            None => students.iter().collect(),
        };
        let rows: Vec<output::StudentRow> = matches
            .into_iter()
            .map(|student| output::StudentRow {
                student,
                result: conduct_board::scoring::score_for_student(student.id, &records),
            })
            .collect();
        println!("{}", output::format_student_table(&rows, self.use_colors));
        Ok(())
    }

    fn show(&self, query: &str) -> Result<()> {
        let session = self.admin_session()?;
        let student = self.find_student(query)?;
        session.select_student(student.id)?;
        self.print_detail(&student)
    }

    fn print_detail(&self, student: &Student) -> Result<()> {
        let records = self.store.records_for(student.id)?;
        let result = conduct_board::scoring::calculate_score(&records);
        println!(
            "{}",
            output::format_student_detail(student, &records, &result, self.use_colors)
        );
        Ok(())
    }

    fn record_violation(
        &mut self,
        query: &str,
        violation_id: &str,
        observer: Option<String>,
        dry_run: bool,
    ) -> Result<()> {
        let session = self.admin_session()?;
        let student = self.find_student(query)?;
        session.select_student(student.id)?;

        let rule = self
            .catalog
            .violation(violation_id)
            .ok_or_else(|| RecordError::UnknownViolation(violation_id.to_string()))?;
        let mut entry = ViolationEntry::new(self.config.default_observer.clone());
        entry.select(rule);
        if let Some(observer) = observer {
            entry.set_observer(observer);
        }

        let mut ledger = Ledger::new(self.store.all_records()?);

        if dry_run {
            let step = entry.preview(ledger.records_for(student.id))?;
            println!(
                "Occurrence #{} of '{}' would apply: {}",
                step.iteration, rule.description, step.text
            );
            return Ok(());
        }

        let before = ledger.score_for(student.id);
        let (record, step) = entry.confirm(student.id, ledger.records_for(student.id), Utc::now())?;
        ledger
            .commit(&mut self.store, record)
            .context("Violation was not saved")?;
        let after = ledger.score_for(student.id);

        println!(
            "Recorded '{}' for {} (-{} points)",
            rule.description, student.name, rule.deduction
        );
        println!("  Occurrence #{}: {}", step.iteration, step.text);
        println!(
            "  Score: {} -> {} ({})",
            before.score, after.score, after.status
        );
        Ok(())
    }

    fn commend(
        &mut self,
        query: &str,
        rule_id: Option<String>,
        details: Option<String>,
        points: Option<u32>,
        observer: String,
    ) -> Result<()> {
        let session = self.admin_session()?;
        let student = self.find_student(query)?;
        session.select_student(student.id)?;

        let mut draft = PositiveDraft::new(self.config.positive_bound);
        if let Some(rule_id) = rule_id {
            let rule = self
                .catalog
                .positive(&rule_id)
                .ok_or(RecordError::UnknownPositiveRule(rule_id.clone()))?;
            draft.select_rule(rule);
        }
        if let Some(details) = details {
            draft.set_details(details);
        }
        if let Some(points) = points {
            draft.set_points(points);
            if draft.points() != points {
                eprintln!(
                    "Note: a fixed rule keeps its declared {} points; --points ignored",
                    draft.points()
                );
            }
        }
        draft.set_observer(observer);

        let record = draft.build(student.id, Utc::now())?;
        let awarded = record.points;
        let details = record.details.clone();

        let mut ledger = Ledger::new(self.store.all_records()?);
        let before = ledger.score_for(student.id);
        ledger
            .commit(&mut self.store, record)
            .context("Commendation was not saved")?;
        let after = ledger.score_for(student.id);

        println!("Recorded '{}' for {} (+{} points)", details, student.name, awarded);
        println!(
            "  Score: {} -> {} ({})",
            before.score, after.score, after.status
        );
        Ok(())
    }

    fn add_student(&mut self, name: &str, phone: &str) -> Result<()> {
        self.admin_session()?;
        let new = records::validate_new_student(name, phone)?;
        let student = self.store.insert_student(new)?;
        println!(
            "Added {} (parent access code: {})",
            student.name,
            student.access_code()
        );
        Ok(())
    }

    fn import(&mut self, file: &Path) -> Result<()> {
        self.admin_session()?;
        let outcome = import_file(file)
            .with_context(|| format!("Failed to import {}", file.display()))?;
        let skipped = outcome.skipped;
        let inserted = self.store.insert_students(outcome.students)?;
        println!(
            "Imported {} students ({} rows skipped)",
            inserted.len(),
            skipped
        );
        Ok(())
    }

    fn delete(&mut self, queries: &[String]) -> Result<()> {
        self.admin_session()?;
        let students = self.store.list_students()?;
        let mut ids = Vec::with_capacity(queries.len());
        for query in queries {
            ids.push(lookup_student(&students, query)?.id);
        }
        let removed = self.store.delete_students(&ids)?;
        println!("Deleted {} students and their records", removed);
        Ok(())
    }

    fn notify(&self, query: &str, record_ref: Option<String>) -> Result<()> {
        let session = self.admin_session()?;
        let student = self.find_student(query)?;
        session.select_student(student.id)?;
        let records = self.store.records_for(student.id)?;

        let message = match record_ref {
            Some(reference) => {
                let record = find_record(&records, &reference)?;
                notify::record_notice(&student, record, &self.config.school_name)
            }
            None => notify::summary_report(&student, &records, &self.config.school_name),
        };

        println!("To: +{}", notify::normalize_phone(&student.phone));
        println!();
        println!("{}", message);
        Ok(())
    }

    fn parent_view(&self, query: &str, code: &str) -> Result<()> {
        let student = self.find_student(query)?;
        let session = Session::anonymous().login_parent(&student, code)?;
        if session.visible_student() != Some(student.id) {
            return Err(SessionError::NotSignedIn.into());
        }
        self.print_detail(&student)?;
        let records = self.store.records_for(student.id)?;
        println!();
        println!(
            "{}",
            notify::summary_report(&student, &records, &self.config.school_name)
        );
        Ok(())
    }
}

/// Resolve a student, listing the candidates on stderr when the query is ambiguous.
fn lookup_student<'a>(students: &'a [Student], query: &str) -> Result<&'a Student> {
    match resolve_student(students, query) {
        Ok(student) => Ok(student),
        Err(e @ LookupError::Ambiguous { .. }) => {
            let term = query.trim();
            for s in students.iter().filter(|s| {
                s.name.eq_ignore_ascii_case(term) || s.name.contains(term) || s.phone.contains(term)
            }) {
                eprintln!("  {}  {}  {}", s.id, s.name, s.phone);
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Match a record by full id or by a unique id prefix.
fn find_record<'a>(
    records: &'a [records::StudentRecord],
    reference: &str,
) -> Result<&'a records::StudentRecord> {
    if let Ok(id) = Uuid::parse_str(reference) {
        if let Some(record) = records.iter().find(|r| r.id == id) {
            return Ok(record);
        }
    }
    let matches: Vec<_> = records
        .iter()
        .filter(|r| r.id.to_string().starts_with(reference))
        .collect();
    match matches.as_slice() {
        [record] => Ok(*record),
        [] => anyhow::bail!("No record matches '{}'", reference),
        _ => anyhow::bail!("'{}' matches {} records", reference, matches.len()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Students { search: None });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { defaults } = command {
        let result = if defaults {
            config::init::write_default_config(config_path).map(|path| {
                println!("Config written to {}", path.display());
            })
        } else {
            config::init::run_init_wizard(config_path)
        };
        if let Err(e) = result {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let catalog = match config.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_path = config.effective_data_path();
    let store = match JsonFileStore::open(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open store at {}: {}", data_path.display(), e);
            std::process::exit(EXIT_STORE);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} violations and {} commendation rules",
            catalog.violations().count(),
            catalog.positives().count()
        );
    }

    let mut app = App {
        config,
        catalog,
        store,
        admin_code: cli.admin_code,
        use_colors: output::should_use_colors(),
    };

    let result = match command {
        Commands::Init { .. } => Ok(()),
        Commands::Students { search } => app.list_students(search),
        Commands::Show { student } => app.show(&student),
        Commands::Catalog => {
            println!("{}", output::format_catalog(&app.catalog, app.use_colors));
            Ok(())
        }
        Commands::Violation {
            student,
            violation_id,
            observer,
            dry_run,
        } => app.record_violation(&student, &violation_id, observer, dry_run),
        Commands::Commend {
            student,
            rule,
            details,
            points,
            observer,
        } => app.commend(&student, rule, details, points, observer),
        Commands::AddStudent { name, phone } => app.add_student(&name, &phone),
        Commands::Import { file } => app.import(&file),
        Commands::Delete { students } => app.delete(&students),
        Commands::Notify { student, record } => app.notify(&student, record),
        Commands::Parent { student, code } => app.parent_view(&student, &code),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}
