//! Operator CLI for the contact pipeline.
//!
//! # Responsibility
//! - Register forms and inspect stored submissions.
//! - Submit a message through the same form capture flow the site uses.
//! - Provide a smoke probe for `folio_core` linkage.

use clap::{Args, Parser, Subcommand};
use folio_core::capture::contact_form::outcome;
use folio_core::db::open_db;
use folio_core::{
    init_logging_from_config, AppConfig, ContactForm, ContactService, FormId, LocalTransport,
    NewForm, SqliteContentStore, SubmissionListQuery, SubmitTransport,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio contact pipeline tools")]
struct Cli {
    /// SQLite database path; overrides FOLIO_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage information.
    Ping,
    /// Manage registered forms.
    #[command(subcommand)]
    Forms(FormsCommand),
    /// Submit a contact message using FOLIO_CONTACT_FORM_ID.
    Submit(SubmitArgs),
    /// Inspect stored submissions.
    #[command(subcommand)]
    Submissions(SubmissionsCommand),
}

#[derive(Debug, Subcommand)]
enum FormsCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        confirmation_message: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    message: String,
}

#[derive(Debug, Subcommand)]
enum SubmissionsCommand {
    List {
        #[arg(long)]
        form: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &AppConfig) -> Result<(), String> {
    match command {
        Command::Ping => {
            println!("folio_core ping={}", folio_core::ping());
            println!("folio_core version={}", folio_core::core_version());
            Ok(())
        }
        Command::Forms(forms) => run_forms(forms, config),
        Command::Submit(args) => run_submit(args, config),
        Command::Submissions(SubmissionsCommand::List {
            form,
            limit,
            offset,
        }) => {
            let conn = open(config)?;
            let store = SqliteContentStore::new(&conn);
            let query = SubmissionListQuery {
                form: form.map(FormId),
                limit,
                offset,
            };
            let submissions = store
                .list_submissions(&query)
                .map_err(|err| err.to_string())?;
            for submission in &submissions {
                let fields = submission
                    .submission_data
                    .iter()
                    .map(|entry| format!("{}={:?}", entry.field, entry.value))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "{} form={} created_at={} {fields}",
                    submission.id, submission.form, submission.created_at
                );
            }
            println!("{} submission(s)", submissions.len());
            Ok(())
        }
    }
}

fn run_forms(command: FormsCommand, config: &AppConfig) -> Result<(), String> {
    let conn = open(config)?;
    let store = SqliteContentStore::new(&conn);
    match command {
        FormsCommand::Create {
            title,
            confirmation_message,
        } => {
            let id = store
                .create_form(&NewForm {
                    title,
                    confirmation_message,
                })
                .map_err(|err| err.to_string())?;
            println!("created form {id}");
        }
        FormsCommand::List => {
            for form in store.list_forms().map_err(|err| err.to_string())? {
                println!("{}\t{}", form.id, form.title);
            }
        }
    }
    Ok(())
}

fn run_submit(args: SubmitArgs, config: &AppConfig) -> Result<(), String> {
    let conn = open(config)?;
    let store = SqliteContentStore::new(&conn);
    let transport = LocalTransport::new(ContactService::new(&store), config.contact.clone());

    let mut form = ContactForm::new();
    form.name = args.name;
    form.email = args.email;
    form.message = args.message;

    let data = form
        .begin_submission()
        .ok_or_else(|| "a submission is already in flight".to_string())?;
    let reply = transport.send(&data);
    let result = outcome(&reply);
    let notice = form.complete_submission(reply);

    match result {
        Ok(()) => {
            println!("{}", notice.text());
            Ok(())
        }
        Err(kind) => Err(format!("{} ({}: {kind})", notice.text(), kind.code())),
    }
}

fn open(config: &AppConfig) -> Result<Connection, String> {
    open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.db_path.display()
        )
    })
}
