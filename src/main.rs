//! govsubmit - submit governance proposals and polls from a draft file

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use govsubmit::api::{GovernanceApi, GovernanceClient};
use govsubmit::app::{apply_linked, App, Submittable, SubmitOutcome};
use govsubmit::config::Config;
use govsubmit::state::{
    balance_address, Choices, Editor, FieldName, FormDraft, FormKind, GovernanceDraft,
    GovernanceField, PollDraft, PollField, VotingPowerGate,
};
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormArg {
    Governance,
    Poll,
}

#[derive(Parser, Debug)]
#[command(name = "govsubmit", version)]
#[command(about = "Validate and submit governance proposals and polls")]
struct Args {
    /// Proposal type to submit
    #[arg(value_enum)]
    form: FormArg,

    /// JSON draft file
    draft: PathBuf,

    /// Connected account address
    #[arg(long)]
    account: String,

    /// Address whose voting power is checked instead of the account
    #[arg(long)]
    address: Option<String>,

    /// Proposal id to link and prefill from (governance only)
    #[arg(long)]
    link: Option<String>,

    /// Print the validated form instead of submitting it
    #[arg(long)]
    preview: bool,
}

/// Poll draft as written in a draft file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PollFile {
    title: String,
    description: String,
    choices: Vec<String>,
}

impl From<PollFile> for PollDraft {
    fn from(file: PollFile) -> Self {
        Self {
            title: file.title,
            description: file.description,
            choices: Choices::from_texts(file.choices),
        }
    }
}

const POLL_FIELDS: [PollField; 3] = [PollField::Title, PollField::Description, PollField::Choices];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "govsubmit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    let client = GovernanceClient::new(config.api_url())?;
    let mut app = App::new(client, config.snapshot_space());
    let address = balance_address(&args.account, args.address.as_deref()).to_string();

    let content = std::fs::read_to_string(&args.draft)
        .with_context(|| format!("Failed to read {}", args.draft.display()))?;

    let created = match args.form {
        FormArg::Governance => {
            let draft: GovernanceDraft =
                serde_json::from_str(&content).context("Invalid governance draft")?;
            let mut editor = Editor::new(draft, config.governance_schema.clone());
            let mut gate = VotingPowerGate::for_form(FormKind::Governance, &config.thresholds);

            let ticket = editor.ticket();
            let (fetched, ()) = tokio::join!(
                async {
                    match args.link.as_deref() {
                        Some(id) => Some(app.fetch_linked(id).await),
                        None => None,
                    }
                },
                app.load_voting_power(&mut gate, &address),
            );
            if let Some(fetched) = fetched {
                apply_linked(&mut editor, ticket, fetched);
            }

            for field in GovernanceField::TEXT {
                editor.blur(field);
            }
            if args.preview {
                editor.validate();
                print_fields(&editor, &GovernanceField::TEXT);
                print_submit_control(&gate);
                true
            } else {
                submit(&mut app, &mut editor, &gate).await
            }
        }
        FormArg::Poll => {
            let file: PollFile = serde_json::from_str(&content).context("Invalid poll draft")?;
            let mut editor = Editor::new(PollDraft::from(file), config.poll_schema.clone());
            let mut gate = VotingPowerGate::for_form(FormKind::Poll, &config.thresholds);
            app.load_voting_power(&mut gate, &address).await;

            for field in POLL_FIELDS {
                editor.blur(field);
            }
            if args.preview {
                editor.validate();
                print_fields(&editor, &POLL_FIELDS);
                for (key, text) in editor.value().choices.display_rows() {
                    let marker = if key.is_some() { "-" } else { "*" };
                    println!("  {marker} {text}");
                }
                print_submit_control(&gate);
                true
            } else {
                submit(&mut app, &mut editor, &gate).await
            }
        }
    };

    if !created {
        std::process::exit(1);
    }

    Ok(())
}

/// One line per field: character count against its limit, then any error key
fn print_fields<D: FormDraft>(editor: &Editor<D>, fields: &[D::Field]) {
    for &field in fields {
        let mut line = field.name().to_string();
        if let Some((len, max)) = editor.counter(field) {
            line.push_str(&format!(" {len}/{max}"));
        }
        if let Some(key) = editor.errors().message_key(<D as FormDraft>::KIND, field) {
            line.push_str(&format!(" {key}"));
        }
        println!("{line}");
    }
}

/// Submit control as drawn with no submission in flight
fn print_submit_control(gate: &VotingPowerGate) {
    let control = gate.submit_control(false);
    println!(
        "submit: disabled={} loading={} inputs_locked={}",
        control.disabled,
        control.loading,
        gate.fields_disabled()
    );
    if let Some(key) = gate.message_key() {
        println!("{key}");
    }
}

/// Submit and print the outcome; returns true if a proposal was created
async fn submit<A, D>(app: &mut App<A>, editor: &mut Editor<D>, gate: &VotingPowerGate) -> bool
where
    A: GovernanceApi,
    D: Submittable,
{
    let outcome = app.submit(editor, gate).await;
    info!(?outcome, "Submission finished");

    match outcome {
        SubmitOutcome::Created(navigation) => {
            println!("{}", navigation.location());
            true
        }
        SubmitOutcome::Blocked => {
            match gate.message_key() {
                Some(key) => eprintln!("{key}"),
                None => eprintln!("voting power is not available"),
            }
            false
        }
        SubmitOutcome::Invalid => {
            for (field, _) in editor.errors().iter() {
                if let Some(key) = editor.errors().message_key(<D as FormDraft>::KIND, field) {
                    match editor.counter(field) {
                        Some((len, max)) => eprintln!("{}: {key} ({len}/{max})", field.name()),
                        None => eprintln!("{}: {key}", field.name()),
                    }
                }
            }
            false
        }
        SubmitOutcome::AlreadySubmitted => {
            eprintln!("draft was already submitted");
            false
        }
        SubmitOutcome::Rejected(message) => {
            eprintln!("{message}");
            false
        }
    }
}
