use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::commands::run::{self, Operation, RequestArgs};
use crate::logging;
use crate::questionnaire::{AnswerSheet, QUESTIONS, RESPONSE_OPTIONS, Role, resolve_option};

#[derive(Debug, Args, Clone)]
pub struct ConsultArgs {
    /// Company the respondent works for.
    #[arg(long)]
    pub company: String,
    #[arg(long, value_enum)]
    pub role: Role,
    /// JSON object mapping question numbers (1-based) to answers.
    #[arg(long, conflicts_with = "interactive", required_unless_present = "interactive")]
    pub answers: Option<PathBuf>,
    /// Ask the questions on the terminal.
    #[arg(long)]
    pub interactive: bool,
    /// File with the earlier company analysis.
    #[arg(long, conflicts_with = "analysis_text")]
    pub analysis: Option<PathBuf>,
    /// Earlier company analysis as text.
    #[arg(long)]
    pub analysis_text: Option<String>,
    /// Allow submitting with unanswered questions.
    #[arg(long)]
    pub allow_partial: bool,
    #[command(flatten)]
    pub request: RequestArgs,
}

pub async fn run(args: ConsultArgs) -> Result<(), String> {
    logging::init(args.request.verbosity());
    let company = args.company.trim();
    if company.is_empty() {
        return Err("Company name must not be empty.".to_string());
    }

    let sheet = match &args.answers {
        Some(path) => load_answers(path)?,
        None => {
            let stdin = io::stdin();
            collect_answers(&mut stdin.lock(), &mut io::stderr())?
        }
    };
    check_sheet(&sheet, args.allow_partial)?;

    let prior_analysis = match (&args.analysis, &args.analysis_text) {
        (Some(path), _) => fs::read_to_string(path).map_err(|err| {
            format!("Failed to read analysis file '{}': {err}", path.display())
        })?,
        (None, Some(text)) => text.clone(),
        (None, None) => String::new(),
    };
    if prior_analysis.trim().is_empty() {
        warn!("no prior analysis given; the consultation is based on the questionnaire only");
    }

    let operation = Operation::Consultation {
        company: company.to_string(),
        prior_analysis: prior_analysis.trim().to_string(),
        answers: sheet.answers(),
        role: args.role,
    };
    run::execute(&args.request, operation).await
}

fn check_sheet(sheet: &AnswerSheet, allow_partial: bool) -> Result<(), String> {
    if sheet.answered() == 0 {
        return Err("No questionnaire answers given.".to_string());
    }
    if !allow_partial && !sheet.is_complete() {
        return Err(format!(
            "Only {} of {} questions answered. Answer all of them or pass --allow-partial.",
            sheet.answered(),
            QUESTIONS.len()
        ));
    }
    Ok(())
}

fn load_answers(path: &Path) -> Result<AnswerSheet, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read answers file '{}': {err}", path.display()))?;
    let entries: Map<String, Value> = serde_json::from_str(&raw)
        .map_err(|err| format!("Failed to parse answers file '{}': {err}", path.display()))?;
    parse_answers(&entries)
}

fn parse_answers(entries: &Map<String, Value>) -> Result<AnswerSheet, String> {
    let mut sheet = AnswerSheet::new();
    for (key, value) in entries {
        let number = key
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|number| *number >= 1)
            .ok_or_else(|| format!("Invalid question number '{key}' in answers file."))?;
        let raw = match value {
            Value::String(text) => text.clone(),
            Value::Number(position) => position.to_string(),
            Value::Null => String::new(),
            other => return Err(format!("Invalid answer {other} for question {number}.")),
        };
        let label = if raw.trim().is_empty() {
            String::new()
        } else {
            resolve_option(&raw)
                .ok_or_else(|| {
                    format!(
                        "Invalid answer '{raw}' for question {number}. Use 1-{} or one of: {}.",
                        RESPONSE_OPTIONS.len(),
                        RESPONSE_OPTIONS.join(", ")
                    )
                })?
                .to_string()
        };
        sheet.record(number - 1, label)?;
    }
    Ok(sheet)
}

/// Reads one answer per question from `input`. An empty line skips the
/// question; unrecognized input asks again. Stops early at end of input.
fn collect_answers<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<AnswerSheet, String> {
    let write_err = |err: io::Error| format!("Failed to write prompt: {err}");
    let mut sheet = AnswerSheet::new();
    let scale = RESPONSE_OPTIONS
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}) {option}", index + 1))
        .collect::<Vec<_>>()
        .join("  ");

    'questions: for (index, question) in QUESTIONS.iter().enumerate() {
        writeln!(
            out,
            "{} {}",
            format!("[{}/{}]", index + 1, QUESTIONS.len()).bold(),
            question
        )
        .map_err(write_err)?;

        loop {
            write!(out, "{} ", scale.dimmed()).map_err(write_err)?;
            out.flush().map_err(write_err)?;

            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .map_err(|err| format!("Failed to read answer: {err}"))?;
            if read == 0 {
                writeln!(out).map_err(write_err)?;
                break 'questions;
            }
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            match resolve_option(line) {
                Some(label) => {
                    sheet.record(index, label)?;
                    break;
                }
                None => writeln!(out, "{}", "Unknown answer, try again.".yellow())
                    .map_err(write_err)?,
            }
        }
    }

    Ok(sheet)
}
