//! Run a SurveyJS-style survey definition as an interactive terminal form.
//!
//! The definition comes from a file, inline JSON, or stdin; with no input a
//! built-in sample survey runs. Collected responses are written as JSON to
//! the configured destinations when the survey completes.

mod demo;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use surveyui::model::Survey;
use surveyui::{SurveyUI, Theme, UiOptions};

use demo::{DemoSurvey, SurveyDef};

const DEFAULT_TEMP_FILE: &str = "/tmp/surveyui.json";

const SAMPLE_SURVEY: &str = include_str!("sample_survey.json");

#[derive(Debug, Parser)]
#[command(
    name = "surveyui",
    version,
    about = "Run survey definitions as interactive TUIs"
)]
struct Cli {
    /// Survey definition: file path, inline JSON, or "-" for stdin.
    /// Runs a built-in sample survey when omitted.
    #[arg(short = 's', long = "survey", value_name = "SPEC")]
    survey: Option<String>,

    /// Color theme: modern, business, school, fashion, cyber
    #[arg(long = "theme", value_name = "NAME", default_value = "modern")]
    theme: String,

    /// Disable the page transition animation
    #[arg(long = "no-animate")]
    no_animate: bool,

    /// Hide the key-binding help line
    #[arg(long = "no-help")]
    no_help: bool,

    /// Initial answers as a JSON object: file path, inline JSON, or "-" for stdin
    #[arg(long = "data", value_name = "SPEC")]
    data: Option<String>,

    /// Where to write the responses ("-" writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "DEST")]
    output: Option<String>,

    /// Overwrite the output file even if it already exists
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Print the built-in sample survey definition and exit
    #[arg(long = "print-sample")]
    print_sample: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_sample {
        print!("{SAMPLE_SURVEY}");
        return Ok(());
    }

    let raw = load_definition(cli.survey.as_deref())?;
    let def = SurveyDef::parse(&raw)?;

    let destination = resolve_destination(cli.output.as_deref());
    if let Destination::File(path) = &destination {
        if path.exists() && !cli.force {
            return Err(eyre!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }

    let options = UiOptions {
        animate: !cli.no_animate,
        theme: Theme::from_tag(&cli.theme),
        show_help: !cli.no_help,
        ..UiOptions::default()
    };

    let survey = DemoSurvey::new(def);
    if let Some(spec) = cli.data.as_deref() {
        let raw = load_definition(Some(spec))?;
        apply_initial_data(&survey, &raw)?;
    }
    let result = SurveyUI::new(survey.handle())
        .with_options(options)
        .run()
        .map_err(|err| eyre!("{err}"))?;

    match result {
        Some(data) => write_responses(&destination, &data),
        None => {
            eprintln!("survey abandoned; no responses written");
            Ok(())
        }
    }
}

fn load_definition(spec: Option<&str>) -> Result<String> {
    let Some(spec) = spec else {
        return Ok(SAMPLE_SURVEY.to_string());
    };
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return Ok(buffer);
    }

    let path = PathBuf::from(spec);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == io::ErrorKind::NotFound && looks_inline(spec) => {
            Ok(spec.to_string())
        }
        Err(err) => {
            Err(err).wrap_err_with(|| format!("failed to read file {}", path.display()))
        }
    }
}

/// A spec that starts like a JSON document is inline content, not a path.
fn looks_inline(spec: &str) -> bool {
    spec.trim_start().starts_with('{')
}

fn apply_initial_data(survey: &DemoSurvey, raw: &str) -> Result<()> {
    let initial: Value = serde_json::from_str(raw).wrap_err("invalid initial data")?;
    let Value::Object(map) = initial else {
        return Err(eyre!("initial data must be a JSON object"));
    };
    for (name, value) in map {
        survey.set_value(&name, Some(value));
    }
    Ok(())
}

enum Destination {
    Stdout,
    File(PathBuf),
}

fn resolve_destination(output: Option<&str>) -> Destination {
    match output {
        Some("-") => Destination::Stdout,
        Some(path) => Destination::File(PathBuf::from(path)),
        None => Destination::File(PathBuf::from(DEFAULT_TEMP_FILE)),
    }
}

fn write_responses(destination: &Destination, data: &Value) -> Result<()> {
    let body = serde_json::to_string_pretty(data).wrap_err("failed to serialize responses")?;
    match destination {
        Destination::Stdout => {
            println!("{body}");
        }
        Destination::File(path) => {
            fs::write(path, body)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            eprintln!("responses written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_survey_parses() {
        assert!(SurveyDef::parse(SAMPLE_SURVEY).is_ok());
    }

    #[test]
    fn inline_json_is_not_treated_as_a_path() {
        let raw = load_definition(Some(r#"{"elements":[]}"#)).unwrap();
        assert_eq!(raw, r#"{"elements":[]}"#);
    }

    #[test]
    fn missing_file_path_errors() {
        assert!(load_definition(Some("/no/such/survey.json")).is_err());
    }

    #[test]
    fn initial_data_preloads_answers() {
        let def = SurveyDef::parse(r#"{"elements":[{"type":"text","name":"q1"}]}"#).unwrap();
        let survey = DemoSurvey::new(def);
        apply_initial_data(&survey, r#"{"q1": "prefilled"}"#).unwrap();
        assert_eq!(survey.data()["q1"], serde_json::json!("prefilled"));

        assert!(apply_initial_data(&survey, r#"["not", "an", "object"]"#).is_err());
    }
}
