//! CLI: infer → Swift `Codable` declarations, one output per input.
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;

use json_codable::batch::{self, BatchReport, BatchSettings, InputKind};
use json_codable::naming::{IdentifierEscaper, ObjectNameStrategy, VariableNameStrategy};
use json_codable::options::{AccessLevel, Config, IndentUnit};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Swift Codable models from JSON samples or JSON-Schema documents
#[derive(Parser, Debug)]
#[command(name = "json-codable", version)]
pub struct CommandLineInterface {
    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer models from sample JSON documents
    Json(JsonOut),
    /// infer models from JSON-Schema documents
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON configuration file; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// directory for generated files (next to each input if omitted)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// extension of generated files
    #[arg(long, default_value = batch::DEFAULT_EXTENSION)]
    extension: String,

    /// print generated code instead of writing files
    #[arg(long)]
    stdout: bool,
}

#[derive(Args, Debug, Clone)]
struct EmitSettings {
    /// name of the top-level type
    #[arg(long)]
    root_name: Option<String>,

    /// order fields by source key
    #[arg(long)]
    sorted: bool,

    /// declare fields with `var`
    #[arg(long)]
    mutable: bool,

    /// `tab` or a number of spaces
    #[arg(long)]
    indent: Option<IndentUnit>,

    #[arg(long, value_enum)]
    access: Option<AccessLevel>,

    /// always write the CodingKeys table
    #[arg(long)]
    always_key_mapping: bool,

    /// protocols every declaration conforms to (comma separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    conform: Option<Vec<String>>,

    /// declare types without any conformance
    #[arg(long, conflicts_with = "conform")]
    no_conformance: bool,

    #[arg(long, value_enum)]
    variable_names: Option<VariableNameStrategy>,

    #[arg(long, value_enum)]
    object_names: Option<ObjectNameStrategy>,

    /// singular type names for array elements (`items` → `Item`)
    #[arg(long)]
    drop_plural: bool,

    /// leave reserved words unescaped
    #[arg(long)]
    no_escape: bool,
}

#[derive(clap::Parser, Debug)]
struct JsonOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    emit_settings: EmitSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// type UUID-shaped strings as String
    #[arg(long)]
    no_detect_uuid: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    emit_settings: EmitSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// type non-negative integers as Int instead of UInt
    #[arg(long)]
    no_prefer_unsigned: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> anyhow::Result<Config> {
        let Some(path) = self.config.as_ref() else {
            return Ok(Config::default());
        };
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Config::from_json_str(&source)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }
}

impl EmitSettings {
    /// Flags override whatever the config file said.
    fn apply(&self, config: &mut Config) {
        let emit = &mut config.emit;
        if let Some(root_name) = &self.root_name {
            emit.root_name = root_name.clone();
        }
        if self.sorted {
            emit.sorted_fields = true;
        }
        if self.mutable {
            emit.mutable = true;
        }
        if let Some(indent) = self.indent {
            emit.indent_unit = indent;
        }
        if let Some(access) = self.access {
            emit.access_level = access;
        }
        if self.always_key_mapping {
            emit.always_emit_key_mapping = true;
        }
        if let Some(conform) = &self.conform {
            emit.conforming_interfaces = conform.clone();
        }
        if self.no_conformance {
            emit.conforming_interfaces.clear();
        }
        if let Some(strategy) = self.variable_names {
            emit.variable_name_strategy = strategy;
        }
        if let Some(strategy) = self.object_names {
            emit.object_name_strategy = strategy;
        }
        if self.drop_plural {
            emit.drop_plural_suffix = true;
        }
        if self.no_escape {
            emit.escaper = IdentifierEscaper::none();
        }
    }
}

impl OutputSettings {
    fn batch_settings(&self, kind: InputKind, config: Config, json_pointer: Option<String>) -> BatchSettings {
        BatchSettings {
            kind,
            config,
            json_pointer,
            out_dir: self.out_dir.clone(),
            extension: self.extension.clone(),
            write_files: !self.stdout,
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// `Ok(false)` when at least one input failed.
    pub fn run(&self) -> anyhow::Result<bool> {
        let (input_settings, output_settings, settings) = match &self.cmd {
            Command::Json(target) => {
                let mut config = target.input_settings.load_config()?;
                target.emit_settings.apply(&mut config);
                if target.no_detect_uuid {
                    config.value.detect_uuid = false;
                }
                let settings = target.output_settings.batch_settings(
                    InputKind::Json,
                    config,
                    target.input_settings.json_pointer.clone(),
                );
                (&target.input_settings, &target.output_settings, settings)
            }
            Command::Schema(target) => {
                let mut config = target.input_settings.load_config()?;
                target.emit_settings.apply(&mut config);
                if target.no_prefer_unsigned {
                    config.schema.prefer_unsigned_integer = false;
                }
                let settings = target.output_settings.batch_settings(
                    InputKind::Schema,
                    config,
                    target.input_settings.json_pointer.clone(),
                );
                (&target.input_settings, &target.output_settings, settings)
            }
        };
        settings.config.emit.validate()?;

        let inputs = resolve_file_path_patterns(&input_settings.input)
            .context("failed to resolve input file paths")?;
        tracing::debug!(inputs = inputs.len(), kind = ?settings.kind, "resolved inputs");

        let report = batch::run(&inputs, &settings);
        print_report(&report, output_settings.stdout);
        Ok(report.is_success())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn print_report(report: &BatchReport, to_stdout: bool) {
    for outcome in &report.outcomes {
        let input = outcome.input.display();
        match &outcome.result {
            Ok(emitted) if to_stdout => {
                if report.outcomes.len() > 1 {
                    println!("// {input}");
                }
                print!("{}", emitted.text);
            }
            Ok(emitted) => {
                let output = emitted.output.as_deref().unwrap_or(outcome.input.as_path());
                eprintln!("{} {input} → {}", "wrote".green().bold(), output.display());
            }
            Err(error) => {
                eprintln!("{} {input}: {error}", "failed".red().bold());
            }
        }
    }
    let failed = report.failure_count();
    if failed > 0 {
        eprintln!(
            "{}",
            format!("{failed} of {} inputs failed", report.outcomes.len()).red()
        );
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
