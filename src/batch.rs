//! Multi-input pipeline: read → select → infer → emit → write.
//!
//! Inputs are independent. Each one is processed on the rayon pool and gets
//! its own [`Outcome`]; a failing input never stops the others.
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;

use crate::codegen;
use crate::error::{Error, Result};
use crate::inference::infer_from_value;
use crate::ir::TypeDef;
use crate::options::Config;
use crate::schema::infer_from_schema;

pub const DEFAULT_EXTENSION: &str = "swift";

/// What the input documents are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Sample data.
    #[default]
    Json,
    /// JSON-Schema documents.
    Schema,
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub kind: InputKind,
    pub config: Config,
    /// RFC 6901 pointer to the sub-document to model, e.g. `/data/items/0`.
    pub json_pointer: Option<String>,
    /// Where outputs go; next to each input when unset.
    pub out_dir: Option<PathBuf>,
    pub extension: String,
    /// Write output files. When off, text is only returned in the report.
    pub write_files: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            kind: InputKind::default(),
            config: Config::default(),
            json_pointer: None,
            out_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            write_files: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    /// `None` when nothing was written.
    pub output: Option<PathBuf>,
    pub text: String,
}

#[derive(Debug)]
pub struct Outcome {
    pub input: PathBuf,
    pub result: Result<Emitted>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input, in input order.
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

// ------------------------------- Pipeline --------------------------------- //

pub fn run(inputs: &[PathBuf], settings: &BatchSettings) -> BatchReport {
    let collisions = output_collisions(inputs, settings);
    let outcomes: Vec<Outcome> = inputs
        .par_iter()
        .map(|input| {
            let result = match collisions.get(input.as_path()) {
                Some(error) => Err(error.clone()),
                None => process_one(input, settings),
            };
            Outcome { input: input.clone(), result }
        })
        .collect();
    let report = BatchReport { outcomes };
    tracing::info!(
        inputs = inputs.len(),
        failed = report.failure_count(),
        "batch finished"
    );
    report
}

/// Inputs that share an output file, each mapped to the error it fails with.
/// Nothing collides when no files are written.
fn output_collisions<'a>(inputs: &'a [PathBuf], settings: &BatchSettings) -> HashMap<&'a Path, Error> {
    if !settings.write_files {
        return HashMap::new();
    }
    let mut by_output: BTreeMap<PathBuf, Vec<&Path>> = BTreeMap::new();
    for input in inputs {
        by_output.entry(output_path(input, settings)).or_default().push(input);
    }

    let mut collisions = HashMap::new();
    for (output, sources) in by_output.into_iter().filter(|(_, sources)| sources.len() > 1) {
        tracing::warn!(output = %output.display(), inputs = sources.len(), "output collision");
        let error = Error::OutputCollision {
            output: output.display().to_string(),
            inputs: sources.iter().map(|p| p.display().to_string()).collect(),
        };
        for source in sources {
            collisions.insert(source, error.clone());
        }
    }
    collisions
}

fn process_one(input: &Path, settings: &BatchSettings) -> Result<Emitted> {
    let _span = tracing::debug_span!("input", path = %input.display()).entered();
    let source = fs::read_to_string(input).map_err(|e| Error::io("cannot read", input, e))?;
    let text = generate_from_str(&source, settings)?;
    if !settings.write_files {
        return Ok(Emitted { output: None, text });
    }

    let output = output_path(input, settings);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io("cannot create", parent, e))?;
    }
    fs::write(&output, &text).map_err(|e| Error::io("cannot write", &output, e))?;
    tracing::debug!(output = %output.display(), bytes = text.len(), "written");
    Ok(Emitted { output: Some(output), text })
}

/// Parse, then [`generate`].
pub fn generate_from_str(source: &str, settings: &BatchSettings) -> Result<String> {
    let document: Value = serde_json::from_str(source)?;
    generate(&document, settings)
}

/// Model one decoded document and render it.
pub fn generate(document: &Value, settings: &BatchSettings) -> Result<String> {
    let selected = match settings.json_pointer.as_deref() {
        Some(pointer) => document
            .pointer(pointer)
            .ok_or_else(|| Error::PointerNotFound { pointer: pointer.to_string() })?,
        None => document,
    };
    let model: TypeDef = match settings.kind {
        InputKind::Json => infer_from_value(selected, settings.config.value)?.into(),
        InputKind::Schema => infer_from_schema(selected, settings.config.schema)?,
    };
    codegen::emit(&model, &settings.config.emit)
}

/// `<out_dir or input dir>/<input stem>.<extension>`
pub fn output_path(input: &Path, settings: &BatchSettings) -> PathBuf {
    let dir = match &settings.out_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let mut name: OsString = input.file_stem().map(Into::into).unwrap_or_else(|| "output".into());
    if !settings.extension.is_empty() {
        name.push(".");
        name.push(&settings.extension);
    }
    dir.join(name)
}

// ------------------------------- Tests ------------------------------------ //
