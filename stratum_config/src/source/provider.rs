//! Discovering and ordering sources from the environment and command line.

use std::io;

use camino::Utf8PathBuf;
use tracing::{debug, trace, warn};

use super::{
    Input, InputSource, Origin, PropertyEntry, PropertySource, SharedReader, Source, SourceError,
};
use crate::codec::format_for_path;

const ENV_DELIMITER: char = '_';
const ARG_DELIMITER: char = '.';
const RESERVED: &str = "config";

/// Supplies the ordered sources of one load.
pub trait SourceProvider {
    /// Collect sources, lowest precedence first.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when an environment entry or argument is
    /// malformed, or a reference cannot be resolved.
    fn sources(&self) -> Result<Vec<Source>, SourceError>;
}

impl SourceProvider for Vec<Source> {
    fn sources(&self) -> Result<Vec<Source>, SourceError> {
        Ok(self.clone())
    }
}

impl SourceProvider for [Source] {
    fn sources(&self) -> Result<Vec<Source>, SourceError> {
        Ok(self.to_vec())
    }
}

/// Collects sources from prefixed environment variables, `--key.path=value`
/// flags, and `config.file` / `config.stdin` references.
///
/// Sources are ordered as follows:
///
/// 1. environment properties, as one group;
/// 2. environment references, unless the command line declares a reference
///    of the same kind;
/// 3. command-line flags in argument order; each reference closes the open
///    property group and appends its own input source.
///
/// ```
/// use stratum_config::{
///     DefaultSourceProvider, InputSource, Origin, PropertyEntry, PropertySource, Source,
///     SourceProvider,
/// };
///
/// let provider = DefaultSourceProvider {
///     env_prefix: "demo_".into(),
///     env: vec!["demo_server_port=80".into()],
///     args: vec!["--config.file=app.yaml".into()],
///     stdin: None,
/// };
/// assert_eq!(
///     provider.sources()?,
///     vec![
///         Source::from(PropertySource::new(
///             Origin::Environment,
///             vec![PropertyEntry::new(["server", "port"], "80")],
///         )),
///         Source::from(InputSource::file("app.yaml", "yaml")),
///     ]
/// );
/// # Ok::<_, stratum_config::SourceError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DefaultSourceProvider {
    /// Prefix selecting environment variables; empty disables the scan.
    pub env_prefix: String,
    /// Environment as `NAME=value` entries.
    pub env: Vec<String>,
    /// Command-line arguments, program name excluded.
    pub args: Vec<String>,
    /// Stream read by `config.stdin` references.
    pub stdin: Option<SharedReader>,
}

impl DefaultSourceProvider {
    /// Capture the process environment, arguments, and stdin for `app_name`.
    ///
    /// The environment prefix is `app_name` with `-` and `.` replaced by `_`,
    /// followed by `_`.
    #[must_use]
    pub fn from_process(app_name: &str) -> Self {
        Self {
            env_prefix: env_prefix(app_name),
            env: std::env::vars_os()
                .map(|(name, value)| format!("{}={}", name.to_string_lossy(), value.to_string_lossy()))
                .collect(),
            args: std::env::args_os()
                .skip(1)
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            stdin: Some(SharedReader::new(io::stdin())),
        }
    }

    fn environment(&self) -> Result<(Vec<PropertyEntry>, Vec<Reference>), SourceError> {
        let mut properties = Vec::new();
        let mut references: Vec<Reference> = Vec::new();
        if self.env_prefix.is_empty() {
            return Ok((properties, references));
        }
        for entry in &self.env {
            let Some((name, value)) = entry.split_once('=') else {
                warn!(entry = %entry, "ignoring environment entry without '='");
                continue;
            };
            let Some(key) = name.strip_prefix(&self.env_prefix) else {
                continue;
            };
            let path = split_path(key, ENV_DELIMITER).ok_or_else(|| {
                SourceError::MalformedEnvironment {
                    name: name.to_owned(),
                }
            })?;
            match Reference::parse(&path, value) {
                Some(reference) => {
                    references.retain(|existing| existing.kind != reference.kind);
                    references.push(reference);
                }
                None => {
                    trace!(name, "environment property");
                    properties.push(PropertyEntry::new(path, value));
                }
            }
        }
        Ok((properties, references))
    }

    fn arguments(&self) -> Result<Vec<Argument>, SourceError> {
        let mut parsed = Vec::new();
        for arg in &self.args {
            if arg == "--" {
                break;
            }
            let Some(flag) = arg.strip_prefix("--") else {
                continue;
            };
            let (key, value) = flag.split_once('=').unwrap_or((flag, "true"));
            let path = split_path(key, ARG_DELIMITER).ok_or_else(|| {
                SourceError::MalformedArgument {
                    arg: arg.clone(),
                    reason: "empty path segment",
                }
            })?;
            match Reference::parse(&path, value) {
                Some(_) if !flag.contains('=') => {
                    return Err(SourceError::MalformedArgument {
                        arg: arg.clone(),
                        reason: "references need a value",
                    });
                }
                Some(reference) => parsed.push(Argument::Reference(reference)),
                None => {
                    trace!(arg = %arg, "command-line property");
                    parsed.push(Argument::Property(PropertyEntry::new(path, value)));
                }
            }
        }
        Ok(parsed)
    }

    fn input_source(&self, reference: Reference) -> Result<Option<Source>, SourceError> {
        if reference.value.is_empty() {
            return Ok(None);
        }
        let source = match reference.kind {
            ReferenceKind::File => {
                let path = Utf8PathBuf::from(reference.value);
                let format = match reference.format {
                    Some(format) => format,
                    None => format_for_path(&path)
                        .ok_or_else(|| SourceError::UnknownFormat { path: path.clone() })?
                        .to_owned(),
                };
                InputSource::new(Input::File(path), format)
            }
            ReferenceKind::Stdin => {
                let stdin = self.stdin.clone().ok_or(SourceError::StdinUnavailable)?;
                InputSource::new(Input::Reader(stdin), reference.value)
            }
        };
        Ok(Some(Source::Input(source)))
    }
}

impl SourceProvider for DefaultSourceProvider {
    fn sources(&self) -> Result<Vec<Source>, SourceError> {
        let (env_properties, env_references) = self.environment()?;
        let arguments = self.arguments()?;

        let mut sources = SourceList::default();
        for entry in env_properties {
            sources.push_property(Origin::Environment, entry);
        }
        for reference in env_references {
            let overridden = arguments.iter().any(|argument| {
                matches!(argument, Argument::Reference(declared) if declared.kind == reference.kind)
            });
            if !overridden {
                sources.push_input(self.input_source(reference)?);
            }
        }
        for argument in arguments {
            match argument {
                Argument::Property(entry) => sources.push_property(Origin::CommandLine, entry),
                Argument::Reference(reference) => {
                    sources.push_input(self.input_source(reference)?);
                }
            }
        }

        let collected = sources.finish();
        debug!(count = collected.len(), "collected configuration sources");
        Ok(collected)
    }
}

/// Build the environment prefix for `app_name`.
pub(crate) fn env_prefix(app_name: &str) -> String {
    let mut prefix = app_name.replace(['-', '.'], "_");
    prefix.push('_');
    prefix
}

fn split_path(key: &str, delimiter: char) -> Option<Vec<String>> {
    let segments: Vec<String> = key.split(delimiter).map(str::to_owned).collect();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReferenceKind {
    File,
    Stdin,
}

#[derive(Debug)]
struct Reference {
    kind: ReferenceKind,
    value: String,
    format: Option<String>,
}

impl Reference {
    fn parse(path: &[String], value: &str) -> Option<Self> {
        let (name, format) = match path {
            [reserved, name] if reserved == RESERVED => (name.as_str(), None),
            [reserved, name, format] if reserved == RESERVED && name == "file" => {
                (name.as_str(), Some(format.clone()))
            }
            _ => return None,
        };
        let kind = match name {
            "file" => ReferenceKind::File,
            "stdin" => ReferenceKind::Stdin,
            _ => return None,
        };
        Some(Self {
            kind,
            value: value.to_owned(),
            format,
        })
    }
}

enum Argument {
    Property(PropertyEntry),
    Reference(Reference),
}

/// Accumulates sources, grouping adjacent properties of the same origin.
#[derive(Default)]
struct SourceList {
    sources: Vec<Source>,
    open: Option<PropertySource>,
}

impl SourceList {
    fn push_property(&mut self, origin: Origin, entry: PropertyEntry) {
        match &mut self.open {
            Some(group) if group.origin == origin => group.entries.push(entry),
            _ => {
                self.close();
                self.open = Some(PropertySource::new(origin, vec![entry]));
            }
        }
    }

    fn push_input(&mut self, source: Option<Source>) {
        if let Some(input) = source {
            self.close();
            self.sources.push(input);
        }
    }

    fn close(&mut self) {
        if let Some(group) = self.open.take() {
            self.sources.push(Source::Properties(group));
        }
    }

    fn finish(mut self) -> Vec<Source> {
        self.close();
        self.sources
    }
}
