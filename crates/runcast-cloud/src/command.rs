use std::fmt;
use std::path::{Path, PathBuf};

/// The cloud CLI every command is addressed to.
pub const GCLOUD: &str = "gcloud";

/// Characters tried, in order, as gcloud's alternate list delimiter
/// (`^<d>^a,b<d>c`) when an item itself contains a comma.
const ALT_DELIMITERS: [char; 6] = ['@', '|', ';', '#', '~', '%'];

/// One flag's value as produced by a flag rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// `--name=value`
    Text(String),
    /// `--name`
    On,
    /// `--no-name`
    Off,
}

impl FlagValue {
    /// `Some(Text)` for a non-empty string, `None` otherwise.
    pub fn text(value: Option<&str>) -> Option<Self> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| Self::Text(v.to_owned()))
    }

    /// Maps a tri-state switch: unset emits nothing.
    pub fn toggle(value: Option<bool>) -> Option<Self> {
        value.map(|on| if on { Self::On } else { Self::Off })
    }

    fn render(&self, name: &str) -> String {
        match self {
            Self::Text(value) => format!("--{name}={value}"),
            Self::On => format!("--{name}"),
            Self::Off => format!("--no-{name}"),
        }
    }
}

/// A program plus its ordered argument tokens.
///
/// `Display` joins every token with a single space; that string is what a
/// dry run prints. Execution passes the tokens as argv, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn gcloud() -> Self {
        Self::new(GCLOUD)
    }

    /// Append a positional token.
    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.args.push(token.into());
        self
    }

    pub fn push_flag(&mut self, name: &str, value: &FlagValue) -> &mut Self {
        self.args.push(value.render(name));
        self
    }

    /// Run the command from `dir` instead of the caller's working directory.
    pub fn set_current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Program followed by all arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Join list items the way gcloud parses list and dict flags.
///
/// Items are comma-separated. If any item contains a comma, the first
/// delimiter absent from every item is declared with gcloud's `^<d>^`
/// escape prefix instead.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let needs_escape = items.iter().any(|i| i.as_ref().contains(','));
    if !needs_escape {
        return join_with(items, ",");
    }

    match ALT_DELIMITERS
        .iter()
        .find(|d| !items.iter().any(|i| i.as_ref().contains(**d)))
    {
        Some(d) => format!("^{d}^{}", join_with(items, &d.to_string())),
        None => {
            tracing::warn!(
                delimiters = ?ALT_DELIMITERS,
                "every alternate list delimiter occurs in the values; gcloud will split them on commas"
            );
            join_with(items, ",")
        }
    }
}

fn join_with<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(sep)
}
