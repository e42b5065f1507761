use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use maskcopy_io_fs::{EnumCopyCaseMode, EnumCopyPatternMode, SpecCopyOptions, SpecCopyRequest};

/// Recursively copy files matching a mask from a directory or zip archive.
#[derive(Debug, Parser)]
#[command(name = "maskcopy", version)]
pub struct Cli {
    /// Source directory or zip file
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    pub src: PathBuf,

    /// File mask, e.g. '*.txt'
    pub file_mask: String,

    /// Destination directory (will be created if it doesn't exist)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dst: PathBuf,

    /// Overwrite existing files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Print matches and check collisions without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// How the file mask is interpreted
    #[arg(long, value_enum, default_value_t = PatternMode::Glob)]
    pub pattern_mode: PatternMode,

    /// Case handling for the file mask
    #[arg(long = "case", value_enum, default_value_t = CaseMode::Native)]
    pub case_mode: CaseMode,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors (takes precedence over -v)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternMode {
    Glob,
    Regex,
    Literal,
}

impl From<PatternMode> for EnumCopyPatternMode {
    fn from(value: PatternMode) -> Self {
        match value {
            PatternMode::Glob => Self::Glob,
            PatternMode::Regex => Self::Regex,
            PatternMode::Literal => Self::Literal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseMode {
    Native,
    Sensitive,
    Insensitive,
}

impl From<CaseMode> for EnumCopyCaseMode {
    fn from(value: CaseMode) -> Self {
        match value {
            CaseMode::Native => Self::Native,
            CaseMode::Sensitive => Self::Sensitive,
            CaseMode::Insensitive => Self::Insensitive,
        }
    }
}

impl Cli {
    pub fn to_request(&self) -> SpecCopyRequest {
        SpecCopyRequest::new(&self.src, &self.file_mask, &self.dst).with_options(SpecCopyOptions {
            rule_pattern: self.pattern_mode.into(),
            rule_case: self.case_mode.into(),
            if_overwrite: self.overwrite,
            if_dry_run: self.dry_run,
        })
    }
}
