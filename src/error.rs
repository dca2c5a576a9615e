//! Error and warning types.
//!
//! Fatal problems (unreadable document, failed writes) are errors; problems
//! that still leave a usable skeleton are collected as [`GenerationWarning`]s.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the configuration document itself
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required value: {what}")]
    Missing { what: String },
}

/// Errors that abort generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("toolchain command `{command}` failed: {detail}")]
    Toolchain { command: String, detail: String },

    #[error("failed to render template: {0}")]
    Render(#[from] fmt::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Artifact kinds that can name an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Dto,
    Repository,
    Controller,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Dto => "dto",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Controller => "controller",
        };
        f.write_str(s)
    }
}

/// Non-fatal finding reported alongside the generated output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationWarning {
    #[error("{artifact} '{name}' references unknown entity '{entity}'")]
    UnknownEntity {
        artifact: ArtifactKind,
        name: String,
        entity: String,
    },

    #[error("{artifact} '{name}' lists unsupported operation '{operation}'")]
    UnsupportedOperation {
        artifact: ArtifactKind,
        name: String,
        operation: String,
    },

    #[error("seed data names unknown entity '{entity}'")]
    UnknownSeedEntity { entity: String },

    #[error("seed data for '{entity}' sets unknown property '{property}'")]
    UnknownSeedProperty { entity: String, property: String },

    #[error("seed value {value} for {entity}.{property} does not fit type '{type_name}'; emitted verbatim")]
    LiteralFallback {
        entity: String,
        property: String,
        type_name: String,
        value: String,
    },

    #[error("foreign key {entity}.{property} references unknown entity '{target}'")]
    DanglingForeignKey {
        entity: String,
        property: String,
        target: String,
    },

    #[error("entity '{entity}' already has a navigation named '{navigation}'; duplicate skipped")]
    DuplicateNavigation { entity: String, navigation: String },

    #[error("'{name}' does not start with the interface prefix; implementation named '{name}Impl'")]
    MissingInterfacePrefix { name: String },

    #[error("controller '{handler}' has no repository for '{entity}'; assuming the conventional name")]
    MissingRepository { handler: String, entity: String },

    #[error("toolchain command `{command}` failed: {detail}")]
    ToolchainFailure { command: String, detail: String },
}
