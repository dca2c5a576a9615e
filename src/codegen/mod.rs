//! Code generation framework for layered ASP.NET Core services.
//!
//! This module turns a YAML solution description into entity classes, DTOs,
//! repositories, controllers and a persistence context, keeping the names
//! used across those artifacts consistent.

pub mod types;
pub mod yaml_loader;
pub mod utils;
pub mod relationships;
pub mod literal;
pub mod aspnet;
pub mod orchestration;
pub mod fs_utils;

// Re-export key types
pub use types::{
    CrudOperation, DtoSpec, Entity, Feature, HandlerSpec, PersistenceContextSpec, ProjectSpec,
    Property, RepositorySpec, Schema, SeedSpec, Solution,
};
pub use yaml_loader::{load_schema, parse_schema, validate_schema};
pub use relationships::{IncomingAssociation, OutgoingAssociation, RelationshipInfo, Relationships};
pub use literal::{format_literal, format_value, FormattedLiteral, SemanticType};
pub use aspnet::{render_project, GeneratedFile, ProjectArtifacts};
pub use orchestration::{GenerationReport, Generator, GeneratorOptions};

/// Generate a solution from a YAML configuration file
///
/// This is the main entry point used by the `layergen` binary. It loads and
/// validates the document, then writes every project and runs the toolchain
/// according to `options`.
///
/// # Example
///
/// ```rust,no_run
/// use layergen::codegen::{generate_from_yaml, GeneratorOptions};
///
/// let report = generate_from_yaml("config/examples/parking.yaml", &GeneratorOptions::default())
///     .expect("Code generation failed");
/// println!("{} files written", report.files_written.len());
/// ```
pub fn generate_from_yaml(
    yaml_path: impl AsRef<std::path::Path>,
    options: &GeneratorOptions,
) -> crate::error::Result<GenerationReport> {
    println!("📋 Loading configuration from {}...", yaml_path.as_ref().display());

    let schema = load_schema(&yaml_path)?;

    println!("  ✓ Configuration loaded: {}", schema.solution.name);

    let report = Generator::with_process_runner(options.clone()).generate(&schema)?;

    println!("✨ Code generation complete!");

    Ok(report)
}
