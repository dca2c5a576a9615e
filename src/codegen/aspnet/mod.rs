//! ASP.NET Core project generation
//!
//! Generates the layered service for one project:
//! - Entity classes with navigation properties (Models/)
//! - DTOs and the AutoMapper profile (Models/DTOs/, Mappings/)
//! - Repository interfaces and EF Core implementations (Repositories/)
//! - API controllers (Controllers/)
//! - The DbContext with seed data (Data/)
//! - Program.cs, the .csproj and settings files
//!
//! Every generator is a pure function of the project spec and the resolved
//! relationships; nothing touches the filesystem here.

use std::path::PathBuf;

use crate::codegen::relationships::Relationships;
use crate::codegen::types::{Entity, ProjectSpec};
use crate::codegen::utils::to_camel_case;
use crate::error::{GenerationWarning, Result};

mod controller_cs;
mod csproj;
mod db_context_cs;
mod dto_cs;
mod model_cs;
mod program_cs;
mod repository_cs;
mod settings_json;

pub use controller_cs::generate_controllers;
pub use csproj::generate_csproj;
pub use db_context_cs::generate_db_context;
pub use dto_cs::generate_dtos;
pub use model_cs::{generate_models, plan_navigations, NavigationPlan};
pub use program_cs::generate_program;
pub use repository_cs::generate_repositories;
pub use settings_json::generate_settings;

/// Directory skeleton created for every project, relative to the project root
pub const PROJECT_FOLDERS: &[&str] = &[
    "Controllers",
    "Models",
    "Models/DTOs",
    "Data",
    "Repositories",
    "Mappings",
    "Migrations",
    "Properties",
];

/// One emitted file, path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        GeneratedFile {
            path: path.into(),
            contents,
        }
    }
}

/// Files and warnings produced for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectArtifacts {
    pub files: Vec<GeneratedFile>,
    pub warnings: Vec<GenerationWarning>,
}

impl ProjectArtifacts {
    pub fn push_file(&mut self, path: impl Into<PathBuf>, contents: String) {
        self.files.push(GeneratedFile::new(path, contents));
    }

    pub fn warn(&mut self, warning: GenerationWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Look up a generated file by its relative path
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == PathBuf::from(path))
    }
}

/// Primary key used for id parameters, lookups and routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Property name on the entity (e.g. "Id")
    pub property: String,
    /// Declared type (e.g. "Guid")
    pub type_name: String,
}

impl KeyInfo {
    /// Key of an entity, defaulting to `Guid Id` when none is declared
    pub fn of(entity: Option<&Entity>) -> Self {
        match entity.and_then(|e| e.primary_key()) {
            Some(pk) => KeyInfo {
                property: pk.name.clone(),
                type_name: pk.type_name.clone(),
            },
            None => KeyInfo {
                property: "Id".to_string(),
                type_name: "Guid".to_string(),
            },
        }
    }

    /// Parameter name for the key (camelCase of the property)
    pub fn param(&self) -> String {
        to_camel_case(&self.property)
    }

    /// Route template segment with a type constraint where ASP.NET has one
    pub fn route(&self) -> String {
        let param = self.param();
        match self.type_name.trim_end_matches('?') {
            "Guid" => format!("{{{}:guid}}", param),
            "int" => format!("{{{}:int}}", param),
            "long" => format!("{{{}:long}}", param),
            _ => format!("{{{}}}", param),
        }
    }
}

/// Render every artifact of a project in the fixed stage order.
///
/// Relationships are resolved once, up front, and shared by all stages.
pub fn render_project(project: &ProjectSpec) -> Result<ProjectArtifacts> {
    let relationships = Relationships::resolve(&project.models);
    let mut artifacts = ProjectArtifacts::default();

    generate_models(project, &relationships, &mut artifacts)?;
    generate_dtos(project, &mut artifacts)?;
    generate_repositories(project, &relationships, &mut artifacts)?;
    generate_controllers(project, &mut artifacts)?;
    generate_csproj(project, &mut artifacts)?;
    generate_db_context(project, &mut artifacts)?;
    generate_program(project, &mut artifacts)?;
    generate_settings(project, &mut artifacts)?;

    Ok(artifacts)
}
