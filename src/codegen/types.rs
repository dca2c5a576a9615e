//! Type definitions for the solution configuration document.
//!
//! These types represent the structure of the YAML configuration and are
//! read-only inputs to every generator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of the configuration document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub version: Option<String>,
    pub solution: Solution,
}

/// Solution: the unit grouping every generated project
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(default)]
    pub name: String,
    /// Parent directory of the generated solution (defaults to the working directory)
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectSpec>,
}

/// One generated service project
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default)]
    pub name: String,
    /// Project kind (e.g. "webapi"); informational only
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,
    /// Target runtime tag, e.g. "net8.0"
    #[serde(default)]
    pub target_framework: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, alias = "entities")]
    pub models: Vec<Entity>,
    #[serde(default)]
    pub dtos: Vec<DtoSpec>,
    #[serde(default)]
    pub repositories: Vec<RepositorySpec>,
    #[serde(default, alias = "handlers")]
    pub controllers: Vec<HandlerSpec>,
    #[serde(default, alias = "persistenceContext")]
    pub db_context: Option<PersistenceContextSpec>,
    #[serde(default, alias = "seeds")]
    pub seed_data: Vec<SeedSpec>,
}

impl ProjectSpec {
    /// Check whether a feature flag is enabled (case-insensitive)
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features
            .iter()
            .any(|f| f.eq_ignore_ascii_case(feature.as_str()))
    }

    /// Find an entity by exact name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Find the repository serving an entity, if one is declared
    pub fn repository_for(&self, entity: &str) -> Option<&RepositorySpec> {
        self.repositories.iter().find(|r| r.model == entity)
    }

    /// Name of the persistence context class, empty if undeclared
    pub fn db_context_name(&self) -> &str {
        self.db_context.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

/// Feature flags recognised by the generators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Swagger,
    EntityFramework,
    AutoMapper,
    Logging,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Swagger => "swagger",
            Feature::EntityFramework => "entityframework",
            Feature::AutoMapper => "automapper",
            Feature::Logging => "logging",
        }
    }
}

/// Entity (data-model record) definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Entity {
    /// First property flagged as primary key
    pub fn primary_key(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.is_primary_key)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Iterate over the foreign-key properties
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_foreign_key)
    }
}

/// Property definition shared by entities and DTOs
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub name: String,
    /// Declared type name (e.g. "Guid", "string", "decimal")
    #[serde(default, rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default, rename = "isFK", alias = "isForeignKey")]
    pub is_foreign_key: bool,
    /// Target entity, meaningful only for foreign keys
    #[serde(default)]
    pub references: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
}

impl Property {
    /// Referenced entity when this property is a foreign key
    pub fn reference_target(&self) -> Option<&str> {
        if self.is_foreign_key {
            self.references.as_deref()
        } else {
            None
        }
    }
}

/// Data-transfer contract
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoSpec {
    #[serde(default)]
    pub name: String,
    /// Entity this contract maps from/to
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Repository definition (interface-style name, e.g. "IVehicleRepository")
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub operations: Vec<String>,
}

/// Request handler ("controller") definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    /// Read contract
    #[serde(default)]
    pub dto: String,
    #[serde(default)]
    pub create_dto: String,
    #[serde(default)]
    pub update_dto: String,
    #[serde(default)]
    pub operations: Vec<String>,
}

/// Persistence context descriptor
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceContextSpec {
    #[serde(default)]
    pub name: String,
    /// Opaque connection descriptor, copied verbatim into settings
    #[serde(default)]
    pub connection_string: String,
}

/// Seed rows for one entity
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSpec {
    #[serde(default)]
    pub entity: String,
    /// Rows of property name to raw value, in document order
    #[serde(default)]
    pub values: Vec<IndexMap<String, serde_yaml::Value>>,
}

/// Fixed CRUD operation vocabulary shared by repositories and handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOperation {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 5] = [
        CrudOperation::GetAll,
        CrudOperation::GetById,
        CrudOperation::Create,
        CrudOperation::Update,
        CrudOperation::Delete,
    ];

    /// Parse an operation name, ignoring case. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "getall" => Some(CrudOperation::GetAll),
            "getbyid" => Some(CrudOperation::GetById),
            "create" => Some(CrudOperation::Create),
            "update" => Some(CrudOperation::Update),
            "delete" => Some(CrudOperation::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudOperation::GetAll => "getAll",
            CrudOperation::GetById => "getById",
            CrudOperation::Create => "create",
            CrudOperation::Update => "update",
            CrudOperation::Delete => "delete",
        }
    }
}
