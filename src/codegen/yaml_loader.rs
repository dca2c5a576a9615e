//! YAML solution configuration loader.
//!
//! This module reads the configuration document and parses it into a
//! [`Schema`]. Validation is limited to presence checks: every named element
//! must carry a name, and every project must declare its persistence context.

use crate::codegen::types::{ProjectSpec, Schema};
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Load and validate a solution configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Path to the YAML configuration document
///
/// # Example
///
/// ```ignore
/// use layergen::codegen::load_schema;
///
/// let schema = load_schema("config/examples/parking.yaml").unwrap();
/// ```
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<Schema, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let schema: Schema = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_schema(&schema)?;

    tracing::debug!(
        "loaded solution '{}' with {} project(s) from {}",
        schema.solution.name,
        schema.solution.projects.len(),
        path.display()
    );

    Ok(schema)
}

/// Parse a configuration document from a string without validating it
pub fn parse_schema(yaml: &str) -> Result<Schema, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Presence checks over a parsed schema.
///
/// Cross-references (dto → entity, seed → entity, ...) are not checked here;
/// the generators report those as warnings.
pub fn validate_schema(schema: &Schema) -> Result<(), ConfigError> {
    require(&schema.solution.name, || "solution.name".to_string())?;

    for (index, project) in schema.solution.projects.iter().enumerate() {
        require(&project.name, || format!("solution.projects[{}].name", index))?;
        validate_project(project)?;
    }

    Ok(())
}

fn validate_project(project: &ProjectSpec) -> Result<(), ConfigError> {
    let scope = &project.name;

    for (i, model) in project.models.iter().enumerate() {
        require(&model.name, || format!("{}: models[{}].name", scope, i))?;
        for (j, prop) in model.properties.iter().enumerate() {
            require(&prop.name, || {
                format!("{}: {}.properties[{}].name", scope, model.name, j)
            })?;
        }
    }

    for (i, dto) in project.dtos.iter().enumerate() {
        require(&dto.name, || format!("{}: dtos[{}].name", scope, i))?;
    }

    for (i, repo) in project.repositories.iter().enumerate() {
        require(&repo.name, || format!("{}: repositories[{}].name", scope, i))?;
    }

    for (i, controller) in project.controllers.iter().enumerate() {
        require(&controller.name, || format!("{}: controllers[{}].name", scope, i))?;
    }

    match &project.db_context {
        Some(context) => require(&context.name, || format!("{}: dbContext.name", scope)),
        None => Err(ConfigError::Missing {
            what: format!("{}: dbContext", scope),
        }),
    }
}

fn require(value: &str, what: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing { what: what() })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
version: "1.0"
solution:
  name: Parking
  outputPath: ./out
  projects:
    - name: Parking.Api
      type: webapi
      targetFramework: net8.0
      features: [swagger, entityframework]
      models:
        - name: Vehicle
          properties:
            - name: Id
              type: Guid
              isPrimaryKey: true
      dbContext:
        name: ParkingDbContext
        connectionString: "Server=.;Database=Parking"
      seedData:
        - entity: Vehicle
          values:
            - Id: 3fa85f64-5717-4562-b3fc-2c963f66afa6
"#;

    #[test]
    fn test_parse_minimal_document() {
        let schema = parse_schema(MINIMAL).unwrap();
        assert_eq!(schema.solution.name, "Parking");
        assert_eq!(schema.solution.output_path.as_deref(), Some("./out"));

        let project = &schema.solution.projects[0];
        assert_eq!(project.target_framework, "net8.0");
        assert_eq!(project.project_type.as_deref(), Some("webapi"));
        assert!(project.models[0].properties[0].is_primary_key);
        assert!(project.dtos.is_empty());
        assert_eq!(project.db_context_name(), "ParkingDbContext");
        assert_eq!(project.seed_data[0].values[0].len(), 1);
        validate_schema(&schema).unwrap();
    }

    #[test]
    fn test_aliases_are_accepted() {
        let yaml = MINIMAL
            .replace("models:", "entities:")
            .replace("dbContext:", "persistenceContext:")
            .replace("seedData:", "seeds:");
        let schema = parse_schema(&yaml).unwrap();
        let project = &schema.solution.projects[0];
        assert_eq!(project.models.len(), 1);
        assert!(project.db_context.is_some());
        assert_eq!(project.seed_data.len(), 1);
    }

    #[test]
    fn test_missing_context_fails_presence_check() {
        let yaml = MINIMAL.replace("dbContext:", "unused:");
        let schema = parse_schema(&yaml).unwrap();
        let err = validate_schema(&schema).unwrap_err();
        assert_eq!(err.to_string(), "missing required value: Parking.Api: dbContext");
    }

    #[test]
    fn test_blank_names_fail_presence_check() {
        let yaml = MINIMAL.replace("name: Parking\n", "name: \"\"\n");
        let schema = parse_schema(&yaml).unwrap();
        assert!(matches!(
            validate_schema(&schema),
            Err(ConfigError::Missing { what }) if what == "solution.name"
        ));
    }

    #[test]
    fn test_load_schema_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "solution: [not, a, mapping]").unwrap();

        let err = load_schema(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));

        let err = load_schema("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
