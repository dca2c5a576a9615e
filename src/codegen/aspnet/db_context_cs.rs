//! Persistence context generation (Data/<Context>.cs) including seed data.

use std::fmt::Write;

use indexmap::IndexMap;
use serde_yaml::Value;

use super::ProjectArtifacts;
use crate::codegen::literal::{format_literal, SemanticType};
use crate::codegen::types::{Entity, ProjectSpec, SeedSpec};
use crate::codegen::utils::pluralize;
use crate::error::{ConfigError, GenerationWarning, Result};

/// Generate the context class: one `DbSet` per entity and a `HasData` block
/// per seed entry.
///
/// A missing persistence-context descriptor is a configuration error, since
/// repositories and `Program.cs` both name the class.
pub fn generate_db_context(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    let context = project.db_context.as_ref().ok_or_else(|| ConfigError::Missing {
        what: format!("dbContext for project '{}'", project.name),
    })?;

    let mut output = String::new();

    writeln!(output, "using Microsoft.EntityFrameworkCore;")?;
    writeln!(output, "using {}.Models;", project.name)?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Data", project.name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public class {} : DbContext", context.name)?;
    writeln!(output, "    {{")?;
    writeln!(
        output,
        "        public {}(DbContextOptions<{}> options) : base(options) {{ }}",
        context.name, context.name
    )?;
    writeln!(output)?;

    for model in &project.models {
        writeln!(
            output,
            "        public DbSet<{}> {} {{ get; set; }}",
            model.name,
            pluralize(&model.name)
        )?;
    }
    writeln!(output)?;

    writeln!(output, "        protected override void OnModelCreating(ModelBuilder modelBuilder)")?;
    writeln!(output, "        {{")?;
    writeln!(output, "            base.OnModelCreating(modelBuilder);")?;

    for seed in &project.seed_data {
        match project.entity(&seed.entity) {
            Some(entity) => write_seed(&mut output, seed, entity, artifacts)?,
            None => {
                writeln!(
                    output,
                    "            // Seed data for entity '{}' not found in models",
                    seed.entity
                )?;
                artifacts.warn(GenerationWarning::UnknownSeedEntity {
                    entity: seed.entity.clone(),
                });
            }
        }
    }

    writeln!(output, "        }}")?;
    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    artifacts.push_file(format!("Data/{}.cs", context.name), output);
    Ok(())
}

fn write_seed(
    output: &mut String,
    seed: &SeedSpec,
    entity: &Entity,
    artifacts: &mut ProjectArtifacts,
) -> Result<()> {
    if seed.values.is_empty() {
        return Ok(());
    }

    let rows: Vec<String> = seed
        .values
        .iter()
        .map(|row| {
            format!(
                "                new {} {{ {} }}",
                entity.name,
                render_assignments(entity, row, artifacts)
            )
        })
        .collect();

    writeln!(output, "            modelBuilder.Entity<{}>().HasData(", entity.name)?;
    writeln!(output, "{}", rows.join(",\n"))?;
    writeln!(output, "            );")?;
    Ok(())
}

/// `Name = literal` pairs for one row, in document order
fn render_assignments(
    entity: &Entity,
    row: &IndexMap<String, Value>,
    artifacts: &mut ProjectArtifacts,
) -> String {
    let mut assignments = Vec::with_capacity(row.len());

    for (name, value) in row {
        let ty = match entity.property(name) {
            Some(prop) => SemanticType::parse(&prop.type_name),
            None => {
                artifacts.warn(GenerationWarning::UnknownSeedProperty {
                    entity: entity.name.clone(),
                    property: name.clone(),
                });
                SemanticType::Other(String::new())
            }
        };

        let literal = format_literal(&ty, value);
        if literal.fell_back {
            artifacts.warn(GenerationWarning::LiteralFallback {
                entity: entity.name.clone(),
                property: name.clone(),
                type_name: entity
                    .property(name)
                    .map(|p| p.type_name.clone())
                    .unwrap_or_default(),
                value: literal.text.clone(),
            });
        }
        assignments.push(format!("{} = {}", name, literal.text));
    }

    assignments.join(", ")
}
