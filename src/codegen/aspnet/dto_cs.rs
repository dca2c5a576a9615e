//! DTO and AutoMapper profile generation.

use std::fmt::Write;

use super::ProjectArtifacts;
use crate::codegen::types::{DtoSpec, ProjectSpec};
use crate::error::{ArtifactKind, GenerationWarning, Result};

/// Generate one flat DTO class per contract, plus the shared mapping profile.
pub fn generate_dtos(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    for dto in &project.dtos {
        let contents = render_dto(&project.name, dto)?;
        artifacts.push_file(format!("Models/DTOs/{}.cs", dto.name), contents);
    }

    let profile = render_mapping_profile(project, artifacts)?;
    artifacts.push_file("Mappings/AutoMapperProfile.cs", profile);

    Ok(())
}

fn render_dto(project_name: &str, dto: &DtoSpec) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "using System;")?;
    writeln!(output, "using System.ComponentModel.DataAnnotations;")?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Models.DTOs", project_name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public class {}", dto.name)?;
    writeln!(output, "    {{")?;

    for prop in &dto.properties {
        if prop.required {
            writeln!(output, "        [Required]")?;
        }
        if let Some(max_length) = prop.max_length {
            writeln!(output, "        [MaxLength({})]", max_length)?;
        }
        let nullable = if prop.nullable && !prop.type_name.ends_with('?') { "?" } else { "" };
        writeln!(
            output,
            "        public {}{} {} {{ get; set; }}",
            prop.type_name, nullable, prop.name
        )?;
        writeln!(output)?;
    }

    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

fn render_mapping_profile(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "using AutoMapper;")?;
    writeln!(output, "using {}.Models;", project.name)?;
    writeln!(output, "using {}.Models.DTOs;", project.name)?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Mappings", project.name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public class AutoMapperProfile : Profile")?;
    writeln!(output, "    {{")?;
    writeln!(output, "        public AutoMapperProfile()")?;
    writeln!(output, "        {{")?;

    for dto in &project.dtos {
        if project.entity(&dto.model).is_none() {
            writeln!(
                output,
                "            // Mapping for '{}' skipped: entity '{}' not found in models",
                dto.name, dto.model
            )?;
            artifacts.warn(GenerationWarning::UnknownEntity {
                artifact: ArtifactKind::Dto,
                name: dto.name.clone(),
                entity: dto.model.clone(),
            });
            continue;
        }
        writeln!(output, "            CreateMap<{}, {}>();", dto.model, dto.name)?;
        writeln!(output, "            CreateMap<{}, {}>();", dto.name, dto.model)?;
    }

    writeln!(output, "        }}")?;
    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::codegen::types::Property;

    fn project_with_dtos() -> ProjectSpec {
        let mut project = parking_project();
        project.dtos = vec![
            DtoSpec {
                name: "VehicleDto".to_string(),
                model: "Vehicle".to_string(),
                properties: vec![
                    field("Id", "Guid"),
                    Property {
                        nullable: true,
                        max_length: Some(10),
                        ..field("PlateNumber", "string")
                    },
                ],
            },
            DtoSpec {
                name: "GhostDto".to_string(),
                model: "Ghost".to_string(),
                properties: vec![],
            },
        ];
        project
    }

    #[test]
    fn test_dto_is_flat_and_nullable_aware() {
        let mut artifacts = ProjectArtifacts::default();
        generate_dtos(&project_with_dtos(), &mut artifacts).unwrap();

        let dto = &artifacts.file("Models/DTOs/VehicleDto.cs").unwrap().contents;
        assert!(dto.contains("namespace Parking.Api.Models.DTOs"));
        assert!(dto.contains("public Guid Id { get; set; }"));
        assert!(dto.contains("[MaxLength(10)]\n        public string? PlateNumber { get; set; }"));
        assert!(!dto.contains("ICollection"));
    }

    #[test]
    fn test_mapping_profile_is_bidirectional() {
        let mut artifacts = ProjectArtifacts::default();
        generate_dtos(&project_with_dtos(), &mut artifacts).unwrap();

        let profile = &artifacts.file("Mappings/AutoMapperProfile.cs").unwrap().contents;
        assert!(profile.contains("CreateMap<Vehicle, VehicleDto>();"));
        assert!(profile.contains("CreateMap<VehicleDto, Vehicle>();"));
        assert!(profile.contains("// Mapping for 'GhostDto' skipped: entity 'Ghost' not found in models"));
        assert!(!profile.contains("CreateMap<Ghost"));
        assert_eq!(
            artifacts.warnings,
            vec![GenerationWarning::UnknownEntity {
                artifact: ArtifactKind::Dto,
                name: "GhostDto".to_string(),
                entity: "Ghost".to_string(),
            }]
        );
    }
}
