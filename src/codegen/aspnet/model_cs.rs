//! Entity class generation (Models/<Entity>.cs).

use std::collections::HashSet;
use std::fmt::Write;

use super::ProjectArtifacts;
use crate::codegen::relationships::{RelationshipInfo, Relationships};
use crate::codegen::types::{Entity, ProjectSpec};
use crate::codegen::utils::pluralize;
use crate::error::{GenerationWarning, Result};

/// Navigation properties an entity will expose
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPlan {
    /// Single-valued navigations, named after (and typed as) the target entity
    pub single: Vec<String>,
    /// Collection navigations as (element type, property name)
    pub collections: Vec<(String, String)>,
    /// Navigation names dropped because the name was already taken
    pub skipped: Vec<String>,
}

/// Decide which navigation properties an entity gets.
///
/// Names must be unique within the class and differ from the class name, so a
/// navigation whose name collides with the entity itself, a scalar property or
/// an earlier navigation is skipped. The repository
/// generator relies on the same plan for its `Include` calls.
pub fn plan_navigations(entity: &Entity, info: &RelationshipInfo) -> NavigationPlan {
    let mut taken: HashSet<&str> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    taken.insert(entity.name.as_str());
    let mut plan = NavigationPlan::default();

    for assoc in &info.outgoing {
        if taken.insert(assoc.target.as_str()) {
            plan.single.push(assoc.target.clone());
        } else {
            plan.skipped.push(assoc.target.clone());
        }
    }

    let mut collection_names = HashSet::new();
    for assoc in &info.incoming {
        let name = pluralize(&assoc.source);
        if !taken.contains(name.as_str()) && collection_names.insert(name.clone()) {
            plan.collections.push((assoc.source.clone(), name));
        } else {
            plan.skipped.push(name);
        }
    }

    plan
}

/// Generate one entity class per model.
///
/// Scalar properties come first, annotated from their flags, followed by one
/// navigation per outgoing and per incoming association.
pub fn generate_models(
    project: &ProjectSpec,
    relationships: &Relationships,
    artifacts: &mut ProjectArtifacts,
) -> Result<()> {
    for model in &project.models {
        let contents = render_model(project, model, relationships, artifacts)?;
        artifacts.push_file(format!("Models/{}.cs", model.name), contents);
    }
    Ok(())
}

fn render_model(
    project: &ProjectSpec,
    model: &Entity,
    relationships: &Relationships,
    artifacts: &mut ProjectArtifacts,
) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "using System;")?;
    writeln!(output, "using System.Collections.Generic;")?;
    writeln!(output, "using System.ComponentModel.DataAnnotations;")?;
    writeln!(output, "using System.ComponentModel.DataAnnotations.Schema;")?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Models", project.name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public class {}", model.name)?;
    writeln!(output, "    {{")?;

    for prop in &model.properties {
        if prop.is_primary_key {
            writeln!(output, "        [Key]")?;
        }
        if let Some(target) = prop.reference_target() {
            writeln!(output, "        [ForeignKey(\"{}\")]", target)?;
            if !relationships.contains(target) {
                artifacts.warn(GenerationWarning::DanglingForeignKey {
                    entity: model.name.clone(),
                    property: prop.name.clone(),
                    target: target.to_string(),
                });
            }
        }
        if prop.required {
            writeln!(output, "        [Required]")?;
        }
        if let Some(max_length) = prop.max_length {
            writeln!(output, "        [MaxLength({})]", max_length)?;
        }
        writeln!(output, "        public {} {} {{ get; set; }}", prop.type_name, prop.name)?;
        writeln!(output)?;
    }

    let plan = plan_navigations(model, relationships.get(&model.name));

    for target in &plan.single {
        writeln!(output, "        public {} {} {{ get; set; }}", target, target)?;
    }

    for (element, name) in &plan.collections {
        writeln!(
            output,
            "        public ICollection<{}> {} {{ get; set; }} = new List<{}>();",
            element, name, element
        )?;
    }

    for name in &plan.skipped {
        writeln!(output, "        // Navigation '{}' skipped: name already in use", name)?;
        artifacts.warn(GenerationWarning::DuplicateNavigation {
            entity: model.name.clone(),
            navigation: name.clone(),
        });
    }

    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn render(project: &ProjectSpec) -> ProjectArtifacts {
        let relationships = Relationships::resolve(&project.models);
        let mut artifacts = ProjectArtifacts::default();
        generate_models(project, &relationships, &mut artifacts).unwrap();
        artifacts
    }

    #[test]
    fn test_annotations_follow_flags() {
        let artifacts = render(&parking_project());
        let vehicle = &artifacts.file("Models/Vehicle.cs").unwrap().contents;

        assert!(vehicle.contains("namespace Parking.Api.Models"));
        assert!(vehicle.contains("        [Key]\n        public Guid Id { get; set; }"));
        assert!(vehicle.contains(
            "        [Required]\n        [MaxLength(10)]\n        public string PlateNumber { get; set; }"
        ));
    }

    #[test]
    fn test_navigation_properties_both_sides() {
        let artifacts = render(&parking_project());
        let vehicle = &artifacts.file("Models/Vehicle.cs").unwrap().contents;
        let slot = &artifacts.file("Models/ParkingSlot.cs").unwrap().contents;

        assert!(vehicle.contains("public ICollection<ParkingSlot> ParkingSlots { get; set; }"));
        assert!(slot.contains("[ForeignKey(\"Vehicle\")]"));
        assert!(slot.contains("public Guid VehicleId { get; set; }"));
        assert!(slot.contains("public Vehicle Vehicle { get; set; }"));
        assert!(artifacts.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_navigation_is_skipped_and_reported() {
        let mut project = parking_project();
        project.models[1]
            .properties
            .push(fk("OwnerVehicleId", "Vehicle"));

        let artifacts = render(&project);
        let slot = &artifacts.file("Models/ParkingSlot.cs").unwrap().contents;
        let vehicle = &artifacts.file("Models/Vehicle.cs").unwrap().contents;

        assert_eq!(slot.matches("public Vehicle Vehicle").count(), 1);
        assert!(slot.contains("// Navigation 'Vehicle' skipped"));
        assert_eq!(vehicle.matches("ICollection<ParkingSlot>").count(), 1);
        assert_eq!(artifacts.warnings.len(), 2);
    }

    #[test]
    fn test_dangling_foreign_key_is_reported() {
        let mut project = parking_project();
        project.models[1].properties.push(fk("LotId", "Lot"));

        let artifacts = render(&project);
        let slot = &artifacts.file("Models/ParkingSlot.cs").unwrap().contents;

        assert!(slot.contains("public Lot Lot { get; set; }"));
        assert!(artifacts.warnings.contains(&GenerationWarning::DanglingForeignKey {
            entity: "ParkingSlot".to_string(),
            property: "LotId".to_string(),
            target: "Lot".to_string(),
        }));
    }

    #[test]
    fn test_plan_navigations_avoids_scalar_names() {
        let project = parking_project();
        let mut slot = project.models[1].clone();
        slot.properties.push(field("Vehicle", "string"));
        let relationships = Relationships::resolve(&[project.models[0].clone(), slot.clone()]);

        let plan = plan_navigations(&slot, relationships.get("ParkingSlot"));
        assert!(plan.single.is_empty());
        assert_eq!(plan.skipped, vec!["Vehicle".to_string()]);
    }

    #[test]
    fn test_self_reference_keeps_class_valid() {
        let mut project = parking_project();
        project.models.push(Entity {
            name: "Employee".to_string(),
            properties: vec![key("Id"), fk("ManagerId", "Employee")],
        });

        let artifacts = render(&project);
        let employee = &artifacts.file("Models/Employee.cs").unwrap().contents;

        assert!(!employee.contains("public Employee Employee"));
        assert!(employee.contains("// Navigation 'Employee' skipped"));
        assert!(employee.contains("public ICollection<Employee> Employees { get; set; }"));
        assert!(artifacts.warnings.contains(&GenerationWarning::DuplicateNavigation {
            entity: "Employee".to_string(),
            navigation: "Employee".to_string(),
        }));
    }
}
