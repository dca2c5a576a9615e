//! Repository interface and EF Core implementation generation.

use std::fmt::Write;

use super::{plan_navigations, KeyInfo, ProjectArtifacts};
use crate::codegen::relationships::Relationships;
use crate::codegen::types::{CrudOperation, ProjectSpec, RepositorySpec};
use crate::codegen::utils::{implementation_name, pluralize};
use crate::error::{ArtifactKind, GenerationWarning, Result};

/// Generate `Repositories/<IName>.cs` and `Repositories/<Name>.cs` per repository.
///
/// The interface always carries the five CRUD members; the operation list is
/// only checked against the vocabulary.
pub fn generate_repositories(
    project: &ProjectSpec,
    relationships: &Relationships,
    artifacts: &mut ProjectArtifacts,
) -> Result<()> {
    for repo in &project.repositories {
        let entity = project.entity(&repo.model);
        if entity.is_none() {
            artifacts.warn(GenerationWarning::UnknownEntity {
                artifact: ArtifactKind::Repository,
                name: repo.name.clone(),
                entity: repo.model.clone(),
            });
        }

        for op in &repo.operations {
            if CrudOperation::parse(op).is_none() {
                artifacts.warn(GenerationWarning::UnsupportedOperation {
                    artifact: ArtifactKind::Repository,
                    name: repo.name.clone(),
                    operation: op.clone(),
                });
            }
        }

        let implementation = implementation_name(&repo.name);
        if !implementation.had_prefix {
            artifacts.warn(GenerationWarning::MissingInterfacePrefix {
                name: repo.name.clone(),
            });
        }

        let key = KeyInfo::of(entity);
        let includes = match entity {
            Some(e) => plan_navigations(e, relationships.get(&e.name)).single,
            None => Vec::new(),
        };

        let interface = render_interface(&project.name, repo, &key)?;
        artifacts.push_file(format!("Repositories/{}.cs", repo.name), interface);

        let class = render_implementation(project, repo, &implementation.name, &key, &includes)?;
        artifacts.push_file(format!("Repositories/{}.cs", implementation.name), class);
    }
    Ok(())
}

fn render_interface(project_name: &str, repo: &RepositorySpec, key: &KeyInfo) -> Result<String> {
    let mut output = String::new();
    let model = &repo.model;
    let param = key.param();

    writeln!(output, "using System;")?;
    writeln!(output, "using System.Collections.Generic;")?;
    writeln!(output, "using System.Threading.Tasks;")?;
    writeln!(output, "using {}.Models;", project_name)?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Repositories", project_name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public interface {}", repo.name)?;
    writeln!(output, "    {{")?;
    writeln!(output, "        Task<IEnumerable<{}>> GetAllAsync();", model)?;
    writeln!(output, "        Task<{}?> GetByIdAsync({} {});", model, key.type_name, param)?;
    writeln!(output, "        Task<{}> CreateAsync({} entity);", model, model)?;
    writeln!(
        output,
        "        Task<{}?> UpdateAsync({} {}, {} entity);",
        model, key.type_name, param, model
    )?;
    writeln!(output, "        Task<bool> DeleteAsync({} {});", key.type_name, param)?;
    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

fn render_implementation(
    project: &ProjectSpec,
    repo: &RepositorySpec,
    class_name: &str,
    key: &KeyInfo,
    includes: &[String],
) -> Result<String> {
    let mut output = String::new();
    let context = project.db_context_name();

    writeln!(output, "using System;")?;
    writeln!(output, "using System.Collections.Generic;")?;
    writeln!(output, "using System.Linq;")?;
    writeln!(output, "using System.Threading.Tasks;")?;
    writeln!(output, "using Microsoft.EntityFrameworkCore;")?;
    writeln!(output, "using {}.Models;", project.name)?;
    writeln!(output, "using {}.Data;", project.name)?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Repositories", project.name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    public class {} : {}", class_name, repo.name)?;
    writeln!(output, "    {{")?;
    writeln!(output, "        private readonly {} _context;", context)?;
    writeln!(output)?;
    writeln!(output, "        public {}({} context)", class_name, context)?;
    writeln!(output, "        {{")?;
    writeln!(output, "            _context = context;")?;
    writeln!(output, "        }}")?;
    writeln!(output)?;

    write_methods(&mut output, &repo.model, key, includes)?;

    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

fn write_methods(output: &mut String, model: &str, key: &KeyInfo, includes: &[String]) -> Result<()> {
    let set = pluralize(model);
    let param = key.param();
    let key_type = &key.type_name;

    // GetAllAsync
    writeln!(output, "        public async Task<IEnumerable<{}>> GetAllAsync()", model)?;
    writeln!(output, "        {{")?;
    if includes.is_empty() {
        writeln!(output, "            return await _context.{}.ToListAsync();", set)?;
    } else {
        writeln!(output, "            return await _context.{}", set)?;
        write_includes(output, includes)?;
        writeln!(output, "                .ToListAsync();")?;
    }
    writeln!(output, "        }}")?;
    writeln!(output)?;

    // GetByIdAsync
    writeln!(output, "        public async Task<{}?> GetByIdAsync({} {})", model, key_type, param)?;
    writeln!(output, "        {{")?;
    if includes.is_empty() {
        writeln!(output, "            return await _context.{}.FindAsync({});", set, param)?;
    } else {
        writeln!(output, "            return await _context.{}", set)?;
        write_includes(output, includes)?;
        writeln!(
            output,
            "                .FirstOrDefaultAsync(e => e.{} == {});",
            key.property, param
        )?;
    }
    writeln!(output, "        }}")?;
    writeln!(output)?;

    // CreateAsync
    writeln!(output, "        public async Task<{}> CreateAsync({} entity)", model, model)?;
    writeln!(output, "        {{")?;
    writeln!(output, "            await _context.{}.AddAsync(entity);", set)?;
    writeln!(output, "            await _context.SaveChangesAsync();")?;
    writeln!(output, "            return entity;")?;
    writeln!(output, "        }}")?;
    writeln!(output)?;

    // UpdateAsync
    writeln!(
        output,
        "        public async Task<{}?> UpdateAsync({} {}, {} entity)",
        model, key_type, param, model
    )?;
    writeln!(output, "        {{")?;
    writeln!(output, "            var existingEntity = await GetByIdAsync({});", param)?;
    writeln!(output, "            if (existingEntity == null)")?;
    writeln!(output, "                return null;")?;
    writeln!(output)?;
    writeln!(output, "            _context.Entry(existingEntity).CurrentValues.SetValues(entity);")?;
    writeln!(output, "            await _context.SaveChangesAsync();")?;
    writeln!(output, "            return existingEntity;")?;
    writeln!(output, "        }}")?;
    writeln!(output)?;

    // DeleteAsync
    writeln!(output, "        public async Task<bool> DeleteAsync({} {})", key_type, param)?;
    writeln!(output, "        {{")?;
    writeln!(output, "            var entity = await GetByIdAsync({});", param)?;
    writeln!(output, "            if (entity == null)")?;
    writeln!(output, "                return false;")?;
    writeln!(output)?;
    writeln!(output, "            _context.{}.Remove(entity);", set)?;
    writeln!(output, "            await _context.SaveChangesAsync();")?;
    writeln!(output, "            return true;")?;
    writeln!(output, "        }}")?;

    Ok(())
}

fn write_includes(output: &mut String, includes: &[String]) -> Result<()> {
    for nav in includes {
        writeln!(output, "                .Include(e => e.{})", nav)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::codegen::types::PersistenceContextSpec;

    fn project() -> ProjectSpec {
        let mut project = parking_project();
        project.db_context = Some(PersistenceContextSpec {
            name: "ParkingDbContext".to_string(),
            connection_string: String::new(),
        });
        project.repositories = vec![
            RepositorySpec {
                name: "IVehicleRepository".to_string(),
                model: "Vehicle".to_string(),
                operations: vec!["getAll".to_string(), "getById".to_string()],
            },
            RepositorySpec {
                name: "IParkingSlotRepository".to_string(),
                model: "ParkingSlot".to_string(),
                operations: vec!["getAll".to_string(), "archive".to_string()],
            },
        ];
        project
    }

    fn render(project: &ProjectSpec) -> ProjectArtifacts {
        let relationships = Relationships::resolve(&project.models);
        let mut artifacts = ProjectArtifacts::default();
        generate_repositories(project, &relationships, &mut artifacts).unwrap();
        artifacts
    }

    #[test]
    fn test_interface_has_five_members() {
        let artifacts = render(&project());
        let interface = &artifacts.file("Repositories/IVehicleRepository.cs").unwrap().contents;

        assert!(interface.contains("public interface IVehicleRepository"));
        assert!(interface.contains("Task<IEnumerable<Vehicle>> GetAllAsync();"));
        assert!(interface.contains("Task<Vehicle?> GetByIdAsync(Guid id);"));
        assert!(interface.contains("Task<Vehicle> CreateAsync(Vehicle entity);"));
        assert!(interface.contains("Task<Vehicle?> UpdateAsync(Guid id, Vehicle entity);"));
        assert!(interface.contains("Task<bool> DeleteAsync(Guid id);"));
    }

    #[test]
    fn test_implementation_name_is_stripped_interface() {
        let artifacts = render(&project());
        let class = &artifacts.file("Repositories/VehicleRepository.cs").unwrap().contents;

        assert!(class.contains("public class VehicleRepository : IVehicleRepository"));
        assert!(class.contains("public VehicleRepository(ParkingDbContext context)"));
    }

    #[test]
    fn test_plain_fetch_without_navigations() {
        let artifacts = render(&project());
        let class = &artifacts.file("Repositories/VehicleRepository.cs").unwrap().contents;

        assert!(class.contains("return await _context.Vehicles.ToListAsync();"));
        assert!(class.contains("return await _context.Vehicles.FindAsync(id);"));
        assert!(!class.contains(".Include("));
    }

    #[test]
    fn test_includes_outgoing_navigations() {
        let artifacts = render(&project());
        let class = &artifacts.file("Repositories/ParkingSlotRepository.cs").unwrap().contents;

        assert_eq!(class.matches(".Include(e => e.Vehicle)").count(), 2);
        assert!(class.contains(".FirstOrDefaultAsync(e => e.Id == id);"));
        assert!(class.contains("if (existingEntity == null)\n                return null;"));
        assert!(class.contains("if (entity == null)\n                return false;"));
    }

    #[test]
    fn test_unknown_operation_and_entity_are_reported() {
        let mut project = project();
        project.repositories.push(RepositorySpec {
            name: "GhostStore".to_string(),
            model: "Ghost".to_string(),
            operations: vec![],
        });

        let artifacts = render(&project);
        assert!(artifacts.warnings.contains(&GenerationWarning::UnsupportedOperation {
            artifact: ArtifactKind::Repository,
            name: "IParkingSlotRepository".to_string(),
            operation: "archive".to_string(),
        }));
        assert!(artifacts.warnings.contains(&GenerationWarning::UnknownEntity {
            artifact: ArtifactKind::Repository,
            name: "GhostStore".to_string(),
            entity: "Ghost".to_string(),
        }));
        assert!(artifacts.warnings.contains(&GenerationWarning::MissingInterfacePrefix {
            name: "GhostStore".to_string(),
        }));
        assert!(artifacts.file("Repositories/GhostStore.cs").is_some());
        assert!(artifacts.file("Repositories/GhostStoreImpl.cs").is_some());
    }
}
