//! API controller generation (Controllers/<Name>.cs).

use std::fmt::Write;

use super::{KeyInfo, ProjectArtifacts};
use crate::codegen::types::{CrudOperation, HandlerSpec, ProjectSpec};
use crate::codegen::utils::repository_interface_for;
use crate::error::{ArtifactKind, GenerationWarning, Result};

/// Generate one controller per handler spec.
///
/// Routines are emitted in operation-list order; names outside the CRUD
/// vocabulary become a placeholder comment and a warning.
pub fn generate_controllers(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    for controller in &project.controllers {
        let contents = render_controller(project, controller, artifacts)?;
        artifacts.push_file(format!("Controllers/{}.cs", controller.name), contents);
    }
    Ok(())
}

/// Repository interface a controller depends on.
///
/// Prefers the declared repository serving the same entity so a renamed
/// repository propagates here; otherwise falls back to the conventional name.
fn repository_interface(
    project: &ProjectSpec,
    controller: &HandlerSpec,
    artifacts: &mut ProjectArtifacts,
) -> String {
    match project.repository_for(&controller.model) {
        Some(repo) => repo.name.clone(),
        None => {
            artifacts.warn(GenerationWarning::MissingRepository {
                handler: controller.name.clone(),
                entity: controller.model.clone(),
            });
            repository_interface_for(&controller.model)
        }
    }
}

fn render_controller(
    project: &ProjectSpec,
    controller: &HandlerSpec,
    artifacts: &mut ProjectArtifacts,
) -> Result<String> {
    let entity = project.entity(&controller.model);
    if entity.is_none() {
        artifacts.warn(GenerationWarning::UnknownEntity {
            artifact: ArtifactKind::Controller,
            name: controller.name.clone(),
            entity: controller.model.clone(),
        });
    }
    let key = KeyInfo::of(entity);
    let repository = repository_interface(project, controller, artifacts);

    let mut output = String::new();

    writeln!(output, "using Microsoft.AspNetCore.Mvc;")?;
    writeln!(output, "using System;")?;
    writeln!(output, "using System.Collections.Generic;")?;
    writeln!(output, "using System.Threading.Tasks;")?;
    writeln!(output, "using {}.Repositories;", project.name)?;
    writeln!(output, "using {}.Models;", project.name)?;
    writeln!(output, "using {}.Models.DTOs;", project.name)?;
    writeln!(output, "using AutoMapper;")?;
    writeln!(output)?;
    writeln!(output, "namespace {}.Controllers", project.name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    [ApiController]")?;
    writeln!(output, "    [Route(\"api/[controller]\")]")?;
    writeln!(output, "    public class {} : ControllerBase", controller.name)?;
    writeln!(output, "    {{")?;
    writeln!(output, "        private readonly {} _repository;", repository)?;
    writeln!(output, "        private readonly IMapper _mapper;")?;
    writeln!(output)?;
    writeln!(
        output,
        "        public {}({} repository, IMapper mapper)",
        controller.name, repository
    )?;
    writeln!(output, "        {{")?;
    writeln!(output, "            _repository = repository;")?;
    writeln!(output, "            _mapper = mapper;")?;
    writeln!(output, "        }}")?;
    writeln!(output)?;

    for operation in &controller.operations {
        match CrudOperation::parse(operation) {
            Some(op) => write_operation(&mut output, op, controller, &key)?,
            None => {
                writeln!(output, "        // Operation '{}' not supported.", operation)?;
                writeln!(output)?;
                artifacts.warn(GenerationWarning::UnsupportedOperation {
                    artifact: ArtifactKind::Controller,
                    name: controller.name.clone(),
                    operation: operation.clone(),
                });
            }
        }
    }

    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    Ok(output)
}

fn write_operation(
    output: &mut String,
    op: CrudOperation,
    controller: &HandlerSpec,
    key: &KeyInfo,
) -> Result<()> {
    let param = key.param();
    let route = key.route();

    match op {
        CrudOperation::GetAll => {
            writeln!(output, "        [HttpGet]")?;
            writeln!(output, "        public async Task<IActionResult> GetAll()")?;
            writeln!(output, "        {{")?;
            writeln!(output, "            var entities = await _repository.GetAllAsync();")?;
            writeln!(
                output,
                "            return Ok(_mapper.Map<IEnumerable<{}>>(entities));",
                controller.dto
            )?;
            writeln!(output, "        }}")?;
        }
        CrudOperation::GetById => {
            writeln!(output, "        [HttpGet(\"{}\")]", route)?;
            writeln!(
                output,
                "        public async Task<IActionResult> GetById({} {})",
                key.type_name, param
            )?;
            writeln!(output, "        {{")?;
            writeln!(output, "            var entity = await _repository.GetByIdAsync({});", param)?;
            writeln!(output, "            if (entity == null)")?;
            writeln!(output, "                return NotFound();")?;
            writeln!(output)?;
            writeln!(output, "            return Ok(_mapper.Map<{}>(entity));", controller.dto)?;
            writeln!(output, "        }}")?;
        }
        CrudOperation::Create => {
            writeln!(output, "        [HttpPost]")?;
            writeln!(
                output,
                "        public async Task<IActionResult> Create([FromBody] {} dto)",
                controller.create_dto
            )?;
            writeln!(output, "        {{")?;
            writeln!(output, "            if (!ModelState.IsValid)")?;
            writeln!(output, "                return BadRequest(ModelState);")?;
            writeln!(output)?;
            writeln!(output, "            var entity = _mapper.Map<{}>(dto);", controller.model)?;
            writeln!(output, "            entity = await _repository.CreateAsync(entity);")?;
            writeln!(
                output,
                "            return CreatedAtAction(nameof(GetById), new {{ {} = entity.{} }}, _mapper.Map<{}>(entity));",
                param, key.property, controller.dto
            )?;
            writeln!(output, "        }}")?;
        }
        CrudOperation::Update => {
            writeln!(output, "        [HttpPut(\"{}\")]", route)?;
            writeln!(
                output,
                "        public async Task<IActionResult> Update({} {}, [FromBody] {} dto)",
                key.type_name, param, controller.update_dto
            )?;
            writeln!(output, "        {{")?;
            writeln!(output, "            if (!ModelState.IsValid)")?;
            writeln!(output, "                return BadRequest(ModelState);")?;
            writeln!(output)?;
            writeln!(output, "            var entity = _mapper.Map<{}>(dto);", controller.model)?;
            writeln!(output, "            var updated = await _repository.UpdateAsync({}, entity);", param)?;
            writeln!(output, "            if (updated == null)")?;
            writeln!(output, "                return NotFound();")?;
            writeln!(output)?;
            writeln!(output, "            return Ok(_mapper.Map<{}>(updated));", controller.dto)?;
            writeln!(output, "        }}")?;
        }
        CrudOperation::Delete => {
            writeln!(output, "        [HttpDelete(\"{}\")]", route)?;
            writeln!(
                output,
                "        public async Task<IActionResult> Delete({} {})",
                key.type_name, param
            )?;
            writeln!(output, "        {{")?;
            writeln!(output, "            var success = await _repository.DeleteAsync({});", param)?;
            writeln!(output, "            if (!success)")?;
            writeln!(output, "                return NotFound();")?;
            writeln!(output)?;
            writeln!(output, "            return NoContent();")?;
            writeln!(output, "        }}")?;
        }
    }
    writeln!(output)?;

    Ok(())
}
