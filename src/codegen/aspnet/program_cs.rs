//! Host bootstrap generation (Program.cs).

use std::fmt::Write;

use super::ProjectArtifacts;
use crate::codegen::types::{Feature, ProjectSpec};
use crate::codegen::utils::implementation_name;
use crate::error::Result;

/// Generate `Program.cs` with service registrations gated by feature flags.
///
/// Repository registrations pair each interface with the implementation name
/// produced by [`implementation_name`], the same name the repository
/// generator declares.
pub fn generate_program(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    let swagger = project.has_feature(Feature::Swagger);
    let automapper = project.has_feature(Feature::AutoMapper);
    let mut output = String::new();

    writeln!(output, "using Microsoft.EntityFrameworkCore;")?;
    if swagger {
        writeln!(output, "using Microsoft.OpenApi.Models;")?;
    }
    writeln!(output, "using {}.Data;", project.name)?;
    writeln!(output, "using {}.Repositories;", project.name)?;
    if automapper {
        writeln!(output, "using {}.Mappings;", project.name)?;
    }
    writeln!(output)?;
    writeln!(output, "var builder = WebApplication.CreateBuilder(args);")?;
    writeln!(output)?;
    writeln!(output, "// Add services to the container")?;
    writeln!(output, "builder.Services.AddControllers();")?;
    writeln!(output, "builder.Services.AddEndpointsApiExplorer();")?;

    if swagger {
        writeln!(output, "builder.Services.AddSwaggerGen(c =>")?;
        writeln!(output, "{{")?;
        writeln!(
            output,
            "    c.SwaggerDoc(\"v1\", new OpenApiInfo {{ Title = \"{}\", Version = \"v1\" }});",
            project.name
        )?;
        writeln!(output, "}});")?;
    }

    if project.has_feature(Feature::EntityFramework) {
        writeln!(output, "builder.Services.AddDbContext<{}>(options =>", project.db_context_name())?;
        writeln!(
            output,
            "    options.UseSqlServer(builder.Configuration.GetConnectionString(\"DefaultConnection\")));"
        )?;
    }

    for repo in &project.repositories {
        let implementation = implementation_name(&repo.name);
        writeln!(
            output,
            "builder.Services.AddScoped<{}, {}>();",
            repo.name, implementation.name
        )?;
    }

    if automapper {
        writeln!(output, "builder.Services.AddAutoMapper(typeof(AutoMapperProfile));")?;
    }

    if project.has_feature(Feature::Logging) {
        writeln!(output, "builder.Services.AddLogging(logging =>")?;
        writeln!(output, "{{")?;
        writeln!(output, "    logging.AddConsole();")?;
        writeln!(output, "    logging.AddDebug();")?;
        writeln!(output, "}});")?;
    }

    writeln!(output)?;
    writeln!(output, "var app = builder.Build();")?;
    writeln!(output)?;
    writeln!(output, "// Configure the HTTP request pipeline")?;
    writeln!(output, "if (app.Environment.IsDevelopment())")?;
    writeln!(output, "{{")?;
    if swagger {
        writeln!(output, "    app.UseSwagger();")?;
        writeln!(output, "    app.UseSwaggerUI();")?;
    }
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "app.UseHttpsRedirection();")?;
    writeln!(output, "app.UseAuthorization();")?;
    writeln!(output, "app.MapControllers();")?;
    writeln!(output)?;
    writeln!(output, "app.Run();")?;

    artifacts.push_file("Program.cs", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::parking_project;
    use super::*;
    use crate::codegen::types::{PersistenceContextSpec, RepositorySpec};

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
                operations: vec![],
            },
            RepositorySpec {
                name: "SlotStore".to_string(),
                model: "ParkingSlot".to_string(),
                operations: vec![],
            },
        ];
        project
    }

    fn render(project: &ProjectSpec) -> String {
        let mut artifacts = ProjectArtifacts::default();
        generate_program(project, &mut artifacts).unwrap();
        artifacts.files.remove(0).contents
    }

    #[test]
    fn test_registrations_use_shared_naming() {
        let program = render(&project());

        assert!(program.contains("builder.Services.AddScoped<IVehicleRepository, VehicleRepository>();"));
        assert!(program.contains("builder.Services.AddScoped<SlotStore, SlotStoreImpl>();"));
    }

    #[test]
    fn test_all_features_enabled() {
        let program = render(&project());

        assert!(program.contains("c.SwaggerDoc(\"v1\", new OpenApiInfo { Title = \"Parking.Api\", Version = \"v1\" });"));
        assert!(program.contains("builder.Services.AddDbContext<ParkingDbContext>(options =>"));
        assert!(program.contains("builder.Services.AddAutoMapper(typeof(AutoMapperProfile));"));
        assert!(program.contains("    logging.AddConsole();"));
        assert!(program.contains("    app.UseSwaggerUI();"));
        assert!(program.contains("using Microsoft.OpenApi.Models;"));
        assert!(program.contains("using Parking.Api.Mappings;"));
        assert!(program.ends_with("app.Run();\n"));
    }

    #[test]
    fn test_features_gate_registrations() {
        let mut project = project();
        project.features = vec!["entityframework".to_string()];
        let program = render(&project);

        assert!(program.contains("AddDbContext<ParkingDbContext>"));
        assert!(!program.contains("AddSwaggerGen"));
        assert!(!program.contains("UseSwagger"));
        assert!(!program.contains("AddAutoMapper"));
        assert!(!program.contains("AddLogging"));
        assert!(!program.contains("using Microsoft.OpenApi.Models;"));
        assert!(!program.contains("using Parking.Api.Mappings;"));
        assert!(program.contains("using Parking.Api.Repositories;"));
        assert!(program.contains("AddScoped<IVehicleRepository, VehicleRepository>"));
    }
}
