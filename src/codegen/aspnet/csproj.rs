//! Project descriptor generation (<Project>.csproj).

use std::fmt::Write;

use super::ProjectArtifacts;
use crate::codegen::types::{Feature, ProjectSpec};
use crate::error::Result;

/// NuGet packages pulled in by each feature flag, as (package, version)
const FEATURE_PACKAGES: &[(Feature, &[(&str, &str)])] = &[
    (
        Feature::EntityFramework,
        &[
            ("Microsoft.EntityFrameworkCore", "8.0.0"),
            ("Microsoft.EntityFrameworkCore.SqlServer", "8.0.0"),
            ("Microsoft.EntityFrameworkCore.Design", "8.0.0"),
        ],
    ),
    (
        Feature::AutoMapper,
        &[("AutoMapper.Extensions.Microsoft.DependencyInjection", "12.0.1")],
    ),
    (Feature::Swagger, &[("Swashbuckle.AspNetCore", "6.5.0")]),
];

/// Generate `<Project>.csproj` referencing the packages of enabled features.
pub fn generate_csproj(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    let mut output = String::new();

    writeln!(output, "<Project Sdk=\"Microsoft.NET.Sdk.Web\">")?;
    writeln!(output)?;
    writeln!(output, "  <PropertyGroup>")?;
    writeln!(output, "    <TargetFramework>{}</TargetFramework>", project.target_framework)?;
    writeln!(output, "    <Nullable>enable</Nullable>")?;
    writeln!(output, "    <ImplicitUsings>enable</ImplicitUsings>")?;
    writeln!(output, "  </PropertyGroup>")?;

    let packages: Vec<&(&str, &str)> = FEATURE_PACKAGES
        .iter()
        .filter(|(feature, _)| project.has_feature(*feature))
        .flat_map(|(_, packages)| packages.iter())
        .collect();

    if !packages.is_empty() {
        writeln!(output)?;
        writeln!(output, "  <ItemGroup>")?;
        for (package, version) in packages {
            writeln!(
                output,
                "    <PackageReference Include=\"{}\" Version=\"{}\" />",
                package, version
            )?;
        }
        writeln!(output, "  </ItemGroup>")?;
    }

    writeln!(output)?;
    writeln!(output, "</Project>")?;

    artifacts.push_file(format!("{}.csproj", project.name), output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::parking_project;
    use super::*;

    #[test]
    fn test_all_features_reference_all_packages() {
        let mut artifacts = ProjectArtifacts::default();
        generate_csproj(&parking_project(), &mut artifacts).unwrap();

        let csproj = &artifacts.file("Parking.Api.csproj").unwrap().contents;
        assert!(csproj.starts_with("<Project Sdk=\"Microsoft.NET.Sdk.Web\">"));
        assert!(csproj.contains("<TargetFramework>net8.0</TargetFramework>"));
        assert!(csproj.contains("Include=\"Microsoft.EntityFrameworkCore.Design\""));
        assert!(csproj.contains("Include=\"AutoMapper.Extensions.Microsoft.DependencyInjection\""));
        assert!(csproj.contains("Include=\"Swashbuckle.AspNetCore\""));
    }

    #[test]
    fn test_packages_follow_features() {
        let mut project = parking_project();
        project.features = vec!["swagger".to_string()];

        let mut artifacts = ProjectArtifacts::default();
        generate_csproj(&project, &mut artifacts).unwrap();

        let csproj = &artifacts.file("Parking.Api.csproj").unwrap().contents;
        assert!(csproj.contains("Swashbuckle.AspNetCore"));
        assert!(!csproj.contains("EntityFrameworkCore"));
        assert!(!csproj.contains("AutoMapper"));

        project.features.clear();
        let mut artifacts = ProjectArtifacts::default();
        generate_csproj(&project, &mut artifacts).unwrap();
        assert!(!artifacts.files[0].contents.contains("<ItemGroup>"));
    }
}
