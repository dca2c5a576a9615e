//! Settings and launch profile files.
//!
//! These embed schema values verbatim; only the shape is fixed here.

use serde_json::json;

use super::ProjectArtifacts;
use crate::codegen::types::ProjectSpec;
use crate::error::Result;

/// Local URLs of the development launch profile
const APPLICATION_URL: &str = "https://localhost:50081;http://localhost:50082";

/// Generate `appsettings.json`, `appsettings.Development.json` and
/// `Properties/launchSettings.json`.
pub fn generate_settings(project: &ProjectSpec, artifacts: &mut ProjectArtifacts) -> Result<()> {
    let connection_string = project
        .db_context
        .as_ref()
        .map(|c| c.connection_string.as_str())
        .unwrap_or_default();

    let appsettings = json!({
        "Logging": {
            "LogLevel": {
                "Default": "Information",
                "Microsoft": "Warning",
                "Microsoft.Hosting.Lifetime": "Information"
            }
        },
        "AllowedHosts": "*",
        "ConnectionStrings": {
            "DefaultConnection": connection_string
        },
        "Features": project.features
    });
    let appsettings = to_pretty(&appsettings)?;

    let launch_settings = json!({
        "profiles": {
            "Development": {
                "commandName": "Project",
                "dotnetRunMessages": true,
                "launchBrowser": true,
                "applicationUrl": APPLICATION_URL,
                "launchUrl": "swagger",
                "environmentVariables": {
                    "ASPNETCORE_ENVIRONMENT": "Development"
                }
            }
        }
    });

    artifacts.push_file("appsettings.json", appsettings.clone());
    artifacts.push_file("appsettings.Development.json", appsettings);
    artifacts.push_file("Properties/launchSettings.json", to_pretty(&launch_settings)?);
    Ok(())
}

fn to_pretty(value: &serde_json::Value) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::parking_project;
    use super::*;
    use crate::codegen::types::PersistenceContextSpec;

    fn render() -> ProjectArtifacts {
        let mut project = parking_project();
        project.db_context = Some(PersistenceContextSpec {
            name: "ParkingDbContext".to_string(),
            connection_string: "Server=(localdb)\\mssqllocaldb;Database=Parking".to_string(),
        });
        let mut artifacts = ProjectArtifacts::default();
        generate_settings(&project, &mut artifacts).unwrap();
        artifacts
    }

    #[test]
    fn test_appsettings_embed_connection_and_features() {
        let artifacts = render();
        let settings: serde_json::Value =
            serde_json::from_str(&artifacts.file("appsettings.json").unwrap().contents).unwrap();

        assert_eq!(
            settings["ConnectionStrings"]["DefaultConnection"],
            "Server=(localdb)\\mssqllocaldb;Database=Parking"
        );
        assert_eq!(settings["Features"][1], "entityframework");
        assert_eq!(settings["Logging"]["LogLevel"]["Microsoft.Hosting.Lifetime"], "Information");
        assert_eq!(
            artifacts.file("appsettings.json").unwrap().contents,
            artifacts.file("appsettings.Development.json").unwrap().contents
        );
    }

    #[test]
    fn test_launch_profile() {
        let artifacts = render();
        let launch: serde_json::Value = serde_json::from_str(
            &artifacts.file("Properties/launchSettings.json").unwrap().contents,
        )
        .unwrap();

        let profile = &launch["profiles"]["Development"];
        assert_eq!(profile["applicationUrl"], APPLICATION_URL);
        assert_eq!(profile["environmentVariables"]["ASPNETCORE_ENVIRONMENT"], "Development");
    }
}
