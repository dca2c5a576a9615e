//! High-level orchestration API for solution generation.
//!
//! This module walks a [`Schema`] top-down: for every project it creates the
//! directory skeleton, renders and writes every artifact, then runs the
//! migration commands; after all projects it builds the solution grouping.
//! Output location and toolchain behaviour are carried by [`GeneratorOptions`]
//! rather than shared state.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codegen::aspnet::{render_project, ProjectArtifacts, PROJECT_FOLDERS};
use crate::codegen::fs_utils;
use crate::codegen::types::Schema;
use crate::error::{GenerateError, GenerationWarning, Result};
use crate::toolchain::{CommandRunner, ProcessRunner, ToolchainCommand};

/// Default limit for a single toolchain command
pub const DEFAULT_TOOLCHAIN_TIMEOUT: Duration = Duration::from_secs(300);

/// Operator settings for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Replaces `solution.outputPath` when set
    pub output_override: Option<PathBuf>,

    /// Run migration and solution commands after writing files
    pub run_toolchain: bool,

    /// Treat toolchain failures as errors instead of warnings
    pub strict_toolchain: bool,

    /// Per-command timeout; the process is killed when it expires
    pub toolchain_timeout: Duration,

    /// Toolchain executable (e.g. "dotnet" or an absolute path)
    pub dotnet_program: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            output_override: None,
            run_toolchain: true,
            strict_toolchain: false,
            toolchain_timeout: DEFAULT_TOOLCHAIN_TIMEOUT,
            dotnet_program: "dotnet".to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Root directory of the generated solution:
    /// `(override | solution.outputPath | cwd) / solution.name`
    pub fn output_root(&self, schema: &Schema) -> Result<PathBuf> {
        let base = match (&self.output_override, &schema.solution.output_path) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => env::current_dir().map_err(|source| GenerateError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };
        Ok(base.join(&schema.solution.name))
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Root directory the solution was written to
    pub output_root: PathBuf,
    /// Every file written, relative to the output root
    pub files_written: Vec<PathBuf>,
    warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }
}

/// Drives generation for a whole solution
pub struct Generator<R: CommandRunner> {
    options: GeneratorOptions,
    runner: R,
}

impl Generator<ProcessRunner> {
    /// Generator that runs the real toolchain
    pub fn with_process_runner(options: GeneratorOptions) -> Self {
        Generator::new(options, ProcessRunner::new())
    }
}

impl<R: CommandRunner> Generator<R> {
    pub fn new(options: GeneratorOptions, runner: R) -> Self {
        Generator { options, runner }
    }

    /// Give back the runner, e.g. to inspect a recording fake
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Generate every project of the schema, then the solution grouping.
    ///
    /// Render and write errors abort the run; files already written stay on
    /// disk. Toolchain failures are collected as warnings unless
    /// `strict_toolchain` is set.
    pub fn generate(&mut self, schema: &Schema) -> Result<GenerationReport> {
        let root = self.options.output_root(schema)?;
        fs_utils::create_dir_all(&root)?;

        let mut report = GenerationReport {
            output_root: root.clone(),
            ..Default::default()
        };

        for project in &schema.solution.projects {
            println!("📦 Generating project {}...", project.name);
            tracing::info!("generating project '{}'", project.name);

            let project_dir = root.join(&project.name);
            for folder in PROJECT_FOLDERS {
                fs_utils::create_dir_all(project_dir.join(folder))?;
            }

            let artifacts = render_project(project)?;
            self.write_project(&root, &project.name, &artifacts, &mut report)?;
            report.warnings.extend(artifacts.warnings);
            println!("  ✓ {} files written", artifacts.files.len());

            if self.options.run_toolchain {
                let program = self.options.dotnet_program.clone();
                self.run_step(
                    ToolchainCommand::add_migration(&program, &root, &project.name),
                    &mut report,
                )?;
                self.run_step(
                    ToolchainCommand::update_database(&program, &root, &project.name),
                    &mut report,
                )?;
            }
        }

        if self.options.run_toolchain {
            println!("🔧 Creating solution {}...", schema.solution.name);
            let program = self.options.dotnet_program.clone();
            self.run_step(
                ToolchainCommand::new_solution(&program, &root, &schema.solution.name),
                &mut report,
            )?;
            for project in &schema.solution.projects {
                self.run_step(
                    ToolchainCommand::add_to_solution(&program, &root, &project.name),
                    &mut report,
                )?;
            }
        } else {
            tracing::info!("toolchain disabled; skipping migrations and solution file");
        }

        Ok(report)
    }

    fn write_project(
        &self,
        root: &Path,
        project_name: &str,
        artifacts: &ProjectArtifacts,
        report: &mut GenerationReport,
    ) -> Result<()> {
        for file in &artifacts.files {
            let relative = Path::new(project_name).join(&file.path);
            tracing::debug!("writing {}", relative.display());
            fs_utils::write_file(root.join(&relative), &file.contents)?;
            report.files_written.push(relative);
        }
        Ok(())
    }

    fn run_step(&mut self, command: ToolchainCommand, report: &mut GenerationReport) -> Result<()> {
        println!("  → {}", command);
        let detail = match self.runner.run(&command, self.options.toolchain_timeout) {
            Ok(outcome) => match outcome.failure() {
                None => return Ok(()),
                Some(detail) => detail,
            },
            Err(e) => format!("failed to start: {}", e),
        };

        if self.options.strict_toolchain {
            return Err(GenerateError::Toolchain {
                command: command.to_string(),
                detail,
            });
        }

        let warning = GenerationWarning::ToolchainFailure {
            command: command.to_string(),
            detail,
        };
        tracing::warn!("{}", warning);
        report.warnings.push(warning);
        Ok(())
    }
}
