//! # Layergen: Layered Service Scaffolding from YAML
//!
//! Layergen reads a declarative solution description and generates a layered
//! ASP.NET Core service per project: entities with navigation properties,
//! DTOs with a mapping profile, repositories, controllers, a persistence
//! context with seed data, and the host/project/settings files.
//!
//! ## Features
//!
//! - **Relationship inference**: navigation properties on both sides of every declared foreign key
//! - **Typed seed literals**: seed values rendered according to the declared property type
//! - **Consistent naming**: one naming utility shared by every generator and the service registrations
//! - **Reported degradation**: unresolved references still yield a skeleton, plus a typed warning
//! - **Toolchain steps**: migrations and solution grouping through `dotnet`, with a timeout
//!
//! ## Example
//!
//! ```yaml
//! solution:
//!   name: Parking
//!   projects:
//!     - name: Parking.Api
//!       targetFramework: net8.0
//!       features: [swagger, entityframework, automapper]
//!       models:
//!         - name: Vehicle
//!           properties:
//!             - name: Id
//!               type: Guid
//!               isPrimaryKey: true
//!             - name: PlateNumber
//!               type: string
//!               required: true
//!               maxLength: 10
//!       dbContext:
//!         name: ParkingDbContext
//!         connectionString: "Server=(localdb)\\mssqllocaldb;Database=Parking"
//! ```

// Error and warning types
pub mod error;

// Code generation framework
pub mod codegen;

// External toolchain invocation
pub mod toolchain;

// Re-export key types
pub use error::{ConfigError, GenerateError, GenerationWarning};
pub use codegen::{generate_from_yaml, GenerationReport, Generator, GeneratorOptions, Schema};
pub use toolchain::{CommandOutcome, CommandRunner, ProcessRunner, ToolchainCommand};
