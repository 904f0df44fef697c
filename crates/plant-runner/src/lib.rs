//! # Plant Runner
//!
//! Launches AutoCAD Plant 3D in batch mode so the `MetadataApplier` add-in
//! can apply a JSON metadata bundle to a project.
//!
//! A run validates its inputs, writes a `NETLOAD` script into the working
//! directory, overlays the `PLANT_*` variables the add-in reads onto the
//! inherited environment, and hands the host's exit code back verbatim.
//!
//! ## AutoCAD Discovery
//!
//! When no executable is configured, [`AcadDiscovery`] looks for `acad.exe`
//! in the Windows registry (`AcadLocation` under the Autodesk release keys),
//! the usual `Program Files` folders, and `PATH`.

pub mod discovery;
pub mod environment;
pub mod error;
pub mod executor;
pub mod inputs;
pub mod models;
pub mod orchestrator;
pub mod scripting;

pub use discovery::{AcadDiscovery, AcadInstallation, DiscoveryMethod};
pub use error::RunError;
pub use models::{LaunchPlan, RunConfig};
pub use orchestrator::Orchestrator;
