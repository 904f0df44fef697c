//! AutoCAD installation discovery.
//!
//! Locates `acad.exe` when the executable is not configured, by querying:
//! 1. The Windows registry (`AcadLocation` under each AutoCAD release key)
//! 2. `Autodesk` folders under Program Files, newest release first
//! 3. The system PATH
//!
//! Discovery only proposes a path. Whether it exists is still checked by
//! the pre-flight validation of the run.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Executable file name.
const ACAD_EXECUTABLE: &str = "acad.exe";

/// Install folders are named `AutoCAD <release>`.
const INSTALL_DIR_PREFIX: &str = "AutoCAD ";

/// Registry key holding one subkey per AutoCAD release (`R25.1`, ...).
#[cfg(windows)]
const AUTOCAD_KEY_PATH: &str = r"SOFTWARE\Autodesk\AutoCAD";

/// Registry product names of the vertical started by `/product PLNT3D`.
#[cfg(any(windows, test))]
const PLANT_3D_PRODUCT: &str = "Plant 3D";

/// Used when nothing else is configured or found.
pub const DEFAULT_ACAD_EXE: &str = r"C:\Program Files\Autodesk\AutoCAD 2026\acad.exe";

/// Errors from AutoCAD discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No installation was found by any method.
    #[error("AutoCAD installation not found. Searched: registry, Program Files, and PATH")]
    NotFound,

    /// Registry access failed (Windows only).
    #[error("Failed to access Windows registry: {reason}")]
    RegistryError {
        /// Description of the failure.
        reason: String,
    },
}

/// A located (or assumed) AutoCAD installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcadInstallation {
    /// Full path to `acad.exe`.
    pub executable: PathBuf,
    /// Installation directory.
    pub install_dir: PathBuf,
    /// Product name from the registry (e.g., "AutoCAD Plant 3D 2026").
    pub product_name: Option<String>,
    /// Release identifier: registry key (`R25.1`) or folder suffix (`2026`).
    pub release: Option<String>,
    /// How the installation was found.
    pub discovery_method: DiscoveryMethod,
}

/// How the AutoCAD executable was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    /// `AcadLocation` in the Windows registry.
    WindowsRegistry,
    /// An `AutoCAD <release>` folder under Program Files.
    CommonPath,
    /// A directory on PATH.
    SystemPath,
    /// Configured by the user.
    ExplicitConfig,
    /// The built-in default path; not verified.
    BuiltInDefault,
}

impl std::fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WindowsRegistry => "registry",
            Self::CommonPath => "common path",
            Self::SystemPath => "system PATH",
            Self::ExplicitConfig => "explicit config",
            Self::BuiltInDefault => "built-in default",
        };
        f.write_str(s)
    }
}

/// AutoCAD discovery engine.
pub struct AcadDiscovery;

impl AcadDiscovery {
    /// Pick the executable for a run.
    ///
    /// An explicit path always wins. Otherwise discovery runs, and if it
    /// finds nothing the built-in default is returned.
    pub fn resolve(explicit: Option<&Path>) -> AcadInstallation {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Using explicitly configured AutoCAD path");
            return Self::from_explicit_path(path);
        }

        match Self::discover() {
            Ok(installation) => installation,
            Err(e) => {
                warn!(
                    error = %e,
                    default = DEFAULT_ACAD_EXE,
                    "AutoCAD discovery failed, falling back to default path"
                );
                Self::built_in_default()
            }
        }
    }

    /// Search the registry, common install folders, then PATH.
    pub fn discover() -> Result<AcadInstallation, DiscoveryError> {
        info!("Searching for AutoCAD installation...");

        #[cfg(windows)]
        {
            match Self::discover_from_registry() {
                Ok(installation) => {
                    info!(
                        path = %installation.executable.display(),
                        release = ?installation.release,
                        "Found AutoCAD via Windows registry"
                    );
                    return Ok(installation);
                }
                Err(e) => {
                    debug!(error = %e, "Registry discovery failed, trying fallbacks");
                }
            }
        }

        if let Some(installation) = Self::find_in_roots(&Self::program_files_roots()) {
            info!(
                path = %installation.executable.display(),
                "Found AutoCAD in common installation path"
            );
            return Ok(installation);
        }
        debug!("Common path discovery failed, trying PATH");

        if let Some(path_var) = std::env::var_os("PATH") {
            if let Some(installation) = Self::find_on_path(&path_var) {
                info!(
                    path = %installation.executable.display(),
                    "Found AutoCAD in system PATH"
                );
                return Ok(installation);
            }
        }
        debug!("PATH discovery failed");

        Err(DiscoveryError::NotFound)
    }

    /// Pick a registry product with a usable `AcadLocation`, preferring
    /// Plant 3D and then the newest release.
    #[cfg(windows)]
    fn discover_from_registry() -> Result<AcadInstallation, DiscoveryError> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ};

        let autocad = RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(AUTOCAD_KEY_PATH, KEY_READ)
            .map_err(|e| DiscoveryError::RegistryError {
                reason: format!("Cannot open {AUTOCAD_KEY_PATH}: {e}"),
            })?;

        let mut candidates = Vec::new();
        for release in autocad.enum_keys().flatten() {
            let Ok(release_key) = autocad.open_subkey_with_flags(&release, KEY_READ) else {
                continue;
            };

            for product in release_key.enum_keys().flatten() {
                let Ok(product_key) = release_key.open_subkey_with_flags(&product, KEY_READ)
                else {
                    continue;
                };
                let Ok(location) = product_key.get_value::<String, _>("AcadLocation") else {
                    debug!(release = %release, product = %product, "No AcadLocation value");
                    continue;
                };

                let install_dir = PathBuf::from(location);
                if !install_dir.join(ACAD_EXECUTABLE).exists() {
                    warn!(
                        install_dir = %install_dir.display(),
                        "Registry points to install dir but {} not found",
                        ACAD_EXECUTABLE
                    );
                    continue;
                }

                candidates.push(RegistryCandidate {
                    release: release.clone(),
                    product_name: product_key.get_value("ProductName").ok(),
                    install_dir,
                });
            }
        }

        pick_registry_candidate(candidates)
            .map(RegistryCandidate::into_installation)
            .ok_or_else(|| DiscoveryError::RegistryError {
                reason: format!(
                    "No AcadLocation with {ACAD_EXECUTABLE} under HKLM\\{AUTOCAD_KEY_PATH}"
                ),
            })
    }

    /// `Autodesk` folders under the Program Files locations.
    fn program_files_roots() -> Vec<PathBuf> {
        let mut roots = Vec::new();

        #[cfg(windows)]
        {
            for var in ["ProgramW6432", "ProgramFiles"] {
                if let Some(pf) = std::env::var_os(var) {
                    let root = PathBuf::from(pf).join("Autodesk");
                    if !roots.contains(&root) {
                        roots.push(root);
                    }
                }
            }
        }

        let fallback = PathBuf::from("C:/Program Files/Autodesk");
        if !roots.contains(&fallback) {
            roots.push(fallback);
        }
        roots
    }

    /// Newest `AutoCAD <release>` folder containing the executable.
    pub(crate) fn find_in_roots(roots: &[PathBuf]) -> Option<AcadInstallation> {
        for root in roots {
            let Ok(entries) = std::fs::read_dir(root) else {
                continue;
            };

            let mut candidates: Vec<(String, PathBuf)> = entries
                .flatten()
                .filter_map(|entry| {
                    let name = entry.file_name().into_string().ok()?;
                    let release = name.strip_prefix(INSTALL_DIR_PREFIX)?.to_string();
                    let dir = entry.path();
                    dir.join(ACAD_EXECUTABLE).is_file().then_some((release, dir))
                })
                .collect();
            candidates.sort_unstable_by(|a, b| release_rank(&b.0).cmp(&release_rank(&a.0)));

            if let Some((release, install_dir)) = candidates.into_iter().next() {
                return Some(AcadInstallation {
                    executable: install_dir.join(ACAD_EXECUTABLE),
                    install_dir,
                    product_name: None,
                    release: Some(release),
                    discovery_method: DiscoveryMethod::CommonPath,
                });
            }
        }
        None
    }

    /// First PATH entry containing the executable.
    pub(crate) fn find_on_path(path_var: &OsStr) -> Option<AcadInstallation> {
        std::env::split_paths(path_var).find_map(|dir| {
            let executable = dir.join(ACAD_EXECUTABLE);
            executable.is_file().then(|| AcadInstallation {
                executable,
                install_dir: dir,
                product_name: None,
                release: None,
                discovery_method: DiscoveryMethod::SystemPath,
            })
        })
    }

    /// Installation for a configured path: the executable itself, or a
    /// directory holding `acad.exe`.
    pub fn from_explicit_path(path: &Path) -> AcadInstallation {
        let (executable, install_dir) = if path.is_dir() {
            (path.join(ACAD_EXECUTABLE), path.to_path_buf())
        } else {
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (path.to_path_buf(), dir)
        };

        AcadInstallation {
            executable,
            install_dir,
            product_name: None,
            release: None,
            discovery_method: DiscoveryMethod::ExplicitConfig,
        }
    }

    /// The built-in default installation.
    pub fn built_in_default() -> AcadInstallation {
        let executable = PathBuf::from(DEFAULT_ACAD_EXE);
        let install_dir = PathBuf::from(r"C:\Program Files\Autodesk\AutoCAD 2026");
        AcadInstallation {
            executable,
            install_dir,
            product_name: None,
            release: Some("2026".to_string()),
            discovery_method: DiscoveryMethod::BuiltInDefault,
        }
    }
}

/// Numeric parts of a release identifier, for ordering: `R25.1` is
/// `[25, 1]`, `2026` is `[2026]`.
fn release_rank(release: &str) -> Vec<u32> {
    release
        .trim_start_matches(['R', 'r'])
        .split('.')
        .map_while(|part| part.parse().ok())
        .collect()
}

/// A registry product whose `AcadLocation` holds the executable.
#[cfg(any(windows, test))]
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegistryCandidate {
    release: String,
    product_name: Option<String>,
    install_dir: PathBuf,
}

#[cfg(any(windows, test))]
impl RegistryCandidate {
    fn is_plant_3d(&self) -> bool {
        self.product_name
            .as_deref()
            .is_some_and(|name| name.contains(PLANT_3D_PRODUCT))
    }

    fn into_installation(self) -> AcadInstallation {
        AcadInstallation {
            executable: self.install_dir.join(ACAD_EXECUTABLE),
            install_dir: self.install_dir,
            product_name: self.product_name,
            release: Some(self.release),
            discovery_method: DiscoveryMethod::WindowsRegistry,
        }
    }
}

/// Plant 3D products first, then the newest release.
#[cfg(any(windows, test))]
fn pick_registry_candidate(candidates: Vec<RegistryCandidate>) -> Option<RegistryCandidate> {
    candidates.into_iter().max_by(|a, b| {
        a.is_plant_3d()
            .cmp(&b.is_plant_3d())
            .then_with(|| release_rank(&a.release).cmp(&release_rank(&b.release)))
    })
}

impl AcadInstallation {
    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        let name = self.product_name.as_deref().unwrap_or("AutoCAD");
        match &self.release {
            Some(release) => format!(
                "{} {} at {} (found via {})",
                name,
                release,
                self.executable.display(),
                self.discovery_method
            ),
            None => format!(
                "{} at {} (found via {})",
                name,
                self.executable.display(),
                self.discovery_method
            ),
        }
    }
}
