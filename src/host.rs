//! Access to the machine being inventoried.
//!
//! Collectors never touch processes or the registry directly; they go
//! through [`HostEnv`]. [`SystemHost`] is the live implementation.

use crate::error::ScanError;
use crate::registry::RegistryReader;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

const FALLBACK_HOSTNAME: &str = "localhost";

/// The environment a scan runs against.
pub trait HostEnv: Send + Sync {
    /// Returns true if `program` can be invoked. Absence is not an error.
    fn has_program(&self, program: &str) -> bool;

    /// Runs `program` with `args` and returns its standard output.
    ///
    /// Blocks until the process exits. Standard error is discarded.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ScanError>;

    /// The registry, on hosts that have one.
    fn registry(&self) -> Option<&dyn RegistryReader>;

    /// Network name of this machine.
    fn hostname(&self) -> String;
}

/// The machine this process runs on.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostEnv for SystemHost {
    fn has_program(&self, program: &str) -> bool {
        find_program(program).is_some()
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<String, ScanError> {
        debug!(program, ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ScanError::ToolMissing(program.to_string())
                } else {
                    ScanError::Launch {
                        program: program.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            return Err(ScanError::ExitStatus {
                program: program.to_string(),
                code: output.status.code(),
            });
        }

        Ok(decode_lossy(program, output.stdout))
    }

    #[cfg(windows)]
    fn registry(&self) -> Option<&dyn RegistryReader> {
        Some(&crate::registry::WindowsRegistry)
    }

    #[cfg(not(windows))]
    fn registry(&self) -> Option<&dyn RegistryReader> {
        None
    }

    fn hostname(&self) -> String {
        match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                warn!(error = %e, "could not resolve hostname, using {FALLBACK_HOSTNAME}");
                FALLBACK_HOSTNAME.to_string()
            }
        }
    }
}

/// Searches `PATH` for an executable named `program`.
///
/// On Windows each extension in `PATHEXT` is tried as well.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    let extensions = executable_extensions();

    env::split_paths(&path).find_map(|dir| {
        extensions
            .iter()
            .map(|ext| dir.join(format!("{program}{ext}")))
            .find(|candidate| is_executable(candidate))
    })
}

fn executable_extensions() -> Vec<String> {
    let mut extensions = vec![String::new()];
    if cfg!(windows) {
        let pathext = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        extensions.extend(
            pathext
                .split(';')
                .filter(|ext| !ext.is_empty())
                .map(str::to_string),
        );
    }
    extensions
}

/// Decodes tool output, replacing invalid UTF-8 sequences with U+FFFD.
fn decode_lossy(program: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(
                program,
                offset = e.utf8_error().valid_up_to(),
                "output is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
