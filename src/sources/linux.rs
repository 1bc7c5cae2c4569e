// Linux (and generic unix) helpers: DMI identity files, lsmod.

use std::process::{Command, Stdio};

use super::SourceError;

const DMI_DIR: &str = "/sys/devices/virtual/dmi/id";

/// Read one DMI identity file, e.g. `sys_vendor` or `product_name`. Missing or empty yields None.
pub(super) fn read_dmi_field(field: &str) -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let raw = std::fs::read(format!("{DMI_DIR}/{field}")).ok()?;
        let v = String::from_utf8_lossy(&raw);
        let v = v.trim();
        if v.is_empty() {
            return None;
        }
        Some(v.to_string())
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (DMI_DIR, field);
        None
    }
}

/// Line count of `lsmod` output (header included).
pub(super) fn lsmod_lines() -> Result<usize, SourceError> {
    let output = Command::new("lsmod")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|_| SourceError::ToolFailed { tool: "lsmod" })?;
    if !output.status.success() {
        return Err(SourceError::ToolFailed { tool: "lsmod" });
    }
    Ok(count_lines(&output.stdout))
}

/// Counts newline characters, matching how the listing tools terminate every row.
pub(crate) fn count_lines(out: &[u8]) -> usize {
    out.iter().filter(|&&b| b == b'\n').count()
}
