// Windows helpers: WMI computer-system identity (via wmic), driverquery.

use std::process::{Command, Stdio};

use super::SourceError;
use super::linux::count_lines;

/// Manufacturer and model from the WMI `Win32_ComputerSystem` class.
pub(super) fn computer_system() -> (Option<String>, Option<String>) {
    let output = Command::new("wmic")
        .args(["computersystem", "get", "manufacturer,model", "/format:list"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => parse_wmic_list(&String::from_utf8_lossy(&out.stdout)),
        Ok(_) | Err(_) => {
            tracing::debug!(operation = "computer_system", "WMI query unavailable");
            (None, None)
        }
    }
}

/// Parses `Key=Value` lines of `wmic ... /format:list` into (manufacturer, model).
pub(crate) fn parse_wmic_list(text: &str) -> (Option<String>, Option<String>) {
    let mut manufacturer = None;
    let mut model = None;
    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if key.eq_ignore_ascii_case("manufacturer") {
            manufacturer = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("model") {
            model = Some(value.to_string());
        }
    }
    (manufacturer, model)
}

/// Line count of `driverquery /FO CSV` output.
pub(super) fn driverquery_lines() -> Result<usize, SourceError> {
    let output = Command::new("driverquery")
        .args(["/FO", "CSV"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|_| SourceError::ToolFailed { tool: "driverquery" })?;
    if !output.status.success() {
        return Err(SourceError::ToolFailed { tool: "driverquery" });
    }
    Ok(count_lines(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wmic_list_reads_both_fields() {
        let text = "\r\n\r\nManufacturer=LENOVO\r\nModel=20XW0055GE\r\n\r\n";
        let (manufacturer, model) = parse_wmic_list(text);
        assert_eq!(manufacturer.as_deref(), Some("LENOVO"));
        assert_eq!(model.as_deref(), Some("20XW0055GE"));
    }

    #[test]
    fn parse_wmic_list_treats_blank_values_as_missing() {
        let (manufacturer, model) = parse_wmic_list("Manufacturer=\nModel=  \n");
        assert!(manufacturer.is_none());
        assert!(model.is_none());
    }
}
