use crate::{config::OutputConfig, row::DeploymentRow, service::Report, Result};
use log::info;
use std::{fs, path::Path};

/// The rows as a pretty printed JSON array with a trailing newline
pub fn to_json(rows: &[DeploymentRow]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(rows)?;
    json.push('\n');
    Ok(json)
}

/// Write all three artifacts, creating missing parent directories. Existing
/// files are replaced.
pub fn write_report(output: &OutputConfig, report: &Report) -> Result<()> {
    write(&output.json, &report.json)?;
    write(&output.markdown, &report.markdown)?;
    write(&output.html, &report.html)?;
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!("wrote {}", path.display());
    Ok(())
}
