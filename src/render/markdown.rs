use super::{render_template, RenderOptions};
use crate::{row::DeploymentRow, Result};

const TEMPLATE: &str = include_str!("templates/dashboard.md.liquid");

/// Render the markdown report: a table with one line per row, or a
/// "no deployments" sentence when `rows` is empty. Values are written
/// verbatim.
pub fn render(
    rows: &[DeploymentRow],
    generated_at: &str,
    options: &RenderOptions,
) -> Result<String> {
    render_template(TEMPLATE, rows, generated_at, options)
}
