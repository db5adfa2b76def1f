use super::{render_template, RenderOptions};
use crate::{row::DeploymentRow, Result};

const TEMPLATE: &str = include_str!("templates/dashboard.html.liquid");

/// Render the standalone HTML report: one card per row in a responsive
/// grid, or a single "no deployments" paragraph when `rows` is empty. Every
/// row value is HTML escaped.
pub fn render(
    rows: &[DeploymentRow],
    generated_at: &str,
    options: &RenderOptions,
) -> Result<String> {
    render_template(TEMPLATE, rows, generated_at, options)
}
