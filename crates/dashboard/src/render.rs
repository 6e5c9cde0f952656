//! HTML rendering of the dashboard view model.

use handlebars::{handlebars_helper, Handlebars};

use crate::error::DashboardError;
use crate::view::DashboardView;

const DASHBOARD_TEMPLATE_NAME: &str = "dashboard";

/// Embedded page template. Inline CSS and reload script, no external assets.
const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html.hbs");

/// Renders [`DashboardView`] values into self-contained HTML pages.
pub struct DashboardRenderer {
    handlebars: Handlebars<'static>,
}

impl DashboardRenderer {
    /// Create a renderer with the embedded template.
    pub fn new() -> Result<Self, DashboardError> {
        let mut handlebars = Handlebars::new();
        Self::register_helpers(&mut handlebars);
        handlebars.register_template_string(DASHBOARD_TEMPLATE_NAME, DASHBOARD_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Render a view model into a complete HTML document.
    pub fn render(&self, view: &DashboardView) -> Result<String, DashboardError> {
        Ok(self.handlebars.render(DASHBOARD_TEMPLATE_NAME, view)?)
    }

    fn register_helpers(hb: &mut Handlebars<'static>) {
        // Shortest round-trip form: 1250.0 renders as "1250", 88.5 as "88.5".
        handlebars_helper!(num: |value: f64| format!("{value}"));

        hb.register_helper("num", Box::new(num));
    }
}

/// Render a view model with a fresh renderer.
pub fn render_dashboard(view: &DashboardView) -> Result<String, DashboardError> {
    DashboardRenderer::new()?.render(view)
}
