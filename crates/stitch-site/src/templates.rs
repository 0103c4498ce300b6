//! Shared page layout.
//!
//! Every content fragment is wrapped in one embedded template carrying the
//! site title, version, and navigation. Navigation and content are
//! pre-rendered HTML and bypass auto-escaping; everything else is escaped by
//! the template engine.

use minijinja::{Environment, context};

/// Embedded layout template.
const LAYOUT: &str = include_str!("../templates/layout.html");

/// Embedded default stylesheet, written to `assets/style.css` on every build.
pub(crate) const STYLESHEET: &str = include_str!("../templates/style.css");

/// Variables for one layout rendering.
pub(crate) struct PageVars<'a> {
    /// Site title from configuration.
    pub site_title: &'a str,
    /// Project version. Empty hides the version span.
    pub site_version: &'a str,
    /// Page title for the document title. Falls back to the site title.
    pub page_title: Option<&'a str>,
    /// Composed navigation HTML.
    pub nav: &'a str,
    /// Content fragment HTML.
    pub content: &'a str,
}

/// Shared HTML layout wrapping every rendered page.
pub(crate) struct Layout {
    env: Environment<'static>,
}

impl Layout {
    /// Compile the embedded layout template.
    pub(crate) fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        Ok(Self { env })
    }

    /// Render a complete page document.
    pub(crate) fn render(&self, vars: &PageVars<'_>) -> Result<String, minijinja::Error> {
        let template = self.env.get_template("layout.html")?;
        template.render(context! {
            site_title => vars.site_title,
            site_version => vars.site_version,
            page_title => vars.page_title,
            nav => vars.nav,
            content => vars.content,
        })
    }
}
