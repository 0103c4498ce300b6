//! Class documentation page rendering.

use std::fmt::Write;

use stitch_links::{LinkRegistry, expand};
use stitch_model::{ClassEntity, Member, Section};
use stitch_render::{escape_html, slugify};

/// Renders one class entity into an HTML content fragment.
///
/// The fragment carries the class heading, its sections in source order, and
/// each section's members in source order. All prose and signature text runs
/// through reference expansion; prose and signatures are expanded
/// independently so a malformed marker in one cannot affect the other.
///
/// Rendering is a pure transform: identical entity and registry state
/// produce byte-identical output.
pub struct ClassPage<'a> {
    registry: &'a LinkRegistry,
}

impl<'a> ClassPage<'a> {
    /// Create a renderer resolving references against `registry`.
    #[must_use]
    pub fn new(registry: &'a LinkRegistry) -> Self {
        Self { registry }
    }

    /// Render the class into a content fragment.
    #[must_use]
    pub fn render(&self, class: &ClassEntity) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str("<article class=\"class-doc\">\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&class.name));
        for section in &class.sections {
            self.render_section(&mut html, section);
        }
        html.push_str("</article>\n");
        html
    }

    fn render_section(&self, html: &mut String, section: &Section) {
        html.push_str("<section>\n");
        let _ = writeln!(
            html,
            "<h2 id=\"{}\">{}</h2>",
            slugify(&section.title),
            escape_html(&section.title)
        );
        if !section.prose.is_empty() {
            let _ = writeln!(
                html,
                "<div class=\"prose\">{}</div>",
                expand(&section.prose, self.registry)
            );
        }
        for member in &section.members {
            self.render_member(html, member);
        }
        html.push_str("</section>\n");
    }

    fn render_member(&self, html: &mut String, member: &Member) {
        html.push_str("<div class=\"member\">\n");
        let _ = writeln!(
            html,
            "<h3 id=\"{}\">{}</h3>",
            slugify(&member.name),
            escape_html(&member.name)
        );
        if !member.signature.is_empty() {
            let _ = writeln!(
                html,
                "<pre class=\"signature\"><code>{}</code></pre>",
                expand(&member.signature, self.registry)
            );
        }
        if !member.prose.is_empty() {
            let _ = writeln!(
                html,
                "<div class=\"prose\">{}</div>",
                expand(&member.prose, self.registry)
            );
        }
        html.push_str("</div>\n");
    }
}
