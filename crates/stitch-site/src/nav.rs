//! Navigation fragment building.
//!
//! Each of the three entity kinds gets its own titled fragment; the final
//! navigation block is the configured selection of fragments concatenated in
//! order. All three fragments are always built so a configuration change
//! never alters what an individual fragment contains.

use std::fmt::Write;

use stitch_config::NavSection;
use stitch_render::escape_html;

/// One navigation entry: display text plus link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Display text.
    pub title: String,
    /// Link target.
    pub url: String,
}

impl NavEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// The three titled navigation fragments plus their composition.
#[derive(Debug, Clone)]
pub struct Navigation {
    /// Classes fragment, one item per documented class in metadata order.
    pub classes: String,
    /// Guides fragment, one item per guide document in listing order.
    pub guides: String,
    /// Files fragment, one item per root document in listing order.
    pub files: String,
    /// Configured fragments concatenated in configuration order.
    pub composed: String,
}

/// Builds navigation fragments from prepared entry lists.
pub struct NavigationBuilder<'a> {
    sections: &'a [NavSection],
}

impl<'a> NavigationBuilder<'a> {
    /// Create a builder composing the given sections, in order.
    #[must_use]
    pub fn new(sections: &'a [NavSection]) -> Self {
        Self { sections }
    }

    /// Build all three fragments and compose the configured selection.
    #[must_use]
    pub fn build(
        &self,
        classes: &[NavEntry],
        guides: &[NavEntry],
        files: &[NavEntry],
    ) -> Navigation {
        let classes = render_fragment(NavSection::Classes.title(), classes);
        let guides = render_fragment(NavSection::Guides.title(), guides);
        let files = render_fragment(NavSection::Files.title(), files);

        let mut composed = String::new();
        for section in self.sections {
            composed.push_str(match section {
                NavSection::Classes => &classes,
                NavSection::Guides => &guides,
                NavSection::Files => &files,
            });
        }

        Navigation {
            classes,
            guides,
            files,
            composed,
        }
    }
}

/// Render one titled fragment.
///
/// An empty entry list still yields the titled wrapper with an empty body,
/// never a failure.
fn render_fragment(title: &str, entries: &[NavEntry]) -> String {
    let mut html = String::with_capacity(64 + entries.len() * 48);
    html.push_str("<nav class=\"nav-section\">\n");
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(title));
    html.push_str("<ul>\n");
    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&entry.url),
            escape_html(&entry.title)
        );
    }
    html.push_str("</ul>\n</nav>\n");
    html
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<NavEntry> {
        pairs
            .iter()
            .map(|(title, url)| NavEntry::new(*title, *url))
            .collect()
    }

    #[test]
    fn test_fragment_one_item_per_entry_in_order() {
        let classes = entries(&[("Parser", "Parser"), ("Lexer", "Lexer"), ("Ast", "Ast")]);
        let nav = NavigationBuilder::new(&[NavSection::Classes]).build(&classes, &[], &[]);

        assert_eq!(nav.classes.matches("<li>").count(), 3);
        let parser = nav.classes.find("Parser").unwrap();
        let lexer = nav.classes.find("Lexer").unwrap();
        let ast = nav.classes.find("\">Ast<").unwrap();
        assert!(parser < lexer);
        assert!(lexer < ast);
    }

    #[test]
    fn test_empty_fragment_keeps_titled_wrapper() {
        let nav = NavigationBuilder::new(&[]).build(&[], &[], &[]);

        assert_eq!(
            nav.guides,
            "<nav class=\"nav-section\">\n<h2>Guides</h2>\n<ul>\n</ul>\n</nav>\n"
        );
    }

    #[test]
    fn test_item_markup() {
        let guides = entries(&[("Setup Guide", "setup")]);
        let nav = NavigationBuilder::new(&[]).build(&[], &guides, &[]);

        assert!(
            nav.guides
                .contains("<li><a href=\"setup\">Setup Guide</a></li>")
        );
    }

    #[test]
    fn test_composed_follows_section_order() {
        let classes = entries(&[("Parser", "Parser")]);
        let files = entries(&[("Changelog", "changelog")]);
        let sections = [NavSection::Files, NavSection::Classes];

        let nav = NavigationBuilder::new(&sections).build(&classes, &[], &files);

        let files_at = nav.composed.find("<h2>Files</h2>").unwrap();
        let classes_at = nav.composed.find("<h2>Classes</h2>").unwrap();
        assert!(files_at < classes_at);
        assert!(!nav.composed.contains("<h2>Guides</h2>"));
    }

    #[test]
    fn test_composed_empty_sections_is_empty() {
        let classes = entries(&[("Parser", "Parser")]);

        let nav = NavigationBuilder::new(&[]).build(&classes, &[], &[]);

        assert_eq!(nav.composed, "");
        // The individual fragments are still available.
        assert!(nav.classes.contains("Parser"));
    }

    #[test]
    fn test_entries_are_escaped() {
        let classes = entries(&[("Vec<T>", "Vec<T>")]);

        let nav = NavigationBuilder::new(&[NavSection::Classes]).build(&classes, &[], &[]);

        assert!(
            nav.classes
                .contains("<li><a href=\"Vec&lt;T&gt;\">Vec&lt;T&gt;</a></li>")
        );
    }

    #[test]
    fn test_all_fragments_built_regardless_of_composition() {
        let classes = entries(&[("Parser", "Parser")]);
        let guides = entries(&[("Setup", "setup")]);
        let files = entries(&[("Changelog", "changelog")]);

        let nav = NavigationBuilder::new(&[NavSection::Classes]).build(&classes, &guides, &files);

        assert!(nav.guides.contains("Setup"));
        assert!(nav.files.contains("Changelog"));
        assert!(!nav.composed.contains("Setup"));
    }
}
