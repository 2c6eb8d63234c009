use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// Convert Markdown to HTML that is safe to display
///
/// GitHub-flavored tables, strikethrough, and task lists are enabled. Single
/// line breaks are kept as `<br />`. Raw HTML in the source is emitted as
/// escaped text and `javascript:`/`data:` links are neutralized.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

fn is_unsafe_url(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_breaks_become_line_breaks() {
        let html = markdown_to_html("first line\nsecond line");
        assert_eq!(html, "<p>first line<br />\nsecond line</p>\n");
    }

    #[test]
    fn test_tables_are_rendered() {
        let html = markdown_to_html("| ID | Name |\n|----|------|\n| UR-001 | Login |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>UR-001</td>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = markdown_to_html("Hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_javascript_links_are_neutralized() {
        let html = markdown_to_html("[click](javascript:alert(1))");
        assert!(html.contains("href=\"#\""));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_task_lists_and_strikethrough() {
        let html = markdown_to_html("- [x] done\n- ~~dropped~~");
        assert!(html.contains("checkbox"));
        assert!(html.contains("<del>dropped</del>"));
    }
}
