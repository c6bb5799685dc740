//! Inline markdown formatter for chatbot replies.
//!
//! Covers the restricted subset the backend emits: `##`/`###` headers,
//! `**bold**` spans, and flat `* ` bullet lists. Everything else is wrapped
//! in paragraphs unchanged.

use regex::Regex;
use std::sync::LazyLock;

static H3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^### (.*)$").expect("hardcoded pattern"));
static H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^## (.*)$").expect("hardcoded pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("hardcoded pattern"));

/// Converts one chatbot reply into an HTML fragment for a message bubble.
///
/// Pass order matters: `###` headers, then `##` headers, then bold spans,
/// then a line pass that assembles `<ul>`/`<li>` and `<p>` structure. The
/// header and bold passes run on the whole text before line splitting, so a
/// span straddling what later become separate list lines stays literal.
/// Every `<ul>` opened by the line pass is closed exactly once.
pub fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let formatted = H3.replace_all(text, "<h3>$1</h3>");
    let formatted = H2.replace_all(&formatted, "<h2>$1</h2>");
    let formatted = BOLD.replace_all(&formatted, "<strong>$1</strong>");

    let mut out = String::new();
    let mut in_list = false;

    for line in formatted.split('\n') {
        let trimmed = line.trim();
        if let Some(item) = trimmed.strip_prefix("* ") {
            if !in_list {
                out.push_str("<ul>");
                in_list = true;
            }
            out.push_str("<li>");
            out.push_str(item);
            out.push_str("</li>");
            continue;
        }

        if in_list {
            out.push_str("</ul>");
            in_list = false;
        }

        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("<h2>") || trimmed.starts_with("<h3>") {
            // Headers are already block-level; a <p> wrapper would nest them.
            out.push_str(line);
        } else {
            out.push_str("<p>");
            out.push_str(line);
            out.push_str("</p>");
        }
    }

    if in_list {
        out.push_str("</ul>");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_fragment() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n\n"), "");
        assert_eq!(render("   "), "");
    }

    #[test]
    fn h3_line_becomes_bare_header() {
        assert_eq!(render("### Title"), "<h3>Title</h3>");
    }

    #[test]
    fn h2_line_becomes_bare_header() {
        assert_eq!(render("## Section"), "<h2>Section</h2>");
    }

    #[test]
    fn header_marker_only_matches_at_line_start() {
        assert_eq!(render("see ### this"), "<p>see ### this</p>");
        // Leading whitespace defeats the anchor.
        assert_eq!(render("  ### indented"), "<p>  ### indented</p>");
    }

    #[test]
    fn four_hashes_are_not_a_header() {
        assert_eq!(render("#### deep"), "<p>#### deep</p>");
    }

    #[test]
    fn bold_span_inside_paragraph() {
        assert_eq!(render("**bold**"), "<p><strong>bold</strong></p>");
    }

    #[test]
    fn multiple_bold_spans_match_non_greedily() {
        assert_eq!(
            render("**a** and **b**"),
            "<p><strong>a</strong> and <strong>b</strong></p>"
        );
    }

    #[test]
    fn unterminated_bold_stays_literal() {
        assert_eq!(render("**a"), "<p>**a</p>");
    }

    #[test]
    fn bold_does_not_cross_line_boundaries() {
        assert_eq!(render("**a\nb**"), "<p>**a</p><p>b**</p>");
    }

    #[test]
    fn consecutive_bullets_share_one_list() {
        assert_eq!(render("* a\n* b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn plain_line_closes_and_reopens_list() {
        assert_eq!(
            render("* a\nplain\n* b"),
            "<ul><li>a</li></ul><p>plain</p><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn blank_line_emits_no_paragraph() {
        assert_eq!(render("line1\n\nline2"), "<p>line1</p><p>line2</p>");
    }

    #[test]
    fn blank_line_closes_open_list() {
        assert_eq!(render("* a\n\ntail"), "<ul><li>a</li></ul><p>tail</p>");
    }

    #[test]
    fn list_open_at_end_of_input_is_closed() {
        assert_eq!(render("intro\n* a"), "<p>intro</p><ul><li>a</li></ul>");
    }

    #[test]
    fn indented_bullets_are_trimmed_into_the_list() {
        assert_eq!(render("  * a\n\t* b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn star_without_space_is_a_paragraph() {
        assert_eq!(render("*a*"), "<p>*a*</p>");
    }

    #[test]
    fn paragraph_keeps_original_whitespace() {
        assert_eq!(render("  padded"), "<p>  padded</p>");
    }

    #[test]
    fn bold_inside_bullet_item() {
        assert_eq!(
            render("* **hot** take"),
            "<ul><li><strong>hot</strong> take</li></ul>"
        );
    }

    #[test]
    fn header_between_lists_closes_and_reopens() {
        assert_eq!(
            render("* a\n### T\n* b"),
            "<ul><li>a</li></ul><h3>T</h3><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn mixed_reply_renders_in_document_order() {
        let reply = "## Plan\nHere is **the** idea:\n* first\n* second\ndone";
        assert_eq!(
            render(reply),
            "<h2>Plan</h2><p>Here is <strong>the</strong> idea:</p>\
             <ul><li>first</li><li>second</li></ul><p>done</p>"
        );
    }

    #[test]
    fn header_capture_runs_to_end_of_line_only() {
        assert_eq!(
            render("### One\n### Two"),
            "<h3>One</h3><h3>Two</h3>"
        );
    }
}
