use std::collections::BTreeMap;

use dom_query::{Document, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;

use super::taxonomy::{SkillTier, COMPILED};

const EXPAND_SELECTORS: [&str; 2] = [
    "button.show-more-less-text__button",
    r#"button[aria-label*="show more"]"#,
];
const CONTAINER_SELECTORS: [&str; 3] = [
    ".jobs-description__content",
    ".jobs-description__text",
    "#job-details",
];
const MARKER_SELECTOR: &str = "span[data-skill-highlight]";
const PROCESSED_ATTR: &str = "data-processed";

static SHOW_MORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)show more").expect("valid show-more regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightReport {
    pub matches: usize,
    pub per_tier: BTreeMap<&'static str, usize>,
    /// Nodes swapped out of the document, old markers included.
    pub replaced_nodes: usize,
}

impl HighlightReport {
    fn record(&mut self, tier: &'static str) {
        self.matches += 1;
        *self.per_tier.entry(tier).or_default() += 1;
    }
}

/// Expands the truncated description and highlights skill terms in it.
pub fn process_job(document: &Document) -> Option<HighlightReport> {
    expand_description(document);
    let report = highlight_skills(document)?;
    tracing::info!(target: "highlight", matches = report.matches, "highlighted skills");
    Some(report)
}

/// Activates the "show more" control when one is present and still
/// collapsed. Only the first matching control is considered.
pub fn expand_description(document: &Document) -> bool {
    let Some(button) = EXPAND_SELECTORS
        .iter()
        .map(|selector| document.select(selector).first())
        .find(|button| button.exists())
    else {
        return false;
    };
    if !SHOW_MORE.is_match(&button.text()) {
        return false;
    }
    button.set_attr("aria-expanded", "true");
    tracing::debug!(target: "highlight", "expanded description");
    true
}

/// Rewrites the description container so every skill occurrence sits in a
/// coloured marker span. Markers from an earlier run are removed first.
pub fn highlight_skills(document: &Document) -> Option<HighlightReport> {
    let Some(container) = CONTAINER_SELECTORS
        .iter()
        .map(|selector| document.select(selector).first())
        .find(|container| container.exists())
    else {
        tracing::info!(target: "highlight", "description container not found");
        return None;
    };

    let mut report = HighlightReport::default();
    for marker in container.select(MARKER_SELECTOR).iter() {
        let text = marker.text();
        marker.replace_with_html(escape_html(&text));
        report.replaced_nodes += 1;
    }
    container.remove_attr(PROCESSED_ATTR);

    let mut text_nodes = Vec::new();
    for node in container.nodes() {
        collect_text_nodes(node, &mut text_nodes);
    }

    for node in text_nodes {
        let text = node.text();
        if let Some(html) = mark_terms(&text, &mut report) {
            node.replace_with_html(format!("<span>{html}</span>"));
            report.replaced_nodes += 1;
        }
    }
    container.set_attr(PROCESSED_ATTR, "1");
    Some(report)
}

fn collect_text_nodes<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    for child in node.children() {
        if child.is_text() {
            out.push(child);
        } else if child.is_element() {
            collect_text_nodes(&child, out);
        }
    }
}

/// Returns escaped HTML for `text` with markers inserted, or `None` when no
/// term occurs. Overlapping hits keep the earliest, then the longest.
fn mark_terms(text: &str, report: &mut HighlightReport) -> Option<String> {
    let mut hits: Vec<(usize, usize, &'static SkillTier)> = Vec::new();
    for term in COMPILED.iter() {
        for found in term.pattern.find_iter(text) {
            if is_bounded(text, found.start(), found.end()) {
                hits.push((found.start(), found.end(), term.tier));
            }
        }
    }
    if hits.is_empty() {
        return None;
    }
    hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut out = String::with_capacity(text.len() * 2);
    let mut cursor = 0;
    for (start, end, tier) in hits {
        if start < cursor {
            continue;
        }
        out.push_str(&escape_html(&text[cursor..start]));
        out.push_str(&format!(
            r#"<span data-skill-highlight="{}" style="background:{};padding:0 2px;border-radius:2px;font-weight:500;">{}</span>"#,
            tier.name,
            tier.color,
            escape_html(&text[start..end])
        ));
        report.record(tier.name);
        cursor = end;
    }
    out.push_str(&escape_html(&text[cursor..]));
    Some(out)
}

fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word) && !after.is_some_and(is_word)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS: &str = r#"<html><body>
<div class="jobs-search-two-pane__details">
  <button class="show-more-less-text__button">Show more</button>
  <div class="jobs-description__content">
    <p>We use Rust &amp; Go with Kubernetes.</p>
    <ul><li>Google experience is a plus</li><li>Competitive salary, bonus</li></ul>
  </div>
</div>
</body></html>"#;

    fn markers(document: &Document) -> usize {
        document.select(MARKER_SELECTOR).nodes().len()
    }

    #[test]
    fn marks_word_bounded_terms() {
        let mut report = HighlightReport::default();
        let html = mark_terms("Rust, C++ and Golang; not Google", &mut report).unwrap();
        assert_eq!(report.matches, 3);
        assert_eq!(report.per_tier.get("strong"), Some(&3));
        assert!(html.contains(">Rust</span>"));
        assert!(html.contains(">C++</span>"));
        assert!(html.contains(">Golang</span>"));
        assert!(html.ends_with("; not Google"));
    }

    #[test]
    fn longest_overlapping_term_wins() {
        let mut report = HighlightReport::default();
        let html = mark_terms("Spring Boot services", &mut report).unwrap();
        assert_eq!(report.matches, 1);
        assert!(html.contains(">Spring Boot</span>"));
    }

    #[test]
    fn text_without_terms_is_untouched() {
        let mut report = HighlightReport::default();
        assert!(mark_terms("Nothing relevant here", &mut report).is_none());
        assert_eq!(report.matches, 0);
    }

    #[test]
    fn highlights_description_once() {
        let document = Document::from(DETAILS);
        let first = process_job(&document).unwrap();
        assert_eq!(first.matches, 5);
        assert_eq!(markers(&document), 5);
        assert!(document.select("[data-processed=\"1\"]").exists());
        assert!(document
            .select("button.show-more-less-text__button[aria-expanded=\"true\"]")
            .exists());

        let second = highlight_skills(&document).unwrap();
        assert_eq!(second.matches, first.matches);
        assert_eq!(second.per_tier, first.per_tier);
        assert!(first.replaced_nodes > 0);
        assert!(second.replaced_nodes > 5);
        assert_eq!(markers(&document), 5);
    }

    #[test]
    fn missing_container_is_unavailable() {
        let document = Document::from("<html><body><p>Rust</p></body></html>");
        assert!(process_job(&document).is_none());
        assert_eq!(markers(&document), 0);
    }
}
