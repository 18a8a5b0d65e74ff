use dom_query::{Document, NodeRef, Selection};

use crate::{
    domain::{DismissHook, Visibility},
    filter::watcher::{MutationRecord, MutationSink},
    highlight::{self, HighlightReport},
};

use super::{CardHandle, CardMarkup, JobBoard};

const CARD_SELECTOR: &str = "li[data-occludable-job-id]";
const CARD_ID_ATTR: &str = "data-occludable-job-id";
const DETAIL_SELECTOR: &str = "div.job-card-container[data-job-id]";
const PROMOTED_SELECTOR: &str = ".job-card-container__footer-item--highlighted";
const TITLE_SELECTOR: &str = "a.job-card-list__title--link";
const ACTIONS_SELECTOR: &str = ".job-card-list__actions-container";
const DISMISS_SELECTOR: &str = r#"button[aria-label*="Dismiss"]"#;
const BLOCK_CONTROL_SELECTOR: &str = "button.block-phrase-btn";
const BLOCK_CONTROL_HTML: &str =
    r#"<button class="block-phrase-btn" title="Block this job title">🚫</button>"#;
const HOOK_ATTR: &str = "data-next";
const CURRENT_ATTR: &str = "aria-current";
const BLOCK_TAGS: [&str; 28] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "section", "ul",
];

/// Job list backed by a parsed HTML document.
pub struct HtmlBoard {
    document: Document,
    sink: Option<MutationSink>,
}

impl HtmlBoard {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Document::from(html),
            sink: None,
        }
    }

    pub fn observed_by(mut self, sink: MutationSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Swaps in a re-rendered page; observers see it as one subtree change.
    pub fn replace_document(&mut self, html: &str) {
        let removed = self.document.select(CARD_SELECTOR).nodes().len();
        self.document = Document::from(html);
        let added = self.document.select(CARD_SELECTOR).nodes().len();
        self.notify(MutationRecord::replaced(removed, added));
    }

    /// Runs the skills highlighter over the open job's description. Rewritten
    /// text reaches observers as one subtree change.
    pub fn highlight_description(&self) -> Option<HighlightReport> {
        let report = highlight::process_job(&self.document)?;
        if report.replaced_nodes > 0 {
            self.notify(MutationRecord::replaced(
                report.replaced_nodes,
                report.replaced_nodes,
            ));
        }
        Some(report)
    }

    pub fn html(&self) -> String {
        self.document.html().to_string()
    }

    fn notify(&self, record: MutationRecord) {
        if let Some(sink) = &self.sink {
            sink.record(record);
        }
    }

    fn card(&self, handle: &CardHandle) -> Option<Selection<'_>> {
        self.document
            .select(CARD_SELECTOR)
            .iter()
            .nth(handle.position)
            .filter(|card| card.attr(CARD_ID_ATTR).as_deref() == Some(handle.identity.as_str()))
    }
}

impl JobBoard for HtmlBoard {
    fn cards(&self) -> Vec<CardHandle> {
        self.document
            .select(CARD_SELECTOR)
            .iter()
            .enumerate()
            .filter_map(|(position, card)| {
                card.attr(CARD_ID_ATTR)
                    .map(|id| CardHandle::new(position, id.to_string()))
            })
            .collect()
    }

    fn read_card(&self, handle: &CardHandle) -> Option<CardMarkup> {
        let card = self.card(handle)?;
        let detail = card.select(DETAIL_SELECTOR).first();
        if !detail.exists() {
            return None;
        }

        let title = card.select(TITLE_SELECTOR).first();
        let (title_text, title_emphasis) = if title.exists() {
            let emphasis = title.select("strong").first();
            (
                Some(title.text().trim().to_string()),
                emphasis
                    .exists()
                    .then(|| emphasis.text().trim().to_string()),
            )
        } else {
            (None, None)
        };

        let dismiss = card.select(DISMISS_SELECTOR).first();
        let dismiss = if !dismiss.exists() {
            DismissHook::Absent
        } else if dismiss.attr(HOOK_ATTR).is_some_and(|v| !v.is_empty()) {
            DismissHook::Hooked
        } else {
            DismissHook::Unhooked
        };

        Some(CardMarkup {
            detail_text: detail
                .nodes()
                .first()
                .map(rendered_text)
                .unwrap_or_default(),
            current: detail.attr(CURRENT_ATTR).map(|v| v.to_string()),
            promoted_marker: detail.select(PROMOTED_SELECTOR).exists(),
            title_text,
            title_emphasis,
            block_control: card.select(BLOCK_CONTROL_SELECTOR).exists(),
            dismiss,
        })
    }

    fn insert_block_control(&mut self, handle: &CardHandle) -> bool {
        let Some(card) = self.card(handle) else {
            return false;
        };
        if card.select(BLOCK_CONTROL_SELECTOR).exists() {
            return false;
        }
        let actions = card.select(ACTIONS_SELECTOR).first();
        if !actions.exists() {
            return false;
        }
        let host_control = actions.select("div").first();
        if host_control.exists() {
            host_control.before_html(BLOCK_CONTROL_HTML);
        } else {
            actions.prepend_html(BLOCK_CONTROL_HTML);
        }
        self.notify(MutationRecord::inserted(1));
        true
    }

    fn hook_dismiss(&mut self, handle: &CardHandle) -> bool {
        let Some(card) = self.card(handle) else {
            return false;
        };
        let dismiss = card.select(DISMISS_SELECTOR).first();
        if !dismiss.exists() || dismiss.attr(HOOK_ATTR).is_some_and(|v| !v.is_empty()) {
            return false;
        }
        dismiss.set_attr(HOOK_ATTR, "1");
        true
    }

    fn set_visibility(&mut self, handle: &CardHandle, visibility: Visibility) {
        let Some(card) = self.card(handle) else {
            return;
        };
        let current = card.attr("style").map(|s| s.to_string());
        let next = restyle(current.as_deref(), visibility);
        if current.as_deref().unwrap_or("") == next {
            return;
        }
        if next.is_empty() {
            card.remove_attr("style");
        } else {
            card.set_attr("style", &next);
        }
    }

    fn is_rendered(&self, handle: &CardHandle) -> bool {
        let Some(mut current) = self.card(handle) else {
            return false;
        };
        loop {
            if current.attr("style").is_some_and(|s| hides(&s)) {
                return false;
            }
            let parent = current.parent();
            if !parent.exists() {
                return true;
            }
            current = parent;
        }
    }

    fn activate(&mut self, handle: &CardHandle) -> bool {
        let Some(card) = self.card(handle) else {
            return false;
        };
        if !card.select(TITLE_SELECTOR).exists() {
            return false;
        }
        let previous = format!("{DETAIL_SELECTOR}[{CURRENT_ATTR}]");
        for detail in self.document.select(&previous).iter() {
            detail.remove_attr(CURRENT_ATTR);
        }
        card.select(DETAIL_SELECTOR)
            .first()
            .set_attr(CURRENT_ATTR, "page");
        true
    }
}

/// Text as laid out on screen: block elements sit on their own lines instead
/// of running into their neighbours.
fn rendered_text(node: &NodeRef) -> String {
    let mut out = String::new();
    push_rendered(node, &mut out);
    out.trim().to_string()
}

fn push_rendered(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            let block = child
                .node_name()
                .is_some_and(|name| BLOCK_TAGS.contains(&name.to_ascii_lowercase().as_str()));
            if block && !out.ends_with('\n') {
                out.push('\n');
            }
            push_rendered(&child, out);
            if block && !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

fn declarations(style: &str) -> impl Iterator<Item = &str> {
    style.split(';').map(str::trim).filter(|decl| !decl.is_empty())
}

fn is_display(decl: &str) -> bool {
    decl.split_once(':')
        .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case("display"))
}

fn hides(style: &str) -> bool {
    declarations(style).any(|decl| {
        decl.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("display")
                && value.trim().to_ascii_lowercase().starts_with("none")
        })
    })
}

/// Rewrites an inline style so that only the display declaration reflects
/// `visibility`; other declarations are kept in order.
fn restyle(style: Option<&str>, visibility: Visibility) -> String {
    let mut decls: Vec<&str> = declarations(style.unwrap_or(""))
        .filter(|decl| !is_display(decl))
        .collect();
    if !visibility.is_shown() {
        decls.push("display: none");
    }
    decls.join("; ")
}
