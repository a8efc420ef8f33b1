//! HTML entity decoding by rendering markup to plain text.
//!
//! Decoding parses the input as an HTML fragment and keeps only the rendered text, so entities
//! are resolved and tags disappear as a side effect. Rendering goes through a
//! [`RenderExecutor`]; any failure yields the input unchanged.

use std::sync::{mpsc, Arc};

use html_scraper::node::Node;
use html_scraper::Html;
use linkpeek_core::{Job, RenderExecutor};

use crate::executor::InlineExecutor;

/// Elements whose content is never rendered.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start on a new line.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Decode entities on the calling thread.
pub fn decode_entities(text: &str) -> String {
    render_or_original(text)
}

/// Render `html` as a fragment and return its text content.
pub fn render_plain_text(html: &str) -> String {
    let doc = Html::parse_fragment(html);
    let mut r = Renderer::default();
    let top: Vec<_> = doc.root_element().children().collect();
    let mut stack: Vec<Step<_>> = top.into_iter().rev().map(Step::Enter).collect();

    // Explicit stack: nesting depth comes from untrusted markup.
    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Enter(node) => node,
            Step::LeaveBlock => {
                r.pending_break = true;
                continue;
            }
        };
        match node.value() {
            Node::Text(t) => r.text(t),
            Node::Element(e) => {
                let name = e.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                if name == "br" {
                    r.out.push('\n');
                    r.pending_break = false;
                    continue;
                }
                if BLOCKS.contains(&name) {
                    r.pending_break = true;
                    stack.push(Step::LeaveBlock);
                }
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(Step::Enter));
            }
            _ => {}
        }
    }
    r.out
}

enum Step<N> {
    Enter(N),
    LeaveBlock,
}

fn render_or_original(text: &str) -> String {
    match std::panic::catch_unwind(|| render_plain_text(text)) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(len = text.len(), "html rendering panicked; keeping original text");
            text.to_string()
        }
    }
}

#[derive(Default)]
struct Renderer {
    out: String,
    pending_break: bool,
}

impl Renderer {
    fn text(&mut self, s: &str) {
        if s.is_empty() || (self.pending_break && s.trim().is_empty()) {
            return;
        }
        if self.pending_break && !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.pending_break = false;
        self.out.push_str(s);
    }
}

/// Entity decoder bound to a designated rendering context.
#[derive(Clone)]
pub struct EntityDecoder {
    executor: Arc<dyn RenderExecutor>,
}

impl std::fmt::Debug for EntityDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDecoder").finish_non_exhaustive()
    }
}

impl Default for EntityDecoder {
    fn default() -> Self {
        Self::inline()
    }
}

impl EntityDecoder {
    pub fn new(executor: Arc<dyn RenderExecutor>) -> Self {
        Self { executor }
    }

    pub fn inline() -> Self {
        Self::new(Arc::new(InlineExecutor))
    }

    /// Decode `text`, handing off to the designated context unless already on it.
    ///
    /// Blocks until the rendered text is available. Returns `text` unchanged if the job
    /// cannot be submitted, is dropped without running, or rendering fails.
    pub fn decode(&self, text: &str) -> String {
        if self.executor.is_current() {
            return render_or_original(text);
        }

        let (tx, rx) = mpsc::sync_channel::<String>(1);
        let owned = text.to_string();
        let job: Job = Box::new(move || {
            let _ = tx.send(render_or_original(&owned));
        });
        if let Err(e) = self.executor.execute(job) {
            tracing::warn!(error = %e, "render hand-off failed; keeping original text");
            return text.to_string();
        }
        match rx.recv() {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("render job dropped before replying; keeping original text");
                text.to_string()
            }
        }
    }

    /// Async form of [`decode`](Self::decode): the blocking hand-off runs on tokio's blocking
    /// pool so the calling task's worker stays free.
    pub async fn decode_async(&self, text: String) -> String {
        let decoder = self.clone();
        let fallback = text.clone();
        match tokio::task::spawn_blocking(move || decoder.decode(&text)).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "blocking decode task failed; keeping original text");
                fallback
            }
        }
    }
}
