use crate::page::dom::{DomNode, DomSnapshot};
use crate::session::error::NavError;

/// Absolute scroll positions the viewport ops use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    Top,
    Middle,
    Bottom,
}

/// Seam to the live page.
///
/// Everything the executor does to a page goes through this trait: the
/// bridge subprocess implements it against a real browser, and `StaticPage`
/// implements it in memory so resolution and execution are testable without
/// one. Node handles come from the most recent `snapshot()`.
pub trait PageDriver {
    fn snapshot(&mut self) -> Result<DomSnapshot, NavError>;
    fn current_url(&mut self) -> Result<String, NavError>;
    fn fill(&mut self, node_ref: u32, value: &str) -> Result<(), NavError>;
    fn click(&mut self, node_ref: u32) -> Result<(), NavError>;
    fn scroll_into_view(&mut self, node_ref: u32) -> Result<(), NavError>;
    fn scroll_by(&mut self, delta_y: i32) -> Result<(), NavError>;
    fn scroll_to(&mut self, anchor: ScrollAnchor) -> Result<(), NavError>;
    fn zoom_level(&mut self) -> Result<f64, NavError>;
    fn set_zoom(&mut self, level: f64) -> Result<(), NavError>;
    fn navigate(&mut self, url: &str) -> Result<(), NavError>;
    fn open_new_tab(&mut self, url: &str) -> Result<(), NavError>;
    fn back(&mut self) -> Result<(), NavError>;
    fn forward(&mut self) -> Result<(), NavError>;
    fn reload(&mut self) -> Result<(), NavError>;
    fn print_page(&mut self) -> Result<(), NavError>;
    fn press_key(&mut self, key: &str) -> Result<(), NavError>;
    fn main_content_text(&mut self) -> Result<String, NavError>;
    fn wait(&mut self, ms: u64) -> Result<(), NavError>;
}

/// Scroll operations recorded by `StaticPage`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOp {
    By(i32),
    To(ScrollAnchor),
    IntoView(u32),
}

/// In-memory page behind the driver seam.
///
/// Holds a node list and records every mutation, so tests can assert what
/// an execution actually did. Fills are visible in later snapshots, the
/// way a real page would show them.
pub struct StaticPage {
    url: String,
    title: String,
    language: Option<String>,
    nodes: Vec<DomNode>,
    next_ref: u32,
    zoom: f64,
    main_text: String,
    pub filled: Vec<(u32, String)>,
    /// (node, event name) pairs: a raw "input" plus a framework-compatible
    /// "change" per successful write
    pub fired_events: Vec<(u32, String)>,
    pub clicked: Vec<u32>,
    pub scrolls: Vec<ScrollOp>,
    pub navigations: Vec<String>,
    pub new_tabs: Vec<String>,
    pub history_ops: Vec<String>,
    pub pressed_keys: Vec<String>,
    pub waits: Vec<u64>,
}

impl StaticPage {
    pub fn new(url: &str, title: &str) -> Self {
        StaticPage {
            url: url.to_string(),
            title: title.to_string(),
            language: None,
            nodes: Vec::new(),
            next_ref: 1,
            zoom: 1.0,
            main_text: String::new(),
            filled: Vec::new(),
            fired_events: Vec::new(),
            clicked: Vec::new(),
            scrolls: Vec::new(),
            navigations: Vec::new(),
            new_tabs: Vec::new(),
            history_ops: Vec::new(),
            pressed_keys: Vec::new(),
            waits: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Add a node, assigning its handle. Returns the handle so later nodes
    /// can reference it as their form or parent.
    pub fn push(&mut self, node: DomNode) -> u32 {
        let node_ref = self.next_ref;
        self.next_ref += 1;
        self.nodes.push(node.with_ref(node_ref));
        node_ref
    }

    pub fn set_main_text(&mut self, text: &str) {
        self.main_text = text.to_string();
    }

    pub fn node(&self, node_ref: u32) -> Option<&DomNode> {
        self.nodes.iter().find(|n| n.node_ref == node_ref)
    }

    /// Current value of a node, for asserting fills.
    pub fn value_of(&self, node_ref: u32) -> Option<&str> {
        self.node(node_ref).and_then(|n| n.value.as_deref())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    fn node_mut(&mut self, node_ref: u32) -> Result<&mut DomNode, NavError> {
        self.nodes
            .iter_mut()
            .find(|n| n.node_ref == node_ref)
            .ok_or_else(|| NavError::SessionProtocol {
                command: "node".into(),
                error: format!("No element with handle {}", node_ref),
            })
    }
}

impl PageDriver for StaticPage {
    fn snapshot(&mut self) -> Result<DomSnapshot, NavError> {
        Ok(DomSnapshot {
            url: self.url.clone(),
            title: self.title.clone(),
            language: self.language.clone(),
            nodes: self.nodes.clone(),
        })
    }

    fn current_url(&mut self) -> Result<String, NavError> {
        Ok(self.url.clone())
    }

    fn fill(&mut self, node_ref: u32, value: &str) -> Result<(), NavError> {
        let node = self.node_mut(node_ref)?;
        node.value = Some(value.to_string());
        self.filled.push((node_ref, value.to_string()));
        self.fired_events.push((node_ref, "input".to_string()));
        self.fired_events.push((node_ref, "change".to_string()));
        Ok(())
    }

    fn click(&mut self, node_ref: u32) -> Result<(), NavError> {
        self.node_mut(node_ref)?;
        self.clicked.push(node_ref);
        Ok(())
    }

    fn scroll_into_view(&mut self, node_ref: u32) -> Result<(), NavError> {
        self.node_mut(node_ref)?;
        self.scrolls.push(ScrollOp::IntoView(node_ref));
        Ok(())
    }

    fn scroll_by(&mut self, delta_y: i32) -> Result<(), NavError> {
        self.scrolls.push(ScrollOp::By(delta_y));
        Ok(())
    }

    fn scroll_to(&mut self, anchor: ScrollAnchor) -> Result<(), NavError> {
        self.scrolls.push(ScrollOp::To(anchor));
        Ok(())
    }

    fn zoom_level(&mut self) -> Result<f64, NavError> {
        Ok(self.zoom)
    }

    fn set_zoom(&mut self, level: f64) -> Result<(), NavError> {
        self.zoom = level;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), NavError> {
        self.navigations.push(url.to_string());
        self.url = url.to_string();
        Ok(())
    }

    fn open_new_tab(&mut self, url: &str) -> Result<(), NavError> {
        self.new_tabs.push(url.to_string());
        Ok(())
    }

    fn back(&mut self) -> Result<(), NavError> {
        self.history_ops.push("back".to_string());
        Ok(())
    }

    fn forward(&mut self) -> Result<(), NavError> {
        self.history_ops.push("forward".to_string());
        Ok(())
    }

    fn reload(&mut self) -> Result<(), NavError> {
        self.history_ops.push("reload".to_string());
        Ok(())
    }

    fn print_page(&mut self) -> Result<(), NavError> {
        self.history_ops.push("print".to_string());
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), NavError> {
        self.pressed_keys.push(key.to_string());
        Ok(())
    }

    fn main_content_text(&mut self) -> Result<String, NavError> {
        Ok(self.main_text.clone())
    }

    fn wait(&mut self, ms: u64) -> Result<(), NavError> {
        self.waits.push(ms);
        Ok(())
    }
}
