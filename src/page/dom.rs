use serde::Deserialize;

fn default_true() -> bool {
    true
}

/// One element from the bridge's DOM extract, in document order.
///
/// `node_ref` is the bridge-assigned handle for follow-up actions (fill,
/// click, scroll-into-view). Handles stay valid until the page navigates;
/// a fresh extract reissues them.
#[derive(Debug, Clone, Deserialize)]
pub struct DomNode {
    #[serde(rename = "ref")]
    pub node_ref: u32,
    pub tag: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "ariaLabel")]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    /// Form element's action attribute
    #[serde(default)]
    pub action: Option<String>,
    /// Form element's method attribute
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Space-separated class attribute, as written in the markup
    #[serde(default)]
    pub classes: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Handle of the owning form element, for fields and buttons
    #[serde(default, rename = "form")]
    pub form_ref: Option<u32>,
    /// Handle of the parent element, for ancestry checks (enclosing labels,
    /// nav containers)
    #[serde(default)]
    pub parent: Option<u32>,
    /// A label element's for-attribute target id
    #[serde(default, rename = "for")]
    pub for_target: Option<String>,
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        DomNode {
            node_ref: 0,
            tag: tag.to_string(),
            r#type: None,
            id: None,
            name: None,
            text: None,
            aria_label: None,
            placeholder: None,
            value: None,
            href: None,
            action: None,
            method: None,
            role: None,
            classes: None,
            required: false,
            disabled: false,
            visible: true,
            form_ref: None,
            parent: None,
            for_target: None,
        }
    }

    pub fn with_ref(mut self, node_ref: u32) -> Self {
        self.node_ref = node_ref;
        self
    }

    pub fn with_type(mut self, t: &str) -> Self {
        self.r#type = Some(t.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_aria_label(mut self, label: &str) -> Self {
        self.aria_label = Some(label.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_classes(mut self, classes: &str) -> Self {
        self.classes = Some(classes.to_string());
        self
    }

    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_parent(mut self, parent_ref: u32) -> Self {
        self.parent = Some(parent_ref);
        self
    }

    pub fn in_form(mut self, form_ref: u32) -> Self {
        self.form_ref = Some(form_ref);
        self
    }

    pub fn with_for_target(mut self, target_id: &str) -> Self {
        self.for_target = Some(target_id.to_string());
        self
    }

    /// Visible text for matching: text content first, then value attribute.
    pub fn display_text(&self) -> &str {
        match &self.text {
            Some(t) if !t.is_empty() => t,
            _ => self.value.as_deref().unwrap_or(""),
        }
    }
}

/// Full extract of the current page, as the bridge reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct DomSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub language: Option<String>,
    pub nodes: Vec<DomNode>,
}

impl DomSnapshot {
    pub fn new(url: &str, title: &str, nodes: Vec<DomNode>) -> Self {
        DomSnapshot {
            url: url.to_string(),
            title: title.to_string(),
            language: None,
            nodes,
        }
    }

    pub fn node(&self, node_ref: u32) -> Option<&DomNode> {
        self.nodes.iter().find(|n| n.node_ref == node_ref)
    }

    /// Walk the parent chain of a node, yielding ancestors nearest-first.
    pub fn ancestors(&self, node_ref: u32) -> AncestorIter<'_> {
        AncestorIter {
            snapshot: self,
            current: self.node(node_ref).and_then(|n| n.parent),
        }
    }
}

pub struct AncestorIter<'a> {
    snapshot: &'a DomSnapshot,
    current: Option<u32>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.snapshot.node(self.current?)?;
        self.current = node.parent;
        Some(node)
    }
}
