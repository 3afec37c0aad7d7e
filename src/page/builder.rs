use crate::page::dom::{DomNode, DomSnapshot};
use crate::page::page_model::{
    ButtonModel, FieldModel, FormModel, InteractableModel, LandmarkModel, LinkModel, PageInfo,
    PageModel, SYNTH_BUTTON_PREFIX, SYNTH_FIELD_PREFIX, SYNTH_FORM_PREFIX,
};

/// Build the structural model of a page from a DOM extract.
///
/// Read-only and total: an empty or structure-free page yields a model with
/// empty lists, never an error. The label-resolution order (for-association,
/// then enclosing label, then aria-label) is part of the resolution contract
/// and must not change.
pub fn build_page_model(snapshot: &DomSnapshot) -> PageModel {
    let forms = snapshot
        .nodes
        .iter()
        .filter(|n| n.tag == "form")
        .enumerate()
        .map(|(i, form)| build_form(form, i, snapshot))
        .collect();

    let nav_links = snapshot
        .nodes
        .iter()
        .filter(|n| n.tag == "a" && in_nav_container(n, snapshot))
        .map(|n| LinkModel {
            text: n.display_text().trim().to_string(),
            href: n.href.clone(),
            id: clean(&n.id),
            aria_label: clean(&n.aria_label),
        })
        .collect();

    let interactables = snapshot
        .nodes
        .iter()
        .filter(|n| is_interactable(n))
        .map(|n| InteractableModel {
            r#type: "button".to_string(),
            text: interactable_text(n),
            id: clean(&n.id),
            aria_label: clean(&n.aria_label),
            selector: derive_selector(n),
        })
        .collect();

    let landmarks = snapshot
        .nodes
        .iter()
        .filter(|n| n.role.is_some() || is_semantic_landmark(&n.tag))
        .map(|n| LandmarkModel {
            role: n.role.clone().unwrap_or_else(|| n.tag.clone()),
            label: clean(&n.aria_label),
            element: n.tag.clone(),
        })
        .collect();

    PageModel {
        forms,
        nav_links,
        interactables,
        landmarks,
        page_info: PageInfo {
            title: snapshot.title.clone(),
            url: snapshot.url.clone(),
            language: snapshot
                .language
                .clone()
                .unwrap_or_else(|| "en".to_string()),
        },
    }
}

fn build_form(form: &DomNode, position: usize, snapshot: &DomSnapshot) -> FormModel {
    let mut fields = Vec::new();
    let mut buttons = Vec::new();

    for node in snapshot.nodes.iter().filter(|n| n.form_ref == Some(form.node_ref)) {
        if is_eligible_field(node) {
            let index = fields.len();
            fields.push(build_field(node, index, snapshot));
        } else if is_form_button(node) {
            let ordinal = buttons.len();
            buttons.push(build_button(node, ordinal));
        }
    }

    FormModel {
        id: clean(&form.id).unwrap_or_else(|| format!("{}{}", SYNTH_FORM_PREFIX, position)),
        action_url: clean(&form.action),
        method: clean(&form.method).unwrap_or_else(|| "get".to_string()),
        fields,
        buttons,
    }
}

fn build_field(node: &DomNode, index: usize, snapshot: &DomSnapshot) -> FieldModel {
    let id = clean(&node.id).unwrap_or_else(|| format!("{}{}", SYNTH_FIELD_PREFIX, index));
    let name = clean(&node.name)
        .or_else(|| clean(&node.id))
        .unwrap_or_else(|| format!("{}{}", SYNTH_FIELD_PREFIX, index));

    FieldModel {
        id,
        name,
        r#type: field_type(node),
        label: find_label(node, snapshot),
        placeholder: clean(&node.placeholder),
        required: node.required,
        current_value: node.value.clone().unwrap_or_default(),
        index,
    }
}

fn build_button(node: &DomNode, ordinal: usize) -> ButtonModel {
    let text = match node.display_text().trim() {
        "" => "Submit".to_string(),
        t => t.to_string(),
    };

    ButtonModel {
        r#type: button_type(node),
        text,
        id: clean(&node.id).unwrap_or_else(|| format!("{}{}", SYNTH_BUTTON_PREFIX, ordinal)),
        name: clean(&node.name),
    }
}

/// Label resolution, in fixed priority order:
/// 1. a label element whose for-attribute targets the field's id,
/// 2. an enclosing label element's text,
/// 3. the field's own aria-label.
fn find_label(node: &DomNode, snapshot: &DomSnapshot) -> Option<String> {
    if let Some(id) = clean(&node.id) {
        let associated = snapshot
            .nodes
            .iter()
            .find(|n| n.tag == "label" && n.for_target.as_deref() == Some(id.as_str()));
        if let Some(label) = associated {
            if let Some(text) = clean(&label.text) {
                return Some(text);
            }
        }
    }

    if let Some(enclosing) = snapshot.ancestors(node.node_ref).find(|a| a.tag == "label") {
        if let Some(text) = clean(&enclosing.text) {
            return Some(text);
        }
    }

    clean(&node.aria_label)
}

/// Eligible form inputs: everything except hidden/submit/button/reset.
/// The same filter defines `FieldModel.index`, so the resolver's positional
/// fallback must use this exact predicate.
pub fn is_eligible_field(node: &DomNode) -> bool {
    match node.tag.as_str() {
        "select" | "textarea" => true,
        "input" => !matches!(
            node.r#type.as_deref(),
            Some("hidden") | Some("submit") | Some("button") | Some("reset")
        ),
        _ => false,
    }
}

pub fn is_form_button(node: &DomNode) -> bool {
    match node.tag.as_str() {
        "button" => true,
        "input" => matches!(node.r#type.as_deref(), Some("submit") | Some("button")),
        _ => false,
    }
}

fn field_type(node: &DomNode) -> String {
    if let Some(t) = clean(&node.r#type) {
        return t.to_lowercase();
    }
    match node.tag.as_str() {
        "select" => "select".to_string(),
        "textarea" => "textarea".to_string(),
        _ => "text".to_string(),
    }
}

/// Button elements default to submit behavior unless explicitly typed.
pub fn button_type(node: &DomNode) -> String {
    clean(&node.r#type)
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| "submit".to_string())
}

fn in_nav_container(node: &DomNode, snapshot: &DomSnapshot) -> bool {
    snapshot
        .ancestors(node.node_ref)
        .any(|a| a.tag == "nav" || a.role.as_deref() == Some("navigation"))
}

fn is_interactable(node: &DomNode) -> bool {
    if node.tag == "button" {
        return node.r#type.as_deref() != Some("hidden");
    }
    node.role.as_deref() == Some("button")
}

fn interactable_text(node: &DomNode) -> String {
    let text = node.display_text().trim();
    if !text.is_empty() {
        return text.to_string();
    }
    clean(&node.aria_label).unwrap_or_default()
}

fn is_semantic_landmark(tag: &str) -> bool {
    matches!(tag, "header" | "nav" | "main" | "footer" | "aside" | "section")
}

/// Derived CSS lookup key: id selector, else tag with up to three classes,
/// else bare tag.
fn derive_selector(node: &DomNode) -> String {
    if let Some(id) = clean(&node.id) {
        return format!("#{}", id);
    }
    if let Some(classes) = clean(&node.classes) {
        let picked: Vec<&str> = classes.split_whitespace().take(3).collect();
        if !picked.is_empty() {
            return format!("{}.{}", node.tag, picked.join("."));
        }
    }
    node.tag.clone()
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
