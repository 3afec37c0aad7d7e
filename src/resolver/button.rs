use crate::page::dom::{DomNode, DomSnapshot};
use crate::page::page_model::{
    ButtonModel, FormModel, InteractableModel, PageModel, SYNTH_BUTTON_PREFIX,
};
use crate::resolver::field::live_form_scope;
use crate::resolver::{contains_ci, eq_ci};

/// Find the live element for a spoken click target.
///
/// Three rings, cascading: catalogued form buttons, then the interactables
/// list, then every clickable-role element page-wide. "submit" matches any
/// submit-typed button and "subscribe" gets the same treatment because both
/// words dominate spoken click commands out of all proportion to how often
/// they appear verbatim in button text.
pub fn locate_button_or_link(
    target: &str,
    model: &PageModel,
    snapshot: &DomSnapshot,
) -> Option<u32> {
    let target = target.to_lowercase();

    for form in &model.forms {
        if let Some(button) = form.buttons.iter().find(|b| button_matches(b, &target)) {
            // A catalogue hit that resolves to nothing live falls through
            // to the next form rather than ending the search.
            if let Some(node) = live_form_button(button, form, model, snapshot) {
                return Some(node);
            }
        }
    }

    if let Some(interactable) = model
        .interactables
        .iter()
        .find(|i| interactable_matches(i, &target))
    {
        if let Some(node) = live_interactable(interactable, snapshot) {
            return Some(node);
        }
    }

    page_wide_scan(&target, snapshot)
}

fn button_matches(button: &ButtonModel, target: &str) -> bool {
    button.text.to_lowercase().contains(target)
        || button.r#type.to_lowercase().contains(target)
        || button.id.to_lowercase().contains(target)
        || contains_ci(button.name.as_deref(), target)
        || (target.contains("submit") && button.r#type == "submit")
        || (target.contains("subscribe")
            && (button.text.to_lowercase().contains("subscribe")
                || button.id.to_lowercase().contains("subscribe")
                || contains_ci(button.name.as_deref(), "subscribe")))
}

fn live_form_button(
    button: &ButtonModel,
    form: &FormModel,
    model: &PageModel,
    snapshot: &DomSnapshot,
) -> Option<u32> {
    if !button.id.starts_with(SYNTH_BUTTON_PREFIX) {
        if let Some(node) = snapshot
            .nodes
            .iter()
            .find(|n| n.id.as_deref() == Some(button.id.as_str()))
        {
            return Some(node.node_ref);
        }
    }

    if let Some(name) = &button.name {
        let found = snapshot.nodes.iter().find(|n| {
            matches!(n.tag.as_str(), "button" | "input")
                && n.name.as_deref() == Some(name.as_str())
        });
        if let Some(node) = found {
            return Some(node.node_ref);
        }
    }

    let found = snapshot
        .nodes
        .iter()
        .filter(|n| is_button_element(n))
        .find(|n| {
            eq_ci(non_empty(n.text.as_deref()), &button.text.to_lowercase())
                || eq_ci(n.value.as_deref(), &button.text.to_lowercase())
        });
    if let Some(node) = found {
        return Some(node.node_ref);
    }

    // Last resort: the live form's first submit-capable button
    let scope = live_form_scope(form, model, snapshot)?;
    snapshot
        .nodes
        .iter()
        .filter(|n| n.form_ref == Some(scope))
        .find(|n| is_submit_capable(n))
        .map(|n| n.node_ref)
}

fn interactable_matches(interactable: &InteractableModel, target: &str) -> bool {
    interactable.text.to_lowercase().contains(target)
        || contains_ci(interactable.aria_label.as_deref(), target)
        || (target.contains("subscribe")
            && (interactable.text.to_lowercase().contains("subscribe")
                || contains_ci(interactable.aria_label.as_deref(), "subscribe")))
}

fn live_interactable(interactable: &InteractableModel, snapshot: &DomSnapshot) -> Option<u32> {
    if let Some(id) = &interactable.id {
        if let Some(node) = snapshot
            .nodes
            .iter()
            .find(|n| n.id.as_deref() == Some(id.as_str()))
        {
            return Some(node.node_ref);
        }
    }

    if interactable.text.is_empty() {
        return None;
    }
    let wanted = interactable.text.to_lowercase();
    snapshot
        .nodes
        .iter()
        .filter(|n| is_button_element(n) || n.tag == "a")
        .find(|n| eq_ci(non_empty(n.text.as_deref()), &wanted))
        .map(|n| n.node_ref)
}

fn page_wide_scan(target: &str, snapshot: &DomSnapshot) -> Option<u32> {
    let clickables: Vec<&DomNode> = snapshot
        .nodes
        .iter()
        .filter(|n| is_clickable_role(n))
        .collect();

    let exact = clickables
        .iter()
        .find(|n| n.display_text().trim().eq_ignore_ascii_case(target));
    if let Some(node) = exact {
        return Some(node.node_ref);
    }

    clickables
        .iter()
        .find(|n| {
            let text = n.display_text().trim().to_lowercase();
            text.contains(target)
                || contains_ci(n.aria_label.as_deref(), target)
                || (target.contains("subscribe")
                    && (text.contains("subscribe")
                        || contains_ci(n.aria_label.as_deref(), "subscribe")))
                || (target.contains("submit") && n.r#type.as_deref() == Some("submit"))
        })
        .map(|n| n.node_ref)
}

fn is_button_element(node: &DomNode) -> bool {
    node.tag == "button"
        || (node.tag == "input"
            && matches!(node.r#type.as_deref(), Some("submit") | Some("button")))
}

fn is_clickable_role(node: &DomNode) -> bool {
    is_button_element(node) || node.role.as_deref() == Some("button")
}

fn is_submit_capable(node: &DomNode) -> bool {
    match node.tag.as_str() {
        "button" => node.r#type.as_deref() != Some("button"),
        "input" => node.r#type.as_deref() == Some("submit"),
        _ => false,
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
