use crate::page::builder::is_eligible_field;
use crate::page::dom::{DomNode, DomSnapshot};
use crate::page::page_model::{FieldModel, FormModel, PageModel, SYNTH_FIELD_PREFIX, SYNTH_FORM_PREFIX};
use crate::resolver::contains_ci;

/// Match a requested key against a form's field catalogue.
///
/// Case-insensitive. An exact type match is tried first (so "email" finds
/// the email-typed field even when its name disagrees), then the first
/// field whose name/label/id/placeholder/type contains the key, scanning in
/// stored page order.
pub fn resolve_field<'a>(form: &'a FormModel, key: &str) -> Option<&'a FieldModel> {
    let key = key.to_lowercase();

    if let Some(field) = form.fields.iter().find(|f| f.r#type == key) {
        return Some(field);
    }

    form.fields.iter().find(|f| {
        f.name.to_lowercase().contains(&key)
            || contains_ci(f.label.as_deref(), &key)
            || f.id.to_lowercase().contains(&key)
            || contains_ci(f.placeholder.as_deref(), &key)
            || f.r#type.to_lowercase().contains(&key)
    })
}

/// Find the live element for a catalogued field.
///
/// The model may be stale, so every strategy re-queries the fresh snapshot.
/// Ordered cascade, first success wins:
/// 1. email uniqueness: a single email-typed input page-wide, or an
///    email-typed input inside the live form when there are several;
/// 2. exact name attribute (synthesized names skipped);
/// 3. exact id (synthesized ids skipped);
/// 4. label text equality/containment, through the label's for-target or a
///    field nested inside it;
/// 5. placeholder substring;
/// 6. the stored index into the live form's eligible inputs.
pub fn locate_live_field(
    field: &FieldModel,
    form: &FormModel,
    model: &PageModel,
    snapshot: &DomSnapshot,
) -> Option<u32> {
    if field.r#type == "email" {
        let emails: Vec<&DomNode> = snapshot
            .nodes
            .iter()
            .filter(|n| n.tag == "input" && n.r#type.as_deref() == Some("email"))
            .collect();
        if emails.len() == 1 {
            return Some(emails[0].node_ref);
        }
        if emails.len() > 1 {
            if let Some(scope) = live_form_scope(form, model, snapshot) {
                if let Some(node) = emails.iter().find(|n| n.form_ref == Some(scope)) {
                    return Some(node.node_ref);
                }
            }
        }
    }

    if !field.name.starts_with(SYNTH_FIELD_PREFIX) {
        let found = snapshot.nodes.iter().find(|n| {
            matches!(n.tag.as_str(), "input" | "select" | "textarea")
                && n.name.as_deref() == Some(field.name.as_str())
        });
        if let Some(node) = found {
            return Some(node.node_ref);
        }
    }

    if !field.id.starts_with(SYNTH_FIELD_PREFIX) {
        let found = snapshot
            .nodes
            .iter()
            .find(|n| n.id.as_deref() == Some(field.id.as_str()));
        if let Some(node) = found {
            return Some(node.node_ref);
        }
    }

    if let Some(label) = &field.label {
        if let Some(node) = locate_by_label(label, snapshot) {
            return Some(node);
        }
    }

    if let Some(placeholder) = &field.placeholder {
        let found = snapshot.nodes.iter().find(|n| {
            matches!(n.tag.as_str(), "input" | "textarea")
                && n.placeholder
                    .as_deref()
                    .is_some_and(|p| p.contains(placeholder.as_str()))
        });
        if let Some(node) = found {
            return Some(node.node_ref);
        }
    }

    let scope = live_form_scope(form, model, snapshot)?;
    snapshot
        .nodes
        .iter()
        .filter(|n| n.form_ref == Some(scope) && is_eligible_field(n))
        .nth(field.index)
        .map(|n| n.node_ref)
}

fn locate_by_label(label: &str, snapshot: &DomSnapshot) -> Option<u32> {
    let wanted = label.to_lowercase();
    let live_label = snapshot.nodes.iter().find(|n| {
        if n.tag != "label" {
            return false;
        }
        match &n.text {
            Some(t) => {
                let t = t.trim().to_lowercase();
                t == wanted || t.contains(&wanted)
            }
            None => false,
        }
    })?;

    if let Some(target_id) = &live_label.for_target {
        if let Some(node) = snapshot
            .nodes
            .iter()
            .find(|n| n.id.as_deref() == Some(target_id.as_str()))
        {
            return Some(node.node_ref);
        }
    }

    // No for-target: take a field nested inside the label
    snapshot
        .nodes
        .iter()
        .find(|n| {
            matches!(n.tag.as_str(), "input" | "select" | "textarea")
                && snapshot
                    .ancestors(n.node_ref)
                    .any(|a| a.node_ref == live_label.node_ref)
        })
        .map(|n| n.node_ref)
}

/// Resolve a catalogued form to its live counterpart: by id when the id is
/// real, by build position otherwise.
pub fn live_form_scope(
    form: &FormModel,
    model: &PageModel,
    snapshot: &DomSnapshot,
) -> Option<u32> {
    if !form.id.starts_with(SYNTH_FORM_PREFIX) {
        if let Some(node) = snapshot
            .nodes
            .iter()
            .find(|n| n.tag == "form" && n.id.as_deref() == Some(form.id.as_str()))
        {
            return Some(node.node_ref);
        }
    }

    let position = model.form_position(form)?;
    snapshot
        .nodes
        .iter()
        .filter(|n| n.tag == "form")
        .nth(position)
        .map(|n| n.node_ref)
}
