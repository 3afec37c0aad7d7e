use serde::{Deserialize, Serialize};

// ============================================================================
// Structural page model consumed by the resolver and the interpreter
// ============================================================================

/// Prefix of ids synthesized for fields that carry none in the markup.
/// Synthesized ids are positional, so live lookups must skip them.
pub const SYNTH_FIELD_PREFIX: &str = "field-";

/// Prefix of ids synthesized for buttons without one.
pub const SYNTH_BUTTON_PREFIX: &str = "button-";

/// Prefix of ids synthesized for forms without one.
pub const SYNTH_FORM_PREFIX: &str = "form-";

/// A single form input.
///
/// `index` is the field's ordinal among the form's eligible inputs
/// (hidden/submit/button/reset excluded) and is the last-resort resolution
/// key, so it must stay aligned with the eligibility filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(rename = "value")]
    pub current_value: String,
    pub index: usize,
}

/// A button attached to a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonModel {
    pub r#type: String,
    pub text: String,
    pub id: String,
    pub name: Option<String>,
}

/// One form with its fields in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormModel {
    pub id: String,
    pub action_url: Option<String>,
    pub method: String,
    pub fields: Vec<FieldModel>,
    pub buttons: Vec<ButtonModel>,
}

/// A navigation link found inside a nav container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkModel {
    pub text: String,
    pub href: Option<String>,
    pub id: Option<String>,
    pub aria_label: Option<String>,
}

/// A clickable element outside the form/nav structure.
///
/// `selector` is a derived lookup key, not an ownership reference: the live
/// tree may differ from the snapshot by the time it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractableModel {
    pub r#type: String,
    pub text: String,
    pub id: Option<String>,
    pub aria_label: Option<String>,
    pub selector: String,
}

/// An accessibility landmark region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkModel {
    pub role: String,
    pub label: Option<String>,
    pub element: String,
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub language: String,
}

/// Structural snapshot of the current page.
///
/// Built wholesale by `build_page_model` on load and on detected content
/// change; never patched incrementally. Staleness is tolerated because
/// resolution re-queries the live tree at use time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub forms: Vec<FormModel>,
    pub nav_links: Vec<LinkModel>,
    pub interactables: Vec<InteractableModel>,
    pub landmarks: Vec<LandmarkModel>,
    pub page_info: PageInfo,
}

impl PageModel {
    /// Model of a page with no recognized structure.
    pub fn empty(url: &str, title: &str) -> Self {
        PageModel {
            forms: Vec::new(),
            nav_links: Vec::new(),
            interactables: Vec::new(),
            landmarks: Vec::new(),
            page_info: PageInfo {
                title: title.to_string(),
                url: url.to_string(),
                language: "en".to_string(),
            },
        }
    }

    /// Position of a form in the model, for positional live scoping.
    pub fn form_position(&self, form: &FormModel) -> Option<usize> {
        self.forms.iter().position(|f| f.id == form.id)
    }
}
