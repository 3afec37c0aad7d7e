use crate::page::dom::{DomNode, DomSnapshot};
use crate::page::page_model::{LinkModel, PageModel};
use crate::resolver::routes::RouteIndex;
use crate::resolver::eq_ci;

/// Page families that get a scoring boost when the keyword appears on both
/// the spoken destination and the link side.
const DOMAIN_SYNONYMS: [&str; 4] = ["about", "contact", "product", "pricing"];

/// Minimum weighted score for a full-document scan hit to count.
const ACCEPT_THRESHOLD: i32 = 20;

/// Where a navigation request should go.
#[derive(Debug, Clone, PartialEq)]
pub enum NavTarget {
    /// A route-index hit: navigate to this path in place.
    Path(String),
    /// A live link element and its href; `external` means a different host,
    /// which opens in a new context instead of replacing the page.
    Link {
        node_ref: u32,
        href: String,
        external: bool,
    },
}

/// Resolve a spoken destination to a navigation target.
///
/// Three steps: the static route index, the catalogued nav links
/// (containment both ways plus domain synonyms), then a weighted scan of
/// every link in the document. The last step is not a first-match cascade:
/// candidates accumulate scores and the best one wins only above a
/// threshold.
pub fn locate_navigation_target(
    destination: &str,
    model: &PageModel,
    snapshot: &DomSnapshot,
    routes: &RouteIndex,
) -> Option<NavTarget> {
    let dest = destination.trim().to_lowercase();
    if dest.is_empty() {
        return None;
    }

    if let Some(route) = routes.find_route(&dest) {
        return Some(NavTarget::Path(route.path.clone()));
    }

    if let Some(nav_link) = model.nav_links.iter().find(|l| nav_link_matches(l, &dest)) {
        if let Some(target) = live_nav_link(nav_link, snapshot) {
            return Some(target);
        }
    }

    scored_document_scan(&dest, snapshot)
}

fn nav_link_matches(link: &LinkModel, dest: &str) -> bool {
    let text = link.text.to_lowercase();
    let aria = link
        .aria_label
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let href = link
        .href
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if text.is_empty() && aria.is_empty() && href.is_empty() {
        return false;
    }

    if !text.is_empty()
        && (text.contains(dest)
            || dest.contains(&text)
            || DOMAIN_SYNONYMS
                .iter()
                .any(|kw| dest.contains(kw) && text.contains(kw))
            || (dest.contains("home") && text == "home"))
    {
        return true;
    }

    if !aria.is_empty()
        && (aria.contains(dest)
            || dest.contains(&aria)
            || DOMAIN_SYNONYMS
                .iter()
                .any(|kw| dest.contains(kw) && aria.contains(kw)))
    {
        return true;
    }

    !href.is_empty()
        && (href.contains(&slug(dest)) || href.contains(&dest.replace(' ', "")))
}

/// Resolve a catalogued nav link to a live anchor: href exact, then href
/// containment, then exact text, then exact aria-label.
fn live_nav_link(link: &LinkModel, snapshot: &DomSnapshot) -> Option<NavTarget> {
    let anchors: Vec<&DomNode> = snapshot
        .nodes
        .iter()
        .filter(|n| n.tag == "a" && n.href.is_some())
        .collect();

    if let Some(href) = &link.href {
        if let Some(node) = anchors
            .iter()
            .find(|n| n.href.as_deref() == Some(href.as_str()))
        {
            return Some(to_target(node, snapshot));
        }
        if let Some(node) = anchors
            .iter()
            .find(|n| n.href.as_deref().is_some_and(|h| h.contains(href.as_str())))
        {
            return Some(to_target(node, snapshot));
        }
    }

    if !link.text.is_empty() {
        if let Some(node) = anchors
            .iter()
            .find(|n| eq_ci(n.text.as_deref().map(str::trim), &link.text.to_lowercase()))
        {
            return Some(to_target(node, snapshot));
        }
    }

    if let Some(aria) = &link.aria_label {
        if let Some(node) = anchors
            .iter()
            .find(|n| eq_ci(n.aria_label.as_deref(), &aria.to_lowercase()))
        {
            return Some(to_target(node, snapshot));
        }
    }

    None
}

fn scored_document_scan(dest: &str, snapshot: &DomSnapshot) -> Option<NavTarget> {
    let anchors: Vec<&DomNode> = snapshot
        .nodes
        .iter()
        .filter(|n| n.tag == "a" && n.href.is_some())
        .collect();

    // Exact equality short-circuits the scoring pass
    let exact = anchors.iter().find(|n| {
        eq_ci(n.text.as_deref().map(str::trim), dest) || eq_ci(n.aria_label.as_deref(), dest)
    });
    if let Some(node) = exact {
        return Some(to_target(node, snapshot));
    }

    let mut best: Option<(&DomNode, i32)> = None;
    for node in &anchors {
        let score = score_link(node, dest);
        // Strictly-greater keeps the first-found candidate on ties
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((node, score));
        }
    }

    match best {
        Some((node, score)) if score > ACCEPT_THRESHOLD => Some(to_target(node, snapshot)),
        _ => None,
    }
}

/// Weighted relevance of one link for a destination. Structural signals
/// (exact text, URL slug) outweigh loose containment; links with no
/// readable text at all are penalized below the acceptance threshold.
fn score_link(node: &DomNode, dest: &str) -> i32 {
    let text = node
        .text
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_default();
    let aria = node
        .aria_label
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let href = node
        .href
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut score = 0;

    if text == dest || aria == dest {
        score += 100;
    }
    if !text.is_empty() && text.contains(dest) {
        score += 50;
    }
    if text.len() > 2 && dest.contains(&text) {
        score += 30;
    }
    if !aria.is_empty() && aria.contains(dest) {
        score += 40;
    }
    if aria.len() > 2 && dest.contains(&aria) {
        score += 25;
    }

    let path = href_path(&href);
    if path.contains(&slug(dest)) {
        score += 35;
    }
    if path.contains(&dest.replace(' ', "")) {
        score += 30;
    }

    for kw in DOMAIN_SYNONYMS {
        if dest.contains(kw) && (text.contains(kw) || aria.contains(kw) || href.contains(kw)) {
            score += 60;
        }
    }
    if dest.contains("home")
        && (href == "/" || href.ends_with('/') || text == "home" || aria == "home")
    {
        score += 60;
    }

    if text.is_empty() && aria.is_empty() {
        score -= 50;
    }

    score
}

fn to_target(node: &DomNode, snapshot: &DomSnapshot) -> NavTarget {
    let href = node.href.clone().unwrap_or_default();
    NavTarget::Link {
        node_ref: node.node_ref,
        external: is_external(&href, &snapshot.url),
        href,
    }
}

/// A link is external when its host differs from the current page's.
/// Relative hrefs are always same-host.
pub fn is_external(href: &str, current_url: &str) -> bool {
    match (host_of(href), host_of(current_url)) {
        (Some(link_host), Some(page_host)) => !link_host.eq_ignore_ascii_case(page_host),
        _ => false,
    }
}

fn host_of(url: &str) -> Option<&str> {
    let after_scheme = url.find("://").map(|i| i + 3)?;
    let rest = &url[after_scheme..];
    let end = rest
        .find(['/', '?', '#'])
        .unwrap_or(rest.len());
    let host = &rest[..end];
    // Strip userinfo and port
    let host = host.rsplit('@').next().unwrap_or(host);
    Some(host.split(':').next().unwrap_or(host))
}

/// Path component of an href, for slug matching. Absolute URLs lose their
/// scheme and host; queries and fragments are dropped.
fn href_path(href: &str) -> String {
    let without_origin = match href.find("://") {
        Some(i) => {
            let rest = &href[i + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => href,
    };
    without_origin
        .split(['?', '#'])
        .next()
        .unwrap_or(without_origin)
        .to_string()
}

fn slug(dest: &str) -> String {
    dest.split_whitespace().collect::<Vec<_>>().join("-")
}
