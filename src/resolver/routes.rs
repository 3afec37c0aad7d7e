use std::path::Path;

use serde::{Deserialize, Serialize};

/// One sitemap entry: a path and the spoken keywords that reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub keywords: Vec<String>,
}

/// Optional static destination→path table, consulted before any live-link
/// scanning. Sites that ship one get deterministic routing for their main
/// pages; everything else falls through to DOM matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteIndex {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteIndex {
    pub fn empty() -> Self {
        RouteIndex { routes: Vec::new() }
    }

    pub fn from_routes(routes: Vec<Route>) -> Self {
        RouteIndex { routes }
    }

    /// Load from a YAML file. Missing or malformed files yield an empty
    /// index rather than an error.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return RouteIndex::empty();
        };
        match serde_yaml::from_str(&contents) {
            Ok(index) => index,
            Err(e) => {
                eprintln!(
                    "Warning: could not parse route index {}: {}",
                    path.display(),
                    e
                );
                RouteIndex::empty()
            }
        }
    }

    /// Bidirectional keyword containment: "pricing page" finds a route
    /// keyed "pricing", and "price" finds a route keyed "pricing page".
    pub fn find_route(&self, destination: &str) -> Option<&Route> {
        let destination = destination.to_lowercase();
        self.routes.iter().find(|r| {
            r.keywords.iter().any(|k| {
                let k = k.to_lowercase();
                k.contains(&destination) || destination.contains(&k)
            })
        })
    }
}
