//! Experience League search URL construction
//!
//! Search state lives in the URL fragment, so the resulting URL is
//! classified as a search page and fetched with the fragment kept.

use crate::types::SearchRequest;
use url::form_urlencoded;

/// Search page; parameters follow the `#`
pub const SEARCH_BASE_URL: &str = "https://experienceleague.adobe.com/en/search#";

/// Every Experience Manager product variant
pub const EXPERIENCE_MANAGER_PRODUCTS: &[&str] = &[
    "Experience Manager",
    "Experience Manager|6.5",
    "Experience Manager|6.5 LTS",
    "Experience Manager|as a Cloud Service",
    "Experience Manager|Assets",
    "Experience Manager|Forms",
    "Experience Manager|Screens",
    "Experience Manager|Sites",
];

/// Experience Cloud products plus every Experience Manager variant
pub const ALL_PRODUCTS: &[&str] = &[
    "Experience Cloud",
    "Experience Cloud Services",
    "Experience Manager",
    "Experience Manager|6.5",
    "Experience Manager|6.5 LTS",
    "Experience Manager|as a Cloud Service",
    "Experience Manager|Assets",
    "Experience Manager|Forms",
    "Experience Manager|Screens",
    "Experience Manager|Sites",
];

pub const CONTENT_TYPES: &[&str] = &[
    "Documentation",
    "Tutorial",
    "Troubleshooting",
    "API Reference",
    "Release Notes",
    "Best Practices",
];

pub const ROLES: &[&str] = &[
    "Developer",
    "Admin",
    "Leader",
    "User",
    "Architect",
    "Business Practitioner",
];

/// Build a search URL with optional filters
///
/// Each filter is comma-joined and form-urlencoded; empty filters are
/// omitted.
pub fn build_experience_league_search_url(
    query: &str,
    content_types: &[String],
    products: &[String],
    roles: &[String],
) -> String {
    let mut params = vec![format!("q={}", encode(query))];

    for (key, values) in [
        ("f-el_contenttype", content_types),
        ("f-el_product", products),
        ("f-el_role", roles),
    ] {
        if !values.is_empty() {
            params.push(format!("{}={}", key, encode(&values.join(","))));
        }
    }

    format!("{}{}", SEARCH_BASE_URL, params.join("&"))
}

/// Search URL for a tool request
///
/// `include_all_aem_products` only applies when no products were given.
pub fn search_url_for(req: &SearchRequest) -> String {
    let products: Vec<String> = match &req.products {
        Some(products) if !products.is_empty() => products.clone(),
        _ if req.include_all_aem_products => EXPERIENCE_MANAGER_PRODUCTS
            .iter()
            .map(|p| p.to_string())
            .collect(),
        _ => Vec::new(),
    };
    let roles = req.roles.clone().unwrap_or_default();

    build_experience_league_search_url(&req.query, &req.content_types, &products, &roles)
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
