//! Dropdown content for a search outcome.

use crate::outcome::SearchOutcome;
use crate::types::{officer_path, Field, IncidentHit, OfficerHit, SearchResult, VehicleHit};
use crate::view::{Element, Node};

pub const NO_RESULTS_TEXT: &str = "No results found";
pub const ERROR_TEXT: &str = "Error performing search";
pub const NO_PLATE_TEXT: &str = "No Plate";

/// Result categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Officers,
    Incidents,
    Vehicles,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Officers, Category::Incidents, Category::Vehicles];

    pub fn label(self) -> &'static str {
        match self {
            Category::Officers => "Officers",
            Category::Incidents => "Incidents",
            Category::Vehicles => "Vehicles",
        }
    }
}

/// Render the whole dropdown body for `outcome`, with site-relative item links.
pub fn render_outcome(outcome: &SearchOutcome) -> Node {
    render_outcome_with(outcome, None)
}

/// Like [`render_outcome`], but item links are absolute URLs under `origin`.
///
/// Front ends that are not served from the site itself need this, or the links
/// resolve against their own origin.
pub fn render_outcome_at(outcome: &SearchOutcome, origin: &str) -> Node {
    render_outcome_with(outcome, Some(origin))
}

fn render_outcome_with(outcome: &SearchOutcome, origin: Option<&str>) -> Node {
    match outcome {
        SearchOutcome::Results(result) => results_body(result, origin),
        SearchOutcome::Empty => no_results_row(),
        SearchOutcome::Failure(_) => error_row(),
    }
}

pub fn no_results_row() -> Node {
    Element::new("div")
        .class("p-3 text-muted")
        .child(icon("fas fa-search me-2"))
        .text(NO_RESULTS_TEXT)
        .into()
}

pub fn error_row() -> Node {
    Element::new("div")
        .class("p-3 text-danger")
        .child(icon("fas fa-exclamation-circle me-2"))
        .text(ERROR_TEXT)
        .into()
}

/// Sections for every non-empty category, in [`Category::ALL`] order.
pub fn render_results(result: &SearchResult) -> Node {
    results_body(result, None)
}

fn results_body(result: &SearchResult, origin: Option<&str>) -> Node {
    let mut body = Element::new("div").class("p-2");

    for category in Category::ALL {
        let items: Vec<Node> = match category {
            Category::Officers => result.officers.iter().map(|o| officer_row(o, origin)).collect(),
            Category::Incidents => {
                result.incidents.iter().map(|i| incident_row(i, origin)).collect()
            }
            Category::Vehicles => result.vehicles.iter().map(|v| vehicle_row(v, origin)).collect(),
        };
        if items.is_empty() {
            continue;
        }
        body = body.child(section_header(category)).children(items);
    }

    body.into()
}

fn section_header(category: Category) -> Node {
    let spacing = match category {
        Category::Officers => "mb-2",
        _ => "mb-2 mt-2",
    };
    Element::new("div")
        .class(spacing)
        .child(Element::new("strong").class("text-muted").text(category.label()))
        .into()
}

fn officer_href(id: &Field, origin: Option<&str>) -> String {
    match origin {
        Some(origin) => format!("{}{}", origin.trim_end_matches('/'), officer_path(id)),
        None => officer_path(id),
    }
}

fn item_link(href: String) -> Element {
    Element::new("a").class("list-group-item list-group-item-action border-0").attr("href", href)
}

fn icon(classes: &str) -> Element {
    Element::new("i").class(classes)
}

fn officer_row(officer: &OfficerHit, origin: Option<&str>) -> Node {
    item_link(officer_href(&officer.id, origin))
        .child(icon("fas fa-user me-2"))
        .text(officer.full_name())
        .child(Element::new("span").class("badge bg-secondary").text(officer.badge_number.display()))
        .into()
}

fn incident_row(incident: &IncidentHit, origin: Option<&str>) -> Node {
    item_link(officer_href(&incident.officer_id, origin))
        .child(icon("fas fa-exclamation-triangle me-2 text-danger"))
        .text(incident.incident_type.display())
        .child(Element::new("small").class("text-muted d-block").text(incident.officer_name.display()))
        .into()
}

fn vehicle_row(vehicle: &VehicleHit, origin: Option<&str>) -> Node {
    item_link(officer_href(&vehicle.officer_id, origin))
        .child(icon("fas fa-car me-2"))
        .text(vehicle.description())
        .child(Element::new("span").class("badge bg-info").text(vehicle.license_plate.or(NO_PLATE_TEXT)))
        .into()
}
