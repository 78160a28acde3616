//! Plain-text rendering for the command line.

use std::fmt::Write;

use crate::catalog::{Collection, CollectionExhibits, ExhibitDetail, ExhibitSummary, FilterField};
use crate::controller::ViewState;

pub fn exhibit_card(exhibit: &ExhibitSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", exhibit.id, exhibit.title);
    let _ = writeln!(out, "    By {}", exhibit.creator_or_placeholder());
    let _ = writeln!(
        out,
        "    {} · {} · {}",
        exhibit.collection_or_placeholder(),
        exhibit.culture_or_placeholder(),
        exhibit.date_or_placeholder()
    );
    let _ = writeln!(out, "    {}", exhibit.description_or_placeholder());
    out
}

pub fn exhibit_detail(detail: &ExhibitDetail) -> String {
    let summary = &detail.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary.title);
    let _ = writeln!(out, "{}", "=".repeat(summary.title.chars().count().max(1)));
    let _ = writeln!(out, "Image:        {}", summary.image_url_or_placeholder());
    let _ = writeln!(out, "Creator:      {}", summary.creator_or_placeholder());
    let _ = writeln!(out, "Collection:   {}", summary.collection_or_placeholder());
    let _ = writeln!(out, "Date Created: {}", summary.date_or_placeholder());
    let _ = writeln!(out, "Medium:       {}", detail.medium_or_placeholder());
    let _ = writeln!(out, "Culture:      {}", summary.culture_or_placeholder());
    let _ = writeln!(out, "Period:       {}", detail.period_or_placeholder());
    let _ = writeln!(out, "Description:  {}", summary.description_or_placeholder());
    out
}

/// "Page 2 of 3", or "Page 2" while the total is unknown.
pub fn pager(state: &ViewState) -> String {
    match state.total_pages {
        Some(total) => format!("Page {} of {}", state.page(), total),
        None => format!("Page {}", state.page()),
    }
}

/// Active search text and filters, e.g. `search="vase" culture=Roman`.
pub fn query_summary(state: &ViewState) -> String {
    let mut parts = Vec::new();
    let text = state.query.search_text();
    if !text.trim().is_empty() {
        parts.push(format!("search={:?}", text));
    }
    for field in FilterField::ALL {
        let value = state.query.filter(field);
        if !value.trim().is_empty() {
            parts.push(format!("{}={}", field, value));
        }
    }
    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join(" ")
    }
}

pub fn listing(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Exhibits ({})", query_summary(state));
    if let Some(error) = state.error {
        let _ = writeln!(out, "! {}", error);
    }
    if state.loading {
        let _ = writeln!(out, "Loading...");
    } else if state.items.is_empty() && state.error.is_none() {
        let _ = writeln!(out, "No exhibits found.");
    }
    for exhibit in &state.items {
        out.push_str(&exhibit_card(exhibit));
    }
    let _ = writeln!(out, "{}", pager(state));
    out
}

pub fn collections(items: &[Collection]) -> String {
    if items.is_empty() {
        return "No collections yet.\n".to_string();
    }
    let mut out = String::new();
    for collection in items {
        let _ = writeln!(
            out,
            "[{}] {} ({})",
            collection.id,
            collection.name,
            collection.exhibit_count_label()
        );
        if let Some(description) = collection
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            let _ = writeln!(out, "    {}", description);
        }
    }
    out
}

pub fn collection_exhibits(exhibits: &CollectionExhibits) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Exhibits", exhibits.title());
    if exhibits.exhibits.is_empty() {
        let _ = writeln!(out, "No exhibits in this collection.");
    }
    for exhibit in &exhibits.exhibits {
        out.push_str(&exhibit_card(exhibit));
    }
    out
}
