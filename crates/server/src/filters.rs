//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(commande_core::OrderTimestamp::now().as_naive().year())
}

/// French column heading for an order record field name.
///
/// Unknown names are returned unchanged.
///
/// Usage in templates: `{{ header|field_label }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn field_label(name: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(french_field_label(&name.to_string()).to_string())
}

fn french_field_label(name: &str) -> &str {
    match name {
        "timestamp" => "Date et heure",
        "product" => "Produit",
        "unit" => "Unité",
        "depot" => "Dépôt",
        "quantity" => "Quantité",
        "packaging" => "Conditionnement",
        "notes" => "Autres spécifications",
        "username" => "Utilisateur",
        other => other,
    }
}
