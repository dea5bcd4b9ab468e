//! Order form, submission, live estimate and history download.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use commande_core::{
    Depot, EstimateFactors, OrderDraft, OrderTable, OrderTimestamp, Quantity, Unit, Username,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{RequireAuth, set_flash, take_flash};
use crate::services::export::write_table;
use crate::services::orders::{ExportOutcome, SubmitError, Submission};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// A radio button in the order form.
#[derive(Debug, Clone)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Order form and history page.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub draft: OrderDraft,
    pub units: Vec<Choice>,
    pub depots: Vec<Choice>,
    pub estimate: Option<String>,
    pub flash: Option<String>,
    pub error: Option<String>,
    pub table: OrderTable,
}

/// Estimate fragment.
#[derive(Template, WebTemplate)]
#[template(path = "orders/estimate.html")]
pub struct EstimateTemplate {
    pub estimate: Option<String>,
}

/// Query parameters for the estimate fragment.
#[derive(Debug, Default, Deserialize)]
pub struct EstimateQuery {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity: String,
}

/// Estimate text for a form's unit and quantity, if both are valid.
fn estimate_text(factors: &EstimateFactors, unit: &str, quantity: &str) -> Option<String> {
    let unit: Unit = unit.parse().ok()?;
    let quantity = Quantity::parse(quantity).ok()?;
    factors.estimate(unit, quantity).map(|e| e.to_string())
}

/// A blank form with the first unit and depot preselected.
fn blank_draft() -> OrderDraft {
    OrderDraft {
        unit: Unit::Piece.as_str().to_string(),
        depot: Depot::Fresh.as_str().to_string(),
        ..OrderDraft::default()
    }
}

impl OrdersTemplate {
    fn new(username: &Username, draft: OrderDraft, table: OrderTable, factors: &EstimateFactors) -> Self {
        let units = Unit::ALL
            .iter()
            .map(|u| Choice {
                value: u.as_str(),
                label: u.label(),
                selected: draft.unit.parse::<Unit>().ok() == Some(*u),
            })
            .collect();
        let depots = Depot::ALL
            .iter()
            .map(|d| Choice {
                value: d.as_str(),
                label: d.label(),
                selected: draft.depot.parse::<Depot>().ok() == Some(*d),
            })
            .collect();
        let estimate = estimate_text(factors, &draft.unit, &draft.quantity);

        Self {
            username: username.to_string(),
            draft,
            units,
            depots,
            estimate,
            flash: None,
            error: None,
            table,
        }
    }
}

/// Confirmation shown after a committed submission.
fn confirmation(submission: &Submission) -> String {
    let record = &submission.record;
    let mut message = format!(
        "Commande enregistrée : {} {} {} ({})",
        record.product,
        record.quantity,
        record.unit.label(),
        record.depot.label()
    );
    if let ExportOutcome::Failed(_) = submission.export {
        message.push_str(". Attention : l'export CSV a échoué.");
    }
    message
}

// =============================================================================
// Routes
// =============================================================================

/// Display the order form and the operator's history.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let history = state.store().load(&user.username).await?;

    let mut page = OrdersTemplate::new(
        &user.username,
        blank_draft(),
        history.to_table(),
        state.estimate_factors(),
    );
    page.flash = take_flash(&session).await;

    Ok(page.into_response())
}

/// Handle order submission.
///
/// Success redirects back to the form with a confirmation. Validation and
/// webhook failures re-render the form with the operator's input kept.
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(draft): Form<OrderDraft>,
) -> Result<Response> {
    add_breadcrumb("order", "Order submitted", Some(&[("product", draft.product.trim())]));

    match state.orders().submit(&user.username, &draft).await {
        Ok(submission) => {
            set_flash(&session, &confirmation(&submission)).await?;
            Ok(Redirect::to("/orders").into_response())
        }
        Err(err @ (SubmitError::Validation(_) | SubmitError::Webhook(_))) => {
            let err = AppError::from(err);
            err.report();

            let history = state.store().load(&user.username).await?;
            let mut page = OrdersTemplate::new(
                &user.username,
                draft,
                history.to_table(),
                state.estimate_factors(),
            );
            page.error = Some(err.public_message());

            Ok((err.status(), page).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Estimate fragment for the current unit and quantity.
///
/// Invalid input yields an empty estimate rather than an error.
pub async fn estimate(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<EstimateQuery>,
) -> impl IntoResponse {
    EstimateTemplate {
        estimate: estimate_text(state.estimate_factors(), &query.unit, &query.quantity),
    }
}

/// Download the operator's whole history as one CSV document.
pub async fn history_csv(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let history = state.store().load(&user.username).await?;
    let body = write_table(&history.to_table())?;

    let file_name = format!(
        "{}_{}.csv",
        user.username,
        OrderTimestamp::now().filename_safe()
    );
    let disposition = format!("attachment; filename=\"{file_name}\"");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_text() {
        let factors = EstimateFactors::default();
        assert_eq!(
            estimate_text(&factors, "Kilogram", "10").as_deref(),
            Some("7.00 Pcs")
        );
        assert_eq!(
            estimate_text(&factors, "Pcs", "4").as_deref(),
            Some("6.00 KG")
        );
        assert!(estimate_text(&factors, "Kilogram", "0").is_none());
        assert!(estimate_text(&factors, "", "10").is_none());
        assert!(estimate_text(&factors, "Piece", "79228162514264337593543950335").is_none());
    }

    #[test]
    fn test_form_keeps_operator_choices() {
        let draft = OrderDraft {
            unit: "Kilogram".to_string(),
            depot: "Frozen".to_string(),
            quantity: "10".to_string(),
            ..OrderDraft::default()
        };
        let page = OrdersTemplate::new(
            &Username::parse("alice").unwrap(),
            draft,
            OrderTable::from_records(&[]),
            &EstimateFactors::default(),
        );

        let selected_unit: Vec<&str> = page
            .units
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value)
            .collect();
        assert_eq!(selected_unit, vec!["Kilogram"]);
        assert!(page.depots.iter().any(|c| c.selected && c.value == "Frozen"));
        assert_eq!(page.estimate.as_deref(), Some("7.00 Pcs"));
    }

    #[test]
    fn test_page_renders_history() {
        let record = OrderDraft {
            product: "Poulet".to_string(),
            unit: "Kilogram".to_string(),
            depot: "Fresh".to_string(),
            quantity: "10".to_string(),
            ..OrderDraft::default()
        }
        .validate(
            Username::parse("alice").unwrap(),
            OrderTimestamp::parse("2024-01-01 10:00:00").unwrap(),
        )
        .unwrap();

        let page = OrdersTemplate::new(
            &Username::parse("alice").unwrap(),
            blank_draft(),
            OrderTable::from_records(&[record]),
            &EstimateFactors::default(),
        );
        let html = page.render().unwrap();
        assert!(html.contains("Poulet"));
        assert!(html.contains("Date et heure"));
        assert!(!html.contains("Estimation_Unit"));
    }
}
