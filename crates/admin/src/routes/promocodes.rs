//! Promo codes manager.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use ruche_core::{Discount, Promocode, PromocodeId};

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::tablestore::rows::PromocodeChangeset;

/// Build the promo codes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/promocodes", get(index).post(create))
        .route("/promocodes/{id}", put(update).delete(remove))
}

/// A promo code plus its activity as of the request.
#[derive(Debug, Serialize)]
pub struct PromocodeView {
    #[serde(flatten)]
    pub promocode: Promocode,
    pub active: bool,
}

/// GET /promocodes
#[instrument(skip(state))]
async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<PromocodeView>>> {
    let now = Utc::now();
    let codes = state.tablestore().list_promocodes().await?;
    let views = codes
        .into_iter()
        .map(|promocode| PromocodeView {
            active: promocode.is_active(now),
            promocode,
        })
        .collect();
    Ok(Json(views))
}

/// Discount kind selector in the form.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percent,
    Amount,
}

#[derive(Debug, Deserialize)]
pub struct PromocodeForm {
    pub code: String,
    pub discount_type: DiscountKind,
    pub discount_value: Decimal,
    /// Defaults to now when omitted.
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
}

impl PromocodeForm {
    fn into_changeset(self) -> Result<PromocodeChangeset> {
        if self.code.trim().is_empty() {
            return Err(AdminError::BadRequest("code is required".to_string()));
        }
        if self.discount_value <= Decimal::ZERO {
            return Err(AdminError::BadRequest(
                "discount value must be positive".to_string(),
            ));
        }

        let discount = match self.discount_type {
            DiscountKind::Percent => {
                if self.discount_value > Decimal::ONE_HUNDRED {
                    return Err(AdminError::BadRequest(
                        "percentage discount cannot exceed 100".to_string(),
                    ));
                }
                Discount::Percent(self.discount_value)
            }
            DiscountKind::Amount => Discount::Amount(self.discount_value),
        };

        let valid_from = self.valid_from.unwrap_or_else(Utc::now);
        if let Some(until) = self.valid_until {
            if until < valid_from {
                return Err(AdminError::BadRequest(
                    "validity window ends before it starts".to_string(),
                ));
            }
        }

        Ok(PromocodeChangeset::new(
            self.code,
            discount,
            valid_from,
            self.valid_until,
            self.usage_limit,
        ))
    }
}

/// POST /promocodes
#[instrument(skip(state, form), fields(code = %form.code))]
async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(form): Json<PromocodeForm>,
) -> Result<Json<Promocode>> {
    let changeset = form.into_changeset()?;
    let code = state.tablestore().create_promocode(&changeset).await?;
    tracing::info!(code = %code.code, "promo code created");
    Ok(Json(code))
}

/// PUT /promocodes/{id}
#[instrument(skip(state, form))]
async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<PromocodeForm>,
) -> Result<Json<Promocode>> {
    let changeset = form.into_changeset()?;
    let code = state
        .tablestore()
        .update_promocode(PromocodeId::new(id), &changeset)
        .await?;
    Ok(Json(code))
}

/// DELETE /promocodes/{id}
#[instrument(skip(state))]
async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<()> {
    state
        .tablestore()
        .delete_promocode(PromocodeId::new(id))
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(kind: DiscountKind, value: Decimal) -> PromocodeForm {
        PromocodeForm {
            code: "ruche10".to_string(),
            discount_type: kind,
            discount_value: value,
            valid_from: None,
            valid_until: None,
            usage_limit: Some(100),
        }
    }

    #[test]
    fn test_form_maps_percent() {
        let cs = form(DiscountKind::Percent, Decimal::new(10, 0))
            .into_changeset()
            .unwrap();
        assert_eq!(cs.code, "RUCHE10");
        assert_eq!(cs.discount_percent, Some(Decimal::new(10, 0)));
        assert!(cs.discount_amount.is_none());
    }

    #[test]
    fn test_form_rejects_bad_values() {
        assert!(form(DiscountKind::Percent, Decimal::new(101, 0))
            .into_changeset()
            .is_err());
        assert!(form(DiscountKind::Amount, Decimal::ZERO)
            .into_changeset()
            .is_err());

        let mut f = form(DiscountKind::Amount, Decimal::new(5, 0));
        f.code = "  ".to_string();
        assert!(f.into_changeset().is_err());
    }

    #[test]
    fn test_form_rejects_inverted_window() {
        let mut f = form(DiscountKind::Amount, Decimal::new(5, 0));
        f.valid_from = Some(Utc::now());
        f.valid_until = Some(Utc::now() - chrono::Duration::days(1));
        assert!(f.into_changeset().is_err());
    }
}
