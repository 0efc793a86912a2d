//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The code of the draft being edited is stored in the session; the cart
//! itself lives in the request store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use almacen_core::{ItemId, LineItem, Quantity, RequestCart, RequestCode, SubItem};

use crate::models::session::keys;
use crate::state::AppState;

/// Sub-item allocation display data for templates.
#[derive(Clone)]
pub struct SubItemView {
    pub index: usize,
    pub location: String,
    pub batch: String,
    pub available: u32,
    pub quantity: u32,
    pub over: bool,
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub code: String,
    pub description: String,
    pub balance: String,
    pub balance_limit: Option<u32>,
    pub multiplier: u32,
    pub total: u32,
    pub is_composite: bool,
    pub sub_items: Vec<SubItemView>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: usize,
    pub total_quantity: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            total_quantity: 0,
        }
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&RequestCart> for CartView {
    fn from(cart: &RequestCart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            code: item.code.clone(),
            description: item.description.clone(),
            balance: item
                .balance()
                .map_or_else(|| "-".to_string(), |balance| balance.to_string()),
            balance_limit: if item.is_composite() {
                None
            } else {
                item.balance()
            },
            multiplier: item.multiplier().get(),
            total: item.requested_quantity(),
            is_composite: item.is_composite(),
            sub_items: item
                .sub_items()
                .iter()
                .enumerate()
                .map(|(index, sub)| sub_item_view(index, sub))
                .collect(),
        }
    }
}

fn sub_item_view(index: usize, sub: &SubItem) -> SubItemView {
    SubItemView {
        index,
        location: sub.location.clone(),
        batch: sub.batch.clone(),
        available: sub.available,
        quantity: sub.quantity.get(),
        over: sub.exceeds_available(),
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the draft request code from the session.
pub async fn draft_code(session: &Session) -> Option<RequestCode> {
    session
        .get::<RequestCode>(keys::DRAFT_CODE)
        .await
        .ok()
        .flatten()
}

/// Set the draft request code in the session.
pub async fn set_draft_code(
    session: &Session,
    code: RequestCode,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::DRAFT_CODE, code).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
    pub cantidad: Option<i64>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub cantidad: i64,
    pub sub_index: Option<usize>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the current cart as an items fragment.
async fn cart_fragment(state: &AppState, session: &Session) -> CartItemsTemplate {
    let cart = match draft_code(session).await {
        Some(code) => state
            .requests()
            .get(code)
            .await
            .map_or_else(CartView::empty, |request| CartView::from(&request.cart)),
        None => CartView::empty(),
    };
    CartItemsTemplate { cart }
}

/// Add an article to the draft cart (HTMX).
///
/// Creates a draft if the session doesn't hold one yet (e.g. a stale tab
/// after a restart). Returns the cart count badge with an HTMX trigger so
/// the items region refreshes itself.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let known = match draft_code(&session).await {
        Some(code) => state.requests().get(code).await.map(|_| code),
        None => None,
    };
    let code = match known {
        Some(code) => code,
        None => {
            let company = state.catalog().companies().first().map_or_else(
                || almacen_core::CompanyCode::new("CPL"),
                |company| company.code.clone(),
            );
            let code = state
                .requests()
                .create_draft(company, state.config().user.clone())
                .await;
            if let Err(e) = set_draft_code(&session, code).await {
                tracing::error!("Failed to save draft code to session: {e}");
            }
            code
        }
    };

    let item_id = ItemId::new(form.item_id);
    let Some(entry) = state.catalog().get(&item_id) else {
        return (
            StatusCode::NOT_FOUND,
            Html("<span class=\"error\">Artículo no encontrado</span>"),
        )
            .into_response();
    };

    let quantity = Quantity::clamp(form.cantidad.unwrap_or(1));
    let candidate = entry.to_line_item(quantity);

    match state.requests().add_item(code, candidate).await {
        Ok(()) => {
            let count = state
                .requests()
                .get(code)
                .await
                .map_or(0, |request| request.cart.total_quantity());

            // Return the count badge with an HTMX trigger to update the
            // cart items region
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::CONFLICT,
                Html("<span class=\"error\">No se pudo agregar el artículo</span>"),
            )
                .into_response()
        }
    }
}

/// Update a cart quantity (HTMX).
///
/// With `sub_index` the edit targets one allocation of a composite item;
/// without it, a composite item's multiplier is set and its allocations
/// rescale. Values below 1 are clamped, never rejected.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    if let Some(code) = draft_code(&session).await {
        let item_id = ItemId::new(form.item_id);
        if let Err(e) = state
            .requests()
            .update_quantity(code, &item_id, form.cantidad, form.sub_index)
            .await
        {
            tracing::error!("Failed to update cart: {e}");
        }
    }

    cart_fragment(&state, &session).await.into_response()
}

/// Remove an article from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if let Some(code) = draft_code(&session).await {
        let item_id = ItemId::new(form.item_id);
        if let Err(e) = state.requests().remove_item(code, &item_id).await {
            tracing::error!("Failed to remove from cart: {e}");
        }
    }

    cart_fragment(&state, &session).await.into_response()
}

/// Get the cart items fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn items(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    cart_fragment(&state, &session).await
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match draft_code(&session).await {
        Some(code) => state
            .requests()
            .get(code)
            .await
            .map_or(0, |request| request.cart.total_quantity()),
        None => 0,
    };

    CartCountTemplate { count }
}
