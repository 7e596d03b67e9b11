//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Plain form posts (no JavaScript) get the same cart change followed by a
//! redirect back to the home page.
//! The cart itself lives in the visitor's session (see [`SessionCart`]); each
//! handler feeds one event through the reducer and re-renders the drawer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use fake_store_core::{Cart, CartEvent, CartLineItem, ProductId, total_count};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::SessionCart;
use crate::state::AppState;

/// HTMX event fired after every cart change so the badge refreshes itself.
pub const CART_UPDATED_TRIGGER: &str = "cart-updated";

/// Request header HTMX sets on every request it issues.
const HX_REQUEST_HEADER: &str = "HX-Request";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub price: String,
    pub amount: u32,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format a decimal amount as a dollar price string.
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.subtotal()),
            item_count: total_count(cart),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let item = line.item();
        Self {
            id: item.id.as_i32(),
            title: item.title.clone(),
            image: item.image.clone(),
            price: format_price(item.price),
            amount: line.amount(),
            line_price: format_price(line.line_total()),
        }
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add/remove form data.
///
/// The id is kept as raw text: malformed or out-of-range values are treated
/// as "not found" rather than rejected. Bodies that do not deserialize at all
/// (e.g. a repeated `id` key) are read as an empty form.
#[derive(Debug, Default, Deserialize)]
pub struct CartItemForm {
    #[serde(default)]
    pub id: String,
}

impl CartItemForm {
    fn product_id(&self) -> Option<ProductId> {
        self.id.parse().ok()
    }

    fn from_extracted(form: std::result::Result<Form<Self>, FormRejection>) -> Self {
        match form {
            Ok(Form(form)) => form,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unreadable cart form");
                Self::default()
            }
        }
    }
}

/// Cart drawer contents fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Whether the request was issued by HTMX rather than a plain form post.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST_HEADER)
        .is_some_and(|value| value == "true")
}

/// Drawer fragment plus the `HX-Trigger` that refreshes the badge, or a
/// redirect home for plain form posts.
fn updated_drawer(headers: &HeaderMap, cart: &Cart) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/").into_response();
    }

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_TRIGGER)]),
        CartDrawerTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the cart drawer contents.
#[instrument(skip(cart))]
pub async fn show(cart: SessionCart) -> Result<CartDrawerTemplate> {
    let cart = cart.load().await?;
    Ok(CartDrawerTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a catalog item to the cart (HTMX).
///
/// Ids that are not in the loaded catalog (or any id while the catalog is
/// still loading or failed) leave the cart unchanged.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    cart: SessionCart,
    form: std::result::Result<Form<CartItemForm>, FormRejection>,
) -> Result<Response> {
    let form = CartItemForm::from_extracted(form);
    let Some(item) = form.product_id().and_then(|id| state.find_product(id)) else {
        tracing::debug!(id = %form.id, "Ignoring add for unknown product");
        let current = cart.load().await?;
        return Ok(updated_drawer(&headers, &current));
    };

    add_breadcrumb("cart", "Added item", Some(&[("product_id", form.id.as_str())]));
    let next = cart.apply(&CartEvent::Add(item)).await?;
    Ok(updated_drawer(&headers, &next))
}

/// Remove one unit of a product from the cart (HTMX).
///
/// Malformed, out-of-range or unknown ids are a no-op.
#[instrument(skip_all)]
pub async fn remove(
    headers: HeaderMap,
    cart: SessionCart,
    form: std::result::Result<Form<CartItemForm>, FormRejection>,
) -> Result<Response> {
    let form = CartItemForm::from_extracted(form);
    let Some(id) = form.product_id() else {
        tracing::debug!(id = %form.id, "Ignoring remove for malformed id");
        let current = cart.load().await?;
        return Ok(updated_drawer(&headers, &current));
    };

    add_breadcrumb("cart", "Removed item", Some(&[("product_id", form.id.as_str())]));
    let next = cart.apply(&CartEvent::Remove(id)).await?;
    Ok(updated_drawer(&headers, &next))
}

/// Get cart count badge (HTMX).
#[instrument(skip(cart))]
pub async fn count(cart: SessionCart) -> Result<CartCountTemplate> {
    let cart = cart.load().await?;
    Ok(CartCountTemplate {
        count: total_count(&cart),
    })
}
