//! Session-owned cart.
//!
//! The visitor's session is the single owner of their [`Cart`]. Every add or
//! remove loads the held cart, runs it through the core reducer and stores
//! the returned cart in place of the old one. Nothing else writes the cart.
//!
//! Overlapping requests from one visitor are serialized by
//! [`session_lock_middleware`](crate::middleware::session_lock_middleware),
//! which wraps the session layer, so `apply` always starts from the cart
//! saved by the previous event.

use axum::{extract::FromRequestParts, http::request::Parts};
use fake_store_core::{Cart, CartEvent, reduce};
use tower_sessions::Session;

use crate::error::Result;
use crate::models::session_keys;

/// Extractor giving a handler access to the visitor's cart.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart: SessionCart) -> Result<String> {
///     let cart = cart.load().await?;
///     Ok(format!("{} items", total_count(&cart)))
/// }
/// ```
#[derive(Clone)]
pub struct SessionCart {
    session: Session,
}

impl SessionCart {
    /// Wrap an existing session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The cart currently held by the session (empty if none yet).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored cart no
    /// longer satisfies the cart invariants.
    pub async fn load(&self) -> Result<Cart> {
        Ok(self
            .session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    /// Apply an event and store the resulting cart.
    ///
    /// The session is only written when the event actually changed the cart,
    /// so no-op removals do not create a session for first-time visitors.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn apply(&self, event: &CartEvent) -> Result<Cart> {
        let cart = self.load().await?;
        let next = reduce(&cart, event);

        if next != cart {
            self.session.insert(session_keys::CART, &next).await?;
        }

        Ok(next)
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
