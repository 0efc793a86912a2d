//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Requests
//! GET  /solicitudes/crear          - Create-request page
//! POST /solicitudes/crear/datos    - Save draft header fields
//! POST /solicitudes/crear/enviar   - Submit the draft for approval
//! POST /solicitudes/crear/eliminar - Discard the draft
//! GET  /solicitudes/{etapa}        - Workflow queue (aprobar | alistar |
//!                                    entregar | confirmar)
//! POST /solicitudes/{etapa}/{code} - Advance a request one stage
//!
//! # Catalog (HTMX fragment)
//! GET  /catalogo               - Selection table (q, orden, pagina)
//!
//! # Cart (HTMX fragments)
//! POST /carrito/agregar        - Add article (returns count, triggers cart-updated)
//! POST /carrito/actualizar     - Update quantity (returns cart_items fragment)
//! POST /carrito/quitar         - Remove article (returns cart_items fragment)
//! GET  /carrito/items          - Cart items fragment
//! GET  /carrito/cantidad       - Cart count badge fragment
//! ```

pub mod carrito;
pub mod catalogo;
pub mod home;
pub mod solicitudes;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the request routes router.
pub fn solicitudes_routes() -> Router<AppState> {
    Router::new()
        .route("/crear", get(solicitudes::crear))
        .route("/crear/datos", post(solicitudes::datos))
        .route("/crear/enviar", post(solicitudes::enviar))
        .route("/crear/eliminar", post(solicitudes::eliminar))
        .route("/{etapa}", get(solicitudes::cola))
        .route("/{etapa}/{code}", post(solicitudes::avanzar))
}

/// Create the cart routes router.
pub fn carrito_routes() -> Router<AppState> {
    Router::new()
        .route("/agregar", post(carrito::add))
        .route("/actualizar", post(carrito::update))
        .route("/quitar", post(carrito::remove))
        .route("/items", get(carrito::items))
        .route("/cantidad", get(carrito::count))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Request routes
        .nest("/solicitudes", solicitudes_routes())
        // Catalog fragment
        .route("/catalogo", get(catalogo::table))
        // Cart routes
        .nest("/carrito", carrito_routes())
}
