//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::solicitudes::Stage;
use crate::state::AppState;

/// One module card on the landing page.
#[derive(Clone)]
pub struct StageCardView {
    pub href: String,
    pub title: String,
    pub description: String,
    pub count: usize,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub cards: Vec<StageCardView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let mut cards = vec![StageCardView {
        href: "/solicitudes/crear".to_string(),
        title: "Crear Solicitud".to_string(),
        description: "Arma una nueva solicitud de materiales.".to_string(),
        count: 0,
    }];

    for stage in Stage::ALL {
        let count = state.requests().count_by_status(stage.expects()).await;
        cards.push(StageCardView {
            href: format!("/solicitudes/{}", stage.slug()),
            title: stage.title().to_string(),
            description: stage.description().to_string(),
            count,
        });
    }

    HomeTemplate { cards }
}
