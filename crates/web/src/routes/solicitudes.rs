//! Request lifecycle route handlers: the create page and the workflow
//! queue pages (aprobar/alistar/entregar/confirmar).

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use almacen_core::{CompanyCode, RequestCode, RequestStatus, TransferRequest, WarehouseCode};

use crate::catalog::CatalogSort;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::keys;
use crate::routes::carrito::{CartView, draft_code, set_draft_code};
use crate::routes::catalogo::{CatalogTableView, table_view};
use crate::state::AppState;
use crate::store::HeaderUpdate;

// =============================================================================
// Workflow Stages
// =============================================================================

/// One queue page in the approval workflow.
///
/// Each stage lists the requests sitting in its entry state and moves them
/// one step forward. The four stages share a single table page, the way
/// the queues share one generic table in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Aprobar,
    Alistar,
    Entregar,
    Confirmar,
}

impl Stage {
    /// All stages, in workflow order.
    pub const ALL: [Self; 4] = [Self::Aprobar, Self::Alistar, Self::Entregar, Self::Confirmar];

    /// The state a request must be in to appear in this queue.
    #[must_use]
    pub const fn expects(self) -> RequestStatus {
        match self {
            Self::Aprobar => RequestStatus::PendingApproval,
            Self::Alistar => RequestStatus::Approved,
            Self::Entregar => RequestStatus::Prepared,
            Self::Confirmar => RequestStatus::Delivered,
        }
    }

    /// URL path segment.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Aprobar => "aprobar",
            Self::Alistar => "alistar",
            Self::Entregar => "entregar",
            Self::Confirmar => "confirmar",
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Aprobar => "Aprobar Solicitud",
            Self::Alistar => "Alistar Solicitud",
            Self::Entregar => "Entregar Solicitud",
            Self::Confirmar => "Confirmar Recepción",
        }
    }

    /// Page description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Aprobar => "Aquí puedes aprobar las solicitudes de materiales.",
            Self::Alistar => "Aquí puedes alistar las solicitudes aprobadas.",
            Self::Entregar => "Aquí puedes entregar las solicitudes alistadas.",
            Self::Confirmar => "Aquí puedes confirmar la recepción de materiales.",
        }
    }

    /// Label for the advance-action button.
    #[must_use]
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Aprobar => "Aprobar",
            Self::Alistar => "Alistar",
            Self::Entregar => "Entregar",
            Self::Confirmar => "Confirmar",
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.slug() == s)
            .ok_or_else(|| format!("invalid workflow stage: {s}"))
    }
}

// =============================================================================
// View Types
// =============================================================================

/// A `<select>` option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Request header form display data.
#[derive(Clone)]
pub struct RequestFormView {
    pub code: String,
    pub request_type: String,
    pub created_by: String,
    pub created_at: String,
    pub status_label: String,
    pub project: String,
    pub work_order: String,
    pub observations: String,
    pub companies: Vec<OptionView>,
    pub origins: Vec<OptionView>,
    pub destinations: Vec<OptionView>,
    pub origin_label: String,
    pub no_company: bool,
}

/// One row of a workflow queue table.
#[derive(Clone)]
pub struct QueueRowView {
    pub code: String,
    pub request_type: String,
    pub origin: String,
    pub destination: String,
    pub project: String,
    pub created_by: String,
    pub created_date: String,
    pub status_label: String,
}

/// Create-request page template.
#[derive(Template, WebTemplate)]
#[template(path = "solicitudes/crear.html")]
pub struct CreatePageTemplate {
    pub form: RequestFormView,
    pub catalog: CatalogTableView,
    pub cart: CartView,
}

/// Workflow queue page template.
#[derive(Template, WebTemplate)]
#[template(path = "solicitudes/cola.html")]
pub struct QueuePageTemplate {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub action_label: String,
    pub query: String,
    pub rows: Vec<QueueRowView>,
}

fn warehouse_label(state: &AppState, code: Option<&WarehouseCode>) -> String {
    code.map_or_else(
        || "-".to_string(),
        |code| {
            state
                .catalog()
                .warehouse_label(code)
                .map_or_else(|| code.to_string(), ToString::to_string)
        },
    )
}

fn form_view(state: &AppState, request: &TransferRequest) -> RequestFormView {
    let catalog = state.catalog();
    let company = catalog.company(&request.company);

    let origins = company.map_or_else(Vec::new, |company| {
        company
            .origins
            .iter()
            .map(|warehouse| OptionView {
                value: warehouse.code.to_string(),
                label: warehouse.label.clone(),
                selected: request.origin_warehouse.as_ref() == Some(&warehouse.code),
            })
            .collect()
    });

    let destinations = catalog
        .destination_options(&request.company, request.origin_warehouse.as_ref())
        .into_iter()
        .map(|warehouse| OptionView {
            value: warehouse.code.to_string(),
            label: warehouse.label.clone(),
            selected: request.destination_warehouse.as_ref() == Some(&warehouse.code),
        })
        .collect();

    RequestFormView {
        code: request.code.to_string(),
        request_type: request.request_type.clone(),
        created_by: request.created_by.clone(),
        created_at: filters::format_datetime(&request.created_at),
        status_label: request.status.label().to_string(),
        project: request.project.clone().unwrap_or_default(),
        work_order: request.work_order.clone().unwrap_or_default(),
        observations: request.observations.clone(),
        companies: catalog
            .companies()
            .iter()
            .map(|company| OptionView {
                value: company.code.to_string(),
                label: company.label.clone(),
                selected: company.code == request.company,
            })
            .collect(),
        origins,
        destinations,
        origin_label: request.origin_warehouse.as_ref().map_or_else(
            || "Selecciona un almacén".to_string(),
            |code| warehouse_label(state, Some(code)),
        ),
        no_company: catalog.companies().is_empty(),
    }
}

fn queue_row(state: &AppState, request: &TransferRequest) -> QueueRowView {
    QueueRowView {
        code: request.code.to_string(),
        request_type: request.request_type.clone(),
        origin: warehouse_label(state, request.origin_warehouse.as_ref()),
        destination: warehouse_label(state, request.destination_warehouse.as_ref()),
        project: request.project.clone().unwrap_or_else(|| "-".to_string()),
        created_by: request.created_by.clone(),
        created_date: filters::format_date(&request.created_at),
        status_label: request.status.label().to_string(),
    }
}

// =============================================================================
// Draft Handling
// =============================================================================

/// Get the session's editable draft, creating one when missing.
async fn ensure_draft(state: &AppState, session: &Session) -> Result<TransferRequest> {
    if let Some(code) = draft_code(session).await
        && let Some(request) = state.requests().get(code).await
        && request.is_editable()
    {
        return Ok(request);
    }

    let company = state.catalog().companies().first().map_or_else(
        || CompanyCode::new("CPL"),
        |company| company.code.clone(),
    );
    let code = state
        .requests()
        .create_draft(company, state.config().user.clone())
        .await;
    set_draft_code(session, code)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    state
        .requests()
        .get(code)
        .await
        .ok_or_else(|| AppError::Internal("draft vanished after creation".to_string()))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the create-request page.
#[instrument(skip(state, session))]
pub async fn crear(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let request = ensure_draft(&state, &session).await?;

    Ok(CreatePageTemplate {
        form: form_view(&state, &request),
        catalog: table_view(state.catalog(), "", CatalogSort::default(), 1),
        cart: CartView::from(&request.cart),
    })
}

/// Request header form data.
#[derive(Debug, Deserialize)]
pub struct HeaderForm {
    pub company: String,
    pub origen: Option<String>,
    pub destino: Option<String>,
    pub proyecto: Option<String>,
    pub orden_trabajo: Option<String>,
    pub observaciones: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Save the draft header fields.
///
/// Warehouse handling mirrors the request form: the destination list never
/// contains the chosen origin, and when a company leaves only one option
/// it is selected automatically.
#[instrument(skip(state, session))]
pub async fn datos(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HeaderForm>,
) -> Result<Redirect> {
    let Some(code) = draft_code(&session).await else {
        return Ok(Redirect::to("/solicitudes/crear"));
    };

    let company_code = CompanyCode::new(form.company);
    let company = state
        .catalog()
        .company(&company_code)
        .ok_or_else(|| AppError::BadRequest(format!("compañía desconocida: {company_code}")))?;

    // Origin must belong to the company; a single option auto-selects.
    let origin = non_empty(form.origen)
        .map(WarehouseCode::new)
        .filter(|code| company.origins.iter().any(|w| &w.code == code))
        .or_else(|| {
            if let [only] = company.origins.as_slice() {
                Some(only.code.clone())
            } else {
                None
            }
        });

    // Destination excludes the origin; a single remaining option auto-selects.
    let options = state
        .catalog()
        .destination_options(&company_code, origin.as_ref());
    let destination = non_empty(form.destino)
        .map(WarehouseCode::new)
        .filter(|code| options.iter().any(|w| &w.code == code))
        .or_else(|| {
            if let [only] = options.as_slice() {
                Some(only.code.clone())
            } else {
                None
            }
        });

    state
        .requests()
        .update_header(
            code,
            HeaderUpdate {
                company: company_code,
                origin_warehouse: origin,
                destination_warehouse: destination,
                project: non_empty(form.proyecto),
                work_order: non_empty(form.orden_trabajo),
                observations: non_empty(form.observaciones).unwrap_or_default(),
            },
        )
        .await?;

    Ok(Redirect::to("/solicitudes/crear"))
}

/// Submit the draft into the approval queue.
#[instrument(skip(state, session))]
pub async fn enviar(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let Some(code) = draft_code(&session).await else {
        return Ok(Redirect::to("/solicitudes/crear"));
    };

    state.requests().submit(code).await?;
    let _ = session.remove::<RequestCode>(keys::DRAFT_CODE).await;

    Ok(Redirect::to("/solicitudes/aprobar"))
}

/// Discard the draft and start over.
#[instrument(skip(state, session))]
pub async fn eliminar(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    if let Some(code) = draft_code(&session).await {
        state.requests().delete(code).await;
        let _ = session.remove::<RequestCode>(keys::DRAFT_CODE).await;
    }

    Ok(Redirect::to("/solicitudes/crear"))
}

/// Queue page query parameters.
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub q: Option<String>,
}

/// Display a workflow queue page.
#[instrument(skip(state))]
pub async fn cola(
    State(state): State<AppState>,
    Path(etapa): Path<String>,
    Query(params): Query<QueueQuery>,
) -> Result<impl IntoResponse> {
    let stage: Stage = etapa
        .parse()
        .map_err(|_| AppError::NotFound(format!("etapa desconocida: {etapa}")))?;

    let query = params.q.unwrap_or_default();
    let needle = query.trim().to_lowercase();

    let rows = state
        .requests()
        .list_by_status(stage.expects())
        .await
        .iter()
        .filter(|request| {
            needle.is_empty()
                || request.code.to_string().contains(&needle)
                || request
                    .project
                    .as_ref()
                    .is_some_and(|project| project.to_lowercase().contains(&needle))
                || request.created_by.to_lowercase().contains(&needle)
        })
        .map(|request| queue_row(&state, request))
        .collect();

    Ok(QueuePageTemplate {
        slug: stage.slug().to_string(),
        title: stage.title().to_string(),
        description: stage.description().to_string(),
        action_label: stage.action_label().to_string(),
        query,
        rows,
    })
}

/// Advance one request out of a queue.
#[instrument(skip(state))]
pub async fn avanzar(
    State(state): State<AppState>,
    Path((etapa, code)): Path<(String, u16)>,
) -> Result<Redirect> {
    let stage: Stage = etapa
        .parse()
        .map_err(|_| AppError::NotFound(format!("etapa desconocida: {etapa}")))?;

    state
        .requests()
        .advance(RequestCode::new(code), stage.expects())
        .await?;

    Ok(Redirect::to(&format!("/solicitudes/{}", stage.slug())))
}
