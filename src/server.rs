//! HTTP surface of the site.
//!
//! Localized pages are served by a single fallback handler that consults the
//! route table; the remaining routes are fixed endpoints.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{
        header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode, Uri,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::i18n::{
    cookie_value, locale_from_accept_language, CookiePreferenceStore, Locale, LookupMetrics,
    Translator,
};
use crate::leads::{LeadError, LeadForm, PendingLeads};
use crate::listings::{ListingKind, SessionStore, BROWSE_SESSION_COOKIE};
use crate::navigation::NavigationController;
use crate::pages::{render_browse, render_home, render_info, HomeView};
use crate::routes::{BrowseQuery, Page, PageParams, RouteMatch, RouteOutcome, RouteTable};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub routes: &'static RouteTable,
    pub sessions: SessionStore,
    pub pending_leads: PendingLeads,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let backend = BackendClient::from_config(&config)?;
        Ok(Self {
            backend,
            routes: RouteTable::standard(),
            sessions: SessionStore::new(config.browse_session_capacity, config.browse_session_ttl),
            pending_leads: PendingLeads::new(),
            config,
        })
    }

    fn preference_store(&self, headers: &HeaderMap) -> CookiePreferenceStore {
        let cookie = headers.get(COOKIE).and_then(|value| value.to_str().ok());
        CookiePreferenceStore::from_header(&self.config.locale_cookie, cookie)
    }

    fn navigation(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> NavigationController<CookiePreferenceStore> {
        let browser_default = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(locale_from_accept_language);
        NavigationController::init(
            path,
            self.preference_store(headers),
            browser_default,
            self.config.submenu_close_delay,
        )
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/i18n/metrics", get(i18n_metrics))
        .route("/change-language", get(change_language))
        .route("/leads", post(submit_lead))
        .fallback(site_page)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: Config) -> Result<()> {
    let address = config.bind_address();
    let state = Arc::new(AppState::new(config)?);
    info!(
        address = %address,
        backend = %state.backend.base_url(),
        "Binding HTTP listener"
    );

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn i18n_metrics() -> impl IntoResponse {
    Json(LookupMetrics::global().report())
}

async fn site_page(State(state): State<SharedState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    match state.routes.resolve(path) {
        RouteOutcome::Redirect(target) => {
            debug!("Redirecting {} to {}", path, target);
            Redirect::to(&target).into_response()
        }
        RouteOutcome::NeedsLocale => {
            let navigation = state.navigation(path, &headers);
            debug!("Resolved {} to {}", path, navigation.current_path());
            Redirect::to(navigation.current_path()).into_response()
        }
        RouteOutcome::Render(route) => render_route(&state, route, path, &headers).await,
    }
}

async fn render_route(
    state: &AppState,
    route: RouteMatch,
    path: &str,
    headers: &HeaderMap,
) -> Response {
    let t = Translator::new(route.locale);

    let html = match route.params {
        PageParams::Browse(query) => return browse_page(state, &t, path, &query, headers).await,
        PageParams::Services { service } => render_info(&t, path, route.page, service.as_deref()),
        PageParams::None if route.page == Page::Home => render_home(&t, path, &HomeView::default()),
        PageParams::None => render_info(&t, path, route.page, None),
    };
    Html(html).into_response()
}

/// Render the browse page from the visitor's cached working set.
///
/// Listings are fetched for a new session, after a type change, or when the
/// previous load failed. Filtering and resetting reuse the fetched records.
async fn browse_page(
    state: &AppState,
    t: &Translator,
    path: &str,
    query: &BrowseQuery,
    headers: &HeaderMap,
) -> Response {
    let session_id = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| cookie_value(header, BROWSE_SESSION_COOKIE))
        .and_then(|value| Uuid::parse_str(&value).ok());
    let checkout = state
        .sessions
        .checkout(session_id, query.kind, Instant::now())
        .await;

    let html = {
        let mut session = checkout.session.lock().await;
        if session.set_kind(query.kind) {
            debug!("Browse session {} switched to {}", checkout.id, query.kind.as_str());
        }
        session.show(&query.criteria);
        if session.needs_load() {
            session.load(&state.backend).await;
        }
        render_browse(t, path, query, &session)
    };

    let mut response = Html(html).into_response();
    if checkout.created {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            BROWSE_SESSION_COOKIE, checkout.id
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

#[derive(Debug, Deserialize)]
struct ChangeLanguageParams {
    to: String,
    from: Option<String>,
}

/// Only same-site absolute paths are followed.
fn return_path(from: Option<String>) -> String {
    from.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or_else(|| "/".to_string())
}

async fn change_language(
    State(state): State<SharedState>,
    Query(params): Query<ChangeLanguageParams>,
    headers: HeaderMap,
) -> Response {
    let from = return_path(params.from);
    let Some(target) = Locale::from_segment(params.to.trim()) else {
        debug!("Ignoring switch to unsupported locale '{}'", params.to);
        return Redirect::to(&from).into_response();
    };

    let mut navigation = state.navigation(&from, &headers);
    let path = navigation.change_language(target);
    let store = navigation.into_store();

    let mut response = Redirect::to(&path).into_response();
    if let Some(cookie) = store
        .set_cookie_header()
        .and_then(|value| HeaderValue::from_str(&value).ok())
    {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LeadFormInput {
    lang: Option<String>,
    email: String,
    search: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn submit_lead(State(state): State<SharedState>, Form(input): Form<LeadFormInput>) -> Response {
    let locale = input
        .lang
        .as_deref()
        .and_then(Locale::from_segment)
        .unwrap_or_else(Locale::canonical);
    let filter_type = input.kind.as_deref().and_then(ListingKind::parse);
    let t = Translator::new(locale);
    let home_path = Page::Home.path(locale);

    let mut form = LeadForm::with_input(state.config.email_policy, &input.email, &input.search);
    let outcome = match state.pending_leads.claim(&input.email) {
        Ok(_guard) => form.submit(&state.backend, filter_type).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(lead) => match lead.filter_type {
            Some(kind) => {
                let query = BrowseQuery {
                    kind,
                    email: Some(lead.email),
                    search: lead.search_term,
                    ..Default::default()
                };
                let target = format!("{}?{}", Page::Browse.path(locale), query.to_query_string());
                Redirect::to(&target).into_response()
            }
            None => {
                let view = HomeView {
                    success: true,
                    ..Default::default()
                };
                Html(render_home(&t, &home_path, &view)).into_response()
            }
        },
        Err(e) => {
            let status = match e {
                LeadError::InFlight => StatusCode::CONFLICT,
                _ if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            };
            let view = HomeView {
                email: input.email,
                search: input.search,
                filter_type,
                error_key: form.error_key().or(Some(e.message_key())),
                success: false,
            };
            (status, Html(render_home(&t, &home_path, &view))).into_response()
        }
    }
}
