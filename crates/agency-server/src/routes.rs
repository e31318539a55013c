//! HTTP surface: server-rendered pages, form posts and the contact API

use agency::forms::{contact_form, sign_in_form, sign_up_form, submit_sign_in, submit_sign_up, ContactRequest};
use agency::pages::{auth_markup, contact_form_markup, widgets::cta};
use agency::{page, App, BehaviorEvent, Config, Personalization, SystemPreferences};
use agency_forms::{Form, FormValues, SubmitOutcome};
use agency_router::RouteId;
use agency_store::{KeyValueStore, ScopedStore};
use axum::{
    extract::{Form as UrlEncoded, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Extension, Router,
};
use cookie::{Cookie, SameSite};
use maud::{html, Markup};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

/// Client hint sent by browsers that honour `Accept-CH`
const REDUCED_MOTION_HINT: &str = "sec-ch-prefers-reduced-motion";
const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

/// Cookie naming the visitor whose preferences and history a request uses
const VISITOR_COOKIE: &str = "agency-visitor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visitor(Uuid);

/// State shared across handlers
#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    store: Arc<dyn KeyValueStore>,
}

impl ServerState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// The visitor's own view of the shared store
    fn store_for(&self, visitor: Visitor) -> Arc<dyn KeyValueStore> {
        Arc::new(ScopedStore::new(Arc::clone(&self.store), visitor.0))
    }

    /// Start the site for one request
    fn app(&self, visitor: Visitor, path: &str, headers: &HeaderMap) -> App {
        let app = App::start(
            Arc::clone(&self.config),
            self.store_for(visitor),
            system_preferences(headers),
            path,
        );
        if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
            app.personalization().record_client(agent);
        }
        app
    }
}

fn hint<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(|v| v.trim_matches('"'))
}

fn system_preferences(headers: &HeaderMap) -> SystemPreferences {
    SystemPreferences {
        prefers_reduced_motion: hint(headers, REDUCED_MOTION_HINT) == Some("reduce"),
        prefers_dark: hint(headers, COLOR_SCHEME_HINT) == Some("dark"),
    }
}

fn visitor_cookie(headers: &HeaderMap) -> Option<Visitor> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == VISITOR_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .map(Visitor)
}

/// Identify the visitor, issuing a new id cookie on the first request
async fn assign_visitor(mut request: Request, next: Next) -> Response {
    let known = visitor_cookie(request.headers());
    let visitor = known.unwrap_or_else(|| Visitor(Uuid::new_v4()));
    request.extensions_mut().insert(visitor);

    let mut response = next.run(request).await;
    if known.is_none() {
        debug!(visitor = %visitor.0, "new visitor");
        let cookie = Cookie::build((VISITOR_COOKIE, visitor.0.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .permanent()
            .build();
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(show_page))
        .route("/healthz", get(healthz))
        .route("/contact", get(show_page).post(post_contact))
        .route("/auth/sign-in", post(post_sign_in))
        .route("/auth/sign-up", post(post_sign_up))
        .route("/api/contact", post(api_contact))
        .route("/:route", get(show_page))
        .fallback(show_page)
        .layer(middleware::from_fn(assign_visitor))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Any path renders the page for its first segment; unknown ones render the default
async fn show_page(
    State(state): State<ServerState>,
    Extension(visitor): Extension<Visitor>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let app = state.app(visitor, uri.path(), &headers);
    let (outlet, markup) = app.render().await;

    let status = if outlet.is_failed() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Html(markup.into_string())).into_response()
}

fn outcome_status(outcome: &SubmitOutcome) -> StatusCode {
    match outcome {
        SubmitOutcome::Submitted => StatusCode::OK,
        SubmitOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SubmitOutcome::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        SubmitOutcome::InProgress => StatusCode::CONFLICT,
    }
}

/// Render `content` inside the layout of `route`
fn render(app: &App, route: RouteId, status: StatusCode, content: Markup) -> Response {
    let page = page(route);
    let markup = app.layout(route, page.title(), page.description(), content);
    (status, Html(markup.into_string())).into_response()
}

fn fill(form: &Form, fields: impl IntoIterator<Item = (String, Value)>) {
    for (name, value) in fields {
        form.set_value(&name, value);
    }
}

fn text_fields(fields: BTreeMap<String, String>) -> impl Iterator<Item = (String, Value)> {
    fields.into_iter().map(|(name, value)| (name, Value::String(value)))
}

/// Accept a validated contact request
async fn deliver_contact(values: FormValues) -> Result<(), String> {
    let request: ContactRequest =
        serde_json::from_value(Value::Object(values)).map_err(|e| e.to_string())?;
    info!(
        name = %request.name,
        email = %request.email,
        project_type = %request.project_type,
        budget = %request.budget,
        "contact request received"
    );
    Ok(())
}

fn record_conversion(personalization: &Personalization) {
    personalization.track_behavior(BehaviorEvent::Conversion {
        kind: Some("contact_form".to_string()),
    });
}

fn thank_you() -> Markup {
    html! {
        section role="status" {
            h1 { "Thank you!" }
            p { "We've received your message and will get back to you within 24 hours." }
            (cta(RouteId::Portfolio, "Browse our work"))
        }
    }
}

async fn post_contact(
    State(state): State<ServerState>,
    Extension(visitor): Extension<Visitor>,
    headers: HeaderMap,
    UrlEncoded(fields): UrlEncoded<BTreeMap<String, String>>,
) -> Response {
    let app = state.app(visitor, "/contact", &headers);
    let form = contact_form(app.config().forms.submit_timeout());
    fill(&form, text_fields(fields));

    let outcome = form.submit(deliver_contact).await;
    let content = match outcome {
        SubmitOutcome::Submitted => {
            record_conversion(app.personalization());
            thank_you()
        }
        _ => html! {
            h1 { "Contact Us" }
            (contact_form_markup(&form))
        },
    };
    render(&app, RouteId::Contact, outcome_status(&outcome), content)
}

async fn api_contact(
    State(state): State<ServerState>,
    Extension(visitor): Extension<Visitor>,
    Json(body): Json<Value>,
) -> Response {
    let Value::Object(fields) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "expected a JSON object" })),
        )
            .into_response();
    };

    let form = contact_form(state.config.forms.submit_timeout());
    fill(&form, fields);

    let outcome = form.submit(deliver_contact).await;
    let body = match &outcome {
        SubmitOutcome::Submitted => {
            record_conversion(&Personalization::load(state.store_for(visitor)));
            json!({ "status": "ok" })
        }
        SubmitOutcome::Invalid => json!({ "errors": form.errors() }),
        SubmitOutcome::Failed(_) => json!({ "status": "failed" }),
        SubmitOutcome::TimedOut => json!({ "status": "timed_out" }),
        SubmitOutcome::InProgress => json!({ "status": "in_progress" }),
    };
    (outcome_status(&outcome), Json(body)).into_response()
}

/// After a successful submit the app has navigated; send the browser there too
fn auth_response(app: &App, outcome: SubmitOutcome, sign_in: &Form, sign_up: &Form) -> Response {
    match outcome {
        SubmitOutcome::Submitted => Redirect::to(&app.current_route().path()).into_response(),
        other => render(app, RouteId::Auth, outcome_status(&other), auth_markup(sign_in, sign_up)),
    }
}

async fn post_sign_in(
    State(state): State<ServerState>,
    Extension(visitor): Extension<Visitor>,
    headers: HeaderMap,
    UrlEncoded(fields): UrlEncoded<BTreeMap<String, String>>,
) -> Response {
    let app = state.app(visitor, "/auth", &headers);
    let form = sign_in_form();
    fill(&form, text_fields(fields));

    let outcome = submit_sign_in(&form, app.context(), &app.handle()).await;
    auth_response(&app, outcome, &form, &sign_up_form())
}

async fn post_sign_up(
    State(state): State<ServerState>,
    Extension(visitor): Extension<Visitor>,
    headers: HeaderMap,
    UrlEncoded(fields): UrlEncoded<BTreeMap<String, String>>,
) -> Response {
    let app = state.app(visitor, "/auth", &headers);
    let form = sign_up_form();
    fill(&form, text_fields(fields));

    let outcome = submit_sign_up(&form, app.context(), &app.handle()).await;
    auth_response(&app, outcome, &sign_in_form(), &form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    fn app() -> Router {
        router(ServerState::new(Config::default(), Arc::new(MemoryStore::new())))
    }

    async fn send(request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_contact() -> Value {
        json!({
            "name": "Ann Lee",
            "email": "ann@x.com",
            "message": "We need a new storefront.",
            "projectType": "website",
            "budget": "15k_50k",
            "timeline": "asap"
        })
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, _, body) = send(get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[rstest]
    #[case("/", "Kaizen Digital Solutions - Inspiring Borderless Thinking")]
    #[case("/services", "Digital Services - Web Development, Apps &amp; Marketing")]
    #[case("/contact", "Contact Us - Get Your Digital Project Started")]
    #[case("/blog", "Blog - Digital Transformation Insights")]
    #[case("/allen", "Kaizen Digital Solutions - Inspiring Borderless Thinking")]
    #[tokio::test]
    async fn test_pages_render(#[case] uri: &str, #[case] title: &str) {
        let (status, _, body) = send(get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains(&format!("<title>{}</title>", title)), "{}", body);
    }

    #[rstest]
    #[case("/services/", "Digital Services - Web Development, Apps &amp; Marketing")]
    #[case("/blog/2024/launch", "Blog - Digital Transformation Insights")]
    #[case("/contact?from=footer", "Contact Us - Get Your Digital Project Started")]
    #[tokio::test]
    async fn test_sloppy_paths_resolve_by_first_segment(#[case] uri: &str, #[case] title: &str) {
        let (status, _, body) = send(get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&format!("<title>{}</title>", title)), "{}", body);
    }

    fn issued_visitor(headers: &HeaderMap) -> String {
        let set_cookie = headers[header::SET_COOKIE].to_str().unwrap();
        let cookie = Cookie::parse(set_cookie).unwrap();
        assert_eq!(cookie.name(), VISITOR_COOKIE);
        format!("{}={}", VISITOR_COOKIE, cookie.value())
    }

    async fn visit(router: &Router, cookie: Option<&str>) -> (HeaderMap, String) {
        let mut request = Request::builder().uri("/");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_visitors_are_tracked_independently() {
        let router = app();
        const RETURNING: &str = r#"data-returning="true""#;

        let (headers, body) = visit(&router, None).await;
        let ann = issued_visitor(&headers);
        assert!(!body.contains(RETURNING));

        let (headers, body) = visit(&router, Some(&ann)).await;
        assert!(body.contains(RETURNING));
        assert!(!headers.contains_key(header::SET_COOKIE));

        let (headers, body) = visit(&router, None).await;
        let bob = issued_visitor(&headers);
        assert_ne!(ann, bob);
        assert!(!body.contains(RETURNING));
    }

    #[tokio::test]
    async fn test_malformed_visitor_cookie_is_replaced() {
        let (headers, _) = visit(&app(), Some("agency-visitor=not-a-uuid")).await;
        let issued = issued_visitor(&headers);
        assert_ne!(issued, "agency-visitor=not-a-uuid");
    }

    #[tokio::test]
    async fn test_reduced_motion_hint() {
        let request = Request::builder()
            .uri("/")
            .header(REDUCED_MOTION_HINT, "reduce")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(request).await;
        assert!(body.contains(r#"data-reduced-motion="true""#));
    }

    #[tokio::test]
    async fn test_api_contact_accepts_valid_request() {
        let (status, _, body) = send(post_json("/api/contact", valid_contact())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_api_contact_reports_errors() {
        let mut request = valid_contact();
        request["email"] = json!("ann@");
        request["name"] = json!("");

        let (status, _, body) = send(post_json("/api/contact", request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({ "errors": {
                "email": "Please enter a valid email address",
                "name": "name is required"
            } })
        );
    }

    #[tokio::test]
    async fn test_api_contact_rejects_non_object() {
        let (status, _, _) = send(post_json("/api/contact", json!(["name"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contact_form_post_shows_errors_inline() {
        let (status, _, body) = send(post_form("/contact", "name=Ann+Lee&email=nope")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Please enter a valid email address"));
        assert!(body.contains("message is required"));
        assert!(body.contains(r#"value="Ann Lee""#));
    }

    #[tokio::test]
    async fn test_contact_form_post_thanks_visitor() {
        let body = "name=Ann+Lee&email=ann%40x.com&message=We+need+a+new+storefront.\
                    &projectType=website&budget=15k_50k&timeline=asap";
        let (status, _, body) = send(post_form("/contact", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Thank you!"));
    }

    #[tokio::test]
    async fn test_sign_up_mismatch_renders_error() {
        let body = "firstName=Ann&lastName=Lee&email=ann%40x.com\
                    &password=Secret12%21&confirmPassword=Secret12%3F";
        let (status, _, body) = send(post_form("/auth/sign-up", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Passwords do not match"));
        assert!(!body.contains("Secret12"));
    }

    #[tokio::test]
    async fn test_sign_up_redirects_to_dashboard() {
        let body = "firstName=Ann&lastName=Lee&email=ann%40x.com\
                    &password=Secret12%21&confirmPassword=Secret12%21";
        let (status, headers, _) = send(post_form("/auth/sign-up", body)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_sign_in_requires_password() {
        let (status, _, body) = send(post_form("/auth/sign-in", "email=ann%40x.com")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Password is required"));
    }
}
