/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// Everything is versioned under `/v1`. The health check is public; every
/// other route sits behind the principal-resolver middleware:
///
/// ```text
/// /v1
/// ├── /health                                  # Health check (public)
/// ├── /projects                                # Project service
/// │   ├── POST /  GET /  GET /member  GET /team/:team_id
/// │   ├── GET/PUT/DELETE /:id
/// │   ├── GET /:id/tasks  GET /:id/tasks/all
/// │   └── GET /:id/activities  GET /:id/activities/:activity_id
/// ├── /tasks                                   # Task service
/// │   ├── POST /  GET /filter
/// │   ├── GET/PUT/DELETE /:id
/// │   └── GET /:id/comments  GET /:id/activities
/// ├── /comments                                # Comment service
/// │   ├── POST /
/// │   └── GET/PUT/DELETE /:id
/// ├── /teams                                   # Team service
/// │   ├── POST /  GET /  GET /all  GET /name/:title
/// │   ├── GET/PUT/DELETE /:id
/// │   └── GET /:id/members  GET /:id/members/count  GET /:id/activities
/// ├── /members                                 # Team membership service
/// │   ├── POST /
/// │   └── GET/DELETE /:id
/// └── /activities
///     └── GET /user                            # Actor-scoped trail
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (everything under /v1 except /v1/health)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route("/member", get(routes::projects::list_member_projects))
        .route("/team/:team_id", get(routes::projects::list_team_projects))
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/tasks", get(routes::tasks::list_project_tasks))
        .route("/:id/tasks/all", get(routes::tasks::list_all_project_tasks))
        .route(
            "/:id/activities",
            get(routes::activities::list_project_activities),
        )
        .route(
            "/:id/activities/:activity_id",
            get(routes::activities::get_project_activity),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/filter", get(routes::tasks::filter_tasks))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/comments", get(routes::comments::list_task_comments))
        .route(
            "/:id/activities",
            get(routes::activities::list_task_activities),
        );

    let comment_routes = Router::new()
        .route("/", post(routes::comments::create_comment))
        .route(
            "/:id",
            get(routes::comments::get_comment)
                .put(routes::comments::update_comment)
                .delete(routes::comments::delete_comment),
        );

    let team_routes = Router::new()
        .route(
            "/",
            post(routes::teams::create_team).get(routes::teams::list_teams),
        )
        .route("/all", get(routes::teams::list_all_teams))
        .route("/name/:title", get(routes::teams::find_team_by_title))
        .route(
            "/:id",
            get(routes::teams::get_team)
                .put(routes::teams::update_team)
                .delete(routes::teams::delete_team),
        )
        .route("/:id/members", get(routes::members::list_team_members))
        .route(
            "/:id/members/count",
            get(routes::members::count_team_members),
        )
        .route(
            "/:id/activities",
            get(routes::activities::list_team_activities),
        );

    let member_routes = Router::new()
        .route("/", post(routes::members::add_member))
        .route(
            "/:id",
            get(routes::members::get_member).delete(routes::members::remove_member),
        );

    let activity_routes =
        Router::new().route("/user", get(routes::activities::list_user_activities));

    // Everything except health requires a resolved principal.
    let protected_routes = Router::new()
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/comments", comment_routes)
        .nest("/teams", team_routes)
        .nest("/members", member_routes)
        .nest("/activities", activity_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_principal,
        ));

    let v1_routes = Router::new().merge(health_routes).merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
