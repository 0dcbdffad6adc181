use std::{
    future::IntoFuture as _,
    io,
    sync::{Arc, OnceLock},
    time,
};

use application::{api, graphql, subscriptions, Args, Config};
use axum::{
    extract::MatchedPath,
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use futures::{future, TryFutureExt as _};
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

/// Indicates whether the configured verbosity allows the provided
/// [`log::Level`].
fn verbosity_allows(level: &log::Level) -> bool {
    LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO) >= *level
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || !STDERR_LEVELS.contains(meta.level())
                            && verbosity_allows(meta.level())
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || STDERR_LEVELS.contains(meta.level())
                            && verbosity_allows(meta.level())
                })),
        )
        .init();

    _ = start().await;
}

/// Runs the GraphQL server along with the background tasks, until either
/// one fails.
async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let postgres_config = postgres.into();
    let mut postgres = Postgres::new(&postgres_config).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;

    migrations::runner()
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;

    let (service, background) = Service::new(service.into(), postgres);

    let schema = api::Schema::new(api::Query, api::Mutation, api::Subscription);

    let mut cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([http::header::CONTENT_TYPE]);
    for origin in server.cors.origins {
        cors = cors.allow_origin(
            origin.parse::<http::header::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not a valid CORS origin: {e}");
            })?,
        );
    }

    let router = Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .route("/subscriptions", get(subscriptions))
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &http::Request<_>| {
                    tracing::info_span!(
                        "HTTP request",
                        http.client_ip = InsecureClientIp::from(
                            req.headers(),
                            req.extensions()
                        )
                            .map(|ip| ip.0.to_string())
                            .ok(),
                        http.flavor = ?req.version(),
                        http.host = req.uri().host(),
                        http.method = req.method().as_str(),
                        http.route = req
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.scheme = req
                            .uri()
                            .scheme()
                            .map(http::uri::Scheme::as_str),
                        http.target = req
                            .uri()
                            .path_and_query()
                            .map(http::uri::PathAndQuery::as_str),
                        http.user_agent = req
                            .headers()
                            .get("User-Agent")
                            .and_then(|h| h.to_str().ok()),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |resp: &http::Response<_>,
                     dur: time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(resp.status().as_u16()),
                        );

                        if resp.status().is_server_error()
                            || resp.status().is_client_error()
                        {
                            tracing::error!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        } else {
                            tracing::info!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        }
                    },
                ),
        );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    let serve = axum::serve(listener, router);

    future::try_join(
        serve
            .into_future()
            .map_err(|e| log::error!("webserver failed: {e}")),
        background.into_future().map_err(|e| {
            log::error!("background task failed: {e}");
        }),
    )
    .await
    .map(drop)
}
