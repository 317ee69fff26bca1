//! The facade's route table.
//!
//! Every data route is a memoized producer over [`StatsService`]: the handler
//! extracts typed arguments from the request, calls the producer through the
//! response cache and renders whatever comes back (fresh or cached) as JSON.
//! Responses carry `X-Cache: hit` or `X-Cache: miss`.

use std::fmt::{self, Write};
use std::future::Future;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, warn};

use crate::cache::{CacheArgs, CacheOptions, Cacheable, Expiry, Fetched, Memoized, ResponseCache};
use crate::context::{Context, ParamError};
use crate::middleware::LoggerMiddleware;
use crate::stats::{Category, StatsError, StatsService};
use crate::{Response, Router, StatusCode};

const ONE_DAY: u64 = 86_400;
const ONE_WEEK: u64 = 604_800;
const TEAMS_TTL: u64 = 1_200_000;

/// Arguments extracted from a request for one producer call.
trait FromContext: Sized {
    fn from_context(ctx: &Context) -> Result<Self, ParamError>;
}

impl FromContext for () {
    fn from_context(_ctx: &Context) -> Result<Self, ParamError> {
        Ok(())
    }
}

// Keyword-style arguments: positional part `()`, keyword part
// `{field: value, ...}` in declaration order.
macro_rules! keyword_args {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl CacheArgs for $ty {
            fn write_positional(&self, out: &mut String) -> fmt::Result {
                out.write_str("()")
            }

            fn write_keyword(&self, out: &mut String) -> fmt::Result {
                let fields: &[(&str, &dyn fmt::Debug)] = &[$((stringify!($field), &self.$field)),+];
                out.write_char('{')?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{name}: {value:?}")?;
                }
                out.write_char('}')
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadersQuery {
    pub number_of_players: i64,
    pub category: Category,
}

keyword_args!(LeadersQuery { number_of_players, category });

impl FromContext for LeadersQuery {
    fn from_context(ctx: &Context) -> Result<Self, ParamError> {
        Ok(Self {
            number_of_players: ctx.required_query("number_of_players")?,
            category: ctx.required_query("category")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
}

keyword_args!(SearchQuery { keyword });

impl FromContext for SearchQuery {
    fn from_context(ctx: &Context) -> Result<Self, ParamError> {
        Ok(Self {
            keyword: ctx.required_query("keyword")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerId {
    pub player_id: i64,
}

keyword_args!(PlayerId { player_id });

impl FromContext for PlayerId {
    fn from_context(ctx: &Context) -> Result<Self, ParamError> {
        Ok(Self {
            player_id: ctx.path_param("player_id")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: i64,
    pub players_per_page: i64,
}

keyword_args!(PageQuery { page, players_per_page });

impl FromContext for PageQuery {
    fn from_context(ctx: &Context) -> Result<Self, ParamError> {
        Ok(Self {
            page: ctx.query("page")?.unwrap_or(1),
            players_per_page: ctx.query("players_per_page")?.unwrap_or(10),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamId {
    pub team_id: i64,
}

keyword_args!(TeamId { team_id });

impl FromContext for TeamId {
    fn from_context(ctx: &Context) -> Result<Self, ParamError> {
        Ok(Self {
            team_id: ctx.path_param("team_id")?,
        })
    }
}

fn options(namespace: &str, secs: u64) -> CacheOptions {
    CacheOptions::new()
        .expiry(Expiry::seconds(secs))
        .namespace(namespace)
}

fn render<T: Cacheable>(result: Result<Fetched<T>, StatsError>) -> Response {
    match result {
        Ok(fetched) => {
            let cache_status = if fetched.is_cached() { "hit" } else { "miss" };
            match fetched.into_json() {
                Ok(body) => Response::json(StatusCode::Ok, &body).header("X-Cache", cache_status),
                Err(e) => {
                    error!(error = %e, "failed to encode response body");
                    Response::detail(StatusCode::InternalServerError, "failed to encode response")
                }
            }
        }
        Err(e) => {
            if e.status().as_u16() >= 500 {
                warn!(error = %e, "statistics request failed");
            }
            e.into()
        }
    }
}

fn cached_route<A, F, Fut, T>(router: &mut Router, path: &str, memoized: Memoized<F>)
where
    A: FromContext + CacheArgs + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, StatsError>> + Send + 'static,
    T: Cacheable + Send + 'static,
{
    let memoized = Arc::new(memoized);
    router.get(path, move |ctx: Context| {
        let memoized = Arc::clone(&memoized);
        async move {
            match A::from_context(&ctx) {
                Ok(args) => render(memoized.call(args).await),
                Err(e) => e.into(),
            }
        }
    });
}

/// Builds the facade router: request logging plus every route, each data
/// route memoized through `cache` under `namespace`.
pub fn routes(cache: &ResponseCache, stats: StatsService, namespace: &str) -> Router {
    let mut router = Router::new();
    router.layer(LoggerMiddleware);

    router.get("/health", |_ctx: Context| async {
        Response::json(StatusCode::Ok, &json!({ "status": "ok" }))
    });

    let s = stats.clone();
    cached_route(
        &mut router,
        "/players/categories",
        cache.memoize(
            "get_category_leaders",
            options(namespace, ONE_DAY),
            move |q: LeadersQuery| {
                let stats = s.clone();
                async move { stats.category_leaders(q.number_of_players, q.category).await }
            },
        ),
    );

    let s = stats.clone();
    cached_route(
        &mut router,
        "/players/search",
        cache.memoize(
            "get_players_by_search",
            options(namespace, ONE_WEEK),
            move |q: SearchQuery| {
                let stats = s.clone();
                async move { stats.search(&q.keyword).await }
            },
        ),
    );

    let s = stats.clone();
    cached_route(
        &mut router,
        "/players/:player_id/career-averages",
        cache.memoize(
            "get_player_career_averages",
            options(namespace, ONE_WEEK),
            move |p: PlayerId| {
                let stats = s.clone();
                async move { stats.career_averages(p.player_id).await }
            },
        ),
    );

    let s = stats.clone();
    cached_route(
        &mut router,
        "/players/:player_id",
        cache.memoize(
            "get_player_by_id",
            options(namespace, ONE_WEEK),
            move |p: PlayerId| {
                let stats = s.clone();
                async move { stats.player(p.player_id).await }
            },
        ),
    );

    let s = stats.clone();
    cached_route(
        &mut router,
        "/players",
        cache.memoize(
            "get_all_players",
            options(namespace, ONE_WEEK),
            move |q: PageQuery| {
                let stats = s.clone();
                async move { stats.player_page(q.page, q.players_per_page).await }
            },
        ),
    );

    let s = stats.clone();
    cached_route(
        &mut router,
        "/teams/:team_id/players",
        cache.memoize(
            "get_players_by_team",
            options(namespace, ONE_WEEK),
            move |t: TeamId| {
                let stats = s.clone();
                async move { stats.team_players(t.team_id).await }
            },
        ),
    );

    cached_route(
        &mut router,
        "/teams",
        cache.memoize(
            "get_teams",
            options(namespace, TEAMS_TTL),
            move |(): ()| {
                let stats = stats.clone();
                async move { Ok::<_, StatsError>(stats.teams()) }
            },
        ),
    );

    router
}
