//! Single binary web server exposing the progression engine over a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! DEFAULT_TOTAL_MATCH, DEFAULT_TEAMS_PER_GROUP.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use esports_progression::{
    Engine, EngineConfig, ErrorKind, EventId, GroupId, MatchResult, NewRound, ProgressionError,
    RoundId, ServerConfig, Status, TeamId,
};
use serde::{Deserialize, Serialize};

type AppState = Data<Engine>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct CanCreateResponse {
    allowed: bool,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct CreateEventBody {
    name: String,
    #[serde(default)]
    teams: Vec<TeamId>,
}

#[derive(Deserialize)]
struct SubmitResultsBody {
    #[serde(default)]
    event_id: Option<EventId>,
    results: Vec<MatchResult>,
}

#[derive(Deserialize)]
struct RoundStatusBody {
    status: Status,
}

#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

#[derive(Deserialize)]
struct RoundPath {
    id: RoundId,
}

#[derive(Deserialize)]
struct GroupPath {
    id: GroupId,
}

/// Validation -> 400, not found -> 404, consistency -> 500.
fn error_response(e: ProgressionError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Consistency => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, ProgressionError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "esports-progression",
    })
}

/// Register an event with its team pool.
#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<CreateEventBody>) -> HttpResponse {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Event name must not be empty" }));
    }
    respond(state.register_event(body.name.trim(), body.teams))
}

#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.event(path.id))
}

/// Rounds of an event, by number.
#[get("/api/events/{id}/rounds")]
async fn api_list_rounds(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.rounds(path.id))
}

/// Default round to display: first ongoing, else the latest (null when none).
#[get("/api/events/{id}/rounds/current")]
async fn api_current_round(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.current_round(path.id))
}

#[get("/api/events/{id}/rounds/can-create")]
async fn api_can_create_round(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.check_round_creation(path.id) {
        Ok(()) => HttpResponse::Ok().json(CanCreateResponse {
            allowed: true,
            reason: None,
        }),
        Err(e) if e.kind() == ErrorKind::Validation => HttpResponse::Ok().json(CanCreateResponse {
            allowed: false,
            reason: Some(e.to_string()),
        }),
        Err(e) => error_response(e),
    }
}

#[post("/api/events/{id}/rounds")]
async fn api_create_round(
    state: AppState,
    path: Path<EventPath>,
    body: Json<NewRound>,
) -> HttpResponse {
    respond(state.create_round(path.id, body.into_inner()))
}

#[get("/api/rounds/{id}")]
async fn api_get_round(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.round(path.id))
}

/// Manual round completion (the only status accepted is "completed").
#[put("/api/rounds/{id}/status")]
async fn api_update_round_status(
    state: AppState,
    path: Path<RoundPath>,
    body: Json<RoundStatusBody>,
) -> HttpResponse {
    respond(state.update_round_status(path.id, body.status))
}

/// Delete a round with its groups (rejected once completed).
#[delete("/api/rounds/{id}")]
async fn api_delete_round(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.delete_round(path.id))
}

#[get("/api/rounds/{id}/groups")]
async fn api_list_groups(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.groups(path.id))
}

/// Create the round's groups from its team pool.
#[post("/api/rounds/{id}/groups")]
async fn api_create_groups(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.create_groups(path.id))
}

#[get("/api/groups/{id}")]
async fn api_get_group(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    respond(state.group(path.id))
}

#[get("/api/groups/{id}/standings")]
async fn api_group_standings(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    respond(state.standings(path.id))
}

#[get("/api/groups/{id}/schedule")]
async fn api_group_schedule(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    respond(state.match_schedule(path.id))
}

/// Submit one finished match for a group.
#[post("/api/groups/{id}/results")]
async fn api_submit_results(
    state: AppState,
    path: Path<GroupPath>,
    body: Json<SubmitResultsBody>,
) -> HttpResponse {
    respond(state.submit_match_results(path.id, body.event_id, &body.results))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let engine_config = EngineConfig::from_env();
    log::info!("Starting server at http://{}:{}", server.host, server.port);
    log::info!(
        "Engine defaults: {} match(es) per group, {} team(s) per group",
        engine_config.default_total_match,
        engine_config.default_teams_per_group
    );

    let state = Data::new(Engine::new(engine_config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_event)
            .service(api_get_event)
            .service(api_list_rounds)
            .service(api_current_round)
            .service(api_can_create_round)
            .service(api_create_round)
            .service(api_get_round)
            .service(api_update_round_status)
            .service(api_delete_round)
            .service(api_list_groups)
            .service(api_create_groups)
            .service(api_get_group)
            .service(api_group_standings)
            .service(api_group_schedule)
            .service(api_submit_results)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
