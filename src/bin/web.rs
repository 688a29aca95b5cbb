//! Single binary web server hosting tournaments in memory. API via REST/JSON.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use battle_tournament::config::ServerConfig;
use battle_tournament::export::queue_csv;
use battle_tournament::{
    advance_stored, deactivate, move_battle, record_result, start_battle, BattleId, Category,
    CategoryId, DancerId, EngineError, EngineResult, InMemoryStore, Outcome, PreselectionFormat,
    Tournament, TournamentId, TournamentStore,
};
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state: every tournament by id. One write lock serializes all mutations.
type AppState = Data<RwLock<InMemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
}

#[derive(Deserialize)]
struct AddCategoryBody {
    name: String,
    groups_ideal: usize,
    performers_ideal: usize,
    #[serde(default)]
    is_duo: bool,
    #[serde(default)]
    preselection_format: PreselectionFormat,
}

#[derive(Deserialize)]
struct RegisterPerformerBody {
    dancers: Vec<DancerId>,
    #[serde(default)]
    guest: bool,
}

#[derive(Deserialize)]
struct PositionBody {
    position: usize,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct CategoryPath {
    id: TournamentId,
    category_id: CategoryId,
}

#[derive(Deserialize)]
struct BattlePath {
    id: TournamentId,
    category_id: CategoryId,
    battle_id: BattleId,
}

fn error_response(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::TournamentNotFound(_)
        | EngineError::CategoryNotFound(_)
        | EngineError::BattleNotFound(_)
        | EngineError::PerformerNotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::InvariantViolation(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        EngineError::InsufficientRegistrations { .. }
        | EngineError::NoCategories
        | EngineError::Validation(_) => HttpResponse::BadRequest().json(body),
    }
}

/// Run `f` on one tournament under the write lock; reply with the updated tournament.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> EngineResult<()>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get_mut(id) {
        Some(t) => t,
        None => return error_response(&EngineError::TournamentNotFound(id)),
    };
    match f(&mut *t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => {
            log::warn!("Tournament {}: request rejected: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "battle-tournament",
    })
}

/// Create a new tournament in Registration.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let tournament = Tournament::new(body.name.trim());
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.save(tournament);
    response
}

/// All tournaments, oldest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let tournaments: Vec<&Tournament> = g.list().into_iter().filter_map(|id| g.get(id)).collect();
    HttpResponse::Ok().json(tournaments)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => error_response(&EngineError::TournamentNotFound(path.id)),
    }
}

/// Add a category (Registration only).
#[post("/api/tournaments/{id}/categories")]
async fn api_add_category(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddCategoryBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let category = Category::new(
            body.name.trim(),
            body.groups_ideal,
            body.performers_ideal,
            body.is_duo,
        )?
        .with_format(body.preselection_format);
        t.add_category(category).map(|_| ())
    })
}

/// Register a performer or guest (Registration only).
#[post("/api/tournaments/{id}/categories/{category_id}/performers")]
async fn api_register_performer(
    state: AppState,
    path: Path<CategoryPath>,
    body: Json<RegisterPerformerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, |t| {
        if body.guest {
            t.register_guest(path.category_id, body.dancers).map(|_| ())
        } else {
            t.register_performer(path.category_id, body.dancers).map(|_| ())
        }
    })
}

/// Move to the next phase.
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match advance_stored(&mut *g, path.id) {
        Ok(_) => match g.get(path.id) {
            Some(t) => HttpResponse::Ok().json(t),
            None => error_response(&EngineError::TournamentNotFound(path.id)),
        },
        Err(e) => {
            log::warn!("Tournament {}: advance rejected: {}", path.id, e);
            error_response(&e)
        }
    }
}

/// Administrative cancellation.
#[post("/api/tournaments/{id}/deactivate")]
async fn api_deactivate(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        deactivate(t);
        Ok(())
    })
}

/// Pending battles in presentation order.
#[get("/api/tournaments/{id}/queue")]
async fn api_queue(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(path.id) {
        Some(t) => HttpResponse::Ok().json(t.pending_queue()),
        None => error_response(&EngineError::TournamentNotFound(path.id)),
    }
}

/// Full battle queue as CSV, for printing.
#[get("/api/tournaments/{id}/queue.csv")]
async fn api_queue_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(t) = g.get(path.id) else {
        return error_response(&EngineError::TournamentNotFound(path.id));
    };
    match queue_csv(t) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("export error")
        }
    }
}

/// Put the on-deck battle on stage.
#[post("/api/tournaments/{id}/categories/{category_id}/battles/{battle_id}/start")]
async fn api_start_battle(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        start_battle(t, path.category_id, path.battle_id)
    })
}

/// Record a battle result; tiebreaks and next rounds are queued as needed.
#[put("/api/tournaments/{id}/categories/{category_id}/battles/{battle_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<BattlePath>,
    body: Json<Outcome>,
) -> HttpResponse {
    let outcome = body.into_inner();
    with_tournament(&state, path.id, |t| {
        let created = record_result(t, path.category_id, path.battle_id, outcome)?;
        if !created.is_empty() {
            log::info!("Tournament {}: {} battle(s) added after result", path.id, created.len());
        }
        Ok(())
    })
}

/// Move a pending battle within its category's queue.
#[put("/api/tournaments/{id}/categories/{category_id}/battles/{battle_id}/position")]
async fn api_reorder(
    state: AppState,
    path: Path<BattlePath>,
    body: Json<PositionBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        move_battle(t, path.category_id, path.battle_id, body.position)
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(InMemoryStore::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_add_category)
            .service(api_register_performer)
            .service(api_advance)
            .service(api_deactivate)
            .service(api_queue_csv)
            .service(api_queue)
            .service(api_start_battle)
            .service(api_record_result)
            .service(api_reorder)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
