use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Unscheduled maintenance created by an acknowledgement lasts this long
/// unless the request says otherwise.
const DEFAULT_ACK_DURATION: i64 = 4 * 60 * 60;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Maintenance {
    pub entity: String,
    pub check: String,
    pub start_time: String,
    pub duration: i64,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckStatus {
    pub name: String,
    pub state: String,
    pub summary: Option<String>,
    pub notifications_tested: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    /// entity name -> checks, in insertion order
    pub entities: Vec<(String, Vec<CheckStatus>)>,
    pub scheduled: Vec<Maintenance>,
    pub unscheduled: Vec<Maintenance>,
    pub contacts: Vec<Contact>,
}

impl Store {
    /// A couple of entities and one contact to talk about.
    pub fn seeded() -> Self {
        let check = |name: &str, state: &str| CheckStatus {
            name: name.to_string(),
            state: state.to_string(),
            summary: None,
            notifications_tested: 0,
        };
        Store {
            entities: vec![
                ("web01".to_string(), vec![check("PING", "ok"), check("HTTP", "critical")]),
                ("db01".to_string(), vec![check("PING", "ok")]),
            ],
            contacts: vec![Contact {
                id: "21".to_string(),
                first_name: "Ada".to_string(),
                last_name: Some("Lovelace".to_string()),
                timezone: Some("Europe/London".to_string()),
            }],
            ..Store::default()
        }
    }

    fn checks(&self, entity: &str) -> Option<&[CheckStatus]> {
        self.entities
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, checks)| checks.as_slice())
    }

    fn checks_mut(&mut self, entity: &str) -> Option<&mut Vec<CheckStatus>> {
        self.entities
            .iter_mut()
            .find(|(name, _)| name == entity)
            .map(|(_, checks)| checks)
    }

    fn check_mut(&mut self, entity: &str, check: &str) -> Option<&mut CheckStatus> {
        self.checks_mut(entity)?.iter_mut().find(|c| c.name == check)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Params = HashMap<String, String>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/entities", get(list_entities))
        .route("/checks/{entity}", get(list_checks))
        .route("/status/{entity}", get(entity_status))
        .route("/status/{entity}/{check}", get(check_status))
        .route("/acknowledgements/{entity}/{check}", post(acknowledge))
        .route("/test_notifications/{entity}/{check}", post(test_notifications))
        .route("/scheduled_maintenances/{entity}", get(entity_scheduled))
        .route(
            "/scheduled_maintenances/{entity}/{check}",
            get(check_scheduled)
                .post(create_scheduled)
                .delete(delete_scheduled),
        )
        .route("/unscheduled_maintenances/{entity}", get(entity_unscheduled))
        .route("/unscheduled_maintenances/{entity}/{check}", get(check_unscheduled))
        .route("/outages/{entity}", get(entity_outages))
        .route("/outages/{entity}/{check}", get(check_outages))
        .route("/downtime/{entity}", get(entity_downtime))
        .route("/downtime/{entity}/{check}", get(check_downtime))
        .route("/contacts", get(list_contacts).post(create_contacts))
        .route("/contacts/{id}/timezone", get(contact_timezone).put(set_contact_timezone))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock flapjack api listening");
    axum::serve(listener, app()).await
}

async fn list_entities(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let entities: Vec<Value> = store
        .entities
        .iter()
        .map(|(name, checks)| json!({ "name": name, "checks": checks.len() }))
        .collect();
    Json(Value::Array(entities))
}

async fn list_checks(State(db): State<Db>, Path(entity): Path<String>) -> Result<Json<Vec<String>>, StatusCode> {
    let store = db.read().await;
    let checks = store.checks(&entity).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(checks.iter().map(|c| c.name.clone()).collect()))
}

async fn entity_status(
    State(db): State<Db>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<CheckStatus>>, StatusCode> {
    let store = db.read().await;
    let checks = store.checks(&entity).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(checks.to_vec()))
}

async fn check_status(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
) -> Result<Json<CheckStatus>, StatusCode> {
    let store = db.read().await;
    let status = store
        .checks(&entity)
        .and_then(|checks| checks.iter().find(|c| c.name == check))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(status.clone()))
}

async fn acknowledge(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
    Form(params): Form<Params>,
) -> StatusCode {
    let duration = match params.get("duration").map(|d| d.parse::<i64>()) {
        Some(Ok(d)) => d,
        Some(Err(_)) => return StatusCode::BAD_REQUEST,
        None => DEFAULT_ACK_DURATION,
    };
    let mut store = db.write().await;
    let Some(status) = store.check_mut(&entity, &check) else {
        return StatusCode::NOT_FOUND;
    };
    status.summary = params.get("summary").cloned();
    store.unscheduled.push(Maintenance {
        entity,
        check,
        start_time: params.get("start_time").cloned().unwrap_or_default(),
        duration,
        summary: params.get("summary").cloned(),
    });
    StatusCode::NO_CONTENT
}

async fn test_notifications(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
    Form(_params): Form<Params>,
) -> StatusCode {
    let mut store = db.write().await;
    match store.check_mut(&entity, &check) {
        Some(status) => {
            status.notifications_tested += 1;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn create_scheduled(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
    Form(params): Form<Params>,
) -> StatusCode {
    let (Some(start_time), Some(Ok(duration))) = (
        params.get("start_time"),
        params.get("duration").map(|d| d.parse::<i64>()),
    ) else {
        return StatusCode::BAD_REQUEST;
    };
    let mut store = db.write().await;
    if store.check_mut(&entity, &check).is_none() {
        return StatusCode::NOT_FOUND;
    }
    let maintenance = Maintenance {
        entity,
        check,
        start_time: start_time.clone(),
        duration,
        summary: params.get("summary").cloned(),
    };
    store.scheduled.push(maintenance);
    StatusCode::NO_CONTENT
}

async fn delete_scheduled(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> StatusCode {
    let Some(start_time) = params.get("start_time") else {
        return StatusCode::BAD_REQUEST;
    };
    let mut store = db.write().await;
    let before = store.scheduled.len();
    store
        .scheduled
        .retain(|m| !(m.entity == entity && m.check == check && &m.start_time == start_time));
    if store.scheduled.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn matching(list: &[Maintenance], entity: &str, check: Option<&str>) -> Vec<Maintenance> {
    list.iter()
        .filter(|m| m.entity == entity && check.map_or(true, |c| m.check == c))
        .cloned()
        .collect()
}

async fn entity_scheduled(State(db): State<Db>, Path(entity): Path<String>) -> Json<Vec<Maintenance>> {
    Json(matching(&db.read().await.scheduled, &entity, None))
}

async fn check_scheduled(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
) -> Json<Vec<Maintenance>> {
    Json(matching(&db.read().await.scheduled, &entity, Some(&check)))
}

async fn entity_unscheduled(State(db): State<Db>, Path(entity): Path<String>) -> Json<Vec<Maintenance>> {
    Json(matching(&db.read().await.unscheduled, &entity, None))
}

async fn check_unscheduled(
    State(db): State<Db>,
    Path((entity, check)): Path<(String, String)>,
) -> Json<Vec<Maintenance>> {
    Json(matching(&db.read().await.unscheduled, &entity, Some(&check)))
}

/// Echoes the requested window so callers can see what was received.
fn window(entity: &str, check: Option<&str>, params: &Params, key: &str) -> Value {
    let mut body = json!({
        "entity": entity,
        "check": check,
        "start_time": params.get("start_time"),
        "end_time": params.get("end_time"),
    });
    body[key] = json!([]);
    body
}

async fn entity_outages(Path(entity): Path<String>, Query(params): Query<Params>) -> Json<Value> {
    Json(window(&entity, None, &params, "outages"))
}

async fn check_outages(
    Path((entity, check)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Json<Value> {
    Json(window(&entity, Some(&check), &params, "outages"))
}

async fn entity_downtime(Path(entity): Path<String>, Query(params): Query<Params>) -> Json<Value> {
    Json(window(&entity, None, &params, "downtime"))
}

async fn check_downtime(
    Path((entity, check)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Json<Value> {
    Json(window(&entity, Some(&check), &params, "downtime"))
}

async fn list_contacts(State(db): State<Db>) -> Json<Vec<Contact>> {
    Json(db.read().await.contacts.clone())
}

#[derive(Deserialize)]
pub struct NewContact {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct NewContacts {
    pub contacts: Vec<NewContact>,
}

async fn create_contacts(State(db): State<Db>, Json(input): Json<NewContacts>) -> StatusCode {
    let mut store = db.write().await;
    for contact in input.contacts {
        store.contacts.push(Contact {
            id: contact.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            first_name: contact.first_name,
            last_name: contact.last_name,
            timezone: contact.timezone,
        });
    }
    StatusCode::NO_CONTENT
}

async fn contact_timezone(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let contact = store
        .contacts
        .iter()
        .find(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "timezone": contact.timezone })))
}

#[derive(Deserialize)]
pub struct SetTimezone {
    pub timezone: String,
}

async fn set_contact_timezone(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<SetTimezone>,
) -> StatusCode {
    let mut store = db.write().await;
    match store.contacts.iter_mut().find(|c| c.id == id) {
        Some(contact) => {
            contact.timezone = Some(input.timezone);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
