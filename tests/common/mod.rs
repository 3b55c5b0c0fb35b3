use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::web::{self, Data};
use actix_web::{App, HttpResponse, HttpServer};
use chrono::FixedOffset;
use serde::Deserialize;
use serde_json::{Value, json};

use kintai::backend::BackendClient;
use kintai::config::{Config, GatewayKind};
use kintai::gateway::{self, ShiftGateway};
use kintai::service::AttendanceService;

pub type Shifts = Arc<Mutex<Vec<Value>>>;

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "userName")]
    user_name: Option<String>,
    limit: Option<usize>,
}

async fn list_shifts(store: Data<Shifts>, query: web::Query<ListQuery>) -> HttpResponse {
    if query.user_name.as_deref() == Some("missing") {
        return HttpResponse::NotFound().json(json!({"message": "user not found"}));
    }

    let shifts = store.lock().unwrap();
    let mut matching: Vec<Value> = shifts
        .iter()
        .filter(|shift| match &query.user_name {
            Some(user) => shift["UserName"] == user.as_str(),
            None => true,
        })
        .cloned()
        .collect();
    if let Some(limit) = query.limit {
        matching.truncate(limit);
    }
    HttpResponse::Ok().json(matching)
}

async fn create_shift(store: Data<Shifts>, body: web::Json<Value>) -> HttpResponse {
    store.lock().unwrap().push(body.clone());
    HttpResponse::Created().json(body.into_inner())
}

async fn create_user_shift(
    store: Data<Shifts>,
    user: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut shift = body.into_inner();
    shift["UserName"] = json!(user.into_inner());
    store.lock().unwrap().push(shift.clone());
    HttpResponse::Created().json(shift)
}

async fn list_users() -> HttpResponse {
    HttpResponse::Ok().json(json!([{"ID": 1, "Name": "taro", "Email": "taro@example.com"}]))
}

async fn create_user(body: web::Json<Value>) -> HttpResponse {
    if body["Name"] == "conflict" {
        return HttpResponse::Conflict().body("duplicate");
    }
    HttpResponse::Created().json(json!({"ID": 2, "Name": body["Name"], "Email": body["Email"]}))
}

/// Starts an in-process stand-in for the shift backend; returns its base URL.
pub fn spawn_backend(shifts: Shifts) -> String {
    let store = Data::new(shifts);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .route("/shifts", web::get().to(list_shifts))
            .route("/shifts", web::post().to(create_shift))
            .route("/shifts/{user}", web::post().to(create_user_shift))
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

pub fn shift(user: &str, start: &str, end: &str) -> Value {
    json!({
        "UserName": user,
        "StartTime": start,
        "EndTime": end,
        "WorkContent": "work",
        "Issues": ""
    })
}

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn config(backend_url: &str, gateway: GatewayKind, rate_proxy_per_min: u32) -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        backend_base_url: backend_url.to_string(),
        api_prefix: "/api".to_string(),
        gateway,
        local_store_dir: PathBuf::from("unused"),
        display_offset: jst(),
        rate_proxy_per_min,
        log_dir: "logs".to_string(),
    }
}

pub fn state(config: &Config) -> (Data<AttendanceService>, Data<BackendClient>) {
    let backend = BackendClient::new(&config.backend_base_url).unwrap();
    let shift_gateway: Arc<dyn ShiftGateway> =
        gateway::from_config(config, backend.clone()).unwrap();
    let service = AttendanceService::new(shift_gateway, backend.clone(), config.display_offset);
    (Data::new(service), Data::new(backend))
}
