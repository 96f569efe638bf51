//! Stateful in-memory pet store served through `wiremock`.
//!
//! Mount [`FakePetStore`] on a [`MockServer`] and the harness can run its
//! full scenario and spec catalogue against it. The store keeps pets,
//! orders and users in memory, answers with the demo service's status
//! codes and message bodies, and can be inspected afterwards to check
//! cleanup.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Pets present before any test runs, one per status.
pub const SEEDED_PET_IDS: [i64; 3] = [900_001, 900_002, 900_003];

#[derive(Debug, Default)]
struct Store {
    pets: BTreeMap<i64, Value>,
    orders: BTreeMap<i64, Value>,
    users: BTreeMap<String, Value>,
    next_id: i64,
}

impl Store {
    fn seeded() -> Self {
        let mut store = Self {
            next_id: 1_000,
            ..Self::default()
        };
        for (id, status) in SEEDED_PET_IDS.into_iter().zip(["available", "pending", "sold"]) {
            store.pets.insert(
                id,
                json!({"id": id, "name": format!("seed-{status}"), "photoUrls": [], "status": status}),
            );
        }
        store
    }

    fn assign_id(&mut self, body: &mut Value) -> i64 {
        if let Some(id) = body.get("id").and_then(Value::as_i64) {
            return id;
        }
        self.next_id += 1;
        let id = self.next_id;
        if let Some(map) = body.as_object_mut() {
            map.insert("id".to_owned(), json!(id));
        }
        id
    }
}

/// Handle to the fake service; clones share the same state.
#[derive(Debug, Clone)]
pub struct FakePetStore {
    store: Arc<Mutex<Store>>,
}

impl Default for FakePetStore {
    fn default() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::seeded())),
        }
    }
}

fn acknowledgement(message: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"code": 200, "type": "unknown", "message": message.into()}))
}

fn not_found(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"code": 1, "type": "error", "message": message}))
}

fn bad_input() -> ResponseTemplate {
    ResponseTemplate::new(400)
        .set_body_json(json!({"code": 400, "type": "unknown", "message": "bad input"}))
}

fn query(request: &Request, name: &str) -> String {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

impl FakePetStore {
    /// Starts a server with a fresh store mounted under `/v2`.
    pub async fn start() -> (MockServer, Self) {
        let server = MockServer::start().await;
        let fake = Self::default();
        Mock::given(path_regex("^/v2/"))
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pet ids currently stored, seeded pets included.
    pub fn pet_ids(&self) -> Vec<i64> {
        self.lock().pets.keys().copied().collect()
    }

    /// Order ids currently stored.
    pub fn order_ids(&self) -> Vec<i64> {
        self.lock().orders.keys().copied().collect()
    }

    /// Usernames currently stored.
    pub fn usernames(&self) -> Vec<String> {
        self.lock().users.keys().cloned().collect()
    }

    fn pets(&self, request: &Request, rest: &[&str]) -> ResponseTemplate {
        let mut store = self.lock();
        match (request.method.as_str(), rest) {
            ("POST", []) => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return bad_input();
                };
                let id = store.assign_id(&mut body);
                store.pets.insert(id, body.clone());
                ResponseTemplate::new(200).set_body_json(body)
            }
            ("PUT", []) => {
                let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
                    return bad_input();
                };
                match body.get("id").and_then(Value::as_i64) {
                    Some(id) if store.pets.contains_key(&id) => {
                        store.pets.insert(id, body.clone());
                        ResponseTemplate::new(200).set_body_json(body)
                    }
                    _ => not_found("Pet not found"),
                }
            }
            ("GET", ["findByStatus"]) => {
                let wanted = query(request, "status");
                let matching: Vec<&Value> = store
                    .pets
                    .values()
                    .filter(|pet| pet.get("status").and_then(Value::as_str) == Some(wanted.as_str()))
                    .collect();
                ResponseTemplate::new(200).set_body_json(matching)
            }
            ("GET", [id]) => match id.parse::<i64>().ok().and_then(|key| store.pets.get(&key)) {
                Some(pet) => ResponseTemplate::new(200).set_body_json(pet),
                None => not_found("Pet not found"),
            },
            ("DELETE", [id]) => match id.parse::<i64>().ok().and_then(|key| store.pets.remove(&key)) {
                Some(_) => acknowledgement(*id),
                None => ResponseTemplate::new(404),
            },
            _ => ResponseTemplate::new(405),
        }
    }

    fn store(&self, request: &Request, rest: &[&str]) -> ResponseTemplate {
        let mut store = self.lock();
        match (request.method.as_str(), rest) {
            ("GET", ["inventory"]) => {
                let mut counts: BTreeMap<String, i64> = BTreeMap::new();
                for pet in store.pets.values() {
                    let status = pet.get("status").and_then(Value::as_str).unwrap_or("unknown");
                    *counts.entry(status.to_owned()).or_default() += 1;
                }
                ResponseTemplate::new(200).set_body_json(counts)
            }
            ("POST", ["order"]) => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return bad_input();
                };
                let id = store.assign_id(&mut body);
                store.orders.insert(id, body.clone());
                ResponseTemplate::new(200).set_body_json(body)
            }
            ("GET", ["order", id]) => {
                match id.parse::<i64>().ok().and_then(|key| store.orders.get(&key)) {
                    Some(order) => ResponseTemplate::new(200).set_body_json(order),
                    None => not_found("Order not found"),
                }
            }
            ("DELETE", ["order", id]) => {
                match id.parse::<i64>().ok().and_then(|key| store.orders.remove(&key)) {
                    Some(_) => acknowledgement(*id),
                    None => ResponseTemplate::new(404).set_body_json(
                        json!({"code": 404, "type": "unknown", "message": "Order Not Found"}),
                    ),
                }
            }
            _ => ResponseTemplate::new(405),
        }
    }

    fn users(&self, request: &Request, rest: &[&str]) -> ResponseTemplate {
        let mut store = self.lock();
        match (request.method.as_str(), rest) {
            ("POST", []) => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return bad_input();
                };
                let Some(username) = body.get("username").and_then(Value::as_str).map(str::to_owned)
                else {
                    return bad_input();
                };
                let id = store.assign_id(&mut body);
                store.users.insert(username, body);
                acknowledgement(id.to_string())
            }
            ("GET", ["login"]) => {
                let username = query(request, "username");
                acknowledgement(format!("logged in user session:{}", username.len() * 1_000 + 7))
            }
            ("GET", ["logout"]) => acknowledgement("ok"),
            ("GET", [username]) => match store.users.get(*username) {
                Some(user) => ResponseTemplate::new(200).set_body_json(user),
                None => not_found("User not found"),
            },
            ("PUT", [username]) => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return bad_input();
                };
                let id = store.assign_id(&mut body);
                store.users.insert((*username).to_owned(), body);
                acknowledgement(id.to_string())
            }
            ("DELETE", [username]) => match store.users.remove(*username) {
                Some(_) => acknowledgement(*username),
                None => ResponseTemplate::new(404),
            },
            _ => ResponseTemplate::new(405),
        }
    }
}

impl Respond for FakePetStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_start_matches("/v2/")
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.split_first() {
            Some((&"pet", rest)) => self.pets(request, rest),
            Some((&"store", rest)) => self.store(request, rest),
            Some((&"user", rest)) => self.users(request, rest),
            _ => ResponseTemplate::new(404),
        }
    }
}
