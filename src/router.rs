//! Request routing
//!
//! Maps a parsed request onto the static table or the dynamic store and
//! picks the status code:
//!
//! | Path          | Method | Result                                        |
//! |---------------|--------|-----------------------------------------------|
//! | any           | HEAD   | 501                                           |
//! | `/static/*`   | GET    | 200 with content, or 404                      |
//! | `/static/*`   | other  | 405                                           |
//! | `/dynamic/*`  | GET    | 200 with content, or 404                      |
//! | `/dynamic/*`  | PUT    | 204 updated, 201 created, 507 store full      |
//! | `/dynamic/*`  | DELETE | 204 deleted, or 404                           |
//! | `/dynamic/*`  | other  | 405                                           |
//! | anything else | any    | 404                                           |

use crate::config::ContentLengthPolicy;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::resources::{PutOutcome, SharedStore, StaticTable, StoreError};

pub const STATIC_PREFIX: &str = "/static/";
pub const DYNAMIC_PREFIX: &str = "/dynamic/";

/// Dispatches requests against the static table and the shared store.
#[derive(Debug, Clone)]
pub struct Router {
    statics: StaticTable,
    store: SharedStore,
    policy: ContentLengthPolicy,
}

impl Router {
    pub fn new(statics: StaticTable, store: SharedStore, policy: ContentLengthPolicy) -> Self {
        Self {
            statics,
            store,
            policy,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub async fn dispatch(&self, req: &Request) -> Response {
        if req.method == Method::HEAD {
            return Response::empty(StatusCode::NotImplemented);
        }

        if req.path.starts_with(STATIC_PREFIX) {
            return self.handle_static(req);
        }

        if req.path.starts_with(DYNAMIC_PREFIX) {
            return self.handle_dynamic(req).await;
        }

        Response::not_found()
    }

    fn handle_static(&self, req: &Request) -> Response {
        if req.method != Method::GET {
            return Response::empty(StatusCode::MethodNotAllowed);
        }

        match self.statics.get(&req.path) {
            Some(resource) => Response::ok(resource.content),
            None => Response::not_found(),
        }
    }

    async fn handle_dynamic(&self, req: &Request) -> Response {
        match req.method {
            Method::GET => match self.store.get(&req.path).await {
                Some(content) => Response::ok(content),
                None => Response::not_found(),
            },
            Method::PUT => self.put(req).await,
            Method::DELETE => {
                if self.store.remove(&req.path).await {
                    tracing::debug!(path = %req.path, "Dynamic resource deleted");
                    Response::empty(StatusCode::NoContent)
                } else {
                    Response::empty(StatusCode::NotFound)
                }
            }
            _ => Response::empty(StatusCode::MethodNotAllowed),
        }
    }

    async fn put(&self, req: &Request) -> Response {
        if self.policy == ContentLengthPolicy::Required && req.content_length().is_none() {
            return Response::new(StatusCode::LengthRequired, "Content-Length Header Missing");
        }

        match self.store.put(&req.path, req.body.clone()).await {
            Ok(PutOutcome::Created(slot)) => {
                tracing::debug!(path = %req.path, slot, len = req.body.len(), "Dynamic resource created");
                Response::empty(StatusCode::Created)
            }
            Ok(PutOutcome::Updated(slot)) => {
                tracing::debug!(path = %req.path, slot, len = req.body.len(), "Dynamic resource updated");
                Response::empty(StatusCode::NoContent)
            }
            Err(StoreError::CapacityExceeded { capacity }) => {
                tracing::warn!(path = %req.path, capacity, "Dynamic store is full");
                Response::empty(StatusCode::InsufficientStorage)
            }
            Err(e) => {
                tracing::debug!(path = %req.path, error = %e, "Dynamic resource rejected");
                Response::bad_request(e.to_string())
            }
        }
    }
}
