//! LDP Kernel REST Service
//!
//! Exposes the record container over HTTP with a JSON triple document as the
//! body format.
//!
//! ## Endpoints
//!
//! - `GET /bugs` - Container, shaped by `Prefer`; honors `If-None-Match`
//! - `OPTIONS /bugs` - Container headers (`Allow`, `Link`, `Accept-Post`, `ETag`)
//! - `POST /bugs` - Create a record; `201` with `Location`
//! - `GET /bugs/creationDialog` - Creation dialog descriptor
//! - `OPTIONS /bugs/creationDialog` - `Allow` only
//! - `POST /bugs/sparql` - `SELECT` query over all records
//! - `GET /bugs/{id}` - Record; with `PreferCompact`, compact + record, or the
//!   `{"compact": ...}` envelope for a JSON `Accept`
//! - `OPTIONS /bugs/{id}` - Record headers (`Allow`, `Link`, `ETag`); 404 if absent
//! - `DELETE /bugs/{id}` - Delete a record
//! - `GET /bugs/{id}/compact` - Compact triples, or the summary for a JSON `Accept`
//! - `GET /bugs/{id}/preview` - Record display fields
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! ## Errors
//!
//! | Error | Status |
//! |-------|--------|
//! | `NotFound` | 404 |
//! | `NotModified` | 304 (with `ETag`) |
//! | `BadInput`, `BadQuery` | 400 |
//! | `AlreadyExists` | 409 |
//! | `LockTimeout` | 503 |

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
pub use routes::{create_router, ApiError, AppState, ErrorResponse, COMPACT_JSON};
pub use state::{ServiceConfig, ServiceState};
