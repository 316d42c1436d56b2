//! Read-only access to uploaded request photos.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/uploads/{filename}` | Raw bytes of a stored upload, 404 when missing |

pub mod routes;

pub use routes::routes;
