//! Appliance repair requests submitted by clients.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/requests` | Submit a request (multipart with optional `image` file, or JSON) |
//! | GET | `/api/requests` | List every request, newest first |

pub mod dtos;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::RequestService;
