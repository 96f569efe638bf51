//! Pet-store REST API access.
//!
//! This module holds everything that talks to the remote service: the
//! endpoint registry, the per-test HTTP context, one client wrapper per
//! resource family, the raw response type and the domain payloads. Client
//! calls never interpret status codes; a non-2xx response is a valid,
//! inspectable outcome and only transport failures surface as
//! [`ApiError`].

pub mod clients;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod response;

pub use clients::{ApiClients, PetClient, StoreClient, UserClient};
pub use context::{ContextSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpContext};
pub use endpoints::{Endpoint, Operation, Resource};
pub use error::ApiError;
pub use models::{
    ApiMessage, Category, Inventory, Order, OrderStatus, Pet, PetStatus, StatusParseError, Tag,
    User,
};
pub use response::{ApiResponse, CapturedResponse, ResponseBody};
