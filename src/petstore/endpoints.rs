//! Static registry of pet-store endpoints.
//!
//! Every logical operation maps to one HTTP method and one path template.
//! Templates with a `{...}` segment take a single path parameter (a numeric
//! id or a username) which [`Endpoint::path_with`] interpolates. The table
//! is constant: lookups cannot fail and have no side effects.

use std::fmt;

use reqwest::Method;

/// Resource family an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `/pet` endpoints.
    Pet,
    /// `/store` endpoints.
    Store,
    /// `/user` endpoints.
    User,
}

impl Resource {
    /// Lowercase label used in logs and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Store => "store",
            Self::User => "user",
        }
    }
}

/// Logical operations exposed by the pet store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Add a new pet.
    CreatePet,
    /// Replace an existing pet.
    UpdatePet,
    /// Fetch a pet by id.
    GetPet,
    /// List pets with a given status.
    FindPetsByStatus,
    /// Remove a pet.
    DeletePet,
    /// Status-name to count map.
    GetInventory,
    /// Place an order for a pet.
    PlaceOrder,
    /// Fetch an order by id.
    GetOrder,
    /// Remove an order.
    DeleteOrder,
    /// Register a user.
    CreateUser,
    /// Fetch a user by username.
    GetUser,
    /// Replace a user, keyed by username.
    UpdateUser,
    /// Remove a user.
    DeleteUser,
    /// Log a user in with query-string credentials.
    Login,
    /// Log the current session out.
    Logout,
}

impl Operation {
    /// Every operation in the registry, grouped by resource.
    pub const ALL: [Self; 15] = [
        Self::CreatePet,
        Self::UpdatePet,
        Self::GetPet,
        Self::FindPetsByStatus,
        Self::DeletePet,
        Self::GetInventory,
        Self::PlaceOrder,
        Self::GetOrder,
        Self::DeleteOrder,
        Self::CreateUser,
        Self::GetUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::Login,
        Self::Logout,
    ];

    /// Resource family the operation belongs to.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            Self::CreatePet
            | Self::UpdatePet
            | Self::GetPet
            | Self::FindPetsByStatus
            | Self::DeletePet => Resource::Pet,
            Self::GetInventory | Self::PlaceOrder | Self::GetOrder | Self::DeleteOrder => {
                Resource::Store
            }
            Self::CreateUser
            | Self::GetUser
            | Self::UpdateUser
            | Self::DeleteUser
            | Self::Login
            | Self::Logout => Resource::User,
        }
    }

    /// Endpoint (method and path template) for the operation.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::CreatePet => Endpoint::new(EndpointMethod::Post, PET),
            Self::UpdatePet => Endpoint::new(EndpointMethod::Put, PET),
            Self::GetPet => Endpoint::new(EndpointMethod::Get, PET_BY_ID),
            Self::FindPetsByStatus => Endpoint::new(EndpointMethod::Get, PET_FIND_BY_STATUS),
            Self::DeletePet => Endpoint::new(EndpointMethod::Delete, PET_BY_ID),
            Self::GetInventory => Endpoint::new(EndpointMethod::Get, STORE_INVENTORY),
            Self::PlaceOrder => Endpoint::new(EndpointMethod::Post, STORE_ORDER),
            Self::GetOrder => Endpoint::new(EndpointMethod::Get, STORE_ORDER_BY_ID),
            Self::DeleteOrder => Endpoint::new(EndpointMethod::Delete, STORE_ORDER_BY_ID),
            Self::CreateUser => Endpoint::new(EndpointMethod::Post, USER),
            Self::GetUser => Endpoint::new(EndpointMethod::Get, USER_BY_USERNAME),
            Self::UpdateUser => Endpoint::new(EndpointMethod::Put, USER_BY_USERNAME),
            Self::DeleteUser => Endpoint::new(EndpointMethod::Delete, USER_BY_USERNAME),
            Self::Login => Endpoint::new(EndpointMethod::Get, USER_LOGIN),
            Self::Logout => Endpoint::new(EndpointMethod::Get, USER_LOGOUT),
        }
    }
}

const PET: &str = "/pet";
const PET_BY_ID: &str = "/pet/{petId}";
const PET_FIND_BY_STATUS: &str = "/pet/findByStatus";
const STORE_INVENTORY: &str = "/store/inventory";
const STORE_ORDER: &str = "/store/order";
const STORE_ORDER_BY_ID: &str = "/store/order/{orderId}";
const USER: &str = "/user";
const USER_BY_USERNAME: &str = "/user/{username}";
const USER_LOGIN: &str = "/user/login";
const USER_LOGOUT: &str = "/user/logout";

/// HTTP verbs used by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl EndpointMethod {
    /// Converts to the `reqwest` method type.
    #[must_use]
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Method and path template for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    method: EndpointMethod,
    template: &'static str,
}

impl Endpoint {
    const fn new(method: EndpointMethod, template: &'static str) -> Self {
        Self { method, template }
    }

    /// HTTP method of the endpoint.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method.as_method()
    }

    /// Raw path template, e.g. `/pet/{petId}`.
    #[must_use]
    pub const fn template(&self) -> &'static str {
        self.template
    }

    /// Returns true when the template carries a path parameter.
    #[must_use]
    pub fn takes_parameter(&self) -> bool {
        self.template.contains('{')
    }

    /// Interpolates `value` into the template's path parameter.
    ///
    /// Templates without a parameter are returned unchanged.
    #[must_use]
    pub fn path_with(&self, value: impl fmt::Display) -> String {
        let Some(start) = self.template.find('{') else {
            return self.template.to_owned();
        };
        let Some(prefix) = self.template.get(..start) else {
            return self.template.to_owned();
        };
        format!("{prefix}{value}")
    }
}

/// Path for a pet by id.
#[must_use]
pub fn pet_by_id(id: i64) -> String {
    Operation::GetPet.endpoint().path_with(id)
}

/// Path for an order by id.
#[must_use]
pub fn order_by_id(id: i64) -> String {
    Operation::GetOrder.endpoint().path_with(id)
}

/// Path for a user by username.
#[must_use]
pub fn user_by_username(username: &str) -> String {
    Operation::GetUser.endpoint().path_with(username)
}
