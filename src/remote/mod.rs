//! Remote collection access.
//!
//! [`UserGateway`] is the seam between the controller and the network;
//! [`HttpGateway`] is the reqwest-backed implementation used by the binary.

mod http;

pub use http::{DEFAULT_BASE_URL, HttpGateway};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{NewUser, User, UserId, UserPatch};

/// The four CRUD calls against one fixed resource collection.
///
/// Every call is a single request: no retries, no deduplication, and no
/// timeout beyond the transport default.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Fetch the whole collection in server order.
    async fn list(&self) -> Result<Vec<User>>;

    /// Create a record and return it with its server-assigned id.
    async fn create(&self, draft: &NewUser) -> Result<User>;

    /// Update a record. The response body is not used.
    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<()>;

    /// Delete a record. The response body is not used.
    async fn delete(&self, id: UserId) -> Result<()>;
}
