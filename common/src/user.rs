use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal attached to a request by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}
