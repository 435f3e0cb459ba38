use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub email: String,

    #[serde(default)]
    pub username: Option<String>,
}

/// The already-verified identity injected into request extensions by the
/// auth middleware. Handlers only ever consume this; nothing in the core
/// authenticates.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(u: User) -> Self {
        CurrentUser {
            id: u.id,
            username: u.username.unwrap_or_else(|| u.email.clone()),
            email: u.email,
        }
    }
}
