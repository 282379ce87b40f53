//! Customer Model
//!
//! Customer accounts are owned by the storefront; the back-office only
//! reads them to label orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

/// Customer for creation (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerCreate> for Customer {
    fn from(data: CustomerCreate) -> Self {
        Self {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            role: default_role(),
            status: default_status(),
            avatar: None,
        }
    }
}
