use serde::{Deserialize, Serialize};

/// Identity handed over by the login flow and cached in the session store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}
