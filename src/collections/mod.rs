//! # Collections
//!
//! A collection is a named list of contract cases plus the variables their
//! paths refer to. The built-in collection covers the reqres user and
//! registration endpoints; other collections can be loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::method::HttpMethod;
use crate::testing::{Assertion, ContractCase};

const USERS: &str = "/api/users";
const USER: &str = "/api/users/{{user_id}}";
const REGISTER: &str = "/api/register";

/// Fixture user updated and deleted with a valid key.
pub const DEFAULT_USER_ID: &str = "2";
/// Separate fixture for the anonymous delete, so it never races the real delete.
pub const DEFAULT_PROTECTED_USER_ID: &str = "3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    pub cases: Vec<ContractCase>,
}

impl Collection {
    pub fn reqres() -> Self {
        Self {
            name: "reqres".to_string(),
            variables: default_variables(),
            cases: reqres_cases(),
        }
    }

    /// Keep only cases whose name contains one of the filters.
    pub fn select(mut self, filters: &[String]) -> Self {
        self.cases = select(self.cases, filters);
        self
    }

    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.name.as_str())
    }
}

pub fn default_variables() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("user_id".to_string(), DEFAULT_USER_ID.to_string()),
        (
            "protected_user_id".to_string(),
            DEFAULT_PROTECTED_USER_ID.to_string(),
        ),
    ])
}

pub fn select(cases: Vec<ContractCase>, filters: &[String]) -> Vec<ContractCase> {
    let filters: Vec<&str> = filters
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if filters.is_empty() {
        return cases;
    }
    cases
        .into_iter()
        .filter(|case| filters.iter().any(|f| case.name.contains(f)))
        .collect()
}

pub fn reqres_cases() -> Vec<ContractCase> {
    vec![
        ContractCase::new("create_user", HttpMethod::Post, USERS)
            .json(json!({"name": "morpheus", "job": "leader"}))
            .expect_status(201)
            .expect_echo()
            .expect(Assertion::present("id"))
            .expect(Assertion::present("createdAt")),
        ContractCase::new("update_user", HttpMethod::Put, USER)
            .json(json!({"name": "morpheus", "job": "zion resident"}))
            .expect_status(200)
            .expect_echo()
            .expect(Assertion::non_empty("updatedAt")),
        ContractCase::new("update_user_without_name", HttpMethod::Put, USER)
            .json(json!({"job": "zion resident"}))
            .expect_status(200)
            .expect_echo()
            .expect(Assertion::non_empty("updatedAt")),
        ContractCase::new("patch_user", HttpMethod::Patch, USER)
            .json(json!({"job": "zion resident"}))
            .expect_status(200)
            .expect_echo()
            .expect(Assertion::non_empty("updatedAt")),
        ContractCase::new("patch_user_full", HttpMethod::Patch, USER)
            .json(json!({"name": "morpheus", "job": "zion resident"}))
            .expect_status(200)
            .expect_echo()
            .expect(Assertion::non_empty("updatedAt")),
        ContractCase::new("delete_user", HttpMethod::Delete, USER)
            .expect_status(204)
            .expect(Assertion::BodyEmpty),
        ContractCase::new(
            "delete_user_without_api_key",
            HttpMethod::Delete,
            "/api/users/{{protected_user_id}}",
        )
        .anonymous()
        .expect_status(401),
        ContractCase::new("register_success", HttpMethod::Post, REGISTER)
            .json(json!({"email": "eve.holt@reqres.in", "password": "JUNO"}))
            .expect_status(200)
            .expect(Assertion::non_empty("id"))
            .expect(Assertion::non_empty("token"))
            .expect(Assertion::equals("id", 4))
            .expect(Assertion::equals("token", "QpwL5tke4Pnpja7X4")),
        ContractCase::new("register_missing_password", HttpMethod::Post, REGISTER)
            .json(json!({"email": "kva-kva@andrei.by"}))
            .expect_status(400)
            .expect(Assertion::non_empty("error")),
        ContractCase::new("register_missing_email", HttpMethod::Post, REGISTER)
            .json(json!({"password": "kva-kva"}))
            .expect_status(400)
            .expect(Assertion::non_empty("error")),
        ContractCase::new("register_invalid_email", HttpMethod::Post, REGISTER)
            .json(json!({"email": "kva-kva", "password": "JUNO"}))
            .expect_status(400)
            .expect(Assertion::non_empty("error")),
    ]
}
