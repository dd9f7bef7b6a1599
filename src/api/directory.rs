//
//  cydarm-connector
//  api/directory.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User and ACL lookups.

use serde_json::Value;

use super::client::{CydarmClient, RequestOptions};
use super::common::ApiError;

impl CydarmClient {
    /// `GET /user/{uuid}`
    pub async fn get_user(&self, user_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/user/{}", user_uuid), RequestOptions::new())
            .await
    }

    /// `GET /acl/{uuid}`
    pub async fn get_acl(&self, acl_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/acl/{}", acl_uuid), RequestOptions::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_get_acl_with_basic_auth() {
        let mut server = Server::new_async().await;
        let expected_auth = crate::auth::BasicCredentials::new("basic", "basic").header_value();
        server
            .mock("POST", "/auth/password")
            .match_header("authorization", expected_auth.as_str())
            .with_status(200)
            .with_header("Access-Token", "acl-token")
            .create_async()
            .await;
        let acl = server
            .mock("GET", "/acl/acl-1")
            .match_header("authorization", expected_auth.as_str())
            .match_header("x-cydarm-authz", "acl-token")
            .with_status(200)
            .with_body(r#"{"uuid": "acl-1", "description": "SOC"}"#)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), "u", "p")
            .with_basic_auth(crate::auth::BasicCredentials::new("basic", "basic"));
        let value = client.get_acl("acl-1").await.unwrap();

        assert_eq!(value["description"], "SOC");
        acl.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_user_without_basic_auth() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_header("Access-Token", "user-token")
            .create_async()
            .await;
        server
            .mock("GET", "/user/u1")
            .match_header("x-cydarm-authz", "user-token")
            .with_status(200)
            .with_body(r#"{"uuid": "u1", "username": "analyst"}"#)
            .create_async()
            .await;

        let user = CydarmClient::new(server.url(), "u", "p")
            .get_user("u1")
            .await
            .unwrap();
        assert_eq!(user["username"], "analyst");
    }
}
