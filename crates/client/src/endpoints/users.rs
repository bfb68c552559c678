//! `/users` endpoints

use tally_core::company::{NewUser, UserPatch, UserRecord};
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::{Ack, Envelope};
use crate::error::Result;

pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Look a user up by email. An unknown email is `Ok(None)`, not an error,
    /// and so is an answer that is not `success` or carries no record.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let path = format!("/users/by-email/{}", urlencoding::encode(email));
        match self.client.get::<Envelope<UserRecord>>(&path).await {
            Ok(envelope) if envelope.is_success() => Ok(envelope.data),
            Ok(envelope) => {
                debug!("No user for {} (status '{}')", email, envelope.status);
                Ok(None)
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<UserRecord> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        self.client
            .get::<Envelope<UserRecord>>(&path)
            .await?
            .into_data()
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        self.client
            .get::<Envelope<Vec<UserRecord>>>("/users/")
            .await?
            .into_data()
    }

    /// Create a user record. The backend rejects the call if the email is
    /// already linked to a company.
    pub async fn create(&self, user: &NewUser) -> Result<Vec<UserRecord>> {
        self.client
            .post::<Envelope<Vec<UserRecord>>, _>("/users/", user)
            .await?
            .into_data()
    }

    /// Patch a user record. Changing an existing company link is rejected by
    /// the backend.
    pub async fn update(&self, user_id: &str, patch: &UserPatch) -> Result<Vec<UserRecord>> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        self.client
            .patch::<Envelope<Vec<UserRecord>>, _>(&path, patch)
            .await?
            .into_data()
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        self.client.delete::<Ack>(&path).await?.ensure_success()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::spawn_backend;
    use crate::{ApiClient, ClientConfig};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use serde_json::json;
    use tally_core::company::{NewUser, UserPatch};

    async fn by_email(Path(email): Path<String>) -> impl IntoResponse {
        match email.as_str() {
            "owner@acme.test" => (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "data": {"id": "u1", "email": email, "company_id": "co_42"}
                })),
            ),
            "new+tag@acme.test" => (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "data": {"id": "u2", "email": email, "company_id": null}
                })),
            ),
            "empty@acme.test" => (
                StatusCode::OK,
                Json(json!({"status": "success", "data": null})),
            ),
            "refused@acme.test" => (
                StatusCode::OK,
                Json(json!({"status": "error", "message": "lookup failed"})),
            ),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "User not found."})),
            ),
        }
    }

    fn router() -> Router {
        Router::new()
            .route("/users/by-email/{email}", get(by_email))
            .route(
                "/users/",
                post(|Json(body): Json<serde_json::Value>| async move {
                    Json(json!({"status": "success", "data": [body]}))
                }),
            )
            .route(
                "/users/{id}",
                patch(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"detail": "Cannot change company association. One email can only be associated with one company."})),
                    )
                })
                .delete(|Path(id): Path<String>| async move {
                    Json(json!({"status": "success", "message": format!("User {id} deleted successfully.")}))
                }),
            )
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let client = ApiClient::new(ClientConfig::new(spawn_backend(router()).await));

        let linked = client
            .users()
            .find_by_email("owner@acme.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.linked_company(), Some("co_42"));

        let unlinked = client
            .users()
            .find_by_email("new+tag@acme.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unlinked.linked_company(), None);

        let missing = client
            .users()
            .find_by_email("ghost@acme.test")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_without_record_is_none() {
        let client = ApiClient::new(ClientConfig::new(spawn_backend(router()).await));

        for email in ["empty@acme.test", "refused@acme.test"] {
            assert!(client
                .users()
                .find_by_email(email)
                .await
                .unwrap()
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_create_echoes_record() {
        let client = ApiClient::new(ClientConfig::new(spawn_backend(router()).await));

        let created = client
            .users()
            .create(&NewUser {
                id: "u3".into(),
                email: "x@acme.test".into(),
                full_name: "x".into(),
                company_id: "co_1".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].linked_company(), Some("co_1"));
    }

    #[tokio::test]
    async fn test_update_conflict_surfaces_detail() {
        let client = ApiClient::new(ClientConfig::new(spawn_backend(router()).await));

        let err = client
            .users()
            .update("u1", &UserPatch::company("co_2"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(err.user_message().starts_with("Cannot change company association."));
    }

    #[tokio::test]
    async fn test_delete() {
        let client = ApiClient::new(ClientConfig::new(spawn_backend(router()).await));
        client.users().delete("u1").await.unwrap();
    }
}
