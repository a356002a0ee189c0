//! Endpoint implementations for [`SponsorsClubClient`]
//!
//! Protected endpoints all go through `call`, so every one of them gets the
//! same refresh-and-retry behaviour.

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::{Map, Value, json};

use super::api::{AccountApi, AthleteApi, AuthApi};
use super::models::{
    Acknowledgement, Athlete, ChangePasswordRequest, Follow, FollowRequest, Preferences,
    RegisterRequest, ResourceId, User,
};
use super::pagination::{Page, PageParams};
use super::sponsorsclub::{SponsorsClubClient, decode};
use crate::error::{ApiError, Error, Result};

const REGISTER_PATH: &str = "/api/auth/register/";
const VERIFY_EMAIL_PATH: &str = "/api/auth/verify-email/";
const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password/";
const RESET_PASSWORD_CONFIRM_PATH: &str = "/api/auth/reset-password/confirm/";
const ME_PATH: &str = "/api/auth/me/";
const CHANGE_PASSWORD_PATH: &str = "/api/auth/change-password/";
const PREFERENCES_PATH: &str = "/api/auth/preferences/";
const ERASE_PATH: &str = "/api/privacy/erase/";
const ATHLETES_PATH: &str = "/api/athletes/";
const FOLLOWS_PATH: &str = "/api/follows/";
const FOLLOWED_ATHLETES_PATH: &str = "/api/followed/athletes/";

fn user_path(id: &ResourceId) -> String {
    format!("/api/users/{}/", id)
}

/// Decode an acknowledgement; endpoints that answer with no body acknowledge too.
fn acknowledgement(value: Value) -> Result<Acknowledgement> {
    if value.is_null() {
        return Ok(Acknowledgement::default());
    }
    decode(value)
}

/// Decode a list that may or may not be wrapped in `{results}`.
fn decode_list<T: serde::de::DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Object(mut map) if map.contains_key("results") => {
            decode(map.remove("results").unwrap_or(Value::Null))
        }
        Value::Null => Ok(Vec::new()),
        other => decode(other),
    }
}

impl SponsorsClubClient {
    /// GET on a public endpoint, with the bearer token attached when signed in.
    ///
    /// A 401 means the stored token went stale. The request is repeated once
    /// anonymously; nothing is refreshed or cleared.
    async fn public_get(&self, path: &str) -> Result<Value> {
        match self.public_call(Method::GET, path, None, true).await {
            Err(err) if err.as_api().and_then(ApiError::status) == Some(401) => {
                debug!("{} rejected the stored token, retrying anonymously", path);
                self.public_call(Method::GET, path, None, false).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl AuthApi for SponsorsClubClient {
    async fn login(&self, email: &str, password: &str) -> Result<()> {
        SponsorsClubClient::login(self, email, password).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User> {
        request.validate().map_err(Error::Validation)?;

        let body = serde_json::to_value(request)?;
        let value = self
            .public_call(Method::POST, REGISTER_PATH, Some(&body), false)
            .await?;
        decode(value)
    }

    async fn verify_email(&self, token: &str) -> Result<Acknowledgement> {
        let body = json!({ "token": token });
        let value = self
            .public_call(Method::POST, VERIFY_EMAIL_PATH, Some(&body), false)
            .await?;
        acknowledgement(value)
    }

    async fn request_password_reset(&self, email: &str) -> Result<Acknowledgement> {
        let body = json!({ "email": email });
        let value = self
            .public_call(Method::POST, RESET_PASSWORD_PATH, Some(&body), false)
            .await?;
        acknowledgement(value)
    }

    async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Acknowledgement> {
        let body = json!({ "token": token, "new_password": new_password });
        let value = self
            .public_call(Method::POST, RESET_PASSWORD_CONFIRM_PATH, Some(&body), false)
            .await?;
        acknowledgement(value)
    }
}

#[async_trait]
impl AccountApi for SponsorsClubClient {
    async fn me(&self) -> Result<User> {
        self.call_json(Method::GET, ME_PATH, None).await
    }

    async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm: Option<&str>,
    ) -> Result<Acknowledgement> {
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
            confirm_new_password: confirm.unwrap_or(new_password).to_string(),
        };
        let body = serde_json::to_value(&request)?;
        let value = self
            .call(Method::POST, CHANGE_PASSWORD_PATH, Some(&body))
            .await?;
        acknowledgement(value)
    }

    async fn update_preferences(&self, preferences: &Preferences) -> Result<Preferences> {
        let body = serde_json::to_value(preferences)?;
        let value = self.call(Method::POST, PREFERENCES_PATH, Some(&body)).await?;
        if value.is_null() {
            return Ok(preferences.clone());
        }
        decode(value)
    }

    async fn update_user(&self, id: &ResourceId, patch: &Map<String, Value>) -> Result<User> {
        let body = Value::Object(patch.clone());
        self.call_json(Method::PATCH, &user_path(id), Some(&body))
            .await
    }

    async fn replace_user(&self, id: &ResourceId, user: &Value) -> Result<User> {
        self.call_json(Method::PUT, &user_path(id), Some(user))
            .await
    }

    async fn update_profile(&self, patch: &Map<String, Value>) -> Result<User> {
        let current = self.me().await?;
        debug!("Updating profile of user {}", current.id);
        self.update_user(&current.id, patch).await
    }

    async fn erase_account(&self) -> Result<Acknowledgement> {
        let value = self.call(Method::POST, ERASE_PATH, None).await?;
        self.logout()?;
        acknowledgement(value)
    }
}

#[async_trait]
impl AthleteApi for SponsorsClubClient {
    async fn list_athletes(&self, params: PageParams) -> Result<Page<Athlete>> {
        let query = params
            .to_query_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("{}?{}", ATHLETES_PATH, query);
        let body = self.public_get(&path).await?;

        let request_url = format!("{}{}", self.base_url(), path);
        Ok(Page::from_body(body, params, &request_url)?)
    }

    async fn athlete(&self, id: &str) -> Result<Option<Athlete>> {
        let path = format!("{}{}/", ATHLETES_PATH, id);
        match self.public_get(&path).await {
            Ok(value) => return decode(value).map(Some),
            Err(err) if err.as_api().and_then(ApiError::status) == Some(404) => {
                debug!("No athlete with id {}, searching the directory by profile URL", id);
            }
            Err(err) => return Err(err),
        }

        let profile_url = format!("/athletes/{}", id);
        let mut params = PageParams::default();
        loop {
            let page = self.list_athletes(params).await?;
            let more = page.has_more() && !page.results.is_empty();
            let found = page.results.into_iter().find(|a| {
                a.profile_url.as_deref() == Some(profile_url.as_str()) || a.id.as_str() == id
            });
            if found.is_some() || !more {
                return Ok(found);
            }
            params = params.next();
        }
    }

    async fn follow(&self, athlete: &ResourceId) -> Result<Follow> {
        let body = serde_json::to_value(FollowRequest {
            athlete: athlete.clone(),
        })?;
        let value = self.call(Method::POST, FOLLOWS_PATH, Some(&body)).await?;
        if value.is_null() {
            return Ok(Follow {
                id: None,
                athlete: athlete.clone(),
                created_at: None,
                extra: Map::new(),
            });
        }
        decode(value)
    }

    async fn unfollow(&self, athlete: &ResourceId) -> Result<()> {
        let path = format!("{}by-athlete/{}/", FOLLOWS_PATH, athlete);
        self.call(Method::DELETE, &path, None).await?;
        Ok(())
    }

    async fn followed_athletes(&self) -> Result<Vec<Athlete>> {
        let value = self.call(Method::GET, FOLLOWED_ATHLETES_PATH, None).await?;
        decode_list(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::sponsorsclub::REFRESH_PATH;
    use crate::session::{MemorySessionStore, RecordingNavigator, Session, SessionStore};
    use mockito::{Matcher, Server};

    fn client(
        server: &Server,
        store: Arc<MemorySessionStore>,
        nav: Arc<RecordingNavigator>,
    ) -> SponsorsClubClient {
        SponsorsClubClient::builder()
            .base_url(server.url())
            .login_location("/login?origin=logout")
            .session_store(store)
            .navigator(nav)
            .build()
            .unwrap()
    }

    fn signed_in() -> Arc<MemorySessionStore> {
        Arc::new(MemorySessionStore::with_session(Session::new(
            "acc", "ref",
        )))
    }

    #[tokio::test]
    async fn test_register_posts_user_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", REGISTER_PATH)
            .match_body(Matcher::PartialJson(json!({
                "email": "new@example.com",
                "first_name": "Nina",
                "password": "Strong@Pass1"
            })))
            .with_status(201)
            .with_body(r#"{"id": "u-9", "email": "new@example.com", "first_name": "Nina"}"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let user = c
            .register(&RegisterRequest {
                email: "new@example.com".to_string(),
                password: "Strong@Pass1".to_string(),
                first_name: Some("Nina".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "u-9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password_locally() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", REGISTER_PATH)
            .expect(0)
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let err = c
            .register(&RegisterRequest {
                email: "new@example.com".to_string(),
                password: "weak".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(err.as_api().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_verify_email_surfaces_error_field() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", VERIFY_EMAIL_PATH)
            .match_body(Matcher::Json(json!({"token": "t-1"})))
            .with_status(400)
            .with_body(r#"{"error": "Lien de vérification expiré."}"#)
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let err = c.verify_email("t-1").await.unwrap_err();
        assert!(err.to_string().contains("Lien de vérification expiré."));
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let mut server = Server::new_async().await;
        let request = server
            .mock("POST", RESET_PASSWORD_PATH)
            .match_body(Matcher::Json(json!({"email": "a@example.com"})))
            .with_status(200)
            .with_body(r#"{"message": "Email sent"}"#)
            .create_async()
            .await;
        let confirm = server
            .mock("POST", RESET_PASSWORD_CONFIRM_PATH)
            .match_body(Matcher::Json(
                json!({"token": "tok", "new_password": "New@Pass123"}),
            ))
            .with_status(200)
            .with_body("")
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let ack = c.request_password_reset("a@example.com").await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Email sent"));
        let ack = c.confirm_password_reset("tok", "New@Pass123").await.unwrap();
        assert!(ack.message.is_none());

        request.assert_async().await;
        confirm.assert_async().await;
    }

    #[tokio::test]
    async fn test_change_password_defaults_confirmation() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CHANGE_PASSWORD_PATH)
            .match_header("authorization", "Bearer acc")
            .match_body(Matcher::Json(json!({
                "old_password": "Old@Pass1",
                "new_password": "New@Pass2",
                "confirm_new_password": "New@Pass2"
            })))
            .with_status(200)
            .with_body(r#"{"status": "success", "message": "Mot de passe changé avec succès."}"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let ack = c
            .change_password("Old@Pass1", "New@Pass2", None)
            .await
            .unwrap();

        assert_eq!(ack.status.as_deref(), Some("success"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_preferences() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PREFERENCES_PATH)
            .match_body(Matcher::Json(json!({"language": "fr", "currency": "EUR"})))
            .with_status(200)
            .with_body(r#"{"language": "fr", "currency": "EUR", "timezone": "Europe/Paris"}"#)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let prefs = c
            .update_preferences(&Preferences {
                language: Some("fr".to_string()),
                currency: Some("EUR".to_string()),
                timezone: None,
            })
            .await
            .unwrap();

        assert_eq!(prefs.timezone.as_deref(), Some("Europe/Paris"));
    }

    #[tokio::test]
    async fn test_update_profile_resolves_current_user() {
        let mut server = Server::new_async().await;
        let me = server
            .mock("GET", ME_PATH)
            .with_status(200)
            .with_body(r#"{"id": "u-1", "email": "a@example.com"}"#)
            .expect(1)
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/api/users/u-1/")
            .match_body(Matcher::Json(json!({"bio": "Marathon runner"})))
            .with_status(200)
            .with_body(r#"{"id": "u-1", "email": "a@example.com", "bio": "Marathon runner"}"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let mut fields = Map::new();
        fields.insert("bio".to_string(), json!("Marathon runner"));
        let user = c.update_profile(&fields).await.unwrap();

        assert_eq!(user.extra["bio"], "Marathon runner");
        me.assert_async().await;
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_user_uses_put() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/api/users/12/")
            .with_status(200)
            .with_body(r#"{"id": 12, "email": "b@example.com"}"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let user = c
            .replace_user(&ResourceId::from("12"), &json!({"email": "b@example.com"}))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "12");
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_erase_account_ends_session() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", ERASE_PATH)
            .with_status(200)
            .with_body(r#"{"message": "Compte supprimé"}"#)
            .create_async()
            .await;
        let store = signed_in();
        let nav = Arc::new(RecordingNavigator::new());
        let c = client(&server, store.clone(), nav.clone());

        let ack = c.erase_account().await.unwrap();

        assert_eq!(ack.message.as_deref(), Some("Compte supprimé"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(nav.locations(), vec!["/login?origin=logout"]);
    }

    #[tokio::test]
    async fn test_list_athletes_paginated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ATHLETES_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "2".into()),
                Matcher::UrlEncoded("offset".into(), "4".into()),
            ]))
            .match_header("authorization", "Bearer acc")
            .with_status(200)
            .with_body(
                r#"{"count": 9, "next": "http://x/api/athletes/?limit=2&offset=6",
                    "results": [{"id": "a-5", "name": "Ana", "is_followed": true}, {"id": "a-6"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let page = c.list_athletes(PageParams::new(2, 4)).await.unwrap();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].is_followed, Some(true));
        assert!(page.has_more());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_athletes_anonymous_without_refresh() {
        let mut server = Server::new_async().await;
        let anonymous = server
            .mock("GET", ATHLETES_PATH)
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"[{"id": "a-1"}, {"id": "a-2"}, {"id": "a-3"}]"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let page = c.list_athletes(PageParams::new(2, 0)).await.unwrap();

        assert_eq!(page.results.len(), 2);
        assert!(page.has_more());
        anonymous.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_athletes_stale_token_falls_back_to_anonymous() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", ATHLETES_PATH)
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer acc")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("GET", ATHLETES_PATH)
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"results": [{"id": "a-1"}], "next": null}"#)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .expect(0)
            .create_async()
            .await;
        let store = signed_in();
        let c = client(&server, store.clone(), Arc::default());

        let page = c.list_athletes(PageParams::default()).await.unwrap();

        assert_eq!(page.results.len(), 1);
        refresh.assert_async().await;
        assert!(store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_athlete_detail_sends_token_when_signed_in() {
        let mut server = Server::new_async().await;
        let detail = server
            .mock("GET", "/api/athletes/a-7/")
            .match_header("authorization", "Bearer acc")
            .with_status(200)
            .with_body(r#"{"id": "a-7", "name": "Ana Costa", "is_followed": true}"#)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let athlete = c.athlete("a-7").await.unwrap().unwrap();

        assert_eq!(athlete.name.as_deref(), Some("Ana Costa"));
        assert_eq!(athlete.is_followed, Some(true));
        detail.assert_async().await;
    }

    #[tokio::test]
    async fn test_athlete_detail_stale_token_falls_back_to_anonymous() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/athletes/a-7/")
            .match_header("authorization", "Bearer acc")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("GET", "/api/athletes/a-7/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"id": "a-7"}"#)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .expect(0)
            .create_async()
            .await;
        let store = signed_in();
        let nav = Arc::new(RecordingNavigator::default());
        let c = client(&server, store.clone(), nav.clone());

        let athlete = c.athlete("a-7").await.unwrap();

        assert_eq!(athlete.unwrap().id.as_str(), "a-7");
        refresh.assert_async().await;
        assert!(store.load().unwrap().is_some());
        assert!(nav.locations().is_empty());
    }

    #[tokio::test]
    async fn test_athlete_slug_is_resolved_through_the_directory() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/athletes/ana-costa/")
            .with_status(404)
            .with_body(r#"{"detail": "Not found."}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/athletes/nobody/")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", ATHLETES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id": "a-1", "profile_url": "/athletes/bo-lind"},
                    {"id": "a-2", "profile_url": "/athletes/ana-costa", "name": "Ana Costa"}]"#,
            )
            .create_async()
            .await;
        let c = client(&server, Arc::new(MemorySessionStore::new()), Arc::default());

        let athlete = c.athlete("ana-costa").await.unwrap().unwrap();
        assert_eq!(athlete.id.as_str(), "a-2");

        assert!(c.athlete("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let mut server = Server::new_async().await;
        let follow = server
            .mock("POST", FOLLOWS_PATH)
            .match_body(Matcher::Json(json!({"athlete": "a-7"})))
            .with_status(201)
            .with_body(r#"{"id": 3, "athlete": "a-7"}"#)
            .expect(1)
            .create_async()
            .await;
        let unfollow = server
            .mock("DELETE", "/api/follows/by-athlete/a-7/")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let record = c.follow(&ResourceId::from("a-7")).await.unwrap();
        assert_eq!(record.athlete.as_str(), "a-7");
        c.unfollow(&ResourceId::from("a-7")).await.unwrap();

        follow.assert_async().await;
        unfollow.assert_async().await;
    }

    #[tokio::test]
    async fn test_followed_athletes_after_silent_refresh() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", FOLLOWED_ATHLETES_PATH)
            .match_header("authorization", "Bearer acc")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", REFRESH_PATH)
            .with_status(200)
            .with_body(r#"{"access": "acc-2"}"#)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", FOLLOWED_ATHLETES_PATH)
            .match_header("authorization", "Bearer acc-2")
            .with_status(200)
            .with_body(r#"[{"id": "a-1", "name": "Ana"}, {"id": "a-2", "name": "Bo"}]"#)
            .create_async()
            .await;
        let c = client(&server, signed_in(), Arc::default());

        let athletes = c.followed_athletes().await.unwrap();

        assert_eq!(athletes.len(), 2);
        assert_eq!(athletes[1].name.as_deref(), Some("Bo"));
    }

    #[test]
    fn test_decode_list_shapes() {
        let wrapped: Vec<u8> = decode_list(json!({"results": [1, 2]})).unwrap();
        let bare: Vec<u8> = decode_list(json!([3])).unwrap();
        let empty: Vec<u8> = decode_list(Value::Null).unwrap();

        assert_eq!(wrapped, vec![1, 2]);
        assert_eq!(bare, vec![3]);
        assert!(empty.is_empty());
    }
}
