//! OAuth callback and token endpoint handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

/// `GET /oauth/callback?code=...`
///
/// Exchange the provider's authorization code for an access token, write
/// it into the caller's session, and 302 back to the frontend.
///
/// The token is written on any 200 from the provider, even when the
/// payload carries no `access_token`; the session then stores `None` and
/// `/api/token` keeps answering 401.
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCode)?;

    let token_response = state.oauth.exchange_code(code).await?;

    let existing = jar.get(&state.config.session_cookie).map(|c| c.value().to_string());
    let session_id = state.sessions.get_or_create(existing.as_deref()).await;
    state
        .sessions
        .set_access_token(&session_id, token_response.access_token.clone())
        .await;

    tracing::info!(
        session_id = %session_id,
        has_token = token_response.access_token.is_some(),
        "Code exchange completed"
    );

    let jar = jar.add(session_cookie(
        &state.config.session_cookie,
        &session_id,
        state.config.secure_cookies,
    ));

    // axum's Redirect has no 302 constructor; build it by hand
    Ok((StatusCode::FOUND, jar, [("Location", "/")]))
}

/// `GET /api/token`
///
/// Hand the frontend the current session's access token.
pub async fn get_token(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = jar
        .get(&state.config.session_cookie)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::NotAuthenticated)?;

    let token = state
        .sessions
        .access_token(&session_id)
        .await
        .ok_or(ApiError::NotAuthenticated)?;

    Ok(Json(serde_json::json!({ "access_token": token })))
}

/// Build the session cookie. No `Max-Age`: it lives for the browser
/// session only.
fn session_cookie(name: &str, session_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("testbed_session", "abc-123", true);
        assert_eq!(cookie.name(), "testbed_session");
        assert_eq!(cookie.value(), "abc-123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_none());
    }
}
