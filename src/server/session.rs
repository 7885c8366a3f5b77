use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use uuid::Uuid;

use crate::error::Error;

pub const SESSION_HEADER: &str = "x-session-id";

/// The browser session a request belongs to; route plans are cached per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session(pub Uuid);

#[async_trait]
impl<B> FromRequest<B> for Session
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let id = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(Error::missing_session_error)?;

        Ok(Session(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<Session, Error> {
        let mut builder = Request::builder().uri("/route");
        if let Some(value) = header {
            builder = builder.header(SESSION_HEADER, value);
        }
        let mut parts = RequestParts::new(builder.body(Body::empty()).unwrap());

        Session::from_request(&mut parts).await
    }

    #[tokio::test]
    async fn session_id_is_read_from_header() {
        let id = Uuid::new_v4();

        let session = extract(Some(&id.to_string())).await.unwrap();

        assert_eq!(session, Session(id));
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_rejected() {
        assert_eq!(extract(None).await.unwrap_err().code, 103);
        assert_eq!(extract(Some("not-a-uuid")).await.unwrap_err().code, 103);
    }
}
