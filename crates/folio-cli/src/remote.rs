//! Gateway talking to a `folio-server` over HTTP.
//!
//! `ureq` is blocking, so every request runs on tokio's blocking pool.

use async_trait::async_trait;
use folio_core::gateway::require_owner;
use folio_core::{Artefact, ArtefactGateway, FolioError, UserId};
use std::time::Duration;
use uuid::Uuid;

const USER_ID_HEADER: &str = "x-user-id";

pub struct HttpGateway {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

/// Maps a server error status onto the portfolio error it stands for.
pub fn status_error(status: u16, body: &str, id: Option<Uuid>) -> FolioError {
    match (status, id) {
        (401, _) => FolioError::AuthenticationRequired,
        (404, Some(id)) => FolioError::NotFound(id),
        _ => FolioError::Persistence(format!("server responded {}: {}", status, body.trim())),
    }
}

fn request_error(error: ureq::Error, id: Option<Uuid>) -> FolioError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            status_error(status, &body, id)
        }
        ureq::Error::Transport(transport) => {
            FolioError::Persistence(format!("server unreachable: {}", transport))
        }
    }
}

async fn blocking<T, F>(call: F) -> folio_core::Result<T>
where
    F: FnOnce() -> folio_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(FolioError::persistence)?
}

#[async_trait]
impl ArtefactGateway for HttpGateway {
    async fn fetch_all(&self, owner: Option<&UserId>) -> folio_core::Result<Vec<Artefact>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };

        let request = self
            .agent
            .get(&self.url("/artefacts"))
            .set(USER_ID_HEADER, &owner.to_string());
        blocking(move || {
            let response = request.call().map_err(|e| request_error(e, None))?;
            response
                .into_json::<Vec<Artefact>>()
                .map_err(|e| FolioError::MalformedRecord(e.to_string()))
        })
        .await
    }

    async fn insert(&self, owner: Option<&UserId>, artefact: &Artefact) -> folio_core::Result<()> {
        let owner = require_owner(owner)?;

        let request = self
            .agent
            .post(&self.url("/artefacts"))
            .set(USER_ID_HEADER, &owner.to_string());
        let artefact = artefact.clone();
        blocking(move || {
            request
                .send_json(&artefact)
                .map_err(|e| request_error(e, None))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, owner: Option<&UserId>, artefact: &Artefact) -> folio_core::Result<()> {
        let owner = require_owner(owner)?;

        let id = artefact.id();
        let request = self
            .agent
            .put(&self.url(&format!("/artefacts/{}", id)))
            .set(USER_ID_HEADER, &owner.to_string());
        let artefact = artefact.clone();
        blocking(move || {
            request
                .send_json(&artefact)
                .map_err(|e| request_error(e, Some(id)))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ArtefactDraft, Unit};

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_error(401, "Please sign in", None),
            FolioError::AuthenticationRequired
        );
        assert_eq!(status_error(404, "", Some(id)), FolioError::NotFound(id));
        assert!(matches!(
            status_error(404, "no route", None),
            FolioError::Persistence(_)
        ));
        assert_eq!(
            status_error(500, "Internal server error\n", None),
            FolioError::Persistence("server responded 500: Internal server error".to_string())
        );
    }

    #[test]
    fn test_urls() {
        let gateway = HttpGateway::new("http://localhost:3000/");
        assert_eq!(gateway.base_url(), "http://localhost:3000");
        assert_eq!(
            gateway.url("/artefacts"),
            "http://localhost:3000/api/v1/artefacts"
        );
    }

    #[tokio::test]
    async fn test_signed_out_never_hits_the_network() {
        // Nothing listens on this port; a request would fail with Persistence.
        let gateway = HttpGateway::new("http://127.0.0.1:9");
        assert!(gateway.fetch_all(None).await.unwrap().is_empty());

        let artefact = Artefact::create(ArtefactDraft {
            unit: Unit::new(1).unwrap(),
            title: "Persona".to_string(),
            kind: "Design".to_string(),
            link: String::new(),
            summary: String::new(),
        });
        assert_eq!(
            gateway.insert(None, &artefact).await,
            Err(FolioError::AuthenticationRequired)
        );
        assert_eq!(
            gateway.update(None, &artefact).await,
            Err(FolioError::AuthenticationRequired)
        );
    }
}
