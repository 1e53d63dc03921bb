use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{cep::PostalCode, error::LocalityError, provider::truncate_body};

use super::LocalityResolver;

/// [`LocalityResolver`] backed by the ViaCEP web service.
#[derive(Debug, Clone)]
pub struct ViaCepResolver {
    base_url: String,
    http: Client,
}

impl ViaCepResolver {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "flag")]
    erro: bool,
}

/// ViaCEP has answered with both `"erro": true` and `"erro": "true"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

#[async_trait]
impl LocalityResolver for ViaCepResolver {
    async fn resolve_locality(&self, code: &PostalCode) -> Result<String, LocalityError> {
        let url = format!("{}/ws/{}/json/", self.base_url, code);

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "ViaCEP returned non-success status");
            return Err(LocalityError::Status(status));
        }

        let parsed: ViaCepResponse = serde_json::from_str(&body).map_err(LocalityError::Parse)?;

        let locality = parsed.localidade.trim();
        if parsed.erro || locality.is_empty() {
            return Err(LocalityError::NotFound);
        }

        Ok(locality.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cep(code: &str) -> PostalCode {
        PostalCode::parse(code).expect("valid postal code")
    }

    async fn mount(server: &MockServer, code: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/ws/{code}/json/")))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn resolves_and_trims_locality() {
        let server = MockServer::start().await;
        mount(
            &server,
            "01310100",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "localidade": "  São Paulo ",
                "uf": "SP"
            })),
        )
        .await;

        let resolver = ViaCepResolver::new(&server.uri());
        let city = resolver.resolve_locality(&cep("01310100")).await.unwrap();

        assert_eq!(city, "São Paulo");
    }

    #[tokio::test]
    async fn error_flag_is_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            "00000000",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": true })),
        )
        .await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("00000000")).await.unwrap_err();

        assert!(matches!(err, LocalityError::NotFound));
    }

    #[tokio::test]
    async fn string_error_flag_is_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            "99999999",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": "true" })),
        )
        .await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("99999999")).await.unwrap_err();

        assert!(matches!(err, LocalityError::NotFound));
    }

    #[tokio::test]
    async fn error_flag_wins_over_locality() {
        let server = MockServer::start().await;
        mount(
            &server,
            "12345678",
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "localidade": "Somewhere", "erro": true })),
        )
        .await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("12345678")).await.unwrap_err();

        assert!(matches!(err, LocalityError::NotFound));
    }

    #[tokio::test]
    async fn blank_locality_is_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            "12345678",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "localidade": "   " })),
        )
        .await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("12345678")).await.unwrap_err();

        assert!(matches!(err, LocalityError::NotFound));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        mount(&server, "12345678", ResponseTemplate::new(400).set_body_string("Bad Request")).await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("12345678")).await.unwrap_err();

        assert!(matches!(err, LocalityError::Status(s) if s.as_u16() == 400));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        mount(&server, "12345678", ResponseTemplate::new(200).set_body_string("<html>")).await;

        let resolver = ViaCepResolver::new(&server.uri());
        let err = resolver.resolve_locality(&cep("12345678")).await.unwrap_err();

        assert!(matches!(err, LocalityError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        // Nothing listens on the discard port.
        let resolver = ViaCepResolver::new("http://127.0.0.1:9");
        let err = resolver.resolve_locality(&cep("12345678")).await.unwrap_err();

        assert!(matches!(err, LocalityError::Transport(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let resolver = ViaCepResolver::new("https://viacep.com.br/");
        assert_eq!(resolver.base_url(), "https://viacep.com.br");
    }
}
