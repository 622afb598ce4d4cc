use crate::api::FalClient;
use crate::config::Config;
use crate::core::{GenerateParams, GenerationRecord, History, SparkError};

/// One interactive session: the startup config plus the history it builds up.
///
/// `generate` is the only path that writes to the history; presentation code
/// reads it through [`Session::history`].
pub struct Session {
    config: Config,
    history: History,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            history: History::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run one generation request to completion.
    ///
    /// On success the record is prepended to the history and returned. On any
    /// failure the history is left as it was.
    pub async fn generate(&mut self, params: &GenerateParams) -> Result<GenerationRecord, SparkError> {
        if !params.has_prompt() {
            return Err(SparkError::EmptyPrompt);
        }

        let client = FalClient::from_config(&self.config)?;
        tracing::debug!("Generating via {}", client.endpoint());
        let record = client.generate(params).await?;

        tracing::debug!(
            "Generation completed: seed={} url={}",
            record.seed,
            record.image_url
        );
        self.history.prepend(record.clone());
        Ok(record)
    }

    /// Forget every record of this session
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AspectRatio, ErrorKind, SeedMode, Style};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer, key: Option<&str>) -> Session {
        let mut config = Config::default();
        config.api.base_url = server.uri();
        config.api.key = key.map(str::to_string);
        Session::new(config)
    }

    async fn mount_success(server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{ "url": "https://cdn.example/out.jpg" }]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn locked_seed_scenario_records_raw_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "prompt": "a red fox in snow, anime style, studio ghibli inspired, vibrant colors",
                "image_size": "square_hd",
                "seed": 42
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{ "url": "https://cdn.example/fox.jpg" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server, Some("k"));
        let params = GenerateParams::new("a red fox in snow")
            .with_style(Style::Anime)
            .with_aspect_ratio(AspectRatio::SquareHd)
            .with_seed_mode(SeedMode::locked(42).unwrap());

        session.generate(&params).await.unwrap();

        assert_eq!(session.history().len(), 1);
        let latest = session.history().latest().unwrap();
        assert_eq!(latest.raw_prompt, "a red fox in snow");
        assert_eq!(latest.seed, 42);
    }

    #[tokio::test]
    async fn each_success_prepends_exactly_one_record() {
        let server = MockServer::start().await;
        mount_success(&server).await;

        let mut session = session_for(&server, Some("k"));
        let params = GenerateParams::new("a lighthouse").with_seed_mode(SeedMode::Locked(7));

        for n in 1..=3 {
            let record = session.generate(&params).await.unwrap();
            assert_eq!(session.history().len(), n);
            assert_eq!(session.history().latest(), Some(&record));
            assert_eq!(record.seed, 7);
        }
    }

    #[tokio::test]
    async fn missing_credential_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut session = session_for(&server, None);
        let err = session
            .generate(&GenerateParams::new("a red fox in snow"))
            .await
            .unwrap_err();

        assert!(matches!(err, SparkError::MissingApiKey));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn empty_prompt_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut session = session_for(&server, Some("k"));
        let err = session.generate(&GenerateParams::new("")).await.unwrap_err();

        assert!(matches!(err, SparkError::EmptyPrompt));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn service_failure_leaves_history_untouched() {
        let server = MockServer::start().await;
        mount_success(&server).await;

        let mut session = session_for(&server, Some("k"));
        session
            .generate(&GenerateParams::new("first"))
            .await
            .unwrap();

        server.reset().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = session
            .generate(&GenerateParams::new("second"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().latest().unwrap().raw_prompt, "first");
    }

    #[tokio::test]
    async fn reset_clears_history() {
        let server = MockServer::start().await;
        mount_success(&server).await;

        let mut session = session_for(&server, Some("k"));
        session.generate(&GenerateParams::new("x")).await.unwrap();
        session.reset();
        assert!(session.history().is_empty());
    }
}
