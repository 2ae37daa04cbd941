//! Conversion initiator: announce a media URL and obtain a status handle.
//!
//! A single POST to the conversion endpoint creates a server-side job. The
//! service answers with a script-wrapped payload whose only interesting
//! field is `statusurl` — the opaque handle every subsequent poll targets.
//! One attempt, no internal retry, no state kept afterwards: if the service
//! or network is down the caller finds out immediately.

use crate::config::ClientConfig;
use crate::error::ConversionError;
use crate::protocol::jsonp;
use crate::protocol::payload::{self, StatusHandle};
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, info};

/// Submit `media_url` for conversion and return the job's status handle.
pub(crate) async fn submit(
    transport: &Arc<dyn Transport>,
    config: &ClientConfig,
    media_url: &str,
) -> Result<StatusHandle, ConversionError> {
    info!("Submitting conversion request for: {}", media_url);

    let params = [("mediaurl", media_url), ("client_urlmap", "none")];
    let body = transport.post_form(&config.submit_url(), &params).await?;

    let value = jsonp::evaluate(&body)
        .ok_or(ConversionError::ScriptEvaluation { context: "submit" })?;
    let handle = payload::decode_submit(&value)?;

    debug!("Conversion accepted, status URL: {}", handle.as_url());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Transport double answering every POST with one canned body.
    struct CannedTransport {
        body: Result<String, TransportError>,
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl CannedTransport {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn post_form(
            &self,
            url: &str,
            params: &[(&str, &str)],
        ) -> Result<String, TransportError> {
            self.seen.lock().unwrap().push((
                url.to_string(),
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(TransportError::Timeout) => Err(TransportError::Timeout),
                Err(e) => Err(TransportError::Request(e.to_string())),
            }
        }

        async fn get(&self, _url: &str) -> Result<String, TransportError> {
            unreachable!("submit never issues GETs")
        }
    }

    fn arc(t: CannedTransport) -> Arc<dyn Transport> {
        Arc::new(t)
    }

    #[tokio::test]
    async fn submit_extracts_status_handle() {
        let transport = arc(CannedTransport::ok(
            r#"apiJSONP({"statusurl": "http://x/status?id=42"});"#,
        ));
        let config = ClientConfig::default();

        let handle = submit(&transport, &config, "https://www.youtube.com/watch?v=abc")
            .await
            .unwrap();
        assert_eq!(handle.as_url().as_str(), "http://x/status?id=42");
    }

    #[tokio::test]
    async fn submit_sends_expected_form_parameters() {
        let canned = CannedTransport::ok(r#"cb({"statusurl": "http://x/s?id=1"});"#);
        let seen_handle = Arc::new(canned);
        let transport: Arc<dyn Transport> = seen_handle.clone();
        let config = ClientConfig::default();

        submit(&transport, &config, "https://youtu.be/xyz").await.unwrap();

        let seen = seen_handle.seen.lock().unwrap();
        let (url, params) = &seen[0];
        assert_eq!(url, "http://www.listentoyoutube.com/cc/conversioncloud.php");
        assert!(params.contains(&("mediaurl".into(), "https://youtu.be/xyz".into())));
        assert!(params.contains(&("client_urlmap".into(), "none".into())));
    }

    #[tokio::test]
    async fn unevaluable_body_is_script_evaluation_error() {
        let transport = arc(CannedTransport::ok("<html>oops</html>"));
        let config = ClientConfig::default();

        let err = submit(&transport, &config, "https://youtu.be/xyz")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ScriptEvaluation { context: "submit" }
        ));
    }

    #[tokio::test]
    async fn missing_status_url_is_malformed_response() {
        let transport = arc(CannedTransport::ok(r#"cb({"ticket": "9"});"#));
        let config = ClientConfig::default();

        let err = submit(&transport, &config, "https://youtu.be/xyz")
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let transport = arc(CannedTransport {
            body: Err(TransportError::Timeout),
            seen: Mutex::new(Vec::new()),
        });
        let config = ClientConfig::default();

        let err = submit(&transport, &config, "https://youtu.be/xyz")
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::Transport(_)));
    }
}
