//! Status poller: the self-rescheduling loop behind a progress stream.
//!
//! One polling session is one explicit async loop: GET the status URL,
//! decode, maybe yield an event, sleep, repeat. An explicit loop with a
//! single `sleep` (rather than a timer callback re-arming itself) keeps the
//! stack flat and makes cancellation trivial — dropping the stream stops the
//! session at its next await point, after which no request is issued and no
//! event is emitted.
//!
//! ## Termination contract
//!
//! The stream ends in exactly one of three ways, and yields nothing after:
//! * `Success` event, then completion — the `finished` step arrived with a
//!   parseable download URL;
//! * an error item — transport failure, unevaluable payload, malformed
//!   payload, or a `finished` step with an unusable download URL;
//! * silently, when the caller drops the stream.
//!
//! Everything else — ticket waits, progress percents, unknown steps,
//! transitional payloads without a status block — keeps the loop going
//! another cycle.

use crate::error::ConversionError;
use crate::output::{derive_title, ConversionResult, ProgressEvent};
use crate::protocol::jsonp;
use crate::protocol::payload::{self, StatusHandle, StatusStep};
use crate::stream::ProgressStream;
use crate::transport::Transport;
use async_stream::try_stream;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Poll `handle` until the conversion reaches a terminal state.
///
/// Events are yielded strictly in poll-cycle order; a cycle contributes at
/// most one event. The loop itself is unbounded — the service owns timeout
/// policy, and callers impose their own bound by dropping the stream.
pub(crate) fn status_stream(
    transport: Arc<dyn Transport>,
    handle: StatusHandle,
    interval: Duration,
) -> ProgressStream {
    Box::pin(try_stream! {
        let poll_url = handle.poll_url();

        loop {
            let body = transport.get(&poll_url).await?;
            let value = jsonp::evaluate(&body)
                .ok_or(ConversionError::ScriptEvaluation { context: "status" })?;

            match payload::decode_status(&value)? {
                Some(StatusStep::Ticket) => {
                    yield ProgressEvent::WaitingForConversion;
                }
                Some(StatusStep::Convert { percent: Some(p) }) => {
                    yield ProgressEvent::Converting(p);
                }
                Some(StatusStep::Download { percent: Some(p) }) => {
                    yield ProgressEvent::Downloading(p);
                }
                Some(StatusStep::Convert { percent: None })
                | Some(StatusStep::Download { percent: None }) => {
                    debug!("Progress step without parseable percent, skipping cycle");
                }
                Some(StatusStep::Finished {
                    filename,
                    download_url,
                }) => {
                    let stream_url = url::Url::parse(&download_url)
                        .map_err(|_| ConversionError::InvalidResult { url: download_url })?;
                    let title = derive_title(&filename);
                    debug!("Conversion finished: '{}' at {}", title, stream_url);
                    yield ProgressEvent::Success(ConversionResult { stream_url, title });
                    break;
                }
                Some(StatusStep::Unknown { step }) => {
                    warn!("Unhandled conversion step: {}", step);
                }
                None => {
                    debug!("Status payload without status block, skipping cycle");
                }
            }

            sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Mutex;
    use url::Url;

    /// Transport double replaying a fixed sequence of GET bodies.
    struct SequenceTransport {
        responses: Mutex<Vec<Result<String, TransportError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl SequenceTransport {
        fn new(responses: Vec<Result<String, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for SequenceTransport {
        async fn post_form(
            &self,
            _url: &str,
            _params: &[(&str, &str)],
        ) -> Result<String, TransportError> {
            unreachable!("poller never POSTs")
        }

        async fn get(&self, url: &str) -> Result<String, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "poller requested beyond the script");
            responses.remove(0)
        }
    }

    fn handle() -> StatusHandle {
        payload::decode_submit(&json!({"statusurl": "http://x/status?id=7"})).unwrap()
    }

    fn step_body(step: &str, percent: Option<&str>) -> Result<String, TransportError> {
        let percent = percent
            .map(|p| format!(r#", "percent": "{p}""#))
            .unwrap_or_default();
        Ok(format!(
            r#"cb({{"status": {{"@attributes": {{"step": "{step}"{percent}}}}}}});"#
        ))
    }

    fn finished_body(file: &str, download_url: &str) -> Result<String, TransportError> {
        Ok(format!(
            r#"cb({{"status": {{"@attributes": {{"step": "finished"}}}}, "file": "{file}", "downloadurl": "{download_url}"}});"#
        ))
    }

    async fn collect(
        transport: Arc<SequenceTransport>,
    ) -> Vec<Result<ProgressEvent, ConversionError>> {
        status_stream(transport, handle(), Duration::from_secs(3))
            .collect()
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn happy_path_emits_ordered_events_then_completes() {
        let transport = SequenceTransport::new(vec![
            step_body("ticket", None),
            step_body("convert", Some("10")),
            step_body("convert", Some("55")),
            step_body("download", Some("30")),
            finished_body("Song Name.m4a", "http://cdn.example.com/Song%20Name.m4a"),
        ]);

        let events = collect(transport.clone()).await;
        let events: Vec<ProgressEvent> = events.into_iter().map(Result::unwrap).collect();

        assert_eq!(
            events,
            vec![
                ProgressEvent::WaitingForConversion,
                ProgressEvent::Converting(10),
                ProgressEvent::Converting(55),
                ProgressEvent::Downloading(30),
                ProgressEvent::Success(ConversionResult {
                    stream_url: Url::parse("http://cdn.example.com/Song%20Name.m4a").unwrap(),
                    title: "Song Name".into(),
                }),
            ]
        );
        // Terminal state reached on the fifth response; no sixth request.
        assert_eq!(transport.requests.lock().unwrap().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_url_carries_json_marker() {
        let transport =
            SequenceTransport::new(vec![finished_body("t.mp3", "http://cdn.example.com/t.mp3")]);
        collect(transport.clone()).await;
        assert_eq!(
            transport.requests.lock().unwrap()[0],
            "http://x/status?id=7&json"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_tickets_each_emit_one_event() {
        let transport = SequenceTransport::new(vec![
            step_body("ticket", None),
            step_body("ticket", None),
            step_body("ticket", None),
            finished_body("t.mp3", "http://cdn.example.com/t.mp3"),
        ]);

        let events = collect(transport).await;
        let waits = events
            .iter()
            .filter(|e| matches!(e, Ok(ProgressEvent::WaitingForConversion)))
            .count();
        assert_eq!(waits, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unparseable_percent_skips_cycle_without_failing() {
        let transport = SequenceTransport::new(vec![
            step_body("convert", Some("not-a-number")),
            step_body("convert", Some("80")),
            finished_body("t.mp3", "http://cdn.example.com/t.mp3"),
        ]);

        let events: Vec<ProgressEvent> = collect(transport)
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ProgressEvent::Converting(80));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_step_is_tolerated_and_polling_continues() {
        let transport = SequenceTransport::new(vec![
            step_body("queued_retry", None),
            finished_body("t.mp3", "http://cdn.example.com/t.mp3"),
        ]);

        let events = collect(transport.clone()).await;
        assert_eq!(events.len(), 1, "unknown step must emit nothing");
        assert!(matches!(events[0], Ok(ProgressEvent::Success(_))));
        assert_eq!(transport.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_status_block_is_tolerated() {
        let transport = SequenceTransport::new(vec![
            Ok(r#"cb({"msg": "warming up"});"#.to_string()),
            finished_body("t.mp3", "http://cdn.example.com/t.mp3"),
        ]);

        let events = collect(transport).await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_download_url_fails_session_without_further_polling() {
        let transport = SequenceTransport::new(vec![
            finished_body("t.mp3", "::no scheme::"),
            // A further response would be a contract violation; assert below
            // that it is never requested.
            step_body("ticket", None),
        ]);

        let events = collect(transport.clone()).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Err(ConversionError::InvalidResult { .. })
        ));
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_fails_session_immediately() {
        let transport = SequenceTransport::new(vec![
            step_body("ticket", None),
            Err(TransportError::Status { status: 502 }),
        ]);

        let events = collect(transport.clone()).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Ok(ProgressEvent::WaitingForConversion)));
        assert!(matches!(events[1], Err(ConversionError::Transport(_))));
        assert_eq!(transport.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unevaluable_poll_body_is_script_evaluation_error() {
        let transport = SequenceTransport::new(vec![Ok("<html>502</html>".to_string())]);

        let events = collect(transport).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Err(ConversionError::ScriptEvaluation { context: "status" })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_stops_polling() {
        let transport = SequenceTransport::new(vec![
            step_body("ticket", None),
            step_body("ticket", None),
            step_body("ticket", None),
        ]);

        let mut stream = status_stream(
            transport.clone() as Arc<dyn Transport>,
            handle(),
            Duration::from_secs(3),
        );
        let first = stream.next().await;
        assert!(matches!(first, Some(Ok(ProgressEvent::WaitingForConversion))));
        drop(stream);

        // Cancellation is cooperative: the dropped session must not issue
        // the requests still scripted.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }
}
