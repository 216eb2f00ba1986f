//! Recording adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::format::LLM_PORT;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Records LLM interactions while delegating to an inner implementation.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    #[must_use]
    pub fn new(inner: Box<dyn LlmClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&self.recorder, LLM_PORT, "complete", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CompletionResponse;

    struct Upper;

    impl LlmClient for Upper {
        fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
            let text = request.messages[0].content.to_uppercase();
            Box::pin(async move {
                Ok(CompletionResponse { text, prompt_tokens: 1, completion_tokens: 1 })
            })
        }
    }

    #[tokio::test]
    async fn records_request_and_response() {
        let dir = std::env::temp_dir().join("docdraft_rec_llm_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("llm.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "o/r")));

        {
            let client = RecordingLlmClient::new(Box::new(Upper), Arc::clone(&recorder));
            let response = client.complete(&CompletionRequest::single("m", "abc")).await.unwrap();
            assert_eq!(response.text, "ABC");
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("complete"));
        assert!(content.contains("ABC"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
