use tracing::debug;

use super::ApiClient;
use crate::error::Result;
use crate::types::{
    DocumentStatus, FieldAnswerRequest, FieldAnswerResponse, TranslateRequest, TranslateResponse,
};

impl ApiClient {
    /// Ask the backend to answer one form field.
    pub async fn generate_field_answer(
        &self,
        session_id: &str,
        request: &FieldAnswerRequest,
    ) -> Result<FieldAnswerResponse> {
        debug!(label = %request.label, field_type = %request.field_type, "Requesting field answer");
        let builder = self
            .client
            .post(self.url("/api/generate-field-answer"))
            .json(request);
        self.send_json(Self::authorize(builder, session_id)).await
    }

    /// Which personal documents the backend holds for the user.
    pub async fn document_status(&self, session_id: &str) -> Result<DocumentStatus> {
        let builder = self.client.get(self.url("/api/v1/documents/status"));
        self.send_json(Self::authorize(builder, session_id)).await
    }

    /// Translate a snippet of page text.
    pub async fn translate(
        &self,
        session_id: &str,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse> {
        debug!(target_language = %request.target_language, chars = request.text.chars().count(), "Translating text");
        let builder = self.client.post(self.url("/api/translate")).json(request);
        self.send_json(Self::authorize(builder, session_id)).await
    }
}
