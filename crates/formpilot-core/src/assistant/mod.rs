//! Assistant - resolve a field, ask the backend, write the answer back

use std::sync::Arc;

use formpilot_api::{DocumentStatus, FieldAnswerRequest, FieldAnswerResponse};
use formpilot_dom::{DomEvent, DomMut, FieldDescriptor, NodeId};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::auth::AuthFlow;
use crate::error::Result;

/// Outcome of one autofill.
#[derive(Debug, Clone, Serialize)]
pub struct FilledField {
    /// What was sent to the backend
    pub descriptor: FieldDescriptor,
    /// What was written into the field
    pub answer: String,
    /// Where the backend found the answer (resume, profile, ...)
    pub data_source: Option<String>,
}

/// Answers focused fields for the logged-in user.
pub struct FieldAssistant {
    auth: Arc<AuthFlow>,
    page_url: Option<String>,
}

impl FieldAssistant {
    /// Create an assistant using `auth` for the session.
    pub fn new(auth: Arc<AuthFlow>) -> Self {
        Self {
            auth,
            page_url: None,
        }
    }

    /// URL of the page being filled, sent as a hint.
    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    /// Ask the backend for an answer.
    ///
    /// A rejected session is refreshed and the request retried once.
    pub async fn answer(&self, descriptor: &FieldDescriptor) -> Result<FieldAnswerResponse> {
        let page_url = self.page_url.as_deref();
        let response = self
            .auth
            .call_with_refresh(|api, session| async move {
                let request = FieldAnswerRequest {
                    label: descriptor.label.clone(),
                    context: descriptor.context.clone(),
                    field_type: descriptor.field_type.clone(),
                    url: page_url.map(str::to_string),
                    user_id: session.user_id.clone(),
                };
                api.generate_field_answer(&session.session_id, &request).await
            })
            .await?;

        if response.answer.trim().is_empty() {
            return Err(formpilot_api::Error::InvalidResponse("empty answer".to_string()).into());
        }
        Ok(response)
    }

    /// Capture `element`, fetch its answer and write it into the field.
    pub async fn fill<D: DomMut + ?Sized>(&self, dom: &mut D, element: NodeId) -> Result<FilledField> {
        let descriptor = FieldDescriptor::capture(&*dom, element);
        debug!(label = %descriptor.label, source = ?descriptor.label_source, "Field captured");

        let response = self.answer(&descriptor).await?;
        write_answer(dom, element, &response.answer);
        info!(label = %descriptor.label, chars = response.answer.chars().count(), "Field filled");

        Ok(FilledField {
            descriptor,
            answer: response.answer,
            data_source: response.data_source,
        })
    }

    /// Which documents the backend holds for the user.
    pub async fn document_status(&self) -> Result<DocumentStatus> {
        self.auth
            .call(|api, session| async move { api.document_status(&session.session_id).await })
            .await
    }
}

/// Set the field's value and fire `input` then `change`, as typing would.
pub fn write_answer<D: DomMut + ?Sized>(dom: &mut D, element: NodeId, answer: &str) {
    dom.set_value(element, answer);
    for name in ["input", "change"] {
        dom.dispatch_event(DomEvent::new(name, element, json!({ "value": answer })));
    }
}
