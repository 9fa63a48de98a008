//! Content - per-page state of the injected content script
//!
//! One [`ContentScript`] exists per page. It owns the page's DOM handle, the
//! injected trigger element, the focused field and the translation and
//! notification flags. `attach` runs on page load; `detach` on navigation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use formpilot_dom::{DomMut, FieldDescriptor, NodeId};
use tracing::{debug, info};

use crate::assistant::{write_answer, FieldAssistant, FilledField};
use crate::error::{Error, Result};
use crate::marker::PageMarker;
use crate::messaging::{ExtensionMessage, MessageHandler, MessageResponse, Surface, SyncAgent};
use crate::sync::SessionSync;
use crate::translation::TranslationState;

/// `id` of the injected trigger element.
pub const TRIGGER_ELEMENT_ID: &str = "formpilot-trigger";

/// Content-script state for one page.
pub struct ContentScript<D> {
    dom: Mutex<D>,
    agent: SyncAgent,
    translation_enabled: AtomicBool,
    has_notified: AtomicBool,
    trigger: Mutex<Option<NodeId>>,
    focused: Mutex<Option<NodeId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl<D: DomMut + Send> ContentScript<D> {
    /// Wrap `dom`, answering session messages from `sync`.
    pub fn new(dom: D, sync: Arc<SessionSync>) -> Self {
        Self::with_agent(dom, SyncAgent::new(sync))
    }

    /// Wrap `dom` with a preconfigured agent (e.g. one that can reach the
    /// backend).
    pub fn with_agent(dom: D, agent: SyncAgent) -> Self {
        Self {
            dom: Mutex::new(dom),
            agent,
            translation_enabled: AtomicBool::new(false),
            has_notified: AtomicBool::new(false),
            trigger: Mutex::new(None),
            focused: Mutex::new(None),
        }
    }

    /// Session view of this page's context.
    pub fn sync(&self) -> &Arc<SessionSync> {
        self.agent.sync()
    }

    /// Inject the trigger, load the translation flag and publish the marker.
    pub async fn attach(&self) -> Result<()> {
        let translation = TranslationState::load(self.sync().store().as_ref()).await;
        self.translation_enabled
            .store(translation.enabled, Ordering::SeqCst);

        {
            let mut dom = lock(&self.dom);
            let mut trigger = lock(&self.trigger);
            if trigger.is_none() {
                let node = match dom.element_by_id(TRIGGER_ELEMENT_ID) {
                    Some(existing) => existing,
                    None => inject_trigger(&mut *dom),
                };
                *trigger = Some(node);
            }
        }

        self.refresh_marker().await;
        info!(context = %self.sync().context(), translation = translation.enabled, "Content script attached");
        Ok(())
    }

    /// Remove the trigger and the marker; forget focus and flags.
    pub fn detach(&self) {
        let mut dom = lock(&self.dom);
        if let Some(trigger) = lock(&self.trigger).take() {
            dom.remove(trigger);
        }
        PageMarker::clear(&mut *dom);
        *lock(&self.focused) = None;
        self.has_notified.store(false, Ordering::SeqCst);
        debug!("Content script detached");
    }

    /// Whether `attach` has injected the trigger.
    pub fn is_attached(&self) -> bool {
        lock(&self.trigger).is_some()
    }

    /// Injected trigger node.
    pub fn trigger(&self) -> Option<NodeId> {
        *lock(&self.trigger)
    }

    /// Record the field the user focused.
    pub fn focus(&self, element: NodeId) {
        *lock(&self.focused) = Some(element);
    }

    /// Currently focused field.
    pub fn focused(&self) -> Option<NodeId> {
        *lock(&self.focused)
    }

    /// Descriptor of the focused field.
    pub fn descriptor(&self) -> Result<FieldDescriptor> {
        let element = self.focused().ok_or(Error::NoFocusedField)?;
        let dom = lock(&self.dom);
        Ok(FieldDescriptor::capture(&*dom, element))
    }

    /// Write `answer` into the focused field.
    pub fn fill(&self, answer: &str) -> Result<NodeId> {
        let element = self.focused().ok_or(Error::NoFocusedField)?;
        write_answer(&mut *lock(&self.dom), element, answer);
        Ok(element)
    }

    /// Full autofill of the focused field.
    ///
    /// The DOM lock is not held while the backend is asked.
    pub async fn autofill(&self, assistant: &FieldAssistant) -> Result<FilledField> {
        let descriptor = self.descriptor()?;
        let response = assistant.answer(&descriptor).await?;
        write_answer(&mut *lock(&self.dom), descriptor.element, &response.answer);
        Ok(FilledField {
            descriptor,
            answer: response.answer,
            data_source: response.data_source,
        })
    }

    /// Translation flag as last loaded or toggled.
    pub fn translation_enabled(&self) -> bool {
        self.translation_enabled.load(Ordering::SeqCst)
    }

    /// Rewrite the marker from the current session state.
    ///
    /// Returns `true` the first time a logged-in state is published since
    /// attach, when the "connected" notice should be shown.
    pub async fn refresh_marker(&self) -> bool {
        let logged_in = self.sync().is_authenticated().await;
        PageMarker::current(logged_in).write(&mut *lock(&self.dom));

        logged_in && !self.has_notified.swap(true, Ordering::SeqCst)
    }

    /// Run `f` against the page DOM.
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut lock(&self.dom))
    }
}

fn inject_trigger<D: DomMut + ?Sized>(dom: &mut D) -> NodeId {
    let root = dom.root();
    let parent = dom
        .elements_by_tag(root, "body")
        .first()
        .copied()
        .unwrap_or(root);
    let trigger = dom.create_element("div");
    dom.set_attribute(trigger, "id", TRIGGER_ELEMENT_ID);
    dom.append_child(parent, trigger);
    trigger
}

#[async_trait]
impl<D: DomMut + Send + 'static> MessageHandler for ContentScript<D> {
    async fn handle(&self, from: Surface, message: ExtensionMessage) -> MessageResponse {
        match message {
            ExtensionMessage::FillField { answer } => match self.fill(&answer) {
                Ok(_) => MessageResponse::Ack,
                Err(e) => MessageResponse::error(&e),
            },
            ExtensionMessage::ClearStorage => {
                self.translation_enabled.store(false, Ordering::SeqCst);
                let response = self.agent.handle(from, ExtensionMessage::ClearStorage).await;
                self.refresh_marker().await;
                response
            }
            ExtensionMessage::ToggleTranslation { enabled } => {
                self.translation_enabled.store(enabled, Ordering::SeqCst);
                self.agent
                    .handle(from, ExtensionMessage::ToggleTranslation { enabled })
                    .await
            }
            message => {
                let response = self.agent.handle(from, message).await;
                self.refresh_marker().await;
                response
            }
        }
    }
}

#[cfg(test)]
mod tests;
