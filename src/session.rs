//! Single-session state: what the user has typed and attached, where the
//! current request stands, and the last result or error.

use crate::encoder::{AttachmentSet, EncodedInput, text_segment};
use crate::error::{ReqscribeError, Result};
use crate::llm::{GenerationMode, RequirementsClient};
use crate::types::GenerationOutput;
use crate::{log_debug, log_info, log_warn};

use strum_macros::Display;

/// Lifecycle of one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl RequestState {
    /// Whether moving from `self` to `next` is allowed
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Success | Self::Error, Self::Loading)
                | (Self::Loading, Self::Success | Self::Error)
        )
    }
}

/// Outcome of merging a batch of loaded files into the session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub attached: Vec<String>,
    pub merged_text: Vec<String>,
    pub duplicates: Vec<String>,
    pub failed: Vec<String>,
}

/// Everything a user works with between resets
#[derive(Debug, Default)]
pub struct Session {
    text: String,
    attachments: AttachmentSet,
    state: RequestState,
    result: Option<GenerationOutput>,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// The last result; present only while the state is `Success`
    pub fn result(&self) -> Option<&GenerationOutput> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Merge loaded files in the order they were selected
    ///
    /// Text files are appended to the text buffer, binary files join the
    /// attachment set (duplicate names dropped), and failures are recorded
    /// without affecting the other files.
    pub fn add_files(&mut self, loaded: Vec<Result<EncodedInput>>) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for entry in loaded {
            match entry {
                Ok(EncodedInput::Text { name, content }) => {
                    self.text.push_str(&text_segment(&name, &content));
                    summary.merged_text.push(name);
                }
                Ok(EncodedInput::Attachment(file)) => {
                    let name = file.name.clone();
                    if self.attachments.add(file) {
                        summary.attached.push(name);
                    } else {
                        summary.duplicates.push(name);
                    }
                }
                Err(e) => {
                    log_warn!("File skipped: {}", e);
                    summary.failed.push(e.to_string());
                }
            }
        }

        log_debug!(
            "Imported files: {} attached, {} merged, {} duplicate, {} failed",
            summary.attached.len(),
            summary.merged_text.len(),
            summary.duplicates.len(),
            summary.failed.len()
        );
        summary
    }

    pub fn remove_attachment(&mut self, name: &str) -> bool {
        self.attachments.remove(name).is_some()
    }

    fn transition(&mut self, next: RequestState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(ReqscribeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        log_debug!("Request state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Enter `Loading`, discarding the previous result and error
    pub fn begin_request(&mut self) -> Result<()> {
        self.transition(RequestState::Loading)?;
        self.result = None;
        self.error = None;
        Ok(())
    }

    pub fn complete(&mut self, output: GenerationOutput) -> Result<()> {
        self.transition(RequestState::Success)?;
        self.result = Some(output);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.transition(RequestState::Error)?;
        self.error = Some(message.into());
        Ok(())
    }

    /// Run one generation with the current text and attachments
    ///
    /// Empty input is rejected before any request is made and leaves the
    /// session in `Error`. Service and parse failures also end in `Error`
    /// with the message stored; the error is returned as well.
    pub async fn submit(&mut self, client: &RequirementsClient, mode: GenerationMode) -> Result<()> {
        if self.text.trim().is_empty() && self.attachments.is_empty() {
            let e = ReqscribeError::InvalidInput;
            self.result = None;
            self.error = Some(e.to_string());
            self.state = RequestState::Error;
            return Err(e);
        }

        self.begin_request()?;
        log_info!(
            "Submitting {} characters and {} attachment(s) to {}",
            self.text.trim().chars().count(),
            self.attachments.len(),
            client.provider_name()
        );

        let outcome = client
            .run(mode, &self.text, self.attachments.as_slice())
            .await;
        match outcome {
            Ok(output) => self.complete(output),
            Err(e) => {
                self.fail(e.to_string())?;
                Err(e)
            }
        }
    }

    /// Return to a fresh `Idle` session
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use RequestState::{Error, Idle, Loading, Success};
        assert!(Idle.can_transition_to(Loading));
        assert!(Success.can_transition_to(Loading));
        assert!(Error.can_transition_to(Loading));
        assert!(Loading.can_transition_to(Success));
        assert!(Loading.can_transition_to(Error));

        assert!(!Loading.can_transition_to(Loading));
        assert!(!Idle.can_transition_to(Success));
        assert!(!Success.can_transition_to(Idle));
    }

    #[test]
    fn test_rejected_transition_leaves_state() {
        let mut session = Session::new();
        let err = session
            .complete(GenerationOutput::PlainText("doc".to_string()))
            .expect_err("idle cannot complete");
        assert!(matches!(
            err,
            ReqscribeError::InvalidTransition {
                from: RequestState::Idle,
                to: RequestState::Success
            }
        ));
        assert_eq!(session.state(), RequestState::Idle);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_second_begin_while_loading_is_refused() {
        let mut session = Session::new();
        session.begin_request().expect("first request starts");
        assert!(session.begin_request().is_err());
        assert_eq!(session.state(), RequestState::Loading);
    }

    #[test]
    fn test_new_request_clears_previous_result() {
        let mut session = Session::new();
        session.begin_request().expect("start");
        session
            .complete(GenerationOutput::PlainText("doc".to_string()))
            .expect("complete");
        assert!(session.result().is_some());

        session.begin_request().expect("restart");
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }
}
