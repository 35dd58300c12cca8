//! One state machine per tab
//!
//! A tab moves `Idle -> Loading -> Success | Failure` on every submit. While
//! it is `Loading` further submits are refused, so a tab never has more than
//! one request in flight. Submitting is split into [`Tab::begin`] and
//! [`Tab::settle`] so a caller holding the tab behind a lock can release it
//! for the duration of the network call.

use crate::forms::Form;
use suite_api::{Gateway, Result as ApiResult};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TabState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> TabState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// What a submit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight; nothing changed
    Busy,
    /// Validation failed; no request was sent
    Invalid,
    /// The request finished, successfully or not
    Settled,
}

/// A form, its gateway and the current state
pub struct Tab<G, F>
where
    F: Form,
{
    name: &'static str,
    gateway: G,
    form: F,
    state: TabState<F::Response>,
}

impl<G, F> Tab<G, F>
where
    F: Form,
    G: Gateway<F::Request, Response = F::Response>,
{
    pub fn new(name: &'static str, gateway: G, form: F) -> Self {
        Self {
            name,
            gateway,
            form,
            state: TabState::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> &TabState<F::Response> {
        &self.state
    }

    /// Validate and enter `Loading`, returning the request to send
    pub fn begin(&mut self) -> Result<F::Request, SubmitOutcome> {
        if self.state.is_loading() {
            warn!(tab = self.name, "submit ignored while a request is in flight");
            return Err(SubmitOutcome::Busy);
        }

        match self.form.validate() {
            Ok(request) => {
                self.state = TabState::Loading;
                Ok(request)
            }
            Err(err) => {
                self.state = TabState::Failure(err.to_string());
                Err(SubmitOutcome::Invalid)
            }
        }
    }

    /// Leave `Loading` with the gateway's result
    pub fn settle(&mut self, request: &F::Request, result: ApiResult<F::Response>) {
        self.state = match result {
            Ok(response) => match self.form.check_response(request, &response) {
                Ok(()) => {
                    info!(tab = self.name, gateway = self.gateway.name(), "request succeeded");
                    TabState::Success(response)
                }
                Err(message) => {
                    warn!(tab = self.name, "response carried no usable data");
                    TabState::Failure(message)
                }
            },
            Err(err) => {
                warn!(tab = self.name, error = %err, "request failed");
                TabState::Failure(self.form.failure_message(&err))
            }
        };
    }

    /// Validate, send one request and settle
    pub async fn submit(&mut self) -> SubmitOutcome {
        let request = match self.begin() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let result = self.gateway.call(&request).await;
        self.settle(&request, result);
        SubmitOutcome::Settled
    }
}
