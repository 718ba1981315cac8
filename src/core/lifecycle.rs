use std::fmt::Display;

use crate::core::error::SceneError;

#[derive(Debug)]
pub enum SceneState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> SceneState<T> {
    pub fn name(&self) -> &'static str {
        match self {
            SceneState::Loading => "loading",
            SceneState::Ready(_) => "ready",
            SceneState::Failed(_) => "failed",
        }
    }
}

/// One-shot `Loading -> Ready | Failed` state machine for the asynchronous scene load.
#[derive(Debug)]
pub struct SceneLifecycle<T> {
    state: SceneState<T>,
}

impl<T> Default for SceneLifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SceneLifecycle<T> {
    pub fn new() -> Self {
        Self {
            state: SceneState::Loading,
        }
    }

    /// Settle the load. Only valid while still loading.
    pub fn finish<E: Display>(&mut self, result: Result<T, E>) -> Result<(), SceneError> {
        if !self.is_loading() {
            return Err(SceneError::InvalidTransition {
                from: self.state.name(),
            });
        }
        self.state = match result {
            Ok(payload) => SceneState::Ready(payload),
            Err(e) => SceneState::Failed(e.to_string()),
        };
        Ok(())
    }

    pub fn state(&self) -> &SceneState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SceneState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SceneState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match &self.state {
            SceneState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            SceneState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SceneState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
