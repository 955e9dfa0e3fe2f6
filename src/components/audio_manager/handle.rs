// Shared access to the controller from browser callbacks.
use std::cell::RefCell;
use std::rc::Rc;

use super::controller::PlaybackController;
use crate::components::dom::defer;

#[derive(Clone)]
pub struct ControllerHandle(Rc<RefCell<PlaybackController>>);

impl ControllerHandle {
    pub fn new(controller: PlaybackController) -> Self {
        Self(Rc::new(RefCell::new(controller)))
    }

    /// Run `f` now, or once the current call stack unwinds when a callback
    /// fired while the controller was already borrowed.
    pub fn with<F>(&self, f: F)
    where
        F: FnOnce(&mut PlaybackController) + 'static,
    {
        match self.0.try_borrow_mut() {
            Ok(mut controller) => f(&mut controller),
            Err(_) => {
                let handle = self.clone();
                defer(move || handle.with(f));
            }
        }
    }

    /// Immediate access for callers that need a result; `None` while the
    /// controller is busy.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut PlaybackController) -> R) -> Option<R> {
        let mut controller = self.0.try_borrow_mut().ok()?;
        Some(f(&mut controller))
    }
}
