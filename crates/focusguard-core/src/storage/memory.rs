use std::cell::RefCell;

use crate::error::Result;
use crate::focus::{FocusSession, SessionStore};

/// In-process session slot. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RefCell<Option<FocusSession>>,
}

impl MemorySessionStore {
    pub fn with_session(session: FocusSession) -> Self {
        Self {
            slot: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<FocusSession>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, session: Option<&FocusSession>) -> Result<()> {
        *self.slot.borrow_mut() = session.cloned();
        Ok(())
    }
}
