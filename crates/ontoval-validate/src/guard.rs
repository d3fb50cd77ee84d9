//! Panic containment for rule code.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::RuleError;

/// Run rule code, turning a panic into [`RuleError::Panicked`].
pub(crate) fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, RuleError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| RuleError::Panicked {
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
