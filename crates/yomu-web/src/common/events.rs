use dominator::traits::StaticEvent;

pub use dominator::events::*;

/// `error` fired by an `<img>` that failed to load.
pub struct Error {
    #[allow(dead_code)]
    event: web_sys::Event,
}

impl StaticEvent for Error {
    const EVENT_TYPE: &'static str = "error";

    #[inline]
    fn unchecked_from_event(event: web_sys::Event) -> Self {
        Self { event }
    }
}

/// `submit` fired by a `<form>`.
pub struct Submit {
    event: web_sys::Event,
}

impl Submit {
    #[inline]
    pub fn prevent_default(&self) {
        self.event.prevent_default();
    }
}

impl StaticEvent for Submit {
    const EVENT_TYPE: &'static str = "submit";

    #[inline]
    fn unchecked_from_event(event: web_sys::Event) -> Self {
        Self { event }
    }
}
