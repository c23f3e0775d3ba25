use std::cell::RefCell;
use std::rc::Rc;

use dominator::{Dom, clone, html, svg};
use futures_signals::signal::{Mutable, SignalExt};
use gloo_timers::callback::Timeout;

use crate::common::events;

const DISMISS_AFTER_MS: u32 = 4000;

thread_local! {
    static SNACKBAR: Rc<Snackbar> = Snackbar::new();
}

pub fn show(message: String) {
    SNACKBAR.with(|s| Snackbar::show(s.clone(), message));
}

pub fn render() -> Dom {
    SNACKBAR.with(|s| Snackbar::render(s.clone()))
}

pub struct Snackbar {
    message: Mutable<Option<String>>,
    timeout: RefCell<Option<Timeout>>,
}

impl Snackbar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            message: Mutable::new(None),
            timeout: RefCell::new(None),
        })
    }

    pub fn show(snackbar: Rc<Self>, message: String) {
        snackbar.message.set(Some(message));

        // replacing the timeout drops the previous one, which cancels it
        let timeout = Timeout::new(
            DISMISS_AFTER_MS,
            clone!(snackbar => move || snackbar.message.set(None)),
        );
        snackbar.timeout.replace(Some(timeout));
    }

    pub fn render(snackbar: Rc<Self>) -> Dom {
        html!("div", {
            .class("snackbar")
            .visible_signal(snackbar.message.signal_ref(|message| message.is_some()))
            .children(&mut [
                html!("div", {
                    .child_signal(snackbar.message.signal_cloned().map(|message| message.map(|msg| html!("span", {
                        .text(&msg)
                    }))))
                    .children(&mut [
                        html!("button", {
                            .event(clone!(snackbar => move |_: events::Click| {
                                snackbar.timeout.replace(None);
                                snackbar.message.set(None);
                            }))
                            .children(&mut [
                                svg!("svg", {
                                    .attribute("xmlns", "http://www.w3.org/2000/svg")
                                    .attribute("viewBox", "0 0 24 24")
                                    .attribute("stroke", "currentColor")
                                    .attribute("fill", "none")
                                    .class("icon")
                                    .children(&mut [
                                        svg!("path", {
                                            .attribute("stroke-linecap", "round")
                                            .attribute("stroke-linejoin", "round")
                                            .attribute("stroke-width", "2")
                                            .class("heroicon-ui")
                                            .attribute("d", "M6 18L18 6M6 6l12 12")
                                        }),
                                    ])
                                })
                            ])
                        })
                    ])
                })
            ])
        })
    }
}
