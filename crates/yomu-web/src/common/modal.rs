use dominator::{Dom, clone, html};
use futures_signals::signal::{Mutable, SignalExt};
use std::rc::Rc;
use wasm_bindgen::UnwrapThrowExt;

use crate::common::events;
use crate::utils::window;

/// Bottom sheet that slides in over the page.
pub struct Modal {
    first_render: Mutable<bool>,
    show: Mutable<bool>,
}

impl Modal {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            first_render: Mutable::new(true),
            show: Mutable::new(false),
        })
    }

    pub fn toggle_show(&self) {
        self.show.replace_with(|show| !*show);
        self.first_render.set_neq(false);
    }

    pub fn hide(&self) {
        self.show.set_neq(false);
    }

    pub fn render(modal: Rc<Self>, title: &str, children: Dom) -> Dom {
        html!("div", {
            .children(&mut [
                html!("div", {
                    .visible_signal(modal.show.signal())
                    .class("modal-background")
                    .event(clone!(modal => move |_: events::Click| {
                        modal.hide();
                    }))
                }),
                html!("div", {
                    .class("modal")
                    .class("animate__animated")
                    .class("animate__faster")
                    .class_signal("animate__slideInUp", modal.show.signal())
                    .class_signal("animate__slideOutDown", modal.show.signal().map(|x| !x))
                    .style("padding-bottom", "calc(env(safe-area-inset-bottom) + 0.5rem)")
                    .visible_signal(modal.first_render.signal().map(|x| !x))
                    .children(&mut [
                        html!("div", {
                            .class("modal-header")
                            .children(&mut [
                                html!("span", {
                                    .text(title)
                                }),
                                html!("button", {
                                    .text("Close")
                                    .event(clone!(modal => move |_: events::Click| modal.hide()))
                                })
                            ])
                        }),
                        children
                    ])
                })
            ])
        })
    }
}

/// Native confirm dialog in front of destructive actions.
pub fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_throw()
}
