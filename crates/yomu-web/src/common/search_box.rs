use std::rc::Rc;

use dominator::{Dom, clone, html, with_node};
use futures_signals::signal::{Mutable, SignalExt};
use web_sys::HtmlInputElement;

use super::events;

pub struct SearchBox {
    pub query: Mutable<String>,
    placeholder: String,
}

impl SearchBox {
    pub fn new(query: String, placeholder: &str) -> Rc<Self> {
        Rc::new(Self {
            query: Mutable::new(query),
            placeholder: placeholder.to_string(),
        })
    }

    /// `on_input` fires on every keystroke and on clear.
    pub fn render<F>(search: Rc<Self>, on_input: F) -> Dom
    where
        F: Fn(String) + 'static,
    {
        let on_input = Rc::new(on_input);

        html!("div", {
            .class("search-box")
            .children(&mut [
                html!("input" => HtmlInputElement, {
                    .attribute("type", "search")
                    .attribute("placeholder", &search.placeholder)
                    .attribute("autofocus", "")
                    .property_signal("value", search.query.signal_cloned())
                    .with_node!(input => {
                        .event(clone!(search, on_input => move |_: events::Input| {
                            let value = input.value();
                            search.query.set_neq(value.clone());
                            on_input(value);
                        }))
                    })
                }),
                html!("button", {
                    .text("Clear")
                    .visible_signal(search.query.signal_ref(|query| !query.is_empty()))
                    .event(clone!(search, on_input => move |_: events::Click| {
                        search.query.set_neq(String::new());
                        on_input(String::new());
                    }))
                }),
            ])
        })
    }
}
