use dominator::{Dom, clone, html, with_node};
use futures_signals::signal::{Mutable, SignalExt};
use web_sys::{File, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use super::events;
use crate::utils::input_files;

pub fn input(value: Mutable<String>, kind: &str, placeholder: &str) -> Dom {
    html!("input" => HtmlInputElement, {
        .attribute("type", kind)
        .attribute("placeholder", placeholder)
        .property_signal("value", value.signal_cloned())
        .with_node!(input => {
            .event(clone!(value => move |_: events::Input| {
                value.set(input.value());
            }))
        })
    })
}

pub fn textarea(value: Mutable<String>, placeholder: &str) -> Dom {
    html!("textarea" => HtmlTextAreaElement, {
        .attribute("placeholder", placeholder)
        .attribute("rows", "3")
        .property_signal("value", value.signal_cloned())
        .with_node!(input => {
            .event(clone!(value => move |_: events::Input| {
                value.set(input.value());
            }))
        })
    })
}

/// `options` are `(value, label)` pairs.
pub fn select(value: Mutable<String>, options: &[(&str, &str)]) -> Dom {
    html!("select" => HtmlSelectElement, {
        .children(options.iter().map(|(option, label)| {
            let option = option.to_string();
            html!("option", {
                .attribute("value", &option)
                .property_signal("selected", value.signal_ref(move |current| *current == option))
                .text(label)
            })
        }))
        .with_node!(select => {
            .event(clone!(value => move |_: events::Change| {
                value.set(select.value());
            }))
        })
    })
}

pub fn file_input<F>(accept: &str, multiple: bool, on_change: F) -> Dom
where
    F: Fn(Vec<File>) + 'static,
{
    html!("input" => HtmlInputElement, {
        .attribute("type", "file")
        .attribute("accept", accept)
        .apply_if(multiple, |dom| dom.attribute("multiple", ""))
        .with_node!(input => {
            .event(move |_: events::Change| {
                on_change(input_files(&input));
            })
        })
    })
}

pub fn field(label: &str, control: Dom) -> Dom {
    html!("label", {
        .class("field")
        .children(&mut [
            html!("span", {
                .text(label)
            }),
            control,
        ])
    })
}
