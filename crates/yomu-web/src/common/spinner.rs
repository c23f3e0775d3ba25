use dominator::{Dom, html};
use futures_signals::signal::{Signal, SignalExt};

pub struct Spinner;

impl Spinner {
    pub fn render_spinner(fullscreen: bool) -> Dom {
        html!("div", {
            .class("spinner")
            .apply_if(fullscreen, |dom| dom.class("fullscreen"))
            .children(&mut [
                html!("div", {
                    .class("loader")
                })
            ])
        })
    }

    /// Spinner while `loading`, nothing otherwise.
    pub fn render_while<S>(loading: S) -> impl Signal<Item = Option<Dom>>
    where
        S: Signal<Item = bool>,
    {
        loading.map(|loading| loading.then(|| Self::render_spinner(false)))
    }
}
