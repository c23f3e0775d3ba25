use dominator::{Dom, clone, html};
use futures_signals::signal::{Mutable, Signal, SignalExt};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use wasm_bindgen::UnwrapThrowExt;

use super::events;
use crate::utils::local_storage;

const KEY: &str = "settings:reader";

#[derive(Debug, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum ReaderMode {
    Continuous,
    #[default]
    Paged,
}

#[derive(Debug, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum Fit {
    Height,
    Width,
    #[default]
    All,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct Stored {
    reader_mode: ReaderMode,
    direction: Direction,
    fit: Fit,
}

/// Reader preferences, persisted in local storage.
#[derive(Default)]
pub struct ReaderSettings {
    pub reader_mode: Mutable<ReaderMode>,
    pub direction: Mutable<Direction>,
    pub fit: Mutable<Fit>,
}

impl ReaderSettings {
    pub fn load() -> Rc<Self> {
        let stored = local_storage()
            .get(KEY)
            .unwrap_throw()
            .and_then(|value| serde_json::from_str::<Stored>(&value).ok())
            .unwrap_or_default();

        Rc::new(Self {
            reader_mode: Mutable::new(stored.reader_mode),
            direction: Mutable::new(stored.direction),
            fit: Mutable::new(stored.fit),
        })
    }

    fn save(&self) {
        let stored = Stored {
            reader_mode: self.reader_mode.get(),
            direction: self.direction.get(),
            fit: self.fit.get(),
        };
        match serde_json::to_string(&stored) {
            Ok(value) => {
                local_storage().set(KEY, &value).unwrap_throw();
            }
            Err(e) => {
                error!("error saving reader settings: {}", e);
            }
        }
    }

    fn render_option<T, S>(
        settings: Rc<Self>,
        mutable: &Mutable<T>,
        label: &str,
        value: T,
        selected: S,
    ) -> Dom
    where
        T: Copy + PartialEq + 'static,
        S: Signal<Item = T> + 'static,
    {
        html!("button", {
            .class_signal("active", selected.map(move |current| current == value))
            .text(label)
            .event(clone!(settings, mutable => move |_: events::Click| {
                mutable.set_neq(value);
                settings.save();
            }))
        })
    }

    fn render_group(label: &str, mut options: Vec<Dom>) -> Dom {
        html!("div", {
            .class("reader-settings-row")
            .children(&mut [
                html!("span", {
                    .text(label)
                }),
                html!("div", {
                    .class("reader-settings-options")
                    .children(&mut options)
                })
            ])
        })
    }

    pub fn render(settings: Rc<Self>) -> Dom {
        let mode = settings.reader_mode.clone();
        let direction = settings.direction.clone();
        let fit = settings.fit.clone();

        html!("div", {
            .class("reader-settings-content")
            .children(&mut [
                Self::render_group("Mode", vec![
                    Self::render_option(settings.clone(), &mode, "Paged", ReaderMode::Paged, mode.signal()),
                    Self::render_option(settings.clone(), &mode, "Continuous", ReaderMode::Continuous, mode.signal()),
                ]),
                Self::render_group("Direction", vec![
                    Self::render_option(settings.clone(), &direction, "Left to Right", Direction::LeftToRight, direction.signal()),
                    Self::render_option(settings.clone(), &direction, "Right to Left", Direction::RightToLeft, direction.signal()),
                ]),
                Self::render_group("Fit", vec![
                    Self::render_option(settings.clone(), &fit, "Width", Fit::Width, fit.signal()),
                    Self::render_option(settings.clone(), &fit, "Height", Fit::Height, fit.signal()),
                    Self::render_option(settings, &fit, "All", Fit::All, fit.signal()),
                ]),
            ])
        })
    }
}
