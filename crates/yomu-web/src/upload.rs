use std::rc::Rc;

use dominator::{Dom, clone, html, link, routing};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use yomu_lib::models::Manga;

use crate::common::{Cover, MangaForm, Modal, Route, Spinner, Topbar, events, snackbar};
use crate::query;
use crate::utils::{AsyncLoader, read_file};

/// The user's own uploads and the form to add a new manga.
pub struct Upload {
    mangas: MutableVec<Manga>,
    form: Rc<MangaForm>,
    modal: Rc<Modal>,
    is_saving: Mutable<bool>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl Upload {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            mangas: MutableVec::new(),
            form: MangaForm::new(),
            modal: Modal::new(),
            is_saving: Mutable::new(false),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(upload: Rc<Self>) {
        upload.is_loading.set_neq(true);
        upload.loader.load(clone!(upload => async move {
            match query::client().my_uploads().await {
                Ok(mangas) => upload.mangas.lock_mut().replace_cloned(mangas),
                Err(e) => {
                    query::report("Failed to load uploads", &e);
                    upload.mangas.lock_mut().clear();
                }
            }
            upload.is_loading.set_neq(false);
        }));
    }

    fn create(upload: Rc<Self>) {
        if upload.is_saving.get() {
            return;
        }
        let input = match upload.form.to_input() {
            Ok(input) => input,
            Err(message) => {
                snackbar::show(message.to_string());
                return;
            }
        };
        let cover = upload.form.take_cover();

        upload.is_saving.set_neq(true);
        spawn_local(clone!(upload => async move {
            let cover = match cover {
                Some(file) => match read_file(file).await {
                    Ok(cover) => Some(cover),
                    Err(e) => {
                        error!("{}", e);
                        snackbar::show(format!("Failed to read cover: {}", e));
                        upload.is_saving.set_neq(false);
                        return;
                    }
                },
                None => None,
            };

            match query::client().create_manga(&input, cover).await {
                Ok(manga) => {
                    info!("created manga {}", manga.id);
                    upload.form.clear();
                    upload.modal.hide();
                    routing::go_to_url(&Route::UploadChapter(manga.id).url());
                }
                Err(e) => query::report("Failed to create manga", &e),
            }
            upload.is_saving.set_neq(false);
        }));
    }

    pub fn render(upload: Rc<Self>) -> Dom {
        Self::fetch(upload.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render_with("My Uploads", true, vec![
                    html!("button", {
                        .text("New Manga")
                        .event(clone!(upload => move |_: events::Click| {
                            upload.modal.toggle_show();
                        }))
                    })
                ]),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("manga-grid")
                    .children_signal_vec(upload.mangas.signal_vec_cloned().map(|manga| {
                        html!("div", {
                            .class("upload-item")
                            .children(&mut [
                                Cover::from(&manga).render(),
                                link!(Route::UploadChapter(manga.id).url(), {
                                    .class("button")
                                    .text("Manage")
                                }),
                            ])
                        })
                    }))
                }),
            ])
            .child_signal(Spinner::render_while(map_ref! {
                let loading = upload.is_loading.signal(),
                let saving = upload.is_saving.signal() =>
                *loading || *saving
            }))
            .child_signal(map_ref! {
                let empty = upload.mangas.signal_vec_cloned().is_empty(),
                let loading = upload.is_loading.signal() =>
                *empty && !*loading
            }.map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("You have not uploaded anything yet")
            }))))
            .child(Modal::render(upload.modal.clone(), "New Manga", MangaForm::render(upload.form.clone(), "Create", clone!(upload => move || {
                Self::create(upload.clone());
            }))))
        })
    }
}
