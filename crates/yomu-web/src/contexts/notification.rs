use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use dominator::clone;
use futures::channel::mpsc;
use futures::stream::{self, SplitSink};
use futures::{SinkExt, StreamExt, future};
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen_futures::spawn_local;
use ws_stream_wasm::{WsMessage, WsMeta, WsStream};
use yomu_lib::notification::{Inbox, parse_push};
use yomu_lib::stomp::{Command, Frame, notification_destination};

use crate::common::snackbar;
use crate::query;
use crate::utils::{AsyncLoader, token, window, ws_host};

enum Event {
    Socket(WsMessage),
    Close,
    Ended,
}

type Sink = SplitSink<WsStream, WsMessage>;

/// Notification inbox, filled from the REST list and kept live over STOMP.
pub struct NotificationContext {
    pub inbox: Mutable<Inbox>,
    connected: Mutable<bool>,
    user_id: Cell<Option<i64>>,
    closer: RefCell<Option<mpsc::UnboundedSender<()>>>,
    loader: AsyncLoader,
}

impl NotificationContext {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            inbox: Mutable::new(Inbox::new()),
            connected: Mutable::new(false),
            user_id: Cell::new(None),
            closer: RefCell::new(None),
            loader: AsyncLoader::new(),
        })
    }

    /// Fetch the inbox and subscribe to `/queue/notifications/{user_id}`.
    /// A dropped socket stays dropped until the next login.
    pub fn connect(ctx: Rc<Self>, user_id: i64) {
        if ctx.user_id.get() == Some(user_id) {
            return;
        }
        ctx.disconnect();
        ctx.user_id.set(Some(user_id));

        let (closer, close) = mpsc::unbounded();
        ctx.closer.replace(Some(closer));

        ctx.loader.load(clone!(ctx => async move {
            if !Self::fetch(ctx.clone(), user_id).await {
                return;
            }

            if let Err(e) = Self::listen(ctx.clone(), user_id, close).await {
                error!("notification socket: {}", e);
            }
            ctx.connected.set_neq(false);
        }));
    }

    fn is_current(&self, user_id: i64) -> bool {
        self.user_id.get() == Some(user_id)
    }

    pub fn disconnect(&self) {
        if let Some(closer) = self.closer.take() {
            let _ = closer.unbounded_send(());
        }
        self.user_id.set(None);
        self.connected.set_neq(false);
        self.inbox.lock_mut().clear();
    }

    /// `false` when the session changed while the request was in flight,
    /// in which case the response is dropped.
    async fn fetch(ctx: Rc<Self>, user_id: i64) -> bool {
        let result = query::client().notifications().await;
        if !ctx.is_current(user_id) {
            debug!("dropping notifications fetched for user {}", user_id);
            return false;
        }

        match result {
            Ok(notifications) => {
                ctx.inbox.lock_mut().replace(notifications);
            }
            Err(e) => {
                query::report("Failed to load notifications", &e);
            }
        }
        true
    }

    async fn listen(
        ctx: Rc<Self>,
        user_id: i64,
        close: mpsc::UnboundedReceiver<()>,
    ) -> Result<(), anyhow::Error> {
        let url = ws_host();
        let (meta, socket) = WsMeta::connect(&url, None)
            .await
            .map_err(|e| anyhow!("error connecting to {}: {}", url, e))?;
        let (mut sink, incoming) = socket.split();

        let host = window().location().host().unwrap_or_default();
        send(&mut sink, Frame::connect(&host, token().as_deref())).await?;

        let events = stream::select(
            incoming
                .map(Event::Socket)
                .chain(stream::once(future::ready(Event::Ended))),
            close.map(|_| Event::Close),
        );

        let result = Self::pump(ctx, user_id, &mut sink, events).await;

        if let Err(e) = meta.close().await {
            debug!("error closing socket: {}", e);
        }
        result
    }

    async fn pump<S>(
        ctx: Rc<Self>,
        user_id: i64,
        sink: &mut Sink,
        mut events: S,
    ) -> Result<(), anyhow::Error>
    where
        S: futures::Stream<Item = Event> + Unpin,
    {
        let subscription = format!("sub-{}", user_id);

        while let Some(event) = events.next().await {
            let text = match event {
                Event::Socket(WsMessage::Text(text)) => text,
                Event::Socket(WsMessage::Binary(_)) => {
                    debug!("ignoring binary frame");
                    continue;
                }
                Event::Close => {
                    send(sink, Frame::unsubscribe(&subscription)).await?;
                    send(sink, Frame::disconnect()).await?;
                    info!("notification socket disconnected");
                    return Ok(());
                }
                Event::Ended => {
                    warn!("notification socket closed by server");
                    return Ok(());
                }
            };

            let frame = match Frame::decode(&text) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    warn!("dropping malformed frame: {}", e);
                    continue;
                }
            };

            match frame.command {
                Command::Connected => {
                    let destination = notification_destination(user_id);
                    send(sink, Frame::subscribe(&subscription, &destination)).await?;
                    ctx.connected.set_neq(true);
                    info!("subscribed to {}", destination);
                }
                Command::Message => {
                    ctx.on_push(&frame.body);
                }
                Command::Error => {
                    let message = frame.get("message").unwrap_or(frame.body.as_str()).to_string();
                    return Err(anyhow!("broker error: {}", message));
                }
                command => {
                    debug!("ignoring {} frame", command.as_str());
                }
            }
        }

        Ok(())
    }

    fn on_push(&self, body: &str) {
        match parse_push(body) {
            Ok(notification) => {
                let toast = format!("{}: {}", notification.title, notification.message);
                if self.inbox.lock_mut().push(notification) {
                    snackbar::show(toast);
                }
            }
            Err(e) => {
                warn!("invalid notification payload: {}", e);
            }
        }
    }

    pub fn mark_read(ctx: Rc<Self>, id: i64) {
        spawn_local(async move {
            match query::client().mark_notification_read(id).await {
                Ok(_) => {
                    ctx.inbox.lock_mut().mark_read(id);
                }
                Err(e) => {
                    query::report("Failed to mark notification as read", &e);
                }
            }
        });
    }

    pub fn mark_all_read(ctx: Rc<Self>) {
        spawn_local(async move {
            match query::client().mark_all_notifications_read().await {
                Ok(_) => {
                    ctx.inbox.lock_mut().mark_all_read();
                }
                Err(e) => {
                    query::report("Failed to mark notifications as read", &e);
                }
            }
        });
    }

    pub fn remove(ctx: Rc<Self>, id: i64) {
        spawn_local(async move {
            match query::client().delete_notification(id).await {
                Ok(_) => {
                    ctx.inbox.lock_mut().remove(id);
                }
                Err(e) => {
                    query::report("Failed to delete notification", &e);
                }
            }
        });
    }

    pub fn unread_count_signal(&self) -> impl Signal<Item = usize> + use<> {
        self.inbox.signal_ref(|inbox| inbox.unread_count())
    }

    pub fn connected_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.connected.signal()
    }
}

async fn send(sink: &mut Sink, frame: Frame) -> Result<(), anyhow::Error> {
    sink.send(WsMessage::Text(frame.encode()))
        .await
        .map_err(|e| anyhow!("error sending {}: {}", frame.command.as_str(), e))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_disconnect_discards_pending_session() {
        let ctx = NotificationContext::new();
        ctx.user_id.set(Some(1));
        assert!(ctx.is_current(1));

        ctx.disconnect();
        assert!(!ctx.is_current(1));
        assert!(ctx.inbox.lock_ref().is_empty());

        // a login as someone else must not accept the first user's list
        ctx.user_id.set(Some(2));
        assert!(!ctx.is_current(1));
        assert!(ctx.is_current(2));
    }
}
