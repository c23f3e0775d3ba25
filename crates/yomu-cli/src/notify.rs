use anyhow::{Result, anyhow};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use yomu_lib::notification::parse_push;
use yomu_lib::stomp::{Command, Frame, notification_destination};

use crate::config::Config;
use crate::output;

const SUBSCRIPTION_ID: &str = "sub-0";

pub async fn notifications(
    config: &Config,
    watch: bool,
    read: Option<i64>,
    read_all: bool,
    delete: Option<i64>,
) -> Result<()> {
    config.require_session()?;
    let client = config.client();

    if let Some(id) = read {
        client.mark_notification_read(id).await?;
        println!("Marked notification {} as read", id);
    }
    if read_all {
        client.mark_all_notifications_read().await?;
        println!("Marked all notifications as read");
    }
    if let Some(id) = delete {
        client.delete_notification(id).await?;
        println!("Deleted notification {}", id);
    }
    if read.is_some() || read_all || delete.is_some() {
        return Ok(());
    }

    let mut notifications = client.notifications().await?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let unread = notifications.iter().filter(|n| !n.is_read).count();
    println!("{} notifications, {} unread", notifications.len(), unread);
    for notification in notifications.iter() {
        println!("{}", output::notification_line(notification));
    }

    if watch {
        self::watch(config).await?;
    }
    Ok(())
}

/// `host[:port]` of a websocket url, sent as the STOMP `host` header.
fn ws_host(ws_url: &str) -> Result<String> {
    let url = Url::parse(ws_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("{} has no host", ws_url))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

async fn send(
    sink: &mut (impl futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin),
    frame: Frame,
) -> Result<()> {
    debug!("send {}", frame.command.as_str());
    sink.send(Message::Text(frame.encode())).await?;
    Ok(())
}

async fn watch(config: &Config) -> Result<()> {
    let user_id = config
        .user_id
        .ok_or_else(|| anyhow!("no user id in config, log in again"))?;

    let (stream, _) = tokio_tungstenite::connect_async(config.ws_url.as_str()).await?;
    info!("connected to {}", config.ws_url);
    let (mut sink, mut stream) = stream.split();

    send(
        &mut sink,
        Frame::connect(&ws_host(&config.ws_url)?, config.token.as_deref()),
    )
    .await?;

    println!("Watching for notifications, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                send(&mut sink, Frame::unsubscribe(SUBSCRIPTION_ID)).await?;
                send(&mut sink, Frame::disconnect()).await?;
                sink.close().await?;
                break;
            }
            message = stream.next() => {
                let text = match message {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(anyhow!("notification socket closed"));
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };

                let Some(frame) = Frame::decode(&text)? else {
                    continue;
                };
                match frame.command {
                    Command::Connected => {
                        send(
                            &mut sink,
                            Frame::subscribe(SUBSCRIPTION_ID, &notification_destination(user_id)),
                        )
                        .await?;
                    }
                    Command::Message => match parse_push(&frame.body) {
                        Ok(notification) => {
                            println!("{}", output::notification_line(&notification))
                        }
                        Err(e) => warn!("skip notification: {}", e),
                    },
                    Command::Error => {
                        let message = frame.get("message").unwrap_or("unknown error");
                        return Err(anyhow!("broker error: {}", message));
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ws_host() {
        assert_eq!(ws_host("ws://localhost:8080/ws").unwrap(), "localhost:8080");
        assert_eq!(ws_host("wss://yomu.example/ws?x=1").unwrap(), "yomu.example");
        // default ports are implied by the scheme
        assert_eq!(ws_host("wss://yomu.example:443/ws").unwrap(), "yomu.example");
        assert!(ws_host("localhost:8080/ws").is_err());
    }
}
