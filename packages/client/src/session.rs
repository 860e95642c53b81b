//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use neighborly_server::infrastructure::dto::websocket::{
    ClientEvent, RegisterPayload, ServerEvent,
};

use crate::{
    command::{Command, USAGE},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Render a server event for the terminal
fn render(event: &ServerEvent) -> String {
    match event {
        ServerEvent::Registered(payload) => MessageFormatter::format_registered(payload),
        ServerEvent::ReceiveMessage(message) => MessageFormatter::format_received(message),
        ServerEvent::MessageSent(message) => MessageFormatter::format_sent(message),
        ServerEvent::MessageError(payload) => {
            MessageFormatter::format_message_error(&payload.error)
        }
        ServerEvent::UserTyping(payload) => MessageFormatter::format_typing(&payload.sender_id),
        ServerEvent::UserStatusChange(payload) => MessageFormatter::format_status(payload),
        ServerEvent::Error(payload) => MessageFormatter::format_rejected(payload),
    }
}

fn encode(event: &ClientEvent) -> Result<Message, ClientError> {
    serde_json::to_string(event)
        .map(|json| Message::Text(json.into()))
        .map_err(|e| ClientError::ConnectionError(format!("Failed to encode event: {}", e)))
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user quits, or an error when the connection is
/// lost or the registration is rejected.
pub async fn run_client_session(url: &str, user_id: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to messaging server!");

    let (mut write, mut read) = ws_stream.split();

    // Register and wait for the acknowledgment
    let register = ClientEvent::Register(RegisterPayload {
        user_id: user_id.to_string(),
    });
    write
        .send(encode(&register)?)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    loop {
        let frame = match read.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                return Err(ClientError::ConnectionError(
                    "Connection closed before registration".to_string(),
                ));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
        };
        match serde_json::from_str::<ServerEvent>(frame.as_str()) {
            Ok(ServerEvent::Registered(payload)) => {
                print!("{}", MessageFormatter::format_registered(&payload));
                break;
            }
            Ok(ServerEvent::Error(payload)) if payload.event == "register" => {
                return Err(ClientError::RegistrationRejected(payload.error));
            }
            _ => {}
        }
    }

    println!(
        "\nYou are '{}'. {}. Press Ctrl+C to exit.\n",
        user_id, USAGE
    );

    // Spawn a task to handle incoming events
    let user_id_for_read = user_id.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => render(&event),
                        // If parsing fails, display as raw text
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", user_id);

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    // Ctrl+C / Ctrl+D
                    if input_tx.send("/quit".to_string()).is_err() {
                        tracing::debug!("Input channel already closed");
                    }
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn prompt lines into events
    let user_id_for_write = user_id.to_string();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(usage) => {
                    println!("{}", usage);
                    redisplay_prompt(&user_id_for_write);
                    continue;
                }
            };

            let Some(event) = command.into_event(&user_id_for_write) else {
                tracing::info!("Quit requested");
                return false;
            };

            let frame = match encode(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("{}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(frame).await {
                tracing::warn!("Failed to send {}: {}", event.name(), e);
                return true;
            }
        }

        false
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(true) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(true) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
