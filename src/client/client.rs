//! Full-screen terminal client.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};

use crate::config::ConnectionConfig;
use crate::protocol::{Command, ServerLine};

use super::state::ClientApp;
use super::terminal::TerminalGuard;
use super::{connect, ui, ClientError};

/// Shared client app state.
type SharedApp = Arc<Mutex<ClientApp>>;

/// Run the terminal client.
pub async fn run(config: ConnectionConfig) -> Result<(), ClientError> {
    let app = Arc::new(Mutex::new(ClientApp::new(config.addr())));

    let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

    let mut tasks = Vec::new();
    match connect(&config).await {
        Ok(connection) => {
            let (mut sender, mut receiver) = connection.split::<String>();
            app.lock().await.connected();

            // The session starts as soon as the screen is up.
            let _ = tx.send(Command::Start);

            let send_app = Arc::clone(&app);
            tasks.push(tokio::spawn(async move {
                while let Some(command) = rx.recv().await {
                    if let Err(e) = sender.send(command.to_string()).await {
                        send_app
                            .lock()
                            .await
                            .disconnect(format!("Connection lost: {}", e));
                        break;
                    }
                }
            }));

            let recv_app = Arc::clone(&app);
            tasks.push(tokio::spawn(async move {
                while let Some(line) = receiver.next().await {
                    let mut app = recv_app.lock().await;
                    match line {
                        Ok(line) => app.handle_server_line(ServerLine::parse(&line)),
                        Err(e) => {
                            app.disconnect(format!("Connection lost: {}", e));
                            return;
                        }
                    }
                }
                recv_app
                    .lock()
                    .await
                    .disconnect("Connection closed by server".to_string());
            }));
        }
        Err(e) => {
            app.lock().await.disconnect(format!("Could not connect to the server. {}", e));
        }
    }

    let result = run_tui(&app, &tx).await;

    // Let a pending QUIT reach the server before tearing down.
    drop(tx);
    if let Some(sender) = tasks.first_mut() {
        let _ = tokio::time::timeout(Duration::from_millis(200), sender).await;
    }
    for task in &tasks {
        task.abort();
    }

    result
}

/// Run the client TUI.
async fn run_tui(app: &SharedApp, tx: &mpsc::UnboundedSender<Command>) -> Result<(), ClientError> {
    let mut guard = TerminalGuard::enter()?;

    loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                break;
            }
            guard.terminal.draw(|frame| ui::render(frame, &app))?;
        }

        // Poll with a timeout so server lines show up without a key press.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, tx, key.code).await;
            }
        }
    }

    Ok(())
}

/// Handle keyboard input.
async fn handle_input(app: &SharedApp, tx: &mpsc::UnboundedSender<Command>, key: KeyCode) {
    let mut app = app.lock().await;

    let command = match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.check(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.next(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
        _ => None,
    };

    if let Some(command) = command {
        let _ = tx.send(command);
    }
}
