use crate::widgets::Terminal;
use std::io::IsTerminal;
use std::sync::Arc;

#[macro_use]
mod macros;

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod helper;
pub mod instance_lock;
pub mod logger;
#[cfg_attr(target_family = "windows", path = "os/windows.rs")]
#[cfg_attr(target_family = "unix", path = "os/unix.rs")]
pub mod os;
pub mod path_env;
pub mod session;
pub mod storage;
pub mod ui;
pub mod widgets;

mod views;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    let args = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();

    if !std::io::stdout().is_terminal() {
        eprintln!("stockwatch needs an interactive terminal (TTY).");
        std::process::exit(1);
    }

    let _guard = match logger::init() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to initialize logging: {err:#}");
            std::process::exit(1);
        }
    };
    let config = config::Config::load(&args);

    let _instance_lock = match instance_lock::acquire(&config.data_dir) {
        Ok(lock) => lock,
        Err(err) => {
            if err.kind() == std::io::ErrorKind::WouldBlock {
                eprintln!("Another stockwatch is already running, close it first.");
            } else {
                eprintln!("Failed to acquire instance lock: {err}");
            }
            std::process::exit(3);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        server = %config.server_url,
        data_dir = %config.data_dir.display(),
        log_dir = %logger::active_log_dir().display(),
        "starting"
    );

    let storage = Arc::new(storage::FileStore::new(config.data_dir.clone()));
    let api = Arc::new(api::HttpStockApi::new(
        &config.server_url,
        config.request_timeout,
    ));
    let session = session::Session::new(storage, api);

    if args.reset {
        if let Err(err) = session.reset_watchlist().await {
            tracing::error!(error = %err, "failed to reset watchlist");
            eprintln!("Failed to reset watchlist: {err}");
            std::process::exit(1);
        }
    }

    let _follow = session.start().await;
    tokio::spawn({
        let session = Arc::clone(&session);
        async move {
            session.load_catalog().await;
        }
    });

    // Set up panic hook to restore terminal
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    Terminal::enter_full_screen();
    let result = tokio::select! {
        result = app::run(session) => result,
        () = wait_for_shutdown_signal() => {
            tracing::warn!("shutdown signal received");
            Ok(())
        }
    };
    Terminal::exit_full_screen();

    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
        eprintln!("{err:#}");
        std::process::exit(1);
    }
    tracing::info!("stopped");
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        let mut signal = signal;
        if let Some(sig) = signal.as_mut() {
            let _ = sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        () = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
