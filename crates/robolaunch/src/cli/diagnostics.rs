//! Crash and hang diagnostics
//!
//! A panic anywhere in the launcher logs a backtrace before the default hook
//! runs. On Unix, sending SIGUSR2 to a running launcher logs which phase it is
//! in, which is enough to tell a stuck plugin from a stuck robot program.

use std::{
    backtrace::Backtrace,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        OnceLock,
    },
};

use strum::{AsRefStr, Display, FromRepr};

/// Where the launcher is in a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, FromRepr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    Starting,
    Discovery,
    Parsing,
    Dispatch,
    Finished,
}

static PHASE: AtomicU8 = AtomicU8::new(Phase::Starting as u8);
static COMMAND: OnceLock<String> = OnceLock::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);

pub fn enter(phase: Phase) {
    PHASE.store(phase as u8, Ordering::SeqCst);
}

pub fn current_phase() -> Phase {
    Phase::from_repr(PHASE.load(Ordering::SeqCst)).unwrap_or(Phase::Starting)
}

/// One-line description of the process state
pub fn snapshot() -> String {
    format!(
        "pid={} command={} phase={}",
        std::process::id(),
        COMMAND.get().map_or("-", String::as_str),
        current_phase()
    )
}

/// Install the panic hook and the SIGUSR2 listener, once per process.
pub fn install(command: &str) {
    let _ = COMMAND.set(command.to_string());
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!(target: "faulthandler", "{}: {info}\n{backtrace}", snapshot());
        previous(info);
    }));

    if let Err(e) = spawn_signal_listener() {
        tracing::warn!("Failed to install SIGUSR2 handler: {e}");
    }
}

#[cfg(unix)]
fn spawn_signal_listener() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Registered before the thread starts so the handler exists once install returns
    let mut sigusr2 = runtime.block_on(async { signal(SignalKind::user_defined2()) })?;

    std::thread::Builder::new()
        .name("robolaunch-diagnostics".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                while sigusr2.recv().await.is_some() {
                    tracing::warn!(target: "faulthandler", "{}", snapshot());
                    eprintln!("robolaunch: {}", snapshot());
                }
            });
        })?;

    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn spawn_signal_listener() -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_round_trips_through_atomic() {
        enter(Phase::Parsing);
        assert_eq!(current_phase(), Phase::Parsing);
        enter(Phase::Starting);
    }

    #[test]
    fn test_snapshot_names_pid_and_phase() {
        let snap = snapshot();
        assert!(snap.contains(&format!("pid={}", std::process::id())));
        assert!(snap.contains("phase="));
    }

    #[test]
    fn test_phase_names_are_snake_case() {
        assert_eq!(Phase::Dispatch.as_ref(), "dispatch");
        assert_eq!(Phase::Finished.to_string(), "finished");
    }
}
