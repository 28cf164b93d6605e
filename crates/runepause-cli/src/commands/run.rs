use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use runepause_core::runtime::Ticker;
use runepause_core::{BreakKind, BreakOrchestrator, Event, Tickable, TomlSettingsStore};
use tokio::sync::{mpsc, Mutex};
use tokio::time;

use super::{emit, CliResult};

#[derive(Args)]
pub struct RunArgs {
    /// Start a break right away: short or long
    #[arg(long)]
    break_now: Option<BreakKind>,
    /// Exit after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
    /// Milliseconds per tick
    #[arg(long, default_value_t = 1000, hide = true)]
    period_ms: u64,
}

/// Counts ticks delivered to the wrapped state machine.
struct Counted<T> {
    inner: T,
    ticks: u64,
}

impl<T: Tickable> Tickable for Counted<T> {
    fn tick(&mut self) -> Vec<Event> {
        self.ticks += 1;
        self.inner.tick()
    }

    fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}

pub fn run(args: RunArgs) -> CliResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_scheduler(args))
}

async fn run_scheduler(args: RunArgs) -> CliResult {
    let store = TomlSettingsStore::default_location()?;
    let mut orchestrator = BreakOrchestrator::load(store)?;

    let opening = match args.break_now {
        Some(kind) => orchestrator.trigger_break(Some(kind))?,
        None => orchestrator.start_timer(None)?,
    };
    for event in &opening {
        emit(event)?;
    }

    let period = Duration::from_millis(args.period_ms.max(1));
    let shared = Arc::new(Mutex::new(Counted {
        inner: orchestrator,
        ticks: 0,
    }));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = Ticker::spawn(shared.clone(), period, tx);
    tracing::info!(period_ms = args.period_ms, "scheduler running");

    let mut tray = time::interval(period);
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(event) => emit(&event)?,
                None => break,
            },
            _ = tray.tick() => {
                let state = shared.lock().await;
                eprintln!("{}", state.inner.status_line());
                if args.ticks.is_some_and(|limit| state.ticks >= limit) {
                    break;
                }
            }
        }
    }

    ticker.cancel();
    while let Ok(event) = rx.try_recv() {
        emit(&event)?;
    }
    Ok(())
}
