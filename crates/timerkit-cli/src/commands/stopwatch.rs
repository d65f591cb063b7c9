use std::time::Duration;

use clap::Args;
use timerkit_core::{format_hundredths, Config, StopwatchEngine};

use crate::host::{runtime, Key, Keys, Output, Ticker};

/// Hundredths of a second per displayed line while running.
const PRINT_EVERY: u64 = 100;

#[derive(Args)]
pub struct StopwatchArgs {
    /// Start immediately and stop after this many seconds
    #[arg(long = "for", value_name = "SECONDS")]
    duration: Option<u64>,
    /// Deliver ticks without waiting (requires --for)
    #[arg(long, requires = "duration")]
    fast: bool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

/// Keys: s start/stop, l lap (running) or reset (stopped), q quit.
pub fn run(args: StopwatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let tick = Duration::from_millis(config.stopwatch.tick_ms.max(1));
    let mut engine = StopwatchEngine::new();
    runtime()?.block_on(drive(&mut engine, tick, &args))
}

async fn drive(
    engine: &mut StopwatchEngine,
    tick: Duration,
    args: &StopwatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = Output::new(args.json);
    let mut ticker = Ticker::new(tick, args.fast);
    let mut keys = Keys::new(!args.fast);
    let limit = args.duration.map(|secs| secs * 100);

    if limit.is_some() {
        out.event(engine.start())?;
    } else {
        out.text("s start/stop, l lap/reset, q quit");
    }

    loop {
        tokio::select! {
            _ = ticker.tick(), if engine.is_running() => {
                let Some(elapsed) = engine.tick() else { continue };
                if limit.is_some_and(|limit| elapsed >= limit) {
                    out.event(engine.stop())?;
                    break;
                }
                if elapsed % PRINT_EVERY == 0 {
                    out.text(format_hundredths(elapsed));
                }
            }
            key = keys.next() => {
                match key {
                    Some(Key::Start) => {
                        let was_running = engine.is_running();
                        out.event(engine.toggle())?;
                        if !was_running {
                            ticker.restart();
                        }
                        out.text(format!(
                            "{} {}",
                            if engine.is_running() { "running" } else { "stopped" },
                            format_hundredths(engine.elapsed_hundredths())
                        ));
                    }
                    Some(Key::Lap) => {
                        out.event(engine.lap_or_reset())?;
                        print_laps(&out, engine);
                    }
                    Some(Key::Quit) => break,
                    Some(_) => {}
                    // Closed input leaves a timed run going until its limit.
                    None if limit.is_some() && engine.is_running() => {}
                    None => break,
                }
            }
        }
    }

    out.text(format!("total {}", format_hundredths(engine.elapsed_hundredths())));
    print_laps(&out, engine);
    Ok(())
}

fn print_laps(out: &Output, engine: &StopwatchEngine) {
    for lap in engine.laps() {
        out.text(format!("lap {} : {}", lap.number, format_hundredths(lap.elapsed_hundredths)));
    }
}
