use std::time::Duration;

use clap::Subcommand;
use timerkit_core::{
    dispatch, format_clock, Collection, Config, ConfigField, Database, IntervalTimerEngine, Phase,
    SignalSink, Workout,
};

use crate::host::{runtime, Key, Keys, Output, RunOptions, TerminalSignals, Ticker};

#[derive(Subcommand)]
pub enum TabataAction {
    /// List saved workouts
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a workout from the configured defaults
    New {
        /// Workout name
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a workout as JSON
    Show { id: String },
    /// Set a duration (prepare, work, rest) or the round count
    Set {
        id: String,
        /// prepare | work | rest | rounds
        field: ConfigField,
        /// Seconds, or rounds
        value: u32,
    },
    /// Add to or subtract from the round count (never below 1)
    Rounds {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Rename a workout
    Rename { id: String, name: String },
    /// Delete a workout
    Delete { id: String },
    /// Run a workout. Keys: p pause/resume, r reset, s start, q quit
    Run {
        id: String,
        /// Deliver ticks without waiting (no keyboard)
        #[arg(long)]
        fast: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn example_workout(config: &Config) -> Workout {
    config.new_workout(Some("Example workout".into()))
}

pub fn run(action: TabataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let workouts = Collection::<Workout>::new(&db);

    match action {
        TabataAction::List { json } => {
            let all = workouts.load_or_seed(|| example_workout(&config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for w in &all {
                    println!(
                        "{}  {}  prepare {}s, work {}s, rest {}s, {} rounds",
                        w.id, w.name, w.timer.prepare_seconds, w.timer.work_seconds, w.timer.rest_seconds, w.timer.rounds
                    );
                }
            }
        }
        TabataAction::New { name } => {
            let workout = workouts.upsert(config.new_workout(name))?;
            println!("{}", workout.id);
        }
        TabataAction::Show { id } => {
            let workout = workouts.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&workout)?);
        }
        TabataAction::Set { id, field, value } => {
            let mut workout = workouts.get(&id)?;
            let mut engine = IntervalTimerEngine::new(workout.timer);
            engine.edit_config(field, value)?;
            workout.timer = *engine.config();
            workouts.upsert(workout)?;
            println!("{} = {value}", field.as_str());
        }
        TabataAction::Rounds { id, delta } => {
            let mut workout = workouts.get(&id)?;
            let mut engine = IntervalTimerEngine::new(workout.timer);
            let rounds = engine.adjust_rounds(delta)?;
            workout.timer = *engine.config();
            workouts.upsert(workout)?;
            println!("rounds = {rounds}");
        }
        TabataAction::Rename { id, name } => {
            let mut workout = workouts.get(&id)?;
            workout.name = name;
            workouts.upsert(workout)?;
            println!("ok");
        }
        TabataAction::Delete { id } => {
            if workouts.remove(&id)? {
                println!("deleted {id}");
            } else {
                return Err(format!("no workout with id {id}").into());
            }
        }
        TabataAction::Run { id, fast, json } => {
            let workout = workouts.get(&id)?;
            let mut engine = IntervalTimerEngine::new(workout.timer);
            let mut signals = TerminalSignals::new(&config.signals);
            let opts = RunOptions { fast, json };
            runtime()?.block_on(drive(&mut engine, &workout.name, opts, &mut signals))?;
        }
    }
    Ok(())
}

fn status_line(engine: &IntervalTimerEngine) -> String {
    format!(
        "[{:>7}] {}  round {}/{}",
        engine.phase(),
        format_clock(engine.remaining_seconds()),
        engine.current_round(),
        engine.rounds()
    )
}

fn play_start_cue(engine: &IntervalTimerEngine, signals: &mut TerminalSignals) {
    if let Some(cue) = engine.current_cue() {
        signals.on_tick_signal(cue);
    }
}

/// Drive one workout with a one-second clock until it finishes or the user quits.
async fn drive(
    engine: &mut IntervalTimerEngine,
    name: &str,
    opts: RunOptions,
    signals: &mut TerminalSignals,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = Output::new(opts.json);
    let mut ticker = Ticker::new(Duration::from_secs(1), opts.fast);
    let mut keys = Keys::new(!opts.fast);

    out.event(engine.start()?)?;
    play_start_cue(engine, signals);
    out.text(format!("{name}: {} rounds", engine.rounds()));
    out.text(status_line(engine));

    loop {
        tokio::select! {
            _ = ticker.tick(), if engine.is_running() => {
                let Some(outcome) = engine.tick() else { continue };
                dispatch(&outcome, signals);
                out.events(&outcome.events())?;
                if let Some(change) = outcome.transition {
                    out.text(format!("-> {}", change.to));
                }
                if outcome.completed {
                    out.text("Workout complete!");
                    break;
                }
                out.text(status_line(engine));
            }
            key = keys.next() => {
                match key {
                    Some(Key::Pause) if engine.phase() == Phase::Paused => {
                        out.event(engine.resume())?;
                        ticker.restart();
                        out.text(status_line(engine));
                    }
                    Some(Key::Pause) => {
                        out.event(engine.pause())?;
                        out.text(status_line(engine));
                    }
                    Some(Key::Start) => {
                        if let Some(event) = engine.start()? {
                            play_start_cue(engine, signals);
                            ticker.restart();
                            out.event(Some(event))?;
                            out.text(status_line(engine));
                        }
                    }
                    Some(Key::Reset) => {
                        out.event(engine.reset())?;
                        out.text(status_line(engine));
                    }
                    Some(Key::Quit) => break,
                    Some(_) => {}
                    None if !engine.is_running() => break,
                    None => {}
                }
            }
        }
    }

    tracing::debug!(phase = %engine.phase(), "run finished");
    Ok(())
}
