use std::time::Duration;

use clap::Subcommand;
use timerkit_core::{
    dispatch, format_clock, Collection, Config, Database, Recipe, StepSequenceEngine, StepStatus,
};

use crate::host::{runtime, Key, Keys, Output, RunOptions, TerminalSignals, Ticker};

#[derive(Subcommand)]
pub enum RecipeAction {
    /// List saved recipes
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a recipe with one default step
    New {
        /// Recipe name
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a recipe as JSON
    Show { id: String },
    /// Append a step
    AddStep {
        id: String,
        label: String,
        /// Duration in seconds
        duration: u32,
    },
    /// Change a step's label or duration
    EditStep {
        id: String,
        step: u64,
        #[arg(long)]
        label: Option<String>,
        /// Duration in seconds
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Remove a step
    RemoveStep { id: String, step: u64 },
    /// Replace the recipe notes
    Memo { id: String, text: String },
    /// Rename a recipe
    Rename { id: String, name: String },
    /// Delete a recipe
    Delete { id: String },
    /// Run a recipe. Keys: n next step, p pause/resume, r reset, s start, q quit
    Run {
        id: String,
        /// Deliver ticks without waiting; steps advance on their own
        #[arg(long)]
        fast: bool,
        /// Move to the next step as soon as one finishes
        #[arg(long)]
        auto_advance: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn example_recipe(config: &Config) -> Recipe {
    let mut recipe = config.new_recipe(Some("Example recipe".into()));
    recipe.memo = "Write your recipe notes here.".into();
    recipe
}

/// Load a recipe, apply an idle edit through the engine, and store it back.
fn edit<T>(
    recipes: &Collection<'_, Recipe>,
    id: &str,
    f: impl FnOnce(&mut StepSequenceEngine) -> Result<T, timerkit_core::EngineError>,
) -> Result<T, Box<dyn std::error::Error>> {
    let mut engine = StepSequenceEngine::new(recipes.get(id)?);
    let value = f(&mut engine)?;
    recipes.upsert(engine.recipe().clone())?;
    Ok(value)
}

pub fn run(action: RecipeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let recipes = Collection::<Recipe>::new(&db);

    match action {
        RecipeAction::List { json } => {
            let all = recipes.load_or_seed(|| example_recipe(&config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for r in &all {
                    println!(
                        "{}  {}  {} steps, {}",
                        r.id,
                        r.name,
                        r.steps.len(),
                        format_clock(u32::try_from(r.total_seconds()).unwrap_or(u32::MAX))
                    );
                }
            }
        }
        RecipeAction::New { name } => {
            let recipe = recipes.upsert(config.new_recipe(name))?;
            println!("{}", recipe.id);
        }
        RecipeAction::Show { id } => {
            let recipe = recipes.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        RecipeAction::AddStep { id, label, duration } => {
            let step_id = edit(&recipes, &id, |engine| engine.append_step(label, duration))?;
            println!("{step_id}");
        }
        RecipeAction::EditStep { id, step, label, duration } => {
            edit(&recipes, &id, |engine| engine.update_step(step, label, duration))?;
            println!("ok");
        }
        RecipeAction::RemoveStep { id, step } => {
            let removed = edit(&recipes, &id, |engine| engine.remove_step(step))?;
            println!("removed {}", removed.label);
        }
        RecipeAction::Memo { id, text } => {
            edit(&recipes, &id, |engine| {
                engine.set_memo(text);
                Ok(())
            })?;
            println!("ok");
        }
        RecipeAction::Rename { id, name } => {
            edit(&recipes, &id, |engine| engine.rename(name))?;
            println!("ok");
        }
        RecipeAction::Delete { id } => {
            if recipes.remove(&id)? {
                println!("deleted {id}");
            } else {
                return Err(format!("no recipe with id {id}").into());
            }
        }
        RecipeAction::Run { id, fast, auto_advance, json } => {
            let mut engine = StepSequenceEngine::new(recipes.get(&id)?);
            let mut signals = TerminalSignals::new(&config.signals);
            let opts = RunOptions { fast, json };
            runtime()?.block_on(drive(&mut engine, opts, auto_advance || fast, &mut signals))?;
        }
    }
    Ok(())
}

fn status_line(engine: &StepSequenceEngine) -> String {
    let label = engine.current_step().map(|s| s.label.as_str()).unwrap_or("-");
    format!(
        "[{}/{}] {}  {}  ({})",
        engine.cursor() + 1,
        engine.step_count(),
        label,
        format_clock(engine.remaining_seconds()),
        engine.status()
    )
}

async fn drive(
    engine: &mut StepSequenceEngine,
    opts: RunOptions,
    auto_advance: bool,
    signals: &mut TerminalSignals,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = Output::new(opts.json);
    let mut ticker = Ticker::new(Duration::from_secs(1), opts.fast);
    let mut keys = Keys::new(!opts.fast);

    out.event(engine.start()?)?;
    out.text(format!("{}: {} steps", engine.recipe().name, engine.step_count()));
    out.text(status_line(engine));

    loop {
        tokio::select! {
            _ = ticker.tick(), if engine.status() == StepStatus::Running => {
                let Some(outcome) = engine.tick() else { continue };
                dispatch(&outcome, signals);
                out.events(&outcome.events(engine.recipe()))?;
                if outcome.all_completed {
                    out.text(format!("{} is done!", engine.recipe().name));
                    break;
                }
                if outcome.step_completed {
                    out.text(format!("Step {} finished", outcome.step_index + 1));
                    if auto_advance {
                        out.event(engine.advance())?;
                        ticker.restart();
                    } else {
                        out.text("Press n for the next step");
                        continue;
                    }
                }
                out.text(status_line(engine));
            }
            key = keys.next() => {
                match key {
                    Some(Key::Next) => {
                        if let Some(event) = engine.advance() {
                            ticker.restart();
                            out.event(Some(event))?;
                            out.text(status_line(engine));
                        }
                    }
                    Some(Key::Pause) if engine.status() == StepStatus::Paused => {
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
                    None if engine.status() != StepStatus::Running => break,
                    None => {}
                }
            }
        }
    }

    tracing::debug!(status = %engine.status(), "run finished");
    Ok(())
}
