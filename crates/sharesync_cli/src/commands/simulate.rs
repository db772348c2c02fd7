//! Simulate command implementation.

use super::script::{parse_script, Directive, ScriptError, Step};
use serde::Serialize;
use sharesync_engine::{
    ManualScheduler, MemoryProvider, ParticipantProvider, ParticipantRecord, StatusTone,
};
use sharesync_host::{BufferedSender, HostConfig, SyncHost};
use sharesync_state::{ItemStack, StatusEffect};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Outcome of a simulation run.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    /// Script path.
    pub script: String,
    /// Engine state at the end of the script.
    pub state: String,
    /// Baseline fingerprint, if any.
    pub baseline: Option<String>,
    /// Most recently broadcast fingerprint, if any.
    pub last_broadcast: Option<String>,
    /// Participants at the end of the script.
    pub participants: Vec<ParticipantView>,
    /// Engine counters.
    pub stats: StatsView,
}

/// Summary of one participant.
#[derive(Debug, Serialize)]
pub struct ParticipantView {
    /// Participant name.
    pub name: String,
    /// Fingerprint of the current state.
    pub fingerprint: String,
    /// Current health.
    pub health: f64,
    /// Food level.
    pub food: i32,
    /// Experience level.
    pub level: i32,
    /// Occupied slots.
    pub items: usize,
    /// Active effects.
    pub effects: usize,
}

/// Engine counters.
#[derive(Debug, Serialize)]
pub struct StatsView {
    /// Ticks run while syncing.
    pub ticks: u64,
    /// Divergences adopted.
    pub divergences: u64,
    /// Broadcasts performed.
    pub broadcasts: u64,
    /// Snapshots applied.
    pub applies: u64,
    /// Participants reset.
    pub resets: u64,
    /// Participant touches skipped.
    pub skipped: u64,
}

/// Runs the simulate command.
pub fn run(
    path: &Path,
    format: &str,
    config: HostConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read script {:?}: {}", path, e))?;
    let directives = parse_script(&source)?;

    let mut report = match format {
        // Keep stdout clean for the JSON document.
        "json" => simulate(&directives, config, &mut io::stderr().lock())?,
        _ => simulate(&directives, config, &mut io::stdout().lock())?,
    };
    report.script = path.display().to_string();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_text_output(&report);
        }
    }

    Ok(())
}

/// Runs parsed directives against a fresh host, echoing status lines and
/// `show` output to `out`.
pub fn simulate(
    directives: &[Directive],
    config: HostConfig,
    out: &mut dyn Write,
) -> Result<SimulationReport, Box<dyn std::error::Error>> {
    let provider = Arc::new(MemoryProvider::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let host = SyncHost::new(config, Arc::clone(&provider), scheduler.clone());
    let sender = BufferedSender::new("console");

    for Directive { line, step } in directives {
        let line = *line;
        match step {
            Step::Join { name, max_health } => {
                // Without an explicit ceiling the engine's fallback applies.
                let record = ParticipantRecord::new().with_max_health(*max_health);
                if !provider.join_with(name, record) {
                    return Err(ScriptError::DuplicateParticipant {
                        line,
                        name: name.clone(),
                    }
                    .into());
                }
                host.participant_joined(name);
            }
            Step::Leave { name } => {
                provider.leave(name).ok_or_else(|| unknown(line, name))?;
            }
            Step::Command(label) => {
                let result = host.dispatch(&sender, label);
                for message in sender.take() {
                    writeln!(out, "[{}] {}", tone_label(message.tone), message.text)?;
                }
                result?;
            }
            Step::Tick(count) => {
                scheduler.advance(*count);
            }
            Step::Set { name, field, value } => {
                if !provider.update(name, |record| field.apply(record, *value)) {
                    return Err(unknown(line, name).into());
                }
            }
            Step::Give {
                name,
                slot,
                item,
                amount,
            } => {
                let stack = ItemStack::new(item.as_str(), *amount);
                let mut placed = Ok(None);
                if !provider.update(name, |record| {
                    placed = record.inventory.set(*slot, Some(stack));
                }) {
                    return Err(unknown(line, name).into());
                }
                placed.map_err(|e| format!("line {}: {}", line, e))?;
            }
            Step::Effect {
                name,
                kind,
                duration,
                amplifier,
            } => {
                let effect = StatusEffect::new(kind.as_str(), *duration, *amplifier);
                let found = provider.update(name, |record| {
                    record.effects.retain(|existing| existing.kind != effect.kind);
                    record.effects.push(effect);
                });
                if !found {
                    return Err(unknown(line, name).into());
                }
            }
            Step::Show(target) => {
                let names = match target {
                    Some(name) if provider.is_active(name) => vec![name.clone()],
                    Some(name) => return Err(unknown(line, name).into()),
                    None => provider.list_active(),
                };
                for name in &names {
                    let view = participant_view(&host, name)?;
                    writeln!(out, "{}", format_participant(&view))?;
                }
            }
        }
    }

    let engine = host.engine();
    let stats = engine.stats();
    let participants = provider
        .list_active()
        .iter()
        .map(|name| participant_view(&host, name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimulationReport {
        script: String::new(),
        state: if engine.state().is_running() {
            "running".into()
        } else {
            "stopped".into()
        },
        baseline: engine.baseline_fingerprint().map(|f| f.to_string()),
        last_broadcast: engine.last_broadcast().map(|f| f.to_string()),
        participants,
        stats: StatsView {
            ticks: stats.ticks,
            divergences: stats.divergences,
            broadcasts: stats.broadcasts,
            applies: stats.applies,
            resets: stats.resets,
            skipped: stats.skipped,
        },
    })
}

fn unknown(line: usize, name: &str) -> ScriptError {
    ScriptError::UnknownParticipant {
        line,
        name: name.to_string(),
    }
}

fn participant_view(
    host: &SyncHost<MemoryProvider>,
    name: &String,
) -> Result<ParticipantView, Box<dyn std::error::Error>> {
    let snapshot = host.engine().capture(name)?;
    let inventory = snapshot.inventory();
    let items = inventory.contents.iter().flatten().count()
        + inventory.armor.iter().flatten().count()
        + usize::from(inventory.offhand.is_some());

    Ok(ParticipantView {
        name: name.clone(),
        fingerprint: snapshot.fingerprint().to_string(),
        health: snapshot.vitals().health,
        food: snapshot.vitals().food,
        level: snapshot.experience().level,
        items,
        effects: snapshot.effects().len(),
    })
}

fn tone_label(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Success => "ok",
        StatusTone::Notice => "note",
        StatusTone::Warning => "warn",
    }
}

fn format_participant(view: &ParticipantView) -> String {
    format!(
        "  {:<12} {}  health {:>5.1}  food {:>2}  level {:>3}  items {:>2}  effects {}",
        view.name, view.fingerprint, view.health, view.food, view.level, view.items, view.effects
    )
}

fn print_text_output(report: &SimulationReport) {
    println!();
    println!("ShareSync Simulation");
    println!("====================");
    println!();
    println!("Script: {}", report.script);
    println!("State:  {}", report.state);
    println!(
        "Baseline:       {}",
        report.baseline.as_deref().unwrap_or("-")
    );
    println!(
        "Last broadcast: {}",
        report.last_broadcast.as_deref().unwrap_or("-")
    );
    println!();
    println!("Participants:");
    if report.participants.is_empty() {
        println!("  (none)");
    }
    for view in &report.participants {
        println!("{}", format_participant(view));
    }
    println!();
    println!("Engine:");
    println!("  Ticks:       {}", report.stats.ticks);
    println!("  Divergences: {}", report.stats.divergences);
    println!("  Broadcasts:  {}", report.stats.broadcasts);
    println!("  Applies:     {}", report.stats.applies);
    println!("  Resets:      {}", report.stats.resets);
    println!("  Skipped:     {}", report.stats.skipped);
}
