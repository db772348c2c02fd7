//! Simulation script parsing.
//!
//! A script is a list of directives, one per line. Blank lines and lines
//! starting with `#` are ignored.

use sharesync_engine::ParticipantRecord;
use sharesync_state::SlotRef;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing or running a script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// The first word of a line is not a directive.
    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective {
        /// Line number (1-based).
        line: usize,
        /// The unrecognized word.
        directive: String,
    },

    /// Wrong number of arguments.
    #[error("line {line}: usage: {usage}")]
    Usage {
        /// Line number (1-based).
        line: usize,
        /// Expected form.
        usage: &'static str,
    },

    /// An argument could not be parsed.
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidValue {
        /// Line number (1-based).
        line: usize,
        /// What the argument was meant to be.
        what: &'static str,
        /// The raw argument.
        value: String,
    },

    /// A participant name was not found.
    #[error("line {line}: no participant named '{name}'")]
    UnknownParticipant {
        /// Line number (1-based).
        line: usize,
        /// The name.
        name: String,
    },

    /// A participant name is already taken.
    #[error("line {line}: participant '{name}' already joined")]
    DuplicateParticipant {
        /// Line number (1-based).
        line: usize,
        /// The name.
        name: String,
    },
}

/// A participant field that `set` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Health
    Health,
    /// Absorption
    Absorption,
    /// Food level
    Food,
    /// Saturation
    Saturation,
    /// Exhaustion
    Exhaustion,
    /// Remaining air
    Air,
    /// Fire ticks
    Fire,
    /// Freeze ticks
    Freeze,
    /// Fall distance
    Fall,
    /// Invulnerability ticks
    Invulnerable,
    /// Experience level
    Level,
    /// Experience progress
    Progress,
    /// Total experience
    Total,
}

impl Field {
    /// Returns true if the field holds a whole number.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Field::Food
                | Field::Air
                | Field::Fire
                | Field::Freeze
                | Field::Invulnerable
                | Field::Level
                | Field::Total
        )
    }

    /// Writes `value` into the record.
    pub fn apply(&self, record: &mut ParticipantRecord, value: f64) {
        let vitals = &mut record.vitals;
        let experience = &mut record.experience;
        match self {
            Field::Health => vitals.health = value,
            Field::Absorption => vitals.absorption = value,
            Field::Food => vitals.food = value as i32,
            Field::Saturation => vitals.saturation = value as f32,
            Field::Exhaustion => vitals.exhaustion = value as f32,
            Field::Air => vitals.remaining_air = value as i32,
            Field::Fire => vitals.fire_ticks = value as i32,
            Field::Freeze => vitals.freeze_ticks = value as i32,
            Field::Fall => vitals.fall_distance = value as f32,
            Field::Invulnerable => vitals.invulnerable_ticks = value as i32,
            Field::Level => experience.level = value as i32,
            Field::Progress => experience.progress = value as f32,
            Field::Total => experience.total = value as i32,
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "health" => Field::Health,
            "absorption" => Field::Absorption,
            "food" => Field::Food,
            "saturation" => Field::Saturation,
            "exhaustion" => Field::Exhaustion,
            "air" => Field::Air,
            "fire" => Field::Fire,
            "freeze" => Field::Freeze,
            "fall" => Field::Fall,
            "invulnerable" => Field::Invulnerable,
            "level" => Field::Level,
            "progress" => Field::Progress,
            "total" => Field::Total,
            _ => return Err(()),
        })
    }
}

/// One script step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A participant joins.
    Join {
        /// Participant name.
        name: String,
        /// Health ceiling; `None` leaves it unknown.
        max_health: Option<f64>,
    },
    /// A participant leaves.
    Leave {
        /// Participant name.
        name: String,
    },
    /// A control command is dispatched.
    Command(String),
    /// The scheduler advances.
    Tick(u32),
    /// A field is changed outside the engine.
    Set {
        /// Participant name.
        name: String,
        /// Field changed.
        field: Field,
        /// New value.
        value: f64,
    },
    /// An item is placed in a slot.
    Give {
        /// Participant name.
        name: String,
        /// Target slot.
        slot: SlotRef,
        /// Item kind.
        item: String,
        /// Stack size.
        amount: u32,
    },
    /// An effect is added.
    Effect {
        /// Participant name.
        name: String,
        /// Effect kind.
        kind: String,
        /// Duration in ticks.
        duration: i32,
        /// Amplifier.
        amplifier: i32,
    },
    /// Participant state is printed.
    Show(Option<String>),
}

/// A step and the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Line number (1-based).
    pub line: usize,
    /// The step.
    pub step: Step,
}

/// Parses a whole script.
pub fn parse_script(source: &str) -> Result<Vec<Directive>, ScriptError> {
    let mut directives = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let line = index + 1;
        directives.push(Directive {
            line,
            step: parse_line(line, text)?,
        });
    }
    Ok(directives)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let usage = |usage| ScriptError::Usage { line, usage };

    match words.as_slice() {
        ["join", name] => Ok(Step::Join {
            name: name.to_string(),
            max_health: None,
        }),
        ["join", name, max] => Ok(Step::Join {
            name: name.to_string(),
            max_health: Some(parse_value(line, "max health", max)?),
        }),
        ["join", ..] => Err(usage("join <name> [max_health]")),

        ["leave", name] => Ok(Step::Leave {
            name: name.to_string(),
        }),
        ["leave", ..] => Err(usage("leave <name>")),

        [label @ ("share" | "unshare")] => Ok(Step::Command(label.to_string())),
        ["share" | "unshare", ..] => Err(usage("share | unshare")),

        ["tick"] => Ok(Step::Tick(1)),
        ["tick", count] => Ok(Step::Tick(parse_value(line, "tick count", count)?)),
        ["tick", ..] => Err(usage("tick [n]")),

        ["set", name, field, value] => {
            let field: Field = field.parse().map_err(|_| ScriptError::InvalidValue {
                line,
                what: "field",
                value: field.to_string(),
            })?;
            let value = if field.is_integer() {
                f64::from(parse_value::<i32>(line, "integer", value)?)
            } else {
                parse_value(line, "number", value)?
            };
            Ok(Step::Set {
                name: name.to_string(),
                field,
                value,
            })
        }
        ["set", ..] => Err(usage("set <name> <field> <value>")),

        ["give", name, slot, item, rest @ ..] if rest.len() <= 1 => {
            let slot: SlotRef = slot.parse().map_err(|_| ScriptError::InvalidValue {
                line,
                what: "slot",
                value: slot.to_string(),
            })?;
            let amount = match rest {
                [amount] => parse_value(line, "amount", amount)?,
                _ => 1,
            };
            Ok(Step::Give {
                name: name.to_string(),
                slot,
                item: item.to_string(),
                amount,
            })
        }
        ["give", ..] => Err(usage("give <name> <slot> <item> [amount]")),

        ["effect", name, kind, duration, rest @ ..] if rest.len() <= 1 => {
            let amplifier = match rest {
                [amplifier] => parse_value(line, "amplifier", amplifier)?,
                _ => 0,
            };
            Ok(Step::Effect {
                name: name.to_string(),
                kind: kind.to_string(),
                duration: parse_value(line, "duration", duration)?,
                amplifier,
            })
        }
        ["effect", ..] => Err(usage("effect <name> <kind> <duration> [amplifier]")),

        ["show"] => Ok(Step::Show(None)),
        ["show", name] => Ok(Step::Show(Some(name.to_string()))),
        ["show", ..] => Err(usage("show [name]")),

        [directive, ..] => Err(ScriptError::UnknownDirective {
            line,
            directive: directive.to_string(),
        }),
        [] => Err(usage("<directive> [args...]")),
    }
}

fn parse_value<T: FromStr>(line: usize, what: &'static str, raw: &str) -> Result<T, ScriptError> {
    raw.parse().map_err(|_| ScriptError::InvalidValue {
        line,
        what,
        value: raw.to_string(),
    })
}
