//! Console commands over the application's parameters
//!
//! Accepts `;`-separated commands of the form `name = value` (set) or `name`
//! (query). Names are matched case-insensitively. `script` reproduces the
//! parameters changed since the last `update` as a command string.
//!
//! A parser created with `watch` follows the application's rebuilds: after a
//! `Notification::Rebuilt` it calls `update` before running another command,
//! so `script` only reports changes made to the current configuration.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Result, ScenarioError};
use crate::simulation::app::ContactApp;
use crate::simulation::params::Notification;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { name: String, value: f64 },
    Get { name: String },
}

pub fn parse_command(text: &str) -> Result<Command> {
    let text = text.trim();
    match text.split_once('=') {
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return Err(ScenarioError::InvalidCommand(text.to_owned()));
            }
            let value = value
                .parse::<f64>()
                .map_err(|_| ScenarioError::InvalidCommand(text.to_owned()))?;
            Ok(Command::Set {
                name: name.to_owned(),
                value,
            })
        }
        None if !text.is_empty() && !text.contains(char::is_whitespace) => Ok(Command::Get {
            name: text.to_owned(),
        }),
        None => Err(ScenarioError::InvalidCommand(text.to_owned())),
    }
}

#[derive(Debug, Default)]
pub struct ScriptParser {
    baseline: Vec<(&'static str, f64)>, // values at the last update
    rebuilt: Rc<Cell<bool>>, // set by the app's Rebuilt notification
}

impl ScriptParser {
    pub fn new(app: &ContactApp) -> Self {
        let mut parser = Self::default();
        parser.update(app);
        parser
    }

    /// Create a parser that resynchronizes after every rebuild of `app`
    pub fn watch(app: &mut ContactApp) -> Self {
        let parser = Self::new(app);
        let flag = parser.rebuilt.clone();
        app.subscribe(move |n| {
            if let Notification::Rebuilt { .. } = n {
                flag.set(true);
            }
        });
        parser
    }

    /// Whether the app rebuilt since the last `update`
    pub fn is_stale(&self) -> bool {
        self.rebuilt.get()
    }

    /// Remember the current parameter values as the baseline for `script`
    pub fn update(&mut self, app: &ContactApp) {
        self.baseline = app
            .parameters()
            .parameters()
            .iter()
            .map(|p| (p.name, p.get(app)))
            .collect();
        self.rebuilt.set(false);
    }

    /// Run every command in `line`; returns the value of the last query, if any
    pub fn execute(&mut self, app: &mut ContactApp, line: &str) -> Result<Option<f64>> {
        let mut last = None;
        for text in line.split(';').filter(|t| !t.trim().is_empty()) {
            last = match parse_command(text)? {
                Command::Set { name, value } => {
                    app.set_parameter(&name, value)?;
                    None
                }
                Command::Get { name } => Some(app.get_parameter(&name)?),
            };
            if self.is_stale() {
                self.update(app);
            }
        }
        Ok(last)
    }

    /// Commands that recreate every parameter changed since the last `update`
    pub fn script(&self, app: &ContactApp) -> String {
        app.parameters()
            .parameters()
            .iter()
            .filter_map(|p| {
                let value = p.get(app);
                let unchanged = self
                    .baseline
                    .iter()
                    .any(|(name, old)| *name == p.name && *old == value);
                (!unchanged).then(|| format!("{}={};", p.name, p.format(value)))
            })
            .collect()
    }
}
