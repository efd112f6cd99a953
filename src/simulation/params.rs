//! Named numeric parameters and their change notifications
//!
//! A `ParameterRegistry<S>` holds the parameter descriptors of a subject `S`
//! (each a getter/setter pair over `S`) together with the observers that are
//! told when a parameter changes or the scenario is rebuilt. The subject owns
//! the registry; UI controls and the script console go through it.

use crate::error::Result;

pub type Getter<S> = fn(&S) -> f64;
pub type Setter<S> = fn(&mut S, f64) -> Result<()>;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ParameterChanged { name: &'static str, value: f64 },
    Rebuilt { num_bodies: usize },
}

pub struct ParameterNumber<S> {
    pub name: &'static str,
    pub label: &'static str, // localized
    pub decimal_places: Option<usize>,
    getter: Getter<S>,
    setter: Setter<S>,
}

// manual impls: fn pointers are Copy whatever `S` is
impl<S> Clone for ParameterNumber<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ParameterNumber<S> {}

impl<S> ParameterNumber<S> {
    pub fn new(name: &'static str, label: &'static str, getter: Getter<S>, setter: Setter<S>) -> Self {
        Self {
            name,
            label,
            decimal_places: None,
            getter,
            setter,
        }
    }

    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = Some(places);
        self
    }

    pub fn get(&self, subject: &S) -> f64 {
        (self.getter)(subject)
    }

    pub fn set(&self, subject: &mut S, value: f64) -> Result<()> {
        (self.setter)(subject, value)
    }

    pub fn format(&self, value: f64) -> String {
        match self.decimal_places {
            Some(places) => format!("{:.*}", places, value),
            None => format!("{}", value),
        }
    }
}

pub struct ParameterRegistry<S> {
    parameters: Vec<ParameterNumber<S>>,
    observers: Vec<Box<dyn FnMut(&Notification)>>,
}

impl<S> Default for ParameterRegistry<S> {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
            observers: Vec::new(),
        }
    }
}

impl<S> ParameterRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parameter(&mut self, parameter: ParameterNumber<S>) {
        self.parameters.push(parameter);
    }

    /// Case-insensitive lookup by name
    pub fn parameter(&self, name: &str) -> Option<ParameterNumber<S>> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .copied()
    }

    pub fn parameters(&self) -> &[ParameterNumber<S>] {
        &self.parameters
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Notification) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn broadcast(&mut self, name: &'static str, value: f64) {
        self.notify(&Notification::ParameterChanged { name, value });
    }

    pub fn notify(&mut self, notification: &Notification) {
        for observer in self.observers.iter_mut() {
            observer(notification);
        }
    }
}
