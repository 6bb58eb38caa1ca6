//! Output placeholders and the controls that drive them.
//!
//! Each [`Callback`] binds one output id to the input ids it reads and a pure
//! function of (inputs, dataset). The page asks for [`Registry::dependencies`]
//! and calls back whenever a bound control changes.

use crate::processing::{top_by_count, top_by_price};
use crate::render::{self, Figure};
use crate::types::{CountOrder, Dataset, PriceCeiling};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

pub const PRICE_CEILING: &str = "price-ceiling";
pub const BAR_TOGGLE: &str = "bar-toggle";
pub const TOP_TOGGLE: &str = "top-toggle";

pub const AVERAGE_PRICE: &str = "average-price";
pub const WINE_COUNT: &str = "wine-count";

/// Current control values keyed by control id.
pub type Inputs = HashMap<String, Value>;

pub type Handler = fn(&Inputs, &Dataset) -> Result<Figure, CallbackError>;

#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("no callback renders output '{0}'")]
    UnknownOutput(String),
    #[error("invalid value for '{id}': {value}")]
    InvalidInput { id: String, value: String },
}

pub struct Callback {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    handler: Handler,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
}

#[derive(Default)]
pub struct Registry {
    callbacks: Vec<Callback>,
}

impl Registry {
    /// The two panels of the dashboard.
    pub fn dashboard() -> Self {
        let mut registry = Registry::default();
        registry.register(AVERAGE_PRICE, &[PRICE_CEILING, BAR_TOGGLE], average_price);
        registry.register(WINE_COUNT, &[TOP_TOGGLE], wine_count);
        registry
    }

    pub fn register(
        &mut self,
        output: &'static str,
        inputs: &'static [&'static str],
        handler: Handler,
    ) {
        self.callbacks.push(Callback { output, inputs, handler });
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.callbacks
            .iter()
            .map(|cb| Dependency { output: cb.output, inputs: cb.inputs })
            .collect()
    }

    pub fn dispatch(
        &self,
        output: &str,
        inputs: &Inputs,
        dataset: &Dataset,
    ) -> Result<Figure, CallbackError> {
        let callback = self
            .callbacks
            .iter()
            .find(|cb| cb.output == output)
            .ok_or_else(|| CallbackError::UnknownOutput(output.to_string()))?;

        debug!(output, ?inputs, "running callback");
        (callback.handler)(inputs, dataset)
    }
}

/// Unset, `false`, `null` and an empty checklist all read as unchecked.
fn checked(inputs: &Inputs, id: &str) -> bool {
    match inputs.get(id) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Array(values)) => !values.is_empty(),
        _ => false,
    }
}

fn ceiling(inputs: &Inputs, id: &str) -> Result<PriceCeiling, CallbackError> {
    let invalid = |value: &Value| CallbackError::InvalidInput {
        id: id.to_string(),
        value: value.to_string(),
    };

    match inputs.get(id) {
        None | Some(Value::Null) => Ok(PriceCeiling::All),
        Some(Value::String(s)) => s.parse().map_err(|_| invalid(&Value::String(s.clone()))),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(PriceCeiling::UpTo)
            .ok_or_else(|| invalid(&Value::Number(n.clone()))),
        Some(other) => Err(invalid(other)),
    }
}

fn average_price(inputs: &Inputs, dataset: &Dataset) -> Result<Figure, CallbackError> {
    let ceiling = ceiling(inputs, PRICE_CEILING)?;
    let rows = top_by_price(dataset, ceiling);

    if checked(inputs, BAR_TOGGLE) {
        Ok(render::price_bar(&rows, ceiling))
    } else {
        Ok(render::price_pie(&rows, ceiling))
    }
}

fn wine_count(inputs: &Inputs, dataset: &Dataset) -> Result<Figure, CallbackError> {
    let order = CountOrder::from_show_top(checked(inputs, TOP_TOGGLE));
    let rows = top_by_count(dataset, order);
    Ok(render::count_pie(&rows, order))
}
