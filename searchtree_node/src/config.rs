// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Solver run configuration as stored in saved caches.
//!
//! These are the shapes the configuration forms bind to: a [`Cache`] bundles a
//! model, a parameter file, and settings for each solver stage (Conjure,
//! Savile Row, Minion). A [`RepMap`] lists, per model file, the representation
//! choices Conjure offers for each decision variable.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Model file name → representation choices for its variables.
pub type RepMap = HashMap<String, Vec<VarRepresentation>>;

/// A saved, named run configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cache {
    /// Name the configuration was saved as.
    pub name: String,
    /// Essence model file.
    pub essence_file: String,
    /// Parameter file.
    pub param_file: String,
    /// Per-stage settings.
    pub config: CombinedConfig,
}

impl Cache {
    /// Whether any representation answer was chosen, so the representation
    /// selectors should start open.
    pub fn wants_representations(&self) -> bool {
        self.config
            .conjure_config
            .answers
            .iter()
            .any(|a| a.as_deref().is_some_and(|a| !a.is_empty()))
    }
}

/// Settings for every solver stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedConfig {
    /// Conjure (model refinement).
    pub conjure_config: ConjureConfig,
    /// Savile Row (model translation).
    pub sr_config: SrConfig,
    /// Minion (search).
    pub minion_config: MinionConfig,
}

/// Conjure stage settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConjureConfig {
    /// Time limit in seconds.
    #[serde(default)]
    pub conjure_time: Option<u32>,
    /// Refinement strategy code; see [`STRATEGY_OPTIONS`].
    #[serde(default)]
    pub strategy: String,
    /// Chosen representation answer per variable, in variable order.
    #[serde(default)]
    pub answers: Vec<Option<String>>,
}

/// Savile Row stage settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrConfig {
    /// Time limit in seconds.
    #[serde(default)]
    pub sr_time: Option<u32>,
    /// Optimisation level flag (for example `-O2`).
    #[serde(default)]
    pub optimisation: String,
    /// Symmetry breaking flag (for example `-S1`).
    #[serde(default)]
    pub symmetry: String,
    /// Translation flag.
    #[serde(default)]
    pub translation: String,
}

/// Minion stage settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinionConfig {
    /// Time limit in seconds.
    #[serde(default)]
    pub minion_time: Option<u32>,
    /// Search node limit.
    #[serde(default)]
    pub node_limit: Option<u64>,
    /// Solution limit.
    #[serde(default)]
    pub sol_limit: Option<u64>,
    /// Variable ordering heuristic.
    #[serde(default)]
    pub search_order: String,
    /// Preprocessing level.
    #[serde(default)]
    pub preprocessing: String,
    /// Keep searching after the first solution.
    #[serde(default)]
    pub find_all_solutions: bool,
}

/// Representation choices for one decision variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRepresentation {
    /// Variable name.
    pub name: String,
    /// Available representations.
    pub representations: Vec<Representation>,
}

/// One representation Conjure can pick for a variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    /// Answer passed back to Conjure.
    pub answer: String,
    /// Human-readable description.
    pub description: String,
}

/// A `(value, label)` pair for a selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Value written into the configuration.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

/// Conjure refinement strategies as `(code, label)`.
pub const STRATEGY_OPTIONS: [(&str, &str); 3] = [("", "Default"), ("c", "compact"), ("s", "sparse")];

/// Look up a saved cache by name.
pub fn find_cache<'a>(caches: &'a [Cache], name: &str) -> Option<&'a Cache> {
    caches.iter().find(|c| c.name == name)
}

/// Selector options per variable for `essence_file`, in variable order.
///
/// Empty when the model has no recorded representations.
pub fn representation_options(
    reps: &RepMap,
    essence_file: &str,
) -> Vec<(String, Vec<SelectOption>)> {
    reps.get(essence_file)
        .map(|vars| {
            vars.iter()
                .map(|v| {
                    let options = v
                        .representations
                        .iter()
                        .map(|r| SelectOption {
                            value: r.answer.clone(),
                            label: r.description.clone(),
                        })
                        .collect();
                    (v.name.clone(), options)
                })
                .collect()
        })
        .unwrap_or_default()
}
