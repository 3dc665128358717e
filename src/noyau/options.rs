// src/noyau/options.rs
//
// Options de rendu passées explicitement à chaque compilation.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Glyphe de multiplication (`\cdot`, `\times`, `\,`…).
    pub mul_symbol: String,

    /// Décimales fixes pour les valeurs liées (None = écriture la plus courte).
    pub decimals: Option<usize>,

    /// Macro valeur + unité (`\SI{3}{\meter}`).
    pub unit_command: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mul_symbol: r"\cdot".to_string(),
            decimals: None,
            unit_command: r"\SI".to_string(),
        }
    }
}
