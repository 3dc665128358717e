// src/noyau/liaison.rs
//
// Liaison des jetons : chaque jeton reçoit trois représentations parallèles
//   - symbole LaTeX
//   - valeur LaTeX (+ unité)
//   - terme évaluable
//
// Ordre de résolution (le premier qui répond gagne) :
//   1) littéral numérique   -> les trois formes = le littéral
//   2) constante / fonction -> \sin, \pi… (e reste “e”)
//   3) variante trig D / G  -> \sin… (suffixe retiré)
//   4) agrégat min/max/abs
//   5) table de liaison de l’appelant
//   6) sinon : UnknownIdentifier

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use super::erreur::CompileError;
use super::fonctions::{lookup_aggregate, lookup_transcendental, lookup_trig_variant, Term};
use super::jetons::Token;
use super::nombre::{format_real, parse_literal, Number};
use super::options::CompileOptions;

/// Une variable fournie par l’appelant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub numeric_result: f64,
    pub tex_symbol: String,
    #[serde(default)]
    pub tex_unit: String,
}

impl Binding {
    pub fn new(numeric_result: f64, tex_symbol: impl Into<String>, tex_unit: impl Into<String>) -> Self {
        Self {
            numeric_result,
            tex_symbol: tex_symbol.into(),
            tex_unit: tex_unit.into(),
        }
    }
}

pub type Bindings = HashMap<String, Binding>;

/// Trois listes parallèles, même ordre que les jetons.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Representations {
    pub symbols: Vec<String>,
    pub values: Vec<String>,
    pub terms: Vec<Term>,
}

impl Representations {
    fn push(&mut self, symbol: String, value: String, term: Term) {
        self.symbols.push(symbol);
        self.values.push(value);
        self.terms.push(term);
    }
}

/// Rendu “valeur + unité” d’une variable liée.
/// Valeur négative (-0 compris) => entre parenthèses (évite `3 - -2`).
pub fn format_bound_value(b: &Binding, options: &CompileOptions) -> String {
    let nombre = format_real(b.numeric_result, options.decimals);
    let unite: String = b.tex_unit.chars().filter(|c| *c != '-').collect();

    let corps = if unite.trim().is_empty() {
        nombre
    } else {
        format!("{}{{{nombre}}}{{{unite}}}", options.unit_command)
    };

    if b.numeric_result.is_sign_negative() {
        format!(r"\left({corps}\right)")
    } else {
        corps
    }
}

pub fn bind(
    tokens: &[Token],
    bindings: &Bindings,
    options: &CompileOptions,
) -> Result<Representations, CompileError> {
    let mut reps = Representations::default();

    for t in tokens {
        let nom = t.text.as_str();

        // 1) littéral
        if let Some(n) = parse_literal(nom) {
            trace!("jeton {} {nom:?} : littéral", t.index);
            reps.push(nom.to_string(), nom.to_string(), Term::Number(n));
            continue;
        }

        // 2) 3) 4) tables fixes
        let fixe = lookup_transcendental(nom)
            .or_else(|| lookup_trig_variant(nom))
            .or_else(|| lookup_aggregate(nom));
        if let Some((term, tex)) = fixe {
            trace!("jeton {} {nom:?} : table fixe -> {tex:?}", t.index);
            reps.push(tex.to_string(), tex.to_string(), term);
            continue;
        }

        // 5) table de l’appelant
        if let Some(b) = bindings.get(nom) {
            trace!("jeton {} {nom:?} : liée = {}", t.index, b.numeric_result);
            reps.push(
                b.tex_symbol.clone(),
                format_bound_value(b, options),
                Term::Number(Number::Real(b.numeric_result)),
            );
            continue;
        }

        return Err(CompileError::UnknownIdentifier(nom.to_string()));
    }

    Ok(reps)
}
