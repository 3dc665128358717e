//! Noyau : compilation (pipeline réel)
//!
//! formule -> jetons + squelette -> AST -> squelette LaTeX
//!         -> liaison (symboles / valeurs / termes)
//!         -> assemblage (x2) + évaluation
//!
//! Aucune exécution de code dynamique : l’évaluation parcourt l’AST,
//! avec l’ensemble fixe d’opérateurs et de fonctions.

use log::debug;

use super::analyse::parse;
use super::erreur::CompileError;
use super::expr::{BinOp, Expr, UnOp};
use super::fonctions::Term;
use super::format::typeset_skeleton;
use super::jetons::{format_tokens, is_placeholder, tokenize, Token};
use super::liaison::{bind, Bindings};
use super::nombre::Number;
use super::options::CompileOptions;

/// Étapes intermédiaires (debug / explication).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub squelette: String,
    pub squelette_tex: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompileResult {
    pub numeric_result: f64,
    /// Valeur avant conversion (exacte si la formule n’a que des littéraux).
    pub value: Number,
    pub tex_with_symbols: String,
    pub tex_with_values: String,
    pub demarche: Demarche,
}

/// API publique : options par défaut.
pub fn compile(formula: &str, bindings: &Bindings) -> Result<CompileResult, CompileError> {
    compile_with(formula, bindings, &CompileOptions::default())
}

pub fn compile_with(
    formula: &str,
    bindings: &Bindings,
    options: &CompileOptions,
) -> Result<CompileResult, CompileError> {
    // 1) Jetons + squelette
    let (squelette, jetons) = tokenize(formula)?;
    debug!(
        "formule {formula:?} : {} jetons, squelette {squelette}",
        jetons.len()
    );

    // 2) AST
    let expr = parse(&squelette, &jetons)?;

    // 3) Squelette LaTeX (placeholders conservés)
    let squelette_tex = typeset_skeleton(&expr, &jetons, options);
    debug!("squelette LaTeX : {squelette_tex}");

    // 4) Liaison
    let reps = bind(&jetons, bindings, options)?;

    // 5) Évaluation
    let value = evaluate(&expr, &jetons, &reps.terms)?;

    // 6) Assemblage (même squelette, deux jeux de représentations)
    let tex_with_symbols = fill(&squelette_tex, &jetons, &reps.symbols)?;
    let tex_with_values = fill(&squelette_tex, &jetons, &reps.values)?;

    // exact très grand : la conversion peut déborder
    let numeric_result = value.to_f64();
    if !numeric_result.is_finite() {
        return Err(CompileError::arithmetic("résultat hors de la plage des flottants"));
    }
    debug!("résultat {formula:?} = {value}");

    Ok(CompileResult {
        numeric_result,
        value,
        tex_with_symbols,
        tex_with_values,
        demarche: Demarche {
            jetons: format_tokens(&jetons),
            squelette: squelette.to_string(),
            squelette_tex,
        },
    })
}

/// Remplace les placeholders, un par un, de gauche à droite.
/// Le genre du placeholder doit correspondre au jeton consommé.
pub fn fill(squelette: &str, tokens: &[Token], reps: &[String]) -> Result<String, CompileError> {
    let mut out = String::with_capacity(squelette.len() + reps.iter().map(String::len).sum::<usize>());
    let mut suivant = 0;

    for c in squelette.chars() {
        if !is_placeholder(c) {
            out.push(c);
            continue;
        }

        let (t, rep) = tokens
            .get(suivant)
            .zip(reps.get(suivant))
            .ok_or_else(|| CompileError::malformed(0, "squelette : placeholder en trop"))?;
        if t.kind.placeholder() != c {
            return Err(CompileError::malformed(
                t.position,
                "squelette : genre de placeholder inattendu",
            ));
        }
        out.push_str(rep);
        suivant += 1;
    }

    if suivant != tokens.len() || suivant != reps.len() {
        return Err(CompileError::malformed(
            tokens.get(suivant).map_or(0, |t| t.position),
            "squelette : jetons non consommés",
        ));
    }

    Ok(out)
}

/// Évalue l’AST avec les termes liés (un par jeton).
pub fn evaluate(expr: &Expr, tokens: &[Token], terms: &[Term]) -> Result<Number, CompileError> {
    let position = |i: usize| tokens.get(i).map_or(0, |t| t.position);
    let nom = |i: usize| tokens.get(i).map_or("?", |t| t.text.as_str());

    match expr {
        Expr::Operand(i) => match terms.get(*i) {
            Some(Term::Number(n)) => Ok(n.clone()),
            Some(Term::Function(..)) => Err(CompileError::malformed(
                position(*i),
                format!("la fonction {} est utilisée sans argument", nom(*i)),
            )),
            None => Err(CompileError::malformed(position(*i), "jeton sans terme")),
        },

        Expr::Group(x) => evaluate(x, tokens, terms),

        Expr::Unary(op, x) => {
            let v = evaluate(x, tokens, terms)?;
            Ok(match op {
                UnOp::Plus => v,
                UnOp::Neg => v.neg(),
            })
        }

        Expr::Binary(op, a, b) => {
            let x = evaluate(a, tokens, terms)?;
            let y = evaluate(b, tokens, terms)?;
            match op {
                BinOp::Add => x.add(&y),
                BinOp::Sub => x.sub(&y),
                BinOp::Mul => x.mul(&y),
                BinOp::Div => x.div(&y),
                BinOp::FloorDiv => x.floor_div(&y),
                BinOp::Mod => x.modulo(&y),
                BinOp::Pow => x.pow(&y),
            }
        }

        Expr::Call(f, args) => {
            let (fonction, unite) = match terms.get(*f) {
                Some(Term::Function(fonction, unite)) => (*fonction, *unite),
                _ => {
                    return Err(CompileError::malformed(
                        position(*f),
                        format!("{} n’est pas une fonction", nom(*f)),
                    ))
                }
            };
            if !fonction.accepts(args.len()) {
                return Err(CompileError::malformed(
                    position(*f),
                    format!(
                        "{} : nombre d’arguments incorrect ({})",
                        fonction.name(),
                        args.len()
                    ),
                ));
            }

            let valeurs = args
                .iter()
                .map(|a| evaluate(a, tokens, terms))
                .collect::<Result<Vec<_>, _>>()?;
            fonction.apply(unite, &valeurs)
        }
    }
}
