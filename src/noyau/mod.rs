//! Noyau : compilateur formule -> LaTeX + valeur
//!
//! Organisation interne :
//! - jetons.rs   : tokenisation (squelette □ / ■ + jetons)
//! - crochets.rs : appariement de parenthèses + recherche d’opérateur au niveau courant
//! - analyse.rs  : squelette -> AST (précédence, associativité, unaires)
//! - expr.rs     : AST
//! - format.rs   : AST -> squelette LaTeX (placeholders conservés)
//! - fonctions.rs: tables fixes (constantes, fonctions, variantes trig, agrégats)
//! - liaison.rs  : jetons -> symboles / valeurs / termes
//! - nombre.rs   : nombres exacts (rationnels) + flottants
//! - eval.rs     : pipeline complet + assemblage + évaluation
//! - options.rs  : options de rendu
//! - erreur.rs   : erreurs typées

pub mod analyse;
pub mod crochets;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod liaison;
pub mod nombre;
pub mod options;


#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use erreur::CompileError;
pub use eval::{compile, compile_with, CompileResult, Demarche};
pub use liaison::{Binding, Bindings};
pub use nombre::Number;
pub use options::CompileOptions;
