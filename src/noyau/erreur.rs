// src/noyau/erreur.rs
//
// Erreurs du compilateur de formules.
// Toutes les erreurs sont fatales pour la requête en cours : pas de sortie partielle.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Parenthèses non appariées, opérande manquant, opérateur en fin de chaîne…
    /// `position` = décalage (en caractères) dans la formule d’origine.
    #[error("expression mal formée (position {position}) : {reason}")]
    MalformedExpression { position: usize, reason: String },

    /// Jeton qui n’est ni un nombre, ni un nom connu, ni une clé de la table de liaison.
    #[error("identifiant inconnu : {0}")]
    UnknownIdentifier(String),

    /// Division par zéro, hors domaine, dépassement.
    #[error("échec arithmétique : {0}")]
    ArithmeticFailure(String),
}

impl CompileError {
    pub fn malformed(position: usize, reason: impl Into<String>) -> Self {
        CompileError::MalformedExpression {
            position,
            reason: reason.into(),
        }
    }

    pub fn arithmetic(reason: impl Into<String>) -> Self {
        CompileError::ArithmeticFailure(reason.into())
    }
}
