// src/noyau/jetons.rs
//
// Tokenisation : formule -> (squelette, jetons)
// ------------------------------------------------
// - Tout ce qui n’est pas opérateur / parenthèse / virgule est un opérande.
// - Chaque opérande est remplacé dans le squelette par UN caractère :
//     □ (ordinaire) ou ■ (spécial : sqrt, abs => notation propre au rendu)
// - Les jetons sont rangés dans l’ordre d’apparition (gauche -> droite) :
//   tout le reste du pipeline s’appuie sur cet ordre.

use std::fmt;

use super::crochets::find_span;
use super::erreur::CompileError;
use super::fonctions::{notation_of, Notation};

pub const PLACEHOLDER: char = '□';
pub const PLACEHOLDER_SPECIAL: char = '■';

/// Opérateurs reconnus (les longs d’abord, find_span est glouton de toute façon).
pub const OPERATEURS: &[&str] = &["**", "//", "+", "-", "*", "/", "%", "(", ")", ","];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ordinary,
    Special(Notation),
}

impl TokenKind {
    pub fn placeholder(self) -> char {
        match self {
            TokenKind::Ordinary => PLACEHOLDER,
            TokenKind::Special(_) => PLACEHOLDER_SPECIAL,
        }
    }

    pub fn notation(self) -> Notation {
        match self {
            TokenKind::Ordinary => Notation::Parenthesized,
            TokenKind::Special(n) => n,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// rang dans l’ordre d’extraction
    pub index: usize,
    /// décalage (caractères) dans la formule
    pub position: usize,
    pub kind: TokenKind,
}

pub fn is_placeholder(c: char) -> bool {
    c == PLACEHOLDER || c == PLACEHOLDER_SPECIAL
}

/// Formule avec opérandes remplacés. Garde, pour chaque caractère,
/// sa position dans la formule d’origine (messages d’erreur).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skeleton {
    chars: Vec<char>,
    positions: Vec<usize>,
    longueur: usize,
}

impl Skeleton {
    fn push(&mut self, c: char, position: usize) {
        self.chars.push(c);
        self.positions.push(position);
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Position dans la formule ; au-delà du squelette : longueur de la formule.
    pub fn position(&self, i: usize) -> usize {
        self.positions.get(i).copied().unwrap_or(self.longueur)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.chars.iter().filter(|c| is_placeholder(**c)).count()
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// `1e`, `2.5E`, `.5e` : préfixe d’un littéral scientifique dont le signe d’exposant
/// ne doit pas couper le jeton.
fn is_exponent_prefix(run: &[char]) -> bool {
    let Some((last, mantisse)) = run.split_last() else {
        return false;
    };
    if *last != 'e' && *last != 'E' {
        return false;
    }
    let chiffres = mantisse.iter().filter(|c| c.is_ascii_digit()).count();
    let points = mantisse.iter().filter(|c| **c == '.').count();
    chiffres > 0 && points <= 1 && chiffres + points == mantisse.len()
}

fn push_operand(
    chars: &[char],
    cut: usize,
    stop: usize,
    squelette: &mut Skeleton,
    tokens: &mut Vec<Token>,
) -> Result<(), CompileError> {
    let run = &chars[cut..stop];
    let debut = run.iter().take_while(|c| c.is_whitespace()).count();
    let fin = run.len() - run.iter().rev().take_while(|c| c.is_whitespace()).count();
    if debut >= fin {
        // deux opérateurs adjacents (unaire, parenthèses…) : pas de jeton
        return Ok(());
    }

    let corps = &run[debut..fin];
    if let Some(k) = corps.iter().position(|c| c.is_whitespace()) {
        return Err(CompileError::malformed(
            cut + debut + k,
            "opérateur manquant entre deux opérandes",
        ));
    }

    let text: String = corps.iter().collect();
    let kind = match notation_of(&text) {
        Notation::Parenthesized => TokenKind::Ordinary,
        n => TokenKind::Special(n),
    };
    let position = cut + debut;

    squelette.push(kind.placeholder(), position);
    tokens.push(Token {
        text,
        index: tokens.len(),
        position,
        kind,
    });
    Ok(())
}

/// Découpe la formule en squelette + jetons.
///
/// Exemple:
///   "sqrt(a)*b**2" -> squelette "■(□)*□**□", jetons [sqrt, a, b, 2]
pub fn tokenize(formula: &str) -> Result<(Skeleton, Vec<Token>), CompileError> {
    let chars: Vec<char> = formula.chars().collect();

    if let Some(p) = chars.iter().position(|c| is_placeholder(*c)) {
        return Err(CompileError::malformed(p, "caractère réservé"));
    }

    let mut squelette = Skeleton {
        longueur: chars.len(),
        ..Skeleton::default()
    };
    let mut tokens: Vec<Token> = Vec::new();

    let mut cut = 0;
    let mut from = 0;

    loop {
        let span = find_span(&chars, from, chars.len(), OPERATEURS);

        if let Some(m) = span {
            // 1e-3 : le signe appartient au littéral
            let signe = m.op == "+" || m.op == "-";
            let chiffre_apres = chars.get(m.end()).is_some_and(|c| c.is_ascii_digit());
            if signe && chiffre_apres && is_exponent_prefix(&chars[cut..m.start]) {
                from = m.end();
                continue;
            }
        }

        let stop = span.map_or(chars.len(), |m| m.start);
        push_operand(&chars, cut, stop, &mut squelette, &mut tokens)?;

        match span {
            None => break,
            Some(m) => {
                for (k, c) in m.op.chars().enumerate() {
                    squelette.push(c, m.start + k);
                }
                cut = m.end();
                from = cut;
            }
        }
    }

    if squelette.is_empty() {
        return Err(CompileError::malformed(0, "entrée vide"));
    }

    Ok((squelette, tokens))
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
