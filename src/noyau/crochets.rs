// src/noyau/crochets.rs
//
// Parenthèses appariées + recherche d’opérateur “au niveau courant”.
//
// Les deux fonctions travaillent sur des slices de caractères : la formule brute
// (positions = positions utilisateur) ou le squelette (l’appelant reconvertit la position).

use super::erreur::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Avant,
    Arriere,
}

/// Occurrence d’un opérateur candidat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub op: &'static str,
}

impl Span {
    /// Indice juste après l’opérateur.
    pub fn end(&self) -> usize {
        self.start + self.op.chars().count()
    }
}

/// Trouve la parenthèse appariée à celle en `at`, au même niveau d’imbrication.
///
/// `Avant` : `at` doit pointer sur `(` ; `Arriere` : sur `)`.
pub fn match_bracket(chars: &[char], at: usize, dir: Direction) -> Result<usize, CompileError> {
    let (ouvrante, fermante) = match dir {
        Direction::Avant => ('(', ')'),
        Direction::Arriere => (')', '('),
    };

    if chars.get(at) != Some(&ouvrante) {
        return Err(CompileError::malformed(at, "parenthèse attendue"));
    }

    let mut depth: usize = 0;
    let mut i = at;
    loop {
        let c = chars[i];
        if c == ouvrante {
            depth += 1;
        } else if c == fermante {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }

        match dir {
            Direction::Avant => {
                i += 1;
                if i >= chars.len() {
                    break;
                }
            }
            Direction::Arriere => {
                if i == 0 {
                    break;
                }
                i -= 1;
            }
        }
    }

    Err(CompileError::malformed(at, "parenthèse non appariée"))
}

/// Premier candidat dans `chars[start..end]` qui n’est pas imbriqué dans une parenthèse
/// ouverte après `start`. Les candidats longs passent avant les courts à la même position
/// (`**` avant `*`, `//` avant `/`) : l’appelant passe donc la liste complète des
/// opérateurs et filtre ensuite, sinon `*` matcherait la moitié de `**`.
///
/// None = “fin de chaîne”.
pub fn find_span(
    chars: &[char],
    start: usize,
    end: usize,
    candidates: &[&'static str],
) -> Option<Span> {
    let end = end.min(chars.len());
    let mut depth: i64 = 0;

    for i in start..end {
        if depth == 0 {
            let best = candidates
                .iter()
                .copied()
                .filter(|c| matches_at(chars, i, end, c))
                .max_by_key(|c| c.len());
            if let Some(op) = best {
                return Some(Span { start: i, op });
            }
        }

        match chars[i] {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }

    None
}

fn matches_at(chars: &[char], i: usize, end: usize, candidate: &str) -> bool {
    let mut j = i;
    for c in candidate.chars() {
        if j >= end || chars[j] != c {
            return false;
        }
        j += 1;
    }
    true
}
