// src/noyau/analyse.rs
//
// Squelette -> AST (descente récursive par niveaux de précédence)
// ----------------------------------------------------------------
// Chaque niveau coupe sa plage [lo, hi) sur ses opérateurs “au niveau courant”
// (find_span saute l’intérieur des parenthèses), puis délègue les morceaux
// au niveau suivant :
//
//   somme     : + -             (binaires, gauche)
//   produit   : * / // %        (gauche)
//   unaire    : + - préfixes
//   puissance : **              (droite ; l’exposant repasse par unaire)
//   primaire  : □ | (somme) | □(args)
//
// Les plages entre parenthèses repassent par `somme`.
// Un + / - est binaire seulement s’il suit un opérande (□ ou ')').

use super::crochets::{find_span, match_bracket, Direction, Span};
use super::erreur::CompileError;
use super::expr::{BinOp, Expr, UnOp};
use super::jetons::{is_placeholder, Skeleton, Token};

/// Opérateurs binaires + virgule (sans parenthèses : find_span les traverse).
const OPERATEURS_NIVEAU: &[&str] = &["**", "//", "+", "-", "*", "/", "%", ","];

/// Garde-fou : imbrication maximale de parenthèses (pile d’appels bornée).
const MAX_PROFONDEUR: usize = 200;

/// Garde-fou : hauteur maximale de l’AST. Rendu, évaluation et libération de l’arbre
/// sont récursifs : une longue chaîne `a+a+…` ou `---…a` est refusée avant d’être construite.
const MAX_HAUTEUR: usize = 512;

/// Sous-arbre + sa hauteur.
type Branche = (Expr, usize);

struct Analyseur<'a> {
    squelette: &'a Skeleton,
    chars: &'a [char],
    // position dans le squelette -> indice du jeton
    token_at: Vec<Option<usize>>,
}

/// Construit l’AST du squelette. Les feuilles référencent `tokens` par indice,
/// dans l’ordre gauche -> droite.
pub fn parse(squelette: &Skeleton, tokens: &[Token]) -> Result<Expr, CompileError> {
    let chars = squelette.chars();

    let mut compte = 0;
    let token_at: Vec<Option<usize>> = chars
        .iter()
        .map(|c| {
            if is_placeholder(*c) {
                compte += 1;
                Some(compte - 1)
            } else {
                None
            }
        })
        .collect();
    if compte != tokens.len() {
        return Err(CompileError::malformed(
            0,
            format!("squelette incohérent : {compte} places pour {} jetons", tokens.len()),
        ));
    }

    let a = Analyseur {
        squelette,
        chars,
        token_at,
    };
    a.verifie_parentheses()?;
    let (expr, _) = a.somme(0, chars.len())?;
    Ok(expr)
}

impl Analyseur<'_> {
    fn erreur(&self, i: usize, reason: &str) -> CompileError {
        CompileError::malformed(self.squelette.position(i), reason)
    }

    fn token(&self, i: usize) -> Result<usize, CompileError> {
        self.token_at
            .get(i)
            .copied()
            .flatten()
            .ok_or_else(|| self.erreur(i, "opérande attendu"))
    }

    /// Nœud de hauteur `hauteur`, refusé au-delà de MAX_HAUTEUR.
    fn noeud(&self, i: usize, expr: Expr, hauteur: usize) -> Result<Branche, CompileError> {
        if hauteur > MAX_HAUTEUR {
            return Err(self.erreur(i, "formule trop longue (arbre trop profond)"));
        }
        Ok((expr, hauteur))
    }

    /// Passe linéaire : parenthèses équilibrées + profondeur bornée.
    fn verifie_parentheses(&self) -> Result<(), CompileError> {
        let mut ouvertes: Vec<usize> = Vec::new();
        for (i, c) in self.chars.iter().enumerate() {
            match c {
                '(' => {
                    ouvertes.push(i);
                    if ouvertes.len() > MAX_PROFONDEUR {
                        return Err(self.erreur(i, "imbrication trop profonde"));
                    }
                }
                ')' => {
                    if ouvertes.pop().is_none() {
                        return Err(self.erreur(i, "parenthèse fermante sans ouvrante"));
                    }
                }
                _ => {}
            }
        }
        match ouvertes.first() {
            Some(&k) => Err(self.erreur(k, "parenthèse non fermée")),
            None => Ok(()),
        }
    }

    /// Opérateurs au niveau courant de [lo, hi), dans l’ordre.
    fn operateurs(&self, lo: usize, hi: usize) -> Vec<Span> {
        let mut out = Vec::new();
        let mut from = lo;
        while let Some(m) = find_span(self.chars, from, hi, OPERATEURS_NIVEAU) {
            from = m.end();
            out.push(m);
        }
        out
    }

    fn est_binaire(&self, lo: usize, i: usize) -> bool {
        i > lo && {
            let prec = self.chars[i - 1];
            is_placeholder(prec) || prec == ')'
        }
    }

    /// Repli gauche : x0 op1 x1 op2 x2 … => ((x0 op1 x1) op2 x2) …
    fn repli_gauche(
        &self,
        lo: usize,
        hi: usize,
        coupes: &[Span],
        suivant: impl Fn(&Self, usize, usize) -> Result<Branche, CompileError>,
    ) -> Result<Branche, CompileError> {
        let Some(premiere) = coupes.first() else {
            return suivant(self, lo, hi);
        };

        let (mut acc, mut h) = suivant(self, lo, premiere.start)?;
        for (k, m) in coupes.iter().enumerate() {
            let fin = coupes.get(k + 1).map_or(hi, |n| n.start);
            let op = BinOp::from_symbol(m.op).ok_or_else(|| self.erreur(m.start, "opérateur inconnu"))?;
            let (rhs, hr) = suivant(self, m.end(), fin)?;
            (acc, h) = self.noeud(
                m.start,
                Expr::Binary(op, Box::new(acc), Box::new(rhs)),
                1 + h.max(hr),
            )?;
        }
        Ok((acc, h))
    }

    fn somme(&self, lo: usize, hi: usize) -> Result<Branche, CompileError> {
        if lo >= hi {
            return Err(self.erreur(lo, "opérande manquant"));
        }

        let ops = self.operateurs(lo, hi);
        if let Some(v) = ops.iter().find(|m| m.op == ",") {
            return Err(self.erreur(v.start, "virgule hors d’un appel de fonction"));
        }

        let coupes: Vec<Span> = ops
            .into_iter()
            .filter(|m| (m.op == "+" || m.op == "-") && self.est_binaire(lo, m.start))
            .collect();

        self.repli_gauche(lo, hi, &coupes, Self::produit)
    }

    fn produit(&self, lo: usize, hi: usize) -> Result<Branche, CompileError> {
        if lo >= hi {
            return Err(self.erreur(lo, "opérande manquant"));
        }

        // les signes unaires ne coupent pas ici : a*-b*c = (a*(-b))*c
        let coupes: Vec<Span> = self
            .operateurs(lo, hi)
            .into_iter()
            .filter(|m| matches!(m.op, "*" | "/" | "//" | "%"))
            .collect();

        self.repli_gauche(lo, hi, &coupes, Self::unaire)
    }

    /// Signes préfixes + puissances, sans récursion par signe ni par `**` :
    ///
    ///   s0 b0 ** s1 b1 ** s2 b2  =>  s0( b0 ** s1( b1 ** s2(b2) ) )
    ///
    /// (`**` à droite, l’exposant garde ses signes : `-a**-b = -(a**(-b))`).
    fn unaire(&self, lo: usize, hi: usize) -> Result<Branche, CompileError> {
        let puissances: Vec<Span> = self
            .operateurs(lo, hi)
            .into_iter()
            .filter(|m| m.op == "**")
            .collect();

        // maillons : (signes, base, position du `**` qui suit)
        let mut maillons = Vec::with_capacity(puissances.len() + 1);
        let mut debut = lo;
        for k in 0..=puissances.len() {
            let fin = puissances.get(k).map_or(hi, |m| m.start);

            let mut i = debut;
            let mut signes = Vec::new();
            while i < fin {
                match self.chars[i] {
                    '+' => signes.push((i, UnOp::Plus)),
                    '-' => signes.push((i, UnOp::Neg)),
                    _ => break,
                }
                i += 1;
            }
            maillons.push((signes, self.primaire(i, fin)?, fin));
            debut = puissances.get(k).map_or(hi, |m| m.end());
        }

        let mut acc: Option<Branche> = None;
        for (signes, (base, hb), at) in maillons.into_iter().rev() {
            let (mut e, mut h) = match acc {
                None => (base, hb),
                Some((exposant, he)) => self.noeud(
                    at,
                    Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exposant)),
                    1 + hb.max(he),
                )?,
            };
            for (i, op) in signes.into_iter().rev() {
                (e, h) = self.noeud(i, Expr::Unary(op, Box::new(e)), h + 1)?;
            }
            acc = Some((e, h));
        }
        acc.ok_or_else(|| self.erreur(lo, "opérande manquant"))
    }

    fn primaire(&self, lo: usize, hi: usize) -> Result<Branche, CompileError> {
        if lo >= hi {
            return Err(self.erreur(lo, "opérande manquant"));
        }
        let c = self.chars;

        let non_fermee = |k: usize| self.erreur(k, "parenthèse non fermée");

        // étendue du premier primaire de la plage
        let fin = match c[lo] {
            '(' => match_bracket(c, lo, Direction::Avant).map_err(|_| non_fermee(lo))? + 1,
            x if is_placeholder(x) && lo + 1 < hi && c[lo + 1] == '(' => {
                match_bracket(c, lo + 1, Direction::Avant).map_err(|_| non_fermee(lo + 1))? + 1
            }
            x if is_placeholder(x) => lo + 1,
            _ => return Err(self.erreur(lo, "opérande attendu")),
        };
        if fin != hi {
            return Err(self.erreur(fin, "opérateur manquant"));
        }

        if hi - lo == 1 {
            return Ok((Expr::Operand(self.token(lo)?), 1));
        }

        let ouvrante = match_bracket(c, hi - 1, Direction::Arriere)
            .map_err(|_| self.erreur(hi - 1, "parenthèse fermante sans ouvrante"))?;
        if ouvrante == lo {
            let (inner, h) = self.somme(lo + 1, hi - 1)?;
            self.noeud(lo, Expr::Group(Box::new(inner)), h + 1)
        } else {
            let (args, h) = self.arguments(ouvrante + 1, hi - 1)?;
            self.noeud(lo, Expr::Call(self.token(lo)?, args), h + 1)
        }
    }

    /// Arguments d’un appel + hauteur du plus haut.
    fn arguments(&self, lo: usize, hi: usize) -> Result<(Vec<Expr>, usize), CompileError> {
        if lo >= hi {
            return Err(self.erreur(lo, "argument manquant"));
        }

        let mut args = Vec::new();
        let mut haut = 0;
        let mut debut = lo;
        let fins = self
            .operateurs(lo, hi)
            .into_iter()
            .filter(|m| m.op == ",")
            .map(|m| (m.start, m.end()))
            .chain(std::iter::once((hi, hi)));
        for (fin, suite) in fins {
            let (a, h) = self.somme(debut, fin)?;
            args.push(a);
            haut = haut.max(h);
            debut = suite;
        }
        Ok((args, haut))
    }
}
