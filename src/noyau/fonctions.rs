// src/noyau/fonctions.rs
//
// Tables fixes (lecture seule) : constantes, fonctions transcendantes,
// variantes trig en degrés/grades, agrégats.
// Chaque entrée donne le terme évaluable + la forme LaTeX du symbole.

use super::erreur::CompileError;
use super::nombre::Number;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Exp,
    Log,
    Log10,
    Min,
    Max,
    Abs,
}

/// Unité d’angle des variantes trig (`sinD`, `arctanG`…).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleUnit {
    Radian,
    Degree,
    Gradian,
}

/// Terme évaluable associé à un jeton.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Number(Number),
    Function(Function, AngleUnit),
}

/// Notation du rendu d’un appel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    /// `f(x)`
    Parenthesized,
    /// `\sqrt{x}`
    Radical,
    /// `\left|x\right|`
    Bars,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

/// Constantes + fonctions de l’espace numérique (nom, LaTeX).
const TRANSCENDANTES: &[(&str, &str)] = &[
    ("e", "e"),
    ("pi", r"\pi"),
    ("sin", r"\sin"),
    ("cos", r"\cos"),
    ("tan", r"\tan"),
    ("arcsin", r"\arcsin"),
    ("arccos", r"\arccos"),
    ("arctan", r"\arctan"),
    ("sinh", r"\sinh"),
    ("cosh", r"\cosh"),
    ("tanh", r"\tanh"),
    ("sqrt", r"\sqrt"),
    ("exp", r"\exp"),
    ("log", r"\ln"),
    ("log10", r"\log_{10}"),
];

const AGREGATS: &[(&str, &str)] = &[("min", r"\min"), ("max", r"\max"), ("abs", "")];

/// Fonctions qui admettent une variante `D` (degrés) / `G` (grades).
const TRIG: &[&str] = &["sin", "cos", "tan", "arcsin", "arccos", "arctan"];

fn function_of(name: &str) -> Option<Function> {
    use Function::*;
    let f = match name {
        "sin" => Sin,
        "cos" => Cos,
        "tan" => Tan,
        "arcsin" => Arcsin,
        "arccos" => Arccos,
        "arctan" => Arctan,
        "sinh" => Sinh,
        "cosh" => Cosh,
        "tanh" => Tanh,
        "sqrt" => Sqrt,
        "exp" => Exp,
        "log" => Log,
        "log10" => Log10,
        "min" => Min,
        "max" => Max,
        "abs" => Abs,
        _ => return None,
    };
    Some(f)
}

/// Constante ou fonction transcendante : (terme, symbole LaTeX).
pub fn lookup_transcendental(name: &str) -> Option<(Term, &'static str)> {
    let &(_, tex) = TRANSCENDANTES.iter().find(|(n, _)| *n == name)?;
    let term = match name {
        "e" => Term::Number(Number::Real(std::f64::consts::E)),
        "pi" => Term::Number(Number::Real(std::f64::consts::PI)),
        _ => Term::Function(function_of(name)?, AngleUnit::Radian),
    };
    Some((term, tex))
}

/// Variante trig : `sinD`, `arccosG`… Le suffixe est retiré avant la recherche LaTeX.
pub fn lookup_trig_variant(name: &str) -> Option<(Term, &'static str)> {
    let unit = match name.chars().last()? {
        'D' => AngleUnit::Degree,
        'G' => AngleUnit::Gradian,
        _ => return None,
    };
    let base = &name[..name.len() - 1];
    if !TRIG.contains(&base) {
        return None;
    }
    let &(_, tex) = TRANSCENDANTES.iter().find(|(n, _)| *n == base)?;
    Some((Term::Function(function_of(base)?, unit), tex))
}

/// min / max / abs. `abs` a un symbole vide : ses barres viennent de la notation.
pub fn lookup_aggregate(name: &str) -> Option<(Term, &'static str)> {
    let &(_, tex) = AGREGATS.iter().find(|(n, _)| *n == name)?;
    Some((Term::Function(function_of(name)?, AngleUnit::Radian), tex))
}

/// Liste blanche des jetons “spéciaux” (placeholder distinct).
pub fn notation_of(name: &str) -> Notation {
    match name {
        "sqrt" => Notation::Radical,
        "abs" => Notation::Bars,
        _ => Notation::Parenthesized,
    }
}

impl Function {
    pub fn name(self) -> &'static str {
        use Function::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Arcsin => "arcsin",
            Arccos => "arccos",
            Arctan => "arctan",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Sqrt => "sqrt",
            Exp => "exp",
            Log => "log",
            Log10 => "log10",
            Min => "min",
            Max => "max",
            Abs => "abs",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Function::Min | Function::Max => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    pub fn accepts(self, n: usize) -> bool {
        match self.arity() {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }

    /// min / max / abs : restent exacts si les arguments le sont.
    fn aggregate(self, args: &[Number]) -> Result<Number, CompileError> {
        let mut it = args.iter();
        let premier = it
            .next()
            .ok_or_else(|| CompileError::arithmetic(format!("{} : aucun argument", self.name())))?;

        if self == Function::Abs {
            return Ok(premier.clone().abs());
        }

        let mut best = premier;
        for a in it {
            let mieux = if self == Function::Min {
                a.less_than(best)
            } else {
                best.less_than(a)
            };
            if mieux {
                best = a;
            }
        }
        Ok(best.clone())
    }

    /// Applique la fonction (arité déjà vérifiée par l’appelant).
    pub fn apply(self, unit: AngleUnit, args: &[Number]) -> Result<Number, CompileError> {
        use Function::*;

        let x = args
            .first()
            .map(Number::to_f64)
            .ok_or_else(|| CompileError::arithmetic(format!("{} : aucun argument", self.name())))?;

        // facteur “unité -> radian”
        let k = match unit {
            AngleUnit::Radian => 1.0,
            AngleUnit::Degree => std::f64::consts::PI / 180.0,
            AngleUnit::Gradian => std::f64::consts::PI / 200.0,
        };

        let y = match self {
            Sin => (x * k).sin(),
            Cos => (x * k).cos(),
            Tan => (x * k).tan(),
            Arcsin => x.asin() / k,
            Arccos => x.acos() / k,
            Arctan => x.atan() / k,
            Sinh => x.sinh(),
            Cosh => x.cosh(),
            Tanh => x.tanh(),
            Sqrt => x.sqrt(),
            Exp => x.exp(),
            Log => x.ln(),
            Log10 => x.log10(),
            Min | Max | Abs => return self.aggregate(args),
        };

        if y.is_finite() {
            Ok(Number::Real(y))
        } else {
            Err(CompileError::arithmetic(format!(
                "{}({x}) : hors du domaine",
                self.name()
            )))
        }
    }
}
