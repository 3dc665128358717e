// src/noyau/nombre.rs
//
// Valeurs numériques du compilateur.
// - Exact : rationnel exact (littéraux de la formule, calculs entre littéraux)
// - Real  : flottant (valeurs liées, constantes, fonctions transcendantes)
//
// Sémantique alignée sur l’arithmétique “calculatrice scientifique” habituelle :
// - a // b arrondit vers -∞
// - a % b a le signe du diviseur
// - exact (op) réel => réel

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;

use super::erreur::CompileError;

/// Au-delà, une puissance entière exacte passe en flottant (anti-explosion mémoire).
const MAX_EXPOSANT_EXACT: i64 = 4096;

/// Taille maximale (en bits) estimée d’une puissance exacte ; au-delà, calcul flottant.
const MAX_BITS_EXACT: u64 = 1 << 16;

/// Chiffres affichés pour un rationnel non entier.
const DIGITS_AFFICHAGE: usize = 12;

#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Exact(BigRational),
    Real(f64),
}

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal tronqué.
fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let (int_part, frac_part) = scaled.div_rem(&scale);

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }
    // zéros de queue inutiles
    let frac = frac.trim_end_matches('0');

    let signe = if neg { "-" } else { "" };
    if frac.is_empty() {
        format!("{signe}{int_part}")
    } else {
        format!("{signe}{int_part}.{frac}")
    }
}

/// r -> texte décimal tronqué à `digits` chiffres.
pub fn exact_to_decimal(r: &BigRational, digits: usize) -> String {
    let scale = pow10(digits);
    scaled_to_decimal((r.numer() * scale) / r.denom(), digits)
}

/* ------------------------ Lecture d’un littéral ------------------------ */

/// Littéral numérique : `12`, `1.5`, `.5`, `3.`, `1e-3`, `2.5E+4`.
/// Retour exact (rationnel), None si ce n’est pas un nombre.
pub fn parse_literal(s: &str) -> Option<Number> {
    let (mantisse, exposant) = match s.find(['e', 'E']) {
        Some(k) => (&s[..k], Some(&s[k + 1..])),
        None => (s, None),
    };

    let (ent, frac) = match mantisse.find('.') {
        Some(k) => (&mantisse[..k], &mantisse[k + 1..]),
        None => (mantisse, ""),
    };
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    if !ent.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let mut r = BigRational::new(n, pow10(frac.len()));

    if let Some(e) = exposant {
        let (neg, corps) = match e.as_bytes().first() {
            Some(b'-') => (true, &e[1..]),
            Some(b'+') => (false, &e[1..]),
            _ => (false, e),
        };
        if corps.is_empty() || !corps.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let k: usize = corps.parse().ok()?;
        if k > 4 * MAX_EXPOSANT_EXACT as usize {
            return None;
        }
        let p = BigRational::from_integer(pow10(k));
        r = if neg { r / p } else { r * p };
    }

    Some(Number::Exact(r))
}

/* ------------------------ Outil interne (puissance entière) ------------------------ */

fn rational_pow_int(base: BigRational, exp: i64) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    if exp < 0 {
        let pos = rational_pow_int(base, -exp);
        return BigRational::one() / pos;
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if e.is_odd() {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

fn rational_to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or_else(|| {
        let n = r.numer().to_f64().unwrap_or(f64::NAN);
        let d = r.denom().to_f64().unwrap_or(f64::NAN);
        n / d
    })
}

/// Reste “signe du diviseur” en flottant.
fn real_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        r + b
    } else {
        r
    }
}

fn real_checked(x: f64, quoi: &str) -> Result<Number, CompileError> {
    if x.is_finite() {
        Ok(Number::Real(x))
    } else {
        Err(CompileError::arithmetic(format!(
            "{quoi} : résultat non fini (domaine ou dépassement)"
        )))
    }
}

/* ------------------------ Arithmétique ------------------------ */

impl Number {
    pub fn from_i64(n: i64) -> Self {
        Number::Exact(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(r) => rational_to_f64(r),
            Number::Real(x) => *x,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_zero(),
            Number::Real(x) => *x == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_negative(),
            Number::Real(x) => *x < 0.0,
        }
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(-r),
            Number::Real(x) => Number::Real(-x),
        }
    }

    pub fn abs(self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(r.abs()),
            Number::Real(x) => Number::Real(x.abs()),
        }
    }

    pub fn add(&self, other: &Number) -> Result<Number, CompileError> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a + b)),
            _ => real_checked(self.to_f64() + other.to_f64(), "addition"),
        }
    }

    pub fn sub(&self, other: &Number) -> Result<Number, CompileError> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a - b)),
            _ => real_checked(self.to_f64() - other.to_f64(), "soustraction"),
        }
    }

    pub fn mul(&self, other: &Number) -> Result<Number, CompileError> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a * b)),
            _ => real_checked(self.to_f64() * other.to_f64(), "multiplication"),
        }
    }

    pub fn div(&self, other: &Number) -> Result<Number, CompileError> {
        if other.is_zero() {
            return Err(CompileError::arithmetic("division par zéro"));
        }
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a / b)),
            _ => real_checked(self.to_f64() / other.to_f64(), "division"),
        }
    }

    /// Division entière : floor(a / b).
    pub fn floor_div(&self, other: &Number) -> Result<Number, CompileError> {
        if other.is_zero() {
            return Err(CompileError::arithmetic("division entière par zéro"));
        }
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact((a / b).floor())),
            _ => {
                let (a, b) = (self.to_f64(), other.to_f64());
                real_checked(((a - real_mod(a, b)) / b).round(), "division entière")
            }
        }
    }

    /// Modulo, signe du diviseur : a - b * floor(a / b).
    pub fn modulo(&self, other: &Number) -> Result<Number, CompileError> {
        if other.is_zero() {
            return Err(CompileError::arithmetic("modulo par zéro"));
        }
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a - b * (a / b).floor())),
            _ => real_checked(real_mod(self.to_f64(), other.to_f64()), "modulo"),
        }
    }

    pub fn pow(&self, other: &Number) -> Result<Number, CompileError> {
        if let (Number::Exact(base), Number::Exact(e)) = (self, other) {
            if e.is_integer() {
                if let Some(n) = e.to_integer().to_i64() {
                    let bits = base
                        .numer()
                        .bits()
                        .max(base.denom().bits())
                        .saturating_mul(n.unsigned_abs());
                    if n.unsigned_abs() <= MAX_EXPOSANT_EXACT as u64 && bits <= MAX_BITS_EXACT {
                        if base.is_zero() && n < 0 {
                            return Err(CompileError::arithmetic(
                                "zéro élevé à une puissance négative",
                            ));
                        }
                        return Ok(Number::Exact(rational_pow_int(base.clone(), n)));
                    }
                }
            }
        }

        let (a, b) = (self.to_f64(), other.to_f64());
        if a == 0.0 && b < 0.0 {
            return Err(CompileError::arithmetic("zéro élevé à une puissance négative"));
        }
        if a < 0.0 && b.fract() != 0.0 {
            return Err(CompileError::arithmetic(
                "base négative et exposant fractionnaire (résultat complexe)",
            ));
        }
        real_checked(a.powf(b), "puissance")
    }

    /// Comparaison pour min/max (exacte si les deux le sont).
    pub fn less_than(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a < b,
            _ => self.to_f64() < other.to_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Number::Exact(r) => write!(f, "{}", exact_to_decimal(r, DIGITS_AFFICHAGE)),
            Number::Real(x) => write!(f, "{x}"),
        }
    }
}

/// Écriture d’un flottant pour le rendu “valeurs”.
pub fn format_real(x: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(d) => format!("{x:.d$}"),
        None => format!("{x}"),
    }
}
