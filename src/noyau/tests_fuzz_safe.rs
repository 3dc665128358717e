//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - référence calculée à part (entiers, sémantique floor / modulo du diviseur)
//! - seules erreurs admises : division / modulo par zéro

use std::time::{Duration, Instant};

use num_integer::Integer;

use super::eval::compile;
use super::liaison::{Binding, Bindings};
use super::nombre::Number;
use super::CompileError;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Arbre généré + référence ------------------------ */

#[derive(Clone, Copy, Debug)]
enum Op {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
}

impl Op {
    fn symbole(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::FloorDiv => "//",
            Op::Mod => "%",
        }
    }

    fn niveau(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            _ => 2,
        }
    }
}

#[derive(Debug)]
enum Arbre {
    Feuille(i64),
    /// variable liée (valeur entière, donc flottant exact)
    Var(&'static str, i64),
    Bin(Op, Box<Arbre>, Box<Arbre>),
}

const VARIABLES: &[(&str, i64)] = &[("x", 3), ("y", -4), ("n_0", 0)];

fn table() -> Bindings {
    VARIABLES
        .iter()
        .map(|(n, v)| (n.to_string(), Binding::new(*v as f64, *n, "")))
        .collect()
}

fn gen_arbre(rng: &mut Rng, depth: usize) -> Arbre {
    if depth == 0 || rng.pick(4) == 0 {
        return if rng.coin() {
            Arbre::Feuille(i64::from(rng.pick(10)))
        } else {
            let (n, v) = VARIABLES[rng.pick(VARIABLES.len() as u32) as usize];
            Arbre::Var(n, v)
        };
    }
    let op = match rng.pick(5) {
        0 => Op::Add,
        1 => Op::Sub,
        2 => Op::Mul,
        3 => Op::FloorDiv,
        _ => Op::Mod,
    };
    Arbre::Bin(
        op,
        Box::new(gen_arbre(rng, depth - 1)),
        Box::new(gen_arbre(rng, depth - 1)),
    )
}

/// Référence : None si division / modulo par zéro.
fn reference(a: &Arbre) -> Option<i64> {
    match a {
        Arbre::Feuille(n) | Arbre::Var(_, n) => Some(*n),
        Arbre::Bin(op, l, r) => {
            let (x, y) = (reference(l)?, reference(r)?);
            match op {
                Op::Add => Some(x + y),
                Op::Sub => Some(x - y),
                Op::Mul => Some(x * y),
                Op::FloorDiv => (y != 0).then(|| Integer::div_floor(&x, &y)),
                Op::Mod => (y != 0).then(|| Integer::mod_floor(&x, &y)),
            }
        }
    }
}

/// Variables remplacées par des littéraux (valeur absolue : pas de signe collé).
fn sans_variables(a: Arbre) -> Arbre {
    match a {
        Arbre::Var(_, v) => Arbre::Feuille(v.abs()),
        Arbre::Bin(op, l, r) => Arbre::Bin(
            op,
            Box::new(sans_variables(*l)),
            Box::new(sans_variables(*r)),
        ),
        feuille => feuille,
    }
}

fn niveau(a: &Arbre) -> u8 {
    match a {
        Arbre::Bin(op, _, _) => op.niveau(),
        _ => u8::MAX,
    }
}

/// Tout parenthésé.
fn ecrit_complet(a: &Arbre) -> String {
    match a {
        Arbre::Feuille(n) => n.to_string(),
        Arbre::Var(v, _) => v.to_string(),
        Arbre::Bin(op, l, r) => format!("({} {} {})", ecrit_complet(l), op.symbole(), ecrit_complet(r)),
    }
}

/// Parenthèses minimales (gauche associatif).
fn ecrit_minimal(a: &Arbre) -> String {
    match a {
        Arbre::Bin(op, l, r) => {
            let mut g = ecrit_minimal(l);
            if niveau(l) < op.niveau() {
                g = format!("({g})");
            }
            let mut d = ecrit_minimal(r);
            if niveau(r) <= op.niveau() {
                d = format!("({d})");
            }
            format!("{g}{}{d}", op.symbole())
        }
        _ => ecrit_complet(a),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_reference_entiere() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let vars = table();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let arbre = gen_arbre(&mut rng, 4);
        let attendu = reference(&arbre);

        for expr in [ecrit_complet(&arbre), ecrit_minimal(&arbre)] {
            match (compile(&expr, &vars), attendu) {
                (Ok(r), Some(v)) => {
                    assert_eq!(r.numeric_result, v as f64, "expr={expr:?}");
                    seen_ok += 1;
                }
                (Err(CompileError::ArithmeticFailure(_)), None) => seen_err += 1,
                (autre, _) => panic!("expr={expr:?} attendu={attendu:?} reçu={autre:?}"),
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 50, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_litteraux_restent_exacts() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..120 {
        budget(t0, max);

        // sans variable : uniquement des littéraux
        let arbre = sans_variables(gen_arbre(&mut rng, 3));
        let expr = ecrit_minimal(&arbre);

        if let (Ok(r), Some(v)) = (compile(&expr, &Bindings::new()), reference(&arbre)) {
            assert_eq!(r.value, Number::from_i64(v), "expr={expr:?}");
        }
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let mut rng = Rng::new(42);
    let vars = table();

    for _ in 0..60 {
        let expr = ecrit_minimal(&gen_arbre(&mut rng, 3));
        assert_eq!(compile(&expr, &vars), compile(&expr, &vars), "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    const ALPHABET: &[char] = &['a', 'x', '1', '2', '.', '+', '-', '*', '/', '%', '(', ')', ',', ' '];

    let mut rng = Rng::new(0x5EED);
    let vars = table();

    for _ in 0..500 {
        budget(t0, max);

        let n = rng.pick(16) as usize;
        let s: String = (0..n)
            .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
            .collect();

        // seul compte : pas de panique, erreur typée sinon
        if let Ok(r) = compile(&s, &vars) {
            assert!(r.numeric_result.is_finite(), "s={s:?}");
        }
    }
}
