//! Propriétés (proptest) : arithmétique entière, rendu des valeurs, bruit.

use num_integer::Integer;
use proptest::prelude::*;

use super::eval::{compile, compile_with};
use super::liaison::{Binding, Bindings};
use super::nombre::Number;
use super::options::CompileOptions;
use super::CompileError;

fn deux(a: i64, b: i64) -> Bindings {
    let mut t = Bindings::new();
    t.insert("a".into(), Binding::new(a as f64, "a", ""));
    t.insert("b".into(), Binding::new(b as f64, "b", ""));
    t
}

fn operateur() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("+"), Just("-"), Just("*"), Just("//"), Just("%")]
}

fn attendu(op: &str, a: i64, b: i64) -> Option<i64> {
    match op {
        "+" => Some(a + b),
        "-" => Some(a - b),
        "*" => Some(a * b),
        "//" => (b != 0).then(|| Integer::div_floor(&a, &b)),
        _ => (b != 0).then(|| Integer::mod_floor(&a, &b)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn variables_liees_comme_des_entiers(a in -50i64..50, b in -50i64..50, op in operateur()) {
        let r = compile(&format!("a {op} b"), &deux(a, b));
        match attendu(op, a, b) {
            Some(v) => prop_assert_eq!(r.unwrap().numeric_result, v as f64),
            None => prop_assert!(matches!(r, Err(CompileError::ArithmeticFailure(_)))),
        }
    }

    #[test]
    fn litteraux_exacts(a in -50i64..50, b in -50i64..50, op in operateur()) {
        // (-7) // (2) : signes portés par des unaires
        let r = compile(&format!("({a}) {op} ({b})"), &Bindings::new());
        match attendu(op, a, b) {
            Some(v) => prop_assert_eq!(r.unwrap().value, Number::from_i64(v)),
            None => prop_assert!(matches!(r, Err(CompileError::ArithmeticFailure(_)))),
        }
    }

    #[test]
    fn precedence_usuelle(a in -20i64..20, b in -20i64..20, c in 1i64..20) {
        let t = {
            let mut t = deux(a, b);
            t.insert("c".into(), Binding::new(c as f64, "c", ""));
            t
        };
        let r = compile("a + b * c - a // c", &t).unwrap();
        prop_assert_eq!(r.numeric_result, (a + b * c - Integer::div_floor(&a, &c)) as f64);
    }

    #[test]
    fn valeurs_negatives_entre_parentheses(a in -1000i64..1000) {
        let r = compile("a + 1", &deux(a, 0)).unwrap();
        let attendu = if a < 0 {
            format!(r"\left({a}\right) + 1")
        } else {
            format!("{a} + 1")
        };
        prop_assert_eq!(r.tex_with_values, attendu);
        prop_assert_eq!(r.tex_with_symbols, "a + 1");
    }

    #[test]
    fn decimales_fixes(x in 0.0f64..1000.0, d in 0usize..6) {
        let o = CompileOptions { decimals: Some(d), ..CompileOptions::default() };
        let mut t = Bindings::new();
        t.insert("x".into(), Binding::new(x, "x", "m"));
        let r = compile_with("x", &t, &o).unwrap();
        prop_assert_eq!(r.tex_with_values, format!(r"\SI{{{x:.d$}}}{{m}}"));
    }

    #[test]
    fn bruit_sans_panique(s in "[a-c0-9+*/%(),. -]{0,24}") {
        let mut t = Bindings::new();
        t.insert("a".into(), Binding::new(2.0, "a", ""));
        // pas de panique ; un succès donne un résultat fini
        if let Ok(r) = compile(&s, &t) {
            prop_assert!(r.numeric_result.is_finite());
        }
    }
}
