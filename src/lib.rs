//! formule_tex : compilateur de formules
//!
//! Une formule de calcul (`F/A_s`, `sqrt(a**2 + b**2)`, `sinD(30)*L`…) et une table
//! de variables liées donnent, en une passe :
//! - la valeur numérique
//! - le LaTeX avec les symboles
//! - le LaTeX avec les valeurs (et leurs unités)
//!
//! ```
//! use formule_tex::{compile, Binding, Bindings};
//!
//! let mut vars = Bindings::new();
//! vars.insert("a".into(), Binding::new(16.0, "a", ""));
//!
//! let r = compile("sqrt(a) + 1", &vars).unwrap();
//! assert_eq!(r.numeric_result, 5.0);
//! assert_eq!(r.tex_with_symbols, r"\sqrt{a} + 1");
//! assert_eq!(r.tex_with_values, r"\sqrt{16} + 1");
//! ```

pub mod noyau;

pub use noyau::{
    compile, compile_with, Binding, Bindings, CompileError, CompileOptions, CompileResult, Demarche,
    Number,
};
