// src/noyau/format.rs
//
// AST -> squelette LaTeX
// ----------------------
// Le rendu garde les placeholders (□ / ■) à la place des jetons, dans l’ordre
// gauche -> droite : le même squelette sert ensuite aux symboles ET aux valeurs.
//
// - a + b, a - b, a \cdot b, a \bmod b
// - \frac{a}{b}, \left\lfloor \frac{a}{b} \right\rfloor
// - a^{b}
// - f(x), \sqrt{x}, \left|x\right|
// - parenthèses -> \left( \right) en passe finale (tailles cohérentes à toute profondeur)

use super::expr::{BinOp, Expr, UnOp};
use super::fonctions::Notation;
use super::jetons::Token;
use super::options::CompileOptions;

/// Squelette LaTeX complet (passe finale des parenthèses incluse).
pub fn typeset_skeleton(expr: &Expr, tokens: &[Token], options: &CompileOptions) -> String {
    let mut out = String::new();
    render(expr, tokens, options, &mut out);
    size_delimiters(&out)
}

fn size_delimiters(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '(' => out.push_str(r"\left("),
            ')' => out.push_str(r"\right)"),
            _ => out.push(c),
        }
    }
    out
}

fn placeholder(i: usize, tokens: &[Token], out: &mut String) {
    // indice toujours valide : l’AST vient de ces jetons
    if let Some(t) = tokens.get(i) {
        out.push(t.kind.placeholder());
    }
}

fn render(e: &Expr, tokens: &[Token], o: &CompileOptions, out: &mut String) {
    match e {
        Expr::Operand(i) => placeholder(*i, tokens, out),

        Expr::Group(x) => {
            out.push('(');
            render(x, tokens, o, out);
            out.push(')');
        }

        Expr::Unary(op, x) => {
            out.push(match op {
                UnOp::Plus => '+',
                UnOp::Neg => '-',
            });
            render(x, tokens, o, out);
        }

        Expr::Binary(op, a, b) => match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Mod => {
                let sep = match op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => o.mul_symbol.as_str(),
                    _ => r"\bmod",
                };
                render(a, tokens, o, out);
                out.push(' ');
                out.push_str(sep);
                out.push(' ');
                render(b, tokens, o, out);
            }

            BinOp::Div => frac(a, b, tokens, o, out),

            BinOp::FloorDiv => {
                out.push_str(r"\left\lfloor ");
                frac(a, b, tokens, o, out);
                out.push_str(r" \right\rfloor");
            }

            BinOp::Pow => {
                render(a, tokens, o, out);
                out.push_str("^{");
                render(b.strip_group(), tokens, o, out);
                out.push('}');
            }
        },

        Expr::Call(f, args) => {
            let notation = tokens
                .get(*f)
                .map_or(Notation::Parenthesized, |t| t.kind.notation());
            placeholder(*f, tokens, out);

            let (ouvre, ferme) = match notation {
                Notation::Parenthesized => ("(", ")"),
                Notation::Radical => ("{", "}"),
                Notation::Bars => (r"\left|", r"\right|"),
            };
            out.push_str(ouvre);
            for (k, a) in args.iter().enumerate() {
                if k > 0 {
                    out.push_str(", ");
                }
                // f((x)) -> f(x)
                render(a.strip_group(), tokens, o, out);
            }
            out.push_str(ferme);
        }
    }
}

/// Les parenthèses du numérateur/dénominateur sont implicites dans \frac.
fn frac(a: &Expr, b: &Expr, tokens: &[Token], o: &CompileOptions, out: &mut String) {
    out.push_str(r"\frac{");
    render(a.strip_group(), tokens, o, out);
    out.push_str("}{");
    render(b.strip_group(), tokens, o, out);
    out.push('}');
}
