// src/noyau/expr.rs
//
// AST de la formule.
// Les feuilles ne portent pas de texte : seulement l’indice du jeton.
// C’est la liaison (liaison.rs) qui décide si le jeton est un nombre, une constante,
// une fonction ou une variable. Le même arbre sert aux deux rendus et à l’évaluation.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Jeton n° i (nombre, variable, constante).
    Operand(usize),

    /// Parenthèses écrites par l’utilisateur (gardées pour le rendu).
    Group(Box<Expr>),

    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),

    /// Jeton n° i appliqué à ses arguments : `f(a, b)`.
    Call(usize, Vec<Expr>),
}

impl BinOp {
    pub fn from_symbol(s: &str) -> Option<BinOp> {
        let op = match s {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "//" => BinOp::FloorDiv,
            "%" => BinOp::Mod,
            "**" => BinOp::Pow,
            _ => return None,
        };
        Some(op)
    }
}

impl Expr {
    /// Retire UN niveau de parenthèses (numérateur, exposant, radicande…).
    pub fn strip_group(&self) -> &Expr {
        match self {
            Expr::Group(inner) => inner,
            _ => self,
        }
    }

    /// Indices des jetons dans l’ordre de lecture gauche -> droite.
    pub fn operand_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands(&self, out: &mut Vec<usize>) {
        match self {
            Expr::Operand(i) => out.push(*i),
            Expr::Group(x) | Expr::Unary(_, x) => x.collect_operands(out),
            Expr::Binary(_, a, b) => {
                a.collect_operands(out);
                b.collect_operands(out);
            }
            Expr::Call(f, args) => {
                out.push(*f);
                for a in args {
                    a.collect_operands(out);
                }
            }
        }
    }
}
