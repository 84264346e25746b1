//! Constant-expression folding, used for extern vector bounds and case
//! values. Supports numeric literals, unary `-`/`!`, the
//! arithmetic/comparison/bitwise/short-circuit binary set, and comma.

use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldError {
    NotConstant,
    DivisionByZero,
}

pub fn fold(expr: &Expr) -> Result<i64, FoldError> {
    match expr.kind {
        ExprKind::Number(n) => Ok(n),
        ExprKind::CharConst(n) => Ok(n),
        ExprKind::Unary(UnaryOp::Neg, operand) => fold(operand).map(|v| v.wrapping_neg()),
        ExprKind::Unary(UnaryOp::Not, operand) => fold(operand).map(|v| (v == 0) as i64),
        ExprKind::Unary(_, _) => Err(FoldError::NotConstant),
        ExprKind::Binary(op, lhs, rhs) => fold_binary(op, fold(lhs)?, fold(rhs)?),
        ExprKind::Comma(lhs, rhs) => {
            fold(lhs)?;
            fold(rhs)
        }
        _ => Err(FoldError::NotConstant),
    }
}

fn fold_binary(op: BinOp, a: i64, b: i64) -> Result<i64, FoldError> {
    Ok(match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
        BinOp::Shl => a.wrapping_shl(b as u32),
        BinOp::Shr => ((a as u64).wrapping_shr(b as u32)) as i64,
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::Lt => (a < b) as i64,
        BinOp::Le => (a <= b) as i64,
        BinOp::Gt => (a > b) as i64,
        BinOp::Ge => (a >= b) as i64,
        BinOp::Eq => (a == b) as i64,
        BinOp::Ne => (a != b) as i64,
        BinOp::OrOr => ((a != 0) || (b != 0)) as i64,
    })
}

/// Folds a vector bound: the result must additionally be non-negative.
pub fn fold_nonneg_bound(expr: &Expr) -> Result<i64, FoldError> {
    let v = fold(expr)?;
    if v < 0 {
        return Err(FoldError::NotConstant);
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::{FileId, Idx, Span};

    fn num(n: i64) -> Expr<'static> {
        Expr {
            kind: ExprKind::Number(n),
            span: Span::point(FileId::from_usize(0), 0, 1, 1),
        }
    }

    #[test]
    fn folds_arithmetic() {
        let a = num(3);
        let b = num(4);
        let e = Expr {
            kind: ExprKind::Binary(BinOp::Add, &a, &b),
            span: a.span,
        };
        assert_eq!(fold(&e), Ok(7));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let a = num(1);
        let b = num(0);
        let e = Expr {
            kind: ExprKind::Binary(BinOp::Div, &a, &b),
            span: a.span,
        };
        assert_eq!(fold(&e), Err(FoldError::DivisionByZero));
    }

    #[test]
    fn negative_bound_is_rejected() {
        let a = num(5);
        let e = Expr {
            kind: ExprKind::Unary(UnaryOp::Neg, &a),
            span: a.span,
        };
        assert_eq!(fold_nonneg_bound(&e), Err(FoldError::NotConstant));
    }
}
