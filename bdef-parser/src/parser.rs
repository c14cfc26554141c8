use std::collections::BTreeMap;
use std::path::Path;

use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::{BoardEntry, BoardMap, ParseError, Warning};

mod bdef_parser {
    #[derive(pest_derive::Parser)]
    #[grammar = "bdef.pest"]
    pub struct BdefParser;
}

use bdef_parser::Rule;

/// Constant expression as written in the header.
///
/// Definitions are kept as expressions and resolved lazily, so a definition
/// may reference symbols that only appear later (or in another file).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Number(u32),
    Symbol(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Or,
    Xor,
    And,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
}

/// One `#define` scanned from a header.  Include-guard style defines carry
/// no expression.
pub(crate) struct Define {
    name: String,
    expr: Option<Expr>,
}

fn syntax_error(file: &Path, pair: &Pair<'_, Rule>, message: &str) -> ParseError {
    let err = pest::error::Error::<Rule>::new_from_span(
        pest::error::ErrorVariant::CustomError {
            message: message.to_owned(),
        },
        pair.as_span(),
    );
    ParseError::Syntax(err.with_path(&file.to_string_lossy()).to_string())
}

fn parse_number(file: &Path, pair: &Pair<'_, Rule>) -> Result<u32, ParseError> {
    let (digits, radix) = match pair.as_rule() {
        Rule::dec_number => (pair.as_str(), 10),
        Rule::hex_number => (
            pair.as_str()
                .trim_start_matches("0x")
                .trim_start_matches("0X"),
            16,
        ),
        _ => unreachable!("called parse_number() on a non-number pair: {:?}", pair),
    };
    u32::from_str_radix(digits, radix)
        .map_err(|_| syntax_error(file, pair, "number does not fit into 32 bits"))
}

fn pratt_parser() -> PrattParser<Rule> {
    // Lowest to highest precedence, mirroring C.
    PrattParser::new()
        .op(Op::infix(Rule::bor, Assoc::Left))
        .op(Op::infix(Rule::bxor, Assoc::Left))
        .op(Op::infix(Rule::band, Assoc::Left))
        .op(Op::infix(Rule::shl, Assoc::Left) | Op::infix(Rule::shr, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))
        .op(Op::prefix(Rule::bnot) | Op::prefix(Rule::neg))
}

fn build_expr(
    file: &Path,
    pair: Pair<'_, Rule>,
    pratt: &PrattParser<Rule>,
) -> Result<Expr, ParseError> {
    pratt
        .map_primary(|p| match p.as_rule() {
            Rule::hex_number | Rule::dec_number => parse_number(file, &p).map(Expr::Number),
            Rule::identifier => Ok(Expr::Symbol(p.as_str().to_owned())),
            Rule::expr => build_expr(file, p, pratt),
            _ => unreachable!("unexpected primary pair: {:?}", p),
        })
        .map_prefix(|op, rhs| {
            let op = match op.as_rule() {
                Rule::bnot => UnaryOp::Not,
                Rule::neg => UnaryOp::Neg,
                _ => unreachable!(),
            };
            Ok(Expr::Unary(op, Box::new(rhs?)))
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::bor => BinOp::Or,
                Rule::bxor => BinOp::Xor,
                Rule::band => BinOp::And,
                Rule::shl => BinOp::Shl,
                Rule::shr => BinOp::Shr,
                Rule::add => BinOp::Add,
                Rule::sub => BinOp::Sub,
                Rule::mul => BinOp::Mul,
                Rule::div => BinOp::Div,
                _ => unreachable!(),
            };
            Ok(Expr::Binary(op, Box::new(lhs?), Box::new(rhs?)))
        })
        .parse(pair.into_inner())
}

/// Scan a header into its raw definitions without resolving anything.
pub(crate) fn scan(file: &Path, source: &str) -> Result<Vec<Define>, ParseError> {
    use pest::Parser;

    let header_pairs = match bdef_parser::BdefParser::parse(Rule::header, source) {
        Ok(mut res) => res.next().unwrap(),
        Err(e) => {
            return Err(ParseError::Syntax(
                e.with_path(&file.to_string_lossy()).to_string(),
            ))
        }
    };

    let pratt = pratt_parser();
    let mut defines = Vec::new();
    for statement in header_pairs.into_inner() {
        match statement.as_rule() {
            Rule::define => {
                let mut content = statement.into_inner();
                let name = content.next().unwrap().as_str().to_owned();
                let expr = match content.next() {
                    Some(pair) => Some(build_expr(file, pair, &pratt)?),
                    None => None,
                };
                log::debug!("scanned definition {}", name);
                defines.push(Define { name, expr });
            }
            _ => (),
        }
    }
    Ok(defines)
}

enum EvalError {
    Undefined(String),
    Recursive,
    DivisionByZero,
}

impl EvalError {
    fn into_warning(self, name: &str) -> Warning {
        match self {
            EvalError::Undefined(symbol) => Warning::UndefinedSymbol {
                name: name.to_owned(),
                symbol,
            },
            EvalError::Recursive => Warning::RecursiveDefinition {
                name: name.to_owned(),
            },
            EvalError::DivisionByZero => Warning::DivisionByZero {
                name: name.to_owned(),
            },
        }
    }
}

/// Evaluate a constant expression.
///
/// Arithmetic wraps like unsigned 32-bit C arithmetic; shift counts are
/// taken modulo 32.
fn eval(
    expr: &Expr,
    env: &BTreeMap<String, Option<Expr>>,
    cache: &mut BTreeMap<String, u32>,
    visiting: &mut Vec<String>,
) -> Result<u32, EvalError> {
    match expr {
        Expr::Number(v) => Ok(*v),
        Expr::Symbol(symbol) => {
            if let Some(v) = cache.get(symbol) {
                return Ok(*v);
            }
            if visiting.iter().any(|n| n == symbol) {
                return Err(EvalError::Recursive);
            }
            let target = match env.get(symbol) {
                Some(Some(e)) => e,
                _ => return Err(EvalError::Undefined(symbol.clone())),
            };
            visiting.push(symbol.clone());
            let res = eval(target, env, cache, visiting);
            visiting.pop();
            let value = res?;
            cache.insert(symbol.clone(), value);
            Ok(value)
        }
        Expr::Unary(op, inner) => {
            let v = eval(inner, env, cache, visiting)?;
            Ok(match op {
                UnaryOp::Neg => v.wrapping_neg(),
                UnaryOp::Not => !v,
            })
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, env, cache, visiting)?;
            let r = eval(rhs, env, cache, visiting)?;
            match op {
                BinOp::Or => Ok(l | r),
                BinOp::Xor => Ok(l ^ r),
                BinOp::And => Ok(l & r),
                BinOp::Shl => Ok(l.wrapping_shl(r)),
                BinOp::Shr => Ok(l.wrapping_shr(r)),
                BinOp::Add => Ok(l.wrapping_add(r)),
                BinOp::Sub => Ok(l.wrapping_sub(r)),
                BinOp::Mul => Ok(l.wrapping_mul(r)),
                BinOp::Div => {
                    if r == 0 {
                        Err(EvalError::DivisionByZero)
                    } else {
                        Ok(l / r)
                    }
                }
            }
        }
    }
}

/// Board addresses are the `MA<n>_...` definitions, e.g. `MA0_MOTOR_00`.
fn is_board_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("MA") else {
        return false;
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    digits > 0 && rest[digits..].starts_with('_')
}

/// Resolve scanned definitions into a [`BoardMap`].
pub(crate) fn evaluate(defines: Vec<Define>) -> (BoardMap, Vec<Warning>) {
    let mut warnings = Vec::new();

    let mut env: BTreeMap<String, Option<Expr>> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();
    for def in defines {
        if env.contains_key(&def.name) {
            warnings.push(Warning::Redefinition {
                name: def.name.clone(),
            });
        } else {
            order.push(def.name.clone());
        }
        // The later definition wins, like in the preprocessor.
        env.insert(def.name, def.expr);
    }

    let mut map = BoardMap::default();
    let mut cache: BTreeMap<String, u32> = BTreeMap::new();
    let mut addresses: BTreeMap<u32, String> = BTreeMap::new();

    for name in order.iter() {
        let Some(expr) = &env[name] else {
            // Include-guard style define without a value.
            continue;
        };

        let mut visiting = vec![name.clone()];
        match eval(expr, &env, &mut cache, &mut visiting) {
            Ok(value) => {
                cache.insert(name.clone(), value);
                map.definitions.insert(name.clone(), value);

                if is_board_name(name) {
                    if let Some(existing) = addresses.get(&value) {
                        warnings.push(Warning::DuplicateAddress {
                            name: name.clone(),
                            existing: existing.clone(),
                            address: value,
                        });
                    } else {
                        addresses.insert(value, name.clone());
                    }
                    map.boards.push(BoardEntry {
                        name: name.clone(),
                        address: value,
                    });
                }
            }
            Err(e) => warnings.push(e.into_warning(name)),
        }
    }

    (map, warnings)
}

/// Parse a board definition header.
///
/// Warnings are forwarded to the `log` facade.
pub fn parse(file: &Path, source: &str) -> Result<BoardMap, ParseError> {
    let (res, warnings) = parse_with_warnings(file, source);
    for warning in warnings {
        log::warn!("{}: {}", file.display(), warning);
    }
    res
}

/// Parse a board definition header, returning warnings alongside the result.
pub fn parse_with_warnings(file: &Path, source: &str) -> (Result<BoardMap, ParseError>, Vec<Warning>) {
    match scan(file, source) {
        Ok(defines) => {
            let (map, warnings) = evaluate(defines);
            (Ok(map), warnings)
        }
        Err(e) => (Err(e), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_value(source: &str) -> u32 {
        let path = std::path::PathBuf::from(format!("{}", file!()));
        let map = parse(&path, source).unwrap();
        map.definitions["VALUE"]
    }

    #[test]
    fn literals() {
        assert_eq!(eval_value("#define VALUE 42"), 42);
        assert_eq!(eval_value("#define VALUE 0x2A"), 42);
        assert_eq!(eval_value("#define VALUE 0X2a"), 42);
        assert_eq!(eval_value("#define VALUE 0xFFFFFFFF"), u32::MAX);
    }

    #[test]
    fn c_precedence() {
        // Shifts bind tighter than bitwise or.
        assert_eq!(eval_value("#define VALUE 0x7F | 0x01 << 8"), 0x017F);
        assert_eq!(eval_value("#define VALUE 2 + 3 * 4"), 14);
        assert_eq!(eval_value("#define VALUE (2 + 3) * 4"), 20);
        assert_eq!(eval_value("#define VALUE 1 << 31 >> 31"), 1);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(eval_value("#define VALUE ~0"), 0xFFFF_FFFF);
        assert_eq!(eval_value("#define VALUE -1"), 0xFFFF_FFFF);
        assert_eq!(eval_value("#define VALUE ~(1 | 2)"), !3u32);
    }

    #[test]
    fn wrapping_arithmetic() {
        assert_eq!(eval_value("#define VALUE 0xFFFFFFFF + 1"), 0);
        assert_eq!(eval_value("#define VALUE 0 - 1"), u32::MAX);
        assert_eq!(eval_value("#define VALUE 0x10000 * 0x10000"), 0);
    }

    #[test]
    fn symbol_resolution_is_order_independent() {
        let source = r#"
#define VALUE (BASE << 4)
#define BASE 0x3
"#;
        let path = std::path::PathBuf::from(format!("{}", file!()));
        let map = parse(&path, source).unwrap();
        assert_eq!(map.definitions["VALUE"], 0x30);
        assert_eq!(map.definitions["BASE"], 0x3);
    }

    #[test]
    fn board_address_derivation() {
        let _ = env_logger::try_init();
        let source = r#"
#define ECAT_MASTER0 0x0
#define BDTYPE_ECAT_MOT 0x03
#define NID_MOTOR_00 (0x10 | BDTYPE_ECAT_MOT << 8)
#define MA0_MOTOR_00 ((ECAT_MASTER0 << 30) | (NID_MOTOR_00 * 0x10000))
"#;
        let path = std::path::PathBuf::from(format!("{}", file!()));
        let map = parse(&path, source).unwrap();
        assert_eq!(map.definitions["NID_MOTOR_00"], 0x0310);
        assert_eq!(map.boards.len(), 1);
        assert_eq!(map.boards[0].name, "MA0_MOTOR_00");
        assert_eq!(map.boards[0].address, 0x0310_0000);
        assert_eq!(map.board_name(0x0310_0000), Some("MA0_MOTOR_00"));
    }

    #[test]
    fn board_name_convention() {
        assert!(is_board_name("MA0_SAFETY"));
        assert!(is_board_name("MA12_MOTOR_00"));
        assert!(is_board_name("MA0_BROADCAST"));
        assert!(!is_board_name("MASTER0"));
        assert!(!is_board_name("MA_SAFETY"));
        assert!(!is_board_name("MA0"));
        assert!(!is_board_name("NID_MOTOR_00"));
    }

    #[test]
    fn comments_and_directives_are_skipped() {
        let source = r#"
/* Board definitions */
#ifndef SOME_GUARD_H
#define SOME_GUARD_H

#define VALUE 7 /* trailing */ // and more
#include "other.h"

#endif /* SOME_GUARD_H */
"#;
        let path = std::path::PathBuf::from(format!("{}", file!()));
        let map = parse(&path, source).unwrap();
        assert_eq!(map.definitions["VALUE"], 7);
        // The guard define carries no value and is not part of the map.
        assert!(!map.definitions.contains_key("SOME_GUARD_H"));
    }
}
