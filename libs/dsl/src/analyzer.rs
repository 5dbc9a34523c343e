//! Unit analyzer - assigns units to every expression node
//!
//! Walks the tree bottom-up, depth-first and left-to-right, consulting the
//! series registry and the units algebra. Analysis is fail-fast: the first
//! semantic error in traversal order wins, and is surfaced as the full
//! pretty-printed tree with an annotation under the offending node.

use crate::ast::{BinaryOp, ExprNode};
use crate::error::{Error, Result, SemanticKind};
use crate::printer;
use crate::registry::SeriesRegistry;
use nimbus_units::{rational_from_decimal, Units};
use rust_decimal::prelude::ToPrimitive;

/// Month keyword table: case-insensitive abbreviations and full names.
static MONTHS: phf::Map<&'static str, u8> = phf::phf_map! {
    "jan" => 1, "january" => 1,
    "feb" => 2, "february" => 2,
    "mar" => 3, "march" => 3,
    "apr" => 4, "april" => 4,
    "may" => 5,
    "jun" => 6, "june" => 6,
    "jul" => 7, "july" => 7,
    "aug" => 8, "august" => 8,
    "sep" => 9, "september" => 9,
    "oct" => 10, "october" => 10,
    "nov" => 11, "november" => 11,
    "dec" => 12, "december" => 12,
};

pub fn month_number(name: &str) -> Option<u8> {
    MONTHS.get(name.to_ascii_lowercase().as_str()).copied()
}

const YEAR_RANGE_MESSAGE: &str = "Year should be in range 1900 to 2500";

/// A semantic failure pinned to one node of the tree under analysis.
struct Semantic<'a> {
    node: &'a ExprNode,
    kind: SemanticKind,
    message: String,
}

impl<'a> Semantic<'a> {
    fn new(node: &'a ExprNode, kind: SemanticKind, message: impl Into<String>) -> Self {
        Self {
            node,
            kind,
            message: message.into(),
        }
    }
}

type Analysis<'a, T> = std::result::Result<T, Semantic<'a>>;

pub struct Analyzer<'r> {
    registry: &'r dyn SeriesRegistry,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r dyn SeriesRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the units of a whole expression, or render the diagnostic.
    pub fn analyze(&self, expr: &ExprNode) -> Result<Units> {
        self.units_of(expr).map_err(|semantic| Error::Semantic {
            kind: semantic.kind,
            rendered: printer::render_annotated(expr, semantic.node, &semantic.message),
        })
    }

    fn units_of<'a>(&self, node: &'a ExprNode) -> Analysis<'a, Units> {
        match node {
            ExprNode::Number { units, .. } => {
                Ok(units.clone().unwrap_or_else(Units::dimensionless))
            }
            ExprNode::StringLit { value, .. } => Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                format!("\"{value}\" is only meaningful as a series name argument"),
            )),
            ExprNode::Identifier { name, .. } => Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                format!("{name} is only meaningful inside Months(...)"),
            )),
            ExprNode::Binary {
                op, left, right, ..
            } => self.binary_units(node, *op, left, right),
            ExprNode::Call { name, args, .. } => match name.as_str() {
                "Average" | "Maximum" => self.series_call(node, name, args),
                "FromDate" | "ToDate" => {
                    self.check_date(node, name, args)?;
                    Err(Semantic::new(
                        node,
                        SemanticKind::BadCall,
                        format!("{name}(...) is not a value"),
                    ))
                }
                "Months" => {
                    self.check_months(node, args)?;
                    Err(Semantic::new(
                        node,
                        SemanticKind::BadCall,
                        "Months(...) is not a value",
                    ))
                }
                _ => Err(Semantic::new(
                    node,
                    SemanticKind::BadCall,
                    format!("unknown function \"{name}\""),
                )),
            },
        }
    }

    fn binary_units<'a>(
        &self,
        node: &'a ExprNode,
        op: BinaryOp,
        left: &'a ExprNode,
        right: &'a ExprNode,
    ) -> Analysis<'a, Units> {
        let left_units = self.units_of(left)?;
        match op {
            BinaryOp::Add | BinaryOp::Sub => {
                let right_units = self.units_of(right)?;
                let combined = if op == BinaryOp::Add {
                    left_units.checked_add(&right_units)
                } else {
                    left_units.checked_sub(&right_units)
                };
                combined.map_err(|err| {
                    Semantic::new(node, SemanticKind::DimensionMismatch, err.to_string())
                })
            }
            BinaryOp::Mul => Ok(&left_units * &self.units_of(right)?),
            BinaryOp::Div => Ok(&left_units / &self.units_of(right)?),
            BinaryOp::Pow => {
                let ExprNode::Number {
                    value, units: None, ..
                } = right
                else {
                    return Err(Semantic::new(
                        node,
                        SemanticKind::InvalidExponent,
                        "exponent must be a plain number",
                    ));
                };
                let exponent = rational_from_decimal(value).map_err(|err| {
                    Semantic::new(node, SemanticKind::InvalidExponent, err.to_string())
                })?;
                left_units.pow(exponent).map_err(|err| {
                    Semantic::new(node, SemanticKind::InvalidExponent, err.to_string())
                })
            }
        }
    }

    /// `Average(series, from, to[, months])` and `Maximum(...)`: the call's
    /// units are exactly the series' recorded base units. Date and month
    /// arguments are validated left-to-right before the lookup resolves.
    fn series_call<'a>(
        &self,
        node: &'a ExprNode,
        name: &str,
        args: &'a [ExprNode],
    ) -> Analysis<'a, Units> {
        if args.len() < 3 || args.len() > 4 {
            return Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                format!("{name} expects (series, from, to[, months])"),
            ));
        }
        let ExprNode::StringLit { value: series, .. } = &args[0] else {
            return Err(Semantic::new(
                &args[0],
                SemanticKind::BadCall,
                format!("first argument of {name} must be a quoted series name"),
            ));
        };
        self.expect_date_call(&args[1], "FromDate")?;
        self.expect_date_call(&args[2], "ToDate")?;
        if let Some(months) = args.get(3) {
            self.expect_months_call(months)?;
        }

        match self.registry.lookup_series_units(series) {
            Some(units) => Ok(units),
            None => Err(Semantic::new(
                node,
                SemanticKind::UnknownSeries,
                format!("unknown series \"{series}\""),
            )),
        }
    }

    fn expect_date_call<'a>(&self, node: &'a ExprNode, expected: &str) -> Analysis<'a, ()> {
        match node {
            ExprNode::Call { name, args, .. } if name == expected => {
                self.check_date(node, name, args)
            }
            _ => Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                format!("expected {expected}(...) here"),
            )),
        }
    }

    fn expect_months_call<'a>(&self, node: &'a ExprNode) -> Analysis<'a, ()> {
        match node {
            ExprNode::Call { name, args, .. } if name == "Months" => {
                self.check_months(node, args)
            }
            _ => Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                "expected Months(...) here",
            )),
        }
    }

    /// `FromDate(year[, month[, day]])`: the year must lie in 1900..=2500,
    /// the month position takes an integer or a month name, the day an
    /// integer. Dates are structural arguments and carry no units.
    fn check_date<'a>(
        &self,
        node: &'a ExprNode,
        name: &str,
        args: &'a [ExprNode],
    ) -> Analysis<'a, ()> {
        if args.is_empty() || args.len() > 3 {
            return Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                format!("{name} expects (year[, month[, day]])"),
            ));
        }
        let Some(year) = integer_literal(&args[0]) else {
            return Err(Semantic::new(
                &args[0],
                SemanticKind::BadCall,
                "year must be an integer literal",
            ));
        };
        if !(1900..=2500).contains(&year) {
            return Err(Semantic::new(
                node,
                SemanticKind::DateRange,
                YEAR_RANGE_MESSAGE,
            ));
        }

        if let Some(month) = args.get(1) {
            match month {
                ExprNode::Identifier { name: word, .. } => {
                    if month_number(word).is_none() {
                        return Err(Semantic::new(
                            month,
                            SemanticKind::InvalidMonth,
                            format!("Unrecognized month \"{word}\""),
                        ));
                    }
                }
                _ => match integer_literal(month) {
                    Some(value) if (1..=12).contains(&value) => {}
                    Some(_) => {
                        return Err(Semantic::new(
                            node,
                            SemanticKind::DateRange,
                            "Month should be in range 1 to 12",
                        ));
                    }
                    None => {
                        return Err(Semantic::new(
                            month,
                            SemanticKind::BadCall,
                            "month must be an integer or a month name",
                        ));
                    }
                },
            }
        }

        if let Some(day) = args.get(2) {
            match integer_literal(day) {
                Some(value) if (1..=31).contains(&value) => {}
                Some(_) => {
                    return Err(Semantic::new(
                        node,
                        SemanticKind::DateRange,
                        "Day should be in range 1 to 31",
                    ));
                }
                None => {
                    return Err(Semantic::new(
                        day,
                        SemanticKind::BadCall,
                        "day must be an integer literal",
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_months<'a>(&self, node: &'a ExprNode, args: &'a [ExprNode]) -> Analysis<'a, ()> {
        if args.is_empty() {
            return Err(Semantic::new(
                node,
                SemanticKind::BadCall,
                "Months expects at least one month",
            ));
        }
        for arg in args {
            let ExprNode::Identifier { name, .. } = arg else {
                return Err(Semantic::new(
                    arg,
                    SemanticKind::InvalidMonth,
                    "expected a month name",
                ));
            };
            if month_number(name).is_none() {
                return Err(Semantic::new(
                    arg,
                    SemanticKind::InvalidMonth,
                    format!("Unrecognized month \"{name}\""),
                ));
            }
        }
        Ok(())
    }
}

fn integer_literal(node: &ExprNode) -> Option<i64> {
    let ExprNode::Number {
        value, units: None, ..
    } = node
    else {
        return None;
    };
    if !value.fract().is_zero() {
        return None;
    }
    value.to_i64()
}
