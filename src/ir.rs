//! Código de tres direcciones.
//!
//! Las instrucciones no se evalúan: sus operandos son los símbolos
//! gramaticales tal como aparecen en la producción reducida.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::grammar::Symbol;

/// Variable temporal `t<n>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Temp(pub u32);

impl Display for Temp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "t{}", self.0)
    }
}

/// Operador binario.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
}

impl Display for Operator {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
        };

        fmt.write_str(string)
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            _ => Err(()),
        }
    }
}

/// `<target> = <lhs> <op> <rhs>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub target: Temp,
    pub lhs: Symbol,
    pub op: Operator,
    pub rhs: Symbol,
}

impl Display for Instruction {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} = {} {} {}", self.target, self.lhs, self.op, self.rhs)
    }
}
