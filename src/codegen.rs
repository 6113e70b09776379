//! Emisión de código de tres direcciones.
//!
//! Solo las reducciones con forma aritmética producen código: una
//! producción de exactamente tres símbolos cuyo símbolo central es
//! `+`, `-` o `*`. Cualquier otra forma no emite nada.

use std::{
    io::{self, Write},
    str::FromStr,
};

use crate::{
    grammar::{Production, Symbol},
    ir::{Instruction, Operator, Temp},
};

/// Intenta emitir una instrucción para la reducción de `production`.
///
/// `counter` es el número de la siguiente variable temporal. El no
/// terminal de la reducción no participa en el texto de la instrucción.
pub fn emit(production: &Production, _nonterminal: &Symbol, counter: u32) -> Option<Instruction> {
    match production.symbols() {
        [lhs, op, rhs] => {
            let op = Operator::from_str(op.as_ref()).ok()?;

            Some(Instruction {
                target: Temp(counter),
                lhs: lhs.clone(),
                op,
                rhs: rhs.clone(),
            })
        }

        _ => None,
    }
}

/// Escribe un listado de instrucciones, una por línea.
pub fn write<W: Write>(code: &[Instruction], output: &mut W) -> io::Result<()> {
    for instruction in code {
        writeln!(output, "{}", instruction)?;
    }

    Ok(())
}
