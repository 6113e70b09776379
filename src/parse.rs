//! Análisis sintáctico ascendente (shift-reduce).
//!
//! # Algoritmo
//! Cada iteración desplaza a lo sumo un token desde el buffer de
//! entrada hacia el tope de la pila y luego intenta exactamente una
//! reducción. La reducción elegida es la primera coincidencia en un
//! recorrido doblemente ordenado: no terminales en orden de
//! declaración y, dentro de cada uno, alternativas en orden de
//! declaración. No hay backtracking ni detección de ambigüedades.
//!
//! El ciclo termina cuando tanto el buffer como la pila están vacíos,
//! o bien cuando una iteración sin buffer no logra reducir. En ese
//! caso la pila puede contener más de un símbolo: el análisis quedó
//! incompleto, pero esto no se considera un error. Los llamadores que
//! requieran aceptación estricta pueden usar [`Trace::accepts`].
//!
//! # Ciclos
//! Gramáticas con reducciones unitarias cíclicas (por ejemplo `A -> A`)
//! podrían reducir indefinidamente una vez agotada la entrada. Dado que
//! el algoritmo es determinista, repetir una configuración de pila sin
//! buffer implica un ciclo infinito; el motor detecta esa repetición y
//! se detiene como si ninguna regla coincidiera.
//!
//! # Código
//! Cada reducción se ofrece a [`codegen::emit`]. Solo las que producen
//! una instrucción consumen una variable temporal.

use std::{
    collections::{HashSet, VecDeque},
    fmt::{self, Display},
};

use crate::{
    codegen,
    grammar::{GrammarTable, Production, Symbol},
    ir::Instruction,
};

/// Acción registrada en un paso.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Shift,
    Reduce {
        production: Production,
        nonterminal: Symbol,
    },
}

impl Display for Action {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift => fmt.write_str("Shift"),
            Action::Reduce {
                production,
                nonterminal,
            } => write!(fmt, "Reduce {} to {}", production, nonterminal),
        }
    }
}

/// Instantánea del analizador inmediatamente después de una acción.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub stack: Vec<Symbol>,
    pub buffer: Vec<Symbol>,
    pub action: Action,
}

/// Resultado completo de un análisis.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    steps: Vec<Step>,
    code: Vec<Instruction>,
    stack: Vec<Symbol>,
    buffer: Vec<Symbol>,
}

impl Trace {
    /// Pasos en orden de ejecución.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Listado de código de tres direcciones.
    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    /// Contenido de la pila al detenerse.
    pub fn final_stack(&self) -> &[Symbol] {
        &self.stack
    }

    /// Tokens que nunca se desplazaron.
    pub fn remaining(&self) -> &[Symbol] {
        &self.buffer
    }

    /// Determina si el análisis redujo la entrada completa a `start`.
    ///
    /// Esta verificación es opcional; [`run`] nunca la aplica.
    pub fn accepts(&self, start: &str) -> bool {
        self.buffer.is_empty() && matches!(self.stack.as_slice(), [symbol] if *symbol == start)
    }

    pub fn into_parts(self) -> (Vec<Step>, Vec<Instruction>) {
        (self.steps, self.code)
    }
}

/// Divide una cadena de entrada en tokens.
///
/// El separador es el espacio simple; los tokens vacíos producto de
/// espacios repetidos se descartan.
pub fn tokenize(input: &str) -> Vec<Symbol> {
    input
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(Symbol::new)
        .collect()
}

/// Atajo para [`run`] sobre una cadena sin dividir.
pub fn parse(input: &str, grammar: &GrammarTable) -> Trace {
    run(tokenize(input), grammar)
}

/// Ejecuta el análisis shift-reduce de `tokens` contra `grammar`.
///
/// Nunca falla: una entrada no gramatical resulta en una traza
/// incompleta.
pub fn run<I, S>(tokens: I, grammar: &GrammarTable) -> Trace
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let buffer: VecDeque<_> = tokens
        .into_iter()
        .filter(|token| !token.as_ref().is_empty())
        .map(|token| Symbol::new(token.as_ref()))
        .collect();

    log::debug!("Parsing {} tokens", buffer.len());

    let mut parser = Parser {
        grammar,
        stack: Vec::new(),
        buffer,
        next_temp: 1,
        exhausted: HashSet::new(),
        trace: Trace::default(),
    };

    while !parser.buffer.is_empty() || !parser.stack.is_empty() {
        parser.shift();

        let reduced = parser.reduce();
        if !reduced && parser.buffer.is_empty() {
            break;
        }
    }

    parser.finish()
}

struct Parser<'a> {
    grammar: &'a GrammarTable,
    stack: Vec<Symbol>,
    buffer: VecDeque<Symbol>,
    next_temp: u32,

    /// Configuraciones de pila alcanzadas con el buffer agotado.
    exhausted: HashSet<Vec<Symbol>>,

    trace: Trace,
}

impl<'a> Parser<'a> {
    fn shift(&mut self) {
        if let Some(token) = self.buffer.pop_front() {
            log::trace!("Shift {}", token);

            self.stack.push(token);
            self.record(Action::Shift);
        }
    }

    fn reduce(&mut self) -> bool {
        let grammar = self.grammar;
        let found = grammar.rules().find_map(|(nonterminal, productions)| {
            productions.iter().find_map(|production| {
                production
                    .matches(&self.stack)
                    .map(|length| (nonterminal, production, length))
            })
        });

        let (nonterminal, production, length) = match found {
            Some(found) => found,
            None => {
                log::debug!("No production matches stack {:?}", self.stack);
                return false;
            }
        };

        let base = self.stack.len() - length;
        if self.buffer.is_empty() {
            self.exhausted.insert(self.stack.clone());

            let mut next = self.stack[..base].to_vec();
            next.push(nonterminal.clone());

            if self.exhausted.contains(&next) {
                log::debug!(
                    "Reducing {} to {} would repeat a previous configuration",
                    production,
                    nonterminal
                );

                return false;
            }
        }

        log::trace!("Reduce {} to {}", production, nonterminal);

        if let Some(instruction) = codegen::emit(production, nonterminal, self.next_temp) {
            log::trace!("Emit {}", instruction);

            self.trace.code.push(instruction);
            self.next_temp += 1;
        }

        self.stack.truncate(base);
        self.stack.push(nonterminal.clone());

        self.record(Action::Reduce {
            production: production.clone(),
            nonterminal: nonterminal.clone(),
        });

        true
    }

    fn record(&mut self, action: Action) {
        self.trace.steps.push(Step {
            stack: self.stack.clone(),
            buffer: self.buffer.iter().cloned().collect(),
            action,
        });
    }

    fn finish(self) -> Trace {
        log::debug!(
            "Parsing stopped after {} steps with {} symbols on stack",
            self.trace.steps.len(),
            self.stack.len()
        );

        Trace {
            stack: self.stack,
            buffer: self.buffer.into_iter().collect(),
            ..self.trace
        }
    }
}
