//! Compilación de gramáticas.
//!
//! # Formato
//! Una gramática es texto orientado a líneas. Cada línea no vacía
//! declara una producción de la forma
//!
//! ```text
//! <lado izquierdo> -> <símbolos del lado derecho separados por espacios>
//! ```
//!
//! Varias líneas pueden compartir el mismo lado izquierdo; cada una
//! declara una alternativa adicional para ese no terminal. Las líneas
//! en blanco se ignoran.
//!
//! # Orden
//! El orden de declaración es significativo: tanto el orden en que
//! aparecen por primera vez los no terminales como el orden de las
//! alternativas de cada uno determinan la prioridad de reducción en
//! [`crate::parse`]. [`GrammarTable`] preserva ambos.
//!
//! # Símbolos
//! No existe distinción estructural entre terminales y no terminales.
//! Un símbolo es no terminal únicamente por aparecer como lado izquierdo
//! de alguna regla.

use indexmap::IndexMap;
use std::{
    borrow::Borrow,
    fmt::{self, Display},
    rc::Rc,
};

use thiserror::Error;

use crate::source::{Located, Source};

/// Separador entre ambos lados de una regla.
pub const ARROW: &str = "->";

/// Nombre de origen para gramáticas sin archivo asociado.
const ANONYMOUS: &str = "<grammar>";

/// Error de compilación de gramática.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Una línea no vacía no se puede dividir en dos lados no vacíos.
    #[error("Invalid grammar rule: {0}")]
    InvalidRule(String),
}

/// Un símbolo gramatical, terminal o no terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Rc::from(name))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Display for Symbol {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

/// Lado derecho de una regla.
///
/// Se conserva el texto original (ya recortado) junto con su división
/// en símbolos. La división se hace sobre cada espacio individual, sin
/// normalizar espacios repetidos, por lo cual una producción como
/// `"a  b"` consta de tres símbolos, uno de ellos vacío.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    text: Rc<str>,
    symbols: Vec<Symbol>,
}

impl Production {
    pub fn new(text: &str) -> Self {
        Production {
            text: Rc::from(text),
            symbols: text.split(' ').map(Symbol::new).collect(),
        }
    }

    /// Texto original de la producción.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Cantidad de símbolos. Nunca es cero.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Determina si esta producción coincide con el tope de una pila.
    ///
    /// Se toman los últimos `len()` símbolos de la pila (o la pila
    /// completa si es más corta), se unen con espacios simples y se
    /// comparan contra el texto original. En caso de coincidencia se
    /// retorna la cantidad de símbolos que deben retirarse de la pila.
    pub fn matches(&self, stack: &[Symbol]) -> Option<usize> {
        let tail = &stack[stack.len().saturating_sub(self.len())..];

        let mut remaining = self.text();
        for (i, symbol) in tail.iter().enumerate() {
            if i > 0 {
                remaining = remaining.strip_prefix(' ')?;
            }

            remaining = remaining.strip_prefix(symbol.as_ref())?;
        }

        remaining.is_empty().then(|| tail.len())
    }
}

impl Display for Production {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.text)
    }
}

/// Tabla de reglas: no terminal → alternativas, en orden de declaración.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarTable {
    rules: IndexMap<Symbol, Vec<Production>>,
}

impl GrammarTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Agrega una alternativa al final de las de `nonterminal`.
    ///
    /// Un no terminal nuevo se ubica después de todos los existentes.
    pub fn push(&mut self, nonterminal: Symbol, production: Production) {
        self.rules.entry(nonterminal).or_default().push(production);
    }

    /// Recorre las reglas en orden de prioridad.
    pub fn rules(&self) -> impl Iterator<Item = (&Symbol, &[Production])> {
        self.rules
            .iter()
            .map(|(nonterminal, productions)| (nonterminal, productions.as_slice()))
    }

    pub fn productions(&self, nonterminal: &str) -> Option<&[Production]> {
        self.rules.get(nonterminal).map(Vec::as_slice)
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    /// Cantidad de no terminales.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Display for GrammarTable {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (nonterminal, productions) in self.rules() {
            for production in productions {
                writeln!(fmt, "{} {} {}", nonterminal, ARROW, production)?;
            }
        }

        Ok(())
    }
}

/// Compila el texto de una gramática anónima.
pub fn compile(text: &str) -> Result<GrammarTable, Located<GrammarError>> {
    compile_source(&Source::new(ANONYMOUS, text))
}

/// Compila una gramática a partir de un origen con nombre.
///
/// La compilación se detiene en la primera línea inválida; no se
/// produce una tabla parcial.
pub fn compile_source(source: &Rc<Source>) -> Result<GrammarTable, Located<GrammarError>> {
    let mut table = GrammarTable::new();

    for (line_number, line) in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // El lado derecho termina en una segunda flecha, si la hay
        let mut sides = line.split(ARROW).map(str::trim);
        let rule = sides
            .next()
            .zip(sides.next())
            .filter(|(left, right)| !left.is_empty() && !right.is_empty());

        match rule {
            Some((left, right)) => table.push(Symbol::new(left), Production::new(right)),

            None => {
                let error = GrammarError::InvalidRule(line.to_owned());
                return Err(Located::at(error, source.locate(line_number, line)));
            }
        }
    }

    log::debug!(
        "Compiled grammar {:?}: {} nonterminals",
        source.name(),
        table.len()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(symbols: &str) -> Vec<Symbol> {
        symbols.split_whitespace().map(Symbol::new).collect()
    }

    #[test]
    fn single_rule() {
        let table = compile("A -> B C").unwrap();

        assert_eq!(table.len(), 1);
        let productions = table.productions("A").unwrap();
        assert_eq!(productions.len(), 1);
        assert_eq!(productions[0].text(), "B C");
        assert_eq!(productions[0].symbols(), &stack("B C")[..]);

        assert!(table.is_nonterminal("A"));
        assert!(!table.is_nonterminal("B"));
        assert!(table.productions("B").is_none());
    }

    #[test]
    fn declaration_order_is_preserved() {
        let table = compile("E -> E + E\nT -> id\n\n   E -> num  \nA -> x\nT -> ( E )").unwrap();

        let order: Vec<_> = table
            .rules()
            .map(|(nonterminal, productions)| {
                let texts: Vec<_> = productions.iter().map(Production::text).collect();
                (nonterminal.to_string(), texts)
            })
            .collect();

        assert_eq!(
            order,
            vec![
                ("E".to_string(), vec!["E + E", "num"]),
                ("T".to_string(), vec!["id", "( E )"]),
                ("A".to_string(), vec!["x"]),
            ]
        );
    }

    #[test]
    fn numeric_nonterminals_keep_insertion_order() {
        let table = compile("b -> x\n2 -> y\n1 -> z").unwrap();
        let keys: Vec<_> = table.rules().map(|(k, _)| k.to_string()).collect();

        assert_eq!(keys, vec!["b", "2", "1"]);
    }

    #[test]
    fn malformed_lines() {
        for line in &["-> x", "x ->", "garbage", "->", "   ->   "] {
            let error = compile(&format!("S -> a\n{}\nS -> b", line)).unwrap_err();
            let message = error.to_string();

            assert!(message.contains(line.trim()), "{:?}", message);
            assert_eq!(error.location().start().line(), 2);
            assert_eq!(
                error.into_inner(),
                GrammarError::InvalidRule(line.trim().to_string())
            );
        }
    }

    #[test]
    fn first_invalid_line_aborts() {
        let error = compile("bad one\nbad two").unwrap_err();
        assert_eq!(error.to_string(), "Invalid grammar rule: bad one");
    }

    #[test]
    fn right_side_ends_at_second_arrow() {
        let table = compile("A -> b -> c").unwrap();
        assert_eq!(table.productions("A").unwrap()[0].text(), "b");
    }

    #[test]
    fn empty_side_between_arrows() {
        let error = compile("S -> a\nA -> -> c").unwrap_err();

        assert_eq!(error.to_string(), "Invalid grammar rule: A -> -> c");
        assert_eq!(error.location().start().line(), 2);
    }

    #[test]
    fn blank_and_crlf_lines() {
        let table = compile("\r\n  \nS -> a b\r\n\t\n").unwrap();
        assert_eq!(table.productions("S").unwrap()[0].text(), "a b");
    }

    #[test]
    fn empty_grammar() {
        let table = compile("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn production_matching() {
        let production = Production::new("E + E");

        assert_eq!(production.matches(&stack("x E + E")), Some(3));
        assert_eq!(production.matches(&stack("E + E")), Some(3));
        assert_eq!(production.matches(&stack("E + F")), None);
        assert_eq!(production.matches(&stack("+ E")), None);
        assert_eq!(production.matches(&[]), None);
    }

    #[test]
    fn repeated_spaces_are_not_normalized() {
        let production = Production::new("a  b");

        assert_eq!(production.len(), 3);
        assert_eq!(production.matches(&stack("a b")), None);
        assert_eq!(production.matches(&stack("x a b")), None);
    }

    #[test]
    fn short_stack_compares_whole_stack() {
        // Un no terminal con espacios puede cubrir varios símbolos de texto
        let production = Production::new("A B");
        let stack = vec![Symbol::new("A B")];

        assert_eq!(production.matches(&stack), Some(1));
    }

    #[test]
    fn display_round_trip() {
        let text = "E -> E + E\nE -> num\nS -> E\n";
        let table = compile(text).unwrap();

        assert_eq!(table.to_string(), text);
        assert_eq!(compile(&table.to_string()).unwrap(), table);
    }
}
