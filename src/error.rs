//! Reporte de errores con ubicación.
//!
//! Los errores fatales de las fases del procesador (por ahora, solo
//! los de compilación de gramáticas) se acumulan en [`Diagnostics`],
//! cuya representación textual incluye un extracto de las líneas
//! originales con el fragmento culpable subrayado.

use crate::source::{Located, Location};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

mod sealed {
    pub trait Sealed {}
}

/// Un error que conoce su ubicación en el texto original.
pub trait LocatedError: sealed::Sealed {
    fn error(&self) -> &dyn Error;
    fn location(&self) -> &Location;
}

/// Colección de errores de una misma fase.
pub struct Diagnostics {
    kind: &'static str,
    errors: Vec<Box<dyn 'static + LocatedError>>,
}

impl Diagnostics {
    /// Cambia el prefijo con que se reporta cada error.
    pub fn kind(self, kind: &'static str) -> Self {
        Diagnostics { kind, ..self }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            kind: "error",
            errors: Vec::new(),
        }
    }
}

impl<E: 'static + LocatedError> From<E> for Diagnostics {
    fn from(error: E) -> Self {
        Diagnostics::from(vec![error])
    }
}

impl<E: 'static + LocatedError> From<Vec<E>> for Diagnostics {
    fn from(errors: Vec<E>) -> Self {
        let errors = errors
            .into_iter()
            .map(|error| Box::new(error) as Box<dyn LocatedError>)
            .collect();

        Diagnostics {
            errors,
            ..Default::default()
        }
    }
}

impl Display for Diagnostics {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return writeln!(fmt, "No errors were reported");
        }

        for error in &self.errors {
            writeln!(fmt, "{}: {}", self.kind, error.error())?;
            excerpt(fmt, error.location())?;
            writeln!(fmt)?;
        }

        let plural = if self.errors.len() == 1 { "" } else { "s" };
        writeln!(fmt, "Aborted with {} error{}", self.errors.len(), plural)
    }
}

/// Muestra las líneas que cubre `location` y subraya el rango señalado.
fn excerpt(fmt: &mut Formatter<'_>, location: &Location) -> fmt::Result {
    let (start, end) = (location.start(), location.end());
    writeln!(fmt, " --> {}", location)?;

    let digits = end.line().to_string().len();
    writeln!(fmt, "{:digits$} |", "", digits = digits)?;

    for line_number in start.line()..=end.line() {
        location.source().with_line(line_number, |line| {
            writeln!(fmt, "{:>digits$} | {}", line_number, line, digits = digits)
        })?;
    }

    // `end` es exclusivo; un rango vacío aún subraya una columna
    let first = start.column().max(1);
    let last = (end.column() - 1).max(first);

    writeln!(
        fmt,
        "{:digits$} | {:skip$}{:^<width$}",
        "",
        "",
        "",
        digits = digits,
        skip = (first - 1) as usize,
        width = (last - first + 1) as usize
    )
}

impl<E: Error> sealed::Sealed for Located<E> {}

impl<E: Error> LocatedError for Located<E> {
    fn error(&self) -> &dyn Error {
        self.as_ref()
    }

    fn location(&self) -> &Location {
        Located::location(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Diagnostics;
    use crate::grammar;

    #[test]
    fn empty_diagnostics() {
        let diagnostics = Diagnostics::default();
        assert_eq!(diagnostics.to_string(), "No errors were reported\n");
    }

    #[test]
    fn grammar_error_excerpt() {
        let error = grammar::compile("E -> num\n  garbage").unwrap_err();
        let rendered = Diagnostics::from(error).kind("Grammar error").to_string();

        let expected = "\
Grammar error: Invalid grammar rule: garbage
 --> <grammar>:[2:3-2:9]
  |
2 |   garbage
  |   ^^^^^^^

Aborted with 1 error
";

        assert_eq!(rendered, expected);
    }

    #[test]
    fn several_errors() {
        let errors: Vec<_> = ["x", "->"]
            .iter()
            .map(|text| grammar::compile(text).unwrap_err())
            .collect();

        let rendered = Diagnostics::from(errors).to_string();
        assert_eq!(rendered.matches(" --> ").count(), 2);
        assert!(rendered.contains("error: Invalid grammar rule: x\n"));
        assert!(rendered.contains("error: Invalid grammar rule: ->\n"));
        assert!(rendered.ends_with("Aborted with 2 errors\n"));
    }
}
