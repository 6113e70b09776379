//! Rastreo de ubicaciones originales en texto de gramática.
//!
//! Las gramáticas se procesan línea por línea, por lo cual cada
//! objeto que el compilador construye a partir de ellas puede llevar
//! cuenta de la línea y el rango de columnas de donde proviene. Esto
//! permite señalar con exactitud la regla que provocó un error.

use std::{
    fmt::{self, Debug, Display, Formatter},
    ops::Range,
    rc::Rc,
};

/// Un objeto cualquiera con una posición original asociada.
#[derive(Debug, Clone)]
pub struct Located<T> {
    location: Location,
    value: T,
}

impl<T> Located<T> {
    /// Obtiene la ubicación.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Descarta la ubicación y toma ownership del valor.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Construye a partir de un valor y una ubicación.
    pub fn at(value: T, location: Location) -> Self {
        Located { value, location }
    }
}

impl<T> AsRef<T> for Located<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, formatter)
    }
}

impl<T: std::error::Error> std::error::Error for Located<T> {}

/// Una ubicación está conformada por un origen y un rango de posiciones.
#[derive(Clone)]
pub struct Location {
    from: Rc<Source>,
    position: Range<Position>,
}

impl Location {
    /// Obtiene el origen.
    pub fn source(&self) -> &Source {
        &self.from
    }

    /// Obtiene la posición de inicio.
    pub fn start(&self) -> Position {
        self.position.start
    }

    /// Obtiene la posición de fin (exclusiva).
    pub fn end(&self) -> Position {
        self.position.end
    }
}

impl Display for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:", self.from.name)?;

        let Range { start, end } = self.position;
        if end == start.advance() {
            // Solo se señala una columna en específico
            write!(formatter, "{}", start)
        } else {
            write!(formatter, "[{}-{}]", start, end.back())
        }
    }
}

impl Debug for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        <Self as Display>::fmt(self, formatter)
    }
}

/// Una posición línea-columna en un archivo.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Obtiene el número de línea.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Obtiene el número de columna.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Incrementa el número de columna.
    pub fn advance(self) -> Position {
        Position {
            line: self.line,
            column: self.column + 1,
        }
    }

    /// Decrementa el número de columna.
    pub fn back(self) -> Position {
        Position {
            line: self.line,
            column: self.column - 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl Display for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// Nombre de origen y líneas del texto original.
pub struct Source {
    name: String,
    lines: Vec<String>,
}

impl Source {
    /// Construye un origen a partir de un nombre y un texto completo.
    ///
    /// El texto se divide en `'\n'`; un `'\r'` final, si existe, forma
    /// parte de la línea y lo descarta el recorte posterior.
    pub fn new<S: Into<String>>(name: S, text: &str) -> Rc<Self> {
        Rc::new(Source {
            name: name.into(),
            lines: text.split('\n').map(String::from).collect(),
        })
    }

    /// Nombre del origen, tal como se reporta en diagnósticos.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoca `f` con el contenido de la línea `line_number` (base 1).
    ///
    /// Las líneas inexistentes se presentan como vacías.
    pub fn with_line<F, R>(&self, line_number: u32, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let line = (line_number as usize)
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
            .unwrap_or("");

        f(line)
    }

    /// Itera sobre cada línea junto con su número (base 1).
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index as u32 + 1, line.as_str()))
    }

    /// Ubicación que cubre el fragmento `fragment` de la línea
    /// `line_number`.
    ///
    /// `fragment` debe ser un subslice de esa misma línea, por ejemplo
    /// el resultado de recortarla. Las columnas se cuentan en caracteres.
    pub fn locate(self: &Rc<Self>, line_number: u32, fragment: &str) -> Location {
        let (start, length) = self.with_line(line_number, |line| {
            let offset = (fragment.as_ptr() as usize)
                .checked_sub(line.as_ptr() as usize)
                .filter(|&offset| offset + fragment.len() <= line.len())
                .unwrap_or(0);

            let start = line[..offset].chars().count() as u32;
            (start, fragment.chars().count() as u32)
        });

        let start = Position {
            line: line_number,
            column: start + 1,
        };

        let end = Position {
            line: line_number,
            column: start.column + length.max(1),
        };

        Location {
            from: Rc::clone(self),
            position: start..end,
        }
    }
}
