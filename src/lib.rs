//! Analizador ascendente guiado por gramáticas de usuario.
//!
//! # Gramática
//! El texto de una gramática se compila en [`grammar`] a una tabla de
//! reglas ordenada. Un error en cualquier línea aborta la compilación
//! completa y se reporta con su ubicación por medio de
//! [`error::Diagnostics`].
//!
//! # Análisis
//! La entrada es una cadena de tokens separados por espacios. El motor
//! shift-reduce de [`parse`] la consume contra la tabla de reglas y
//! registra cada paso (pila, entrada restante y acción). El análisis
//! nunca falla; una entrada que no se puede reducir por completo solo
//! produce una traza incompleta.
//!
//! # Código intermedio
//! Las reducciones de forma aritmética (`a + b`, `a - b`, `a * b`)
//! emiten código de tres direcciones, descrito en [`ir`] y generado
//! por [`codegen`].

pub mod codegen;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod parse;
pub mod source;
