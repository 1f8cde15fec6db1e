//! What a cell holds and how its raw text becomes a value.

use cellgrid_engine::engine::{Formula, FormulaParseError, Position, Resolver, Value, parse_formula};

/// Leading character that marks a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that keeps text from being read as a formula. It is
/// stripped from the displayed value but kept in the text.
pub const ESCAPE_SIGN: char = '\'';

/// The content of a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        /// Valid referenced positions, deduplicated, first-seen order.
        references: Vec<Position>,
    },
}

impl Content {
    /// Build content from user input.
    ///
    /// - `""` -> Empty
    /// - `=` followed by at least one character -> Formula (must parse)
    /// - anything else, including a lone `=` -> Text
    pub fn parse(text: &str) -> Result<Content, FormulaParseError> {
        if text.is_empty() {
            return Ok(Content::Empty);
        }

        match text.strip_prefix(FORMULA_SIGN) {
            Some(body) if !body.is_empty() => {
                let formula = parse_formula(body)?;
                let mut references = Vec::new();
                for pos in formula.referenced_cells() {
                    if pos.is_valid() && !references.contains(&pos) {
                        references.push(pos);
                    }
                }
                Ok(Content::Formula {
                    formula,
                    references,
                })
            }
            _ => Ok(Content::Text(text.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Content::Formula { .. })
    }

    /// Text as the user would edit it. Formulas come back in canonical form.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Formula { formula, .. } => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Content::Formula { references, .. } => references,
            Content::Empty | Content::Text(_) => &[],
        }
    }

    /// Compute the value. Only formulas consult the resolver.
    pub fn evaluate(&self, resolve: &Resolver<'_>) -> Value {
        match self {
            Content::Empty => Value::empty(),
            Content::Text(text) => {
                let shown = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                Value::Text(shown.to_string())
            }
            Content::Formula { formula, .. } => match formula.evaluate(resolve) {
                Ok(n) => Value::Number(n),
                Err(e) => Value::Error(e),
            },
        }
    }
}
