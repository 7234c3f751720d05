//! Turns result rows into `INSERT` statements.
//!
//! The output is built fully in memory: one statement per row, in the order the
//! rows are read, followed by a final `commit;` line. Nothing is returned if
//! any row fails, so a caller never writes a partial script.

use std::fmt;

use crate::{
    error::{BoxError, GenerateError},
    value::{EscapedLiteral, RenderValue, Value},
};

/// Destination of the generated statements: `[owner.]table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub owner: Option<String>,
    pub table: String,
}

impl Target {
    /// An empty owner is treated as no owner.
    pub fn new(table: impl Into<String>, owner: Option<String>) -> Self {
        Target {
            owner: owner.filter(|owner| !owner.is_empty()),
            table: table.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}.{}", owner, self.table),
            None => f.write_str(&self.table),
        }
    }
}

/// The generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertScript {
    pub text: String,
    pub rows: usize,
}

pub struct StatementGenerator {
    target: Target,
    columns: Option<Vec<String>>,
    renderer: Box<dyn RenderValue>,
}

impl StatementGenerator {
    pub fn new(target: Target) -> Self {
        StatementGenerator {
            target,
            columns: None,
            renderer: Box::new(EscapedLiteral),
        }
    }

    /// Column names to write instead of the ones reported by the query.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_renderer(mut self, renderer: impl RenderValue + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_boxed_renderer(mut self, renderer: Box<dyn RenderValue>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Start a script for a result set with the given column names.
    ///
    /// Fails when an override list was given and its length does not match.
    pub fn begin(&self, source_columns: &[String]) -> Result<Script<'_>, GenerateError> {
        let columns = match &self.columns {
            Some(columns) if columns.len() != source_columns.len() => {
                return Err(GenerateError::ColumnCountMismatch {
                    expected: columns.len(),
                    actual: source_columns.len(),
                });
            }
            Some(columns) => columns.as_slice(),
            None => source_columns,
        };

        let prefix = format!("INSERT INTO {} ({}) VALUES (", self.target, columns.join(","));
        Ok(Script {
            renderer: self.renderer.as_ref(),
            prefix,
            width: columns.len(),
            text: String::new(),
            rows: 0,
        })
    }

    /// Render every row of `rows`, stopping at the first error.
    pub fn generate<I, E>(
        &self,
        source_columns: &[String],
        rows: I,
    ) -> Result<InsertScript, GenerateError>
    where
        I: IntoIterator<Item = Result<Vec<Value>, E>>,
        E: Into<BoxError>,
    {
        let mut script = self.begin(source_columns)?;
        for row in rows {
            let row = row.map_err(|e| script.row_error(e))?;
            script.push_row(&row)?;
        }
        Ok(script.finish())
    }
}

/// A script being built row by row.
pub struct Script<'a> {
    renderer: &'a dyn RenderValue,
    prefix: String,
    width: usize,
    text: String,
    rows: usize,
}

impl Script<'_> {
    pub fn push_row(&mut self, row: &[Value]) -> Result<(), GenerateError> {
        if row.len() != self.width {
            return Err(GenerateError::RowWidth {
                row: self.rows + 1,
                expected: self.width,
                actual: row.len(),
            });
        }

        self.text.push_str(&self.prefix);
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                self.text.push(',');
            }
            self.renderer.render(value, &mut self.text);
        }
        self.text.push_str(");\n");
        self.rows += 1;
        Ok(())
    }

    /// Error for a row the cursor failed to produce.
    pub fn row_error(&self, source: impl Into<BoxError>) -> GenerateError {
        GenerateError::Row {
            row: self.rows + 1,
            source: source.into(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> InsertScript {
        self.text.push_str("commit;");
        InsertScript {
            text: self.text,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::value::VerbatimLiteral;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn ok_rows(rows: Vec<Vec<Value>>) -> impl Iterator<Item = Result<Vec<Value>, Infallible>> {
        rows.into_iter().map(Ok)
    }

    fn abc_row() -> Vec<Value> {
        vec![Value::from("a"), Value::from("b"), Value::Integer(1)]
    }

    #[test]
    fn test_single_row() {
        let generator = StatementGenerator::new(Target::new("T", None));
        let script = generator
            .generate(&columns(&["c1", "c2", "c3"]), ok_rows(vec![abc_row()]))
            .unwrap();
        assert_eq!(
            script.text,
            "INSERT INTO T (c1,c2,c3) VALUES ('a','b','1');\ncommit;"
        );
        assert_eq!(script.rows, 1);
    }

    #[test]
    fn test_owner_prefix() {
        let generator = StatementGenerator::new(Target::new("T", Some("U".to_string())));
        let script = generator
            .generate(&columns(&["c1", "c2", "c3"]), ok_rows(vec![abc_row()]))
            .unwrap();
        assert_eq!(
            script.text,
            "INSERT INTO U.T (c1,c2,c3) VALUES ('a','b','1');\ncommit;"
        );
    }

    #[test]
    fn test_empty_owner_is_ignored() {
        let target = Target::new("T", Some(String::new()));
        assert_eq!(target.owner, None);
        assert_eq!(target.to_string(), "T");
    }

    #[test]
    fn test_zero_rows() {
        let generator = StatementGenerator::new(Target::new("T", None));
        let script = generator
            .generate(&columns(&["c1"]), ok_rows(vec![]))
            .unwrap();
        assert_eq!(script.text, "commit;");
        assert_eq!(script.rows, 0);
    }

    #[test]
    fn test_rows_keep_cursor_order() {
        let generator = StatementGenerator::new(Target::new("T", None));
        let rows = (1..=3).map(|i| vec![Value::Integer(i)]).collect();
        let script = generator.generate(&columns(&["id"]), ok_rows(rows)).unwrap();

        let lines: Vec<&str> = script.text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "INSERT INTO T (id) VALUES ('1');",
                "INSERT INTO T (id) VALUES ('2');",
                "INSERT INTO T (id) VALUES ('3');",
                "commit;",
            ]
        );
    }

    #[test]
    fn test_column_override() {
        let generator =
            StatementGenerator::new(Target::new("T", None)).with_columns(columns(&["x", "y", "z"]));
        let script = generator
            .generate(&columns(&["c1", "c2", "c3"]), ok_rows(vec![abc_row()]))
            .unwrap();
        assert_eq!(
            script.text,
            "INSERT INTO T (x,y,z) VALUES ('a','b','1');\ncommit;"
        );
    }

    #[test]
    fn test_column_override_mismatch_reads_no_rows() {
        let generator =
            StatementGenerator::new(Target::new("T", None)).with_columns(columns(&["x", "y"]));
        let mut consumed = 0;
        let rows = std::iter::from_fn(|| {
            consumed += 1;
            Some(Ok::<_, Infallible>(abc_row()))
        });

        let err = generator
            .generate(&columns(&["c1", "c2", "c3"]), rows)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ColumnCountMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_cursor_error_aborts() {
        let generator = StatementGenerator::new(Target::new("T", None));
        let rows: Vec<Result<Vec<Value>, BoxError>> = vec![
            Ok(vec![Value::Integer(1)]),
            Err("connection reset".into()),
            Ok(vec![Value::Integer(3)]),
        ];

        let err = generator.generate(&columns(&["id"]), rows).unwrap_err();
        match err {
            GenerateError::Row { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_row_width_mismatch() {
        let generator = StatementGenerator::new(Target::new("T", None));
        let mut script = generator.begin(&columns(&["a", "b"])).unwrap();
        let err = script.push_row(&[Value::Integer(1)]).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::RowWidth {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(script.rows(), 0);
    }

    #[test]
    fn test_null_and_quotes() {
        let generator = StatementGenerator::new(Target::new("people", None));
        let row = vec![Value::from("O'Brien"), Value::Null];
        let script = generator
            .generate(&columns(&["name", "note"]), ok_rows(vec![row.clone()]))
            .unwrap();
        assert_eq!(
            script.text,
            "INSERT INTO people (name,note) VALUES ('O''Brien',NULL);\ncommit;"
        );

        let legacy = StatementGenerator::new(Target::new("people", None))
            .with_renderer(VerbatimLiteral);
        let script = legacy
            .generate(&columns(&["name", "note"]), ok_rows(vec![row]))
            .unwrap();
        assert_eq!(
            script.text,
            "INSERT INTO people (name,note) VALUES ('O'Brien','');\ncommit;"
        );
    }

    #[test]
    fn test_deterministic() {
        let generator = StatementGenerator::new(Target::new("T", Some("U".to_string())));
        let rows = || {
            ok_rows(vec![
                vec![Value::from("x"), Value::Real(0.5), Value::Null],
                vec![Value::from("y"), Value::Unsigned(9), Value::from("z")],
            ])
        };
        let cols = columns(&["a", "b", "c"]);

        let first = generator.generate(&cols, rows()).unwrap();
        let second = generator.generate(&cols, rows()).unwrap();
        assert_eq!(first, second);
    }
}
