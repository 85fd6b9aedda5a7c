//! Text summary of a model, as shown in the side panel.

use crate::model::{LineId, Model};
use std::fmt;

/// One line's entry in the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSummary {
    pub id: LineId,
    /// Coordinates in drawing order.
    pub coordinates: Vec<(f64, f64)>,
}

impl fmt::Display for LineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:", self.id)?;
        for (i, (x, y)) in self.coordinates.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}({x}, {y})")?;
        }
        Ok(())
    }
}

/// Snapshot of the panel content for a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub lines: Vec<LineSummary>,
}

impl Summary {
    pub fn from_model(model: &Model) -> Self {
        let lines = model
            .lines()
            .iter()
            .map(|line| LineSummary {
                id: line.id(),
                coordinates: line.points().iter().map(|p| (p.x(), p.y())).collect(),
            })
            .collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Heading shown above the per-line entries.
    pub fn header(&self) -> String {
        format!("Number of lines: {}", self.line_count())
    }

    /// Header followed by one row per line.
    pub fn rows(&self) -> Vec<String> {
        std::iter::once(self.header())
            .chain(self.lines.iter().map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model() {
        let summary = Summary::from_model(&Model::new());
        assert_eq!(summary.header(), "Number of lines: 0");
        assert_eq!(summary.to_string(), "Number of lines: 0");
    }

    #[test]
    fn test_fractional_coordinates() {
        let mut model = Model::new();
        let mut line = model.create_line();
        line.add_point(model.create_point(1.5, -2.25));
        model.add_line(line);

        let summary = Summary::from_model(&model);
        assert_eq!(summary.lines[0].to_string(), "Line 0: (1.5, -2.25)");
    }

    #[test]
    fn test_empty_line_has_no_coordinates() {
        let mut model = Model::new();
        let line = model.create_line();
        model.add_line(line);

        let summary = Summary::from_model(&model);
        assert_eq!(summary.rows(), vec!["Number of lines: 1", "Line 0:"]);
    }
}
