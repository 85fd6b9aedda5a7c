//! Sketch data model: identified points, lines and the registry that mints them.

use kurbo::BezPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Unique identifier of a point within a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub u64);

/// Unique identifier of a line within a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identified 2D coordinate. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    id: PointId,
}

impl Point {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    /// The coordinate as a kurbo point.
    pub fn position(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

/// An ordered run of points drawn in one gesture.
///
/// Points can only be appended; there is no removal or reordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    id: LineId,
    points: Vec<Point>,
}

impl Line {
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Points in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Append a point to the end of the line.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the line has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Build a polyline path through the points in order.
    ///
    /// A single point yields a bare move-to, which strokes nothing.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(first.position());
        for point in self.points.iter().skip(1) {
            path.line_to(point.position());
        }

        path
    }
}

/// Errors raised when loading a serialized model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Duplicate line id: {0}")]
    DuplicateLineId(LineId),
}

/// Registry of all lines in a sketch and the source of their ids.
///
/// Ids are allocated from two independent counters starting at zero. Nothing
/// is ever removed, so ids are never reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelData")]
pub struct Model {
    lines: Vec<Line>,
    next_point_id: u64,
    next_line_id: u64,
}

/// Serialized form of a [`Model`], checked before use.
#[derive(Deserialize)]
struct ModelData {
    lines: Vec<Line>,
    next_point_id: u64,
    next_line_id: u64,
}

impl TryFrom<ModelData> for Model {
    type Error = ModelError;

    /// Rejects repeated line ids and raises each counter above every stored id.
    fn try_from(data: ModelData) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(data.lines.len());
        for line in &data.lines {
            if !seen.insert(line.id) {
                return Err(ModelError::DuplicateLineId(line.id));
            }
        }

        let min_line_id = data
            .lines
            .iter()
            .map(|line| line.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        let min_point_id = data
            .lines
            .iter()
            .flat_map(|line| &line.points)
            .map(|point| point.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);

        if data.next_line_id < min_line_id || data.next_point_id < min_point_id {
            log::warn!(
                "Stored counters (point {}, line {}) lag behind stored ids, raising to ({}, {})",
                data.next_point_id,
                data.next_line_id,
                data.next_point_id.max(min_point_id),
                data.next_line_id.max(min_line_id)
            );
        }

        Ok(Self {
            lines: data.lines,
            next_point_id: data.next_point_id.max(min_point_id),
            next_line_id: data.next_line_id.max(min_line_id),
        })
    }
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a point with a fresh id.
    pub fn create_point(&mut self, x: f64, y: f64) -> Point {
        let id = PointId(self.next_point_id);
        self.next_point_id += 1;
        Point { x, y, id }
    }

    /// Mint an empty line with a fresh id.
    pub fn create_line(&mut self) -> Line {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        Line {
            id,
            points: Vec::new(),
        }
    }

    /// Register a line. Empty and single-point lines are accepted.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// All registered lines, in registration order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Mint a point and append it to a registered line.
    ///
    /// Returns `None` without minting when no line has that id.
    pub fn append_point(&mut self, id: LineId, x: f64, y: f64) -> Option<Point> {
        // Searched from the back: the line being drawn is the newest one.
        let index = self.lines.iter().rposition(|line| line.id == id)?;
        let point = self.create_point(x, y);
        self.lines[index].add_point(point);
        Some(point)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of points held by registered lines.
    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ids_are_sequential() {
        let mut model = Model::new();
        let ids: Vec<u64> = (0..5)
            .map(|i| model.create_point(i as f64, 0.0).id().0)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_line_ids_independent_of_point_ids() {
        let mut model = Model::new();
        model.create_point(1.0, 1.0);
        model.create_point(2.0, 2.0);

        let first = model.create_line();
        let second = model.create_line();
        assert_eq!(first.id(), LineId(0));
        assert_eq!(second.id(), LineId(1));

        // Minting lines does not advance the point counter.
        assert_eq!(model.create_point(3.0, 3.0).id(), PointId(2));
    }

    #[test]
    fn test_add_point_preserves_order() {
        let mut model = Model::new();
        let mut line = model.create_line();
        for i in 0..4 {
            let point = model.create_point(i as f64 * 10.0, 5.0);
            line.add_point(point);
        }

        assert_eq!(line.len(), 4);
        let xs: Vec<f64> = line.points().iter().map(Point::x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_duplicate_points_are_kept() {
        let mut model = Model::new();
        let mut line = model.create_line();
        let point = model.create_point(7.0, 7.0);
        line.add_point(point);
        line.add_point(point);
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn test_add_line_accepts_empty_line() {
        let mut model = Model::new();
        let line = model.create_line();
        model.add_line(line);
        assert_eq!(model.line_count(), 1);
        assert!(model.lines()[0].is_empty());
        assert_eq!(model.point_count(), 0);
    }

    #[test]
    fn test_unregistered_line_is_not_listed() {
        let mut model = Model::new();
        let _line = model.create_line();
        assert_eq!(model.line_count(), 0);
        assert!(model.line(LineId(0)).is_none());
    }

    #[test]
    fn test_line_lookup() {
        let mut model = Model::new();
        let a = model.create_line();
        let b = model.create_line();
        model.add_line(a);
        model.add_line(b);

        let point = model.append_point(LineId(1), 1.0, 2.0).unwrap();
        assert_eq!(point.id(), PointId(0));

        assert!(model.line(LineId(0)).unwrap().is_empty());
        assert_eq!(model.line(LineId(1)).unwrap().points(), &[point]);
        assert_eq!(model.point_count(), 1);
    }

    #[test]
    fn test_append_to_missing_line_mints_nothing() {
        let mut model = Model::new();
        assert!(model.append_point(LineId(3), 1.0, 1.0).is_none());
        assert_eq!(model.create_point(0.0, 0.0).id(), PointId(0));
    }

    #[test]
    fn test_to_path() {
        let mut model = Model::new();
        let mut line = model.create_line();
        assert!(line.to_path().elements().is_empty());

        line.add_point(model.create_point(0.0, 0.0));
        assert_eq!(line.to_path().elements().len(), 1);

        line.add_point(model.create_point(10.0, 0.0));
        line.add_point(model.create_point(10.0, 10.0));
        let path = line.to_path();
        assert_eq!(path.elements().len(), 3);
        assert!(matches!(path.elements()[0], kurbo::PathEl::MoveTo(_)));
        assert!(matches!(path.elements()[2], kurbo::PathEl::LineTo(p) if p == kurbo::Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_serialized_model_keeps_counters() {
        let mut model = Model::new();
        let mut line = model.create_line();
        line.add_point(model.create_point(3.0, 4.0));
        model.add_line(line);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["next_point_id"], 1);
        assert_eq!(json["next_line_id"], 1);
        assert_eq!(json["lines"][0]["id"], 0);
        assert_eq!(json["lines"][0]["points"][0]["x"], 3.0);

        let mut restored: Model = serde_json::from_value(json).unwrap();
        assert_eq!(restored, model);
        assert_eq!(restored.create_point(0.0, 0.0).id(), PointId(1));
        assert_eq!(restored.create_line().id(), LineId(1));
    }

    #[test]
    fn test_deserialized_counters_are_raised_past_stored_ids() {
        let json = serde_json::json!({
            "lines": [{ "id": 0, "points": [{ "x": 1.0, "y": 1.0, "id": 0 }] }],
            "next_point_id": 0,
            "next_line_id": 0,
        });

        let mut model: Model = serde_json::from_value(json).unwrap();
        assert_eq!(model.create_point(0.0, 0.0).id(), PointId(1));
        assert_eq!(model.create_line().id(), LineId(1));
    }

    #[test]
    fn test_deserialized_counters_ahead_of_ids_are_kept() {
        let json = serde_json::json!({
            "lines": [{ "id": 2, "points": [] }],
            "next_point_id": 9,
            "next_line_id": 7,
        });

        let mut model: Model = serde_json::from_value(json).unwrap();
        assert_eq!(model.create_point(0.0, 0.0).id(), PointId(9));
        assert_eq!(model.create_line().id(), LineId(7));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_line_ids() {
        let json = serde_json::json!({
            "lines": [
                { "id": 4, "points": [] },
                { "id": 4, "points": [] },
            ],
            "next_point_id": 0,
            "next_line_id": 5,
        });

        let err = serde_json::from_value::<Model>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate line id: 4"));
    }
}
