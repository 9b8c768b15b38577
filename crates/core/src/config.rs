//! Generation parameters and the canvas/grid sizing derived from them.
//!
//! Every setter clamps instead of rejecting: a columns value of 3 becomes 6,
//! a tile percent of 1.5 becomes 1.0, and so on.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_GRID_CELLS: usize = 6;
pub const MIN_CELL_SIZE: u32 = 5;
/// Standard deviation of the half-normal draw for a random top floor.
pub const TOP_FLOOR_SPREAD: f64 = 3.0;
/// Standard deviation of the half-normal draw for a random bottom floor.
pub const BOTTOM_FLOOR_SPREAD: f64 = 4.0;
/// Floors never extend further than this above or below ground level.
pub const MAX_FLOORS_PER_SIDE: i32 = 256;

/// A value the caller either fixes or leaves to the random stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest", into = "RawRequest")]
pub enum Request {
    #[default]
    Random,
    Value(i64),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseRequestError(String);

impl fmt::Display for ParseRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is neither a number nor \"random\"", self.0)
    }
}

impl Error for ParseRequestError {}

impl FromStr for Request {
    type Err = ParseRequestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }
        trimmed.parse::<i64>().map(Self::Value).map_err(|_| ParseRequestError(raw.to_string()))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequest {
    Number(i64),
    Text(String),
}

impl TryFrom<RawRequest> for Request {
    type Error = ParseRequestError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        match raw {
            RawRequest::Number(value) => Ok(Self::Value(value)),
            RawRequest::Text(text) => text.parse(),
        }
    }
}

impl From<Request> for RawRequest {
    fn from(request: Request) -> Self {
        match request {
            Request::Random => Self::Text("random".to_string()),
            Request::Value(value) => Self::Number(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_columns: usize,
    pub grid_rows: usize,
    /// `None` derives the canvas width from the grid.
    pub canvas_width: Option<u32>,
    /// `None` derives the canvas height from the grid.
    pub canvas_height: Option<u32>,
    pub cell_size: u32,
    pub padding: u32,
    pub top_floor: Request,
    pub bottom_floor: Request,
    pub top_floor_spread: f64,
    pub bottom_floor_spread: f64,
    /// 0 uses `tile_percent`; negative values mean "area minus N".
    pub tile_count: i64,
    pub tile_percent: f64,
    pub seed: Request,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_columns: 50,
            grid_rows: 35,
            canvas_width: None,
            canvas_height: None,
            cell_size: 25,
            padding: 15,
            top_floor: Request::Random,
            bottom_floor: Request::Random,
            top_floor_spread: TOP_FLOOR_SPREAD,
            bottom_floor_spread: BOTTOM_FLOOR_SPREAD,
            tile_count: 0,
            tile_percent: 0.2,
            seed: Request::Random,
        }
    }
}

/// Partial size update; `None` keeps the current value.
///
/// Canvas dimensions use `-1` to hand authority back to the grid size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeRequest {
    pub grid_columns: Option<i64>,
    pub grid_rows: Option<i64>,
    pub canvas_width: Option<i64>,
    pub canvas_height: Option<i64>,
    pub cell_size: Option<i64>,
    pub padding: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn area(self) -> usize {
        self.columns * self.rows
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PaddingSize {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Resolved sizing of the map on its canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub grid: GridSize,
    pub canvas: CanvasSize,
    pub cell_size: u32,
    pub padding: u32,
    pub padding_size: PaddingSize,
}

impl Config {
    /// Applies a size update, clamping each provided value to its minimum.
    pub fn apply_size(&mut self, request: SizeRequest) -> Layout {
        if let Some(cell_size) = request.cell_size {
            self.cell_size = clamp_min(cell_size, i64::from(MIN_CELL_SIZE)) as u32;
        }
        if let Some(columns) = request.grid_columns {
            self.grid_columns = clamp_min(columns, MIN_GRID_CELLS as i64) as usize;
        }
        if let Some(rows) = request.grid_rows {
            self.grid_rows = clamp_min(rows, MIN_GRID_CELLS as i64) as usize;
        }
        if let Some(width) = request.canvas_width {
            self.canvas_width = self.clamp_canvas(width);
        }
        if let Some(height) = request.canvas_height {
            self.canvas_height = self.clamp_canvas(height);
        }
        if let Some(padding) = request.padding {
            self.padding = clamp_min(padding, 0) as u32;
        }
        self.layout()
    }

    /// Derives grid, canvas and padding sizes; one side of each axis is authoritative.
    pub fn layout(&self) -> Layout {
        let cell_size = self.cell_size.max(MIN_CELL_SIZE);
        let min_canvas = cell_size.saturating_mul(MIN_GRID_CELLS as u32);
        let padding = f64::from(self.padding);

        let (columns, width, horizontal) = match self.canvas_width {
            None => {
                let columns = self.grid_columns.max(MIN_GRID_CELLS);
                (columns, derived_extent(columns, cell_size, self.padding), padding)
            }
            Some(width) => {
                let width = width.max(min_canvas);
                let columns = (width / cell_size) as usize;
                (columns, width, f64::from(width - columns as u32 * cell_size) / 2.0)
            }
        };

        let (rows, height, vertical) = match self.canvas_height {
            None => {
                let rows = self.grid_rows.max(MIN_GRID_CELLS);
                (rows, derived_extent(rows, cell_size, self.padding), padding)
            }
            Some(height) => {
                let height = height.max(min_canvas);
                let rows = (height / cell_size) as usize;
                (rows, height, f64::from(height - rows as u32 * cell_size) / 2.0)
            }
        };

        Layout {
            grid: GridSize { columns, rows },
            canvas: CanvasSize { width, height },
            cell_size,
            padding: self.padding,
            padding_size: PaddingSize {
                top: vertical,
                bottom: vertical,
                left: horizontal,
                right: horizontal,
            },
        }
    }

    /// Stores a new tile target, clamping the percent into `[0, 1]`.
    pub fn apply_tile_count(&mut self, count: Option<i64>, percent: Option<f64>) -> (i64, f64) {
        if let Some(count) = count {
            self.tile_count = count;
        }
        if let Some(percent) = percent {
            self.tile_percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 1.0) };
        }
        (self.tile_count, self.tile_percent)
    }

    /// Number of carved tiles each floor must reach for a grid of `area` cells.
    pub fn tile_target(&self, area: usize) -> usize {
        resolve_tile_target(self.tile_count, self.tile_percent, area)
    }

    fn clamp_canvas(&self, requested: i64) -> Option<u32> {
        if requested == -1 {
            return None;
        }
        let minimum = i64::from(self.cell_size.max(MIN_CELL_SIZE)) * MIN_GRID_CELLS as i64;
        Some(requested.clamp(minimum, i64::from(u32::MAX)) as u32)
    }
}

pub fn resolve_tile_target(count: i64, percent: f64, area: usize) -> usize {
    if count == 0 {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 1.0) };
        return (area as f64 * percent).round() as usize;
    }
    let area = area as i64;
    let wanted = if count > 0 { count } else { area.saturating_add(count) };
    wanted.clamp(0, area) as usize
}

/// Resolves a fixed floor request to a signed floor number on one side of ground.
pub(crate) fn fixed_floor(value: i64, upward: bool) -> i32 {
    let magnitude = value.unsigned_abs().min(MAX_FLOORS_PER_SIDE as u64) as i32;
    if upward { magnitude } else { -magnitude }
}

fn derived_extent(cells: usize, cell_size: u32, padding: u32) -> u32 {
    (cells as u32).saturating_mul(cell_size).saturating_add(padding.saturating_mul(2))
}

fn clamp_min(value: i64, minimum: i64) -> i64 {
    value.clamp(minimum, i64::from(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_sizes_below_the_minimum_are_raised() {
        let mut config = Config::default();
        let layout =
            config.apply_size(SizeRequest { grid_columns: Some(3), ..SizeRequest::default() });
        assert_eq!(layout.grid.columns, 6);
        assert_eq!(config.grid_columns, 6);
    }

    #[test]
    fn derived_canvas_adds_padding_on_both_sides() {
        let mut config = Config::default();
        let layout = config.apply_size(SizeRequest {
            grid_columns: Some(10),
            grid_rows: Some(8),
            canvas_width: Some(-1),
            canvas_height: Some(-1),
            cell_size: Some(20),
            padding: Some(5),
        });
        assert_eq!(layout.grid, GridSize { columns: 10, rows: 8 });
        assert_eq!(layout.canvas, CanvasSize { width: 210, height: 170 });
        assert_eq!(layout.padding_size.left, 5.0);
        assert_eq!(layout.padding_size.bottom, 5.0);
    }

    #[test]
    fn explicit_canvas_drives_grid_and_centers_the_remainder() {
        let mut config = Config::default();
        let layout = config.apply_size(SizeRequest {
            canvas_width: Some(215),
            canvas_height: Some(10),
            cell_size: Some(20),
            ..SizeRequest::default()
        });
        assert_eq!(layout.grid.columns, 10);
        assert_eq!(layout.padding_size.left, 7.5);
        assert_eq!(layout.padding_size.right, 7.5);
        // 10px is below six cells, so the height is raised to 120px.
        assert_eq!(layout.canvas.height, 120);
        assert_eq!(layout.grid.rows, 6);
        assert_eq!(layout.padding_size.top, 0.0);
    }

    #[test]
    fn cell_size_and_padding_are_clamped() {
        let mut config = Config::default();
        let layout = config.apply_size(SizeRequest {
            cell_size: Some(1),
            padding: Some(-4),
            ..SizeRequest::default()
        });
        assert_eq!(layout.cell_size, MIN_CELL_SIZE);
        assert_eq!(layout.padding, 0);
    }

    #[test]
    fn tile_targets_follow_count_then_percent() {
        assert_eq!(resolve_tile_target(-1, 0.0, 100), 99);
        assert_eq!(resolve_tile_target(0, 0.3, 100), 30);
        assert_eq!(resolve_tile_target(500, 0.0, 100), 100);
        assert_eq!(resolve_tile_target(-500, 0.0, 100), 0);
        assert_eq!(resolve_tile_target(12, 0.9, 100), 12);
        assert_eq!(resolve_tile_target(0, 0.0, 100), 0);
    }

    #[test]
    fn tile_percent_is_clamped_into_unit_range() {
        let mut config = Config::default();
        assert_eq!(config.apply_tile_count(Some(-1), Some(1.5)), (-1, 1.0));
        assert_eq!(config.apply_tile_count(None, Some(-0.5)), (-1, 0.0));
        assert_eq!(config.apply_tile_count(None, Some(f64::NAN)), (-1, 0.0));
    }

    #[test]
    fn requests_parse_numbers_and_random_keywords() {
        assert_eq!("random".parse::<Request>(), Ok(Request::Random));
        assert_eq!("".parse::<Request>(), Ok(Request::Random));
        assert_eq!(" -3 ".parse::<Request>(), Ok(Request::Value(-3)));
        assert!("tall".parse::<Request>().is_err());
        assert_eq!(Request::Value(4).to_string(), "4");
    }

    #[test]
    fn fixed_floors_take_the_magnitude_on_their_side() {
        assert_eq!(fixed_floor(-3, true), 3);
        assert_eq!(fixed_floor(3, false), -3);
        assert_eq!(fixed_floor(i64::MIN, true), MAX_FLOORS_PER_SIDE);
    }

    #[test]
    fn config_reads_requests_from_json_numbers_and_strings() {
        let config: Config =
            serde_json::from_str(r#"{ "seed": 42, "top_floor": "random", "bottom_floor": -2 }"#)
                .expect("config should deserialize");
        assert_eq!(config.seed, Request::Value(42));
        assert_eq!(config.top_floor, Request::Random);
        assert_eq!(config.bottom_floor, Request::Value(-2));
        assert_eq!(config.grid_columns, 50);
    }
}
