//! Level layouts
//!
//! Two shapes of world: the open arena (fixed spawn coordinates) and a tile
//! maze described as ASCII rows. Layouts are static configuration; the
//! simulation reads them but never mutates them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from parsing a maze description
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("maze has no rows")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile glyph {glyph:?} at ({col}, {row})")]
    UnknownGlyph { glyph: char, col: usize, row: usize },

    #[error("maze is missing a {0}")]
    Missing(&'static str),

    #[error("guard route {route} waypoint ({col}, {row}) is not walkable")]
    BlockedWaypoint {
        route: usize,
        col: u32,
        row: u32,
    },
}

/// Typed maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    /// Clothing racks: standing here (not sprinting) hides the player
    Cover,
    /// Holds a timed pickup (the key)
    Interactable,
    Exit,
    Pen,
}

impl TileKind {
    pub fn is_blocking(self) -> bool {
        self == TileKind::Wall
    }
}

/// Row-major tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub cols: usize,
    pub rows: usize,
    pub tile_size: f32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    pub fn new(cols: usize, rows: usize, tile_size: f32, tiles: Vec<TileKind>) -> Self {
        Self {
            cols,
            rows,
            tile_size,
            tiles,
        }
    }

    /// Tile at grid coordinates. Anything outside the grid, or missing from a
    /// short tile list, reads as a wall.
    pub fn tile(&self, col: i32, row: i32) -> TileKind {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return TileKind::Wall;
        }
        self.tiles
            .get(row as usize * self.cols + col as usize)
            .copied()
            .unwrap_or(TileKind::Wall)
    }

    /// Grid cell containing a world position
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    pub fn kind_at(&self, pos: Vec2) -> TileKind {
        let (col, row) = self.cell_of(pos);
        self.tile(col, row)
    }

    pub fn is_blocking_at(&self, pos: Vec2) -> bool {
        self.kind_at(pos).is_blocking()
    }

    /// World-space center of a cell
    pub fn tile_center(&self, col: u32, row: u32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Whether a box of half-extent `half` centered at `center` overlaps a blocking tile.
    /// Edges that merely touch a wall do not count.
    pub fn box_blocked(&self, center: Vec2, half: f32) -> bool {
        let inset = half - 0.01;
        let (c0, r0) = self.cell_of(center - Vec2::splat(inset));
        let (c1, r1) = self.cell_of(center + Vec2::splat(inset));
        for row in r0..=r1 {
            for col in c0..=c1 {
                if self.tile(col, row).is_blocking() {
                    return true;
                }
            }
        }
        false
    }

    /// Sample the straight segment every `step` pixels; false if any sample is blocking
    pub fn line_clear(&self, from: Vec2, to: Vec2, step: f32) -> bool {
        let delta = to - from;
        let total = delta.length();
        if total < f32::EPSILON {
            return !self.is_blocking_at(from);
        }
        let steps = (total / step.max(0.5)).ceil() as usize;
        (0..=steps).all(|i| {
            let t = i as f32 / steps as f32;
            !self.is_blocking_at(from + delta * t)
        })
    }

    /// Centers of all tiles of a kind, in row-major order
    pub fn centers_of(&self, kind: TileKind) -> Vec<Vec2> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == kind)
            .map(|(i, _)| self.tile_center((i % self.cols) as u32, (i / self.cols) as u32))
            .collect()
    }

    /// Mean of the centers of all tiles of a kind
    pub fn centroid_of(&self, kind: TileKind) -> Option<Vec2> {
        let centers = self.centers_of(kind);
        if centers.is_empty() {
            return None;
        }
        let sum: Vec2 = centers.iter().copied().sum();
        Some(sum / centers.len() as f32)
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }
}

/// Open-field layout with fixed spawn points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub player_spawn: Vec2,
    pub horse_spawn: Vec2,
    pub bandit_spawns: Vec<Vec2>,
    pub coin_spawns: Vec<Vec2>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            player_spawn: Vec2::new(50.0, WORLD_HEIGHT - 100.0),
            horse_spawn: Vec2::new(WORLD_WIDTH - 100.0, WORLD_HEIGHT - 100.0),
            bandit_spawns: vec![Vec2::new(300.0, 300.0), Vec2::new(500.0, 200.0)],
            coin_spawns: vec![
                Vec2::new(200.0, 400.0),
                Vec2::new(400.0, 300.0),
                Vec2::new(600.0, 450.0),
                Vec2::new(150.0, 200.0),
                Vec2::new(650.0, 250.0),
            ],
        }
    }
}

/// Tile maze with guard routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeLayout {
    pub map: TileMap,
    pub player_spawn: Vec2,
    pub companion_spawn: Vec2,
    pub key_spawn: Vec2,
    pub coin_spawns: Vec<Vec2>,
    /// Waypoint loops in world space; each guard starts on its first waypoint
    pub guard_routes: Vec<Vec<Vec2>>,
    pub exit_center: Vec2,
}

/// The shipped retail maze.
///
/// `#` wall, `.` floor, `R` clothing rack (cover), `K` key, `$` coin,
/// `P` pen, `F` Flash (inside the pen), `E` exit, `S` player spawn.
pub const DEFAULT_MAZE: [&str; 15] = [
    "####################",
    "#S.....#......R....#",
    "#.###..#.####.R.##.#",
    "#.#$...#....#......#",
    "#.#.####.##.#.####.#",
    "#...R....#..#....#.#",
    "###.##.#.#.###.#.#.#",
    "#...#..#...$...#...#",
    "#.#.#.####.###.#####",
    "#.#...R..#...#.....#",
    "#.#####..#.#.#.###.#",
    "#....K#....#...#PP.#",
    "#.###.#.####.#.#PF.#",
    "#...R...$....#...EE#",
    "####################",
];

/// Guard patrol loops for [`DEFAULT_MAZE`], as tile coordinates
pub const DEFAULT_GUARD_ROUTES: [&[(u32, u32)]; 4] = [
    &[(8, 7), (14, 7)],
    &[(8, 1), (13, 1)],
    &[(12, 13), (1, 13)],
    &[(18, 3), (18, 7)],
];

impl MazeLayout {
    /// The built-in retail maze
    pub fn shipped() -> Result<Self, LevelError> {
        Self::parse(&DEFAULT_MAZE, &DEFAULT_GUARD_ROUTES)
    }

    /// Build a maze from ASCII rows and tile-coordinate guard routes
    pub fn parse(rows: &[&str], routes: &[&[(u32, u32)]]) -> Result<Self, LevelError> {
        let first = rows.first().ok_or(LevelError::Empty)?;
        let cols = first.chars().count();
        let tile_size = TILE_SIZE;

        let mut tiles = Vec::with_capacity(cols * rows.len());
        let mut player_spawn = None;
        let mut companion_spawn = None;
        let mut key_spawn = None;
        let mut coin_spawns = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let center = Vec2::new(
                    (col as f32 + 0.5) * tile_size,
                    (row as f32 + 0.5) * tile_size,
                );
                let kind = match glyph {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Floor,
                    'R' => TileKind::Cover,
                    'E' => TileKind::Exit,
                    'P' => TileKind::Pen,
                    'S' => {
                        player_spawn = Some(center);
                        TileKind::Floor
                    }
                    'F' => {
                        companion_spawn = Some(center);
                        TileKind::Pen
                    }
                    'K' => {
                        key_spawn = Some(center);
                        TileKind::Interactable
                    }
                    '$' => {
                        coin_spawns.push(center);
                        TileKind::Floor
                    }
                    _ => return Err(LevelError::UnknownGlyph { glyph, col, row }),
                };
                tiles.push(kind);
            }
        }

        let map = TileMap::new(cols, rows.len(), tile_size, tiles);
        if map.centers_of(TileKind::Pen).is_empty() {
            return Err(LevelError::Missing("pen"));
        }
        let exit_center = map.centroid_of(TileKind::Exit).ok_or(LevelError::Missing("exit"))?;

        let mut guard_routes = Vec::with_capacity(routes.len());
        for (route_idx, route) in routes.iter().enumerate() {
            let mut waypoints = Vec::with_capacity(route.len());
            for &(col, row) in route.iter() {
                if map.tile(col as i32, row as i32).is_blocking() {
                    return Err(LevelError::BlockedWaypoint {
                        route: route_idx,
                        col,
                        row,
                    });
                }
                waypoints.push(map.tile_center(col, row));
            }
            if !waypoints.is_empty() {
                guard_routes.push(waypoints);
            }
        }

        Ok(Self {
            player_spawn: player_spawn.ok_or(LevelError::Missing("player spawn"))?,
            companion_spawn: companion_spawn.ok_or(LevelError::Missing("companion spawn"))?,
            key_spawn: key_spawn.ok_or(LevelError::Missing("key"))?,
            coin_spawns,
            guard_routes,
            exit_center,
            map,
        })
    }
}

/// World description consumed at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Level {
    Arena(ArenaLayout),
    Maze(MazeLayout),
}

impl Level {
    pub fn map(&self) -> Option<&TileMap> {
        match self {
            Level::Arena(_) => None,
            Level::Maze(maze) => Some(&maze.map),
        }
    }
}
