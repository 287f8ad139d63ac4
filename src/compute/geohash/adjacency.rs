//! Cell adjacency.
//!
//! Neighbours are found by table lookup on the last symbol, recursing into
//! the parent when the symbol sits on the parent's border. Cells touching
//! the antimeridian or a pole are handled first by re-encoding on the far
//! side.

use super::{MAX_HASH_LENGTH, decode_hash, encode_packed, height_degrees, width_degrees};
use crate::compute::base32::{CHARACTERS, char_index};
use crate::error::{GeomemError, Result};
use std::collections::BTreeSet;

/// Tolerance when testing whether a cell edge lies on ±180° or a pole.
const PRECISION: f64 = 1e-12;

/// A compass direction on the hash grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Bottom,
    Top,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Bottom,
        Direction::Top,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Bottom => Direction::Top,
            Direction::Top => Direction::Bottom,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Parity of a hash length; odd-length hashes end on a longitude bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(length: usize) -> Parity {
        if length % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

// Indexed by [Direction as usize][Parity as usize]. The odd rows are the
// even rows of the perpendicular direction.
const NEIGHBOURS: [[&[u8; 32]; 2]; 4] = [
    [
        b"14365h7k9dcfesgujnmqp0r2twvyx8zb",
        b"238967debc01fg45kmstqrwxuvhjyznp",
    ],
    [
        b"p0r21436x8zb9dcf5h7kjnmqesgutwvy",
        b"bc01fg45238967deuvhjyznpkmstqrwx",
    ],
    [
        b"238967debc01fg45kmstqrwxuvhjyznp",
        b"14365h7k9dcfesgujnmqp0r2twvyx8zb",
    ],
    [
        b"bc01fg45238967deuvhjyznpkmstqrwx",
        b"p0r21436x8zb9dcf5h7kjnmqesgutwvy",
    ],
];

const BORDERS: [[&[u8]; 2]; 4] = [
    [b"028b", b"0145hjnp"],
    [b"prxz", b"bcfguvyz"],
    [b"0145hjnp", b"028b"],
    [b"bcfguvyz", b"prxz"],
];

/// Returns the hash of the same length adjacent to `hash` in `direction`.
///
/// Moving right from the last column wraps to the first, and moving past a
/// pole lands on the cell of the same row half a turn of longitude away.
/// Upper-case input is accepted; the result is lower-case.
///
/// ```
/// use geomem::compute::geohash::{Direction, adjacent_hash};
///
/// assert_eq!(adjacent_hash("u1pb", Direction::Top)?, "u1pc");
/// assert_eq!(adjacent_hash("u1pb", Direction::Bottom)?, "u0zz");
/// assert_eq!(adjacent_hash("r", Direction::Right)?, "2");
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn adjacent_hash(hash: &str, direction: Direction) -> Result<String> {
    adjacent_lowercase(&hash.to_ascii_lowercase(), direction)
}

fn adjacent_lowercase(hash: &str, direction: Direction) -> Result<String> {
    if hash.is_empty() {
        return Err(GeomemError::EmptyHash);
    }
    let length = hash.chars().count();
    if length > MAX_HASH_LENGTH {
        return Err(GeomemError::invalid_argument(format!(
            "Hash length must be at most {}, got: {}",
            MAX_HASH_LENGTH, length
        )));
    }

    if let Some(wrapped) = wrap_around_edge(hash, length, direction)? {
        return Ok(wrapped);
    }

    let mut chars = hash.chars();
    let last = match chars.next_back() {
        Some(c) => c,
        None => return Err(GeomemError::EmptyHash),
    };
    char_index(last)?;
    let last = last as u8;
    let base = chars.as_str();

    let (d, p) = (direction as usize, Parity::of(length) as usize);
    let mut adjacent = if !base.is_empty() && BORDERS[d][p].contains(&last) {
        adjacent_lowercase(base, direction)?
    } else {
        base.to_string()
    };
    // every alphabet symbol appears once in each neighbour row
    if let Some(index) = NEIGHBOURS[d][p].iter().position(|&c| c == last) {
        adjacent.push(CHARACTERS[index] as char);
    }
    Ok(adjacent)
}

fn wrap_around_edge(hash: &str, length: usize, direction: Direction) -> Result<Option<String>> {
    let centre = decode_hash(hash)?;
    let (lat, lon) = (centre.lat(), centre.lon());
    let half_width = width_degrees(length) / 2.0;
    let half_height = height_degrees(length) / 2.0;

    let wrapped = match direction {
        Direction::Right if (lon + half_width - 180.0).abs() < PRECISION => {
            Some(encode_packed(lat, -180.0, length))
        }
        Direction::Left if (lon - half_width + 180.0).abs() < PRECISION => {
            Some(encode_packed(lat, 180.0, length))
        }
        Direction::Top if (lat + half_height - 90.0).abs() < PRECISION => {
            Some(encode_packed(lat, lon + 180.0, length))
        }
        Direction::Bottom if (lat - half_height + 90.0).abs() < PRECISION => {
            Some(encode_packed(lat, lon + 180.0, length))
        }
        _ => None,
    };
    Ok(wrapped.map(|hash| hash.to_string()))
}

/// Walks `steps` cells in `direction`; negative steps walk the opposite
/// way.
pub fn adjacent_hash_steps(hash: &str, direction: Direction, steps: i32) -> Result<String> {
    if steps < 0 {
        return adjacent_hash_steps(hash, direction.opposite(), -steps);
    }
    let mut current = hash.to_string();
    for _ in 0..steps {
        current = adjacent_hash(&current, direction)?;
    }
    Ok(current)
}

pub fn left(hash: &str) -> Result<String> {
    adjacent_hash(hash, Direction::Left)
}

pub fn right(hash: &str) -> Result<String> {
    adjacent_hash(hash, Direction::Right)
}

pub fn top(hash: &str) -> Result<String> {
    adjacent_hash(hash, Direction::Top)
}

pub fn bottom(hash: &str) -> Result<String> {
    adjacent_hash(hash, Direction::Bottom)
}

/// The eight surrounding cells in the order left, right, top, bottom,
/// left-top, left-bottom, right-top, right-bottom.
pub fn neighbours(hash: &str) -> Result<[String; 8]> {
    let left = left(hash)?;
    let right = right(hash)?;
    let (left_top, left_bottom) = (top(&left)?, bottom(&left)?);
    let (right_top, right_bottom) = (top(&right)?, bottom(&right)?);
    Ok([
        left,
        right,
        top(hash)?,
        bottom(hash)?,
        left_top,
        left_bottom,
        right_top,
        right_bottom,
    ])
}

/// Renders the cells around `hash` as text, one row per line from north to
/// south. Offsets count cells to the right and downwards; cells in
/// `highlight` are upper-cased.
pub fn grid_as_string(
    hash: &str,
    from_right: i32,
    from_bottom: i32,
    to_right: i32,
    to_bottom: i32,
    highlight: &BTreeSet<String>,
) -> Result<String> {
    let mut grid = String::new();
    for down in from_bottom..=to_bottom {
        let mut row = Vec::new();
        for across in from_right..=to_right {
            let cell = adjacent_hash_steps(hash, Direction::Right, across)?;
            let cell = adjacent_hash_steps(&cell, Direction::Bottom, down)?;
            if highlight.contains(&cell) {
                row.push(cell.to_uppercase());
            } else {
                row.push(cell);
            }
        }
        grid.push_str(&row.join(" "));
        grid.push('\n');
    }
    Ok(grid)
}

/// A square grid of `size` cells on every side of `hash`.
///
/// ```
/// use geomem::compute::geohash::grid_as_string_around;
/// use std::collections::BTreeSet;
///
/// let highlight = BTreeSet::from(["dr".to_string()]);
/// assert_eq!(
///     grid_as_string_around("dr", 1, &highlight)?,
///     "f0 f2 f8\ndp DR dx\ndn dq dw\n"
/// );
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn grid_as_string_around(hash: &str, size: i32, highlight: &BTreeSet<String>) -> Result<String> {
    grid_as_string(hash, -size, -size, size, size, highlight)
}
