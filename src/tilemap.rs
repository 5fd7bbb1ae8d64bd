/// A dense 2D grid stored row-major in a flat buffer.
///
/// Unlike a world map, dungeon grids do not wrap: every coordinate lookup is
/// checked and off-grid positions come back as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a tilemap by evaluating `f` at every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Flat index of a cell, or `None` when the coordinate is off-grid.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|idx| &self.data[idx])
    }

    /// Write a cell. Returns `false` (and writes nothing) when off-grid.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.data[idx] = value;
                true
            }
            None => false,
        }
    }

    /// In-bounds 8-connected neighbors. Off-grid positions are skipped,
    /// never wrapped or clamped.
    pub fn neighbors_8(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        (-1i32..=1)
            .flat_map(move |dy| (-1i32..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| (x + dx, y + dy))
            .filter(move |&(nx, ny)| self.in_bounds(nx, ny))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}
