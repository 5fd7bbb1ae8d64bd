//! Chunk meshing
//!
//! Every alive cell becomes a floor quad, and every side of it that faces a
//! dead cell becomes a wall quad. Neighbors across the chunk edge are read from
//! the bordered view, so two adjacent chunks agree on which boundary walls
//! exist and no seam or double wall appears between them.
//!
//! Coordinates: grid x maps to world x, grid y maps to world z, and walls rise
//! along +y. All geometry is chunk-local; add [`ChunkMesh::offset`] to place it.

use rayon::prelude::*;

use crate::cell::CellState;
use crate::chunks::{build_border, BorderedChunk, Chunk, ChunkCoord, ChunkGrid};

/// Geometry scale for meshing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSettings {
    /// Edge length of one cell in world units
    pub cell_size: f32,
    /// Height of wall quads in world units
    pub wall_height: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            wall_height: 1.0,
        }
    }
}

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const WINDING: [u32; 6] = [2, 1, 0, 3, 2, 0];
const WINDING_REVERSED: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex, index and UV buffers for one surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    /// One flat normal per vertex, matching the triangle winding
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `f32` slice, ready for a vertex buffer upload.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uvs_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Append a quad with corners in bottom-left, bottom-right, top-right,
    /// top-left order and two triangles given by `winding`.
    fn push_quad(&mut self, corners: [[f32; 3]; 4], winding: &[u32; 6]) {
        let base = self.positions.len() as u32;
        let normal = face_normal(corners[winding[0] as usize], corners[winding[1] as usize], corners[winding[2] as usize]);

        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.uvs.extend_from_slice(&QUAD_UVS);
        self.indices.extend(winding.iter().map(|i| base + i));
    }
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// Floor and wall geometry of one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub coord: Option<ChunkCoord>,
    /// World-space position of the chunk origin
    pub offset: [f32; 3],
    pub floor: MeshBuffers,
    pub walls: MeshBuffers,
}

/// Axis a wall quad runs along.
#[derive(Clone, Copy)]
enum WallAxis {
    /// Spans one cell along world z (west/east faces)
    Z,
    /// Spans one cell along world x (south/north faces)
    X,
}

fn has_floor(state: CellState) -> bool {
    match state {
        CellState::Alive => true,
        CellState::Dead | CellState::Visited | CellState::Corridor | CellState::DeadEnd => false,
    }
}

fn is_dead(state: CellState) -> bool {
    match state {
        CellState::Dead => true,
        CellState::Alive | CellState::Visited | CellState::Corridor | CellState::DeadEnd => false,
    }
}

struct ChunkMesher<'a> {
    chunk: &'a Chunk,
    border: &'a BorderedChunk,
    settings: MeshSettings,
    floor: MeshBuffers,
    walls: MeshBuffers,
}

impl ChunkMesher<'_> {
    /// Whether the neighbor at chunk-local `(x, y)` is dead. Cells outside the
    /// chunk come from the border ring.
    fn neighbor_dead(&self, x: i32, y: i32) -> bool {
        let state = match self.chunk.get(x, y) {
            Some(state) => Some(state),
            None => self.border.get(x, y),
        };
        state.map_or(true, is_dead)
    }

    fn add_floor(&mut self, x: i32, y: i32) {
        let s = self.settings.cell_size;
        let (x0, z0) = (x as f32 * s, y as f32 * s);
        let (x1, z1) = (x0 + s, z0 + s);
        self.floor.push_quad(
            [[x0, 0.0, z0], [x1, 0.0, z0], [x1, 0.0, z1], [x0, 0.0, z1]],
            &WINDING,
        );
    }

    /// Wall quad whose bottom edge starts at cell corner `(x, y)`.
    fn add_wall(&mut self, x: i32, y: i32, axis: WallAxis, reversed: bool) {
        let s = self.settings.cell_size;
        let h = self.settings.wall_height;
        let (x0, z0) = (x as f32 * s, y as f32 * s);
        let (x1, z1) = match axis {
            WallAxis::Z => (x0, z0 + s),
            WallAxis::X => (x0 + s, z0),
        };
        let winding = if reversed { &WINDING_REVERSED } else { &WINDING };
        self.walls.push_quad(
            [[x0, 0.0, z0], [x1, 0.0, z1], [x1, h, z1], [x0, h, z0]],
            winding,
        );
    }

    fn add_walls(&mut self, x: i32, y: i32) {
        if self.neighbor_dead(x - 1, y) {
            self.add_wall(x, y, WallAxis::Z, false);
        }
        if self.neighbor_dead(x + 1, y) {
            self.add_wall(x + 1, y, WallAxis::Z, true);
        }
        if self.neighbor_dead(x, y - 1) {
            self.add_wall(x, y, WallAxis::X, true);
        }
        if self.neighbor_dead(x, y + 1) {
            self.add_wall(x, y + 1, WallAxis::X, false);
        }
    }

    fn build(mut self) -> ChunkMesh {
        let n = self.chunk.size as i32;
        for y in 0..n {
            for x in 0..n {
                if self.chunk.get(x, y).is_some_and(has_floor) {
                    self.add_floor(x, y);
                    self.add_walls(x, y);
                }
            }
        }

        ChunkMesh {
            coord: Some(self.chunk.coord),
            offset: self.chunk.world_offset(self.settings.cell_size),
            floor: self.floor,
            walls: self.walls,
        }
    }
}

/// Mesh a single chunk against its bordered view.
pub fn mesh_chunk(chunk: &Chunk, border: &BorderedChunk, settings: MeshSettings) -> ChunkMesh {
    ChunkMesher {
        chunk,
        border,
        settings,
        floor: MeshBuffers::default(),
        walls: MeshBuffers::default(),
    }
    .build()
}

/// Mesh every chunk. Borders are built up front; the chunks are then meshed in
/// parallel. Output order matches [`ChunkGrid::iter`].
pub fn mesh_all(chunks: &ChunkGrid, settings: MeshSettings) -> Vec<ChunkMesh> {
    let jobs: Vec<(&Chunk, BorderedChunk)> = chunks
        .iter()
        .filter_map(|chunk| build_border(chunks, chunk.coord.x, chunk.coord.y).map(|b| (chunk, b)))
        .collect();

    jobs.par_iter()
        .map(|(chunk, border)| mesh_chunk(chunk, border, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::split_in_chunks;
    use crate::grid::OccupancyGrid;

    fn mesh_grid(rows: &[&str], chunk_size: usize) -> Vec<ChunkMesh> {
        let grid = OccupancyGrid::from_ascii(rows);
        mesh_all(&split_in_chunks(&grid, chunk_size), MeshSettings::default())
    }

    fn total_walls(meshes: &[ChunkMesh]) -> usize {
        meshes.iter().map(|m| m.walls.quad_count()).sum()
    }

    #[test]
    fn test_isolated_cell() {
        let meshes = mesh_grid(&["...", ".#.", "..."], 3);
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.floor.quad_count(), 1);
        assert_eq!(mesh.floor.triangle_count(), 2);
        assert_eq!(mesh.walls.quad_count(), 4);
        assert_eq!(mesh.walls.triangle_count(), 8);
    }

    #[test]
    fn test_single_cell_grid() {
        let meshes = mesh_grid(&["#"], 1);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].floor.quad_count(), 1);
        assert_eq!(meshes[0].walls.quad_count(), 4);
    }

    #[test]
    fn test_no_interior_walls() {
        // A 2x2 room has only its 8 perimeter walls
        let meshes = mesh_grid(&["....", ".##.", ".##.", "...."], 4);
        assert_eq!(meshes[0].floor.quad_count(), 4);
        assert_eq!(total_walls(&meshes), 8);
    }

    #[test]
    fn test_no_seams_across_chunks() {
        let rows = ["......", ".####.", ".####.", ".####.", ".####.", "......"];
        let whole = mesh_grid(&rows, 6);
        for chunk_size in [1, 2, 3, 4] {
            let split = mesh_grid(&rows, chunk_size);
            assert_eq!(total_walls(&split), total_walls(&whole), "chunk size {}", chunk_size);
        }
        assert_eq!(total_walls(&whole), 16);
    }

    #[test]
    fn test_grid_edge_gets_walls() {
        // Alive cells touching the grid boundary are closed off
        let meshes = mesh_grid(&["##", "##"], 1);
        assert_eq!(meshes.len(), 4);
        assert_eq!(total_walls(&meshes), 8);
    }

    #[test]
    fn test_markers_do_not_get_floors_or_walls() {
        let mut grid = OccupancyGrid::from_ascii(&["##"]);
        grid.set(1, 0, CellState::Visited).unwrap();
        let meshes = mesh_all(&split_in_chunks(&grid, 2), MeshSettings::default());
        assert_eq!(meshes[0].floor.quad_count(), 1);
        // No wall between the alive cell and the visited one
        assert_eq!(meshes[0].walls.quad_count(), 3);
    }

    #[test]
    fn test_geometry_scale_and_offset() {
        let grid = OccupancyGrid::from_ascii(&["....", "....", "...#", "...."]);
        let settings = MeshSettings {
            cell_size: 2.0,
            wall_height: 5.0,
        };
        let meshes = mesh_all(&split_in_chunks(&grid, 2), settings);
        let mesh = meshes.iter().find(|m| !m.floor.is_empty()).unwrap();

        assert_eq!(mesh.coord, Some(ChunkCoord { x: 1, y: 1 }));
        assert_eq!(mesh.offset, [4.0, 0.0, 4.0]);
        assert_eq!(mesh.floor.positions[0], [2.0, 0.0, 0.0]);
        assert_eq!(mesh.floor.positions[2], [4.0, 0.0, 2.0]);
        let top = mesh.walls.positions.iter().map(|p| p[1]).fold(0.0f32, f32::max);
        assert_eq!(top, 5.0);
        assert_eq!(mesh.floor.positions_flat().len(), 12);
        assert_eq!(mesh.floor.uvs_flat(), &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normals_face_the_open_cell() {
        let meshes = mesh_grid(&["...", ".#.", "..."], 3);
        let mesh = &meshes[0];
        assert!(mesh.floor.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));

        // Cell (1, 1) spans [1, 2] on x and z; its center is (1.5, 1.5)
        for quad in 0..mesh.walls.quad_count() {
            let corner = mesh.walls.positions[quad * 4];
            let normal = mesh.walls.normals[quad * 4];
            let to_center = [1.5 - corner[0], 1.5 - corner[2]];
            let dot = normal[0] * to_center[0] + normal[2] * to_center[1];
            assert!(dot > 0.0, "wall {} faces away from the floor", quad);
            assert_eq!(normal[1], 0.0);
        }
    }
}
