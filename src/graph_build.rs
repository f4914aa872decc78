//! Graph construction from adjacency generators
//!
//! A [`NeighborGen`] enumerates the neighbors of one vertex at a time through `first`/`next`;
//! [`graph_build`] drives any generator to fill the arrays of a [`Graph`]. Generators exist for
//! 2D and 3D grids (plain and finite-element stencils), for the nodal adjacency of a mesh, for
//! explicit adjacency lists, and for random graphs.

use fastrand::Rng;

use crate::based::{try_vec, BasedVec};
use crate::defs::Gnum;
use crate::error::{invalid, Result};
use crate::graph::Graph;
use crate::mesh::Mesh;

/// Restartable enumerator of the neighbors of a vertex
///
/// Vertices are numbered from 0. `first(v)` restarts the enumeration on vertex `v` and returns
/// its first neighbor; `next()` returns the following ones. The enumeration state is shared, so
/// only one vertex can be enumerated at a time.
pub trait NeighborGen {
    fn vertnbr(&self) -> Gnum;

    fn first(&mut self, vertnum: Gnum) -> Option<Gnum>;

    fn next(&mut self) -> Option<Gnum>;
}

/// Build a graph with base `baseval` from the adjacency enumerated by `gen`
pub fn graph_build(baseval: Gnum, gen: &mut impl NeighborGen) -> Result<Graph> {
    if baseval != 0 && baseval != 1 {
        invalid!("base value must be 0 or 1, got {baseval}");
    }
    let vertnbr = gen.vertnbr();
    let mut verttab = try_vec(vertnbr as usize)?;
    let mut vendtab = try_vec(vertnbr as usize)?;
    let mut edgetab = Vec::new();
    for v in 0..vertnbr {
        verttab.push(baseval + edgetab.len() as Gnum);
        let mut nghb = gen.first(v);
        while let Some(u) = nghb {
            if u < 0 || u >= vertnbr {
                invalid!("generator produced invalid neighbor {u} for vertex {v}");
            }
            edgetab.push(baseval + u);
            nghb = gen.next();
        }
        vendtab.push(baseval + edgetab.len() as Gnum);
    }
    let graf = Graph::from_parts(
        baseval,
        BasedVec::new(baseval, verttab),
        BasedVec::new(baseval, vendtab),
        BasedVec::new(baseval, edgetab),
        None,
        None,
    );
    Ok(graf)
}

/// Buffered enumeration state shared by the generators
#[derive(Default)]
struct NghbBuf {
    tab: Vec<Gnum>,
    pos: usize,
}

impl NghbBuf {
    fn restart(&mut self) -> Option<Gnum> {
        self.pos = 0;
        self.next()
    }

    fn next(&mut self) -> Option<Gnum> {
        let n = self.tab.get(self.pos).copied();
        self.pos += 1;
        n
    }
}

/// Stencil of a grid: plain (4 or 6 neighbors) or finite-element (8 or 26 neighbors)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stencil {
    Plain,
    Element,
}

/// Neighbor offsets along one dimension, `None` when out of the grid
fn grid_step(x: Gnum, d: Gnum, dim: Gnum, torus: bool) -> Option<Gnum> {
    let y = x + d;
    if (0..dim).contains(&y) {
        Some(y)
    } else if torus && dim > 2 {
        Some(y.rem_euclid(dim))
    } else {
        None
    }
}

/// 2D grid of `dimx * dimy` vertices; vertex `y * dimx + x`
pub struct Grid2Gen {
    pub dimx: Gnum,
    pub dimy: Gnum,
    pub stencil: Stencil,
    pub torus: bool,
    buf: NghbBuf,
}

impl Grid2Gen {
    pub fn new(dimx: Gnum, dimy: Gnum) -> Self {
        Self { dimx, dimy, stencil: Stencil::Plain, torus: false, buf: NghbBuf::default() }
    }

    pub fn stencil(mut self, stencil: Stencil) -> Self {
        self.stencil = stencil;
        self
    }

    pub fn torus(mut self, torus: bool) -> Self {
        self.torus = torus;
        self
    }
}

impl NeighborGen for Grid2Gen {
    fn vertnbr(&self) -> Gnum {
        self.dimx * self.dimy
    }

    fn first(&mut self, vertnum: Gnum) -> Option<Gnum> {
        let (x, y) = (vertnum % self.dimx, vertnum / self.dimx);
        self.buf.tab.clear();
        for dy in -1 as Gnum..=1 {
            for dx in -1 as Gnum..=1 {
                let dist = dx.abs() + dy.abs();
                if dist == 0 || (self.stencil == Stencil::Plain && dist > 1) {
                    continue;
                }
                let (Some(nx), Some(ny)) = (
                    grid_step(x, dx, self.dimx, self.torus),
                    grid_step(y, dy, self.dimy, self.torus),
                ) else {
                    continue;
                };
                let n = ny * self.dimx + nx;
                if n != vertnum && !self.buf.tab.contains(&n) {
                    self.buf.tab.push(n);
                }
            }
        }
        self.buf.tab.sort_unstable();
        self.buf.restart()
    }

    fn next(&mut self) -> Option<Gnum> {
        self.buf.next()
    }
}

/// 3D grid of `dimx * dimy * dimz` vertices; vertex `(z * dimy + y) * dimx + x`
pub struct Grid3Gen {
    pub dimx: Gnum,
    pub dimy: Gnum,
    pub dimz: Gnum,
    pub stencil: Stencil,
    pub torus: bool,
    buf: NghbBuf,
}

impl Grid3Gen {
    pub fn new(dimx: Gnum, dimy: Gnum, dimz: Gnum) -> Self {
        Self { dimx, dimy, dimz, stencil: Stencil::Plain, torus: false, buf: NghbBuf::default() }
    }

    pub fn stencil(mut self, stencil: Stencil) -> Self {
        self.stencil = stencil;
        self
    }

    pub fn torus(mut self, torus: bool) -> Self {
        self.torus = torus;
        self
    }
}

impl NeighborGen for Grid3Gen {
    fn vertnbr(&self) -> Gnum {
        self.dimx * self.dimy * self.dimz
    }

    fn first(&mut self, vertnum: Gnum) -> Option<Gnum> {
        let x = vertnum % self.dimx;
        let y = (vertnum / self.dimx) % self.dimy;
        let z = vertnum / (self.dimx * self.dimy);
        self.buf.tab.clear();
        for dz in -1 as Gnum..=1 {
            for dy in -1 as Gnum..=1 {
                for dx in -1 as Gnum..=1 {
                    let dist = dx.abs() + dy.abs() + dz.abs();
                    if dist == 0 || (self.stencil == Stencil::Plain && dist > 1) {
                        continue;
                    }
                    let (Some(nx), Some(ny), Some(nz)) = (
                        grid_step(x, dx, self.dimx, self.torus),
                        grid_step(y, dy, self.dimy, self.torus),
                        grid_step(z, dz, self.dimz, self.torus),
                    ) else {
                        continue;
                    };
                    let n = (nz * self.dimy + ny) * self.dimx + nx;
                    if n != vertnum && !self.buf.tab.contains(&n) {
                        self.buf.tab.push(n);
                    }
                }
            }
        }
        self.buf.tab.sort_unstable();
        self.buf.restart()
    }

    fn next(&mut self) -> Option<Gnum> {
        self.buf.next()
    }
}

/// Nodal adjacency of a mesh: two nodes are neighbors when they share an element
///
/// Graph vertex `i` is node `vnodbas + i` of the mesh.
pub struct MeshNodeGen<'a> {
    mesh: &'a Mesh,
    marktab: Vec<Gnum>,
    buf: NghbBuf,
}

impl<'a> MeshNodeGen<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh, marktab: vec![-1; mesh.vnodnbr as usize], buf: NghbBuf::default() }
    }
}

impl NeighborGen for MeshNodeGen<'_> {
    fn vertnbr(&self) -> Gnum {
        self.mesh.vnodnbr
    }

    fn first(&mut self, vertnum: Gnum) -> Option<Gnum> {
        let mesh = self.mesh;
        let node = mesh.vnodbas + vertnum;
        self.buf.tab.clear();
        self.marktab[vertnum as usize] = vertnum;
        for &elem in mesh.neighbors(node) {
            for &other in mesh.neighbors(elem) {
                let o = other - mesh.vnodbas;
                if self.marktab[o as usize] != vertnum {
                    self.marktab[o as usize] = vertnum;
                    self.buf.tab.push(o);
                }
            }
        }
        self.buf.tab.sort_unstable();
        self.buf.restart()
    }

    fn next(&mut self) -> Option<Gnum> {
        self.buf.next()
    }
}

/// Explicit adjacency lists, numbered from 0
pub struct AdjListGen {
    adjtab: Vec<Vec<Gnum>>,
    cur: usize,
    pos: usize,
}

impl AdjListGen {
    pub fn new(adjtab: Vec<Vec<Gnum>>) -> Self {
        Self { adjtab, cur: 0, pos: 0 }
    }

    /// Symmetric random graph on `vertnbr` vertices with about `vertnbr * degree / 2` edges
    pub fn random(rng: &mut Rng, vertnbr: Gnum, degree: Gnum) -> Self {
        let mut adjtab = vec![Vec::new(); vertnbr as usize];
        if vertnbr > 1 {
            for _ in 0..(vertnbr * degree / 2) {
                let a = rng.i64(0..vertnbr);
                let b = rng.i64(0..vertnbr);
                if a != b && !adjtab[a as usize].contains(&b) {
                    adjtab[a as usize].push(b);
                    adjtab[b as usize].push(a);
                }
            }
        }
        for adj in adjtab.iter_mut() {
            adj.sort_unstable();
        }
        Self::new(adjtab)
    }
}

impl NeighborGen for AdjListGen {
    fn vertnbr(&self) -> Gnum {
        self.adjtab.len() as Gnum
    }

    fn first(&mut self, vertnum: Gnum) -> Option<Gnum> {
        self.cur = vertnum as usize;
        self.pos = 0;
        self.next()
    }

    fn next(&mut self) -> Option<Gnum> {
        let n = self.adjtab[self.cur].get(self.pos).copied();
        self.pos += 1;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid2_plain() {
        let graf = graph_build(0, &mut Grid2Gen::new(4, 4)).unwrap();
        graf.check().unwrap();
        assert_eq!(graf.vertnbr, 16);
        assert_eq!(graf.edgenbr, 2 * 24);
        assert_eq!(graf.degrmax, 4);
        assert_eq!(graf.neighbors(5), &[1, 4, 6, 9]);
        assert_eq!(graf.neighbors(0), &[1, 4]);
    }

    #[test]
    fn grid2_element_and_torus() {
        let graf = graph_build(1, &mut Grid2Gen::new(3, 3).stencil(Stencil::Element)).unwrap();
        graf.check().unwrap();
        // base 1: vertex 5 is the center, 2 an edge middle, 1 a corner
        assert_eq!(graf.degree(5), 8);
        assert_eq!(graf.degree(2), 5);
        assert_eq!(graf.degree(1), 3);

        let graf = graph_build(0, &mut Grid2Gen::new(4, 3).torus(true)).unwrap();
        graf.check().unwrap();
        assert!(graf.vert_range().all(|v| graf.degree(v) == 4));
    }

    #[test]
    fn grid3() {
        let graf = graph_build(0, &mut Grid3Gen::new(3, 3, 3)).unwrap();
        graf.check().unwrap();
        assert_eq!(graf.degree(13), 6);
        let graf = graph_build(0, &mut Grid3Gen::new(3, 3, 3).stencil(Stencil::Element)).unwrap();
        graf.check().unwrap();
        assert_eq!(graf.degree(13), 26);
        assert_eq!(graf.degree(0), 7);
    }

    #[test]
    fn random_is_symmetric() {
        let mut rng = Rng::with_seed(7);
        let graf = graph_build(0, &mut AdjListGen::random(&mut rng, 50, 4)).unwrap();
        graf.check().unwrap();
        assert_eq!(graf.vertnbr, 50);
    }
}
