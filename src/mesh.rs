//! Source mesh structure
//!
//! A mesh is a bipartite graph between elements (`velmbas..velmnnd`) and nodes
//! (`vnodbas..vnodnnd`). Both vertex kinds share one vertex numbering starting at `baseval`, one
//! after the other in either order, and one edge array. Elements only adjoin nodes and nodes only
//! adjoin elements.

use std::ops::Range;

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, GNUM_NONE};
use crate::error::{inconsistent, invalid, Result};
use crate::graph::Graph;
use crate::graph_build::{graph_build, MeshNodeGen};

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub baseval: Gnum,
    pub velmnbr: Gnum,
    pub velmbas: Gnum,
    pub velmnnd: Gnum,
    pub vnodnbr: Gnum,
    pub vnodbas: Gnum,
    pub vnodnnd: Gnum,
    /// adjacency bounds of every vertex, elements and nodes
    pub verttax: BasedVec<Gnum>,
    pub vendtax: BasedVec<Gnum>,
    /// element loads, based at `velmbas`
    pub velotax: Option<BasedVec<Gnum>>,
    /// node loads, based at `vnodbas`
    pub vnlotax: Option<BasedVec<Gnum>>,
    pub velosum: Gnum,
    pub vnlosum: Gnum,
    /// number of each node in the original mesh, counted from `baseval`; based at `vnodbas`
    pub vnumtax: Option<BasedVec<Gnum>>,
    /// display labels of all vertices
    pub vlbltax: Option<BasedVec<Gnum>>,
    pub edgenbr: Gnum,
    pub edgetax: BasedVec<Gnum>,
    pub degrmax: Gnum,
}

impl Mesh {
    /// Mesh from its arrays, computing the bounds of both vertex ranges, the sums and the maximum
    /// degree. `verttab`/`vendtab` cover all vertices; elements come first when `elemfirst`.
    pub fn from_parts(
        baseval: Gnum,
        velmnbr: Gnum,
        vnodnbr: Gnum,
        elemfirst: bool,
        verttab: Vec<Gnum>,
        vendtab: Vec<Gnum>,
        edgetab: Vec<Gnum>,
        velotab: Option<Vec<Gnum>>,
        vnlotab: Option<Vec<Gnum>>,
    ) -> Result<Mesh> {
        if baseval != 0 && baseval != 1 {
            invalid!("base value must be 0 or 1, got {baseval}");
        }
        if verttab.len() as Gnum != velmnbr + vnodnbr || vendtab.len() != verttab.len() {
            invalid!("vertex arrays must hold {} entries", velmnbr + vnodnbr);
        }
        if velotab.as_ref().is_some_and(|t| t.len() as Gnum != velmnbr) {
            invalid!("element load array must hold {velmnbr} loads");
        }
        if vnlotab.as_ref().is_some_and(|t| t.len() as Gnum != vnodnbr) {
            invalid!("node load array must hold {vnodnbr} loads");
        }
        let (velmbas, vnodbas) = if elemfirst {
            (baseval, baseval + velmnbr)
        } else {
            (baseval + vnodnbr, baseval)
        };
        let mut mesh = Mesh {
            baseval,
            velmnbr,
            velmbas,
            velmnnd: velmbas + velmnbr,
            vnodnbr,
            vnodbas,
            vnodnnd: vnodbas + vnodnbr,
            verttax: BasedVec::new(baseval, verttab),
            vendtax: BasedVec::new(baseval, vendtab),
            velotax: velotab.map(|t| BasedVec::new(velmbas, t)),
            vnlotax: vnlotab.map(|t| BasedVec::new(vnodbas, t)),
            edgetax: BasedVec::new(baseval, edgetab),
            ..Default::default()
        };
        mesh.update_sums();
        Ok(mesh)
    }

    /// Recompute `edgenbr`, the load sums and `degrmax` from the arrays
    pub fn update_sums(&mut self) {
        self.edgenbr = 0;
        self.degrmax = 0;
        for v in self.vert_range() {
            let degr = self.degree(v);
            self.edgenbr += degr;
            self.degrmax = self.degrmax.max(degr);
        }
        self.velosum = self.velotax.as_ref().map_or(self.velmnbr, |t| t.iter().sum());
        self.vnlosum = self.vnlotax.as_ref().map_or(self.vnodnbr, |t| t.iter().sum());
    }

    /// All vertices, elements and nodes
    #[inline]
    pub fn vert_range(&self) -> Range<Gnum> {
        self.baseval..self.baseval + self.velmnbr + self.vnodnbr
    }

    #[inline]
    pub fn elem_range(&self) -> Range<Gnum> {
        self.velmbas..self.velmnnd
    }

    #[inline]
    pub fn node_range(&self) -> Range<Gnum> {
        self.vnodbas..self.vnodnnd
    }

    #[inline]
    pub fn is_elem(&self, v: Gnum) -> bool {
        (self.velmbas..self.velmnnd).contains(&v)
    }

    #[inline]
    pub fn adj(&self, v: Gnum) -> Range<Gnum> {
        self.verttax[v]..self.vendtax[v]
    }

    #[inline]
    pub fn neighbors(&self, v: Gnum) -> &[Gnum] {
        &self.edgetax[self.adj(v)]
    }

    #[inline]
    pub fn degree(&self, v: Gnum) -> Gnum {
        self.vendtax[v] - self.verttax[v]
    }

    /// Load of element `e`
    #[inline]
    pub fn velo(&self, e: Gnum) -> Gnum {
        self.velotax.as_ref().map_or(1, |t| t[e])
    }

    /// Load of node `n`
    #[inline]
    pub fn vnlo(&self, n: Gnum) -> Gnum {
        self.vnlotax.as_ref().map_or(1, |t| t[n])
    }

    /// Number of node `n` in the original mesh, counted from `baseval`
    #[inline]
    pub fn vnum(&self, n: Gnum) -> Gnum {
        self.vnumtax.as_ref().map_or(n - self.vnodbas + self.baseval, |t| t[n])
    }

    #[inline]
    pub fn vlbl(&self, v: Gnum) -> Gnum {
        self.vlbltax.as_ref().map_or(v, |t| t[v])
    }

    /// Check the structural invariants of the mesh
    pub fn check(&self) -> Result<()> {
        let baseval = self.baseval;
        if baseval != 0 && baseval != 1 {
            inconsistent!("invalid base value {baseval}");
        }
        if self.velmnnd != self.velmbas + self.velmnbr
            || self.vnodnnd != self.vnodbas + self.vnodnbr
        {
            inconsistent!("vertex range bounds do not match vertex counts");
        }
        let elemfirst = self.velmbas == baseval && self.vnodbas == self.velmnnd;
        let nodefirst = self.vnodbas == baseval && self.velmbas == self.vnodnnd;
        if !elemfirst && !nodefirst {
            inconsistent!("element and node ranges must be contiguous from the base value");
        }
        let vertnbr = (self.velmnbr + self.vnodnbr) as usize;
        if self.verttax.len() != vertnbr || self.vendtax.len() != vertnbr {
            inconsistent!("vertex arrays do not hold {vertnbr} entries");
        }
        if self.velotax.as_ref().is_some_and(|t| t.range() != self.elem_range()) {
            inconsistent!("element load array does not match element range");
        }
        if self.vnlotax.as_ref().is_some_and(|t| t.range() != self.node_range())
            || self.vnumtax.as_ref().is_some_and(|t| t.range() != self.node_range())
        {
            inconsistent!("node load or number array does not match node range");
        }

        let edgennd = self.edgetax.end();
        let mut marktax = BasedVec::try_from_elem(baseval, GNUM_NONE, vertnbr)?;
        let mut edgenbr = 0;
        let mut degrmax = 0;
        for v in self.vert_range() {
            let (vert, vend) = (self.verttax[v], self.vendtax[v]);
            if vert < baseval || vend < vert || vend > edgennd {
                inconsistent!("invalid adjacency bounds {vert}..{vend} for vertex {v}");
            }
            edgenbr += vend - vert;
            degrmax = degrmax.max(vend - vert);
            let iselem = self.is_elem(v);
            for &u in self.neighbors(v) {
                let range = if iselem { self.node_range() } else { self.elem_range() };
                if !range.contains(&u) {
                    inconsistent!("vertex {v} adjoins vertex {u} of the same kind or out of range");
                }
                if marktax[u] == v {
                    inconsistent!("duplicate arc from vertex {v} to vertex {u}");
                }
                marktax[u] = v;
                if !self.neighbors(u).contains(&v) {
                    inconsistent!("arc from {v} to {u} has no reverse arc");
                }
            }
        }
        if edgenbr != self.edgenbr {
            inconsistent!("arc count {} != {edgenbr}", self.edgenbr);
        }
        if degrmax > self.degrmax {
            inconsistent!("maximum degree {} below actual {degrmax}", self.degrmax);
        }
        let velosum: Gnum = self.elem_range().map(|e| self.velo(e)).sum();
        let vnlosum: Gnum = self.node_range().map(|n| self.vnlo(n)).sum();
        if self.elem_range().any(|e| self.velo(e) < 0)
            || self.node_range().any(|n| self.vnlo(n) < 0)
        {
            inconsistent!("negative vertex load");
        }
        if velosum != self.velosum || vnlosum != self.vnlosum {
            inconsistent!("load sums {}/{} != {velosum}/{vnlosum}", self.velosum, self.vnlosum);
        }
        Ok(())
    }

    /// Graph of the nodes, two nodes being adjacent when they share an element
    ///
    /// Graph vertex `baseval + i` is node `vnodbas + i`; it carries the node load and number.
    pub fn nodal_graph(&self) -> Result<Graph> {
        let mut graf = graph_build(self.baseval, &mut MeshNodeGen::new(self))?;
        if let Some(vnlotax) = &self.vnlotax {
            graf.velotax = Some(vnlotax.clone().rebased(self.baseval));
        }
        if let Some(vnumtax) = &self.vnumtax {
            graf.vnumtax = Some(vnumtax.clone().rebased(self.baseval));
        }
        graf.update_sums();
        Ok(graf)
    }

    /// Mesh of `dimx * dimy` square elements over a `(dimx + 1) * (dimy + 1)` node grid
    pub fn grid2(baseval: Gnum, dimx: Gnum, dimy: Gnum) -> Result<Mesh> {
        Self::grid(baseval, [dimx, dimy, 1], false)
    }

    /// Mesh of `dimx * dimy * dimz` cubic elements with 8 nodes each
    pub fn grid3(baseval: Gnum, dimx: Gnum, dimy: Gnum, dimz: Gnum) -> Result<Mesh> {
        Self::grid(baseval, [dimx, dimy, dimz], true)
    }

    fn grid(baseval: Gnum, dims: [Gnum; 3], threed: bool) -> Result<Mesh> {
        if dims.iter().any(|&d| d < 1) {
            invalid!("grid dimensions must be positive, got {dims:?}");
        }
        let [dx, dy, dz] = dims;
        let (nx, ny, nz) = (dx + 1, dy + 1, if threed { dz + 1 } else { 1 });
        let velmnbr = dx * dy * dz;
        let vnodnbr = nx * ny * nz;
        let vnodbas = baseval + velmnbr;
        let node = |x: Gnum, y: Gnum, z: Gnum| vnodbas + (z * ny + y) * nx + x;
        let elemdeg = if threed { 8 } else { 4 };

        let mut elemadj: Vec<Vec<Gnum>> = Vec::with_capacity(velmnbr as usize);
        let mut nodeadj: Vec<Vec<Gnum>> = vec![Vec::new(); vnodnbr as usize];
        for z in 0..dz {
            for y in 0..dy {
                for x in 0..dx {
                    let e = baseval + elemadj.len() as Gnum;
                    let mut adj = Vec::with_capacity(elemdeg);
                    for k in 0..if threed { 2 } else { 1 } {
                        for j in 0..2 {
                            for i in 0..2 {
                                adj.push(node(x + i, y + j, z + k));
                            }
                        }
                    }
                    for &n in &adj {
                        nodeadj[(n - vnodbas) as usize].push(e);
                    }
                    elemadj.push(adj);
                }
            }
        }

        let edgenbr = 2 * velmnbr as usize * elemdeg;
        let mut verttab = try_vec(elemadj.len() + nodeadj.len())?;
        let mut vendtab = try_vec(elemadj.len() + nodeadj.len())?;
        let mut edgetab = try_vec(edgenbr)?;
        for adj in elemadj.iter().chain(nodeadj.iter()) {
            verttab.push(baseval + edgetab.len() as Gnum);
            edgetab.extend_from_slice(adj);
            vendtab.push(baseval + edgetab.len() as Gnum);
        }
        Mesh::from_parts(baseval, velmnbr, vnodnbr, true, verttab, vendtab, edgetab, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid2_mesh() {
        let mesh = Mesh::grid2(0, 3, 2).unwrap();
        mesh.check().unwrap();
        assert_eq!(mesh.velmnbr, 6);
        assert_eq!(mesh.vnodnbr, 12);
        assert_eq!(mesh.edgenbr, 2 * 6 * 4);
        // central node of the bottom row touches two elements
        assert_eq!(mesh.degree(mesh.vnodbas + 1), 2);
        assert_eq!(mesh.degree(mesh.vnodbas + 5), 4);
    }

    #[test]
    fn nodal_graph_of_grid3() {
        let mesh = Mesh::grid3(1, 2, 2, 2).unwrap();
        mesh.check().unwrap();
        let graf = mesh.nodal_graph().unwrap();
        graf.check().unwrap();
        assert_eq!(graf.vertnbr, 27);
        // the center node shares an element with every other node
        assert_eq!(graf.degree(1 + 13), 26);
        assert_eq!(graf.degree(1), 7);
    }

    #[test]
    fn check_rejects_same_kind_arcs() {
        // element 0 adjoins element 1
        let mesh = Mesh::from_parts(
            0,
            2,
            1,
            true,
            vec![0, 2, 4],
            vec![2, 4, 6],
            vec![1, 2, 0, 2, 0, 1],
            None,
            None,
        )
        .unwrap();
        assert!(mesh.check().is_err());

        let mesh = Mesh::from_parts(
            0,
            2,
            1,
            false,
            vec![0, 2, 3],
            vec![2, 3, 4],
            vec![1, 2, 0, 0],
            Some(vec![2, 3]),
            None,
        )
        .unwrap();
        mesh.check().unwrap();
        assert_eq!(mesh.velmbas, 1);
        assert_eq!(mesh.velosum, 5);
        assert_eq!(mesh.vnum(0), 0);
    }
}
