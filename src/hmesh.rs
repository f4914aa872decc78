//! Halo meshes
//!
//! A halo mesh is a mesh whose last nodes, from `vnohnnd` on, form a halo. Halo nodes border the
//! part of the mesh being ordered and are not ordered themselves; elements are never halo. When
//! halo nodes exist, elements are numbered before nodes, and the adjacency of every element lists
//! its non-halo nodes first, up to `vehdtax[e]`, then its halo nodes.

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, GNUM_NONE};
use crate::error::{inconsistent, Result};
use crate::graph::Graph;
use crate::hgraph::Hgraph;
use crate::mesh::Mesh;

#[derive(Clone, Debug, Default)]
pub struct Hmesh {
    /// whole mesh, halo nodes included
    pub m: Mesh,
    /// end of the non-halo part of the adjacency of every element, based at `velmbas`
    pub vehdtax: BasedVec<Gnum>,
    /// number of elements adjoining halo nodes only
    pub veihnbr: Gnum,
    pub vnohnbr: Gnum,
    /// `vnodbas + vnohnbr`, first halo node
    pub vnohnnd: Gnum,
    /// load of the non-halo nodes
    pub vnhlsum: Gnum,
    /// number of arcs between elements and non-halo nodes, both directions counted
    pub enohnbr: Gnum,
    pub levlnum: Gnum,
}

impl Hmesh {
    /// Halo mesh without halo
    pub fn from_mesh(m: Mesh) -> Hmesh {
        let vehdtax = m.vendtax.sub(m.elem_range());
        let veihnbr = m.elem_range().filter(|&e| m.degree(e) == 0).count() as Gnum;
        Hmesh {
            vehdtax,
            veihnbr,
            vnohnbr: m.vnodnbr,
            vnohnnd: m.vnodnnd,
            vnhlsum: m.vnlosum,
            enohnbr: m.edgenbr,
            levlnum: 0,
            m,
        }
    }

    #[inline]
    pub fn vnoh_range(&self) -> std::ops::Range<Gnum> {
        self.m.vnodbas..self.vnohnnd
    }

    #[inline]
    pub fn is_halo(&self, n: Gnum) -> bool {
        n >= self.vnohnnd && n < self.m.vnodnnd
    }

    /// Non-halo nodes of element `e`
    #[inline]
    pub fn nohalo_neighbors(&self, e: Gnum) -> &[Gnum] {
        &self.m.edgetax[self.m.verttax[e]..self.vehdtax[e]]
    }

    /// Mesh made of the elements and the non-halo nodes
    ///
    /// Elements and non-halo nodes keep their numbers.
    pub fn mesh_view(&self) -> Result<Mesh> {
        if self.vnohnbr == self.m.vnodnbr {
            return Ok(self.m.clone());
        }
        let baseval = self.m.baseval;
        let mut vendtab = try_vec((self.vnohnnd - baseval) as usize)?;
        vendtab.extend_from_slice(self.vehdtax.as_slice());
        vendtab.extend_from_slice(&self.m.vendtax[self.vnoh_range()]);
        let mut mesh = Mesh {
            baseval,
            velmnbr: self.m.velmnbr,
            velmbas: self.m.velmbas,
            velmnnd: self.m.velmnnd,
            vnodnbr: self.vnohnbr,
            vnodbas: self.m.vnodbas,
            vnodnnd: self.vnohnnd,
            verttax: self.m.verttax.sub(baseval..self.vnohnnd),
            vendtax: BasedVec::new(baseval, vendtab),
            velotax: self.m.velotax.clone(),
            vnlotax: self.m.vnlotax.as_ref().map(|t| t.sub(self.vnoh_range())),
            vnumtax: self.m.vnumtax.as_ref().map(|t| t.sub(self.vnoh_range())),
            edgetax: self.m.edgetax.clone(),
            ..Default::default()
        };
        mesh.update_sums();
        Ok(mesh)
    }

    /// Halo graph of the nodes, two nodes being adjacent when they share an element
    ///
    /// Graph vertex `baseval + i` is node `vnodbas + i`, so that halo nodes become halo vertices.
    /// Arcs between two halo nodes are dropped.
    pub fn nodal_hgraph(&self) -> Result<Hgraph> {
        let mesh = &self.m;
        let baseval = mesh.baseval;
        let vnodnbr = mesh.vnodnbr as usize;
        let offset = mesh.vnodbas - baseval;
        let vnohnnd = baseval + self.vnohnbr;

        let mut marktax = BasedVec::try_from_elem(mesh.vnodbas, GNUM_NONE, vnodnbr)?;
        let mut verttab = try_vec(vnodnbr)?;
        let mut vendtab = try_vec(vnodnbr)?;
        let mut vnhdtab = try_vec(self.vnohnbr as usize)?;
        let mut edgetab: Vec<Gnum> = Vec::new();
        let mut halotab: Vec<Gnum> = Vec::new();
        let mut enohnbr = 0;
        for n in mesh.node_range() {
            let halo = self.is_halo(n);
            verttab.push(baseval + edgetab.len() as Gnum);
            halotab.clear();
            marktax[n] = n;
            for &e in mesh.neighbors(n) {
                for &u in mesh.neighbors(e) {
                    if marktax[u] == n {
                        continue;
                    }
                    marktax[u] = n;
                    if !self.is_halo(u) {
                        edgetab.push(u - offset);
                    } else if !halo {
                        halotab.push(u - offset);
                    }
                }
            }
            if !halo {
                vnhdtab.push(baseval + edgetab.len() as Gnum);
                enohnbr += baseval + edgetab.len() as Gnum - verttab[verttab.len() - 1];
                edgetab.extend_from_slice(&halotab);
            }
            vendtab.push(baseval + edgetab.len() as Gnum);
        }

        let mut s = Graph::from_parts(
            baseval,
            BasedVec::new(baseval, verttab),
            BasedVec::new(baseval, vendtab),
            BasedVec::new(baseval, edgetab),
            mesh.vnlotax.as_ref().map(|t| t.clone().rebased(baseval)),
            None,
        );
        s.vnumtax = Some(BasedVec::new(
            baseval,
            mesh.node_range().map(|n| mesh.vnum(n)).collect(),
        ));
        let grafptr = Hgraph {
            s,
            vnohnbr: self.vnohnbr,
            vnohnnd,
            vnhdtax: BasedVec::new(baseval, vnhdtab),
            vnlosum: self.vnhlsum,
            enohnbr,
            enlosum: enohnbr,
            levlnum: self.levlnum,
        };

        #[cfg(debug_assertions)]
        grafptr.check()?;
        Ok(grafptr)
    }

    /// Check the halo invariants on top of the mesh ones
    pub fn check(&self) -> Result<()> {
        self.m.check()?;
        let mesh = &self.m;
        if self.vnohnbr < 0
            || self.vnohnbr > mesh.vnodnbr
            || self.vnohnnd != mesh.vnodbas + self.vnohnbr
        {
            inconsistent!("invalid non-halo node count {}", self.vnohnbr);
        }
        if self.vnohnbr < mesh.vnodnbr && mesh.velmbas != mesh.baseval {
            inconsistent!("halo mesh must number elements before nodes");
        }
        if self.vehdtax.range() != mesh.elem_range() {
            inconsistent!("non-halo end array does not cover the elements");
        }
        let mut veihnbr = 0;
        let mut enohnbr = 0;
        for e in mesh.elem_range() {
            let vehd = self.vehdtax[e];
            if vehd < mesh.verttax[e] || vehd > mesh.vendtax[e] {
                inconsistent!("non-halo end of element {e} out of its adjacency");
            }
            if self.nohalo_neighbors(e).iter().any(|&n| self.is_halo(n)) {
                inconsistent!("halo node in the non-halo adjacency of element {e}");
            }
            if mesh.edgetax[vehd..mesh.vendtax[e]].iter().any(|&n| !self.is_halo(n)) {
                inconsistent!("non-halo node in the halo adjacency of element {e}");
            }
            if vehd == mesh.verttax[e] {
                veihnbr += 1;
            }
            enohnbr += 2 * (vehd - mesh.verttax[e]);
        }
        let vnhlsum: Gnum = self.vnoh_range().map(|n| mesh.vnlo(n)).sum();
        if veihnbr != self.veihnbr || enohnbr != self.enohnbr || vnhlsum != self.vnhlsum {
            inconsistent!("non-halo counts do not match the arrays");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mesh_has_no_halo() {
        let hmesh = Hmesh::from_mesh(Mesh::grid2(1, 3, 2).unwrap());
        hmesh.check().unwrap();
        assert_eq!(hmesh.vnohnbr, 12);
        assert_eq!(hmesh.veihnbr, 0);
        assert_eq!(hmesh.enohnbr, 48);
        let view = hmesh.mesh_view().unwrap();
        view.check().unwrap();
        assert_eq!(view.edgenbr, 48);
    }

    #[test]
    fn nodal_hgraph_matches_nodal_graph() {
        let mesh = Mesh::grid2(0, 3, 3).unwrap();
        let graf = mesh.nodal_graph().unwrap();
        let hgraf = Hmesh::from_mesh(mesh).nodal_hgraph().unwrap();
        hgraf.check().unwrap();
        assert_eq!(hgraf.vnohnbr, 16);
        assert_eq!(hgraf.s.edgenbr, graf.edgenbr);
        for v in graf.vert_range() {
            let mut adj = hgraf.s.neighbors(v).to_vec();
            adj.sort_unstable();
            let mut exp = graf.neighbors(v).to_vec();
            exp.sort_unstable();
            assert_eq!(adj, exp);
            assert_eq!(hgraf.s.vnum(v), v);
        }
    }

    #[test]
    fn halo_nodes_are_cut_from_the_view() {
        let orgmesh = Hmesh::from_mesh(Mesh::grid2(0, 3, 1).unwrap());
        // left element and its two left nodes; its right nodes become halo
        let mut parttax = BasedVec::from_elem(0, 1, 3 + 8);
        parttax[0] = 0;
        for n in [3, 7] {
            parttax[n] = 0;
        }
        for n in [4, 8] {
            parttax[n] = 2;
        }
        let hmesh = orgmesh.induce_part(&parttax, 0).unwrap();
        hmesh.check().unwrap();
        assert_eq!(hmesh.m.velmnbr, 1);
        assert_eq!(hmesh.vnohnbr, 2);
        assert_eq!(hmesh.m.vnodnbr, 4);
        let view = hmesh.mesh_view().unwrap();
        view.check().unwrap();
        assert_eq!(view.vnodnbr, 2);
        assert_eq!(view.edgenbr, 4);

        let hgraf = hmesh.nodal_hgraph().unwrap();
        hgraf.check().unwrap();
        assert_eq!(hgraf.vnohnbr, 2);
        // both halo nodes adjoin both non-halo nodes, and not each other
        assert_eq!(hgraf.s.edgenbr, 2 + 2 * 4);
        let vnums: Vec<Gnum> = hgraf.s.vert_range().map(|v| hgraf.s.vnum(v)).collect();
        assert_eq!(vnums, vec![0, 4, 1, 5]);
    }
}
