//! Node separation state of a mesh
//!
//! Elements belong to part 0 or part 1, nodes to part 0, part 1 or the separator (part 2). A node
//! of part 0 or part 1 may only adjoin elements of its own part. Balance is measured on node
//! loads; `frontab` lists the separator nodes.

use crate::based::BasedVec;
use crate::defs::{Gnum, GraphPart};
use crate::error::{inconsistent, Result};
use crate::mesh::Mesh;

#[derive(Clone, Debug, Default)]
pub struct Vmesh {
    pub m: Mesh,
    /// part of every vertex, elements and nodes
    pub parttax: BasedVec<GraphPart>,
    /// element counts of part 0 and part 1
    pub ecmpsize: [Gnum; 2],
    /// node loads of part 0, part 1 and the separator
    pub ncmpload: [Gnum; 3],
    pub ncmploaddlt: Gnum,
    pub ncmpsize: [Gnum; 2],
    pub fronnbr: Gnum,
    pub frontab: Vec<Gnum>,
    pub levlnum: Gnum,
}

#[derive(Clone, Debug)]
pub struct VmeshStore {
    parttab: Vec<GraphPart>,
    ecmpsize: [Gnum; 2],
    ncmpload: [Gnum; 3],
    ncmploaddlt: Gnum,
    ncmpsize: [Gnum; 2],
    frontab: Vec<Gnum>,
}

impl VmeshStore {
    pub fn quality(&self) -> (Gnum, Gnum) {
        (self.ncmpload[2], self.ncmploaddlt.abs())
    }
}

/// Part of a node from the number of its elements in part 0 and part 1
#[inline]
pub(crate) fn vmesh_node_part(cnttab: [Gnum; 2]) -> GraphPart {
    match cnttab {
        [_, 0] => 0,
        [0, _] => 1,
        _ => 2,
    }
}

impl Vmesh {
    pub fn new(m: Mesh) -> Result<Vmesh> {
        let vertnbr = (m.velmnbr + m.vnodnbr) as usize;
        let parttax = BasedVec::try_from_elem(m.baseval, 0, vertnbr)?;
        let mut meshptr = Vmesh { m, parttax, ..Default::default() };
        meshptr.zero();
        Ok(meshptr)
    }

    /// Put every element and node in part 0
    pub fn zero(&mut self) {
        self.parttax.fill(0);
        self.ecmpsize = [self.m.velmnbr, 0];
        self.ncmpload = [self.m.vnlosum, 0, 0];
        self.ncmploaddlt = self.m.vnlosum;
        self.ncmpsize = [self.m.vnodnbr, 0];
        self.fronnbr = 0;
        self.frontab.clear();
    }

    pub fn quality(&self) -> (Gnum, Gnum) {
        (self.ncmpload[2], self.ncmploaddlt.abs())
    }

    /// Recompute counts, loads and the separator list from the part array
    pub fn update(&mut self) {
        self.ecmpsize = [0; 2];
        for e in self.m.elem_range() {
            self.ecmpsize[self.parttax[e] as usize] += 1;
        }
        self.ncmpload = [0; 3];
        self.ncmpsize = [0; 2];
        self.frontab.clear();
        for n in self.m.node_range() {
            let part = self.parttax[n];
            self.ncmpload[part as usize] += self.m.vnlo(n);
            if part == 2 {
                self.frontab.push(n);
            } else {
                self.ncmpsize[part as usize] += 1;
            }
        }
        self.ncmploaddlt = self.ncmpload[0] - self.ncmpload[1];
        self.fronnbr = self.frontab.len() as Gnum;
    }

    /// Set the part of every node from the parts of its elements, then update
    ///
    /// Nodes without elements go to part 0.
    pub fn update_nodes(&mut self) {
        for n in self.m.node_range() {
            let mut cnttab = [0; 2];
            for &e in self.m.neighbors(n) {
                cnttab[self.parttax[e] as usize] += 1;
            }
            self.parttax[n] = vmesh_node_part(cnttab);
        }
        self.update();
    }

    pub fn store(&self) -> VmeshStore {
        VmeshStore {
            parttab: self.parttax.as_slice().to_vec(),
            ecmpsize: self.ecmpsize,
            ncmpload: self.ncmpload,
            ncmploaddlt: self.ncmploaddlt,
            ncmpsize: self.ncmpsize,
            frontab: self.frontab.clone(),
        }
    }

    pub fn restore(&mut self, store: &VmeshStore) {
        self.parttax.as_mut_slice().copy_from_slice(&store.parttab);
        self.ecmpsize = store.ecmpsize;
        self.ncmpload = store.ncmpload;
        self.ncmploaddlt = store.ncmploaddlt;
        self.ncmpsize = store.ncmpsize;
        self.frontab.clone_from(&store.frontab);
        self.fronnbr = self.frontab.len() as Gnum;
    }

    pub fn check(&self) -> Result<()> {
        if self.parttax.range() != self.m.vert_range() {
            inconsistent!("part array does not cover the vertices");
        }
        let mut ecmpsize = [0; 2];
        for e in self.m.elem_range() {
            let part = self.parttax[e];
            if part > 1 {
                inconsistent!("element {e} in part {part}");
            }
            ecmpsize[part as usize] += 1;
        }
        let mut ncmpload = [0; 3];
        let mut ncmpsize = [0; 2];
        let mut fronnbr = 0;
        for n in self.m.node_range() {
            let part = self.parttax[n];
            if part > 2 {
                inconsistent!("invalid part {part} for node {n}");
            }
            ncmpload[part as usize] += self.m.vnlo(n);
            if part == 2 {
                fronnbr += 1;
                continue;
            }
            ncmpsize[part as usize] += 1;
            if let Some(&e) = self.m.neighbors(n).iter().find(|&&e| self.parttax[e] != part) {
                inconsistent!("node {n} of part {part} adjoins element {e} of the other part");
            }
        }
        if ecmpsize != self.ecmpsize || ncmpsize != self.ncmpsize || ncmpload != self.ncmpload {
            inconsistent!(
                "part sizes {:?}/{:?} or loads {:?} do not match",
                self.ecmpsize,
                self.ncmpsize,
                self.ncmpload
            );
        }
        if self.ncmploaddlt != ncmpload[0] - ncmpload[1] {
            inconsistent!("invalid load imbalance {}", self.ncmploaddlt);
        }
        if fronnbr != self.fronnbr
            || self.frontab.len() as Gnum != fronnbr
            || self.frontab.iter().any(|&n| self.parttax[n] != 2)
        {
            inconsistent!("frontier list does not match the separator");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_follow_their_elements() {
        let mut vmesh = Vmesh::new(Mesh::grid2(0, 2, 1).unwrap()).unwrap();
        vmesh.check().unwrap();
        assert_eq!(vmesh.ncmpsize, [6, 0]);

        vmesh.parttax[1] = 1;
        vmesh.update_nodes();
        vmesh.check().unwrap();
        assert_eq!(vmesh.ecmpsize, [1, 1]);
        assert_eq!(vmesh.ncmpload, [2, 2, 2]);
        assert_eq!(vmesh.frontab, vec![3, 6]);
        assert_eq!(vmesh.quality(), (2, 0));

        let sep = vmesh.store();
        vmesh.zero();
        vmesh.restore(&sep);
        vmesh.check().unwrap();
        assert_eq!(vmesh.fronnbr, 2);

        // a node of part 0 may not touch an element of part 1
        vmesh.parttax[3] = 0;
        vmesh.update();
        assert!(vmesh.check().is_err());
    }
}
