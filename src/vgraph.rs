//! Vertex separation state of a graph
//!
//! Every vertex carries a part: 0, 1, or 2 for the separator. No arc may join part 0 and part 1.
//! `frontab` lists the separator vertices.

use crate::based::BasedVec;
use crate::defs::{Gnum, GraphPart};
use crate::error::{inconsistent, Result};
use crate::graph::Graph;

#[derive(Clone, Debug, Default)]
pub struct Vgraph {
    pub s: Graph,
    pub parttax: BasedVec<GraphPart>,
    /// loads of part 0, part 1 and the separator
    pub compload: [Gnum; 3],
    /// `compload[0] - compload[1]`
    pub comploaddlt: Gnum,
    /// vertex counts of part 0 and part 1
    pub compsize: [Gnum; 2],
    pub fronnbr: Gnum,
    pub frontab: Vec<Gnum>,
    pub levlnum: Gnum,
}

/// Snapshot of a separation, used to try two strategies from the same start
#[derive(Clone, Debug)]
pub struct VgraphStore {
    parttab: Vec<GraphPart>,
    compload: [Gnum; 3],
    comploaddlt: Gnum,
    compsize: [Gnum; 2],
    frontab: Vec<Gnum>,
}

impl VgraphStore {
    /// Separator load, then imbalance, of the stored separation; lower is better
    pub fn quality(&self) -> (Gnum, Gnum) {
        (self.compload[2], self.comploaddlt.abs())
    }
}

impl Vgraph {
    /// Separation state of `s` with every vertex in part 0
    pub fn new(s: Graph) -> Result<Vgraph> {
        let parttax = BasedVec::try_from_elem(s.baseval, 0, s.vertnbr as usize)?;
        let mut grafptr = Vgraph { s, parttax, ..Default::default() };
        grafptr.zero();
        Ok(grafptr)
    }

    /// Put every vertex in part 0
    pub fn zero(&mut self) {
        self.parttax.fill(0);
        self.compload = [self.s.velosum, 0, 0];
        self.comploaddlt = self.s.velosum;
        self.compsize = [self.s.vertnbr, 0];
        self.fronnbr = 0;
        self.frontab.clear();
    }

    pub fn quality(&self) -> (Gnum, Gnum) {
        (self.compload[2], self.comploaddlt.abs())
    }

    /// Recompute loads, sizes and the separator list from the part array
    pub fn update(&mut self) {
        self.compload = [0; 3];
        self.compsize = [0; 2];
        self.frontab.clear();
        for v in self.s.vert_range() {
            let part = self.parttax[v];
            self.compload[part as usize] += self.s.velo(v);
            if part == 2 {
                self.frontab.push(v);
            } else {
                self.compsize[part as usize] += 1;
            }
        }
        self.comploaddlt = self.compload[0] - self.compload[1];
        self.fronnbr = self.frontab.len() as Gnum;
    }

    pub fn store(&self) -> VgraphStore {
        VgraphStore {
            parttab: self.parttax.as_slice().to_vec(),
            compload: self.compload,
            comploaddlt: self.comploaddlt,
            compsize: self.compsize,
            frontab: self.frontab.clone(),
        }
    }

    pub fn restore(&mut self, store: &VgraphStore) {
        self.parttax.as_mut_slice().copy_from_slice(&store.parttab);
        self.compload = store.compload;
        self.comploaddlt = store.comploaddlt;
        self.compsize = store.compsize;
        self.frontab.clone_from(&store.frontab);
        self.fronnbr = self.frontab.len() as Gnum;
    }

    /// Check the separation invariants
    pub fn check(&self) -> Result<()> {
        if self.parttax.range() != self.s.vert_range() {
            inconsistent!("part array does not cover the vertices");
        }
        let mut compload = [0; 3];
        let mut compsize = [0; 2];
        let mut fronnbr = 0;
        for v in self.s.vert_range() {
            let part = self.parttax[v];
            if part > 2 {
                inconsistent!("invalid part {part} for vertex {v}");
            }
            compload[part as usize] += self.s.velo(v);
            if part == 2 {
                fronnbr += 1;
            } else {
                compsize[part as usize] += 1;
                for &u in self.s.neighbors(v) {
                    if self.parttax[u] == 1 - part {
                        inconsistent!("vertices {v} and {u} of opposite parts are adjacent");
                    }
                }
            }
        }
        if compload != self.compload || compsize != self.compsize {
            inconsistent!(
                "part loads {:?} / sizes {:?} do not match",
                self.compload,
                self.compsize
            );
        }
        if self.comploaddlt != compload[0] - compload[1] {
            inconsistent!("invalid load imbalance {}", self.comploaddlt);
        }
        if fronnbr != self.fronnbr
            || self.frontab.len() as Gnum != fronnbr
            || self.frontab.iter().any(|&v| self.parttax[v] != 2)
        {
            inconsistent!("frontier list does not match the separator");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    #[test]
    fn store_and_check() {
        let graf = graph_build(0, &mut Grid2Gen::new(3, 3)).unwrap();
        let mut vgraf = Vgraph::new(graf).unwrap();
        vgraf.check().unwrap();
        let zero = vgraf.store();

        // middle column as separator
        for v in [1, 4, 7] {
            vgraf.parttax[v] = 2;
        }
        for v in [2, 5, 8] {
            vgraf.parttax[v] = 1;
        }
        vgraf.update();
        vgraf.check().unwrap();
        assert_eq!(vgraf.compload, [3, 3, 3]);
        assert_eq!(vgraf.quality(), (3, 0));

        let sep = vgraf.store();
        vgraf.restore(&zero);
        vgraf.check().unwrap();
        assert_eq!(vgraf.compsize, [9, 0]);
        vgraf.restore(&sep);
        assert_eq!(vgraf.frontab, vec![1, 4, 7]);

        vgraf.parttax[4] = 1;
        vgraf.update();
        assert!(vgraf.check().is_err());
    }
}
