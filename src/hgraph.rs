//! Halo graphs
//!
//! A halo graph is a graph whose last vertices, from `vnohnnd` on, form a halo: they border the
//! part of the problem being processed and are not to be ordered themselves. Halo vertices only
//! adjoin non-halo vertices. The adjacency of every non-halo vertex lists its non-halo neighbors
//! first, up to `vnhdtax[v]`, then its halo neighbors.

use crate::based::BasedVec;
use crate::defs::Gnum;
use crate::error::{inconsistent, Result};
use crate::graph::Graph;

#[derive(Clone, Debug, Default)]
pub struct Hgraph {
    /// whole graph, halo vertices included
    pub s: Graph,
    pub vnohnbr: Gnum,
    /// `baseval + vnohnbr`, first halo vertex
    pub vnohnnd: Gnum,
    /// end of the non-halo part of the adjacency of each non-halo vertex
    pub vnhdtax: BasedVec<Gnum>,
    pub vnlosum: Gnum,
    /// number of arcs between non-halo vertices
    pub enohnbr: Gnum,
    pub enlosum: Gnum,
    /// nested dissection depth
    pub levlnum: Gnum,
}

impl Hgraph {
    /// Halo graph without halo
    pub fn from_graph(graf: Graph) -> Hgraph {
        Hgraph {
            vnohnbr: graf.vertnbr,
            vnohnnd: graf.vertnnd,
            vnhdtax: graf.vendtax.clone(),
            vnlosum: graf.velosum,
            enohnbr: graf.edgenbr,
            enlosum: graf.edlosum,
            levlnum: 0,
            s: graf,
        }
    }

    #[inline]
    pub fn vnoh_range(&self) -> std::ops::Range<Gnum> {
        self.s.baseval..self.vnohnnd
    }

    /// Non-halo neighbors of non-halo vertex `v`
    #[inline]
    pub fn nohalo_neighbors(&self, v: Gnum) -> &[Gnum] {
        &self.s.edgetax[self.s.verttax[v]..self.vnhdtax[v]]
    }

    /// Graph made of the non-halo vertices only
    pub fn unhalo(&self) -> Result<Graph> {
        let baseval = self.s.baseval;
        let range = self.vnoh_range();
        let mut graf = Graph {
            baseval,
            vertnbr: self.vnohnbr,
            vertnnd: self.vnohnnd,
            verttax: self.s.verttax.sub(range.clone()),
            vendtax: self.vnhdtax.clone(),
            velotax: self.s.velotax.as_ref().map(|t| t.sub(range.clone())),
            vnumtax: self.s.vnumtax.as_ref().map(|t| t.sub(range.clone())),
            edgetax: self.s.edgetax.clone(),
            edlotax: self.s.edlotax.clone(),
            ..Default::default()
        };
        graf.update_sums();
        Ok(graf)
    }

    /// Check the halo invariants on top of the graph ones
    pub fn check(&self) -> Result<()> {
        self.s.check()?;
        let baseval = self.s.baseval;
        if self.vnohnbr < 0
            || self.vnohnbr > self.s.vertnbr
            || self.vnohnnd != baseval + self.vnohnbr
        {
            inconsistent!("invalid non-halo vertex count {}", self.vnohnbr);
        }
        if self.vnhdtax.range() != self.vnoh_range() {
            inconsistent!("non-halo end array does not cover the non-halo vertices");
        }
        let mut vnlosum = 0;
        let mut enohnbr = 0;
        let mut enlosum = 0;
        for v in self.vnoh_range() {
            let vnhd = self.vnhdtax[v];
            if vnhd < self.s.verttax[v] || vnhd > self.s.vendtax[v] {
                inconsistent!("non-halo end of vertex {v} out of its adjacency");
            }
            for e in self.s.verttax[v]..vnhd {
                if self.s.edgetax[e] >= self.vnohnnd {
                    inconsistent!("halo neighbor in the non-halo adjacency of vertex {v}");
                }
                enlosum += self.s.edlo(e);
            }
            for e in vnhd..self.s.vendtax[v] {
                if self.s.edgetax[e] < self.vnohnnd {
                    inconsistent!("non-halo neighbor in the halo adjacency of vertex {v}");
                }
            }
            vnlosum += self.s.velo(v);
            enohnbr += vnhd - self.s.verttax[v];
        }
        for v in self.vnohnnd..self.s.vertnnd {
            if self.s.neighbors(v).iter().any(|&u| u >= self.vnohnnd) {
                inconsistent!("halo vertex {v} adjoins another halo vertex");
            }
        }
        if vnlosum != self.vnlosum || enohnbr != self.enohnbr || enlosum != self.enlosum {
            inconsistent!("non-halo sums do not match the arrays");
        }
        Ok(())
    }
}
