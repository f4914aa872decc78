//! Source graph structure
//!
//! A graph is stored as adjacency slices into one edge array. Vertex `v` owns arcs
//! `verttax[v]..vendtax[v]` of `edgetax`; every undirected edge is represented by two arcs.
//! All arrays are numbered from `baseval`, which is 0 or 1.

use std::ops::Range;

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, GraphPart, GNUM_NONE};
use crate::error::{inconsistent, invalid, Result};

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub baseval: Gnum,
    pub vertnbr: Gnum,
    /// `baseval + vertnbr`
    pub vertnnd: Gnum,
    pub verttax: BasedVec<Gnum>,
    pub vendtax: BasedVec<Gnum>,
    /// vertex loads, all 1 when absent
    pub velotax: Option<BasedVec<Gnum>>,
    pub velosum: Gnum,
    /// numbers of the vertices in the original graph, identity when absent
    pub vnumtax: Option<BasedVec<Gnum>>,
    /// display labels
    pub vlbltax: Option<BasedVec<Gnum>>,
    /// number of arcs
    pub edgenbr: Gnum,
    pub edgetax: BasedVec<Gnum>,
    /// edge loads, all 1 when absent
    pub edlotax: Option<BasedVec<Gnum>>,
    pub edlosum: Gnum,
    pub degrmax: Gnum,
}

/// Explicit list of vertices, used to describe the vertex set of an induced subgraph
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertList {
    pub vnumtab: Vec<Gnum>,
}

impl VertList {
    pub fn new(vnumtab: Vec<Gnum>) -> Self {
        Self { vnumtab }
    }

    /// Vertices of `range` whose part is `partval`, in increasing order
    pub fn from_part(
        parttax: &BasedVec<GraphPart>,
        range: Range<Gnum>,
        partval: GraphPart,
    ) -> Self {
        Self { vnumtab: range.filter(|&v| parttax[v] == partval).collect() }
    }

    pub fn len(&self) -> usize {
        self.vnumtab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vnumtab.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gnum> {
        self.vnumtab.iter()
    }
}

impl Graph {
    /// Graph from compact adjacency arrays: `verttab` holds `vertnbr + 1` edge indices
    pub fn from_csr(
        baseval: Gnum,
        verttab: Vec<Gnum>,
        edgetab: Vec<Gnum>,
        velotab: Option<Vec<Gnum>>,
        edlotab: Option<Vec<Gnum>>,
    ) -> Result<Graph> {
        if baseval != 0 && baseval != 1 {
            invalid!("base value must be 0 or 1, got {baseval}");
        }
        if verttab.is_empty() {
            invalid!("vertex array must hold at least one index");
        }
        let vertnbr = verttab.len() - 1;
        if velotab.as_ref().is_some_and(|t| t.len() != vertnbr) {
            invalid!("vertex load array must hold {vertnbr} loads");
        }
        if edlotab.as_ref().is_some_and(|t| t.len() != edgetab.len()) {
            invalid!("edge load array must hold {} loads", edgetab.len());
        }
        let vendtab = verttab[1..].to_vec();
        let mut verttab = verttab;
        verttab.truncate(vertnbr);
        let graf = Graph::from_parts(
            baseval,
            BasedVec::new(baseval, verttab),
            BasedVec::new(baseval, vendtab),
            BasedVec::new(baseval, edgetab),
            velotab.map(|t| BasedVec::new(baseval, t)),
            edlotab.map(|t| BasedVec::new(baseval, t)),
        );
        graf.check()?;
        Ok(graf)
    }

    /// Graph from its arrays, computing the vertex count, arc count, sums and maximum degree
    pub fn from_parts(
        baseval: Gnum,
        verttax: BasedVec<Gnum>,
        vendtax: BasedVec<Gnum>,
        edgetax: BasedVec<Gnum>,
        velotax: Option<BasedVec<Gnum>>,
        edlotax: Option<BasedVec<Gnum>>,
    ) -> Graph {
        let vertnbr = verttax.len() as Gnum;
        let mut graf = Graph {
            baseval,
            vertnbr,
            vertnnd: baseval + vertnbr,
            verttax,
            vendtax,
            velotax,
            edgetax,
            edlotax,
            ..Default::default()
        };
        graf.update_sums();
        graf
    }

    /// Recompute `edgenbr`, `velosum`, `edlosum` and `degrmax` from the arrays
    pub fn update_sums(&mut self) {
        let mut edgenbr = 0;
        let mut degrmax = 0;
        let mut edlosum = 0;
        for v in self.vert_range() {
            let degr = self.vendtax[v] - self.verttax[v];
            edgenbr += degr;
            degrmax = degrmax.max(degr);
            if let Some(edlotax) = &self.edlotax {
                edlosum += edlotax[self.adj(v)].iter().sum::<Gnum>();
            }
        }
        self.edgenbr = edgenbr;
        self.degrmax = degrmax;
        self.edlosum = if self.edlotax.is_some() { edlosum } else { edgenbr };
        self.velosum = match &self.velotax {
            Some(velotax) => velotax.iter().sum(),
            None => self.vertnbr,
        };
    }

    #[inline]
    pub fn vert_range(&self) -> Range<Gnum> {
        self.baseval..self.vertnnd
    }

    /// Arc indices of vertex `v`
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

    #[inline]
    pub fn velo(&self, v: Gnum) -> Gnum {
        self.velotax.as_ref().map_or(1, |t| t[v])
    }

    #[inline]
    pub fn edlo(&self, e: Gnum) -> Gnum {
        self.edlotax.as_ref().map_or(1, |t| t[e])
    }

    /// Number of vertex `v` in the original graph
    #[inline]
    pub fn vnum(&self, v: Gnum) -> Gnum {
        self.vnumtax.as_ref().map_or(v, |t| t[v])
    }

    #[inline]
    pub fn vlbl(&self, v: Gnum) -> Gnum {
        self.vlbltax.as_ref().map_or(v, |t| t[v])
    }

    /// Check the structural invariants of the graph
    #[track_caller]
    pub fn check(&self) -> Result<()> {
        let baseval = self.baseval;
        if baseval != 0 && baseval != 1 {
            inconsistent!("invalid base value {baseval}");
        }
        if self.vertnnd != baseval + self.vertnbr {
            inconsistent!("vertnnd {} != base + vertnbr {}", self.vertnnd, baseval + self.vertnbr);
        }
        let vertnbr = self.vertnbr as usize;
        if self.verttax.len() != vertnbr || self.vendtax.len() != vertnbr {
            inconsistent!("vertex arrays do not hold {vertnbr} entries");
        }
        if self.verttax.base() != baseval || self.vendtax.base() != baseval {
            inconsistent!("vertex arrays not based at {baseval}");
        }
        if self.velotax.as_ref().is_some_and(|t| t.len() != vertnbr || t.base() != baseval)
            || self.vnumtax.as_ref().is_some_and(|t| t.len() != vertnbr || t.base() != baseval)
        {
            inconsistent!("vertex load or number array does not match vertex array");
        }
        if self.edgetax.base() != baseval {
            inconsistent!("edge array not based at {baseval}");
        }
        if let Some(edlotax) = &self.edlotax {
            if edlotax.base() != baseval || edlotax.len() < self.edgetax.len() {
                inconsistent!("edge load array does not match edge array");
            }
        }

        let edgennd = self.edgetax.end();
        let mut edgenbr = 0;
        let mut degrmax = 0;
        let mut edlosum = 0;
        let mut velosum = 0;
        let mut marktax = BasedVec::try_from_elem(baseval, GNUM_NONE, vertnbr)?;
        for v in self.vert_range() {
            let (vert, vend) = (self.verttax[v], self.vendtax[v]);
            if vert < baseval || vend < vert || vend > edgennd {
                inconsistent!("invalid adjacency bounds {vert}..{vend} for vertex {v}");
            }
            let velo = self.velo(v);
            if velo < 0 {
                inconsistent!("negative load for vertex {v}");
            }
            velosum += velo;
            edgenbr += vend - vert;
            degrmax = degrmax.max(vend - vert);
            for e in vert..vend {
                let u = self.edgetax[e];
                if u < baseval || u >= self.vertnnd {
                    inconsistent!("arc {e} of vertex {v} points to invalid vertex {u}");
                }
                if u == v {
                    inconsistent!("loop on vertex {v}");
                }
                if marktax[u] == v {
                    inconsistent!("duplicate arc from vertex {v} to vertex {u}");
                }
                marktax[u] = v;
                let edlo = self.edlo(e);
                edlosum += edlo;
                let back = self.adj(u).find(|&f| self.edgetax[f] == v);
                match back {
                    None => inconsistent!("arc from {v} to {u} has no reverse arc"),
                    Some(f) if self.edlo(f) != edlo => {
                        inconsistent!("arcs between {v} and {u} have different loads")
                    }
                    _ => {}
                }
            }
        }
        if edgenbr != self.edgenbr {
            inconsistent!("arc count {} != {edgenbr}", self.edgenbr);
        }
        if degrmax > self.degrmax {
            inconsistent!("maximum degree {} below actual {degrmax}", self.degrmax);
        }
        if velosum != self.velosum {
            inconsistent!("vertex load sum {} != {velosum}", self.velosum);
        }
        if edlosum != self.edlosum {
            inconsistent!("edge load sum {} != {edlosum}", self.edlosum);
        }
        Ok(())
    }

    /// Subgraph induced by the vertices of `list`, without halo
    ///
    /// Induced vertex `baseval + i` is `list[i]`; its number is the number of `list[i]` in the
    /// original graph.
    pub fn induce_list(&self, list: &VertList) -> Result<Graph> {
        let baseval = self.baseval;
        let indvertnbr = list.len();

        let mut orgindxtax =
            BasedVec::try_from_elem(baseval, GNUM_NONE, self.vertnbr as usize)?;
        for (i, &v) in list.iter().enumerate() {
            orgindxtax[v] = baseval + i as Gnum;
        }

        let mut indedgenbr = 0;
        for &v in list.iter() {
            indedgenbr += self.neighbors(v).iter().filter(|&&u| orgindxtax[u] != GNUM_NONE).count();
        }

        let mut indverttab = try_vec(indvertnbr)?;
        let mut indvendtab = try_vec(indvertnbr)?;
        let mut indvnumtab = try_vec(indvertnbr)?;
        let mut indvelotab = self.velotax.as_ref().map(|_| try_vec(indvertnbr)).transpose()?;
        let mut indedgetab = try_vec(indedgenbr)?;
        let mut indedlotab = self.edlotax.as_ref().map(|_| try_vec(indedgenbr)).transpose()?;

        let mut indedgenum = baseval;
        for &v in list.iter() {
            indverttab.push(indedgenum);
            indvnumtab.push(self.vnum(v));
            if let (Some(tab), Some(velotax)) = (&mut indvelotab, &self.velotax) {
                tab.push(velotax[v]);
            }
            for e in self.adj(v) {
                let u = orgindxtax[self.edgetax[e]];
                if u == GNUM_NONE {
                    continue;
                }
                indedgetab.push(u);
                if let (Some(tab), Some(edlotax)) = (&mut indedlotab, &self.edlotax) {
                    tab.push(edlotax[e]);
                }
                indedgenum += 1;
            }
            indvendtab.push(indedgenum);
        }

        let mut indgraf = Graph::from_parts(
            baseval,
            BasedVec::new(baseval, indverttab),
            BasedVec::new(baseval, indvendtab),
            BasedVec::new(baseval, indedgetab),
            indvelotab.map(|t| BasedVec::new(baseval, t)),
            indedlotab.map(|t| BasedVec::new(baseval, t)),
        );
        indgraf.vnumtax = Some(BasedVec::new(baseval, indvnumtab));
        Ok(indgraf)
    }

    /// Subgraph induced by the vertices of part `partval`
    pub fn induce_part(&self, parttax: &BasedVec<GraphPart>, partval: GraphPart) -> Result<Graph> {
        self.induce_list(&VertList::from_part(parttax, self.vert_range(), partval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    fn path(n: Gnum) -> Graph {
        let mut verttab = vec![0];
        let mut edgetab = vec![];
        for v in 0..n {
            if v > 0 {
                edgetab.push(v - 1);
            }
            if v + 1 < n {
                edgetab.push(v + 1);
            }
            verttab.push(edgetab.len() as Gnum);
        }
        Graph::from_csr(0, verttab, edgetab, None, None).unwrap()
    }

    #[test]
    fn csr_graph_sums() {
        let graf = path(4);
        assert_eq!(graf.vertnbr, 4);
        assert_eq!(graf.edgenbr, 6);
        assert_eq!(graf.degrmax, 2);
        assert_eq!(graf.velosum, 4);
        assert_eq!(graf.neighbors(1), &[0, 2]);
    }

    #[test]
    fn check_rejects_broken_graphs() {
        assert!(Graph::from_csr(0, vec![0, 1, 1], vec![1], None, None).is_err());
        assert!(Graph::from_csr(0, vec![0, 1, 2], vec![0, 0], None, None).is_err());
        assert!(Graph::from_csr(2, vec![0, 0], vec![], None, None).is_err());
        assert!(Graph::from_csr(0, vec![0, 1, 2], vec![1, 0], None, Some(vec![1, 2])).is_err());
        assert!(Graph::from_csr(1, vec![1, 2, 3], vec![2, 1], Some(vec![3, 4]), None).is_ok());
    }

    #[test]
    fn induce_full_list_is_identity() {
        let graf = graph_build(1, &mut Grid2Gen::new(3, 4)).unwrap();
        let list = VertList::new(graf.vert_range().collect());
        let ind = graf.induce_list(&list).unwrap();
        ind.check().unwrap();
        assert_eq!(ind.vertnbr, graf.vertnbr);
        assert_eq!(ind.edgenbr, graf.edgenbr);
        for v in graf.vert_range() {
            assert_eq!(ind.neighbors(v), graf.neighbors(v));
            assert_eq!(ind.vnum(v), v);
        }
    }

    #[test]
    fn induce_part_keeps_inner_edges() {
        let graf = path(5);
        let parttax = BasedVec::new(0, vec![0, 0, 2, 1, 1]);
        let part1 = graf.induce_part(&parttax, 1).unwrap();
        part1.check().unwrap();
        assert_eq!(part1.vertnbr, 2);
        assert_eq!(part1.edgenbr, 2);
        assert_eq!(part1.vnum(0), 3);
        assert_eq!(part1.vnum(1), 4);
    }
}
